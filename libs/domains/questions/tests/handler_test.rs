//! Handler tests for the Questions domain
//!
//! Drive the real router over the in-memory repository, with tokens issued
//! by the same `JwtAuth` the middleware verifies against.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum_helpers::{ErrorResponse, JwtAuth, JwtConfig, optional_jwt_auth_middleware};
use domain_questions::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const SECRET: &str = "handler-test-secret-that-is-long-enough";

struct TestApp {
    router: Router,
    auth: JwtAuth,
}

impl TestApp {
    fn new() -> Self {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));
        let service = QuestionService::new(
            InMemoryQuestionRepository::new(),
            Arc::new(QuestionEvents::default()),
        );
        let router = handlers::router(service)
            .layer(from_fn_with_state(auth.clone(), optional_jwt_auth_middleware));
        Self { router, auth }
    }

    fn token_for(&self, user: Uuid) -> String {
        self.auth
            .create_access_token(&user.to_string(), "Tester", &["user".to_string()])
            .unwrap()
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            request = request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token_for(user)),
            );
        }
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn create_question(&self, user: Uuid, title: &str) -> Question {
        let (status, body) = self
            .call(
                "POST",
                "/",
                Some(user),
                Some(json!({ "title": title, "content": "This is the brand new question!!!" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice(&body).unwrap()
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_question_lifecycle() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();

    let created = app.create_question(owner, "New Question").await;
    assert_eq!(created.title, "New Question");
    assert_eq!(created.user, owner);

    let (status, body) = app.call("GET", &format!("/{}", created.id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Question = parse(&body);
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.content, "This is the brand new question!!!");

    let (status, body) = app
        .call("DELETE", &format!("/{}", created.id), Some(owner), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = app
        .call("DELETE", &format!("/{}", created.id), Some(owner), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_get_unknown_question_is_404() {
    let app = TestApp::new();
    let (status, _) = app.call("GET", &format!("/{}", Uuid::now_v7()), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_by_non_owner_is_403_and_leaves_question_unchanged() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();
    let created = app.create_question(owner, "Original").await;

    let (status, body) = app
        .call(
            "PUT",
            &format!("/{}", created.id),
            Some(Uuid::now_v7()),
            Some(json!({ "title": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());

    let (_, body) = app.call("GET", &format!("/{}", created.id), None, None).await;
    assert_eq!(parse::<Question>(&body).title, "Original");
}

#[tokio::test]
async fn test_delete_by_non_owner_is_403_and_keeps_question() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();
    let created = app.create_question(owner, "Keep me").await;

    let (status, body) = app
        .call("DELETE", &format!("/{}", created.id), Some(Uuid::now_v7()), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());

    let (status, body) = app.call("GET", &format!("/{}", created.id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<Question>(&body).title, "Keep me");
}

#[tokio::test]
async fn test_update_answer_comment_on_unknown_answer_is_404() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();
    let created = app.create_question(owner, "Answer comments").await;

    let (_, body) = app
        .call(
            "POST",
            &format!("/{}/answers", created.id),
            Some(owner),
            Some(json!({ "content": "An answer" })),
        )
        .await;
    let answer_id = parse::<Question>(&body).answers[0].id;

    let (_, body) = app
        .call(
            "POST",
            &format!("/{}/answers/{answer_id}/comments", created.id),
            Some(owner),
            Some(json!({ "content": "A comment" })),
        )
        .await;
    let comment_id = parse::<Question>(&body).answers[0].comments[0].id;

    let (status, body) = app
        .call(
            "PUT",
            &format!(
                "/{}/answers/{}/comments/{comment_id}",
                created.id,
                Uuid::now_v7()
            ),
            Some(owner),
            Some(json!({ "content": "Edited" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (_, body) = app.call("GET", &format!("/{}", created.id), None, None).await;
    assert_eq!(
        parse::<Question>(&body).answers[0].comments[0].content,
        "A comment"
    );
}

#[tokio::test]
async fn test_update_by_owner_ignores_id_in_body() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();
    let created = app.create_question(owner, "Original").await;

    let (status, body) = app
        .call(
            "PUT",
            &format!("/{}", created.id),
            Some(owner),
            Some(json!({ "_id": Uuid::now_v7(), "title": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Question = parse(&body);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.content, created.content);
}

#[tokio::test]
async fn test_mutations_require_authentication() {
    let app = TestApp::new();
    let (status, body) = app
        .call("POST", "/", None, Some(json!({ "title": "t", "content": "c" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.error, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"title":"t","content":"c"}"#))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_validates_input() {
    let app = TestApp::new();
    let (status, body) = app
        .call(
            "POST",
            "/",
            Some(Uuid::now_v7()),
            Some(json!({ "title": "", "content": "c" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_id_is_400() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "INVALID_UUID");
}

#[tokio::test]
async fn test_answer_on_missing_question_is_404() {
    let app = TestApp::new();
    let (status, _) = app
        .call(
            "POST",
            &format!("/{}/answers", Uuid::now_v7()),
            Some(Uuid::now_v7()),
            Some(json!({ "content": "An answer" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_answer_and_comment_flow_returns_full_question() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();
    let helper = Uuid::now_v7();
    let created = app.create_question(owner, "Lifetimes").await;

    let (status, body) = app
        .call(
            "POST",
            &format!("/{}/answers", created.id),
            Some(helper),
            Some(json!({ "content": "Use references" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let question: Question = parse(&body);
    assert_eq!(question.answers.len(), 1);
    assert_eq!(question.answers[0].user, helper);
    assert!(question.search_text.contains("use references"));
    let answer_id = question.answers[0].id;

    let (status, body) = app
        .call(
            "POST",
            &format!("/{}/answers/{answer_id}/comments", created.id),
            Some(owner),
            Some(json!({ "content": "Thanks" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let question: Question = parse(&body);
    let comment_id = question.answers[0].comments[0].id;

    // Only the comment author may edit an answer comment
    let (status, _) = app
        .call(
            "PUT",
            &format!("/{}/answers/{answer_id}/comments/{comment_id}", created.id),
            Some(helper),
            Some(json!({ "content": "Edited by someone else" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call(
            "PUT",
            &format!("/{}/answers/{answer_id}/comments/{comment_id}", created.id),
            Some(owner),
            Some(json!({ "content": "Thanks a lot" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse::<Question>(&body).answers[0].comments[0].content,
        "Thanks a lot"
    );

    // Answers are removed only by their author
    let (status, _) = app
        .call(
            "DELETE",
            &format!("/{}/answers/{answer_id}", created.id),
            Some(owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call(
            "DELETE",
            &format!("/{}/answers/{answer_id}", created.id),
            Some(helper),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let question: Question = parse(&body);
    assert!(question.answers.is_empty());
    assert_eq!(question.search_text, "lifetimes this is the brand new question!!!");
}

#[tokio::test]
async fn test_question_comment_edit_transfers_authorship() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();
    let created = app.create_question(owner, "Comments").await;

    let (_, body) = app
        .call(
            "POST",
            &format!("/{}/comments", created.id),
            Some(owner),
            Some(json!({ "content": "First" })),
        )
        .await;
    let comment_id = parse::<Question>(&body).comments[0].id;

    let editor = Uuid::now_v7();
    let (status, body) = app
        .call(
            "PUT",
            &format!("/{}/comments/{comment_id}", created.id),
            Some(editor),
            Some(json!({ "content": "Rewritten" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let comment = &parse::<Question>(&body).comments[0];
    assert_eq!(comment.content, "Rewritten");
    assert_eq!(comment.user, editor);
}

#[tokio::test]
async fn test_double_star_appends_twice_and_unstar_removes_all() {
    let app = TestApp::new();
    let fan = Uuid::now_v7();
    let created = app.create_question(Uuid::now_v7(), "Star me").await;
    let uri = format!("/{}/star", created.id);

    for _ in 0..2 {
        let (status, _) = app.call("POST", &uri, Some(fan), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = app.call("GET", &format!("/{}", created.id), None, None).await;
    assert_eq!(parse::<Question>(&body).stars, vec![fan, fan]);

    let (status, body) = app.call("DELETE", &uri, Some(fan), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(parse::<Question>(&body).stars.is_empty());
}

#[tokio::test]
async fn test_star_missing_answer_is_404() {
    let app = TestApp::new();
    let created = app.create_question(Uuid::now_v7(), "No answers").await;
    let (status, _) = app
        .call(
            "POST",
            &format!("/{}/answers/{}/star", created.id, Uuid::now_v7()),
            Some(Uuid::now_v7()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_newest_twenty() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();
    for i in 0..22 {
        app.create_question(owner, &format!("Question {i}")).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let (status, body) = app.call("GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<Question> = parse(&body);
    assert_eq!(listed.len(), 20);
    assert_eq!(listed[0].title, "Question 21");
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn test_list_with_filter() {
    let app = TestApp::new();
    let owner = Uuid::now_v7();
    app.create_question(owner, "Wanted").await;
    app.create_question(owner, "Other").await;

    let (status, body) = app
        .call("GET", "/?query=%7B%22title%22%3A%22Wanted%22%7D", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<Question> = parse(&body);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Wanted");
}

#[tokio::test]
async fn test_list_with_malformed_query_is_500() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/?query=%7Bbroken", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.error, "STORE_ERROR");
    assert!(!error.message.is_empty());
}
