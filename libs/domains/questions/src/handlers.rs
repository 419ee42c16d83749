use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AuthUser, IdsPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::QuestionResult;
use crate::models::{
    Answer, Comment, CommentParent, ContentInput, CreateQuestion, ListParams, Question, StarOp,
    StarTarget, UpdateQuestion,
};
use crate::repository::QuestionRepository;
use crate::service::QuestionService;

/// OpenAPI documentation for the Questions API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_questions,
        create_question,
        get_question,
        update_question,
        delete_question,
        create_answer,
        update_answer,
        delete_answer,
        create_comment,
        update_comment,
        delete_comment,
        create_answer_comment,
        update_answer_comment,
        delete_answer_comment,
        star_question,
        unstar_question,
        star_answer,
        unstar_answer,
        star_comment,
        unstar_comment,
        star_answer_comment,
        unstar_answer_comment,
    ),
    components(
        schemas(Question, Answer, Comment, CreateQuestion, UpdateQuestion, ContentInput),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Questions", description = "Questions with nested answers, comments and stars")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<QuestionService<R>>>;

/// Create the questions router with all HTTP endpoints
///
/// Mutating routes need an [`AuthUser`], so the app must run
/// `optional_jwt_auth_middleware` in front of this router.
pub fn router<R: QuestionRepository + 'static>(service: QuestionService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_questions).post(create_question))
        .route(
            "/{id}",
            get(get_question).put(update_question).delete(delete_question),
        )
        .route("/{id}/answers", post(create_answer))
        .route(
            "/{id}/answers/{answer_id}",
            put(update_answer).delete(delete_answer),
        )
        .route("/{id}/comments", post(create_comment))
        .route(
            "/{id}/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
        .route(
            "/{id}/answers/{answer_id}/comments",
            post(create_answer_comment),
        )
        .route(
            "/{id}/answers/{answer_id}/comments/{comment_id}",
            put(update_answer_comment).delete(delete_answer_comment),
        )
        .route("/{id}/star", post(star_question).delete(unstar_question))
        .route(
            "/{id}/answers/{answer_id}/star",
            post(star_answer).delete(unstar_answer),
        )
        .route(
            "/{id}/comments/{comment_id}/star",
            post(star_comment).delete(unstar_comment),
        )
        .route(
            "/{id}/answers/{answer_id}/comments/{comment_id}/star",
            post(star_answer_comment).delete(unstar_answer_comment),
        )
        .with_state(shared_service)
}

/// List the newest questions, optionally filtered
#[utoipa::path(
    get,
    path = "",
    tag = "Questions",
    params(ListParams),
    responses(
        (status = 200, description = "Up to 20 questions, newest first", body = Vec<Question>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_questions<R: QuestionRepository>(
    State(service): SharedService<R>,
    Query(params): Query<ListParams>,
) -> QuestionResult<Json<Vec<Question>>> {
    let questions = service.list_questions(params.query.as_deref()).await?;
    Ok(Json(questions))
}

/// Ask a new question
#[utoipa::path(
    post,
    path = "",
    tag = "Questions",
    request_body = CreateQuestion,
    responses(
        (status = 201, description = "Question created", body = Question),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_question<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateQuestion>,
) -> QuestionResult<impl IntoResponse> {
    let question = service.create_question(input, user.id).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Get a question by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Questions",
    params(("id" = Uuid, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question found", body = Question),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, description = "Question not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_question<R: QuestionRepository>(
    State(service): SharedService<R>,
    IdsPath(id): IdsPath<Uuid>,
) -> QuestionResult<Json<Question>> {
    let question = service.get_question(id).await?;
    Ok(Json(question))
}

/// Edit title or content of your own question
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Questions",
    params(("id" = Uuid, Path, description = "Question ID")),
    request_body = UpdateQuestion,
    responses(
        (status = 200, description = "Question updated", body = Question),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, description = "Caller does not own the question"),
        (status = 404, description = "Question not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_question<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath(id): IdsPath<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateQuestion>,
) -> QuestionResult<Json<Question>> {
    let question = service.update_question(id, input, user.id).await?;
    Ok(Json(question))
}

/// Delete your own question
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Questions",
    params(("id" = Uuid, Path, description = "Question ID")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, description = "Caller does not own the question"),
        (status = 404, description = "Question not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_question<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath(id): IdsPath<Uuid>,
) -> QuestionResult<StatusCode> {
    service.delete_question(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Answer a question
#[utoipa::path(
    post,
    path = "/{id}/answers",
    tag = "Questions",
    params(("id" = Uuid, Path, description = "Question ID")),
    request_body = ContentInput,
    responses(
        (status = 200, description = "Question with the new answer", body = Question),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_answer<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath(id): IdsPath<Uuid>,
    ValidatedJson(input): ValidatedJson<ContentInput>,
) -> QuestionResult<Json<Question>> {
    let question = service.create_answer(id, input, user.id).await?;
    Ok(Json(question))
}

/// Replace the content of an answer; the caller becomes its author
#[utoipa::path(
    put,
    path = "/{id}/answers/{answer_id}",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID")
    ),
    request_body = ContentInput,
    responses(
        (status = 200, description = "Question with the edited answer", body = Question),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question or answer not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_answer<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id)): IdsPath<(Uuid, Uuid)>,
    ValidatedJson(input): ValidatedJson<ContentInput>,
) -> QuestionResult<Json<Question>> {
    let question = service
        .update_answer(id, answer_id, input, user.id)
        .await?;
    Ok(Json(question))
}

/// Remove an answer you wrote
#[utoipa::path(
    delete,
    path = "/{id}/answers/{answer_id}",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID")
    ),
    responses(
        (status = 200, description = "Question without the answer", body = Question),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Nothing removed"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_answer<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id)): IdsPath<(Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    let question = service.delete_answer(id, answer_id, user.id).await?;
    Ok(Json(question))
}

/// Comment on a question
#[utoipa::path(
    post,
    path = "/{id}/comments",
    tag = "Questions",
    params(("id" = Uuid, Path, description = "Question ID")),
    request_body = ContentInput,
    responses(
        (status = 200, description = "Question with the new comment", body = Question),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath(id): IdsPath<Uuid>,
    ValidatedJson(input): ValidatedJson<ContentInput>,
) -> QuestionResult<Json<Question>> {
    let question = service
        .create_comment(id, CommentParent::Question, input, user.id)
        .await?;
    Ok(Json(question))
}

/// Replace the content of a question comment; the caller becomes its author
#[utoipa::path(
    put,
    path = "/{id}/comments/{comment_id}",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = ContentInput,
    responses(
        (status = 200, description = "Question with the edited comment", body = Question),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question or comment not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, comment_id)): IdsPath<(Uuid, Uuid)>,
    ValidatedJson(input): ValidatedJson<ContentInput>,
) -> QuestionResult<Json<Question>> {
    let question = service
        .update_comment(id, CommentParent::Question, comment_id, input, user.id)
        .await?;
    Ok(Json(question))
}

/// Remove a question comment you wrote
#[utoipa::path(
    delete,
    path = "/{id}/comments/{comment_id}",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Question without the comment", body = Question),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Nothing removed"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, comment_id)): IdsPath<(Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    let question = service
        .delete_comment(id, CommentParent::Question, comment_id, user.id)
        .await?;
    Ok(Json(question))
}

/// Comment on an answer
#[utoipa::path(
    post,
    path = "/{id}/answers/{answer_id}/comments",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID")
    ),
    request_body = ContentInput,
    responses(
        (status = 200, description = "Question with the new answer comment", body = Question),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question or answer not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_answer_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id)): IdsPath<(Uuid, Uuid)>,
    ValidatedJson(input): ValidatedJson<ContentInput>,
) -> QuestionResult<Json<Question>> {
    let question = service
        .create_comment(id, CommentParent::Answer(answer_id), input, user.id)
        .await?;
    Ok(Json(question))
}

/// Edit an answer comment you wrote
#[utoipa::path(
    put,
    path = "/{id}/answers/{answer_id}/comments/{comment_id}",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = ContentInput,
    responses(
        (status = 200, description = "Question with the edited answer comment", body = Question),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "No matching comment written by the caller"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_answer_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id, comment_id)): IdsPath<(Uuid, Uuid, Uuid)>,
    ValidatedJson(input): ValidatedJson<ContentInput>,
) -> QuestionResult<Json<Question>> {
    let question = service
        .update_comment(id, CommentParent::Answer(answer_id), comment_id, input, user.id)
        .await?;
    Ok(Json(question))
}

/// Remove an answer comment you wrote
#[utoipa::path(
    delete,
    path = "/{id}/answers/{answer_id}/comments/{comment_id}",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Question without the answer comment", body = Question),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Nothing removed"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_answer_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id, comment_id)): IdsPath<(Uuid, Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    let question = service
        .delete_comment(id, CommentParent::Answer(answer_id), comment_id, user.id)
        .await?;
    Ok(Json(question))
}

async fn star<R: QuestionRepository>(
    service: &QuestionService<R>,
    id: Uuid,
    target: StarTarget,
    op: StarOp,
    user: &AuthUser,
) -> QuestionResult<Json<Question>> {
    let question = service.star(id, target, op, user.id).await?;
    Ok(Json(question))
}

/// Star a question
#[utoipa::path(
    post,
    path = "/{id}/star",
    tag = "Questions",
    params(("id" = Uuid, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Starred question", body = Question),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn star_question<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath(id): IdsPath<Uuid>,
) -> QuestionResult<Json<Question>> {
    star(&service, id, StarTarget::Question, StarOp::Append, &user).await
}

/// Remove your star from a question
#[utoipa::path(
    delete,
    path = "/{id}/star",
    tag = "Questions",
    params(("id" = Uuid, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Unstarred question", body = Question),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn unstar_question<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath(id): IdsPath<Uuid>,
) -> QuestionResult<Json<Question>> {
    star(&service, id, StarTarget::Question, StarOp::Remove, &user).await
}

/// Star an answer
#[utoipa::path(
    post,
    path = "/{id}/answers/{answer_id}/star",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID")
    ),
    responses(
        (status = 200, description = "Question with the starred answer", body = Question),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question or answer not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn star_answer<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id)): IdsPath<(Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    star(&service, id, StarTarget::Answer(answer_id), StarOp::Append, &user).await
}

/// Remove your star from an answer
#[utoipa::path(
    delete,
    path = "/{id}/answers/{answer_id}/star",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID")
    ),
    responses(
        (status = 200, description = "Question with the unstarred answer", body = Question),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question or answer not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn unstar_answer<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id)): IdsPath<(Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    star(&service, id, StarTarget::Answer(answer_id), StarOp::Remove, &user).await
}

/// Star a question comment
#[utoipa::path(
    post,
    path = "/{id}/comments/{comment_id}/star",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Question with the starred comment", body = Question),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question or comment not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn star_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, comment_id)): IdsPath<(Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    star(&service, id, StarTarget::Comment(comment_id), StarOp::Append, &user).await
}

/// Remove your star from a question comment
#[utoipa::path(
    delete,
    path = "/{id}/comments/{comment_id}/star",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Question with the unstarred comment", body = Question),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question or comment not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn unstar_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, comment_id)): IdsPath<(Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    star(&service, id, StarTarget::Comment(comment_id), StarOp::Remove, &user).await
}

/// Star an answer comment
#[utoipa::path(
    post,
    path = "/{id}/answers/{answer_id}/comments/{comment_id}/star",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Question with the starred answer comment", body = Question),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question, answer or comment not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn star_answer_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id, comment_id)): IdsPath<(Uuid, Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    let target = StarTarget::AnswerComment {
        answer_id,
        comment_id,
    };
    star(&service, id, target, StarOp::Append, &user).await
}

/// Remove your star from an answer comment
#[utoipa::path(
    delete,
    path = "/{id}/answers/{answer_id}/comments/{comment_id}/star",
    tag = "Questions",
    params(
        ("id" = Uuid, Path, description = "Question ID"),
        ("answer_id" = Uuid, Path, description = "Answer ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Question with the unstarred answer comment", body = Question),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Question, answer or comment not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn unstar_answer_comment<R: QuestionRepository>(
    State(service): SharedService<R>,
    user: AuthUser,
    IdsPath((id, answer_id, comment_id)): IdsPath<(Uuid, Uuid, Uuid)>,
) -> QuestionResult<Json<Question>> {
    let target = StarTarget::AnswerComment {
        answer_id,
        comment_id,
    };
    star(&service, id, target, StarOp::Remove, &user).await
}
