use uuid::Uuid;

use crate::error::{QuestionError, QuestionResult};
use crate::models::Question;

/// Pass the question through when `caller` owns it
pub fn authorize_owner(question: Question, caller: Uuid) -> QuestionResult<Question> {
    if question.user == caller {
        Ok(question)
    } else {
        tracing::debug!(question_id = %question.id, %caller, "Caller is not the question owner");
        Err(QuestionError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateQuestion;

    fn owned_by(user: Uuid) -> Question {
        Question::new(
            CreateQuestion {
                title: "t".into(),
                content: "c".into(),
            },
            user,
        )
    }

    #[test]
    fn test_owner_passes_through() {
        let owner = Uuid::now_v7();
        let question = owned_by(owner);
        let id = question.id;
        assert_eq!(authorize_owner(question, owner).unwrap().id, id);
    }

    #[test]
    fn test_other_user_is_forbidden() {
        let question = owned_by(Uuid::now_v7());
        assert!(matches!(
            authorize_owner(question, Uuid::now_v7()),
            Err(QuestionError::Forbidden)
        ));
    }
}
