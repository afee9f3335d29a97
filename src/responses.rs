//! Response repository: append-only answers keyed by question

use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::app_log;
use crate::error::{FeedbackError, FeedbackResult};
use crate::logger::{LogLevel, LOGGER};
use crate::models::{Answer, NewResponse, Question, QuestionType, Response};
use crate::repository::{QuestionStore, ResponseStore};

/// Lowest accepted star rating
pub const MIN_RATING: u8 = 1;
/// Highest accepted star rating
pub const MAX_RATING: u8 = 5;

#[derive(Clone)]
pub struct ResponseRepository {
    responses: ResponseStore,
    questions: QuestionStore,
}

impl ResponseRepository {
    /// `questions` is only read, to check answer shapes
    pub fn new(responses: ResponseStore, questions: QuestionStore) -> Self {
        Self {
            responses,
            questions,
        }
    }

    /// All responses in insertion order
    pub fn list_all(&self) -> FeedbackResult<Vec<Response>> {
        self.responses.list()
    }

    pub fn list_by_question(&self, question_id: &str) -> FeedbackResult<Vec<Response>> {
        Ok(self
            .responses
            .list()?
            .into_iter()
            .filter(|r| r.question_id == question_id)
            .collect())
    }

    /// Record a response
    ///
    /// When the referenced question exists the answer must match its type,
    /// and ratings must lie in 1..=5. Responses to unknown questions are kept.
    pub fn create(&self, fields: NewResponse) -> FeedbackResult<Response> {
        match self.questions.get(&fields.question_id)? {
            Some(question) => validate_answer(&question, &fields.answer)?,
            None => app_log!(
                LogLevel::Warn,
                "Response references unknown question {}",
                fields.question_id
            ),
        }

        let response = Response {
            id: Uuid::new_v4().to_string(),
            question_id: fields.question_id,
            answer: fields.answer,
            user_id: fields.user_id,
            timestamp: fields.timestamp,
        };

        self.responses.put(response.clone())?;
        LOGGER.log_with_context(
            LogLevel::Info,
            "Recorded response",
            module_path!(),
            HashMap::from([
                ("response_id".to_string(), json!(response.id)),
                ("question_id".to_string(), json!(response.question_id)),
                ("answer_type".to_string(), json!(response.answer.kind().as_str())),
            ]),
        );
        Ok(response)
    }
}

pub fn validate_answer(question: &Question, answer: &Answer) -> FeedbackResult<()> {
    if answer.kind() != question.question_type {
        return Err(FeedbackError::InvalidAnswer(format!(
            "question {} expects a {} answer, got {}",
            question.id,
            question.question_type,
            answer.kind()
        )));
    }

    if let (QuestionType::Rating, Answer::Rating(stars)) = (question.question_type, answer) {
        if !(MIN_RATING..=MAX_RATING).contains(stars) {
            return Err(FeedbackError::InvalidAnswer(format!(
                "rating {} is outside {}..={}",
                stars, MIN_RATING, MAX_RATING
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryFactory;
    use chrono::Utc;

    fn seeded() -> ResponseRepository {
        ResponseRepository::new(
            RepositoryFactory::create_response_store(true),
            RepositoryFactory::create_question_store(true),
        )
    }

    #[test]
    fn test_list_by_question() {
        let repo = seeded();
        assert_eq!(repo.list_all().unwrap().len(), 3);
        assert_eq!(repo.list_by_question("1").unwrap().len(), 2);
        assert_eq!(repo.list_by_question("2").unwrap().len(), 1);
        assert!(repo.list_by_question("3").unwrap().is_empty());
    }

    #[test]
    fn test_create_appends_with_fresh_id() {
        let repo = seeded();
        let timestamp = Utc::now();
        let created = repo
            .create(
                NewResponse::new("3", Answer::Text("More dark mode".to_string()), timestamp)
                    .with_user("u-7"),
            )
            .unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all.last().unwrap(), &created);
        assert_eq!(all.iter().filter(|r| r.id == created.id).count(), 1);
        assert_eq!(created.timestamp, timestamp);
        assert_eq!(created.user_id.as_deref(), Some("u-7"));
    }

    #[test]
    fn test_many_responses_per_question() {
        let repo = seeded();
        for stars in 1..=5 {
            repo.create(NewResponse::new("1", Answer::Rating(stars), Utc::now()))
                .unwrap();
        }
        assert_eq!(repo.list_by_question("1").unwrap().len(), 7);
    }

    #[test]
    fn test_rejects_mismatched_shape() {
        let repo = seeded();
        let result = repo.create(NewResponse::new("2", Answer::Rating(3), Utc::now()));
        assert!(matches!(result, Err(FeedbackError::InvalidAnswer(_))));
        assert_eq!(repo.list_all().unwrap().len(), 3);
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        let repo = seeded();
        for stars in [0, 6, 200] {
            let result = repo.create(NewResponse::new("1", Answer::Rating(stars), Utc::now()));
            assert!(matches!(result, Err(FeedbackError::InvalidAnswer(_))));
        }
    }

    #[test]
    fn test_create_logs_once_with_context() {
        let repo = seeded();
        let created = repo
            .create(NewResponse::new("2", Answer::YesNo(false), Utc::now()))
            .unwrap();

        let entries: Vec<_> = LOGGER
            .get_logs()
            .into_iter()
            .filter(|e| {
                e.context
                    .as_ref()
                    .is_some_and(|c| c.get("response_id") == Some(&json!(created.id)))
            })
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Recorded response");
        assert_eq!(entries[0].context.as_ref().unwrap()["answer_type"], "yesno");
    }

    #[test]
    fn test_accepts_unknown_question() {
        let repo = seeded();
        let created = repo
            .create(NewResponse::new("deleted-question", Answer::Rating(9), Utc::now()))
            .unwrap();
        assert_eq!(repo.list_by_question("deleted-question").unwrap(), vec![created]);
    }
}
