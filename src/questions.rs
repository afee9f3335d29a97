//! Question repository: admin CRUD over the question collection

use chrono::Utc;
use uuid::Uuid;

use crate::app_log;
use crate::error::{FeedbackError, FeedbackResult};
use crate::logger::LogLevel;
use crate::models::{NewQuestion, Question, QuestionPatch};
use crate::repository::QuestionStore;

#[derive(Clone)]
pub struct QuestionRepository {
    store: QuestionStore,
}

impl QuestionRepository {
    pub fn new(store: QuestionStore) -> Self {
        Self { store }
    }

    /// All questions, published or not
    pub fn list_all(&self) -> FeedbackResult<Vec<Question>> {
        self.store.list()
    }

    /// Questions the widget may show
    pub fn list_published(&self) -> FeedbackResult<Vec<Question>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(|q| q.is_published)
            .collect())
    }

    pub fn get_by_id(&self, id: &str) -> FeedbackResult<Option<Question>> {
        let question = self.store.get(id)?;
        if question.is_none() {
            app_log!(LogLevel::Debug, "Question {} not found", id);
        }
        Ok(question)
    }

    pub fn create(&self, fields: NewQuestion) -> FeedbackResult<Question> {
        validate_text(&fields.text)?;

        let now = Utc::now();
        let question = Question {
            id: Uuid::new_v4().to_string(),
            text: fields.text,
            question_type: fields.question_type,
            is_published: fields.is_published,
            created_at: now,
            updated_at: now,
        };

        self.store.put(question.clone())?;
        app_log!(
            LogLevel::Info,
            "Created {} question {} (published: {})",
            question.question_type,
            question.id,
            question.is_published
        );
        Ok(question)
    }

    /// Merge `patch` into the question and refresh `updated_at`
    ///
    /// # Errors
    /// `QuestionNotFound` when no question has this id
    pub fn update(&self, id: &str, patch: QuestionPatch) -> FeedbackResult<Question> {
        if let Some(text) = &patch.text {
            validate_text(text)?;
        }

        let now = Utc::now();
        let updated = self.store.update(id, &mut |question| {
            patch.apply(question);
            question.updated_at = now;
        })?;

        match updated {
            Some(question) => {
                app_log!(LogLevel::Info, "Updated question {}", id);
                Ok(question)
            }
            None => {
                app_log!(LogLevel::Warn, "Update failed, question {} not found", id);
                Err(FeedbackError::QuestionNotFound(id.to_string()))
            }
        }
    }

    /// Shorthand for toggling visibility from the dashboard list
    pub fn set_published(&self, id: &str, is_published: bool) -> FeedbackResult<Question> {
        self.update(id, QuestionPatch::default().published(is_published))
    }

    /// Remove a question; deleting an unknown id is not an error
    pub fn delete(&self, id: &str) -> FeedbackResult<()> {
        if self.store.delete(id)? {
            app_log!(LogLevel::Info, "Deleted question {}", id);
        } else {
            app_log!(LogLevel::Debug, "Delete of unknown question {} ignored", id);
        }
        Ok(())
    }
}

fn validate_text(text: &str) -> FeedbackResult<()> {
    if text.trim().is_empty() {
        return Err(FeedbackError::InvalidQuestion(
            "question text must not be empty".to_string(),
        ));
    }
    Ok(())
}
