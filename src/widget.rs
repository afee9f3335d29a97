//! Embeddable feedback widget flow
//!
//! ```text
//!  Closed ──open()──▶ Open{question} ──submit()──▶ Submitted
//!    ▲                    │                           │
//!    └──────close()───────┴──────────close()──────────┘
//! ```

use chrono::Utc;

use crate::app_log;
use crate::config::WidgetConfig;
use crate::error::{FeedbackError, FeedbackResult};
use crate::logger::LogLevel;
use crate::models::{Answer, NewResponse, Question, Response};
use crate::questions::QuestionRepository;
use crate::responses::ResponseRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    Closed,
    /// Modal shown with the active question
    Open { question: Question },
    /// Answer stored, thank-you message shown
    Submitted { response: Response },
}

impl WidgetState {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetState::Closed => "closed",
            WidgetState::Open { .. } => "open",
            WidgetState::Submitted { .. } => "submitted",
        }
    }
}

pub struct FeedbackWidget {
    config: WidgetConfig,
    questions: QuestionRepository,
    responses: ResponseRepository,
    state: WidgetState,
    user_id: Option<String>,
}

impl FeedbackWidget {
    pub fn new(
        config: WidgetConfig,
        questions: QuestionRepository,
        responses: ResponseRepository,
    ) -> Self {
        Self {
            config,
            questions,
            responses,
            state: WidgetState::Closed,
            user_id: None,
        }
    }

    /// Attach an end-user id to submitted responses
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn active_question(&self) -> Option<&Question> {
        match &self.state {
            WidgetState::Open { question } => Some(question),
            _ => None,
        }
    }

    /// Open the modal on the first published question
    ///
    /// # Errors
    /// `NoPublishedQuestions` when nothing is published
    pub fn open(&mut self) -> FeedbackResult<Question> {
        let question = self
            .questions
            .list_published()?
            .into_iter()
            .next()
            .ok_or(FeedbackError::NoPublishedQuestions)?;

        app_log!(LogLevel::Debug, "Widget opened on question {}", question.id);
        self.state = WidgetState::Open {
            question: question.clone(),
        };
        Ok(question)
    }

    /// Store the answer for the active question and return the thank-you text
    ///
    /// # Errors
    /// `InvalidWidgetState` unless the widget is open; `InvalidAnswer` when the
    /// answer does not fit the question
    pub fn submit(&mut self, answer: Answer) -> FeedbackResult<&str> {
        let WidgetState::Open { question } = &self.state else {
            return Err(FeedbackError::InvalidWidgetState(format!(
                "cannot submit while {}",
                self.state.name()
            )));
        };

        let mut fields = NewResponse::new(question.id.clone(), answer, Utc::now());
        fields.user_id = self.user_id.clone();
        let response = self.responses.create(fields)?;

        self.state = WidgetState::Submitted { response };
        Ok(&self.config.thank_you_message)
    }

    pub fn close(&mut self) {
        self.state = WidgetState::Closed;
    }
}
