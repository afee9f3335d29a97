//! Domain types shared by the repositories, the widget and analytics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::repository::Entity;

/// Kind of answer a question collects
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Star rating from 1 to 5
    Rating,
    /// Yes / No
    #[serde(rename = "yesno")]
    YesNo,
    /// Free text
    Text,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Rating => "rating",
            QuestionType::YesNo => "yesno",
            QuestionType::Text => "text",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feedback prompt managed from the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Question {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields supplied when creating a question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub is_published: bool,
}

impl NewQuestion {
    pub fn new(text: impl Into<String>, question_type: QuestionType, is_published: bool) -> Self {
        Self {
            text: text.into(),
            question_type,
            is_published,
        }
    }
}

/// Partial update merged into an existing question
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl QuestionPatch {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn question_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = Some(is_published);
        self
    }

    /// Merge the patch into `question`; `id` and `created_at` are never touched
    pub fn apply(&self, question: &mut Question) {
        if let Some(text) = &self.text {
            question.text = text.clone();
        }
        if let Some(question_type) = self.question_type {
            question.question_type = question_type;
        }
        if let Some(is_published) = self.is_published {
            question.is_published = is_published;
        }
    }
}

/// Answer value, shaped by the question type
///
/// Serialized untagged so the JSON stays `4`, `true` or `"text"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Answer {
    Rating(u8),
    YesNo(bool),
    Text(String),
}

impl Answer {
    /// The question type this answer shape belongs to
    pub fn kind(&self) -> QuestionType {
        match self {
            Answer::Rating(_) => QuestionType::Rating,
            Answer::YesNo(_) => QuestionType::YesNo,
            Answer::Text(_) => QuestionType::Text,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Rating(stars) => write!(f, "{}/5", stars),
            Answer::YesNo(true) => f.write_str("Yes"),
            Answer::YesNo(false) => f.write_str("No"),
            Answer::Text(text) => f.write_str(text),
        }
    }
}

/// One end user's answer to a question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: String,
    pub question_id: String,
    pub answer: Answer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Entity for Response {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields supplied when recording a response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewResponse {
    pub question_id: String,
    pub answer: Answer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NewResponse {
    pub fn new(question_id: impl Into<String>, answer: Answer, timestamp: DateTime<Utc>) -> Self {
        Self {
            question_id: question_id.into(),
            answer,
            user_id: None,
            timestamp,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

/// Authenticated dashboard user, persisted by the session store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: UserRole,
}
