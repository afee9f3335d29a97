use thiserror::Error;

/// Central error type for the feedback desk
#[derive(Error, Debug)]
pub enum FeedbackError {
    // ============================================================================
    // Question / Response Errors
    // ============================================================================
    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    // ============================================================================
    // Session Errors
    // ============================================================================
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    // ============================================================================
    // Widget Errors
    // ============================================================================
    #[error("No published questions available")]
    NoPublishedQuestions,

    #[error("Invalid widget state: {0}")]
    InvalidWidgetState(String),

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Failed to save to storage: {0}")]
    StorageSaveFailed(String),

    #[error("Failed to load from storage: {0}")]
    StorageLoadFailed(String),

    // ============================================================================
    // Generic/System Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mutex lock error")]
    LockError,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// Implement conversion from PoisonError for Mutex locks
impl<T> From<std::sync::PoisonError<T>> for FeedbackError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        FeedbackError::LockError
    }
}

// UI callers surface errors as toast text
impl From<FeedbackError> for String {
    fn from(error: FeedbackError) -> Self {
        error.to_string()
    }
}

// Helper type alias for Results
pub type FeedbackResult<T> = Result<T, FeedbackError>;
