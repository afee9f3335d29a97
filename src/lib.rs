//! Feedback questions, widget responses and the analytics behind the admin
//! dashboard.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

pub mod analytics;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logger;
pub mod models;
pub mod questions;
pub mod repository;
pub mod responses;
pub mod session;
pub mod widget;

pub use analytics::{AnalyticsAggregator, RatingBucket, ResponseSummary, YesNoDistribution};
pub use config::{AppConfig, StoreBackend, WidgetConfig};
pub use error::{FeedbackError, FeedbackResult};
pub use models::{
    Answer, NewQuestion, NewResponse, Question, QuestionPatch, QuestionType, Response, User,
};
pub use questions::QuestionRepository;
pub use responses::ResponseRepository;
pub use session::{SessionStore, StaticCredentialVerifier};
pub use widget::{FeedbackWidget, WidgetState};

use logger::{LogLevel, LOGGER};
use repository::RepositoryFactory;

/// Install the global `tracing` subscriber and set the minimum level of the
/// in-memory `LOGGER`
///
/// Both are process-wide, so this belongs in the binary, not in
/// `FeedbackDesk::new`. `RUST_LOG` wins over `default_level` for `tracing`.
/// Calling this twice is harmless.
pub fn init_tracing(default_level: LogLevel) {
    LOGGER.set_min_level(default_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Everything the dashboard and widget need, wired over shared stores
pub struct FeedbackDesk {
    config: AppConfig,
    questions: QuestionRepository,
    responses: ResponseRepository,
    analytics: AnalyticsAggregator,
    session: SessionStore,
}

impl FeedbackDesk {
    pub fn new(config: AppConfig) -> FeedbackResult<Self> {
        config.validate()?;

        let (question_store, response_store, kv_store) = RepositoryFactory::create_all(&config)?;
        let verifier = Arc::new(StaticCredentialVerifier::new(config.admin.clone()));

        let desk = Self {
            questions: QuestionRepository::new(question_store.clone()),
            responses: ResponseRepository::new(response_store.clone(), question_store.clone()),
            analytics: AnalyticsAggregator::new(response_store, question_store),
            session: SessionStore::new(kv_store, verifier),
            config,
        };

        app_log!(
            LogLevel::Info,
            "Feedback desk ready (fixtures: {})",
            desk.config.seed_fixtures
        );
        Ok(desk)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn questions(&self) -> &QuestionRepository {
        &self.questions
    }

    pub fn responses(&self) -> &ResponseRepository {
        &self.responses
    }

    pub fn analytics(&self) -> &AnalyticsAggregator {
        &self.analytics
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// A fresh widget instance sharing this desk's collections
    pub fn widget(&self) -> FeedbackWidget {
        FeedbackWidget::new(
            self.config.widget.clone(),
            self.questions.clone(),
            self.responses.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        AppConfig {
            store: StoreBackend::Memory,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_desk_shares_collections() {
        let desk = FeedbackDesk::new(memory_config()).unwrap();

        let mut widget = desk.widget();
        widget.open().unwrap();
        widget.submit(Answer::Rating(1)).unwrap();

        assert_eq!(desk.responses().list_all().unwrap().len(), 4);
        assert_eq!(desk.analytics().compute_summary().unwrap().total_responses, 4);
    }

    #[test]
    fn test_desk_leaves_global_log_level_alone() {
        let before = LOGGER.min_level();
        let config = AppConfig {
            log_level: if before == LogLevel::Error { "debug" } else { "error" }.to_string(),
            ..memory_config()
        };

        let _desk = FeedbackDesk::new(config).unwrap();
        assert_eq!(LOGGER.min_level(), before);
    }

    #[test]
    fn test_desk_rejects_invalid_config() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..memory_config()
        };
        assert!(matches!(
            FeedbackDesk::new(config),
            Err(FeedbackError::ConfigError(_))
        ));
    }
}
