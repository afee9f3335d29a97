//! Admin session store
//!
//! Holds one authenticated-user slot, mirrored into a durable key-value
//! store so a session survives a restart. Credential checks go through a
//! [`CredentialVerifier`].

use std::sync::{Arc, Mutex};

use crate::app_log;
use crate::config::AdminCredentials;
use crate::error::{FeedbackError, FeedbackResult};
use crate::logger::LogLevel;
use crate::models::User;
use crate::repository::{CredentialVerifier, KeyValueStore};

/// Key under which the signed-in user is persisted
pub const SESSION_USER_KEY: &str = "user";

/// Accepts exactly one configured email/password pair
pub struct StaticCredentialVerifier {
    credentials: AdminCredentials,
}

impl StaticCredentialVerifier {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self { credentials }
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify(&self, email: &str, password: &str) -> Option<User> {
        (email == self.credentials.email && password == self.credentials.password)
            .then(|| self.credentials.user.clone())
    }
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    verifier: Arc<dyn CredentialVerifier>,
    current_user: Mutex<Option<User>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            storage,
            verifier,
            current_user: Mutex::new(None),
        }
    }

    /// Sign in and persist the user record
    ///
    /// # Errors
    /// `InvalidCredentials` when the verifier rejects the pair
    pub fn login(&self, email: &str, password: &str) -> FeedbackResult<User> {
        let Some(user) = self.verifier.verify(email, password) else {
            app_log!(LogLevel::Warn, "Rejected login for {}", email);
            return Err(FeedbackError::InvalidCredentials);
        };

        self.storage
            .set(SESSION_USER_KEY, serde_json::to_value(&user)?)?;
        *self.current_user.lock()? = Some(user.clone());

        app_log!(LogLevel::Info, "User {} signed in", user.email);
        Ok(user)
    }

    /// Clear the session, in memory and in storage
    pub fn logout(&self) -> FeedbackResult<()> {
        self.storage.delete(SESSION_USER_KEY)?;
        if let Some(user) = self.current_user.lock()?.take() {
            app_log!(LogLevel::Info, "User {} signed out", user.email);
        }
        Ok(())
    }

    /// Restore the session from storage
    ///
    /// Returns `None` when nothing is stored. A stored record that no longer
    /// parses is discarded.
    pub fn check_auth(&self) -> FeedbackResult<Option<User>> {
        let Some(value) = self.storage.get(SESSION_USER_KEY)? else {
            *self.current_user.lock()? = None;
            return Ok(None);
        };

        match serde_json::from_value::<User>(value) {
            Ok(user) => {
                *self.current_user.lock()? = Some(user.clone());
                Ok(Some(user))
            }
            Err(e) => {
                app_log!(LogLevel::Warn, "Discarding unreadable session record: {}", e);
                self.storage.delete(SESSION_USER_KEY)?;
                *self.current_user.lock()? = None;
                Ok(None)
            }
        }
    }

    /// The user held in memory, without touching storage
    pub fn current_user(&self) -> FeedbackResult<Option<User>> {
        Ok(self.current_user.lock()?.clone())
    }

    pub fn is_authenticated(&self) -> FeedbackResult<bool> {
        Ok(self.current_user.lock()?.is_some())
    }

    /// Guard for admin-only operations
    pub fn require_auth(&self) -> FeedbackResult<User> {
        self.current_user()?.ok_or(FeedbackError::NotAuthenticated)
    }
}
