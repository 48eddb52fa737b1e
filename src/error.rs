//! Error taxonomy shared by services and screens.
//!
//! Every failure is scoped to the operation that triggered it. The full error
//! (with its source chain) goes to the log; the view only ever sees
//! [`AppError::user_message`].

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const FETCH_FAILED_MESSAGE: &str = "Couldn't load content. Check your connection and try again.";
pub const SAVE_FAILED_MESSAGE: &str = "Couldn't save your changes. Please try again.";
pub const PLAYBACK_FAILED_MESSAGE: &str = "Playback failed. Please try again.";

#[derive(Debug, Error)]
pub enum AppError {
    /// Detected before any fetch is attempted.
    #[error("offline: {0}")]
    Offline(String),

    #[error("fetch failed: {0}")]
    Fetch(#[source] BoxError),

    /// Blocks submission; never reaches the service layer.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("persistence failed: {0}")]
    Persistence(#[source] BoxError),

    #[error("playback failed: {0}")]
    Playback(#[source] BoxError),
}

impl AppError {
    pub fn fetch(err: impl Into<BoxError>) -> Self {
        Self::Fetch(err.into())
    }

    pub fn persistence(err: impl Into<BoxError>) -> Self {
        Self::Persistence(err.into())
    }

    pub fn playback(err: impl Into<BoxError>) -> Self {
        Self::Playback(err.into())
    }

    /// Message safe to show in the UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Offline(message) => message.clone(),
            AppError::Validation(notice) => notice.clone(),
            AppError::Fetch(_) => FETCH_FAILED_MESSAGE.to_string(),
            AppError::Persistence(_) => SAVE_FAILED_MESSAGE.to_string(),
            AppError::Playback(_) => PLAYBACK_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Fetch(_) | AppError::Persistence(_) | AppError::Offline(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_map_to_generic_messages() {
        let err = AppError::fetch("connection reset by peer");
        assert_eq!(err.user_message(), FETCH_FAILED_MESSAGE);
        assert!(!err.user_message().contains("reset"));

        let err = AppError::persistence("disk full");
        assert_eq!(err.user_message(), SAVE_FAILED_MESSAGE);
        assert!(err.is_retryable());
    }

    #[test]
    fn offline_and_validation_show_their_own_text() {
        let err = AppError::Offline("No internet connection".to_string());
        assert_eq!(err.user_message(), "No internet connection");

        let err = AppError::Validation("Name is required".to_string());
        assert_eq!(err.user_message(), "Name is required");
        assert!(!err.is_retryable());
    }

    #[test]
    fn display_keeps_the_source_for_logs() {
        let err = AppError::fetch("HTTP 502");
        assert_eq!(err.to_string(), "fetch failed: HTTP 502");
    }
}
