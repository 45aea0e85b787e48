//! Application Error Types

use crate::app::cli::config::ConfigError;
use crate::core::date_parser::DateParseError;
use crate::core::error_handling::ContextualError;
use crate::core::logging::LoggingError;
use crate::core::query::QueryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Invalid {flag} value: {source}")]
    InvalidDate {
        flag: &'static str,
        #[source]
        source: DateParseError,
    },

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("Failed to open input {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream processing failed: {0}")]
    Stream(#[from] std::io::Error),
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(ConfigError::Read { .. }) => false,
            AppError::Config(_) => true,
            AppError::Query(_) => true,
            AppError::InvalidDate { .. } => true,
            AppError::Input { .. } => true,
            AppError::Logging(_) | AppError::Stream(_) => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        if self.is_user_actionable() {
            Some(self.to_string())
        } else {
            None
        }
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_names_the_flag() {
        let err = AppError::InvalidDate {
            flag: "--since",
            source: DateParseError::UnknownUnit {
                unit: "aeons".to_string(),
            },
        };

        assert!(err.is_user_actionable());
        assert_eq!(
            err.user_message().as_deref(),
            Some("Invalid --since value: Unknown time unit: 'aeons'")
        );
    }

    #[test]
    fn test_stream_errors_are_system_errors() {
        let err = AppError::from(std::io::Error::other("pipe closed"));
        assert!(!err.is_user_actionable());
        assert_eq!(err.user_message(), None);
    }

    #[test]
    fn test_config_validation_is_user_actionable() {
        let err = AppError::from(ConfigError::Invalid {
            message: "batch size must be greater than 0".to_string(),
        });
        assert_eq!(
            err.user_message().as_deref(),
            Some("batch size must be greater than 0")
        );
    }
}
