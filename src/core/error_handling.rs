//! Generic error handling utilities
//!
//! Provides one way to report a fatal error regardless of which layer
//! produced it, while keeping user-facing output short.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if the error carries a message the user can act on
    /// directly (bad arguments, invalid configuration values, bad dates)
    ///
    /// IO failures and logger setup failures are system errors.
    fn is_user_actionable(&self) -> bool;

    /// The specific message to show for user-actionable errors
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors show their own message; system errors show the
/// operation context. Full details are always available at debug level.
///
/// # Examples
/// ```rust,no_run
/// # use streamring::core::error_handling::log_error_with_context;
/// # use streamring::app::cli::config::ConfigError;
/// # use streamring::app::error::AppError;
/// let err = AppError::from(ConfigError::Invalid {
///     message: "batch size must be greater than 0".to_string(),
/// });
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "FATAL: batch size must be greater than 0"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Text to print on stderr for a fatal error
///
/// Used before the logger is up, when nothing would reach a log sink.
pub fn fatal_message<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => format!("Error: {}", user_msg),
        _ => format!("Error: {}: {}", operation_context, error),
    }
}
