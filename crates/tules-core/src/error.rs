//! Core error types for tules-core.
//!
//! Each concern gets its own thiserror enum; `CoreError` aggregates them so
//! callers that don't care about the source can use `?` across modules.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tules-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Access token exchange errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration. The in-memory value was still updated.
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors from the access token exchange.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Client id or secret missing from the store
    #[error("Credentials not configured for {service}")]
    CredentialsNotConfigured { service: String },

    /// Token endpoint answered with an error
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from presenting a notification.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors from parsing or registering a shortcut.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    /// Accelerator string is empty or malformed
    #[error("Invalid accelerator '{combo}': {message}")]
    InvalidAccelerator { combo: String, message: String },

    /// Backend refused the registration
    #[error("Failed to register '{combo}': {message}")]
    RegistrationFailed { combo: String, message: String },

    /// No global hotkey service on this desktop
    #[error("Global shortcuts unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
