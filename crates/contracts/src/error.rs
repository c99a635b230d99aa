//! Layered error definitions
//!
//! Categorized by source: config / feed / subscriber

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Feed Errors =====
    /// Malformed feed line
    #[error("feed parse error at line {line}: {message}")]
    FeedParse { line: usize, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create feed parse error
    pub fn feed_parse(line: usize, message: impl Into<String>) -> Self {
        Self::FeedParse {
            line,
            message: message.into(),
        }
    }
}

/// Fault raised by a subscriber callback
#[derive(Debug, Error)]
pub enum SubscriberError {
    /// Subscriber refused the payload
    #[error("subscriber rejected payload: {0}")]
    Rejected(String),

    /// IO error while handling the payload
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SubscriberError {
    /// Create a rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}
