//! Error types for analyzer operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for analyzer operations
#[derive(Debug, Error)]
pub enum CslintError {
    /// Lexer or parser failures that prevent building a usable tree
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rule execution errors
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fix computation or application errors
    #[error("Fix error: {message}")]
    FixError { message: String },

    /// Cooperative cancellation was observed mid-pass
    #[error("Analysis cancelled")]
    Cancelled,

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Rule,
    Io,
    Fix,
    Cancelled,
    Internal,
}

impl CslintError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CslintError::ParseError { .. } => ErrorKind::Parse,
            CslintError::ConfigError { .. } => ErrorKind::Config,
            CslintError::RuleError { .. } => ErrorKind::Rule,
            CslintError::IoError { .. } => ErrorKind::Io,
            CslintError::FixError { .. } => ErrorKind::Fix,
            CslintError::Cancelled => ErrorKind::Cancelled,
            CslintError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if processing of other files can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Rule | ErrorKind::Io)
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn fix_error(message: impl Into<String>) -> Self {
        Self::FixError {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
