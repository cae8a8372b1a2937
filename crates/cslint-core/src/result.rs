//! Crate-wide result alias

use crate::error::CslintError;

/// Result type used throughout the analyzer
pub type Result<T> = std::result::Result<T, CslintError>;
