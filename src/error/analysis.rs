// Analysis error types and constants

use crate::error::ErrorCode;
use std::fmt;
use tracing::error;

/// Analysis error code constants
///
/// Error code range: 3001-3002
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Malformed or insufficient arguments
    pub const INVALID_INPUT: i32 = 3001;

    /// Total magnitude was zero where a weighted mean was required
    pub const DIVISION_BY_ZERO: i32 = 3002;
}

/// Log an analysis error with structured context
///
/// Logs the numeric code alongside the message so log scrapers can
/// aggregate failures without parsing free text.
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=FeatureExtractor, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised by the feature extraction core
///
/// `InvalidInput` is structural (empty buffer, mismatched lengths, parameters
/// out of range). `DivisionByZero` marks input that is structurally valid but
/// numerically degenerate, such as an all-silent magnitude spectrum.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Malformed or insufficient arguments
    InvalidInput { reason: String },

    /// Total magnitude was zero in a magnitude-weighted computation
    DivisionByZero { operation: String },
}

impl AnalysisError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn division_by_zero(operation: impl Into<String>) -> Self {
        AnalysisError::DivisionByZero {
            operation: operation.into(),
        }
    }
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::InvalidInput { .. } => AnalysisErrorCodes::INVALID_INPUT,
            AnalysisError::DivisionByZero { .. } => AnalysisErrorCodes::DIVISION_BY_ZERO,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::InvalidInput { reason } => format!("Invalid input: {}", reason),
            AnalysisError::DivisionByZero { operation } => {
                format!("Division by zero in {}: total magnitude is 0", operation)
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{} (code {}): {}",
            match self {
                AnalysisError::InvalidInput { .. } => "InvalidInput",
                AnalysisError::DivisionByZero { .. } => "DivisionByZero",
            },
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {}
