use thiserror::Error;

/// A formula that could not be parsed.
///
/// `column` is 1-based and counts characters, so it can be used directly to
/// place a caret under the entry box text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (column {column})")]
pub struct ParseError {
    pub message: String,
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, column: usize) -> Self {
        Self {
            message: message.into(),
            column,
        }
    }
}

/// A parsed formula that cannot be turned into a numeric function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },

    #[error("`{name}` takes {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("`{name}` has no closed-form derivative")]
    NotDifferentiable { name: String },
}

/// Errors originating from the core mapping engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid grid: {reason}")]
    InvalidGrid { reason: String },

    #[error("invalid slider range: {reason}")]
    InvalidRange { reason: String },
}
