use thiserror::Error;

use crate::client::GenerationError;

/// A model response that does not have the requested JSON shape.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is not {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },
}

/// Failure of one AI-backed operation.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("invalid model response: {0}")]
    Parse(#[from] ParseError),
}
