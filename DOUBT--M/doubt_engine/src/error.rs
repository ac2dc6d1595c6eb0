use thiserror::Error;

/// Errors surfaced by the doubt engine.
///
/// Only two things are ever rejected: an unusable statement and invalid options.
/// Anything else the engine does not recognize degrades to a fallback instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DoubtError {
    /// The statement (or study topic) was empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Options failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}
