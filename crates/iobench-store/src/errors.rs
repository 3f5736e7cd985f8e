use std::fmt;

/// Validation failure while constructing a [`crate::model::BenchmarkRun`]
/// or decoding one from its stored row form.
#[derive(Debug)]
pub struct ModelError(pub String);

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ModelError {}
