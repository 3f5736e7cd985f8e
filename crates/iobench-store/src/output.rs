use crate::errors::ModelError;
use serde::{Deserialize, Serialize};

/// Parsed output of one benchmark-tool invocation.
///
/// The payload's internal schema belongs to the benchmark tool, not to this
/// crate: the store round-trips it through its canonical JSON form and never
/// inspects individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IorOutput(serde_json::Value);

impl IorOutput {
    /// Decode from the canonical JSON text form.
    pub fn from_canonical_json(text: &str) -> Result<Self, ModelError> {
        let value = serde_json::from_str(text)
            .map_err(|e| ModelError(format!("invalid ior_output JSON: {}", e)))?;
        Ok(Self(value))
    }

    /// Encode to the canonical JSON text form.
    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(&self.0)
            .map_err(|e| ModelError(format!("failed to encode ior_output: {}", e)))
    }
}

impl From<serde_json::Value> for IorOutput {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
