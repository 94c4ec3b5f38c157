//! Request bodies for the two flows.
//!
//! Missing fields decode as empty strings so that [`EnhanceInput::validate`] and
//! [`ModifyInput::validate`] can report them by name; a field of the wrong JSON
//! type fails decoding instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SchemaError;

/// Input of the enhancement flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceInput {
    #[serde(default)]
    pub original_prompt: String,
}

impl EnhanceInput {
    pub fn new(original_prompt: impl Into<String>) -> Self {
        Self {
            original_prompt: original_prompt.into(),
        }
    }

    /// Decodes a request body.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        serde_json::from_value(value).map_err(|e| SchemaError::Decode(e.to_string()))
    }

    /// `originalPrompt` must be a non-blank string.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.original_prompt.trim().is_empty() {
            return Err(SchemaError::InvalidInput {
                fields: vec!["originalPrompt"],
            });
        }
        Ok(())
    }
}

/// Input of the modification flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyInput {
    #[serde(default)]
    pub original_prompt: String,
    #[serde(default)]
    pub enhanced_prompt: String,
    #[serde(default)]
    pub modification_request: String,
}

impl ModifyInput {
    pub fn new(
        original_prompt: impl Into<String>,
        enhanced_prompt: impl Into<String>,
        modification_request: impl Into<String>,
    ) -> Self {
        Self {
            original_prompt: original_prompt.into(),
            enhanced_prompt: enhanced_prompt.into(),
            modification_request: modification_request.into(),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        serde_json::from_value(value).map_err(|e| SchemaError::Decode(e.to_string()))
    }

    /// All three fields must be non-blank strings; every offending field is reported.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let fields: Vec<&'static str> = [
            ("originalPrompt", &self.original_prompt),
            ("enhancedPrompt", &self.enhanced_prompt),
            ("modificationRequest", &self.modification_request),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::InvalidInput { fields })
        }
    }
}
