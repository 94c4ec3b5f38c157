//! Validation of assembled records and decoding of untyped candidates.

use serde_json::Value;
use thiserror::Error;

use super::{EnhancementResult, ModificationResult};

/// Why a candidate record or request body does not satisfy the contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Candidate could not be decoded (wrong JSON type, missing required field, not an object).
    #[error("invalid record: {0}")]
    Decode(String),
    /// A field that must carry text is blank.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    /// One or more request fields are missing or blank.
    #[error("{} must be a non-empty string", .fields.join(", "))]
    InvalidInput { fields: Vec<&'static str> },
}

/// Checks the guaranteed field set of an enhancement record.
pub fn validate_enhancement(result: EnhancementResult) -> Result<EnhancementResult, SchemaError> {
    if result.enhanced_prompt.trim().is_empty() {
        return Err(SchemaError::EmptyField {
            field: "enhancedPrompt",
        });
    }
    let analysis = &result.prompt_analysis;
    if analysis.primary_category.trim().is_empty() {
        return Err(SchemaError::EmptyField {
            field: "promptAnalysis.primaryCategory",
        });
    }
    if analysis
        .secondary_categories
        .iter()
        .any(|c| c.trim().is_empty())
    {
        return Err(SchemaError::EmptyField {
            field: "promptAnalysis.secondaryCategories[]",
        });
    }
    Ok(result)
}

/// Checks the guaranteed field set of a modification record.
pub fn validate_modification(
    result: ModificationResult,
) -> Result<ModificationResult, SchemaError> {
    if result.modified_prompt.trim().is_empty() {
        return Err(SchemaError::EmptyField {
            field: "modifiedPrompt",
        });
    }
    Ok(result)
}

/// Decodes an untyped enhancement candidate, filling optional fields with defaults.
pub fn enhancement_from_value(value: Value) -> Result<EnhancementResult, SchemaError> {
    let result: EnhancementResult =
        serde_json::from_value(value).map_err(|e| SchemaError::Decode(e.to_string()))?;
    validate_enhancement(result)
}

/// Decodes an untyped modification candidate.
pub fn modification_from_value(value: Value) -> Result<ModificationResult, SchemaError> {
    let result: ModificationResult =
        serde_json::from_value(value).map_err(|e| SchemaError::Decode(e.to_string()))?;
    validate_modification(result)
}
