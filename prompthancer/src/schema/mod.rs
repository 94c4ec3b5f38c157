//! Structural contract for flow inputs and outputs.
//!
//! Records use camelCase on the wire. Optional fields carry serde defaults so a
//! partially-filled candidate still decodes; required fields (`originalPrompt`,
//! `enhancedPrompt`, `modifiedPrompt`) do not. [`validate`] enforces the
//! guaranteed field set before a record leaves a flow.

mod input;
mod validate;

pub use input::{EnhanceInput, ModifyInput};
pub use validate::{
    enhancement_from_value, modification_from_value, validate_enhancement,
    validate_modification, SchemaError,
};

use serde::{Deserialize, Serialize};

/// Default `primaryCategory` when the model did not provide one.
pub const DEFAULT_PRIMARY_CATEGORY: &str = "General";
/// Default for `intentRecognition` and `enhancementOpportunities`.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Default `enhancementExplanation`.
pub const DEFAULT_EXPLANATION: &str = "No explanation provided or explanation parsing failed.";
/// Enhanced prompt used when a reply has no usable enhanced prompt.
pub const MISSING_ENHANCED_PROMPT: &str =
    "Error: AI failed to generate an enhanced prompt in the expected format.";
/// `primaryCategory` values that mark a failure record.
pub const ERROR_CATEGORIES: [&str; 6] = [
    "Rate Limit Error",
    "Input Error",
    "Configuration Error",
    "API Error - Content Moderation",
    "API Error",
    "Error",
];

fn default_primary_category() -> String {
    DEFAULT_PRIMARY_CATEGORY.to_string()
}

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

fn default_explanation() -> String {
    DEFAULT_EXPLANATION.to_string()
}

/// Classification of the submitted prompt, always embedded in [`EnhancementResult`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnalysis {
    #[serde(default = "default_primary_category")]
    pub primary_category: String,
    /// Empty means "none".
    #[serde(default)]
    pub secondary_categories: Vec<String>,
    #[serde(default = "not_specified")]
    pub intent_recognition: String,
    /// Free text; may contain bullet lines.
    #[serde(default = "not_specified")]
    pub enhancement_opportunities: String,
}

impl Default for PromptAnalysis {
    fn default() -> Self {
        Self {
            primary_category: default_primary_category(),
            secondary_categories: Vec::new(),
            intent_recognition: not_specified(),
            enhancement_opportunities: not_specified(),
        }
    }
}

impl PromptAnalysis {
    /// Analysis with no secondary categories.
    pub fn new(
        primary_category: impl Into<String>,
        intent_recognition: impl Into<String>,
        enhancement_opportunities: impl Into<String>,
    ) -> Self {
        Self {
            primary_category: primary_category.into(),
            secondary_categories: Vec::new(),
            intent_recognition: intent_recognition.into(),
            enhancement_opportunities: enhancement_opportunities.into(),
        }
    }
}

/// Result of the enhancement flow.
///
/// Failures are encoded here too: `primaryCategory` carries the error class (one of
/// [`ERROR_CATEGORIES`]) and `enhancedPrompt` starts with `"Error: "`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementResult {
    pub original_prompt: String,
    #[serde(default)]
    pub prompt_analysis: PromptAnalysis,
    pub enhanced_prompt: String,
    #[serde(default = "default_explanation")]
    pub enhancement_explanation: String,
}

impl EnhancementResult {
    /// True for failure records: an error `primaryCategory`, or a reply whose analysis
    /// parsed but which had no enhanced prompt.
    ///
    /// A real enhanced prompt that happens to start with `"Error:"` is not a failure.
    pub fn is_error(&self) -> bool {
        ERROR_CATEGORIES.contains(&self.prompt_analysis.primary_category.as_str())
            || self.enhanced_prompt == MISSING_ENHANCED_PROMPT
    }
}

/// Result of the modification flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationResult {
    pub modified_prompt: String,
}

impl ModificationResult {
    pub fn new(modified_prompt: impl Into<String>) -> Self {
        Self {
            modified_prompt: modified_prompt.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.modified_prompt.starts_with("Error:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_default_uses_placeholders() {
        let a = PromptAnalysis::default();
        assert_eq!(a.primary_category, "General");
        assert!(a.secondary_categories.is_empty());
        assert_eq!(a.intent_recognition, "Not specified");
        assert_eq!(a.enhancement_opportunities, "Not specified");
    }

    #[test]
    fn enhancement_result_serializes_camel_case() {
        let r = EnhancementResult {
            original_prompt: "p".into(),
            prompt_analysis: PromptAnalysis::default(),
            enhanced_prompt: "e".into(),
            enhancement_explanation: "x".into(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["originalPrompt"], "p");
        assert_eq!(v["promptAnalysis"]["primaryCategory"], "General");
        assert_eq!(v["promptAnalysis"]["secondaryCategories"], serde_json::json!([]));
        assert_eq!(v["enhancedPrompt"], "e");
        assert_eq!(v["enhancementExplanation"], "x");
    }

    fn enhancement(category: &str, enhanced: &str) -> EnhancementResult {
        EnhancementResult {
            original_prompt: "p".into(),
            prompt_analysis: PromptAnalysis::new(category, "i", "o"),
            enhanced_prompt: enhanced.into(),
            enhancement_explanation: "x".into(),
        }
    }

    /// **Scenario**: failure is read from the category, so an enhanced prompt about error
    /// messages is still a success.
    #[test]
    fn enhancement_is_error_keys_on_category() {
        assert!(!enhancement("Code", "Error: handling in Rust should use Result.").is_error());
        assert!(enhancement("Rate Limit Error", "Error: Rate limit exceeded.").is_error());
        assert!(enhancement("Error", "Error: AI response could not be parsed.").is_error());
        assert!(enhancement("General", MISSING_ENHANCED_PROMPT).is_error());
        assert!(!enhancement("General", "Write a haiku about rain.").is_error());
    }

    #[test]
    fn is_error_checks_sentinel_prefix() {
        assert!(ModificationResult::new("Error: AI returned an empty text response.").is_error());
        assert!(!ModificationResult::new("Write a haiku about rain.").is_error());
    }
}
