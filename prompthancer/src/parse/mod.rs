//! Turns a free-text model reply into a validated [`EnhancementResult`].
//!
//! Parsing runs in tiers:
//!
//! 1. **Labeled extraction**: spans after the four section markers (see [`sections`]).
//! 2. **Analysis sub-fields**: label lines inside the analysis span (see [`analysis`]).
//! 3. **Unstructured fallback**: a short reply with no markers at all is taken
//!    as the enhanced prompt itself.
//! 4. **Final defaulting and validation**: fill what is still missing, validate,
//!    and replace anything invalid with a synthetic error record.
//!
//! [`ResponseParser::parse`] is total and pure: the same input always yields the same record.

mod analysis;
mod sections;

pub use analysis::{parse_analysis, split_categories};
pub use sections::{section_content, split_sections, Section};

use tracing::{debug, warn};

use crate::schema::{validate_enhancement, EnhancementResult, PromptAnalysis, DEFAULT_EXPLANATION};
pub use crate::schema::MISSING_ENHANCED_PROMPT;

pub const ORIGINAL_PROMPT_MARKER: &str = "ORIGINAL PROMPT:";
pub const PROMPT_ANALYSIS_MARKER: &str = "PROMPT ANALYSIS:";
pub const ENHANCED_PROMPT_MARKER: &str = "ENHANCED PROMPT:";
pub const ENHANCEMENT_EXPLANATION_MARKER: &str = "ENHANCEMENT EXPLANATION:";

/// All section markers, in canonical order.
pub const SECTION_MARKERS: [&str; 4] = [
    ORIGINAL_PROMPT_MARKER,
    PROMPT_ANALYSIS_MARKER,
    ENHANCED_PROMPT_MARKER,
    ENHANCEMENT_EXPLANATION_MARKER,
];

/// Markers that may leak into the analysis span.
const NON_ANALYSIS_MARKERS: [&str; 3] = [
    ORIGINAL_PROMPT_MARKER,
    ENHANCED_PROMPT_MARKER,
    ENHANCEMENT_EXPLANATION_MARKER,
];

pub const MINIMAL_RESPONSE_EXPLANATION: &str =
    "AI response format was minimal; direct enhancement assumed.";
pub const DIRECT_RESPONSE_EXPLANATION: &str =
    "AI provided a direct response instead of a fully structured enhancement.";

/// How many characters of the raw reply are echoed in the parse-failure record.
const ERROR_ECHO_CHARS: usize = 500;

/// Length limits for accepting an unstructured reply as the enhanced prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FallbackLimits {
    /// Multiplier applied to the original prompt length (characters).
    pub prompt_multiplier: usize,
    /// Flat allowance added to the multiplied length.
    pub allowance_chars: usize,
    /// Upper bound for a marker-free reply used when no enhanced prompt was found.
    pub direct_reply_max_chars: usize,
}

impl Default for FallbackLimits {
    fn default() -> Self {
        Self {
            prompt_multiplier: 2,
            allowance_chars: 400,
            direct_reply_max_chars: 1000,
        }
    }
}

impl FallbackLimits {
    /// Maximum (exclusive) length of a reply accepted by the unstructured fallback.
    pub fn ceiling(&self, original_prompt: &str) -> usize {
        self.prompt_multiplier
            .saturating_mul(original_prompt.chars().count())
            .saturating_add(self.allowance_chars)
    }
}

/// Parser for enhancement replies.
#[derive(Clone, Debug, Default)]
pub struct ResponseParser {
    limits: FallbackLimits,
}

impl ResponseParser {
    pub fn new(limits: FallbackLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &FallbackLimits {
        &self.limits
    }

    /// Parses `raw` into a schema-valid record that echoes `original_prompt`.
    pub fn parse(&self, raw: &str, original_prompt: &str) -> EnhancementResult {
        let spans = split_sections(raw, &SECTION_MARKERS);
        let mut analysis = section_content(&spans, PROMPT_ANALYSIS_MARKER)
            .map(|span| parse_analysis(span, &NON_ANALYSIS_MARKERS));
        let mut enhanced = section_content(&spans, ENHANCED_PROMPT_MARKER)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let mut explanation = section_content(&spans, ENHANCEMENT_EXPLANATION_MARKER)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let has_markers = !spans.is_empty();
        let trimmed = raw.trim();
        let reply_chars = trimmed.chars().count();

        if !has_markers
            && !trimmed.is_empty()
            && reply_chars < self.limits.ceiling(original_prompt)
        {
            debug!(reply_chars, "unstructured reply accepted as enhanced prompt");
            analysis = Some(PromptAnalysis::new(
                "Other",
                "Unknown",
                "N/A (Minimal AI Response)",
            ));
            enhanced = Some(trimmed.to_string());
            explanation = Some(MINIMAL_RESPONSE_EXPLANATION.to_string());
        }

        let enhanced_prompt = match enhanced {
            Some(text) => text,
            None if !has_markers
                && !trimmed.is_empty()
                && reply_chars < self.limits.direct_reply_max_chars =>
            {
                debug!(reply_chars, "direct reply used as enhanced prompt");
                explanation.get_or_insert_with(|| DIRECT_RESPONSE_EXPLANATION.to_string());
                trimmed.to_string()
            }
            None => {
                warn!(reply_chars, "no enhanced prompt found in model reply");
                MISSING_ENHANCED_PROMPT.to_string()
            }
        };

        let candidate = EnhancementResult {
            original_prompt: original_prompt.to_string(),
            prompt_analysis: analysis.unwrap_or_default(),
            enhanced_prompt,
            enhancement_explanation: explanation.unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
        };

        validate_enhancement(candidate).unwrap_or_else(|e| {
            warn!(error = %e, "parsed record failed validation");
            parse_failure_record(raw, original_prompt, &e.to_string())
        })
    }
}

/// Synthetic record returned when the assembled result does not validate.
pub fn parse_failure_record(raw: &str, original_prompt: &str, reason: &str) -> EnhancementResult {
    let echoed: String = raw.chars().take(ERROR_ECHO_CHARS).collect();
    EnhancementResult {
        original_prompt: original_prompt.to_string(),
        prompt_analysis: PromptAnalysis::new(
            "Error",
            "Parsing Failed",
            format!("AI response did not match the expected format. Parser error: {reason}"),
        ),
        enhanced_prompt: format!("Error: AI response could not be parsed. Original response: {echoed}..."),
        enhancement_explanation: format!("Parsing failed. Details: {reason}"),
    }
}
