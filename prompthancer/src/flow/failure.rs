//! Flow failures and their rendering as result records.
//!
//! Nothing escapes a flow as an error: each [`Failure`] becomes an
//! [`EnhancementResult`] or [`ModificationResult`] whose prompt field starts
//! with `"Error: "`.

use crate::llm::ModelError;
use crate::schema::{EnhancementResult, ModificationResult, PromptAnalysis, SchemaError};

/// Why a flow could not produce a model-derived result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// `message` is the limiter's text, e.g. "Rate limit exceeded. Try again in 12 seconds."
    RateLimited { message: String },
    InvalidInput { reason: String },
    MissingCredential { variable: String },
    Blocked { reason: String },
    EmptyResponse,
    Malformed { detail: String },
    ApiError { message: String },
}

impl From<SchemaError> for Failure {
    fn from(e: SchemaError) -> Self {
        Failure::InvalidInput {
            reason: e.to_string(),
        }
    }
}

impl From<ModelError> for Failure {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Malformed(detail) => Failure::Malformed { detail },
            other => Failure::ApiError {
                message: other.to_string(),
            },
        }
    }
}

impl Failure {
    /// Short class name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::RateLimited { .. } => "rate_limited",
            Failure::InvalidInput { .. } => "invalid_input",
            Failure::MissingCredential { .. } => "missing_credential",
            Failure::Blocked { .. } => "blocked",
            Failure::EmptyResponse => "empty_response",
            Failure::Malformed { .. } => "malformed_response",
            Failure::ApiError { .. } => "api_error",
        }
    }

    /// Enhancement-flow record for this failure.
    pub fn into_enhancement(self, original_prompt: &str) -> EnhancementResult {
        let (primary, intent, opportunities, enhanced, explanation) = match self {
            Failure::RateLimited { message } => (
                "Rate Limit Error",
                "Too Many Requests",
                message.clone(),
                format!("Error: {message}"),
                "Too many requests were made in a short period. Please wait before trying again."
                    .to_string(),
            ),
            Failure::InvalidInput { reason } => (
                "Input Error",
                "Invalid Input",
                reason.clone(),
                format!("Error: Invalid input. {reason}."),
                "The request did not contain a valid prompt to enhance.".to_string(),
            ),
            Failure::MissingCredential { variable } => (
                "Configuration Error",
                "API Key Missing",
                format!("{variable} is not set in the environment."),
                "Error: Application configuration issue. API key not found.".to_string(),
                format!("The {variable} environment variable must be set for the application to function."),
            ),
            Failure::Blocked { reason } => (
                "API Error - Content Moderation",
                "Content Blocked",
                format!("The prompt was blocked by the AI provider's content policy ({reason})."),
                format!("Error: AI response blocked due to content policy ({reason}). Please revise your prompt."),
                "The AI service declined to process this prompt for content-policy reasons."
                    .to_string(),
            ),
            Failure::EmptyResponse => (
                "API Error",
                "Empty Response",
                "The AI returned an empty response.".to_string(),
                "Error: AI returned an empty response.".to_string(),
                "The AI service did not provide any content for the prompt.".to_string(),
            ),
            Failure::Malformed { detail } => (
                "API Error",
                "Malformed Response",
                format!("The AI returned a response that could not be read: {detail}"),
                "Error: AI returned an empty or malformed response.".to_string(),
                "The AI service response did not have the expected shape.".to_string(),
            ),
            Failure::ApiError { message } => (
                "API Error",
                "API Call Failed",
                format!("Failed to get response from AI: {message}"),
                format!("Error: Could not enhance prompt due to an API error. {message}"),
                format!("The AI service encountered an error: {message}"),
            ),
        };
        EnhancementResult {
            original_prompt: original_prompt.to_string(),
            prompt_analysis: PromptAnalysis::new(primary, intent, opportunities),
            enhanced_prompt: enhanced,
            enhancement_explanation: explanation,
        }
    }

    /// Modification-flow record for this failure; `request` is the user's modification request.
    pub fn into_modification(self, request: &str) -> ModificationResult {
        let text = match self {
            Failure::RateLimited { message } => format!("Error: {message}"),
            Failure::InvalidInput { reason } => format!("Error: Invalid input. {reason}."),
            Failure::MissingCredential { .. } => format!(
                "Error: Application configuration issue. API key not found. Original request: {request}"
            ),
            Failure::Blocked { reason } => format!(
                "Error: AI response blocked due to content policy ({reason}) for modification request: \"{request}\". Please revise your modification request."
            ),
            Failure::EmptyResponse => format!(
                "Error: AI returned an empty text response for modification. Original request: {request}"
            ),
            Failure::Malformed { .. } => format!(
                "Error: AI returned an empty or malformed response for modification. Original request: {request}"
            ),
            Failure::ApiError { message } => format!(
                "Error: Could not modify prompt due to an API error. {message}. Original request: {request}"
            ),
        };
        ModificationResult::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate_enhancement, validate_modification};

    fn all() -> Vec<Failure> {
        vec![
            Failure::RateLimited {
                message: "Rate limit exceeded. Try again in 3 seconds.".into(),
            },
            Failure::InvalidInput {
                reason: "originalPrompt must be a non-empty string".into(),
            },
            Failure::MissingCredential {
                variable: "GEMINI_API_KEY".into(),
            },
            Failure::Blocked {
                reason: "SAFETY".into(),
            },
            Failure::EmptyResponse,
            Failure::Malformed {
                detail: "no candidates".into(),
            },
            Failure::ApiError {
                message: "provider returned 500: boom".into(),
            },
        ]
    }

    #[test]
    fn every_failure_renders_valid_error_records() {
        for f in all() {
            let e = f.clone().into_enhancement("p");
            assert!(e.is_error(), "{:?}", f);
            assert_eq!(e.original_prompt, "p");
            assert!(validate_enhancement(e).is_ok());
            let m = f.into_modification("shorter");
            assert!(m.is_error());
            assert!(validate_modification(m).is_ok());
        }
    }

    #[test]
    fn configuration_error_names_variable() {
        let e = Failure::MissingCredential {
            variable: "GEMINI_API_KEY".into(),
        }
        .into_enhancement("p");
        assert_eq!(e.prompt_analysis.primary_category, "Configuration Error");
        assert_eq!(e.prompt_analysis.intent_recognition, "API Key Missing");
        assert_eq!(
            e.enhanced_prompt,
            "Error: Application configuration issue. API key not found."
        );
        assert!(e.prompt_analysis.enhancement_opportunities.contains("GEMINI_API_KEY"));
        assert!(e.enhancement_explanation.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn modification_block_quotes_request() {
        let m = Failure::Blocked {
            reason: "SAFETY".into(),
        }
        .into_modification("make it gory");
        assert_eq!(
            m.modified_prompt,
            "Error: AI response blocked due to content policy (SAFETY) for modification request: \"make it gory\". Please revise your modification request."
        );
    }

    #[test]
    fn model_error_conversion() {
        assert!(matches!(
            Failure::from(ModelError::Malformed("x".into())),
            Failure::Malformed { .. }
        ));
        assert_eq!(
            Failure::from(ModelError::Transport("reset".into())),
            Failure::ApiError {
                message: "request failed: reset".into()
            }
        );
    }
}
