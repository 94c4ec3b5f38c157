//! Modification flow: apply a free-text change request to an enhanced prompt.

use serde_json::Value;
use tracing::{info, warn};

use super::{Failure, PromptService};
use crate::llm::GenerationRequest;
use crate::rate_limit::ClientKey;
use crate::schema::{validate_modification, ModificationResult, ModifyInput, SchemaError};

/// User message sent to the model for a modification.
pub fn compose_modification_message(input: &ModifyInput) -> String {
    format!(
        "ORIGINAL PROMPT:\n{}\n\nCURRENT ENHANCED PROMPT:\n{}\n\nUSER MODIFICATION REQUEST:\n{}\n\nBased on the above, please provide ONLY the refined prompt.",
        input.original_prompt, input.enhanced_prompt, input.modification_request
    )
}

impl PromptService {
    /// Refines `input.enhanced_prompt` per `input.modification_request`. Never fails.
    pub async fn modify(&self, client: &ClientKey, input: ModifyInput) -> ModificationResult {
        self.run_modify(client, Ok(input)).await
    }

    pub async fn modify_json(&self, client: &ClientKey, body: Value) -> ModificationResult {
        self.run_modify(client, ModifyInput::from_value(body)).await
    }

    async fn run_modify(
        &self,
        client: &ClientKey,
        input: Result<ModifyInput, SchemaError>,
    ) -> ModificationResult {
        let request = input
            .as_ref()
            .map(|i| i.modification_request.clone())
            .unwrap_or_default();
        let record = match self.try_modify(client, input).await {
            Ok(record) => {
                info!(client = %client, "prompt modified");
                record
            }
            Err(failure) => {
                warn!(client = %client, kind = failure.kind(), "modification failed");
                failure.into_modification(&request)
            }
        };
        validate_modification(record).unwrap_or_else(|e| {
            warn!(error = %e, "modification record failed validation");
            ModificationResult::new(format!("Error: {e}"))
        })
    }

    async fn try_modify(
        &self,
        client: &ClientKey,
        input: Result<ModifyInput, SchemaError>,
    ) -> Result<ModificationResult, Failure> {
        self.admit(client).await?;
        let input = input?;
        input.validate()?;
        let model = self.models.modify()?;
        let request = GenerationRequest::new(
            self.prompts.modify.as_str(),
            compose_modification_message(&input),
        );
        let text = self.generate_text(model, &request).await?;
        Ok(ModificationResult::new(text.trim()))
    }
}
