//! Enhancement flow: user prompt in, structured [`EnhancementResult`] out.

use serde_json::Value;
use tracing::{info, warn};

use super::{Failure, PromptService};
use crate::llm::GenerationRequest;
use crate::rate_limit::ClientKey;
use crate::schema::{validate_enhancement, EnhanceInput, EnhancementResult, SchemaError};

impl PromptService {
    /// Enhances `input.original_prompt` for `client`. Never fails; errors are encoded in the record.
    pub async fn enhance(&self, client: &ClientKey, input: EnhanceInput) -> EnhancementResult {
        self.run_enhance(client, Ok(input)).await
    }

    /// Like [`enhance`](Self::enhance), decoding the request body first.
    ///
    /// An undecodable body is reported as an input error after the rate check.
    pub async fn enhance_json(&self, client: &ClientKey, body: Value) -> EnhancementResult {
        self.run_enhance(client, EnhanceInput::from_value(body)).await
    }

    async fn run_enhance(
        &self,
        client: &ClientKey,
        input: Result<EnhanceInput, SchemaError>,
    ) -> EnhancementResult {
        let original = input
            .as_ref()
            .map(|i| i.original_prompt.clone())
            .unwrap_or_default();
        let record = match self.try_enhance(client, input).await {
            Ok(record) => {
                info!(client = %client, category = %record.prompt_analysis.primary_category, "prompt enhanced");
                record
            }
            Err(failure) => {
                warn!(client = %client, kind = failure.kind(), "enhancement failed");
                failure.into_enhancement(&original)
            }
        };
        validate_enhancement(record).unwrap_or_else(|e| {
            warn!(error = %e, "enhancement record failed validation");
            crate::parse::parse_failure_record("", &original, &e.to_string())
        })
    }

    async fn try_enhance(
        &self,
        client: &ClientKey,
        input: Result<EnhanceInput, SchemaError>,
    ) -> Result<EnhancementResult, Failure> {
        self.admit(client).await?;
        let input = input?;
        input.validate()?;
        let model = self.models.enhance()?;
        let request = GenerationRequest::new(self.prompts.enhance.as_str(), input.original_prompt.as_str());
        let text = self.generate_text(model, &request).await?;
        Ok(self.parser.parse(&text, &input.original_prompt))
    }
}
