use crate::config::IntakeConfig;
use crate::pipeline::llm::{sanitize_llm_output, LlmClient, LlmError, OllamaClient};

use super::error::IntakeError;
use super::parser::parse_extraction_response;
use super::prompt::{render_prompt, INTAKE_SYSTEM_PROMPT};
use super::traits::NarrativeExtractionService;
use super::types::{ExtractionRequest, ExtractionResult};

/// Narrative extraction backed by a local LLM:
/// prompt → LLM → sanitize → lenient parse. One call per turn, no retries.
pub struct OllamaExtractionService {
    llm: Box<dyn LlmClient>,
    model_name: String,
}

impl OllamaExtractionService {
    pub fn new(llm: Box<dyn LlmClient>, model_name: &str) -> Self {
        Self {
            llm,
            model_name: model_name.to_string(),
        }
    }

    /// Service talking to the Ollama instance described by `config`.
    pub fn from_config(config: &IntakeConfig) -> Self {
        Self::new(
            Box::new(OllamaClient::new(&config.ollama_url, config.timeout_secs)),
            &config.model_name,
        )
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Fails when Ollama is unreachable or the configured model is not pulled.
    pub fn ensure_ready(&self) -> Result<(), IntakeError> {
        if self.llm.is_model_available(&self.model_name)? {
            Ok(())
        } else {
            Err(LlmError::NoModelAvailable.into())
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ensure_ready().is_ok()
    }
}

impl NarrativeExtractionService for OllamaExtractionService {
    fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult, IntakeError> {
        let prompt = render_prompt(request);
        let start = std::time::Instant::now();

        let raw = self
            .llm
            .generate(&self.model_name, &prompt, INTAKE_SYSTEM_PROMPT)?;

        tracing::debug!(
            model = %self.model_name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            response_len = raw.len(),
            "Extraction LLM call finished"
        );

        parse_extraction_response(&sanitize_llm_output(&raw))
    }
}
