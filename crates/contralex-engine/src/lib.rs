//! Analysis coordinator: AI-preferred analysis with a rule-based fallback.

pub mod coordinator;

pub use coordinator::{AiBackend, Coordinator};

use contralex_ai::{GeminiClient, GenerationError, Orchestrator};
use contralex_core::{AnalysisConfig, AnalysisMode, ConfigError};
use thiserror::Error;
use tracing::{info, warn};

/// Coordinator wired to the Gemini client.
pub type GeminiCoordinator = Coordinator<Orchestrator<GeminiClient>>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot build Gemini client: {0}")]
    Client(#[from] GenerationError),
}

/// Validate `config` and build the full Gemini-backed stack.
pub fn gemini_coordinator(config: AnalysisConfig) -> Result<GeminiCoordinator, EngineError> {
    config.validate()?;

    let mode = config.mode();
    if mode == AnalysisMode::AiPreferred && config.api_key.is_empty() {
        warn!("AI enabled but no Gemini API key set; AI calls will return placeholder results");
    }
    info!(mode = ?mode, model = %config.model, "analysis engine ready");

    let client = GeminiClient::new(&config)?;
    let orchestrator = Orchestrator::new(client, &config);
    Ok(Coordinator::new(config, orchestrator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let coordinator = gemini_coordinator(AnalysisConfig::default()).unwrap();
        assert_eq!(coordinator.mode(), AnalysisMode::AiPreferred);
        assert_eq!(coordinator.ai().max_contract_length(), 30_000);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = AnalysisConfig {
            temperature: 5.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            gemini_coordinator(config),
            Err(EngineError::Config(_))
        ));
    }

    #[tokio::test]
    async fn missing_key_degrades_to_fallback_data() {
        let config = AnalysisConfig {
            api_key: String::new(),
            ..AnalysisConfig::default()
        };
        let coordinator = gemini_coordinator(config).unwrap();
        let answers = coordinator
            .answer_questions("La vigencia es de un año.", "¿plazo?")
            .await;
        assert!(answers.answer().contains("no pude procesar"));

        // The placeholder analysis comes back, not the rule-based one.
        let result = coordinator.analyze("Contrato de arrendamiento.").await;
        assert_eq!(result.contract_type, contralex_ai::orchestrator::FALLBACK_TYPE);
    }
}
