//! Mode selection and the outer fallback layer.

use async_trait::async_trait;
use contralex_ai::{AiError, Orchestrator, TextGenerator};
use contralex_core::{AnalysisConfig, AnalysisMode, AnalysisResult, AnswerSet};
use contralex_rules::RuleAnalyzer;
use tracing::{debug, warn};

pub const SUMMARY_UNAVAILABLE: &str = "Resumen no disponible.";
pub const SUMMARY_AI_DISABLED: &str = "Resumen no disponible (IA deshabilitada)";

/// The generative side of the coordinator.
///
/// An `Err` from any method sends the coordinator down the rule-based path.
#[async_trait]
pub trait AiBackend: Send + Sync {
    async fn analyze_contract(&self, text: &str) -> Result<AnalysisResult, AiError>;

    async fn answer_question(&self, text: &str, question: &str) -> Result<AnswerSet, AiError>;

    async fn detect_contract_type(&self, text: &str) -> Result<String, AiError>;

    async fn generate_summary(&self, text: &str) -> Result<String, AiError>;
}

/// The orchestrator answers through its safety-net layer, which absorbs
/// failures into fallback data, so it never reports `Err` here.
#[async_trait]
impl<G: TextGenerator> AiBackend for Orchestrator<G> {
    async fn analyze_contract(&self, text: &str) -> Result<AnalysisResult, AiError> {
        Ok(Orchestrator::analyze_contract(self, text).await)
    }

    async fn answer_question(&self, text: &str, question: &str) -> Result<AnswerSet, AiError> {
        Ok(Orchestrator::answer_question(self, text, question).await)
    }

    async fn detect_contract_type(&self, text: &str) -> Result<String, AiError> {
        Ok(Orchestrator::detect_contract_type(self, text).await)
    }

    async fn generate_summary(&self, text: &str) -> Result<String, AiError> {
        Ok(Orchestrator::generate_summary(self, text).await)
    }
}

/// Routes each call to the AI backend or the rule-based analyzer.
///
/// The mode is read from the owned configuration on every call. Fallback is
/// one level deep: rules are infallible.
pub struct Coordinator<A> {
    config: AnalysisConfig,
    ai: A,
    rules: RuleAnalyzer,
}

impl<A: AiBackend> Coordinator<A> {
    pub fn new(config: AnalysisConfig, ai: A) -> Self {
        Self {
            config,
            ai,
            rules: RuleAnalyzer::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn mode(&self) -> AnalysisMode {
        self.config.mode()
    }

    pub fn ai(&self) -> &A {
        &self.ai
    }

    pub fn rules(&self) -> &RuleAnalyzer {
        &self.rules
    }

    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        match self.mode() {
            AnalysisMode::RulesOnly => {
                debug!("rules-only analysis");
                self.rules.analyze(text)
            }
            AnalysisMode::AiPreferred => match self.ai.analyze_contract(text).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "AI analysis failed, using rule-based analysis");
                    self.rules.analyze(text)
                }
            },
        }
    }

    pub async fn answer_questions(&self, text: &str, question: &str) -> AnswerSet {
        match self.mode() {
            AnalysisMode::RulesOnly => self.rules.answer_question(text, question),
            AnalysisMode::AiPreferred => match self.ai.answer_question(text, question).await {
                Ok(answers) => answers,
                Err(e) => {
                    warn!(error = %e, "AI question answering failed, using rule-based answer");
                    self.rules.answer_question(text, question)
                }
            },
        }
    }

    pub async fn detect_type(&self, text: &str) -> String {
        match self.mode() {
            AnalysisMode::RulesOnly => self.rules.detect_type(text).to_string(),
            AnalysisMode::AiPreferred => match self.ai.detect_contract_type(text).await {
                Ok(label) => label,
                Err(e) => {
                    warn!(error = %e, "AI type detection failed, using rule-based type");
                    self.rules.detect_type(text).to_string()
                }
            },
        }
    }

    /// Summaries have no rule-based counterpart; failures become a fixed notice.
    pub async fn generate_summary(&self, text: &str) -> String {
        match self.mode() {
            AnalysisMode::RulesOnly => SUMMARY_AI_DISABLED.to_string(),
            AnalysisMode::AiPreferred => match self.ai.generate_summary(text).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(error = %e, "AI summary failed");
                    SUMMARY_UNAVAILABLE.to_string()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contralex_ai::{GenerationError, ParseError};
    use contralex_ai::orchestrator::FALLBACK_TYPE;
    use mockall::mock;

    mock! {
        pub Backend {}

        #[async_trait]
        impl AiBackend for Backend {
            async fn analyze_contract(&self, text: &str) -> Result<AnalysisResult, AiError>;
            async fn answer_question(&self, text: &str, question: &str) -> Result<AnswerSet, AiError>;
            async fn detect_contract_type(&self, text: &str) -> Result<String, AiError>;
            async fn generate_summary(&self, text: &str) -> Result<String, AiError>;
        }
    }

    const CONTRACT: &str = "Contrato de arrendamiento. El arrendatario pagará la renta mensual. \
        La vigencia es de doce meses. Se pacta prórroga automática.";

    fn ai_config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    fn rules_config() -> AnalysisConfig {
        AnalysisConfig {
            use_ai: false,
            ..AnalysisConfig::default()
        }
    }

    fn timeout_error() -> AiError {
        GenerationError::Timeout(std::time::Duration::from_secs(60)).into()
    }

    #[tokio::test]
    async fn failing_ai_falls_back_to_rules() {
        let mut backend = MockBackend::new();
        backend
            .expect_analyze_contract()
            .times(1)
            .returning(|_| Err(timeout_error()));

        let coordinator = Coordinator::new(ai_config(), backend);
        let result = coordinator.analyze(CONTRACT).await;
        assert_eq!(result, RuleAnalyzer::new().analyze(CONTRACT));
    }

    #[tokio::test]
    async fn parse_error_also_falls_back() {
        let mut backend = MockBackend::new();
        backend
            .expect_analyze_contract()
            .returning(|_| Err(ParseError::NotAnObject.into()));

        let coordinator = Coordinator::new(ai_config(), backend);
        assert_eq!(coordinator.analyze("").await, RuleAnalyzer::new().analyze(""));
    }

    #[tokio::test]
    async fn ai_result_passes_through() {
        let expected = AnalysisResult::new(
            "Arrendamiento",
            vec!["Vigencia".into()],
            vec![],
            88.0,
            vec!["Negociar aviso".into()],
            "Arriendo anual.",
        );
        let returned = expected.clone();

        let mut backend = MockBackend::new();
        backend
            .expect_analyze_contract()
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let coordinator = Coordinator::new(ai_config(), backend);
        assert_eq!(coordinator.analyze(CONTRACT).await, expected);
    }

    #[tokio::test]
    async fn rules_only_never_calls_ai() {
        let mut backend = MockBackend::new();
        backend.expect_analyze_contract().never();
        backend.expect_answer_question().never();
        backend.expect_detect_contract_type().never();
        backend.expect_generate_summary().never();

        let coordinator = Coordinator::new(rules_config(), backend);
        assert_eq!(coordinator.mode(), AnalysisMode::RulesOnly);

        let result = coordinator.analyze(CONTRACT).await;
        assert_eq!(result.contract_type, "Arrendamiento");
        assert!(
            result
                .risks
                .contains(&"Prórroga automática sin aviso expreso.".to_string())
        );

        let answers = coordinator.answer_questions(CONTRACT, "¿Cuál es la vigencia?").await;
        assert!(answers.answer().contains("doce meses"));
        assert_eq!(coordinator.detect_type(CONTRACT).await, "Arrendamiento");
        assert_eq!(coordinator.generate_summary(CONTRACT).await, SUMMARY_AI_DISABLED);
    }

    #[tokio::test]
    async fn question_falls_back_to_snippet() {
        let mut backend = MockBackend::new();
        backend
            .expect_answer_question()
            .times(1)
            .returning(|_, _| Err(timeout_error()));

        let coordinator = Coordinator::new(ai_config(), backend);
        let answers = coordinator.answer_questions(CONTRACT, "¿Qué plazo tiene?").await;
        assert_eq!(answers, RuleAnalyzer::new().answer_question(CONTRACT, "¿Qué plazo tiene?"));
    }

    #[tokio::test]
    async fn question_passes_through() {
        let mut backend = MockBackend::new();
        backend
            .expect_answer_question()
            .withf(|_, question| question.contains("renta"))
            .returning(|_, _| Ok(AnswerSet::single("500 euros.")));

        let coordinator = Coordinator::new(ai_config(), backend);
        let answers = coordinator.answer_questions(CONTRACT, "¿Cuánto es la renta?").await;
        assert_eq!(answers.answer(), "500 euros.");
    }

    #[tokio::test]
    async fn type_detection_fallback_and_passthrough() {
        let mut failing = MockBackend::new();
        failing
            .expect_detect_contract_type()
            .returning(|_| Err(timeout_error()));
        let coordinator = Coordinator::new(ai_config(), failing);
        assert_eq!(coordinator.detect_type(CONTRACT).await, "Arrendamiento");

        let mut ok = MockBackend::new();
        ok.expect_detect_contract_type()
            .returning(|_| Ok("Licencia".to_string()));
        let coordinator = Coordinator::new(ai_config(), ok);
        assert_eq!(coordinator.detect_type(CONTRACT).await, "Licencia");
    }

    #[tokio::test]
    async fn summary_failure_is_notice() {
        let mut backend = MockBackend::new();
        backend
            .expect_generate_summary()
            .returning(|_| Err(timeout_error()));
        let coordinator = Coordinator::new(ai_config(), backend);
        assert_eq!(coordinator.generate_summary(CONTRACT).await, SUMMARY_UNAVAILABLE);
    }

    // ── Orchestrator as backend ──

    struct DownGenerator;

    #[async_trait]
    impl TextGenerator for DownGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn orchestrator_safety_net_shadows_rule_fallback() {
        let config = ai_config();
        let orchestrator = Orchestrator::new(DownGenerator, &config);
        let coordinator = Coordinator::new(config, orchestrator);

        let result = coordinator.analyze(CONTRACT).await;
        assert_eq!(result.contract_type, FALLBACK_TYPE);
        assert_eq!(result.risk_score, 50.0);

        assert_eq!(coordinator.detect_type(CONTRACT).await, "General");
    }
}
