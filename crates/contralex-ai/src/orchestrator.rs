//! AI-backed contract operations.
//!
//! Every operation comes in two layers. `try_*` methods return
//! `Result<_, AiError>` and surface generation and parse failures as-is. The
//! plain-named methods wrap them and absorb any error into fixed fallback
//! data, so they never fail.

use std::borrow::Cow;

use contralex_core::{
    AnalysisConfig, AnalysisResult, AnswerSet, ContractComparison, KeyDates, char_len,
    truncate_chars,
};
use tracing::{error, info, warn};

use crate::client::{GenerationError, TextGenerator, truncate_if_needed};
use crate::error::AiError;
use crate::parse;
use crate::prompts;
use crate::sanitize::sanitize_response;

/// Appended to a contract cut at the configured maximum before analysis.
pub const CAP_NOTICE: &str = "\n\n[NOTA: Contrato truncado por límite de tamaño]";

/// Type detection only looks at the start of a contract.
pub const TYPE_SNIPPET_CHARS: usize = 5000;

pub const DEFAULT_TYPE: &str = "General";
pub const SUMMARY_UNAVAILABLE: &str = "No se pudo generar el resumen.";
pub const GENERAL_QUESTION_APOLOGY: &str = "Lo siento, no pude procesar tu pregunta en este momento. \
     Por favor, intenta de nuevo o consulta con un profesional legal.";

// ── Fallback analysis ──

pub const FALLBACK_TYPE: &str = "Error en análisis";
pub const FALLBACK_RISK_SCORE: f64 = 50.0;
const FALLBACK_CLAUSE: &str = "No se pudieron detectar cláusulas";
const FALLBACK_RISK: &str = "Error en el análisis. Revise el contrato manualmente.";
const FALLBACK_RECOMMENDATIONS: &[&str] = &[
    "Solicite revisión manual del contrato",
    "Verifique que el formato del documento sea correcto",
    "Intente nuevamente más tarde",
];

/// Analysis returned when the AI path fails; the summary carries the reason.
pub fn fallback_analysis(reason: &str) -> AnalysisResult {
    AnalysisResult::new(
        FALLBACK_TYPE,
        vec![FALLBACK_CLAUSE.to_string()],
        vec![FALLBACK_RISK.to_string()],
        FALLBACK_RISK_SCORE,
        FALLBACK_RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
        format!("No se pudo completar el análisis automático. {reason}"),
    )
}

/// Single-line answer returned when question answering fails.
pub fn fallback_answer(reason: &str) -> AnswerSet {
    AnswerSet::single(format!(
        "Lo siento, no pude procesar tu pregunta. Error: {reason}"
    ))
}

// ── Orchestrator ──

/// Builds prompts, calls the generator, and validates the responses.
pub struct Orchestrator<G> {
    generator: G,
    max_contract_length: usize,
}

impl<G: TextGenerator> Orchestrator<G> {
    pub fn new(generator: G, config: &AnalysisConfig) -> Self {
        Self {
            generator,
            max_contract_length: config.max_contract_length,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn max_contract_length(&self) -> usize {
        self.max_contract_length
    }

    async fn generate_sanitized(&self, prompt: &str) -> Result<String, AiError> {
        let raw = self.generator.generate(prompt).await?;
        Ok(sanitize_response(&raw).to_string())
    }

    // ── Analysis ──

    pub async fn try_analyze_contract(&self, text: &str) -> Result<AnalysisResult, AiError> {
        info!(chars = char_len(text), "starting AI contract analysis");

        let contract = match truncate_chars(text, self.max_contract_length) {
            Some(head) => {
                warn!(
                    limit = self.max_contract_length,
                    "contract over size limit, truncating"
                );
                Cow::Owned(format!("{head}{CAP_NOTICE}"))
            }
            None => Cow::Borrowed(text),
        };

        let prompt = prompts::build_analysis_prompt(&contract);
        let response = self.generate_sanitized(&prompt).await?;
        let result = parse::parse_analysis(&response)?;

        info!(
            contract_type = %result.contract_type,
            risk_score = result.risk_score,
            "AI analysis complete"
        );
        Ok(result)
    }

    /// Never fails: any error becomes [`fallback_analysis`].
    pub async fn analyze_contract(&self, text: &str) -> AnalysisResult {
        match self.try_analyze_contract(text).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "AI contract analysis failed");
                fallback_analysis(&e.to_string())
            }
        }
    }

    // ── Questions ──

    pub async fn try_answer_question(
        &self,
        text: &str,
        question: &str,
    ) -> Result<AnswerSet, AiError> {
        info!(question, "answering contract question");
        let contract = truncate_if_needed(text, self.max_contract_length);
        let prompt = prompts::build_question_prompt(&contract, question);
        let response = self.generate_sanitized(&prompt).await?;
        Ok(parse::parse_answer(&response)?)
    }

    /// Never fails: any error becomes [`fallback_answer`].
    pub async fn answer_question(&self, text: &str, question: &str) -> AnswerSet {
        match self.try_answer_question(text, question).await {
            Ok(answers) => answers,
            Err(e) => {
                error!(error = %e, "AI question answering failed");
                fallback_answer(&e.to_string())
            }
        }
    }

    // ── Type detection ──

    pub async fn try_detect_contract_type(&self, text: &str) -> Result<String, AiError> {
        let snippet = truncate_chars(text, TYPE_SNIPPET_CHARS).unwrap_or(text);
        let prompt = prompts::build_type_detection_prompt(snippet);
        let response = self.generate_sanitized(&prompt).await?;
        Ok(parse::parse_type(&response)?)
    }

    pub async fn detect_contract_type(&self, text: &str) -> String {
        self.try_detect_contract_type(text)
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "AI type detection failed");
                DEFAULT_TYPE.to_string()
            })
    }

    // ── Summary ──

    pub async fn try_generate_summary(&self, text: &str) -> Result<String, AiError> {
        let contract = truncate_if_needed(text, self.max_contract_length);
        let prompt = prompts::build_summary_prompt(&contract);
        let response = self.generate_sanitized(&prompt).await?;
        Ok(parse::parse_summary(&response)?)
    }

    pub async fn generate_summary(&self, text: &str) -> String {
        self.try_generate_summary(text).await.unwrap_or_else(|e| {
            error!(error = %e, "AI summary failed");
            SUMMARY_UNAVAILABLE.to_string()
        })
    }

    // ── Comparison ──

    /// Each contract gets half of the size limit.
    pub async fn try_compare_contracts(
        &self,
        first: &str,
        second: &str,
    ) -> Result<ContractComparison, AiError> {
        let half = self.max_contract_length / 2;
        let first = truncate_if_needed(first, half);
        let second = truncate_if_needed(second, half);
        let prompt = prompts::build_comparison_prompt(&first, &second);
        let response = self.generate_sanitized(&prompt).await?;
        Ok(parse::parse_comparison(&response)?)
    }

    pub async fn compare_contracts(&self, first: &str, second: &str) -> ContractComparison {
        self.try_compare_contracts(first, second)
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "AI contract comparison failed");
                ContractComparison::default()
            })
    }

    // ── Key dates ──

    pub async fn try_extract_key_dates(&self, text: &str) -> Result<KeyDates, AiError> {
        let contract = truncate_if_needed(text, self.max_contract_length);
        let prompt = prompts::build_dates_prompt(&contract);
        let response = self.generate_sanitized(&prompt).await?;
        Ok(parse::parse_key_dates(&response)?)
    }

    pub async fn extract_key_dates(&self, text: &str) -> KeyDates {
        self.try_extract_key_dates(text).await.unwrap_or_else(|e| {
            error!(error = %e, "AI date extraction failed");
            KeyDates::default()
        })
    }

    // ── General legal questions ──

    /// Plain-text answer; only surrounding whitespace is removed.
    pub async fn try_answer_general_question(&self, question: &str) -> Result<String, AiError> {
        info!(question, "answering general legal question");
        let prompt = prompts::build_general_question_prompt(question);
        let answer = self.generator.generate(&prompt).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(GenerationError::EmptyResponse.into());
        }
        Ok(answer.to_string())
    }

    pub async fn answer_general_question(&self, question: &str) -> String {
        self.try_answer_general_question(question)
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "general legal question failed");
                GENERAL_QUESTION_APOLOGY.to_string()
            })
    }
}
