//! Rule-based contract analysis.
//!
//! Runs the clause, type, and risk tables over whitespace-normalised text and
//! derives a score, recommendations, and a one-line summary. No I/O and no
//! randomness: the same text always yields the same [`AnalysisResult`].

use contralex_core::{AnalysisResult, AnswerSet, normalize_whitespace};
use tracing::debug;

use crate::patterns::{CLAUSE_TABLE, ESSENTIAL_CLAUSES, GENERAL_TYPE, RISK_TABLE, TYPE_TABLE};
use crate::questions;

/// Starting score before risks and clauses are counted.
pub const BASE_SCORE: f64 = 100.0;
/// Deducted once per detected risk.
pub const RISK_PENALTY: f64 = 10.0;
/// Added once per detected clause, up to [`MAX_BONUS_CLAUSES`] clauses.
pub const CLAUSE_BONUS: f64 = 2.0;
pub const MAX_BONUS_CLAUSES: usize = 8;

const REC_LIABILITY: &str = "Agregar cláusula de limitación de responsabilidad clara y razonable.";
const REC_TERMINATION: &str = "Especificar causales y procedimiento de terminación anticipada.";
const REC_SERVICES: &str = "Definir entregables, SLA y métricas de calidad del servicio.";
const REC_CONSISTENCY: &str = "Verificar coherencia entre plazos, pagos y penalidades.";
const REC_REVIEW: &str = "Solicitar revisión profesional si el contrato es crítico.";

/// Deterministic analyzer backed by the static pattern tables.
///
/// Holds no state; the tables are shared process-wide and read-only, so one
/// instance can serve any number of concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAnalyzer;

impl RuleAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Full analysis of a contract. Empty text yields zero matches.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let norm = normalize_whitespace(text);

        let mut key_clauses: Vec<String> = CLAUSE_TABLE
            .matching_labels(&norm)
            .map(str::to_string)
            .collect();
        key_clauses.sort();

        let contract_type = detect_type_normalized(&norm);
        let risks = detect_risks(&norm);
        let risk_score = risk_score(risks.len(), key_clauses.len());
        let recommendations = recommend(&risks, contract_type);

        let summary = format!(
            "Análisis automático por reglas: se detectaron {} cláusulas clave, tipo estimado {} y {} riesgos potenciales.",
            key_clauses.len(),
            contract_type,
            risks.len()
        );

        debug!(
            contract_type,
            clauses = key_clauses.len(),
            risks = risks.len(),
            risk_score,
            "rule-based analysis complete"
        );

        AnalysisResult::new(
            contract_type,
            key_clauses,
            risks,
            risk_score,
            recommendations,
            summary,
        )
    }

    /// Answer a question by keyword bucket and snippet lookup.
    pub fn answer_question(&self, text: &str, question: &str) -> AnswerSet {
        questions::answer_question(text, question)
    }

    /// Contract type label from the priority-ordered type table.
    pub fn detect_type(&self, text: &str) -> &'static str {
        detect_type_normalized(&normalize_whitespace(text))
    }
}

fn detect_type_normalized(norm: &str) -> &'static str {
    TYPE_TABLE.first_match(norm).unwrap_or(GENERAL_TYPE)
}

/// Risks from the risk table, then one synthetic risk per missing essential clause.
fn detect_risks(norm: &str) -> Vec<String> {
    let mut risks: Vec<String> = RISK_TABLE
        .matching_labels(norm)
        .map(str::to_string)
        .collect();

    let lower = norm.to_lowercase();
    for (spellings, missing_risk) in ESSENTIAL_CLAUSES {
        if !spellings.iter().any(|s| lower.contains(s)) {
            risks.push((*missing_risk).to_string());
        }
    }

    risks
}

/// `100 - 10·risks + 2·min(clauses, 8)`, clamped to `[0, 100]`.
pub fn risk_score(risk_count: usize, clause_count: usize) -> f64 {
    let score = BASE_SCORE - risk_count as f64 * RISK_PENALTY
        + clause_count.min(MAX_BONUS_CLAUSES) as f64 * CLAUSE_BONUS;
    score.clamp(0.0, 100.0)
}

fn recommend(risks: &[String], contract_type: &str) -> Vec<String> {
    let mentions = |needle: &str| risks.iter().any(|r| r.to_lowercase().contains(needle));

    let mut recs = Vec::new();
    if mentions("limitación") {
        recs.push(REC_LIABILITY.to_string());
    }
    if mentions("terminación") {
        recs.push(REC_TERMINATION.to_string());
    }
    if contract_type == "Servicios" {
        recs.push(REC_SERVICES.to_string());
    }
    recs.push(REC_CONSISTENCY.to_string());
    recs.push(REC_REVIEW.to_string());
    recs
}
