//! Result types shared by the rule-based and generative analysis paths.

use serde::{Deserialize, Serialize};

/// Lowest possible risk score (most risky).
pub const MIN_RISK_SCORE: f64 = 0.0;
/// Highest possible risk score (least risky).
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Canonical output of a contract analysis.
///
/// Field names serialise in camelCase (`keyClauses`, `riskScore`, ...) to match
/// the JSON shape requested from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "type")]
    pub contract_type: String,
    pub key_clauses: Vec<String>,
    pub risks: Vec<String>,
    /// 0–100, where 100 means no detected risk.
    pub risk_score: f64,
    pub recommendations: Vec<String>,
    pub summary: String,
}

impl AnalysisResult {
    /// Build a result, clamping `risk_score` into `[0, 100]`.
    pub fn new(
        contract_type: impl Into<String>,
        key_clauses: Vec<String>,
        risks: Vec<String>,
        risk_score: f64,
        recommendations: Vec<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            contract_type: contract_type.into(),
            key_clauses,
            risks,
            risk_score: clamp_risk_score(risk_score),
            recommendations,
            summary: summary.into(),
        }
    }
}

/// Clamp a score into `[0, 100]`. NaN collapses to the midpoint.
pub fn clamp_risk_score(score: f64) -> f64 {
    if score.is_nan() {
        return (MIN_RISK_SCORE + MAX_RISK_SCORE) / 2.0;
    }
    score.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE)
}

/// Answer to a question about a contract.
///
/// The first line is the direct answer; any further lines are supporting
/// references quoted from the contract. Serialises as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(Vec<String>);

impl AnswerSet {
    /// A single-line answer with no references.
    pub fn single(answer: impl Into<String>) -> Self {
        Self(vec![answer.into()])
    }

    /// An answer followed by reference lines, in order.
    pub fn with_references(answer: impl Into<String>, references: Vec<String>) -> Self {
        let mut lines = Vec::with_capacity(references.len() + 1);
        lines.push(answer.into());
        lines.extend(references);
        Self(lines)
    }

    /// The direct answer (first line).
    pub fn answer(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// Supporting references (every line after the first).
    pub fn references(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.0
    }
}

/// Side-by-side comparison of two contracts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractComparison {
    pub differences: Vec<Difference>,
    pub recommendation: String,
    pub missing_in_contract1: Vec<String>,
    pub missing_in_contract2: Vec<String>,
}

impl ContractComparison {
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
            && self.recommendation.is_empty()
            && self.missing_in_contract1.is_empty()
            && self.missing_in_contract2.is_empty()
    }
}

/// One aspect on which two contracts differ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difference {
    pub aspect: String,
    pub contract1: String,
    pub contract2: String,
    /// `high`, `medium` or `low`.
    pub impact: String,
}

/// Dates and deadlines extracted from a contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyDates {
    pub dates: Vec<KeyDate>,
    pub critical_deadlines: Vec<String>,
}

impl KeyDates {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.critical_deadlines.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyDate {
    /// Kind of date: start, end, payment, notice, renewal...
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub importance: String,
}
