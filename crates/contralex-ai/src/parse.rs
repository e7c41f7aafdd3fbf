//! Field-level validation of sanitized model responses.

use contralex_core::{AnalysisResult, AnswerSet, ContractComparison, KeyDates};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Prefix for reference citations returned by the model.
pub const REFERENCE_PREFIX: &str = "📄 Referencia: ";

type Object = Map<String, Value>;

/// Parse `raw` as a JSON object.
pub fn parse_object(raw: &str) -> Result<Object, ParseError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject),
    }
}

// ── Field accessors ──

/// A present, non-null field.
fn field<'a>(obj: &'a Object, name: &'static str) -> Result<&'a Value, ParseError> {
    match obj.get(name) {
        None | Some(Value::Null) => Err(ParseError::MissingField(name)),
        Some(value) => Ok(value),
    }
}

fn required_str(obj: &Object, name: &'static str) -> Result<String, ParseError> {
    field(obj, name)?
        .as_str()
        .map(str::to_string)
        .ok_or(ParseError::WrongShape {
            field: name,
            expected: "a string",
        })
}

/// A number, or a string holding one (models sometimes quote scores).
fn required_f64(obj: &Object, name: &'static str) -> Result<f64, ParseError> {
    let wrong = ParseError::WrongShape {
        field: name,
        expected: "a number",
    };
    let value = match field(obj, name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(wrong),
    }
}

fn string_list(value: &Value, name: &'static str) -> Result<Vec<String>, ParseError> {
    let wrong = || ParseError::WrongShape {
        field: name,
        expected: "an array of strings",
    };
    value
        .as_array()
        .ok_or_else(wrong)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong))
        .collect()
}

fn required_str_list(obj: &Object, name: &'static str) -> Result<Vec<String>, ParseError> {
    string_list(field(obj, name)?, name)
}

/// Absent or non-array values read as empty; array items must still be strings.
fn optional_str_list(obj: &Object, name: &'static str) -> Result<Vec<String>, ParseError> {
    match obj.get(name) {
        Some(value @ Value::Array(_)) => string_list(value, name),
        _ => Ok(Vec::new()),
    }
}

// ── Response parsers ──

/// All six analysis fields are required. The score is clamped to `[0, 100]`.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, ParseError> {
    let obj = parse_object(raw)?;
    Ok(AnalysisResult::new(
        required_str(&obj, "type")?,
        required_str_list(&obj, "keyClauses")?,
        required_str_list(&obj, "risks")?,
        required_f64(&obj, "riskScore")?,
        required_str_list(&obj, "recommendations")?,
        required_str(&obj, "summary")?,
    ))
}

/// `answer` is required; `references` are optional and get [`REFERENCE_PREFIX`].
pub fn parse_answer(raw: &str) -> Result<AnswerSet, ParseError> {
    let obj = parse_object(raw)?;
    let answer = required_str(&obj, "answer")?;
    let references = optional_str_list(&obj, "references")?
        .into_iter()
        .map(|r| format!("{REFERENCE_PREFIX}{r}"))
        .collect();
    Ok(AnswerSet::with_references(answer, references))
}

pub fn parse_type(raw: &str) -> Result<String, ParseError> {
    required_str(&parse_object(raw)?, "type")
}

pub fn parse_summary(raw: &str) -> Result<String, ParseError> {
    required_str(&parse_object(raw)?, "summary")
}

pub fn parse_comparison(raw: &str) -> Result<ContractComparison, ParseError> {
    parse_typed(raw)
}

pub fn parse_key_dates(raw: &str) -> Result<KeyDates, ParseError> {
    parse_typed(raw)
}

/// Deserialize an object into a defaulted serde type.
fn parse_typed<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    let obj = parse_object(raw)?;
    Ok(serde_json::from_value(Value::Object(obj))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALYSIS: &str = r#"{
        "type": "Arrendamiento",
        "keyClauses": ["Vigencia", "Renta"],
        "risks": ["Prórroga automática"],
        "riskScore": 72.5,
        "recommendations": ["Negociar aviso previo"],
        "summary": "Contrato de arriendo por 12 meses."
    }"#;

    #[test]
    fn full_analysis_parses() {
        let result = parse_analysis(ANALYSIS).unwrap();
        assert_eq!(result.contract_type, "Arrendamiento");
        assert_eq!(result.key_clauses, vec!["Vigencia", "Renta"]);
        assert_eq!(result.risk_score, 72.5);
        assert_eq!(result.summary, "Contrato de arriendo por 12 meses.");
    }

    #[test]
    fn score_out_of_range_is_clamped() {
        let raw = ANALYSIS.replace("72.5", "140");
        assert_eq!(parse_analysis(&raw).unwrap().risk_score, 100.0);
        let raw = ANALYSIS.replace("72.5", "-3");
        assert_eq!(parse_analysis(&raw).unwrap().risk_score, 0.0);
    }

    #[test]
    fn quoted_score_is_accepted() {
        let raw = ANALYSIS.replace("72.5", "\"64\"");
        assert_eq!(parse_analysis(&raw).unwrap().risk_score, 64.0);
    }

    #[test]
    fn missing_field_is_reported() {
        let raw = ANALYSIS.replace("\"summary\"", "\"resumen\"");
        assert!(matches!(
            parse_analysis(&raw),
            Err(ParseError::MissingField("summary"))
        ));
    }

    #[test]
    fn null_counts_as_missing() {
        let raw = ANALYSIS.replace("\"Arrendamiento\"", "null");
        assert!(matches!(
            parse_analysis(&raw),
            Err(ParseError::MissingField("type"))
        ));
    }

    #[test]
    fn wrong_shapes_are_reported() {
        let raw = ANALYSIS.replace("[\"Prórroga automática\"]", "\"Prórroga automática\"");
        assert!(matches!(
            parse_analysis(&raw),
            Err(ParseError::WrongShape { field: "risks", .. })
        ));
        let raw = ANALYSIS.replace("72.5", "\"alto\"");
        assert!(matches!(
            parse_analysis(&raw),
            Err(ParseError::WrongShape { field: "riskScore", .. })
        ));
    }

    #[test]
    fn non_object_and_invalid_json() {
        assert!(matches!(parse_analysis("[1, 2]"), Err(ParseError::NotAnObject)));
        assert!(matches!(parse_analysis("no es json"), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn answer_with_references() {
        let raw = r#"{"answer": "Doce meses.", "references": ["CLÁUSULA SEGUNDA"], "confidence": "high"}"#;
        let answers = parse_answer(raw).unwrap();
        assert_eq!(
            answers.lines(),
            ["Doce meses.".to_string(), "📄 Referencia: CLÁUSULA SEGUNDA".to_string()]
        );
    }

    #[test]
    fn references_are_optional() {
        let answers = parse_answer(r#"{"answer": "No consta."}"#).unwrap();
        assert_eq!(answers.len(), 1);
        let answers = parse_answer(r#"{"answer": "No consta.", "references": "ninguna"}"#).unwrap();
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn answer_is_required() {
        assert!(matches!(
            parse_answer(r#"{"references": []}"#),
            Err(ParseError::MissingField("answer"))
        ));
    }

    #[test]
    fn type_and_summary_fields() {
        let raw = r#"{"type": "Laboral", "subtype": "Indefinido", "confidence": "90"}"#;
        assert_eq!(parse_type(raw).unwrap(), "Laboral");
        let raw = r#"{"summary": "Resumen.", "keyPoints": [], "parties": ["A", "B"]}"#;
        assert_eq!(parse_summary(raw).unwrap(), "Resumen.");
    }

    #[test]
    fn comparison_tolerates_missing_sections() {
        let raw = r#"{"differences": [{"aspect": "Plazo", "contract1": "12 meses", "contract2": "24 meses", "impact": "high"}],
                      "recommendation": "El contrato 1"}"#;
        let comparison = parse_comparison(raw).unwrap();
        assert_eq!(comparison.differences.len(), 1);
        assert_eq!(comparison.differences[0].aspect, "Plazo");
        assert!(comparison.missing_in_contract1.is_empty());
    }

    #[test]
    fn key_dates_parse() {
        let raw = r#"{"dates": [{"type": "inicio", "date": "1 de marzo de 2025", "importance": "high"}],
                      "criticalDeadlines": ["Aviso 30 días antes del vencimiento"]}"#;
        let dates = parse_key_dates(raw).unwrap();
        assert_eq!(dates.dates[0].kind, "inicio");
        assert_eq!(dates.critical_deadlines.len(), 1);
    }
}
