//! Text cards for analysis results.
//!
//! Each renderer builds the whole card as a `String` so the CLI can print it
//! in one write and the layout can be tested.

use contralex_core::{AnalysisResult, AnswerSet, ContractComparison, KeyDates};

const LABEL_WIDTH: usize = 18;
const MAX_LIST_ITEMS: usize = 10;

// ── Card builder ──

#[derive(Default)]
struct Card {
    out: String,
}

impl Card {
    fn title(mut self, title: &str) -> Self {
        self.out.push_str(&format!("=== {title} ===\n"));
        self
    }

    fn field(mut self, label: &str, value: impl std::fmt::Display) -> Self {
        self.out
            .push_str(&format!("  {label:<width$} {value}\n", width = LABEL_WIDTH));
        self
    }

    /// A headed bullet list; empty lists are skipped.
    fn section(mut self, header: &str, items: &[String]) -> Self {
        if items.is_empty() {
            return self;
        }
        self.out.push_str(&format!("\n{header}\n"));
        for item in items.iter().take(MAX_LIST_ITEMS) {
            self.out.push_str(&format!("  - {item}\n"));
        }
        if items.len() > MAX_LIST_ITEMS {
            self.out
                .push_str(&format!("  ... and {} more\n", items.len() - MAX_LIST_ITEMS));
        }
        self
    }

    fn text(mut self, header: &str, body: &str) -> Self {
        if !body.is_empty() {
            self.out.push_str(&format!("\n{header}\n  {body}\n"));
        }
        self
    }

    fn finish(self) -> String {
        self.out
    }
}

// ── Public API ──

pub fn render_analysis(source: &str, result: &AnalysisResult) -> String {
    Card::default()
        .title(source)
        .field("Tipo", &result.contract_type)
        .field("Puntaje de riesgo", format!("{:.1} / 100", result.risk_score))
        .text("Resumen", &result.summary)
        .section("Cláusulas clave", &result.key_clauses)
        .section("Riesgos", &result.risks)
        .section("Recomendaciones", &result.recommendations)
        .finish()
}

pub fn render_answers(question: &str, answers: &AnswerSet) -> String {
    Card::default()
        .title(question)
        .text("Respuesta", answers.answer())
        .section("Referencias", answers.references())
        .finish()
}

pub fn render_comparison(comparison: &ContractComparison) -> String {
    if comparison.is_empty() {
        return "No se pudo comparar los contratos.\n".to_string();
    }

    let differences: Vec<String> = comparison
        .differences
        .iter()
        .map(|d| {
            format!(
                "{} [{}]: contrato 1: {} | contrato 2: {}",
                d.aspect, d.impact, d.contract1, d.contract2
            )
        })
        .collect();

    Card::default()
        .title("Comparación")
        .section("Diferencias", &differences)
        .section("Ausente en contrato 1", &comparison.missing_in_contract1)
        .section("Ausente en contrato 2", &comparison.missing_in_contract2)
        .text("Recomendación", &comparison.recommendation)
        .finish()
}

pub fn render_key_dates(source: &str, dates: &KeyDates) -> String {
    if dates.is_empty() {
        return format!("{source}: no se encontraron fechas.\n");
    }

    let lines: Vec<String> = dates
        .dates
        .iter()
        .map(|d| format!("{} ({}): {}", d.kind, d.importance, d.date))
        .collect();

    Card::default()
        .title(source)
        .section("Fechas", &lines)
        .section("Plazos críticos", &dates.critical_deadlines)
        .finish()
}
