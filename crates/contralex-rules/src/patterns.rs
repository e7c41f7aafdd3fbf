//! Lexical pattern tables for Spanish-language contracts.
//!
//! Every table is an ordered slice of `(label, pattern)` pairs. Order matters
//! for the type table and the question buckets: the first match wins. The
//! compiled forms are built once, on first use, and only read afterwards.

use once_cell::sync::Lazy;
use regex::Regex;

// ── Source tables ──

/// Named clauses whose presence is reported in `keyClauses`.
pub const CLAUSE_PATTERNS: &[(&str, &str)] = &[
    (
        "Confidencialidad",
        r"\bconfidencial(?:idad|es)?\b|\bnda\b|\bno divulgaci[oó]n\b",
    ),
    ("Vigencia", r"\bvigencia\b|\bvencimiento\b|\bplazo\b"),
    ("Sanciones", r"\bpenalidad(?:es)?\b|\bmultas?\b|\bsanci[oó]n"),
    ("Obligaciones", r"\bobligaci[oó]n(?:es)?\b|\bdeber(?:es)?\b"),
    (
        "Jurisdicción",
        r"\bjurisdicci[oó]n\b|\bley aplicable\b|\bcompetencia\b",
    ),
    ("Terminación", r"\bterminaci[oó]n\b|\brescisi[oó]n\b"),
];

/// Contract types in priority order. The first matching entry is the label.
pub const TYPE_PATTERNS: &[(&str, &str)] = &[
    (
        "Arrendamiento",
        r"\b(?:arriendo|arrendamiento|arrendador|arrendatario|inquilino|renta)\b",
    ),
    (
        "Laboral",
        r"\b(?:empleado|empleador|salario|n[oó]mina|jornada)\b",
    ),
    ("Servicios", r"\bservicios?\b|\bprestaci[oó]n de servicios\b"),
    ("NDA", r"\bno divulgaci[oó]n\b|\bnda\b|\bconfidencialidad\b"),
    ("Compraventa", r"\bcompra(?:venta)?\b|\bprecio\b|\bentrega\b"),
];

/// Label used when no type pattern matches.
pub const GENERAL_TYPE: &str = "General";

/// Risk descriptions keyed to the wording that triggers them.
pub const RISK_PATTERNS: &[(&str, &str)] = &[
    (
        "Cláusula que permite modificaciones unilaterales.",
        r"\breserva(?:mos)? el derecho a modificar\b",
    ),
    (
        "Renuncia a acciones legales por parte del usuario.",
        r"\brenuncias? a demandar\b",
    ),
    (
        "Responsabilidad potencialmente ilimitada.",
        r"\bresponsabilidad ilimitada\b",
    ),
    (
        "Penalidad desproporcionada.",
        r"\bpenalidad excesiva\b|\bmulta.*\b(?:excesiva|desproporcionada)\b",
    ),
    (
        "Prórroga automática sin aviso expreso.",
        r"\bpr[oó]rroga autom[aá]tica\b",
    ),
];

/// Essential clauses whose absence is itself a risk: (accepted spellings, risk text).
pub const ESSENTIAL_CLAUSES: &[(&[&str], &str)] = &[
    (
        &["limitación de responsabilidad", "limitacion de responsabilidad"],
        "No se encontró cláusula de limitación de responsabilidad.",
    ),
    (
        &["terminación", "terminacion"],
        "No se encontró cláusula de terminación.",
    ),
];

/// Question buckets in priority order: (name, question keywords, snippet pattern).
pub const QUESTION_BUCKETS: &[(&str, &[&str], &str)] = &[
    (
        "duration",
        &["plazo", "vigencia"],
        r"vigencia|plazo|vencimiento",
    ),
    (
        "payment",
        &["pago", "precio"],
        r"pago|precio|facturaci[oó]n|honorarios",
    ),
    ("confidentiality", &["confidencial"], r"confidencial"),
    (
        "termination",
        &["terminaci"],
        r"terminaci[oó]n|rescisi[oó]n",
    ),
];

/// Characters of context kept on each side of a snippet match.
pub const SNIPPET_CONTEXT_CHARS: usize = 120;

// ── Compiled tables ──

/// A compiled `(label, matcher)` pair.
#[derive(Debug)]
pub struct PatternRule {
    pub label: &'static str,
    pub regex: Regex,
}

impl PatternRule {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An ordered, immutable list of compiled rules.
#[derive(Debug)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    fn compile(source: &[(&'static str, &str)]) -> Self {
        let rules = source
            .iter()
            .map(|&(label, pattern)| PatternRule {
                label,
                regex: case_insensitive(pattern),
            })
            .collect();
        Self { rules }
    }

    /// Labels of every rule matching `text`, in table order.
    pub fn matching_labels<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.is_match(text))
            .map(|rule| rule.label)
    }

    /// Label of the first rule (in table order) matching `text`.
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        self.matching_labels(text).next()
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A compiled question bucket.
#[derive(Debug)]
pub struct QuestionBucket {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    /// Match of the topic pattern with up to [`SNIPPET_CONTEXT_CHARS`] of
    /// surrounding context that stays inside one sentence.
    pub snippet: Regex,
}

impl QuestionBucket {
    /// Whether a lower-cased question falls in this bucket.
    pub fn accepts(&self, question_lower: &str) -> bool {
        self.keywords.iter().any(|kw| question_lower.contains(kw))
    }
}

pub static CLAUSE_TABLE: Lazy<PatternTable> = Lazy::new(|| PatternTable::compile(CLAUSE_PATTERNS));

pub static TYPE_TABLE: Lazy<PatternTable> = Lazy::new(|| PatternTable::compile(TYPE_PATTERNS));

pub static RISK_TABLE: Lazy<PatternTable> = Lazy::new(|| PatternTable::compile(RISK_PATTERNS));

pub static QUESTION_TABLE: Lazy<Vec<QuestionBucket>> = Lazy::new(|| {
    QUESTION_BUCKETS
        .iter()
        .map(|&(name, keywords, topic)| QuestionBucket {
            name,
            keywords,
            snippet: case_insensitive(&format!(
                "[^.\\n]{{0,{n}}}(?:{topic})[^.\\n]{{0,{n}}}",
                n = SNIPPET_CONTEXT_CHARS
            )),
        })
        .collect()
});

/// The source tables are constants checked by the tests below, so a failure
/// here is a programming error.
fn case_insensitive(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}"))
        .unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tables_compile() {
        assert_eq!(CLAUSE_TABLE.len(), CLAUSE_PATTERNS.len());
        assert_eq!(TYPE_TABLE.len(), TYPE_PATTERNS.len());
        assert_eq!(RISK_TABLE.len(), RISK_PATTERNS.len());
        assert_eq!(QUESTION_TABLE.len(), QUESTION_BUCKETS.len());
    }

    #[test]
    fn labels_are_unique() {
        for table in [CLAUSE_PATTERNS, TYPE_PATTERNS, RISK_PATTERNS] {
            let mut labels: Vec<_> = table.iter().map(|(l, _)| *l).collect();
            labels.sort_unstable();
            labels.dedup();
            assert_eq!(labels.len(), table.len());
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            CLAUSE_TABLE.first_match("CLÁUSULA DE CONFIDENCIALIDAD"),
            Some("Confidencialidad")
        );
        assert_eq!(TYPE_TABLE.first_match("El EMPLEADOR pagará"), Some("Laboral"));
    }

    #[test]
    fn accent_variants_match() {
        assert!(CLAUSE_TABLE.rules()[5].is_match("rescision del contrato"));
        assert!(CLAUSE_TABLE.rules()[5].is_match("terminación anticipada"));
    }

    #[test]
    fn nda_requires_word_boundary() {
        // "fundamental" contains "nda" but is not an NDA reference.
        assert_eq!(CLAUSE_TABLE.first_match("un derecho fundamental"), None);
        assert_eq!(
            CLAUSE_TABLE.first_match("firmarán un NDA"),
            Some("Confidencialidad")
        );
    }

    #[test]
    fn matching_labels_keeps_table_order() {
        let text = "plazo de vigencia y terminación con confidencialidad";
        let labels: Vec<_> = CLAUSE_TABLE.matching_labels(text).collect();
        assert_eq!(labels, vec!["Confidencialidad", "Vigencia", "Terminación"]);
    }

    #[test]
    fn excessive_fine_pattern() {
        let rule = RISK_TABLE
            .rules()
            .iter()
            .find(|r| r.label == "Penalidad desproporcionada.")
            .unwrap();
        assert!(rule.is_match("se aplicará una multa del 200% claramente desproporcionada"));
        assert!(!rule.is_match("se aplicará una multa razonable"));
    }

    #[test]
    fn question_bucket_accepts_keywords() {
        let payment = &QUESTION_TABLE[1];
        assert_eq!(payment.name, "payment");
        assert!(payment.accepts("¿cuál es el precio?"));
        assert!(!payment.accepts("¿cuánto dura?"));
    }
}
