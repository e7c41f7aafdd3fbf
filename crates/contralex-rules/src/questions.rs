//! Keyword-bucket question answering over contract text.

use contralex_core::{AnswerSet, normalize_whitespace};
use tracing::debug;

use crate::patterns::{QUESTION_TABLE, QuestionBucket};

pub const NO_SPECIFIC_INFO: &str =
    "No se encontró información específica. Revise las cláusulas generales.";
pub const NO_RELEVANT_MATCHES: &str = "No se hallaron coincidencias relevantes.";

/// Answer a free-form question with a snippet from the contract.
///
/// The question picks the first bucket (in priority order) whose keywords it
/// contains; the answer is the sentence fragment around the first match of
/// that bucket's topic pattern. A question that fits no bucket, or a bucket
/// whose topic never appears, gets a fixed "nothing found" sentence.
pub fn answer_question(text: &str, question: &str) -> AnswerSet {
    let norm = normalize_whitespace(text);
    let question = question.to_lowercase();

    let Some(bucket) = classify_question(&question) else {
        debug!("question matched no bucket");
        return AnswerSet::single(NO_SPECIFIC_INFO);
    };

    let answer = match extract_snippet(bucket, &norm) {
        Some(snippet) => format!("{snippet}..."),
        None => NO_RELEVANT_MATCHES.to_string(),
    };
    debug!(bucket = bucket.name, "rule-based answer built");
    AnswerSet::single(answer)
}

/// First bucket accepting the lower-cased question.
pub fn classify_question(question_lower: &str) -> Option<&'static QuestionBucket> {
    QUESTION_TABLE.iter().find(|b| b.accepts(question_lower))
}

/// Fragment around the first topic match, bounded to one sentence and
/// [`SNIPPET_CONTEXT_CHARS`](crate::patterns::SNIPPET_CONTEXT_CHARS) per side.
pub fn extract_snippet<'t>(bucket: &QuestionBucket, text: &'t str) -> Option<&'t str> {
    bucket.snippet.find(text).map(|m| m.as_str())
}
