//! Generative analysis path: a Gemini client behind the [`TextGenerator`]
//! seam, prompt templates, response sanitation, and the [`Orchestrator`] that
//! ties them together.

pub mod client;
pub mod error;
pub mod orchestrator;
pub mod parse;
pub mod prompts;
pub mod sanitize;

pub use client::{
    GeminiClient, GenerationConfig, GenerationError, TextGenerator, estimate_within_budget,
    truncate_if_needed,
};
pub use error::{AiError, ParseError};
pub use orchestrator::{Orchestrator, fallback_analysis, fallback_answer};
pub use sanitize::sanitize_response;
