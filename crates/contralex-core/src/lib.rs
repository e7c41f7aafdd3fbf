//! Shared types for contract analysis: results, configuration, and text helpers.

pub mod analysis;
pub mod config;
pub mod text;

pub use analysis::{AnalysisResult, AnswerSet, ContractComparison, Difference, KeyDate, KeyDates};
pub use config::{AnalysisConfig, AnalysisMode, ConfigError};
pub use text::{char_len, normalize_whitespace, truncate_chars};
