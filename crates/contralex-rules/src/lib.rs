//! Rule-based analysis: ordered lexical pattern tables, scoring heuristic, and
//! snippet-based question answering. Never touches the network.

pub mod analyzer;
pub mod patterns;
pub mod questions;

pub use analyzer::RuleAnalyzer;
pub use patterns::GENERAL_TYPE;
