//! Concurrent analysis of several contract files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use contralex_core::AnalysisResult;
use contralex_engine::{AiBackend, Coordinator};
use futures::{StreamExt, TryStreamExt, stream};
use tracing::info;

/// Files analyzed at once.
pub const MAX_CONCURRENT_FILES: usize = 4;

pub struct FileAnalysis {
    pub path: PathBuf,
    pub result: AnalysisResult,
}

pub async fn read_contract(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading contract {}", path.display()))
}

/// Analyze every file, at most `concurrency` at a time. Results keep the
/// input order; the first unreadable file aborts the batch.
pub async fn analyze_files<A: AiBackend>(
    coordinator: &Coordinator<A>,
    paths: &[PathBuf],
    concurrency: usize,
) -> anyhow::Result<Vec<FileAnalysis>> {
    let start = Instant::now();

    let mut indexed: Vec<(usize, FileAnalysis)> = stream::iter(paths.iter().enumerate())
        .map(move |(index, path)| async move {
            let text = read_contract(path).await?;
            let result = coordinator.analyze(&text).await;
            info!(
                file = %path.display(),
                contract_type = %result.contract_type,
                risk_score = result.risk_score,
                "file analyzed"
            );
            anyhow::Ok((
                index,
                FileAnalysis {
                    path: path.clone(),
                    result,
                },
            ))
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    indexed.sort_by_key(|(index, _)| *index);
    info!(
        files = indexed.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "batch complete"
    );
    Ok(indexed.into_iter().map(|(_, analysis)| analysis).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contralex_core::AnalysisConfig;
    use contralex_engine::gemini_coordinator;

    fn rules_only() -> AnalysisConfig {
        AnalysisConfig {
            use_ai: false,
            ..AnalysisConfig::default()
        }
    }

    #[tokio::test]
    async fn results_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let texts = [
            "Contrato de arrendamiento del local.",
            "El empleado cumplirá una jornada de 40 horas.",
            "Acuerdo de no divulgación entre las partes.",
            "Contrato de compraventa con entrega inmediata.",
            "Prestación de servicios de consultoría.",
        ];
        let mut paths = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let path = dir.path().join(format!("contrato_{i}.txt"));
            std::fs::write(&path, text).unwrap();
            paths.push(path);
        }

        let coordinator = gemini_coordinator(rules_only()).unwrap();
        let analyses = analyze_files(&coordinator, &paths, 2).await.unwrap();

        let types: Vec<_> = analyses
            .iter()
            .map(|a| a.result.contract_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec!["Arrendamiento", "Laboral", "NDA", "Compraventa", "Servicios"]
        );
        assert_eq!(analyses[3].path, paths[3]);
    }

    #[tokio::test]
    async fn missing_file_fails_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = gemini_coordinator(rules_only()).unwrap();
        let err = analyze_files(&coordinator, &[dir.path().join("nope.txt")], 4)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("nope.txt"));
    }
}
