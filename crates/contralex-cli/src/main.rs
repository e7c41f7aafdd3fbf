mod batch;
mod display;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use contralex_core::AnalysisConfig;
use contralex_engine::{GeminiCoordinator, gemini_coordinator};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contralex", version, about = "Contract analysis with AI and rule-based fallback")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "CONTRALEX_CONFIG")]
    config: Option<PathBuf>,

    /// Never call the model; use the rule-based analyzer only
    #[arg(long, global = true, default_value_t = false)]
    rules_only: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one or more contract files
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print JSON instead of text cards
        #[arg(long)]
        json: bool,
    },
    /// Ask a question about a contract
    Ask {
        file: PathBuf,
        question: String,
        #[arg(long)]
        json: bool,
    },
    /// Detect the contract type
    Type { file: PathBuf },
    /// Executive summary of a contract
    Summary { file: PathBuf },
    /// Compare two contracts (AI only)
    Compare {
        first: PathBuf,
        second: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Extract key dates and deadlines (AI only)
    Dates {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Ask a general legal question with no contract (AI only)
    Legal { question: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("contralex v{}", env!("CARGO_PKG_VERSION"));

    tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, cancelling in-flight requests");
            bail!("interrupted")
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AnalysisConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if cli.rules_only {
        config.use_ai = false;
    }
    let coordinator = gemini_coordinator(config)?;

    match cli.command {
        Command::Analyze { files, json } => {
            let analyses =
                batch::analyze_files(&coordinator, &files, batch::MAX_CONCURRENT_FILES).await?;
            if json {
                let out: Vec<_> = analyses
                    .iter()
                    .map(|a| serde_json::json!({ "file": a.path.display().to_string(), "analysis": a.result }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for a in &analyses {
                    println!("{}", display::render_analysis(&a.path.display().to_string(), &a.result));
                }
            }
        }
        Command::Ask {
            file,
            question,
            json,
        } => {
            let text = batch::read_contract(&file).await?;
            let answers = coordinator.answer_questions(&text, &question).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&answers)?);
            } else {
                print!("{}", display::render_answers(&question, &answers));
            }
        }
        Command::Type { file } => {
            let text = batch::read_contract(&file).await?;
            println!("{}", coordinator.detect_type(&text).await);
        }
        Command::Summary { file } => {
            let text = batch::read_contract(&file).await?;
            println!("{}", coordinator.generate_summary(&text).await);
        }
        Command::Compare {
            first,
            second,
            json,
        } => {
            require_ai(&coordinator, "compare")?;
            let (a, b) = tokio::try_join!(batch::read_contract(&first), batch::read_contract(&second))?;
            let comparison = coordinator.ai().compare_contracts(&a, &b).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                print!("{}", display::render_comparison(&comparison));
            }
        }
        Command::Dates { file, json } => {
            require_ai(&coordinator, "dates")?;
            let text = batch::read_contract(&file).await?;
            let dates = coordinator.ai().extract_key_dates(&text).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&dates)?);
            } else {
                print!("{}", display::render_key_dates(&file.display().to_string(), &dates));
            }
        }
        Command::Legal { question } => {
            require_ai(&coordinator, "legal")?;
            println!("{}", coordinator.ai().answer_general_question(&question).await);
        }
    }

    Ok(())
}

/// Commands with no rule-based counterpart refuse to run in rules-only mode.
fn require_ai(coordinator: &GeminiCoordinator, command: &str) -> anyhow::Result<()> {
    if !coordinator.config().use_ai {
        bail!("'{command}' needs the AI backend; drop --rules-only or set use_ai = true");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["contralex", "analyze", "a.txt", "b.txt", "--rules-only", "--json"])
            .unwrap();
        assert!(cli.rules_only);
        match cli.command {
            Command::Analyze { files, json } => {
                assert_eq!(files.len(), 2);
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn analyze_requires_a_file() {
        assert!(Cli::try_parse_from(["contralex", "analyze"]).is_err());
    }

    #[test]
    fn compare_refuses_rules_only() {
        let config = AnalysisConfig {
            use_ai: false,
            ..AnalysisConfig::default()
        };
        let coordinator = gemini_coordinator(config).unwrap();
        let err = require_ai(&coordinator, "compare").unwrap_err();
        assert!(err.to_string().contains("--rules-only"));
    }

    #[test]
    fn clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
