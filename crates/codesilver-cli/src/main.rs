use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codesilver_core::export::{AnalysisExport, BatchAnalysisExport};
use codesilver_core::scenarios::EXAMPLE_SCENARIOS;
use codesilver_core::{Analyzer, KnowledgeBase, RiskWeights};

#[derive(Parser)]
#[command(name = "codesilver")]
#[command(about = "Clinical note analyzer for utilization review and denial risk")]
struct Cli {
    /// Knowledge base JSON file (built-in tables when omitted)
    #[arg(long, global = true, env = "CODESILVER_KNOWLEDGE_BASE")]
    knowledge_base: Option<PathBuf>,

    /// Risk weight overrides as JSON
    #[arg(long, global = true, env = "CODESILVER_RISK_WEIGHTS")]
    risk_weights: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze clinical notes (reads stdin when no files are given)
    Analyze {
        /// Note files, one note per file
        files: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write the export here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Analyze the built-in example scenarios
    Scenarios {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the active knowledge base as JSON
    #[command(name = "knowledge-base")]
    ShowKnowledgeBase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

/// A note and the identifier it is exported under.
struct Note {
    id: String,
    text: String,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("codesilver=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let analyzer = build_analyzer(cli.knowledge_base.as_deref(), cli.risk_weights.as_deref())?;

    match cli.command {
        Commands::Analyze { files, format, output } => {
            let notes = read_notes(&files)?;
            let batch = export_notes(&analyzer, notes)?;
            emit(output.as_deref(), &render(&batch, format)?)?;
        }
        Commands::Scenarios { format, output } => {
            let notes = EXAMPLE_SCENARIOS
                .iter()
                .map(|s| Note {
                    id: s.name.to_string(),
                    text: s.text.to_string(),
                })
                .collect();
            let batch = export_notes(&analyzer, notes)?;
            emit(output.as_deref(), &render(&batch, format)?)?;
        }
        Commands::ShowKnowledgeBase => {
            println!("{}", analyzer.knowledge_base().to_json()?);
        }
    }

    Ok(())
}

fn build_analyzer(knowledge_base: Option<&Path>, risk_weights: Option<&Path>) -> anyhow::Result<Analyzer> {
    let kb = match knowledge_base {
        Some(path) => KnowledgeBase::from_path(path)
            .with_context(|| format!("Failed to load knowledge base from {}", path.display()))?,
        None => KnowledgeBase::builtin().context("Built-in knowledge base is invalid")?,
    };

    let mut analyzer = Analyzer::new(Arc::new(kb));

    if let Some(path) = risk_weights {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read risk weights from {}", path.display()))?;
        let weights: RiskWeights = serde_json::from_str(&json)
            .with_context(|| format!("Invalid risk weights in {}", path.display()))?;
        analyzer = analyzer.with_weights(weights);
    }

    Ok(analyzer)
}

fn read_notes(files: &[PathBuf]) -> anyhow::Result<Vec<Note>> {
    if files.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read note from stdin")?;
        return Ok(vec![Note {
            id: "stdin".to_string(),
            text,
        }]);
    }

    files
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read note {}", path.display()))?;
            Ok(Note {
                id: path.display().to_string(),
                text,
            })
        })
        .collect()
}

fn export_notes(analyzer: &Analyzer, notes: Vec<Note>) -> anyhow::Result<BatchAnalysisExport> {
    let texts: Vec<&str> = notes.iter().map(|n| n.text.as_str()).collect();
    let assessments = analyzer.assess_batch(&texts);

    let exports = notes
        .iter()
        .zip(assessments)
        .map(|(note, assessment)| {
            tracing::info!(
                note = %note.id,
                condition = %assessment.analysis.condition.name,
                risk_score = assessment.risk_score,
                "Note analyzed"
            );
            AnalysisExport::from_assessment(&note.id, assessment)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BatchAnalysisExport::new(exports))
}

fn render(batch: &BatchAnalysisExport, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(batch.to_json()?),
        Format::Csv => Ok(batch.to_csv()),
    }
}

fn emit(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Export written");
        }
        None => println!("{}", content),
    }
    Ok(())
}
