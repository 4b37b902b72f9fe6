//! ragcheck CLI - run self-assessment suites against the RAG pipeline
//!
//! # Commands
//!
//! ```bash
//! # Run every built-in suite
//! ragcheck assess
//!
//! # Run selected suites from a file, as JSON, failing on any lost point
//! ragcheck assess --suite-file suites.toml --suite baseline --json --strict
//!
//! # Ask a single question against a suite's knowledge base
//! ragcheck ask "What is the highest mountain?" -k 3
//!
//! # List available suites
//! ragcheck suites
//! ```

mod report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ragcheck_lib::{
    assess::Assessor,
    embed::{EmbedModel, Embedder, FastEmbedder},
    extract::{AnswerExtractor, RerankExtractor},
    search::Retriever,
    suite::{builtin_suites, load_suites, passages_from_text, select_suites, Suite},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ragcheck")]
#[command(about = "Single-passage RAG with a built-in self-assessment harness")]
#[command(version)]
struct Cli {
    /// Embedding model: "minilm", "bge-small" or "bge-large"
    #[arg(short, long, global = true, default_value = "minilm", value_parser = parse_model)]
    model: EmbedModel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run assessment suites and report scores
    Assess {
        /// TOML file with [[suite]] tables (defaults to the built-in suites)
        #[arg(long)]
        suite_file: Option<PathBuf>,

        /// Only run these suites, in this order (repeatable)
        #[arg(short, long)]
        suite: Vec<String>,

        /// Print reports as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Exit with an error unless every suite scores full marks
        #[arg(long)]
        strict: bool,
    },

    /// Answer one question from a knowledge base
    Ask {
        /// The question to answer
        question: String,

        /// Use this suite's passages as the knowledge base
        #[arg(short, long, default_value = "baseline", conflicts_with = "passages_file")]
        suite: String,

        /// TOML file with [[suite]] tables (defaults to the built-in suites)
        #[arg(long, conflicts_with = "passages_file")]
        suite_file: Option<PathBuf>,

        /// Plain text knowledge base, one passage per paragraph
        #[arg(long)]
        passages_file: Option<PathBuf>,

        /// Number of ranked passages to show
        #[arg(short, long, default_value = "3")]
        k: usize,
    },

    /// List available suites
    Suites {
        /// TOML file with [[suite]] tables (defaults to the built-in suites)
        #[arg(long)]
        suite_file: Option<PathBuf>,
    },
}

fn parse_model(s: &str) -> std::result::Result<EmbedModel, String> {
    s.parse().map_err(|e: ragcheck_lib::Error| e.to_string())
}

fn load(suite_file: Option<&Path>) -> Result<Vec<Suite>> {
    let suites = match suite_file {
        Some(path) => load_suites(path)?,
        None => builtin_suites()?,
    };
    Ok(suites)
}

fn load_passages(
    suite_file: Option<&Path>,
    suite: &str,
    passages_file: Option<&Path>,
) -> Result<Vec<String>> {
    if let Some(path) = passages_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading passages from '{}'", path.display()))?;
        return Ok(passages_from_text(&text));
    }

    let mut selected = select_suites(load(suite_file)?, &[suite.to_string()])?;
    Ok(selected.remove(0).passages)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess {
            suite_file,
            suite,
            json,
            strict,
        } => {
            let suites = select_suites(load(suite_file.as_deref())?, &suite)?;

            if !json {
                println!("Loading {} and reranker models...", cli.model);
            }
            let embedder = FastEmbedder::new(cli.model)?;
            let extractor = RerankExtractor::new()?;
            let mut assessor = Assessor::new(embedder, extractor);

            let mut reports = Vec::with_capacity(suites.len());
            for suite in &suites {
                // every suite gets a store of its own
                let store = assessor.index(suite.passages.iter().cloned())?;
                info!(suite = %suite.name, passages = store.len(), "assessing suite");
                let report = assessor.assess(&suite.cases, &store);

                if !json {
                    report::print_report(suite, &report);
                }
                reports.push(report);
            }

            if json {
                let out: Vec<_> = suites
                    .iter()
                    .zip(&reports)
                    .map(|(suite, report)| serde_json::json!({ "suite": suite.name, "report": report }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            }

            if strict && !reports.iter().all(|r| r.is_perfect()) {
                let earned: u32 = reports.iter().map(|r| r.points_earned()).sum();
                let possible: u32 = reports.iter().map(|r| r.points_possible()).sum();
                bail!("assessment scored {earned} / {possible}");
            }
        }

        Commands::Ask {
            question,
            suite,
            suite_file,
            passages_file,
            k,
        } => {
            let passages = load_passages(suite_file.as_deref(), &suite, passages_file.as_deref())?;

            println!("Loading {}...", cli.model);
            let mut retriever = Retriever::new(FastEmbedder::new(cli.model)?);
            let store = retriever.index(passages)?;
            println!(
                "Indexed {} passages with {} ({} dimensions)",
                store.len(),
                retriever.embedder().kind(),
                retriever.embedder().dimension()
            );

            let ranked = retriever.rank(&question, &store, k.max(1))?;
            println!("\n=== Retrieved ===\n");
            for (i, hit) in ranked.iter().enumerate() {
                println!("#{} [passage {}] (score: {:.4})", i + 1, hit.index, hit.score);
                println!("{}\n", hit.passage);
            }

            let best = ranked.first().context("no passage retrieved")?;
            println!("Loading reranker model...");
            let mut extractor = RerankExtractor::new()?;
            let answer = extractor.extract(&question, best.passage)?;

            println!("\n=== Answer ({}) ===\n", extractor.model_name());
            match answer.confidence {
                Some(confidence) => println!("{} (confidence: {confidence:.4})", answer.text),
                None => println!("{}", answer.text),
            }
        }

        Commands::Suites { suite_file } => {
            let suites = load(suite_file.as_deref())?;
            for suite in &suites {
                println!(
                    "{:<12} {} passages, {} cases{}",
                    suite.name,
                    suite.passages.len(),
                    suite.cases.len(),
                    suite
                        .description
                        .as_deref()
                        .map(|d| format!("  - {d}"))
                        .unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}
