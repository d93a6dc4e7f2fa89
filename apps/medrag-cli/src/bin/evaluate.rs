use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use medrag_cli::{init, load_settings};
use medrag_core::corpus::SplitFiles;
use medrag_core::types::Stage;
use medrag_embed::get_default_embedder;
use medrag_generate::get_default_generator;
use medrag_pipeline::RagContext;

#[derive(Parser, Debug)]
#[command(name = "medrag-evaluate")]
#[command(about = "Answer the held-out questions and score them against the gold answers")]
struct Args {
    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluate only the first N held-out questions
    #[arg(long)]
    limit: Option<usize>,

    /// Write the full report as JSON [default: paths.report_path, if set]
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(limit) = args.limit {
        anyhow::ensure!(limit > 0, "--limit must be greater than 0");
        settings.evaluation.limit = Some(limit);
    }
    let output = args.output.or_else(|| settings.paths.report_path.clone());

    let (questions, references) = SplitFiles::from(&settings.paths)
        .load_test_set()
        .with_context(|| format!("{}: loading held-out set", Stage::Split))?;

    let embedder = get_default_embedder(&settings.models).context("loading embedding model")?;
    let generator = get_default_generator(&settings.models).context("creating generation client")?;
    let ctx = RagContext::load(settings, embedder, generator)
        .with_context(|| format!("{}: loading index and passages", Stage::Index))?;

    let run = ctx
        .evaluate(&questions, &references)
        .await
        .with_context(|| format!("{}: scoring answers", Stage::Evaluate))?;

    info!(scored = run.records.len(), attempted = run.attempted, bleu = run.report.bleu.bleu, "evaluation finished");
    if !run.failures.is_empty() {
        warn!(failed = run.failures.len(), "some records were not scored");
    }
    println!("Evaluation Results\n==================");
    println!("Scored {} of {} questions", run.records.len(), run.attempted);
    let scores = run.report.scores();
    for name in ["BLEU-1", "BLEU-2", "BLEU-3", "BLEU-4", "BLEU", "ROUGE-L", "METEOR", "Token F1", "Exact Match"] {
        if let Some(value) = scores.get(name) {
            println!("{name:<12} {value:.4}");
        }
    }
    if !run.failures.is_empty() {
        println!("\n{} failed records:", run.failures.len());
        for failure in &run.failures {
            println!("  {failure}");
        }
    }

    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&run)?;
        fs::write(&path, json).with_context(|| format!("writing report {}", path.display()))?;
        info!(path = %path.display(), "report written");
        println!("\nReport written to {}", path.display());
    }
    Ok(())
}
