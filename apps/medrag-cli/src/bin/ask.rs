use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use medrag_cli::{init, load_settings};
use medrag_core::types::Stage;
use medrag_embed::get_default_embedder;
use medrag_generate::get_default_generator;
use medrag_pipeline::RagContext;

#[derive(Parser, Debug)]
#[command(name = "medrag-ask")]
#[command(about = "Answer one medical question from the indexed corpus")]
struct Args {
    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Question to answer
    #[arg(long, short)]
    query: String,

    /// Also print the retrieved passages
    #[arg(long)]
    show_context: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    let embedder = get_default_embedder(&settings.models).context("loading embedding model")?;
    let generator = get_default_generator(&settings.models).context("creating generation client")?;
    let ctx = RagContext::load(settings, embedder, generator)
        .with_context(|| format!("{}: loading index and passages", Stage::Index))?;

    let answer = ctx.answer(&args.query).await.with_context(|| format!("answering {:?}", args.query))?;

    info!(passages = answer.passages.len(), chars = answer.text.len(), "answered");
    println!("Question: {}", answer.question);
    println!("Retrieved {} passages", answer.passages.len());
    if args.show_context {
        for (rank, p) in answer.passages.iter().enumerate() {
            println!("  {}. [{:.4}] {}", rank + 1, p.distance, p.text);
        }
    }
    println!("Answer: {}", answer.text);
    Ok(())
}
