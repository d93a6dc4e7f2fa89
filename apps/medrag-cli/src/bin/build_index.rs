use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use medrag_cli::{init, load_settings};
use medrag_core::corpus::load_corpus_jsonl;
use medrag_core::types::Stage;
use medrag_embed::get_default_embedder;
use medrag_pipeline::build_artifacts;

#[derive(Parser, Debug)]
#[command(name = "medrag-build-index")]
#[command(about = "Split the corpus, persist the split and build the retrieval index")]
struct Args {
    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Corpus of {question, answer} JSON lines [default: <data_dir>/corpus.jsonl]
    #[arg(long)]
    corpus: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    let corpus_path = args.corpus.unwrap_or_else(|| settings.paths.data_dir.join("corpus.jsonl"));
    let corpus = load_corpus_jsonl(&corpus_path)
        .with_context(|| format!("{}: loading corpus {}", Stage::Split, corpus_path.display()))?;
    let embedder = get_default_embedder(&settings.models)
        .with_context(|| format!("{}: loading embedding model {}", Stage::Index, settings.models.embedding_model))?;

    let summary = build_artifacts(&settings, &corpus, embedder.as_ref())
        .with_context(|| format!("{}: building artifacts", Stage::Index))?;

    info!(
        corpus = corpus.len(),
        train = summary.split.train_indices.len(),
        test = summary.split.test_indices.len(),
        vectors = summary.vectors,
        dim = summary.dim,
        "build finished"
    );
    println!("Index built\n===========");
    println!("Corpus:          {} ({} records)", corpus_path.display(), corpus.len());
    println!("Train / test:    {} / {}", summary.split.train_indices.len(), summary.split.test_indices.len());
    println!("Index:           {} ({} vectors, dim {})", summary.index_path.display(), summary.vectors, summary.dim);
    println!("Train answers:   {}", summary.split_files.train_answers.display());
    println!("Test questions:  {}", summary.split_files.test_questions.display());
    println!("Test answers:    {}", summary.split_files.test_answers.display());
    Ok(())
}
