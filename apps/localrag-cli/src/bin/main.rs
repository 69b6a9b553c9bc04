use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use localrag_core::config::{Config, Provider};
use localrag_core::types::QueryResult;
use localrag_pipeline::RagPipeline;

/// Offline-first question answering over a folder of text files.
#[derive(Debug, Parser)]
#[command(name = "localrag", version)]
struct Args {
    /// Your question
    query: String,
    /// Path to the data dir (overrides `data_dir` from config)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Top-k chunks
    #[arg(long)]
    k: Option<usize>,
    /// Answer provider: offline or openai
    #[arg(long)]
    provider: Option<Provider>,
    /// Chat model used by the openai provider
    #[arg(long)]
    model: Option<String>,
    /// Print JSON output
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOCALRAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn spinner(msg: &'static str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn render(res: &QueryResult) {
    println!("── RAG Answer ──────────────────────────────");
    println!("{}", res.answer);
    println!("\nTop Sources");
    println!("{:<5} {:<24} {:>5} {:>7}  Preview", "Rank", "Doc", "Chunk", "Score");
    for (i, s) in res.sources.iter().enumerate() {
        println!("{:<5} {:<24} {:>5} {:>7.3}  {}", i + 1, s.doc, s.chunk, s.score, s.preview);
    }
}

/// Index the corpus and answer `query`. The spinner is cleared whether or not
/// either step fails.
fn build_and_query(pipe: &mut RagPipeline, query: &str, k: usize, pb: Option<&ProgressBar>) -> localrag_core::Result<QueryResult> {
    let res = pipe.build().and_then(|()| {
        if let Some(pb) = pb { pb.set_message("Answering…"); }
        pipe.query(query, k)
    });
    if let Some(pb) = pb { pb.finish_and_clear(); }
    res
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut settings = Config::load()?.settings().context("Error loading config")?;
    if let Some(dir) = args.data { settings.data_dir = dir.to_string_lossy().into_owned(); }
    if let Some(provider) = args.provider { settings.answer.provider = provider; }
    if let Some(model) = args.model { settings.answer.delegated.model = model; }
    let k = args.k.unwrap_or(settings.retrieval.top_k);

    let mut pipe = RagPipeline::from_config(&settings).context("Error setting up pipeline")?;

    let pb = if args.json { None } else { Some(spinner("Indexing corpus…")?) };
    let res = build_and_query(&mut pipe, &args.query, k, pb.as_ref())
        .with_context(|| format!("Error answering from {}", pipe.data_dir().display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&res)?);
        return Ok(());
    }
    render(&res);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use localrag_core::config::RagConfig;
    use tempfile::TempDir;

    #[test]
    fn spinner_is_cleared_when_build_fails() {
        let tmp = TempDir::new().unwrap();
        let mut pipe = RagPipeline::new(tmp.path(), &RagConfig::default()).expect("pipeline");
        let pb = ProgressBar::hidden();
        assert!(build_and_query(&mut pipe, "anything", 3, Some(&pb)).is_err());
        assert!(pb.is_finished());
    }

    #[test]
    fn spinner_is_cleared_after_an_answer() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "RAG retrieves documents. It reduces hallucinations.").unwrap();
        std::fs::write(tmp.path().join("b.txt"), "TF-IDF is a classic retrieval method using term weights.").unwrap();
        let mut pipe = RagPipeline::new(tmp.path(), &RagConfig::default()).expect("pipeline");
        let pb = ProgressBar::hidden();
        let res = build_and_query(&mut pipe, "What does RAG do?", 2, Some(&pb)).expect("answer");
        assert_eq!(res.sources[0].doc, "a.txt");
        assert!(pb.is_finished());
    }
}
