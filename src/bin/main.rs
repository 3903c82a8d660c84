use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tldr_lens::backend::Orchestrator;
use tldr_lens::config::{ConfigStore, FileConfigStore, MemoryConfigStore};
use tldr_lens::engine::ContentEngine;
use tldr_lens::ops::telemetry;
use tldr_lens::AnalysisBackend;

#[derive(Parser)]
#[command(name = "tldr-lens")]
#[command(version)]
#[command(about = "Extract, summarize and highlight a saved HTML page", long_about = None)]
struct Args {
    /// Saved HTML page to analyze
    #[arg(value_name = "PAGE")]
    page: PathBuf,

    /// Address reported with the extracted content
    #[arg(long)]
    url: Option<String>,

    /// Settings file holding the persisted configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

async fn run<B: AnalysisBackend>(html: &str, url: Option<String>, backend: B) -> ExitCode {
    let mut engine = ContentEngine::new(scraper::Html::parse_document(html), backend);
    if let Some(url) = url {
        engine = engine.with_url(url);
    }

    println!("{}", engine.extract().to_json_pretty());

    let analysis = match engine.analyze_page().await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::error!(error = %e, "analysis failed");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", engine.highlight_content(&analysis).to_json_pretty());
    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let args = Args::parse();

    let html = match std::fs::read_to_string(&args.page) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(path = %args.page.display(), error = %e, "cannot read page");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(path = %args.page.display(), "TLDR Lens analyzing page");

    match args.config {
        Some(path) => {
            let store = FileConfigStore::new(path);
            if let Err(e) = store.load() {
                tracing::error!(error = %e, "cannot load configuration");
                return ExitCode::FAILURE;
            }
            run(&html, args.url, Orchestrator::new(store)).await
        }
        None => run(&html, args.url, Orchestrator::new(MemoryConfigStore::default())).await,
    }
}
