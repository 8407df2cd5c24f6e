use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    ClientConfig, ClientContext, GenerateView, MutationState, Route, DEFAULT_SERVER_URL,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "VIDEO_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a video from a script and optionally download it.
    Generate(GenerateArgs),
    /// Print the client routes.
    Routes,
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    text: Option<String>,
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long, env = "VIDEO_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,
    /// Print the raw generation result instead of a summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    match args.command {
        Command::Routes => {
            for route in Route::ALL {
                println!("{route:?}\t{}", route.path());
            }
            Ok(())
        }
        Command::Generate(generate) => run_generate(&args.server_url, generate).await,
    }
}

async fn run_generate(server_url: &str, args: GenerateArgs) -> Result<()> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read script from {}", path.display()))?,
        (None, None) => bail!("either --text or --file is required"),
    };

    let download_dir = args.download_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let context = ClientContext::new(ClientConfig::new(server_url, download_dir)?);
    let mut page = context.generate_page();
    page.set_text(text);

    let state = page.generate().await?;
    if let MutationState::Error(failure) = &state {
        tracing::error!(status = ?failure.status(), "generation failed");
        bail!("generation failed: {failure}");
    }
    let result = state
        .result()
        .ok_or_else(|| anyhow!("generation settled without a result"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(result.as_ref())?);
    } else {
        println!("{}", result.message);
        println!("Execution time: {:.2}s", result.execution_time);
        if !result.keywords.is_empty() {
            println!("Keywords: {}", result.keywords.join(", "));
        }
        if let GenerateView::Video { url, name } = page.view() {
            println!("Video: {name} <{url}>");
        }
    }

    if args.download_dir.is_some() {
        let saved = page
            .save(&context.downloader, &context.config.download_dir)
            .await?
            .ok_or_else(|| anyhow!("no video to download"))?;
        tracing::info!(path = %saved.display(), "video downloaded");
        println!("Saved video to {}", saved.display());
    }

    Ok(())
}
