use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use gif_widget::{ObjectUrlStore, WidgetController, WidgetSettings, WidgetView};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Look up a phrase and save its sign video as a looping GIF")]
struct Args {
    phrase: String,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    ffmpeg_path: Option<PathBuf>,
    #[arg(long)]
    work_dir: Option<PathBuf>,
    #[arg(long, default_value = "sign.gif")]
    output: PathBuf,
}

/// Prints what a page would show.
struct TerminalView;

impl WidgetView for TerminalView {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn set_gif_source(&self, src: &str) {
        info!(src, "gif source set");
    }

    fn show_gif(&self) {}

    fn hide_video(&self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = WidgetSettings::from_env();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(ffmpeg_path) = args.ffmpeg_path {
        settings.ffmpeg_path = ffmpeg_path;
    }
    if let Some(work_dir) = args.work_dir {
        settings.work_dir = work_dir;
    }

    let urls = Arc::new(ObjectUrlStore::new());
    let controller = WidgetController::from_settings(&settings, urls.clone(), Arc::new(TerminalView))?;

    // The controller already alerted; the exit status carries the failure.
    let gif_url = controller.on_search_click(&args.phrase).await?;
    let blob = urls
        .resolve(&gif_url)
        .ok_or_else(|| anyhow!("object url {gif_url} vanished before it was saved"))?;
    tokio::fs::write(&args.output, &blob.bytes[..])
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("wrote {} ({} bytes)", args.output.display(), blob.len());
    Ok(())
}
