#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! `echocast`: the CLI binary that loads configuration, wires the library
//! crates together, and runs either the HTTP server (with its attached
//! trigger-coordinated worker) or a single worker drain pass
//! (SPEC_FULL.md §11.5).

mod config;
mod prompt;
mod wiring;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use echocast_core::SystemClock;
use echocast_engine::{
    HttpFetcher, PipelineDeps, RssFeedGenerator, TriggerCoordinator, WebhookNotifier, Worker,
};
use echocast_server::{AppState, ImageQrCodeEncoder};
use echocast_storage::{DataRoot, EpisodeCatalog, JobStatusStore, QueueStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "echocast", about = "Narrated-article podcast pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP ingest server plus the trigger-coordinated worker in
    /// one process (spec.md §4.5, the default long-running mode).
    Serve {
        #[arg(long, default_value = "config.yaml")]
        config: PathBuf,
    },
    /// Run a single worker drain pass and exit (spec.md §4.5.2's
    /// "equivalent of invoking the worker as a subprocess with `--once`").
    /// There is no continuous-loop mode — `serve`'s trigger coordinator is
    /// the only long-running worker driver.
    Worker {
        #[arg(long, default_value = "config.yaml")]
        config: PathBuf,
        #[arg(long)]
        once: bool,
    },
    /// Backfill an Episode Catalog from a legacy flat audio directory
    /// (spec.md §4.4 "Migration helper").
    MigrateEpisodes {
        #[arg(long, default_value = "config.yaml")]
        config: PathBuf,
        #[arg(long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config } => serve(&config).await,
        Command::Worker { config, once } => {
            if !once {
                anyhow::bail!("continuous worker mode is not supported; pass --once");
            }
            run_worker_once(&config).await
        }
        Command::MigrateEpisodes { config, user } => migrate_episodes(&config, &user).await,
    }
}

fn load_config(path: &PathBuf) -> Result<Config> {
    Config::load(path).with_context(|| format!("loading config from {}", path.display()))
}

fn prompt_template(config: &Config) -> Result<Option<String>> {
    match &config.prompt_templates {
        Some(path) => {
            let templates = prompt::PromptTemplates::load(path)
                .with_context(|| format!("loading prompt templates from {}", path.display()))?;
            Ok(Some(templates.as_request_template()))
        }
        None => Ok(None),
    }
}

async fn build_deps(config: &Config) -> Result<PipelineDeps<SystemClock>> {
    let root = DataRoot::new(config.data_root.clone());
    let (llm_registry, tts_registry) = wiring::build_registries(config).await?;

    Ok(PipelineDeps {
        root: root.clone(),
        queue: QueueStore::new(root.clone()),
        job_status: JobStatusStore::new(root.clone()),
        episodes: EpisodeCatalog::new(root),
        llm_registry,
        tts_registry,
        fetcher: Arc::new(HttpFetcher::new()),
        webhook: config.webhook_url.clone().map(WebhookNotifier::new),
        prompt_template: prompt_template(config)?,
        clock: SystemClock,
    })
}

async fn serve(config_path: &PathBuf) -> Result<()> {
    let config = load_config(config_path)?;
    let deps = build_deps(&config).await?;
    let feed = Arc::new(RssFeedGenerator { base_url: config.base_url.clone() });
    let worker = Arc::new(Worker::new(deps, feed));

    let default_llm_choice: Arc<str> =
        config.llm_providers.first().map(|p| format!("{}:{}", p.vendor, p.model)).unwrap_or_else(|| "auto".to_string()).into();
    let default_tts_choice: Arc<str> =
        config.tts_providers.first().map(|p| p.vendor.clone()).unwrap_or_else(|| "auto".to_string()).into();

    let state = AppState {
        worker,
        trigger: TriggerCoordinator::new(),
        qrcode: Arc::new(ImageQrCodeEncoder::default()),
        base_url: config.base_url.clone().into(),
        default_llm_choice,
        default_tts_choice,
        default_need_summary: config.need_summary,
        max_retries: config.max_retries,
    };

    let app = echocast_server::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "echocast serving");
    axum::serve(listener, app).await.context("http server failed")?;
    Ok(())
}

async fn run_worker_once(config_path: &PathBuf) -> Result<()> {
    let config = load_config(config_path)?;
    let deps = build_deps(&config).await?;
    let feed = Arc::new(RssFeedGenerator { base_url: config.base_url.clone() });
    let worker = Worker::new(deps, feed);

    match worker.drain_once().await {
        Ok(processed) => {
            tracing::info!(processed, "drain pass complete");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "drain pass did not run");
            Ok(())
        }
    }
}

async fn migrate_episodes(config_path: &PathBuf, user: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let root = DataRoot::new(config.data_root.clone());
    let catalog = EpisodeCatalog::new(root);
    let adopted = catalog.migrate_legacy(user).context("migrating legacy episodes")?;
    tracing::info!(%user, adopted, "legacy episode migration complete");
    Ok(())
}
