use clap::Parser;
use std::env;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod app;
mod chat;
mod cli;
mod clipboard;
mod commands;
mod config;
mod core;
mod crawl;
mod display;
mod extract;
mod highlight;
mod history;
mod input;
mod providers;
mod snippets;

use crate::app::Application;
use crate::cli::Args;
use crate::config::{API_KEY_ENV, Config, prompt_for_api_key};
use crate::core::error::GptermError;
use crate::providers::openai::OpenAIProvider;

/// Logs go to a daily file so they never interleave with streamed output.
fn init_logging(verbose: bool) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(Config::log_dir(), "gpterm.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = if verbose { "gpterm=debug" } else { "gpterm=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter),
        )
        .init();

    guard
}

async fn run(args: Args) -> Result<(), GptermError> {
    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;

    if config.resolve_api_key(env::var(API_KEY_ENV).ok()).is_none() {
        prompt_for_api_key(&mut config, &config_path)?;
    }
    config.apply_overrides(args.model, args.base_url);
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| GptermError::Config("No API key configured".to_string()))?;

    tracing::info!(config = %config_path.display(), model = %config.model, "configuration loaded");

    let provider = OpenAIProvider::new(config.base_url.clone(), &api_key, config.model.clone())?;
    Application::new(config, Box::new(provider)).run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let guard = init_logging(args.verbose);

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "fatal");
        eprintln!("{}", display::format_error(&e));
        drop(guard);
        std::process::exit(1);
    }
}
