use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat with an OpenAI model from the terminal", long_about = None)]
pub struct Args {
    /// Path to the config file [default: ~/.gpterm/config.yaml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model to use, overriding the config file
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Write debug-level logs
    #[arg(short, long)]
    pub verbose: bool,
}
