use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
    Text,
}

#[derive(Parser)]
#[command(
    name = "vidprobe",
    about = "YouTube video metadata and caption aggregator",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube Data API key (overrides YOUTUBE_API_KEY and the config file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Show config and credential details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a single video and print the result
    Analyze {
        /// YouTube video URL (youtube.com/watch?v=ID or youtu.be/ID)
        url: String,

        /// Skip caption retrieval
        #[arg(long)]
        no_transcript: bool,

        /// Output format: json (default), pretty, text
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve POST /analyze_social_video over HTTP
    Serve {
        /// Address to listen on (default 127.0.0.1:8787)
        #[arg(short, long)]
        bind: Option<String>,
    },
}
