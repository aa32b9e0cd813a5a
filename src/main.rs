use std::path::PathBuf;

use eyre::{Result, eyre};
use log::{debug, info};

mod cli;

use cli::{Cli, Command, OutputFormat};
use vidprobe::config::{API_KEY_ENV, Config};
use vidprobe::server::AppState;
use vidprobe::youtube::YouTubeClient;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("vidprobe.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vidprobe")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = if std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty()) {
        format!("  \x1b[32m✅\x1b[0m {API_KEY_ENV}")
    } else {
        format!("  \x1b[31m❌\x1b[0m {API_KEY_ENV}  (not set, use --api-key or api_key in the config file)")
    };

    let log_path = log_dir().join("vidprobe.log");

    format!(
        "\nCREDENTIALS:\n{key_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        vidprobe::config::config_path().display(),
        log_path.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_default();

    let env_key = std::env::var(API_KEY_ENV).ok();
    let (api_key, key_source) = config
        .resolve_api_key(cli.api_key.as_deref(), env_key.as_deref())
        .ok_or_else(|| eyre!("no YouTube API key: pass --api-key, set {API_KEY_ENV}, or add api_key to the config file"))?;

    if cli.verbose {
        let config_path = vidprobe::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("API key from: {key_source}");
        eprintln!("API base: {}", config.api_base_url());
    }
    debug!("Using API key from {key_source}");

    let youtube = YouTubeClient::new(reqwest::Client::new(), api_key).with_base_url(config.api_base_url());

    match cli.command {
        Command::Analyze {
            url,
            no_transcript,
            format,
            output,
        } => {
            let resp = vidprobe::analyze::analyze_url(&youtube, url.trim(), !no_transcript)
                .await
                .map_err(|e| match e {
                    vidprobe::analyze::AnalyzeError::Upstream(detail) => {
                        eyre!("Upstream returned malformed data: {detail}")
                    }
                    e => eyre!("{e}"),
                })?;

            if cli.verbose {
                eprintln!(
                    "Video: {} ({})\nTranscript: {}",
                    resp.metadata.title, resp.video_id, resp.transcript.kind,
                );
            }

            let rendered = match format {
                OutputFormat::Json => vidprobe::output::render_json(&resp)?,
                OutputFormat::Pretty => vidprobe::output::render_pretty(&resp)?,
                OutputFormat::Text => vidprobe::output::render_text(&resp),
            };

            if let Some(ref path) = output {
                std::fs::write(path, &rendered)?;
                if cli.verbose {
                    eprintln!("Output written to: {}", path.display());
                }
            } else {
                println!("{rendered}");
            }
        }
        Command::Serve { bind } => {
            let addr = config.bind_addr(bind.as_deref())?;
            if cli.verbose {
                eprintln!("Listening on {addr}");
            }
            vidprobe::server::serve(addr, AppState { youtube }).await?;
        }
    }

    Ok(())
}
