//! CLI entry point for the Crocodoc download tool.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use crocodoc::DownloadClient;
use tracing::{debug, info};

mod cli;
mod config;

use cli::{Cli, Command, ConfigCommand};
use config::{LoadedConfig, Settings, VerbositySetting};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let loaded = config::load_default_file_config()?;
    init_tracing(default_level(&cli, loaded.config.as_ref().and_then(|cfg| cfg.verbosity)));
    debug!(?cli, config_path = ?loaded.path, "CLI arguments parsed");

    let settings = Settings::resolve(&cli, config::env_var_non_empty, loaded.config.as_ref())?;

    if let Command::Config { command } = &cli.command {
        match command {
            ConfigCommand::Show => print_config(&loaded, &settings),
        }
        return Ok(());
    }

    let client = DownloadClient::from_config(settings.transport_config())
        .context("Failed to set up Crocodoc client")?;

    let (bytes, output) = match &cli.command {
        Command::Document(args) => (
            client.document(&args.uuid, &args.options()).await?,
            args.output.as_deref(),
        ),
        Command::Text(args) => (client.text(&args.uuid).await?, args.output.as_deref()),
        Command::Thumbnail(args) => (
            client.thumbnail(&args.uuid, args.width, args.height).await?,
            args.output.as_deref(),
        ),
        Command::Config { .. } => return Ok(()),
    };

    write_output(&bytes, output).await
}

/// Priority: `RUST_LOG` > -q > -v > config file verbosity > info.
fn default_level(cli: &Cli, file_verbosity: Option<VerbositySetting>) -> &'static str {
    if cli.quiet {
        "error"
    } else if cli.verbose > 0 {
        match cli.verbose {
            1 => "debug",
            _ => "trace",
        }
    } else {
        file_verbosity.map_or("info", VerbositySetting::level)
    }
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

async fn write_output(bytes: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, bytes)
                .await
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "Saved download");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

fn print_config(loaded: &LoadedConfig, settings: &Settings) {
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded.config.is_some() {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!(
        "api_token = {} ({})",
        settings.masked_token(),
        settings.api_token_source.as_str()
    );
    println!(
        "base_url = {} ({})",
        settings.base_url,
        settings.base_url_source.as_str()
    );
    println!(
        "connect_timeout_secs = {} ({})",
        settings.connect_timeout_secs,
        settings.connect_timeout_source.as_str()
    );
    println!(
        "read_timeout_secs = {} ({})",
        settings.read_timeout_secs,
        settings.read_timeout_source.as_str()
    );
}
