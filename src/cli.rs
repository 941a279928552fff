//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crocodoc::{DocumentOptions, Filter};

/// Download documents, extracted text and thumbnails from Crocodoc.
#[derive(Parser)]
#[command(name = "crocodoc")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// API token (overrides CROCODOC_API_TOKEN and the config file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL (overrides CROCODOC_BASE_URL and the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// TCP connect timeout in seconds (overrides CROCODOC_CONNECT_TIMEOUT_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(crate::config::TIMEOUT_RANGE))]
    pub connect_timeout_secs: Option<u64>,

    /// Whole-request timeout in seconds (overrides CROCODOC_READ_TIMEOUT_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(crate::config::TIMEOUT_RANGE))]
    pub read_timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

// Hand-written so the token never reaches debug logs.
impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("command", &self.command)
            .finish()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a document (original file, or PDF with --pdf)
    Document(DocumentArgs),
    /// Download the text extracted from a document
    Text(TextArgs),
    /// Download a document thumbnail
    Thumbnail(ThumbnailArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Document UUID
    pub uuid: String,

    /// Download the PDF rendition instead of the original file
    #[arg(long)]
    pub pdf: bool,

    /// Include annotations
    #[arg(long)]
    pub annotated: bool,

    /// Only include annotations by these user IDs (repeatable or comma-separated)
    #[arg(long = "filter", value_delimiter = ',')]
    pub filter: Vec<String>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DocumentArgs {
    /// Maps flags onto library options.
    pub fn options(&self) -> DocumentOptions {
        DocumentOptions {
            pdf: self.pdf,
            annotated: self.annotated,
            filter: if self.filter.is_empty() {
                Filter::None
            } else {
                Filter::Many(self.filter.clone())
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct TextArgs {
    /// Document UUID
    pub uuid: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ThumbnailArgs {
    /// Document UUID
    pub uuid: String,

    /// Thumbnail width in pixels (applied only together with --height)
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// Thumbnail height in pixels (applied only together with --width)
    #[arg(long, allow_negative_numbers = true)]
    pub height: Option<i64>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
