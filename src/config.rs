//! Configuration loading for CLI defaults.
//!
//! Precedence: command-line flag > environment variable > config file > default.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use crocodoc::HttpTransportConfig;
use crocodoc::transport::DEFAULT_BASE_URL;

use crate::cli::Cli;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "CROCODOC_API_TOKEN";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "CROCODOC_BASE_URL";
/// Environment variable overriding the connect timeout.
pub const CONNECT_TIMEOUT_ENV: &str = "CROCODOC_CONNECT_TIMEOUT_SECS";
/// Environment variable overriding the read timeout.
pub const READ_TIMEOUT_ENV: &str = "CROCODOC_READ_TIMEOUT_SECS";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

/// Accepted timeout range in seconds.
pub const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=3600;

/// Tokens shorter than this are masked entirely by `config show`.
const MIN_PARTIALLY_SHOWN_TOKEN_LEN: usize = 9;
const SHOWN_TOKEN_PREFIX_LEN: usize = 4;

/// `key = value` file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("read_timeout_secs", self.read_timeout_secs),
        ] {
            if let Some(value) = value {
                check_timeout(field, value)?;
            }
        }
        Ok(())
    }
}

fn check_timeout(field: &str, value: u64) -> Result<u64> {
    if TIMEOUT_RANGE.contains(&value) {
        Ok(value)
    } else {
        bail!(
            "Invalid value for `{field}`: {value}. Expected range: {}..={}",
            TIMEOUT_RANGE.start(),
            TIMEOUT_RANGE.end()
        )
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Tracing filter level for this setting.
    #[must_use]
    pub fn level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

impl FromStr for VerbositySetting {
    type Err = anyhow::Error;

    fn from_str(label: &str) -> Result<Self> {
        Ok(match label {
            "default" => Self::Default,
            "verbose" => Self::Verbose,
            "quiet" => Self::Quiet,
            "debug" => Self::Debug,
            _ => bail!("Expected one of: default, verbose, quiet, debug"),
        })
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// `$XDG_CONFIG_HOME/crocodoc/config.toml`, falling back to
/// `$HOME/.config/crocodoc/config.toml`.
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    let non_empty = |name: &str| env::var_os(name).filter(|value| !value.is_empty());
    let config_home = non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("crocodoc").join("config.toml"))
}

/// Reads a non-empty environment variable.
pub fn env_var_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Loads config from the default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = without_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let (key, value) = (key.trim(), value.trim());
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "api_token" => cfg.api_token = Some(quoted(value).with_context(invalid)?),
            "base_url" => cfg.base_url = Some(quoted(value).with_context(invalid)?),
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(seconds(value).with_context(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(seconds(value).with_context(invalid)?);
            }
            "verbosity" => {
                cfg.verbosity = Some(
                    quoted(value)
                        .and_then(|label| label.parse())
                        .with_context(invalid)?,
                );
            }
            unknown => bail!("Unknown configuration key: '{unknown}' on line {line_no}"),
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Cuts a `#` comment that is not inside a quoted value.
fn without_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let end = line
        .find(|ch: char| {
            if ch == '"' {
                in_quotes = !in_quotes;
            }
            ch == '#' && !in_quotes
        })
        .unwrap_or(line.len());
    &line[..end]
}

fn quoted(value: &str) -> Result<String> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
        .context("Expected double-quoted string")
}

fn seconds(value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("Expected a whole number of seconds, got '{value}'"))
}

/// Where an effective value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Flag,
    Env,
    File,
    Default,
}

impl ValueSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Env => "env",
            Self::File => "config file",
            Self::Default => "default",
        }
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_token: Option<String>,
    pub api_token_source: ValueSource,
    pub base_url: String,
    pub base_url_source: ValueSource,
    pub connect_timeout_secs: u64,
    pub connect_timeout_source: ValueSource,
    pub read_timeout_secs: u64,
    pub read_timeout_source: ValueSource,
}

impl Settings {
    /// Merges flags, environment and file config.
    ///
    /// `env_lookup` is injected so tests do not touch the process environment.
    ///
    /// # Errors
    ///
    /// Fails when a timeout environment variable is not a number in
    /// [`TIMEOUT_RANGE`].
    pub fn resolve(
        cli: &Cli,
        env_lookup: impl Fn(&str) -> Option<String>,
        file_config: Option<&FileConfig>,
    ) -> Result<Self> {
        let (api_token, api_token_source) = pick(
            non_blank(cli.token.clone()),
            non_blank(env_lookup(TOKEN_ENV)),
            non_blank(file_config.and_then(|cfg| cfg.api_token.clone())),
        );
        let (base_url, base_url_source) = pick(
            non_blank(cli.base_url.clone()),
            non_blank(env_lookup(BASE_URL_ENV)),
            non_blank(file_config.and_then(|cfg| cfg.base_url.clone())),
        );
        let (connect_timeout_secs, connect_timeout_source) = pick(
            cli.connect_timeout_secs,
            env_timeout(&env_lookup, CONNECT_TIMEOUT_ENV)?,
            file_config.and_then(|cfg| cfg.connect_timeout_secs),
        );
        let (read_timeout_secs, read_timeout_source) = pick(
            cli.read_timeout_secs,
            env_timeout(&env_lookup, READ_TIMEOUT_ENV)?,
            file_config.and_then(|cfg| cfg.read_timeout_secs),
        );

        Ok(Self {
            api_token,
            api_token_source,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            base_url_source,
            connect_timeout_secs: connect_timeout_secs.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            connect_timeout_source,
            read_timeout_secs: read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
            read_timeout_source,
        })
    }

    /// Transport settings for the library client.
    pub fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig::new(self.api_token.clone().unwrap_or_default())
            .with_base_url(self.base_url.clone())
            .with_timeouts(self.connect_timeout_secs, self.read_timeout_secs)
    }

    /// Token for display. Long tokens keep a short prefix; short ones are
    /// fully masked.
    pub fn masked_token(&self) -> String {
        match &self.api_token {
            None => "<unset>".to_string(),
            Some(token) if token.chars().count() < MIN_PARTIALLY_SHOWN_TOKEN_LEN => {
                "****".to_string()
            }
            Some(token) => {
                let visible: String = token.chars().take(SHOWN_TOKEN_PREFIX_LEN).collect();
                format!("{visible}****")
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_timeout(env_lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u64>> {
    env_lookup(name)
        .map(|raw| {
            seconds(&raw)
                .and_then(|value| check_timeout(name, value))
                .with_context(|| format!("Invalid environment variable {name}"))
        })
        .transpose()
}

fn pick<T>(flag: Option<T>, env: Option<T>, file: Option<T>) -> (Option<T>, ValueSource) {
    if let Some(value) = flag {
        (Some(value), ValueSource::Flag)
    } else if let Some(value) = env {
        (Some(value), ValueSource::Env)
    } else if let Some(value) = file {
        (Some(value), ValueSource::File)
    } else {
        (None, ValueSource::Default)
    }
}
