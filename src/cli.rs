//! Command-line interface parsing for the country directory
//!
//! This module handles parsing of CLI arguments using clap. A positional
//! country code opens straight into that country's detail view; `--region`
//! and `--search` pre-apply listing filters.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::{Region, DEFAULT_BASE_URL};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified region name is not recognized
    #[error("Invalid region: '{0}'. Valid regions: africa, americas, asia, europe, oceania")]
    InvalidRegion(String),

    /// The country code is not two or three ASCII letters
    #[error("Invalid country code: '{0}'. Expected a 2 or 3 letter code such as ESP or FR")]
    InvalidCode(String),
}

/// Browse the countries of the world from the terminal
#[derive(Parser, Debug)]
#[command(name = "countrydir")]
#[command(about = "Browse, search, and filter the countries of the world")]
#[command(version)]
pub struct Cli {
    /// Open directly on the detail view of this country (e.g. ESP, CAN, JP)
    #[arg(value_name = "CODE")]
    pub code: Option<String>,

    /// Start with the list filtered to one region
    ///
    /// Valid regions: africa, americas, asia, europe, oceania
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Start with a search query applied to the list
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Root URL of the REST Countries API
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Write logs to this file instead of the default cache location
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Country to open on the detail view once the list has loaded
    pub initial_code: Option<String>,
    /// Region filter to apply once the list has loaded
    pub initial_region: Option<Region>,
    /// Search query to apply once the list has loaded
    pub initial_search: Option<String>,
    /// API root URL
    pub api_url: String,
    /// Explicit log file path
    pub log_file: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_code: None,
            initial_region: None,
            initial_search: None,
            api_url: DEFAULT_BASE_URL.to_string(),
            log_file: None,
        }
    }
}

/// Parses a region string argument into a Region enum.
pub fn parse_region_arg(s: &str) -> Result<Region, CliError> {
    Region::from_str(s).ok_or_else(|| CliError::InvalidRegion(s.to_string()))
}

/// Validates and normalizes a country code argument to upper case.
pub fn parse_code_arg(s: &str) -> Result<String, CliError> {
    let code = s.trim();
    let valid_len = matches!(code.len(), 2 | 3);

    if valid_len && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(CliError::InvalidCode(s.to_string()))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// Blank `--search` values are dropped.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_code = cli.code.as_deref().map(parse_code_arg).transpose()?;
        let initial_region = cli.region.as_deref().map(parse_region_arg).transpose()?;
        let initial_search = cli
            .search
            .as_ref()
            .filter(|query| !query.trim().is_empty())
            .cloned();

        Ok(StartupConfig {
            initial_code,
            initial_region,
            initial_search,
            api_url: cli.api_url.clone(),
            log_file: cli.log_file.clone(),
        })
    }
}
