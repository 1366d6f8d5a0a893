//! # Command Line
//!
//! `company-contract --base-url http://localhost:3000/company --seed 42`
//!
//! Exit code 0 when every scenario passed, 1 when any failed, 2 on a
//! configuration error.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::HarnessConfig;

/// Verify that a Company HTTP service honours its CRUD contract.
#[derive(Debug, Parser)]
#[command(name = "company-contract", version, about)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Company collection URL, e.g. http://localhost:3000/company
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seed for reproducible fixtures
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter (`info`, `debug`, `company_contract=trace`, ...)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Include every request sent in the report
    #[arg(long)]
    pub show_requests: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Flags win over file and environment.
    pub fn apply_to(&self, config: &mut HarnessConfig) {
        if let Some(base_url) = &self.base_url {
            config.target.base_url = base_url.clone();
        }
        if let Some(seed) = self.seed {
            config.fixtures.seed = Some(seed);
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
    }
}
