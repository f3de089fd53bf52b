// Wed Jan 15 2026 - Alex

use crate::config::Config;
use crate::lookup::{DEFAULT_LIMIT, DEFAULT_THRESHOLD};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nearby-schools")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Precomputes and serves rated schools near each postal code", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the nearby-school file for every postal code that lacks one
    Precompute(PrecomputeArgs),
    /// Print the precomputed schools for a postal code as JSON
    Schools(SchoolsArgs),
    /// Fuzzy-match a partial school name among a postal code's schools
    Autocomplete(AutocompleteArgs),
}

#[derive(Parser, Debug)]
pub struct PrecomputeArgs {
    #[arg(long, help = "JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "School ratings table")]
    pub ratings: Option<PathBuf>,

    #[arg(long, help = "School directory table")]
    pub directory: Option<PathBuf>,

    #[arg(long, help = "Tab-delimited postal code reference table")]
    pub zipcodes: Option<PathBuf>,

    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    #[arg(long, help = "Distance tolerance in miles")]
    pub tolerance: Option<f64>,

    #[arg(long, help = "Worker threads (defaults to CPU count)")]
    pub workers: Option<usize>,

    #[arg(long, help = "Delete all results and recompute every postal code")]
    pub regenerate: bool,

    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Parser, Debug)]
pub struct SchoolsArgs {
    #[arg(short, long)]
    pub zipcode: String,

    #[arg(long, default_value = "pre_calculated_results")]
    pub results_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct AutocompleteArgs {
    #[arg(short, long)]
    pub zipcode: String,

    #[arg(long)]
    pub query: String,

    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,

    #[arg(long, default_value_t = DEFAULT_LIMIT, help = "Maximum number of matches")]
    pub limit: usize,

    #[arg(long, default_value = "pre_calculated_results")]
    pub results_dir: PathBuf,
}

impl PrecomputeArgs {
    /// Flags win over whatever the config file (or the defaults) said.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(path) = &self.ratings {
            config.ratings_path = path.clone();
        }
        if let Some(path) = &self.directory {
            config.directory_path = path.clone();
        }
        if let Some(path) = &self.zipcodes {
            config.zipcodes_path = path.clone();
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance_miles = tolerance;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.regenerate {
            config.regenerate = true;
        }
        if self.no_progress {
            config.show_progress = false;
        }
        config
    }
}

impl AutocompleteArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.threshold > 100 {
            return Err("Threshold must be between 0 and 100".to_string());
        }
        Ok(())
    }
}
