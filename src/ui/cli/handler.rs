// Wed Jan 15 2026 - Alex

use super::args::{Args, AutocompleteArgs, Command, PrecomputeArgs, SchoolsArgs};
use crate::config::Config;
use crate::data::{ReferenceData, ReferencePaths};
use crate::lookup::SchoolLookup;
use crate::precompute::{PrecomputeScheduler, RegenerateMode};
use crate::store::CsvResultStore;
use crate::utils::logging::{init_logger, level_from_str};
use crate::utils::pluralize;
use anyhow::Context;
use colored::Colorize;
use std::sync::Arc;

pub struct CommandHandler {
    quiet: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn execute(&mut self, args: Args) -> anyhow::Result<()> {
        self.quiet = args.quiet;
        init_logger(level_from_str(&args.log_level));

        match args.command {
            Command::Precompute(precompute_args) => self.handle_precompute(precompute_args),
            Command::Schools(schools_args) => self.handle_schools(schools_args),
            Command::Autocomplete(autocomplete_args) => self.handle_autocomplete(autocomplete_args),
        }
    }

    fn status(&self, line: String) {
        if !self.quiet {
            eprintln!("{}", line);
        }
    }

    fn handle_precompute(&self, args: PrecomputeArgs) -> anyhow::Result<()> {
        let config = match &args.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        let mut config = args.apply(config);
        if self.quiet {
            config.show_progress = false;
        }
        config.validate().context("Invalid configuration")?;

        self.status(format!("{} Loading reference data...", "[*]".blue()));
        let data = ReferenceData::load(&ReferencePaths::from_config(&config))
            .context("Cannot precompute without reference data")?;
        self.status(format!(
            "{} {} and {} loaded",
            "[+]".green(),
            pluralize(data.schools.len(), "school", "schools"),
            pluralize(data.postal_codes.len(), "postal code", "postal codes")
        ));

        let store = Arc::new(CsvResultStore::new(config.results_dir.clone()));
        let scheduler = PrecomputeScheduler::new(Arc::new(data), store, &config);

        let report = scheduler
            .run(RegenerateMode::from_flag(config.regenerate))
            .context("Precompute run failed")?;

        log::info!("{}", report.summary());

        if report.is_clean() {
            self.status(format!(
                "{} {} written to {}",
                "[+]".green(),
                pluralize(report.written, "result file", "result files"),
                config.results_dir.display()
            ));
        } else {
            self.status(format!(
                "{} {} could not be computed: {}",
                "[!]".yellow(),
                pluralize(report.failed_codes.len(), "postal code", "postal codes"),
                report.failed_codes.join(", ")
            ));
        }

        Ok(())
    }

    fn handle_schools(&self, args: SchoolsArgs) -> anyhow::Result<()> {
        let lookup = SchoolLookup::new(Arc::new(CsvResultStore::new(args.results_dir)));
        let rows = lookup.schools(&args.zipcode)?;
        println!("{}", serde_json::to_string(&rows)?);
        Ok(())
    }

    fn handle_autocomplete(&self, args: AutocompleteArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let lookup = SchoolLookup::new(Arc::new(CsvResultStore::new(args.results_dir)));
        let matches = lookup.autocomplete(&args.zipcode, &args.query, args.threshold, args.limit)?;
        println!("{}", serde_json::to_string(&matches)?);
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
