// Tue Jan 13 2026 - Alex

use crate::geo::DEFAULT_TOLERANCE_MILES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ratings_path: PathBuf,
    pub directory_path: PathBuf,
    pub zipcodes_path: PathBuf,
    pub results_dir: PathBuf,
    pub tolerance_miles: f64,
    pub regenerate: bool,
    pub workers: usize,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ratings_path: PathBuf::from("gs_2021_and_niche_2017_ratings.csv"),
            directory_path: PathBuf::from("SchoolData_April142022.csv"),
            zipcodes_path: PathBuf::from("US.txt"),
            results_dir: PathBuf::from("pre_calculated_results"),
            tolerance_miles: DEFAULT_TOLERANCE_MILES,
            regenerate: false,
            workers: num_cpus::get(),
            show_progress: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let ext = path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "json" => serde_json::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn with_results_dir(mut self, dir: PathBuf) -> Self {
        self.results_dir = dir;
        self
    }

    pub fn with_tolerance(mut self, miles: f64) -> Self {
        self.tolerance_miles = miles;
        self
    }

    pub fn with_regenerate(mut self, regenerate: bool) -> Self {
        self.regenerate = regenerate;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_reference_files(mut self, ratings: PathBuf, directory: PathBuf, zipcodes: PathBuf) -> Self {
        self.ratings_path = ratings;
        self.directory_path = directory;
        self.zipcodes_path = zipcodes;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance_miles.is_finite() || self.tolerance_miles <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tolerance_miles must be a positive number, got {}",
                self.tolerance_miles
            )));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be greater than 0".to_string()));
        }
        if self.results_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("results_dir must be set".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.tolerance_miles, 30.0);
        assert!(!config.regenerate);
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Config::new().with_tolerance(0.0).validate().is_err());
        assert!(Config::new().with_tolerance(f64::NAN).validate().is_err());
        assert!(Config::new().with_workers(0).validate().is_err());
        assert!(Config::new().with_results_dir(PathBuf::new()).validate().is_err());
    }

    #[test]
    fn test_load_json_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("precompute.json");
        fs::write(&path, r#"{ "tolerance_miles": 12.5, "regenerate": true }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.tolerance_miles, 12.5);
        assert!(config.regenerate);
        assert_eq!(config.zipcodes_path, PathBuf::from("US.txt"));
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("precompute.yaml");
        fs::write(&path, "tolerance_miles: 10").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::UnsupportedFormat(_))));
        assert!(matches!(
            Config::load(dir.path().join("missing.json")),
            Err(ConfigError::NotFound(_))
        ));
    }
}
