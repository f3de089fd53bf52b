// Sat Jan 17 2026 - Alex

use crate::data::normalize_postal_code;
use crate::store::error::{StoreError, StoreResult};
use crate::store::{ResultRow, ResultStore};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const RESULT_HEADER: [&str; 5] = ["identifier", "School", "url", "overall_rating", "Zipcode"];

const EXTENSION: &str = "csv";

/// `<root>/<code>.csv`, one file per postal code.
pub struct CsvResultStore {
    root: PathBuf,
}

impl CsvResultStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, code: &str) -> PathBuf {
        self.root.join(format!("{}.{}", normalize_postal_code(code), EXTENSION))
    }

    fn staging_path_for(&self, code: &str) -> PathBuf {
        self.root.join(format!(".{}.{}.tmp", normalize_postal_code(code), EXTENSION))
    }

    /// Codes that currently have a published result file.
    pub fn stored_codes(&self) -> StoreResult<BTreeSet<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| self.io_error(&self.root, source))?;
        let mut codes = BTreeSet::new();

        for entry in entries {
            let entry = entry.map_err(|source| self.io_error(&self.root, source))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    codes.insert(stem.to_string());
                }
            }
        }

        Ok(codes)
    }

    fn stage(&self, staging: &Path, rows: &[ResultRow]) -> StoreResult<()> {
        let csv_error = |source: csv::Error| StoreError::Csv {
            path: staging.to_path_buf(),
            source,
        };

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(staging)
            .map_err(csv_error)?;

        writer.write_record(RESULT_HEADER).map_err(csv_error)?;
        for row in rows {
            writer.serialize(row).map_err(csv_error)?;
        }
        writer.flush().map_err(|source| self.io_error(staging, source))
    }

    fn io_error(&self, path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ResultStore for CsvResultStore {
    fn exists(&self, code: &str) -> bool {
        self.path_for(code).is_file()
    }

    fn write(&self, code: &str, rows: &[ResultRow]) -> StoreResult<()> {
        let staging = self.staging_path_for(code);
        let target = self.path_for(code);

        let result = self.stage(&staging, rows).and_then(|()| {
            // publish in one step so a half-written file is never mistaken for a finished one
            fs::rename(&staging, &target).map_err(|source| self.io_error(&target, source))
        });

        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }

    fn read(&self, code: &str) -> StoreResult<Vec<ResultRow>> {
        let path = self.path_for(code);
        if !path.is_file() {
            return Err(StoreError::NotComputed(normalize_postal_code(code)));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|source| StoreError::Csv {
                path: path.clone(),
                source,
            })?;

        reader
            .deserialize()
            .collect::<Result<Vec<ResultRow>, _>>()
            .map_err(|source| StoreError::Csv { path, source })
    }

    fn is_initialized(&self) -> bool {
        self.root.is_dir()
    }

    fn reset(&self) -> StoreResult<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|source| self.io_error(&self.root, source))?;
        }
        fs::create_dir_all(&self.root).map_err(|source| self.io_error(&self.root, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, rating: Option<f64>) -> ResultRow {
        ResultRow {
            identifier: "010000500870".to_string(),
            school: name.to_string(),
            url: format!("https://example.org/{}", name.to_lowercase().replace(' ', "-")),
            overall_rating: rating,
            zipcode: "00501".to_string(),
        }
    }

    #[test]
    fn test_write_then_read_by_unpadded_code() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvResultStore::new(dir.path().join("results"));
        store.reset().unwrap();

        let rows = vec![row("Alpha High", Some(8.0)), row("Gamma, Upper School", None)];
        store.write("501", &rows).unwrap();

        assert!(store.exists("00501"));
        assert!(store.path_for("501").ends_with("00501.csv"));
        assert_eq!(store.read("501").unwrap(), rows);
        assert_eq!(store.stored_codes().unwrap().into_iter().collect::<Vec<_>>(), vec!["00501"]);
    }

    #[test]
    fn test_empty_result_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvResultStore::new(dir.path());

        store.write("99950", &[]).unwrap();

        let contents = fs::read_to_string(store.path_for("99950")).unwrap();
        assert_eq!(contents.trim_end(), "identifier,School,url,overall_rating,Zipcode");
        assert!(store.read("99950").unwrap().is_empty());
    }

    #[test]
    fn test_failed_publish_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvResultStore::new(dir.path());
        fs::create_dir(store.path_for("00501")).unwrap();

        match store.write("00501", &[row("Alpha High", Some(8.0))]) {
            Err(StoreError::Io { path, .. }) => assert_eq!(path, store.path_for("00501")),
            other => panic!("expected Io, got {:?}", other),
        }

        assert!(!store.staging_path_for("00501").exists());
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["00501.csv"]);
    }

    #[test]
    fn test_read_missing_code_is_not_computed() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvResultStore::new(dir.path());

        match store.read("12345") {
            Err(StoreError::NotComputed(code)) => assert_eq!(code, "12345"),
            other => panic!("expected NotComputed, got {:?}", other),
        }
    }

    #[test]
    fn test_reset_removes_previous_results() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvResultStore::new(dir.path().join("results"));
        assert!(!store.is_initialized());

        store.reset().unwrap();
        store.write("00501", &[row("Alpha High", Some(8.0))]).unwrap();
        fs::write(store.root().join("notes.txt"), "stale").unwrap();

        store.reset().unwrap();
        assert!(store.is_initialized());
        assert!(!store.exists("00501"));
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 0);
    }
}
