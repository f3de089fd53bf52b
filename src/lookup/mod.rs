// Sun Jan 18 2026 - Alex

pub mod fuzzy;

use crate::data::normalize_postal_code;
use crate::store::{ResultRow, ResultStore, StoreResult};
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_THRESHOLD: u8 = 50;
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolMatch {
    pub score: u8,
    #[serde(flatten)]
    pub row: ResultRow,
}

/// Read side of the result store. Serves precomputed lists only.
pub struct SchoolLookup {
    store: Arc<dyn ResultStore>,
}

impl SchoolLookup {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self { store }
    }

    pub fn schools(&self, code: &str) -> StoreResult<Vec<ResultRow>> {
        self.store.read(&normalize_postal_code(code))
    }

    /// The `limit` most relevant schools scoring at least `threshold`, best first.
    pub fn autocomplete(
        &self,
        code: &str,
        partial: &str,
        threshold: u8,
        limit: usize,
    ) -> StoreResult<Vec<SchoolMatch>> {
        let mut matches: Vec<SchoolMatch> = self
            .schools(code)?
            .into_iter()
            .map(|row| SchoolMatch {
                score: fuzzy::score(partial, &row.school),
                row,
            })
            .filter(|m| m.score >= threshold)
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.row.school.cmp(&b.row.school)));
        matches.truncate(limit);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CsvResultStore, StoreError};

    fn row(name: &str) -> ResultRow {
        ResultRow {
            identifier: "000000000001".to_string(),
            school: name.to_string(),
            url: String::new(),
            overall_rating: Some(6.0),
            zipcode: "00501".to_string(),
        }
    }

    fn lookup(dir: &std::path::Path) -> SchoolLookup {
        let store = CsvResultStore::new(dir);
        store
            .write(
                "00501",
                &[
                    row("Washington Middle School"),
                    row("Lincoln High School"),
                    row("Lincoln Elementary"),
                    row("Sayville High School"),
                ],
            )
            .unwrap();
        SchoolLookup::new(Arc::new(store))
    }

    #[test]
    fn test_autocomplete_orders_by_relevance() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = lookup(dir.path());

        let matches = lookup.autocomplete("501", "lincoln high", DEFAULT_THRESHOLD, DEFAULT_LIMIT).unwrap();
        let names: Vec<&str> = matches.iter().map(|m| m.row.school.as_str()).collect();

        assert_eq!(names[0], "Lincoln High School");
        assert!(!names.contains(&"Washington Middle School"));
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_threshold_filters_everything() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = lookup(dir.path());

        assert!(lookup.autocomplete("00501", "zzzzzz", 90, DEFAULT_LIMIT).unwrap().is_empty());
        assert_eq!(lookup.autocomplete("00501", "school", 0, 10).unwrap().len(), 4);
    }

    #[test]
    fn test_autocomplete_keeps_only_the_best_few() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvResultStore::new(dir.path());
        let names = [
            "Alpha High", "Bravo High", "Charlie High", "Delta High",
            "Echo High", "Foxtrot High", "Golf High", "Hotel High",
        ];
        let rows: Vec<ResultRow> = names.iter().map(|&name| row(name)).collect();
        store.write("00501", &rows).unwrap();
        let lookup = SchoolLookup::new(Arc::new(store));

        let all = lookup.autocomplete("501", "high", DEFAULT_THRESHOLD, usize::MAX).unwrap();
        assert_eq!(all.len(), 8);

        let top = lookup.autocomplete("501", "high", DEFAULT_THRESHOLD, DEFAULT_LIMIT).unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[..], all[..5]);
    }

    #[test]
    fn test_uncomputed_code_fails() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = lookup(dir.path());

        assert_eq!(lookup.schools("501").unwrap().len(), 4);
        assert!(matches!(lookup.schools("10001"), Err(StoreError::NotComputed(_))));
    }
}
