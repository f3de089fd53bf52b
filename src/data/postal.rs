// Fri Jan 16 2026 - Alex

use ahash::AHashMap;
use std::collections::BTreeSet;

pub const POSTAL_CODE_WIDTH: usize = 5;

/// Left-pads a postal code with zeros to five characters. Longer input is returned as is.
pub fn normalize_postal_code(raw: &str) -> String {
    let trimmed = raw.trim();
    format!("{:0>width$}", trimmed, width = POSTAL_CODE_WIDTH)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostalCode {
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PostalCode {
    pub fn new(code: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            code: normalize_postal_code(code),
            latitude,
            longitude,
        }
    }
}

pub struct PostalCodeTable {
    records: Vec<PostalCode>,
    index: AHashMap<String, usize>,
}

impl PostalCodeTable {
    pub fn new(records: Vec<PostalCode>) -> Self {
        let mut index = AHashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            index.entry(record.code.clone()).or_insert(i);
        }

        Self { records, index }
    }

    pub fn centroid(&self, code: &str) -> Option<&PostalCode> {
        let code = normalize_postal_code(code);
        self.index.get(&code).map(|&i| &self.records[i])
    }

    /// Distinct codes in sorted order.
    pub fn codes(&self) -> BTreeSet<String> {
        self.index.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_short_codes() {
        assert_eq!(normalize_postal_code("501"), "00501");
        assert_eq!(normalize_postal_code("7"), "00007");
        assert_eq!(normalize_postal_code(""), "00000");
        assert_eq!(normalize_postal_code(" 2134 "), "02134");
    }

    #[test]
    fn test_normalize_never_truncates() {
        assert_eq!(normalize_postal_code("90210"), "90210");
        assert_eq!(normalize_postal_code("123456"), "123456");

        for len in 0..=5 {
            let raw = "9".repeat(len);
            let code = normalize_postal_code(&raw);
            assert_eq!(code.len(), 5);
            assert!(code.ends_with(&raw));
        }
    }

    #[test]
    fn test_centroid_lookup_normalizes_and_first_row_wins() {
        let table = PostalCodeTable::new(vec![
            PostalCode::new("501", 40.8, -73.0),
            PostalCode::new("02134", 42.35, -71.13),
            PostalCode::new("00501", 0.0, 0.0),
        ]);

        let centroid = table.centroid("501").unwrap();
        assert_eq!(centroid.code, "00501");
        assert_eq!(centroid.latitude, 40.8);
        assert!(table.centroid("99999").is_none());

        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert!(PostalCodeTable::new(Vec::new()).is_empty());
        assert_eq!(table.codes().into_iter().collect::<Vec<_>>(), vec!["00501", "02134"]);
    }
}
