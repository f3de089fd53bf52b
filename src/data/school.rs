// Fri Jan 16 2026 - Alex

use std::sync::Arc;

pub const IDENTIFIER_WIDTH: usize = 12;

pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    format!("{:0>width$}", trimmed, width = IDENTIFIER_WIDTH)
}

#[derive(Debug, Clone, PartialEq)]
pub struct School {
    pub id: String,
    pub name: String,
    pub url: String,
    pub rating: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub postal_code: String,
}

impl School {
    pub fn is_located(&self) -> bool {
        matches!((self.latitude, self.longitude), (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite())
    }
}

/// Joined ratings and directory rows. Never mutated after load.
#[derive(Debug, Clone)]
pub struct SchoolDataset {
    schools: Arc<[School]>,
}

impl SchoolDataset {
    pub fn new(schools: Vec<School>) -> Self {
        Self {
            schools: schools.into(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &School> {
        self.schools.iter()
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn located_count(&self) -> usize {
        self.schools.iter().filter(|s| s.is_located()).count()
    }
}
