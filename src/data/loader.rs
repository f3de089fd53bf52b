// Fri Jan 16 2026 - Alex

use crate::config::Config;
use crate::data::error::{LoadError, LoadResult};
use crate::data::postal::{normalize_postal_code, PostalCode, PostalCodeTable};
use crate::data::school::{normalize_identifier, School, SchoolDataset};
use ahash::AHashMap;
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RatingRow {
    nces_id: String,
    #[serde(rename = "School", default)]
    school: String,
    #[serde(default)]
    url: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    overall_rating: Option<f64>,
    #[serde(rename = "Zipcode", default)]
    zipcode: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryRow {
    #[serde(rename = "SEEDID")]
    seed_id: String,
    #[serde(rename = "IsActive", deserialize_with = "deserialize_flag")]
    is_active: bool,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(rename = "long", default, deserialize_with = "csv::invalid_option")]
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PostalRow {
    #[serde(rename = "Zipcode")]
    zipcode: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "1.0" | "true" | "t" | "y" | "yes"
    ))
}

#[derive(Debug, Clone)]
pub struct ReferencePaths {
    pub ratings: PathBuf,
    pub directory: PathBuf,
    pub zipcodes: PathBuf,
}

impl ReferencePaths {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ratings: config.ratings_path.clone(),
            directory: config.directory_path.clone(),
            zipcodes: config.zipcodes_path.clone(),
        }
    }
}

pub struct ReferenceData {
    pub schools: SchoolDataset,
    pub postal_codes: PostalCodeTable,
}

impl ReferenceData {
    pub fn new(schools: SchoolDataset, postal_codes: PostalCodeTable) -> Self {
        Self {
            schools,
            postal_codes,
        }
    }

    pub fn load(paths: &ReferencePaths) -> LoadResult<Self> {
        let ratings = read_rows::<RatingRow, _>(open(&paths.ratings)?, b',', &paths.ratings)?;
        let directory = read_rows::<DirectoryRow, _>(open(&paths.directory)?, b',', &paths.directory)?;
        let postal = read_rows::<PostalRow, _>(open(&paths.zipcodes)?, b'\t', &paths.zipcodes)?;

        let postal_codes = build_postal_table(postal, &paths.zipcodes)?;
        let schools = join_schools(ratings, directory);

        log::info!(
            "Loaded {} schools ({} located) and {} postal codes",
            schools.len(),
            schools.located_count(),
            postal_codes.len()
        );

        Ok(Self::new(schools, postal_codes))
    }

    /// Same as [`ReferenceData::load`] but from in-memory sources; `label` names them in errors.
    pub fn from_readers<A: Read, B: Read, C: Read>(
        ratings: A,
        directory: B,
        zipcodes: C,
        label: &Path,
    ) -> LoadResult<Self> {
        let ratings = read_rows::<RatingRow, _>(ratings, b',', label)?;
        let directory = read_rows::<DirectoryRow, _>(directory, b',', label)?;
        let postal = read_rows::<PostalRow, _>(zipcodes, b'\t', label)?;

        let postal_codes = build_postal_table(postal, label)?;
        Ok(Self::new(join_schools(ratings, directory), postal_codes))
    }
}

fn open(path: &Path) -> LoadResult<File> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: R, delimiter: u8, path: &Path) -> LoadResult<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Left join of ratings onto active directory rows. A rating with several active
/// directory matches yields one school per match; one with none keeps no coordinates.
fn join_schools(ratings: Vec<RatingRow>, directory: Vec<DirectoryRow>) -> SchoolDataset {
    let mut locations: AHashMap<String, Vec<(Option<f64>, Option<f64>)>> = AHashMap::new();
    for row in directory.into_iter().filter(|r| r.is_active) {
        locations
            .entry(normalize_identifier(&row.seed_id))
            .or_default()
            .push((row.lat, row.lon));
    }

    let mut schools = Vec::with_capacity(ratings.len());
    let mut unmatched = 0usize;

    for row in ratings {
        let id = normalize_identifier(&row.nces_id);
        let postal_code = if row.zipcode.trim().is_empty() {
            String::new()
        } else {
            normalize_postal_code(&row.zipcode)
        };

        let school = School {
            id: id.clone(),
            name: row.school,
            url: row.url,
            rating: row.overall_rating,
            latitude: None,
            longitude: None,
            postal_code,
        };

        match locations.get(&id) {
            Some(matches) => {
                for &(latitude, longitude) in matches {
                    schools.push(School {
                        latitude,
                        longitude,
                        ..school.clone()
                    });
                }
            }
            None => {
                unmatched += 1;
                schools.push(school);
            }
        }
    }

    if unmatched > 0 {
        log::debug!("{} rated schools have no active directory entry", unmatched);
    }

    SchoolDataset::new(schools)
}

/// A postal table without a single row leaves nothing to compute.
fn build_postal_table(rows: Vec<PostalRow>, path: &Path) -> LoadResult<PostalCodeTable> {
    if rows.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    Ok(PostalCodeTable::new(
        rows.into_iter()
            .map(|row| PostalCode::new(&row.zipcode, row.latitude, row.longitude))
            .collect(),
    ))
}
