//! Film Catalog - The External Dataset
//!
//! A catalog maps film name to image, box ISO and development records.
//! Key order in the source document is the order cards are rendered in.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::card::CardAttributes;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Dataset root must be an object keyed by film name")]
    NotAnObject,

    #[error("Invalid entry for film '{film}': {source}")]
    InvalidEntry {
        film: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One development time for a film at a given exposure rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentRecord {
    pub iso: String,
    #[serde(deserialize_with = "string_or_number")]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dilution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DevelopmentRecord {
    pub fn new(iso: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            iso: iso.into(),
            time: time.into(),
            temp: None,
            dilution: None,
            notes: None,
        }
    }

    pub fn with_temp(mut self, temp: impl Into<String>) -> Self {
        self.temp = Some(temp.into());
        self
    }

    pub fn with_dilution(mut self, dilution: impl Into<String>) -> Self {
        self.dilution = Some(dilution.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Times are usually strings ("5:30") but bare numbers show up in hand-edited data.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for time, found {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmEntry {
    pub name: String,
    pub image: String,
    pub box_iso: String,
    pub developments: Vec<DevelopmentRecord>,
}

/// Entry body as it appears under its name key in the dataset.
#[derive(Debug, Deserialize)]
struct FilmBody {
    image: String,
    box_iso: String,
    developments: Vec<DevelopmentRecord>,
}

impl FilmEntry {
    /// Host attributes for this film, with `data` carried as JSON text.
    pub fn to_attributes(&self) -> Result<CardAttributes, serde_json::Error> {
        Ok(CardAttributes {
            name: Some(self.name.clone()),
            image: Some(self.image.clone()),
            data: Some(serde_json::to_string(&self.developments)?),
            box_iso: Some(self.box_iso.clone()),
        })
    }
}

/// Ordered film catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    films: Vec<FilmEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { films: Vec::new() }
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let root: Value = serde_json::from_str(text)?;
        let map: Map<String, Value> = match root {
            Value::Object(map) => map,
            _ => return Err(CatalogError::NotAnObject),
        };

        let mut catalog = Self::new();
        for (name, body) in map {
            let body: FilmBody = serde_json::from_value(body).map_err(|source| {
                CatalogError::InvalidEntry { film: name.clone(), source }
            })?;
            catalog.films.push(FilmEntry {
                name,
                image: body.image,
                box_iso: body.box_iso,
                developments: body.developments,
            });
        }

        tracing::debug!(films = catalog.films.len(), "catalog parsed");
        Ok(catalog)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn get(&self, name: &str) -> Option<&FilmEntry> {
        self.films.iter().find(|f| f.name == name)
    }

    pub fn list(&self) -> Vec<&FilmEntry> {
        self.films.iter().collect()
    }

    /// Replaces a same-named film in place, otherwise appends.
    pub fn register(&mut self, entry: FilmEntry) {
        match self.films.iter_mut().find(|f| f.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.films.push(entry),
        }
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilmEntry> {
        self.films.iter()
    }
}
