//! Monument catalog loaded from the static JSON data file.
//!
//! The file is a list of cities, each with its monuments:
//!
//! ```json
//! [{"city": "Jaipur", "monuments": [
//!     {"name": "Amber Fort", "entry_fee_indian": 100, "entry_fee_foreign": 500,
//!      "timings": "8 AM - 5:30 PM", "notes": "Elephant rides available"}
//! ]}]
//! ```

use serde::Deserialize;
use std::{
    collections::HashMap,
    fmt::Display,
    path::{Path, PathBuf},
};

use crate::semantic::MonumentLabel;

/// A fee as written in the data file. Some entries are numbers, some are text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeeValue {
    Number(serde_json::Number),
    Text(String),
}

impl Display for FeeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeValue::Number(n) => write!(f, "{n}"),
            FeeValue::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryFee {
    Single(FeeValue),
    Split {
        indian: Option<FeeValue>,
        foreign: Option<FeeValue>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonumentRecord {
    pub city: String,
    pub name: String,
    pub entry_fee: Option<EntryFee>,
    pub timings: Option<String>,
    pub notes: Option<String>,
}

impl MonumentRecord {
    /// Human-readable context line handed to the prompt.
    pub fn detail(&self) -> String {
        let mut parts = vec![format!("Name: {}", self.name), format!("City: {}", self.city)];

        match &self.entry_fee {
            Some(EntryFee::Single(fee)) => parts.push(format!("Entry fee: {fee}")),
            Some(EntryFee::Split { indian, foreign }) => parts.push(format!(
                "Entry fees - Indian: {}, Foreign: {}",
                or_na(indian),
                or_na(foreign)
            )),
            None => {}
        }
        if let Some(timings) = self.timings.as_deref().filter(|t| !t.is_empty()) {
            parts.push(format!("Timings: {timings}"));
        }
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            parts.push(format!("Notes: {notes}"));
        }

        parts.join(" | ")
    }

    /// Text embedded into the vector index for this monument.
    pub fn embedding_text(&self) -> String {
        let fee = match &self.entry_fee {
            Some(EntryFee::Single(fee)) => fee.to_string(),
            Some(EntryFee::Split { indian, .. }) => or_na(indian),
            None => "N/A".to_string(),
        };

        format!(
            "{}: {} Entry fee: {}",
            self.name,
            self.notes.as_deref().unwrap_or_default(),
            fee
        )
    }

    pub fn label(&self) -> MonumentLabel {
        MonumentLabel::new(&self.city, &self.name)
    }
}

fn or_na(fee: &Option<FeeValue>) -> String {
    fee.as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "N/A".to_string())
}

/// Minimal context line used when a monument has no catalog entry.
pub fn fallback_detail(city: &str, name: &str) -> String {
    format!("Name: {name} | City: {city}")
}

#[derive(Debug, Deserialize)]
struct RawCity {
    city: String,
    #[serde(default)]
    monuments: Vec<RawMonument>,
}

#[derive(Debug, Deserialize)]
struct RawMonument {
    name: String,
    entry_fee: Option<FeeValue>,
    entry_fee_indian: Option<FeeValue>,
    entry_fee_foreign: Option<FeeValue>,
    timings: Option<String>,
    notes: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Read-only monument catalog with a case-insensitive `(city, name)` lookup.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<MonumentRecord>,
    details: HashMap<(String, String), String>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&data)?;
        log::info!(
            "loaded {} monuments from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json(data: &str) -> Result<Self, CatalogError> {
        let cities: Vec<RawCity> = serde_json::from_str(data)?;

        let records = cities
            .into_iter()
            .flat_map(|city| {
                let city_name = city.city;
                city.monuments.into_iter().map(move |m| {
                    let entry_fee = match (m.entry_fee, m.entry_fee_indian, m.entry_fee_foreign) {
                        (Some(fee), _, _) => Some(EntryFee::Single(fee)),
                        (None, None, None) => None,
                        (None, indian, foreign) => Some(EntryFee::Split { indian, foreign }),
                    };
                    MonumentRecord {
                        city: city_name.clone(),
                        name: m.name,
                        entry_fee,
                        timings: m.timings,
                        notes: m.notes,
                    }
                })
            })
            .collect();

        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<MonumentRecord>) -> Self {
        let details = records
            .iter()
            .map(|record| (record.label().key(), record.detail()))
            .collect();

        Self { records, details }
    }

    pub fn records(&self) -> &[MonumentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn detail(&self, city: &str, name: &str) -> Option<&str> {
        self.details
            .get(&(city.to_lowercase(), name.to_lowercase()))
            .map(String::as_str)
    }

    /// Catalog detail for a label, or the minimal fallback line.
    pub fn describe(&self, label: &MonumentLabel) -> String {
        self.detail(&label.city, &label.monument)
            .map(str::to_owned)
            .unwrap_or_else(|| fallback_detail(&label.city, &label.monument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"city": "Jaipur", "monuments": [
            {"name": "Amber Fort", "entry_fee_indian": 100, "entry_fee_foreign": "500",
             "timings": "8 AM - 5:30 PM", "notes": "Hilltop fort"},
            {"name": "Hawa Mahal", "entry_fee": 50, "timings": ""}
        ]},
        {"city": "Agra", "monuments": [
            {"name": "Taj Mahal", "entry_fee_foreign": 1100, "notes": "Closed on Fridays"},
            {"name": "Mehtab Bagh"}
        ]},
        {"city": "Delhi"}
    ]"#;

    #[test]
    fn test_loads_all_monuments() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.records()[2].city, "Agra");
    }

    #[test]
    fn test_split_fee_detail() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(
            catalog.detail("jaipur", "AMBER FORT"),
            Some("Name: Amber Fort | City: Jaipur | Entry fees - Indian: 100, Foreign: 500 | Timings: 8 AM - 5:30 PM | Notes: Hilltop fort")
        );
        assert_eq!(
            catalog.detail("Agra", "Taj Mahal"),
            Some("Name: Taj Mahal | City: Agra | Entry fees - Indian: N/A, Foreign: 1100 | Notes: Closed on Fridays")
        );
    }

    #[test]
    fn test_single_fee_and_empty_timings() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(
            catalog.detail("Jaipur", "Hawa Mahal"),
            Some("Name: Hawa Mahal | City: Jaipur | Entry fee: 50")
        );
        assert_eq!(
            catalog.detail("Agra", "Mehtab Bagh"),
            Some("Name: Mehtab Bagh | City: Agra")
        );
    }

    #[test]
    fn test_describe_falls_back_for_unknown_monument() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let label = MonumentLabel::new("Jaipur", "City Palace");
        assert_eq!(catalog.describe(&label), "Name: City Palace | City: Jaipur");
    }

    #[test]
    fn test_embedding_text() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let texts: Vec<String> = catalog.records().iter().map(|r| r.embedding_text()).collect();

        assert_eq!(texts[0], "Amber Fort: Hilltop fort Entry fee: 100");
        assert_eq!(texts[1], "Hawa Mahal:  Entry fee: 50");
        assert_eq!(texts[2], "Taj Mahal: Closed on Fridays Entry fee: N/A");
        assert_eq!(texts[3], "Mehtab Bagh:  Entry fee: N/A");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::load(&dir.path().join("india_monuments.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_malformed_file() {
        assert!(matches!(
            Catalog::from_json(r#"{"city": "Jaipur"}"#),
            Err(CatalogError::Malformed(_))
        ));
    }
}
