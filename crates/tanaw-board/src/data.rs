//! Dataset loading: embedded mock data or JSON files from a directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

const EMBEDDED: &[(&str, &str)] = &[
    ("incidents.json", include_str!("../data/incidents.json")),
    (
        "evacuation_centers.json",
        include_str!("../data/evacuation_centers.json"),
    ),
    (
        "weather_bulletins.json",
        include_str!("../data/weather_bulletins.json"),
    ),
    ("events.json", include_str!("../data/events.json")),
];

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no embedded dataset named '{0}'")]
    UnknownDataset(String),

    #[error("failed to read dataset {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset '{name}' is not a valid record list")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Returns the embedded copy of a dataset.
pub fn embedded(name: &str) -> Option<&'static str> {
    EMBEDDED
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, text)| *text)
}

/// Where datasets are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DataSource {
    /// The mock datasets compiled into the binary.
    #[default]
    Embedded,
    /// A directory holding one JSON file per dataset.
    Dir(PathBuf),
}

impl DataSource {
    pub fn from_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => DataSource::Dir(dir.to_path_buf()),
            None => DataSource::Embedded,
        }
    }

    /// Loads and deserializes the dataset `name` (e.g. `incidents.json`).
    pub fn load<R: DeserializeOwned>(&self, name: &str) -> Result<Vec<R>, DataError> {
        let text = match self {
            DataSource::Embedded => embedded(name)
                .ok_or_else(|| DataError::UnknownDataset(name.to_string()))?
                .to_string(),
            DataSource::Dir(dir) => {
                let path = dir.join(name);
                fs::read_to_string(&path).map_err(|source| DataError::Io { path, source })?
            }
        };

        let records: Vec<R> = serde_json::from_str(&text).map_err(|source| DataError::Parse {
            name: name.to_string(),
            source,
        })?;
        tracing::debug!(dataset = name, source = ?self, records = records.len(), "loaded dataset");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Bulletin, Center, Event, Incident};

    #[test]
    fn embedded_datasets_parse() {
        let source = DataSource::Embedded;
        assert_eq!(source.load::<Incident>("incidents.json").unwrap().len(), 14);
        assert_eq!(source.load::<Center>("evacuation_centers.json").unwrap().len(), 12);
        assert_eq!(source.load::<Bulletin>("weather_bulletins.json").unwrap().len(), 8);
        assert_eq!(source.load::<Event>("events.json").unwrap().len(), 10);
    }

    #[test]
    fn unknown_embedded_dataset() {
        let err = DataSource::Embedded.load::<Incident>("shelters.json").unwrap_err();
        assert!(matches!(err, DataError::UnknownDataset(name) if name == "shelters.json"));
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("events.json"),
            r#"[{"id":"EV-X","title":"Drill","category":"drill","location":"Gym","starts_at":"2024-11-01T08:00:00"}]"#,
        )
        .unwrap();

        let source = DataSource::from_dir(Some(dir.path()));
        let events: Vec<Event> = source.load("events.json").unwrap();
        assert_eq!(events[0].id, "EV-X");
        assert!(events[0].ends_at.is_none());

        let missing = source.load::<Incident>("incidents.json").unwrap_err();
        assert!(matches!(missing, DataError::Io { .. }));
    }

    #[test]
    fn malformed_dataset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("incidents.json"), "{ not json").unwrap();
        let err = DataSource::Dir(dir.path().to_path_buf())
            .load::<Incident>("incidents.json")
            .unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }
}
