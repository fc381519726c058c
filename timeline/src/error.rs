//! Error type shared by the loaders, writers and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::components::PersonId;

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown lineage flag {flag:?}{}", id.map(|id| format!(" for person {id}")).unwrap_or_default())]
    UnknownLineage { id: Option<PersonId>, flag: String },
}

impl TimelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TimelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;
