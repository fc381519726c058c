//! Pipeline configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all) is
//! a valid configuration. Command line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Highest year accepted as the end of the timeline
pub const MAX_REFERENCE_YEAR: i32 = 9999;

/// Longest life span accepted for people with only a birth date
pub const MAX_LIFE_SPAN_YEARS: i32 = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Last year of the timeline, inclusive
    #[serde(default = "PipelineConfig::default_last_reference_year")]
    pub last_reference_year: i32,

    #[serde(default = "PipelineConfig::default_people_path")]
    pub people_path: PathBuf,

    #[serde(default = "PipelineConfig::default_places_path")]
    pub places_path: PathBuf,

    #[serde(default = "PipelineConfig::default_output_path")]
    pub output_path: PathBuf,

    /// Assumed life span when only the birth date is known
    #[serde(default = "PipelineConfig::default_unknown_life_span_years")]
    pub unknown_life_span_years: i32,
}

impl PipelineConfig {
    const fn default_last_reference_year() -> i32 {
        1940
    }

    const fn default_unknown_life_span_years() -> i32 {
        50
    }

    fn default_people_path() -> PathBuf {
        PathBuf::from("maps_ancestors.csv")
    }

    fn default_places_path() -> PathBuf {
        PathBuf::from("maps_cities.csv")
    }

    fn default_output_path() -> PathBuf {
        PathBuf::from("exported_ancestor_list.csv")
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| TimelineError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_LIFE_SPAN_YEARS).contains(&self.unknown_life_span_years) {
            return Err(TimelineError::InvalidConfig(format!(
                "unknown_life_span_years must be between 1 and {}, got {}",
                MAX_LIFE_SPAN_YEARS, self.unknown_life_span_years
            )));
        }
        if !(1..=MAX_REFERENCE_YEAR).contains(&self.last_reference_year) {
            return Err(TimelineError::InvalidConfig(format!(
                "last_reference_year must be between 1 and {}, got {}",
                MAX_REFERENCE_YEAR, self.last_reference_year
            )));
        }
        Ok(())
    }

    pub fn with_last_reference_year(mut self, year: i32) -> Self {
        self.last_reference_year = year;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            last_reference_year: Self::default_last_reference_year(),
            people_path: Self::default_people_path(),
            places_path: Self::default_places_path(),
            output_path: Self::default_output_path(),
            unknown_life_span_years: Self::default_unknown_life_span_years(),
        }
    }
}
