//! Pipeline - runs the merge, expansion and aggregation stages in order

use tracing::info;

use crate::components::{LineageSide, Person, PersonYear, Place, ReferenceYears};
use crate::config::PipelineConfig;
use crate::stages;
use crate::views::{self, Frame, YearSummary};

pub struct Pipeline {
    pub last_reference_year: i32,
}

impl Pipeline {
    pub fn new(last_reference_year: i32) -> Self {
        Self {
            last_reference_year,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.last_reference_year)
    }

    /// Build the full timeline for `people`. The inputs are only read.
    pub fn run(&self, people: &[Person], places: &[Place]) -> Timeline {
        let Some(years) = ReferenceYears::spanning(people, self.last_reference_year) else {
            info!("No people to expand, timeline is empty");
            return Timeline::default();
        };

        let enriched = stages::merge_places(people, places);
        info!("Merged {} people with {} places", enriched.len(), places.len());

        let expanded = stages::expand_years(enriched, &years);
        info!(
            "Expanded {} people over {} years ({}..={}) into {} rows",
            people.len(),
            years.len(),
            years.first,
            years.last,
            expanded.len()
        );

        let records = stages::aggregate(expanded);
        let visible = records.iter().filter(|r| r.is_visible()).count();
        info!("Aggregated {} rows, {} visible", records.len(), visible);

        Timeline {
            years: Some(years),
            records,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    /// `None` when there were no people
    pub years: Option<ReferenceYears>,
    pub records: Vec<PersonYear>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn year_frame(&self, year: i32) -> Vec<&PersonYear> {
        views::year_frame(&self.records, year)
    }

    pub fn lineage_frame(&self, year: i32, side: LineageSide) -> Vec<&PersonYear> {
        views::lineage_frame(&self.records, year, side)
    }

    pub fn frame(&self, year: i32) -> Frame {
        Frame::for_year(&self.records, year)
    }

    pub fn summaries(&self) -> Vec<YearSummary> {
        views::year_summaries(&self.records)
    }
}
