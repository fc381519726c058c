//! Ancestor Timeline
//!
//! Expands a genealogical record set into one row per person per year, with
//! the number of people alive that year who share the person's birthplace.
//! The output feeds an animated birthplace map.

pub mod components;
pub mod config;
pub mod dates;
pub mod error;
pub mod persistence;
pub mod pipeline;
pub mod stages;
pub mod views;

pub use components::*;
pub use config::PipelineConfig;
pub use error::{Result, TimelineError};
pub use persistence::{load_people, load_places, save_timeline, SaveStats};
pub use pipeline::{Pipeline, Timeline};
pub use views::{Frame, YearCursor, YearSummary};
