//! Pipeline stages - each takes the previous stage's table and returns a new one
//!
//! Run in order: merge, expansion, aggregation.

pub mod merge;
pub mod expansion;
pub mod aggregation;

pub use merge::merge_places;
pub use expansion::expand_years;
pub use aggregation::{aggregate, display_size};
