//! Expansion Stage
//!
//! Turns one row per person into one row per (person, reference year).

use std::rc::Rc;

use tracing::debug;

use crate::components::{EnrichedPerson, ExpandedRecord, ReferenceYears};

/// Pair every person with every year of `years`.
///
/// Rows are person-major: all years of the first person in ascending order,
/// then the second person, and so on. No liveness filtering happens here.
pub fn expand_years(people: Vec<EnrichedPerson>, years: &ReferenceYears) -> Vec<ExpandedRecord> {
    let mut records = Vec::with_capacity(people.len().saturating_mul(years.len()));

    for person in people {
        let life = person.person.life_span();
        let person = Rc::new(person);
        for year in years.iter() {
            records.push(ExpandedRecord {
                person: Rc::clone(&person),
                life,
                year_of_reference: year,
            });
        }
    }

    debug!(
        "Expanded to {} rows over {}..={}",
        records.len(),
        years.first,
        years.last
    );
    records
}
