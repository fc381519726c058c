//! Aggregation Stage
//!
//! For every (person, year) row, counts the people alive that year who were
//! born in the same place, and derives the glyph size from that count.

use std::collections::HashMap;

use tracing::debug;

use crate::components::{ExpandedRecord, PersonYear};

/// Added to a non-zero count so any present ancestor gets a visible glyph
pub const DISPLAY_SIZE_OFFSET: u32 = 5;

/// Glyph size for a same-birthplace count: `count + 5`, or 0 when nobody is alive.
pub fn display_size(count: u32) -> u32 {
    if count > 0 {
        count + DISPLAY_SIZE_OFFSET
    } else {
        0
    }
}

/// Alive people per (reference year, birthplace).
///
/// Built from the expansion columns only. Rows without a birthplace never
/// match anyone, themselves included.
pub struct BirthplaceIndex<'a> {
    alive: HashMap<(i32, &'a str), u32>,
}

impl<'a> BirthplaceIndex<'a> {
    pub fn build(records: &'a [ExpandedRecord]) -> Self {
        let mut alive: HashMap<(i32, &'a str), u32> = HashMap::new();
        for record in records.iter().filter(|r| r.is_alive()) {
            if let Some(place) = record.place_of_birth() {
                *alive.entry((record.year_of_reference, place)).or_default() += 1;
            }
        }
        Self { alive }
    }

    pub fn count(&self, year: i32, place: &str) -> u32 {
        self.alive.get(&(year, place)).copied().unwrap_or(0)
    }

    /// Count for one row; 0 when the row's person is not alive that year.
    pub fn count_for(&self, record: &ExpandedRecord) -> u32 {
        if !record.is_alive() {
            return 0;
        }
        record
            .place_of_birth()
            .map(|place| self.count(record.year_of_reference, place))
            .unwrap_or(0)
    }
}

/// Assign counts and display sizes to every expanded row. Row order is kept.
pub fn aggregate(records: Vec<ExpandedRecord>) -> Vec<PersonYear> {
    let counts: Vec<u32> = {
        let index = BirthplaceIndex::build(&records);
        debug!("Indexed {} (year, birthplace) groups", index.alive.len());
        records.iter().map(|r| index.count_for(r)).collect()
    };

    records
        .into_iter()
        .zip(counts)
        .map(|(record, count)| PersonYear {
            person: record.person,
            life: record.life,
            year_of_reference: record.year_of_reference,
            alive_same_birthplace_count: count,
            display_size: display_size(count),
        })
        .collect()
}
