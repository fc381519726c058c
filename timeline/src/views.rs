//! Read-only views over a finished timeline
//!
//! These mirror what the map renderer asks of the output table: the visible
//! points for one year, optionally split by lineage side, a cursor for
//! stepping through the years, and per-year totals.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::components::{LineageSide, PersonYear, ReferenceYears};
use crate::error::Result;

/// Rows to draw for `year`: that year's rows with a non-zero count.
pub fn year_frame(records: &[PersonYear], year: i32) -> Vec<&PersonYear> {
    records
        .iter()
        .filter(|r| r.year_of_reference == year && r.is_visible())
        .collect()
}

/// [`year_frame`] restricted to one lineage side.
pub fn lineage_frame(records: &[PersonYear], year: i32, side: LineageSide) -> Vec<&PersonYear> {
    records
        .iter()
        .filter(|r| r.year_of_reference == year && r.is_visible())
        .filter(|r| r.person.person.lineage == side)
        .collect()
}

// ============================================================================
// Year cursor
// ============================================================================

/// Position on an animation timeline over `first..=last`.
///
/// Stepping past either end wraps around to the other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCursor {
    years: ReferenceYears,
    current: i32,
}

impl YearCursor {
    /// Starts at `last`. `first` and `last` are swapped if given in reverse.
    pub fn new(first: i32, last: i32) -> Self {
        let (first, last) = if first <= last { (first, last) } else { (last, first) };
        Self {
            years: ReferenceYears::new(first, last),
            current: last,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    /// Jump to `year`, clamped into the range.
    pub fn seek(&mut self, year: i32) -> i32 {
        self.current = if self.years.contains(year) {
            year
        } else {
            year.clamp(self.years.first, self.years.last)
        };
        self.current
    }

    pub fn forward(&mut self) -> i32 {
        self.current = if self.current >= self.years.last {
            self.years.first
        } else {
            self.current + 1
        };
        self.current
    }

    pub fn backward(&mut self) -> i32 {
        self.current = if self.current <= self.years.first {
            self.years.last
        } else {
            self.current - 1
        };
        self.current
    }
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    /// People alive with a known birthplace
    pub alive: u32,
    /// Distinct birthplaces with at least one person alive
    pub birthplaces: u32,
}

/// Per-year totals over the visible rows, ordered by year.
///
/// Every year that appears in `records` gets an entry, including years in
/// which nobody is visible.
pub fn year_summaries(records: &[PersonYear]) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<i32, (u32, HashSet<&str>)> = BTreeMap::new();

    for record in records {
        let entry = by_year.entry(record.year_of_reference).or_default();
        if !record.is_visible() {
            continue;
        }
        entry.0 += 1;
        if let Some(place) = record.person.person.place_of_birth.as_deref() {
            entry.1.insert(place);
        }
    }

    by_year
        .into_iter()
        .map(|(year, (alive, places))| YearSummary {
            year,
            alive,
            birthplaces: places.len() as u32,
        })
        .collect()
}

// ============================================================================
// Frame export
// ============================================================================

/// One animation frame as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub year: i32,
    pub points: Vec<FramePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramePoint {
    pub id: u64,
    pub name: String,
    pub place_of_birth: Option<String>,
    pub date_of_birth: String,
    pub lineage: LineageSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mercator_x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mercator_y: Option<i64>,
    pub display_size: u32,
}

impl Frame {
    pub fn for_year(records: &[PersonYear], year: i32) -> Self {
        let points = year_frame(records, year)
            .into_iter()
            .map(|r| {
                let person = &r.person.person;
                FramePoint {
                    id: person.id.0,
                    name: person.full_name(),
                    place_of_birth: person.place_of_birth.clone(),
                    date_of_birth: person.date_of_birth.format("%Y-%m-%d").to_string(),
                    lineage: person.lineage,
                    mercator_x: r.person.birth.map(|c| c.mercator_x),
                    mercator_y: r.person.birth.map(|c| c.mercator_y),
                    display_size: r.display_size,
                }
            })
            .collect();
        Self { year, points }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Coordinates, EnrichedPerson, Person, PersonId};
    use crate::stages::{aggregate, expand_years};
    use chrono::NaiveDate;

    fn enriched(id: u64, born: i32, died: i32, place: &str, side: LineageSide) -> EnrichedPerson {
        EnrichedPerson {
            person: Person {
                id: PersonId(id),
                first_name: "Johanna".into(),
                preposition: "van".into(),
                surname: "Drunen".into(),
                date_of_birth: NaiveDate::from_ymd_opt(born, 4, 2).unwrap(),
                date_of_death: NaiveDate::from_ymd_opt(died, 8, 9).unwrap(),
                place_of_birth: Some(place.into()),
                place_of_death: None,
                lineage: side,
            },
            birth: Some(Coordinates {
                latitude: 51.5,
                longitude: 5.0,
                mercator_x: 556_597,
                mercator_y: 6_710_219,
            }),
            death: None,
        }
    }

    fn records() -> Vec<PersonYear> {
        aggregate(expand_years(
            vec![
                enriched(1, 1900, 1930, "Tilburg", LineageSide::Mother),
                enriched(2, 1905, 1940, "Tilburg", LineageSide::Father),
                enriched(3, 1925, 1940, "Oss", LineageSide::Both),
            ],
            &ReferenceYears::new(1900, 1940),
        ))
    }

    #[test]
    fn test_year_frame_filters_year_and_visibility() {
        let records = records();
        let ids: Vec<u64> = year_frame(&records, 1910).iter().map(|r| r.id().0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(year_frame(&records, 1850).is_empty());
    }

    #[test]
    fn test_lineage_frame() {
        let records = records();
        let mother: Vec<u64> = lineage_frame(&records, 1927, LineageSide::Mother)
            .iter()
            .map(|r| r.id().0)
            .collect();
        assert_eq!(mother, vec![1]);
        let both = lineage_frame(&records, 1927, LineageSide::Both);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].display_size, 6);
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let mut cursor = YearCursor::new(1800, 1802);
        assert_eq!(cursor.current(), 1802);
        assert_eq!(cursor.forward(), 1800);
        assert_eq!(cursor.forward(), 1801);
        assert_eq!(cursor.backward(), 1800);
        assert_eq!(cursor.backward(), 1802);
        assert_eq!(cursor.seek(1700), 1800);
        assert_eq!(cursor.seek(2000), 1802);
        assert_eq!(cursor.seek(1801), 1801);
        assert_eq!(cursor.forward(), 1802);
    }

    #[test]
    fn test_cursor_reversed_bounds() {
        let mut cursor = YearCursor::new(1940, 1901);
        assert_eq!(cursor.current(), 1940);
        assert_eq!(cursor.forward(), 1901);
    }

    #[test]
    fn test_cursor_single_year() {
        let mut cursor = YearCursor::new(1940, 1940);
        assert_eq!(cursor.forward(), 1940);
        assert_eq!(cursor.backward(), 1940);
    }

    #[test]
    fn test_year_summaries() {
        let summaries = year_summaries(&records());
        assert_eq!(summaries.len(), 41);
        assert_eq!(summaries[0], YearSummary { year: 1900, alive: 1, birthplaces: 1 });

        let y1927 = summaries.iter().find(|s| s.year == 1927).unwrap();
        assert_eq!(y1927.alive, 3);
        assert_eq!(y1927.birthplaces, 2);

        let y1940 = summaries.last().unwrap();
        assert_eq!(y1940, &YearSummary { year: 1940, alive: 2, birthplaces: 2 });
    }

    #[test]
    fn test_frame_json() {
        let frame = Frame::for_year(&records(), 1927);
        assert_eq!(frame.points.len(), 3);
        assert_eq!(frame.points[0].name, "Johanna van Drunen");
        assert_eq!(frame.points[0].display_size, 7);

        let json: serde_json::Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(json["year"], 1927);
        assert_eq!(json["points"][2]["lineage"], "X");
        assert_eq!(json["points"][0]["date_of_birth"], "1900-04-02");
        assert_eq!(json["points"][0]["mercator_x"], 556_597);
    }
}
