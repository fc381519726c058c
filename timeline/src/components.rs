//! Record types flowing through the timeline pipeline
//!
//! Places and people are loaded once and never mutated. Each stage wraps the
//! previous stage's records in a new type instead of filling in columns, so a
//! stage can only read what earlier stages have already produced.

use std::fmt;
use std::ops::RangeInclusive;
use std::rc::Rc;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of the family tree a person belongs to.
///
/// Serialized with the single-letter flags used by the source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineageSide {
    #[serde(rename = "Y")]
    Mother,
    #[serde(rename = "N")]
    Father,
    #[serde(rename = "X")]
    Both,
}

impl LineageSide {
    pub fn flag(&self) -> &'static str {
        match self {
            LineageSide::Mother => "Y",
            LineageSide::Father => "N",
            LineageSide::Both => "X",
        }
    }
}

impl FromStr for LineageSide {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Y" => Ok(LineageSide::Mother),
            "N" => Ok(LineageSide::Father),
            "X" => Ok(LineageSide::Both),
            other => Err(TimelineError::UnknownLineage {
                id: None,
                flag: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Places
// ============================================================================

/// A named location with geographic and pre-projected map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub mercator_x: i64,
    pub mercator_y: i64,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
            mercator_x: self.mercator_x,
            mercator_y: self.mercator_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub mercator_x: i64,
    pub mercator_y: i64,
}

// ============================================================================
// People
// ============================================================================

/// One ancestor as delivered by the data preparation step.
///
/// Both dates are always present; unknown dates arrive as sentinel values and
/// are treated like any other date.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub preposition: String,
    pub surname: String,
    pub date_of_birth: NaiveDate,
    pub date_of_death: NaiveDate,
    pub place_of_birth: Option<String>,
    pub place_of_death: Option<String>,
    pub lineage: LineageSide,
}

impl Person {
    pub fn year_of_birth(&self) -> i32 {
        self.date_of_birth.year()
    }

    pub fn year_of_death(&self) -> i32 {
        self.date_of_death.year()
    }

    pub fn life_span(&self) -> LifeSpan {
        LifeSpan {
            birth_year: self.year_of_birth(),
            death_year: self.year_of_death(),
        }
    }

    /// Display name, e.g. "Jan van Drunen". An empty preposition is skipped.
    pub fn full_name(&self) -> String {
        [
            self.first_name.as_str(),
            self.preposition.as_str(),
            self.surname.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Calendar years a person lived, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifeSpan {
    pub birth_year: i32,
    pub death_year: i32,
}

impl LifeSpan {
    pub fn new(birth_year: i32, death_year: i32) -> Self {
        Self {
            birth_year,
            death_year,
        }
    }

    pub fn is_alive_in(&self, year: i32) -> bool {
        self.birth_year <= year && year <= self.death_year
    }
}

/// A person with both place references resolved to coordinates.
///
/// A reference that matched no place leaves its side `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPerson {
    pub person: Person,
    pub birth: Option<Coordinates>,
    pub death: Option<Coordinates>,
}

// ============================================================================
// Reference years
// ============================================================================

/// Closed range of years the timeline covers.
///
/// The range is empty when `first > last`, e.g. when every known birth lies
/// after the last reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceYears {
    pub first: i32,
    pub last: i32,
}

impl ReferenceYears {
    pub fn new(first: i32, last: i32) -> Self {
        Self { first, last }
    }

    /// Range from the earliest birth year among `people` up to `last`.
    /// Returns `None` when there are no people.
    pub fn spanning(people: &[Person], last: i32) -> Option<Self> {
        people
            .iter()
            .map(Person::year_of_birth)
            .min()
            .map(|first| Self::new(first, last))
    }

    pub fn len(&self) -> usize {
        if self.first > self.last {
            0
        } else {
            (i64::from(self.last) - i64::from(self.first)) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, year: i32) -> bool {
        self.first <= year && year <= self.last
    }

    pub fn iter(&self) -> RangeInclusive<i32> {
        self.first..=self.last
    }
}

// ============================================================================
// Per-year records
// ============================================================================

/// One person stamped with one reference year, before aggregation.
#[derive(Debug, Clone)]
pub struct ExpandedRecord {
    pub person: Rc<EnrichedPerson>,
    pub life: LifeSpan,
    pub year_of_reference: i32,
}

impl ExpandedRecord {
    pub fn is_alive(&self) -> bool {
        self.life.is_alive_in(self.year_of_reference)
    }

    pub fn place_of_birth(&self) -> Option<&str> {
        self.person.person.place_of_birth.as_deref()
    }
}

/// Final output row: a person in a reference year with the
/// same-birthplace alive count and the glyph size derived from it.
#[derive(Debug, Clone)]
pub struct PersonYear {
    pub person: Rc<EnrichedPerson>,
    pub life: LifeSpan,
    pub year_of_reference: i32,
    pub alive_same_birthplace_count: u32,
    pub display_size: u32,
}

impl PersonYear {
    pub fn id(&self) -> PersonId {
        self.person.person.id
    }

    pub fn is_visible(&self) -> bool {
        self.alive_same_birthplace_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn person(id: u64, born: NaiveDate, died: NaiveDate) -> Person {
        Person {
            id: PersonId(id),
            first_name: "Jan".into(),
            preposition: String::new(),
            surname: "Drunen".into(),
            date_of_birth: born,
            date_of_death: died,
            place_of_birth: Some("Eindhoven".into()),
            place_of_death: None,
            lineage: LineageSide::Father,
        }
    }

    #[test]
    fn test_life_span_is_inclusive() {
        let life = LifeSpan::new(1900, 1950);
        assert!(life.is_alive_in(1900));
        assert!(life.is_alive_in(1950));
        assert!(!life.is_alive_in(1899));
        assert!(!life.is_alive_in(1951));
    }

    #[test]
    fn test_life_span_uses_calendar_year() {
        let p = person(1, date(1900, 12, 31), date(1950, 1, 1));
        assert_eq!(p.life_span(), LifeSpan::new(1900, 1950));
    }

    #[test]
    fn test_reference_years_from_earliest_birth() {
        let people = vec![
            person(1, date(1910, 5, 1), date(1960, 1, 1)),
            person(2, date(1885, 2, 3), date(1940, 1, 1)),
        ];
        let years = ReferenceYears::spanning(&people, 1940).unwrap();
        assert_eq!(years.first, 1885);
        assert_eq!(years.len(), 56);
        assert_eq!(years.iter().last(), Some(1940));
    }

    #[test]
    fn test_reference_years_empty_cases() {
        assert!(ReferenceYears::spanning(&[], 1940).is_none());

        let late = ReferenceYears::new(2199, 1940);
        assert!(late.is_empty());
        assert_eq!(late.iter().count(), 0);
        assert!(!late.contains(1940));
    }

    #[test]
    fn test_reference_years_contains_bounds() {
        let years = ReferenceYears::new(1900, 1940);
        assert!(years.contains(1900));
        assert!(years.contains(1940));
        assert!(!years.contains(1899));
        assert!(!years.contains(1941));
    }

    #[test]
    fn test_reference_years_len_wide_range() {
        let years = ReferenceYears::new(-262_000, i32::MAX);
        assert_eq!(years.len(), (i32::MAX as usize) + 262_001);
    }

    #[test]
    fn test_full_name_skips_empty_preposition() {
        let mut p = person(1, date(1900, 1, 1), date(1950, 1, 1));
        assert_eq!(p.full_name(), "Jan Drunen");
        p.preposition = "van".into();
        assert_eq!(p.full_name(), "Jan van Drunen");
    }

    #[test]
    fn test_lineage_flags() {
        assert_eq!("Y".parse::<LineageSide>().unwrap(), LineageSide::Mother);
        assert_eq!(" N ".parse::<LineageSide>().unwrap(), LineageSide::Father);
        assert_eq!(LineageSide::Both.flag(), "X");
        assert!("maybe".parse::<LineageSide>().is_err());
    }
}
