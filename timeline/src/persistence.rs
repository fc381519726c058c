//! CSV load and store at the pipeline boundaries
//!
//! Reads the place and people tables and writes the expanded timeline. Column
//! names of the output are fixed; downstream renderers bind to them by name.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{LineageSide, Person, PersonId, PersonYear, Place};
use crate::dates;
use crate::error::{Result, TimelineError};

/// Output header, in write order
pub const COLUMNS: [&str; 22] = [
    "id",
    "first_name",
    "preposition",
    "surname",
    "date_of_birth",
    "date_of_death",
    "place_of_birth",
    "place_of_death",
    "mothers_side",
    "latitude_birth",
    "longitude_birth",
    "mercator_x_birth",
    "mercator_y_birth",
    "latitude_death",
    "longitude_death",
    "mercator_x_death",
    "mercator_y_death",
    "year_of_birth",
    "year_of_death",
    "year_of_reference",
    "alive_same_birthplace_count",
    "display_size",
];

// ============================================================================
// Row Structures
// ============================================================================

/// People table row as stored; dates may be empty
#[derive(Debug, Deserialize)]
struct PersonRow {
    id: u64,
    first_name: String,
    #[serde(default)]
    preposition: Option<String>,
    surname: String,
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
    place_of_birth: Option<String>,
    place_of_death: Option<String>,
    mothers_side: String,
}

impl PersonRow {
    fn into_person(self, life_span_years: i32) -> Result<Person> {
        let id = PersonId(self.id);
        let lineage = self
            .mothers_side
            .parse::<LineageSide>()
            .map_err(|_| TimelineError::UnknownLineage {
                id: Some(id),
                flag: self.mothers_side.clone(),
            })?;
        let (date_of_birth, date_of_death) =
            dates::fill_missing(self.date_of_birth, self.date_of_death, life_span_years);

        Ok(Person {
            id,
            first_name: self.first_name,
            preposition: self.preposition.unwrap_or_default(),
            surname: self.surname,
            date_of_birth,
            date_of_death,
            place_of_birth: self.place_of_birth,
            place_of_death: self.place_of_death,
            lineage,
        })
    }
}

/// Output row, field order matches [`COLUMNS`]
#[derive(Debug, Serialize)]
struct TimelineRow<'a> {
    id: u64,
    first_name: &'a str,
    preposition: &'a str,
    surname: &'a str,
    date_of_birth: NaiveDate,
    date_of_death: NaiveDate,
    place_of_birth: Option<&'a str>,
    place_of_death: Option<&'a str>,
    mothers_side: LineageSide,
    latitude_birth: Option<f64>,
    longitude_birth: Option<f64>,
    mercator_x_birth: Option<i64>,
    mercator_y_birth: Option<i64>,
    latitude_death: Option<f64>,
    longitude_death: Option<f64>,
    mercator_x_death: Option<i64>,
    mercator_y_death: Option<i64>,
    year_of_birth: i32,
    year_of_death: i32,
    year_of_reference: i32,
    alive_same_birthplace_count: u32,
    display_size: u32,
}

impl<'a> From<&'a PersonYear> for TimelineRow<'a> {
    fn from(record: &'a PersonYear) -> Self {
        let person = &record.person.person;
        let birth = record.person.birth;
        let death = record.person.death;

        TimelineRow {
            id: person.id.0,
            first_name: &person.first_name,
            preposition: &person.preposition,
            surname: &person.surname,
            date_of_birth: person.date_of_birth,
            date_of_death: person.date_of_death,
            place_of_birth: person.place_of_birth.as_deref(),
            place_of_death: person.place_of_death.as_deref(),
            mothers_side: person.lineage,
            latitude_birth: birth.map(|c| c.latitude),
            longitude_birth: birth.map(|c| c.longitude),
            mercator_x_birth: birth.map(|c| c.mercator_x),
            mercator_y_birth: birth.map(|c| c.mercator_y),
            latitude_death: death.map(|c| c.latitude),
            longitude_death: death.map(|c| c.longitude),
            mercator_x_death: death.map(|c| c.mercator_x),
            mercator_y_death: death.map(|c| c.mercator_y),
            year_of_birth: record.life.birth_year,
            year_of_death: record.life.death_year,
            year_of_reference: record.year_of_reference,
            alive_same_birthplace_count: record.alive_same_birthplace_count,
            display_size: record.display_size,
        }
    }
}

/// Result of writing a timeline file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveStats {
    pub rows: usize,
    pub file_bytes: u64,
}

// ============================================================================
// Load
// ============================================================================

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| TimelineError::io(path, e))
}

pub fn read_places<R: Read>(reader: R) -> Result<Vec<Place>> {
    let mut places = Vec::new();
    for row in csv_reader(reader).deserialize() {
        places.push(row?);
    }
    Ok(places)
}

pub fn load_places(path: impl AsRef<Path>) -> Result<Vec<Place>> {
    let path = path.as_ref();
    let places = read_places(open(path)?)?;
    debug!("Loaded {} places from {}", places.len(), path.display());
    Ok(places)
}

/// Read the people table, filling empty dates with placeholders.
pub fn read_people<R: Read>(reader: R, life_span_years: i32) -> Result<Vec<Person>> {
    let mut people = Vec::new();
    for row in csv_reader(reader).deserialize::<PersonRow>() {
        people.push(row?.into_person(life_span_years)?);
    }
    Ok(people)
}

pub fn load_people(path: impl AsRef<Path>, life_span_years: i32) -> Result<Vec<Person>> {
    let path = path.as_ref();
    let people = read_people(open(path)?, life_span_years)?;
    debug!("Loaded {} people from {}", people.len(), path.display());
    Ok(people)
}

// ============================================================================
// Store
// ============================================================================

/// Write the header and one line per record. The header is written even
/// when there are no records.
pub fn write_timeline<W: Write>(writer: W, records: &[PersonYear]) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(COLUMNS)?;
    for record in records {
        out.serialize(TimelineRow::from(record))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn save_timeline(path: impl AsRef<Path>, records: &[PersonYear]) -> Result<SaveStats> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| TimelineError::io(path, e))?;
    write_timeline(file, records)?;

    let file_bytes = fs::metadata(path)
        .map_err(|e| TimelineError::io(path, e))?
        .len();
    Ok(SaveStats {
        rows: records.len(),
        file_bytes,
    })
}
