//! Merge Stage
//!
//! Resolves birth and death place names to coordinates. People are never
//! dropped: a name with no matching place leaves that side empty.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::components::{Coordinates, EnrichedPerson, Person, Place};

/// Place lookup keyed by name. The first row wins on duplicate names.
pub struct PlaceIndex<'a> {
    by_name: HashMap<&'a str, Coordinates>,
}

impl<'a> PlaceIndex<'a> {
    pub fn build(places: &'a [Place]) -> Self {
        let mut by_name = HashMap::with_capacity(places.len());
        for place in places {
            if by_name.contains_key(place.name.as_str()) {
                warn!("Duplicate place {:?} ignored, keeping first entry", place.name);
                continue;
            }
            by_name.insert(place.name.as_str(), place.coordinates());
        }
        Self { by_name }
    }

    pub fn resolve(&self, name: Option<&str>) -> Option<Coordinates> {
        name.and_then(|n| self.by_name.get(n).copied())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Left-join `people` with `places`, once for the birthplace and once for
/// the deathplace. Output order follows `people`.
pub fn merge_places(people: &[Person], places: &[Place]) -> Vec<EnrichedPerson> {
    let index = PlaceIndex::build(places);
    let mut unresolved = 0usize;

    let enriched: Vec<EnrichedPerson> = people
        .iter()
        .map(|person| {
            let birth = index.resolve(person.place_of_birth.as_deref());
            let death = index.resolve(person.place_of_death.as_deref());

            if person.place_of_birth.is_some() && birth.is_none() {
                debug!(
                    "Person {}: birthplace {:?} not found",
                    person.id, person.place_of_birth
                );
                unresolved += 1;
            }
            if person.place_of_death.is_some() && death.is_none() {
                debug!(
                    "Person {}: deathplace {:?} not found",
                    person.id, person.place_of_death
                );
                unresolved += 1;
            }

            EnrichedPerson {
                person: person.clone(),
                birth,
                death,
            }
        })
        .collect();

    if unresolved > 0 {
        warn!("{} place references could not be resolved", unresolved);
    }
    debug!(
        "Merged {} people against {} places",
        enriched.len(),
        index.len()
    );

    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{LineageSide, PersonId};
    use chrono::NaiveDate;

    fn place(name: &str, x: i64) -> Place {
        Place {
            name: name.into(),
            latitude: 51.44,
            longitude: 5.47,
            mercator_x: x,
            mercator_y: 6_700_000,
        }
    }

    fn person(id: u64, born_in: Option<&str>, died_in: Option<&str>) -> Person {
        Person {
            id: PersonId(id),
            first_name: "Anna".into(),
            preposition: String::new(),
            surname: "Smits".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap(),
            date_of_death: NaiveDate::from_ymd_opt(1950, 1, 1).unwrap(),
            place_of_birth: born_in.map(String::from),
            place_of_death: died_in.map(String::from),
            lineage: LineageSide::Mother,
        }
    }

    #[test]
    fn test_both_sides_resolved_independently() {
        let places = vec![place("Eindhoven", 1), place("Tilburg", 2)];
        let people = vec![
            person(1, Some("Eindhoven"), Some("Tilburg")),
            person(2, Some("Tilburg"), Some("Eindhoven")),
        ];
        let merged = merge_places(&people, &places);

        assert_eq!(merged[0].birth.unwrap().mercator_x, 1);
        assert_eq!(merged[0].death.unwrap().mercator_x, 2);
        assert_eq!(merged[1].birth.unwrap().mercator_x, 2);
        assert_eq!(merged[1].death.unwrap().mercator_x, 1);
    }

    #[test]
    fn test_missing_place_keeps_person() {
        let places = vec![place("Eindhoven", 1)];
        let people = vec![
            person(1, Some("Atlantis"), None),
            person(2, None, Some("Eindhoven")),
        ];
        let merged = merge_places(&people, &places);

        assert_eq!(merged.len(), 2);
        assert!(merged[0].birth.is_none());
        assert!(merged[0].death.is_none());
        assert!(merged[1].birth.is_none());
        assert!(merged[1].death.is_some());
        assert_eq!(merged[0].person.place_of_birth.as_deref(), Some("Atlantis"));
    }

    #[test]
    fn test_duplicate_place_keeps_first() {
        let places = vec![place("Eindhoven", 1), place("Eindhoven", 99)];
        let index = PlaceIndex::build(&places);
        assert_eq!(index.len(), 1);
        assert!(!index.is_empty());
        assert!(PlaceIndex::build(&[]).is_empty());
        assert_eq!(index.resolve(Some("Eindhoven")).unwrap().mercator_x, 1);

        let merged = merge_places(&[person(1, Some("Eindhoven"), None)], &places);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_inputs_untouched() {
        let places = vec![place("Eindhoven", 1)];
        let people = vec![person(1, Some("Eindhoven"), None)];
        let before = people.clone();
        let _ = merge_places(&people, &places);
        assert_eq!(people, before);
    }
}
