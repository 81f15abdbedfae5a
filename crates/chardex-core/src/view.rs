// Pure filtering and sorting over character collections
//
// No favorite state in here: the starred/others scope needs the registry
// to resolve and is applied by the catalog controller instead. Status and
// gender criteria are matched by the catalog service itself, so the
// client-side pass only re-checks what locally injected favorites could
// have skipped: name and species.

use crate::models::{Character, FilterCriteria, SortField, SortOrder};

/// Keep the characters matching the criteria, in their original order.
pub fn filter_characters(characters: &[Character], criteria: &FilterCriteria) -> Vec<Character> {
    characters
        .iter()
        .filter(|character| matches(character, criteria))
        .cloned()
        .collect()
}

fn matches(character: &Character, criteria: &FilterCriteria) -> bool {
    if let Some(ref name) = criteria.name {
        if !character
            .name
            .to_lowercase()
            .contains(&name.to_lowercase())
        {
            return false;
        }
    }

    if let Some(ref species) = criteria.species {
        if !character.species.eq_ignore_ascii_case(species) {
            return false;
        }
    }

    true
}

/// Sort into a fresh collection.
///
/// Descending order reverses the comparator, not the sorted vec, so
/// characters with equal keys keep their original relative order either
/// way.
pub fn sort_characters(
    characters: Vec<Character>,
    field: SortField,
    order: SortOrder,
) -> Vec<Character> {
    let mut sorted = characters;
    sorted.sort_by(|a, b| {
        let ordering = sort_key(a, field).cmp(&sort_key(b, field));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn sort_key(character: &Character, field: SortField) -> String {
    match field {
        SortField::Name => character.name.to_lowercase(),
        SortField::Status => character.status.as_str().to_lowercase(),
        SortField::Species => character.species.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CharacterGender, CharacterStatus, LocationRef};

    fn character(id: &str, name: &str, species: &str, status: CharacterStatus) -> Character {
        Character {
            id: id.to_string(),
            name: name.to_string(),
            status,
            species: species.to_string(),
            kind: String::new(),
            gender: CharacterGender::Unknown,
            image: String::new(),
            origin: LocationRef::default(),
            location: LocationRef::default(),
            episode: Vec::new(),
            created: None,
        }
    }

    fn cast() -> Vec<Character> {
        vec![
            character("1", "Rick Sanchez", "Human", CharacterStatus::Alive),
            character("2", "Morty Smith", "Human", CharacterStatus::Alive),
            character("3", "Birdperson", "Bird-Person", CharacterStatus::Dead),
            character("4", "Mr. Meeseeks", "Meeseeks", CharacterStatus::Unknown),
        ]
    }

    fn names(characters: &[Character]) -> Vec<&str> {
        characters.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_empty_criteria_keeps_everything() {
        let all = cast();
        let filtered = filter_characters(&all, &FilterCriteria::default());
        assert_eq!(filtered, all);
    }

    #[test]
    fn test_name_filter_is_substring_and_case_insensitive() {
        let criteria = FilterCriteria {
            name: Some("RICK".to_string()),
            ..Default::default()
        };

        let filtered = filter_characters(&cast(), &criteria);
        assert_eq!(names(&filtered), vec!["Rick Sanchez"]);
    }

    #[test]
    fn test_species_filter_is_exact_and_case_insensitive() {
        let criteria = FilterCriteria {
            species: Some("human".to_string()),
            ..Default::default()
        };

        let filtered = filter_characters(&cast(), &criteria);
        assert_eq!(names(&filtered), vec!["Rick Sanchez", "Morty Smith"]);

        // "Bird" is not "Bird-Person" - substring matching would be wrong here
        let criteria = FilterCriteria {
            species: Some("Bird".to_string()),
            ..Default::default()
        };
        assert!(filter_characters(&cast(), &criteria).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let criteria = FilterCriteria {
            name: Some("r".to_string()),
            species: Some("Human".to_string()),
            ..Default::default()
        };

        let once = filter_characters(&cast(), &criteria);
        let twice = filter_characters(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_by_name_asc() {
        let sorted = sort_characters(cast(), SortField::Name, SortOrder::Asc);
        assert_eq!(
            names(&sorted),
            vec!["Birdperson", "Morty Smith", "Mr. Meeseeks", "Rick Sanchez"]
        );
    }

    #[test]
    fn test_desc_is_reversed_asc_without_ties() {
        let asc = sort_characters(cast(), SortField::Name, SortOrder::Asc);
        let mut desc = sort_characters(cast(), SortField::Name, SortOrder::Desc);

        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let characters = vec![
            character("10", "Rick Sanchez", "Human", CharacterStatus::Alive),
            character("20", "rick sanchez", "Human", CharacterStatus::Alive),
            character("30", "Abradolf Lincler", "Human", CharacterStatus::Unknown),
        ];

        let sorted = sort_characters(characters, SortField::Name, SortOrder::Asc);
        let ids: Vec<&str> = sorted.iter().map(|c| c.id.as_str()).collect();
        // The two Ricks compare equal (case-insensitive) and keep their order
        assert_eq!(ids, vec!["30", "10", "20"]);
    }

    #[test]
    fn test_desc_preserves_tie_order() {
        let characters = vec![
            character("10", "Rick Sanchez", "Human", CharacterStatus::Alive),
            character("20", "rick sanchez", "Human", CharacterStatus::Alive),
            character("30", "Abradolf Lincler", "Human", CharacterStatus::Unknown),
        ];

        let sorted = sort_characters(characters, SortField::Name, SortOrder::Desc);
        let ids: Vec<&str> = sorted.iter().map(|c| c.id.as_str()).collect();
        // Reversing the comparator moves Lincler last but leaves the tied
        // Ricks in insertion order
        assert_eq!(ids, vec!["10", "20", "30"]);
    }

    #[test]
    fn test_sort_by_status() {
        let sorted = sort_characters(cast(), SortField::Status, SortOrder::Asc);
        let statuses: Vec<CharacterStatus> = sorted.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                CharacterStatus::Alive,
                CharacterStatus::Alive,
                CharacterStatus::Dead,
                CharacterStatus::Unknown,
            ]
        );
    }
}
