use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Character model - the star of the show
///
/// Characters are immutable value objects once fetched; the catalog is
/// their sole owner. Two characters with the same id are the same
/// character, even when their attributes drifted between fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    /// The catalog's free-form subtype field ("Parasite", "Clone", ...)
    #[serde(default, rename = "type")]
    pub kind: String,
    pub gender: CharacterGender,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub origin: LocationRef,
    #[serde(default)]
    pub location: LocationRef,
    #[serde(default)]
    pub episode: Vec<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Whether a character is currently among the living
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterStatus {
    Alive,
    Dead,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl CharacterStatus {
    /// Lenient conversion from wire strings; anything unrecognized is
    /// `Unknown` rather than a parse failure.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "alive" => CharacterStatus::Alive,
            "dead" => CharacterStatus::Dead,
            _ => CharacterStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterStatus::Alive => "Alive",
            CharacterStatus::Dead => "Dead",
            CharacterStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterGender {
    Female,
    Male,
    Genderless,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl CharacterGender {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "female" => CharacterGender::Female,
            "male" => CharacterGender::Male,
            "genderless" => CharacterGender::Genderless,
            _ => CharacterGender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterGender::Female => "Female",
            CharacterGender::Male => "Male",
            CharacterGender::Genderless => "Genderless",
            CharacterGender::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CharacterGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named reference to a place in the catalog (origin or last known
/// location).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Filter criteria driving the derived view.
///
/// `name`/`status`/`species`/`gender` go to the catalog with each page
/// request; `scope` never leaves the client - it picks one side of the
/// starred/regular split and needs favorite state to resolve.
///
/// Criteria are plain values, replaced wholesale on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<FavoriteScope>,
}

/// Restrict the view to one side of the starred/regular split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteScope {
    Starred,
    Others,
}

/// How we want results sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Status,
    Species,
}

impl SortField {
    /// Unknown input falls back to sorting by name.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "status" => SortField::Status,
            "species" => SortField::Species,
            _ => SortField::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Status => "status",
            SortField::Species => "species",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "desc" | "descending" => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!(CharacterStatus::parse("Alive"), CharacterStatus::Alive);
        assert_eq!(CharacterStatus::parse("dead"), CharacterStatus::Dead);
        assert_eq!(CharacterStatus::parse("unknown"), CharacterStatus::Unknown);
        assert_eq!(CharacterStatus::parse("zombie?"), CharacterStatus::Unknown);
    }

    #[test]
    fn test_status_round_trips_through_json() {
        let json = serde_json::to_string(&CharacterStatus::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");

        let parsed: CharacterStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, CharacterStatus::Unknown);
    }

    #[test]
    fn test_sort_field_falls_back_to_name() {
        assert_eq!(SortField::parse("species"), SortField::Species);
        assert_eq!(SortField::parse("STATUS"), SortField::Status);
        assert_eq!(SortField::parse("created"), SortField::Name);
        assert_eq!(SortField::parse(""), SortField::Name);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Asc);
    }

    #[test]
    fn test_filter_criteria_round_trip() {
        let criteria = FilterCriteria {
            name: Some("rick".to_string()),
            species: Some("Human".to_string()),
            scope: Some(FavoriteScope::Starred),
            ..Default::default()
        };

        let json = serde_json::to_string(&criteria).unwrap();
        let parsed: FilterCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, criteria);
    }
}
