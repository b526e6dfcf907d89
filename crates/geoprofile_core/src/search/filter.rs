//! Substring filter over profile collections.
//!
//! # Responsibility
//! - Match a free-text query against one selectable profile field.
//!
//! # Invariants
//! - Matching is case-insensitive substring containment.
//! - A blank query returns the input unfiltered.
//! - Output order is input order; there is no relevance ranking.

use crate::model::profile::Profile;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Field a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    Name,
    /// City, state or country.
    Location,
    Occupation,
}

impl SearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Location => "location",
            Self::Occupation => "occupation",
        }
    }

    /// Parses a host-provided field name, falling back to `Name`.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl Display for SearchField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "location" => Ok(Self::Location),
            "occupation" => Ok(Self::Occupation),
            other => Err(format!(
                "unsupported search field `{other}`; expected name|location|occupation"
            )),
        }
    }
}

/// Search box state: query text plus the field it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileQuery {
    pub text: String,
    pub field: SearchField,
}

impl ProfileQuery {
    pub fn new(text: impl Into<String>, field: SearchField) -> Self {
        Self {
            text: text.into(),
            field,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether one profile satisfies this query.
    pub fn matches(&self, profile: &Profile) -> bool {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        match self.field {
            SearchField::Name => contains(&profile.name),
            SearchField::Location => {
                let address = &profile.address;
                contains(&address.city) || contains(&address.state) || contains(&address.country)
            }
            SearchField::Occupation => profile.occupation.as_deref().is_some_and(contains),
        }
    }
}

/// Filters `profiles` by `query`, preserving order.
pub fn filter_profiles<'a, I>(profiles: I, query: &ProfileQuery) -> Vec<Profile>
where
    I: IntoIterator<Item = &'a Profile>,
{
    profiles
        .into_iter()
        .filter(|profile| query.matches(profile))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ProfileQuery, SearchField};
    use crate::model::profile::{Address, GeoLocation, Profile};

    fn profile(name: &str, city: &str, occupation: Option<&str>) -> Profile {
        let mut profile = Profile::new(
            "x",
            name,
            "desc",
            Address {
                city: city.to_string(),
                state: "WA".to_string(),
                country: "USA".to_string(),
                location: GeoLocation::new(0.0, 0.0),
                ..Address::default()
            },
        );
        profile.occupation = occupation.map(str::to_string);
        profile
    }

    #[test]
    fn field_parse_is_lenient() {
        assert_eq!(SearchField::parse_lenient(" Location "), SearchField::Location);
        assert_eq!(SearchField::parse_lenient("company"), SearchField::Name);
    }

    #[test]
    fn location_matches_state_and_country() {
        let target = profile("Ann", "Seattle", None);
        assert!(ProfileQuery::new("wa", SearchField::Location).matches(&target));
        assert!(ProfileQuery::new("usa", SearchField::Location).matches(&target));
        assert!(!ProfileQuery::new("boston", SearchField::Location).matches(&target));
    }

    #[test]
    fn occupation_never_matches_missing_value() {
        let target = profile("Ann", "Seattle", None);
        assert!(!ProfileQuery::new("eng", SearchField::Occupation).matches(&target));
        assert!(ProfileQuery::new("  ", SearchField::Occupation).matches(&target));
    }
}
