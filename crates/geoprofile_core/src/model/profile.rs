//! Profile domain model.
//!
//! # Responsibility
//! - Define the person record shown in lists, detail views and map markers.
//! - Provide validation used by every store write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another profile.
//! - `name`, `description` and `address.city` are non-blank for saved profiles.
//! - `address.location` is finite with lat in [-90, 90] and lng in [-180, 180].

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Avatar assigned to profiles created without a picture.
pub const DEFAULT_AVATAR_URL: &str = "https://randomuser.me/api/portraits/lego/1.jpg";

const LAT_LIMIT: f64 = 90.0;
const LNG_LIMIT: f64 = 180.0;

/// Stable identifier for one profile.
///
/// Seeded records use short numeric ids (`"1"`..`"6"`); records created
/// through the store receive a generated UUID v4 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh globally unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for ProfileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ProfileId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProfileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProfileId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// WGS84 point used for marker placement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
}

impl GeoLocation {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Checks that both coordinates are finite and inside WGS84 bounds.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        let lat_ok = self.lat.is_finite() && (-LAT_LIMIT..=LAT_LIMIT).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-LNG_LIMIT..=LNG_LIMIT).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(ProfileValidationError::InvalidLocation {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Postal address plus its resolved map location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    /// Required for a profile to be saveable.
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub location: GeoLocation,
}

/// Canonical person record.
///
/// Serialized with camelCase field names (`zipCode`, `socialLinks`) so the
/// JSON shape matches what host UIs exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub avatar: String,
    pub description: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Insertion order is display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Platform name (`twitter`, `linkedin`, ...) to profile URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<BTreeMap<String, String>>,
}

impl Profile {
    /// Creates a profile with required fields and the default avatar.
    ///
    /// Optional contact/social fields start as `None`.
    pub fn new(
        id: impl Into<ProfileId>,
        name: impl Into<String>,
        description: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
            description: description.into(),
            address,
            phone: None,
            email: None,
            website: None,
            interests: None,
            occupation: None,
            company: None,
            social_links: None,
        }
    }

    /// Validates the save-time invariants.
    ///
    /// Identity is not checked here; stores decide whether an id is assigned
    /// or must already exist.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyName);
        }
        if self.address.city.trim().is_empty() {
            return Err(ProfileValidationError::EmptyCity);
        }
        if self.description.trim().is_empty() {
            return Err(ProfileValidationError::EmptyDescription);
        }
        self.address.location.validate()
    }

    pub fn location(&self) -> GeoLocation {
        self.address.location
    }

    /// Single-character marker label (first character of the name).
    pub fn marker_glyph(&self) -> String {
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Uppercase initials used when the avatar image is unavailable.
    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    /// Returns interests in display order, empty when unset.
    pub fn interests(&self) -> &[String] {
        self.interests.as_deref().unwrap_or(&[])
    }
}

/// Builds uppercase initials from whitespace-separated name parts.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Save-time validation failures for profile records.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileValidationError {
    /// Updates and deletes need a non-blank identity.
    BlankId,
    EmptyName,
    EmptyCity,
    EmptyDescription,
    InvalidLocation { lat: f64, lng: f64 },
}

impl ProfileValidationError {
    /// Whether the error comes from a missing required form field.
    pub fn is_missing_required_field(&self) -> bool {
        matches!(
            self,
            Self::EmptyName | Self::EmptyCity | Self::EmptyDescription
        )
    }
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "profile id must not be blank"),
            Self::EmptyName => write!(f, "profile name is required"),
            Self::EmptyCity => write!(f, "profile address city is required"),
            Self::EmptyDescription => write!(f, "profile description is required"),
            Self::InvalidLocation { lat, lng } => write!(
                f,
                "location ({lat}, {lng}) is outside lat [-90, 90] / lng [-180, 180]"
            ),
        }
    }
}

impl Error for ProfileValidationError {}

#[cfg(test)]
mod tests {
    use super::{initials, Address, GeoLocation, Profile, ProfileValidationError};

    fn address(city: &str) -> Address {
        Address {
            city: city.to_string(),
            location: GeoLocation::new(47.6062, -122.3321),
            ..Address::default()
        }
    }

    #[test]
    fn initials_take_first_letter_of_each_part() {
        assert_eq!(initials("sophia  chen"), "SC");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn marker_glyph_falls_back_for_blank_name() {
        let mut profile = Profile::new("1", "Emma", "desc", address("Seattle"));
        assert_eq!(profile.marker_glyph(), "E");
        profile.name = "  ".to_string();
        assert_eq!(profile.marker_glyph(), "?");
    }

    #[test]
    fn validate_reports_first_missing_required_field() {
        let profile = Profile::new("1", "", "", address(""));
        assert_eq!(profile.validate(), Err(ProfileValidationError::EmptyName));

        let profile = Profile::new("1", "Ann", "", address(" "));
        assert_eq!(profile.validate(), Err(ProfileValidationError::EmptyCity));
    }

    #[test]
    fn location_rejects_out_of_range_and_nan() {
        assert!(GeoLocation::new(90.0, -180.0).is_valid());
        assert!(!GeoLocation::new(90.5, 0.0).is_valid());
        assert!(!GeoLocation::new(0.0, f64::NAN).is_valid());
    }
}
