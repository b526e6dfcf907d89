//! Headless profile editor.
//!
//! # Responsibility
//! - Hold in-progress edits for one new or existing profile.
//! - Turn raw text inputs (interests, coordinates) into a validated record.
//! - Submit through `ProfileService` as create or update.
//!
//! # Invariants
//! - A rejected submit never mutates the store.
//! - Interests keep input order; blank entries are dropped.

use crate::model::profile::{Address, Profile, ProfileId, ProfileValidationError};
use crate::repo::profile_repo::{ProfileRepository, RepoError};
use crate::service::profile_service::ProfileService;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message shown when a required field is empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill out all required fields";

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProfileId),
}

/// Successful submit result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(ProfileId),
    Updated(ProfileId),
}

impl SaveOutcome {
    pub fn profile_id(&self) -> &ProfileId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }

    /// User-facing confirmation text.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Created(_) => "Profile created successfully",
            Self::Updated(_) => "Profile updated successfully",
        }
    }
}

/// Submit failures reported inline by the editor.
#[derive(Debug)]
pub enum FormError {
    Validation(ProfileValidationError),
    InvalidCoordinate { field: &'static str, input: String },
    Repo(RepoError),
}

impl FormError {
    /// User-facing error text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) if err.is_missing_required_field() => {
                MISSING_FIELDS_MESSAGE.to_string()
            }
            Self::Validation(err) => err.to_string(),
            Self::InvalidCoordinate { field, input } => {
                format!("Invalid {field} value: `{input}`")
            }
            Self::Repo(RepoError::NotFound(_)) => "Profile not found".to_string(),
            Self::Repo(_) => "Failed to save profile".to_string(),
        }
    }
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidCoordinate { field, input } => {
                write!(f, "{field} must be a number, got `{input}`")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidCoordinate { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ProfileValidationError> for FormError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for FormError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Editable draft plus the raw text inputs that need parsing on submit.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    mode: FormMode,
    draft: Profile,
    interests_input: String,
    lat_input: String,
    lng_input: String,
}

impl ProfileForm {
    /// Starts a blank profile with the default avatar at (0, 0).
    pub fn create() -> Self {
        let draft = Profile::new(ProfileId::new(""), "", "", Address::default());
        Self {
            mode: FormMode::Create,
            draft,
            interests_input: String::new(),
            lat_input: "0".to_string(),
            lng_input: "0".to_string(),
        }
    }

    /// Starts editing a copy of `profile`.
    pub fn edit(profile: &Profile) -> Self {
        let location = profile.location();
        Self {
            mode: FormMode::Edit(profile.id.clone()),
            draft: profile.clone(),
            interests_input: profile.interests().join(", "),
            lat_input: location.lat.to_string(),
            lng_input: location.lng.to_string(),
        }
    }

    /// Starts a new profile pre-filled from `draft`; its id is ignored.
    pub fn create_from(draft: &Profile) -> Self {
        Self {
            mode: FormMode::Create,
            ..Self::edit(draft)
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &Profile {
        &self.draft
    }

    /// Direct access for plain text fields (name, address, contact, ...).
    pub fn draft_mut(&mut self) -> &mut Profile {
        &mut self.draft
    }

    pub fn interests_input(&self) -> &str {
        &self.interests_input
    }

    /// Sets the comma-separated interests text.
    pub fn set_interests_input(&mut self, value: impl Into<String>) {
        self.interests_input = value.into();
    }

    pub fn set_latitude_input(&mut self, value: impl Into<String>) {
        self.lat_input = value.into();
    }

    pub fn set_longitude_input(&mut self, value: impl Into<String>) {
        self.lng_input = value.into();
    }

    /// Parses all raw inputs and validates the resulting record.
    pub fn build(&self) -> Result<Profile, FormError> {
        let mut profile = self.draft.clone();
        profile.address.location.lat = parse_coordinate("latitude", &self.lat_input)?;
        profile.address.location.lng = parse_coordinate("longitude", &self.lng_input)?;
        profile.interests = Some(parse_interests(&self.interests_input));
        for field in [
            &mut profile.phone,
            &mut profile.email,
            &mut profile.website,
            &mut profile.occupation,
            &mut profile.company,
        ] {
            clear_if_blank(field);
        }
        if let FormMode::Edit(id) = &self.mode {
            profile.id = id.clone();
        }

        profile.validate()?;
        Ok(profile)
    }

    /// Validates and saves through `service`.
    pub fn submit<R: ProfileRepository>(
        &self,
        service: &mut ProfileService<R>,
    ) -> Result<SaveOutcome, FormError> {
        let profile = self.build()?;
        match &self.mode {
            FormMode::Create => Ok(SaveOutcome::Created(service.add(profile)?)),
            FormMode::Edit(id) => {
                service.update(profile)?;
                Ok(SaveOutcome::Updated(id.clone()))
            }
        }
    }
}

/// Splits comma-separated interests, trimming and dropping blanks.
pub fn parse_interests(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|interest| !interest.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_coordinate(field: &'static str, input: &str) -> Result<f64, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::InvalidCoordinate {
            field,
            input: trimmed.to_string(),
        }),
    }
}

fn clear_if_blank(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|text| text.trim().is_empty()) {
        *value = None;
    }
}
