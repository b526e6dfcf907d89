//! Info-overlay content for profile markers.
//!
//! # Invariants
//! - Text is plain (no markup); hosts decide presentation.
//! - Runs of whitespace collapse to one space so descriptions pasted with
//!   line breaks do not blow up the popup.

use crate::model::profile::Profile;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// How much of the profile an overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayDetail {
    /// Name, locality and a truncated description.
    Summary,
    /// Full description plus the street address line.
    Full,
}

/// Structured overlay text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    pub avatar: String,
    pub title: String,
    pub locality: String,
    pub body: String,
    pub address_line: Option<String>,
}

impl OverlayContent {
    /// Builds overlay content for `profile`.
    ///
    /// `summary_chars` bounds the description in `Summary` mode.
    pub fn for_profile(profile: &Profile, detail: OverlayDetail, summary_chars: usize) -> Self {
        let address = &profile.address;
        let description = collapse_whitespace(&profile.description);
        let (body, address_line) = match detail {
            OverlayDetail::Summary => (truncate_chars(&description, summary_chars), None),
            OverlayDetail::Full => (
                description,
                Some(collapse_whitespace(&format!(
                    "{}, {}, {} {}",
                    address.street, address.city, address.state, address.zip_code
                ))),
            ),
        };

        Self {
            avatar: profile.avatar.clone(),
            title: collapse_whitespace(&profile.name),
            locality: format!("{}, {}", address.city.trim(), address.state.trim()),
            body,
            address_line,
        }
    }

    /// Newline-separated text handed to the SDK.
    pub fn to_text(&self) -> String {
        let mut lines = vec![self.title.as_str(), self.locality.as_str(), self.body.as_str()];
        if let Some(line) = &self.address_line {
            lines.push(line.as_str());
        }
        lines.join("\n")
    }
}

fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}
