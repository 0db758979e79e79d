use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AboutError, Result};

pub const PLACEHOLDER_NAME: &str = "John Smith";
pub const PLACEHOLDER_BIO: &str = "Android dev & coffee addict";
pub const PLACEHOLDER_WEBSITE: &str = "https://example.com";

/// The "About Me" record. All three attributes are always present,
/// possibly empty.
#[derive(Eq, PartialEq, Hash, Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    pub bio: String,
    pub website: String,
}

impl Profile {
    pub fn new<S: Into<String>>(name: S, bio: S, website: S) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
            website: website.into(),
        }
    }

    /// Values shown when the editor starts.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_NAME, PLACEHOLDER_BIO, PLACEHOLDER_WEBSITE)
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Bio => &self.bio,
            Field::Website => &self.website,
        }
    }

    /// Returns a copy with `field` replaced wholesale by `value`.
    pub fn with(mut self, field: Field, value: String) -> Self {
        match field {
            Field::Name => self.name = value,
            Field::Bio => self.bio = value,
            Field::Website => self.website = value,
        }
        self
    }
}

#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Bio,
    Website,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Bio, Field::Website];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Bio => "Bio",
            Field::Website => "Website",
        }
    }

    /// Whether the edit box for this field takes a single line of text.
    /// The bio is free-form and gets a multi-line box.
    pub fn is_single_line(&self) -> bool {
        !matches!(self, Field::Bio)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Field::Name => 0,
            Field::Bio => 1,
            Field::Website => 2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Field {
    type Err = AboutError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|field| field.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AboutError::UnknownField(s.to_owned()))
    }
}
