//! Globally shared interest and skill tags.
//!
//! Tags are identified by their [`TagSlug`]; the display name is whatever the
//! first user to submit the tag typed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{TagId, slugify};

/// Maximum length of a tag display name, in characters.
pub const TAG_NAME_MAX: usize = 64;

/// Validation errors returned when constructing tag names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagValidationError {
    /// The name was blank.
    #[error("tag must not be empty")]
    Empty,
    /// The name exceeded [`TAG_NAME_MAX`].
    #[error("tag must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The name normalises to an empty slug.
    #[error("tag must contain at least one letter, digit, or symbol")]
    NoSlug,
}

/// Trimmed, length-checked tag display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    /// Validate and construct a tag name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, TagValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TagValidationError::Empty);
        }
        if trimmed.chars().count() > TAG_NAME_MAX {
            return Err(TagValidationError::TooLong { max: TAG_NAME_MAX });
        }
        if slugify(trimmed).is_empty() {
            return Err(TagValidationError::NoSlug);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Slug identifying the tag this name refers to.
    pub fn slug(&self) -> TagSlug {
        TagSlug(slugify(&self.0))
    }

    /// Borrow the display name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

impl TryFrom<String> for TagName {
    type Error = TagValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised tag key; see [`slugify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagSlug(String);

impl TagSlug {
    /// Accept an already-normalised slug, e.g. one read back from storage.
    ///
    /// Rejects values that `slugify` would change, so a stored slug can never
    /// drift from the algorithm.
    pub fn new(value: impl Into<String>) -> Result<Self, TagValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TagValidationError::Empty);
        }
        if slugify(&value) != value {
            return Err(TagValidationError::NoSlug);
        }
        Ok(Self(value))
    }

    /// Borrow the slug text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TagSlug> for String {
    fn from(value: TagSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for TagSlug {
    type Error = TagValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A persisted tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag identifier.
    pub id: TagId,
    /// Display name as first submitted.
    pub name: TagName,
    /// Normalised key.
    pub slug: TagSlug,
}

impl Tag {
    /// Build a new, not yet persisted tag for `name`.
    pub fn new(name: TagName) -> Self {
        let slug = name.slug();
        Self {
            id: TagId::random(),
            name,
            slug,
        }
    }
}
