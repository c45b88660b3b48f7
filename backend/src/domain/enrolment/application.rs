//! Validation of raw enrolment payloads.
//!
//! Clients send `{ "isMentor": bool, "tags": [string] }`. Fields arrive as
//! untyped JSON so that every problem can be reported at once instead of
//! failing on the first deserialisation error.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{TagName, TagSlug, TagValidationError};

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// A required field was absent or null.
    MissingField,
    /// The field had the wrong JSON type.
    InvalidType,
    /// A tag was blank after trimming.
    EmptyTag,
    /// A tag exceeded the maximum length.
    TagTooLong,
    /// A tag consisted only of separators.
    InvalidTag,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// JSON path of the offending field, e.g. `tags[1]`.
    pub field: String,
    /// Machine-readable reason.
    pub code: FieldErrorCode,
    /// Human-readable explanation.
    pub message: String,
}

/// Every field problem found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: impl Into<String>, code: FieldErrorCode, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            code,
            message: message.into(),
        });
    }

    /// Whether no problem was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded problems in payload order.
    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|err| err.field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// A validated request to join a cohort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolmentApplication {
    is_mentor: bool,
    tags: Vec<TagName>,
}

impl EnrolmentApplication {
    /// Build an application from already-typed values.
    pub fn new(is_mentor: bool, tags: Vec<TagName>) -> Self {
        Self { is_mentor, tags }
    }

    /// Validate the raw `isMentor` and `tags` members of a request body.
    ///
    /// A missing or `null` `tags` member means no tags.
    ///
    /// # Examples
    /// ```
    /// use mentor_match::domain::EnrolmentApplication;
    /// use serde_json::json;
    ///
    /// let app = EnrolmentApplication::from_raw(Some(&json!(true)), Some(&json!(["rust"])))
    ///     .expect("valid application");
    /// assert!(app.is_mentor());
    /// assert!(EnrolmentApplication::from_raw(None, None).is_err());
    /// ```
    pub fn from_raw(is_mentor: Option<&Value>, tags: Option<&Value>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();

        let is_mentor = match is_mentor {
            None | Some(Value::Null) => {
                errors.push("isMentor", FieldErrorCode::MissingField, "isMentor is required");
                None
            }
            Some(Value::Bool(flag)) => Some(*flag),
            Some(_) => {
                errors.push("isMentor", FieldErrorCode::InvalidType, "isMentor must be a boolean");
                None
            }
        };

        let tags = match tags {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => parse_tags(items, &mut errors),
            Some(_) => {
                errors.push("tags", FieldErrorCode::InvalidType, "tags must be an array of strings");
                Vec::new()
            }
        };

        match is_mentor {
            Some(is_mentor) if errors.is_empty() => Ok(Self { is_mentor, tags }),
            _ => Err(errors),
        }
    }

    /// Whether the applicant joins as a mentor.
    pub fn is_mentor(&self) -> bool {
        self.is_mentor
    }

    /// Tags exactly as submitted, duplicates included.
    pub fn tags(&self) -> &[TagName] {
        &self.tags
    }

    /// Tags deduplicated by slug, keeping the first display name seen.
    pub fn unique_tags(&self) -> Vec<(TagSlug, TagName)> {
        let mut seen = HashSet::new();
        self.tags
            .iter()
            .filter_map(|name| {
                let slug = name.slug();
                seen.insert(slug.clone()).then(|| (slug, name.clone()))
            })
            .collect()
    }
}

fn parse_tags(items: &[Value], errors: &mut FieldErrors) -> Vec<TagName> {
    let mut tags = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let field = format!("tags[{index}]");
        let Value::String(raw) = item else {
            errors.push(field, FieldErrorCode::InvalidType, "tag must be a string");
            continue;
        };
        match TagName::new(raw) {
            Ok(name) => tags.push(name),
            Err(err) => {
                let code = match err {
                    TagValidationError::Empty => FieldErrorCode::EmptyTag,
                    TagValidationError::TooLong { .. } => FieldErrorCode::TagTooLong,
                    TagValidationError::NoSlug => FieldErrorCode::InvalidTag,
                };
                errors.push(field, code, err.to_string());
            }
        }
    }
    tags
}
