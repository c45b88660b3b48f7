//! UUID-backed identifiers for the enrolment aggregates.
//!
//! Every identifier keeps the raw string it was parsed from so adapters can
//! echo client input without reformatting it.

use uuid::Uuid;

/// Validation errors returned when parsing an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier was not a UUID or carried whitespace padding.
    #[error("identifier must be a valid UUID")]
    Invalid,
}

fn parse_uuid(raw: &str) -> Result<Uuid, IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.trim() != raw {
        return Err(IdValidationError::Invalid);
    }
    Uuid::parse_str(raw).map_err(|_| IdValidationError::Invalid)
}

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid, String);

        impl $name {
            /// Validate and construct the identifier from borrowed input.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                Ok(Self(parse_uuid(raw)?, raw.to_owned()))
            }

            /// Wrap an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid, uuid.to_string())
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self::from_uuid(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.1.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.1
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                let parsed = parse_uuid(&value)?;
                Ok(Self(parsed, value))
            }
        }
    };
}

define_uuid_id! {
    /// Identifier of a mentorship programme.
    ProgrammeId
}

define_uuid_id! {
    /// Identifier of one cohort (run) of a programme.
    CohortId
}

define_uuid_id! {
    /// Identifier of an enrolment record.
    ParticipantId
}

define_uuid_id! {
    /// Identifier of a global tag.
    TagId
}
