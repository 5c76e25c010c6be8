//! Typed IDs for type-safe entity references.
//!
//! The rounds service hands out numeric ids while older clients and fixtures
//! use strings (`"user-002"`, `"table_board"`). Every typed ID accepts both on
//! deserialisation and stores one canonical string form, so nothing past the
//! ingest boundary has to care which spelling the wire used.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an ID from any string-like value, trimming whitespace.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.len() == id.len() {
                    Self(id)
                } else {
                    Self(trimmed.to_string())
                }
            }

            /// Creates a fresh, time-ordered ID (UUID v7) for locally created entities.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Returns the canonical string form.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::new(s))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer
                    .deserialize_any(IdVisitor(stringify!($name)))
                    .map(Self::new)
            }
        }
    };
}

/// Accepts either a JSON string or a JSON integer as an identifier.
struct IdVisitor(&'static str);

impl Visitor<'_> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a string or integer {}", self.0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(&v), &self));
        }
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(RoundId, "Unique identifier for a round.");
typed_id!(RecordId, "Unique identifier for a game record.");
typed_id!(
    ParticipantId,
    "Identifier of a roster entry. Equals the user's id for human players."
);

/// Well-known key under which the table board's delta is recorded.
pub const TABLE_BOARD_KEY: &str = "table_board";

impl ParticipantId {
    /// The conventional id of the table board pseudo-participant.
    #[must_use]
    pub fn table_board() -> Self {
        Self(TABLE_BOARD_KEY.to_string())
    }
}

impl From<&UserId> for ParticipantId {
    fn from(user: &UserId) -> Self {
        Self(user.0.clone())
    }
}

impl From<UserId> for ParticipantId {
    fn from(user: UserId) -> Self {
        Self(user.0)
    }
}

impl PartialEq<UserId> for ParticipantId {
    fn eq(&self, other: &UserId) -> bool {
        self.0 == other.0
    }
}
