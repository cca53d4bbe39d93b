//! Identity and role model.
//!
//! # Responsibility
//! - Define the authenticated user record shared by router and storage.
//! - Encode/decode the persisted session record.
//!
//! # Invariants
//! - A decoded identity has a non-empty `id` and a known `role`.
//! - The persisted form is a flat JSON object with `id`, `name`, `role`
//!   and `email` keys; unknown keys are ignored.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// User role; selects which screen set is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// School administrator.
    Admin,
    /// Classroom teacher.
    Teacher,
    /// Parent or guardian.
    Parent,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Parent];

    /// Stable string id used in storage and across FFI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known role id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleParseError(pub String);

impl Display for RoleParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown role `{}`; expected admin|teacher|parent", self.0)
    }
}

impl Error for RoleParseError {}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "parent" => Ok(Self::Parent),
            _ => Err(RoleParseError(value.to_string())),
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque unique identifier.
    pub id: String,
    /// Serialized as `name`.
    #[serde(rename = "name")]
    pub display_name: String,
    pub role: Role,
    /// Contact address.
    pub email: String,
}

/// Decode failures for a persisted session record.
#[derive(Debug)]
pub enum SessionRecordError {
    Malformed(serde_json::Error),
    MissingId,
}

impl Display for SessionRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed session record: {err}"),
            Self::MissingId => write!(f, "session record has an empty id"),
        }
    }
}

impl Error for SessionRecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::MissingId => None,
        }
    }
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
            email: email.into(),
        }
    }

    /// Encodes this identity as the persisted session record.
    pub fn to_record(&self) -> Result<String, SessionRecordError> {
        serde_json::to_string(self).map_err(SessionRecordError::Malformed)
    }

    /// Decodes a persisted session record.
    pub fn from_record(raw: &str) -> Result<Self, SessionRecordError> {
        let identity: Self = serde_json::from_str(raw).map_err(SessionRecordError::Malformed)?;
        if identity.id.trim().is_empty() {
            return Err(SessionRecordError::MissingId);
        }
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Admin".parse::<Role>().expect("admin"), Role::Admin);
        assert_eq!(" teacher ".parse::<Role>().expect("teacher"), Role::Teacher);
        assert_eq!("PARENT".parse::<Role>().expect("parent"), Role::Parent);
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn record_uses_flat_external_field_names() {
        let identity = Identity::new("2", "Sarah Johnson", Role::Teacher, "teacher@school.com");
        let raw = identity.to_record().expect("encode");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["id"], "2");
        assert_eq!(value["name"], "Sarah Johnson");
        assert_eq!(value["role"], "teacher");
        assert_eq!(value["email"], "teacher@school.com");
    }

    #[test]
    fn from_record_ignores_unknown_fields() {
        let raw = r#"{"id":"3","name":"Michael Brown","role":"parent","email":"parent@email.com","theme":"dark"}"#;
        let identity = Identity::from_record(raw).expect("decode");
        assert_eq!(identity.role, Role::Parent);
        assert_eq!(identity.display_name, "Michael Brown");
    }

    #[test]
    fn from_record_rejects_structurally_invalid_values() {
        assert!(matches!(
            Identity::from_record("not json"),
            Err(SessionRecordError::Malformed(_))
        ));
        assert!(matches!(
            Identity::from_record(r#"{"id":"1","name":"A","role":"principal","email":"a@b"}"#),
            Err(SessionRecordError::Malformed(_))
        ));
        assert!(matches!(
            Identity::from_record(r#"{"id":"1","name":"A","email":"a@b"}"#),
            Err(SessionRecordError::Malformed(_))
        ));
        assert!(matches!(
            Identity::from_record(r#"{"id":" ","name":"A","role":"admin","email":"a@b"}"#),
            Err(SessionRecordError::MissingId)
        ));
    }
}
