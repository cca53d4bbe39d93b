//! Static credential directory.
//!
//! # Invariants
//! - Addresses are unique within a directory.
//! - Lookup is exact: no case folding or trimming.

use crate::model::identity::{Identity, Role};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BUILTIN_SECRET: &str = "password123";

/// One login address with its expected secret and resolved identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub address: String,
    pub secret: String,
    pub identity: Identity,
}

impl CredentialRecord {
    pub fn new(address: impl Into<String>, secret: impl Into<String>, identity: Identity) -> Self {
        Self {
            address: address.into(),
            secret: secret.into(),
            identity,
        }
    }
}

/// Directory construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    DuplicateAddress(String),
    EmptyAddress,
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateAddress(address) => {
                write!(f, "credential address registered twice: {address}")
            }
            Self::EmptyAddress => write!(f, "credential address cannot be empty"),
        }
    }
}

impl Error for CredentialError {}

/// Fixed mapping from login address to credential record.
#[derive(Debug, Clone)]
pub struct CredentialDirectory {
    records: HashMap<String, CredentialRecord>,
}

impl CredentialDirectory {
    /// Builds a directory from custom records.
    pub fn from_records(
        records: impl IntoIterator<Item = CredentialRecord>,
    ) -> Result<Self, CredentialError> {
        let mut map = HashMap::new();
        for record in records {
            if record.address.is_empty() {
                return Err(CredentialError::EmptyAddress);
            }
            if map.contains_key(&record.address) {
                return Err(CredentialError::DuplicateAddress(record.address));
            }
            map.insert(record.address.clone(), record);
        }
        Ok(Self { records: map })
    }

    /// The built-in demo accounts, one per role.
    pub fn builtin() -> Self {
        let records = builtin_records();
        let records = records
            .into_iter()
            .map(|record| (record.address.clone(), record))
            .collect();
        Self { records }
    }

    /// Returns the identity for `address` when `secret` matches exactly.
    pub fn verify(&self, address: &str, secret: &str) -> Option<&Identity> {
        self.records
            .get(address)
            .filter(|record| record.secret == secret)
            .map(|record| &record.identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registered addresses, sorted.
    pub fn addresses(&self) -> Vec<&str> {
        let mut addresses: Vec<&str> = self.records.keys().map(String::as_str).collect();
        addresses.sort_unstable();
        addresses
    }
}

impl Default for CredentialDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_records() -> Vec<CredentialRecord> {
    vec![
        CredentialRecord::new(
            "admin@school.com",
            BUILTIN_SECRET,
            Identity::new("1", "Admin User", Role::Admin, "admin@school.com"),
        ),
        CredentialRecord::new(
            "teacher@school.com",
            BUILTIN_SECRET,
            Identity::new("2", "Sarah Johnson", Role::Teacher, "teacher@school.com"),
        ),
        CredentialRecord::new(
            "parent@email.com",
            BUILTIN_SECRET,
            Identity::new("3", "Michael Brown", Role::Parent, "parent@email.com"),
        ),
    ]
}
