//! Credential lookup.
//!
//! The directory is static configuration: it is built once and never
//! mutated at runtime. Secrets are compared in plaintext; this is a
//! placeholder, not a credential-store design.

pub mod credentials;
