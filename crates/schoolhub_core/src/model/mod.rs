//! Domain model for sessions and role routing.
//!
//! # Responsibility
//! - Define the authenticated `Identity` and its `Role`.
//! - Define the screen sets the presentation layer mounts per role.
//!
//! # Invariants
//! - A role is fixed for the lifetime of a session.
//! - Screen-set selection is total over `Option<Role>`.

pub mod identity;
pub mod screen;
