//! Flutter-facing bindings for SchoolHub core.

pub mod api;
