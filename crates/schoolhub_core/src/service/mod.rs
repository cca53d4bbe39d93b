//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate credential lookup, storage and state into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod assistant_service;
pub mod session_service;
