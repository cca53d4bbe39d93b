//! Core domain logic for SchoolHub.
//! This crate is the single source of truth for session and role invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::credentials::{CredentialDirectory, CredentialError, CredentialRecord};
pub use config::{CoreConfig, StorageConfig};
pub use logging::{default_log_level, init_logging, logging_status, mask_address};
pub use model::identity::{Identity, Role, RoleParseError, SessionRecordError};
pub use model::screen::{screen_set_for, Screen, ScreenSet};
pub use repo::kv_repo::{
    InMemoryKvRepository, KvRepository, RepoError, RepoResult, SqliteKvRepository,
};
pub use service::assistant_service::{
    AssistantBackend, AssistantError, AssistantResult, AssistantService, ReportDraft,
    ReportRequest, SimulatedAssistant, VoiceClip,
};
pub use service::session_service::{AuthError, AuthResult, SessionRouter, SessionState};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
