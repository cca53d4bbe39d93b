//! Session and role router.
//!
//! # Responsibility
//! - Hold at most one authenticated identity.
//! - Resolve credentials, persist the identity, restore it at startup and
//!   clear it on sign-out.
//! - Project the current role for screen selection.
//!
//! # Invariants
//! - State moves `Unresolved -> Anonymous | Authenticated`,
//!   `Anonymous -> Authenticated` and `Authenticated -> Anonymous` only.
//! - Storage failures never reach the caller; they degrade to "no identity"
//!   and are logged.
//! - Secrets are never logged.

use crate::auth::credentials::CredentialDirectory;
use crate::config::DEFAULT_SESSION_KEY;
use crate::logging::mask_address;
use crate::model::identity::{Identity, Role};
use crate::model::screen::{screen_set_for, ScreenSet};
use crate::repo::kv_repo::KvRepository;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Sign-in failures shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown address or wrong secret; deliberately does not say which.
    InvalidCredentials,
    /// Address or secret was empty.
    MissingCredentials,
    /// Another identity is signed in; sign out first.
    SessionActive,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::MissingCredentials => write!(f, "Please enter both email and password"),
            Self::SessionActive => write!(f, "Already signed in; sign out first"),
        }
    }
}

impl Error for AuthError {}

/// Router state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Durable store not read yet.
    Unresolved,
    Anonymous,
    Authenticated(Identity),
}

/// Owns the single current session and its persistence.
pub struct SessionRouter<R: KvRepository> {
    repo: R,
    directory: CredentialDirectory,
    session_key: String,
    state: SessionState,
}

impl<R: KvRepository> SessionRouter<R> {
    /// Creates a router over `repo` with the built-in credential directory.
    pub fn new(repo: R) -> Self {
        Self::with_directory(repo, CredentialDirectory::builtin())
    }

    pub fn with_directory(repo: R, directory: CredentialDirectory) -> Self {
        Self {
            repo,
            directory,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            state: SessionState::Unresolved,
        }
    }

    /// Stores the session under `key` instead of the default.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn current_identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Unresolved | SessionState::Anonymous => None,
        }
    }

    pub fn current_role(&self) -> Option<Role> {
        self.current_identity().map(|identity| identity.role)
    }

    /// Screen set for the current role; the login set when signed out.
    pub fn screen_set(&self) -> ScreenSet {
        screen_set_for(self.current_role())
    }

    /// Reads the persisted identity once at startup.
    ///
    /// Absence, read failure and malformed records all yield `None`. Once the
    /// router has resolved, storage is not read again and the current
    /// identity is returned.
    pub fn restore_session(&mut self) -> Option<Identity> {
        if self.state != SessionState::Unresolved {
            return self.current_identity().cloned();
        }

        let raw = match self.repo.get(&self.session_key) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("event=session_restore module=session status=error error={err}");
                self.state = SessionState::Anonymous;
                return None;
            }
        };

        let Some(raw) = raw else {
            info!("event=session_restore module=session status=absent");
            self.state = SessionState::Anonymous;
            return None;
        };

        match Identity::from_record(&raw) {
            Ok(identity) => {
                info!(
                    "event=session_restore module=session status=ok role={} address={}",
                    identity.role,
                    mask_address(&identity.email)
                );
                self.state = SessionState::Authenticated(identity.clone());
                Some(identity)
            }
            Err(err) => {
                warn!("event=session_restore module=session status=malformed error={err}");
                if let Err(err) = self.repo.delete(&self.session_key) {
                    warn!("event=session_restore module=session status=cleanup_failed error={err}");
                }
                self.state = SessionState::Anonymous;
                None
            }
        }
    }

    /// Signs in with `address` and `secret`.
    ///
    /// On success the identity is persisted and becomes current. A failed
    /// write is logged and does not fail the sign-in. Rejections leave the
    /// state untouched, so an unread stored session can still be restored.
    pub fn resolve_credentials(&mut self, address: &str, secret: &str) -> AuthResult<Identity> {
        if matches!(self.state, SessionState::Authenticated(_)) {
            return Err(AuthError::SessionActive);
        }
        if address.is_empty() || secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(identity) = self.directory.verify(address, secret).cloned() else {
            info!(
                "event=sign_in module=session status=rejected address={}",
                mask_address(address)
            );
            return Err(AuthError::InvalidCredentials);
        };

        self.persist(&identity);
        info!(
            "event=sign_in module=session status=ok role={} address={}",
            identity.role,
            mask_address(&identity.email)
        );
        self.state = SessionState::Authenticated(identity.clone());
        Ok(identity)
    }

    /// Clears the current identity and its durable record.
    ///
    /// Idempotent: signing out while anonymous does nothing.
    pub fn sign_out(&mut self) {
        if !matches!(self.state, SessionState::Authenticated(_)) {
            self.state = SessionState::Anonymous;
            return;
        }

        if let Err(err) = self.repo.delete(&self.session_key) {
            warn!("event=sign_out module=session status=storage_error error={err}");
        }
        self.state = SessionState::Anonymous;
        info!("event=sign_out module=session status=ok");
    }

    fn persist(&self, identity: &Identity) {
        let result = identity
            .to_record()
            .map_err(|err| err.to_string())
            .and_then(|raw| {
                self.repo
                    .put(&self.session_key, &raw)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = result {
            warn!("event=session_persist module=session status=error error={err}");
        }
    }
}
