//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the session router and simulated assistant to Dart via FRB.
//! - Own the single `AppSession` the UI constructs once at startup.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Sign-in failures carry only the generic user-facing message.
//! - Storage failures never surface; the session degrades to signed-out.

use log::{info, warn};
use schoolhub_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AssistantService, CoreConfig, Identity, InMemoryKvRepository, KvRepository, ReportRequest,
    Role, ScreenSet, SessionRouter, SimulatedAssistant, SqliteKvRepository, VoiceClip,
};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

type BoxedRouter = SessionRouter<Box<dyn KvRepository + Send>>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Read-only view of the session for screen mounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// `admin|teacher|parent`, or `None` when signed out.
    pub role: Option<String>,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// `login|admin|teacher|parent`.
    pub screen_set: String,
    /// Route names of the mounted screens, in tab order.
    pub screens: Vec<String>,
}

impl SessionSnapshot {
    fn from_identity(identity: Option<&Identity>) -> Self {
        let set = schoolhub_core::screen_set_for(identity.map(|identity| identity.role));
        Self {
            role: identity.map(|identity| identity.role.as_str().to_string()),
            user_id: identity.map(|identity| identity.id.clone()),
            display_name: identity.map(|identity| identity.display_name.clone()),
            email: identity.map(|identity| identity.email.clone()),
            screen_set: set.as_str().to_string(),
            screens: screen_routes(set),
        }
    }

    fn signed_out() -> Self {
        Self::from_identity(None)
    }
}

/// Result envelope for sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInResponse {
    pub ok: bool,
    /// User-facing message; empty on success.
    pub message: String,
    pub session: SessionSnapshot,
}

/// Result envelope for assistant calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantResponse {
    pub ok: bool,
    /// Draft id on report success.
    pub draft_id: Option<String>,
    /// Transcript or report body on success.
    pub text: String,
    pub message: String,
}

impl AssistantResponse {
    fn success(text: String, draft_id: Option<String>) -> Self {
        Self {
            ok: true,
            draft_id,
            text,
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            draft_id: None,
            text: String::new(),
            message: message.into(),
        }
    }
}

/// The process-wide session provider.
///
/// Constructed once by the UI and passed to every screen; there is no
/// ambient session singleton.
#[flutter_rust_bridge::frb(opaque)]
pub struct AppSession {
    router: Mutex<BoxedRouter>,
    persistent: bool,
    assistant_delay: Duration,
}

impl AppSession {
    /// Opens the session store and constructs the provider.
    ///
    /// `db_path` overrides `SCHOOLHUB_DB_PATH`. When the database cannot be
    /// opened the session falls back to process-local storage.
    #[flutter_rust_bridge::frb(sync)]
    pub fn new(db_path: Option<String>) -> AppSession {
        let mut config = CoreConfig::from_env();
        if let Some(path) = db_path.map(|path| path.trim().to_string()) {
            if !path.is_empty() {
                config = config.with_db_path(path);
            }
        }
        Self::from_config(&config)
    }

    #[flutter_rust_bridge::frb(ignore)]
    pub fn from_config(config: &CoreConfig) -> AppSession {
        let (repo, persistent): (Box<dyn KvRepository + Send>, bool) =
            match SqliteKvRepository::open(&config.db_path, &config.storage) {
                Ok(repo) => (Box::new(repo), true),
                Err(err) => {
                    warn!(
                        "event=session_store_open module=ffi status=fallback mode=memory error={err}"
                    );
                    (Box::new(InMemoryKvRepository::new()), false)
                }
            };

        let router = SessionRouter::new(repo).with_session_key(config.session_key.clone());
        info!("event=session_store_open module=ffi status=ok persistent={persistent}");
        AppSession {
            router: Mutex::new(router),
            persistent,
            assistant_delay: config.assistant_delay,
        }
    }

    /// Whether the session survives process restarts.
    #[flutter_rust_bridge::frb(sync)]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Restores the persisted session; call once at app launch.
    #[flutter_rust_bridge::frb(sync)]
    pub fn restore(&self) -> SessionSnapshot {
        match self.lock() {
            Some(mut router) => {
                let restored = router.restore_session();
                SessionSnapshot::from_identity(restored.as_ref())
            }
            None => SessionSnapshot::signed_out(),
        }
    }

    /// Signs in with email address and password.
    #[flutter_rust_bridge::frb(sync)]
    pub fn sign_in(&self, address: String, secret: String) -> SignInResponse {
        let Some(mut router) = self.lock() else {
            return SignInResponse {
                ok: false,
                message: "Sign-in is unavailable; restart the app".to_string(),
                session: SessionSnapshot::signed_out(),
            };
        };

        match router.resolve_credentials(address.trim(), &secret) {
            Ok(identity) => SignInResponse {
                ok: true,
                message: String::new(),
                session: SessionSnapshot::from_identity(Some(&identity)),
            },
            Err(err) => SignInResponse {
                ok: false,
                message: err.to_string(),
                session: SessionSnapshot::from_identity(router.current_identity()),
            },
        }
    }

    /// Signs out; a no-op when already signed out.
    #[flutter_rust_bridge::frb(sync)]
    pub fn sign_out(&self) -> SessionSnapshot {
        if let Some(mut router) = self.lock() {
            router.sign_out();
        }
        SessionSnapshot::signed_out()
    }

    /// Current session view.
    #[flutter_rust_bridge::frb(sync)]
    pub fn snapshot(&self) -> SessionSnapshot {
        match self.lock() {
            Some(router) => SessionSnapshot::from_identity(router.current_identity()),
            None => SessionSnapshot::signed_out(),
        }
    }

    /// `admin|teacher|parent`, or `None` when signed out.
    #[flutter_rust_bridge::frb(sync)]
    pub fn current_role(&self) -> Option<String> {
        self.current_role_inner()
            .map(|role| role.as_str().to_string())
    }

    /// `login|admin|teacher|parent`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn screen_set(&self) -> String {
        schoolhub_core::screen_set_for(self.current_role_inner())
            .as_str()
            .to_string()
    }

    /// Transcribes a recorded voice note of `duration_ms` milliseconds.
    ///
    /// # FFI contract
    /// - Runs on an FRB worker thread; blocks for the simulated delay.
    pub fn transcribe_voice_note(&self, duration_ms: u64) -> AssistantResponse {
        if self.current_role_inner() != Some(Role::Teacher) {
            return AssistantResponse::failure("Only teachers can record voice notes");
        }
        let clip = VoiceClip {
            duration: Duration::from_millis(duration_ms),
        };
        let service = AssistantService::new(SimulatedAssistant::new(self.assistant_delay));
        match block_on_assistant(service.transcribe(&clip)) {
            Ok(Ok(text)) => AssistantResponse::success(text, None),
            Ok(Err(err)) => AssistantResponse::failure(err.to_string()),
            Err(err) => AssistantResponse::failure(err),
        }
    }

    /// Drafts a student report for the signed-in teacher.
    ///
    /// # FFI contract
    /// - Runs on an FRB worker thread; blocks for the simulated delay.
    pub fn draft_report(
        &self,
        student_name: String,
        term: String,
        notes: String,
    ) -> AssistantResponse {
        let Some(author) = self
            .lock()
            .and_then(|router| router.current_identity().cloned())
        else {
            return AssistantResponse::failure("Sign in to draft reports");
        };

        let request = ReportRequest {
            student_name,
            term,
            notes,
        };
        let service = AssistantService::new(SimulatedAssistant::new(self.assistant_delay));
        match block_on_assistant(service.draft_for(&author, &request)) {
            Ok(Ok(draft)) => AssistantResponse::success(draft.body, Some(draft.id.to_string())),
            Ok(Err(err)) => AssistantResponse::failure(err.to_string()),
            Err(err) => AssistantResponse::failure(err),
        }
    }

    fn current_role_inner(&self) -> Option<Role> {
        self.lock().and_then(|router| router.current_role())
    }

    fn lock(&self) -> Option<MutexGuard<'_, BoxedRouter>> {
        match self.router.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("event=session_lock module=ffi status=poisoned");
                None
            }
        }
    }
}

fn screen_routes(set: ScreenSet) -> Vec<String> {
    set.screens()
        .iter()
        .map(|screen| screen.route().to_string())
        .collect()
}

fn block_on_assistant<F: std::future::Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|err| format!("assistant runtime failed to start: {err}"))?;
    Ok(runtime.block_on(future))
}
