//! Simulated voice-note and report-drafting assistant.
//!
//! # Responsibility
//! - Define the async backend contract for transcription and report drafting.
//! - Provide a simulated backend that answers with fixed text after an
//!   injected delay.
//! - Gate drafting to teacher sessions and wrap output in `ReportDraft`.
//!
//! # Invariants
//! - No audio is decoded and no text is generated; output is templated.
//! - Callers inject the delay, so tests run with `Duration::ZERO`.

use crate::model::identity::{Identity, Role};
use async_trait::async_trait;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use uuid::Uuid;

const MAX_CLIP_DURATION: Duration = Duration::from_secs(10 * 60);
const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(1_500);

const SIMULATED_TRANSCRIPT: &str = "The student participated actively in class discussions \
and completed all assignments on time. Reading comprehension has improved this term; \
continued practice with written explanations is recommended.";

pub type AssistantResult<T> = Result<T, AssistantError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    InvalidInput(String),
    NotPermitted(Role),
    Backend(String),
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid assistant input: {message}"),
            Self::NotPermitted(role) => write!(f, "role `{role}` cannot draft reports"),
            Self::Backend(message) => write!(f, "assistant backend failed: {message}"),
        }
    }
}

impl Error for AssistantError {}

/// Recorded voice note metadata. The audio itself never reaches the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceClip {
    pub duration: Duration,
}

/// Input for drafting one student report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub student_name: String,
    /// Free-form term label, e.g. `Term 1`.
    pub term: String,
    /// Teacher notes, typically a transcript.
    pub notes: String,
}

/// Drafted report ready for teacher review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub id: Uuid,
    pub student_name: String,
    pub term: String,
    pub body: String,
    pub source_notes: String,
}

/// Backend collaborator for transcription and drafting.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn transcribe(&self, clip: &VoiceClip) -> AssistantResult<String>;
    async fn draft_report(&self, request: &ReportRequest) -> AssistantResult<String>;
}

/// Backend answering with fixed text after `delay`.
#[derive(Debug, Clone)]
pub struct SimulatedAssistant {
    delay: Duration,
}

impl SimulatedAssistant {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Zero-delay backend.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for SimulatedAssistant {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

#[async_trait]
impl AssistantBackend for SimulatedAssistant {
    async fn transcribe(&self, _clip: &VoiceClip) -> AssistantResult<String> {
        self.wait().await;
        Ok(SIMULATED_TRANSCRIPT.to_string())
    }

    async fn draft_report(&self, request: &ReportRequest) -> AssistantResult<String> {
        self.wait().await;
        Ok(render_report(request))
    }
}

fn render_report(request: &ReportRequest) -> String {
    let notes = request.notes.trim();
    let notes = if notes.is_empty() {
        "No additional observations were recorded."
    } else {
        notes
    };
    format!(
        "Progress Report: {name} ({term})\n\n\
         Overview\n{name} has shown steady progress this term and engages well with classmates.\n\n\
         Teacher Observations\n{notes}\n\n\
         Next Steps\nContinue building on current strengths and review areas noted above at home.",
        name = request.student_name.trim(),
        term = request.term.trim(),
    )
}

/// Validating front for an `AssistantBackend`.
pub struct AssistantService<B: AssistantBackend> {
    backend: B,
}

impl<B: AssistantBackend> AssistantService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Transcribes a voice note of non-zero length up to ten minutes.
    pub async fn transcribe(&self, clip: &VoiceClip) -> AssistantResult<String> {
        if clip.duration.is_zero() {
            return Err(AssistantError::InvalidInput(
                "voice clip is empty".to_string(),
            ));
        }
        if clip.duration > MAX_CLIP_DURATION {
            return Err(AssistantError::InvalidInput(format!(
                "voice clip longer than {} seconds",
                MAX_CLIP_DURATION.as_secs()
            )));
        }
        self.backend.transcribe(clip).await
    }

    /// Drafts a report on behalf of `author`, who must be a teacher.
    pub async fn draft_for(
        &self,
        author: &Identity,
        request: &ReportRequest,
    ) -> AssistantResult<ReportDraft> {
        if author.role != Role::Teacher {
            warn!(
                "event=assistant_draft module=assistant status=denied role={}",
                author.role
            );
            return Err(AssistantError::NotPermitted(author.role));
        }
        self.draft(request).await
    }

    /// Drafts a report without a role check.
    pub async fn draft(&self, request: &ReportRequest) -> AssistantResult<ReportDraft> {
        let student_name = request.student_name.trim();
        if student_name.is_empty() {
            return Err(AssistantError::InvalidInput(
                "student name cannot be empty".to_string(),
            ));
        }

        let body = match self.backend.draft_report(request).await {
            Ok(body) => body,
            Err(err) => {
                warn!("event=assistant_draft module=assistant status=error error={err}");
                return Err(err);
            }
        };

        let draft = ReportDraft {
            id: Uuid::new_v4(),
            student_name: student_name.to_string(),
            term: request.term.trim().to_string(),
            body,
            source_notes: request.notes.clone(),
        };
        info!(
            "event=assistant_draft module=assistant status=ok draft_id={} body_chars={}",
            draft.id,
            draft.body.chars().count()
        );
        Ok(draft)
    }
}
