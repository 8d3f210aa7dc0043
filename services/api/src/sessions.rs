//! Live interview sessions held by the service between requests.
//!
//! Each started session owns a one-second tick task driving its countdown.
//! The task is cancelled deterministically on any terminal transition,
//! whether the countdown ran out, the script finished, or the candidate
//! ended early.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::AbortHandle;

use jobportal::interview::{
    format_countdown, AdvanceOutcome, InterviewSession, ScriptedMediaCapture, SessionError,
    SessionPhase, TickOutcome, COMPLETION_REDIRECT_DELAY, INTERVIEW_QUESTIONS,
};

pub(crate) struct SessionRegistry {
    sessions: Mutex<HashMap<String, LiveSession>>,
}

struct LiveSession {
    session: InterviewSession<ScriptedMediaCapture>,
    ticker: Option<AbortHandle>,
}

/// Snapshot returned to the session endpoints.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionView {
    pub(crate) phase: SessionPhase,
    pub(crate) remaining_secs: u32,
    pub(crate) countdown: String,
    pub(crate) question_index: usize,
    pub(crate) total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) current_question: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) video_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) audio_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) permission_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) redirect: Option<RedirectNote>,
}

/// Where a completed session sends the candidate next, after the fixed pause.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RedirectNote {
    pub(crate) to: String,
    pub(crate) after_secs: u64,
}

#[derive(Debug)]
pub(crate) enum LiveSessionError {
    NotOpen,
    Session(SessionError),
}

impl fmt::Display for LiveSessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveSessionError::NotOpen => {
                write!(f, "no interview session is open for this interview")
            }
            LiveSessionError::Session(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for LiveSessionError {}

impl From<SessionError> for LiveSessionError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl SessionRegistry {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Opens a session for the interview, running the permission entry
    /// action. Re-opening an already open session returns its current state.
    pub(crate) fn open(&self, interview_id: &str, capture: ScriptedMediaCapture) -> SessionView {
        let mut guard = self.lock();
        let entry = guard
            .entry(interview_id.to_string())
            .or_insert_with(|| LiveSession {
                session: InterviewSession::open(capture),
                ticker: None,
            });
        Self::view_of(interview_id, entry)
    }

    pub(crate) fn view(&self, interview_id: &str) -> Result<SessionView, LiveSessionError> {
        let guard = self.lock();
        let entry = guard.get(interview_id).ok_or(LiveSessionError::NotOpen)?;
        Ok(Self::view_of(interview_id, entry))
    }

    /// Re-runs the permission prompt; a repeated denial shows up in the view
    /// rather than as an error, matching the blocking-retry surface.
    pub(crate) fn retry_permissions(
        &self,
        interview_id: &str,
    ) -> Result<SessionView, LiveSessionError> {
        let mut guard = self.lock();
        let entry = guard
            .get_mut(interview_id)
            .ok_or(LiveSessionError::NotOpen)?;
        let _ = entry.session.request_permissions();
        Ok(Self::view_of(interview_id, entry))
    }

    /// Starts the countdown and spawns the one-second tick task.
    pub(crate) fn start(
        self: &Arc<Self>,
        interview_id: &str,
    ) -> Result<SessionView, LiveSessionError> {
        let mut guard = self.lock();
        let entry = guard
            .get_mut(interview_id)
            .ok_or(LiveSessionError::NotOpen)?;
        entry.session.start()?;

        let registry = Arc::clone(self);
        let key = interview_id.to_string();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick fires immediately; the countdown
            // starts one full second later.
            interval.tick().await;
            loop {
                interval.tick().await;
                if registry.tick_once(&key) {
                    break;
                }
            }
        });
        entry.ticker = Some(handle.abort_handle());

        Ok(Self::view_of(interview_id, entry))
    }

    /// One countdown tick; true once the session no longer needs ticking.
    fn tick_once(&self, interview_id: &str) -> bool {
        let mut guard = self.lock();
        match guard.get_mut(interview_id) {
            Some(entry) => match entry.session.tick() {
                TickOutcome::Counted { .. } => false,
                TickOutcome::Completed | TickOutcome::Ignored => {
                    entry.ticker = None;
                    true
                }
            },
            None => true,
        }
    }

    pub(crate) fn advance(&self, interview_id: &str) -> Result<SessionView, LiveSessionError> {
        let mut guard = self.lock();
        let entry = guard
            .get_mut(interview_id)
            .ok_or(LiveSessionError::NotOpen)?;
        let outcome = entry.session.advance_question()?;
        if matches!(outcome, AdvanceOutcome::Completed) {
            Self::cancel_ticker(entry);
        }
        Ok(Self::view_of(interview_id, entry))
    }

    pub(crate) fn end_early(&self, interview_id: &str) -> Result<SessionView, LiveSessionError> {
        let mut guard = self.lock();
        let entry = guard
            .get_mut(interview_id)
            .ok_or(LiveSessionError::NotOpen)?;
        entry.session.end_early()?;
        Self::cancel_ticker(entry);
        Ok(Self::view_of(interview_id, entry))
    }

    pub(crate) fn set_media(
        &self,
        interview_id: &str,
        video: Option<bool>,
        audio: Option<bool>,
    ) -> Result<SessionView, LiveSessionError> {
        let mut guard = self.lock();
        let entry = guard
            .get_mut(interview_id)
            .ok_or(LiveSessionError::NotOpen)?;
        if let Some(enabled) = video {
            entry.session.set_video_enabled(enabled)?;
        }
        if let Some(enabled) = audio {
            entry.session.set_audio_enabled(enabled)?;
        }
        Ok(Self::view_of(interview_id, entry))
    }

    fn cancel_ticker(entry: &mut LiveSession) {
        if let Some(handle) = entry.ticker.take() {
            handle.abort();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, LiveSession>> {
        self.sessions.lock().expect("session registry mutex poisoned")
    }

    fn view_of(interview_id: &str, entry: &LiveSession) -> SessionView {
        let session = &entry.session;
        let redirect = (session.phase() == SessionPhase::Complete).then(|| RedirectNote {
            to: format!("/api/v1/interviews/{interview_id}/feedback"),
            after_secs: COMPLETION_REDIRECT_DELAY.as_secs(),
        });

        SessionView {
            phase: session.phase(),
            remaining_secs: session.remaining_secs(),
            countdown: format_countdown(session.remaining_secs()),
            question_index: session.question_index(),
            total_questions: INTERVIEW_QUESTIONS.len(),
            current_question: session.current_question(),
            video_enabled: session.video_enabled(),
            audio_enabled: session.audio_enabled(),
            permission_error: session.permission_error().map(|err| err.to_string()),
            redirect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn denied_permissions_surface_in_the_view_until_a_retry_lands() {
        let registry = SessionRegistry::new();
        let view = registry.open("iv-1", ScriptedMediaCapture::denying(1));
        assert_eq!(view.phase, SessionPhase::AwaitingPermissions);
        assert!(view.permission_error.is_some());

        assert!(matches!(
            registry.start("iv-1"),
            Err(LiveSessionError::Session(SessionError::PermissionsNotGranted))
        ));

        let view = registry.retry_permissions("iv-1").expect("session open");
        assert_eq!(view.phase, SessionPhase::Idle);
        assert!(view.permission_error.is_none());
    }

    #[tokio::test]
    async fn starting_counts_down_and_walks_the_script() {
        let registry = SessionRegistry::new();
        registry.open("iv-2", ScriptedMediaCapture::granting());
        let view = registry.start("iv-2").expect("session starts");
        assert_eq!(view.phase, SessionPhase::InProgress);
        assert_eq!(view.countdown, "30:00");
        assert_eq!(view.current_question, Some(INTERVIEW_QUESTIONS[0]));

        for expected in 1..INTERVIEW_QUESTIONS.len() {
            let view = registry.advance("iv-2").expect("advance");
            assert_eq!(view.question_index, expected);
        }

        let view = registry.advance("iv-2").expect("advance past the last question");
        assert_eq!(view.phase, SessionPhase::Complete);
        let redirect = view.redirect.expect("redirect note present");
        assert_eq!(redirect.to, "/api/v1/interviews/iv-2/feedback");
        assert_eq!(redirect.after_secs, 3);
    }

    #[tokio::test]
    async fn ending_early_completes_and_reopening_returns_the_same_state() {
        let registry = SessionRegistry::new();
        registry.open("iv-3", ScriptedMediaCapture::granting());
        registry.start("iv-3").expect("session starts");

        let view = registry
            .set_media("iv-3", Some(false), None)
            .expect("toggle while in progress");
        assert_eq!(view.video_enabled, Some(false));
        assert_eq!(view.audio_enabled, Some(true));

        let view = registry.end_early("iv-3").expect("end early");
        assert_eq!(view.phase, SessionPhase::Complete);

        // Re-opening does not reset a finished session.
        let view = registry.open("iv-3", ScriptedMediaCapture::granting());
        assert_eq!(view.phase, SessionPhase::Complete);

        assert!(matches!(
            registry.view("iv-unknown"),
            Err(LiveSessionError::NotOpen)
        ));
    }
}
