use std::time::Duration;

use serde::Serialize;

use super::capture::{CaptureError, CaptureStream, MediaCapture};

/// Countdown allotted to a session, in seconds.
pub const INTERVIEW_COUNTDOWN_SECS: u32 = 30 * 60;

/// Pause between completion and the redirect to the feedback view.
pub const COMPLETION_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// The fixed interview script. Nothing the candidate says or types changes
/// the sequence; no answer is evaluated or persisted.
pub const INTERVIEW_QUESTIONS: [&str; 7] = [
    "Tell me about yourself and your background.",
    "Why are you interested in this position?",
    "What are your greatest strengths?",
    "Describe a challenging situation you faced at work and how you handled it.",
    "Where do you see yourself in five years?",
    "Why should we hire you?",
    "Do you have any questions for us?",
];

/// Phases of the scripted session, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    AwaitingPermissions,
    Idle,
    InProgress,
    Complete,
}

impl SessionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            SessionPhase::AwaitingPermissions => "awaiting_permissions",
            SessionPhase::Idle => "idle",
            SessionPhase::InProgress => "in_progress",
            SessionPhase::Complete => "complete",
        }
    }
}

/// Result of a one-second countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down.
    Counted { remaining_secs: u32 },
    /// This tick exhausted the countdown and completed the session.
    Completed,
    /// The session was not in progress; nothing changed.
    Ignored,
}

/// Result of advancing past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion { index: usize },
    /// Advancing past the last question completed the session.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("camera and microphone permissions have not been granted")]
    PermissionsNotGranted,
    #[error("the session has already started or finished")]
    NotIdle,
    #[error("the session is not in progress")]
    NotInProgress,
}

/// Linear state machine driving the scripted interview:
/// `AwaitingPermissions -> Idle -> InProgress -> Complete`.
///
/// The session owns the capture device and its stream outright. Completion is
/// idempotent: whichever of countdown exhaustion, last-question advance, or
/// end-early fires first stops the tracks, and nothing fires twice.
pub struct InterviewSession<M: MediaCapture> {
    capture: M,
    stream: Option<M::Stream>,
    phase: SessionPhase,
    remaining_secs: u32,
    question_index: usize,
    permission_error: Option<CaptureError>,
}

impl<M: MediaCapture> InterviewSession<M> {
    /// Creates the session and immediately runs the permission entry action.
    /// A denial leaves the session in `AwaitingPermissions` with the error
    /// recorded; `request_permissions` retries it.
    pub fn open(capture: M) -> Self {
        let mut session = Self {
            capture,
            stream: None,
            phase: SessionPhase::AwaitingPermissions,
            remaining_secs: INTERVIEW_COUNTDOWN_SECS,
            question_index: 0,
            permission_error: None,
        };
        let _ = session.request_permissions();
        session
    }

    /// Retries the permission prompt. A no-op once a stream was granted.
    pub fn request_permissions(&mut self) -> Result<(), CaptureError> {
        if self.phase != SessionPhase::AwaitingPermissions {
            return Ok(());
        }
        match self.capture.request_stream() {
            Ok(stream) => {
                self.stream = Some(stream);
                self.permission_error = None;
                self.phase = SessionPhase::Idle;
                Ok(())
            }
            Err(err) => {
                self.permission_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Starts the countdown and puts the first question up.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Idle => {
                self.phase = SessionPhase::InProgress;
                self.remaining_secs = INTERVIEW_COUNTDOWN_SECS;
                self.question_index = 0;
                Ok(())
            }
            SessionPhase::AwaitingPermissions => Err(SessionError::PermissionsNotGranted),
            _ => Err(SessionError::NotIdle),
        }
    }

    /// One-second countdown tick. Only an in-progress session counts down;
    /// the tick that reaches zero completes the session, exactly once.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::InProgress {
            return TickOutcome::Ignored;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.complete();
            TickOutcome::Completed
        } else {
            TickOutcome::Counted {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Moves to the next scripted question; advancing past the last one
    /// completes the session instead of incrementing further.
    pub fn advance_question(&mut self) -> Result<AdvanceOutcome, SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        if self.question_index < INTERVIEW_QUESTIONS.len() - 1 {
            self.question_index += 1;
            Ok(AdvanceOutcome::NextQuestion {
                index: self.question_index,
            })
        } else {
            self.complete();
            Ok(AdvanceOutcome::Completed)
        }
    }

    /// Ends the session before the script or the countdown runs out.
    pub fn end_early(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        self.complete();
        Ok(())
    }

    pub fn set_video_enabled(&mut self, enabled: bool) -> Result<bool, SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        let stream = self.stream.as_mut().ok_or(SessionError::PermissionsNotGranted)?;
        stream.set_video_enabled(enabled);
        Ok(stream.video_enabled())
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) -> Result<bool, SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        let stream = self.stream.as_mut().ok_or(SessionError::PermissionsNotGranted)?;
        stream.set_audio_enabled(enabled);
        Ok(stream.audio_enabled())
    }

    fn complete(&mut self) {
        self.phase = SessionPhase::Complete;
        if let Some(stream) = self.stream.as_mut() {
            stream.stop_all();
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// The question currently on screen; `None` outside `InProgress`.
    pub fn current_question(&self) -> Option<&'static str> {
        if self.phase == SessionPhase::InProgress {
            Some(INTERVIEW_QUESTIONS[self.question_index])
        } else {
            None
        }
    }

    pub fn permission_error(&self) -> Option<&CaptureError> {
        self.permission_error.as_ref()
    }

    pub fn video_enabled(&self) -> Option<bool> {
        self.stream.as_ref().map(CaptureStream::video_enabled)
    }

    pub fn audio_enabled(&self) -> Option<bool> {
        self.stream.as_ref().map(CaptureStream::audio_enabled)
    }

    pub fn stream_stopped(&self) -> Option<bool> {
        self.stream.as_ref().map(CaptureStream::stopped)
    }
}

/// Countdown rendering used by the session views, e.g. `29:59`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
