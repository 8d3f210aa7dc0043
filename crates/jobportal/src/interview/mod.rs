//! Interview booking and the scripted "AI interview" session.
//!
//! Scheduling inserts records into the hosted `interviews` collection; the
//! session state machine drives the timed question sequence; the feedback
//! generator is an intentional stub that fabricates scores after a fixed
//! delay, disconnected from the persisted record.

pub mod capture;
pub mod domain;
pub mod feedback;
pub mod repository;
pub mod scheduling;
pub mod session;

#[cfg(test)]
mod tests;

pub use capture::{CaptureError, CaptureStream, MediaCapture, ScriptedMediaCapture};
pub use domain::{Interview, InterviewId, InterviewStatus};
pub use feedback::{
    feedback_report_export, score_label, simulated_feedback, FeedbackData, FeedbackGenerator,
    FEEDBACK_PROCESSING_DELAY, FEEDBACK_REPORT_FILE_NAME,
};
pub use repository::InterviewRepository;
pub use scheduling::{
    interview_date_options, interview_time_slots, ScheduleError, ScheduleRequest, ScheduleService,
    INTERVIEW_DURATION_OPTIONS_MIN,
};
pub use session::{
    format_countdown, AdvanceOutcome, InterviewSession, SessionError, SessionPhase, TickOutcome,
    COMPLETION_REDIRECT_DELAY, INTERVIEW_COUNTDOWN_SECS, INTERVIEW_QUESTIONS,
};
