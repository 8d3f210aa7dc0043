use crate::interview::capture::ScriptedMediaCapture;
use crate::interview::session::{
    format_countdown, AdvanceOutcome, InterviewSession, SessionError, SessionPhase, TickOutcome,
    INTERVIEW_COUNTDOWN_SECS, INTERVIEW_QUESTIONS,
};

fn started_session() -> InterviewSession<ScriptedMediaCapture> {
    let mut session = InterviewSession::open(ScriptedMediaCapture::granting());
    session.start().expect("session starts");
    session
}

#[test]
fn granted_permissions_move_the_session_to_idle() {
    let session = InterviewSession::open(ScriptedMediaCapture::granting());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.video_enabled(), Some(true));
    assert_eq!(session.audio_enabled(), Some(true));
    assert!(session.current_question().is_none());
}

#[test]
fn denied_permissions_block_until_a_retry_succeeds() {
    let mut session = InterviewSession::open(ScriptedMediaCapture::denying(2));
    assert_eq!(session.phase(), SessionPhase::AwaitingPermissions);
    assert!(session.permission_error().is_some());
    assert!(matches!(session.start(), Err(SessionError::PermissionsNotGranted)));

    // One more scripted denial, then the retry lands.
    assert!(session.request_permissions().is_err());
    assert_eq!(session.phase(), SessionPhase::AwaitingPermissions);

    session.request_permissions().expect("third prompt granted");
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.permission_error().is_none());
}

#[test]
fn starting_sets_the_countdown_and_first_question() {
    let session = started_session();
    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert_eq!(session.remaining_secs(), INTERVIEW_COUNTDOWN_SECS);
    assert_eq!(session.question_index(), 0);
    assert_eq!(session.current_question(), Some(INTERVIEW_QUESTIONS[0]));
}

#[test]
fn ticks_decrement_by_exactly_one_second() {
    let mut session = started_session();
    let mut previous = session.remaining_secs();

    for _ in 0..120 {
        match session.tick() {
            TickOutcome::Counted { remaining_secs } => {
                assert_eq!(remaining_secs, previous - 1);
                previous = remaining_secs;
            }
            other => panic!("countdown ended early: {other:?}"),
        }
    }
    assert_eq!(session.remaining_secs(), INTERVIEW_COUNTDOWN_SECS - 120);
}

#[test]
fn exhausting_the_countdown_completes_exactly_once() {
    let mut session = started_session();

    for _ in 0..INTERVIEW_COUNTDOWN_SECS - 1 {
        assert!(matches!(session.tick(), TickOutcome::Counted { .. }));
    }
    assert_eq!(session.tick(), TickOutcome::Completed);
    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.remaining_secs(), 0);
    assert_eq!(session.stream_stopped(), Some(true));

    // Further ticks are ignored; no second completion, no negative time.
    assert_eq!(session.tick(), TickOutcome::Ignored);
    assert_eq!(session.remaining_secs(), 0);
}

#[test]
fn question_index_stays_within_the_script() {
    let mut session = started_session();

    for expected in 1..INTERVIEW_QUESTIONS.len() {
        assert!(session.question_index() < INTERVIEW_QUESTIONS.len());
        match session.advance_question().expect("advance while in progress") {
            AdvanceOutcome::NextQuestion { index } => assert_eq!(index, expected),
            AdvanceOutcome::Completed => panic!("completed before the last question"),
        }
    }

    // Advancing from the last question transitions instead of incrementing.
    assert_eq!(session.question_index(), INTERVIEW_QUESTIONS.len() - 1);
    assert_eq!(
        session.advance_question().expect("advance from last question"),
        AdvanceOutcome::Completed
    );
    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.question_index(), INTERVIEW_QUESTIONS.len() - 1);
    assert!(matches!(
        session.advance_question(),
        Err(SessionError::NotInProgress)
    ));
}

#[test]
fn ending_early_stops_the_capture_stream() {
    let mut session = started_session();
    session.tick();
    session.end_early().expect("end early while in progress");

    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.stream_stopped(), Some(true));
    assert!(matches!(session.end_early(), Err(SessionError::NotInProgress)));
}

#[test]
fn track_toggles_are_available_in_progress_without_changing_phase() {
    let mut session = started_session();

    assert_eq!(session.set_video_enabled(false), Ok(false));
    assert_eq!(session.set_audio_enabled(false), Ok(false));
    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert_eq!(session.set_video_enabled(true), Ok(true));

    session.end_early().expect("end early");
    assert!(matches!(
        session.set_audio_enabled(true),
        Err(SessionError::NotInProgress)
    ));
}

#[test]
fn countdown_renders_as_minutes_and_padded_seconds() {
    assert_eq!(format_countdown(INTERVIEW_COUNTDOWN_SECS), "30:00");
    assert_eq!(format_countdown(1799), "29:59");
    assert_eq!(format_countdown(65), "1:05");
    assert_eq!(format_countdown(0), "0:00");
}
