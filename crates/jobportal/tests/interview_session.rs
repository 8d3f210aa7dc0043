//! Integration specifications for the scripted interview session.
//!
//! Drives the state machine through its full lifecycle the way the live
//! session endpoints do: permission prompt, pre-flight, countdown, scripted
//! questions, completion, and the simulated feedback handoff.

use jobportal::interview::{
    feedback_report_export, format_countdown, interview_time_slots, simulated_feedback,
    AdvanceOutcome, FeedbackGenerator, InterviewSession, ScriptedMediaCapture, SessionPhase,
    TickOutcome, COMPLETION_REDIRECT_DELAY, INTERVIEW_COUNTDOWN_SECS, INTERVIEW_QUESTIONS,
};

#[test]
fn a_full_session_walks_every_question_and_stops_the_stream() {
    let mut session = InterviewSession::open(ScriptedMediaCapture::granting());
    assert_eq!(session.phase(), SessionPhase::Idle);

    session.start().expect("session starts");
    assert_eq!(session.current_question(), Some(INTERVIEW_QUESTIONS[0]));

    // A minute of thinking time per question, then advance.
    let mut advanced = 1;
    loop {
        for _ in 0..60 {
            assert!(matches!(session.tick(), TickOutcome::Counted { .. }));
        }
        match session.advance_question().expect("advance while in progress") {
            AdvanceOutcome::NextQuestion { index } => {
                advanced += 1;
                assert_eq!(session.current_question(), Some(INTERVIEW_QUESTIONS[index]));
            }
            AdvanceOutcome::Completed => break,
        }
    }

    assert_eq!(advanced, INTERVIEW_QUESTIONS.len());
    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.stream_stopped(), Some(true));
    assert_eq!(
        session.remaining_secs(),
        INTERVIEW_COUNTDOWN_SECS - 60 * INTERVIEW_QUESTIONS.len() as u32
    );
    assert_eq!(COMPLETION_REDIRECT_DELAY.as_secs(), 3);
}

#[test]
fn countdown_time_is_never_negative_and_strictly_decreases() {
    let mut session = InterviewSession::open(ScriptedMediaCapture::granting());
    session.start().expect("session starts");

    let mut previous = session.remaining_secs();
    let mut completions = 0;
    for _ in 0..INTERVIEW_COUNTDOWN_SECS + 10 {
        match session.tick() {
            TickOutcome::Counted { remaining_secs } => {
                assert_eq!(remaining_secs, previous - 1);
                previous = remaining_secs;
            }
            TickOutcome::Completed => completions += 1,
            TickOutcome::Ignored => assert_eq!(session.phase(), SessionPhase::Complete),
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(session.remaining_secs(), 0);
}

#[test]
fn denied_permissions_hold_the_session_until_granted() {
    let mut session = InterviewSession::open(ScriptedMediaCapture::denying(3));

    for _ in 0..2 {
        assert_eq!(session.phase(), SessionPhase::AwaitingPermissions);
        assert!(session.request_permissions().is_err());
        assert!(session.start().is_err());
        assert_eq!(session.tick(), TickOutcome::Ignored);
    }

    session.request_permissions().expect("fourth prompt granted");
    session.start().expect("session starts after the grant");
    assert_eq!(session.phase(), SessionPhase::InProgress);
}

#[tokio::test]
async fn completed_sessions_hand_off_to_the_simulated_feedback() {
    let mut session = InterviewSession::open(ScriptedMediaCapture::granting());
    session.start().expect("session starts");
    session.end_early().expect("end early");
    assert_eq!(session.phase(), SessionPhase::Complete);

    let feedback = FeedbackGenerator::immediate().generate().await;
    assert_eq!(feedback, simulated_feedback());

    let export = feedback_report_export(
        &feedback,
        chrono::NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date"),
    );
    assert!(export.content.contains("Overall Score: 78/100"));
}

#[test]
fn session_constants_match_the_booking_surface() {
    // 30 minutes of countdown, 7 scripted questions, 16 bookable slots.
    assert_eq!(INTERVIEW_COUNTDOWN_SECS, 1800);
    assert_eq!(format_countdown(INTERVIEW_COUNTDOWN_SECS), "30:00");
    assert_eq!(INTERVIEW_QUESTIONS.len(), 7);
    assert_eq!(interview_time_slots().len(), 16);
}
