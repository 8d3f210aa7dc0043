use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use clap::Args;

use jobportal::applications::{ApplyService, ResumeUpload};
use jobportal::auth::{Credentials, IdentityGateway, SessionStore};
use jobportal::catalog::{export_job_description, ExportFormat, JobFilter, JobSource, JobType};
use jobportal::error::AppError;
use jobportal::interview::{
    feedback_report_export, format_countdown, interview_date_options, interview_time_slots,
    score_label, FeedbackGenerator, InterviewSession, ScheduleRequest, ScheduleService,
    ScriptedMediaCapture, SessionPhase, COMPLETION_REDIRECT_DELAY,
    INTERVIEW_DURATION_OPTIONS_MIN, INTERVIEW_QUESTIONS,
};

use crate::infra::{
    InMemoryApplicationRepository, InMemoryInterviewRepository, InMemoryResumeStore,
    PreviewConfirmationSender,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the demo's reference date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Scripted camera/microphone denials before access is granted
    #[arg(long, default_value_t = 1)]
    pub(crate) permission_denials: u32,
    /// Skip the interview session portion of the demo
    #[arg(long)]
    pub(crate) skip_session: bool,
}

/// End-to-end CLI walkthrough: catalog search, application intake, interview
/// booking, the scripted session, and the simulated feedback report.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        permission_denials,
        skip_session,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let now = Utc::now();

    println!("Job portal demo ({today})");

    let catalog = JobSource::Sample;
    let jobs = catalog.fetch_all().await;
    println!("\nCatalog: {} open roles", jobs.len());
    for job in &jobs {
        println!(
            "- {} @ {} ({}, {})",
            job.title,
            job.company,
            job.location,
            job.job_type.label()
        );
    }

    let contract_filter = JobFilter {
        job_type: Some(JobType::Contract),
        ..JobFilter::default()
    };
    let contract_roles = contract_filter.apply(&jobs);
    println!(
        "\nFilter type=contract keeps {} role(s): {}",
        contract_roles.len(),
        contract_roles
            .iter()
            .map(|job| job.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if let Ok(export) = export_job_description(&jobs[0], ExportFormat::Txt) {
        println!(
            "Plain-text export: {} ({} bytes)",
            export.file_name,
            export.content.len()
        );
    }

    let sessions = SessionStore::default();
    let identity = IdentityGateway::Stub;
    let (user_id, email) = match identity
        .sign_in(&Credentials {
            email: "candidate@example.com".to_string(),
            password: "demo-password".to_string(),
        })
        .await
    {
        Ok(resolved) => resolved,
        Err(err) => {
            println!("sign-in failed: {err}");
            return Ok(());
        }
    };
    let session = sessions.issue(user_id, email, now);
    println!("\nSigned in as {}", session.email);

    let applications = Arc::new(InMemoryApplicationRepository::default());
    let resumes = Arc::new(InMemoryResumeStore::default());
    let confirmations = Arc::new(PreviewConfirmationSender::default());
    let apply = ApplyService::new(resumes.clone(), applications.clone(), confirmations.clone());

    let resume = ResumeUpload {
        file_name: "resume.pdf".to_string(),
        content: b"%PDF-1.4 demo resume".to_vec(),
    };
    let application = match apply
        .submit(
            &session,
            &jobs[0],
            resume,
            "Cover letter for the demo run.".to_string(),
            now,
        )
        .await
    {
        Ok(application) => application,
        Err(err) => {
            println!("apply failed: {err}");
            return Ok(());
        }
    };
    println!(
        "\nApplied to {}: application {} ({})",
        jobs[0].title,
        application.id.0,
        application.status.label()
    );
    if let Some(stored) = resumes.stored().first() {
        println!(
            "- resume stored as {} ({}, {} bytes)",
            stored.key, stored.content_type, stored.size
        );
    }
    if let Some(preview) = confirmations.previews().first() {
        println!(
            "- confirmation preview: {} / {} at {}",
            preview.email, preview.job_title, preview.company
        );
    }

    // The reviewer moves the application forward out-of-band; the demo
    // simulates that step so booking has something to offer.
    applications.mark_interview_ready(&application.id);

    let interviews = Arc::new(InMemoryInterviewRepository::default());
    let schedule = ScheduleService::new(applications.clone(), interviews.clone());
    let ready = match schedule.interview_ready(&session).await {
        Ok(ready) => ready,
        Err(err) => {
            println!("listing interview-ready applications failed: {err}");
            return Ok(());
        }
    };
    println!("\nInterview-ready applications: {}", ready.len());

    let dates = interview_date_options(today);
    let slots = interview_time_slots();
    println!(
        "Booking options: {} weekdays, {} time slots, durations {:?} min",
        dates.len(),
        slots.len(),
        INTERVIEW_DURATION_OPTIONS_MIN
    );

    let interview = match schedule
        .schedule(
            &session,
            ScheduleRequest {
                application_id: application.id.clone(),
                date: dates[0],
                time: slots[0],
                duration_minutes: 30,
            },
            today,
            now,
        )
        .await
    {
        Ok(interview) => interview,
        Err(err) => {
            println!("booking failed: {err}");
            return Ok(());
        }
    };
    println!(
        "Scheduled interview {} on {} at {} for {} minutes",
        interview.id.0,
        dates[0],
        slots[0].format("%H:%M"),
        interview.duration
    );

    if !skip_session {
        println!("\nInterview session");
        let mut live = InterviewSession::open(ScriptedMediaCapture::denying(permission_denials));
        let mut prompts = 1;
        while live.phase() == SessionPhase::AwaitingPermissions {
            if let Some(err) = live.permission_error() {
                println!("- prompt {prompts}: {err}");
            }
            prompts += 1;
            let _ = live.request_permissions();
        }
        println!("- prompt {prompts}: camera and microphone granted");

        if let Err(err) = live.start() {
            println!("could not start the session: {err}");
            return Ok(());
        }
        println!(
            "- started with {} on the clock, {} scripted questions",
            format_countdown(live.remaining_secs()),
            INTERVIEW_QUESTIONS.len()
        );

        while live.phase() == SessionPhase::InProgress {
            if let Some(question) = live.current_question() {
                println!("- q{}: {}", live.question_index() + 1, question);
            }
            // A minute of simulated thinking time per question.
            for _ in 0..60 {
                live.tick();
            }
            if live.advance_question().is_err() {
                break;
            }
        }
        println!(
            "- complete with {} left, capture stream stopped: {}",
            format_countdown(live.remaining_secs()),
            matches!(live.stream_stopped(), Some(true))
        );
        println!(
            "- feedback opens after a {}s processing pause",
            COMPLETION_REDIRECT_DELAY.as_secs()
        );

        let feedback = FeedbackGenerator::immediate().generate().await;
        println!(
            "\nSimulated feedback: overall {}/100 ({})",
            feedback.overall_score,
            score_label(feedback.overall_score)
        );
        println!(
            "- communication {}, technical {}, confidence {}, clarity {}",
            feedback.communication, feedback.technical, feedback.confidence, feedback.clarity
        );
        let export = feedback_report_export(&feedback, today);
        println!(
            "- report download: {} ({} bytes)",
            export.file_name,
            export.content.len()
        );
    }

    Ok(())
}
