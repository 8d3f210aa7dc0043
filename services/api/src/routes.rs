use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use jobportal::applications::{ApplicationId, ApplyError, RepositoryError, ResumeUpload};
use jobportal::auth::{AuthError, AuthSession, Credentials};
use jobportal::catalog::{export_job_description, ExportError, ExportFormat, JobFilter, JobId, JobType};
use jobportal::interview::{
    feedback_report_export, interview_date_options, interview_time_slots, Interview, InterviewId,
    ScheduleError, ScheduleRequest, ScriptedMediaCapture, INTERVIEW_DURATION_OPTIONS_MIN,
};

use crate::infra::{deserialize_date, deserialize_time, AppContext};
use crate::sessions::LiveSessionError;

pub(crate) fn portal_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/auth/session",
            post(sign_in_endpoint).delete(sign_out_endpoint),
        )
        .route("/api/v1/jobs", get(list_jobs_endpoint))
        .route("/api/v1/jobs/:job_id", get(job_detail_endpoint))
        .route("/api/v1/jobs/:job_id/export", get(export_job_endpoint))
        .route("/api/v1/jobs/:job_id/applications", post(apply_endpoint))
        .route(
            "/api/v1/applications/interview-ready",
            get(interview_ready_endpoint),
        )
        .route("/api/v1/interviews/options", get(booking_options_endpoint))
        .route("/api/v1/interviews", post(schedule_endpoint))
        .route(
            "/api/v1/interviews/:interview_id/session",
            post(open_session_endpoint).get(session_view_endpoint),
        )
        .route(
            "/api/v1/interviews/:interview_id/session/permissions",
            post(retry_permissions_endpoint),
        )
        .route(
            "/api/v1/interviews/:interview_id/session/start",
            post(start_session_endpoint),
        )
        .route(
            "/api/v1/interviews/:interview_id/session/advance",
            post(advance_question_endpoint),
        )
        .route(
            "/api/v1/interviews/:interview_id/session/end",
            post(end_session_endpoint),
        )
        .route(
            "/api/v1/interviews/:interview_id/session/media",
            post(toggle_media_endpoint),
        )
        .route("/api/v1/interviews/:interview_id/feedback", get(feedback_endpoint))
        .route(
            "/api/v1/interviews/:interview_id/feedback/export",
            get(feedback_export_endpoint),
        )
        .with_state(ctx)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_string)
}

/// Every path except sign-in and the probes requires a resolvable session.
fn require_session(ctx: &AppContext, headers: &HeaderMap) -> Result<AuthSession, Response> {
    bearer_token(headers)
        .and_then(|token| ctx.sessions.resolve(&token))
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "missing or revoked session token"))
}

async fn load_interview(ctx: &AppContext, interview_id: &str) -> Result<Interview, Response> {
    match ctx
        .interviews
        .fetch(&InterviewId(interview_id.to_string()))
        .await
    {
        Ok(Some(interview)) => Ok(interview),
        Ok(None) => Err(error_response(StatusCode::NOT_FOUND, "interview not found")),
        Err(err) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            err.to_string(),
        )),
    }
}

fn live_session_response(result: Result<crate::sessions::SessionView, LiveSessionError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(LiveSessionError::NotOpen) => error_response(
            StatusCode::NOT_FOUND,
            LiveSessionError::NotOpen.to_string(),
        ),
        Err(err @ LiveSessionError::Session(_)) => {
            error_response(StatusCode::CONFLICT, err.to_string())
        }
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(ctx): State<Arc<AppContext>>) -> impl IntoResponse {
    let ready = ctx.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(ctx): State<Arc<AppContext>>) -> impl IntoResponse {
    let body = match &ctx.metrics {
        Some(handle) => handle.render(),
        None => String::new(),
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

pub(crate) async fn sign_in_endpoint(
    State(ctx): State<Arc<AppContext>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    match ctx.identity.sign_in(&credentials).await {
        Ok((user_id, email)) => {
            let session = ctx.sessions.issue(user_id, email, Utc::now());
            (StatusCode::OK, Json(session)).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            error_response(StatusCode::UNAUTHORIZED, AuthError::InvalidCredentials.to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn sign_out_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Response {
    match bearer_token(&headers) {
        Some(token) if ctx.sessions.revoke(&token) => {
            (StatusCode::OK, Json(json!({ "status": "signed_out" }))).into_response()
        }
        _ => error_response(StatusCode::UNAUTHORIZED, "missing or revoked session token"),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingQuery {
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) location: Option<String>,
    #[serde(default, rename = "type")]
    pub(crate) job_type: Option<String>,
}

fn listing_filter(query: ListingQuery) -> Result<JobFilter, Response> {
    let job_type = match query.job_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(JobType::parse(raw).ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("unknown job type '{raw}'"),
            )
        })?),
    };

    Ok(JobFilter {
        search: query.search,
        location: query.location,
        job_type,
    })
}

pub(crate) async fn list_jobs_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(query): Query<ListingQuery>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    let filter = match listing_filter(query) {
        Ok(filter) => filter,
        Err(rejected) => return rejected,
    };

    let jobs = ctx.catalog.fetch_all().await;
    (StatusCode::OK, Json(filter.apply(&jobs))).into_response()
}

pub(crate) async fn job_detail_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }

    match ctx.catalog.fetch(&JobId(job_id)).await {
        Some(job) => (StatusCode::OK, Json(job)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "job not found"),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default)]
    pub(crate) format: Option<String>,
}

pub(crate) async fn export_job_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }

    let raw_format = query.format.unwrap_or_else(|| "txt".to_string());
    let format = match ExportFormat::parse(&raw_format) {
        Some(format) => format,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("unknown export format '{raw_format}'"),
            )
        }
    };

    let job = match ctx.catalog.fetch(&JobId(job_id)).await {
        Some(job) => job,
        None => return error_response(StatusCode::NOT_FOUND, "job not found"),
    };

    match export_job_description(&job, format) {
        Ok(export) => (StatusCode::OK, Json(export)).into_response(),
        Err(err @ ExportError::Unsupported(_)) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(json!({ "notice": err.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationRequest {
    pub(crate) resume_file_name: String,
    /// Base64-encoded file content.
    pub(crate) resume_content: String,
    #[serde(default)]
    pub(crate) cover_letter: String,
}

pub(crate) async fn apply_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(request): Json<ApplicationRequest>,
) -> Response {
    let session = match require_session(&ctx, &headers) {
        Ok(session) => session,
        Err(denied) => return denied,
    };

    let job = match ctx.catalog.fetch(&JobId(job_id)).await {
        Some(job) => job,
        None => return error_response(StatusCode::NOT_FOUND, "job not found"),
    };

    let content = match BASE64.decode(request.resume_content.as_bytes()) {
        Ok(content) => content,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "resume_content must be base64-encoded",
            )
        }
    };
    let resume = ResumeUpload {
        file_name: request.resume_file_name,
        content,
    };

    match ctx
        .apply
        .submit(&session, &job, resume, request.cover_letter, Utc::now())
        .await
    {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(err @ ApplyError::MissingResume) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

/// Interview-ready application joined with its job's display fields.
#[derive(Debug, Serialize)]
pub(crate) struct InterviewReadyView {
    pub(crate) application_id: ApplicationId,
    pub(crate) job_id: JobId,
    pub(crate) job_title: String,
    pub(crate) company: String,
    pub(crate) applied_at: DateTime<Utc>,
}

pub(crate) async fn interview_ready_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Response {
    let session = match require_session(&ctx, &headers) {
        Ok(session) => session,
        Err(denied) => return denied,
    };

    let ready = match ctx.schedule.interview_ready(&session).await {
        Ok(ready) => ready,
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };

    // Inner-join semantics: applications whose job no longer resolves are
    // dropped from the listing.
    let mut views = Vec::with_capacity(ready.len());
    for application in ready {
        if let Some(job) = ctx.catalog.fetch(&application.job_id).await {
            views.push(InterviewReadyView {
                application_id: application.id,
                job_id: job.id,
                job_title: job.title,
                company: job.company,
                applied_at: application.applied_at,
            });
        }
    }

    (StatusCode::OK, Json(views)).into_response()
}

#[derive(Debug, Serialize)]
pub(crate) struct BookingOptions {
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) time_slots: Vec<String>,
    pub(crate) durations: Vec<u16>,
}

pub(crate) async fn booking_options_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }

    let today = Local::now().date_naive();
    let options = BookingOptions {
        dates: interview_date_options(today),
        time_slots: interview_time_slots()
            .iter()
            .map(|slot| slot.format("%H:%M").to_string())
            .collect(),
        durations: INTERVIEW_DURATION_OPTIONS_MIN.to_vec(),
    };

    (StatusCode::OK, Json(options)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleRequestBody {
    pub(crate) application_id: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) date: NaiveDate,
    #[serde(deserialize_with = "deserialize_time")]
    pub(crate) time: NaiveTime,
    #[serde(default = "default_duration")]
    pub(crate) duration_minutes: u16,
}

fn default_duration() -> u16 {
    30
}

pub(crate) async fn schedule_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<ScheduleRequestBody>,
) -> Response {
    let session = match require_session(&ctx, &headers) {
        Ok(session) => session,
        Err(denied) => return denied,
    };

    let request = ScheduleRequest {
        application_id: ApplicationId(body.application_id),
        date: body.date,
        time: body.time,
        duration_minutes: body.duration_minutes,
    };

    match ctx
        .schedule
        .schedule(&session, request, Local::now().date_naive(), Utc::now())
        .await
    {
        Ok(interview) => (StatusCode::CREATED, Json(interview)).into_response(),
        Err(err @ (ScheduleError::NotEligible | ScheduleError::InvalidSelection(_))) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        Err(ScheduleError::Repository(RepositoryError::NotFound)) => {
            error_response(StatusCode::NOT_FOUND, "application not found")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn open_session_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    let interview = match load_interview(&ctx, &interview_id).await {
        Ok(interview) => interview,
        Err(rejected) => return rejected,
    };

    let capture = if ctx.capture_denials > 0 {
        ScriptedMediaCapture::denying(ctx.capture_denials)
    } else {
        ScriptedMediaCapture::granting()
    };
    let view = ctx.live_sessions.open(&interview.id.0, capture);
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn session_view_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    live_session_response(ctx.live_sessions.view(&interview_id))
}

pub(crate) async fn retry_permissions_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    live_session_response(ctx.live_sessions.retry_permissions(&interview_id))
}

pub(crate) async fn start_session_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    live_session_response(ctx.live_sessions.start(&interview_id))
}

pub(crate) async fn advance_question_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    live_session_response(ctx.live_sessions.advance(&interview_id))
}

pub(crate) async fn end_session_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    live_session_response(ctx.live_sessions.end_early(&interview_id))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MediaToggleRequest {
    pub(crate) video: Option<bool>,
    pub(crate) audio: Option<bool>,
}

pub(crate) async fn toggle_media_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
    Json(request): Json<MediaToggleRequest>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    live_session_response(ctx.live_sessions.set_media(&interview_id, request.video, request.audio))
}

pub(crate) async fn feedback_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    if let Err(rejected) = load_interview(&ctx, &interview_id).await {
        return rejected;
    }

    let feedback = ctx.feedback.generate().await;
    (StatusCode::OK, Json(feedback)).into_response()
}

pub(crate) async fn feedback_export_endpoint(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(interview_id): Path<String>,
) -> Response {
    if let Err(denied) = require_session(&ctx, &headers) {
        return denied;
    }
    if let Err(rejected) = load_interview(&ctx, &interview_id).await {
        return rejected;
    }

    let feedback = ctx.feedback.generate().await;
    let export = feedback_report_export(&feedback, Local::now().date_naive());
    (StatusCode::OK, Json(export)).into_response()
}
