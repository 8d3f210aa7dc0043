use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use tracing::info;

use jobportal::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus, ApplyService,
    ConfirmationError, ConfirmationOutcome, ConfirmationRequest, ConfirmationSender,
    RepositoryError, ResumeStore, StorageError,
};
use jobportal::auth::{IdentityGateway, SessionStore, UserId};
use jobportal::catalog::JobSource;
use jobportal::interview::{
    FeedbackGenerator, Interview, InterviewId, InterviewRepository, ScheduleService,
};

use crate::sessions::SessionRegistry;

/// Everything the route handlers reach for, wired once at startup.
pub(crate) struct AppContext {
    pub(crate) catalog: JobSource,
    pub(crate) identity: IdentityGateway,
    pub(crate) sessions: SessionStore,
    pub(crate) apply: ApplyService,
    pub(crate) schedule: ScheduleService,
    pub(crate) interviews: Arc<dyn InterviewRepository>,
    pub(crate) live_sessions: Arc<SessionRegistry>,
    pub(crate) feedback: FeedbackGenerator,
    /// Scripted permission denials per opened session; zero in production
    /// wiring, raised by the demo to exercise the retry path.
    pub(crate) capture_denials: u32,
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Option<Arc<PrometheusHandle>>,
}

/// `applications` collection stand-in for environments without the backend.
#[derive(Default)]
pub(crate) struct InMemoryApplicationRepository {
    records: Mutex<Vec<Application>>,
}

impl InMemoryApplicationRepository {
    /// Simulates the out-of-band review moving an application to interview.
    pub(crate) fn mark_interview_ready(&self, id: &ApplicationId) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if let Some(record) = guard.iter_mut().find(|record| &record.id == id) {
            record.status = ApplicationStatus::Interview;
        }
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|record| record.id == application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(application.clone());
        Ok(application)
    }

    async fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    async fn with_status(
        &self,
        user_id: &UserId,
        status: ApplicationStatus,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.user_id == user_id && record.status == status)
            .cloned()
            .collect())
    }
}

/// `interviews` collection stand-in.
#[derive(Default)]
pub(crate) struct InMemoryInterviewRepository {
    records: Mutex<Vec<Interview>>,
}

#[async_trait]
impl InterviewRepository for InMemoryInterviewRepository {
    async fn insert(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.push(interview.clone());
        Ok(interview)
    }

    async fn fetch(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }
}

/// Resume bucket stand-in; keeps keys and sizes so the demo can report them.
#[derive(Default)]
pub(crate) struct InMemoryResumeStore {
    objects: Mutex<Vec<StoredResume>>,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredResume {
    pub(crate) key: String,
    pub(crate) content_type: String,
    pub(crate) size: usize,
}

impl InMemoryResumeStore {
    pub(crate) fn stored(&self) -> Vec<StoredResume> {
        self.objects.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<(), StorageError> {
        let mut guard = self.objects.lock().expect("store mutex poisoned");
        guard.push(StoredResume {
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: content.len(),
        });
        Ok(())
    }
}

/// Confirmation stand-in matching the hosted callable's behavior: the payload
/// is logged as a preview and no mail goes anywhere.
#[derive(Default)]
pub(crate) struct PreviewConfirmationSender {
    previews: Mutex<Vec<ConfirmationRequest>>,
}

impl PreviewConfirmationSender {
    pub(crate) fn previews(&self) -> Vec<ConfirmationRequest> {
        self.previews.lock().expect("preview mutex poisoned").clone()
    }
}

#[async_trait]
impl ConfirmationSender for PreviewConfirmationSender {
    async fn send(
        &self,
        request: ConfirmationRequest,
    ) -> Result<ConfirmationOutcome, ConfirmationError> {
        info!(
            email = %request.email,
            job_title = %request.job_title,
            company = %request.company,
            "sending confirmation email (preview only, no dispatch)"
        );
        let mut guard = self.previews.lock().expect("preview mutex poisoned");
        guard.push(request);
        Ok(ConfirmationOutcome {
            success: true,
            message: Some("Confirmation email sent successfully".to_string()),
            error: None,
        })
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw).map_err(serde::de::Error::custom)
}
