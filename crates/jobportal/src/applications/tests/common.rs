use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::applications::domain::{Application, ApplicationId, ApplicationStatus, ResumeUpload};
use crate::applications::repository::{
    ApplicationRepository, ConfirmationError, ConfirmationOutcome, ConfirmationRequest,
    ConfirmationSender, RepositoryError, ResumeStore, StorageError,
};
use crate::auth::{AuthSession, UserId};
use crate::catalog::sample_jobs;
use crate::catalog::Job;

pub(super) fn session() -> AuthSession {
    AuthSession {
        user_id: UserId("candidate@example.com".to_string()),
        email: "candidate@example.com".to_string(),
        token: "test-token".to_string(),
        signed_in_at: fixed_now(),
    }
}

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 7, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn frontend_job() -> Job {
    sample_jobs().into_iter().next().expect("sample job")
}

pub(super) fn resume() -> ResumeUpload {
    ResumeUpload {
        file_name: "resume.pdf".to_string(),
        content: b"%PDF-1.4 sample resume".to_vec(),
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) objects: Mutex<Vec<(String, String, usize)>>,
    pub(super) fail: bool,
}

impl MemoryStore {
    pub(super) fn failing() -> Arc<Self> {
        Arc::new(Self {
            objects: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub(super) fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .map(|(key, _, _)| key.clone())
            .collect()
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable("bucket offline".to_string()));
        }
        let mut guard = self.objects.lock().expect("store mutex poisoned");
        guard.push((key.to_string(), content_type.to_string(), content.len()));
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) records: Mutex<Vec<Application>>,
    pub(super) fail: bool,
}

impl MemoryRepository {
    pub(super) fn failing() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub(super) fn stored(&self) -> Vec<Application> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

#[async_trait]
impl ApplicationRepository for MemoryRepository {
    async fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Unavailable("collection offline".to_string()));
        }
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

#[derive(Default)]
pub(super) struct MemoryConfirmations {
    pub(super) sent: Mutex<Vec<ConfirmationRequest>>,
    pub(super) fail: bool,
}

impl MemoryConfirmations {
    pub(super) fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub(super) fn requests(&self) -> Vec<ConfirmationRequest> {
        self.sent.lock().expect("confirmation mutex poisoned").clone()
    }
}

#[async_trait]
impl ConfirmationSender for MemoryConfirmations {
    async fn send(
        &self,
        request: ConfirmationRequest,
    ) -> Result<ConfirmationOutcome, ConfirmationError> {
        if self.fail {
            return Err(ConfirmationError::Transport("function offline".to_string()));
        }
        let mut guard = self.sent.lock().expect("confirmation mutex poisoned");
        guard.push(request);
        Ok(ConfirmationOutcome {
            success: true,
            message: Some("Confirmation email sent successfully".to_string()),
            error: None,
        })
    }
}
