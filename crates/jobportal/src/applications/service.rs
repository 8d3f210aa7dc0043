use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{
    resume_object_key, Application, ApplicationId, ApplicationStatus, ResumeUpload,
};
use super::repository::{
    ApplicationRepository, ConfirmationError, ConfirmationRequest, ConfirmationSender,
    RepositoryError, ResumeStore, StorageError,
};
use crate::auth::AuthSession;
use crate::catalog::Job;

/// Service composing the resume bucket, the `applications` collection, and
/// the confirmation notification hook.
pub struct ApplyService {
    store: Arc<dyn ResumeStore>,
    repository: Arc<dyn ApplicationRepository>,
    confirmations: Arc<dyn ConfirmationSender>,
}

impl ApplyService {
    pub fn new(
        store: Arc<dyn ResumeStore>,
        repository: Arc<dyn ApplicationRepository>,
        confirmations: Arc<dyn ConfirmationSender>,
    ) -> Self {
        Self {
            store,
            repository,
            confirmations,
        }
    }

    /// Runs the apply sequence: upload the resume, insert the application,
    /// then notify. The first failing step aborts the remainder; there is no
    /// retry, no idempotency key, and no cleanup of an uploaded file whose
    /// insert failed afterwards.
    pub async fn submit(
        &self,
        session: &AuthSession,
        job: &Job,
        resume: ResumeUpload,
        cover_letter: String,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplyError> {
        if resume.is_empty() {
            return Err(ApplyError::MissingResume);
        }

        let key = resume_object_key(&session.user_id, &resume.file_name, now);
        let content_type = mime_guess::from_path(&resume.file_name)
            .first_or_octet_stream()
            .to_string();
        self.store.put(&key, &content_type, resume.content).await?;

        let application = Application {
            id: ApplicationId(Uuid::new_v4().to_string()),
            user_id: session.user_id.clone(),
            job_id: job.id.clone(),
            resume_url: key,
            cover_letter,
            status: ApplicationStatus::Pending,
            applied_at: now,
        };
        let stored = self.repository.insert(application).await?;

        self.confirmations
            .send(ConfirmationRequest {
                email: session.email.clone(),
                job_title: job.title.clone(),
                company: job.company.clone(),
            })
            .await?;

        Ok(stored)
    }
}

/// Error raised by the apply flow; every variant is terminal for the attempt.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("a resume file is required")]
    MissingResume,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),
}
