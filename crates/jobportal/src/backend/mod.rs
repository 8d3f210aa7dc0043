//! Client for the hosted data/auth/storage collaborator.
//!
//! The backend is opaque to this service: a `jobs` collection, an
//! `applications` collection, an `interviews` collection, a resume bucket,
//! an identity endpoint, and one callable for the confirmation email, all
//! reached over HTTPS with bearer-token auth. Adapters at the bottom of this
//! module plug the client into the repository traits.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;

use crate::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus, ConfirmationError,
    ConfirmationOutcome, ConfirmationRequest, ConfirmationSender, RepositoryError, ResumeStore,
    StorageError,
};
use crate::auth::{Credentials, UserId};
use crate::catalog::{Job, JobId};
use crate::config::BackendConfig;
use crate::interview::{Interview, InterviewId, InterviewRepository};

/// Error from the hosted backend collaborator.
#[derive(Debug, thiserror::Error)]
#[error("backend request failed: {0}")]
pub struct BackendError(#[from] reqwest::Error);

/// Identity payload returned by the backend's sign-in endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInUser {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    user: SignInUser,
}

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    resume_bucket: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            service_key: config.service_key.clone(),
            resume_bucket: config.resume_bucket.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// The `jobs` collection, newest first.
    pub async fn fetch_jobs(&self) -> Result<Vec<Job>, BackendError> {
        let jobs = self
            .http
            .get(self.url("rest/v1/jobs"))
            .query(&[("order", "created_at.desc")])
            .bearer_auth(&self.service_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(jobs)
    }

    pub async fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, BackendError> {
        let rows: Vec<Job> = self
            .http
            .get(self.url("rest/v1/jobs"))
            .query(&[("id", format!("eq.{}", id.0))])
            .bearer_auth(&self.service_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_application(&self, application: &Application) -> Result<(), BackendError> {
        self.http
            .post(self.url("rest/v1/applications"))
            .bearer_auth(&self.service_key)
            .json(application)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, BackendError> {
        let rows: Vec<Application> = self
            .http
            .get(self.url("rest/v1/applications"))
            .query(&[("id", format!("eq.{}", id.0))])
            .bearer_auth(&self.service_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn applications_with_status(
        &self,
        user_id: &UserId,
        status: ApplicationStatus,
    ) -> Result<Vec<Application>, BackendError> {
        let rows = self
            .http
            .get(self.url("rest/v1/applications"))
            .query(&[
                ("user_id", format!("eq.{}", user_id.0)),
                ("status", format!("eq.{}", status.label())),
            ])
            .bearer_auth(&self.service_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }

    pub async fn insert_interview(&self, interview: &Interview) -> Result<(), BackendError> {
        self.http
            .post(self.url("rest/v1/interviews"))
            .bearer_auth(&self.service_key)
            .json(interview)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn fetch_interview(
        &self,
        id: &InterviewId,
    ) -> Result<Option<Interview>, BackendError> {
        let rows: Vec<Interview> = self
            .http
            .get(self.url("rest/v1/interviews"))
            .query(&[("id", format!("eq.{}", id.0))])
            .bearer_auth(&self.service_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Raw object upload into the resume bucket.
    pub async fn upload_resume(
        &self,
        key: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<(), BackendError> {
        self.http
            .post(self.url(&format!("storage/v1/object/{}/{}", self.resume_bucket, key)))
            .bearer_auth(&self.service_key)
            .header(header::CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Invokes the confirmation-email callable. The callable only logs a
    /// preview server-side; its response shape is still honored here.
    pub async fn send_confirmation(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<ConfirmationOutcome, BackendError> {
        let outcome = self
            .http
            .post(self.url("functions/v1/send-application-email"))
            .bearer_auth(&self.service_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(outcome)
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignInUser, BackendError> {
        let response: SignInResponse = self
            .http
            .post(self.url("auth/v1/token"))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.user)
    }
}

/// `applications` collection adapter.
pub struct BackendApplicationRepository {
    client: Arc<BackendClient>,
}

impl BackendApplicationRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApplicationRepository for BackendApplicationRepository {
    async fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.client
            .insert_application(&application)
            .await
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        Ok(application)
    }

    async fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.client
            .fetch_application(id)
            .await
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))
    }

    async fn with_status(
        &self,
        user_id: &UserId,
        status: ApplicationStatus,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.client
            .applications_with_status(user_id, status)
            .await
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))
    }
}

/// `interviews` collection adapter.
pub struct BackendInterviewRepository {
    client: Arc<BackendClient>,
}

impl BackendInterviewRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InterviewRepository for BackendInterviewRepository {
    async fn insert(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        self.client
            .insert_interview(&interview)
            .await
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        Ok(interview)
    }

    async fn fetch(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError> {
        self.client
            .fetch_interview(id)
            .await
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))
    }
}

/// Resume bucket adapter.
pub struct BackendResumeStore {
    client: Arc<BackendClient>,
}

impl BackendResumeStore {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeStore for BackendResumeStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<(), StorageError> {
        self.client
            .upload_resume(key, content_type, content)
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))
    }
}

/// Confirmation-callable adapter.
pub struct BackendConfirmationSender {
    client: Arc<BackendClient>,
}

impl BackendConfirmationSender {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfirmationSender for BackendConfirmationSender {
    async fn send(
        &self,
        request: ConfirmationRequest,
    ) -> Result<ConfirmationOutcome, ConfirmationError> {
        self.client
            .send_confirmation(&request)
            .await
            .map_err(|err| ConfirmationError::Transport(err.to_string()))
    }
}
