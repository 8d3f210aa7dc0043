use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId, ApplicationStatus};
use crate::auth::UserId;

/// Storage abstraction over the hosted `applications` collection.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    async fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    async fn with_status(
        &self,
        user_id: &UserId,
        status: ApplicationStatus,
    ) -> Result<Vec<Application>, RepositoryError>;
}

/// Error enumeration for collection failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("collection unavailable: {0}")]
    Unavailable(String),
}

/// Object-storage abstraction over the hosted resume bucket.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("resume bucket unavailable: {0}")]
    Unavailable(String),
    #[error("upload rejected: {0}")]
    Rejected(String),
}

/// Payload for the hosted confirmation-email callable. Field names follow the
/// callable's wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    pub email: String,
    pub job_title: String,
    pub company: String,
}

/// What the callable reports back: `{success, message}` on the happy path,
/// `{success: false, error}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outbound hook for the confirmation notification. The hosted callable is a
/// preview stub; no mail is actually dispatched anywhere.
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send(
        &self,
        request: ConfirmationRequest,
    ) -> Result<ConfirmationOutcome, ConfirmationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConfirmationError {
    #[error("confirmation endpoint unreachable: {0}")]
    Transport(String),
}
