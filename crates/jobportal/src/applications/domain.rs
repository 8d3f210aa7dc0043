use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::catalog::JobId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Review pipeline status. Only `Pending` is ever written by this service;
/// later transitions happen out-of-band in the hosted backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interview,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }
}

/// A user's submission of resume + cover letter against a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub job_id: JobId,
    pub resume_url: String,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// Resume file handed to the apply flow before it reaches the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ResumeUpload {
    pub fn is_empty(&self) -> bool {
        self.file_name.trim().is_empty() || self.content.is_empty()
    }
}

/// Bucket key for an uploaded resume: owner, submission instant, and the
/// original extension when the file name carries one.
pub fn resume_object_key(user_id: &UserId, file_name: &str, now: DateTime<Utc>) -> String {
    let stamp = now.timestamp_millis();
    match file_name.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => {
            format!("resume_{}_{}.{}", user_id.0, stamp, extension)
        }
        _ => format!("resume_{}_{}", user_id.0, stamp),
    }
}
