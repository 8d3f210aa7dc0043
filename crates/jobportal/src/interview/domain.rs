use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::applications::ApplicationId;

/// Identifier wrapper for scheduled interviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterviewId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }
}

/// A booked session linked to an application.
///
/// This service only ever creates these records; status transitions and the
/// feedback columns are written out-of-band, if at all. The simulated
/// feedback view never touches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub scheduled_date: DateTime<Utc>,
    pub duration: u16,
    pub status: InterviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_report: Option<String>,
    pub created_at: DateTime<Utc>,
}
