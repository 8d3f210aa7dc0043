use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Employment arrangement advertised on a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Remote,
}

impl JobType {
    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Remote => "remote",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full-time" => Some(JobType::FullTime),
            "part-time" => Some(JobType::PartTime),
            "contract" => Some(JobType::Contract),
            "remote" => Some(JobType::Remote),
            _ => None,
        }
    }
}

/// A postable position record with descriptive and structured fields.
///
/// Immutable from this service's perspective; records are created and edited
/// by the hosted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub salary_range: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub posted_date: NaiveDate,
    pub application_deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
}
