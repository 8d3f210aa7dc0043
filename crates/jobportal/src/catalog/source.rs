use std::sync::Arc;

use tracing::warn;

use super::domain::{Job, JobId};
use super::sample::sample_jobs;
use crate::backend::BackendClient;

/// Where catalog reads come from, selected by configuration rather than by
/// catching errors ad hoc at every call site.
///
/// The remote variant still substitutes the fixed sample set when the hosted
/// backend errors: a broken backend degrades the listing instead of breaking
/// it. Records arrive newest-first from the backend; the sample set is
/// already ordered that way.
pub enum JobSource {
    Remote(Arc<BackendClient>),
    Sample,
}

impl JobSource {
    pub async fn fetch_all(&self) -> Vec<Job> {
        match self {
            JobSource::Remote(client) => match client.fetch_jobs().await {
                Ok(jobs) => jobs,
                Err(err) => {
                    warn!(error = %err, "job catalog unavailable, serving sample data");
                    sample_jobs()
                }
            },
            JobSource::Sample => sample_jobs(),
        }
    }

    /// Fetches one record. A reachable backend that has no such row yields
    /// `None`; an unreachable backend falls back to the sample set.
    pub async fn fetch(&self, id: &JobId) -> Option<Job> {
        match self {
            JobSource::Remote(client) => match client.fetch_job(id).await {
                Ok(job) => job,
                Err(err) => {
                    warn!(error = %err, "job lookup unavailable, serving sample data");
                    sample_jobs().into_iter().find(|job| &job.id == id)
                }
            },
            JobSource::Sample => sample_jobs().into_iter().find(|job| &job.id == id),
        }
    }
}
