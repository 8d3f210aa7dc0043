use async_trait::async_trait;

use super::domain::{Interview, InterviewId};
use crate::applications::RepositoryError;

/// Storage abstraction over the hosted `interviews` collection.
#[async_trait]
pub trait InterviewRepository: Send + Sync {
    async fn insert(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    async fn fetch(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError>;
}
