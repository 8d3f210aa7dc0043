//! Application intake: resume upload, the `applications` collection, and the
//! best-effort confirmation notification.

pub mod domain;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{resume_object_key, Application, ApplicationId, ApplicationStatus, ResumeUpload};
pub use repository::{
    ApplicationRepository, ConfirmationError, ConfirmationOutcome, ConfirmationRequest,
    ConfirmationSender, RepositoryError, ResumeStore, StorageError,
};
pub use service::{ApplyError, ApplyService};
