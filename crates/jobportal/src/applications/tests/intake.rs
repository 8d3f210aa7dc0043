use std::sync::Arc;

use super::common::*;
use crate::applications::domain::{ApplicationStatus, ResumeUpload};
use crate::applications::service::{ApplyError, ApplyService};

#[tokio::test]
async fn submit_uploads_inserts_and_notifies_in_order() {
    let store = Arc::new(MemoryStore::default());
    let repository = Arc::new(MemoryRepository::default());
    let confirmations = Arc::new(MemoryConfirmations::default());
    let service = ApplyService::new(store.clone(), repository.clone(), confirmations.clone());

    let job = frontend_job();
    let application = service
        .submit(&session(), &job, resume(), "I would love this role.".into(), fixed_now())
        .await
        .expect("apply flow succeeds");

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.job_id, job.id);
    assert_eq!(application.applied_at, fixed_now());

    let keys = store.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("resume_candidate@example.com_"));
    assert!(keys[0].ends_with(".pdf"));
    assert_eq!(application.resume_url, keys[0]);

    let stored = repository.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].cover_letter, "I would love this role.");

    let requests = confirmations.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].email, "candidate@example.com");
    assert_eq!(requests[0].job_title, "Senior Frontend Developer");
    assert_eq!(requests[0].company, "TechCorp Inc.");
}

#[tokio::test]
async fn submit_requires_a_resume_file() {
    let store = Arc::new(MemoryStore::default());
    let repository = Arc::new(MemoryRepository::default());
    let confirmations = Arc::new(MemoryConfirmations::default());
    let service = ApplyService::new(store.clone(), repository.clone(), confirmations);

    let empty = ResumeUpload {
        file_name: "resume.pdf".into(),
        content: Vec::new(),
    };
    let err = service
        .submit(&session(), &frontend_job(), empty, String::new(), fixed_now())
        .await
        .expect_err("empty resume rejected");

    assert!(matches!(err, ApplyError::MissingResume));
    assert!(store.keys().is_empty());
    assert!(repository.stored().is_empty());
}

#[tokio::test]
async fn upload_failure_aborts_before_the_insert() {
    let store = MemoryStore::failing();
    let repository = Arc::new(MemoryRepository::default());
    let confirmations = Arc::new(MemoryConfirmations::default());
    let service = ApplyService::new(store, repository.clone(), confirmations.clone());

    let err = service
        .submit(&session(), &frontend_job(), resume(), String::new(), fixed_now())
        .await
        .expect_err("upload failure surfaces");

    assert!(matches!(err, ApplyError::Storage(_)));
    assert!(repository.stored().is_empty());
    assert!(confirmations.requests().is_empty());
}

#[tokio::test]
async fn insert_failure_leaves_the_uploaded_file_behind() {
    let store = Arc::new(MemoryStore::default());
    let repository = MemoryRepository::failing();
    let confirmations = Arc::new(MemoryConfirmations::default());
    let service = ApplyService::new(store.clone(), repository, confirmations.clone());

    let err = service
        .submit(&session(), &frontend_job(), resume(), String::new(), fixed_now())
        .await
        .expect_err("insert failure surfaces");

    assert!(matches!(err, ApplyError::Repository(_)));
    // No rollback: the orphaned upload stays in the bucket.
    assert_eq!(store.keys().len(), 1);
    assert!(confirmations.requests().is_empty());
}

#[tokio::test]
async fn confirmation_failure_still_keeps_the_stored_application() {
    let store = Arc::new(MemoryStore::default());
    let repository = Arc::new(MemoryRepository::default());
    let confirmations = MemoryConfirmations::failing();
    let service = ApplyService::new(store, repository.clone(), confirmations);

    let err = service
        .submit(&session(), &frontend_job(), resume(), String::new(), fixed_now())
        .await
        .expect_err("notification failure surfaces");

    assert!(matches!(err, ApplyError::Confirmation(_)));
    assert_eq!(repository.stored().len(), 1);
}

#[tokio::test]
async fn resubmission_creates_a_duplicate_application() {
    let store = Arc::new(MemoryStore::default());
    let repository = Arc::new(MemoryRepository::default());
    let confirmations = Arc::new(MemoryConfirmations::default());
    let service = ApplyService::new(store, repository.clone(), confirmations);

    let job = frontend_job();
    for _ in 0..2 {
        service
            .submit(&session(), &job, resume(), String::new(), fixed_now())
            .await
            .expect("apply flow succeeds");
    }

    // No idempotency key: repeating the sequence stores two records.
    assert_eq!(repository.stored().len(), 2);
}
