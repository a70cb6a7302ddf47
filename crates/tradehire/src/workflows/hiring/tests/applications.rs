use super::common::*;
use crate::config::PipelineConfig;
use crate::workflows::hiring::domain::{
    ActorId, ApplicationId, ApplicationStatus, JobId, JobStatus, NotificationKind,
};
use crate::workflows::hiring::error::{PipelineError, DUPLICATE_APPLICATION_MESSAGE};
use crate::workflows::hiring::memory::InMemoryHiringStore;
use crate::workflows::hiring::pipeline::HiringPipeline;
use crate::workflows::hiring::repository::{ApplicationRepository, NotificationRepository};
use std::sync::Arc;

#[test]
fn submit_sets_pending_and_notifies_employer() {
    let (pipeline, store) = build_pipeline();
    let owner = employer("e1");
    let applicant = candidate("u1");
    let (job, application) = seed_application(&pipeline, &owner, &applicant);

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.job_id, job.id);
    assert_eq!(application.applicant_id, *applicant.id());

    let received = notifications_of_kind(&store, owner.id(), NotificationKind::ApplicationReceived);
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0].metadata.get("application_id"),
        Some(&application.id.0)
    );
    assert!(!received[0].read);
}

#[test]
fn submit_ignores_client_asserted_applicant() {
    let (pipeline, _) = build_pipeline();
    let job = seed_job(&pipeline, &employer("e-spoof"));
    let applicant = candidate("u-real");

    let mut payload = submission(&job);
    payload.applicant_id = Some(ActorId::from("u-victim"));
    let application = pipeline
        .applications()
        .submit(&applicant, payload)
        .expect("submitted");

    assert_eq!(application.applicant_id, ActorId::from("u-real"));
}

#[test]
fn duplicate_submission_is_rejected_with_fixed_message() {
    let (pipeline, _) = build_pipeline();
    let owner = employer("e-dup");
    let applicant = candidate("u-dup");
    let (job, _) = seed_application(&pipeline, &owner, &applicant);

    let err = pipeline
        .applications()
        .submit(&applicant, submission(&job))
        .expect_err("second submission fails");
    assert!(matches!(err, PipelineError::DuplicateApplication));
    assert_eq!(err.to_string(), DUPLICATE_APPLICATION_MESSAGE);

    pipeline
        .applications()
        .submit(&candidate("u-other"), submission(&job))
        .expect("another candidate may apply");
}

#[test]
fn submit_requires_candidate_and_existing_job() {
    let (pipeline, store) = build_pipeline();
    let owner = employer("e-role");
    let job = seed_job(&pipeline, &owner);

    assert!(matches!(
        pipeline.applications().submit(&owner, submission(&job)),
        Err(PipelineError::Forbidden(_))
    ));

    let mut missing = submission(&job);
    missing.job_id = JobId::from("job-gone");
    assert!(matches!(
        pipeline.applications().submit(&candidate("u-x"), missing),
        Err(PipelineError::NotFound { entity: "job", .. })
    ));
    assert!(store
        .applications_for_jobs(&[job.id])
        .expect("list")
        .is_empty());
}

#[test]
fn concurrent_submissions_yield_one_application() {
    let (pipeline, store) = build_pipeline();
    let job = seed_job(&pipeline, &employer("e-race"));
    let pipeline = Arc::new(pipeline);
    let applicant = candidate("u-race");

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let pipeline = pipeline.clone();
            let applicant = applicant.clone();
            let payload = submission(&job);
            std::thread::spawn(move || pipeline.applications().submit(&applicant, payload))
        })
        .collect();

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread completes"))
        .collect();
    let accepted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(PipelineError::DuplicateApplication)))
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 15);
    assert_eq!(
        store
            .applications_by_applicant(applicant.id())
            .expect("list")
            .len(),
        1
    );
}

#[test]
fn update_status_has_no_transition_graph_and_notifies_each_change() {
    let (pipeline, store) = build_pipeline();
    let owner = employer("e-status");
    let applicant = candidate("u-status");
    let (job, application) = seed_application(&pipeline, &owner, &applicant);

    let shortlisted = pipeline
        .applications()
        .update_status(&owner, &application.id, ApplicationStatus::Shortlisted)
        .expect("shortlist");
    assert_eq!(shortlisted.status, ApplicationStatus::Shortlisted);
    let rejected = pipeline
        .applications()
        .update_status(&owner, &application.id, ApplicationStatus::Rejected)
        .expect("reject");
    let reopened = pipeline
        .applications()
        .update_status(&owner, &application.id, ApplicationStatus::Pending)
        .expect("rejected back to pending is allowed");
    assert_eq!(rejected.status, ApplicationStatus::Rejected);
    assert_eq!(reopened.status, ApplicationStatus::Pending);

    let changes = notifications_of_kind(
        &store,
        applicant.id(),
        NotificationKind::ApplicationStatusChanged,
    );
    assert_eq!(changes.len(), 3);
    assert_eq!(
        changes[0].message,
        format!("Great news! You've been shortlisted for {}", job.title)
    );
}

#[test]
fn update_status_requires_owning_employer() {
    let (pipeline, store) = build_pipeline();
    let owner = employer("e-own");
    let applicant = candidate("u-own");
    let (_, application) = seed_application(&pipeline, &owner, &applicant);
    let rival = employer("e-rival");

    assert!(matches!(
        pipeline
            .applications()
            .update_status(&rival, &application.id, ApplicationStatus::Rejected),
        Err(PipelineError::Forbidden(_))
    ));
    assert!(matches!(
        pipeline
            .applications()
            .update_status(&applicant, &application.id, ApplicationStatus::Shortlisted),
        Err(PipelineError::Forbidden(_))
    ));
    assert!(matches!(
        pipeline.applications().update_status(
            &owner,
            &ApplicationId::from("app-missing"),
            ApplicationStatus::Shortlisted
        ),
        Err(PipelineError::NotFound { .. })
    ));

    let stored = store
        .fetch_application(&application.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.status, ApplicationStatus::Pending);
}

#[test]
fn withdraw_distinguishes_missing_from_foreign() {
    let (pipeline, store) = build_pipeline();
    let owner = employer("e-withdraw");
    let applicant = candidate("u-withdraw");
    let (_, application) = seed_application(&pipeline, &owner, &applicant);

    assert!(matches!(
        pipeline
            .applications()
            .withdraw(&candidate("u-intruder"), &application.id),
        Err(PipelineError::Forbidden(_))
    ));
    assert!(matches!(
        pipeline
            .applications()
            .withdraw(&applicant, &ApplicationId::from("app-none")),
        Err(PipelineError::NotFound { .. })
    ));
    assert!(matches!(
        pipeline.applications().withdraw(&owner, &application.id),
        Err(PipelineError::Forbidden(_))
    ));

    pipeline
        .applications()
        .withdraw(&applicant, &application.id)
        .expect("owner withdraws");
    assert!(store
        .fetch_application(&application.id)
        .expect("fetch")
        .is_none());
}

#[test]
fn list_for_actor_scopes_by_role() {
    let (pipeline, _) = build_pipeline();
    let owner = employer("e-list");
    let other_owner = employer("e-list-other");
    let applicant = candidate("u-list");
    let (_, mine) = seed_application(&pipeline, &owner, &applicant);
    let (_, theirs) = seed_application(&pipeline, &other_owner, &applicant);

    let for_candidate = pipeline
        .applications()
        .list_for_actor(&applicant)
        .expect("candidate list");
    assert_eq!(for_candidate.len(), 2);

    let for_owner = pipeline
        .applications()
        .list_for_actor(&owner)
        .expect("employer list");
    assert_eq!(for_owner.len(), 1);
    assert_eq!(for_owner[0].id, mine.id);
    assert_ne!(for_owner[0].id, theirs.id);

    assert!(matches!(
        pipeline.applications().list_for_actor(&admin()),
        Err(PipelineError::Forbidden(_))
    ));
}

#[test]
fn employer_without_jobs_skips_the_application_query() {
    let store = Arc::new(GuardedStore {
        refuse_application_listing: true,
        ..GuardedStore::default()
    });
    let notifications = Arc::new(InMemoryHiringStore::new());
    let pipeline = HiringPipeline::new(store, notifications, &PipelineConfig::default());

    let listed = pipeline
        .applications()
        .list_for_actor(&employer("e-empty"))
        .expect("empty owned set short-circuits");
    assert!(listed.is_empty());

    seed_job(&pipeline, &employer("e-busy"));
    assert!(matches!(
        pipeline.applications().list_for_actor(&employer("e-busy")),
        Err(PipelineError::Storage { .. })
    ));
}

#[test]
fn notification_outage_never_fails_transitions() {
    let store = Arc::new(InMemoryHiringStore::new());
    let pipeline = HiringPipeline::new(
        store.clone(),
        Arc::new(OfflineNotifications),
        &PipelineConfig::default(),
    );
    let owner = employer("e-outage");
    let applicant = candidate("u-outage");

    let (_, application) = seed_application(&pipeline, &owner, &applicant);
    let updated = pipeline
        .applications()
        .update_status(&owner, &application.id, ApplicationStatus::Shortlisted)
        .expect("status change commits despite notification outage");

    assert_eq!(updated.status, ApplicationStatus::Shortlisted);
    assert_eq!(
        store
            .fetch_application(&application.id)
            .expect("fetch")
            .expect("present")
            .status,
        ApplicationStatus::Shortlisted
    );
    assert!(store
        .notifications_for(applicant.id())
        .expect("primary store untouched")
        .is_empty());
}

#[test]
fn get_is_limited_to_participants() {
    let (pipeline, _) = build_pipeline();
    let owner = employer("e-get");
    let applicant = candidate("u-get");
    let (_, application) = seed_application(&pipeline, &owner, &applicant);

    for actor in [owner.clone(), applicant.clone(), admin()] {
        assert_eq!(
            pipeline
                .applications()
                .get(&actor, &application.id)
                .expect("participant reads")
                .id,
            application.id
        );
    }
    for actor in [candidate("u-nosy"), employer("e-nosy")] {
        assert!(matches!(
            pipeline.applications().get(&actor, &application.id),
            Err(PipelineError::Forbidden(_))
        ));
    }
}

#[test]
fn submission_only_requires_the_job_to_exist() {
    let (pipeline, _) = build_pipeline();
    let job = seed_job(&pipeline, &employer("e-draft"));
    let applicant = candidate("u-early");
    assert_eq!(job.status, JobStatus::Draft);

    assert!(matches!(
        pipeline.jobs().get(&applicant, &job.id),
        Err(PipelineError::NotFound { .. })
    ));
    let application = pipeline
        .applications()
        .submit(&applicant, submission(&job))
        .expect("draft jobs still accept applications");
    assert_eq!(application.job_id, job.id);
}
