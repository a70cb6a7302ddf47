use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::workflows::hiring::domain::{
    ActorId, Application, ApplicationId, ApplicationSubmission, Company, CompanyDraft, Interview,
    InterviewId, InterviewRequest, InterviewType, Job, JobDraft, JobId, JobStatus, Notification,
    NotificationId, NotificationKind,
};
use crate::workflows::hiring::identity::Actor;
use crate::workflows::hiring::memory::InMemoryHiringStore;
use crate::workflows::hiring::pipeline::HiringPipeline;
use crate::workflows::hiring::repository::{
    ApplicationRepository, CompanyRepository, HiringStore, InterviewRepository, JobRepository,
    NotificationRepository, RepositoryError,
};

pub(super) type MemoryPipeline = HiringPipeline<InMemoryHiringStore, InMemoryHiringStore>;

pub(super) fn build_pipeline() -> (MemoryPipeline, Arc<InMemoryHiringStore>) {
    let store = Arc::new(InMemoryHiringStore::new());
    let pipeline = HiringPipeline::new(store.clone(), store.clone(), &PipelineConfig::default());
    (pipeline, store)
}

pub(super) fn employer(id: &str) -> Actor {
    Actor::employer(id).expect("valid employer")
}

pub(super) fn candidate(id: &str) -> Actor {
    Actor::candidate(id).expect("valid candidate")
}

pub(super) fn admin() -> Actor {
    Actor::admin("admin-1").expect("valid admin")
}

pub(super) fn company_draft(name: &str) -> CompanyDraft {
    CompanyDraft {
        name: name.to_string(),
        industry: "Electrical contracting".to_string(),
        description: Some("Commercial and residential wiring".to_string()),
        specialties: vec!["Electrical".to_string(), "Solar".to_string()],
        service_areas: vec!["Des Moines".to_string()],
        website: None,
    }
}

pub(super) fn job_draft() -> JobDraft {
    JobDraft {
        title: "Journeyman Electrician".to_string(),
        description: "Service calls and panel upgrades".to_string(),
        location: "Des Moines, IA".to_string(),
        salary_min: 50_000,
        salary_max: 80_000,
        employment_type: "full-time".to_string(),
        trade_specialty: "Electrical".to_string(),
        status: None,
        employer_id: None,
    }
}

pub(super) fn register_company<S, N>(pipeline: &HiringPipeline<S, N>, owner: &Actor) -> Company
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    match pipeline.companies().find_by_owner(owner.id()).expect("lookup") {
        Some(company) => company,
        None => pipeline
            .companies()
            .register(owner, company_draft(&format!("{} Electric", owner.id())))
            .expect("company registers"),
    }
}

pub(super) fn seed_job<S, N>(pipeline: &HiringPipeline<S, N>, owner: &Actor) -> Job
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    register_company(pipeline, owner);
    pipeline
        .jobs()
        .create(owner, job_draft())
        .expect("job is created")
}

pub(super) fn submission(job: &Job) -> ApplicationSubmission {
    ApplicationSubmission {
        job_id: job.id.clone(),
        cover_letter: "Ten years of commercial wiring experience.".to_string(),
        resume_ref: Some("resumes/u1.pdf".to_string()),
        applicant_id: None,
    }
}

pub(super) fn seed_application<S, N>(
    pipeline: &HiringPipeline<S, N>,
    owner: &Actor,
    applicant: &Actor,
) -> (Job, Application)
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let job = seed_job(pipeline, owner);
    let application = pipeline
        .applications()
        .submit(applicant, submission(&job))
        .expect("application submitted");
    (job, application)
}

pub(super) fn interview_request(application: &Application, kind: InterviewType) -> InterviewRequest {
    InterviewRequest {
        application_id: application.id.clone(),
        interview_date: Utc
            .with_ymd_and_hms(2025, 11, 4, 15, 30, 0)
            .single()
            .expect("valid timestamp"),
        kind,
        location: match kind {
            InterviewType::InPerson => Some("1200 Locust St, Des Moines".to_string()),
            _ => None,
        },
        notes: Some("Bring license".to_string()),
    }
}

pub(super) fn notifications_of_kind(
    store: &InMemoryHiringStore,
    user: &ActorId,
    kind: NotificationKind,
) -> Vec<Notification> {
    store
        .notifications_for(user)
        .expect("notifications load")
        .into_iter()
        .filter(|notification| notification.kind == kind)
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Notification store that is always down.
#[derive(Default, Clone)]
pub(super) struct OfflineNotifications;

impl NotificationRepository for OfflineNotifications {
    fn insert_notification(
        &self,
        _notification: Notification,
    ) -> Result<Notification, RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn update_notification(
        &self,
        _notification: Notification,
    ) -> Result<Notification, RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn fetch_notification(
        &self,
        _id: &NotificationId,
    ) -> Result<Option<Notification>, RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn delete_notification(&self, _id: &NotificationId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn notifications_for(&self, _user_id: &ActorId) -> Result<Vec<Notification>, RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn mark_all_read(&self, _user_id: &ActorId) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }
}

/// Delegates to memory but refuses the chosen calls, so tests can prove which queries run
/// and how partial failures are handled.
#[derive(Default, Clone)]
pub(super) struct GuardedStore {
    pub(super) inner: InMemoryHiringStore,
    pub(super) refuse_application_listing: bool,
    pub(super) refuse_application_updates: bool,
}

fn refused() -> RepositoryError {
    RepositoryError::Unavailable("query refused by test".to_string())
}

impl CompanyRepository for GuardedStore {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        self.inner.insert_company(company)
    }

    fn company_by_owner(&self, owner: &ActorId) -> Result<Option<Company>, RepositoryError> {
        self.inner.company_by_owner(owner)
    }
}

impl JobRepository for GuardedStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        self.inner.insert_job(job)
    }

    fn update_job(&self, job: Job) -> Result<Job, RepositoryError> {
        self.inner.update_job(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        self.inner.fetch_job(id)
    }

    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError> {
        self.inner.delete_job(id)
    }

    fn jobs_by_employer(&self, employer: &ActorId) -> Result<Vec<Job>, RepositoryError> {
        self.inner.jobs_by_employer(employer)
    }

    fn jobs_with_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        self.inner.jobs_with_status(status)
    }
}

impl ApplicationRepository for GuardedStore {
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        self.inner.insert_application(application)
    }

    fn update_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        if self.refuse_application_updates {
            return Err(refused());
        }
        self.inner.update_application(application)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch_application(id)
    }

    fn find_application(
        &self,
        job_id: &JobId,
        applicant_id: &ActorId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.find_application(job_id, applicant_id)
    }

    fn delete_application(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        self.inner.delete_application(id)
    }

    fn applications_by_applicant(
        &self,
        applicant_id: &ActorId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_by_applicant(applicant_id)
    }

    fn applications_for_jobs(
        &self,
        job_ids: &[JobId],
    ) -> Result<Vec<Application>, RepositoryError> {
        if self.refuse_application_listing {
            return Err(refused());
        }
        self.inner.applications_for_jobs(job_ids)
    }
}

impl InterviewRepository for GuardedStore {
    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        self.inner.insert_interview(interview)
    }

    fn update_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        self.inner.update_interview(interview)
    }

    fn fetch_interview(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError> {
        self.inner.fetch_interview(id)
    }

    fn delete_interview(&self, id: &InterviewId) -> Result<(), RepositoryError> {
        self.inner.delete_interview(id)
    }

    fn interviews_by_employer(
        &self,
        employer: &ActorId,
    ) -> Result<Vec<Interview>, RepositoryError> {
        self.inner.interviews_by_employer(employer)
    }

    fn interviews_by_applicant(
        &self,
        applicant_id: &ActorId,
    ) -> Result<Vec<Interview>, RepositoryError> {
        self.inner.interviews_by_applicant(applicant_id)
    }
}
