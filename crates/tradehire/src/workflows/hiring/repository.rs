//! Storage seams for the hiring pipeline.
//!
//! Each table gets its own trait so services only bound on what they touch. Implementations
//! must make every call atomic and must enforce the two unique indexes at the storage layer:
//! one company per owner, and one application per `(job_id, applicant_id)`. A violated index
//! is reported as [`RepositoryError::Conflict`].

use super::domain::{
    ActorId, Application, ApplicationId, Company, Interview, InterviewId, Job, JobId, JobStatus,
    Notification, NotificationId,
};

pub trait CompanyRepository: Send + Sync {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError>;
    fn company_by_owner(&self, owner: &ActorId) -> Result<Option<Company>, RepositoryError>;
}

pub trait JobRepository: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError>;
    fn jobs_by_employer(&self, employer: &ActorId) -> Result<Vec<Job>, RepositoryError>;
    fn jobs_with_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError>;
}

pub trait ApplicationRepository: Send + Sync {
    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn update_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, RepositoryError>;
    fn find_application(
        &self,
        job_id: &JobId,
        applicant_id: &ActorId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn delete_application(&self, id: &ApplicationId) -> Result<(), RepositoryError>;
    fn applications_by_applicant(
        &self,
        applicant_id: &ActorId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn applications_for_jobs(&self, job_ids: &[JobId])
        -> Result<Vec<Application>, RepositoryError>;
}

pub trait InterviewRepository: Send + Sync {
    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    fn update_interview(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    fn fetch_interview(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError>;
    fn delete_interview(&self, id: &InterviewId) -> Result<(), RepositoryError>;
    fn interviews_by_employer(&self, employer: &ActorId)
        -> Result<Vec<Interview>, RepositoryError>;
    fn interviews_by_applicant(
        &self,
        applicant_id: &ActorId,
    ) -> Result<Vec<Interview>, RepositoryError>;
}

pub trait NotificationRepository: Send + Sync {
    fn insert_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, RepositoryError>;
    fn update_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, RepositoryError>;
    fn fetch_notification(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, RepositoryError>;
    fn delete_notification(&self, id: &NotificationId) -> Result<(), RepositoryError>;
    fn notifications_for(&self, user_id: &ActorId) -> Result<Vec<Notification>, RepositoryError>;
    /// Flips every unread notification of `user_id`, returning how many changed.
    fn mark_all_read(&self, user_id: &ActorId) -> Result<usize, RepositoryError>;
}

/// Everything the lifecycle managers need from primary storage.
pub trait HiringStore:
    CompanyRepository + JobRepository + ApplicationRepository + InterviewRepository
{
}

impl<T> HiringStore for T where
    T: CompanyRepository + JobRepository + ApplicationRepository + InterviewRepository
{
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
