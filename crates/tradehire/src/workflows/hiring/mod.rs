//! Hiring pipeline engine for the skilled-trades marketplace.
//!
//! Jobs, applications and interviews each move through their own lifecycle. Every operation
//! takes an authenticated [`Actor`], checks role and ownership through [`AuthzDecision`],
//! validates input, writes once, and only then runs its notification side effects as
//! [`PostCommit`] hooks whose failures are logged rather than returned.

pub mod applications;
pub mod authz;
pub mod companies;
pub mod domain;
pub mod error;
pub mod hooks;
pub mod identity;
pub mod interviews;
pub mod jobs;
pub mod memory;
pub mod notifications;
pub mod pipeline;
pub mod repository;
pub mod router;
mod validation;

#[cfg(test)]
mod tests;

pub use applications::ApplicationService;
pub use authz::{AuthzDecision, DenyReason};
pub use companies::CompanyRegistry;
pub use domain::{
    ActorId, Application, ApplicationId, ApplicationStatus, ApplicationSubmission, Company,
    CompanyDraft, CompanyId, EmploymentType, Interview, InterviewId, InterviewRequest,
    InterviewStatus, InterviewType, Job, JobDraft, JobId, JobPatch, JobStatus, Notification,
    NotificationId, NotificationKind, SalaryRange,
};
pub use error::{PipelineError, DUPLICATE_APPLICATION_MESSAGE};
pub use hooks::{PostCommit, PostCommitReport};
pub use identity::{Actor, Role};
pub use interviews::InterviewScheduler;
pub use jobs::JobService;
pub use memory::InMemoryHiringStore;
pub use notifications::{status_message, NotificationDispatcher, NotificationDraft};
pub use pipeline::HiringPipeline;
pub use repository::{
    ApplicationRepository, CompanyRepository, HiringStore, InterviewRepository, JobRepository,
    NotificationRepository, RepositoryError,
};
pub use router::{actor_from_headers, hiring_router, ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
