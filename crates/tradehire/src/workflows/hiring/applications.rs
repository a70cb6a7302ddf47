use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::authz::{AuthzDecision, DenyReason};
use super::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, Job, JobId,
};
use super::error::{PipelineError, StorageContext};
use super::hooks::PostCommit;
use super::identity::{Actor, Role};
use super::notifications::{NotificationDispatcher, NotificationDraft};
use super::repository::{
    ApplicationRepository, JobRepository, NotificationRepository, RepositoryError,
};

/// Candidate applications and the employer-driven status pipeline.
pub struct ApplicationService<S, N> {
    store: Arc<S>,
    notifications: NotificationDispatcher<N>,
}

impl<S, N> Clone for ApplicationService<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            notifications: self.notifications.clone(),
        }
    }
}

impl<S, N> ApplicationService<S, N>
where
    S: JobRepository + ApplicationRepository + 'static,
    N: NotificationRepository + 'static,
{
    pub fn new(store: Arc<S>, notifications: NotificationDispatcher<N>) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Submit on behalf of the authenticated candidate.
    ///
    /// The `(job_id, applicant_id)` lookup only fails fast; the storage unique index is what
    /// actually guarantees a single application, and a conflict there reports the same
    /// [`PipelineError::DuplicateApplication`].
    pub fn submit(
        &self,
        actor: &Actor,
        submission: ApplicationSubmission,
    ) -> Result<Application, PipelineError> {
        AuthzDecision::require_role(actor, Role::Candidate).into_result()?;

        if let Some(asserted) = submission
            .applicant_id
            .as_ref()
            .filter(|id| *id != actor.id())
        {
            debug!(%asserted, actor = %actor.id(), "ignoring client-asserted applicant_id");
        }

        let job = self
            .store
            .fetch_job(&submission.job_id)
            .during("fetch job")?
            .ok_or_else(|| PipelineError::not_found("job", &submission.job_id))?;

        if self
            .store
            .find_application(&job.id, actor.id())
            .during("check existing application")?
            .is_some()
        {
            return Err(PipelineError::DuplicateApplication);
        }

        let application = Application {
            id: ApplicationId::generate(),
            job_id: job.id.clone(),
            applicant_id: actor.id().clone(),
            status: ApplicationStatus::Pending,
            cover_letter: submission.cover_letter.trim().to_string(),
            resume_ref: submission
                .resume_ref
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            submitted_at: Utc::now(),
        };

        let stored = match self.store.insert_application(application) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(PipelineError::DuplicateApplication),
            Err(source) => {
                return Err(PipelineError::Storage {
                    operation: "submit application",
                    source,
                })
            }
        };
        info!(application = %stored.id, job = %stored.job_id, applicant = %stored.applicant_id, "application submitted");

        let mut hooks = PostCommit::new("submit application");
        self.notifications
            .schedule(&mut hooks, NotificationDraft::application_received(&job, &stored));
        hooks.run();

        Ok(stored)
    }

    /// Visible to the applicant, the employer owning the job, and administrators.
    pub fn get(&self, actor: &Actor, id: &ApplicationId) -> Result<Application, PipelineError> {
        let application = self.fetch(id)?;
        if actor.role() == Role::Admin || &application.applicant_id == actor.id() {
            return Ok(application);
        }

        let job = self
            .store
            .fetch_job(&application.job_id)
            .during("fetch job")?;
        let decision = AuthzDecision::require_role(actor, Role::Employer).and_then(|| match &job {
            Some(job) => AuthzDecision::owner(actor, "application", job, |job| &job.employer_id),
            None => AuthzDecision::Deny(DenyReason::NotOwner { entity: "job" }),
        });
        decision.into_result()?;
        Ok(application)
    }

    pub fn update_status(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, PipelineError> {
        let (mut application, job) = self.load_for_employer(actor, id)?;
        let previous = application.status;
        application.status = status;

        let stored = self
            .store
            .update_application(application)
            .during("update application status")?;
        info!(
            application = %stored.id,
            from = previous.label(),
            to = stored.status.label(),
            "application status changed"
        );

        let mut hooks = PostCommit::new("update application status");
        self.notifications
            .schedule(&mut hooks, NotificationDraft::status_changed(&job, &stored));
        hooks.run();

        Ok(stored)
    }

    /// Hard delete by the owning candidate.
    pub fn withdraw(&self, actor: &Actor, id: &ApplicationId) -> Result<(), PipelineError> {
        AuthzDecision::require_role(actor, Role::Candidate).into_result()?;
        let application = self.fetch(id)?;
        AuthzDecision::owner(actor, "application", &application, |application| {
            &application.applicant_id
        })
        .into_result()?;

        self.store
            .delete_application(id)
            .during("withdraw application")?;
        info!(application = %id, "application withdrawn");
        Ok(())
    }

    /// Candidates see their own applications; employers see those on jobs they own.
    ///
    /// Applications whose job has since been deleted are still returned.
    pub fn list_for_actor(&self, actor: &Actor) -> Result<Vec<Application>, PipelineError> {
        match actor.role() {
            Role::Candidate => self
                .store
                .applications_by_applicant(actor.id())
                .during("list candidate applications"),
            Role::Employer => {
                let job_ids = self.owned_job_ids(actor)?;
                if job_ids.is_empty() {
                    return Ok(Vec::new());
                }
                self.store
                    .applications_for_jobs(&job_ids)
                    .during("list employer applications")
            }
            Role::Admin => Err(PipelineError::Forbidden(
                "applications are listed per candidate or employer".to_string(),
            )),
        }
    }

    /// Joins application to job and checks the caller is the employer who owns it.
    pub(crate) fn load_for_employer(
        &self,
        actor: &Actor,
        id: &ApplicationId,
    ) -> Result<(Application, Job), PipelineError> {
        AuthzDecision::require_role(actor, Role::Employer).into_result()?;
        let application = self.fetch(id)?;
        let job = self
            .store
            .fetch_job(&application.job_id)
            .during("fetch job")?
            .ok_or_else(|| PipelineError::not_found("job", &application.job_id))?;
        AuthzDecision::owner(actor, "job", &job, |job| &job.employer_id).into_result()?;
        Ok((application, job))
    }

    /// System-driven move to `underReview` when an interview is booked.
    ///
    /// The interview notification already informs the candidate, so no status-change
    /// notification is queued here.
    pub(crate) fn advance_for_interview(
        &self,
        mut application: Application,
    ) -> Result<Application, PipelineError> {
        let previous = application.status;
        application.status = ApplicationStatus::UnderReview;
        let stored = self
            .store
            .update_application(application)
            .during("advance application for interview")?;
        info!(
            application = %stored.id,
            from = previous.label(),
            to = stored.status.label(),
            "application advanced by interview scheduling"
        );
        Ok(stored)
    }

    pub(crate) fn owned_job_ids(&self, actor: &Actor) -> Result<Vec<JobId>, PipelineError> {
        Ok(self
            .store
            .jobs_by_employer(actor.id())
            .during("list employer jobs")?
            .into_iter()
            .map(|job| job.id)
            .collect())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Application, PipelineError> {
        self.store
            .fetch_application(id)
            .during("fetch application")?
            .ok_or_else(|| PipelineError::not_found("application", id))
    }
}
