use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::authz::AuthzDecision;
use super::companies::CompanyRegistry;
use super::domain::{Job, JobDraft, JobId, JobPatch, JobStatus};
use super::error::{PipelineError, StorageContext};
use super::identity::{Actor, Role};
use super::repository::{CompanyRepository, JobRepository};
use super::validation::{employment_type, required, salary_range};

/// Job posting lifecycle: draft, pending approval, then admin-controlled open/closed/flagged.
pub struct JobService<S> {
    store: Arc<S>,
    companies: CompanyRegistry<S>,
    default_status: JobStatus,
}

impl<S> Clone for JobService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            companies: self.companies.clone(),
            default_status: self.default_status,
        }
    }
}

impl<S> JobService<S>
where
    S: CompanyRepository + JobRepository + 'static,
{
    /// `default_status` applies when a draft does not request one; it must be employer-settable.
    pub fn new(store: Arc<S>, default_status: JobStatus) -> Self {
        let default_status = if default_status.employer_settable() {
            default_status
        } else {
            JobStatus::Draft
        };
        Self {
            companies: CompanyRegistry::new(store.clone()),
            store,
            default_status,
        }
    }

    pub fn create(&self, actor: &Actor, draft: JobDraft) -> Result<Job, PipelineError> {
        AuthzDecision::require_role(actor, Role::Employer).into_result()?;

        let company = self.companies.find_by_owner(actor.id())?.ok_or_else(|| {
            PipelineError::PreconditionFailed("company profile required".to_string())
        })?;

        if let Some(asserted) = draft.employer_id.as_ref().filter(|id| *id != actor.id()) {
            debug!(%asserted, actor = %actor.id(), "ignoring client-asserted employer_id");
        }

        let status = match draft.status {
            Some(status) if status.employer_settable() => status,
            Some(status) => {
                return Err(PipelineError::Validation(format!(
                    "new jobs may not be created as {}",
                    status.label()
                )))
            }
            None => self.default_status,
        };

        let job = Job {
            id: JobId::generate(),
            title: required(&draft.title, "title")?,
            description: draft.description.trim().to_string(),
            location: required(&draft.location, "location")?,
            salary: salary_range(draft.salary_min, draft.salary_max)?,
            employment_type: employment_type(&draft.employment_type)?,
            trade_specialty: required(&draft.trade_specialty, "trade specialty")?,
            company_id: company.id,
            employer_id: actor.id().clone(),
            status,
            posted_at: Utc::now(),
        };

        let stored = self.store.insert_job(job).during("create job")?;
        info!(job = %stored.id, employer = %stored.employer_id, status = stored.status.label(), "job created");
        Ok(stored)
    }

    /// Visible to anyone once open; otherwise only to its owner and administrators.
    pub fn get(&self, actor: &Actor, id: &JobId) -> Result<Job, PipelineError> {
        let job = self
            .store
            .fetch_job(id)
            .during("fetch job")?
            .ok_or_else(|| PipelineError::not_found("job", id))?;

        let visible = job.status == JobStatus::Open
            || actor.role() == Role::Admin
            || AuthzDecision::owner(actor, "job", &job, |job| &job.employer_id).is_allowed();
        if visible {
            Ok(job)
        } else {
            Err(PipelineError::not_found("job", id))
        }
    }

    pub fn update(&self, actor: &Actor, id: &JobId, patch: JobPatch) -> Result<Job, PipelineError> {
        let mut job = self.owned(actor, id)?;

        if let Some(status) = patch.status {
            if !status.employer_settable() {
                return Err(PipelineError::Forbidden(format!(
                    "only administrators may move a job to {}",
                    status.label()
                )));
            }
            job.status = status;
        }
        if let Some(title) = patch.title {
            job.title = required(&title, "title")?;
        }
        if let Some(description) = patch.description {
            job.description = description.trim().to_string();
        }
        if let Some(location) = patch.location {
            job.location = required(&location, "location")?;
        }
        if let Some(trade_specialty) = patch.trade_specialty {
            job.trade_specialty = required(&trade_specialty, "trade specialty")?;
        }
        if let Some(raw) = patch.employment_type {
            job.employment_type = employment_type(&raw)?;
        }
        job.salary = salary_range(
            patch.salary_min.unwrap_or(job.salary.min),
            patch.salary_max.unwrap_or(job.salary.max),
        )?;

        let stored = self.store.update_job(job).during("update job")?;
        info!(job = %stored.id, "job updated");
        Ok(stored)
    }

    /// Hard delete. Applications that reference the job are not removed.
    pub fn delete(&self, actor: &Actor, id: &JobId) -> Result<(), PipelineError> {
        self.owned(actor, id)?;
        self.store.delete_job(id).during("delete job")?;
        info!(job = %id, "job deleted");
        Ok(())
    }

    pub fn admin_transition(
        &self,
        actor: &Actor,
        id: &JobId,
        status: JobStatus,
    ) -> Result<Job, PipelineError> {
        AuthzDecision::require_role(actor, Role::Admin).into_result()?;
        if !status.admin_settable() {
            return Err(PipelineError::Validation(format!(
                "administrators may only open, close or flag jobs, not set {}",
                status.label()
            )));
        }

        let mut job = self
            .store
            .fetch_job(id)
            .during("fetch job")?
            .ok_or_else(|| PipelineError::not_found("job", id))?;
        let previous = job.status;
        job.status = status;

        let stored = self.store.update_job(job).during("transition job")?;
        info!(
            job = %stored.id,
            from = previous.label(),
            to = stored.status.label(),
            admin = %actor.id(),
            "job status changed by admin"
        );
        Ok(stored)
    }

    pub fn list_open(&self) -> Result<Vec<Job>, PipelineError> {
        self.store
            .jobs_with_status(JobStatus::Open)
            .during("list open jobs")
    }

    pub fn list_mine(&self, actor: &Actor) -> Result<Vec<Job>, PipelineError> {
        AuthzDecision::require_role(actor, Role::Employer).into_result()?;
        self.store
            .jobs_by_employer(actor.id())
            .during("list employer jobs")
    }

    pub fn list_awaiting_review(&self, actor: &Actor) -> Result<Vec<Job>, PipelineError> {
        AuthzDecision::require_role(actor, Role::Admin).into_result()?;
        self.store
            .jobs_with_status(JobStatus::PendingApproval)
            .during("list jobs awaiting review")
    }

    /// Missing and not-owned are reported identically so job ownership never leaks.
    fn owned(&self, actor: &Actor, id: &JobId) -> Result<Job, PipelineError> {
        let job = self.store.fetch_job(id).during("fetch job")?;
        match job {
            Some(job)
                if AuthzDecision::owner(actor, "job", &job, |job| &job.employer_id)
                    .is_allowed() =>
            {
                Ok(job)
            }
            _ => Err(PipelineError::not_found("job", id)),
        }
    }
}
