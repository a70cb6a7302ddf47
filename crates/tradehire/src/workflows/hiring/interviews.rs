use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::applications::ApplicationService;
use super::authz::AuthzDecision;
use super::domain::{Interview, InterviewId, InterviewRequest, InterviewStatus};
use super::error::{PipelineError, StorageContext};
use super::hooks::PostCommit;
use super::identity::{Actor, Role};
use super::notifications::{NotificationDispatcher, NotificationDraft};
use super::repository::{
    ApplicationRepository, InterviewRepository, JobRepository, NotificationRepository,
};
use super::validation::interview_location;

/// Interviews booked by the employer who owns the application's job.
pub struct InterviewScheduler<S, N> {
    store: Arc<S>,
    applications: ApplicationService<S, N>,
    notifications: NotificationDispatcher<N>,
}

impl<S, N> InterviewScheduler<S, N>
where
    S: JobRepository + ApplicationRepository + InterviewRepository + 'static,
    N: NotificationRepository + 'static,
{
    pub fn new(
        store: Arc<S>,
        applications: ApplicationService<S, N>,
        notifications: NotificationDispatcher<N>,
    ) -> Self {
        Self {
            store,
            applications,
            notifications,
        }
    }

    /// Book an interview and move the application to `underReview`.
    ///
    /// The application always lands on `underReview`, whatever stage it was in.
    pub fn schedule(
        &self,
        actor: &Actor,
        request: InterviewRequest,
    ) -> Result<Interview, PipelineError> {
        let (application, job) = self
            .applications
            .load_for_employer(actor, &request.application_id)?;
        let location = interview_location(request.kind, request.location)?;

        let interview = Interview {
            id: InterviewId::generate(),
            application_id: application.id.clone(),
            employer_id: job.employer_id.clone(),
            applicant_id: application.applicant_id.clone(),
            interview_date: request.interview_date,
            kind: request.kind,
            status: InterviewStatus::Scheduled,
            location,
            notes: request
                .notes
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            created_at: Utc::now(),
        };
        let stored = self
            .store
            .insert_interview(interview)
            .during("schedule interview")?;

        let application = match self.applications.advance_for_interview(application) {
            Ok(application) => application,
            Err(err) => {
                if let Err(cleanup) = self.store.delete_interview(&stored.id) {
                    warn!(interview = %stored.id, error = %cleanup, "failed to roll back interview");
                }
                return Err(err);
            }
        };
        info!(
            interview = %stored.id,
            application = %application.id,
            date = %stored.interview_date,
            "interview scheduled"
        );

        let mut hooks = PostCommit::new("schedule interview");
        self.notifications.schedule(
            &mut hooks,
            NotificationDraft::interview_scheduled(&job, &application, &stored),
        );
        hooks.run();

        Ok(stored)
    }

    /// Plain persistence; interview statuses follow no transition graph.
    pub fn update_status(
        &self,
        actor: &Actor,
        id: &InterviewId,
        status: InterviewStatus,
    ) -> Result<Interview, PipelineError> {
        let mut interview = self.owned(actor, id)?;
        interview.status = status;
        let stored = self
            .store
            .update_interview(interview)
            .during("update interview status")?;
        info!(interview = %stored.id, status = ?stored.status, "interview status updated");
        Ok(stored)
    }

    pub fn reschedule(
        &self,
        actor: &Actor,
        id: &InterviewId,
        interview_date: DateTime<Utc>,
    ) -> Result<Interview, PipelineError> {
        let mut interview = self.owned(actor, id)?;
        interview.interview_date = interview_date;
        interview.status = InterviewStatus::Rescheduled;
        let stored = self
            .store
            .update_interview(interview)
            .during("reschedule interview")?;
        info!(interview = %stored.id, date = %stored.interview_date, "interview rescheduled");
        Ok(stored)
    }

    pub fn cancel(&self, actor: &Actor, id: &InterviewId) -> Result<Interview, PipelineError> {
        self.update_status(actor, id, InterviewStatus::Cancelled)
    }

    /// Removes the interview without touching the application's status.
    pub fn delete(&self, actor: &Actor, id: &InterviewId) -> Result<(), PipelineError> {
        self.owned(actor, id)?;
        self.store.delete_interview(id).during("delete interview")?;
        info!(interview = %id, "interview deleted");
        Ok(())
    }

    /// Candidates see interviews booked for them; employers see the ones they booked.
    ///
    /// Both listings survive a withdrawn application or a deleted job.
    pub fn list_for_actor(&self, actor: &Actor) -> Result<Vec<Interview>, PipelineError> {
        match actor.role() {
            Role::Candidate => self
                .store
                .interviews_by_applicant(actor.id())
                .during("list candidate interviews"),
            Role::Employer => self
                .store
                .interviews_by_employer(actor.id())
                .during("list employer interviews"),
            Role::Admin => Err(PipelineError::Forbidden(
                "interviews are listed per candidate or employer".to_string(),
            )),
        }
    }

    /// Checked against the employer captured at booking, not the live application and job.
    fn owned(&self, actor: &Actor, id: &InterviewId) -> Result<Interview, PipelineError> {
        AuthzDecision::require_role(actor, Role::Employer).into_result()?;
        let interview = self
            .store
            .fetch_interview(id)
            .during("fetch interview")?
            .ok_or_else(|| PipelineError::not_found("interview", id))?;
        AuthzDecision::owner(actor, "interview", &interview, |interview| {
            &interview.employer_id
        })
        .into_result()?;
        Ok(interview)
    }
}
