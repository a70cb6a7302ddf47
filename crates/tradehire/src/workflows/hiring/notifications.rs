use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::authz::AuthzDecision;
use super::domain::{
    ActorId, Application, ApplicationStatus, Interview, Job, Notification, NotificationId,
    NotificationKind,
};
use super::error::{PipelineError, StorageContext};
use super::hooks::PostCommit;
use super::identity::Actor;
use super::repository::{NotificationRepository, RepositoryError};

/// Notification content prepared by a lifecycle operation before it commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub recipient: ActorId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub metadata: BTreeMap<String, String>,
}

impl NotificationDraft {
    pub fn application_received(job: &Job, application: &Application) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("job_id".to_string(), job.id.to_string());
        metadata.insert("application_id".to_string(), application.id.to_string());
        metadata.insert(
            "applicant_id".to_string(),
            application.applicant_id.to_string(),
        );

        Self {
            recipient: job.employer_id.clone(),
            kind: NotificationKind::ApplicationReceived,
            title: "New application received".to_string(),
            message: format!("A candidate has applied for {}", job.title),
            metadata,
        }
    }

    pub fn status_changed(job: &Job, application: &Application) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("job_id".to_string(), job.id.to_string());
        metadata.insert("application_id".to_string(), application.id.to_string());
        metadata.insert(
            "status".to_string(),
            application.status.label().to_string(),
        );

        Self {
            recipient: application.applicant_id.clone(),
            kind: NotificationKind::ApplicationStatusChanged,
            title: "Application status updated".to_string(),
            message: status_message(application.status, &job.title),
            metadata,
        }
    }

    pub fn interview_scheduled(job: &Job, application: &Application, interview: &Interview) -> Self {
        let when = interview
            .interview_date
            .format("%A, %B %-d, %Y at %-I:%M %p UTC");
        let mut metadata = BTreeMap::new();
        metadata.insert("job_id".to_string(), job.id.to_string());
        metadata.insert("application_id".to_string(), application.id.to_string());
        metadata.insert("interview_id".to_string(), interview.id.to_string());
        metadata.insert(
            "interview_date".to_string(),
            interview.interview_date.to_rfc3339(),
        );
        metadata.insert("type".to_string(), interview.kind.label().to_string());

        Self {
            recipient: application.applicant_id.clone(),
            kind: NotificationKind::InterviewScheduled,
            title: "Interview scheduled".to_string(),
            message: format!(
                "Your {} interview for {} is scheduled for {}",
                interview.kind.label(),
                job.title,
                when
            ),
            metadata,
        }
    }
}

/// Candidate-facing copy for each pipeline stage.
pub fn status_message(status: ApplicationStatus, job_title: &str) -> String {
    match status {
        ApplicationStatus::Pending => {
            format!("Your application for {job_title} is pending review")
        }
        ApplicationStatus::UnderReview => {
            format!("Your application for {job_title} is now under review")
        }
        ApplicationStatus::Shortlisted => {
            format!("Great news! You've been shortlisted for {job_title}")
        }
        ApplicationStatus::InterviewScheduled => {
            format!("An interview has been scheduled for your application to {job_title}")
        }
        ApplicationStatus::Rejected => format!(
            "Thank you for your interest in {job_title}. The employer has decided not to move forward"
        ),
        ApplicationStatus::Withdrawn => {
            format!("Your application for {job_title} has been withdrawn")
        }
    }
}

/// Writes notification records and serves recipient-scoped reads and updates.
pub struct NotificationDispatcher<N> {
    store: Arc<N>,
}

impl<N> Clone for NotificationDispatcher<N> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<N> NotificationDispatcher<N>
where
    N: NotificationRepository + 'static,
{
    pub fn new(store: Arc<N>) -> Self {
        Self { store }
    }

    pub fn emit(&self, draft: NotificationDraft) -> Result<Notification, RepositoryError> {
        persist(self.store.as_ref(), draft)
    }

    /// Queue `draft` on `hooks`; a failed write is logged by the hook runner.
    pub fn schedule(&self, hooks: &mut PostCommit, draft: NotificationDraft) {
        let store = self.store.clone();
        hooks.push(draft.kind.label(), move || {
            persist(store.as_ref(), draft)?;
            Ok(())
        });
    }

    pub fn list(&self, actor: &Actor) -> Result<Vec<Notification>, PipelineError> {
        self.store
            .notifications_for(actor.id())
            .during("list notifications")
    }

    pub fn mark_read(
        &self,
        actor: &Actor,
        id: &NotificationId,
    ) -> Result<Notification, PipelineError> {
        let mut notification = self.owned(actor, id)?;
        if notification.read {
            return Ok(notification);
        }
        notification.read = true;
        self.store
            .update_notification(notification)
            .during("mark notification read")
    }

    pub fn mark_all_read(&self, actor: &Actor) -> Result<usize, PipelineError> {
        let flipped = self
            .store
            .mark_all_read(actor.id())
            .during("mark all notifications read")?;
        info!(user = %actor.id(), flipped, "notifications marked read");
        Ok(flipped)
    }

    pub fn delete(&self, actor: &Actor, id: &NotificationId) -> Result<(), PipelineError> {
        self.owned(actor, id)?;
        self.store
            .delete_notification(id)
            .during("delete notification")
    }

    fn owned(&self, actor: &Actor, id: &NotificationId) -> Result<Notification, PipelineError> {
        let notification = self
            .store
            .fetch_notification(id)
            .during("fetch notification")?
            .ok_or_else(|| PipelineError::not_found("notification", id))?;
        AuthzDecision::owner(actor, "notification", &notification, |n| &n.user_id)
            .into_result()?;
        Ok(notification)
    }
}

fn persist<N>(store: &N, draft: NotificationDraft) -> Result<Notification, RepositoryError>
where
    N: NotificationRepository + ?Sized,
{
    let NotificationDraft {
        recipient,
        kind,
        title,
        message,
        metadata,
    } = draft;

    store.insert_notification(Notification {
        id: NotificationId::generate(),
        user_id: recipient,
        kind,
        title,
        message,
        metadata,
        read: false,
        created_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortlisted_copy_names_the_job() {
        assert_eq!(
            status_message(ApplicationStatus::Shortlisted, "Journeyman Electrician"),
            "Great news! You've been shortlisted for Journeyman Electrician"
        );
    }

    #[test]
    fn every_status_has_distinct_copy() {
        let statuses = [
            ApplicationStatus::Pending,
            ApplicationStatus::UnderReview,
            ApplicationStatus::Shortlisted,
            ApplicationStatus::InterviewScheduled,
            ApplicationStatus::Rejected,
            ApplicationStatus::Withdrawn,
        ];
        let mut messages: Vec<String> = statuses
            .iter()
            .map(|status| status_message(*status, "Pipefitter"))
            .collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), statuses.len());
    }
}
