use std::sync::Arc;

use super::applications::ApplicationService;
use super::companies::CompanyRegistry;
use super::interviews::InterviewScheduler;
use super::jobs::JobService;
use super::notifications::NotificationDispatcher;
use super::repository::{HiringStore, NotificationRepository};
use crate::config::PipelineConfig;

/// Lifecycle managers wired over one primary store and one notification store.
pub struct HiringPipeline<S, N> {
    companies: CompanyRegistry<S>,
    jobs: JobService<S>,
    applications: ApplicationService<S, N>,
    interviews: InterviewScheduler<S, N>,
    notifications: NotificationDispatcher<N>,
}

impl<S, N> HiringPipeline<S, N>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    pub fn new(store: Arc<S>, notification_store: Arc<N>, config: &PipelineConfig) -> Self {
        let notifications = NotificationDispatcher::new(notification_store);
        let applications = ApplicationService::new(store.clone(), notifications.clone());
        let interviews =
            InterviewScheduler::new(store.clone(), applications.clone(), notifications.clone());

        Self {
            companies: CompanyRegistry::new(store.clone()),
            jobs: JobService::new(store, config.default_job_status),
            applications,
            interviews,
            notifications,
        }
    }

    pub fn companies(&self) -> &CompanyRegistry<S> {
        &self.companies
    }

    pub fn jobs(&self) -> &JobService<S> {
        &self.jobs
    }

    pub fn applications(&self) -> &ApplicationService<S, N> {
        &self.applications
    }

    pub fn interviews(&self) -> &InterviewScheduler<S, N> {
        &self.interviews
    }

    pub fn notifications(&self) -> &NotificationDispatcher<N> {
        &self.notifications
    }
}
