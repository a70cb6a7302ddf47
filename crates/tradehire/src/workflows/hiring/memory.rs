use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    ActorId, Application, ApplicationId, Company, CompanyId, Interview, InterviewId, Job, JobId,
    JobStatus, Notification, NotificationId,
};
use super::repository::{
    ApplicationRepository, CompanyRepository, InterviewRepository, JobRepository,
    NotificationRepository, RepositoryError,
};

#[derive(Debug, Default)]
struct Tables {
    companies: BTreeMap<CompanyId, Company>,
    company_owners: HashMap<ActorId, CompanyId>,
    jobs: BTreeMap<JobId, Job>,
    applications: BTreeMap<ApplicationId, Application>,
    application_pairs: HashMap<(JobId, ActorId), ApplicationId>,
    interviews: BTreeMap<InterviewId, Interview>,
    notifications: BTreeMap<NotificationId, Notification>,
}

/// Process-local storage backend.
///
/// A single mutex guards every table, so each repository call is one atomic unit and the
/// unique indexes are checked and written inside the same critical section. Clones share
/// the same tables.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHiringStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryHiringStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

/// Orders rows by their generated id. Shorter ids sort first so `job-1000000` follows
/// `job-999999`, keeping creation order once the zero padding runs out.
fn in_sequence<T>(mut rows: Vec<T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    rows.sort_by(|left, right| {
        let (left, right) = (id(left), id(right));
        left.len().cmp(&right.len()).then_with(|| left.cmp(right))
    });
    rows
}

impl CompanyRepository for InMemoryHiringStore {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.company_owners.contains_key(&company.owner_id)
            || tables.companies.contains_key(&company.id)
        {
            return Err(RepositoryError::Conflict);
        }
        tables
            .company_owners
            .insert(company.owner_id.clone(), company.id.clone());
        tables.companies.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn company_by_owner(&self, owner: &ActorId) -> Result<Option<Company>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .company_owners
            .get(owner)
            .and_then(|id| tables.companies.get(id))
            .cloned())
    }
}

impl JobRepository for InMemoryHiringStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut tables = self.lock()?;
        match tables.jobs.get_mut(&job.id) {
            Some(slot) => {
                *slot = job.clone();
                Ok(job)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.lock()?.jobs.get(id).cloned())
    }

    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError> {
        // Applications referencing the job are left in place.
        self.lock()?
            .jobs
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn jobs_by_employer(&self, employer: &ActorId) -> Result<Vec<Job>, RepositoryError> {
        Ok(in_sequence(
            self.lock()?
                .jobs
                .values()
                .filter(|job| &job.employer_id == employer)
                .cloned()
                .collect(),
            |job| job.id.0.as_str(),
        ))
    }

    fn jobs_with_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        Ok(in_sequence(
            self.lock()?
                .jobs
                .values()
                .filter(|job| job.status == status)
                .cloned()
                .collect(),
            |job| job.id.0.as_str(),
        ))
    }
}

impl ApplicationRepository for InMemoryHiringStore {
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut tables = self.lock()?;
        let pair = (
            application.job_id.clone(),
            application.applicant_id.clone(),
        );
        if tables.application_pairs.contains_key(&pair)
            || tables.applications.contains_key(&application.id)
        {
            return Err(RepositoryError::Conflict);
        }
        tables
            .application_pairs
            .insert(pair, application.id.clone());
        tables
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut tables = self.lock()?;
        let current = tables
            .applications
            .get(&application.id)
            .ok_or(RepositoryError::NotFound)?;
        if current.job_id != application.job_id || current.applicant_id != application.applicant_id
        {
            // The unique pair is immutable once written.
            return Err(RepositoryError::Conflict);
        }
        tables
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self.lock()?.applications.get(id).cloned())
    }

    fn find_application(
        &self,
        job_id: &JobId,
        applicant_id: &ActorId,
    ) -> Result<Option<Application>, RepositoryError> {
        let tables = self.lock()?;
        let key = (job_id.clone(), applicant_id.clone());
        Ok(tables
            .application_pairs
            .get(&key)
            .and_then(|id| tables.applications.get(id))
            .cloned())
    }

    fn delete_application(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        let removed = tables
            .applications
            .remove(id)
            .ok_or(RepositoryError::NotFound)?;
        tables
            .application_pairs
            .remove(&(removed.job_id, removed.applicant_id));
        Ok(())
    }

    fn applications_by_applicant(
        &self,
        applicant_id: &ActorId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(in_sequence(
            self.lock()?
                .applications
                .values()
                .filter(|application| &application.applicant_id == applicant_id)
                .cloned()
                .collect(),
            |application| application.id.0.as_str(),
        ))
    }

    fn applications_for_jobs(
        &self,
        job_ids: &[JobId],
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(in_sequence(
            self.lock()?
                .applications
                .values()
                .filter(|application| job_ids.contains(&application.job_id))
                .cloned()
                .collect(),
            |application| application.id.0.as_str(),
        ))
    }
}

impl InterviewRepository for InMemoryHiringStore {
    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.interviews.contains_key(&interview.id) {
            return Err(RepositoryError::Conflict);
        }
        if !tables.applications.contains_key(&interview.application_id) {
            return Err(RepositoryError::NotFound);
        }
        tables
            .interviews
            .insert(interview.id.clone(), interview.clone());
        Ok(interview)
    }

    fn update_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut tables = self.lock()?;
        match tables.interviews.get_mut(&interview.id) {
            Some(slot) => {
                *slot = interview.clone();
                Ok(interview)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_interview(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError> {
        Ok(self.lock()?.interviews.get(id).cloned())
    }

    fn delete_interview(&self, id: &InterviewId) -> Result<(), RepositoryError> {
        self.lock()?
            .interviews
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn interviews_by_employer(
        &self,
        employer: &ActorId,
    ) -> Result<Vec<Interview>, RepositoryError> {
        Ok(in_sequence(
            self.lock()?
                .interviews
                .values()
                .filter(|interview| &interview.employer_id == employer)
                .cloned()
                .collect(),
            |interview| interview.id.0.as_str(),
        ))
    }

    fn interviews_by_applicant(
        &self,
        applicant_id: &ActorId,
    ) -> Result<Vec<Interview>, RepositoryError> {
        Ok(in_sequence(
            self.lock()?
                .interviews
                .values()
                .filter(|interview| &interview.applicant_id == applicant_id)
                .cloned()
                .collect(),
            |interview| interview.id.0.as_str(),
        ))
    }
}

impl NotificationRepository for InMemoryHiringStore {
    fn insert_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.notifications.contains_key(&notification.id) {
            return Err(RepositoryError::Conflict);
        }
        tables
            .notifications
            .insert(notification.id.clone(), notification.clone());
        Ok(notification)
    }

    fn update_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, RepositoryError> {
        let mut tables = self.lock()?;
        match tables.notifications.get_mut(&notification.id) {
            Some(slot) => {
                *slot = notification.clone();
                Ok(notification)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_notification(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, RepositoryError> {
        Ok(self.lock()?.notifications.get(id).cloned())
    }

    fn delete_notification(&self, id: &NotificationId) -> Result<(), RepositoryError> {
        self.lock()?
            .notifications
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn notifications_for(&self, user_id: &ActorId) -> Result<Vec<Notification>, RepositoryError> {
        Ok(in_sequence(
            self.lock()?
                .notifications
                .values()
                .filter(|notification| &notification.user_id == user_id)
                .cloned()
                .collect(),
            |notification| notification.id.0.as_str(),
        ))
    }

    fn mark_all_read(&self, user_id: &ActorId) -> Result<usize, RepositoryError> {
        let mut tables = self.lock()?;
        let mut flipped = 0;
        for notification in tables
            .notifications
            .values_mut()
            .filter(|notification| &notification.user_id == user_id && !notification.read)
        {
            notification.read = true;
            flipped += 1;
        }
        Ok(flipped)
    }
}
