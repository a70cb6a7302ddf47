use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static COMPANY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static INTERVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn sequence_id(sequence: &AtomicU64, prefix: &str) -> String {
    let id = sequence.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Opaque identifier supplied by the identity context.
    ActorId
);
string_id!(CompanyId);
string_id!(JobId);
string_id!(
    /// Identifier wrapper for submitted applications.
    ApplicationId
);
string_id!(InterviewId);
string_id!(NotificationId);

impl CompanyId {
    pub(crate) fn generate() -> Self {
        Self(sequence_id(&COMPANY_SEQUENCE, "company"))
    }
}

impl JobId {
    pub(crate) fn generate() -> Self {
        Self(sequence_id(&JOB_SEQUENCE, "job"))
    }
}

impl ApplicationId {
    pub(crate) fn generate() -> Self {
        Self(sequence_id(&APPLICATION_SEQUENCE, "app"))
    }
}

impl InterviewId {
    pub(crate) fn generate() -> Self {
        Self(sequence_id(&INTERVIEW_SEQUENCE, "interview"))
    }
}

impl NotificationId {
    pub(crate) fn generate() -> Self {
        Self(sequence_id(&NOTIFICATION_SEQUENCE, "notification"))
    }
}

/// Employer business profile. Exactly one per owning employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub owner_id: ActorId,
    pub name: String,
    pub industry: String,
    pub description: Option<String>,
    pub specialties: Vec<String>,
    pub service_areas: Vec<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw company profile input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDraft {
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub service_areas: Vec<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Posting lifecycle. `PendingApproval` waits on an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    #[serde(alias = "pending")]
    PendingApproval,
    Open,
    Closed,
    Flagged,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::PendingApproval => "pending_approval",
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
            JobStatus::Flagged => "flagged",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "draft" => Some(Self::Draft),
            "pending" | "pending_approval" => Some(Self::PendingApproval),
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "flagged" => Some(Self::Flagged),
            _ => None,
        }
    }

    /// Statuses an employer may place their own posting in.
    pub const fn employer_settable(self) -> bool {
        matches!(self, JobStatus::Draft | JobStatus::PendingApproval)
    }

    /// Statuses reserved for administrative review.
    pub const fn admin_settable(self) -> bool {
        matches!(self, JobStatus::Open | JobStatus::Closed | JobStatus::Flagged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Apprenticeship,
}

impl EmploymentType {
    pub const ALLOWED: [EmploymentType; 5] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Contract,
        EmploymentType::Temporary,
        EmploymentType::Apprenticeship,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Contract => "contract",
            EmploymentType::Temporary => "temporary",
            EmploymentType::Apprenticeship => "apprenticeship",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALLOWED
            .into_iter()
            .find(|kind| kind.label() == normalized)
    }
}

/// Advertised pay band, whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: SalaryRange,
    pub employment_type: EmploymentType,
    pub trade_specialty: String,
    pub company_id: CompanyId,
    pub employer_id: ActorId,
    pub status: JobStatus,
    pub posted_at: DateTime<Utc>,
}

/// Raw posting input as supplied by an employer form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub employment_type: String,
    pub trade_specialty: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    /// Client-asserted owner. Never trusted; the posting actor always owns the job.
    #[serde(default)]
    pub employer_id: Option<ActorId>,
}

/// Partial update applied by the owning employer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub trade_specialty: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Ordered hiring pipeline. Any stage may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Shortlisted,
    InterviewScheduled,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "underReview",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interviewScheduled",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: ActorId,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub resume_ref: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Candidate-supplied application payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub job_id: JobId,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_ref: Option<String>,
    /// Client-asserted applicant. Ignored in favour of the authenticated actor.
    #[serde(default)]
    pub applicant_id: Option<ActorId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Phone,
    Video,
    InPerson,
}

impl InterviewType {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewType::Phone => "phone",
            InterviewType::Video => "video",
            InterviewType::InPerson => "in-person",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    /// Owner of the job at booking time. Ownership checks use this, so the interview stays
    /// manageable after its application is withdrawn or its job deleted.
    pub employer_id: ActorId,
    pub applicant_id: ActorId,
    pub interview_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: InterviewType,
    pub status: InterviewStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest {
    pub application_id: ApplicationId,
    pub interview_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: InterviewType,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationReceived,
    ApplicationStatusChanged,
    InterviewScheduled,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::ApplicationReceived => "application_received",
            NotificationKind::ApplicationStatusChanged => "application_status_changed",
            NotificationKind::InterviewScheduled => "interview_scheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: ActorId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub metadata: BTreeMap<String, String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
