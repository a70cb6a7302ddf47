use crate::infra::{in_memory_pipeline, parse_timestamp, MemoryPipeline};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use tradehire::config::PipelineConfig;
use tradehire::error::AppError;
use tradehire::workflows::hiring::{
    Actor, Application, ApplicationStatus, ApplicationSubmission, CompanyDraft, InterviewRequest,
    InterviewType, Job, JobDraft, JobPatch, JobStatus, Notification, PipelineError,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of candidates applying to the demo posting.
    #[arg(long, default_value_t = 2)]
    pub(crate) candidates: usize,
    /// Interview slot (RFC 3339). Defaults to three days from now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) interview_date: Option<DateTime<Utc>>,
    /// Hold the interview in person at this address instead of by video.
    #[arg(long)]
    pub(crate) location: Option<String>,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            candidates: 2,
            interview_date: None,
            location: None,
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        candidates,
        interview_date,
        location,
    } = args;
    let interview_date = interview_date.unwrap_or_else(|| Utc::now() + Duration::days(3));
    let candidates = candidates.max(1);

    let pipeline = in_memory_pipeline(&PipelineConfig::default());
    let employer = Actor::employer("employer-demo")?;
    let admin = Actor::admin("admin-demo")?;

    println!("TradeHire hiring round demo");

    let company = pipeline.companies().register(&employer, demo_company())?;
    println!("\nCompany registered: {} ({})", company.name, company.id);

    let job = publish_job(&pipeline, &employer, &admin)?;

    println!("\nApplications");
    let mut applications = Vec::with_capacity(candidates);
    for index in 1..=candidates {
        let candidate = Actor::candidate(format!("candidate-{index}"))?;
        let application = pipeline
            .applications()
            .submit(&candidate, demo_submission(&job, index))?;
        println!(
            "- {} applied as {} [{}]",
            candidate.id(),
            application.id,
            application.status.label()
        );
        applications.push((candidate, application));
    }

    if let Some((candidate, _)) = applications.first() {
        match pipeline
            .applications()
            .submit(candidate, demo_submission(&job, 1))
        {
            Err(err @ PipelineError::DuplicateApplication) => {
                println!("- repeat submission by {} refused: {err}", candidate.id())
            }
            Err(err) => return Err(err.into()),
            Ok(application) => println!("- unexpected second application {}", application.id),
        }
    }

    let Some((shortlisted_candidate, shortlisted)) = applications.first() else {
        return Ok(());
    };
    review_round(&pipeline, &employer, &applications)?;

    let kind = if location.is_some() {
        InterviewType::InPerson
    } else {
        InterviewType::Video
    };
    let interview = pipeline.interviews().schedule(
        &employer,
        InterviewRequest {
            application_id: shortlisted.id.clone(),
            interview_date,
            kind,
            location,
            notes: Some("Bring proof of licensure".to_string()),
        },
    )?;
    let advanced = pipeline
        .applications()
        .get(shortlisted_candidate, &shortlisted.id)?;
    println!(
        "\nInterview {} booked ({}, {}); application now {}",
        interview.id,
        interview.kind.label(),
        interview.interview_date.format("%Y-%m-%d %H:%M UTC"),
        advanced.status.label()
    );

    println!("\nInboxes");
    render_inbox(&employer, &pipeline.notifications().list(&employer)?);
    for (candidate, _) in &applications {
        render_inbox(candidate, &pipeline.notifications().list(candidate)?);
    }

    let cleared = pipeline.notifications().mark_all_read(&employer)?;
    println!("\n{} notification(s) marked read for {}", cleared, employer.id());

    Ok(())
}

fn publish_job(
    pipeline: &MemoryPipeline,
    employer: &Actor,
    admin: &Actor,
) -> Result<Job, AppError> {
    let draft = pipeline.jobs().create(employer, demo_job())?;
    println!(
        "Job drafted: {} ({}) {}..{} [{}]",
        draft.title,
        draft.id,
        draft.salary.min,
        draft.salary.max,
        draft.status.label()
    );

    let submitted = pipeline.jobs().update(
        employer,
        &draft.id,
        JobPatch {
            status: Some(JobStatus::PendingApproval),
            ..JobPatch::default()
        },
    )?;
    println!(
        "Job submitted for review: {} awaiting approval",
        pipeline.jobs().list_awaiting_review(admin)?.len()
    );

    let opened = pipeline
        .jobs()
        .admin_transition(admin, &submitted.id, JobStatus::Open)?;
    println!(
        "Job approved by {}: [{}], {} open posting(s)",
        admin.id(),
        opened.status.label(),
        pipeline.jobs().list_open()?.len()
    );
    Ok(opened)
}

fn review_round(
    pipeline: &MemoryPipeline,
    employer: &Actor,
    applications: &[(Actor, Application)],
) -> Result<(), AppError> {
    println!("\nReview");
    for (position, (candidate, application)) in applications.iter().enumerate() {
        let status = if position == 0 {
            ApplicationStatus::Shortlisted
        } else {
            ApplicationStatus::Rejected
        };
        let updated = pipeline
            .applications()
            .update_status(employer, &application.id, status)?;
        println!("- {} -> {}", candidate.id(), updated.status.label());
    }
    Ok(())
}

fn render_inbox(actor: &Actor, notifications: &[Notification]) {
    println!("{} ({}):", actor.id(), actor.role());
    if notifications.is_empty() {
        println!("  (empty)");
    }
    for notification in notifications {
        println!(
            "  [{}] {}: {}",
            notification.kind.label(),
            notification.title,
            notification.message
        );
    }
}

fn demo_company() -> CompanyDraft {
    CompanyDraft {
        name: "Prairie Line Electric".to_string(),
        industry: "Electrical contracting".to_string(),
        description: Some("Commercial fit-outs and service work".to_string()),
        specialties: vec!["Electrical".to_string(), "Low voltage".to_string()],
        service_areas: vec!["Des Moines".to_string(), "Ames".to_string()],
        website: None,
    }
}

fn demo_job() -> JobDraft {
    JobDraft {
        title: "Journeyman Electrician".to_string(),
        description: "Tenant improvements, service upgrades and troubleshooting".to_string(),
        location: "Des Moines, IA".to_string(),
        salary_min: 58_000,
        salary_max: 82_000,
        employment_type: "full-time".to_string(),
        trade_specialty: "Electrical".to_string(),
        status: None,
        employer_id: None,
    }
}

fn demo_submission(job: &Job, index: usize) -> ApplicationSubmission {
    ApplicationSubmission {
        job_id: job.id.clone(),
        cover_letter: format!("Candidate {index}: licensed journeyman, OSHA 30 certified"),
        resume_ref: Some(format!("resumes/candidate-{index}.pdf")),
        applicant_id: None,
    }
}
