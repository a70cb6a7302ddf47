use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, Company, CompanyDraft,
    Interview, InterviewId, InterviewRequest, InterviewStatus, Job, JobDraft, JobId, JobPatch,
    JobStatus, Notification, NotificationId,
};
use super::error::PipelineError;
use super::identity::Actor;
use super::pipeline::HiringPipeline;
use super::repository::{HiringStore, NotificationRepository};

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

type Shared<S, N> = State<Arc<HiringPipeline<S, N>>>;

/// Request body for every status-change endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusChange<T> {
    pub status: T,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub interview_date: DateTime<Utc>,
}

/// Router builder exposing the hiring pipeline over JSON.
pub fn hiring_router<S, N>(pipeline: Arc<HiringPipeline<S, N>>) -> Router
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Router::new()
        .route("/api/v1/companies", post(register_company::<S, N>))
        .route("/api/v1/companies/me", get(my_company::<S, N>))
        .route(
            "/api/v1/jobs",
            get(list_open_jobs::<S, N>).post(create_job::<S, N>),
        )
        .route("/api/v1/jobs/mine", get(list_my_jobs::<S, N>))
        .route("/api/v1/jobs/review", get(list_jobs_awaiting_review::<S, N>))
        .route(
            "/api/v1/jobs/:job_id",
            get(get_job::<S, N>)
                .patch(update_job::<S, N>)
                .delete(delete_job::<S, N>),
        )
        .route("/api/v1/jobs/:job_id/status", post(transition_job::<S, N>))
        .route(
            "/api/v1/applications",
            get(list_applications::<S, N>).post(submit_application::<S, N>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_application::<S, N>).delete(withdraw_application::<S, N>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(update_application_status::<S, N>),
        )
        .route(
            "/api/v1/interviews",
            get(list_interviews::<S, N>).post(schedule_interview::<S, N>),
        )
        .route(
            "/api/v1/interviews/:interview_id",
            delete(delete_interview::<S, N>),
        )
        .route(
            "/api/v1/interviews/:interview_id/status",
            post(update_interview_status::<S, N>),
        )
        .route(
            "/api/v1/interviews/:interview_id/reschedule",
            post(reschedule_interview::<S, N>),
        )
        .route("/api/v1/notifications", get(list_notifications::<S, N>))
        .route(
            "/api/v1/notifications/read-all",
            post(mark_all_notifications_read::<S, N>),
        )
        .route(
            "/api/v1/notifications/:notification_id",
            delete(delete_notification::<S, N>),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(mark_notification_read::<S, N>),
        )
        .with_state(pipeline)
}

/// Identity context boundary for HTTP callers.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, PipelineError> {
    Actor::resolve(
        header(headers, ACTOR_ID_HEADER),
        header(headers, ACTOR_ROLE_HEADER),
    )
}

/// Resolves the caller before any body extractor runs, so anonymous requests get a 401
/// even when their payload would not parse.
#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = PipelineError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_headers(&parts.headers)
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

pub(crate) async fn register_company<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Json(draft): Json<CompanyDraft>,
) -> Result<(StatusCode, Json<Company>), PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let company = pipeline.companies().register(&actor, draft)?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub(crate) async fn my_company<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
) -> Result<Json<Company>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.companies().mine(&actor)?))
}

pub(crate) async fn create_job<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<Job>), PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let job = pipeline.jobs().create(&actor, draft)?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub(crate) async fn list_open_jobs<S, N>(
    State(pipeline): Shared<S, N>,
) -> Result<Json<Vec<Job>>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.jobs().list_open()?))
}

pub(crate) async fn list_my_jobs<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
) -> Result<Json<Vec<Job>>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.jobs().list_mine(&actor)?))
}

pub(crate) async fn list_jobs_awaiting_review<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
) -> Result<Json<Vec<Job>>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.jobs().list_awaiting_review(&actor)?))
}

pub(crate) async fn get_job<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.jobs().get(&actor, &JobId(job_id))?))
}

pub(crate) async fn update_job<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(job_id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Job>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.jobs().update(&actor, &JobId(job_id), patch)?))
}

pub(crate) async fn delete_job<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(job_id): Path<String>,
) -> Result<StatusCode, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    pipeline.jobs().delete(&actor, &JobId(job_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn transition_job<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(job_id): Path<String>,
    Json(change): Json<StatusChange<JobStatus>>,
) -> Result<Json<Job>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let job = pipeline
        .jobs()
        .admin_transition(&actor, &JobId(job_id), change.status)?;
    Ok(Json(job))
}

pub(crate) async fn submit_application<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Json(submission): Json<ApplicationSubmission>,
) -> Result<(StatusCode, Json<Application>), PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let application = pipeline.applications().submit(&actor, submission)?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub(crate) async fn list_applications<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
) -> Result<Json<Vec<Application>>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.applications().list_for_actor(&actor)?))
}

pub(crate) async fn get_application<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(application_id): Path<String>,
) -> Result<Json<Application>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let application = pipeline
        .applications()
        .get(&actor, &ApplicationId(application_id))?;
    Ok(Json(application))
}

pub(crate) async fn withdraw_application<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(application_id): Path<String>,
) -> Result<StatusCode, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    pipeline
        .applications()
        .withdraw(&actor, &ApplicationId(application_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn update_application_status<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(application_id): Path<String>,
    Json(change): Json<StatusChange<ApplicationStatus>>,
) -> Result<Json<Application>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let application = pipeline.applications().update_status(
        &actor,
        &ApplicationId(application_id),
        change.status,
    )?;
    Ok(Json(application))
}

pub(crate) async fn schedule_interview<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Json(request): Json<InterviewRequest>,
) -> Result<(StatusCode, Json<Interview>), PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let interview = pipeline.interviews().schedule(&actor, request)?;
    Ok((StatusCode::CREATED, Json(interview)))
}

pub(crate) async fn list_interviews<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
) -> Result<Json<Vec<Interview>>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.interviews().list_for_actor(&actor)?))
}

pub(crate) async fn update_interview_status<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(interview_id): Path<String>,
    Json(change): Json<StatusChange<InterviewStatus>>,
) -> Result<Json<Interview>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let interview = pipeline.interviews().update_status(
        &actor,
        &InterviewId(interview_id),
        change.status,
    )?;
    Ok(Json(interview))
}

pub(crate) async fn reschedule_interview<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(interview_id): Path<String>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Interview>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let interview = pipeline.interviews().reschedule(
        &actor,
        &InterviewId(interview_id),
        request.interview_date,
    )?;
    Ok(Json(interview))
}

pub(crate) async fn delete_interview<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(interview_id): Path<String>,
) -> Result<StatusCode, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    pipeline
        .interviews()
        .delete(&actor, &InterviewId(interview_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_notifications<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
) -> Result<Json<Vec<Notification>>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    Ok(Json(pipeline.notifications().list(&actor)?))
}

pub(crate) async fn mark_notification_read<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(notification_id): Path<String>,
) -> Result<Json<Notification>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let notification = pipeline
        .notifications()
        .mark_read(&actor, &NotificationId(notification_id))?;
    Ok(Json(notification))
}

pub(crate) async fn mark_all_notifications_read<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
) -> Result<Json<Value>, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    let updated = pipeline.notifications().mark_all_read(&actor)?;
    Ok(Json(json!({ "updated": updated })))
}

pub(crate) async fn delete_notification<S, N>(
    State(pipeline): Shared<S, N>,
    actor: Actor,
    Path(notification_id): Path<String>,
) -> Result<StatusCode, PipelineError>
where
    S: HiringStore + 'static,
    N: NotificationRepository + 'static,
{
    pipeline
        .notifications()
        .delete(&actor, &NotificationId(notification_id))?;
    Ok(StatusCode::NO_CONTENT)
}
