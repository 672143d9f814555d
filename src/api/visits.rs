//! Follow-up visit endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::visit::{OutcomeReport, ScheduleVisit, Visit, VisitResult, VisitView},
};

use super::AuthenticatedUser;

/// List visits of an adoption
#[utoipa::path(
    get,
    path = "/adoptions/{id}/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    responses(
        (status = 200, description = "Visits in sequence order", body = Vec<VisitView>)
    )
)]
pub async fn list_visits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(adoption_id): Path<i32>,
) -> AppResult<Json<Vec<VisitView>>> {
    Ok(Json(state.services.visits.list(&claims, adoption_id).await?))
}

/// Schedule a visit inside the follow-up window
#[utoipa::path(
    post,
    path = "/adoptions/{id}/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    request_body = ScheduleVisit,
    responses(
        (status = 201, description = "Visit scheduled", body = Visit),
        (status = 422, description = "Window not active or date outside it")
    )
)]
pub async fn schedule_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(adoption_id): Path<i32>,
    Json(body): Json<ScheduleVisit>,
) -> AppResult<(StatusCode, Json<Visit>)> {
    let visit = state
        .services
        .visits
        .schedule(&claims, adoption_id, body.scheduled_date)
        .await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

/// Delete a visit
#[utoipa::path(
    delete,
    path = "/visits/{id}",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    responses(
        (status = 204, description = "Visit deleted, later visits renumbered"),
        (status = 404, description = "Visit not found")
    )
)]
pub async fn delete_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.visits.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record the outcome of a visit
#[utoipa::path(
    post,
    path = "/visits/{id}/outcome",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    request_body = OutcomeReport,
    responses(
        (status = 200, description = "Outcome recorded (applied = false if already realized)", body = VisitResult),
        (status = 400, description = "Score or weight out of range")
    )
)]
pub async fn record_outcome(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(report): Json<OutcomeReport>,
) -> AppResult<Json<VisitResult>> {
    Ok(Json(state.services.visits.record_outcome(&claims, id, report).await?))
}

/// Mark a visit as not performed
#[utoipa::path(
    post,
    path = "/visits/{id}/not-performed",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit flagged (applied = false if already flagged)", body = VisitResult)
    )
)]
pub async fn mark_not_performed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<VisitResult>> {
    Ok(Json(state.services.visits.mark_not_performed(&claims, id).await?))
}
