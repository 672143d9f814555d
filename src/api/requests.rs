//! Adoption request endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::adoption_request::{ApprovalOutcome, RejectRequest, RequestDetails, SubmitRequest},
};

use super::AuthenticatedUser;

/// Submit an adoption request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Request created", body = RequestDetails),
        (status = 409, description = "Pet unavailable or duplicate active request")
    )
)]
pub async fn submit_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(submission): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<RequestDetails>)> {
    let created = state.services.requests.submit(&claims, submission).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's requests (adopter) or requests on the caller's pets (shelter)
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Requests, newest first", body = Vec<RequestDetails>)
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RequestDetails>>> {
    Ok(Json(state.services.requests.list(&claims).await?))
}

/// Get request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 403, description = "Neither the adopter nor the shelter"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    Ok(Json(state.services.requests.get(&claims, id).await?))
}

/// Approve a request
#[utoipa::path(
    post,
    path = "/requests/{id}/approve",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request approved, adoption opened", body = ApprovalOutcome),
        (status = 403, description = "Not the owning shelter"),
        (status = 409, description = "Request not open or pet unavailable")
    )
)]
pub async fn approve_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApprovalOutcome>> {
    Ok(Json(state.services.requests.approve(&claims, id).await?))
}

/// Reject a request
#[utoipa::path(
    post,
    path = "/requests/{id}/reject",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Request rejected", body = RequestDetails),
        (status = 400, description = "Missing reason"),
        (status = 409, description = "Request already closed")
    )
)]
pub async fn reject_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(body): Json<RejectRequest>,
) -> AppResult<Json<RequestDetails>> {
    Ok(Json(state.services.requests.reject(&claims, id, &body.reason).await?))
}

/// Cancel one's own request
#[utoipa::path(
    post,
    path = "/requests/{id}/cancel",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request cancelled", body = RequestDetails),
        (status = 409, description = "Request already decided")
    )
)]
pub async fn cancel_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    Ok(Json(state.services.requests.cancel(&claims, id).await?))
}

/// Put a request back to pending
#[utoipa::path(
    post,
    path = "/requests/{id}/reset",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request pending again", body = RequestDetails),
        (status = 409, description = "Adopter already has another active request on this pet")
    )
)]
pub async fn reset_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    Ok(Json(state.services.requests.reset_to_pending(&claims, id).await?))
}

/// Start reviewing a pending request
#[utoipa::path(
    post,
    path = "/requests/{id}/review",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request in review", body = RequestDetails),
        (status = 409, description = "Request not pending")
    )
)]
pub async fn review_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    Ok(Json(state.services.requests.start_review(&claims, id).await?))
}
