//! Adoption follow-up endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::adoption::{AdoptionDetails, CloseAdoption, StartFollowup, StrikeChange, UpdateContract},
};

use super::AuthenticatedUser;

/// Get adoption with visits and progress
#[utoipa::path(
    get,
    path = "/adoptions/{id}",
    tag = "adoptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    responses(
        (status = 200, description = "Adoption details", body = AdoptionDetails),
        (status = 404, description = "Adoption not found")
    )
)]
pub async fn get_adoption(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AdoptionDetails>> {
    Ok(Json(state.services.adoptions.get(&claims, id).await?))
}

/// Open the follow-up window (no-op when already open)
#[utoipa::path(
    post,
    path = "/adoptions/{id}/start-followup",
    tag = "adoptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    request_body(content = StartFollowup, description = "Optional window length"),
    responses(
        (status = 200, description = "Follow-up window set", body = AdoptionDetails)
    )
)]
pub async fn start_followup(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    body: Option<Json<StartFollowup>>,
) -> AppResult<Json<AdoptionDetails>> {
    let days = body.and_then(|Json(b)| b.days);
    Ok(Json(state.services.adoptions.start_followup(&claims, id, days).await?))
}

/// Add a strike (no-op at the cap)
#[utoipa::path(
    post,
    path = "/adoptions/{id}/add-strike",
    tag = "adoptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    responses(
        (status = 200, description = "Strike count after the call", body = StrikeChange)
    )
)]
pub async fn add_strike(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<StrikeChange>> {
    Ok(Json(state.services.adoptions.add_strike(&claims, id).await?))
}

/// Remove a strike (no-op at zero)
#[utoipa::path(
    post,
    path = "/adoptions/{id}/remove-strike",
    tag = "adoptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    responses(
        (status = 200, description = "Strike count after the call", body = StrikeChange)
    )
)]
pub async fn remove_strike(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<StrikeChange>> {
    Ok(Json(state.services.adoptions.remove_strike(&claims, id).await?))
}

/// Complete the follow-up
#[utoipa::path(
    post,
    path = "/adoptions/{id}/finalize",
    tag = "adoptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    responses(
        (status = 200, description = "Adoption completed", body = AdoptionDetails),
        (status = 409, description = "Visits missing or strikes remaining")
    )
)]
pub async fn finalize_adoption(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AdoptionDetails>> {
    Ok(Json(state.services.adoptions.finalize(&claims, id).await?))
}

/// Close as returned or cancelled
#[utoipa::path(
    post,
    path = "/adoptions/{id}/close",
    tag = "adoptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    request_body = CloseAdoption,
    responses(
        (status = 200, description = "Adoption closed", body = AdoptionDetails),
        (status = 409, description = "Adoption already closed")
    )
)]
pub async fn close_adoption(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(body): Json<CloseAdoption>,
) -> AppResult<Json<AdoptionDetails>> {
    Ok(Json(state.services.adoptions.close(&claims, id, body.state).await?))
}

/// Update the contract flag and notes
#[utoipa::path(
    put,
    path = "/adoptions/{id}/contract",
    tag = "adoptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Adoption ID")),
    request_body = UpdateContract,
    responses(
        (status = 200, description = "Contract updated", body = AdoptionDetails)
    )
)]
pub async fn update_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateContract>,
) -> AppResult<Json<AdoptionDetails>> {
    Ok(Json(state.services.adoptions.update_contract(&claims, id, body).await?))
}
