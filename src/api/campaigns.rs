//! Campaign endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::campaign::{
        CampaignSummary, CreateCampaign, JoinCampaign, MarkAttendance, Participation,
        ParticipationChange,
    },
};

use super::AuthenticatedUser;

/// Create a campaign for the caller's shelter
#[utoipa::path(
    post,
    path = "/campaigns",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    request_body = CreateCampaign,
    responses(
        (status = 201, description = "Campaign created", body = CampaignSummary),
        (status = 400, description = "Invalid dates or target")
    )
)]
pub async fn create_campaign(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(campaign): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<CampaignSummary>)> {
    let created = state.services.campaigns.create(&claims, campaign).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get campaign with progress
#[utoipa::path(
    get,
    path = "/campaigns/{id}",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Campaign details", body = CampaignSummary),
        (status = 404, description = "Campaign not found")
    )
)]
pub async fn get_campaign(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CampaignSummary>> {
    Ok(Json(state.services.campaigns.get(id).await?))
}

/// List campaigns of a shelter
#[utoipa::path(
    get,
    path = "/shelters/{id}/campaigns",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shelter ID")),
    responses(
        (status = 200, description = "Campaigns of the shelter", body = Vec<CampaignSummary>)
    )
)]
pub async fn list_shelter_campaigns(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(shelter_id): Path<i32>,
) -> AppResult<Json<Vec<CampaignSummary>>> {
    Ok(Json(state.services.campaigns.list_by_shelter(shelter_id).await?))
}

/// Pause a campaign
#[utoipa::path(
    post,
    path = "/campaigns/{id}/pause",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Campaign paused", body = CampaignSummary),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn pause_campaign(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CampaignSummary>> {
    Ok(Json(state.services.campaigns.pause(&claims, id).await?))
}

/// Resume a paused campaign
#[utoipa::path(
    post,
    path = "/campaigns/{id}/activate",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Campaign active", body = CampaignSummary),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn activate_campaign(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CampaignSummary>> {
    Ok(Json(state.services.campaigns.activate(&claims, id).await?))
}

/// Finish a campaign for good
#[utoipa::path(
    post,
    path = "/campaigns/{id}/finish",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Campaign finished", body = CampaignSummary),
        (status = 409, description = "Already finished")
    )
)]
pub async fn finish_campaign(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CampaignSummary>> {
    Ok(Json(state.services.campaigns.finish(&claims, id).await?))
}

/// Take part in an active campaign
#[utoipa::path(
    post,
    path = "/campaigns/{id}/join",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign ID")),
    request_body(content = JoinCampaign, description = "Optional comment"),
    responses(
        (status = 201, description = "Joined", body = ParticipationChange),
        (status = 200, description = "Already taking part", body = ParticipationChange),
        (status = 409, description = "Campaign not active")
    )
)]
pub async fn join_campaign(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    body: Option<Json<JoinCampaign>>,
) -> AppResult<(StatusCode, Json<ParticipationChange>)> {
    let join = body.map(|Json(join)| join).unwrap_or_default();
    let change = state.services.campaigns.join(&claims, id, join).await?;
    let status = if change.applied {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(change)))
}

/// Stop taking part in a campaign
#[utoipa::path(
    post,
    path = "/campaigns/{id}/leave",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Left", body = ParticipationChange),
        (status = 404, description = "Not taking part")
    )
)]
pub async fn leave_campaign(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ParticipationChange>> {
    Ok(Json(state.services.campaigns.leave(&claims, id).await?))
}

/// List participants of the caller's campaign
#[utoipa::path(
    get,
    path = "/campaigns/{id}/participants",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Participants, newest first", body = Vec<Participation>),
        (status = 403, description = "Not the shelter owner")
    )
)]
pub async fn list_participants(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Participation>>> {
    Ok(Json(state.services.campaigns.participants(&claims, id).await?))
}

/// Record whether a participant attended
#[utoipa::path(
    put,
    path = "/campaigns/{id}/participants/{participation_id}/attendance",
    tag = "campaigns",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Campaign ID"),
        ("participation_id" = i32, Path, description = "Participation ID")
    ),
    request_body = MarkAttendance,
    responses(
        (status = 200, description = "Attendance recorded", body = Participation),
        (status = 404, description = "Participation not found")
    )
)]
pub async fn mark_attendance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, participation_id)): Path<(i32, i32)>,
    Json(body): Json<MarkAttendance>,
) -> AppResult<Json<Participation>> {
    Ok(Json(
        state
            .services
            .campaigns
            .mark_attendance(&claims, id, participation_id, body.attended)
            .await?,
    ))
}
