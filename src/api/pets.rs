//! Pet endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::pet::{CreatePet, Pet},
};

use super::AuthenticatedUser;

/// Create a pet for the caller's shelter
#[utoipa::path(
    post,
    path = "/pets",
    tag = "pets",
    security(("bearer_auth" = [])),
    request_body = CreatePet,
    responses(
        (status = 201, description = "Pet created", body = Pet),
        (status = 400, description = "Invalid pet data"),
        (status = 403, description = "Caller is not a shelter")
    )
)]
pub async fn create_pet(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(pet): Json<CreatePet>,
) -> AppResult<(StatusCode, Json<Pet>)> {
    let created = state.services.pets.create(&claims, pet).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get pet by ID
#[utoipa::path(
    get,
    path = "/pets/{id}",
    tag = "pets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet details", body = Pet),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn get_pet(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Pet>> {
    Ok(Json(state.services.pets.get(id).await?))
}

/// List the pets of a shelter
#[utoipa::path(
    get,
    path = "/shelters/{id}/pets",
    tag = "pets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shelter ID")),
    responses(
        (status = 200, description = "Pets of the shelter", body = Vec<Pet>)
    )
)]
pub async fn list_shelter_pets(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(shelter_id): Path<i32>,
) -> AppResult<Json<Vec<Pet>>> {
    Ok(Json(state.services.pets.list_by_shelter(shelter_id).await?))
}

/// Make a pet available for adoption
#[utoipa::path(
    post,
    path = "/pets/{id}/publish",
    tag = "pets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet available", body = Pet),
        (status = 403, description = "Not the owning shelter"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn publish_pet(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Pet>> {
    Ok(Json(state.services.pets.publish(&claims, id).await?))
}

/// Move a pet back to draft
#[utoipa::path(
    post,
    path = "/pets/{id}/withdraw",
    tag = "pets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet withdrawn", body = Pet),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn withdraw_pet(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Pet>> {
    Ok(Json(state.services.pets.withdraw(&claims, id).await?))
}

/// Mark a pet as adopted
#[utoipa::path(
    post,
    path = "/pets/{id}/mark-adopted",
    tag = "pets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet adopted", body = Pet),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn mark_pet_adopted(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Pet>> {
    Ok(Json(state.services.pets.mark_adopted(&claims, id).await?))
}
