//! Adoption requests repository for database operations

use sqlx::{PgConnection, PgExecutor, Pool, Postgres};

use super::map_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::adoption_request::{AdoptionRequest, RequestDetails},
};

/// Partial unique index enforcing one active request per (adopter, pet)
const ACTIVE_REQUEST_INDEX: &str = "uniq_requests_active_per_adopter_pet";

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.adopter_id,
           COALESCE(NULLIF(TRIM(CONCAT_WS(' ', u.first_name, u.last_name)), ''), u.username) AS adopter_name,
           r.pet_id, p.name AS pet_name, p.shelter_id, s.user_id AS shelter_user_id,
           r.state, r.message, r.rejection_reason, r.created_at, r.updated_at
    FROM adoption_requests r
    JOIN users u ON u.id = r.adopter_id
    JOIN pets p ON p.id = r.pet_id
    JOIN shelters s ON s.id = p.shelter_id
"#;

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Request with pet, shelter and adopter names
    pub async fn get_details<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        id: i32,
    ) -> AppResult<RequestDetails> {
        sqlx::query_as::<_, RequestDetails>(&format!("{} WHERE r.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Adoption request with id {} not found", id)))
    }

    pub async fn get_many_details(
        &self,
        conn: &mut PgConnection,
        ids: &[i32],
    ) -> AppResult<Vec<RequestDetails>> {
        let rows = sqlx::query_as::<_, RequestDetails>(&format!(
            "{} WHERE r.id = ANY($1) ORDER BY r.id",
            DETAILS_SELECT
        ))
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    /// Requests sent by an adopter, newest first
    pub async fn list_for_adopter(&self, adopter_id: i32) -> AppResult<Vec<RequestDetails>> {
        let rows = sqlx::query_as::<_, RequestDetails>(&format!(
            "{} WHERE r.adopter_id = $1 ORDER BY r.created_at DESC, r.id DESC",
            DETAILS_SELECT
        ))
        .bind(adopter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Requests on a shelter's pets, newest first
    pub async fn list_for_shelter(&self, shelter_id: i32) -> AppResult<Vec<RequestDetails>> {
        let rows = sqlx::query_as::<_, RequestDetails>(&format!(
            "{} WHERE p.shelter_id = $1 ORDER BY r.created_at DESC, r.id DESC",
            DETAILS_SELECT
        ))
        .bind(shelter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Pet targeted by a request (immutable, read without locking)
    pub async fn get_pet_id(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT pet_id FROM adoption_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Adoption request with id {} not found", id)))
    }

    /// Whether the adopter already has a pending, in-review or approved request on the pet
    pub async fn has_active(
        &self,
        conn: &mut PgConnection,
        adopter_id: i32,
        pet_id: i32,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM adoption_requests
                WHERE adopter_id = $1 AND pet_id = $2
                  AND state IN ('pending', 'in_review', 'approved')
            )
            "#,
        )
        .bind(adopter_id)
        .bind(pet_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(exists)
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        adopter_id: i32,
        pet_id: i32,
        message: &str,
    ) -> AppResult<AdoptionRequest> {
        sqlx::query_as::<_, AdoptionRequest>(
            r#"
            INSERT INTO adoption_requests (adopter_id, pet_id, message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(adopter_id)
        .bind(pet_id)
        .bind(message)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            map_unique_violation(e, ACTIVE_REQUEST_INDEX, AppError::DuplicateActiveRequest { pet_id })
        })
    }

    /// Lock the request row for the rest of the transaction
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<AdoptionRequest> {
        sqlx::query_as::<_, AdoptionRequest>(
            "SELECT * FROM adoption_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Adoption request with id {} not found", id)))
    }

    /// Persist state and rejection reason
    pub async fn save_state(&self, conn: &mut PgConnection, request: &AdoptionRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE adoption_requests
            SET state = $1, rejection_reason = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(request.state)
        .bind(&request.rejection_reason)
        .bind(request.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                ACTIVE_REQUEST_INDEX,
                AppError::DuplicateActiveRequest {
                    pet_id: request.pet_id,
                },
            )
        })?;
        Ok(())
    }

    /// Reject every other open request on the pet, returning their ids
    pub async fn reject_competitors(
        &self,
        conn: &mut PgConnection,
        pet_id: i32,
        winner_id: i32,
        reason: &str,
    ) -> AppResult<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE adoption_requests
            SET state = 'rejected', rejection_reason = $3, updated_at = NOW()
            WHERE pet_id = $1 AND id <> $2 AND state IN ('pending', 'in_review')
            RETURNING id
            "#,
        )
        .bind(pet_id)
        .bind(winner_id)
        .bind(reason)
        .fetch_all(&mut *conn)
        .await?;
        Ok(ids)
    }
}
