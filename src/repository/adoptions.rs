//! Adoptions repository for database operations

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::adoption::{Adoption, AdoptionContext},
};

const CONTEXT_SELECT: &str = r#"
    SELECT a.*, p.id AS pet_id, p.name AS pet_name, p.shelter_id,
           r.adopter_id,
           COALESCE(NULLIF(TRIM(CONCAT_WS(' ', u.first_name, u.last_name)), ''), u.username) AS adopter_name
    FROM adoptions a
    JOIN adoption_requests r ON r.id = a.request_id
    JOIN pets p ON p.id = r.pet_id
    JOIN users u ON u.id = r.adopter_id
"#;

#[derive(Clone)]
pub struct AdoptionsRepository {
    pool: Pool<Postgres>,
}

impl AdoptionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Adoption with its pet, shelter and adopter
    pub async fn get_context(&self, id: i32) -> AppResult<AdoptionContext> {
        sqlx::query_as::<_, AdoptionContext>(&format!("{} WHERE a.id = $1", CONTEXT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Adoption with id {} not found", id)))
    }

    /// Same as `get_context`, locking the adoption row
    pub async fn lock_context(&self, conn: &mut PgConnection, id: i32) -> AppResult<AdoptionContext> {
        sqlx::query_as::<_, AdoptionContext>(&format!(
            "{} WHERE a.id = $1 FOR UPDATE OF a",
            CONTEXT_SELECT
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Adoption with id {} not found", id)))
    }

    /// Adoption created from a request, locked
    pub async fn lock_by_request(
        &self,
        conn: &mut PgConnection,
        request_id: i32,
    ) -> AppResult<Option<Adoption>> {
        let adoption = sqlx::query_as::<_, Adoption>(
            "SELECT * FROM adoptions WHERE request_id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(adoption)
    }

    /// New contract: Active, no strikes, no window, nothing planned
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        request_id: i32,
        adoption_date: NaiveDate,
    ) -> AppResult<Adoption> {
        let adoption = sqlx::query_as::<_, Adoption>(
            r#"
            INSERT INTO adoptions (request_id, adoption_date)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(adoption_date)
        .fetch_one(&mut *conn)
        .await?;
        Ok(adoption)
    }

    /// Validate and persist every mutable field
    pub async fn save(&self, conn: &mut PgConnection, adoption: &Adoption) -> AppResult<()> {
        adoption.validate()?;
        sqlx::query(
            r#"
            UPDATE adoptions
            SET adoption_date = $1, followup_start = $2, followup_end = $3, state = $4,
                strikes = $5, max_strikes = $6, planned_visits = $7, contract_signed = $8,
                notes = $9, updated_at = NOW()
            WHERE id = $10
            "#,
        )
        .bind(adoption.adoption_date)
        .bind(adoption.followup_start)
        .bind(adoption.followup_end)
        .bind(adoption.state)
        .bind(adoption.strikes)
        .bind(adoption.max_strikes)
        .bind(adoption.planned_visits)
        .bind(adoption.contract_signed)
        .bind(&adoption.notes)
        .bind(adoption.id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
