//! Visits repository for database operations

use chrono::NaiveDate;
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::visit::{renumbered, Visit},
};

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Visits of an adoption in sequence order
    pub async fn list_for_adoption<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        adoption_id: i32,
    ) -> AppResult<Vec<Visit>> {
        let visits = sqlx::query_as::<_, Visit>(
            "SELECT * FROM visits WHERE adoption_id = $1 ORDER BY sequence_number",
        )
        .bind(adoption_id)
        .fetch_all(executor)
        .await?;
        Ok(visits)
    }

    /// Adoption a visit belongs to (immutable, read without locking)
    pub async fn get_adoption_id(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT adoption_id FROM visits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit with id {} not found", id)))
    }

    pub async fn count(&self, conn: &mut PgConnection, adoption_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE adoption_id = $1")
            .bind(adoption_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Visits with a realized date
    pub async fn count_realized(&self, conn: &mut PgConnection, adoption_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM visits WHERE adoption_id = $1 AND realized_date IS NOT NULL",
        )
        .bind(adoption_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(count)
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        adoption_id: i32,
        sequence_number: i32,
        scheduled_date: NaiveDate,
    ) -> AppResult<Visit> {
        let visit = sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visits (adoption_id, sequence_number, scheduled_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(adoption_id)
        .bind(sequence_number)
        .bind(scheduled_date)
        .fetch_one(&mut *conn)
        .await?;
        Ok(visit)
    }

    /// Lock the visit row for the rest of the transaction
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Visit> {
        sqlx::query_as::<_, Visit>("SELECT * FROM visits WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit with id {} not found", id)))
    }

    /// Persist outcome-related fields
    pub async fn save_outcome(&self, conn: &mut PgConnection, visit: &Visit) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE visits
            SET realized_date = $1, outcome = $2, performed_by = $3, observations = $4,
                score = $5, health = $6, weight = $7, updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(visit.realized_date)
        .bind(visit.outcome)
        .bind(visit.performed_by)
        .bind(&visit.observations)
        .bind(visit.score)
        .bind(visit.health)
        .bind(visit.weight)
        .bind(visit.id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Delete a visit and close the gap it leaves in the numbering
    pub async fn delete_and_renumber(&self, conn: &mut PgConnection, visit: &Visit) -> AppResult<()> {
        sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(visit.id)
            .execute(&mut *conn)
            .await?;

        let later = sqlx::query_as::<_, (i32, i32)>(
            r#"
            SELECT id, sequence_number FROM visits
            WHERE adoption_id = $1 AND sequence_number > $2
            ORDER BY sequence_number
            FOR UPDATE
            "#,
        )
        .bind(visit.adoption_id)
        .bind(visit.sequence_number)
        .fetch_all(&mut *conn)
        .await?;

        // visits_adoption_sequence_unique is deferred until commit
        for (id, sequence_number) in later {
            sqlx::query("UPDATE visits SET sequence_number = $1, updated_at = NOW() WHERE id = $2")
                .bind(renumbered(sequence_number, visit.sequence_number))
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    pub async fn delete_for_adoption(&self, conn: &mut PgConnection, adoption_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM visits WHERE adoption_id = $1")
            .bind(adoption_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
