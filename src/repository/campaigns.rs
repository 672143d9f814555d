//! Campaigns repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        campaign::{Campaign, CreateCampaign, Participation},
        enums::KpiType,
    },
};

#[derive(Clone)]
pub struct CampaignsRepository {
    pool: Pool<Postgres>,
}

impl CampaignsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get campaign by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Campaign> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Campaign with id {} not found", id)))
    }

    pub async fn list_by_shelter(&self, shelter_id: i32) -> AppResult<Vec<Campaign>> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            "SELECT * FROM campaigns WHERE shelter_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(shelter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(campaigns)
    }

    pub async fn create(&self, shelter_id: i32, campaign: &CreateCampaign) -> AppResult<Campaign> {
        let created = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (shelter_id, title, description, start_date, end_date, kpi_type, target)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(shelter_id)
        .bind(campaign.title.trim())
        .bind(&campaign.description)
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.kpi_type)
        .bind(campaign.target)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Campaign> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Campaign with id {} not found", id)))
    }

    pub async fn save_state(&self, conn: &mut PgConnection, campaign: &Campaign) -> AppResult<Campaign> {
        let saved = sqlx::query_as::<_, Campaign>(
            "UPDATE campaigns SET state = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(campaign.state)
        .bind(campaign.id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(saved)
    }

    /// Active campaigns of a shelter for one KPI, locked
    pub async fn lock_active_for_kpi(
        &self,
        conn: &mut PgConnection,
        shelter_id: i32,
        kpi_type: KpiType,
    ) -> AppResult<Vec<Campaign>> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            WHERE shelter_id = $1 AND kpi_type = $2 AND state = 'active'
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(shelter_id)
        .bind(kpi_type)
        .fetch_all(&mut *conn)
        .await?;
        Ok(campaigns)
    }

    /// Add one to the counter, returning the new value
    pub async fn increment(&self, conn: &mut PgConnection, id: i32) -> AppResult<i32> {
        let value: i32 = sqlx::query_scalar(
            r#"
            UPDATE campaigns SET current_value = current_value + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING current_value
            "#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(value)
    }

    /// Persist the KPI counter
    pub async fn save_counter(&self, conn: &mut PgConnection, campaign: &Campaign) -> AppResult<Campaign> {
        let saved = sqlx::query_as::<_, Campaign>(
            "UPDATE campaigns SET current_value = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(campaign.current_value)
        .bind(campaign.id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(saved)
    }

    /// Add a participant; `None` when the user already takes part
    pub async fn insert_participation(
        &self,
        conn: &mut PgConnection,
        campaign_id: i32,
        user_id: i32,
        comment: &str,
    ) -> AppResult<Option<Participation>> {
        let participation = sqlx::query_as::<_, Participation>(
            r#"
            INSERT INTO campaign_participations (campaign_id, user_id, comment)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT campaign_participations_unique DO NOTHING
            RETURNING *
            "#,
        )
        .bind(campaign_id)
        .bind(user_id)
        .bind(comment)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(participation)
    }

    /// Returns false when the user was not taking part
    pub async fn delete_participation(
        &self,
        conn: &mut PgConnection,
        campaign_id: i32,
        user_id: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM campaign_participations WHERE campaign_id = $1 AND user_id = $2",
        )
        .bind(campaign_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Participants of a campaign, newest first
    pub async fn list_participations(&self, campaign_id: i32) -> AppResult<Vec<Participation>> {
        let rows = sqlx::query_as::<_, Participation>(
            r#"
            SELECT * FROM campaign_participations
            WHERE campaign_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn set_attended(
        &self,
        campaign_id: i32,
        participation_id: i32,
        attended: bool,
    ) -> AppResult<Participation> {
        sqlx::query_as::<_, Participation>(
            r#"
            UPDATE campaign_participations SET attended = $1
            WHERE id = $2 AND campaign_id = $3
            RETURNING *
            "#,
        )
        .bind(attended)
        .bind(participation_id)
        .bind(campaign_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Participation with id {} not found in campaign {}",
                participation_id, campaign_id
            ))
        })
    }
}
