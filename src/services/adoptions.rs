//! Adoption lifecycle: follow-up window, strikes, completion and closure

use sqlx::{Postgres, Transaction};

use super::today;
use crate::{
    error::{AppError, AppResult},
    models::{
        adoption::{AdoptionContext, AdoptionDetails, StrikeChange, UpdateContract},
        enums::AdoptionState,
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AdoptionsService {
    repository: Repository,
    /// Window length when none is given
    default_followup_days: i64,
}

impl AdoptionsService {
    pub fn new(repository: Repository, default_followup_days: i64) -> Self {
        Self {
            repository,
            default_followup_days,
        }
    }

    /// Adoption with visits and derived figures, for its shelter or adopter
    pub async fn get(&self, claims: &UserClaims, id: i32) -> AppResult<AdoptionDetails> {
        let ctx = self.repository.adoptions.get_context(id).await?;
        if claims.user_id != ctx.adopter_id {
            claims.require_shelter_owner(ctx.shelter_id)?;
        }
        let visits = self
            .repository
            .visits
            .list_for_adoption(&self.repository.pool, id)
            .await?;
        Ok(AdoptionDetails::build(ctx, visits, today()))
    }

    pub async fn start_followup(
        &self,
        claims: &UserClaims,
        id: i32,
        days: Option<i64>,
    ) -> AppResult<AdoptionDetails> {
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.lock_for_shelter(&mut tx, claims, id).await?;

        let days = days.unwrap_or(self.default_followup_days);
        if ctx.adoption.start_followup(today(), days)? {
            self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
            tracing::info!(
                adoption_id = id,
                start = ?ctx.adoption.followup_start,
                end = ?ctx.adoption.followup_end,
                "Follow-up started"
            );
        }
        tx.commit().await?;
        self.get(claims, id).await
    }

    pub async fn add_strike(&self, claims: &UserClaims, id: i32) -> AppResult<StrikeChange> {
        self.change_strikes(claims, id, true).await
    }

    pub async fn remove_strike(&self, claims: &UserClaims, id: i32) -> AppResult<StrikeChange> {
        self.change_strikes(claims, id, false).await
    }

    async fn change_strikes(&self, claims: &UserClaims, id: i32, add: bool) -> AppResult<StrikeChange> {
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.lock_for_shelter(&mut tx, claims, id).await?;

        let applied = if add {
            ctx.adoption.add_strike()
        } else {
            ctx.adoption.remove_strike()
        };
        if applied {
            self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
        }
        tx.commit().await?;

        tracing::info!(
            adoption_id = id,
            applied,
            strikes = ctx.adoption.strikes,
            state = %ctx.adoption.state,
            "Strike {}",
            if add { "added" } else { "removed" }
        );
        Ok(StrikeChange::new(applied, &ctx.adoption))
    }

    /// Explicit completion; fails while visits are missing or strikes remain
    pub async fn finalize(&self, claims: &UserClaims, id: i32) -> AppResult<AdoptionDetails> {
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.lock_for_shelter(&mut tx, claims, id).await?;

        let completed = self.repository.visits.count_realized(&mut tx, id).await?;
        if !ctx.adoption.finalize_followup(completed) {
            return Err(AppError::InvalidState(format!(
                "Follow-up cannot be finalized from '{}' with {}% progress and {} strike(s)",
                ctx.adoption.state,
                ctx.adoption.progress_percent(completed),
                ctx.adoption.strikes
            )));
        }
        self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
        tx.commit().await?;

        tracing::info!(adoption_id = id, "Adoption completed");
        self.get(claims, id).await
    }

    /// End early as Returned or Cancelled
    pub async fn close(&self, claims: &UserClaims, id: i32, to: AdoptionState) -> AppResult<AdoptionDetails> {
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.lock_for_shelter(&mut tx, claims, id).await?;

        ctx.adoption.close(to)?;
        self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
        tx.commit().await?;

        tracing::info!(adoption_id = id, state = %to, "Adoption closed");
        self.get(claims, id).await
    }

    /// Set the contract-signed flag and notes
    pub async fn update_contract(
        &self,
        claims: &UserClaims,
        id: i32,
        update: UpdateContract,
    ) -> AppResult<AdoptionDetails> {
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.lock_for_shelter(&mut tx, claims, id).await?;

        if ctx.adoption.update_contract(&update) {
            self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
            tracing::info!(
                adoption_id = id,
                signed = ctx.adoption.contract_signed,
                "Adoption contract updated"
            );
        }
        tx.commit().await?;
        self.get(claims, id).await
    }

    async fn lock_for_shelter(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        claims: &UserClaims,
        id: i32,
    ) -> AppResult<AdoptionContext> {
        let ctx = self.repository.adoptions.lock_context(tx, id).await?;
        claims.require_shelter_owner(ctx.shelter_id)?;
        Ok(ctx)
    }
}
