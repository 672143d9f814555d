//! Campaign management and KPI accumulation

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::{
        campaign::{
            Campaign, CampaignSummary, CreateCampaign, JoinCampaign, KpiEvent, Participation,
            ParticipationChange,
        },
        enums::{CampaignState, KpiType},
        user::UserClaims,
    },
    repository::Repository,
};

/// Bumps adoption campaigns when adoption events happen.
///
/// Runs on the caller's transaction so counters commit with their event.
/// Counters never go down.
#[derive(Clone)]
pub struct KpiAccumulator {
    repository: Repository,
}

impl KpiAccumulator {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Returns the number of campaigns incremented
    pub async fn record(&self, conn: &mut PgConnection, event: KpiEvent) -> AppResult<usize> {
        let campaigns = self
            .repository
            .campaigns
            .lock_active_for_kpi(conn, event.shelter_id(), KpiType::Adoptions)
            .await?;

        let mut bumped = 0;
        for campaign in campaigns.iter().filter(|c| c.counts_adoption_on(event.date())) {
            let value = self.repository.campaigns.increment(conn, campaign.id).await?;
            tracing::info!(
                campaign_id = campaign.id,
                current_value = value,
                target = campaign.target,
                "Campaign KPI incremented by {:?}",
                event
            );
            bumped += 1;
        }
        Ok(bumped)
    }
}

#[derive(Clone)]
pub struct CampaignsService {
    repository: Repository,
}

impl CampaignsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, claims: &UserClaims, campaign: CreateCampaign) -> AppResult<CampaignSummary> {
        let shelter_id = claims.require_shelter()?;
        campaign.check()?;
        let created = self.repository.campaigns.create(shelter_id, &campaign).await?;
        tracing::info!(campaign_id = created.id, shelter_id, "Campaign created");
        Ok(created.into())
    }

    pub async fn get(&self, id: i32) -> AppResult<CampaignSummary> {
        Ok(self.repository.campaigns.get_by_id(id).await?.into())
    }

    pub async fn list_by_shelter(&self, shelter_id: i32) -> AppResult<Vec<CampaignSummary>> {
        let campaigns = self.repository.campaigns.list_by_shelter(shelter_id).await?;
        Ok(campaigns.into_iter().map(CampaignSummary::from).collect())
    }

    pub async fn pause(&self, claims: &UserClaims, id: i32) -> AppResult<CampaignSummary> {
        self.change_state(claims, id, CampaignState::Paused).await
    }

    pub async fn activate(&self, claims: &UserClaims, id: i32) -> AppResult<CampaignSummary> {
        self.change_state(claims, id, CampaignState::Active).await
    }

    pub async fn finish(&self, claims: &UserClaims, id: i32) -> AppResult<CampaignSummary> {
        self.change_state(claims, id, CampaignState::Finished).await
    }

    /// Take part in an active campaign. Joining twice changes nothing.
    pub async fn join(
        &self,
        claims: &UserClaims,
        id: i32,
        join: JoinCampaign,
    ) -> AppResult<ParticipationChange> {
        let mut tx = self.repository.pool.begin().await?;
        let mut campaign = self.repository.campaigns.lock(&mut tx, id).await?;
        campaign.check_accepts_participants()?;

        let applied = self
            .repository
            .campaigns
            .insert_participation(&mut tx, id, claims.user_id, join.comment.trim())
            .await?
            .is_some();
        if applied && campaign.count_participation(true) {
            campaign = self.repository.campaigns.save_counter(&mut tx, &campaign).await?;
        }
        tx.commit().await?;

        tracing::info!(
            campaign_id = id,
            user_id = claims.user_id,
            applied,
            current_value = campaign.current_value,
            "Campaign joined"
        );
        Ok(ParticipationChange {
            applied,
            campaign: campaign.into(),
        })
    }

    /// Stop taking part in a campaign
    pub async fn leave(&self, claims: &UserClaims, id: i32) -> AppResult<ParticipationChange> {
        let mut tx = self.repository.pool.begin().await?;
        let mut campaign = self.repository.campaigns.lock(&mut tx, id).await?;

        if !self
            .repository
            .campaigns
            .delete_participation(&mut tx, id, claims.user_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "You are not taking part in campaign {}",
                id
            )));
        }
        if campaign.count_participation(false) {
            campaign = self.repository.campaigns.save_counter(&mut tx, &campaign).await?;
        }
        tx.commit().await?;

        tracing::info!(
            campaign_id = id,
            user_id = claims.user_id,
            current_value = campaign.current_value,
            "Campaign left"
        );
        Ok(ParticipationChange {
            applied: true,
            campaign: campaign.into(),
        })
    }

    /// Participants of one of the caller's campaigns
    pub async fn participants(&self, claims: &UserClaims, id: i32) -> AppResult<Vec<Participation>> {
        let campaign = self.repository.campaigns.get_by_id(id).await?;
        claims.require_shelter_owner(campaign.shelter_id)?;
        self.repository.campaigns.list_participations(id).await
    }

    pub async fn mark_attendance(
        &self,
        claims: &UserClaims,
        id: i32,
        participation_id: i32,
        attended: bool,
    ) -> AppResult<Participation> {
        let campaign = self.repository.campaigns.get_by_id(id).await?;
        claims.require_shelter_owner(campaign.shelter_id)?;
        self.repository
            .campaigns
            .set_attended(id, participation_id, attended)
            .await
    }

    async fn change_state(
        &self,
        claims: &UserClaims,
        id: i32,
        to: CampaignState,
    ) -> AppResult<CampaignSummary> {
        let mut tx = self.repository.pool.begin().await?;
        let mut campaign: Campaign = self.repository.campaigns.lock(&mut tx, id).await?;
        claims.require_shelter_owner(campaign.shelter_id)?;
        campaign.transition(to)?;
        let saved = self.repository.campaigns.save_state(&mut tx, &campaign).await?;
        tx.commit().await?;

        tracing::info!(campaign_id = id, state = %to, "Campaign state changed");
        Ok(saved.into())
    }
}
