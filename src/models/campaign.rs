//! Shelter campaigns and their KPI counters

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{CampaignState, KpiType};
use crate::error::{AppError, AppResult};

impl CampaignState {
    pub fn allowed_transitions(&self) -> &'static [CampaignState] {
        match self {
            CampaignState::Active => &[CampaignState::Paused, CampaignState::Finished],
            CampaignState::Paused => &[CampaignState::Active, CampaignState::Finished],
            CampaignState::Finished => &[],
        }
    }
}

/// Campaign record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Campaign {
    pub id: i32,
    pub shelter_id: i32,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kpi_type: KpiType,
    pub target: i32,
    pub current_value: i32,
    pub state: CampaignState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn transition(&mut self, to: CampaignState) -> AppResult<()> {
        if !self.state.allowed_transitions().contains(&to) {
            return Err(AppError::invalid_transition("Campaign", self.state, to));
        }
        self.state = to;
        Ok(())
    }

    /// Progress toward the target, capped at 100
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0 {
            return 0.0;
        }
        (self.current_value as f64 / self.target as f64 * 100.0).min(100.0)
    }

    /// Only active campaigns take new participants
    pub fn check_accepts_participants(&self) -> AppResult<()> {
        if self.state != CampaignState::Active {
            return Err(AppError::InvalidState(format!(
                "Campaign {} is {} and does not accept participants",
                self.id, self.state
            )));
        }
        Ok(())
    }

    /// Move the counter of a participants campaign after a join or a leave.
    /// The counter never drops below zero. Returns whether it changed.
    pub fn count_participation(&mut self, joined: bool) -> bool {
        if self.kpi_type != KpiType::Participants {
            return false;
        }
        if joined {
            self.current_value += 1;
            true
        } else if self.current_value > 0 {
            self.current_value -= 1;
            true
        } else {
            false
        }
    }

    /// Whether an adoption on `date` counts toward this campaign
    pub fn counts_adoption_on(&self, date: NaiveDate) -> bool {
        self.kpi_type == KpiType::Adoptions
            && self.state == CampaignState::Active
            && self.start_date <= date
            && date <= self.end_date
    }
}

/// Adoption events feeding campaign counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiEvent {
    AdoptionCreated { shelter_id: i32, date: NaiveDate },
    PetAdopted { shelter_id: i32, date: NaiveDate },
}

impl KpiEvent {
    pub fn shelter_id(&self) -> i32 {
        match self {
            KpiEvent::AdoptionCreated { shelter_id, .. } | KpiEvent::PetAdopted { shelter_id, .. } => {
                *shelter_id
            }
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            KpiEvent::AdoptionCreated { date, .. } | KpiEvent::PetAdopted { date, .. } => *date,
        }
    }
}

/// Campaign with its computed progress
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CampaignSummary {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub progress_percent: f64,
}

impl From<Campaign> for CampaignSummary {
    fn from(campaign: Campaign) -> Self {
        let progress_percent = campaign.progress_percent();
        Self {
            campaign,
            progress_percent,
        }
    }
}

/// A user taking part in a campaign
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participation {
    pub id: i32,
    pub campaign_id: i32,
    pub user_id: i32,
    pub comment: String,
    pub attended: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of joining or leaving a campaign
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipationChange {
    /// False when the caller was already taking part
    pub applied: bool,
    pub campaign: CampaignSummary,
}

/// Join campaign request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct JoinCampaign {
    #[serde(default)]
    pub comment: String,
}

fn default_attended() -> bool {
    true
}

/// Attendance request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[serde(default = "default_attended")]
    pub attended: bool,
}

/// Create campaign request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCampaign {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kpi_type: KpiType,
    #[validate(range(min = 1, message = "Target must be positive"))]
    pub target: i32,
}

impl CreateCampaign {
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title: Title must not be empty".to_string()));
        }
        if self.end_date < self.start_date {
            return Err(AppError::Validation(
                "end_date: End date cannot be before start date".to_string(),
            ));
        }
        Ok(())
    }
}
