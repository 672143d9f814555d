//! Follow-up visits and outcome processing

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::adoption::OutcomeEffects;
use super::enums::{AdoptionState, HealthRating, VisitOutcome};
use crate::error::{AppError, AppResult};

/// Visit record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visit {
    pub id: i32,
    pub adoption_id: i32,
    /// 1-based, dense within the adoption
    pub sequence_number: i32,
    pub scheduled_date: NaiveDate,
    pub realized_date: Option<NaiveDate>,
    pub outcome: VisitOutcome,
    pub performed_by: Option<i32>,
    pub observations: String,
    pub score: Option<i16>,
    pub health: Option<HealthRating>,
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Visit {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.outcome == VisitOutcome::Pending && self.scheduled_date < today
    }

    pub fn is_realized(&self) -> bool {
        self.realized_date.is_some()
    }

    /// Record what happened at the visit.
    ///
    /// Returns `None` when the visit was already realized (nothing changes),
    /// otherwise the outcome now stored on the visit.
    pub fn record(
        &mut self,
        report: &OutcomeReport,
        performed_by: i32,
        today: NaiveDate,
    ) -> AppResult<Option<VisitOutcome>> {
        let requested = report.checked_outcome()?;
        let weight = report.checked_weight()?;
        if self.is_realized() {
            return Ok(None);
        }

        self.realized_date = Some(today);
        self.performed_by = Some(performed_by);
        self.observations = report.observations.clone();
        if report.score.is_some() {
            self.score = report.score;
        }
        if report.health.is_some() {
            self.health = report.health;
        }
        if weight.is_some() {
            self.weight = weight;
        }
        if self.outcome == VisitOutcome::Pending {
            self.outcome = requested;
        }
        Ok(Some(self.outcome))
    }

    /// Returns false when the visit was already marked not performed
    pub fn mark_not_performed(&mut self) -> bool {
        if self.outcome == VisitOutcome::NotPerformed {
            return false;
        }
        self.outcome = VisitOutcome::NotPerformed;
        true
    }
}

/// Sequence number given to a newly scheduled visit
pub fn next_sequence_number(visit_count: i64) -> i32 {
    visit_count as i32 + 1
}

/// New sequence number of a visit once visit `removed` has been deleted
pub fn renumbered(sequence_number: i32, removed: i32) -> i32 {
    if sequence_number > removed {
        sequence_number - 1
    } else {
        sequence_number
    }
}

/// Visit with its read-time flags
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisitView {
    #[serde(flatten)]
    pub visit: Visit,
    pub overdue: bool,
}

impl VisitView {
    pub fn new(visit: Visit, today: NaiveDate) -> Self {
        let overdue = visit.is_overdue(today);
        Self { visit, overdue }
    }
}

/// Result of recording a visit outcome or marking it not performed
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisitResult {
    pub visit: Visit,
    /// False when the visit was already finalized
    pub applied: bool,
    pub effects: OutcomeEffects,
    pub adoption_state: AdoptionState,
    pub strikes: i16,
}

/// Schedule visit request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleVisit {
    pub scheduled_date: NaiveDate,
}

/// Decimal places kept for visit weights, rounded half away from zero like NUMERIC(5, 2)
const WEIGHT_DECIMALS: u32 = 2;

/// Outcome report request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct OutcomeReport {
    /// Defaults to successful
    pub outcome: Option<VisitOutcome>,
    #[serde(default)]
    pub observations: String,
    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: Option<i16>,
    pub health: Option<HealthRating>,
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Decimal>,
}

impl OutcomeReport {
    /// Check bounds and resolve the outcome to apply
    pub fn checked_outcome(&self) -> AppResult<VisitOutcome> {
        self.validate()?;
        self.checked_weight()?;
        match self.outcome.unwrap_or(VisitOutcome::Successful) {
            VisitOutcome::Pending | VisitOutcome::NotPerformed => Err(AppError::Validation(
                "outcome: A recorded visit must be successful, needs_attention or problematic"
                    .to_string(),
            )),
            outcome => Ok(outcome),
        }
    }

    /// Weight rounded to the stored precision, then bounds-checked
    pub fn checked_weight(&self) -> AppResult<Option<Decimal>> {
        let Some(weight) = self.weight else {
            return Ok(None);
        };
        let weight =
            weight.round_dp_with_strategy(WEIGHT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        if weight <= Decimal::ZERO || weight > Decimal::from(200) {
            return Err(AppError::Validation(
                "weight: Weight must be greater than 0 and at most 200".to_string(),
            ));
        }
        Ok(Some(weight))
    }
}
