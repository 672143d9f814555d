//! Adoption contract, follow-up window and strike state machine
//!
//! `Active` and `Alert` are never set directly: they are derived from the
//! strike count at the end of every strike mutation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::{AdoptionState, VisitOutcome};
use super::visit::{Visit, VisitView};
use crate::error::{AppError, AppResult};

/// Strike cap applied to every adoption
pub const MAX_STRIKES: i16 = 3;

/// Longest follow-up window accepted, in days
pub const MAX_FOLLOWUP_DAYS: i64 = 3650;

impl AdoptionState {
    /// Follow-up still running (visits and strikes matter)
    pub fn is_open(&self) -> bool {
        matches!(self, AdoptionState::Active | AdoptionState::Alert)
    }
}

/// Adoption record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Adoption {
    pub id: i32,
    /// Approved request this contract came from
    pub request_id: i32,
    pub adoption_date: NaiveDate,
    pub followup_start: Option<NaiveDate>,
    pub followup_end: Option<NaiveDate>,
    pub state: AdoptionState,
    pub strikes: i16,
    pub max_strikes: i16,
    pub planned_visits: i32,
    pub contract_signed: bool,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Side effects applied to an adoption by a recorded visit outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct OutcomeEffects {
    pub strike_added: bool,
    pub strike_removed: bool,
    /// Follow-up finalized by this visit
    pub completed: bool,
}

impl Adoption {
    /// Row invariants, checked before every write
    pub fn validate(&self) -> AppResult<()> {
        match (self.followup_start, self.followup_end) {
            (Some(start), Some(end)) if end < start => {
                return Err(AppError::Validation(
                    "Follow-up end date cannot be before its start date".to_string(),
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(AppError::Validation(
                    "Follow-up start and end must be set together".to_string(),
                ));
            }
            _ => {}
        }
        if self.max_strikes > MAX_STRIKES {
            return Err(AppError::Validation(format!(
                "max_strikes cannot exceed {}",
                MAX_STRIKES
            )));
        }
        if self.strikes < 0 || self.strikes > self.max_strikes {
            return Err(AppError::Validation(
                "Strikes must stay between 0 and max_strikes".to_string(),
            ));
        }
        if self.planned_visits < 0 {
            return Err(AppError::Validation(
                "planned_visits cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.followup_start.zip(self.followup_end)
    }

    /// `today` falls inside the follow-up window (false when unset)
    pub fn window_active(&self, today: NaiveDate) -> bool {
        self.window()
            .map(|(start, end)| start <= today && today <= end)
            .unwrap_or(false)
    }

    /// Open the follow-up window `[today, today + days]`.
    /// Returns `Ok(false)` when a window is already set.
    pub fn start_followup(&mut self, today: NaiveDate, days: i64) -> AppResult<bool> {
        if self.window().is_some() {
            return Ok(false);
        }
        if !(0..=MAX_FOLLOWUP_DAYS).contains(&days) {
            return Err(AppError::Validation(format!(
                "days: Follow-up duration must be between 0 and {} days",
                MAX_FOLLOWUP_DAYS
            )));
        }
        let end = Duration::try_days(days)
            .and_then(|d| today.checked_add_signed(d))
            .ok_or_else(|| {
                AppError::Validation("days: Follow-up window ends outside the calendar".to_string())
            })?;
        self.followup_start = Some(today);
        self.followup_end = Some(end);
        Ok(true)
    }

    /// Apply a contract update. Returns whether anything changed.
    pub fn update_contract(&mut self, update: &UpdateContract) -> bool {
        let mut changed = false;
        if let Some(signed) = update.signed {
            changed |= self.contract_signed != signed;
            self.contract_signed = signed;
        }
        if let Some(notes) = &update.notes {
            let notes = notes.trim();
            changed |= self.notes != notes;
            self.notes = notes.to_string();
        }
        changed
    }

    /// Ensure `date` lies within the follow-up window
    pub fn check_in_window(&self, date: NaiveDate) -> AppResult<()> {
        let (start, end) = self.window().ok_or(AppError::WindowNotActive(self.id))?;
        if date < start || date > end {
            return Err(AppError::DateOutOfWindow { date, start, end });
        }
        Ok(())
    }

    fn sync_state_with_strikes(&mut self) {
        if self.strikes > 0 && self.state == AdoptionState::Active {
            self.state = AdoptionState::Alert;
        }
        if self.strikes == 0 && self.state == AdoptionState::Alert {
            self.state = AdoptionState::Active;
        }
    }

    /// Returns false (and clamps) when the cap is already reached
    pub fn add_strike(&mut self) -> bool {
        if self.strikes >= self.max_strikes {
            self.strikes = self.max_strikes;
            self.sync_state_with_strikes();
            return false;
        }
        self.strikes += 1;
        self.sync_state_with_strikes();
        true
    }

    /// Returns false when there is no strike to remove
    pub fn remove_strike(&mut self) -> bool {
        if self.strikes <= 0 {
            return false;
        }
        self.strikes -= 1;
        self.sync_state_with_strikes();
        true
    }

    pub fn strikes_remaining(&self) -> i16 {
        (self.max_strikes - self.strikes).max(0)
    }

    /// Share of planned visits already realized, 0..=100
    pub fn progress_percent(&self, completed_visits: i64) -> i32 {
        if self.planned_visits <= 0 {
            return 0;
        }
        let pct = (completed_visits as f64 / self.planned_visits as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as i32
    }

    pub fn can_finalize(&self, completed_visits: i64) -> bool {
        self.state.is_open() && self.progress_percent(completed_visits) >= 100 && self.strikes == 0
    }

    /// Move to Completed when every planned visit is done and no strike is
    /// left. Returns false and leaves the state unchanged otherwise.
    pub fn finalize_followup(&mut self, completed_visits: i64) -> bool {
        if !self.can_finalize(completed_visits) {
            return false;
        }
        self.state = AdoptionState::Completed;
        true
    }

    /// Apply the consequences of a freshly realized visit.
    ///
    /// `completed_visits` must already include the visit being recorded.
    pub fn apply_visit_outcome(
        &mut self,
        outcome: VisitOutcome,
        sequence_number: i32,
        completed_visits: i64,
    ) -> OutcomeEffects {
        let mut effects = OutcomeEffects::default();
        match outcome {
            VisitOutcome::Problematic => effects.strike_added = self.add_strike(),
            VisitOutcome::Successful if self.strikes > 0 => {
                effects.strike_removed = self.remove_strike()
            }
            _ => {}
        }
        if sequence_number == self.planned_visits {
            effects.completed = self.finalize_followup(completed_visits);
        }
        effects
    }

    /// End the contract early (pet returned or adoption cancelled)
    pub fn close(&mut self, to: AdoptionState) -> AppResult<()> {
        if !matches!(to, AdoptionState::Returned | AdoptionState::Cancelled) {
            return Err(AppError::Validation(
                "An adoption can only be closed as returned or cancelled".to_string(),
            ));
        }
        if !self.state.is_open() {
            return Err(AppError::invalid_transition("Adoption", self.state, to));
        }
        self.state = to;
        Ok(())
    }

    /// Start over as a fresh contract when its request is approved again
    pub fn reopen(&mut self, today: NaiveDate) {
        self.adoption_date = today;
        self.followup_start = None;
        self.followup_end = None;
        self.state = AdoptionState::Active;
        self.strikes = 0;
        self.max_strikes = MAX_STRIKES;
        self.planned_visits = 0;
    }
}

/// Adoption joined with the pet, shelter and adopter it belongs to
#[derive(Debug, Clone, FromRow)]
pub struct AdoptionContext {
    #[sqlx(flatten)]
    pub adoption: Adoption,
    pub pet_id: i32,
    pub pet_name: String,
    pub shelter_id: i32,
    pub adopter_id: i32,
    pub adopter_name: String,
}

/// Adoption with its visits and derived follow-up figures
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdoptionDetails {
    #[serde(flatten)]
    pub adoption: Adoption,
    pub pet_id: i32,
    pub pet_name: String,
    pub shelter_id: i32,
    pub adopter_id: i32,
    pub adopter_name: String,
    pub completed_visits: i64,
    pub progress_percent: i32,
    pub window_active: bool,
    pub strikes_remaining: i16,
    /// Earliest scheduled date among pending visits
    pub next_visit: Option<NaiveDate>,
    pub visits: Vec<VisitView>,
}

impl AdoptionDetails {
    pub fn build(ctx: AdoptionContext, visits: Vec<Visit>, today: NaiveDate) -> Self {
        let completed_visits = visits.iter().filter(|v| v.realized_date.is_some()).count() as i64;
        let next_visit = visits
            .iter()
            .filter(|v| v.outcome == VisitOutcome::Pending)
            .map(|v| v.scheduled_date)
            .min();
        let adoption = ctx.adoption;

        Self {
            completed_visits,
            progress_percent: adoption.progress_percent(completed_visits),
            window_active: adoption.window_active(today),
            strikes_remaining: adoption.strikes_remaining(),
            next_visit,
            visits: visits.into_iter().map(|v| VisitView::new(v, today)).collect(),
            pet_id: ctx.pet_id,
            pet_name: ctx.pet_name,
            shelter_id: ctx.shelter_id,
            adopter_id: ctx.adopter_id,
            adopter_name: ctx.adopter_name,
            adoption,
        }
    }
}

/// Result of a manual strike change
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StrikeChange {
    /// False when the call was a no-op (cap reached, nothing to remove)
    pub applied: bool,
    pub strikes: i16,
    pub strikes_remaining: i16,
    pub state: AdoptionState,
}

impl StrikeChange {
    pub fn new(applied: bool, adoption: &Adoption) -> Self {
        Self {
            applied,
            strikes: adoption.strikes,
            strikes_remaining: adoption.strikes_remaining(),
            state: adoption.state,
        }
    }
}

/// Start follow-up request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StartFollowup {
    /// Window length in days (server default when omitted)
    pub days: Option<i64>,
}

/// Close adoption request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct CloseAdoption {
    /// `returned` or `cancelled`
    pub state: AdoptionState,
}

/// Contract update request body; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateContract {
    pub signed: Option<bool>,
    /// Free-text notes about the contract, replaced as a whole
    pub notes: Option<String>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn adoption() -> Adoption {
        Adoption {
            id: 1,
            request_id: 1,
            adoption_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            followup_start: None,
            followup_end: None,
            state: AdoptionState::Active,
            strikes: 0,
            max_strikes: MAX_STRIKES,
            planned_visits: 0,
            contract_signed: false,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_start_followup_sets_window_once() {
        let mut a = adoption();
        assert!(a.start_followup(day(1), 30).unwrap());
        assert_eq!(a.window(), Some((day(1), NaiveDate::from_ymd_opt(2026, 3, 31).unwrap())));

        assert!(!a.start_followup(day(10), 5).unwrap());
        assert_eq!(a.followup_start, Some(day(1)));
    }

    #[test]
    fn test_start_followup_rejects_out_of_range_days() {
        let mut a = adoption();
        for days in [-1, MAX_FOLLOWUP_DAYS + 1, 1_000_000_000, i64::MAX] {
            assert!(
                matches!(a.start_followup(day(1), days), Err(AppError::Validation(_))),
                "days {}",
                days
            );
            assert_eq!(a.window(), None);
        }

        assert!(a.start_followup(day(1), MAX_FOLLOWUP_DAYS).unwrap());
        assert_eq!(a.followup_end, Some(day(1) + Duration::days(MAX_FOLLOWUP_DAYS)));
    }

    #[test]
    fn test_update_contract_only_touches_given_fields() {
        let mut a = adoption();
        let sign = UpdateContract {
            signed: Some(true),
            ..Default::default()
        };
        assert!(a.update_contract(&sign));
        assert!(!a.update_contract(&sign));

        let notes = UpdateContract {
            notes: Some("  Copy kept at the front desk ".to_string()),
            ..Default::default()
        };
        assert!(a.update_contract(&notes));
        assert!(a.contract_signed);
        assert_eq!(a.notes, "Copy kept at the front desk");
        assert!(!a.update_contract(&UpdateContract::default()));
    }

    #[test]
    fn test_window_active_bounds() {
        let mut a = adoption();
        assert!(!a.window_active(day(1)));
        a.start_followup(day(5), 10).unwrap();
        assert!(!a.window_active(day(4)));
        assert!(a.window_active(day(5)));
        assert!(a.window_active(day(15)));
        assert!(!a.window_active(day(16)));
    }

    #[test]
    fn test_check_in_window() {
        let mut a = adoption();
        assert!(matches!(a.check_in_window(day(2)), Err(AppError::WindowNotActive(1))));
        a.start_followup(day(5), 10).unwrap();
        assert!(a.check_in_window(day(5)).is_ok());
        assert!(matches!(
            a.check_in_window(day(16)),
            Err(AppError::DateOutOfWindow { .. })
        ));
    }

    #[test]
    fn test_add_strike_clamps_at_cap() {
        let mut a = adoption();
        let mut results = Vec::new();
        for _ in 0..4 {
            results.push((a.add_strike(), a.strikes_remaining()));
        }
        assert_eq!(results, vec![(true, 2), (true, 1), (true, 0), (false, 0)]);
        assert_eq!(a.strikes, 3);
        assert_eq!(a.state, AdoptionState::Alert);
    }

    #[test]
    fn test_remove_strike_back_to_active() {
        let mut a = adoption();
        assert!(!a.remove_strike());
        a.add_strike();
        assert_eq!(a.state, AdoptionState::Alert);
        assert!(a.remove_strike());
        assert_eq!(a.state, AdoptionState::Active);
    }

    #[test]
    fn test_strikes_do_not_reopen_closed_adoption() {
        let mut a = adoption();
        a.state = AdoptionState::Completed;
        a.add_strike();
        assert_eq!(a.state, AdoptionState::Completed);
    }

    #[test]
    fn test_progress_rounds_and_caps() {
        let mut a = adoption();
        assert_eq!(a.progress_percent(0), 0);
        a.planned_visits = 3;
        assert_eq!(a.progress_percent(1), 33);
        assert_eq!(a.progress_percent(2), 67);
        assert_eq!(a.progress_percent(3), 100);
        assert_eq!(a.progress_percent(5), 100);
    }

    #[test]
    fn test_finalize_requires_full_progress_and_no_strikes() {
        let mut a = adoption();
        a.planned_visits = 2;
        assert!(!a.finalize_followup(1));
        a.add_strike();
        assert!(!a.finalize_followup(2));
        assert_eq!(a.state, AdoptionState::Alert);
        a.remove_strike();
        assert!(a.finalize_followup(2));
        assert_eq!(a.state, AdoptionState::Completed);
    }

    #[test]
    fn test_outcome_chain_problematic_then_successful_completes() {
        let mut a = adoption();
        a.start_followup(day(1), 30).unwrap();
        a.planned_visits = 2;

        let first = a.apply_visit_outcome(VisitOutcome::Problematic, 1, 1);
        assert!(first.strike_added && !first.completed);
        assert_eq!((a.strikes, a.state), (1, AdoptionState::Alert));

        let second = a.apply_visit_outcome(VisitOutcome::Successful, 2, 2);
        assert!(second.strike_removed && second.completed);
        assert_eq!((a.strikes, a.state), (0, AdoptionState::Completed));
    }

    #[test]
    fn test_needs_attention_has_no_strike_effect() {
        let mut a = adoption();
        a.planned_visits = 2;
        a.add_strike();
        let effects = a.apply_visit_outcome(VisitOutcome::NeedsAttention, 1, 1);
        assert_eq!(effects, OutcomeEffects::default());
        assert_eq!(a.strikes, 1);
    }

    #[test]
    fn test_close_only_from_open_states() {
        let mut a = adoption();
        assert!(a.close(AdoptionState::Alert).is_err());
        a.close(AdoptionState::Returned).unwrap();
        assert!(matches!(
            a.close(AdoptionState::Cancelled),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut a = adoption();
        a.followup_start = Some(day(10));
        a.followup_end = Some(day(9));
        assert!(a.validate().is_err());
        a.followup_end = None;
        assert!(a.validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_strikes_stay_bounded_and_alert_tracks_strikes(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut a = adoption();
            for add in ops {
                if add { a.add_strike(); } else { a.remove_strike(); }
                prop_assert!(a.strikes >= 0 && a.strikes <= a.max_strikes);
                prop_assert!(a.max_strikes <= MAX_STRIKES);
                prop_assert!(a.state.is_open());
                prop_assert_eq!(a.state == AdoptionState::Alert, a.strikes > 0);
                prop_assert!(a.validate().is_ok());
            }
        }
    }
}
