//! Visit scheduling and outcome processing

use super::{events::EventPublisher, today};
use crate::{
    error::{AppError, AppResult},
    models::{
        adoption::OutcomeEffects,
        notification::DomainEvent,
        user::UserClaims,
        visit::{next_sequence_number, OutcomeReport, Visit, VisitResult, VisitView},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct VisitsService {
    repository: Repository,
    events: EventPublisher,
}

impl VisitsService {
    pub fn new(repository: Repository, events: EventPublisher) -> Self {
        Self { repository, events }
    }

    /// Visits of an adoption with their overdue flag
    pub async fn list(&self, claims: &UserClaims, adoption_id: i32) -> AppResult<Vec<VisitView>> {
        let ctx = self.repository.adoptions.get_context(adoption_id).await?;
        if claims.user_id != ctx.adopter_id {
            claims.require_shelter_owner(ctx.shelter_id)?;
        }
        let today = today();
        let visits = self
            .repository
            .visits
            .list_for_adoption(&self.repository.pool, adoption_id)
            .await?;
        Ok(visits.into_iter().map(|v| VisitView::new(v, today)).collect())
    }

    /// Append a visit inside the active follow-up window
    pub async fn schedule(
        &self,
        claims: &UserClaims,
        adoption_id: i32,
        scheduled_date: chrono::NaiveDate,
    ) -> AppResult<Visit> {
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.repository.adoptions.lock_context(&mut tx, adoption_id).await?;
        claims.require_shelter_owner(ctx.shelter_id)?;

        if !ctx.adoption.window_active(today()) {
            return Err(AppError::WindowNotActive(adoption_id));
        }
        ctx.adoption.check_in_window(scheduled_date)?;

        let count = self.repository.visits.count(&mut tx, adoption_id).await?;
        let sequence_number = next_sequence_number(count);
        let visit = self
            .repository
            .visits
            .insert(&mut tx, adoption_id, sequence_number, scheduled_date)
            .await?;
        ctx.adoption.planned_visits = sequence_number;
        self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
        tx.commit().await?;

        tracing::info!(
            adoption_id,
            visit_id = visit.id,
            sequence_number,
            %scheduled_date,
            "Visit scheduled"
        );
        self.events
            .publish_all(vec![DomainEvent::VisitScheduled {
                visit_id: visit.id,
                adoption_id,
                sequence_number,
                scheduled_date,
                pet_name: ctx.pet_name,
                adopter_id: ctx.adopter_id,
            }])
            .await;
        Ok(visit)
    }

    /// Remove a visit and renumber the ones after it
    pub async fn delete(&self, claims: &UserClaims, visit_id: i32) -> AppResult<()> {
        let adoption_id = self.repository.visits.get_adoption_id(visit_id).await?;
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.repository.adoptions.lock_context(&mut tx, adoption_id).await?;
        claims.require_shelter_owner(ctx.shelter_id)?;

        let visit = self.repository.visits.lock(&mut tx, visit_id).await?;
        self.repository.visits.delete_and_renumber(&mut tx, &visit).await?;
        ctx.adoption.planned_visits = self.repository.visits.count(&mut tx, adoption_id).await? as i32;
        self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
        tx.commit().await?;

        tracing::info!(
            adoption_id,
            visit_id,
            planned_visits = ctx.adoption.planned_visits,
            "Visit deleted"
        );
        Ok(())
    }

    /// Record the outcome of a visit and apply its strike and completion effects.
    /// A visit that already has a realized date is left untouched.
    pub async fn record_outcome(
        &self,
        claims: &UserClaims,
        visit_id: i32,
        report: OutcomeReport,
    ) -> AppResult<VisitResult> {
        let adoption_id = self.repository.visits.get_adoption_id(visit_id).await?;
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.repository.adoptions.lock_context(&mut tx, adoption_id).await?;
        claims.require_shelter_owner(ctx.shelter_id)?;
        let mut visit = self.repository.visits.lock(&mut tx, visit_id).await?;

        let Some(outcome) = visit.record(&report, claims.user_id, today())? else {
            tx.commit().await?;
            return Ok(VisitResult {
                visit,
                applied: false,
                effects: OutcomeEffects::default(),
                adoption_state: ctx.adoption.state,
                strikes: ctx.adoption.strikes,
            });
        };

        self.repository.visits.save_outcome(&mut tx, &visit).await?;
        let completed = self.repository.visits.count_realized(&mut tx, adoption_id).await?;
        let effects = ctx
            .adoption
            .apply_visit_outcome(outcome, visit.sequence_number, completed);
        self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
        tx.commit().await?;

        tracing::info!(
            adoption_id,
            visit_id,
            outcome = %outcome,
            strikes = ctx.adoption.strikes,
            state = %ctx.adoption.state,
            completed = effects.completed,
            "Visit outcome recorded"
        );
        Ok(VisitResult {
            visit,
            applied: true,
            effects,
            adoption_state: ctx.adoption.state,
            strikes: ctx.adoption.strikes,
        })
    }

    /// Flag a visit as missed, adding one strike the first time
    pub async fn mark_not_performed(&self, claims: &UserClaims, visit_id: i32) -> AppResult<VisitResult> {
        let adoption_id = self.repository.visits.get_adoption_id(visit_id).await?;
        let mut tx = self.repository.pool.begin().await?;
        let mut ctx = self.repository.adoptions.lock_context(&mut tx, adoption_id).await?;
        claims.require_shelter_owner(ctx.shelter_id)?;
        let mut visit = self.repository.visits.lock(&mut tx, visit_id).await?;

        let mut effects = OutcomeEffects::default();
        let applied = visit.mark_not_performed();
        if applied {
            self.repository.visits.save_outcome(&mut tx, &visit).await?;
            effects.strike_added = ctx.adoption.add_strike();
            self.repository.adoptions.save(&mut tx, &ctx.adoption).await?;
        }
        tx.commit().await?;

        if applied {
            tracing::info!(
                adoption_id,
                visit_id,
                strikes = ctx.adoption.strikes,
                state = %ctx.adoption.state,
                "Visit marked not performed"
            );
        }
        Ok(VisitResult {
            visit,
            applied,
            effects,
            adoption_state: ctx.adoption.state,
            strikes: ctx.adoption.strikes,
        })
    }
}
