//! Adoption request arbitration
//!
//! Every operation locks the pet row first, then the request row, inside
//! one transaction. Concurrent approvals on the same pet are serialized on
//! the pet lock; the loser finds its request rejected or the pet reserved.

use sqlx::{PgConnection, Postgres, Transaction};
use validator::Validate;

use super::{campaigns::KpiAccumulator, events::EventPublisher, today};
use crate::{
    error::{AppError, AppResult},
    models::{
        adoption::Adoption,
        adoption_request::{
            AdoptionRequest, ApprovalOutcome, RequestDetails, SubmitRequest, AUTO_REJECT_REASON,
        },
        campaign::KpiEvent,
        enums::{AdoptionState, PetState, UserRole},
        notification::{DomainEvent, RequestRef},
        pet::Pet,
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
    kpi: KpiAccumulator,
    events: EventPublisher,
}

impl RequestsService {
    pub fn new(repository: Repository, kpi: KpiAccumulator, events: EventPublisher) -> Self {
        Self {
            repository,
            kpi,
            events,
        }
    }

    /// Request visible to its adopter and to the shelter owning the pet
    pub async fn get(&self, claims: &UserClaims, id: i32) -> AppResult<RequestDetails> {
        let details = self.repository.requests.get_details(&self.repository.pool, id).await?;
        if claims.user_id != details.adopter_id {
            claims.require_shelter_owner(details.shelter_id)?;
        }
        Ok(details)
    }

    /// Own requests for adopters, requests on their pets for shelters
    pub async fn list(&self, claims: &UserClaims) -> AppResult<Vec<RequestDetails>> {
        match claims.role {
            UserRole::Adopter => self.repository.requests.list_for_adopter(claims.user_id).await,
            UserRole::Shelter => {
                let shelter_id = claims.require_shelter()?;
                self.repository.requests.list_for_shelter(shelter_id).await
            }
        }
    }

    pub async fn submit(&self, claims: &UserClaims, submission: SubmitRequest) -> AppResult<RequestDetails> {
        claims.require_adopter()?;
        submission.validate()?;

        let mut tx = self.repository.pool.begin().await?;
        let pet = self.repository.pets.lock(&mut tx, submission.pet_id).await?;
        if !pet.is_available() {
            return Err(AppError::PetUnavailable(pet.id));
        }
        if self
            .repository
            .requests
            .has_active(&mut tx, claims.user_id, pet.id)
            .await?
        {
            return Err(AppError::DuplicateActiveRequest { pet_id: pet.id });
        }
        let request = self
            .repository
            .requests
            .insert(&mut tx, claims.user_id, pet.id, submission.message.trim())
            .await?;
        let details = self.repository.requests.get_details(&mut *tx, request.id).await?;
        tx.commit().await?;

        tracing::info!(request_id = request.id, pet_id = pet.id, adopter_id = claims.user_id, "Adoption request submitted");
        self.events
            .publish_all(vec![DomainEvent::RequestCreated(RequestRef::from(&details))])
            .await;
        Ok(details)
    }

    /// Approve a request: reserve the pet, reject competing requests and
    /// open (or reopen) the adoption contract
    pub async fn approve(&self, claims: &UserClaims, id: i32) -> AppResult<ApprovalOutcome> {
        let mut tx = self.repository.pool.begin().await?;
        let (mut pet, mut request) = self.lock_for_shelter(&mut tx, claims, id).await?;

        request.approve()?;
        if !pet.is_available() {
            return Err(AppError::PetUnavailable(pet.id));
        }
        pet.transition(PetState::Reserved)?;
        self.repository.pets.update_state(&mut tx, pet.id, pet.state).await?;
        self.repository.requests.save_state(&mut tx, &request).await?;

        let rejected_ids = self
            .repository
            .requests
            .reject_competitors(&mut tx, pet.id, request.id, AUTO_REJECT_REASON)
            .await?;

        let adoption = self.open_adoption(&mut tx, request.id).await?;
        self.kpi
            .record(
                &mut tx,
                KpiEvent::AdoptionCreated {
                    shelter_id: pet.shelter_id,
                    date: adoption.adoption_date,
                },
            )
            .await?;

        let details = self.repository.requests.get_details(&mut *tx, request.id).await?;
        let rejected = self
            .repository
            .requests
            .get_many_details(&mut tx, &rejected_ids)
            .await?;
        tx.commit().await?;

        tracing::info!(
            request_id = id,
            pet_id = pet.id,
            adoption_id = adoption.id,
            auto_rejected = rejected_ids.len(),
            "Adoption request approved"
        );

        let mut events = vec![DomainEvent::RequestApproved {
            request: RequestRef::from(&details),
            adoption_id: adoption.id,
        }];
        events.extend(rejected.iter().map(|r| DomainEvent::RequestRejected {
            request: RequestRef::from(r),
            reason: AUTO_REJECT_REASON.to_string(),
        }));
        self.events.publish_all(events).await;

        Ok(ApprovalOutcome {
            request: details,
            adoption_id: adoption.id,
            rejected_request_ids: rejected_ids,
        })
    }

    pub async fn reject(&self, claims: &UserClaims, id: i32, reason: &str) -> AppResult<RequestDetails> {
        let mut tx = self.repository.pool.begin().await?;
        let (mut pet, mut request) = self.lock_for_shelter(&mut tx, claims, id).await?;

        let was_approved = request.reject(reason)?;
        self.repository.requests.save_state(&mut tx, &request).await?;
        if was_approved {
            self.revoke_approval(&mut tx, &mut pet, request.id).await?;
        }
        let details = self.repository.requests.get_details(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(request_id = id, was_approved, "Adoption request rejected");
        self.events
            .publish_all(vec![DomainEvent::RequestRejected {
                request: RequestRef::from(&details),
                reason: details.rejection_reason.clone(),
            }])
            .await;
        Ok(details)
    }

    /// Withdrawn by its adopter while still undecided
    pub async fn cancel(&self, claims: &UserClaims, id: i32) -> AppResult<RequestDetails> {
        claims.require_adopter()?;
        let mut tx = self.repository.pool.begin().await?;
        let (_, mut request) = self.lock_pet_and_request(&mut tx, id).await?;
        claims.require_user(request.adopter_id)?;

        request.cancel()?;
        self.repository.requests.save_state(&mut tx, &request).await?;
        let details = self.repository.requests.get_details(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(request_id = id, "Adoption request cancelled");
        Ok(details)
    }

    /// Administrative override back to Pending
    pub async fn reset_to_pending(&self, claims: &UserClaims, id: i32) -> AppResult<RequestDetails> {
        let mut tx = self.repository.pool.begin().await?;
        let (mut pet, mut request) = self.lock_for_shelter(&mut tx, claims, id).await?;

        let was_approved = request.reset_to_pending();
        self.repository.requests.save_state(&mut tx, &request).await?;
        if was_approved {
            self.revoke_approval(&mut tx, &mut pet, request.id).await?;
        }
        let details = self.repository.requests.get_details(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(request_id = id, was_approved, "Adoption request reset to pending");
        Ok(details)
    }

    pub async fn start_review(&self, claims: &UserClaims, id: i32) -> AppResult<RequestDetails> {
        let mut tx = self.repository.pool.begin().await?;
        let (_, mut request) = self.lock_for_shelter(&mut tx, claims, id).await?;

        request.start_review()?;
        self.repository.requests.save_state(&mut tx, &request).await?;
        let details = self.repository.requests.get_details(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(request_id = id, "Adoption request under review");
        Ok(details)
    }

    async fn lock_pet_and_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<(Pet, AdoptionRequest)> {
        let pet_id = self.repository.requests.get_pet_id(id).await?;
        let pet = self.repository.pets.lock(tx, pet_id).await?;
        let request = self.repository.requests.lock(tx, id).await?;
        Ok((pet, request))
    }

    async fn lock_for_shelter(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        claims: &UserClaims,
        id: i32,
    ) -> AppResult<(Pet, AdoptionRequest)> {
        let (pet, request) = self.lock_pet_and_request(tx, id).await?;
        claims.require_shelter_owner(pet.shelter_id)?;
        Ok((pet, request))
    }

    /// Fresh adoption for the request, reusing the record of an earlier approval
    async fn open_adoption(&self, conn: &mut PgConnection, request_id: i32) -> AppResult<Adoption> {
        let today = today();
        match self.repository.adoptions.lock_by_request(conn, request_id).await? {
            Some(mut adoption) => {
                let removed = self.repository.visits.delete_for_adoption(conn, adoption.id).await?;
                adoption.reopen(today);
                self.repository.adoptions.save(conn, &adoption).await?;
                tracing::info!(adoption_id = adoption.id, removed_visits = removed, "Adoption reopened");
                Ok(adoption)
            }
            None => self.repository.adoptions.insert(conn, request_id, today).await,
        }
    }

    /// Release the pet and cancel the running adoption of a formerly approved request
    async fn revoke_approval(&self, conn: &mut PgConnection, pet: &mut Pet, request_id: i32) -> AppResult<()> {
        if pet.transition(PetState::Available)? {
            self.repository.pets.update_state(conn, pet.id, pet.state).await?;
        }
        if let Some(mut adoption) = self.repository.adoptions.lock_by_request(conn, request_id).await? {
            if adoption.state.is_open() {
                adoption.close(AdoptionState::Cancelled)?;
                self.repository.adoptions.save(conn, &adoption).await?;
                tracing::info!(adoption_id = adoption.id, "Adoption cancelled after approval was revoked");
            }
        }
        Ok(())
    }
}
