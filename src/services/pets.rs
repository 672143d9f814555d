//! Pet lifecycle service

use super::{campaigns::KpiAccumulator, today};
use crate::{
    error::AppResult,
    models::{
        campaign::KpiEvent,
        enums::PetState,
        pet::{CreatePet, Pet},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct PetsService {
    repository: Repository,
    kpi: KpiAccumulator,
}

impl PetsService {
    pub fn new(repository: Repository, kpi: KpiAccumulator) -> Self {
        Self { repository, kpi }
    }

    pub async fn create(&self, claims: &UserClaims, pet: CreatePet) -> AppResult<Pet> {
        let shelter_id = claims.require_shelter()?;
        pet.check()?;
        let created = self.repository.pets.create(shelter_id, &pet).await?;
        tracing::info!(pet_id = created.id, shelter_id, state = %created.state, "Pet created");
        Ok(created)
    }

    pub async fn get(&self, id: i32) -> AppResult<Pet> {
        self.repository.pets.get_by_id(id).await
    }

    pub async fn list_by_shelter(&self, shelter_id: i32) -> AppResult<Vec<Pet>> {
        self.repository.pets.list_by_shelter(shelter_id).await
    }

    pub async fn publish(&self, claims: &UserClaims, id: i32) -> AppResult<Pet> {
        self.transition(claims, id, PetState::Available).await
    }

    pub async fn withdraw(&self, claims: &UserClaims, id: i32) -> AppResult<Pet> {
        self.transition(claims, id, PetState::Draft).await
    }

    /// Move to Adopted; counts toward the shelter's adoption campaigns
    pub async fn mark_adopted(&self, claims: &UserClaims, id: i32) -> AppResult<Pet> {
        self.transition(claims, id, PetState::Adopted).await
    }

    async fn transition(&self, claims: &UserClaims, id: i32, to: PetState) -> AppResult<Pet> {
        let mut tx = self.repository.pool.begin().await?;
        let mut pet = self.repository.pets.lock(&mut tx, id).await?;
        claims.require_shelter_owner(pet.shelter_id)?;

        let from = pet.state;
        if pet.transition(to)? {
            self.repository.pets.update_state(&mut tx, id, to).await?;
            if to == PetState::Adopted {
                self.kpi
                    .record(
                        &mut tx,
                        KpiEvent::PetAdopted {
                            shelter_id: pet.shelter_id,
                            date: today(),
                        },
                    )
                    .await?;
            }
            tracing::info!(pet_id = id, from = %from, to = %to, "Pet state changed");
        }
        tx.commit().await?;
        Ok(pet)
    }
}
