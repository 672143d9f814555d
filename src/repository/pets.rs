//! Pets repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::PetState,
        pet::{CreatePet, Pet},
    },
};

#[derive(Clone)]
pub struct PetsRepository {
    pool: Pool<Postgres>,
}

impl PetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get pet by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Pet> {
        sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet with id {} not found", id)))
    }

    /// Pets of a shelter, newest first
    pub async fn list_by_shelter(&self, shelter_id: i32) -> AppResult<Vec<Pet>> {
        let pets = sqlx::query_as::<_, Pet>(
            "SELECT * FROM pets WHERE shelter_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(shelter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pets)
    }

    pub async fn create(&self, shelter_id: i32, pet: &CreatePet) -> AppResult<Pet> {
        let created = sqlx::query_as::<_, Pet>(
            r#"
            INSERT INTO pets (shelter_id, name, species, description, state)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(shelter_id)
        .bind(pet.name.trim())
        .bind(pet.species.trim())
        .bind(pet.description.trim())
        .bind(pet.initial_state())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Lock the pet row for the rest of the transaction
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Pet> {
        sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet with id {} not found", id)))
    }

    pub async fn update_state(
        &self,
        conn: &mut PgConnection,
        id: i32,
        state: PetState,
    ) -> AppResult<()> {
        sqlx::query("UPDATE pets SET state = $1, updated_at = NOW() WHERE id = $2")
            .bind(state)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
