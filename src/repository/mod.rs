//! Repository layer for database operations
//!
//! Read helpers run on the pool. Methods taking a `&mut PgConnection` are
//! meant to be called inside a transaction opened by the service layer.

pub mod adoptions;
pub mod campaigns;
pub mod notifications;
pub mod pets;
pub mod requests;
pub mod visits;

use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub pets: pets::PetsRepository,
    pub requests: requests::RequestsRepository,
    pub adoptions: adoptions::AdoptionsRepository,
    pub visits: visits::VisitsRepository,
    pub campaigns: campaigns::CampaignsRepository,
    pub notifications: notifications::NotificationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pets: pets::PetsRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            adoptions: adoptions::AdoptionsRepository::new(pool.clone()),
            visits: visits::VisitsRepository::new(pool.clone()),
            campaigns: campaigns::CampaignsRepository::new(pool.clone()),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map a unique violation on `constraint` to `err`, pass anything else through
pub(crate) fn map_unique_violation(e: sqlx::Error, constraint: &str, err: AppError) -> AppError {
    let hit = e
        .as_database_error()
        .map(|db| db.is_unique_violation() && db.constraint() == Some(constraint))
        .unwrap_or(false);
    if hit {
        err
    } else {
        AppError::Database(e)
    }
}
