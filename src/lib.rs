//! Pawtrack Shelter Adoption Server
//!
//! Manages the adoption lifecycle of shelter pets: arbitration of adoption
//! requests, post-adoption follow-up visits with a strike-based probation,
//! and campaign KPIs fed by adoption events.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub repository: repository::Repository,
}
