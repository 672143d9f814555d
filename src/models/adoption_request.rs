//! Adoption request model and arbitration guards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::RequestState;
use crate::error::{AppError, AppResult};

/// Reason stored on requests rejected because another one was approved
pub const AUTO_REJECT_REASON: &str = "pet already assigned to another adopter";

impl RequestState {
    /// Counts toward the one-active-request-per-(adopter, pet) rule
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            RequestState::Pending | RequestState::InReview | RequestState::Approved
        )
    }

    /// Still awaiting a shelter decision
    pub fn is_open(&self) -> bool {
        matches!(self, RequestState::Pending | RequestState::InReview)
    }
}

/// Adoption request record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdoptionRequest {
    pub id: i32,
    pub adopter_id: i32,
    pub pet_id: i32,
    pub state: RequestState,
    pub message: String,
    /// Empty unless rejected
    pub rejection_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdoptionRequest {
    pub fn approve(&mut self) -> AppResult<()> {
        if !self.state.is_open() {
            return Err(AppError::invalid_transition(
                "Adoption request",
                self.state,
                RequestState::Approved,
            ));
        }
        self.state = RequestState::Approved;
        self.rejection_reason.clear();
        Ok(())
    }

    /// Reject with a reason. Returns whether the request had been approved,
    /// in which case the caller must release the pet.
    pub fn reject(&mut self, reason: &str) -> AppResult<bool> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A rejection reason is required".to_string()));
        }
        if !self.state.is_active() {
            return Err(AppError::invalid_transition(
                "Adoption request",
                self.state,
                RequestState::Rejected,
            ));
        }
        let was_approved = self.state == RequestState::Approved;
        self.state = RequestState::Rejected;
        self.rejection_reason = reason.to_string();
        Ok(was_approved)
    }

    pub fn cancel(&mut self) -> AppResult<()> {
        if !self.state.is_open() {
            return Err(AppError::InvalidState(
                "Only pending or in-review requests can be cancelled".to_string(),
            ));
        }
        self.state = RequestState::Cancelled;
        Ok(())
    }

    /// Administrative override back to Pending. Returns whether the request
    /// had been approved.
    pub fn reset_to_pending(&mut self) -> bool {
        let was_approved = self.state == RequestState::Approved;
        self.state = RequestState::Pending;
        self.rejection_reason.clear();
        was_approved
    }

    pub fn start_review(&mut self) -> AppResult<()> {
        if self.state != RequestState::Pending {
            return Err(AppError::invalid_transition(
                "Adoption request",
                self.state,
                RequestState::InReview,
            ));
        }
        self.state = RequestState::InReview;
        Ok(())
    }
}

/// Request joined with the names notifications and listings need
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RequestDetails {
    pub id: i32,
    pub adopter_id: i32,
    pub adopter_name: String,
    pub pet_id: i32,
    pub pet_name: String,
    pub shelter_id: i32,
    /// User account owning the shelter
    pub shelter_user_id: i32,
    pub state: RequestState,
    pub message: String,
    pub rejection_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submit request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitRequest {
    pub pet_id: i32,
    #[validate(length(min = 1, message = "A message to the shelter is required"))]
    pub message: String,
}

/// Result of an approval
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApprovalOutcome {
    pub request: RequestDetails,
    pub adoption_id: i32,
    /// Competing requests rejected by this approval
    pub rejected_request_ids: Vec<i32>,
}

/// Reject request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectRequest {
    pub reason: String,
}
