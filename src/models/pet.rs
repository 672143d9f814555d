//! Pet model and availability state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::PetState;
use crate::error::{AppError, AppResult};

impl PetState {
    /// States reachable in one step from `self`
    pub fn allowed_transitions(&self) -> &'static [PetState] {
        match self {
            PetState::Draft => &[PetState::Available],
            PetState::Available => &[PetState::Reserved, PetState::Adopted, PetState::Draft],
            PetState::Reserved => &[PetState::Available, PetState::Adopted],
            PetState::Adopted => &[],
        }
    }

    pub fn can_transition_to(&self, to: PetState) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Adopted has no outbound transitions
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Pet record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Pet {
    pub id: i32,
    /// Owning shelter
    pub shelter_id: i32,
    pub name: String,
    pub species: String,
    pub description: String,
    pub state: PetState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    /// Validate and apply a state change.
    ///
    /// Returns `Ok(false)` when `to` equals the current state so callers can
    /// skip the write; any move outside the whitelist is an error.
    pub fn transition(&mut self, to: PetState) -> AppResult<bool> {
        if self.state == to {
            return Ok(false);
        }
        if !self.state.can_transition_to(to) {
            return Err(AppError::invalid_transition("Pet", self.state, to));
        }
        self.state = to;
        Ok(true)
    }

    pub fn is_available(&self) -> bool {
        self.state == PetState::Available
    }
}

/// Create pet request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePet {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,
    /// Publish immediately (Available) instead of keeping a Draft
    #[serde(default)]
    pub publish: bool,
}

impl CreatePet {
    /// Validate, treating whitespace-only text as empty
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name: Name must not be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation(
                "description: Description must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn initial_state(&self) -> PetState {
        if self.publish {
            PetState::Available
        } else {
            PetState::Draft
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pet(state: PetState) -> Pet {
        Pet {
            id: 1,
            shelter_id: 1,
            name: "Luna".to_string(),
            species: "dog".to_string(),
            description: "Friendly".to_string(),
            state,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_whitelist() {
        assert!(PetState::Draft.can_transition_to(PetState::Available));
        assert!(!PetState::Draft.can_transition_to(PetState::Reserved));
        assert!(PetState::Available.can_transition_to(PetState::Draft));
        assert!(PetState::Reserved.can_transition_to(PetState::Adopted));
        assert!(!PetState::Reserved.can_transition_to(PetState::Draft));
        assert!(PetState::Adopted.is_terminal());
    }

    #[test]
    fn test_invalid_transition_names_both_states() {
        let mut p = pet(PetState::Draft);
        let err = p.transition(PetState::Adopted).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("draft") && msg.contains("adopted"), "{}", msg);
        assert_eq!(p.state, PetState::Draft);
    }

    #[test]
    fn test_blank_name_rejected() {
        let req = CreatePet {
            name: "   ".to_string(),
            species: String::new(),
            description: "Friendly".to_string(),
            publish: false,
        };
        assert!(matches!(req.check(), Err(AppError::Validation(_))));
        assert_eq!(req.initial_state(), PetState::Draft);
    }

    #[test]
    fn test_same_state_is_noop() {
        let mut p = pet(PetState::Available);
        assert!(!p.transition(PetState::Available).unwrap());
    }

    proptest! {
        #[test]
        fn prop_adopted_is_absorbing(targets in proptest::collection::vec(0usize..4, 0..32)) {
            let mut p = pet(PetState::Available);
            p.transition(PetState::Adopted).unwrap();
            for idx in targets {
                let _ = p.transition(PetState::ALL[idx]);
                prop_assert_eq!(p.state, PetState::Adopted);
            }
        }

        #[test]
        fn prop_every_applied_move_is_whitelisted(targets in proptest::collection::vec(0usize..4, 0..32)) {
            let mut p = pet(PetState::Draft);
            for idx in targets {
                let before = p.state;
                let to = PetState::ALL[idx];
                if p.transition(to).unwrap_or(false) {
                    prop_assert!(before.can_transition_to(to));
                }
            }
        }
    }
}
