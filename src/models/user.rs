//! Caller identity carried in JWT claims

use serde::{Deserialize, Serialize};

use super::enums::UserRole;
use crate::error::AppError;

/// JWT claims for authenticated callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: UserRole,
    /// Shelter owned by the caller, for shelter accounts
    #[serde(default)]
    pub shelter_id: Option<i32>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Shelter account of the caller, if any
    pub fn shelter(&self) -> Option<i32> {
        match self.role {
            UserRole::Shelter => self.shelter_id,
            UserRole::Adopter => None,
        }
    }

    pub fn require_shelter(&self) -> Result<i32, AppError> {
        self.shelter().ok_or_else(|| {
            AppError::NotAuthorized("Only shelter accounts can do this".to_string())
        })
    }

    /// Caller must own the given shelter
    pub fn require_shelter_owner(&self, shelter_id: i32) -> Result<(), AppError> {
        if self.shelter() == Some(shelter_id) {
            Ok(())
        } else {
            Err(AppError::NotAuthorized(
                "You are not the shelter responsible for this resource".to_string(),
            ))
        }
    }

    pub fn require_adopter(&self) -> Result<(), AppError> {
        if self.role == UserRole::Adopter {
            Ok(())
        } else {
            Err(AppError::NotAuthorized(
                "Only adopter accounts can do this".to_string(),
            ))
        }
    }

    /// Caller must be the given adopter
    pub fn require_user(&self, user_id: i32) -> Result<(), AppError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::NotAuthorized(
                "This request belongs to another adopter".to_string(),
            ))
        }
    }
}
