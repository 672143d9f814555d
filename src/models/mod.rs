//! Data models for Pawtrack

pub mod adoption;
pub mod adoption_request;
pub mod campaign;
pub mod enums;
pub mod notification;
pub mod pet;
pub mod user;
pub mod visit;

// Re-export commonly used types
pub use adoption::{Adoption, AdoptionContext, AdoptionDetails};
pub use adoption_request::{AdoptionRequest, RequestDetails};
pub use campaign::{Campaign, CampaignSummary, KpiEvent};
pub use enums::{
    AdoptionState, CampaignState, HealthRating, KpiType, NotificationKind, PetState,
    RequestState, UserRole, VisitOutcome,
};
pub use notification::{DomainEvent, Notification};
pub use pet::Pet;
pub use user::UserClaims;
pub use visit::{Visit, VisitView};
