//! Shared domain enums, stored as lowercase text slugs

use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres,
};
use utoipa::ToSchema;

/// Declares an enum persisted as a TEXT column holding its slug.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $slug:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $slug ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $slug => Ok($name::$variant), )+
                    _ => Err(format!("Invalid {} value: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

text_enum! {
    /// Account role carried in the JWT claims
    UserRole {
        Adopter => "adopter",
        Shelter => "shelter",
    }
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

text_enum! {
    /// Availability of a pet
    PetState {
        Draft => "draft",
        Available => "available",
        Reserved => "reserved",
        Adopted => "adopted",
    }
}

// ---------------------------------------------------------------------------
// Adoption requests
// ---------------------------------------------------------------------------

text_enum! {
    /// Arbitration state of an adoption request
    RequestState {
        Pending => "pending",
        InReview => "in_review",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

// ---------------------------------------------------------------------------
// Adoptions
// ---------------------------------------------------------------------------

text_enum! {
    /// Post-approval contract state
    AdoptionState {
        Active => "active",
        /// Active with at least one strike
        Alert => "alert",
        Completed => "completed",
        Returned => "returned",
        Cancelled => "cancelled",
    }
}

// ---------------------------------------------------------------------------
// Visits
// ---------------------------------------------------------------------------

text_enum! {
    /// Result of a follow-up visit
    VisitOutcome {
        Pending => "pending",
        Successful => "successful",
        NeedsAttention => "needs_attention",
        Problematic => "problematic",
        NotPerformed => "not_performed",
    }
}

text_enum! {
    /// Health rating observed during a visit
    HealthRating {
        Excellent => "excellent",
        Good => "good",
        Fair => "fair",
        Concerning => "concerning",
    }
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

text_enum! {
    CampaignState {
        Active => "active",
        Paused => "paused",
        Finished => "finished",
    }
}

text_enum! {
    /// What a campaign counts toward its target
    KpiType {
        Participants => "participants",
        Adoptions => "adoptions",
        Donations => "donations",
        Visits => "visits",
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

text_enum! {
    NotificationKind {
        RequestCreated => "request_created",
        RequestApproved => "request_approved",
        RequestRejected => "request_rejected",
        VisitScheduled => "visit_scheduled",
    }
}
