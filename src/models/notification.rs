//! Domain events and the notifications rendered from them

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::adoption_request::RequestDetails;
use super::enums::NotificationKind;

/// Identifying data of a request carried by request events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRef {
    pub request_id: i32,
    pub pet_id: i32,
    pub pet_name: String,
    pub adopter_id: i32,
    pub adopter_name: String,
    pub shelter_user_id: i32,
}

impl From<&RequestDetails> for RequestRef {
    fn from(r: &RequestDetails) -> Self {
        Self {
            request_id: r.id,
            pet_id: r.pet_id,
            pet_name: r.pet_name.clone(),
            adopter_id: r.adopter_id,
            adopter_name: r.adopter_name.clone(),
            shelter_user_id: r.shelter_user_id,
        }
    }
}

/// Semantic events emitted once a transaction has committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    RequestCreated(RequestRef),
    RequestApproved {
        request: RequestRef,
        adoption_id: i32,
    },
    RequestRejected {
        request: RequestRef,
        reason: String,
    },
    VisitScheduled {
        visit_id: i32,
        adoption_id: i32,
        sequence_number: i32,
        scheduled_date: NaiveDate,
        pet_name: String,
        adopter_id: i32,
    },
}

impl DomainEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            DomainEvent::RequestCreated(_) => NotificationKind::RequestCreated,
            DomainEvent::RequestApproved { .. } => NotificationKind::RequestApproved,
            DomainEvent::RequestRejected { .. } => NotificationKind::RequestRejected,
            DomainEvent::VisitScheduled { .. } => NotificationKind::VisitScheduled,
        }
    }

    /// User who should be told: the shelter owner for new requests,
    /// the adopter for everything else
    pub fn recipient(&self) -> i32 {
        match self {
            DomainEvent::RequestCreated(r) => r.shelter_user_id,
            DomainEvent::RequestApproved { request, .. }
            | DomainEvent::RequestRejected { request, .. } => request.adopter_id,
            DomainEvent::VisitScheduled { adopter_id, .. } => *adopter_id,
        }
    }

    pub fn render(&self) -> NewNotification {
        let (title, message, link) = match self {
            DomainEvent::RequestCreated(r) => (
                format!("New adoption request for {}", r.pet_name),
                format!(
                    "{} has sent a request to adopt {}.",
                    r.adopter_name, r.pet_name
                ),
                format!("/requests/{}", r.request_id),
            ),
            DomainEvent::RequestApproved {
                request,
                adoption_id,
            } => (
                format!("Request approved for {}!", request.pet_name),
                format!(
                    "Your request to adopt {} has been approved. The shelter will contact you soon.",
                    request.pet_name
                ),
                format!("/adoptions/{}", adoption_id),
            ),
            DomainEvent::RequestRejected { request, reason } => (
                format!("Request for {}", request.pet_name),
                format!(
                    "Your request to adopt {} was not approved: {}",
                    request.pet_name, reason
                ),
                "/pets".to_string(),
            ),
            DomainEvent::VisitScheduled {
                adoption_id,
                sequence_number,
                scheduled_date,
                pet_name,
                ..
            } => (
                "Follow-up visit scheduled".to_string(),
                format!(
                    "Visit #{} for {} is scheduled on {}.",
                    sequence_number,
                    pet_name,
                    scheduled_date.format("%d/%m/%Y")
                ),
                format!("/adoptions/{}", adoption_id),
            ),
        };

        NewNotification {
            user_id: self.recipient(),
            kind: self.kind(),
            title,
            message,
            link,
        }
    }
}

/// Notification row about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i32,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: String,
}

/// Notification record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCount {
    pub unread: i64,
}
