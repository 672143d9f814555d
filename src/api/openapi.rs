//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{adoptions, campaigns, health, notifications, pets, requests, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pawtrack API",
        version = "1.1.0",
        description = "Shelter adoption lifecycle REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Pets
        pets::create_pet,
        pets::get_pet,
        pets::list_shelter_pets,
        pets::publish_pet,
        pets::withdraw_pet,
        pets::mark_pet_adopted,
        // Requests
        requests::submit_request,
        requests::list_requests,
        requests::get_request,
        requests::approve_request,
        requests::reject_request,
        requests::cancel_request,
        requests::reset_request,
        requests::review_request,
        // Adoptions
        adoptions::get_adoption,
        adoptions::start_followup,
        adoptions::add_strike,
        adoptions::remove_strike,
        adoptions::finalize_adoption,
        adoptions::close_adoption,
        adoptions::update_contract,
        // Visits
        visits::list_visits,
        visits::schedule_visit,
        visits::delete_visit,
        visits::record_outcome,
        visits::mark_not_performed,
        // Campaigns
        campaigns::create_campaign,
        campaigns::get_campaign,
        campaigns::list_shelter_campaigns,
        campaigns::pause_campaign,
        campaigns::activate_campaign,
        campaigns::finish_campaign,
        campaigns::join_campaign,
        campaigns::leave_campaign,
        campaigns::list_participants,
        campaigns::mark_attendance,
        // Notifications
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::PetState,
            crate::models::enums::RequestState,
            crate::models::enums::AdoptionState,
            crate::models::enums::VisitOutcome,
            crate::models::enums::HealthRating,
            crate::models::enums::CampaignState,
            crate::models::enums::KpiType,
            crate::models::enums::NotificationKind,
            // Pets
            crate::models::pet::Pet,
            crate::models::pet::CreatePet,
            // Requests
            crate::models::adoption_request::RequestDetails,
            crate::models::adoption_request::SubmitRequest,
            crate::models::adoption_request::RejectRequest,
            crate::models::adoption_request::ApprovalOutcome,
            // Adoptions
            crate::models::adoption::Adoption,
            crate::models::adoption::AdoptionDetails,
            crate::models::adoption::OutcomeEffects,
            crate::models::adoption::StrikeChange,
            crate::models::adoption::StartFollowup,
            crate::models::adoption::CloseAdoption,
            crate::models::adoption::UpdateContract,
            // Visits
            crate::models::visit::Visit,
            crate::models::visit::VisitView,
            crate::models::visit::VisitResult,
            crate::models::visit::ScheduleVisit,
            crate::models::visit::OutcomeReport,
            // Campaigns
            crate::models::campaign::Campaign,
            crate::models::campaign::CampaignSummary,
            crate::models::campaign::CreateCampaign,
            crate::models::campaign::JoinCampaign,
            crate::models::campaign::MarkAttendance,
            crate::models::campaign::Participation,
            crate::models::campaign::ParticipationChange,
            // Notifications
            crate::models::notification::Notification,
            crate::models::notification::UnreadCount,
            notifications::NotificationsQuery,
            notifications::MarkAllReadResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "pets", description = "Pet lifecycle"),
        (name = "requests", description = "Adoption request arbitration"),
        (name = "adoptions", description = "Post-adoption follow-up"),
        (name = "visits", description = "Follow-up visits"),
        (name = "campaigns", description = "Shelter campaigns and KPIs"),
        (name = "notifications", description = "User notifications")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
