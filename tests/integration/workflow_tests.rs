//! End-to-end workflows against a real database

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use pawtrack_server::{
    config::FollowupConfig,
    error::{AppError, AppResult},
    models::{
        adoption_request::{SubmitRequest, AUTO_REJECT_REASON},
        campaign::{CreateCampaign, JoinCampaign},
        enums::{
            AdoptionState, KpiType, NotificationKind, PetState, RequestState, UserRole,
            VisitOutcome,
        },
        notification::DomainEvent,
        pet::CreatePet,
        user::UserClaims,
        visit::OutcomeReport,
    },
    repository::Repository,
    services::{events::EventSink, Services},
};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    fn kinds(&self) -> Vec<NotificationKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind()).collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, event: &DomainEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct Fixture {
    pool: PgPool,
    services: Services,
    sink: Arc<RecordingSink>,
    shelter: UserClaims,
    shelter_id: i32,
}

fn claims(user_id: i32, role: UserRole, shelter_id: Option<i32>) -> UserClaims {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: format!("user{}", user_id),
        user_id,
        role,
        shelter_id,
        exp: now + 3600,
        iat: now,
    }
}

async fn create_user(pool: &PgPool, username: &str, role: UserRole) -> i32 {
    sqlx::query_scalar("INSERT INTO users (username, role) VALUES ($1, $2) RETURNING id")
        .bind(username)
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn create_shelter(pool: &PgPool, username: &str) -> (UserClaims, i32) {
    let user_id = create_user(pool, username, UserRole::Shelter).await;
    let shelter_id: i32 =
        sqlx::query_scalar("INSERT INTO shelters (user_id, name) VALUES ($1, $2) RETURNING id")
            .bind(user_id)
            .bind(format!("{} shelter", username))
            .fetch_one(pool)
            .await
            .unwrap();
    (claims(user_id, UserRole::Shelter, Some(shelter_id)), shelter_id)
}

async fn create_adopter(pool: &PgPool, username: &str) -> UserClaims {
    let user_id = create_user(pool, username, UserRole::Adopter).await;
    claims(user_id, UserRole::Adopter, None)
}

async fn setup(pool: PgPool) -> Fixture {
    let sink = Arc::new(RecordingSink::default());
    let services = Services::with_event_sink(
        Repository::new(pool.clone()),
        &FollowupConfig::default(),
        sink.clone(),
    );
    let (shelter, shelter_id) = create_shelter(&pool, "happy_paws").await;
    Fixture {
        pool,
        services,
        sink,
        shelter,
        shelter_id,
    }
}

impl Fixture {
    async fn available_pet(&self, name: &str) -> i32 {
        let pet = CreatePet {
            name: name.to_string(),
            species: "dog".to_string(),
            description: "Calm and friendly".to_string(),
            publish: true,
        };
        self.services.pets.create(&self.shelter, pet).await.unwrap().id
    }

    async fn submit(&self, adopter: &UserClaims, pet_id: i32) -> AppResult<i32> {
        let submission = SubmitRequest {
            pet_id,
            message: "We have a garden".to_string(),
        };
        Ok(self.services.requests.submit(adopter, submission).await?.id)
    }

    /// Approved adoption with an open follow-up window
    async fn adoption_in_followup(&self, pet_name: &str) -> i32 {
        let pet_id = self.available_pet(pet_name).await;
        let adopter = create_adopter(&self.pool, &format!("{}_adopter", pet_name)).await;
        let request_id = self.submit(&adopter, pet_id).await.unwrap();
        let approval = self.services.requests.approve(&self.shelter, request_id).await.unwrap();
        self.services
            .adoptions
            .start_followup(&self.shelter, approval.adoption_id, Some(30))
            .await
            .unwrap();
        approval.adoption_id
    }

    async fn schedule_in(&self, adoption_id: i32, days: i64) -> i32 {
        let date = Utc::now().date_naive() + Duration::days(days);
        self.services
            .visits
            .schedule(&self.shelter, adoption_id, date)
            .await
            .unwrap()
            .id
    }
}

fn report(outcome: VisitOutcome) -> OutcomeReport {
    OutcomeReport {
        outcome: Some(outcome),
        ..Default::default()
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_approval_reserves_pet_and_rejects_competitors(pool: PgPool) {
    let fx = setup(pool).await;
    let pet_id = fx.available_pet("Luna").await;
    let x = create_adopter(&fx.pool, "xavier").await;
    let y = create_adopter(&fx.pool, "yasmin").await;

    let r1 = fx.submit(&x, pet_id).await.unwrap();
    let r2 = fx.submit(&y, pet_id).await.unwrap();

    let approval = fx.services.requests.approve(&fx.shelter, r1).await.unwrap();
    assert_eq!(approval.request.state, RequestState::Approved);
    assert_eq!(approval.rejected_request_ids, vec![r2]);

    let pet = fx.services.pets.get(pet_id).await.unwrap();
    assert_eq!(pet.state, PetState::Reserved);

    let loser = fx.services.requests.get(&y, r2).await.unwrap();
    assert_eq!(loser.state, RequestState::Rejected);
    assert_eq!(loser.rejection_reason, AUTO_REJECT_REASON);

    let adoption = fx.services.adoptions.get(&fx.shelter, approval.adoption_id).await.unwrap();
    assert_eq!(adoption.adoption.state, AdoptionState::Active);
    assert_eq!(adoption.adoption.strikes, 0);
    assert_eq!(adoption.adoption.max_strikes, 3);
    assert_eq!(adoption.adoption.planned_visits, 0);
    assert!(adoption.adoption.followup_start.is_none());

    assert_eq!(
        fx.sink.kinds(),
        vec![
            NotificationKind::RequestCreated,
            NotificationKind::RequestCreated,
            NotificationKind::RequestApproved,
            NotificationKind::RequestRejected,
        ]
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_submit_guards(pool: PgPool) {
    let fx = setup(pool).await;
    let pet_id = fx.available_pet("Milo").await;
    let x = create_adopter(&fx.pool, "xavier").await;
    let y = create_adopter(&fx.pool, "yasmin").await;

    let r1 = fx.submit(&x, pet_id).await.unwrap();
    assert!(matches!(
        fx.submit(&x, pet_id).await,
        Err(AppError::DuplicateActiveRequest { .. })
    ));

    fx.services.requests.approve(&fx.shelter, r1).await.unwrap();
    assert!(matches!(fx.submit(&y, pet_id).await, Err(AppError::PetUnavailable(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_only_owning_shelter_can_approve(pool: PgPool) {
    let fx = setup(pool).await;
    let pet_id = fx.available_pet("Nala").await;
    let x = create_adopter(&fx.pool, "xavier").await;
    let r1 = fx.submit(&x, pet_id).await.unwrap();

    let (other, _) = create_shelter(&fx.pool, "other_shelter").await;
    assert!(matches!(
        fx.services.requests.approve(&other, r1).await,
        Err(AppError::NotAuthorized(_))
    ));
    assert!(matches!(
        fx.services.requests.approve(&x, r1).await,
        Err(AppError::NotAuthorized(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_concurrent_approvals_have_one_winner(pool: PgPool) {
    let fx = setup(pool).await;
    let pet_id = fx.available_pet("Rocky").await;
    let x = create_adopter(&fx.pool, "xavier").await;
    let y = create_adopter(&fx.pool, "yasmin").await;
    let r1 = fx.submit(&x, pet_id).await.unwrap();
    let r2 = fx.submit(&y, pet_id).await.unwrap();

    let (a, b) = tokio::join!(
        fx.services.requests.approve(&fx.shelter, r1),
        fx.services.requests.approve(&fx.shelter, r2),
    );
    let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1);

    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(
        loser,
        Err(AppError::InvalidState(_)) | Err(AppError::PetUnavailable(_))
    ));

    let approved: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM adoption_requests WHERE pet_id = $1 AND state = 'approved'",
    )
    .bind(pet_id)
    .fetch_one(&fx.pool)
    .await
    .unwrap();
    assert_eq!(approved, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_reject_after_approval_releases_pet(pool: PgPool) {
    let fx = setup(pool).await;
    let pet_id = fx.available_pet("Kira").await;
    let x = create_adopter(&fx.pool, "xavier").await;
    let r1 = fx.submit(&x, pet_id).await.unwrap();
    let approval = fx.services.requests.approve(&fx.shelter, r1).await.unwrap();

    assert!(matches!(
        fx.services.requests.reject(&fx.shelter, r1, "  ").await,
        Err(AppError::Validation(_))
    ));
    let rejected = fx
        .services
        .requests
        .reject(&fx.shelter, r1, "home check failed")
        .await
        .unwrap();
    assert_eq!(rejected.state, RequestState::Rejected);

    let pet = fx.services.pets.get(pet_id).await.unwrap();
    assert_eq!(pet.state, PetState::Available);
    let adoption = fx.services.adoptions.get(&fx.shelter, approval.adoption_id).await.unwrap();
    assert_eq!(adoption.adoption.state, AdoptionState::Cancelled);

    // Reset and approve again: the same adoption record starts over
    fx.services.requests.reset_to_pending(&fx.shelter, r1).await.unwrap();
    let again = fx.services.requests.approve(&fx.shelter, r1).await.unwrap();
    assert_eq!(again.adoption_id, approval.adoption_id);
    let adoption = fx.services.adoptions.get(&fx.shelter, again.adoption_id).await.unwrap();
    assert_eq!(adoption.adoption.state, AdoptionState::Active);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_cancel_only_by_own_adopter(pool: PgPool) {
    let fx = setup(pool).await;
    let pet_id = fx.available_pet("Coco").await;
    let x = create_adopter(&fx.pool, "xavier").await;
    let y = create_adopter(&fx.pool, "yasmin").await;
    let r1 = fx.submit(&x, pet_id).await.unwrap();

    assert!(matches!(
        fx.services.requests.cancel(&y, r1).await,
        Err(AppError::NotAuthorized(_))
    ));
    fx.services.requests.start_review(&fx.shelter, r1).await.unwrap();
    let cancelled = fx.services.requests.cancel(&x, r1).await.unwrap();
    assert_eq!(cancelled.state, RequestState::Cancelled);

    // A cancelled request no longer blocks a new one
    fx.submit(&x, pet_id).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_problematic_then_successful_visit_completes_adoption(pool: PgPool) {
    let fx = setup(pool).await;
    let adoption_id = fx.adoption_in_followup("Bruno").await;

    let details = fx.services.adoptions.get(&fx.shelter, adoption_id).await.unwrap();
    let today = Utc::now().date_naive();
    assert_eq!(details.adoption.followup_start, Some(today));
    assert_eq!(details.adoption.followup_end, Some(today + Duration::days(30)));
    assert!(details.window_active);

    let v1 = fx.schedule_in(adoption_id, 5).await;
    let v2 = fx.schedule_in(adoption_id, 20).await;

    let first = fx
        .services
        .visits
        .record_outcome(&fx.shelter, v1, report(VisitOutcome::Problematic))
        .await
        .unwrap();
    assert_eq!((first.strikes, first.adoption_state), (1, AdoptionState::Alert));

    let second = fx
        .services
        .visits
        .record_outcome(&fx.shelter, v2, report(VisitOutcome::Successful))
        .await
        .unwrap();
    assert!(second.effects.strike_removed && second.effects.completed);
    assert_eq!((second.strikes, second.adoption_state), (0, AdoptionState::Completed));

    let details = fx.services.adoptions.get(&fx.shelter, adoption_id).await.unwrap();
    assert_eq!(details.completed_visits, 2);
    assert_eq!(details.progress_percent, 100);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_record_outcome_applies_once(pool: PgPool) {
    let fx = setup(pool).await;
    let adoption_id = fx.adoption_in_followup("Toby").await;
    let v1 = fx.schedule_in(adoption_id, 3).await;
    fx.schedule_in(adoption_id, 9).await;

    fx.services
        .visits
        .record_outcome(&fx.shelter, v1, report(VisitOutcome::Problematic))
        .await
        .unwrap();
    let repeat = fx
        .services
        .visits
        .record_outcome(&fx.shelter, v1, report(VisitOutcome::Problematic))
        .await
        .unwrap();
    assert!(!repeat.applied);
    assert_eq!(repeat.strikes, 1);

    let bad_score = OutcomeReport {
        score: Some(9),
        ..Default::default()
    };
    assert!(matches!(
        fx.services.visits.record_outcome(&fx.shelter, v1, bad_score).await,
        Err(AppError::Validation(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_not_performed_adds_single_strike(pool: PgPool) {
    let fx = setup(pool).await;
    let adoption_id = fx.adoption_in_followup("Lola").await;
    let v1 = fx.schedule_in(adoption_id, 2).await;

    let first = fx.services.visits.mark_not_performed(&fx.shelter, v1).await.unwrap();
    assert!(first.applied);
    assert_eq!(first.visit.outcome, VisitOutcome::NotPerformed);
    assert_eq!((first.strikes, first.adoption_state), (1, AdoptionState::Alert));

    let second = fx.services.visits.mark_not_performed(&fx.shelter, v1).await.unwrap();
    assert!(!second.applied);
    assert_eq!(second.strikes, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_scheduling_respects_window(pool: PgPool) {
    let fx = setup(pool).await;
    let pet_id = fx.available_pet("Simba").await;
    let x = create_adopter(&fx.pool, "xavier").await;
    let r1 = fx.submit(&x, pet_id).await.unwrap();
    let adoption_id = fx.services.requests.approve(&fx.shelter, r1).await.unwrap().adoption_id;
    let today = Utc::now().date_naive();

    assert!(matches!(
        fx.services.visits.schedule(&fx.shelter, adoption_id, today).await,
        Err(AppError::WindowNotActive(_))
    ));

    fx.services
        .adoptions
        .start_followup(&fx.shelter, adoption_id, Some(10))
        .await
        .unwrap();
    assert!(matches!(
        fx.services
            .visits
            .schedule(&fx.shelter, adoption_id, today + Duration::days(11))
            .await,
        Err(AppError::DateOutOfWindow { .. })
    ));
    fx.services
        .visits
        .schedule(&fx.shelter, adoption_id, today + Duration::days(10))
        .await
        .unwrap();
    assert!(fx.sink.kinds().contains(&NotificationKind::VisitScheduled));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_delete_visit_renumbers(pool: PgPool) {
    let fx = setup(pool).await;
    let adoption_id = fx.adoption_in_followup("Oreo").await;
    let v1 = fx.schedule_in(adoption_id, 1).await;
    let v2 = fx.schedule_in(adoption_id, 2).await;
    let v3 = fx.schedule_in(adoption_id, 3).await;

    fx.services.visits.delete(&fx.shelter, v1).await.unwrap();

    let visits = fx.services.visits.list(&fx.shelter, adoption_id).await.unwrap();
    let numbering: Vec<(i32, i32)> = visits
        .iter()
        .map(|v| (v.visit.id, v.visit.sequence_number))
        .collect();
    assert_eq!(numbering, vec![(v2, 1), (v3, 2)]);

    let details = fx.services.adoptions.get(&fx.shelter, adoption_id).await.unwrap();
    assert_eq!(details.adoption.planned_visits, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_adoption_increments_matching_campaign(pool: PgPool) {
    let fx = setup(pool).await;
    let today = Utc::now().date_naive();
    let campaign = fx
        .services
        .campaigns
        .create(
            &fx.shelter,
            CreateCampaign {
                title: "Summer adoptions".to_string(),
                description: String::new(),
                start_date: today - Duration::days(1),
                end_date: today + Duration::days(30),
                kpi_type: KpiType::Adoptions,
                target: 5,
            },
        )
        .await
        .unwrap();
    let donations = fx
        .services
        .campaigns
        .create(
            &fx.shelter,
            CreateCampaign {
                title: "Food drive".to_string(),
                description: String::new(),
                start_date: today - Duration::days(1),
                end_date: today + Duration::days(30),
                kpi_type: KpiType::Donations,
                target: 100,
            },
        )
        .await
        .unwrap();

    fx.adoption_in_followup("Bella").await;

    let campaign = fx.services.campaigns.get(campaign.campaign.id).await.unwrap();
    assert_eq!(campaign.campaign.current_value, 1);
    assert_eq!(campaign.progress_percent, 20.0);
    let donations = fx.services.campaigns.get(donations.campaign.id).await.unwrap();
    assert_eq!(donations.campaign.current_value, 0);

    // Paused campaigns do not count, and a direct mark-adopted counts again
    let pet_id = fx.available_pet("Max").await;
    fx.services.pets.mark_adopted(&fx.shelter, pet_id).await.unwrap();
    let campaign = fx.services.campaigns.get(campaign.campaign.id).await.unwrap();
    assert_eq!(campaign.campaign.current_value, 2);

    fx.services.campaigns.pause(&fx.shelter, campaign.campaign.id).await.unwrap();
    let pet_id = fx.available_pet("Duke").await;
    fx.services.pets.mark_adopted(&fx.shelter, pet_id).await.unwrap();
    let campaign = fx.services.campaigns.get(campaign.campaign.id).await.unwrap();
    assert_eq!(campaign.campaign.current_value, 2);
}

impl Fixture {
    async fn participants_campaign(&self) -> i32 {
        let today = Utc::now().date_naive();
        self.services
            .campaigns
            .create(
                &self.shelter,
                CreateCampaign {
                    title: "Walk day".to_string(),
                    description: String::new(),
                    start_date: today - Duration::days(1),
                    end_date: today + Duration::days(7),
                    kpi_type: KpiType::Participants,
                    target: 10,
                },
            )
            .await
            .unwrap()
            .campaign
            .id
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_joining_twice_counts_once(pool: PgPool) {
    let fx = setup(pool).await;
    let campaign_id = fx.participants_campaign().await;
    let walker = create_adopter(&fx.pool, "walker").await;

    let first = fx
        .services
        .campaigns
        .join(&walker, campaign_id, JoinCampaign { comment: " I'll bring leashes ".to_string() })
        .await
        .unwrap();
    assert!(first.applied);
    assert_eq!(first.campaign.campaign.current_value, 1);

    let second = fx
        .services
        .campaigns
        .join(&walker, campaign_id, JoinCampaign::default())
        .await
        .unwrap();
    assert!(!second.applied);
    assert_eq!(second.campaign.campaign.current_value, 1);

    let participants = fx.services.campaigns.participants(&fx.shelter, campaign_id).await.unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].comment, "I'll bring leashes");

    let marked = fx
        .services
        .campaigns
        .mark_attendance(&fx.shelter, campaign_id, participants[0].id, true)
        .await
        .unwrap();
    assert!(marked.attended);

    // Only the owning shelter sees participants
    let result = fx.services.campaigns.participants(&walker, campaign_id).await;
    assert!(matches!(result, Err(AppError::NotAuthorized(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_leave_requires_participation(pool: PgPool) {
    let fx = setup(pool).await;
    let campaign_id = fx.participants_campaign().await;
    let walker = create_adopter(&fx.pool, "walker").await;

    let result = fx.services.campaigns.leave(&walker, campaign_id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    let campaign = fx.services.campaigns.get(campaign_id).await.unwrap();
    assert_eq!(campaign.campaign.current_value, 0);

    fx.services
        .campaigns
        .join(&walker, campaign_id, JoinCampaign::default())
        .await
        .unwrap();
    let left = fx.services.campaigns.leave(&walker, campaign_id).await.unwrap();
    assert_eq!(left.campaign.campaign.current_value, 0);

    let result = fx.services.campaigns.leave(&walker, campaign_id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_join_rejected_unless_active(pool: PgPool) {
    let fx = setup(pool).await;
    let campaign_id = fx.participants_campaign().await;
    let walker = create_adopter(&fx.pool, "walker").await;

    fx.services.campaigns.pause(&fx.shelter, campaign_id).await.unwrap();
    let result = fx
        .services
        .campaigns
        .join(&walker, campaign_id, JoinCampaign::default())
        .await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    fx.services.campaigns.finish(&fx.shelter, campaign_id).await.unwrap();
    let result = fx
        .services
        .campaigns
        .join(&walker, campaign_id, JoinCampaign::default())
        .await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    let participants = fx.services.campaigns.participants(&fx.shelter, campaign_id).await.unwrap();
    assert!(participants.is_empty());
    let campaign = fx.services.campaigns.get(campaign_id).await.unwrap();
    assert_eq!(campaign.campaign.current_value, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_strike_cap_through_service(pool: PgPool) {
    let fx = setup(pool).await;
    let adoption_id = fx.adoption_in_followup("Pepper").await;

    let mut seen = Vec::new();
    for _ in 0..4 {
        let change = fx.services.adoptions.add_strike(&fx.shelter, adoption_id).await.unwrap();
        seen.push((change.applied, change.strikes_remaining));
    }
    assert_eq!(seen, vec![(true, 2), (true, 1), (true, 0), (false, 0)]);

    assert!(matches!(
        fx.services.adoptions.finalize(&fx.shelter, adoption_id).await,
        Err(AppError::InvalidState(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_notifications_are_persisted(pool: PgPool) {
    let repository = Repository::new(pool.clone());
    let services = Services::new(repository, &FollowupConfig::default());
    let (shelter, _) = create_shelter(&pool, "notify_shelter").await;
    let adopter = create_adopter(&pool, "notify_adopter").await;

    let pet = services
        .pets
        .create(
            &shelter,
            CreatePet {
                name: "Zeus".to_string(),
                species: "cat".to_string(),
                description: "Shy".to_string(),
                publish: true,
            },
        )
        .await
        .unwrap();
    services
        .requests
        .submit(
            &adopter,
            SubmitRequest {
                pet_id: pet.id,
                message: "Please".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(services.notifications.unread_count(shelter.user_id).await.unwrap(), 1);
    let inbox = services.notifications.list(shelter.user_id, true).await.unwrap();
    assert_eq!(inbox[0].kind, NotificationKind::RequestCreated);

    assert_eq!(services.notifications.mark_all_read(shelter.user_id).await.unwrap(), 1);
    assert_eq!(services.notifications.unread_count(shelter.user_id).await.unwrap(), 0);
    assert!(matches!(
        services.notifications.mark_read(adopter.user_id, inbox[0].id).await,
        Err(AppError::NotFound(_))
    ));
}
