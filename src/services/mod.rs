//! Business logic services

pub mod adoptions;
pub mod campaigns;
pub mod events;
pub mod notifications;
pub mod pets;
pub mod requests;
pub mod visits;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{config::FollowupConfig, repository::Repository};

use events::{EventPublisher, EventSink};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub pets: pets::PetsService,
    pub requests: requests::RequestsService,
    pub adoptions: adoptions::AdoptionsService,
    pub visits: visits::VisitsService,
    pub campaigns: campaigns::CampaignsService,
    pub notifications: notifications::NotificationsService,
}

impl Services {
    /// Create all services, delivering events as stored notifications
    pub fn new(repository: Repository, followup: &FollowupConfig) -> Self {
        let dispatcher = notifications::NotificationDispatcher::new(repository.clone());
        Self::with_event_sink(repository, followup, Arc::new(dispatcher))
    }

    /// Create all services with a custom event sink
    pub fn with_event_sink(
        repository: Repository,
        followup: &FollowupConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let events = EventPublisher::new(sink);
        let kpi = campaigns::KpiAccumulator::new(repository.clone());

        Self {
            pets: pets::PetsService::new(repository.clone(), kpi.clone()),
            requests: requests::RequestsService::new(repository.clone(), kpi, events.clone()),
            adoptions: adoptions::AdoptionsService::new(repository.clone(), followup.default_days),
            visits: visits::VisitsService::new(repository.clone(), events),
            campaigns: campaigns::CampaignsService::new(repository.clone()),
            notifications: notifications::NotificationsService::new(repository),
        }
    }
}

/// Current calendar date (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
