use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use freight_backoffice::notify::{EmailMessage, Mailer, NotifyError};
use freight_backoffice::store::{
    BrokerId, BrokerPatch, BrokerRecord, BrokerStore, DeliveryLoadId, DeliveryLoadRecord,
    DeliveryLoadStore, LoadId, LoadPatch, LoadRecord, LoadStore, NewBrokerRecord,
    NewDeliveryLoadRecord, NewLoadRecord, NewReviewRecord, ReviewId, ReviewRecord, ReviewStore,
    StoreError, UseAgain,
};

#[derive(Default)]
struct Tables {
    brokers: Vec<BrokerRecord>,
    loads: Vec<LoadRecord>,
    reviews: Vec<ReviewRecord>,
    delivery_loads: Vec<DeliveryLoadRecord>,
    clock: i64,
}

/// In-memory stand-in for the hosted data service, mirroring its ordering
/// and the one-review-per-load uniqueness rule.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    visibility_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of visibility updates issued against the review table.
    pub fn visibility_writes(&self) -> usize {
        self.visibility_writes.load(Ordering::Relaxed)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

// Each insert advances a per-store clock so creation timestamps are
// strictly increasing and the descending sorts are deterministic.
fn next_created_at(tables: &mut Tables) -> DateTime<Utc> {
    tables.clock += 1;
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(tables.clock)
}

impl BrokerStore for MemoryStore {
    fn insert_broker(&self, broker: NewBrokerRecord) -> Result<BrokerRecord, StoreError> {
        let mut tables = self.lock()?;
        let record = BrokerRecord {
            id: BrokerId(Uuid::new_v4().to_string()),
            name: broker.name,
            email: broker.email,
        };
        tables.brokers.push(record.clone());
        Ok(record)
    }

    fn fetch_broker(&self, id: &BrokerId) -> Result<Option<BrokerRecord>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.brokers.iter().find(|b| &b.id == id).cloned())
    }

    fn list_brokers(&self) -> Result<Vec<BrokerRecord>, StoreError> {
        let tables = self.lock()?;
        let mut brokers = tables.brokers.clone();
        brokers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(brokers)
    }

    fn update_broker(&self, id: &BrokerId, patch: BrokerPatch) -> Result<BrokerRecord, StoreError> {
        let mut tables = self.lock()?;
        let broker = tables
            .brokers
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            broker.name = name;
        }
        if let Some(email) = patch.email {
            broker.email = email;
        }
        Ok(broker.clone())
    }

    fn delete_broker(&self, id: &BrokerId) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let before = tables.brokers.len();
        tables.brokers.retain(|b| &b.id != id);
        if tables.brokers.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn count_brokers(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.brokers.len() as u64)
    }
}

impl LoadStore for MemoryStore {
    fn insert_load(&self, load: NewLoadRecord) -> Result<LoadRecord, StoreError> {
        let mut tables = self.lock()?;
        let record = LoadRecord {
            id: LoadId(Uuid::new_v4().to_string()),
            load_id_name: load.load_id_name,
            assigned_broker_id: load.assigned_broker_id,
            pickup_date: load.pickup_date,
            delivery_date: load.delivery_date,
            status: load.status,
        };
        tables.loads.push(record.clone());
        Ok(record)
    }

    fn fetch_load(&self, id: &LoadId) -> Result<Option<LoadRecord>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.loads.iter().find(|l| &l.id == id).cloned())
    }

    fn list_loads(&self) -> Result<Vec<LoadRecord>, StoreError> {
        let tables = self.lock()?;
        let mut loads = tables.loads.clone();
        loads.sort_by(|a, b| b.pickup_date.cmp(&a.pickup_date));
        Ok(loads)
    }

    fn update_load(&self, id: &LoadId, patch: LoadPatch) -> Result<LoadRecord, StoreError> {
        let mut tables = self.lock()?;
        let load = tables
            .loads
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(label) = patch.load_id_name {
            load.load_id_name = label;
        }
        if let Some(broker_id) = patch.assigned_broker_id {
            load.assigned_broker_id = broker_id;
        }
        if let Some(pickup) = patch.pickup_date {
            load.pickup_date = pickup;
        }
        if let Some(delivery) = patch.delivery_date {
            load.delivery_date = delivery;
        }
        if let Some(status) = patch.status {
            load.status = status;
        }
        Ok(load.clone())
    }

    fn delete_load(&self, id: &LoadId) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let before = tables.loads.len();
        tables.loads.retain(|l| &l.id != id);
        if tables.loads.len() == before {
            return Err(StoreError::NotFound);
        }
        tables.reviews.retain(|r| &r.load_uuid != id);
        Ok(())
    }

    fn count_loads(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.loads.len() as u64)
    }
}

impl ReviewStore for MemoryStore {
    fn insert_review(&self, review: NewReviewRecord) -> Result<ReviewRecord, StoreError> {
        let mut tables = self.lock()?;
        if tables
            .reviews
            .iter()
            .any(|r| r.load_uuid == review.load_uuid)
        {
            return Err(StoreError::Conflict);
        }
        let created_at = next_created_at(&mut tables);
        let record = ReviewRecord {
            id: ReviewId(Uuid::new_v4().to_string()),
            load_uuid: review.load_uuid,
            broker_id: review.broker_id,
            on_time_pickup: review.on_time_pickup,
            on_time_delivery: review.on_time_delivery,
            use_btfs_again: review.use_btfs_again,
            communication_rating: review.communication_rating,
            performance_rating: review.performance_rating,
            comment: review.comment,
            show_on_site: review.show_on_site,
            created_at,
        };
        tables.reviews.push(record.clone());
        Ok(record)
    }

    fn review_for_load(&self, load_id: &LoadId) -> Result<Option<ReviewRecord>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .reviews
            .iter()
            .find(|r| &r.load_uuid == load_id)
            .cloned())
    }

    fn list_reviews(&self) -> Result<Vec<ReviewRecord>, StoreError> {
        let tables = self.lock()?;
        let mut reviews = tables.reviews.clone();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    fn public_reviews(&self) -> Result<Vec<ReviewRecord>, StoreError> {
        let mut reviews = self.list_reviews()?;
        reviews.retain(|r| r.show_on_site);
        Ok(reviews)
    }

    fn set_visibility(
        &self,
        id: &ReviewId,
        show_on_site: bool,
    ) -> Result<ReviewRecord, StoreError> {
        let mut tables = self.lock()?;
        self.visibility_writes.fetch_add(1, Ordering::Relaxed);
        let review = tables
            .reviews
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or(StoreError::NotFound)?;
        review.show_on_site = show_on_site;
        Ok(review.clone())
    }

    fn count_reviews(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.reviews.len() as u64)
    }
}

impl DeliveryLoadStore for MemoryStore {
    fn insert_delivery_load(
        &self,
        load: NewDeliveryLoadRecord,
    ) -> Result<DeliveryLoadRecord, StoreError> {
        let mut tables = self.lock()?;
        let created_at = next_created_at(&mut tables);
        let record = DeliveryLoadRecord {
            id: DeliveryLoadId(Uuid::new_v4().to_string()),
            broker_name: load.broker_name,
            pickup_date: load.pickup_date,
            pickup_state: load.pickup_state,
            delivery_state: load.delivery_state,
            total_miles: load.total_miles,
            load_completed: false,
            created_at,
        };
        tables.delivery_loads.push(record.clone());
        Ok(record)
    }

    fn list_delivery_loads(&self) -> Result<Vec<DeliveryLoadRecord>, StoreError> {
        let tables = self.lock()?;
        let mut loads = tables.delivery_loads.clone();
        loads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(loads)
    }

    fn set_delivery_completed(
        &self,
        id: &DeliveryLoadId,
        completed: bool,
    ) -> Result<DeliveryLoadRecord, StoreError> {
        let mut tables = self.lock()?;
        let load = tables
            .delivery_loads
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or(StoreError::NotFound)?;
        load.load_completed = completed;
        Ok(load.clone())
    }

    fn delete_delivery_load(&self, id: &DeliveryLoadId) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let before = tables.delivery_loads.len();
        tables.delivery_loads.retain(|l| &l.id != id);
        if tables.delivery_loads.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Mailer that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    messages: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.clone());
        }
        Ok(())
    }
}

/// Mailer whose every send fails with a transport error.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

pub fn broker(name: &str, email: &str) -> NewBrokerRecord {
    NewBrokerRecord {
        name: name.to_string(),
        email: email.to_string(),
    }
}

pub fn load(label: &str, broker_id: &BrokerId, pickup: NaiveDate) -> NewLoadRecord {
    NewLoadRecord {
        load_id_name: label.to_string(),
        assigned_broker_id: broker_id.clone(),
        pickup_date: pickup,
        delivery_date: pickup + Duration::days(2),
        status: freight_backoffice::store::LoadStatus::Dispatched,
    }
}

pub fn review(load_id: &LoadId, broker_id: &BrokerId, comment: &str) -> NewReviewRecord {
    NewReviewRecord {
        load_uuid: load_id.clone(),
        broker_id: broker_id.clone(),
        on_time_pickup: true,
        on_time_delivery: true,
        use_btfs_again: UseAgain::Yes,
        communication_rating: freight_backoffice::store::Rating::new(5).expect("valid rating"),
        performance_rating: freight_backoffice::store::Rating::new(4).expect("valid rating"),
        comment: comment.to_string(),
        show_on_site: true,
    }
}

pub fn pickup_date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date")
}
