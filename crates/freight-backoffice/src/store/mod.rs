//! Storage abstraction over the hosted data service.
//!
//! The production deployment delegates persistence to a hosted
//! backend-as-a-service; these traits describe the table-scoped operations
//! the workflows rely on so the service binary and the tests can supply
//! their own implementations. The review table carries a uniqueness rule on
//! `loadUuid`: inserting a second review for the same load must fail with
//! [`StoreError::Conflict`], which the workflow treats as the authoritative
//! duplicate signal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for brokers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrokerId(pub String);

/// Identifier wrapper for loads. Also the value carried by review links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadId(pub String);

/// Identifier wrapper for reviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub String);

/// Identifier wrapper for delivery-tracking rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryLoadId(pub String);

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DeliveryLoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Brokerage contact assigned to loads; the eventual reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerRecord {
    pub id: BrokerId,
    pub name: String,
    pub email: String,
}

/// Broker row as handed to the store; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBrokerRecord {
    pub name: String,
    pub email: String,
}

/// Partial broker update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Lifecycle of a dispatched load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    Dispatched,
    Delivered,
    Invoiced,
}

impl LoadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoadStatus::Dispatched => "Dispatched",
            LoadStatus::Delivered => "Delivered",
            LoadStatus::Invoiced => "Invoiced",
        }
    }
}

/// A freight shipment tracked through dispatch, delivery, and invoicing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRecord {
    pub id: LoadId,
    pub load_id_name: String,
    pub assigned_broker_id: BrokerId,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub status: LoadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoadRecord {
    pub load_id_name: String,
    pub assigned_broker_id: BrokerId,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub status: LoadStatus,
}

/// Partial load update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPatch {
    pub load_id_name: Option<String>,
    pub assigned_broker_id: Option<BrokerId>,
    pub pickup_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub status: Option<LoadStatus>,
}

/// Route-oriented row backing the delivery-tracking view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLoadRecord {
    pub id: DeliveryLoadId,
    pub broker_name: String,
    pub pickup_date: NaiveDate,
    pub pickup_state: String,
    pub delivery_state: String,
    pub total_miles: u32,
    pub load_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeliveryLoadRecord {
    pub broker_name: String,
    pub pickup_date: NaiveDate,
    pub pickup_state: String,
    pub delivery_state: String,
    pub total_miles: u32,
}

/// Tri-state willingness answer on the review form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UseAgain {
    Yes,
    Maybe,
    No,
}

impl UseAgain {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "YES" => Some(Self::Yes),
            "MAYBE" => Some(Self::Maybe),
            "NO" => Some(Self::No),
            _ => None,
        }
    }
}

/// 1-5 star rating. Construction enforces the range, so a stored rating is
/// always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating {0} is outside the allowed 1-5 range")]
pub struct RatingOutOfRange(pub u8);

/// A broker's one-time feedback record for a completed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub load_uuid: LoadId,
    pub broker_id: BrokerId,
    pub on_time_pickup: bool,
    pub on_time_delivery: bool,
    pub use_btfs_again: UseAgain,
    pub communication_rating: Rating,
    pub performance_rating: Rating,
    pub comment: String,
    pub show_on_site: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReviewRecord {
    pub load_uuid: LoadId,
    pub broker_id: BrokerId,
    pub on_time_pickup: bool,
    pub on_time_delivery: bool,
    pub use_btfs_again: UseAgain,
    pub communication_rating: Rating,
    pub performance_rating: Rating,
    pub comment: String,
    pub show_on_site: bool,
}

/// Error enumeration for data service failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("data service unavailable: {0}")]
    Unavailable(String),
}

/// Broker table operations.
pub trait BrokerStore: Send + Sync {
    fn insert_broker(&self, broker: NewBrokerRecord) -> Result<BrokerRecord, StoreError>;
    fn fetch_broker(&self, id: &BrokerId) -> Result<Option<BrokerRecord>, StoreError>;
    /// Ordered by name ascending.
    fn list_brokers(&self) -> Result<Vec<BrokerRecord>, StoreError>;
    fn update_broker(&self, id: &BrokerId, patch: BrokerPatch) -> Result<BrokerRecord, StoreError>;
    fn delete_broker(&self, id: &BrokerId) -> Result<(), StoreError>;
    fn count_brokers(&self) -> Result<u64, StoreError>;
}

/// Load table operations. Deleting a load cascades to its reviews.
pub trait LoadStore: Send + Sync {
    fn insert_load(&self, load: NewLoadRecord) -> Result<LoadRecord, StoreError>;
    fn fetch_load(&self, id: &LoadId) -> Result<Option<LoadRecord>, StoreError>;
    /// Ordered by pickup date descending.
    fn list_loads(&self) -> Result<Vec<LoadRecord>, StoreError>;
    fn update_load(&self, id: &LoadId, patch: LoadPatch) -> Result<LoadRecord, StoreError>;
    fn delete_load(&self, id: &LoadId) -> Result<(), StoreError>;
    fn count_loads(&self) -> Result<u64, StoreError>;
}

/// Review table operations. At most one review exists per load; a second
/// insert for the same `loadUuid` fails with [`StoreError::Conflict`].
pub trait ReviewStore: Send + Sync {
    fn insert_review(&self, review: NewReviewRecord) -> Result<ReviewRecord, StoreError>;
    fn review_for_load(&self, load_id: &LoadId) -> Result<Option<ReviewRecord>, StoreError>;
    /// Ordered by creation time descending.
    fn list_reviews(&self) -> Result<Vec<ReviewRecord>, StoreError>;
    /// Reviews flagged for the public wall.
    fn public_reviews(&self) -> Result<Vec<ReviewRecord>, StoreError>;
    fn set_visibility(&self, id: &ReviewId, show_on_site: bool)
        -> Result<ReviewRecord, StoreError>;
    fn count_reviews(&self) -> Result<u64, StoreError>;
}

/// Delivery-tracking table operations.
pub trait DeliveryLoadStore: Send + Sync {
    fn insert_delivery_load(
        &self,
        load: NewDeliveryLoadRecord,
    ) -> Result<DeliveryLoadRecord, StoreError>;
    /// Ordered by creation time descending.
    fn list_delivery_loads(&self) -> Result<Vec<DeliveryLoadRecord>, StoreError>;
    fn set_delivery_completed(
        &self,
        id: &DeliveryLoadId,
        completed: bool,
    ) -> Result<DeliveryLoadRecord, StoreError>;
    fn delete_delivery_load(&self, id: &DeliveryLoadId) -> Result<(), StoreError>;
}

/// The single injected data service dependency the workflows are built on.
pub trait DataStore: BrokerStore + LoadStore + ReviewStore + DeliveryLoadStore {}

impl<T> DataStore for T where T: BrokerStore + LoadStore + ReviewStore + DeliveryLoadStore {}
