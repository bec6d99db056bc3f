use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    BrokerUpdate, DispatchValidationError, LoadUpdate, LoadView, NewBroker, NewDeliveryLoad,
    NewLoad,
};
use crate::notify::{review_invitation, Mailer};
use crate::store::{
    BrokerId, BrokerRecord, DataStore, DeliveryLoadId, DeliveryLoadRecord, LoadId, LoadRecord,
    StoreError,
};
use crate::workflows::reviews::review_link;

/// Service behind the admin console: broker and load CRUD, the delivery
/// tracker, and dashboard counts. Load creation additionally dispatches the
/// review invitation.
pub struct DispatchService<D, M> {
    store: Arc<D>,
    mailer: Arc<M>,
    public_base_url: String,
}

/// Result of creating a load: the stored row plus the review link the
/// invitation carried.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadCreated {
    #[serde(flatten)]
    pub load: LoadRecord,
    pub review_link: String,
}

/// Dashboard tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub brokers: u64,
    pub loads: u64,
    pub reviews: u64,
}

impl<D, M> DispatchService<D, M>
where
    D: DataStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<D>, mailer: Arc<M>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            mailer,
            public_base_url: public_base_url.into(),
        }
    }

    pub fn create_broker(&self, broker: NewBroker) -> Result<BrokerRecord, DispatchError> {
        let record = broker.validate()?;
        self.store
            .insert_broker(record)
            .map_err(DispatchError::Store)
    }

    pub fn list_brokers(&self) -> Result<Vec<BrokerRecord>, DispatchError> {
        self.store.list_brokers().map_err(DispatchError::Store)
    }

    pub fn update_broker(
        &self,
        id: &BrokerId,
        update: BrokerUpdate,
    ) -> Result<BrokerRecord, DispatchError> {
        let patch = update.validate()?;
        self.store.update_broker(id, patch).map_err(|err| match err {
            StoreError::NotFound => DispatchError::BrokerNotFound,
            other => DispatchError::Store(other),
        })
    }

    pub fn delete_broker(&self, id: &BrokerId) -> Result<(), DispatchError> {
        self.store.delete_broker(id).map_err(|err| match err {
            StoreError::NotFound => DispatchError::BrokerNotFound,
            other => DispatchError::Store(other),
        })
    }

    /// Persist the load, then request delivery of its review link to the
    /// assigned broker. The two steps are independent: a notification
    /// failure is logged and never rolls back the stored load.
    pub async fn create_load(&self, load: NewLoad) -> Result<LoadCreated, DispatchError> {
        let record = load.validate()?;

        let broker = self
            .store
            .fetch_broker(&record.assigned_broker_id)
            .map_err(DispatchError::Store)?
            .ok_or(DispatchError::BrokerNotFound)?;

        let stored = self
            .store
            .insert_load(record)
            .map_err(DispatchError::Store)?;
        info!(load = %stored.id, status = stored.status.label(), "load created");

        let link = review_link(&self.public_base_url, &stored.id);
        let message = review_invitation(&broker.email, &link, Some(&stored.load_id_name));
        match self.mailer.send(&message).await {
            Ok(()) => {
                info!(load = %stored.id, broker = %broker.id, "review invitation dispatched");
            }
            Err(err) => {
                warn!(load = %stored.id, broker = %broker.id, error = %err,
                    "review invitation dispatch failed");
            }
        }

        Ok(LoadCreated {
            load: stored,
            review_link: link,
        })
    }

    pub fn list_loads(&self) -> Result<Vec<LoadView>, DispatchError> {
        let loads = self.store.list_loads().map_err(DispatchError::Store)?;
        loads
            .into_iter()
            .map(|load| {
                let broker_name = self
                    .store
                    .fetch_broker(&load.assigned_broker_id)
                    .map_err(DispatchError::Store)?
                    .map(|broker| broker.name);
                Ok(LoadView { load, broker_name })
            })
            .collect()
    }

    pub fn update_load(&self, id: &LoadId, update: LoadUpdate) -> Result<LoadRecord, DispatchError> {
        let patch = update.validate()?;
        if let Some(broker_id) = &patch.assigned_broker_id {
            self.store
                .fetch_broker(broker_id)
                .map_err(DispatchError::Store)?
                .ok_or(DispatchError::BrokerNotFound)?;
        }
        self.store.update_load(id, patch).map_err(|err| match err {
            StoreError::NotFound => DispatchError::LoadNotFound,
            other => DispatchError::Store(other),
        })
    }

    /// Delete a load; the store cascades to any review attached to it.
    pub fn delete_load(&self, id: &LoadId) -> Result<(), DispatchError> {
        self.store.delete_load(id).map_err(|err| match err {
            StoreError::NotFound => DispatchError::LoadNotFound,
            other => DispatchError::Store(other),
        })
    }

    pub fn delivery_loads(&self) -> Result<Vec<DeliveryLoadRecord>, DispatchError> {
        self.store
            .list_delivery_loads()
            .map_err(DispatchError::Store)
    }

    pub fn create_delivery_load(
        &self,
        load: NewDeliveryLoad,
    ) -> Result<DeliveryLoadRecord, DispatchError> {
        let record = load.validate()?;
        self.store
            .insert_delivery_load(record)
            .map_err(DispatchError::Store)
    }

    /// Flip the completion flag; the caller passes the value it currently
    /// displays.
    pub fn toggle_delivery_completion(
        &self,
        id: &DeliveryLoadId,
        current: bool,
    ) -> Result<DeliveryLoadRecord, DispatchError> {
        self.store
            .set_delivery_completed(id, !current)
            .map_err(|err| match err {
                StoreError::NotFound => DispatchError::DeliveryLoadNotFound,
                other => DispatchError::Store(other),
            })
    }

    pub fn delete_delivery_load(&self, id: &DeliveryLoadId) -> Result<(), DispatchError> {
        self.store.delete_delivery_load(id).map_err(|err| match err {
            StoreError::NotFound => DispatchError::DeliveryLoadNotFound,
            other => DispatchError::Store(other),
        })
    }

    pub fn dashboard(&self) -> Result<DashboardCounts, DispatchError> {
        Ok(DashboardCounts {
            brokers: self.store.count_brokers().map_err(DispatchError::Store)?,
            loads: self.store.count_loads().map_err(DispatchError::Store)?,
            reviews: self.store.count_reviews().map_err(DispatchError::Store)?,
        })
    }
}

/// Error raised by the dispatch console service.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] DispatchValidationError),
    #[error("broker not found")]
    BrokerNotFound,
    #[error("load not found")]
    LoadNotFound,
    #[error("delivery load not found")]
    DeliveryLoadNotFound,
    #[error(transparent)]
    Store(StoreError),
}
