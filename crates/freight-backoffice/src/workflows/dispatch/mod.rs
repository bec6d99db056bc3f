//! Admin dispatch console: broker and load management, delivery tracking,
//! and the dashboard counts. Creating a load triggers the one-time review
//! invitation to the assigned broker.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    BrokerUpdate, DispatchValidationError, LoadUpdate, LoadView, NewBroker, NewDeliveryLoad,
    NewLoad,
};
pub use router::dispatch_router;
pub use service::{DashboardCounts, DispatchError, DispatchService, LoadCreated};
