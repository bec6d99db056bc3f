//! Back-office domain library for a small freight brokerage.
//!
//! The admin console manages brokers and loads, each load carries a one-time
//! review link for its assigned broker, and reviews flagged for the site feed
//! the public testimonial wall. Persistence sits behind the [`store`] traits
//! (the hosted data service collaborator), outbound email behind the
//! [`notify::Mailer`] trait.

pub mod auth;
pub mod config;
pub mod error;
pub mod notify;
pub mod store;
pub mod telemetry;
pub mod workflows;
