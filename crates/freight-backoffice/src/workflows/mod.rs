//! Workflow families: the one-time review workflow and the admin dispatch
//! console.

pub mod dispatch;
pub mod reviews;
