//! Review workflow engine.
//!
//! A load's review link admits exactly one submission: the gate decides
//! between "not found", "already reviewed", and the open form; submission
//! validates the answers and persists the review; an admin later toggles
//! which reviews appear on the public testimonial wall.

pub mod domain;
pub mod link;
pub mod router;
pub mod service;

pub use domain::{
    AdminReviewView, PublicReviewView, ReviewFormContext, ReviewGate, ReviewSubmissionRequest,
    ValidationError,
};
pub use link::review_link;
pub use router::review_router;
pub use service::{ReviewSubmissionError, ReviewWorkflowError, ReviewWorkflowService};
