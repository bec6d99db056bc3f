use crate::store::{
    BrokerId, LoadId, NewReviewRecord, Rating, ReviewId, ReviewRecord, UseAgain,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Raw form answers as posted by the public review form. Everything arrives
/// loosely typed and is validated before any store call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmissionRequest {
    pub on_time_pickup: bool,
    pub on_time_delivery: bool,
    pub use_btfs_again: String,
    pub communication_rating: u8,
    pub performance_rating: u8,
    /// Defaults to visible; the admin can hide it later.
    #[serde(default = "default_visibility")]
    pub show_on_site: bool,
    pub comment: String,
}

fn default_visibility() -> bool {
    true
}

/// Validated answers, ready to be attached to a load.
#[derive(Debug, Clone)]
pub struct ReviewAnswers {
    pub on_time_pickup: bool,
    pub on_time_delivery: bool,
    pub use_btfs_again: UseAgain,
    pub communication_rating: Rating,
    pub performance_rating: Rating,
    pub show_on_site: bool,
    pub comment: String,
}

impl ReviewAnswers {
    pub(crate) fn into_record(self, load_uuid: LoadId, broker_id: BrokerId) -> NewReviewRecord {
        NewReviewRecord {
            load_uuid,
            broker_id,
            on_time_pickup: self.on_time_pickup,
            on_time_delivery: self.on_time_delivery,
            use_btfs_again: self.use_btfs_again,
            communication_rating: self.communication_rating,
            performance_rating: self.performance_rating,
            comment: self.comment,
            show_on_site: self.show_on_site,
        }
    }
}

impl ReviewSubmissionRequest {
    /// Check every field constraint; nothing reaches the store on failure.
    pub fn validate(self) -> Result<ReviewAnswers, ValidationError> {
        let communication_rating = Rating::new(self.communication_rating).map_err(|err| {
            ValidationError::RatingOutOfRange {
                field: "communicationRating",
                value: err.0,
            }
        })?;
        let performance_rating = Rating::new(self.performance_rating).map_err(|err| {
            ValidationError::RatingOutOfRange {
                field: "performanceRating",
                value: err.0,
            }
        })?;
        let use_btfs_again = UseAgain::parse(&self.use_btfs_again)
            .ok_or_else(|| ValidationError::UnknownWillingness(self.use_btfs_again.clone()))?;

        let comment = self.comment.trim().to_string();
        if comment.is_empty() {
            return Err(ValidationError::EmptyComment);
        }

        Ok(ReviewAnswers {
            on_time_pickup: self.on_time_pickup,
            on_time_delivery: self.on_time_delivery,
            use_btfs_again,
            communication_rating,
            performance_rating,
            show_on_site: self.show_on_site,
            comment,
        })
    }
}

/// Field-level rejection surfaced inline next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be an integer between 1 and 5, got {value}")]
    RatingOutOfRange { field: &'static str, value: u8 },
    #[error("useBtfsAgain must be one of YES, MAYBE, or NO, got '{0}'")]
    UnknownWillingness(String),
    #[error("comment must not be empty")]
    EmptyComment,
}

/// Display data the open review form is pre-populated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFormContext {
    pub load_uuid: LoadId,
    pub load_id_name: String,
    pub broker_id: BrokerId,
    pub broker_name: String,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
}

/// Outcome of the review existence gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewGate {
    /// The link parameter does not resolve to a load.
    NotFound,
    /// A review already exists for this load; terminal.
    AlreadyReviewed,
    /// No review yet; present the form.
    Open(ReviewFormContext),
}

/// Admin table row: review joined with broker and load display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReviewView {
    #[serde(flatten)]
    pub review: ReviewRecord,
    pub broker_name: Option<String>,
    pub load_id_name: Option<String>,
}

/// Public testimonial card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReviewView {
    pub id: ReviewId,
    pub comment: String,
    pub communication_rating: Rating,
    pub performance_rating: Rating,
    pub broker_name: Option<String>,
    pub load_id_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
