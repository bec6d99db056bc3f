use std::sync::Arc;

use tracing::info;

use super::domain::{
    AdminReviewView, PublicReviewView, ReviewFormContext, ReviewGate, ReviewSubmissionRequest,
    ValidationError,
};
use crate::store::{DataStore, LoadId, ReviewId, ReviewRecord, StoreError};

/// Service composing the existence gate, submission, and visibility
/// administration over the injected data store.
pub struct ReviewWorkflowService<D> {
    store: Arc<D>,
}

impl<D> ReviewWorkflowService<D>
where
    D: DataStore + 'static,
{
    pub fn new(store: Arc<D>) -> Self {
        Self { store }
    }

    /// Decide which view the review link resolves to.
    ///
    /// A store failure collapses to `NotFound`: the gate fails toward
    /// rejection, never toward handing out a second form. A broker deleted
    /// after the load was created does not invalidate the link; the form
    /// falls back to a placeholder name.
    pub fn gate(&self, load_uuid: &str) -> ReviewGate {
        let load_uuid = load_uuid.trim();
        if load_uuid.is_empty() {
            return ReviewGate::NotFound;
        }
        let load_id = LoadId(load_uuid.to_string());

        let load = match self.store.fetch_load(&load_id) {
            Ok(Some(load)) => load,
            _ => return ReviewGate::NotFound,
        };

        match self.store.review_for_load(&load_id) {
            Ok(Some(review)) if !review.comment.trim().is_empty() => {
                return ReviewGate::AlreadyReviewed;
            }
            Ok(_) => {}
            Err(_) => return ReviewGate::NotFound,
        }

        let broker_name = match self.store.fetch_broker(&load.assigned_broker_id) {
            Ok(Some(broker)) => broker.name,
            Ok(None) => "N/A".to_string(),
            Err(_) => return ReviewGate::NotFound,
        };

        ReviewGate::Open(ReviewFormContext {
            load_uuid: load.id,
            load_id_name: load.load_id_name,
            broker_id: load.assigned_broker_id,
            broker_name,
            pickup_date: load.pickup_date,
            delivery_date: load.delivery_date,
        })
    }

    /// Validate and persist exactly one review for the load.
    ///
    /// The pre-check mirrors the gate; a store `Conflict` on the insert is
    /// additionally treated as the authoritative duplicate signal, so two
    /// near-simultaneous submissions cannot both land.
    pub fn submit(
        &self,
        load_uuid: &str,
        request: ReviewSubmissionRequest,
    ) -> Result<ReviewRecord, ReviewSubmissionError> {
        let answers = request.validate()?;

        let load_uuid = load_uuid.trim();
        if load_uuid.is_empty() {
            return Err(ReviewSubmissionError::LoadNotFound);
        }
        let load_id = LoadId(load_uuid.to_string());

        let load = self
            .store
            .fetch_load(&load_id)
            .map_err(ReviewSubmissionError::Store)?
            .ok_or(ReviewSubmissionError::LoadNotFound)?;

        if let Some(existing) = self
            .store
            .review_for_load(&load_id)
            .map_err(ReviewSubmissionError::Store)?
        {
            if !existing.comment.trim().is_empty() {
                return Err(ReviewSubmissionError::AlreadyReviewed);
            }
        }

        let record = self
            .store
            .insert_review(answers.into_record(load.id, load.assigned_broker_id))
            .map_err(|err| match err {
                StoreError::Conflict => ReviewSubmissionError::AlreadyReviewed,
                other => ReviewSubmissionError::Store(other),
            })?;

        info!(load = %record.load_uuid, review = %record.id, "review submitted");
        Ok(record)
    }

    /// Flip whether a review appears on the public wall. The caller passes
    /// the value it currently displays; one store update is issued.
    pub fn toggle_visibility(
        &self,
        id: &ReviewId,
        current_show_on_site: bool,
    ) -> Result<ReviewRecord, ReviewWorkflowError> {
        self.store
            .set_visibility(id, !current_show_on_site)
            .map_err(|err| match err {
                StoreError::NotFound => ReviewWorkflowError::NotFound,
                other => ReviewWorkflowError::Store(other),
            })
    }

    /// All reviews, newest first, joined with broker and load display data.
    pub fn admin_reviews(&self) -> Result<Vec<AdminReviewView>, StoreError> {
        let reviews = self.store.list_reviews()?;
        reviews
            .into_iter()
            .map(|review| {
                let broker_name = self
                    .store
                    .fetch_broker(&review.broker_id)?
                    .map(|broker| broker.name);
                let load_id_name = self
                    .store
                    .fetch_load(&review.load_uuid)?
                    .map(|load| load.load_id_name);
                Ok(AdminReviewView {
                    review,
                    broker_name,
                    load_id_name,
                })
            })
            .collect()
    }

    /// Reviews flagged for the public testimonial wall.
    pub fn public_wall(&self) -> Result<Vec<PublicReviewView>, StoreError> {
        let reviews = self.store.public_reviews()?;
        reviews
            .into_iter()
            .map(|review| {
                let broker_name = self
                    .store
                    .fetch_broker(&review.broker_id)?
                    .map(|broker| broker.name);
                let load_id_name = self
                    .store
                    .fetch_load(&review.load_uuid)?
                    .map(|load| load.load_id_name);
                Ok(PublicReviewView {
                    id: review.id,
                    comment: review.comment,
                    communication_rating: review.communication_rating,
                    performance_rating: review.performance_rating,
                    broker_name,
                    load_id_name,
                    created_at: review.created_at,
                })
            })
            .collect()
    }
}

/// Error raised by review submission.
#[derive(Debug, thiserror::Error)]
pub enum ReviewSubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("load not found")]
    LoadNotFound,
    #[error("a review already exists for this load")]
    AlreadyReviewed,
    #[error("could not submit review: {0}")]
    Store(StoreError),
}

/// Error raised by visibility administration.
#[derive(Debug, thiserror::Error)]
pub enum ReviewWorkflowError {
    #[error("review not found")]
    NotFound,
    #[error(transparent)]
    Store(StoreError),
}
