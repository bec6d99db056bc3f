mod common;

use std::sync::Arc;

use common::MemoryStore;
use freight_backoffice::store::{
    BrokerStore, LoadStore, ReviewStore, StoreError,
};
use freight_backoffice::workflows::reviews::{
    ReviewGate, ReviewSubmissionError, ReviewSubmissionRequest, ReviewWorkflowService,
};

fn submission() -> ReviewSubmissionRequest {
    ReviewSubmissionRequest {
        on_time_pickup: true,
        on_time_delivery: true,
        use_btfs_again: "YES".to_string(),
        communication_rating: 5,
        performance_rating: 4,
        show_on_site: true,
        comment: "Smooth pickup and delivery.".to_string(),
    }
}

#[test]
fn gate_rejects_unknown_and_blank_load_ids() {
    let store = Arc::new(MemoryStore::new());
    let service = ReviewWorkflowService::new(store);

    assert_eq!(service.gate(""), ReviewGate::NotFound);
    assert_eq!(service.gate("   "), ReviewGate::NotFound);
    assert_eq!(service.gate("no-such-load"), ReviewGate::NotFound);
}

#[test]
fn gate_opens_for_an_unreviewed_load_and_closes_after_submission() {
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");
    let load = store
        .insert_load(common::load("L-1001", &broker.id, common::pickup_date(3)))
        .expect("load stored");

    let service = ReviewWorkflowService::new(store);

    match service.gate(&load.id.0) {
        ReviewGate::Open(form) => {
            assert_eq!(form.load_uuid, load.id);
            assert_eq!(form.load_id_name, "L-1001");
            assert_eq!(form.broker_name, "Acme Logistics");
        }
        other => panic!("expected open gate, got {other:?}"),
    }

    service
        .submit(&load.id.0, submission())
        .expect("first submission lands");

    assert_eq!(service.gate(&load.id.0), ReviewGate::AlreadyReviewed);
}

#[test]
fn deleted_broker_does_not_invalidate_the_link() {
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");
    let load = store
        .insert_load(common::load("L-1001", &broker.id, common::pickup_date(3)))
        .expect("load stored");
    store.delete_broker(&broker.id).expect("broker deleted");

    let service = ReviewWorkflowService::new(store);

    match service.gate(&load.id.0) {
        ReviewGate::Open(form) => {
            assert_eq!(form.broker_name, "N/A");
            assert_eq!(form.broker_id, broker.id);
        }
        other => panic!("expected open gate, got {other:?}"),
    }

    let record = service
        .submit(&load.id.0, submission())
        .expect("submission lands without the broker row");
    assert_eq!(record.broker_id, broker.id);

    assert_eq!(service.gate(&load.id.0), ReviewGate::AlreadyReviewed);
}

#[test]
fn a_load_accepts_exactly_one_review() {
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");
    let load = store
        .insert_load(common::load("L-1001", &broker.id, common::pickup_date(3)))
        .expect("load stored");

    let service = ReviewWorkflowService::new(store);
    service
        .submit(&load.id.0, submission())
        .expect("first submission lands");

    match service.submit(&load.id.0, submission()) {
        Err(ReviewSubmissionError::AlreadyReviewed) => {}
        other => panic!("expected duplicate rejection, got {other:?}"),
    }
}

#[test]
fn store_conflict_is_treated_as_a_duplicate() {
    // A second writer can land between the pre-check and the insert; the
    // store's uniqueness answer wins.
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");
    let load = store
        .insert_load(common::load("L-1001", &broker.id, common::pickup_date(3)))
        .expect("load stored");

    store
        .insert_review(common::review(&load.id, &broker.id, "first"))
        .expect("seed review");
    match store.insert_review(common::review(&load.id, &broker.id, "second")) {
        Err(StoreError::Conflict) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn invalid_answers_never_reach_the_store() {
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");
    let load = store
        .insert_load(common::load("L-1001", &broker.id, common::pickup_date(3)))
        .expect("load stored");

    let service = ReviewWorkflowService::new(store.clone());

    let mut bad = submission();
    bad.communication_rating = 0;
    assert!(matches!(
        service.submit(&load.id.0, bad),
        Err(ReviewSubmissionError::Validation(_))
    ));

    let mut bad = submission();
    bad.use_btfs_again = "PERHAPS".to_string();
    assert!(matches!(
        service.submit(&load.id.0, bad),
        Err(ReviewSubmissionError::Validation(_))
    ));

    let mut bad = submission();
    bad.comment = "  ".to_string();
    assert!(matches!(
        service.submit(&load.id.0, bad),
        Err(ReviewSubmissionError::Validation(_))
    ));

    assert_eq!(store.count_reviews().expect("count"), 0);
    assert!(matches!(service.gate(&load.id.0), ReviewGate::Open(_)));
}

#[test]
fn visibility_toggle_issues_one_write_and_flips_the_flag() {
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");
    let load = store
        .insert_load(common::load("L-1001", &broker.id, common::pickup_date(3)))
        .expect("load stored");
    let review = store
        .insert_review(common::review(&load.id, &broker.id, "great"))
        .expect("review stored");

    let service = ReviewWorkflowService::new(store.clone());
    let updated = service
        .toggle_visibility(&review.id, review.show_on_site)
        .expect("toggle succeeds");

    assert!(!updated.show_on_site);
    assert_eq!(store.visibility_writes(), 1);

    let restored = service
        .toggle_visibility(&review.id, updated.show_on_site)
        .expect("toggle back succeeds");
    assert!(restored.show_on_site);
    assert_eq!(store.visibility_writes(), 2);
}

#[test]
fn public_wall_only_carries_visible_reviews_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");

    let first = store
        .insert_load(common::load("L-1", &broker.id, common::pickup_date(1)))
        .expect("load stored");
    let second = store
        .insert_load(common::load("L-2", &broker.id, common::pickup_date(2)))
        .expect("load stored");
    let third = store
        .insert_load(common::load("L-3", &broker.id, common::pickup_date(3)))
        .expect("load stored");

    store
        .insert_review(common::review(&first.id, &broker.id, "older"))
        .expect("review stored");
    let hidden = store
        .insert_review(common::review(&second.id, &broker.id, "hidden"))
        .expect("review stored");
    store
        .set_visibility(&hidden.id, false)
        .expect("hide review");
    store
        .insert_review(common::review(&third.id, &broker.id, "newer"))
        .expect("review stored");

    let service = ReviewWorkflowService::new(store);
    let wall = service.public_wall().expect("wall loads");

    let comments: Vec<_> = wall.iter().map(|card| card.comment.as_str()).collect();
    assert_eq!(comments, vec!["newer", "older"]);
    assert!(wall
        .iter()
        .all(|card| card.broker_name.as_deref() == Some("Acme Logistics")));
}

#[test]
fn admin_table_joins_broker_and_load_names() {
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");
    let load = store
        .insert_load(common::load("L-7", &broker.id, common::pickup_date(5)))
        .expect("load stored");
    store
        .insert_review(common::review(&load.id, &broker.id, "great"))
        .expect("review stored");

    let service = ReviewWorkflowService::new(store);
    let rows = service.admin_reviews().expect("table loads");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].broker_name.as_deref(), Some("Acme Logistics"));
    assert_eq!(rows[0].load_id_name.as_deref(), Some("L-7"));
}

#[test]
fn deleting_a_load_cascades_to_its_review() {
    let store = Arc::new(MemoryStore::new());
    let broker = store
        .insert_broker(common::broker("Acme Logistics", "ops@acme.com"))
        .expect("broker stored");
    let load = store
        .insert_load(common::load("L-9", &broker.id, common::pickup_date(5)))
        .expect("load stored");
    store
        .insert_review(common::review(&load.id, &broker.id, "great"))
        .expect("review stored");

    store.delete_load(&load.id).expect("load deleted");

    assert_eq!(store.count_reviews().expect("count"), 0);
    assert!(store
        .review_for_load(&load.id)
        .expect("lookup succeeds")
        .is_none());
}
