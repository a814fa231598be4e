//! Edge Case Tests
//!
//! Tests for integrity failures, self-transitions, and the stability of
//! the record attachment.

use crate::*;

/// A durable record deleted behind the persister's back is a
/// data-integrity violation, not a retryable race.
#[test]
fn externally_deleted_record_is_fatal() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();
    persister.ensure_durable(&order).unwrap();
    let id = order.record().unwrap().id.unwrap();

    assert!(store.remove(&id));

    let err = persister.set_current(&order, "NEW", "PENDING").unwrap_err();
    match &err {
        PersistError::RecordVanished { id: missing } => assert_eq!(missing, &id),
        other => panic!("expected RecordVanished, got {other}"),
    }
    assert!(err.is_fatal());
    assert!(!err.is_retryable());
}

/// A self-transition is a legal commit: the precondition holds and the
/// record's history still advances.
#[test]
fn self_transition_is_a_legal_commit() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();
    persister.ensure_durable(&order).unwrap();
    persister.set_current(&order, "NEW", "PENDING").unwrap();
    let before = order.record().unwrap();

    persister.set_current(&order, "PENDING", "PENDING").unwrap();

    let after = order.record().unwrap();
    assert_eq!(after.state, "PENDING");
    assert_eq!(after.prev_state, "PENDING");
    assert!(after.updated > before.updated);
}

/// The record cell attached to an entity never changes identity, across
/// both commit paths and failures.
#[test]
fn record_attachment_is_stable() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();

    persister.set_current(&order, "NEW", "PENDING").unwrap();
    let cell = order.cell().unwrap();

    let _ = persister.set_current(&order, "NEW", "ACTIVE").unwrap_err();
    assert!(order.cell().unwrap().ptr_eq(&cell));

    persister.ensure_durable(&order).unwrap();
    assert!(order.cell().unwrap().ptr_eq(&cell));

    persister.set_current(&order, "PENDING", "ACTIVE").unwrap();
    assert!(order.cell().unwrap().ptr_eq(&cell));
}

/// An entity loaded with a record in a non-start state transitions from
/// that state; the start state only seeds brand-new records.
#[test]
fn preattached_record_keeps_its_state() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();
    order
        .record_slot()
        .get_or_attach(StateRecord::new("ACTIVE"));

    assert_eq!(persister.current_state(&order), "ACTIVE");
    persister.set_current(&order, "ACTIVE", "CLOSED").unwrap();
    assert_eq!(persister.current_state(&order), "CLOSED");
}

/// Stale errors render both state names for the caller's diagnostics.
#[test]
fn stale_error_message_names_both_states() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();
    persister.set_current(&order, "NEW", "PENDING").unwrap();

    let err = persister.set_current(&order, "NEW", "ACTIVE").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("NEW"));
    assert!(message.contains("PENDING"));
}

/// The store treats an unknown identity and a lost predicate the same
/// way; only the persister's re-fetch tells them apart.
#[test]
fn store_does_not_distinguish_missing_from_mismatch() {
    let store = create_store();
    let known = store.insert(&StateRecord::new("NEW")).unwrap();
    let unknown = RecordId::generate();

    let now = statevault::next_timestamp(chrono::Utc::now());
    for (id, expected) in [(&known, "PENDING"), (&unknown, "NEW")] {
        let matched = store
            .conditional_update(
                StatePredicate {
                    id,
                    expected_state: expected,
                },
                StateEffect {
                    prev_state: expected,
                    next_state: "ACTIVE",
                    updated: now,
                },
            )
            .unwrap();
        assert!(!matched);
    }
}
