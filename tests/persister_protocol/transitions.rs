//! Transition Commit Tests
//!
//! Tests for committing transitions on both paths:
//! - In-memory commits for entities with no durable identity
//! - Conditional-update commits for durable entities
//! - History bookkeeping (previous state, update timestamps)

use crate::*;

/// An entity with no record transitions in memory and never touches the
/// store.
#[test]
fn first_transition_of_a_new_entity_commits_in_memory() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();

    persister.set_current(&order, "NEW", "PENDING").unwrap();

    let record = order.record().unwrap();
    assert_eq!(record.state, "PENDING");
    assert_eq!(record.prev_state, "NEW");
    assert!(record.id.is_none(), "entity must stay non-durable");
    assert!(store.is_empty(), "nothing may reach the store");
}

/// A durable entity commits through the store and mirrors the result.
#[test]
fn durable_transition_commits_through_the_store() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();
    persister.ensure_durable(&order).unwrap();

    persister.set_current(&order, "NEW", "PENDING").unwrap();

    let record = order.record().unwrap();
    assert_eq!(record.state, "PENDING");
    assert_eq!(record.prev_state, "NEW");

    let id = record.id.clone().unwrap();
    let stored = store.fetch(&id).unwrap().unwrap();
    assert_eq!(stored.state, "PENDING");
    assert_eq!(stored.prev_state, "NEW");
    assert_eq!(stored.updated, record.updated);
}

/// Previous state always names the state just left, and update times
/// strictly increase, along a whole transition chain.
#[test]
fn history_is_monotonic_along_a_chain() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();
    persister.ensure_durable(&order).unwrap();

    let mut last_updated = order.record().unwrap().updated;
    for pair in STATES.windows(2) {
        persister.set_current(&order, pair[0], pair[1]).unwrap();

        let record = order.record().unwrap();
        assert_eq!(record.state, pair[1]);
        assert_eq!(record.prev_state, pair[0]);
        assert!(
            record.updated > last_updated,
            "update time must strictly increase"
        );
        last_updated = record.updated;
    }

    assert_eq!(persister.current_state(&order), "CLOSED");
}

/// The same history bookkeeping holds on the in-memory path.
#[test]
fn history_is_monotonic_in_memory() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();

    persister.set_current(&order, "NEW", "PENDING").unwrap();
    let first = order.record().unwrap();

    persister.set_current(&order, "PENDING", "ACTIVE").unwrap();
    let second = order.record().unwrap();

    assert_eq!(second.prev_state, "PENDING");
    assert!(second.updated > first.updated);
    assert!(store.is_empty());
}

/// An entity can transition in memory first and become durable later; the
/// store then picks up from the in-memory state.
#[test]
fn transition_chain_spans_both_paths() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();

    persister.set_current(&order, "NEW", "PENDING").unwrap();
    persister.ensure_durable(&order).unwrap();

    let id = order.record().unwrap().id.unwrap();
    assert_eq!(store.fetch(&id).unwrap().unwrap().state, "PENDING");

    persister.set_current(&order, "PENDING", "ACTIVE").unwrap();
    let stored = store.fetch(&id).unwrap().unwrap();
    assert_eq!(stored.state, "ACTIVE");
    assert_eq!(stored.prev_state, "PENDING");
}

/// `current_state` reads through the record and falls back to the start
/// state for entities that have none.
#[test]
fn current_state_tracks_the_record() {
    let store = create_store();
    let persister = create_persister(&store);
    let order = Order::new();

    assert_eq!(persister.current_state(&order), "NEW");
    assert!(
        order.record().is_none(),
        "reading the state must not attach a record"
    );

    persister.set_current(&order, "NEW", "PENDING").unwrap();
    assert_eq!(persister.current_state(&order), "PENDING");
}
