//! Integration tests for the undo coordinator: inverse line submission in
//! commit order, the already-reversed guard, and partial-failure retry
//! behavior.

use estancia_console::services::{UndoCoordinator, UndoError, UndoOutcome};
use estancia_core::{ActivityId, CategoryId, LotId, UserId};

use estancia_integration_tests::{activity, ScriptedBackend};

const OPERATOR: UserId = UserId::new(9);

// =============================================================================
// Inverse Symmetry
// =============================================================================

#[tokio::test]
async fn test_undo_submits_inverse_lines_in_commit_order() {
    let backend = ScriptedBackend::new();
    backend.seed_activity(activity(
        40,
        &[(7, 3, 5, 10, 250.0), (8, 1, 2, 4, 150.0)],
    ));

    let coordinator = UndoCoordinator::new(&backend);
    let outcome = match coordinator.undo(ActivityId::new(40), OPERATOR).await {
        Ok(outcome) => outcome,
        Err(e) => panic!("undo failed: {e}"),
    };

    match outcome {
        UndoOutcome::Reversed {
            activity_id,
            line_count,
        } => {
            assert_eq!(activity_id, ActivityId::new(40));
            assert_eq!(line_count, 2);
        }
        UndoOutcome::PartialFailure { message, .. } => {
            panic!("unexpected partial failure: {message}")
        }
    }

    // Categories swapped, quantity and weight untouched, order preserved
    let calls = backend.commit_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].lot_id, LotId::new(7));
    assert_eq!(calls[0].source_category, CategoryId::new(5));
    assert_eq!(calls[0].destination_category, CategoryId::new(3));
    assert_eq!(calls[0].quantity, 10);
    assert!((calls[0].average_weight - 250.0).abs() < f64::EPSILON);
    assert_eq!(calls[1].lot_id, LotId::new(8));

    // The activity is now terminal
    let reversed = backend.activity(ActivityId::new(40)).expect("activity");
    assert!(reversed.reversed);
    assert_eq!(reversed.reversed_by, Some(OPERATOR));
    assert!(reversed.reversed_at.is_some());
}

// =============================================================================
// Already-Reversed Guard
// =============================================================================

#[tokio::test]
async fn test_second_undo_is_rejected_without_mutation() {
    let backend = ScriptedBackend::new();
    backend.seed_activity(activity(41, &[(7, 3, 5, 10, 250.0)]));

    let coordinator = UndoCoordinator::new(&backend);
    let first = coordinator.undo(ActivityId::new(41), OPERATOR).await;
    assert!(matches!(first, Ok(UndoOutcome::Reversed { .. })));

    let commits_after_first = backend.commit_calls().len();
    let marks_after_first = backend.mark_calls();

    let second = coordinator.undo(ActivityId::new(41), OPERATOR).await;
    match second {
        Err(UndoError::AlreadyReversed(id)) => assert_eq!(id, ActivityId::new(41)),
        other => panic!("expected AlreadyReversed, got {other:?}"),
    }

    // The rejected attempt issued no mutating calls
    assert_eq!(backend.commit_calls().len(), commits_after_first);
    assert_eq!(backend.mark_calls(), marks_after_first);
}

#[tokio::test]
async fn test_undo_unknown_activity_is_a_fetch_error() {
    let backend = ScriptedBackend::new();

    let coordinator = UndoCoordinator::new(&backend);
    match coordinator.undo(ActivityId::new(99), OPERATOR).await {
        Err(UndoError::Fetch(_)) => {}
        other => panic!("expected fetch error, got {other:?}"),
    }
    assert!(backend.commit_calls().is_empty());
}

// =============================================================================
// Partial Failure and Retry
// =============================================================================

#[tokio::test]
async fn test_partial_undo_leaves_activity_unreversed() {
    let backend = ScriptedBackend::new().fail_commit_at(1);
    backend.seed_activity(activity(
        42,
        &[(7, 3, 5, 10, 250.0), (8, 1, 2, 4, 150.0), (9, 3, 5, 6, 180.0)],
    ));

    let coordinator = UndoCoordinator::new(&backend);
    let outcome = match coordinator.undo(ActivityId::new(42), OPERATOR).await {
        Ok(outcome) => outcome,
        Err(e) => panic!("undo failed: {e}"),
    };

    match outcome {
        UndoOutcome::PartialFailure {
            succeeded, lot_id, ..
        } => {
            assert_eq!(succeeded, 1);
            assert_eq!(lot_id, LotId::new(8));
        }
        UndoOutcome::Reversed { .. } => panic!("expected partial failure"),
    }

    // Third inverse line never attempted, reversed mark never issued
    assert_eq!(backend.commit_calls().len(), 2);
    assert_eq!(backend.mark_calls(), 0);
    let stored = backend.activity(ActivityId::new(42)).expect("activity");
    assert!(!stored.reversed);
}

#[tokio::test]
async fn test_retry_after_partial_failure_reattempts_all_lines() {
    let backend = ScriptedBackend::new().fail_commit_at(1);
    backend.seed_activity(activity(
        43,
        &[(7, 3, 5, 10, 250.0), (8, 1, 2, 4, 150.0)],
    ));

    let coordinator = UndoCoordinator::new(&backend);
    let first = coordinator.undo(ActivityId::new(43), OPERATOR).await;
    assert!(matches!(first, Ok(UndoOutcome::PartialFailure { .. })));

    backend.clear_commit_failure();
    let second = coordinator.undo(ActivityId::new(43), OPERATOR).await;
    assert!(matches!(second, Ok(UndoOutcome::Reversed { .. })));

    // The retry starts over from the first line: 2 calls on the first
    // attempt, 2 more on the retry.
    assert_eq!(backend.commit_calls().len(), 4);
    let stored = backend.activity(ActivityId::new(43)).expect("activity");
    assert!(stored.reversed);
}
