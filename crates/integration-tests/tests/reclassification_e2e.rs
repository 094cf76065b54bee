//! End-to-end reclassification scenario: snapshot, plan, commit, inspect
//! the persisted activity, undo, and confirm the terminal state.

use estancia_console::models::PlanSession;
use estancia_console::services::{
    CommitOutcome, ReclassificationService, StockSnapshotService, UndoCoordinator, UndoError,
    UndoOutcome,
};
use estancia_core::{CategoryId, EstablishmentId, LotId, UserId};

use estancia_integration_tests::{header, lot, stock_line, ScriptedBackend};

#[tokio::test]
async fn test_full_reclassification_lifecycle() {
    // Lot 1 holds 20 heads of category 3 (young females) weighing 4000 kg
    // in total; the operator promotes all of them to category 5 (adults).
    let backend = ScriptedBackend::new()
        .with_lots(vec![lot(1, "Lote Norte", vec![stock_line(1, 3, 20, 4000.0)])]);
    let operator = UserId::new(9);

    // Snapshot
    let snapshot_service = StockSnapshotService::new(&backend);
    let lots = snapshot_service
        .list_lots_with_stock(EstablishmentId::new(1))
        .await;
    assert_eq!(lots.len(), 1);

    // Plan
    let mut session = PlanSession::from_snapshot(header(), &lots);
    session.toggle_category(LotId::new(1), CategoryId::new(3), true);
    session.set_destination(LotId::new(1), CategoryId::new(3), Some(CategoryId::new(5)));
    assert!(session.validate().is_empty());

    // Commit
    let commit_service = ReclassificationService::new(&backend);
    let outcome = match commit_service.commit(&session).await {
        Ok(outcome) => outcome,
        Err(e) => panic!("commit failed: {e}"),
    };
    let activity_id = match outcome {
        CommitOutcome::Committed { activity_id, .. } => activity_id,
        CommitOutcome::PartialFailure { message, .. } => {
            panic!("unexpected partial failure: {message}")
        }
    };

    // The persisted activity carries the snapshot-derived average weight
    let activity = backend.activity(activity_id).expect("activity persisted");
    assert_eq!(activity.lines.len(), 1);
    assert_eq!(activity.lines[0].quantity, 20);
    assert!((activity.lines[0].average_weight - 200.0).abs() < f64::EPSILON);
    assert_eq!(activity.lines[0].category_from, CategoryId::new(3));
    assert_eq!(activity.lines[0].category_to, CategoryId::new(5));

    // Undo moves the animals back
    let coordinator = UndoCoordinator::new(&backend);
    let outcome = match coordinator.undo(activity_id, operator).await {
        Ok(outcome) => outcome,
        Err(e) => panic!("undo failed: {e}"),
    };
    assert!(matches!(outcome, UndoOutcome::Reversed { line_count: 1, .. }));

    let calls = backend.commit_calls();
    assert_eq!(calls.len(), 2);
    // Commit call, then its exact inverse
    assert_eq!(calls[1].source_category, calls[0].destination_category);
    assert_eq!(calls[1].destination_category, calls[0].source_category);
    assert_eq!(calls[1].quantity, calls[0].quantity);

    // The activity is terminal: a second undo is rejected outright
    let second = coordinator.undo(activity_id, operator).await;
    assert!(matches!(second, Err(UndoError::AlreadyReversed(id)) if id == activity_id));
    assert_eq!(backend.commit_calls().len(), 2);
}
