//! Integration tests for the planning side of the reclassification
//! workflow: stock snapshot provider, destination filtering, and plan
//! construction over a snapshot.

use estancia_console::models::PlanSession;
use estancia_console::services::stock::destination_categories;
use estancia_console::services::StockSnapshotService;
use estancia_core::{AgeBracket, CategoryId, CompanyId, EstablishmentId, LotId, Sex};

use estancia_integration_tests::{category, header, lot, stock_line, ScriptedBackend};

// =============================================================================
// Stock Snapshot Provider
// =============================================================================

#[tokio::test]
async fn test_snapshot_sorts_lots_and_lines() {
    let backend = ScriptedBackend::new().with_lots(vec![
        lot(
            3,
            "Lote Sur",
            vec![stock_line(3, 5, 8, 3200.0), stock_line(3, 1, 4, 600.0)],
        ),
        lot(1, "Lote Norte", vec![stock_line(1, 3, 20, 4000.0)]),
    ]);

    let service = StockSnapshotService::new(&backend);
    let lots = service
        .list_lots_with_stock(EstablishmentId::new(1))
        .await;

    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0].id, LotId::new(1));
    assert_eq!(lots[1].id, LotId::new(3));
    // Lines within a lot are sorted by category
    assert_eq!(lots[1].stock[0].category_id, CategoryId::new(1));
    assert_eq!(lots[1].stock[1].category_id, CategoryId::new(5));
}

#[tokio::test]
async fn test_snapshot_filters_inactive_lots_and_empty_lines() {
    let mut dormant = lot(2, "Lote Viejo", vec![stock_line(2, 3, 15, 3000.0)]);
    dormant.inactive = true;

    let backend = ScriptedBackend::new().with_lots(vec![
        lot(
            1,
            "Lote Norte",
            vec![stock_line(1, 3, 20, 4000.0), stock_line(1, 5, 0, 0.0)],
        ),
        dormant,
        lot(4, "Lote Vacío", vec![stock_line(4, 3, 0, 0.0)]),
    ]);

    let service = StockSnapshotService::new(&backend);
    let lots = service
        .list_lots_with_stock(EstablishmentId::new(1))
        .await;

    // Inactive lot dropped, all-empty lot dropped, empty line dropped
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].id, LotId::new(1));
    assert_eq!(lots[0].stock.len(), 1);
    assert_eq!(lots[0].stock[0].head_count, 20);
}

#[tokio::test]
async fn test_snapshot_degrades_to_empty_on_backend_failure() {
    let backend = ScriptedBackend::new().fail_lots_fetch();

    let service = StockSnapshotService::new(&backend);
    let lots = service
        .list_lots_with_stock(EstablishmentId::new(1))
        .await;

    assert!(lots.is_empty());
}

// =============================================================================
// Destination Filtering
// =============================================================================

#[tokio::test]
async fn test_destinations_respect_sex_axis() {
    let backend = ScriptedBackend::new().with_categories(vec![
        category(1, "Ternera", Sex::Hembra, AgeBracket::Calf),
        category(2, "Vaquillona", Sex::Hembra, AgeBracket::Young),
        category(3, "Vaca", Sex::Hembra, AgeBracket::Adult),
        category(4, "Ternero", Sex::Macho, AgeBracket::Calf),
        category(5, "Novillo", Sex::Macho, AgeBracket::Young),
        category(6, "Toro", Sex::Macho, AgeBracket::Adult),
    ]);

    let service = StockSnapshotService::new(&backend);
    let categories = service.list_categories(CompanyId::new(1)).await;

    let destinations = destination_categories(&categories, CategoryId::new(2));
    let ids: Vec<i32> = destinations.iter().map(|c| c.id.as_i32()).collect();
    assert_eq!(ids, vec![1, 3]);

    let destinations = destination_categories(&categories, CategoryId::new(6));
    assert!(destinations.iter().all(|c| c.sex == Sex::Macho));
    assert!(destinations.iter().all(|c| c.id != CategoryId::new(6)));
}

// =============================================================================
// Plan Over a Snapshot
// =============================================================================

#[tokio::test]
async fn test_plan_session_covers_every_snapshot_line() {
    let backend = ScriptedBackend::new().with_lots(vec![
        lot(
            1,
            "Lote Norte",
            vec![stock_line(1, 3, 20, 4000.0), stock_line(1, 5, 8, 3200.0)],
        ),
        lot(2, "Lote Sur", vec![stock_line(2, 3, 12, 2400.0)]),
    ]);

    let service = StockSnapshotService::new(&backend);
    let lots = service
        .list_lots_with_stock(EstablishmentId::new(1))
        .await;

    let session = PlanSession::from_snapshot(header(), &lots);
    assert_eq!(session.lines().len(), 3);
    // Every line starts unselected at quantity zero
    assert!(session.lines().iter().all(|l| !l.selected));
    assert!(session.lines().iter().all(|l| l.quantity == 0));
    // Availability and weights carried from the snapshot
    assert_eq!(session.lines()[0].available, 20);
    assert!((session.lines()[0].average_weight - 200.0).abs() < f64::EPSILON);
}
