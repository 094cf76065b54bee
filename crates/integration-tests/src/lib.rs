//! Test support for Estancia integration tests.
//!
//! Provides [`ScriptedBackend`], an in-memory implementation of the
//! console's backend trait. It records every mutating call, can be
//! scripted to fail a specific commit invocation, and keeps persisted
//! activities in memory so commit-then-undo flows run end-to-end without a
//! real backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use estancia_console::backend::{BackendError, ReclassificationBackend};
use estancia_console::models::{
    ActivityLine, BatchHeader, Category, LotWithStock, ReclassificationActivity,
    ReclassificationOp, StockLine,
};
use estancia_core::{
    ActivityId, AgeBracket, CategoryId, CompanyId, EstablishmentId, LotId, Sex, UserId,
};

/// In-memory scripted backend.
///
/// All state lives behind a `Mutex` so the backend can be shared by
/// reference between a service under test and the assertions that follow.
#[derive(Default)]
pub struct ScriptedBackend {
    state: Mutex<ScriptedState>,
}

struct ScriptedState {
    lots: Vec<LotWithStock>,
    categories: Vec<Category>,
    activities: HashMap<ActivityId, ReclassificationActivity>,
    next_activity_id: i32,
    /// Commit invocation index (0-based, counted across the backend's
    /// lifetime) that should fail.
    fail_commit_at: Option<usize>,
    fail_lots_fetch: bool,
    commit_calls: Vec<ReclassificationOp>,
    mark_calls: usize,
}

impl Default for ScriptedState {
    fn default() -> Self {
        Self {
            lots: Vec::new(),
            categories: Vec::new(),
            activities: HashMap::new(),
            next_activity_id: 1,
            fail_commit_at: None,
            fail_lots_fetch: false,
            commit_calls: Vec::new(),
            mark_calls: 0,
        }
    }
}

impl ScriptedBackend {
    /// Create an empty scripted backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the lots returned by `fetch_lots_with_stock`.
    #[must_use]
    pub fn with_lots(self, lots: Vec<LotWithStock>) -> Self {
        self.lock().lots = lots;
        self
    }

    /// Seed the categories returned by `fetch_categories`.
    #[must_use]
    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        self.lock().categories = categories;
        self
    }

    /// Script the Nth commit invocation (0-based, lifetime-wide) to fail.
    #[must_use]
    pub fn fail_commit_at(self, index: usize) -> Self {
        self.lock().fail_commit_at = Some(index);
        self
    }

    /// Script `fetch_lots_with_stock` to fail.
    #[must_use]
    pub fn fail_lots_fetch(self) -> Self {
        self.lock().fail_lots_fetch = true;
        self
    }

    /// Stop failing commits (for retry scenarios).
    pub fn clear_commit_failure(&self) {
        self.lock().fail_commit_at = None;
    }

    /// Seed a persisted activity directly.
    pub fn seed_activity(&self, activity: ReclassificationActivity) {
        let mut state = self.lock();
        state.next_activity_id = state.next_activity_id.max(activity.id.as_i32() + 1);
        state.activities.insert(activity.id, activity);
    }

    /// Every commit call recorded so far, in invocation order.
    #[must_use]
    pub fn commit_calls(&self) -> Vec<ReclassificationOp> {
        self.lock().commit_calls.clone()
    }

    /// Number of `mark_activity_reversed` calls recorded so far.
    #[must_use]
    pub fn mark_calls(&self) -> usize {
        self.lock().mark_calls
    }

    /// A persisted activity by ID.
    #[must_use]
    pub fn activity(&self, id: ActivityId) -> Option<ReclassificationActivity> {
        self.lock().activities.get(&id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ReclassificationBackend for &ScriptedBackend {
    async fn fetch_lots_with_stock(
        &self,
        _establishment_id: EstablishmentId,
    ) -> Result<Vec<LotWithStock>, BackendError> {
        let state = self.lock();
        if state.fail_lots_fetch {
            return Err(BackendError::Rpc("scripted fetch failure".to_string()));
        }
        Ok(state.lots.clone())
    }

    async fn fetch_categories(
        &self,
        _company_id: CompanyId,
    ) -> Result<Vec<Category>, BackendError> {
        Ok(self.lock().categories.clone())
    }

    async fn commit_reclassification_line(
        &self,
        op: &ReclassificationOp,
    ) -> Result<(), BackendError> {
        let mut state = self.lock();
        let index = state.commit_calls.len();
        state.commit_calls.push(op.clone());
        if state.fail_commit_at == Some(index) {
            return Err(BackendError::Rpc(format!(
                "scripted failure for lot {}",
                op.lot_id
            )));
        }
        Ok(())
    }

    async fn persist_activity(
        &self,
        header: &BatchHeader,
        lines: &[ReclassificationOp],
    ) -> Result<ActivityId, BackendError> {
        let mut state = self.lock();
        let id = ActivityId::new(state.next_activity_id);
        state.next_activity_id += 1;
        state.activities.insert(
            id,
            ReclassificationActivity {
                id,
                header: header.clone(),
                lines: lines.iter().map(ActivityLine::from).collect(),
                reversed: false,
                reversed_at: None,
                reversed_by: None,
            },
        );
        Ok(id)
    }

    async fn fetch_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<ReclassificationActivity, BackendError> {
        self.lock()
            .activities
            .get(&activity_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("activity {activity_id}")))
    }

    async fn mark_activity_reversed(
        &self,
        activity_id: ActivityId,
        reversed_at: DateTime<Utc>,
        reversed_by: UserId,
    ) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.mark_calls += 1;
        let activity = state
            .activities
            .get_mut(&activity_id)
            .ok_or_else(|| BackendError::NotFound(format!("activity {activity_id}")))?;
        activity.reversed = true;
        activity.reversed_at = Some(reversed_at);
        activity.reversed_by = Some(reversed_by);
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A batch header for establishment 1, user 9.
#[must_use]
pub fn header() -> BatchHeader {
    BatchHeader {
        establishment_id: EstablishmentId::new(1),
        user_id: UserId::new(9),
        date: NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date"),
        time: NaiveTime::from_hms_opt(8, 30, 0).expect("valid time"),
        note: Some("recategorización otoño".to_string()),
    }
}

/// Build a stock line.
#[must_use]
pub fn stock_line(lot: i32, category: i32, head_count: u32, total_weight: f64) -> StockLine {
    StockLine {
        lot_id: LotId::new(lot),
        category_id: CategoryId::new(category),
        head_count,
        total_weight,
    }
}

/// Build an active lot from its stock lines.
#[must_use]
pub fn lot(id: i32, name: &str, stock: Vec<StockLine>) -> LotWithStock {
    LotWithStock {
        id: LotId::new(id),
        name: name.to_string(),
        paddock_id: None,
        inactive: false,
        stock,
    }
}

/// Build a category.
#[must_use]
pub fn category(id: i32, name: &str, sex: Sex, age: AgeBracket) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        sex,
        age,
    }
}

/// Build a persisted, un-reversed activity from detail tuples
/// `(lot, from, to, quantity, average_weight)`.
#[must_use]
pub fn activity(id: i32, details: &[(i32, i32, i32, u32, f64)]) -> ReclassificationActivity {
    ReclassificationActivity {
        id: ActivityId::new(id),
        header: header(),
        lines: details
            .iter()
            .map(|&(lot, from, to, quantity, average_weight)| ActivityLine {
                lot_id: LotId::new(lot),
                category_from: CategoryId::new(from),
                category_to: CategoryId::new(to),
                quantity,
                average_weight,
            })
            .collect(),
        reversed: false,
        reversed_at: None,
        reversed_by: None,
    }
}
