//! Access to the baseline table.
//!
//! The engine never opens a database itself: it asks a provider for an
//! immutable snapshot and scores against it. Whoever owns the provider
//! decides where the table comes from and when it changes.

use std::sync::{Arc, RwLock};

use likely_common::BaselineTable;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("baseline unavailable: {0}")]
pub struct BaselineUnavailable(pub String);

/// Source of baseline snapshots.
///
/// Implementations can use:
/// - A table loaded once at startup (`StaticBaseline`)
/// - A table that is swapped while the server runs (`SharedBaseline`)
/// - A provider that always fails (`UnavailableBaseline`, testing)
pub trait BaselineProvider: Send + Sync {
    /// Current table. Callers hold the returned `Arc` for the duration of
    /// one computation so that a concurrent swap cannot be observed halfway.
    fn snapshot(&self) -> Result<Arc<BaselineTable>, BaselineUnavailable>;
}

// ── Static ────────────────────────────────────────────────────────────────────

pub struct StaticBaseline {
    table: Arc<BaselineTable>,
}

impl StaticBaseline {
    pub fn new(table: BaselineTable) -> Self {
        Self { table: Arc::new(table) }
    }
}

impl BaselineProvider for StaticBaseline {
    fn snapshot(&self) -> Result<Arc<BaselineTable>, BaselineUnavailable> {
        Ok(Arc::clone(&self.table))
    }
}

// ── Swappable ─────────────────────────────────────────────────────────────────

/// Provider whose table can be replaced at runtime. Readers get either the
/// old table or the new one, never a mix.
#[derive(Default)]
pub struct SharedBaseline {
    current: RwLock<Arc<BaselineTable>>,
}

impl SharedBaseline {
    pub fn new(table: BaselineTable) -> Self {
        Self { current: RwLock::new(Arc::new(table)) }
    }

    /// Swap in `table` and return the one it replaced.
    pub fn replace(&self, table: BaselineTable) -> Result<Arc<BaselineTable>, BaselineUnavailable> {
        let mut guard = self
            .current
            .write()
            .map_err(|_| BaselineUnavailable("baseline lock poisoned".to_string()))?;
        Ok(std::mem::replace(&mut *guard, Arc::new(table)))
    }
}

impl BaselineProvider for SharedBaseline {
    fn snapshot(&self) -> Result<Arc<BaselineTable>, BaselineUnavailable> {
        self.current
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|_| BaselineUnavailable("baseline lock poisoned".to_string()))
    }
}

// ── Mock implementation for testing ──────────────────────────────────────────

/// Provider that never produces a snapshot.
pub struct UnavailableBaseline {
    reason: String,
}

impl UnavailableBaseline {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl BaselineProvider for UnavailableBaseline {
    fn snapshot(&self) -> Result<Arc<BaselineTable>, BaselineUnavailable> {
        Err(BaselineUnavailable(self.reason.clone()))
    }
}
