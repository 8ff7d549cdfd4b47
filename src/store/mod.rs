//! Movement store collaborator.
//!
//! The managed relational store is an external system; this module
//! abstracts it behind a trait so handlers and tests can work against
//! any backing implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::{FluxoError, Result};
use crate::projection::{Movement, RawMovement};

/// Source of movement records for projections.
#[async_trait]
pub trait MovementStore: Send + Sync {
    /// Fetch movements due within `[start, end]`, both bounds inclusive,
    /// ordered by due date ascending.
    async fn movements_due_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Movement>>;
}

/// An in-memory movement store.
///
/// Holds the full record set behind a read lock; range queries filter
/// and sort on the way out so callers always see ascending dates.
pub struct InMemoryMovementStore {
    movements: RwLock<Vec<Movement>>,
}

impl InMemoryMovementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_movements(Vec::new())
    }

    /// Create a store holding the given movements.
    pub fn with_movements(movements: Vec<Movement>) -> Self {
        Self {
            movements: RwLock::new(movements),
        }
    }

    /// Load a store from a JSON file of raw movement records.
    pub fn from_seed_file(path: &str) -> Result<Self> {
        info!(path, "Loading movement seed file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_seed_json(&contents)
    }

    /// Load a store from a JSON array of raw movement records.
    ///
    /// Records that fail normalization are dropped with a warning;
    /// only a malformed document is an error.
    pub fn from_seed_json(json: &str) -> Result<Self> {
        let raws: Vec<RawMovement> = serde_json::from_str(json)
            .map_err(|e| FluxoError::Store(format!("Failed to parse seed records: {}", e)))?;

        let movements: Vec<Movement> = raws.iter().filter_map(Movement::from_raw).collect();
        let skipped = raws.len() - movements.len();
        if skipped > 0 {
            warn!(skipped, "Dropped unusable seed records");
        }
        info!(loaded = movements.len(), "Seeded movement store");

        Ok(Self::with_movements(movements))
    }

    /// Add a movement to the store.
    pub fn insert(&self, movement: Movement) {
        let mut movements = self.movements.write();
        movements.push(movement);
    }

    /// Get the number of stored movements.
    pub fn len(&self) -> usize {
        let movements = self.movements.read();
        movements.len()
    }

    /// Whether the store holds no movements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryMovementStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovementStore for InMemoryMovementStore {
    async fn movements_due_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Movement>> {
        let movements = self.movements.read();
        let mut selected: Vec<Movement> = movements
            .iter()
            .filter(|m| m.due_date >= start && m.due_date <= end)
            .cloned()
            .collect();
        selected.sort_by_key(|m| m.due_date);
        Ok(selected)
    }
}
