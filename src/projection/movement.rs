//! Movement domain types and raw-record parsing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Direction of a movement: money expected in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inflow,
    Outflow,
}

/// A single dated, directional financial amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    /// Calendar date the amount falls due
    pub due_date: NaiveDate,
    /// Monetary value, always non-negative; direction carries the sign
    pub amount: Decimal,
    /// Whether the amount is expected in or out
    pub direction: Direction,
}

/// A movement row as stored by the external system.
///
/// The date arrives as text and the direction as a categorical kind,
/// so rows are normalized through [`Movement::from_raw`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMovement {
    pub due_date: String,
    pub amount: Decimal,
    pub kind: String,
}

impl Movement {
    pub fn new(due_date: NaiveDate, amount: Decimal, direction: Direction) -> Self {
        Self {
            due_date,
            amount,
            direction,
        }
    }

    /// Normalize a raw store row into a movement.
    ///
    /// Rows with an unparseable date or an unknown kind are dropped with
    /// a warning rather than failing the batch, so one bad record cannot
    /// take down a whole report.
    pub fn from_raw(raw: &RawMovement) -> Option<Self> {
        let due_date = match raw.due_date.parse::<NaiveDate>() {
            Ok(date) => date,
            Err(_) => {
                warn!(due_date = %raw.due_date, "Skipping movement with unparseable date");
                return None;
            }
        };

        let direction = match raw.kind.as_str() {
            "income" => Direction::Inflow,
            "expense" => Direction::Outflow,
            other => {
                warn!(kind = %other, "Skipping movement with unknown kind");
                return None;
            }
        };

        Some(Self {
            due_date,
            amount: raw.amount,
            direction,
        })
    }
}
