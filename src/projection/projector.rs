//! Day-by-day cash-flow projection.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::movement::{Direction, Movement};
use crate::error::{FluxoError, Result};

/// One day of a projected series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    /// Calendar date of this point
    pub date: NaiveDate,
    /// Running balance from the start of the horizon through this date
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Sum of same-day inflow amounts
    #[serde(with = "rust_decimal::serde::float")]
    pub inflows: Decimal,
    /// Sum of same-day outflow amounts
    #[serde(with = "rust_decimal::serde::float")]
    pub outflows: Decimal,
}

#[derive(Debug, Default, Clone, Copy)]
struct DayTotals {
    inflows: Decimal,
    outflows: Decimal,
}

/// Project movements into a dense daily series over a fixed horizon.
///
/// Buckets every movement due within `[reference_date, reference_date +
/// horizon_days - 1]` by calendar date, then walks the horizon day by day
/// emitting one point per day with a running balance. Days without
/// movements contribute zero. Movements outside the horizon are ignored.
///
/// The input is never mutated; calling twice with the same arguments
/// yields identical output.
pub fn project(
    movements: &[Movement],
    horizon_days: u32,
    reference_date: NaiveDate,
) -> Result<Vec<ProjectionPoint>> {
    if horizon_days == 0 {
        return Err(FluxoError::InvalidArgument(
            "horizon must be at least one day".to_string(),
        ));
    }

    let last_day = reference_date
        .checked_add_days(Days::new(u64::from(horizon_days) - 1))
        .ok_or_else(|| {
            FluxoError::InvalidArgument("horizon extends past the supported calendar".to_string())
        })?;

    let mut buckets: HashMap<NaiveDate, DayTotals> = HashMap::new();
    for movement in movements {
        if movement.due_date < reference_date || movement.due_date > last_day {
            continue;
        }
        let totals = buckets.entry(movement.due_date).or_default();
        match movement.direction {
            Direction::Inflow => totals.inflows += movement.amount,
            Direction::Outflow => totals.outflows += movement.amount,
        }
    }

    debug!(
        movements = movements.len(),
        bucketed_days = buckets.len(),
        horizon_days,
        "Projecting cash flow"
    );

    let mut points = Vec::with_capacity(horizon_days as usize);
    let mut balance = Decimal::ZERO;

    for date in reference_date.iter_days().take(horizon_days as usize) {
        let totals = buckets.get(&date).copied().unwrap_or_default();
        balance += totals.inflows - totals.outflows;
        points.push(ProjectionPoint {
            date,
            balance,
            inflows: totals.inflows,
            outflows: totals.outflows,
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn inflow(due: NaiveDate, amount: &str) -> Movement {
        Movement::new(due, dec(amount), Direction::Inflow)
    }

    fn outflow(due: NaiveDate, amount: &str) -> Movement {
        Movement::new(due, dec(amount), Direction::Outflow)
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let result = project(&[], 0, date(2026, 8, 7));
        assert!(matches!(result, Err(FluxoError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_movements_yield_flat_series() {
        let today = date(2026, 8, 7);
        let points = project(&[], 7, today).unwrap();

        assert_eq!(points.len(), 7);
        for (offset, point) in points.iter().enumerate() {
            assert_eq!(point.date, today + Days::new(offset as u64));
            assert_eq!(point.balance, Decimal::ZERO);
            assert_eq!(point.inflows, Decimal::ZERO);
            assert_eq!(point.outflows, Decimal::ZERO);
        }
    }

    #[test]
    fn test_single_inflow_steps_the_balance() {
        let today = date(2026, 8, 7);
        let movements = vec![inflow(today + Days::new(3), "100")];
        let points = project(&movements, 10, today).unwrap();

        assert_eq!(points.len(), 10);
        for point in &points[..3] {
            assert_eq!(point.balance, Decimal::ZERO);
        }
        for point in &points[3..] {
            assert_eq!(point.balance, dec("100"));
        }
        assert_eq!(points[3].inflows, dec("100"));
    }

    #[test]
    fn test_same_day_inflow_and_outflow() {
        let today = date(2026, 8, 7);
        let movements = vec![inflow(today, "50"), outflow(today, "20")];
        let points = project(&movements, 1, today).unwrap();

        assert_eq!(points[0].inflows, dec("50"));
        assert_eq!(points[0].outflows, dec("20"));
        assert_eq!(points[0].balance, dec("30"));
    }

    #[test]
    fn test_movements_outside_horizon_are_ignored() {
        let today = date(2026, 8, 7);
        let movements = vec![
            inflow(today - Days::new(1), "500"),
            inflow(today + Days::new(5), "500"),
        ];
        let points = project(&movements, 5, today).unwrap();

        for point in &points {
            assert_eq!(point.balance, Decimal::ZERO);
        }
    }

    #[test]
    fn test_unordered_input_buckets_by_date() {
        let today = date(2026, 8, 7);
        let movements = vec![
            outflow(today + Days::new(2), "10"),
            inflow(today, "100"),
            inflow(today + Days::new(2), "40"),
        ];
        let points = project(&movements, 3, today).unwrap();

        assert_eq!(points[0].balance, dec("100"));
        assert_eq!(points[1].balance, dec("100"));
        assert_eq!(points[2].inflows, dec("40"));
        assert_eq!(points[2].outflows, dec("10"));
        assert_eq!(points[2].balance, dec("130"));
    }

    #[test]
    fn test_running_balance_invariant() {
        let today = date(2026, 1, 1);
        let movements = vec![
            inflow(today, "12.34"),
            outflow(today + Days::new(1), "5.67"),
            inflow(today + Days::new(4), "0.99"),
            outflow(today + Days::new(4), "7.00"),
        ];
        let points = project(&movements, 6, today).unwrap();

        assert_eq!(points[0].balance, points[0].inflows - points[0].outflows);
        for pair in points.windows(2) {
            assert_eq!(
                pair[1].balance,
                pair[0].balance + pair[1].inflows - pair[1].outflows
            );
        }
    }

    #[test]
    fn test_projection_is_idempotent() {
        let today = date(2026, 8, 7);
        let movements = vec![
            inflow(today, "10.10"),
            outflow(today + Days::new(1), "3.33"),
        ];

        let first = project(&movements, 4, today).unwrap();
        let second = project(&movements, 4, today).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decimal_sums_have_no_drift() {
        // A year of ten-cent inflows sums exactly, unlike binary floats.
        let today = date(2026, 1, 1);
        let movements: Vec<Movement> = (0..365)
            .map(|offset| inflow(today + Days::new(offset), "0.10"))
            .collect();
        let points = project(&movements, 365, today).unwrap();

        assert_eq!(points.last().unwrap().balance, dec("36.50"));
    }

    #[test]
    fn test_point_serializes_dates_and_numbers() {
        let today = date(2026, 8, 7);
        let points = project(&[inflow(today, "50"), outflow(today, "20")], 1, today).unwrap();
        let value = serde_json::to_value(&points[0]).unwrap();

        assert_eq!(value["date"], "2026-08-07");
        assert_eq!(value["balance"], 30.0);
        assert_eq!(value["inflows"], 50.0);
        assert_eq!(value["outflows"], 20.0);
    }
}
