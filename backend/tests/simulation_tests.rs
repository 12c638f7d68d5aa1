//! Inventory simulation tests
//!
//! The simulator is a pure forward fold: inbound lands first, the
//! reorder line is observed, then the month's forecast flows out.

use proptest::prelude::*;

use shared::{simulate_stock, SimulationMonth, YearMonth};

fn months(figures: &[(i64, i64)]) -> Vec<SimulationMonth> {
    figures
        .iter()
        .enumerate()
        .map(|(offset, (forecast_qty, inbound_qty))| SimulationMonth {
            year_month: YearMonth::new(2026, 1).unwrap().add_months(offset as u32),
            forecast_qty: *forecast_qty,
            inbound_qty: *inbound_qty,
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Walk-through of the fold: inbound, observe, subtract, emit
    #[test]
    fn test_simulation_walkthrough() {
        let horizon = months(&[(50, 0), (50, 200), (100, 0)]);
        let projection = simulate_stock(100, 80, &horizon);

        assert_eq!(projection.len(), 3);
        assert_eq!(projection[0].simulated_stock, 50);
        assert_eq!(projection[1].simulated_stock, 200);
        assert_eq!(projection[2].simulated_stock, 100);

        // Reference lines are constant across the horizon
        for month in &projection {
            assert_eq!(month.rop_line, 80);
            assert_eq!(month.safety_line, 48);
        }
    }

    /// The below-reorder flag is observed after inbound lands and
    /// before the month's outflow
    #[test]
    fn test_below_reorder_observed_after_inbound() {
        // 60 on hand, 100 arriving: never below a reorder point of 80
        let projection = simulate_stock(60, 80, &months(&[(50, 100)]));
        assert!(!projection[0].below_reorder_point);

        // Without the inbound the same month is below the line
        let projection = simulate_stock(60, 80, &months(&[(50, 0)]));
        assert!(projection[0].below_reorder_point);
    }

    /// Simulated stock may go negative; the fold never clamps
    #[test]
    fn test_simulation_allows_negative_stock() {
        let projection = simulate_stock(30, 0, &months(&[(100, 0), (100, 0)]));
        assert_eq!(projection[0].simulated_stock, -70);
        assert_eq!(projection[1].simulated_stock, -170);
    }

    /// The safety line is round(reorder_point * 0.6)
    #[test]
    fn test_safety_line_rounding() {
        let projection = simulate_stock(0, 75, &months(&[(0, 0)]));
        assert_eq!(projection[0].safety_line, 45);

        let projection = simulate_stock(0, 76, &months(&[(0, 0)]));
        assert_eq!(projection[0].safety_line, 46);
    }

    /// Identical inputs yield identical projections
    #[test]
    fn test_simulation_is_deterministic() {
        let horizon = months(&[(120, 0), (80, 300), (90, 0), (200, 150)]);
        let first = simulate_stock(500, 250, &horizon);
        let second = simulate_stock(500, 250, &horizon);
        assert_eq!(first, second);
    }

    /// An empty horizon is an empty projection
    #[test]
    fn test_simulation_empty_horizon() {
        assert!(simulate_stock(100, 50, &[]).is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for per-month forecast/inbound figures
    fn figures_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
        prop::collection::vec((0i64..1_000, 0i64..1_000), 0..12)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Stock is conserved: the final level equals on-hand plus all
        /// inbound minus all forecast outflow
        #[test]
        fn prop_stock_conservation(
            on_hand in -1_000i64..10_000,
            reorder_point in 0i64..1_000,
            figures in figures_strategy(),
        ) {
            let horizon = months(&figures);
            let projection = simulate_stock(on_hand, reorder_point, &horizon);

            let inbound: i64 = figures.iter().map(|(_, i)| i).sum();
            let outflow: i64 = figures.iter().map(|(f, _)| f).sum();
            let expected = on_hand + inbound - outflow;

            match projection.last() {
                Some(last) => prop_assert_eq!(last.simulated_stock, expected),
                None => prop_assert_eq!(on_hand, expected),
            }
        }

        /// Running the fold twice produces identical output sequences
        #[test]
        fn prop_simulation_idempotent_reads(
            on_hand in 0i64..10_000,
            reorder_point in 0i64..1_000,
            figures in figures_strategy(),
        ) {
            let horizon = months(&figures);
            prop_assert_eq!(
                simulate_stock(on_hand, reorder_point, &horizon),
                simulate_stock(on_hand, reorder_point, &horizon)
            );
        }

        /// Each month's stock is the previous month's stock plus its
        /// inbound minus its forecast
        #[test]
        fn prop_stepwise_consistency(
            on_hand in 0i64..10_000,
            figures in figures_strategy(),
        ) {
            let horizon = months(&figures);
            let projection = simulate_stock(on_hand, 100, &horizon);

            let mut previous = on_hand;
            for (month, (forecast_qty, inbound_qty)) in projection.iter().zip(&figures) {
                prop_assert_eq!(
                    month.simulated_stock,
                    previous + inbound_qty - forecast_qty
                );
                previous = month.simulated_stock;
            }
        }
    }
}
