//! Property tests for the Port Tariff Engine.
//!
//! These cover the invariants every calculation must hold regardless of
//! the vessel: unit rounding, VAT arithmetic, tier totality, exemption
//! zeroing, total aggregation and determinism.

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use port_tariff_engine::CalculationEngine;
use port_tariff_engine::calculation::units_of_100gt;
use port_tariff_engine::knowledge::{KnowledgeBase, TierSelection, reference, select_tier};
use port_tariff_engine::models::{DueType, RECOGNIZED_PORTS, VesselQuery};

fn engine() -> CalculationEngine {
    CalculationEngine::new(Arc::new(KnowledgeBase::empty()))
}

fn query(gt: u32, port_index: usize, days_hundredths: i64) -> VesselQuery {
    VesselQuery {
        vessel_name: "PROPTEST".to_string(),
        gross_tonnage: Decimal::from(gt),
        port: RECOGNIZED_PORTS[port_index].to_string(),
        days_in_port: Decimal::new(days_hundredths, 2),
        activity: "Loading".to_string(),
        ..VesselQuery::default()
    }
}

fn port_index() -> impl Strategy<Value = usize> {
    0..RECOGNIZED_PORTS.len()
}

proptest! {
    #[test]
    fn prop_units_are_ceiling_of_hundreds(gt in 1u32..2_000_000) {
        let expected = Decimal::from(gt.div_ceil(100));
        prop_assert_eq!(units_of_100gt(Decimal::from(gt)), expected);
    }

    #[test]
    fn prop_units_are_monotonic(a in 0u32..2_000_000, b in 0u32..2_000_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(units_of_100gt(Decimal::from(low)) <= units_of_100gt(Decimal::from(high)));
    }

    #[test]
    fn prop_vat_and_total_follow_net(
        gt in 1u32..600_000,
        port in port_index(),
        days in 0i64..6_000,
        owh in any::<bool>(),
        coaster in any::<bool>(),
    ) {
        let q = VesselQuery {
            outside_working_hours: owh,
            is_coaster: coaster,
            ..query(gt, port, days)
        };
        let result = engine().calculate(&q);
        let tolerance = Decimal::new(2, 2);

        for due in result.dues.values().filter(|due| !due.exempted) {
            let expected_vat = (due.net_amount * due.vat_rate)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            prop_assert!((due.vat_amount - expected_vat).abs() <= tolerance);
            prop_assert_eq!(due.total_with_vat, due.net_amount + due.vat_amount);
            prop_assert!(due.net_amount >= Decimal::ZERO);
        }
    }

    #[test]
    fn prop_tier_selection_is_total(
        port in port_index(),
        gt_cents in 0i64..100_000_000,
    ) {
        let tiers = reference::tiers(DueType::TowageDues, RECOGNIZED_PORTS[port])
            .expect("every port has towage tiers")
            .value;
        let gt = Decimal::new(gt_cents, 2);

        let selected = !matches!(select_tier(gt, &tiers), TierSelection::NotFound);
        prop_assert!(selected);
    }

    #[test]
    fn prop_exempt_dues_are_zero(
        gt in 1u32..600_000,
        port in port_index(),
        days in 0i64..6_000,
        owh in any::<bool>(),
        coaster in any::<bool>(),
    ) {
        let q = VesselQuery {
            vessel_flag: "SAPS".to_string(),
            outside_working_hours: owh,
            is_coaster: coaster,
            ..query(gt, port, days)
        };
        let result = engine().calculate(&q);

        for due in result.dues.values().filter(|due| due.exempted) {
            prop_assert_eq!(due.base_amount, Decimal::ZERO);
            prop_assert_eq!(due.surcharge_amount, Decimal::ZERO);
            prop_assert_eq!(due.reduction_amount, Decimal::ZERO);
            prop_assert_eq!(due.net_amount, Decimal::ZERO);
            prop_assert_eq!(due.vat_amount, Decimal::ZERO);
            prop_assert_eq!(due.total_with_vat, Decimal::ZERO);
        }
        prop_assert_eq!(result.metadata.exempted.len(), 5);
    }

    #[test]
    fn prop_totals_sum_non_exempt_dues(
        gt in 1u32..600_000,
        port in port_index(),
        days in 0i64..6_000,
        pleasure in any::<bool>(),
    ) {
        let q = VesselQuery {
            vessel_type: if pleasure { "pleasure" } else { "general" }.to_string(),
            ..query(gt, port, days)
        };
        let result = engine().calculate(&q);

        let net: Decimal = result
            .dues
            .values()
            .filter(|due| !due.exempted)
            .map(|due| due.net_amount)
            .sum();
        let total: Decimal = result
            .dues
            .values()
            .filter(|due| !due.exempted)
            .map(|due| due.total_with_vat)
            .sum();
        prop_assert_eq!(result.totals.net_amount, net);
        prop_assert_eq!(result.totals.total_with_vat, total);
        prop_assert_eq!(result.dues.len(), 6);
    }

    #[test]
    fn prop_calculation_is_idempotent(
        gt in 1u32..600_000,
        port in port_index(),
        days in 0i64..6_000,
    ) {
        let engine = engine();
        let q = query(gt, port, days);
        prop_assert_eq!(engine.calculate(&q), engine.calculate(&q));
    }

    #[test]
    fn prop_coaster_lowers_port_dues(
        gt in 1u32..600_000,
        port in port_index(),
        days in 0i64..6_000,
    ) {
        let engine = engine();
        let plain = engine.calculate(&query(gt, port, days));
        let coaster = engine.calculate(&VesselQuery {
            is_coaster: true,
            ..query(gt, port, days)
        });

        let plain_port = plain.due(DueType::PortDues).expect("port dues calculated");
        let coaster_port = coaster.due(DueType::PortDues).expect("port dues calculated");
        prop_assert!(coaster_port.net_amount < plain_port.net_amount);
        prop_assert!(coaster_port.reduction_amount > Decimal::ZERO);
    }
}
