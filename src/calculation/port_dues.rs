//! Port dues calculation (tariff section 4.1.1).
//!
//! Port dues combine a basic charge per started 100 GT with an incremental
//! charge per 100 GT for each day alongside. Reductions for coasters, short
//! stays and double-hull tankers are percentages of the whole base and add
//! up when several apply. Idle vessels staying more than 30 days pay a
//! surcharge on the incremental part.

use rust_decimal::Decimal;
use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::knowledge::{RateResolver, Resolved};
use crate::models::{DueResult, DueType, LineKind, RateUnit, VesselQuery};

use super::DueCalculator;
use super::base::{
    DueBuilder, check_exemption, exempt_due, exempt_result, units_of_100gt, validate_query,
};

/// Stays shorter than this many days (12 hours) earn the short-stay reduction.
pub const SHORT_STAY_DAYS: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Stays longer than this many days without cargo work are surcharged.
pub const IDLE_SURCHARGE_AFTER_DAYS: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// The tariff values a port dues calculation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PortDuesRates {
    /// Basic rate per started 100 GT.
    pub basic_per_100gt: Resolved<Decimal>,
    /// Incremental rate per started 100 GT per day.
    pub incremental_per_100gt_per_day: Resolved<Decimal>,
    /// Coaster reduction, whole percent.
    pub coaster_pct: Resolved<Decimal>,
    /// Short-stay reduction, whole percent.
    pub short_stay_pct: Resolved<Decimal>,
    /// Double-hull tanker reduction, whole percent.
    pub double_hull_pct: Resolved<Decimal>,
    /// Idle-vessel surcharge on the incremental part, whole percent.
    pub idle_surcharge_pct: Resolved<Decimal>,
    /// VAT rate.
    pub vat_rate: Resolved<Decimal>,
}

/// Resolves the port dues rates for a query's port.
pub fn resolve_port_dues_rates(
    query: &VesselQuery,
    resolver: &RateResolver,
) -> EngineResult<PortDuesRates> {
    let due_type = DueType::PortDues;
    let port = query.port.as_str();
    let required = |unit: RateUnit| -> EngineResult<Resolved<Decimal>> {
        resolver
            .rate(due_type, port, unit)?
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("no port dues {} rate for port '{}'", unit.as_str(), port),
            })
    };

    Ok(PortDuesRates {
        basic_per_100gt: required(RateUnit::Per100Gt)?,
        incremental_per_100gt_per_day: required(RateUnit::Per100GtPerDay)?,
        coaster_pct: resolver.reduction_pct(due_type, "coaster", port)?,
        short_stay_pct: resolver.reduction_pct(due_type, "short_stay", port)?,
        double_hull_pct: resolver.reduction_pct(due_type, "double_hull_tanker", port)?,
        idle_surcharge_pct: resolver.surcharge_pct(due_type, "idle_vessel", port)?,
        vat_rate: resolver.vat_rate()?,
    })
}

/// Calculates port dues.
///
/// `basic = units × basic_rate`, `incremental = units × incremental_rate × days`,
/// `base = basic + incremental`.
pub fn calculate_port_dues(query: &VesselQuery, rates: &PortDuesRates) -> EngineResult<DueResult> {
    let due_type = DueType::PortDues;
    if let Some(reason) = check_exemption(query, due_type) {
        return Ok(exempt_result(due_type, reason, rates.vat_rate.value));
    }

    let port = query.port.as_str();
    let mut builder = DueBuilder::new(due_type);
    let basic_rate = builder.resolved("basic_per_100gt", &rates.basic_per_100gt, port);
    let incremental_rate = builder.resolved(
        "incremental_per_100gt_per_day",
        &rates.incremental_per_100gt_per_day,
        port,
    );
    let vat_rate = builder.resolved("vat_rate", &rates.vat_rate, port);

    let gt = query.gross_tonnage;
    let days = query.days_in_port;
    let units = units_of_100gt(gt);

    let basic = builder.mul(units, basic_rate)?;
    let incremental = builder.mul(builder.mul(units, incremental_rate)?, days)?;
    let base = builder.add(basic, incremental)?;

    builder.line(
        LineKind::Basic,
        format!("Basic: {} units × R{:.2}/100GT", units, basic_rate),
        basic,
    );
    builder.line(
        LineKind::Incremental,
        format!(
            "Incremental: {} units × R{:.2} × {:.2}d",
            units, incremental_rate, days
        ),
        incremental,
    );

    let idle = days > IDLE_SURCHARGE_AFTER_DAYS && query.is_idle();
    if idle {
        let pct = builder.resolved("idle_vessel", &rates.idle_surcharge_pct, port);
        let amount = builder.percent(incremental, pct)?;
        builder.surcharge(
            format!("{}% surcharge (> 30 days, no cargo)", pct.normalize()),
            amount,
        )?;
    }

    let mut applied = Vec::new();
    let reductions = [
        (query.is_coaster, "coaster", "Coaster", &rates.coaster_pct),
        (days < SHORT_STAY_DAYS, "short_stay", "< 12h stay", &rates.short_stay_pct),
        (
            query.is_double_hull_tanker,
            "double_hull_tanker",
            "Double-hull tanker",
            &rates.double_hull_pct,
        ),
    ];
    for (applies, key, label, resolved) in reductions {
        if !applies {
            continue;
        }
        let pct = builder.resolved(key, resolved, port);
        let amount = builder.percent(base, pct)?;
        builder.reduction(format!("{} {}% reduction", label, pct.normalize()), amount)?;
        applied.push(key);
    }

    let formula = format!(
        "(ceil({}/100)×R{}) + (ceil({}/100)×R{}×{:.2}d)",
        gt, basic_rate, gt, incremental_rate, days
    );
    let parameters = json!({
        "gross_tonnage": gt,
        "units": units,
        "days_in_port": days,
        "basic_per_100gt": basic_rate,
        "incremental_per_100gt_per_day": incremental_rate,
        "reductions": applied,
        "idle_surcharge": idle,
    });

    builder.finish(base, vat_rate, formula, parameters)
}

/// Port dues calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortDuesCalculator;

impl DueCalculator for PortDuesCalculator {
    fn due_type(&self) -> DueType {
        DueType::PortDues
    }

    fn compute(&self, query: &VesselQuery, resolver: &RateResolver) -> EngineResult<DueResult> {
        validate_query(query)?;
        if let Some(exempt) = exempt_due(query, DueType::PortDues, resolver) {
            return Ok(exempt);
        }
        let rates = resolve_port_dues_rates(query, resolver)?;
        calculate_port_dues(query, &rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sudestada() -> VesselQuery {
        VesselQuery {
            vessel_name: "SUDESTADA".to_string(),
            gross_tonnage: dec("51300"),
            port: "Durban".to_string(),
            days_in_port: dec("3.39"),
            activity: "Exporting Iron Ore".to_string(),
            ..VesselQuery::default()
        }
    }

    fn compute(query: &VesselQuery) -> DueResult {
        PortDuesCalculator
            .compute(query, &KnowledgeBase::empty().resolver())
            .unwrap()
    }

    #[test]
    fn test_sudestada_port_dues() {
        let result = compute(&sudestada());

        // 513 × 192.73 = 98870.49; 513 × 57.79 × 3.39 = 100500.8553
        assert_eq!(result.base_amount, dec("199371.35"));
        assert_eq!(result.reduction_amount, Decimal::ZERO);
        assert_eq!(result.surcharge_amount, Decimal::ZERO);
        assert_eq!(result.net_amount, dec("199371.35"));
        assert_eq!(result.vat_amount, dec("29905.70"));
        assert_eq!(result.breakdown[0].amount, dec("98870.49"));
        assert_eq!(result.breakdown[1].amount, dec("100500.86"));
    }

    #[test]
    fn test_coaster_reduction() {
        let coaster = VesselQuery {
            is_coaster: true,
            ..sudestada()
        };
        let plain = compute(&sudestada());
        let result = compute(&coaster);

        assert!(result.net_amount < plain.net_amount);
        assert!(result.reduction_amount > Decimal::ZERO);
        // 35% of 199371.3453
        assert_eq!(result.reduction_amount, dec("69779.97"));
        assert_eq!(result.breakdown.last().unwrap().kind, LineKind::Reduction);
    }

    #[test]
    fn test_short_stay_reduction_below_twelve_hours() {
        let query = VesselQuery {
            days_in_port: dec("0.4"),
            ..sudestada()
        };
        let result = compute(&query);
        assert!(result.reduction_amount > Decimal::ZERO);
        assert_eq!(result.parameters["reductions"][0], "short_stay");

        let query = VesselQuery {
            days_in_port: dec("0.5"),
            ..sudestada()
        };
        assert_eq!(compute(&query).reduction_amount, Decimal::ZERO);
    }

    #[test]
    fn test_reductions_are_additive() {
        let query = VesselQuery {
            is_coaster: true,
            is_double_hull_tanker: true,
            ..sudestada()
        };
        let result = compute(&query);
        // 45% of the base
        assert_eq!(result.reduction_amount, dec("89717.11"));
        assert_eq!(result.breakdown.len(), 4);
    }

    #[test]
    fn test_idle_vessel_surcharge_after_thirty_days() {
        let query = VesselQuery {
            gross_tonnage: dec("1000"),
            port: "Durban".to_string(),
            days_in_port: dec("31"),
            ..VesselQuery::default()
        };
        let result = compute(&query);

        // incremental = 10 × 57.79 × 31 = 17914.90; 20% = 3582.98
        assert_eq!(result.surcharge_amount, dec("3582.98"));
        assert_eq!(result.breakdown[2].kind, LineKind::Surcharge);
    }

    #[test]
    fn test_no_idle_surcharge_with_activity() {
        let query = VesselQuery {
            days_in_port: dec("31"),
            ..sudestada()
        };
        assert_eq!(compute(&query).surcharge_amount, Decimal::ZERO);
    }

    #[test]
    fn test_pleasure_vessel_exempt() {
        let query = VesselQuery {
            vessel_type: "Pleasure".to_string(),
            ..sudestada()
        };
        let result = compute(&query);
        assert!(result.exempted);
        assert_eq!(result.base_amount, Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_stay_is_calculation_error() {
        let query = VesselQuery {
            gross_tonnage: dec("100000000000000000000000000"),
            days_in_port: dec("10000"),
            ..sudestada()
        };
        let result = PortDuesCalculator.compute(&query, &KnowledgeBase::empty().resolver());

        match result {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("port_dues"));
            }
            other => panic!("expected CalculationError, got {:?}", other),
        }
    }
}
