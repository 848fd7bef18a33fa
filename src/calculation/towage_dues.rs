//! Towage (tug assistance) dues calculation (tariff section 3.6).

use rust_decimal::Decimal;
use serde_json::json;

use crate::error::EngineResult;
use crate::knowledge::{RateResolver, Resolved, ResolvedTiers, TierSelection, select_tier};
use crate::models::{DueResult, DueType, LineKind, VesselQuery};

use super::DueCalculator;
use super::base::{
    DueBuilder, TIER_FALLBACK_CONFIDENCE, check_exemption, exempt_due, exempt_result,
    units_of_100gt, validate_query,
};

/// The tariff values a towage calculation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TowageDuesRates {
    /// GT-bracket tiers at the port.
    pub tiers: ResolvedTiers,
    /// Outside-working-hours surcharge, whole percent.
    pub owh_pct: Resolved<Decimal>,
    /// VAT rate.
    pub vat_rate: Resolved<Decimal>,
}

/// Resolves the towage tiers and surcharge for a query's port.
pub fn resolve_towage_dues_rates(
    query: &VesselQuery,
    resolver: &RateResolver,
) -> EngineResult<TowageDuesRates> {
    let due_type = DueType::TowageDues;
    Ok(TowageDuesRates {
        tiers: resolver.tiers(due_type, &query.port)?,
        owh_pct: resolver.surcharge_pct(due_type, "outside_working_hours", &query.port)?,
        vat_rate: resolver.vat_rate()?,
    })
}

/// Calculates towage dues.
///
/// `per_service = base_fee + ceil((GT - gt_min)/100) × rate_per_unit` for the
/// tier containing the GT, multiplied by `max(num_operations, 1)`.
///
/// # Example
///
/// ```
/// use port_tariff_engine::calculation::{calculate_towage_dues, resolve_towage_dues_rates};
/// use port_tariff_engine::knowledge::KnowledgeBase;
/// use port_tariff_engine::models::VesselQuery;
/// use rust_decimal::Decimal;
///
/// let query = VesselQuery {
///     gross_tonnage: Decimal::new(51300, 0),
///     port: "Durban".to_string(),
///     ..VesselQuery::default()
/// };
/// let rates = resolve_towage_dues_rates(&query, &KnowledgeBase::empty().resolver()).unwrap();
///
/// let result = calculate_towage_dues(&query, &rates).unwrap();
/// // (R73,118.07 + 13 × R32.24) × 2 operations
/// assert_eq!(result.net_amount, Decimal::new(14707438, 2));
/// ```
pub fn calculate_towage_dues(
    query: &VesselQuery,
    rates: &TowageDuesRates,
) -> EngineResult<DueResult> {
    let due_type = DueType::TowageDues;
    if let Some(reason) = check_exemption(query, due_type) {
        return Ok(exempt_result(due_type, reason, rates.vat_rate.value));
    }

    let port = query.port.as_str();
    let mut builder = DueBuilder::new(due_type);
    let tiers = builder.resolved("tiers", &rates.tiers, port);
    let vat_rate = builder.resolved("vat_rate", &rates.vat_rate, port);
    let gt = query.gross_tonnage;

    let tier = match select_tier(gt, &tiers) {
        TierSelection::Matched(tier) => tier,
        TierSelection::Fallback(tier) => {
            builder.cap_confidence(TIER_FALLBACK_CONFIDENCE);
            builder.warn(format!(
                "No towage tier contains GT {} at {}; using tier {}",
                gt,
                port,
                tier.label()
            ));
            tier
        }
        TierSelection::NotFound => {
            builder.cap_confidence(TIER_FALLBACK_CONFIDENCE);
            builder.warn("No towage tier could be determined for this GT/port combination");
            return builder.finish(
                Decimal::ZERO,
                vat_rate,
                "No tier found".to_string(),
                json!({ "gross_tonnage": gt }),
            );
        }
    };

    let operations = query.num_operations.max(1);
    let above_floor = units_of_100gt(gt - tier.gt_min);
    let increment = builder.mul(above_floor, tier.rate_per_unit)?;
    let per_service = builder.add(tier.base_fee, increment)?;

    builder.line(
        LineKind::Tier,
        format!("Tier {} GT: base R{:.2}", tier.label(), tier.base_fee),
        tier.base_fee,
    );
    if increment > Decimal::ZERO {
        builder.line(
            LineKind::Tier,
            format!(
                "Incr: ceil(({}-{})/100)×R{:.2}=R{:.2}",
                gt, tier.gt_min, tier.rate_per_unit, increment
            ),
            increment,
        );
    }

    let base = builder.mul(per_service, Decimal::from(operations))?;
    if operations > 1 {
        builder.line(
            LineKind::Operations,
            format!("× {} tug operations", operations),
            base,
        );
    }

    if query.outside_working_hours {
        let pct = builder.resolved("outside_working_hours", &rates.owh_pct, port);
        let amount = builder.percent(base, pct)?;
        builder.surcharge(format!("{}% OWH surcharge", pct.normalize()), amount)?;
    }

    let formula = format!(
        "Port={}, GT={}, base=R{:.2}+incr=R{:.2}, ×{} ops",
        port, gt, tier.base_fee, increment, operations
    );
    let parameters = json!({
        "gross_tonnage": gt,
        "tier": tier.label(),
        "base_fee": tier.base_fee,
        "rate_per_unit": tier.rate_per_unit,
        "units_above_floor": above_floor,
        "operations": operations,
    });

    builder.finish(base, vat_rate, formula, parameters)
}

/// Towage dues calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TowageDuesCalculator;

impl DueCalculator for TowageDuesCalculator {
    fn due_type(&self) -> DueType {
        DueType::TowageDues
    }

    fn compute(&self, query: &VesselQuery, resolver: &RateResolver) -> EngineResult<DueResult> {
        validate_query(query)?;
        if let Some(exempt) = exempt_due(query, DueType::TowageDues, resolver) {
            return Ok(exempt);
        }
        let rates = resolve_towage_dues_rates(query, resolver)?;
        calculate_towage_dues(query, &rates)
    }
}
