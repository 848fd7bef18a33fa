//! Vessel traffic services dues (tariff section 2.1).

use rust_decimal::Decimal;
use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::knowledge::{RateResolver, Resolved};
use crate::models::{DueResult, DueType, LineKind, RateUnit, VesselQuery};

use super::base::{DueBuilder, check_exemption, exempt_due, exempt_result, validate_query};
use super::DueCalculator;

/// The tariff values a VTS calculation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct VtsDuesRates {
    /// Rate per GT at the port.
    pub rate_per_gt: Resolved<Decimal>,
    /// Flat minimum charge.
    pub minimum: Resolved<Decimal>,
    /// VAT rate.
    pub vat_rate: Resolved<Decimal>,
}

/// Resolves the VTS rates for a query's port.
pub fn resolve_vts_dues_rates(
    query: &VesselQuery,
    resolver: &RateResolver,
) -> EngineResult<VtsDuesRates> {
    let rate_per_gt = resolver
        .rate(DueType::VtsDues, &query.port, RateUnit::PerGt)?
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("no VTS rate for port '{}'", query.port),
        })?;
    let minimum = resolver
        .minimum(DueType::VtsDues, &query.port)?
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("no VTS minimum for port '{}'", query.port),
        })?;

    Ok(VtsDuesRates {
        rate_per_gt,
        minimum,
        vat_rate: resolver.vat_rate()?,
    })
}

/// Calculates VTS dues: `max(GT × rate, minimum)`.
pub fn calculate_vts_dues(query: &VesselQuery, rates: &VtsDuesRates) -> EngineResult<DueResult> {
    let due_type = DueType::VtsDues;
    if let Some(reason) = check_exemption(query, due_type) {
        return Ok(exempt_result(due_type, reason, rates.vat_rate.value));
    }

    let mut builder = DueBuilder::new(due_type);
    let rate = builder.resolved("rate_per_gt", &rates.rate_per_gt, &query.port);
    let minimum = builder.resolved("minimum", &rates.minimum, &query.port);
    let vat_rate = builder.resolved("vat_rate", &rates.vat_rate, &query.port);

    let gt = query.gross_tonnage;
    let raw = builder.mul(gt, rate)?;
    let base = raw.max(minimum);
    if raw < minimum {
        builder.line(
            LineKind::Minimum,
            format!("VTS minimum fee applied (raw={:.2})", raw),
            base,
        );
    } else {
        builder.line(LineKind::Basic, format!("VTS: {} GT × R{}/GT", gt, rate), base);
    }

    let formula = format!(
        "{} GT × R{}/GT (port: {}), min R{}",
        gt, rate, query.port, minimum
    );
    let parameters = json!({
        "gross_tonnage": gt,
        "rate_per_gt": rate,
        "minimum": minimum,
        "minimum_applied": raw < minimum,
    });

    builder.finish(base, vat_rate, formula, parameters)
}

/// VTS dues calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct VtsDuesCalculator;

impl DueCalculator for VtsDuesCalculator {
    fn due_type(&self) -> DueType {
        DueType::VtsDues
    }

    fn compute(&self, query: &VesselQuery, resolver: &RateResolver) -> EngineResult<DueResult> {
        validate_query(query)?;
        if let Some(exempt) = exempt_due(query, DueType::VtsDues, resolver) {
            return Ok(exempt);
        }
        let rates = resolve_vts_dues_rates(query, resolver)?;
        calculate_vts_dues(query, &rates)
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

    fn query(gt: &str, port: &str) -> VesselQuery {
        VesselQuery {
            gross_tonnage: dec(gt),
            port: port.to_string(),
            ..VesselQuery::default()
        }
    }

    fn compute(q: &VesselQuery) -> DueResult {
        VtsDuesCalculator
            .compute(q, &KnowledgeBase::empty().resolver())
            .unwrap()
    }

    #[test]
    fn test_sudestada_vts_at_durban() {
        let result = compute(&query("51300", "Durban"));
        assert_eq!(result.net_amount, dec("33345.00"));
        assert_eq!(result.vat_amount, dec("5001.75"));
        assert_eq!(result.breakdown[0].kind, LineKind::Basic);
    }

    #[test]
    fn test_standard_rate_at_other_ports() {
        let result = compute(&query("10000", "Cape Town"));
        assert_eq!(result.net_amount, dec("5400.00"));
    }

    #[test]
    fn test_saldanha_uses_premium_rate() {
        let result = compute(&query("10000", "Saldanha"));
        assert_eq!(result.net_amount, dec("6500.00"));
    }

    #[test]
    fn test_minimum_fee_for_small_vessel() {
        let result = compute(&query("100", "Durban"));
        assert_eq!(result.net_amount, dec("235.52"));
        assert_eq!(result.breakdown[0].kind, LineKind::Minimum);
        assert_eq!(result.parameters["minimum_applied"], true);
    }

    #[test]
    fn test_navy_vessel_exempt() {
        let q = VesselQuery {
            vessel_flag: "South African Navy".to_string(),
            ..query("3000", "Durban")
        };
        let result = compute(&q);
        assert!(result.exempted);
        assert_eq!(result.total_with_vat, Decimal::ZERO);
    }
}
