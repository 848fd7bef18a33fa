//! Light dues calculation (tariff section 1.1).
//!
//! Light dues pay for navigational aids and are rated per started 100 GT.

use rust_decimal::Decimal;
use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::knowledge::{RateResolver, Resolved};
use crate::models::{DueResult, DueType, LineKind, RateUnit, VesselQuery};

use super::base::{
    DueBuilder, check_exemption, exempt_due, exempt_result, units_of_100gt, validate_query,
};
use super::DueCalculator;

/// The tariff values a light dues calculation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct LightDuesRates {
    /// Rate per started 100 GT.
    pub rate_per_100gt: Resolved<Decimal>,
    /// Minimum charge, if one is defined.
    pub minimum: Option<Resolved<Decimal>>,
    /// VAT rate.
    pub vat_rate: Resolved<Decimal>,
}

/// Resolves the light dues rates for a query's port.
pub fn resolve_light_dues_rates(
    query: &VesselQuery,
    resolver: &RateResolver,
) -> EngineResult<LightDuesRates> {
    let rate_per_100gt = resolver
        .rate(DueType::LightDues, &query.port, RateUnit::Per100Gt)?
        .ok_or_else(|| missing_rate(&query.port))?;

    Ok(LightDuesRates {
        rate_per_100gt,
        minimum: resolver.minimum(DueType::LightDues, &query.port)?,
        vat_rate: resolver.vat_rate()?,
    })
}

fn missing_rate(port: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("no light dues rate for port '{}'", port),
    }
}

/// Calculates light dues: `ceil(GT/100) × rate`, raised to the minimum if one applies.
///
/// # Example
///
/// ```
/// use port_tariff_engine::calculation::{calculate_light_dues, resolve_light_dues_rates};
/// use port_tariff_engine::knowledge::KnowledgeBase;
/// use port_tariff_engine::models::VesselQuery;
/// use rust_decimal::Decimal;
///
/// let query = VesselQuery {
///     gross_tonnage: Decimal::new(51300, 0),
///     port: "Durban".to_string(),
///     ..VesselQuery::default()
/// };
/// let rates = resolve_light_dues_rates(&query, &KnowledgeBase::empty().resolver()).unwrap();
///
/// let result = calculate_light_dues(&query, &rates).unwrap();
/// // 513 units × R117.08
/// assert_eq!(result.net_amount, Decimal::new(6006204, 2));
/// ```
pub fn calculate_light_dues(
    query: &VesselQuery,
    rates: &LightDuesRates,
) -> EngineResult<DueResult> {
    let due_type = DueType::LightDues;
    if let Some(reason) = check_exemption(query, due_type) {
        return Ok(exempt_result(due_type, reason, rates.vat_rate.value));
    }

    let mut builder = DueBuilder::new(due_type);
    let rate = builder.resolved("rate_per_100gt", &rates.rate_per_100gt, &query.port);
    let vat_rate = builder.resolved("vat_rate", &rates.vat_rate, &query.port);

    let gt = query.gross_tonnage;
    let units = units_of_100gt(gt);
    let mut base = builder.mul(units, rate)?;
    builder.line(
        LineKind::Basic,
        format!("Light dues: {} × 100GT units × R{:.2}", units, rate),
        base,
    );

    let mut minimum_amount = None;
    if let Some(minimum) = &rates.minimum {
        let minimum = builder.resolved("minimum", minimum, &query.port);
        minimum_amount = Some(minimum);
        if base < minimum {
            base = minimum;
            builder.line(LineKind::Minimum, format!("Minimum charge R{:.2} applied", minimum), base);
        }
    }

    let formula = format!("ceil({}/100) = {} units × R{}/100GT", gt, units, rate);
    let parameters = json!({
        "gross_tonnage": gt,
        "units": units,
        "rate_per_100gt": rate,
        "minimum": minimum_amount,
    });

    builder.finish(base, vat_rate, formula, parameters)
}

/// Light dues calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightDuesCalculator;

impl DueCalculator for LightDuesCalculator {
    fn due_type(&self) -> DueType {
        DueType::LightDues
    }

    fn compute(&self, query: &VesselQuery, resolver: &RateResolver) -> EngineResult<DueResult> {
        validate_query(query)?;
        if let Some(exempt) = exempt_due(query, DueType::LightDues, resolver) {
            return Ok(exempt);
        }
        let rates = resolve_light_dues_rates(query, resolver)?;
        calculate_light_dues(query, &rates)
    }
}
