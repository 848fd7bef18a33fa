//! Tariff-book compliance rules.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::GuardrailSettings;
use crate::models::{CalculationResult, DueType, VesselQuery, canonical_port};

/// Returns every business rule the result breaks.
///
/// - VAT on every due with a positive net amount must match the statutory
///   rate within the configured tolerance.
/// - A non-exempt VTS charge must not fall below the mandated minimum
///   (scaled by `vts_minimum_ratio`).
/// - Pilotage is compulsory at every recognised port, so a result for such
///   a port must contain pilotage dues.
pub fn enforce_business_rules(
    query: &VesselQuery,
    result: &CalculationResult,
    settings: &GuardrailSettings,
) -> Vec<String> {
    let mut violations = Vec::new();

    for (due_type, due) in result.dues.iter().filter(|(_, due)| due.net_amount > Decimal::ZERO) {
        let expected = due
            .net_amount
            .saturating_mul(settings.statutory_vat_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if (due.vat_amount - expected).abs() > settings.vat_tolerance {
            violations.push(format!(
                "{}: VAT should be R{:.2} but got R{:.2}",
                due_type, expected, due.vat_amount
            ));
        }
    }

    let vts_floor = settings.vts_minimum.saturating_mul(settings.vts_minimum_ratio);
    if let Some(vts) = result
        .due(DueType::VtsDues)
        .filter(|vts| !vts.exempted && vts.net_amount < vts_floor)
    {
        violations.push(format!(
            "VTS net amount R{:.2} is below mandatory minimum R{:.2}",
            vts.net_amount, settings.vts_minimum
        ));
    }

    if canonical_port(&query.port).is_some() && result.due(DueType::PilotageDues).is_none() {
        violations.push(format!(
            "Pilotage is compulsory at {} but no pilotage dues were calculated",
            query.port
        ));
    }

    violations
}
