//! Per-service charges shared by pilotage and berthing.
//!
//! Both are priced as `basic_fee + ceil(GT/100) × rate_per_100gt` per
//! service, for at least two services (inward and outward).

use rust_decimal::Decimal;
use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::knowledge::{RateResolver, Resolved};
use crate::models::{DueResult, DueType, LineKind, RateUnit, VesselQuery};

use super::base::{DueBuilder, units_of_100gt};

/// Services charged at minimum: one inward, one outward.
pub const MIN_SERVICES: u32 = 2;

/// The tariff values a per-service calculation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRates {
    /// Basic fee per service.
    pub basic_fee: Resolved<Decimal>,
    /// Rate per started 100 GT per service.
    pub rate_per_100gt: Resolved<Decimal>,
    /// Outside-working-hours surcharge, whole percent.
    pub owh_pct: Resolved<Decimal>,
    /// VAT rate.
    pub vat_rate: Resolved<Decimal>,
}

/// Resolves per-service rates for a due type at a query's port.
pub fn resolve_service_rates(
    due_type: DueType,
    query: &VesselQuery,
    resolver: &RateResolver,
) -> EngineResult<ServiceRates> {
    let port = query.port.as_str();
    let required = |unit: RateUnit| -> EngineResult<Resolved<Decimal>> {
        resolver
            .rate(due_type, port, unit)?
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("no {} {} rate for port '{}'", due_type, unit.as_str(), port),
            })
    };

    Ok(ServiceRates {
        basic_fee: required(RateUnit::PerService)?,
        rate_per_100gt: required(RateUnit::Per100Gt)?,
        owh_pct: resolver.surcharge_pct(due_type, "outside_working_hours", port)?,
        vat_rate: resolver.vat_rate()?,
    })
}

/// Computes a per-service due. `label` names the service in breakdown lines.
pub(crate) fn calculate_service_due(
    due_type: DueType,
    label: &str,
    query: &VesselQuery,
    rates: &ServiceRates,
) -> EngineResult<DueResult> {
    let port = query.port.as_str();
    let mut builder = DueBuilder::new(due_type);
    let basic = builder.resolved("basic_fee", &rates.basic_fee, port);
    let rate = builder.resolved("rate_per_100gt", &rates.rate_per_100gt, port);
    let vat_rate = builder.resolved("vat_rate", &rates.vat_rate, port);

    let units = units_of_100gt(query.gross_tonnage);
    let operations = query.num_operations.max(MIN_SERVICES);
    let gt_charge = builder.mul(units, rate)?;
    let per_service = builder.add(basic, gt_charge)?;

    builder.line(
        LineKind::Basic,
        format!("Basic {} ({}): R{:.2}", label, port, basic),
        basic,
    );
    builder.line(
        LineKind::Basic,
        format!("GT: {} × R{:.2}/100GT = R{:.2}", units, rate, gt_charge),
        gt_charge,
    );

    let base = builder.mul(per_service, Decimal::from(operations))?;
    builder.line(
        LineKind::Operations,
        format!("× {} {} operations", operations, label),
        base,
    );

    if query.outside_working_hours {
        let pct = builder.resolved("outside_working_hours", &rates.owh_pct, port);
        let amount = builder.percent(base, pct)?;
        builder.surcharge(format!("{}% OWH surcharge", pct.normalize()), amount)?;
    }

    let formula = format!(
        "(R{:.2} + {}×R{:.2}) × {} ops [{}]",
        basic, units, rate, operations, port
    );
    let parameters = json!({
        "gross_tonnage": query.gross_tonnage,
        "units": units,
        "basic_fee": basic,
        "rate_per_100gt": rate,
        "operations": operations,
    });

    builder.finish(base, vat_rate, formula, parameters)
}
