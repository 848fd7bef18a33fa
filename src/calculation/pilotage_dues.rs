//! Pilotage dues calculation (tariff section 3.3).
//!
//! Pilotage is compulsory at every recognised port and is charged per
//! service, with a minimum of two services (inward and outward).

use crate::error::EngineResult;
use crate::knowledge::RateResolver;
use crate::models::{DueResult, DueType, VesselQuery};

use super::DueCalculator;
use super::base::{check_exemption, exempt_due, exempt_result, validate_query};
use super::service::{ServiceRates, calculate_service_due, resolve_service_rates};

/// Resolves the pilotage rates for a query's port.
pub fn resolve_pilotage_dues_rates(
    query: &VesselQuery,
    resolver: &RateResolver,
) -> EngineResult<ServiceRates> {
    resolve_service_rates(DueType::PilotageDues, query, resolver)
}

/// Calculates pilotage dues: `(basic + ceil(GT/100) × rate) × max(operations, 2)`.
pub fn calculate_pilotage_dues(
    query: &VesselQuery,
    rates: &ServiceRates,
) -> EngineResult<DueResult> {
    let due_type = DueType::PilotageDues;
    if let Some(reason) = check_exemption(query, due_type) {
        return Ok(exempt_result(due_type, reason, rates.vat_rate.value));
    }
    calculate_service_due(due_type, "pilotage", query, rates)
}

/// Pilotage dues calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PilotageDuesCalculator;

impl DueCalculator for PilotageDuesCalculator {
    fn due_type(&self) -> DueType {
        DueType::PilotageDues
    }

    fn compute(&self, query: &VesselQuery, resolver: &RateResolver) -> EngineResult<DueResult> {
        validate_query(query)?;
        if let Some(exempt) = exempt_due(query, DueType::PilotageDues, resolver) {
            return Ok(exempt);
        }
        let rates = resolve_pilotage_dues_rates(query, resolver)?;
        calculate_pilotage_dues(query, &rates)
    }
}
