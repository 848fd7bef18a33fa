//! Running lines (berthing services) dues calculation (tariff section 3.8).
//!
//! Berthing is priced like pilotage but carries no exemption check:
//! government and pleasure vessels pay for running lines too.

use crate::error::EngineResult;
use crate::knowledge::RateResolver;
use crate::models::{DueResult, DueType, VesselQuery};

use super::DueCalculator;
use super::base::validate_query;
use super::service::{ServiceRates, calculate_service_due, resolve_service_rates};

/// Resolves the berthing rates for a query's port.
pub fn resolve_running_lines_dues_rates(
    query: &VesselQuery,
    resolver: &RateResolver,
) -> EngineResult<ServiceRates> {
    resolve_service_rates(DueType::RunningLinesDues, query, resolver)
}

/// Calculates running lines dues: `(basic + ceil(GT/100) × rate) × max(operations, 2)`.
pub fn calculate_running_lines_dues(
    query: &VesselQuery,
    rates: &ServiceRates,
) -> EngineResult<DueResult> {
    calculate_service_due(DueType::RunningLinesDues, "berthing", query, rates)
}

/// Running lines dues calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningLinesDuesCalculator;

impl DueCalculator for RunningLinesDuesCalculator {
    fn due_type(&self) -> DueType {
        DueType::RunningLinesDues
    }

    fn compute(&self, query: &VesselQuery, resolver: &RateResolver) -> EngineResult<DueResult> {
        validate_query(query)?;
        let rates = resolve_running_lines_dues_rates(query, resolver)?;
        calculate_running_lines_dues(query, &rates)
    }
}
