//! Due-type calculators for the Port Tariff Engine.
//!
//! Each due type has a module with three pieces: a rates struct holding the
//! resolved tariff values, a `resolve_*_rates` function that reads them
//! through a [`RateResolver`], and a pure `calculate_*` function mapping
//! (query, rates) to a [`DueResult`]. A unit struct ties the two together
//! behind the [`DueCalculator`] trait so the engine can dispatch on due type.

mod base;
mod light_dues;
mod pilotage_dues;
mod port_dues;
mod running_lines_dues;
mod service;
mod towage_dues;
mod vts_dues;

use crate::error::EngineResult;
use crate::knowledge::RateResolver;
use crate::models::{DueResult, DueType, VesselQuery};

pub use base::{
    DEFAULTED_PORT_CONFIDENCE, DueBuilder, TIER_FALLBACK_CONFIDENCE, check_exemption,
    exempt_due, exempt_result, percent_of, round_money, units_of_100gt, validate_query,
};
pub use light_dues::{
    LightDuesCalculator, LightDuesRates, calculate_light_dues, resolve_light_dues_rates,
};
pub use pilotage_dues::{
    PilotageDuesCalculator, calculate_pilotage_dues, resolve_pilotage_dues_rates,
};
pub use port_dues::{
    IDLE_SURCHARGE_AFTER_DAYS, PortDuesCalculator, PortDuesRates, SHORT_STAY_DAYS,
    calculate_port_dues, resolve_port_dues_rates,
};
pub use running_lines_dues::{
    RunningLinesDuesCalculator, calculate_running_lines_dues, resolve_running_lines_dues_rates,
};
pub use service::{MIN_SERVICES, ServiceRates, resolve_service_rates};
pub use towage_dues::{
    TowageDuesCalculator, TowageDuesRates, calculate_towage_dues, resolve_towage_dues_rates,
};
pub use vts_dues::{VtsDuesCalculator, VtsDuesRates, calculate_vts_dues, resolve_vts_dues_rates};

/// Computes one due type for a vessel query.
///
/// Implementations must be pure: the same query and the same store snapshot
/// always produce the same result. An `Err` is reserved for blocking
/// failures (invalid facts, an unreadable store); degraded results are
/// returned as `Ok` with reduced confidence.
pub trait DueCalculator: Send + Sync {
    /// The due type this calculator computes.
    fn due_type(&self) -> DueType;

    /// Computes the due for `query`, reading tariff values through `resolver`.
    fn compute(&self, query: &VesselQuery, resolver: &RateResolver) -> EngineResult<DueResult>;
}

/// Returns one calculator for each of the six due types.
pub fn default_calculators() -> Vec<Box<dyn DueCalculator>> {
    vec![
        Box::new(LightDuesCalculator),
        Box::new(PortDuesCalculator),
        Box::new(TowageDuesCalculator),
        Box::new(VtsDuesCalculator),
        Box::new(PilotageDuesCalculator),
        Box::new(RunningLinesDuesCalculator),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calculators_cover_every_due_type_once() {
        let due_types: Vec<DueType> = default_calculators()
            .iter()
            .map(|c| c.due_type())
            .collect();
        assert_eq!(due_types, DueType::all());
    }
}
