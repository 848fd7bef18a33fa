//! Core data models for the Port Tariff Engine.
//!
//! This module contains all the domain models used throughout the engine:
//! the vessel query going in, the tariff records the knowledge store serves,
//! and the due results and validation reports coming out.

mod calculation_result;
mod due_result;
mod due_type;
mod tariff_records;
mod validation_report;
mod vessel_profile;
mod vessel_query;

pub use calculation_result::{CalculationMetadata, CalculationResult, DueTotals};
pub use due_result::{BreakdownLine, DueResult, LineKind};
pub use due_type::{
    DueType, RECOGNIZED_PORTS, canonical_port, is_recognized_port, normalize_port,
};
pub use tariff_records::{
    MinimumRecord, PortScope, RateRecord, RateSource, RateUnit, ReductionRecord,
    SurchargeRecord, TierRecord,
};
pub use validation_report::ValidationReport;
pub use vessel_profile::{OperationalData, TechnicalSpecs, VesselMetadata, VesselProfile};
pub use vessel_query::{DEFAULT_OPERATIONS, VesselQuery};
