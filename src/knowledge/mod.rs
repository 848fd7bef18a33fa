//! Tariff knowledge: the store read contract and rate resolution.
//!
//! Calculators never read tariff data directly. They go through a
//! [`RateResolver`], which asks the current [`KnowledgeStore`] snapshot first
//! and falls back to the reference tables bundled with the engine, recording
//! which source served each value.
//!
//! # Example
//!
//! ```
//! use port_tariff_engine::knowledge::KnowledgeBase;
//! use port_tariff_engine::models::{DueType, RateSource, RateUnit};
//!
//! let knowledge = KnowledgeBase::empty();
//! let resolver = knowledge.resolver();
//!
//! let rate = resolver
//!     .rate(DueType::LightDues, "Durban", RateUnit::Per100Gt)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(rate.value.to_string(), "117.08");
//! assert_eq!(rate.source, RateSource::Reference);
//! ```

mod base;
pub mod reference;
mod resolver;
mod store;

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{DueType, RateUnit, ReductionRecord, SurchargeRecord, TierRecord};

pub use base::KnowledgeBase;
pub use resolver::{RateResolver, Resolved, ResolvedTiers, TierSelection, select_tier};
pub use store::{StoreStats, TariffStore};

/// The read contract of a tariff knowledge store.
///
/// Port-keyed reads prefer a record for the exact port and otherwise accept
/// an `ALL` record. `Ok(None)` or an empty list means the store has no
/// answer; an `Err` means the backend itself failed.
pub trait KnowledgeStore: Send + Sync {
    /// Returns the flat rate for a due type at a port in the given unit.
    fn get_rate(&self, due_type: DueType, port: &str, unit: RateUnit)
    -> EngineResult<Option<Decimal>>;

    /// Returns the GT-bracket tiers for a due type at a port, sorted by `gt_min`.
    fn get_tiers(&self, due_type: DueType, port: &str) -> EngineResult<Vec<TierRecord>>;

    /// Returns the minimum charge for a due type at a port.
    fn get_minimum(&self, due_type: DueType, port: &str) -> EngineResult<Option<Decimal>>;

    /// Returns every surcharge defined for a due type.
    fn get_surcharges(&self, due_type: DueType) -> EngineResult<Vec<SurchargeRecord>>;

    /// Returns every reduction defined for a due type.
    fn get_reductions(&self, due_type: DueType) -> EngineResult<Vec<ReductionRecord>>;

    /// Returns the VAT rate, if the store defines one.
    fn get_vat_rate(&self) -> EngineResult<Option<Decimal>>;
}
