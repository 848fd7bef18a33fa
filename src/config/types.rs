//! Configuration types for tariff data and guardrails.
//!
//! This module contains the strongly-typed structures that are deserialized
//! from the YAML files of a tariff directory.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    DueType, MinimumRecord, RateRecord, ReductionRecord, SurchargeRecord, TierRecord,
};

/// Metadata about the tariff book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffMetadata {
    /// Short code for the tariff book (e.g., "TNPA-2024").
    pub code: String,
    /// The human-readable name of the tariff book.
    pub name: String,
    /// The version or effective period.
    pub version: String,
    /// Where the tariff book was published.
    #[serde(default)]
    pub source_url: Option<String>,
}

/// `tariff.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TariffFile {
    pub metadata: TariffMetadata,
    #[serde(default)]
    pub vat_rate: Option<Decimal>,
}

/// `rates.yaml` file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RatesFile {
    #[serde(default)]
    pub rates: Vec<RateRecord>,
}

/// `tiers.yaml` file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TiersFile {
    #[serde(default)]
    pub tiers: Vec<TierRecord>,
}

/// `surcharges.yaml` file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SurchargesFile {
    #[serde(default)]
    pub surcharges: Vec<SurchargeRecord>,
}

/// `reductions.yaml` file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ReductionsFile {
    #[serde(default)]
    pub reductions: Vec<ReductionRecord>,
}

/// `minimums.yaml` file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MinimumsFile {
    #[serde(default)]
    pub minimums: Vec<MinimumRecord>,
}

/// The complete tariff data loaded from a tariff directory.
///
/// A `TariffBook` is the raw material of a knowledge store. An empty book
/// is valid: every read then falls through to the reference tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TariffBook {
    /// Tariff book metadata.
    pub metadata: TariffMetadata,
    /// The VAT rate, if the book states one.
    pub vat_rate: Option<Decimal>,
    /// Flat rates.
    pub rates: Vec<RateRecord>,
    /// GT-bracket tiers.
    pub tiers: Vec<TierRecord>,
    /// Percentage surcharges.
    pub surcharges: Vec<SurchargeRecord>,
    /// Percentage reductions.
    pub reductions: Vec<ReductionRecord>,
    /// Minimum charges.
    pub minimums: Vec<MinimumRecord>,
}

/// A plausible net-amount range for one due type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlausibleRange {
    /// Lowest plausible net amount.
    pub min: Decimal,
    /// Highest plausible net amount.
    pub max: Decimal,
}

impl PlausibleRange {
    /// Creates a range from whole currency units.
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min: Decimal::from(min),
            max: Decimal::from(max),
        }
    }
}

/// Thresholds used by the guardrail layer.
///
/// Every field has a default; `guardrails.yaml` may override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailSettings {
    /// GT above which the input validator warns.
    pub max_gross_tonnage: Decimal,
    /// Grand total (incl. VAT) above which the output validator asks for verification.
    pub grand_total_ceiling: Decimal,
    /// The VAT rate business rules check against.
    pub statutory_vat_rate: Decimal,
    /// Allowed absolute VAT deviation, in currency units.
    pub vat_tolerance: Decimal,
    /// The mandated VTS minimum charge.
    pub vts_minimum: Decimal,
    /// Fraction of the VTS minimum below which a VTS net amount is a violation.
    pub vts_minimum_ratio: Decimal,
    /// Per-due confidence below which the hallucination detector warns.
    pub low_confidence_threshold: f64,
    /// Plausible net-amount ranges per due type.
    pub plausible_ranges: BTreeMap<DueType, PlausibleRange>,
}

impl Default for GuardrailSettings {
    fn default() -> Self {
        let plausible_ranges = BTreeMap::from([
            (DueType::LightDues, PlausibleRange::new(1_000, 500_000)),
            (DueType::VtsDues, PlausibleRange::new(235, 300_000)),
            (DueType::PortDues, PlausibleRange::new(5_000, 2_000_000)),
            (DueType::TowageDues, PlausibleRange::new(5_000, 1_500_000)),
            (DueType::PilotageDues, PlausibleRange::new(3_000, 800_000)),
            (DueType::RunningLinesDues, PlausibleRange::new(500, 80_000)),
        ]);

        Self {
            max_gross_tonnage: Decimal::from(600_000),
            grand_total_ceiling: Decimal::from(15_000_000),
            statutory_vat_rate: Decimal::new(15, 2),
            vat_tolerance: Decimal::ONE,
            vts_minimum: Decimal::new(23552, 2),
            vts_minimum_ratio: Decimal::new(9, 1),
            low_confidence_threshold: 0.5,
            plausible_ranges,
        }
    }
}
