//! Calculation result models for the Port Tariff Engine.
//!
//! This module contains the [`CalculationResult`] type and its associated
//! structures that capture all outputs from one port-call calculation:
//! the per-due results, grand totals, and calculation metadata.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DueResult, DueType};

/// Aggregated totals over all non-exempt dues.
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::DueTotals;
/// use rust_decimal::Decimal;
///
/// let totals = DueTotals::from_dues(std::iter::empty());
/// assert_eq!(totals.net_amount, Decimal::ZERO);
/// assert_eq!(totals.total_with_vat, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueTotals {
    /// Grand total excluding VAT.
    pub net_amount: Decimal,
    /// Grand total VAT.
    pub vat_amount: Decimal,
    /// Grand total including VAT.
    pub total_with_vat: Decimal,
}

impl DueTotals {
    /// Sums the given dues, skipping exempted ones.
    ///
    /// Each due is already rounded to 2 decimals, so the sums are exact.
    /// Sums beyond the representable range saturate at `Decimal::MAX`.
    pub fn from_dues<'a>(dues: impl IntoIterator<Item = &'a DueResult>) -> Self {
        dues.into_iter()
            .filter(|due| !due.exempted)
            .fold(Self::default(), |acc, due| Self {
                net_amount: acc.net_amount.saturating_add(due.net_amount),
                vat_amount: acc.vat_amount.saturating_add(due.vat_amount),
                total_with_vat: acc.total_with_vat.saturating_add(due.total_with_vat),
            })
    }
}

/// Metadata about how a calculation was performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationMetadata {
    /// The VAT rate in force for this calculation.
    pub vat_rate: Decimal,
    /// The due types whose calculators produced a result, in run order.
    pub calculators_run: Vec<DueType>,
    /// The due types the vessel was exempt from.
    pub exempted: Vec<DueType>,
}

/// The complete result of a port-call calculation.
///
/// Results are created fresh per calculation and never mutated afterwards.
/// They are plain data and serialize to JSON verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The vessel's name.
    pub vessel_name: String,
    /// The port of call.
    pub port: String,
    /// The vessel's gross tonnage.
    pub gross_tonnage: Decimal,
    /// Time alongside, in days.
    pub days_in_port: Decimal,
    /// Results per due type; exempted dues are included.
    pub dues: BTreeMap<DueType, DueResult>,
    /// Grand totals over non-exempt dues.
    pub totals: DueTotals,
    /// Warnings raised while calculating (skipped or failed due types).
    pub warnings: Vec<String>,
    /// How the calculation was performed.
    pub metadata: CalculationMetadata,
}

impl CalculationResult {
    /// Returns the result for one due type, if it was calculated.
    pub fn due(&self, due_type: DueType) -> Option<&DueResult> {
        self.dues.get(&due_type)
    }
}
