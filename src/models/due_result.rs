//! Per-due-type result model.
//!
//! A [`DueResult`] captures one computed due: its base, surcharge and
//! reduction components, the net/VAT/total amounts, and an ordered
//! breakdown from which the derivation can be reconstructed.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DueType, RateSource};

/// The role a breakdown line plays in a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// A fixed or per-unit basic charge.
    Basic,
    /// A time-based incremental charge.
    Incremental,
    /// A GT-bracket base fee or the increment above the bracket floor.
    Tier,
    /// A minimum charge replacing the computed base.
    Minimum,
    /// The per-service charge multiplied by the number of operations.
    Operations,
    /// A percentage surcharge.
    Surcharge,
    /// A percentage reduction (negative amount).
    Reduction,
}

/// A single labelled line in a due's breakdown.
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::{BreakdownLine, LineKind};
/// use rust_decimal::Decimal;
///
/// let line = BreakdownLine {
///     kind: LineKind::Basic,
///     item: "Light dues: 513 × 100GT units × R117.08".to_string(),
///     amount: Decimal::new(6006204, 2),
/// };
/// assert_eq!(line.amount.to_string(), "60062.04");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// The role of this line.
    pub kind: LineKind,
    /// Human-readable description of the line.
    pub item: String,
    /// The line amount, rounded to 2 decimals. Reductions are negative.
    pub amount: Decimal,
}

/// The computed charge for one due type.
///
/// All monetary fields are rounded to 2 decimals when the result is built
/// and are never re-rounded. `net_amount` is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueResult {
    /// The due type this result is for.
    pub due_type: DueType,
    /// The base charge before surcharges and reductions.
    pub base_amount: Decimal,
    /// The sum of all surcharges.
    pub surcharge_amount: Decimal,
    /// The sum of all reductions (positive).
    pub reduction_amount: Decimal,
    /// `max(0, base + surcharge - reduction)`.
    pub net_amount: Decimal,
    /// VAT on the net amount.
    pub vat_amount: Decimal,
    /// Net plus VAT.
    pub total_with_vat: Decimal,
    /// The VAT rate applied.
    pub vat_rate: Decimal,
    /// Human-readable derivation of the base.
    pub formula: String,
    /// Ordered breakdown lines, in computation order.
    pub breakdown: Vec<BreakdownLine>,
    /// Confidence in the result, from 0 to 1.
    pub confidence: f64,
    /// Whether the vessel is exempt from this due.
    pub exempted: bool,
    /// Why the vessel is exempt, if it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exemption_reason: Option<String>,
    /// Warnings raised while computing this due.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Which source served each resolved tariff parameter.
    #[serde(default)]
    pub rate_sources: BTreeMap<String, RateSource>,
    /// The resolved inputs used for this due.
    #[serde(default)]
    pub parameters: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_result() -> DueResult {
        let mut rate_sources = BTreeMap::new();
        rate_sources.insert("rate_per_100gt".to_string(), RateSource::Reference);

        DueResult {
            due_type: DueType::LightDues,
            base_amount: dec("60062.04"),
            surcharge_amount: dec("0.00"),
            reduction_amount: dec("0.00"),
            net_amount: dec("60062.04"),
            vat_amount: dec("9009.31"),
            total_with_vat: dec("69071.35"),
            vat_rate: dec("0.15"),
            formula: "ceil(51300/100) = 513 units × R117.08/100GT".to_string(),
            breakdown: vec![BreakdownLine {
                kind: LineKind::Basic,
                item: "Light dues".to_string(),
                amount: dec("60062.04"),
            }],
            confidence: 1.0,
            exempted: false,
            exemption_reason: None,
            warnings: vec![],
            rate_sources,
            parameters: serde_json::json!({ "units": 513 }),
        }
    }

    #[test]
    fn test_due_result_serialization_uses_string_decimals() {
        let json = serde_json::to_value(sample_result()).unwrap();

        assert_eq!(json["due_type"], "light_dues");
        assert_eq!(json["net_amount"], "60062.04");
        assert_eq!(json["vat_amount"], "9009.31");
        assert_eq!(json["breakdown"][0]["kind"], "basic");
        assert_eq!(json["rate_sources"]["rate_per_100gt"], "reference");
        assert!(json.get("exemption_reason").is_none());
    }

    #[test]
    fn test_due_result_round_trips_through_json() {
        let original = sample_result();
        let json = serde_json::to_string(&original).unwrap();
        let restored: DueResult = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_line_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&LineKind::Operations).unwrap(),
            "\"operations\""
        );
        assert_eq!(
            serde_json::to_string(&LineKind::Reduction).unwrap(),
            "\"reduction\""
        );
    }
}
