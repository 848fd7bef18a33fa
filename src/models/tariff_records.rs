//! Tariff knowledge records.
//!
//! These are the typed rows a knowledge store serves: flat rates, GT-bracket
//! tiers, percentage surcharges and reductions, and minimum charges. Each is
//! keyed by due type and a [`PortScope`].

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DueType, normalize_port};

/// The ports a record applies to: one named port, or all ports.
///
/// Serialized as the port name, or the literal `ALL`.
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::PortScope;
///
/// let scope = PortScope::from("ALL".to_string());
/// assert_eq!(scope, PortScope::All);
/// assert!(scope.matches("Durban"));
///
/// let scope = PortScope::from("Durban".to_string());
/// assert!(scope.matches("durban"));
/// assert!(!scope.matches("Cape Town"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PortScope {
    /// Applies at every port.
    #[default]
    All,
    /// Applies at one named port.
    Port(String),
}

impl PortScope {
    /// Returns true if this scope names exactly the given port.
    pub fn is_exact(&self, port: &str) -> bool {
        match self {
            PortScope::All => false,
            PortScope::Port(name) => normalize_port(name) == normalize_port(port),
        }
    }

    /// Returns true if this scope covers the given port.
    pub fn matches(&self, port: &str) -> bool {
        matches!(self, PortScope::All) || self.is_exact(port)
    }
}

impl From<String> for PortScope {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            PortScope::All
        } else {
            PortScope::Port(trimmed.to_string())
        }
    }
}

impl From<PortScope> for String {
    fn from(scope: PortScope) -> Self {
        scope.to_string()
    }
}

impl fmt::Display for PortScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortScope::All => f.write_str("ALL"),
            PortScope::Port(name) => f.write_str(name),
        }
    }
}

/// The unit a flat rate is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateUnit {
    /// Per started 100 GT.
    #[serde(rename = "per_100gt")]
    Per100Gt,
    /// Per started 100 GT per 24 hours alongside.
    #[serde(rename = "per_100gt_per_day")]
    Per100GtPerDay,
    /// Per GT.
    #[serde(rename = "per_gt")]
    PerGt,
    /// Fixed fee per service rendered.
    #[serde(rename = "per_service")]
    PerService,
}

impl RateUnit {
    /// Returns the key used in records and audit output.
    pub fn as_str(&self) -> &'static str {
        match self {
            RateUnit::Per100Gt => "per_100gt",
            RateUnit::Per100GtPerDay => "per_100gt_per_day",
            RateUnit::PerGt => "per_gt",
            RateUnit::PerService => "per_service",
        }
    }
}

/// A flat rate for a due type at a port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    /// The due type this rate prices.
    pub due_type: DueType,
    /// The port(s) the rate applies to.
    #[serde(default)]
    pub port: PortScope,
    /// The rate value.
    pub rate: Decimal,
    /// The unit the rate is quoted in.
    pub unit: RateUnit,
    /// Tariff book section reference.
    #[serde(default)]
    pub section: Option<String>,
}

/// A GT bracket with its own base fee and incremental rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRecord {
    /// The due type this tier prices.
    pub due_type: DueType,
    /// The port(s) the tier applies to.
    #[serde(default)]
    pub port: PortScope,
    /// Inclusive lower GT bound.
    pub gt_min: Decimal,
    /// Inclusive upper GT bound; `None` means unbounded.
    #[serde(default)]
    pub gt_max: Option<Decimal>,
    /// Fixed fee for the bracket.
    pub base_fee: Decimal,
    /// Rate per started 100 GT above `gt_min`.
    #[serde(default)]
    pub rate_per_unit: Decimal,
    /// Tariff book section reference.
    #[serde(default)]
    pub section: Option<String>,
}

impl TierRecord {
    /// Returns true if the GT falls within this bracket.
    pub fn contains(&self, gt: Decimal) -> bool {
        gt >= self.gt_min && self.gt_max.is_none_or(|max| gt <= max)
    }

    /// Returns a human-readable bracket label, e.g. `[50001–100000]`.
    pub fn label(&self) -> String {
        match self.gt_max {
            Some(max) => format!("[{}–{}]", self.gt_min.normalize(), max.normalize()),
            None => format!("[{}–∞]", self.gt_min.normalize()),
        }
    }
}

/// A percentage surcharge on a due type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeRecord {
    /// The due type this surcharge applies to.
    pub due_type: DueType,
    /// The surcharge name, e.g. `outside_working_hours`.
    pub name: String,
    /// Whole percent, e.g. 25 for 25%.
    pub pct: Decimal,
    /// The port(s) the surcharge applies to.
    #[serde(default)]
    pub applies_to: PortScope,
    /// Plain-text condition description.
    #[serde(default)]
    pub condition: Option<String>,
}

/// A percentage reduction on a due type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionRecord {
    /// The due type this reduction applies to.
    pub due_type: DueType,
    /// The reduction name, e.g. `coaster`.
    pub name: String,
    /// Whole percent, e.g. 35 for 35%.
    pub pct: Decimal,
    /// The port(s) the reduction applies to.
    #[serde(default)]
    pub applies_to: PortScope,
    /// Plain-text condition description.
    #[serde(default)]
    pub condition: Option<String>,
}

/// A minimum charge for a due type at a port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumRecord {
    /// The due type this minimum applies to.
    pub due_type: DueType,
    /// The port(s) the minimum applies to.
    #[serde(default)]
    pub port: PortScope,
    /// The minimum amount.
    pub amount: Decimal,
}

/// Where a resolved tariff value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Served by the knowledge store.
    Store,
    /// Served by the reference table bundled with the engine.
    Reference,
}
