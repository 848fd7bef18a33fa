//! Vessel query model.
//!
//! This module defines the [`VesselQuery`] struct: the normalised facts about
//! one vessel calling at one port, which every calculator and validator reads.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DueType;

/// Default number of tug, pilotage or berthing operations: entry plus departure.
pub const DEFAULT_OPERATIONS: u32 = 2;

fn default_vessel_type() -> String {
    "general".to_string()
}

fn default_operations() -> u32 {
    DEFAULT_OPERATIONS
}

/// Normalised vessel and voyage facts for a single port call.
///
/// A query is built once per request and is never mutated during
/// calculation.
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::{DueType, VesselQuery};
/// use rust_decimal::Decimal;
///
/// let query = VesselQuery {
///     vessel_name: "SUDESTADA".to_string(),
///     gross_tonnage: Decimal::new(51300, 0),
///     port: "Durban".to_string(),
///     days_in_port: Decimal::new(339, 2),
///     ..VesselQuery::default()
/// };
///
/// assert_eq!(query.num_operations, 2);
/// assert_eq!(query.requested_due_types.len(), 6);
/// assert!(query.requested_due_types.contains(&DueType::PilotageDues));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselQuery {
    /// The vessel's name.
    #[serde(default)]
    pub vessel_name: String,
    /// The vessel type (e.g. "Bulk Carrier", "pleasure").
    #[serde(default = "default_vessel_type")]
    pub vessel_type: String,
    /// The flag state, as free text.
    #[serde(default)]
    pub vessel_flag: String,
    /// Gross tonnage, the primary rating basis.
    pub gross_tonnage: Decimal,
    /// Net tonnage.
    #[serde(default)]
    pub net_tonnage: Decimal,
    /// Deadweight tonnage.
    #[serde(default)]
    pub dwt: Decimal,
    /// Length overall in metres.
    #[serde(default)]
    pub loa_meters: Decimal,
    /// The port of call.
    pub port: String,
    /// Time alongside, in days (fractional).
    #[serde(default)]
    pub days_in_port: Decimal,
    /// Arrival timestamp, if known.
    #[serde(default)]
    pub arrival_time: Option<NaiveDateTime>,
    /// Departure timestamp, if known.
    #[serde(default)]
    pub departure_time: Option<NaiveDateTime>,
    /// The recorded port activity (e.g. "Exporting Iron Ore").
    #[serde(default)]
    pub activity: String,
    /// Cargo description, if any.
    #[serde(default)]
    pub cargo_type: Option<String>,
    /// Cargo quantity in metric tonnes, if any.
    #[serde(default)]
    pub cargo_quantity_mt: Option<Decimal>,
    /// Number of tug, pilotage and berthing operations.
    #[serde(default = "default_operations", alias = "num_tug_operations")]
    pub num_operations: u32,
    /// Whether services are rendered outside ordinary working hours.
    #[serde(default)]
    pub outside_working_hours: bool,
    /// Whether the vessel trades as a coaster.
    #[serde(default)]
    pub is_coaster: bool,
    /// Whether the vessel is a double-hull tanker.
    #[serde(default)]
    pub is_double_hull_tanker: bool,
    /// The due types to calculate.
    #[serde(default = "DueType::all")]
    pub requested_due_types: Vec<DueType>,
}

impl Default for VesselQuery {
    fn default() -> Self {
        Self {
            vessel_name: String::new(),
            vessel_type: default_vessel_type(),
            vessel_flag: String::new(),
            gross_tonnage: Decimal::ZERO,
            net_tonnage: Decimal::ZERO,
            dwt: Decimal::ZERO,
            loa_meters: Decimal::ZERO,
            port: String::new(),
            days_in_port: Decimal::ZERO,
            arrival_time: None,
            departure_time: None,
            activity: String::new(),
            cargo_type: None,
            cargo_quantity_mt: None,
            num_operations: DEFAULT_OPERATIONS,
            outside_working_hours: false,
            is_coaster: false,
            is_double_hull_tanker: false,
            requested_due_types: DueType::all(),
        }
    }
}

impl VesselQuery {
    /// Returns true if neither an activity nor a cargo is recorded.
    ///
    /// Idle vessels that stay long are surcharged on port dues.
    pub fn is_idle(&self) -> bool {
        self.activity.trim().is_empty()
            && self
                .cargo_type
                .as_deref()
                .is_none_or(|cargo| cargo.trim().is_empty())
    }
}
