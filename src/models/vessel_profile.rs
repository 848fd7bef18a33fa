//! Structured vessel profile input.
//!
//! Callers that already hold a structured vessel record (rather than a
//! free-text request) describe it with a [`VesselProfile`], which converts
//! into the normalised [`VesselQuery`] the engine consumes.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_OPERATIONS, DueType, VesselQuery};

const SECONDS_PER_DAY: i64 = 86_400;

/// Identity details of a vessel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselMetadata {
    /// The vessel's name.
    #[serde(default)]
    pub name: Option<String>,
    /// The year the vessel was built.
    #[serde(default)]
    pub built_year: Option<i32>,
    /// The flag state.
    #[serde(default)]
    pub flag: Option<String>,
    /// The classification society.
    #[serde(default)]
    pub classification_society: Option<String>,
}

/// Measured characteristics of a vessel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSpecs {
    /// The vessel type (e.g. "Bulk Carrier").
    #[serde(default, rename = "type")]
    pub vessel_type: Option<String>,
    /// Deadweight tonnage.
    #[serde(default)]
    pub dwt: Option<Decimal>,
    /// Gross tonnage.
    #[serde(default)]
    pub gross_tonnage: Option<Decimal>,
    /// Net tonnage.
    #[serde(default)]
    pub net_tonnage: Option<Decimal>,
    /// Length overall in metres.
    #[serde(default)]
    pub loa_meters: Option<Decimal>,
}

/// Details of the call itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationalData {
    /// Cargo quantity in metric tonnes.
    #[serde(default)]
    pub cargo_quantity_mt: Option<Decimal>,
    /// Cargo description.
    #[serde(default)]
    pub cargo_type: Option<String>,
    /// Time alongside in days, when stated directly.
    #[serde(default)]
    pub days_alongside: Option<Decimal>,
    /// Arrival timestamp.
    #[serde(default)]
    pub arrival_time: Option<NaiveDateTime>,
    /// Departure timestamp.
    #[serde(default)]
    pub departure_time: Option<NaiveDateTime>,
    /// The recorded port activity.
    #[serde(default)]
    pub activity: Option<String>,
    /// Number of tug, pilotage and berthing operations.
    #[serde(default)]
    pub num_operations: Option<u32>,
}

/// A structured description of one port call.
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::VesselProfile;
/// use rust_decimal::Decimal;
///
/// let json = r#"{
///     "port": "Durban",
///     "vessel_metadata": { "name": "SUDESTADA", "flag": "MLT - Malta" },
///     "technical_specs": { "type": "Bulk Carrier", "gross_tonnage": 51300 },
///     "operational_data": {
///         "arrival_time": "2024-11-15T10:12:00",
///         "departure_time": "2024-11-18T19:36:00"
///     }
/// }"#;
///
/// let profile: VesselProfile = serde_json::from_str(json).unwrap();
/// let query = profile.into_query();
///
/// assert_eq!(query.vessel_name, "SUDESTADA");
/// assert_eq!(query.gross_tonnage, Decimal::new(51300, 0));
/// assert_eq!(query.days_in_port, Decimal::new(339, 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselProfile {
    /// The port of call.
    pub port: String,
    /// Vessel identity.
    #[serde(default)]
    pub vessel_metadata: VesselMetadata,
    /// Vessel measurements.
    #[serde(default)]
    pub technical_specs: TechnicalSpecs,
    /// Call details.
    #[serde(default)]
    pub operational_data: OperationalData,
    /// Due types to calculate; all six when absent.
    #[serde(default)]
    pub due_types: Option<Vec<DueType>>,
    /// Whether services are rendered outside ordinary working hours.
    #[serde(default)]
    pub outside_working_hours: bool,
    /// Whether the vessel trades as a coaster.
    #[serde(default)]
    pub is_coaster: bool,
    /// Whether the vessel is a double-hull tanker.
    #[serde(default)]
    pub is_double_hull_tanker: bool,
}

impl VesselProfile {
    /// Returns the stay length in days.
    ///
    /// Uses `days_alongside` when stated, otherwise the arrival to departure
    /// span rounded to 2 decimals, otherwise one day.
    pub fn stay_days(&self) -> Decimal {
        let ops = &self.operational_data;
        if let Some(days) = ops.days_alongside {
            return days;
        }

        match (ops.arrival_time, ops.departure_time) {
            (Some(arrival), Some(departure)) if departure > arrival => {
                let seconds = (departure - arrival).num_seconds();
                (Decimal::from(seconds) / Decimal::from(SECONDS_PER_DAY))
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            }
            _ => Decimal::ONE,
        }
    }

    /// Converts the profile into a normalised [`VesselQuery`].
    pub fn into_query(self) -> VesselQuery {
        let days_in_port = self.stay_days();
        let meta = self.vessel_metadata;
        let tech = self.technical_specs;
        let ops = self.operational_data;

        VesselQuery {
            vessel_name: meta.name.unwrap_or_default(),
            vessel_type: tech.vessel_type.unwrap_or_else(|| "general".to_string()),
            vessel_flag: meta.flag.unwrap_or_default(),
            gross_tonnage: tech.gross_tonnage.unwrap_or_default(),
            net_tonnage: tech.net_tonnage.unwrap_or_default(),
            dwt: tech.dwt.unwrap_or_default(),
            loa_meters: tech.loa_meters.unwrap_or_default(),
            port: self.port,
            days_in_port,
            arrival_time: ops.arrival_time,
            departure_time: ops.departure_time,
            activity: ops.activity.unwrap_or_default(),
            cargo_type: ops.cargo_type,
            cargo_quantity_mt: ops.cargo_quantity_mt,
            num_operations: ops.num_operations.unwrap_or(DEFAULT_OPERATIONS),
            outside_working_hours: self.outside_working_hours,
            is_coaster: self.is_coaster,
            is_double_hull_tanker: self.is_double_hull_tanker,
            requested_due_types: self.due_types.unwrap_or_else(DueType::all),
        }
    }
}

impl From<VesselProfile> for VesselQuery {
    fn from(profile: VesselProfile) -> Self {
        profile.into_query()
    }
}
