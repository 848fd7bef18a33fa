//! Due types and the recognised port set.
//!
//! A port call is billed as up to six independent dues. This module defines
//! the [`DueType`] key used throughout the engine, and the fixed set of
//! ports the tariff book covers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One of the six independently billed port-call charges.
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::DueType;
///
/// let due: DueType = "towage_dues".parse().unwrap();
/// assert_eq!(due, DueType::TowageDues);
/// assert_eq!(due.to_string(), "towage_dues");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueType {
    /// Light dues (navigational aids), rated per 100 GT.
    LightDues,
    /// Vessel traffic services charge, rated per GT with a floor.
    VtsDues,
    /// Port dues: basic plus per-day incremental charge.
    PortDues,
    /// Tug assistance, rated on port-specific GT brackets.
    TowageDues,
    /// Compulsory pilotage, basic fee plus per 100 GT.
    PilotageDues,
    /// Running lines / berthing services, basic fee plus per 100 GT.
    RunningLinesDues,
}

impl DueType {
    /// All six due types in canonical calculation order.
    pub const ALL: [DueType; 6] = [
        DueType::LightDues,
        DueType::PortDues,
        DueType::TowageDues,
        DueType::VtsDues,
        DueType::PilotageDues,
        DueType::RunningLinesDues,
    ];

    /// Returns the snake_case key used in records, reports and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            DueType::LightDues => "light_dues",
            DueType::VtsDues => "vts_dues",
            DueType::PortDues => "port_dues",
            DueType::TowageDues => "towage_dues",
            DueType::PilotageDues => "pilotage_dues",
            DueType::RunningLinesDues => "running_lines_dues",
        }
    }

    /// Returns all six due types as an owned list.
    pub fn all() -> Vec<DueType> {
        Self::ALL.to_vec()
    }
}

impl fmt::Display for DueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DueType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        DueType::ALL
            .iter()
            .copied()
            .find(|due| due.as_str() == key)
            .ok_or_else(|| EngineError::UnknownDueType {
                value: s.to_string(),
            })
    }
}

/// The ports covered by the tariff book, in canonical display form.
pub const RECOGNIZED_PORTS: [&str; 8] = [
    "Durban",
    "Cape Town",
    "Richards Bay",
    "Port Elizabeth",
    "Ngqura",
    "East London",
    "Saldanha",
    "Mossel Bay",
];

/// Normalises a port name for lookups: trimmed and lowercased.
pub fn normalize_port(port: &str) -> String {
    port.trim().to_lowercase()
}

/// Returns the canonical name of a recognised port, matching case-insensitively.
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::canonical_port;
///
/// assert_eq!(canonical_port(" richards BAY "), Some("Richards Bay"));
/// assert_eq!(canonical_port("Walvis Bay"), None);
/// ```
pub fn canonical_port(port: &str) -> Option<&'static str> {
    let key = normalize_port(port);
    RECOGNIZED_PORTS
        .iter()
        .copied()
        .find(|p| p.to_lowercase() == key)
}

/// Returns true if the port is one of the recognised tariff-book ports.
pub fn is_recognized_port(port: &str) -> bool {
    canonical_port(port).is_some()
}
