//! Reference tariff tables bundled with the engine.
//!
//! These values back every lookup the knowledge store cannot answer, so the
//! engine can still price a port call against an empty store. They are the
//! published TNPA 2024/25 tariffs.
//!
//! Port-specific tables (towage, pilotage, berthing) are keyed by canonical
//! port. A port missing from one of them is served that table's default
//! entry, flagged through [`ReferenceValue::port_defaulted`].

use rust_decimal::Decimal;

use crate::models::{DueType, PortScope, RateUnit, TierRecord, canonical_port};

/// The statutory VAT rate (15%).
pub const VAT_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// A value from a reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceValue<T> {
    /// The value.
    pub value: T,
    /// True if the port had no entry and the table default was used.
    pub port_defaulted: bool,
}

impl<T> ReferenceValue<T> {
    fn exact(value: T) -> Self {
        Self {
            value,
            port_defaulted: false,
        }
    }
}

/// Money in cents, to keep the tables readable.
const fn cents(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 2)
}

const LIGHT_DUES_PER_100GT: Decimal = cents(117_08);
const VTS_PER_GT_PREMIUM: Decimal = cents(65);
const VTS_PER_GT_STANDARD: Decimal = cents(54);
const VTS_PREMIUM_PORTS: [&str; 2] = ["Durban", "Saldanha"];
const VTS_MINIMUM: Decimal = cents(235_52);
const PORT_DUES_PER_100GT: Decimal = cents(192_73);
const PORT_DUES_PER_100GT_PER_DAY: Decimal = cents(57_79);

/// (port, basic fee cents, rate per 100 GT cents)
type ServiceRow = (&'static str, u32, u32);

const PILOTAGE: [ServiceRow; 8] = [
    ("Durban", 18_608_61, 9_72),
    ("Richards Bay", 30_960_46, 10_93),
    ("Port Elizabeth", 8_970_00, 14_33),
    ("Ngqura", 8_970_00, 14_33),
    ("Cape Town", 6_342_39, 10_20),
    ("Saldanha", 9_673_57, 13_66),
    ("East London", 6_547_45, 10_49),
    ("Mossel Bay", 6_547_45, 10_49),
];
const PILOTAGE_DEFAULT: (u32, u32) = (6_547_45, 10_49);

// Durban, East London and Mossel Bay use the default berthing rates.
const RUNNING_LINES: [ServiceRow; 8] = [
    ("Durban", 2_801_91, 13_68),
    ("Richards Bay", 3_175_89, 13_46),
    ("Port Elizabeth", 3_838_62, 18_72),
    ("Ngqura", 3_838_62, 18_72),
    ("Cape Town", 3_052_33, 14_92),
    ("Saldanha", 4_006_34, 16_97),
    ("East London", 2_801_91, 13_68),
    ("Mossel Bay", 2_801_91, 13_68),
];
const RUNNING_LINES_DEFAULT: (u32, u32) = (2_801_91, 13_68);

/// (gt_min, gt_max, base fee cents, rate per 100 GT cents)
type TierRow = (u32, Option<u32>, u32, u32);

const TOWAGE_DURBAN: [TierRow; 5] = [
    (0, Some(2_000), 8_140_00, 0),
    (2_001, Some(10_000), 12_633_99, 268_99),
    (10_001, Some(50_000), 38_494_51, 84_95),
    (50_001, Some(100_000), 73_118_07, 32_24),
    (100_001, None, 93_548_13, 23_65),
];
const TOWAGE_RICHARDS_BAY: [TierRow; 5] = [
    (0, Some(2_000), 7_001_67, 0),
    (2_001, Some(10_000), 13_020_67, 275_32),
    (10_001, Some(50_000), 39_999_88, 101_08),
    (50_001, Some(100_000), 79_999_76, 30_11),
    (100_001, None, 103_999_70, 21_50),
];
const TOWAGE_EAST_LONDON: [TierRow; 5] = [
    (0, Some(2_000), 5_622_16, 0),
    (2_001, Some(10_000), 8_152_14, 200_97),
    (10_001, Some(50_000), 27_956_91, 66_67),
    (50_001, Some(100_000), 55_913_82, 25_80),
    (100_001, None, 72_682_97, 25_80),
];
// Port Elizabeth and Ngqura share one schedule.
const TOWAGE_PORT_ELIZABETH: [TierRow; 5] = [
    (0, Some(2_000), 7_206_98, 0),
    (2_001, Some(10_000), 11_168_45, 237_53),
    (10_001, Some(50_000), 32_257_98, 73_10),
    (50_001, Some(100_000), 64_515_95, 21_50),
    (100_001, None, 82_542_46, 21_50),
];
const TOWAGE_MOSSEL_BAY: [TierRow; 4] = [
    (0, Some(2_000), 6_316_53, 0),
    (2_001, Some(10_000), 8_152_14, 173_37),
    (10_001, Some(50_000), 25_806_37, 60_21),
    (50_001, None, 49_959_21, 23_65),
];
const TOWAGE_CAPE_TOWN: [TierRow; 5] = [
    (0, Some(2_000), 5_411_47, 0),
    (2_001, Some(10_000), 7_898_57, 194_63),
    (10_001, Some(50_000), 27_741_85, 64_52),
    (50_001, Some(100_000), 53_978_33, 47_32),
    (100_001, None, 79_569_67, 38_71),
];
const TOWAGE_SALDANHA: [TierRow; 5] = [
    (0, Some(2_000), 9_038_42, 0),
    (2_001, Some(10_000), 15_378_78, 327_43),
    (10_001, Some(50_000), 47_311_70, 103_23),
    (50_001, Some(100_000), 90_322_33, 27_97),
    (100_001, None, 111_827_63, 47_32),
];

/// (due type, name, whole percent)
const SURCHARGES: [(DueType, &str, i64); 4] = [
    (DueType::TowageDues, "outside_working_hours", 25),
    (DueType::PilotageDues, "outside_working_hours", 50),
    (DueType::RunningLinesDues, "outside_working_hours", 50),
    (DueType::PortDues, "idle_vessel", 20),
];

const REDUCTIONS: [(DueType, &str, i64); 3] = [
    (DueType::PortDues, "coaster", 35),
    (DueType::PortDues, "short_stay", 15),
    (DueType::PortDues, "double_hull_tanker", 10),
];

/// Returns the reference flat rate for a due type at a port.
///
/// # Example
///
/// ```
/// use port_tariff_engine::knowledge::reference;
/// use port_tariff_engine::models::{DueType, RateUnit};
///
/// let vts = reference::rate(DueType::VtsDues, "Saldanha", RateUnit::PerGt).unwrap();
/// assert_eq!(vts.value.to_string(), "0.65");
///
/// let pilotage = reference::rate(DueType::PilotageDues, "Walvis Bay", RateUnit::PerService).unwrap();
/// assert!(pilotage.port_defaulted);
/// ```
pub fn rate(due_type: DueType, port: &str, unit: RateUnit) -> Option<ReferenceValue<Decimal>> {
    match (due_type, unit) {
        (DueType::LightDues, RateUnit::Per100Gt) => {
            Some(ReferenceValue::exact(LIGHT_DUES_PER_100GT))
        }
        (DueType::VtsDues, RateUnit::PerGt) => {
            let premium = canonical_port(port).is_some_and(|p| VTS_PREMIUM_PORTS.contains(&p));
            let rate = if premium {
                VTS_PER_GT_PREMIUM
            } else {
                VTS_PER_GT_STANDARD
            };
            Some(ReferenceValue::exact(rate))
        }
        (DueType::PortDues, RateUnit::Per100Gt) => {
            Some(ReferenceValue::exact(PORT_DUES_PER_100GT))
        }
        (DueType::PortDues, RateUnit::Per100GtPerDay) => {
            Some(ReferenceValue::exact(PORT_DUES_PER_100GT_PER_DAY))
        }
        (DueType::PilotageDues, RateUnit::PerService | RateUnit::Per100Gt) => {
            Some(service_rate(&PILOTAGE, PILOTAGE_DEFAULT, port, unit))
        }
        (DueType::RunningLinesDues, RateUnit::PerService | RateUnit::Per100Gt) => {
            Some(service_rate(&RUNNING_LINES, RUNNING_LINES_DEFAULT, port, unit))
        }
        _ => None,
    }
}

fn service_rate(
    table: &[ServiceRow],
    default: (u32, u32),
    port: &str,
    unit: RateUnit,
) -> ReferenceValue<Decimal> {
    let row = canonical_port(port)
        .and_then(|canonical| table.iter().find(|(name, _, _)| *name == canonical));

    let ((basic, per_100gt), port_defaulted) = match row {
        Some(&(_, basic, per_100gt)) => ((basic, per_100gt), false),
        None => (default, true),
    };
    let value = if unit == RateUnit::PerService {
        basic
    } else {
        per_100gt
    };

    ReferenceValue {
        value: cents(value),
        port_defaulted,
    }
}

/// Returns the reference GT-bracket tiers for a due type at a port.
///
/// Only towage is tiered. Unknown ports get the Durban schedule.
pub fn tiers(due_type: DueType, port: &str) -> Option<ReferenceValue<Vec<TierRecord>>> {
    if due_type != DueType::TowageDues {
        return None;
    }

    let canonical = canonical_port(port);
    let (scope, rows): (&str, &[TierRow]) = match canonical {
        Some("Richards Bay") => ("Richards Bay", &TOWAGE_RICHARDS_BAY),
        Some("East London") => ("East London", &TOWAGE_EAST_LONDON),
        Some("Port Elizabeth") => ("Port Elizabeth", &TOWAGE_PORT_ELIZABETH),
        Some("Ngqura") => ("Ngqura", &TOWAGE_PORT_ELIZABETH),
        Some("Mossel Bay") => ("Mossel Bay", &TOWAGE_MOSSEL_BAY),
        Some("Cape Town") => ("Cape Town", &TOWAGE_CAPE_TOWN),
        Some("Saldanha") => ("Saldanha", &TOWAGE_SALDANHA),
        _ => ("Durban", &TOWAGE_DURBAN),
    };

    let tiers = rows
        .iter()
        .map(|&(gt_min, gt_max, base_fee, rate_per_unit)| TierRecord {
            due_type,
            port: PortScope::Port(scope.to_string()),
            gt_min: Decimal::from(gt_min),
            gt_max: gt_max.map(Decimal::from),
            base_fee: cents(base_fee),
            rate_per_unit: cents(rate_per_unit),
            section: Some("3.6".to_string()),
        })
        .collect();

    Some(ReferenceValue {
        value: tiers,
        port_defaulted: canonical.is_none(),
    })
}

/// Returns the reference minimum charge for a due type, if it has one.
pub fn minimum(due_type: DueType) -> Option<Decimal> {
    match due_type {
        DueType::VtsDues => Some(VTS_MINIMUM),
        _ => None,
    }
}

/// Returns the reference surcharge percentage (whole percent) by name.
pub fn surcharge_pct(due_type: DueType, name: &str) -> Option<Decimal> {
    SURCHARGES
        .iter()
        .find(|(due, n, _)| *due == due_type && *n == name)
        .map(|&(_, _, pct)| Decimal::from(pct))
}

/// Returns the reference reduction percentage (whole percent) by name.
pub fn reduction_pct(due_type: DueType, name: &str) -> Option<Decimal> {
    REDUCTIONS
        .iter()
        .find(|(due, n, _)| *due == due_type && *n == name)
        .map(|&(_, _, pct)| Decimal::from(pct))
}
