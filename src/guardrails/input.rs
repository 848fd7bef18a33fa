//! Pre-calculation input gate.

use rust_decimal::Decimal;

use crate::config::GuardrailSettings;
use crate::models::{RECOGNIZED_PORTS, ValidationReport, VesselQuery, is_recognized_port};

/// Checks a query before any due is calculated.
///
/// Non-positive GT, a missing or unrecognised port, and negative days or
/// LOA are blocking issues. An unusually large GT is only a warning. Each
/// finding except negative LOA deducts from the report's confidence.
pub fn check_input(query: &VesselQuery, settings: &GuardrailSettings) -> ValidationReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut score = 1.0_f64;

    if query.gross_tonnage <= Decimal::ZERO {
        issues.push("gross_tonnage must be > 0".to_string());
        score -= 0.5;
    } else if query.gross_tonnage > settings.max_gross_tonnage {
        warnings.push(format!(
            "GT {:.0} is unusually large - please verify",
            query.gross_tonnage
        ));
        score -= 0.1;
    }

    if query.port.trim().is_empty() {
        issues.push("port is required".to_string());
        score -= 0.3;
    } else if !is_recognized_port(&query.port) {
        issues.push(format!(
            "Port '{}' is not a recognised TNPA port. Valid ports are: {}.",
            query.port,
            valid_port_list()
        ));
        score -= 0.5;
    }

    if query.days_in_port < Decimal::ZERO {
        issues.push("days_in_port cannot be negative".to_string());
        score -= 0.2;
    }

    if query.loa_meters < Decimal::ZERO {
        issues.push("loa_meters cannot be negative".to_string());
    }

    ValidationReport {
        passed: issues.is_empty(),
        confidence_score: score.max(0.0),
        issues,
        warnings,
        hallucination_flags: Vec::new(),
        business_violations: Vec::new(),
    }
}

fn valid_port_list() -> String {
    let mut ports = RECOGNIZED_PORTS.to_vec();
    ports.sort_unstable();
    ports.join(", ")
}
