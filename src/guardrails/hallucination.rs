//! Plausibility checks on calculated amounts.

use rust_decimal::Decimal;

use crate::config::{GuardrailSettings, PlausibleRange};
use crate::models::{CalculationResult, ValidationReport};

/// Penalty for a net amount above its plausible maximum.
const ABOVE_MAX_PENALTY: f64 = 0.15;

/// Penalty for a net amount below its plausible minimum.
const BELOW_MIN_PENALTY: f64 = 0.10;

/// Flags non-exempt dues whose net amount falls outside the plausible range
/// for their due type, and warns on low per-due confidence.
///
/// Due types without a configured range are accepted at any amount.
pub fn detect_hallucinations(
    result: &CalculationResult,
    settings: &GuardrailSettings,
) -> ValidationReport {
    let mut flags = Vec::new();
    let mut warnings = Vec::new();
    let mut score = 1.0_f64;
    let unbounded = PlausibleRange {
        min: Decimal::ZERO,
        max: Decimal::from(1_000_000_000),
    };

    for (due_type, due) in result.dues.iter().filter(|(_, due)| !due.exempted) {
        let range = settings
            .plausible_ranges
            .get(due_type)
            .copied()
            .unwrap_or(unbounded);

        if due.net_amount > range.max {
            flags.push(format!(
                "{}: R{:.2} exceeds expected max R{:.0}",
                due_type, due.net_amount, range.max
            ));
            score -= ABOVE_MAX_PENALTY;
        } else if due.net_amount < range.min {
            flags.push(format!(
                "{}: R{:.2} is below expected min R{:.0}",
                due_type, due.net_amount, range.min
            ));
            score -= BELOW_MIN_PENALTY;
        }

        if due.confidence < settings.low_confidence_threshold {
            warnings.push(format!(
                "{}: low confidence ({:.0}%)",
                due_type,
                due.confidence * 100.0
            ));
        }
    }

    ValidationReport {
        passed: flags.is_empty(),
        confidence_score: score.max(0.0),
        issues: Vec::new(),
        warnings,
        hallucination_flags: flags,
        business_violations: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CalculationEngine;
    use crate::knowledge::KnowledgeBase;
    use crate::models::{DueType, VesselQuery};
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sudestada_result() -> CalculationResult {
        let engine = CalculationEngine::new(Arc::new(KnowledgeBase::empty()));
        engine.calculate(&VesselQuery {
            vessel_name: "SUDESTADA".to_string(),
            gross_tonnage: dec("51300"),
            port: "Durban".to_string(),
            days_in_port: dec("3.39"),
            ..VesselQuery::default()
        })
    }

    #[test]
    fn test_realistic_call_has_no_flags() {
        let report = detect_hallucinations(&sudestada_result(), &GuardrailSettings::default());
        assert!(report.passed);
        assert!(report.hallucination_flags.is_empty());
        assert_eq!(report.confidence_score, 1.0);
    }

    #[test]
    fn test_amount_above_max_is_flagged() {
        let mut result = sudestada_result();
        result
            .dues
            .get_mut(&DueType::RunningLinesDues)
            .unwrap()
            .net_amount = dec("90000");

        let report = detect_hallucinations(&result, &GuardrailSettings::default());
        assert!(!report.passed);
        assert_eq!(
            report.hallucination_flags,
            vec!["running_lines_dues: R90000.00 exceeds expected max R80000"]
        );
        assert!((report.confidence_score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_amount_below_min_costs_less_than_above_max() {
        let mut result = sudestada_result();
        result.dues.get_mut(&DueType::LightDues).unwrap().net_amount = dec("12.50");

        let report = detect_hallucinations(&result, &GuardrailSettings::default());
        assert_eq!(
            report.hallucination_flags,
            vec!["light_dues: R12.50 is below expected min R1000"]
        );
        assert!((report.confidence_score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_exempt_dues_are_not_checked() {
        let mut result = sudestada_result();
        let light = result.dues.get_mut(&DueType::LightDues).unwrap();
        light.net_amount = Decimal::ZERO;
        light.exempted = true;

        assert!(detect_hallucinations(&result, &GuardrailSettings::default()).passed);
    }

    #[test]
    fn test_low_confidence_is_warning_not_flag() {
        let mut result = sudestada_result();
        result.dues.get_mut(&DueType::TowageDues).unwrap().confidence = 0.3;

        let report = detect_hallucinations(&result, &GuardrailSettings::default());
        assert!(report.passed);
        assert_eq!(report.warnings, vec!["towage_dues: low confidence (30%)"]);
    }

    #[test]
    fn test_missing_range_accepts_any_amount() {
        let mut settings = GuardrailSettings::default();
        settings.plausible_ranges.remove(&DueType::RunningLinesDues);
        let mut result = sudestada_result();
        result
            .dues
            .get_mut(&DueType::RunningLinesDues)
            .unwrap()
            .net_amount = dec("5000000");

        assert!(detect_hallucinations(&result, &settings).passed);
    }
}
