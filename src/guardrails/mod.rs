//! Guardrail layer for the Port Tariff Engine.
//!
//! Five checks wrap a calculation: an input gate that runs before any due
//! is computed, and four output checks (plausibility, confidence, business
//! rules, totals) that run on the result. [`GuardrailLayer`] composes them;
//! [`GuardrailLayer::run`] drives the whole gate, compute, check sequence.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use port_tariff_engine::engine::CalculationEngine;
//! use port_tariff_engine::guardrails::{GuardedOutcome, GuardrailLayer};
//! use port_tariff_engine::knowledge::KnowledgeBase;
//! use port_tariff_engine::models::VesselQuery;
//! use rust_decimal::Decimal;
//!
//! let engine = CalculationEngine::new(Arc::new(KnowledgeBase::empty()));
//! let guardrails = GuardrailLayer::default();
//!
//! let query = VesselQuery {
//!     gross_tonnage: Decimal::new(51300, 0),
//!     port: "Walvis Bay".to_string(),
//!     ..VesselQuery::default()
//! };
//!
//! let outcome = guardrails.run(&engine, &query);
//! assert!(matches!(outcome, GuardedOutcome::Rejected { .. }));
//! ```

mod business_rules;
mod confidence;
mod hallucination;
mod input;
mod output;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GuardrailSettings;
use crate::engine::CalculationEngine;
use crate::models::{CalculationResult, ValidationReport, VesselQuery};

pub use business_rules::enforce_business_rules;
pub use confidence::score_confidence;
pub use hallucination::detect_hallucinations;
pub use input::check_input;
pub use output::check_output;

/// Runs the input gate and the output checks with one set of thresholds.
#[derive(Debug, Clone, Default)]
pub struct GuardrailLayer {
    settings: GuardrailSettings,
}

impl GuardrailLayer {
    /// Creates a guardrail layer with the given thresholds.
    pub fn new(settings: GuardrailSettings) -> Self {
        Self { settings }
    }

    /// Returns the thresholds in force.
    pub fn settings(&self) -> &GuardrailSettings {
        &self.settings
    }

    /// Validates a query before calculation. A failed report must stop the call.
    pub fn validate_input(&self, query: &VesselQuery) -> ValidationReport {
        let report = check_input(query, &self.settings);
        if !report.passed {
            warn!(
                port = %query.port,
                issues = ?report.issues,
                "Input validation failed"
            );
        }
        report
    }

    /// Runs every post-calculation check and merges them into one report.
    ///
    /// The report passes only if no amount was flagged, the totals are
    /// sane, and no business rule was broken. It never withholds the result.
    pub fn validate_output(
        &self,
        query: &VesselQuery,
        result: &CalculationResult,
    ) -> ValidationReport {
        let plausibility = detect_hallucinations(result, &self.settings);
        let business_violations = enforce_business_rules(query, result, &self.settings);
        let totals = check_output(result, &self.settings);
        let confidence_score = score_confidence(query, result);

        let passed = plausibility.passed && totals.passed && business_violations.is_empty();

        let mut warnings = plausibility.warnings;
        warnings.extend(plausibility.hallucination_flags.iter().cloned());
        warnings.extend(totals.issues.iter().cloned());

        info!(
            passed,
            confidence = confidence_score,
            warnings = warnings.len(),
            business_violations = business_violations.len(),
            "Guardrail output check"
        );

        ValidationReport {
            passed,
            confidence_score,
            issues: totals.issues,
            warnings,
            hallucination_flags: plausibility.hallucination_flags,
            business_violations,
        }
    }

    /// Validates the query, calculates if it passed, then checks the result.
    pub fn run(&self, engine: &CalculationEngine, query: &VesselQuery) -> GuardedOutcome {
        let input = self.validate_input(query);
        if !input.passed {
            return GuardedOutcome::Rejected { input };
        }

        let result = engine.calculate(query);
        let report = self.validate_output(query, &result);
        GuardedOutcome::Completed {
            input,
            result,
            report,
        }
    }
}

/// The outcome of a guarded calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GuardedOutcome {
    /// The query failed the input gate; nothing was calculated.
    Rejected {
        /// The failed input report.
        input: ValidationReport,
    },
    /// The query was calculated and the result checked.
    Completed {
        /// The passed input report, including any warnings.
        input: ValidationReport,
        /// The calculation result.
        result: CalculationResult,
        /// The merged output report.
        report: ValidationReport,
    },
}

impl GuardedOutcome {
    /// Returns the input report.
    pub fn input(&self) -> &ValidationReport {
        match self {
            Self::Rejected { input } | Self::Completed { input, .. } => input,
        }
    }

    /// Returns the calculation result, if the query got past the gate.
    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            Self::Rejected { .. } => None,
            Self::Completed { result, .. } => Some(result),
        }
    }

    /// Returns the output report, if the query got past the gate.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Rejected { .. } => None,
            Self::Completed { report, .. } => Some(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::models::DueType;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn engine() -> CalculationEngine {
        CalculationEngine::new(Arc::new(KnowledgeBase::empty()))
    }

    fn sudestada() -> VesselQuery {
        VesselQuery {
            vessel_name: "SUDESTADA".to_string(),
            gross_tonnage: dec("51300"),
            port: "Durban".to_string(),
            days_in_port: dec("3.39"),
            ..VesselQuery::default()
        }
    }

    #[test]
    fn test_run_completes_valid_query() {
        let outcome = GuardrailLayer::default().run(&engine(), &sudestada());

        let report = outcome.report().unwrap();
        assert!(report.passed);
        assert_eq!(report.confidence_score, 0.95);
        assert!(report.warnings.is_empty());
        assert_eq!(
            outcome.result().unwrap().totals.net_amount,
            dec("506682.21")
        );
    }

    #[test]
    fn test_run_rejects_unknown_port_without_calculating() {
        let query = VesselQuery {
            port: "Maputo".to_string(),
            ..sudestada()
        };
        let outcome = GuardrailLayer::default().run(&engine(), &query);

        assert!(outcome.result().is_none());
        assert!(outcome.report().is_none());
        assert!(!outcome.input().passed);
        assert!(outcome.input().issues[0].contains("Maputo"));
    }

    #[test]
    fn test_flags_are_merged_into_warnings() {
        let layer = GuardrailLayer::default();
        let query = sudestada();
        let mut result = engine().calculate(&query);
        result.dues.get_mut(&DueType::LightDues).unwrap().net_amount = dec("600000.00");
        result.dues.get_mut(&DueType::LightDues).unwrap().vat_amount = dec("90000.00");

        let report = layer.validate_output(&query, &result);
        assert!(!report.passed);
        assert_eq!(report.hallucination_flags.len(), 1);
        assert_eq!(report.warnings, report.hallucination_flags);
        assert!(report.business_violations.is_empty());
    }

    #[test]
    fn test_business_violation_alone_fails_report() {
        let layer = GuardrailLayer::default();
        let query = VesselQuery {
            requested_due_types: vec![DueType::LightDues, DueType::PortDues],
            ..sudestada()
        };
        let result = engine().calculate(&query);

        let report = layer.validate_output(&query, &result);
        assert!(!report.passed);
        assert!(report.hallucination_flags.is_empty());
        assert_eq!(report.business_violations.len(), 1);
    }

    #[test]
    fn test_ceiling_issue_is_surfaced_as_warning() {
        let settings = GuardrailSettings {
            grand_total_ceiling: dec("100000"),
            ..GuardrailSettings::default()
        };
        let layer = GuardrailLayer::new(settings);
        let outcome = layer.run(&engine(), &sudestada());

        let report = outcome.report().unwrap();
        assert!(!report.passed);
        assert_eq!(report.issues.len(), 1);
        assert!(report.warnings[0].contains("please verify"));
        assert!(outcome.result().is_some());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let query = VesselQuery {
            gross_tonnage: Decimal::ZERO,
            ..sudestada()
        };
        let outcome = GuardrailLayer::default().run(&engine(), &query);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["input"]["issues"][0], "gross_tonnage must be > 0");
    }
}
