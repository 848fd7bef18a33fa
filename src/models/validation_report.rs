//! Validation report model.

use serde::{Deserialize, Serialize};

/// The outcome of one or more guardrail checks.
///
/// `issues` are blocking; `warnings` are advisory. Hallucination flags and
/// business-rule violations are kept in their own lists so a caller can
/// route them separately (manual review, rejection at the API layer).
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::ValidationReport;
///
/// let report = ValidationReport::new(1.0);
/// assert!(report.passed);
/// assert!(report.issues.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the checks passed.
    pub passed: bool,
    /// Confidence score, from 0 to 1.
    pub confidence_score: f64,
    /// Blocking problems.
    #[serde(default)]
    pub issues: Vec<String>,
    /// Non-blocking observations.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Amounts outside their plausible range.
    #[serde(default)]
    pub hallucination_flags: Vec<String>,
    /// Breached domain rules.
    #[serde(default)]
    pub business_violations: Vec<String>,
}

impl ValidationReport {
    /// Creates a passing report with the given confidence and no findings.
    pub fn new(confidence_score: f64) -> Self {
        Self {
            passed: true,
            confidence_score,
            issues: Vec::new(),
            warnings: Vec::new(),
            hallucination_flags: Vec::new(),
            business_violations: Vec::new(),
        }
    }
}
