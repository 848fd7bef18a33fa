//! Final sanity checks on the aggregate result.

use rust_decimal::Decimal;

use crate::config::GuardrailSettings;
use crate::models::{CalculationResult, ValidationReport};

/// Checks the grand totals of a calculation.
///
/// A negative grand total, an empty result, and a total above the
/// configured ceiling are all issues. None of them withholds the result
/// from the caller.
pub fn check_output(result: &CalculationResult, settings: &GuardrailSettings) -> ValidationReport {
    let mut issues = Vec::new();
    let total = result.totals.total_with_vat;

    if total < Decimal::ZERO {
        issues.push("Grand total cannot be negative".to_string());
    }
    if result.dues.is_empty() {
        issues.push("No dues were calculated".to_string());
    }
    if total > settings.grand_total_ceiling {
        issues.push(format!(
            "Grand total R{:.2} exceeds R{:.0} - please verify",
            total, settings.grand_total_ceiling
        ));
    }

    let mut report = ValidationReport::new(if issues.is_empty() { 1.0 } else { 0.5 });
    report.passed = issues.is_empty();
    report.issues = issues;
    report
}
