//! Holistic confidence scoring.

use rust_decimal::Decimal;

use crate::models::{CalculationResult, VesselQuery};

/// Deducted for each missing arrival or departure timestamp.
const MISSING_TIMESTAMP_PENALTY: f64 = 0.05;

/// Deducted when the query carries no gross tonnage.
const ZERO_GT_PENALTY: f64 = 0.5;

/// Scores a calculation from 0 to 1.
///
/// Half the score comes from the completeness of the query, half from the
/// mean confidence of the calculated dues (1.0 when there are none). The
/// result is clamped and rounded to 3 decimals.
pub fn score_confidence(query: &VesselQuery, result: &CalculationResult) -> f64 {
    let mut base = 1.0_f64;
    if query.arrival_time.is_none() {
        base -= MISSING_TIMESTAMP_PENALTY;
    }
    if query.departure_time.is_none() {
        base -= MISSING_TIMESTAMP_PENALTY;
    }
    if query.gross_tonnage == Decimal::ZERO {
        base -= ZERO_GT_PENALTY;
    }

    let mean_due_confidence = if result.dues.is_empty() {
        1.0
    } else {
        result.dues.values().map(|due| due.confidence).sum::<f64>() / result.dues.len() as f64
    };

    let combined = (base * 0.5 + mean_due_confidence * 0.5).clamp(0.0, 1.0);
    (combined * 1000.0).round() / 1000.0
}
