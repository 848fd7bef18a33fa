//! The calculation engine.
//!
//! [`CalculationEngine`] dispatches a [`VesselQuery`] to the registered
//! due-type calculators and aggregates their results. One failing
//! calculator never aborts the batch: its error becomes a warning and the
//! remaining due types are still computed.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{DueCalculator, default_calculators};
use crate::knowledge::{KnowledgeBase, reference};
use crate::models::{CalculationMetadata, CalculationResult, DueTotals, DueType, VesselQuery};

/// Computes port-call dues from a vessel query.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use port_tariff_engine::engine::CalculationEngine;
/// use port_tariff_engine::knowledge::KnowledgeBase;
/// use port_tariff_engine::models::{DueType, VesselQuery};
/// use rust_decimal::Decimal;
///
/// let engine = CalculationEngine::new(Arc::new(KnowledgeBase::empty()));
/// let query = VesselQuery {
///     vessel_name: "SUDESTADA".to_string(),
///     gross_tonnage: Decimal::new(51300, 0),
///     port: "Durban".to_string(),
///     days_in_port: Decimal::new(339, 2),
///     ..VesselQuery::default()
/// };
///
/// let result = engine.calculate(&query);
/// assert_eq!(result.dues.len(), 6);
/// assert_eq!(result.totals.net_amount, Decimal::new(50668221, 2));
/// ```
pub struct CalculationEngine {
    knowledge: Arc<KnowledgeBase>,
    calculators: BTreeMap<DueType, Box<dyn DueCalculator>>,
}

impl CalculationEngine {
    /// Creates an engine with a calculator registered for every due type.
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        let mut engine = Self::without_calculators(knowledge);
        for calculator in default_calculators() {
            engine.register(calculator);
        }
        engine
    }

    /// Creates an engine with no calculators registered.
    pub fn without_calculators(knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            knowledge,
            calculators: BTreeMap::new(),
        }
    }

    /// Registers a calculator, returning the one it replaces for the same due type.
    pub fn register(&mut self, calculator: Box<dyn DueCalculator>) -> Option<Box<dyn DueCalculator>> {
        self.calculators.insert(calculator.due_type(), calculator)
    }

    /// Removes the calculator for a due type.
    pub fn unregister(&mut self, due_type: DueType) -> Option<Box<dyn DueCalculator>> {
        self.calculators.remove(&due_type)
    }

    /// Returns the due types with a registered calculator.
    pub fn registered(&self) -> Vec<DueType> {
        self.calculators.keys().copied().collect()
    }

    /// Returns the knowledge base this engine reads from.
    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }

    /// Calculates every requested due type for the query.
    ///
    /// All calculators read from one store snapshot. Due types are computed
    /// in request order, each at most once. Totals cover non-exempt dues only.
    pub fn calculate(&self, query: &VesselQuery) -> CalculationResult {
        let calculation_id = Uuid::new_v4();
        let start_time = Instant::now();
        info!(
            calculation_id = %calculation_id,
            vessel = %query.vessel_name,
            port = %query.port,
            gross_tonnage = %query.gross_tonnage,
            due_types = query.requested_due_types.len(),
            "Starting calculation"
        );

        let resolver = self.knowledge.resolver();
        let mut warnings = Vec::new();

        let vat_rate = match resolver.vat_rate() {
            Ok(resolved) => resolved.value,
            Err(err) => {
                warn!(calculation_id = %calculation_id, error = %err, "VAT rate unavailable");
                warnings.push(format!(
                    "VAT rate unavailable ({}); statutory rate {} assumed",
                    err,
                    reference::VAT_RATE
                ));
                reference::VAT_RATE
            }
        };

        let mut dues = BTreeMap::new();
        let mut calculators_run = Vec::new();
        let mut seen = BTreeSet::new();

        for &due_type in &query.requested_due_types {
            if !seen.insert(due_type) {
                continue;
            }

            let Some(calculator) = self.calculators.get(&due_type) else {
                let message = format!("No calculator registered for due_type='{}'", due_type);
                warn!(calculation_id = %calculation_id, due_type = %due_type, "No calculator registered");
                warnings.push(message);
                continue;
            };

            match calculator.compute(query, &resolver) {
                Ok(result) => {
                    info!(
                        calculation_id = %calculation_id,
                        due_type = %due_type,
                        net = %result.net_amount,
                        vat = %result.vat_amount,
                        total = %result.total_with_vat,
                        exempted = result.exempted,
                        "Due calculated"
                    );
                    calculators_run.push(due_type);
                    dues.insert(due_type, result);
                }
                Err(err) => {
                    warn!(
                        calculation_id = %calculation_id,
                        due_type = %due_type,
                        error = %err,
                        "Calculator failed"
                    );
                    warnings.push(format!("Calculator failed for {}: {}", due_type, err));
                }
            }
        }

        let totals = DueTotals::from_dues(dues.values());
        let exempted = dues
            .values()
            .filter(|due| due.exempted)
            .map(|due| due.due_type)
            .collect();

        info!(
            calculation_id = %calculation_id,
            total_excl_vat = %totals.net_amount,
            total_incl_vat = %totals.total_with_vat,
            warnings = warnings.len(),
            duration_us = start_time.elapsed().as_micros(),
            "Calculation complete"
        );

        CalculationResult {
            vessel_name: query.vessel_name.clone(),
            port: query.port.clone(),
            gross_tonnage: query.gross_tonnage,
            days_in_port: query.days_in_port,
            dues,
            totals,
            warnings,
            metadata: CalculationMetadata {
                vat_rate,
                calculators_run,
                exempted,
            },
        }
    }
}

impl std::fmt::Debug for CalculationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculationEngine")
            .field("calculators", &self.registered())
            .finish_non_exhaustive()
    }
}
