//! Shared calculator building blocks.
//!
//! Every due-type calculator is composed from the helpers here: unit
//! rounding, the exemption preamble, and [`DueBuilder`], which accumulates
//! breakdown lines and finalises the net/VAT/total amounts.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::knowledge::{RateResolver, Resolved, reference};
use crate::models::{BreakdownLine, DueResult, DueType, LineKind, RateSource, VesselQuery};

/// Confidence for a result computed from a reference table's default port entry.
pub const DEFAULTED_PORT_CONFIDENCE: f64 = 0.5;

/// Confidence for a result computed from a fallback tier, or with no tier at all.
pub const TIER_FALLBACK_CONFIDENCE: f64 = 0.3;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

const GOVERNMENT_KEYWORDS: [&str; 8] = [
    "saps",
    "sandf",
    "police",
    "defence",
    "defense",
    "navy",
    "samsa",
    "government",
];

/// Rounds a monetary amount to 2 decimals, midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the number of started 100 GT units, `ceil(GT / 100)`.
///
/// # Example
///
/// ```
/// use port_tariff_engine::calculation::units_of_100gt;
/// use rust_decimal::Decimal;
///
/// assert_eq!(units_of_100gt(Decimal::new(51300, 0)), Decimal::new(513, 0));
/// assert_eq!(units_of_100gt(Decimal::new(51301, 0)), Decimal::new(514, 0));
/// assert_eq!(units_of_100gt(Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn units_of_100gt(gt: Decimal) -> Decimal {
    (gt.max(Decimal::ZERO) / HUNDRED).ceil()
}

/// Converts a whole percent (e.g. 25) to a fraction of `amount`, or `None` on overflow.
pub fn percent_of(amount: Decimal, pct: Decimal) -> Option<Decimal> {
    amount.checked_mul(pct)?.checked_div(HUNDRED)
}

/// Rejects facts no calculator can compute on.
pub fn validate_query(query: &VesselQuery) -> EngineResult<()> {
    if query.gross_tonnage < Decimal::ZERO {
        return Err(EngineError::InvalidQuery {
            field: "gross_tonnage".to_string(),
            message: format!("must not be negative, got {}", query.gross_tonnage),
        });
    }
    if query.days_in_port < Decimal::ZERO {
        return Err(EngineError::InvalidQuery {
            field: "days_in_port".to_string(),
            message: format!("must not be negative, got {}", query.days_in_port),
        });
    }
    Ok(())
}

/// Returns the exemption reason if the vessel is exempt from `due_type`.
///
/// Government, police, defence and navy vessels (matched by keyword on flag
/// or name) are exempt from every due that checks exemption. Pleasure
/// vessels are exempt from light dues and port dues only.
///
/// # Example
///
/// ```
/// use port_tariff_engine::calculation::check_exemption;
/// use port_tariff_engine::models::{DueType, VesselQuery};
///
/// let query = VesselQuery {
///     vessel_name: "SAS Amatola".to_string(),
///     vessel_flag: "SA Navy".to_string(),
///     ..VesselQuery::default()
/// };
/// assert!(check_exemption(&query, DueType::TowageDues).is_some());
/// ```
pub fn check_exemption(query: &VesselQuery, due_type: DueType) -> Option<String> {
    let flag = query.vessel_flag.to_lowercase();
    let name = query.vessel_name.to_lowercase();
    if GOVERNMENT_KEYWORDS
        .iter()
        .any(|kw| flag.contains(kw) || name.contains(kw))
    {
        return Some("Government/SAPS/SANDF vessel".to_string());
    }

    let pleasure = query.vessel_type.trim().eq_ignore_ascii_case("pleasure");
    if pleasure && matches!(due_type, DueType::LightDues | DueType::PortDues) {
        return Some("Pleasure vessel at registered port".to_string());
    }

    None
}

/// Returns the zero result if the vessel is exempt from `due_type`.
///
/// Only the VAT rate is read, and the statutory rate stands in if the store
/// cannot answer, so an exempt due is reported even when rates are unreadable.
pub fn exempt_due(
    query: &VesselQuery,
    due_type: DueType,
    resolver: &RateResolver,
) -> Option<DueResult> {
    let reason = check_exemption(query, due_type)?;
    let vat_rate = resolver
        .vat_rate()
        .map_or(reference::VAT_RATE, |resolved| resolved.value);
    Some(exempt_result(due_type, reason, vat_rate))
}

/// Builds the zero result for an exempt due.
pub fn exempt_result(due_type: DueType, reason: String, vat_rate: Decimal) -> DueResult {
    DueResult {
        due_type,
        base_amount: Decimal::ZERO,
        surcharge_amount: Decimal::ZERO,
        reduction_amount: Decimal::ZERO,
        net_amount: Decimal::ZERO,
        vat_amount: Decimal::ZERO,
        total_with_vat: Decimal::ZERO,
        vat_rate,
        formula: "Exempt".to_string(),
        breakdown: Vec::new(),
        confidence: 1.0,
        exempted: true,
        exemption_reason: Some(reason),
        warnings: Vec::new(),
        rate_sources: BTreeMap::new(),
        parameters: serde_json::Value::Null,
    }
}

/// Accumulates the parts of one due computation and finalises it.
///
/// Lines are kept in the order they are added, which is the order the
/// amounts were computed in.
#[derive(Debug, Clone)]
pub struct DueBuilder {
    due_type: DueType,
    surcharge: Decimal,
    reduction: Decimal,
    breakdown: Vec<BreakdownLine>,
    confidence: f64,
    warnings: Vec<String>,
    rate_sources: BTreeMap<String, RateSource>,
}

impl DueBuilder {
    /// Starts a computation for one due type.
    pub fn new(due_type: DueType) -> Self {
        Self {
            due_type,
            surcharge: Decimal::ZERO,
            reduction: Decimal::ZERO,
            breakdown: Vec::new(),
            confidence: 1.0,
            warnings: Vec::new(),
            rate_sources: BTreeMap::new(),
        }
    }

    /// Appends a breakdown line; the amount is rounded for display.
    pub fn line(&mut self, kind: LineKind, item: impl Into<String>, amount: Decimal) {
        self.breakdown.push(BreakdownLine {
            kind,
            item: item.into(),
            amount: round_money(amount),
        });
    }

    /// Adds a surcharge and its breakdown line.
    pub fn surcharge(&mut self, item: impl Into<String>, amount: Decimal) -> EngineResult<()> {
        self.surcharge = self.add(self.surcharge, amount)?;
        self.line(LineKind::Surcharge, item, amount);
        Ok(())
    }

    /// Adds a reduction and its (negative) breakdown line.
    pub fn reduction(&mut self, item: impl Into<String>, amount: Decimal) -> EngineResult<()> {
        self.reduction = self.add(self.reduction, amount)?;
        self.line(LineKind::Reduction, item, -amount);
        Ok(())
    }

    /// Multiplies two amounts, failing the due on overflow.
    pub fn mul(&self, lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
        lhs.checked_mul(rhs).ok_or_else(|| self.overflow())
    }

    /// Adds two amounts, failing the due on overflow.
    pub fn add(&self, lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
        lhs.checked_add(rhs).ok_or_else(|| self.overflow())
    }

    /// Takes a whole percent of an amount, failing the due on overflow.
    pub fn percent(&self, amount: Decimal, pct: Decimal) -> EngineResult<Decimal> {
        percent_of(amount, pct).ok_or_else(|| self.overflow())
    }

    fn overflow(&self) -> EngineError {
        EngineError::CalculationError {
            message: format!("{} amount exceeds the representable range", self.due_type),
        }
    }

    /// Records a resolved value's source under `key`, returning the value.
    ///
    /// A value taken from a reference table's default port entry lowers the
    /// confidence and adds a warning naming the port.
    pub fn resolved<T: Clone>(&mut self, key: &str, resolved: &Resolved<T>, port: &str) -> T {
        self.rate_sources.insert(key.to_string(), resolved.source);
        if resolved.port_defaulted {
            self.cap_confidence(DEFAULTED_PORT_CONFIDENCE);
            let warning = format!("No {} tariff for port '{}'; default rates used", self.due_type, port);
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
        resolved.value.clone()
    }

    /// Adds a warning.
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Lowers the confidence to at most `confidence`.
    pub fn cap_confidence(&mut self, confidence: f64) {
        self.confidence = self.confidence.min(confidence);
    }

    /// Finalises the result: `net = max(0, base + surcharge - reduction)`,
    /// `vat = net × vat_rate`, `total = net + vat`, all rounded to 2 decimals.
    pub fn finish(
        self,
        base: Decimal,
        vat_rate: Decimal,
        formula: String,
        parameters: serde_json::Value,
    ) -> EngineResult<DueResult> {
        let gross = self.add(base, self.surcharge)?;
        let net = gross
            .checked_sub(self.reduction)
            .ok_or_else(|| self.overflow())?;
        let net = round_money(net.max(Decimal::ZERO));
        let vat = round_money(self.mul(net, vat_rate)?);
        let total = self.add(net, vat)?;

        Ok(DueResult {
            due_type: self.due_type,
            base_amount: round_money(base),
            surcharge_amount: round_money(self.surcharge),
            reduction_amount: round_money(self.reduction),
            net_amount: net,
            vat_amount: vat,
            total_with_vat: total,
            vat_rate,
            formula,
            breakdown: self.breakdown,
            confidence: self.confidence,
            exempted: false,
            exemption_reason: None,
            warnings: self.warnings,
            rate_sources: self.rate_sources,
            parameters,
        })
    }
}
