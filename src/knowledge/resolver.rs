//! Rate resolution with store-then-reference fallback.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{DueType, RateSource, RateUnit, TierRecord};

use super::KnowledgeStore;
use super::reference;
use super::store::exact_or_all;

/// A resolved tariff value and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// The value.
    pub value: T,
    /// The source that served it.
    pub source: RateSource,
    /// True if the reference table had no entry for the port and its default was used.
    pub port_defaulted: bool,
}

impl<T> Resolved<T> {
    fn from_store(value: T) -> Self {
        Self {
            value,
            source: RateSource::Store,
            port_defaulted: false,
        }
    }

    fn from_reference(value: reference::ReferenceValue<T>) -> Self {
        Self {
            value: value.value,
            source: RateSource::Reference,
            port_defaulted: value.port_defaulted,
        }
    }
}

/// A resolved tier list for one due type at one port.
pub type ResolvedTiers = Resolved<Vec<TierRecord>>;

/// The outcome of selecting a tier for a GT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierSelection<'a> {
    /// The tier whose bracket contains the GT.
    Matched(&'a TierRecord),
    /// No bracket contains the GT; the last tier is used instead.
    Fallback(&'a TierRecord),
    /// The tier list is empty.
    NotFound,
}

/// Selects the tier whose bracket contains `gt`.
///
/// Tiers are considered in ascending `gt_min` order. When no bracket
/// contains the GT the last tier is returned as a degraded fallback.
///
/// # Example
///
/// ```
/// use port_tariff_engine::knowledge::{TierSelection, reference, select_tier};
/// use port_tariff_engine::models::DueType;
/// use rust_decimal::Decimal;
///
/// let tiers = reference::tiers(DueType::TowageDues, "Durban").unwrap().value;
///
/// match select_tier(Decimal::new(51300, 0), &tiers) {
///     TierSelection::Matched(tier) => assert_eq!(tier.label(), "[50001–100000]"),
///     other => panic!("unexpected selection: {:?}", other),
/// }
/// ```
pub fn select_tier(gt: Decimal, tiers: &[TierRecord]) -> TierSelection<'_> {
    let mut sorted: Vec<&TierRecord> = tiers.iter().collect();
    sorted.sort_by(|a, b| a.gt_min.cmp(&b.gt_min));

    if let Some(tier) = sorted.iter().copied().find(|t| t.contains(gt)) {
        return TierSelection::Matched(tier);
    }
    match sorted.last().copied() {
        Some(tier) => TierSelection::Fallback(tier),
        None => TierSelection::NotFound,
    }
}

/// Resolves tariff values for the calculators.
///
/// A resolver pins one knowledge store snapshot, so every value read during
/// one calculation comes from the same tariff data. Each read asks the store
/// first and falls back to the reference tables when the store has no answer.
/// Store failures are propagated, never masked by the fallback.
#[derive(Clone)]
pub struct RateResolver {
    store: Arc<dyn KnowledgeStore>,
}

impl RateResolver {
    /// Creates a resolver over a store snapshot.
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self { store }
    }

    /// Resolves a flat rate, or `None` if neither source defines it.
    pub fn rate(
        &self,
        due_type: DueType,
        port: &str,
        unit: RateUnit,
    ) -> EngineResult<Option<Resolved<Decimal>>> {
        if let Some(value) = self.store.get_rate(due_type, port, unit)? {
            return Ok(Some(Resolved::from_store(value)));
        }

        let fallback = reference::rate(due_type, port, unit).map(Resolved::from_reference);
        if fallback.is_some() {
            debug!(
                due_type = %due_type,
                port = port,
                unit = unit.as_str(),
                "Rate served by reference table"
            );
        }
        Ok(fallback)
    }

    /// Resolves the GT-bracket tiers for a due type at a port.
    ///
    /// Returns an empty list if neither source has tiers.
    pub fn tiers(&self, due_type: DueType, port: &str) -> EngineResult<ResolvedTiers> {
        let mut tiers = self.store.get_tiers(due_type, port)?;
        if !tiers.is_empty() {
            tiers.sort_by(|a, b| a.gt_min.cmp(&b.gt_min));
            return Ok(Resolved::from_store(tiers));
        }

        debug!(due_type = %due_type, port = port, "Tiers served by reference table");
        Ok(match reference::tiers(due_type, port) {
            Some(value) => Resolved::from_reference(value),
            None => Resolved::from_reference(reference::ReferenceValue {
                value: Vec::new(),
                port_defaulted: false,
            }),
        })
    }

    /// Resolves the minimum charge for a due type at a port, if one exists.
    pub fn minimum(&self, due_type: DueType, port: &str) -> EngineResult<Option<Resolved<Decimal>>> {
        if let Some(value) = self.store.get_minimum(due_type, port)? {
            return Ok(Some(Resolved::from_store(value)));
        }
        Ok(reference::minimum(due_type).map(|value| Resolved {
            value,
            source: RateSource::Reference,
            port_defaulted: false,
        }))
    }

    /// Resolves a named surcharge percentage (whole percent) at a port.
    ///
    /// Returns zero from the reference source if neither source knows the surcharge.
    pub fn surcharge_pct(
        &self,
        due_type: DueType,
        name: &str,
        port: &str,
    ) -> EngineResult<Resolved<Decimal>> {
        let records = self.store.get_surcharges(due_type)?;
        let named = records.iter().filter(|s| s.name == name);

        Ok(match exact_or_all(named, |s| &s.applies_to, port) {
            Some(record) => Resolved::from_store(record.pct),
            None => {
                debug!(due_type = %due_type, surcharge = name, "Surcharge served by reference table");
                reference_pct(reference::surcharge_pct(due_type, name))
            }
        })
    }

    /// Resolves a named reduction percentage (whole percent) at a port.
    ///
    /// Returns zero from the reference source if neither source knows the reduction.
    pub fn reduction_pct(
        &self,
        due_type: DueType,
        name: &str,
        port: &str,
    ) -> EngineResult<Resolved<Decimal>> {
        let records = self.store.get_reductions(due_type)?;
        let named = records.iter().filter(|r| r.name == name);

        Ok(match exact_or_all(named, |r| &r.applies_to, port) {
            Some(record) => Resolved::from_store(record.pct),
            None => {
                debug!(due_type = %due_type, reduction = name, "Reduction served by reference table");
                reference_pct(reference::reduction_pct(due_type, name))
            }
        })
    }

    /// Resolves the VAT rate.
    pub fn vat_rate(&self) -> EngineResult<Resolved<Decimal>> {
        Ok(match self.store.get_vat_rate()? {
            Some(value) => Resolved::from_store(value),
            None => Resolved {
                value: reference::VAT_RATE,
                source: RateSource::Reference,
                port_defaulted: false,
            },
        })
    }
}

fn reference_pct(pct: Option<Decimal>) -> Resolved<Decimal> {
    Resolved {
        value: pct.unwrap_or(Decimal::ZERO),
        source: RateSource::Reference,
        port_defaulted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TariffBook;
    use crate::error::EngineError;
    use crate::knowledge::TariffStore;
    use crate::models::{PortScope, RateRecord, ReductionRecord, SurchargeRecord};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tier(min: &str, max: Option<&str>, base_fee: &str) -> TierRecord {
        TierRecord {
            due_type: DueType::TowageDues,
            port: PortScope::All,
            gt_min: dec(min),
            gt_max: max.map(dec),
            base_fee: dec(base_fee),
            rate_per_unit: Decimal::ZERO,
            section: None,
        }
    }

    fn resolver_for(book: TariffBook) -> RateResolver {
        RateResolver::new(Arc::new(TariffStore::from_book(book)))
    }

    struct FailingStore;

    impl KnowledgeStore for FailingStore {
        fn get_rate(&self, _: DueType, _: &str, _: RateUnit) -> EngineResult<Option<Decimal>> {
            Err(EngineError::StoreUnavailable {
                message: "connection refused".to_string(),
            })
        }
        fn get_tiers(&self, _: DueType, _: &str) -> EngineResult<Vec<TierRecord>> {
            Ok(Vec::new())
        }
        fn get_minimum(&self, _: DueType, _: &str) -> EngineResult<Option<Decimal>> {
            Ok(None)
        }
        fn get_surcharges(&self, _: DueType) -> EngineResult<Vec<SurchargeRecord>> {
            Ok(Vec::new())
        }
        fn get_reductions(&self, _: DueType) -> EngineResult<Vec<ReductionRecord>> {
            Ok(Vec::new())
        }
        fn get_vat_rate(&self) -> EngineResult<Option<Decimal>> {
            Ok(None)
        }
    }

    #[test]
    fn test_select_tier_matches_bracket() {
        let tiers = vec![
            tier("0", Some("2000"), "100"),
            tier("2001", Some("10000"), "200"),
            tier("10001", None, "300"),
        ];

        assert_eq!(
            select_tier(dec("2000"), &tiers),
            TierSelection::Matched(&tiers[0])
        );
        assert_eq!(
            select_tier(dec("2001"), &tiers),
            TierSelection::Matched(&tiers[1])
        );
        assert_eq!(
            select_tier(dec("900000"), &tiers),
            TierSelection::Matched(&tiers[2])
        );
    }

    #[test]
    fn test_select_tier_sorts_unordered_input() {
        let tiers = vec![tier("10001", None, "300"), tier("0", Some("10000"), "100")];
        assert_eq!(
            select_tier(dec("500"), &tiers),
            TierSelection::Matched(&tiers[1])
        );
    }

    #[test]
    fn test_select_tier_falls_back_to_last_tier() {
        let tiers = vec![tier("0", Some("2000"), "100"), tier("2001", Some("10000"), "200")];
        assert_eq!(
            select_tier(dec("20000"), &tiers),
            TierSelection::Fallback(&tiers[1])
        );
    }

    #[test]
    fn test_select_tier_gap_between_integer_brackets_falls_back() {
        let tiers = vec![tier("0", Some("2000"), "100"), tier("2001", None, "200")];
        assert_eq!(
            select_tier(dec("2000.5"), &tiers),
            TierSelection::Fallback(&tiers[1])
        );
    }

    #[test]
    fn test_select_tier_empty_list() {
        assert_eq!(select_tier(dec("100"), &[]), TierSelection::NotFound);
    }

    #[test]
    fn test_rate_prefers_store() {
        let resolver = resolver_for(TariffBook {
            rates: vec![RateRecord {
                due_type: DueType::LightDues,
                port: PortScope::All,
                rate: dec("120.00"),
                unit: RateUnit::Per100Gt,
                section: None,
            }],
            ..TariffBook::default()
        });

        let rate = resolver
            .rate(DueType::LightDues, "Durban", RateUnit::Per100Gt)
            .unwrap()
            .unwrap();
        assert_eq!(rate.value, dec("120.00"));
        assert_eq!(rate.source, RateSource::Store);
    }

    #[test]
    fn test_rate_falls_back_to_reference() {
        let resolver = resolver_for(TariffBook::default());
        let rate = resolver
            .rate(DueType::PilotageDues, "Cape Town", RateUnit::PerService)
            .unwrap()
            .unwrap();
        assert_eq!(rate.value, dec("6342.39"));
        assert_eq!(rate.source, RateSource::Reference);
        assert!(!rate.port_defaulted);
    }

    #[test]
    fn test_rate_undefined_in_both_sources() {
        let resolver = resolver_for(TariffBook::default());
        let rate = resolver
            .rate(DueType::LightDues, "Durban", RateUnit::PerService)
            .unwrap();
        assert!(rate.is_none());
    }

    #[test]
    fn test_store_failure_is_propagated() {
        let resolver = RateResolver::new(Arc::new(FailingStore));
        let result = resolver.rate(DueType::LightDues, "Durban", RateUnit::Per100Gt);
        assert!(matches!(result, Err(EngineError::StoreUnavailable { .. })));
    }

    #[test]
    fn test_tiers_fall_back_to_reference_for_port() {
        let resolver = resolver_for(TariffBook::default());
        let tiers = resolver.tiers(DueType::TowageDues, "Saldanha").unwrap();
        assert_eq!(tiers.source, RateSource::Reference);
        assert_eq!(tiers.value.len(), 5);
        assert_eq!(tiers.value[0].base_fee, dec("9038.42"));
    }

    #[test]
    fn test_tiers_from_store() {
        let resolver = resolver_for(TariffBook {
            tiers: vec![tier("0", None, "999")],
            ..TariffBook::default()
        });
        let tiers = resolver.tiers(DueType::TowageDues, "Durban").unwrap();
        assert_eq!(tiers.source, RateSource::Store);
        assert_eq!(tiers.value.len(), 1);
    }

    #[test]
    fn test_untiered_due_resolves_to_empty_list() {
        let resolver = resolver_for(TariffBook::default());
        let tiers = resolver.tiers(DueType::LightDues, "Durban").unwrap();
        assert!(tiers.value.is_empty());
    }

    #[test]
    fn test_surcharge_from_store_respects_port_scope() {
        let resolver = resolver_for(TariffBook {
            surcharges: vec![SurchargeRecord {
                due_type: DueType::TowageDues,
                name: "outside_working_hours".to_string(),
                pct: dec("30"),
                applies_to: PortScope::Port("Durban".to_string()),
                condition: None,
            }],
            ..TariffBook::default()
        });

        let durban = resolver
            .surcharge_pct(DueType::TowageDues, "outside_working_hours", "Durban")
            .unwrap();
        let cape_town = resolver
            .surcharge_pct(DueType::TowageDues, "outside_working_hours", "Cape Town")
            .unwrap();

        assert_eq!(durban.value, dec("30"));
        assert_eq!(durban.source, RateSource::Store);
        assert_eq!(cape_town.value, dec("25"));
        assert_eq!(cape_town.source, RateSource::Reference);
    }

    #[test]
    fn test_exact_port_surcharge_wins_over_all() {
        let owh = |pct: &str, applies_to: PortScope| SurchargeRecord {
            due_type: DueType::TowageDues,
            name: "outside_working_hours".to_string(),
            pct: dec(pct),
            applies_to,
            condition: None,
        };
        let resolver = resolver_for(TariffBook {
            surcharges: vec![
                owh("25", PortScope::All),
                owh("40", PortScope::Port("Durban".to_string())),
            ],
            ..TariffBook::default()
        });

        let durban = resolver
            .surcharge_pct(DueType::TowageDues, "outside_working_hours", "Durban")
            .unwrap();
        let cape_town = resolver
            .surcharge_pct(DueType::TowageDues, "outside_working_hours", "Cape Town")
            .unwrap();

        assert_eq!(durban.value, dec("40"));
        assert_eq!(cape_town.value, dec("25"));
        assert_eq!(cape_town.source, RateSource::Store);
    }

    #[test]
    fn test_exact_port_reduction_wins_over_all() {
        let coaster = |pct: &str, applies_to: PortScope| ReductionRecord {
            due_type: DueType::PortDues,
            name: "coaster".to_string(),
            pct: dec(pct),
            applies_to,
            condition: None,
        };
        let resolver = resolver_for(TariffBook {
            reductions: vec![
                coaster("35", PortScope::All),
                coaster("50", PortScope::Port("Saldanha".to_string())),
            ],
            ..TariffBook::default()
        });

        let saldanha = resolver
            .reduction_pct(DueType::PortDues, "coaster", "Saldanha")
            .unwrap();
        let durban = resolver
            .reduction_pct(DueType::PortDues, "coaster", "Durban")
            .unwrap();

        assert_eq!(saldanha.value, dec("50"));
        assert_eq!(durban.value, dec("35"));
    }

    #[test]
    fn test_unknown_reduction_resolves_to_zero() {
        let resolver = resolver_for(TariffBook::default());
        let pct = resolver
            .reduction_pct(DueType::LightDues, "coaster", "Durban")
            .unwrap();
        assert_eq!(pct.value, Decimal::ZERO);
    }

    #[test]
    fn test_minimum_and_vat_fallbacks() {
        let resolver = resolver_for(TariffBook::default());
        let minimum = resolver.minimum(DueType::VtsDues, "Durban").unwrap().unwrap();
        assert_eq!(minimum.value, dec("235.52"));
        assert!(resolver.minimum(DueType::LightDues, "Durban").unwrap().is_none());

        let vat = resolver.vat_rate().unwrap();
        assert_eq!(vat.value, dec("0.15"));
        assert_eq!(vat.source, RateSource::Reference);
    }
}
