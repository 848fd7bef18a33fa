//! In-memory knowledge store built from a loaded tariff book.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{ConfigLoader, TariffBook, TariffMetadata};
use crate::error::EngineResult;
use crate::models::{
    DueType, MinimumRecord, PortScope, RateRecord, RateUnit, ReductionRecord, SurchargeRecord,
    TierRecord,
};

use super::KnowledgeStore;

/// Record counts per table, for logging and health reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of flat rates.
    pub rates: usize,
    /// Number of tier records.
    pub tiers: usize,
    /// Number of surcharges.
    pub surcharges: usize,
    /// Number of reductions.
    pub reductions: usize,
    /// Number of minimum charges.
    pub minimums: usize,
}

/// A read-only knowledge store indexed by due type.
///
/// The store is immutable once built. Reloading tariff data means building
/// a new store and swapping it in through
/// [`KnowledgeBase::replace`](super::KnowledgeBase::replace).
///
/// # Example
///
/// ```
/// use port_tariff_engine::config::TariffBook;
/// use port_tariff_engine::knowledge::{KnowledgeStore, TariffStore};
/// use port_tariff_engine::models::{DueType, PortScope, RateRecord, RateUnit};
/// use rust_decimal::Decimal;
///
/// let book = TariffBook {
///     rates: vec![RateRecord {
///         due_type: DueType::VtsDues,
///         port: PortScope::All,
///         rate: Decimal::new(54, 2),
///         unit: RateUnit::PerGt,
///         section: None,
///     }],
///     ..TariffBook::default()
/// };
///
/// let store = TariffStore::from_book(book);
/// let rate = store.get_rate(DueType::VtsDues, "East London", RateUnit::PerGt).unwrap();
/// assert_eq!(rate, Some(Decimal::new(54, 2)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TariffStore {
    metadata: TariffMetadata,
    vat_rate: Option<Decimal>,
    rates: BTreeMap<DueType, Vec<RateRecord>>,
    tiers: BTreeMap<DueType, Vec<TierRecord>>,
    surcharges: BTreeMap<DueType, Vec<SurchargeRecord>>,
    reductions: BTreeMap<DueType, Vec<ReductionRecord>>,
    minimums: BTreeMap<DueType, Vec<MinimumRecord>>,
}

impl TariffStore {
    /// Builds a store from a tariff book.
    pub fn from_book(book: TariffBook) -> Self {
        let mut tiers = group_by_due(book.tiers, |t| t.due_type);
        for list in tiers.values_mut() {
            list.sort_by(|a, b| a.gt_min.cmp(&b.gt_min));
        }

        Self {
            metadata: book.metadata,
            vat_rate: book.vat_rate,
            rates: group_by_due(book.rates, |r| r.due_type),
            tiers,
            surcharges: group_by_due(book.surcharges, |s| s.due_type),
            reductions: group_by_due(book.reductions, |r| r.due_type),
            minimums: group_by_due(book.minimums, |m| m.due_type),
        }
    }

    /// Loads a tariff directory and builds a store from it.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Ok(Self::from_book(ConfigLoader::load(path)?.into_book()))
    }

    /// Returns a store with no records; every read falls through to the reference tables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the metadata of the tariff book this store was built from.
    pub fn metadata(&self) -> &TariffMetadata {
        &self.metadata
    }

    /// Returns the record counts per table.
    pub fn stats(&self) -> StoreStats {
        fn count<T>(map: &BTreeMap<DueType, Vec<T>>) -> usize {
            map.values().map(Vec::len).sum()
        }

        StoreStats {
            rates: count(&self.rates),
            tiers: count(&self.tiers),
            surcharges: count(&self.surcharges),
            reductions: count(&self.reductions),
            minimums: count(&self.minimums),
        }
    }
}

fn group_by_due<T>(records: Vec<T>, key: impl Fn(&T) -> DueType) -> BTreeMap<DueType, Vec<T>> {
    let mut grouped: BTreeMap<DueType, Vec<T>> = BTreeMap::new();
    for record in records {
        grouped.entry(key(&record)).or_default().push(record);
    }
    grouped
}

/// Picks the first record scoped to exactly `port`, else the first `ALL` record.
pub(super) fn exact_or_all<'a, T>(
    records: impl Iterator<Item = &'a T> + Clone,
    scope: impl Fn(&T) -> &PortScope,
    port: &str,
) -> Option<&'a T>
where
    T: 'a,
{
    records
        .clone()
        .find(|r| scope(*r).is_exact(port))
        .or_else(|| records.into_iter().find(|r| *scope(*r) == PortScope::All))
}

impl KnowledgeStore for TariffStore {
    fn get_rate(
        &self,
        due_type: DueType,
        port: &str,
        unit: RateUnit,
    ) -> EngineResult<Option<Decimal>> {
        let Some(rates) = self.rates.get(&due_type) else {
            return Ok(None);
        };
        let candidates = rates.iter().filter(|r| r.unit == unit);
        Ok(exact_or_all(candidates, |r| &r.port, port).map(|r| r.rate))
    }

    fn get_tiers(&self, due_type: DueType, port: &str) -> EngineResult<Vec<TierRecord>> {
        let Some(tiers) = self.tiers.get(&due_type) else {
            return Ok(Vec::new());
        };

        let exact: Vec<TierRecord> = tiers
            .iter()
            .filter(|t| t.port.is_exact(port))
            .cloned()
            .collect();
        if !exact.is_empty() {
            return Ok(exact);
        }

        Ok(tiers
            .iter()
            .filter(|t| t.port == PortScope::All)
            .cloned()
            .collect())
    }

    fn get_minimum(&self, due_type: DueType, port: &str) -> EngineResult<Option<Decimal>> {
        let Some(minimums) = self.minimums.get(&due_type) else {
            return Ok(None);
        };
        Ok(exact_or_all(minimums.iter(), |m| &m.port, port).map(|m| m.amount))
    }

    fn get_surcharges(&self, due_type: DueType) -> EngineResult<Vec<SurchargeRecord>> {
        Ok(self.surcharges.get(&due_type).cloned().unwrap_or_default())
    }

    fn get_reductions(&self, due_type: DueType) -> EngineResult<Vec<ReductionRecord>> {
        Ok(self.reductions.get(&due_type).cloned().unwrap_or_default())
    }

    fn get_vat_rate(&self) -> EngineResult<Option<Decimal>> {
        Ok(self.vat_rate)
    }
}
