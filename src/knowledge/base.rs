//! Shared holder for the live knowledge store snapshot.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::error::EngineResult;

use super::{KnowledgeStore, RateResolver, StoreStats, TariffStore};

/// Holds the knowledge store that calculations read from.
///
/// The store is never mutated in place. Re-ingestion builds a complete new
/// store and swaps it in, so a calculation in flight keeps reading the
/// snapshot it started with and never sees half-updated tariff data.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use port_tariff_engine::knowledge::{KnowledgeBase, TariffStore};
///
/// let knowledge = KnowledgeBase::empty();
/// let before = knowledge.resolver();
///
/// knowledge.replace(Arc::new(TariffStore::load("./config/tnpa").unwrap()));
/// let after = knowledge.resolver();
/// # let _ = (before, after);
/// ```
pub struct KnowledgeBase {
    current: RwLock<Arc<dyn KnowledgeStore>>,
}

impl KnowledgeBase {
    /// Creates a knowledge base serving the given store.
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self {
            current: RwLock::new(store),
        }
    }

    /// Creates a knowledge base over an empty store.
    pub fn empty() -> Self {
        Self::new(Arc::new(TariffStore::empty()))
    }

    /// Creates a knowledge base from a tariff directory.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Ok(Self::new(Arc::new(TariffStore::load(path)?)))
    }

    /// Returns the current store snapshot.
    pub fn snapshot(&self) -> Arc<dyn KnowledgeStore> {
        // A poisoned lock still holds a complete Arc.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns a resolver pinned to the current snapshot.
    pub fn resolver(&self) -> RateResolver {
        RateResolver::new(self.snapshot())
    }

    /// Atomically replaces the live store.
    pub fn replace(&self, store: Arc<dyn KnowledgeStore>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = store;
        info!("Knowledge store snapshot replaced");
    }

    /// Loads a tariff directory and swaps it in.
    ///
    /// The live store is only replaced if loading succeeds; on error the
    /// previous snapshot keeps serving.
    pub fn reload_from<P: AsRef<Path>>(&self, path: P) -> EngineResult<StoreStats> {
        let store = TariffStore::load(path)?;
        let stats = store.stats();
        self.replace(Arc::new(store));
        info!(
            rates = stats.rates,
            tiers = stats.tiers,
            surcharges = stats.surcharges,
            reductions = stats.reductions,
            minimums = stats.minimums,
            "Knowledge store reloaded"
        );
        Ok(stats)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DueType, RateSource, RateUnit};

    #[test]
    fn test_empty_base_resolves_from_reference() {
        let knowledge = KnowledgeBase::empty();
        let rate = knowledge
            .resolver()
            .rate(DueType::LightDues, "Durban", RateUnit::Per100Gt)
            .unwrap()
            .unwrap();
        assert_eq!(rate.source, RateSource::Reference);
    }

    #[test]
    fn test_reload_swaps_store() {
        let knowledge = KnowledgeBase::empty();
        let stats = knowledge.reload_from("./config/tnpa").unwrap();
        assert_eq!(stats.tiers, 5);

        let rate = knowledge
            .resolver()
            .rate(DueType::LightDues, "Durban", RateUnit::Per100Gt)
            .unwrap()
            .unwrap();
        assert_eq!(rate.source, RateSource::Store);
    }

    #[test]
    fn test_pinned_resolver_keeps_its_snapshot() {
        let knowledge = KnowledgeBase::empty();
        let pinned = knowledge.resolver();

        knowledge.reload_from("./config/tnpa").unwrap();

        let rate = pinned
            .rate(DueType::LightDues, "Durban", RateUnit::Per100Gt)
            .unwrap()
            .unwrap();
        assert_eq!(rate.source, RateSource::Reference);
    }

    #[test]
    fn test_failed_reload_keeps_previous_store() {
        let knowledge = KnowledgeBase::load("./config/tnpa").unwrap();
        assert!(knowledge.reload_from("/nonexistent/tariffs").is_err());

        let rate = knowledge
            .resolver()
            .rate(DueType::LightDues, "Durban", RateUnit::Per100Gt)
            .unwrap()
            .unwrap();
        assert_eq!(rate.source, RateSource::Store);
    }
}
