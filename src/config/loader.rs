//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a tariff
//! directory of YAML files into a [`TariffBook`] and guardrail settings.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use crate::error::{EngineError, EngineResult};
use crate::models::{DueType, TierRecord};

use super::types::{
    GuardrailSettings, MinimumsFile, RatesFile, ReductionsFile, SurchargesFile, TariffBook,
    TariffFile, TariffMetadata, TiersFile,
};

/// Loads and provides access to tariff configuration.
///
/// The `ConfigLoader` reads YAML files from a tariff directory. Only
/// `tariff.yaml` is required; record files that are absent contribute no
/// records, which the reference tables then cover.
///
/// # Directory Structure
///
/// ```text
/// config/tnpa/
/// ├── tariff.yaml      # Metadata and VAT rate
/// ├── rates.yaml       # Flat rates
/// ├── tiers.yaml       # GT-bracket tiers
/// ├── surcharges.yaml  # Percentage surcharges
/// ├── reductions.yaml  # Percentage reductions
/// ├── minimums.yaml    # Minimum charges
/// └── guardrails.yaml  # Optional guardrail threshold overrides
/// ```
///
/// # Example
///
/// ```no_run
/// use port_tariff_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/tnpa").unwrap();
/// println!("Loaded tariff book: {}", loader.metadata().name);
/// println!("{} tier records", loader.book().tiers.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    book: TariffBook,
    guardrails: GuardrailSettings,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `tariff.yaml` is missing (`ConfigNotFound`)
    /// - Any present file contains invalid YAML or misses a required field (`ConfigParseError`)
    /// - A tier list overlaps or has an unbounded tier before its last tier (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let tariff = Self::load_yaml::<TariffFile>(&path.join("tariff.yaml"))?;
        let rates = Self::load_optional_yaml::<RatesFile>(&path.join("rates.yaml"))?;
        let tiers_path = path.join("tiers.yaml");
        let tiers = Self::load_optional_yaml::<TiersFile>(&tiers_path)?;
        let surcharges = Self::load_optional_yaml::<SurchargesFile>(&path.join("surcharges.yaml"))?;
        let reductions = Self::load_optional_yaml::<ReductionsFile>(&path.join("reductions.yaml"))?;
        let minimums = Self::load_optional_yaml::<MinimumsFile>(&path.join("minimums.yaml"))?;
        let guardrails =
            Self::load_optional_yaml::<GuardrailSettings>(&path.join("guardrails.yaml"))?;

        validate_tiers(&tiers.tiers).map_err(|message| EngineError::ConfigParseError {
            path: tiers_path.display().to_string(),
            message,
        })?;

        let book = TariffBook {
            metadata: tariff.metadata,
            vat_rate: tariff.vat_rate,
            rates: rates.rates,
            tiers: tiers.tiers,
            surcharges: surcharges.surcharges,
            reductions: reductions.reductions,
            minimums: minimums.minimums,
        };

        Ok(Self { book, guardrails })
    }

    /// Loads and parses a required YAML file.
    fn load_yaml<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and parses an optional YAML file, defaulting when it is absent.
    fn load_optional_yaml<T: DeserializeOwned + Default>(path: &Path) -> EngineResult<T> {
        if !path.exists() {
            return Ok(T::default());
        }
        Self::load_yaml(path)
    }

    /// Returns the loaded tariff book.
    pub fn book(&self) -> &TariffBook {
        &self.book
    }

    /// Consumes the loader, returning the tariff book.
    pub fn into_book(self) -> TariffBook {
        self.book
    }

    /// Returns the tariff book metadata.
    pub fn metadata(&self) -> &TariffMetadata {
        &self.book.metadata
    }

    /// Returns the guardrail settings (defaults unless `guardrails.yaml` overrides them).
    pub fn guardrails(&self) -> &GuardrailSettings {
        &self.guardrails
    }
}

/// Checks that each (due type, port) tier list is ascending and non-overlapping,
/// with at most its last tier unbounded.
fn validate_tiers(tiers: &[TierRecord]) -> Result<(), String> {
    let mut groups: BTreeMap<(DueType, String), Vec<&TierRecord>> = BTreeMap::new();
    for tier in tiers {
        groups
            .entry((tier.due_type, tier.port.to_string().to_lowercase()))
            .or_default()
            .push(tier);
    }

    for ((due_type, port), mut group) in groups {
        group.sort_by(|a, b| a.gt_min.cmp(&b.gt_min));

        let mut previous_max: Option<Option<Decimal>> = None;
        for tier in group {
            if tier.gt_max.is_some_and(|max| max < tier.gt_min) {
                return Err(format!(
                    "{} tier {} at '{}' has gt_max below gt_min",
                    due_type,
                    tier.label(),
                    port
                ));
            }
            match previous_max {
                Some(None) => {
                    return Err(format!(
                        "{} tiers at '{}' continue after an unbounded tier",
                        due_type, port
                    ));
                }
                Some(Some(max)) if tier.gt_min <= max => {
                    return Err(format!(
                        "{} tier {} at '{}' overlaps the previous tier",
                        due_type,
                        tier.label(),
                        port
                    ));
                }
                _ => {}
            }
            previous_max = Some(tier.gt_max);
        }
    }

    Ok(())
}
