//! Configuration loading and management for the Port Tariff Engine.
//!
//! This module provides functionality to load tariff data from YAML files,
//! including tariff book metadata, rates, GT-bracket tiers, surcharges,
//! reductions, minimums, and guardrail thresholds.
//!
//! # Example
//!
//! ```no_run
//! use port_tariff_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/tnpa").unwrap();
//! println!("Loaded tariff book: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{GuardrailSettings, PlausibleRange, TariffBook, TariffMetadata};
