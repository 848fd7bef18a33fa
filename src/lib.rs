//! Port Tariff Engine
//!
//! This crate calculates the regulated dues a vessel incurs on a port call
//! (light, VTS, port, towage, pilotage and running lines dues) from a
//! normalised [`VesselQuery`](models::VesselQuery), and checks the input and
//! the result through a guardrail layer.
//!
//! Tariff values are read from a [`KnowledgeBase`](knowledge::KnowledgeBase)
//! loaded from a YAML tariff directory; anything missing there is served by
//! built-in reference tables.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod guardrails;
pub mod knowledge;
pub mod models;

pub use engine::CalculationEngine;
pub use error::{EngineError, EngineResult};
pub use guardrails::{GuardedOutcome, GuardrailLayer};
