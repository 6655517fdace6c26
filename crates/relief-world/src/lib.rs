//! Simulated environment for the Relief disaster response simulation.
//!
//! This crate plays the role of the outside world: it rolls for hazards at a
//! fixed interval and pushes each one into the transit queue that agents
//! consume. It knows nothing about agents, states, or goals.
//!
//! # Modules
//!
//! - [`environment`] -- Seeded hazard generator and its async run loop.
//! - [`error`] -- Error types for environment operations.

pub mod environment;
pub mod error;

// Re-export primary types at crate root.
pub use environment::{Environment, LOCATIONS};
pub use error::WorldError;
