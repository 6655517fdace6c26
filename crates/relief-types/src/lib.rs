//! Shared type definitions for the Relief disaster response simulation.
//!
//! This crate is the single source of truth for the data exchanged between
//! the event source, the agent core, and the engine binary.
//!
//! # Modules
//!
//! - [`enums`] -- Hazard categories, response states, goal types and statuses
//! - [`event`] -- The [`HazardEvent`] payload and its decoding from raw JSON
//! - [`ids`] -- Type-safe identifier for goals

pub mod enums;
pub mod event;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{GoalStatus, GoalType, HazardType, ResponseState};
pub use event::{EventDecodeError, HazardEvent};
pub use ids::GoalId;
