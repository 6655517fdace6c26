//! Agent core for the Relief disaster response simulation.
//!
//! This crate owns everything an agent does between pulling an event off the
//! transit queue and recording what it intends to do about it.
//!
//! # Modules
//!
//! - [`agent`] -- [`ResponseAgent`]: the bounded wait-and-process loop and the
//!   ordered event-processing pass.
//! - [`config`] -- Configuration loading from `relief-config.yaml` into
//!   strongly-typed structs.
//! - [`fsm`] -- [`StateMachine`]: data-driven transition table with single-slot
//!   enter/exit callbacks.
//! - [`goals`] -- [`Goal`] and the append-only [`GoalSet`].
//! - [`queue`] -- The unbounded transit queue between event source and agent.
//!
//! [`ResponseAgent`]: agent::ResponseAgent
//! [`StateMachine`]: fsm::StateMachine
//! [`Goal`]: goals::Goal
//! [`GoalSet`]: goals::GoalSet

pub mod agent;
pub mod config;
pub mod fsm;
pub mod goals;
pub mod queue;

pub use agent::{AgentError, DAMAGE_THRESHOLD, PassOutcome, PassTiming, ResponseAgent, RunSummary};
pub use config::{AgentConfig, ConfigError, EnvironmentConfig, LoggingConfig, SimulationConfig};
pub use fsm::{StateCallback, StateMachine, TransitionContext, build_response_fsm};
pub use goals::{Goal, GoalError, GoalSet};
pub use queue::{EventReceiver, EventSender, transit_queue};
