//! Simulation binary for Relief.
//!
//! Wires a stochastic hazard source to a single response agent and reports
//! what the agent planned.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `relief-config.yaml` (defaults when missing)
//! 2. Initialize logging
//! 3. Create the transit queue and the environment
//! 4. Spawn the environment on its own task
//! 5. Run the agent for the configured number of cycles
//! 6. Stop the environment and log the summary

mod error;
mod logging;

use std::path::Path;

use relief_core::{ResponseAgent, RunSummary, SimulationConfig, transit_queue};
use relief_world::{Environment, WorldError};
use tracing::info;

use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "relief-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, the environment or the agent
/// loop fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = Path::new(CONFIG_PATH);
    let from_file = config_path.exists();
    let config = if from_file {
        SimulationConfig::from_file(config_path)?
    } else {
        SimulationConfig::default()
    };

    // 2. Initialize logging.
    logging::init(&config.logging)?;
    if from_file {
        info!(path = CONFIG_PATH, "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }

    run(config).await?;
    Ok(())
}

/// Run one simulation end to end and return what the agent loop did.
async fn run(config: SimulationConfig) -> Result<RunSummary, EngineError> {
    let SimulationConfig {
        agent: agent_config,
        environment: env_config,
        ..
    } = config;

    // 3. Transit queue and environment.
    let (sender, receiver) = transit_queue();
    let mut environment = Environment::new(env_config.seed, env_config.base_probability)?;
    info!(
        seed = env_config.seed,
        base_probability = environment.base_probability(),
        "Environment created"
    );

    // 4. Environment task. It owns the only sender, so the queue closes
    //    when it finishes.
    let interval = env_config.interval();
    let duration = env_config.duration();
    let producer = tokio::spawn(async move { environment.run(&sender, interval, duration).await });

    // 5. Agent loop.
    let timing = agent_config.timing();
    let timeout = agent_config.timeout();
    let mut agent = ResponseAgent::new(agent_config.agent_id, receiver, timing);
    let summary = agent.run(agent_config.cycles, timeout).await?;
    log_summary(&agent, &summary);

    // 6. Dropping the agent closes the queue and stops an unbounded environment.
    drop(agent);
    match producer.await? {
        Ok(emitted) => info!(emitted, "Environment finished"),
        Err(WorldError::QueueClosed) => info!("Environment stopped with the agent"),
        Err(e) => return Err(e.into()),
    }

    info!("relief-engine shutdown complete");
    Ok(summary)
}

/// Log the final state and every goal the agent planned.
fn log_summary(agent: &ResponseAgent, summary: &RunSummary) {
    info!(
        cycles = summary.cycles,
        events = summary.events_processed,
        idle = summary.idle_cycles,
        feed_closed = summary.feed_closed,
        "Simulation summary"
    );
    info!("Final status: {}", summary.final_state);
    info!("Total actions: {}", agent.goals().len());
    for (n, goal) in agent.goals().goals().iter().enumerate() {
        info!(
            "{}. {} at {} (priority {}, {})",
            n.saturating_add(1),
            goal.goal_type.label(),
            goal.location,
            goal.priority,
            goal.status
        );
    }
}
