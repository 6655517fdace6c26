//! Stochastic hazard generation for the Relief simulation.
//!
//! Each tick the environment rolls against `base_probability`. On success it
//! produces a [`HazardEvent`] with:
//!
//! | Field      | Distribution                                   |
//! |------------|------------------------------------------------|
//! | `type`     | uniform over [`HazardType::ALL`]               |
//! | `severity` | uniform over `1..=5`                           |
//! | `location` | uniform over [`LOCATIONS`]                     |
//! | `id`       | fresh UUID v4                                  |
//! | `timestamp`| wall clock, seconds since the Unix epoch       |
//!
//! # Determinism
//!
//! The RNG is a [`StdRng`] seeded from the configured seed when one is
//! given, so the sequence of types, severities and locations repeats across
//! runs. Ids and timestamps are never reproducible.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use relief_types::{HazardEvent, HazardType};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::error::WorldError;

/// Locations hazards can strike.
pub const LOCATIONS: [&str; 7] = [
    "Madina",
    "Circle",
    "Teshie",
    "Krofrom",
    "Ashtown",
    "Kantamanto",
    "Nima",
];

/// Lowest severity the generator produces.
const MIN_SEVERITY: i64 = 1;

/// Highest severity the generator produces.
const MAX_SEVERITY: i64 = 5;

/// Simulated environment that occasionally produces hazard events.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Source of randomness for every roll.
    rng: StdRng,

    /// Probability that a single tick yields an event.
    base_probability: f64,
}

impl Environment {
    /// Create an environment.
    ///
    /// With `Some(seed)` the generated sequence is reproducible; with `None`
    /// the RNG is seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidProbability`] unless `base_probability`
    /// lies within `[0, 1]`.
    pub fn new(seed: Option<u64>, base_probability: f64) -> Result<Self, WorldError> {
        if !(0.0..=1.0).contains(&base_probability) {
            return Err(WorldError::InvalidProbability {
                value: base_probability,
            });
        }

        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Ok(Self {
            rng,
            base_probability,
        })
    }

    /// Return the per-tick event probability.
    pub const fn base_probability(&self) -> f64 {
        self.base_probability
    }

    /// Roll once and return an event, or `None` if nothing happened.
    pub fn generate_event(&mut self) -> Option<HazardEvent> {
        if !self.rng.random_bool(self.base_probability) {
            return None;
        }

        let hazard_type = HazardType::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(HazardType::Fire);
        let severity = self.rng.random_range(MIN_SEVERITY..=MAX_SEVERITY);
        let location = LOCATIONS.choose(&mut self.rng).copied().unwrap_or("Madina");

        Some(HazardEvent::new(hazard_type, severity, location, unix_timestamp()))
    }

    /// Drive the environment, pushing each event into `queue`.
    ///
    /// Every `interval` the environment rolls once. When `duration` is set
    /// the loop stops after the first roll at or beyond that much elapsed
    /// time; otherwise it runs until the queue closes. Returns the number of
    /// events emitted.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::QueueClosed`] if the consumer went away, or
    /// [`WorldError::Encode`] if an event could not be serialized.
    pub async fn run(
        &mut self,
        queue: &UnboundedSender<serde_json::Value>,
        interval: Duration,
        duration: Option<Duration>,
    ) -> Result<u64, WorldError> {
        let started = tokio::time::Instant::now();
        let mut emitted: u64 = 0;

        info!(
            base_probability = self.base_probability,
            interval_ms = interval.as_millis(),
            duration_ms = duration.map(|d| d.as_millis()),
            "Environment running"
        );

        loop {
            if let Some(event) = self.generate_event() {
                debug!(
                    event_id = event.id,
                    hazard = %event.hazard_type,
                    severity = event.severity,
                    location = event.location,
                    "Hazard generated"
                );
                let payload = event.to_value()?;
                queue.send(payload).map_err(|_err| WorldError::QueueClosed)?;
                emitted = emitted.saturating_add(1);
            }

            if duration.is_some_and(|limit| started.elapsed() >= limit) {
                break;
            }

            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                // Consumer went away between rolls.
                () = queue.closed() => return Err(WorldError::QueueClosed),
            }
        }

        info!(emitted, "Environment stopped");
        Ok(emitted)
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch.
fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}
