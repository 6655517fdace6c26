//! Integration tests for the environment run loop.
//!
//! Time is paused so intervals elapse instantly and deterministically.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use relief_types::HazardEvent;
use relief_world::{Environment, WorldError};
use tokio::sync::mpsc;

#[tokio::test(start_paused = true)]
async fn run_puts_decodable_events_in_queue() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut env = Environment::new(Some(7), 0.7).unwrap();

    let emitted = env
        .run(&tx, Duration::from_millis(10), Some(Duration::from_millis(100)))
        .await
        .unwrap();

    let mut received = 0_u64;
    while let Ok(payload) = rx.try_recv() {
        let event = HazardEvent::from_value(payload).unwrap();
        assert!((1..=5).contains(&event.severity));
        received = received.saturating_add(1);
    }
    assert_eq!(received, emitted);
}

#[tokio::test(start_paused = true)]
async fn certain_probability_emits_once_per_tick() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut env = Environment::new(Some(1), 1.0).unwrap();

    // Rolls at t = 0, 10, ..., 50 ms; the roll at 50 ms reaches the limit.
    let emitted = env
        .run(&tx, Duration::from_millis(10), Some(Duration::from_millis(50)))
        .await
        .unwrap();

    assert_eq!(emitted, 6);
    let mut count = 0_u64;
    while rx.try_recv().is_ok() {
        count = count.saturating_add(1);
    }
    assert_eq!(count, 6);
}

#[tokio::test(start_paused = true)]
async fn closed_queue_stops_the_environment() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let mut env = Environment::new(Some(1), 1.0).unwrap();

    let result = env.run(&tx, Duration::from_millis(10), None).await;
    assert!(matches!(result, Err(WorldError::QueueClosed)));
}

#[tokio::test(start_paused = true)]
async fn silent_environment_notices_consumer_leaving() {
    let (tx, rx) = mpsc::unbounded_channel::<serde_json::Value>();
    let mut env = Environment::new(None, 0.0).unwrap();

    let handle = tokio::spawn(async move { env.run(&tx, Duration::from_secs(60), None).await });
    tokio::time::sleep(Duration::from_secs(90)).await;
    drop(rx);

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(WorldError::QueueClosed)));
}
