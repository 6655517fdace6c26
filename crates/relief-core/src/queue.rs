//! Transit queue between the event source and the agent loop.
//!
//! The queue is an unbounded FIFO of raw JSON payloads. Producers never
//! block; the single consumer waits with a timeout. Payloads stay untyped in
//! transit so the consumer is the one that enforces the event schema.

use tokio::sync::mpsc;

/// Producer half of the transit queue.
pub type EventSender = mpsc::UnboundedSender<serde_json::Value>;

/// Consumer half of the transit queue.
pub type EventReceiver = mpsc::UnboundedReceiver<serde_json::Value>;

/// Create a new transit queue.
pub fn transit_queue() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
