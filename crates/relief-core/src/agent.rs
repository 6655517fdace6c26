//! The response agent: a bounded wait-and-process loop over the transit queue.
//!
//! Each cycle the agent waits up to `timeout` for the next event. A timeout
//! is an idle cycle, not an error. A received event runs one
//! **event-processing pass**: five ordered steps, each
//! guarded by the state the machine is in *when that step is reached*:
//!
//! | Step | Guard        | Action                                                        |
//! |------|--------------|---------------------------------------------------------------|
//! | 1    | `Idle`       | fire `event_detected`                                         |
//! | 2    | `Monitoring` | add an assess-damage goal, fire `assess_damage`               |
//! | 3    | `Assessing`  | wait; severity >= 3 fires `damage_confirmed` and adds a rescue goal, otherwise `no_threat` |
//! | 4    | `Responding` | wait, fire `goal_complete`                                    |
//! | 5    | `Recovering` | wait, fire `recovery_done`                                    |
//!
//! Because every guard re-reads the current state, one event that arrives
//! while idle carries the agent around the whole cycle and back to `Idle`
//! within a single pass. A pass that starts mid-cycle resumes from there.
//!
//! The pass never completes goals; that is left to the caller.

use std::time::Duration;

use relief_types::{EventDecodeError, GoalId, GoalType, HazardEvent, ResponseState};
use tracing::{Span, info, info_span, warn};

use crate::fsm::{StateMachine, TransitionContext, build_response_fsm, triggers};
use crate::goals::{Goal, GoalSet};
use crate::queue::EventReceiver;

/// Severity at or above which an assessment confirms damage.
pub const DAMAGE_THRESHOLD: i64 = 3;

/// Errors that abort the agent loop.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A dequeued payload does not match the event schema.
    #[error("malformed event: {source}")]
    MalformedEvent {
        /// The underlying decode error.
        #[from]
        source: EventDecodeError,
    },
}

/// Simulated processing delays applied during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTiming {
    /// Time spent assessing damage.
    pub assessment: Duration,
    /// Time spent dispatching the response.
    pub response: Duration,
    /// Time spent on recovery.
    pub recovery: Duration,
}

impl Default for PassTiming {
    fn default() -> Self {
        Self {
            assessment: Duration::from_millis(100),
            response: Duration::from_millis(100),
            recovery: Duration::from_millis(50),
        }
    }
}

/// One guarded step of an event-processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassStep {
    /// Acknowledge the alert.
    Detect,
    /// Plan a damage assessment.
    PlanAssessment,
    /// Assess and decide whether to respond.
    Assess,
    /// Dispatch the response team.
    Respond,
    /// Recover and return to idle.
    Recover,
}

impl PassStep {
    /// State the machine must be in for this step to run.
    const fn guard(self) -> ResponseState {
        match self {
            Self::Detect => ResponseState::Idle,
            Self::PlanAssessment => ResponseState::Monitoring,
            Self::Assess => ResponseState::Assessing,
            Self::Respond => ResponseState::Responding,
            Self::Recover => ResponseState::Recovering,
        }
    }
}

/// Steps of a pass, in evaluation order.
const PASS_STEPS: [PassStep; 5] = [
    PassStep::Detect,
    PassStep::PlanAssessment,
    PassStep::Assess,
    PassStep::Respond,
    PassStep::Recover,
];

/// Log line emitted when the agent enters each state.
const ENTER_MESSAGES: [(ResponseState, &str); 5] = [
    (ResponseState::Idle, "Waiting for alerts"),
    (ResponseState::Monitoring, "Alert detected - checking details"),
    (ResponseState::Assessing, "Assessing the situation"),
    (ResponseState::Responding, "Sending response team"),
    (ResponseState::Recovering, "Recovery in progress"),
];

/// What a single pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    /// Id of the event that triggered the pass.
    pub event_id: String,
    /// Number of state transitions fired.
    pub transitions: usize,
    /// Goals created, in creation order.
    pub goals_created: Vec<GoalId>,
}

/// Result of a full [`ResponseAgent::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles started (at most the requested number).
    pub cycles: u64,
    /// Cycles that received and processed an event.
    pub events_processed: u64,
    /// Cycles that timed out with no event.
    pub idle_cycles: u64,
    /// State the agent ended in.
    pub final_state: ResponseState,
    /// Whether the loop stopped early because the queue closed.
    pub feed_closed: bool,
}

/// An agent that reacts to hazard events.
#[derive(Debug)]
pub struct ResponseAgent {
    /// Label used as the prefix of every log line.
    agent_id: String,

    /// Consumer half of the transit queue.
    queue: EventReceiver,

    /// Operational state machine.
    fsm: StateMachine,

    /// Goals planned so far.
    goals: GoalSet,

    /// Simulated delays.
    timing: PassTiming,

    /// Logging handle; parent of every line this agent emits.
    span: Span,

    /// Whether [`run`](Self::run) is in progress.
    running: bool,
}

impl ResponseAgent {
    /// Create an agent with its own `agent` span.
    pub fn new(agent_id: impl Into<String>, queue: EventReceiver, timing: PassTiming) -> Self {
        let agent_id = agent_id.into();
        let span = info_span!("agent", agent_id = %agent_id);
        Self::with_span(agent_id, queue, timing, span)
    }

    /// Create an agent that logs under the given span.
    pub fn with_span(
        agent_id: impl Into<String>,
        queue: EventReceiver,
        timing: PassTiming,
        span: Span,
    ) -> Self {
        let agent_id = agent_id.into();
        let mut fsm = build_response_fsm();
        register_enter_logs(&mut fsm, &agent_id, &span);
        Self {
            agent_id,
            queue,
            fsm,
            goals: GoalSet::new(),
            timing,
            span,
            running: false,
        }
    }

    /// The agent's label.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The agent's state machine.
    pub const fn fsm(&self) -> &StateMachine {
        &self.fsm
    }

    /// Mutable access to the state machine, e.g. to register callbacks.
    pub const fn fsm_mut(&mut self) -> &mut StateMachine {
        &mut self.fsm
    }

    /// Goals planned so far.
    pub const fn goals(&self) -> &GoalSet {
        &self.goals
    }

    /// Mutable access to the goals, e.g. to activate or complete them.
    pub const fn goals_mut(&mut self) -> &mut GoalSet {
        &mut self.goals
    }

    /// Whether the loop is currently running.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Run up to `cycles` wait-and-process cycles.
    ///
    /// Stops early if the queue is closed and drained.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MalformedEvent`] as soon as a payload fails to
    /// decode; the remaining cycles are abandoned.
    pub async fn run(&mut self, cycles: u64, timeout: Duration) -> Result<RunSummary, AgentError> {
        self.running = true;
        info!(parent: &self.span, "[{}] System online - monitoring...", self.agent_id);

        let mut summary = RunSummary {
            cycles: 0,
            events_processed: 0,
            idle_cycles: 0,
            final_state: self.fsm.current_state(),
            feed_closed: false,
        };

        for _ in 0..cycles {
            summary.cycles = summary.cycles.saturating_add(1);
            match tokio::time::timeout(timeout, self.queue.recv()).await {
                Ok(Some(payload)) => {
                    if let Err(e) = self.process_event(payload).await {
                        self.running = false;
                        warn!(parent: &self.span, error = %e, "[{}] Aborting on malformed event", self.agent_id);
                        return Err(e);
                    }
                    summary.events_processed = summary.events_processed.saturating_add(1);
                }
                Ok(None) => {
                    info!(parent: &self.span, "[{}] Event feed closed", self.agent_id);
                    summary.feed_closed = true;
                    break;
                }
                Err(_elapsed) => {
                    summary.idle_cycles = summary.idle_cycles.saturating_add(1);
                }
            }
        }

        self.running = false;
        summary.final_state = self.fsm.current_state();
        info!(parent: &self.span, "[{}] Monitoring complete", self.agent_id);
        Ok(summary)
    }

    /// Run one event-processing pass over a raw payload.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MalformedEvent`] if the payload is missing a
    /// field or holds a mistyped one. Nothing is changed in that case.
    pub async fn process_event(
        &mut self,
        payload: serde_json::Value,
    ) -> Result<PassOutcome, AgentError> {
        let event = HazardEvent::from_value(payload)?;
        info!(
            parent: &self.span,
            "[{}] Alert: {} at {} (level {})",
            self.agent_id, event.hazard_type, event.location, event.severity
        );

        let history_before = self.fsm.history().len();
        let mut goals_created = Vec::new();

        for step in PASS_STEPS {
            if self.fsm.is_in_state(step.guard()) {
                self.apply_step(step, &event, &mut goals_created).await;
            }
        }

        Ok(PassOutcome {
            event_id: event.id,
            transitions: self.fsm.history().len().saturating_sub(history_before),
            goals_created,
        })
    }

    async fn apply_step(
        &mut self,
        step: PassStep,
        event: &HazardEvent,
        goals_created: &mut Vec<GoalId>,
    ) {
        match step {
            PassStep::Detect => {
                self.fsm
                    .handle_event(triggers::EVENT_DETECTED, &TransitionContext::Event(event));
            }
            PassStep::PlanAssessment => {
                let id = self.plan(GoalType::AssessDamage, event);
                goals_created.push(id);
                info!(parent: &self.span, "[{}] Plan: Assess damage at {}", self.agent_id, event.location);
                let context = self
                    .goals
                    .get(id)
                    .map_or(TransitionContext::Empty, TransitionContext::Goal);
                self.fsm.handle_event(triggers::ASSESS_DAMAGE, &context);
            }
            PassStep::Assess => {
                tokio::time::sleep(self.timing.assessment).await;
                if event.severity >= DAMAGE_THRESHOLD {
                    self.fsm
                        .handle_event(triggers::DAMAGE_CONFIRMED, &TransitionContext::Empty);
                    let id = self.plan(GoalType::Rescue, event);
                    goals_created.push(id);
                    info!(
                        parent: &self.span,
                        "[{}] Damage confirmed - sending rescue to {}",
                        self.agent_id, event.location
                    );
                } else {
                    self.fsm
                        .handle_event(triggers::NO_THREAT, &TransitionContext::Empty);
                    info!(
                        parent: &self.span,
                        "[{}] Situation safe - no major action needed",
                        self.agent_id
                    );
                }
            }
            PassStep::Respond => {
                tokio::time::sleep(self.timing.response).await;
                self.fsm
                    .handle_event(triggers::GOAL_COMPLETE, &TransitionContext::Empty);
            }
            PassStep::Recover => {
                tokio::time::sleep(self.timing.recovery).await;
                self.fsm
                    .handle_event(triggers::RECOVERY_DONE, &TransitionContext::Empty);
            }
        }
    }

    /// Add a goal of `goal_type` for `event`, prioritised by its severity.
    fn plan(&mut self, goal_type: GoalType, event: &HazardEvent) -> GoalId {
        let goal = Goal::new(goal_type, event.location.clone(), event.severity)
            .with_event_id(event.id.clone());
        self.goals.add_goal(goal)
    }
}

/// Register one enter callback per state that logs the state change.
fn register_enter_logs(fsm: &mut StateMachine, agent_id: &str, span: &Span) {
    for (state, message) in ENTER_MESSAGES {
        let agent_id = agent_id.to_owned();
        let span = span.clone();
        fsm.on_enter(
            state,
            Box::new(move |_context| {
                info!(parent: &span, "[{agent_id}] {message}");
            }),
        );
    }
}
