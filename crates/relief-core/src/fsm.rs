//! Finite state machine driving an agent's operational phase.
//!
//! The machine is table-driven: a transition exists only if a row for
//! `(current state, trigger)` was registered with
//! [`StateMachine::add_transition`]. Any other trigger is a no-op and
//! [`StateMachine::handle_event`] reports it by returning `false`.
//!
//! Each state has at most one enter callback and one exit callback.
//! Registering again for the same state replaces the previous callback.
//!
//! The disaster-response table built by [`build_response_fsm`]:
//!
//! ```text
//! Idle       --event_detected-->   Monitoring
//! Monitoring --assess_damage-->    Assessing
//! Assessing  --damage_confirmed--> Responding
//! Assessing  --no_threat-->        Idle
//! Responding --goal_complete-->    Recovering
//! Recovering --recovery_done-->    Idle
//! ```

use std::collections::BTreeMap;
use std::fmt;

use relief_types::{HazardEvent, ResponseState};
use tracing::trace;

use crate::goals::Goal;

/// Trigger names understood by the disaster-response table.
pub mod triggers {
    /// An alert arrived while idle.
    pub const EVENT_DETECTED: &str = "event_detected";
    /// An assessment goal was planned.
    pub const ASSESS_DAMAGE: &str = "assess_damage";
    /// The assessment found damage worth responding to.
    pub const DAMAGE_CONFIRMED: &str = "damage_confirmed";
    /// The assessment found nothing worth responding to.
    pub const NO_THREAT: &str = "no_threat";
    /// The response team finished its work.
    pub const GOAL_COMPLETE: &str = "goal_complete";
    /// The area has recovered.
    pub const RECOVERY_DONE: &str = "recovery_done";
}

/// Data handed to enter and exit callbacks alongside a transition.
#[derive(Debug, Clone, Copy, Default)]
pub enum TransitionContext<'a> {
    /// The transition carries no extra data.
    #[default]
    Empty,
    /// The hazard event that triggered the transition.
    Event(&'a HazardEvent),
    /// The goal planned by the step that fired the transition.
    Goal(&'a Goal),
}

/// Callback fired when a state is entered or exited.
pub type StateCallback = Box<dyn FnMut(&TransitionContext<'_>) + Send>;

/// Table-driven state machine over [`ResponseState`].
pub struct StateMachine {
    /// The state the machine is in right now.
    current_state: ResponseState,

    /// Every state visited, starting with the initial state.
    history: Vec<ResponseState>,

    /// `from -> trigger -> to`.
    transitions: BTreeMap<ResponseState, BTreeMap<String, ResponseState>>,

    /// Enter callback per state (single slot).
    on_enter: BTreeMap<ResponseState, StateCallback>,

    /// Exit callback per state (single slot).
    on_exit: BTreeMap<ResponseState, StateCallback>,
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current_state", &self.current_state)
            .field("history", &self.history)
            .field("transitions", &self.transitions)
            .field("on_enter", &self.on_enter.keys().collect::<Vec<_>>())
            .field("on_exit", &self.on_exit.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StateMachine {
    /// Create a machine in `initial_state` with an empty transition table.
    pub fn new(initial_state: ResponseState) -> Self {
        Self {
            current_state: initial_state,
            history: vec![initial_state],
            transitions: BTreeMap::new(),
            on_enter: BTreeMap::new(),
            on_exit: BTreeMap::new(),
        }
    }

    /// Define `from --trigger--> to`, replacing any existing row for
    /// `(from, trigger)`.
    pub fn add_transition(
        &mut self,
        from: ResponseState,
        trigger: impl Into<String>,
        to: ResponseState,
    ) {
        self.transitions
            .entry(from)
            .or_default()
            .insert(trigger.into(), to);
    }

    /// Set the callback fired on entering `state`. Replaces any earlier one.
    pub fn on_enter(&mut self, state: ResponseState, callback: StateCallback) {
        self.on_enter.insert(state, callback);
    }

    /// Set the callback fired on exiting `state`. Replaces any earlier one.
    pub fn on_exit(&mut self, state: ResponseState, callback: StateCallback) {
        self.on_exit.insert(state, callback);
    }

    /// Apply `trigger` to the current state.
    ///
    /// Returns `false` without side effects when the table has no row for
    /// `(current state, trigger)`. Otherwise runs the exit callback of the
    /// current state, moves to the target, records it in the history, runs
    /// the enter callback of the target, and returns `true`.
    pub fn handle_event(&mut self, trigger: &str, context: &TransitionContext<'_>) -> bool {
        let Some(next) = self
            .transitions
            .get(&self.current_state)
            .and_then(|row| row.get(trigger))
            .copied()
        else {
            trace!(state = %self.current_state, trigger, "no transition");
            return false;
        };

        let previous = self.current_state;
        if let Some(callback) = self.on_exit.get_mut(&previous) {
            callback(context);
        }

        self.current_state = next;
        self.history.push(next);

        if let Some(callback) = self.on_enter.get_mut(&next) {
            callback(context);
        }

        trace!(from = %previous, to = %next, trigger, "transition");
        true
    }

    /// Whether the machine is currently in `state`.
    pub fn is_in_state(&self, state: ResponseState) -> bool {
        self.current_state == state
    }

    /// The current state.
    pub const fn current_state(&self) -> ResponseState {
        self.current_state
    }

    /// Every state visited so far, oldest first.
    pub fn history(&self) -> &[ResponseState] {
        &self.history
    }

    /// Triggers with a row for `state`, in sorted order.
    pub fn triggers_from(&self, state: ResponseState) -> Vec<&str> {
        self.transitions
            .get(&state)
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Build the disaster-response machine, starting in [`ResponseState::Idle`].
pub fn build_response_fsm() -> StateMachine {
    use ResponseState::{Assessing, Idle, Monitoring, Recovering, Responding};

    let mut fsm = StateMachine::new(Idle);
    fsm.add_transition(Idle, triggers::EVENT_DETECTED, Monitoring);
    fsm.add_transition(Monitoring, triggers::ASSESS_DAMAGE, Assessing);
    fsm.add_transition(Assessing, triggers::DAMAGE_CONFIRMED, Responding);
    fsm.add_transition(Assessing, triggers::NO_THREAT, Idle);
    fsm.add_transition(Responding, triggers::GOAL_COMPLETE, Recovering);
    fsm.add_transition(Recovering, triggers::RECOVERY_DONE, Idle);
    fsm
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use relief_types::ResponseState::{Assessing, Idle, Monitoring, Recovering, Responding};

    use super::*;

    const ALL_TRIGGERS: [&str; 6] = [
        triggers::EVENT_DETECTED,
        triggers::ASSESS_DAMAGE,
        triggers::DAMAGE_CONFIRMED,
        triggers::NO_THREAT,
        triggers::GOAL_COMPLETE,
        triggers::RECOVERY_DONE,
    ];

    const TABLE: [(ResponseState, &str, ResponseState); 6] = [
        (Idle, triggers::EVENT_DETECTED, Monitoring),
        (Monitoring, triggers::ASSESS_DAMAGE, Assessing),
        (Assessing, triggers::DAMAGE_CONFIRMED, Responding),
        (Assessing, triggers::NO_THREAT, Idle),
        (Responding, triggers::GOAL_COMPLETE, Recovering),
        (Recovering, triggers::RECOVERY_DONE, Idle),
    ];

    /// Build the response machine and force it into `state`.
    fn fsm_in(state: ResponseState) -> StateMachine {
        let mut fsm = build_response_fsm();
        fsm.current_state = state;
        fsm
    }

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> StateCallback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |label: &str| -> StateCallback {
            let sink = Arc::clone(&sink);
            let label = label.to_owned();
            Box::new(move |_ctx| sink.lock().unwrap().push(label.clone()))
        };
        (log, make)
    }

    #[test]
    fn starts_idle_with_initial_history() {
        let fsm = build_response_fsm();
        assert_eq!(fsm.current_state(), Idle);
        assert!(fsm.is_in_state(Idle));
        assert_eq!(fsm.history(), &[Idle]);
    }

    #[test]
    fn every_table_row_transitions_to_its_target() {
        for (from, trigger, to) in TABLE {
            let mut fsm = fsm_in(from);
            assert!(fsm.handle_event(trigger, &TransitionContext::Empty));
            assert_eq!(fsm.current_state(), to, "{from} --{trigger}-->");
        }
    }

    #[test]
    fn every_other_pair_is_a_no_op() {
        for state in ResponseState::ALL {
            for trigger in ALL_TRIGGERS.iter().copied().chain(["unknown", ""]) {
                if TABLE.iter().any(|&(f, t, _)| f == state && t == trigger) {
                    continue;
                }
                let mut fsm = fsm_in(state);
                let history_len = fsm.history().len();
                assert!(!fsm.handle_event(trigger, &TransitionContext::Empty));
                assert_eq!(fsm.current_state(), state);
                assert_eq!(fsm.history().len(), history_len);
            }
        }
    }

    #[test]
    fn full_cycle_records_history() {
        let mut fsm = build_response_fsm();
        let steps = [
            (triggers::EVENT_DETECTED, Monitoring),
            (triggers::ASSESS_DAMAGE, Assessing),
            (triggers::DAMAGE_CONFIRMED, Responding),
            (triggers::GOAL_COMPLETE, Recovering),
            (triggers::RECOVERY_DONE, Idle),
        ];
        for (trigger, expected) in steps {
            assert!(fsm.handle_event(trigger, &TransitionContext::Empty));
            assert_eq!(fsm.current_state(), expected);
        }
        assert_eq!(
            fsm.history(),
            &[Idle, Monitoring, Assessing, Responding, Recovering, Idle]
        );
    }

    #[test]
    fn exit_fires_before_enter() {
        let (log, make) = recorder();
        let mut fsm = build_response_fsm();
        fsm.on_exit(Idle, make("exit idle"));
        fsm.on_enter(Monitoring, make("enter monitoring"));

        assert!(fsm.handle_event(triggers::EVENT_DETECTED, &TransitionContext::Empty));
        assert_eq!(*log.lock().unwrap(), vec!["exit idle", "enter monitoring"]);
    }

    #[test]
    fn failed_transition_fires_no_callbacks() {
        let (log, make) = recorder();
        let mut fsm = build_response_fsm();
        fsm.on_exit(Idle, make("exit idle"));

        assert!(!fsm.handle_event(triggers::RECOVERY_DONE, &TransitionContext::Empty));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn last_registration_wins() {
        let (log, make) = recorder();
        let mut fsm = build_response_fsm();
        fsm.on_enter(Monitoring, make("first"));
        fsm.on_enter(Monitoring, make("second"));

        assert!(fsm.handle_event(triggers::EVENT_DETECTED, &TransitionContext::Empty));
        assert_eq!(*log.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn callbacks_receive_context() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let mut fsm = build_response_fsm();
        fsm.on_enter(
            Monitoring,
            Box::new(move |ctx| {
                if let TransitionContext::Event(event) = ctx {
                    *sink.lock().unwrap() = Some(event.id.clone());
                }
            }),
        );

        let event = HazardEvent::new(relief_types::HazardType::Flood, 3, "Teshie", 0.0);
        assert!(fsm.handle_event(triggers::EVENT_DETECTED, &TransitionContext::Event(&event)));
        assert_eq!(seen.lock().unwrap().as_deref(), Some(event.id.as_str()));
    }

    #[test]
    fn re_adding_a_row_overwrites_its_target() {
        let mut fsm = build_response_fsm();
        fsm.add_transition(Idle, triggers::EVENT_DETECTED, Assessing);
        assert!(fsm.handle_event(triggers::EVENT_DETECTED, &TransitionContext::Empty));
        assert_eq!(fsm.current_state(), Assessing);
    }

    #[test]
    fn lists_triggers_per_state() {
        let fsm = build_response_fsm();
        assert_eq!(
            fsm.triggers_from(Assessing),
            vec![triggers::DAMAGE_CONFIRMED, triggers::NO_THREAT]
        );
        assert_eq!(fsm.triggers_from(Idle), vec![triggers::EVENT_DETECTED]);
    }
}
