//! Goals and the goal manager.
//!
//! A [`Goal`] is a unit of intended action created in response to a hazard.
//! The [`GoalSet`] keeps every goal ever added, in creation order; goals are
//! never removed, only their status changes.
//!
//! Membership is by identity. Each goal carries a [`GoalId`] minted when it
//! is constructed, and the managed mutators only touch goals whose id is in
//! the set. Asking to mark an untracked goal leaves the set untouched and
//! reports [`GoalError::NotTracked`], which callers are free to ignore.

use std::fmt;

use relief_types::{GoalId, GoalStatus, GoalType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors reported by [`GoalSet`] mutators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GoalError {
    /// The goal was never added to this set.
    #[error("goal not tracked: {0}")]
    NotTracked(GoalId),
}

/// A single goal instance.
///
/// Cloning a goal keeps its id, so the clone refers to the same tracked goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Identity of this goal.
    pub id: GoalId,

    /// What kind of action this goal represents.
    pub goal_type: GoalType,

    /// Where the action takes place.
    pub location: String,

    /// Urgency, 1 (low) to 5 (critical). Not bound-checked.
    pub priority: i64,

    /// Current lifecycle status. Public; callers activate goals directly.
    pub status: GoalStatus,

    /// Id of the hazard event that prompted this goal, if any.
    pub event_id: Option<String>,
}

impl Goal {
    /// Create a pending goal with a fresh identity.
    pub fn new(goal_type: GoalType, location: impl Into<String>, priority: i64) -> Self {
        Self {
            id: GoalId::new(),
            goal_type,
            location: location.into(),
            priority,
            status: GoalStatus::Pending,
            event_id: None,
        }
    }

    /// Attach the id of the triggering event.
    #[must_use]
    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Goal(type={}, location={}, priority={}, status={})",
            self.goal_type, self.location, self.priority, self.status
        )
    }
}

/// Append-only, insertion-ordered collection of goals.
#[derive(Debug, Clone, Default)]
pub struct GoalSet {
    goals: Vec<Goal>,
}

impl GoalSet {
    /// Create an empty goal set.
    pub const fn new() -> Self {
        Self { goals: Vec::new() }
    }

    /// Append a goal and return its id.
    pub fn add_goal(&mut self, goal: Goal) -> GoalId {
        let id = goal.id;
        debug!(goal_id = %id, goal = %goal, "goal added");
        self.goals.push(goal);
        id
    }

    /// Active goals, highest priority first.
    ///
    /// Goals with equal priority keep their insertion order.
    pub fn get_active_goals(&self) -> Vec<&Goal> {
        let mut active: Vec<&Goal> = self
            .goals
            .iter()
            .filter(|goal| goal.status == GoalStatus::Active)
            .collect();
        active.sort_by(|a, b| b.priority.cmp(&a.priority));
        active
    }

    /// Mark a tracked goal as completed.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::NotTracked`] without changing anything if the
    /// goal is not in this set.
    pub fn mark_completed(&mut self, id: GoalId) -> Result<&Goal, GoalError> {
        self.set_status(id, GoalStatus::Completed)
    }

    /// Mark a tracked goal as failed.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::NotTracked`] without changing anything if the
    /// goal is not in this set.
    pub fn mark_failed(&mut self, id: GoalId) -> Result<&Goal, GoalError> {
        self.set_status(id, GoalStatus::Failed)
    }

    /// Whether a goal with this id is tracked.
    pub fn contains(&self, id: GoalId) -> bool {
        self.goals.iter().any(|goal| goal.id == id)
    }

    /// Look up a tracked goal.
    pub fn get(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Look up a tracked goal for caller-driven changes such as activation.
    pub fn get_mut(&mut self, id: GoalId) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    /// Every goal, in creation order.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Number of goals ever added.
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Whether no goal has been added yet.
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    fn set_status(&mut self, id: GoalId, status: GoalStatus) -> Result<&Goal, GoalError> {
        let goal = self.get_mut(id).ok_or(GoalError::NotTracked(id))?;
        goal.status = status;
        debug!(goal_id = %id, status = %status, "goal status changed");
        Ok(&*goal)
    }
}
