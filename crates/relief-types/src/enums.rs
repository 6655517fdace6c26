//! Enumeration types for the Relief simulation.
//!
//! Every enum serializes with lowercase `snake_case` names; the same names
//! are used by the [`Display`](core::fmt::Display) impls so log lines and
//! JSON payloads agree.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Hazards
// ---------------------------------------------------------------------------

/// Category of a simulated disaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    /// Ground shaking from seismic activity.
    Earthquake,
    /// Rising water overflowing onto normally dry land.
    Flood,
    /// Uncontrolled burning of structures or vegetation.
    Fire,
    /// Crowd crush in a dense gathering.
    Stampede,
    /// Damaging wind or storm gusts.
    Wind,
    /// Mass movement of rock or earth down a slope.
    Landslide,
}

impl HazardType {
    /// Every hazard category, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Earthquake,
        Self::Flood,
        Self::Fire,
        Self::Stampede,
        Self::Wind,
        Self::Landslide,
    ];

    /// Lowercase wire name of this hazard.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Earthquake => "earthquake",
            Self::Flood => "flood",
            Self::Fire => "fire",
            Self::Stampede => "stampede",
            Self::Wind => "wind",
            Self::Landslide => "landslide",
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Agent operational states
// ---------------------------------------------------------------------------

/// Operational phase of a response agent.
///
/// The cycle is `Idle -> Monitoring -> Assessing -> (Responding ->
/// Recovering ->) Idle`. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseState {
    /// Waiting for alerts.
    Idle,
    /// An alert arrived and its details are being checked.
    Monitoring,
    /// Damage at the alert location is being assessed.
    Assessing,
    /// A response team has been dispatched.
    Responding,
    /// The affected area is recovering.
    Recovering,
}

impl ResponseState {
    /// Every response state, in cycle order.
    pub const ALL: [Self; 5] = [
        Self::Idle,
        Self::Monitoring,
        Self::Assessing,
        Self::Responding,
        Self::Recovering,
    ];

    /// Lowercase name of this state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Monitoring => "monitoring",
            Self::Assessing => "assessing",
            Self::Responding => "responding",
            Self::Recovering => "recovering",
        }
    }
}

impl fmt::Display for ResponseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

/// Category of action an agent intends to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Survey the damage at a location.
    AssessDamage,
    /// Move people out of harm's way.
    Evacuate,
    /// Send a team to rescue people in danger.
    Rescue,
    /// Stop the hazard from spreading.
    Contain,
    /// Restore the area after the hazard has passed.
    Recover,
}

impl GoalType {
    /// Lowercase wire name of this goal type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssessDamage => "assess_damage",
            Self::Evacuate => "evacuate",
            Self::Rescue => "rescue",
            Self::Contain => "contain",
            Self::Recover => "recover",
        }
    }

    /// Human-readable label, e.g. `"Assess Damage"`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::AssessDamage => "Assess Damage",
            Self::Evacuate => "Evacuate",
            Self::Rescue => "Rescue",
            Self::Contain => "Contain",
            Self::Recover => "Recover",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a goal.
///
/// In practice a goal moves `Pending -> Active -> Completed | Failed`, but the
/// status is plain data and nothing forbids other assignments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Created but not yet being pursued.
    #[default]
    Pending,
    /// Currently being pursued.
    Active,
    /// Finished successfully.
    Completed,
    /// Abandoned or unsuccessful.
    Failed,
}

impl GoalStatus {
    /// Whether this status ends the goal's lifecycle.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Lowercase wire name of this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hazard_wire_names_match_display() {
        for hazard in HazardType::ALL {
            let json = serde_json::to_string(&hazard).unwrap();
            assert_eq!(json, format!("\"{hazard}\""));
        }
    }

    #[test]
    fn goal_type_serializes_snake_case() {
        let json = serde_json::to_string(&GoalType::AssessDamage).unwrap();
        assert_eq!(json, "\"assess_damage\"");
        assert_eq!(GoalType::AssessDamage.label(), "Assess Damage");
    }

    #[test]
    fn goal_status_defaults_to_pending() {
        assert_eq!(GoalStatus::default(), GoalStatus::Pending);
        assert!(!GoalStatus::Active.is_terminal());
        assert!(GoalStatus::Completed.is_terminal());
        assert!(GoalStatus::Failed.is_terminal());
    }

    #[test]
    fn response_state_display() {
        assert_eq!(ResponseState::Recovering.to_string(), "recovering");
        assert_eq!(ResponseState::ALL.len(), 5);
    }
}
