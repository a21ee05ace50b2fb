//! Exploration state machine
//!
//! `Discover -> Query -> Select -> Plan -> Done`; any stage may move to
//! `Failed`, which is terminal and remembers where it happened.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Discover,
    Query,
    Select,
    Plan,
}

impl Stage {
    const fn next(self) -> Option<Self> {
        match self {
            Self::Discover => Some(Self::Query),
            Self::Query => Some(Self::Select),
            Self::Select => Some(Self::Plan),
            Self::Plan => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Query => "query",
            Self::Select => "select",
            Self::Plan => "plan",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum WorkflowState {
    Running { stage: Stage },
    Done,
    Failed { stage: Stage, message: String },
}

impl WorkflowState {
    pub const fn start() -> Self {
        Self::Running {
            stage: Stage::Discover,
        }
    }

    /// Move to the following stage; terminal states stay put
    #[must_use]
    pub fn advance(self) -> Self {
        match self {
            Self::Running { stage } => stage
                .next()
                .map_or(Self::Done, |next| Self::Running { stage: next }),
            terminal => terminal,
        }
    }

    /// Fail at the current stage; terminal states stay put
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> Self {
        match self {
            Self::Running { stage } => Self::Failed {
                stage,
                message: message.into(),
            },
            terminal => terminal,
        }
    }

    pub const fn current_stage(&self) -> Option<Stage> {
        match self {
            Self::Running { stage } | Self::Failed { stage, .. } => Some(*stage),
            Self::Done => None,
        }
    }

    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_visits_every_stage() {
        let mut state = WorkflowState::start();
        let mut visited = Vec::new();
        while let Some(stage) = state.current_stage() {
            visited.push(stage);
            state = state.advance();
        }
        assert_eq!(
            visited,
            vec![Stage::Discover, Stage::Query, Stage::Select, Stage::Plan]
        );
        assert!(state.is_done());
    }

    #[test]
    fn test_failure_records_stage() {
        let state = WorkflowState::start().advance().advance().fail("no places");
        assert_eq!(
            state,
            WorkflowState::Failed {
                stage: Stage::Select,
                message: "no places".into()
            }
        );
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let failed = WorkflowState::start().fail("boom");
        assert_eq!(failed.clone().advance(), failed);
        assert_eq!(failed.clone().fail("again"), failed);

        let done = WorkflowState::Done;
        assert_eq!(done.clone().fail("late"), WorkflowState::Done);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(WorkflowState::start().fail("x")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "failed", "stage": "discover", "message": "x"})
        );
    }
}
