//! Report task lifecycle state machine.
//!
//! A task is created for one report request, checked, generated, then
//! delivered. Failures after checking move it to `Failed`; a task that was
//! never validated cannot fail, it is simply rejected.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportState {
    Requested,
    Validated,
    Generated,
    Delivered,
    Failed,
}

impl ReportState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }
}

/// Check whether a state transition is valid per the lifecycle graph.
pub fn is_valid_transition(from: ReportState, to: ReportState) -> bool {
    matches!(
        (from, to),
        (ReportState::Requested, ReportState::Validated)
            | (ReportState::Validated, ReportState::Generated)
            | (ReportState::Generated, ReportState::Delivered)
            | (ReportState::Validated, ReportState::Failed)
            | (ReportState::Generated, ReportState::Failed)
    )
}

/// One state change, kept for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub from: ReportState,
    pub to: ReportState,
    pub at: DateTime<Utc>,
}

/// Tracks the state of a single report request.
#[derive(Debug, Clone, Serialize)]
pub struct ReportTask {
    pub file_name: String,
    state: ReportState,
    history: Vec<Transition>,
}

impl ReportTask {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            state: ReportState::Requested,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> ReportState {
        self.state
    }

    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    pub fn advance(&mut self, to: ReportState) -> Result<(), AppError> {
        if !is_valid_transition(self.state, to) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot transition report {} from {:?} to {to:?}",
                self.file_name, self.state
            )));
        }
        tracing::debug!(file = %self.file_name, from = ?self.state, to = ?to, "Report state changed");
        self.history.push(Transition {
            from: self.state,
            to,
            at: Utc::now(),
        });
        self.state = to;
        Ok(())
    }
}
