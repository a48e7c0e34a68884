//! Current-operation status
//!
//! One slot, overwritten on every transition. No history is kept.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum OperationStatus {
    #[default]
    Idle,
    Running,
    Success(String),
    Failure(String),
}

impl OperationStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, OperationStatus::Running)
    }

    /// Text to show next to the form, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            OperationStatus::Success(msg) | OperationStatus::Failure(msg) => Some(msg),
            OperationStatus::Idle | OperationStatus::Running => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusReporter {
    current: OperationStatus,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &OperationStatus {
        &self.current
    }

    /// Back to neutral, e.g. when the selection changes
    pub fn reset(&mut self) {
        self.current = OperationStatus::Idle;
    }

    pub fn begin(&mut self) {
        self.current = OperationStatus::Running;
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.current = OperationStatus::Success(message.into());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.current = OperationStatus::Failure(message.into());
    }
}
