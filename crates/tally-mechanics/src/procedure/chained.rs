//! Chained checks: an ordered list of independent steps.
//!
//! Each step is resolved through the normal single-check pipeline by the
//! caller. The chain only tracks where the procedure stands. It never
//! touches a step's pool or DC; escalating difficulty between attempts is
//! the configuring subsystem's business.

use serde::{Deserialize, Serialize};

use super::ProcedureStatus;
use crate::error::{MechError, MechResult};
use crate::resolution::CheckResult;

/// What happens when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The first failure ends the chain.
    #[default]
    NoRetry,
    /// Up to this many retries after the first attempt.
    Limited(u32),
    /// Retry as often as the caller likes.
    Unlimited,
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `failures` failed attempts.
    fn allows_retry(self, failures: u32) -> bool {
        match self {
            Self::NoRetry => false,
            Self::Limited(retries) => failures <= retries,
            Self::Unlimited => true,
        }
    }
}

/// One step in a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStep {
    /// Name of the step, e.g. "disarm the tripwire".
    pub label: String,
    /// Retry policy for this step.
    pub retry: RetryPolicy,
}

impl ChainStep {
    /// Create a step.
    pub fn new(label: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            label: label.into(),
            retry,
        }
    }
}

/// Where a chain stands after its latest step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChainedStatus {
    /// No step has been attempted.
    #[default]
    NotStarted,
    /// The last attempt succeeded and more steps remain.
    InProgress,
    /// The last attempt failed and the step may be tried again.
    AwaitingRetry,
    /// Every step succeeded.
    Succeeded,
    /// A step failed with no retries left.
    Failed,
}

impl ChainedStatus {
    /// Returns true if no further steps may be recorded.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for ChainedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "Not Started"),
            Self::InProgress => write!(f, "In Progress"),
            Self::AwaitingRetry => write!(f, "Awaiting Retry"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// State of one chained procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainedCheck {
    steps: Vec<ChainStep>,
    current: usize,
    failures_on_current: u32,
    status: ChainedStatus,
}

impl ChainedCheck {
    /// Create a chain over `steps`, which must not be empty.
    pub fn new(steps: Vec<ChainStep>) -> MechResult<Self> {
        if steps.is_empty() {
            return Err(MechError::InvalidConfig(
                "chained check needs at least one step".to_string(),
            ));
        }
        Ok(Self {
            steps,
            current: 0,
            failures_on_current: 0,
            status: ChainedStatus::NotStarted,
        })
    }

    /// Current status.
    pub fn status(&self) -> ChainedStatus {
        self.status
    }

    /// The step awaiting an attempt, or `None` once the chain succeeded.
    pub fn current_step(&self) -> Option<&ChainStep> {
        self.steps.get(self.current)
    }

    /// Zero-based index of the current step.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// All steps in order.
    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Failed attempts on the current step so far.
    pub fn failures_on_current(&self) -> u32 {
        self.failures_on_current
    }

    /// Apply the result of an attempt at the current step.
    ///
    /// A fumble on a no-retry step fails the chain at once. On a retryable
    /// step a fumble is an ordinary failed attempt.
    pub fn record(&mut self, result: &CheckResult) -> MechResult<ChainedStatus> {
        if self.status.is_terminal() {
            tracing::warn!(status = %self.status, "chained check already finished");
            return Err(MechError::TerminalProcedure(ProcedureStatus::Chained(
                self.status,
            )));
        }
        let retry = self
            .steps
            .get(self.current)
            .map(|step| step.retry)
            .ok_or(MechError::TerminalProcedure(ProcedureStatus::Chained(
                self.status,
            )))?;
        let previous = self.status;

        self.status = if result.is_success() {
            self.current += 1;
            self.failures_on_current = 0;
            if self.current == self.steps.len() {
                ChainedStatus::Succeeded
            } else {
                ChainedStatus::InProgress
            }
        } else {
            self.failures_on_current += 1;
            if result.is_fumble && retry == RetryPolicy::NoRetry {
                ChainedStatus::Failed
            } else if retry.allows_retry(self.failures_on_current) {
                ChainedStatus::AwaitingRetry
            } else {
                ChainedStatus::Failed
            }
        };

        tracing::debug!(
            from = %previous,
            to = %self.status,
            step = self.current,
            steps = self.steps.len(),
            failures = self.failures_on_current,
            "chained check advanced"
        );
        Ok(self.status)
    }
}
