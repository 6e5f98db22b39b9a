//! Call-site policy for convergence outcomes
//!
//! The engine only reports what happened. This module decides what a
//! create/update handler does with it:
//!
//! - Converged → the operation is complete
//! - Failed → hard error, nothing is persisted
//! - TimedOut → persist the last observed state and warn the user to re-run
//!
//! Rendering a [`Warning`] into host diagnostics is left to the host
//! integration.

use crate::convergence::ConvergenceOutcome;
use crate::convergence::registrar::Awaited;
use crate::error::Error;

/// A non-fatal message to surface to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub summary: String,
    pub detail: String,
}

/// What a lifecycle handler should do after a convergence wait
#[derive(Debug)]
pub enum Resolution<T> {
    /// The remote operation finished; store this state
    Complete(Option<T>),
    /// Still in progress; store `state` so the next run resumes, and warn
    Partial {
        state: Option<T>,
        warning: Warning,
    },
    /// Permanent failure; surface as an error
    Rejected(Error),
}

impl<T> Resolution<T> {
    /// Apply the standard policy to a finished wait
    ///
    /// # Parameters
    ///
    /// - `awaited`: The finished wait
    /// - `subject`: What was being waited on (e.g. "domain registration for example.com")
    pub fn from_awaited(awaited: Awaited<T>, subject: &str) -> Self {
        let Awaited { report, last_observed } = awaited;

        match report.outcome {
            ConvergenceOutcome::Converged => Self::Complete(last_observed),
            ConvergenceOutcome::Failed(err) => Self::Rejected(err),
            ConvergenceOutcome::TimedOut(err) => Self::Partial {
                state: last_observed,
                warning: Warning {
                    summary: format!("{subject} has not completed yet"),
                    detail: format!(
                        "{err}. The operation is still being processed after {} attempt(s); \
                         the current state has been saved. Run the operation again later to \
                         resume waiting.",
                        report.attempts
                    ),
                },
            },
        }
    }

    /// Whether state should be written back
    pub fn should_persist(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    /// The warning to surface, if any
    pub fn warning(&self) -> Option<&Warning> {
        match self {
            Self::Partial { warning, .. } => Some(warning),
            _ => None,
        }
    }

    /// Convert into a `Result`, keeping the state of complete and partial runs
    pub fn into_result(self) -> Result<Option<T>, Error> {
        match self {
            Self::Complete(state) | Self::Partial { state, .. } => Ok(state),
            Self::Rejected(err) => Err(err),
        }
    }
}
