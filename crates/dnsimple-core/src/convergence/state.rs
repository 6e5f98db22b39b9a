//! Remote state taxonomies
//!
//! Every registrar state string is classified here, once, into a
//! [`StatePhase`]. Call sites never compare state strings themselves.
//!
//! | Domain registration | Registrant change | Phase        |
//! |---------------------|-------------------|--------------|
//! | `registered`        | `completed`       | Succeeded    |
//! | `new`, `pending`    | `new`, `pending`  | InProgress   |
//! | `failed`            |                   | Failed       |
//! | `cancelling`        | `cancelling`      | Failed       |
//! | `cancelled`         | `cancelled`       | Failed       |
//! | anything else       | anything else     | InProgress   |

use std::fmt;

use super::PollStatus;
use crate::error::Error;

/// Where a remote operation stands relative to convergence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatePhase {
    Succeeded,
    InProgress,
    Failed,
}

/// A classified remote state
pub trait RemoteState: fmt::Display {
    /// Classify the state
    fn phase(&self) -> StatePhase;

    /// The state as the API spells it
    fn as_str(&self) -> &str;
}

/// Translate an observed state into a poll result
///
/// # Parameters
///
/// - `resource`: Human-readable name of what is being polled, used in errors
/// - `state`: The observed state
pub fn poll_status_for<S: RemoteState>(resource: &str, state: &S) -> PollStatus {
    match state.phase() {
        StatePhase::Succeeded => PollStatus::Done,
        StatePhase::InProgress => PollStatus::Retry(Error::not_converged(resource, state.as_str())),
        StatePhase::Failed => PollStatus::Halt(Error::terminal_state(resource, state.as_str())),
    }
}

/// Domain registration states
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainRegistrationState {
    New,
    Pending,
    Registered,
    Cancelling,
    Cancelled,
    Failed,
    /// A state this crate does not know about; treated as still in progress
    Unknown(String),
}

impl From<&str> for DomainRegistrationState {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "new" => Self::New,
            "pending" => Self::Pending,
            "registered" => Self::Registered,
            "cancelling" => Self::Cancelling,
            "cancelled" => Self::Cancelled,
            "failed" => Self::Failed,
            _ => Self::Unknown(value.to_string()),
        }
    }
}

impl RemoteState for DomainRegistrationState {
    fn phase(&self) -> StatePhase {
        match self {
            Self::Registered => StatePhase::Succeeded,
            Self::Failed | Self::Cancelling | Self::Cancelled => StatePhase::Failed,
            Self::New | Self::Pending | Self::Unknown(_) => StatePhase::InProgress,
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Pending => "pending",
            Self::Registered => "registered",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for DomainRegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registrant change states
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistrantChangeState {
    New,
    Pending,
    Completed,
    Cancelling,
    Cancelled,
    /// A state this crate does not know about; treated as still in progress
    Unknown(String),
}

impl From<&str> for RegistrantChangeState {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "new" => Self::New,
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "cancelling" => Self::Cancelling,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown(value.to_string()),
        }
    }
}

impl RemoteState for RegistrantChangeState {
    fn phase(&self) -> StatePhase {
        match self {
            Self::Completed => StatePhase::Succeeded,
            Self::Cancelling | Self::Cancelled => StatePhase::Failed,
            Self::New | Self::Pending | Self::Unknown(_) => StatePhase::InProgress,
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for RegistrantChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
