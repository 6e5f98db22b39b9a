//! Registrar waiters
//!
//! Glue between [`RegistrarApi`] and the [`ConvergenceEngine`]: one probe per
//! registrar operation, each remembering the last object it observed so the
//! caller can persist partial state when the wait times out.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::state::poll_status_for;
use super::{ConvergenceEngine, ConvergenceReport, PollStatus, Probe};
use crate::error::{Error, Result};
use crate::traits::{DomainRegistration, RegistrantChange, RegistrarApi};

/// Resource name used in domain registration errors and warnings
pub const DOMAIN_REGISTRATION: &str = "domain registration";

/// Resource name used in registrant change errors and warnings
pub const REGISTRANT_CHANGE: &str = "registrant change";

/// A finished wait together with the last remote snapshot
#[derive(Debug)]
pub struct Awaited<T> {
    pub report: ConvergenceReport,
    /// `None` only when no poll ever reached the API successfully
    pub last_observed: Option<T>,
}

/// Classify a transport/API error as retry or halt
fn poll_status_for_error(err: Error) -> PollStatus {
    if err.is_retryable() {
        PollStatus::Retry(err)
    } else {
        PollStatus::Halt(err)
    }
}

/// Polls one domain registration
pub struct DomainRegistrationProbe<'a> {
    api: &'a dyn RegistrarApi,
    account: &'a str,
    domain: &'a str,
    registration_id: u64,
    last_observed: Option<DomainRegistration>,
}

impl<'a> DomainRegistrationProbe<'a> {
    pub fn new(api: &'a dyn RegistrarApi, account: &'a str, domain: &'a str, registration_id: u64) -> Self {
        Self {
            api,
            account,
            domain,
            registration_id,
            last_observed: None,
        }
    }

    /// The most recent successful observation
    pub fn last_observed(&self) -> Option<&DomainRegistration> {
        self.last_observed.as_ref()
    }

    pub fn into_last_observed(self) -> Option<DomainRegistration> {
        self.last_observed
    }
}

#[async_trait]
impl Probe for DomainRegistrationProbe<'_> {
    async fn poll(&mut self) -> PollStatus {
        match self
            .api
            .get_domain_registration(self.account, self.domain, self.registration_id)
            .await
        {
            Ok(registration) => {
                let state = registration.registration_state();
                debug!(
                    api = self.api.api_name(),
                    domain = self.domain,
                    registration_id = self.registration_id,
                    state = %state,
                    "Polled domain registration"
                );
                let status = poll_status_for(DOMAIN_REGISTRATION, &state);
                self.last_observed = Some(registration);
                status
            }
            Err(err) => poll_status_for_error(err),
        }
    }
}

/// Polls one registrant change
pub struct RegistrantChangeProbe<'a> {
    api: &'a dyn RegistrarApi,
    account: &'a str,
    change_id: u64,
    last_observed: Option<RegistrantChange>,
}

impl<'a> RegistrantChangeProbe<'a> {
    pub fn new(api: &'a dyn RegistrarApi, account: &'a str, change_id: u64) -> Self {
        Self {
            api,
            account,
            change_id,
            last_observed: None,
        }
    }

    /// The most recent successful observation
    pub fn last_observed(&self) -> Option<&RegistrantChange> {
        self.last_observed.as_ref()
    }

    pub fn into_last_observed(self) -> Option<RegistrantChange> {
        self.last_observed
    }
}

#[async_trait]
impl Probe for RegistrantChangeProbe<'_> {
    async fn poll(&mut self) -> PollStatus {
        match self.api.get_registrant_change(self.account, self.change_id).await {
            Ok(change) => {
                let state = change.change_state();
                debug!(
                    api = self.api.api_name(),
                    change_id = self.change_id,
                    state = %state,
                    "Polled registrant change"
                );
                let status = poll_status_for(REGISTRANT_CHANGE, &state);
                self.last_observed = Some(change);
                status
            }
            Err(err) => poll_status_for_error(err),
        }
    }
}

/// Wait for a domain registration to reach `registered`
///
/// Stops early on `failed`, `cancelling` or `cancelled`.
pub async fn await_domain_registration(
    engine: &ConvergenceEngine,
    api: &dyn RegistrarApi,
    account: &str,
    domain: &str,
    registration_id: u64,
    cancel: &CancellationToken,
) -> Result<Awaited<DomainRegistration>> {
    let mut probe = DomainRegistrationProbe::new(api, account, domain, registration_id);
    let report = engine.converge(&mut probe, cancel).await?;
    Ok(Awaited {
        report,
        last_observed: probe.into_last_observed(),
    })
}

/// Wait for a registrant change to reach `completed`
///
/// Stops early on `cancelling` or `cancelled`.
pub async fn await_registrant_change(
    engine: &ConvergenceEngine,
    api: &dyn RegistrarApi,
    account: &str,
    change_id: u64,
    cancel: &CancellationToken,
) -> Result<Awaited<RegistrantChange>> {
    let mut probe = RegistrantChangeProbe::new(api, account, change_id);
    let report = engine.converge(&mut probe, cancel).await?;
    Ok(Awaited {
        report,
        last_observed: probe.into_last_observed(),
    })
}
