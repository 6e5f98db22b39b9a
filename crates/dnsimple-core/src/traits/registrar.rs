// # Registrar API Trait
//
// Defines the read side of the DNSimple registrar that convergence polls.
//
// ## Implementations
//
// - DNSimple API v2: `dnsimple-client` crate
// - Test doubles: scripted state sequences (see `tests/common`)
//
// ## Usage
//
// ```rust,ignore
// use dnsimple_core::RegistrarApi;
//
// #[tokio::main]
// async fn main() -> dnsimple_core::Result<()> {
//     let api = /* RegistrarApi implementation */;
//
//     let registration = api
//         .get_domain_registration("1010", "example.com", 361)
//         .await?;
//     println!("registration state: {}", registration.state);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::convergence::state::{DomainRegistrationState, RegistrantChangeState};

/// A domain registration order as reported by the registrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRegistration {
    /// Registration ID
    pub id: u64,
    /// ID of the domain being registered
    pub domain_id: u64,
    /// Contact used as registrant
    pub registrant_id: u64,
    /// Registration period in years
    pub period: u32,
    /// Raw state string ("new", "pending", "registered", ...)
    pub state: String,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub whois_privacy: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DomainRegistration {
    /// Parsed registration state
    pub fn registration_state(&self) -> DomainRegistrationState {
        DomainRegistrationState::from(self.state.as_str())
    }
}

/// A registrant change order as reported by the registrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrantChange {
    /// Registrant change ID
    pub id: u64,
    pub account_id: u64,
    pub domain_id: u64,
    /// Contact that becomes the new registrant
    pub contact_id: u64,
    /// Raw state string ("new", "pending", "completed", ...)
    pub state: String,
    /// Whether the registry treats this as an owner change
    #[serde(default)]
    pub registry_owner_change: bool,
    /// Who lifted the inter-registrar transfer lock, if anyone
    pub irt_lock_lifted_by: Option<String>,
    /// TLD-specific attributes submitted with the change
    #[serde(default)]
    pub extended_attributes: HashMap<String, String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RegistrantChange {
    /// Parsed registrant change state
    pub fn change_state(&self) -> RegistrantChangeState {
        RegistrantChangeState::from(self.state.as_str())
    }
}

/// Trait for registrar polling implementations
///
/// Each call performs exactly one remote query. Implementations must not
/// retry or sleep: the convergence engine owns the polling cadence.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait RegistrarApi: Send + Sync {
    /// Fetch the current state of a domain registration
    ///
    /// # Parameters
    ///
    /// - `account`: Account identifier
    /// - `domain`: Domain name or ID being registered
    /// - `registration_id`: ID returned when the registration was created
    ///
    /// # Returns
    ///
    /// - `Ok(DomainRegistration)`: Current snapshot of the order
    /// - `Err(Error)`: Transport or API failure
    async fn get_domain_registration(
        &self,
        account: &str,
        domain: &str,
        registration_id: u64,
    ) -> Result<DomainRegistration, crate::Error>;

    /// Fetch the current state of a registrant change
    ///
    /// # Parameters
    ///
    /// - `account`: Account identifier
    /// - `change_id`: ID returned when the registrant change was created
    ///
    /// # Returns
    ///
    /// - `Ok(RegistrantChange)`: Current snapshot of the order
    /// - `Err(Error)`: Transport or API failure
    async fn get_registrant_change(
        &self,
        account: &str,
        change_id: u64,
    ) -> Result<RegistrantChange, crate::Error>;

    /// Get the implementation name (for logging/debugging)
    fn api_name(&self) -> &'static str;
}
