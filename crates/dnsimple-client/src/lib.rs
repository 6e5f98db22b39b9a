// # DNSimple API Client
//
// This crate implements the `dnsimple-core` remote interfaces against the
// DNSimple API v2.
//
// ## Behaviour
//
// - One HTTP request per trait call
// - Errors are classified by status code and propagated unchanged
// - HTTP timeout configured (30 seconds)
// - No retry, no backoff, no sleeping: the convergence engine owns the cadence
// - No caching: the zone record cache lives in `dnsimple-core`
//
// ## Security Requirements
//
// - API token NEVER appears in logs, errors or `Debug` output
// - Client construction fails fast if the token or account is empty
//
// ## API Reference
//
// - DNSimple API v2: https://developer.dnsimple.com/v2/
// - Get domain registration: GET `/v2/:account/registrar/domains/:domain/registrations/:id`
// - Get registrant change: GET `/v2/:account/registrar/registrant_changes/:id`
// - List zone records: GET `/v2/:account/zones/:zone/records?page=&per_page=&name=&name_like=&type=&sort=`

use async_trait::async_trait;
use dnsimple_core::config::ApiConfig;
use dnsimple_core::traits::{
    DomainRegistration, RegistrantChange, RegistrarApi, ZoneRecordListOptions, ZoneRecordPage,
    ZoneRecordSource,
};
use dnsimple_core::{Error, Result};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Production API base URL
pub const DNSIMPLE_API_BASE: &str = "https://api.dnsimple.com";

/// Sandbox API base URL
pub const DNSIMPLE_SANDBOX_API_BASE: &str = "https://api.sandbox.dnsimple.com";

/// Path segment of the API version this client speaks
const API_VERSION: &str = "v2";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent with every request
const DEFAULT_USER_AGENT: &str = concat!("dnsimple-converge/", env!("CARGO_PKG_VERSION"));

/// Single-object response envelope
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// DNSimple API v2 client
///
/// Cheap to share behind an `Arc`; the underlying `reqwest::Client` pools
/// connections.
///
/// # Security
///
/// The Debug implementation does NOT expose the API token.
pub struct DnsimpleClient {
    /// API token
    /// ⚠️ NEVER log this value
    token: String,

    /// Base URL without the version segment
    base_url: Url,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl std::fmt::Debug for DnsimpleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsimpleClient")
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl DnsimpleClient {
    /// Create a client from API configuration
    ///
    /// # Errors
    ///
    /// - `Error::Config`: empty token or account, or a malformed base URL
    /// - `Error::Http`: the HTTP client could not be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;

        let user_agent = user_agent_for(config.user_agent.as_deref());
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(&base_url_for(config))
            .map_err(|e| Error::config(format!("Invalid API base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("API base URL cannot carry a path: {base_url}")));
        }
        tracing::debug!(base_url = %base_url, "Created DNSimple client");

        Ok(Self {
            token: config.token.clone(),
            base_url,
            client,
        })
    }

    /// The base URL requests are sent to
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append the version and the given segments, percent-encoding each
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("API base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(API_VERSION)
            .extend(segments);
        Ok(url)
    }

    /// Perform one GET and decode the JSON body
    ///
    /// `what` names the resource in error messages.
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
        what: &str,
    ) -> Result<T> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        tracing::debug!(path = %path, "GET {}", what);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {}", e.without_url())))?;

        if !status.is_success() {
            tracing::debug!(path = %path, status = status.as_u16(), "API request failed");
            return Err(error_for_status(status.as_u16(), &body, what));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Select the base URL: explicit override, then sandbox, then production
fn base_url_for(config: &ApiConfig) -> String {
    let base = match (&config.base_url, config.sandbox) {
        (Some(base_url), _) => base_url.as_str(),
        (None, true) => DNSIMPLE_SANDBOX_API_BASE,
        (None, false) => DNSIMPLE_API_BASE,
    };
    base.trim_end_matches('/').to_string()
}

fn user_agent_for(custom: Option<&str>) -> String {
    match custom {
        Some(custom) if !custom.is_empty() => format!("{custom} {DEFAULT_USER_AGENT}"),
        _ => DEFAULT_USER_AGENT.to_string(),
    }
}

/// Map a non-2xx response to an error
///
/// The API's `message` field is used when the body carries one, otherwise
/// the trimmed raw body.
fn error_for_status(status: u16, body: &str, what: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions for {what} (status {status}): {message}"
        )),
        404 => Error::not_found(format!("{what}: {message}")),
        429 => Error::rate_limited(format!("Rate limit exceeded while reading {what}: {message}")),
        _ => Error::api(status, message),
    }
}

#[async_trait]
impl RegistrarApi for DnsimpleClient {
    /// Fetch one domain registration
    ///
    /// ```http
    /// GET /v2/:account/registrar/domains/:domain/registrations/:id
    /// Authorization: Bearer <token>
    /// ```
    async fn get_domain_registration(
        &self,
        account: &str,
        domain: &str,
        registration_id: u64,
    ) -> Result<DomainRegistration> {
        let id = registration_id.to_string();
        let segments = [account, "registrar", "domains", domain, "registrations", id.as_str()];
        let envelope: DataEnvelope<DomainRegistration> =
            self.get_json(&segments, &[], "domain registration").await?;
        Ok(envelope.data)
    }

    /// Fetch one registrant change
    ///
    /// ```http
    /// GET /v2/:account/registrar/registrant_changes/:id
    /// Authorization: Bearer <token>
    /// ```
    async fn get_registrant_change(&self, account: &str, change_id: u64) -> Result<RegistrantChange> {
        let id = change_id.to_string();
        let segments = [account, "registrar", "registrant_changes", id.as_str()];
        let envelope: DataEnvelope<RegistrantChange> =
            self.get_json(&segments, &[], "registrant change").await?;
        Ok(envelope.data)
    }

    fn api_name(&self) -> &'static str {
        "dnsimple"
    }
}

#[async_trait]
impl ZoneRecordSource for DnsimpleClient {
    /// Fetch one page of zone records
    ///
    /// ```http
    /// GET /v2/:account/zones/:zone/records?page=1&per_page=100
    /// Authorization: Bearer <token>
    /// ```
    async fn list_zone_records(
        &self,
        account: &str,
        zone: &str,
        options: &ZoneRecordListOptions,
    ) -> Result<ZoneRecordPage> {
        let segments = [account, "zones", zone, "records"];
        self.get_json(&segments, &options.to_query(), "zone records").await
    }
}
