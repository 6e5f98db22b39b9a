// # DNSimple Sandbox Validation Tool
//
// Exercises the client, the zone record cache and the registrar waiters
// against a real DNSimple environment. Every call is a read.
//
// ## Usage
//
// ```bash
// DNSIMPLE_TOKEN=your_token \
// DNSIMPLE_ACCOUNT=1010 \
// DNSIMPLE_ZONE=example.com \
// cargo run --bin sandbox_validation
//
// # Also poll an existing registration
// DNSIMPLE_REGISTRATION_ID=361 \
// ...
// ```
//
// ## Environment Variables
//
// Required:
// - `DNSIMPLE_TOKEN`: API token
// - `DNSIMPLE_ACCOUNT`: Account identifier
// - `DNSIMPLE_ZONE`: Zone whose records are listed
//
// Optional:
// - `DNSIMPLE_SANDBOX`: "false" to target production (default: sandbox)
// - `DNSIMPLE_REGISTRATION_ID`: Registration to wait on (domain = zone)
// - `DNSIMPLE_WAIT_SECS`: Wait timeout (default: 60)

use dnsimple_client::DnsimpleClient;
use dnsimple_core::convergence::registrar::await_domain_registration;
use dnsimple_core::traits::ZoneRecordListOptions;
use dnsimple_core::{ApiConfig, ConvergenceEngine, ConvergencePolicy, Resolution, ZoneRecordCache};
use std::env;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn required(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        tracing::error!("{} environment variable is required", name);
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    tracing::info!("=== DNSimple Sandbox Validation ===");

    let token = required("DNSIMPLE_TOKEN");
    let account = required("DNSIMPLE_ACCOUNT");
    let zone = required("DNSIMPLE_ZONE");
    let sandbox = env::var("DNSIMPLE_SANDBOX").map(|v| v != "false").unwrap_or(true);
    let registration_id: Option<u64> = env::var("DNSIMPLE_REGISTRATION_ID").ok().and_then(|v| v.parse().ok());
    let wait_secs: u64 = env::var("DNSIMPLE_WAIT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60);

    let config = ApiConfig::new(token, account.clone()).with_sandbox(sandbox);
    let client = DnsimpleClient::new(&config)?;
    tracing::info!(base_url = client.base_url(), "Client created (token not shown)");

    tracing::info!("--- Step 1: Hydrating zone cache ---");
    let cache = ZoneRecordCache::new();
    cache
        .hydrate(&client, &account, &zone, &ZoneRecordListOptions::new())
        .await?;
    let records = cache.get(&zone).await.unwrap_or_default();
    tracing::info!(zone = %zone, records = records.len(), "✓ Zone hydrated");
    for record in records.iter().take(10) {
        tracing::info!("  {} {} {} (ttl {})", record.record_type, record.name, record.content, record.ttl);
    }

    if let Some(registration_id) = registration_id {
        tracing::info!("--- Step 2: Waiting on registration {} ---", registration_id);
        let engine = ConvergenceEngine::new(
            ConvergencePolicy::new(Duration::from_secs(wait_secs)).with_delay(Duration::from_secs(5)),
        );
        let cancel = CancellationToken::new();
        let ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c.cancel();
            }
        });

        let awaited = await_domain_registration(&engine, &client, &account, &zone, registration_id, &cancel).await?;
        match Resolution::from_awaited(awaited, &format!("domain registration for {zone}")) {
            Resolution::Complete(state) => {
                tracing::info!("✓ Registration complete: {:?}", state.map(|r| r.state))
            }
            Resolution::Partial { warning, .. } => {
                tracing::warn!("⚠ {}: {}", warning.summary, warning.detail)
            }
            Resolution::Rejected(err) => tracing::error!("✗ Registration failed: {}", err),
        }
    }

    tracing::info!("=== Validation Complete ===");
    Ok(())
}
