//! Minimal embedding example for dnsimple-core
//!
//! Wires in-memory registrar and zone sources into the convergence engine
//! and the zone record cache, the way a host integration would wire
//! `dnsimple-client`.

use async_trait::async_trait;
use dnsimple_core::convergence::registrar::{await_domain_registration, await_registrant_change};
use dnsimple_core::traits::{
    DomainRegistration, Pagination, RegistrantChange, ZoneRecord, ZoneRecordListOptions, ZoneRecordPage,
};
use dnsimple_core::{
    ConvergenceEngine, ConvergencePolicy, DnsimpleConfig, RegistrarApi, Resolution, Result, ZoneRecordCache,
    ZoneRecordSource,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Registrar whose registration settles after a few polls and whose
/// registrant change never does
struct EmbeddedRegistrar {
    polls: AtomicUsize,
    settles_after: usize,
}

#[async_trait]
impl RegistrarApi for EmbeddedRegistrar {
    async fn get_domain_registration(
        &self,
        _account: &str,
        _domain: &str,
        registration_id: u64,
    ) -> Result<DomainRegistration> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        let state = if poll >= self.settles_after { "registered" } else { "pending" };
        println!("[Embedded] registration {registration_id} poll {poll}: {state}");

        Ok(DomainRegistration {
            id: registration_id,
            domain_id: 1,
            registrant_id: 1,
            period: 1,
            state: state.to_string(),
            auto_renew: false,
            whois_privacy: false,
            created_at: None,
            updated_at: None,
        })
    }

    async fn get_registrant_change(&self, account: &str, change_id: u64) -> Result<RegistrantChange> {
        Ok(RegistrantChange {
            id: change_id,
            account_id: account.parse().unwrap_or_default(),
            domain_id: 1,
            contact_id: 2,
            state: "pending".to_string(),
            registry_owner_change: true,
            irt_lock_lifted_by: None,
            extended_attributes: HashMap::new(),
            created_at: None,
            updated_at: None,
        })
    }

    fn api_name(&self) -> &'static str {
        "embedded"
    }
}

/// Zone source serving generated records, honouring name and type filters
struct EmbeddedZone {
    records: Vec<ZoneRecord>,
}

impl EmbeddedZone {
    fn new(zone: &str, count: u64) -> Self {
        let records = (1..=count)
            .map(|id| ZoneRecord::new(id, zone, format!("host{id}"), "A", format!("192.0.2.{}", id % 250)))
            .collect();
        Self { records }
    }
}

#[async_trait]
impl ZoneRecordSource for EmbeddedZone {
    async fn list_zone_records(
        &self,
        _account: &str,
        _zone: &str,
        options: &ZoneRecordListOptions,
    ) -> Result<ZoneRecordPage> {
        let page = options.page.unwrap_or(1).max(1);
        let per_page = options.per_page.unwrap_or(30).max(1);
        let start = ((page - 1) * per_page) as usize;
        let matching: Vec<&ZoneRecord> = self
            .records
            .iter()
            .filter(|r| options.name.as_deref().is_none_or(|name| r.name == name))
            .filter(|r| options.record_type.as_deref().is_none_or(|t| r.record_type == t))
            .collect();
        let records: Vec<ZoneRecord> = matching.iter().skip(start).take(per_page as usize).map(|r| (*r).clone()).collect();
        println!("[Embedded] zone page {page}: {} record(s)", records.len());

        let total_entries = matching.len() as u64;
        Ok(ZoneRecordPage {
            records,
            pagination: Pagination {
                current_page: page,
                per_page,
                total_entries,
                total_pages: total_entries.div_ceil(per_page as u64) as u32,
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    println!("=== Embedded dnsimple-core Example ===\n");

    let mut config = DnsimpleConfig::new("embedded-token", "1010");
    config.zone_records.prefetch = std::env::var("DNSIMPLE_PREFETCH").map(|v| v != "false").unwrap_or(true);
    config.validate()?;
    let account = config.api.account.as_str();

    // 1. Look a record up, through the cache when prefetching
    let zone = EmbeddedZone::new("example.com", 250);
    let found = if config.zone_records.prefetch {
        println!("1. Hydrating zone cache...");
        let cache = ZoneRecordCache::new();
        cache
            .hydrate(&zone, account, "example.com", &ZoneRecordListOptions::new())
            .await?;
        cache
            .hydrate(&zone, account, "example.com", &ZoneRecordListOptions::new())
            .await?;
        cache.find("example.com", "host42", "A", "192.0.2.42").await
    } else {
        println!("1. Listing records by name...");
        let options = ZoneRecordListOptions::new().with_name("host42").with_record_type("A");
        zone.list_zone_records(account, "example.com", &options)
            .await?
            .records
            .into_iter()
            .find(|r| r.matches("host42", "A", "192.0.2.42"))
    };
    if let Some(record) = found {
        println!("   Found record {} ({} {})", record.id, record.name, record.content);
    }

    // 2. Wait for a registration, with short timings for the demo
    println!("\n2. Waiting for domain registration...");
    let registrar = EmbeddedRegistrar {
        polls: AtomicUsize::new(0),
        settles_after: 3,
    };
    let engine = ConvergenceEngine::new(
        ConvergencePolicy::new(Duration::from_secs(5)).with_delay(Duration::from_millis(200)),
    );
    let cancel = CancellationToken::new();

    let awaited = await_domain_registration(&engine, &registrar, account, "example.com", 361, &cancel).await?;
    match Resolution::from_awaited(awaited, "domain registration for example.com") {
        Resolution::Complete(state) => println!("   Complete: {:?}", state.map(|r| r.state)),
        Resolution::Partial { warning, .. } => println!("   Partial: {}", warning.summary),
        Resolution::Rejected(err) => println!("   Rejected: {err}"),
    }

    // 3. A registrant change that outlives its deadline
    println!("\n3. Waiting for registrant change...");
    let engine = ConvergenceEngine::new(
        ConvergencePolicy::new(Duration::from_millis(500)).with_delay(Duration::from_millis(200)),
    );
    let awaited = await_registrant_change(&engine, &registrar, account, 101, &cancel).await?;
    let resolution = Resolution::from_awaited(awaited, "registrant change for example.com");
    if let Some(warning) = resolution.warning() {
        println!("   Warning: {}\n   {}", warning.summary, warning.detail);
    }
    println!("   Persist state: {}", resolution.should_persist());

    println!("\n=== Embedding Successful ===");
    Ok(())
}
