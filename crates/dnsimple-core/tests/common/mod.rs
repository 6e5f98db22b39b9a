//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal scripted collaborators that count their
//! calls, so tests can assert on exactly how the engine and cache used them.

#![allow(dead_code)]

use async_trait::async_trait;
use dnsimple_core::error::{Error, Result};
use dnsimple_core::traits::{
    DomainRegistration, Pagination, RegistrantChange, RegistrarApi, ZoneRecord,
    ZoneRecordListOptions, ZoneRecordPage, ZoneRecordSource,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Short delay used by timing tests
pub const TEST_DELAY: Duration = Duration::from_millis(40);

/// One scripted registrar answer
#[derive(Clone, Copy)]
pub enum Scripted {
    /// Return an object in this state
    State(&'static str),
    /// Fail the call with the error this builds
    Fail(fn() -> Error),
}

/// A registrar that replays a script, repeating the final entry forever
pub struct ScriptedRegistrar {
    script: Mutex<VecDeque<Scripted>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedRegistrar {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always answer with the same state
    pub fn stuck_in(state: &'static str) -> Self {
        Self::new(vec![Scripted::State(state)])
    }

    /// Get the number of registrar calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn next_state(&self) -> Result<&'static str> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();

        let entry = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().copied()
        };
        match entry {
            Some(Scripted::State(state)) => Ok(state),
            Some(Scripted::Fail(make_error)) => Err(make_error()),
            None => Ok("new"),
        }
    }
}

pub fn registration(id: u64, state: &str) -> DomainRegistration {
    DomainRegistration {
        id,
        domain_id: 999,
        registrant_id: 2715,
        period: 1,
        state: state.to_string(),
        auto_renew: false,
        whois_privacy: false,
        created_at: None,
        updated_at: None,
    }
}

pub fn registrant_change(id: u64, state: &str) -> RegistrantChange {
    RegistrantChange {
        id,
        account_id: 1010,
        domain_id: 999,
        contact_id: 2715,
        state: state.to_string(),
        registry_owner_change: false,
        irt_lock_lifted_by: None,
        extended_attributes: HashMap::new(),
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl RegistrarApi for ScriptedRegistrar {
    async fn get_domain_registration(
        &self,
        _account: &str,
        _domain: &str,
        registration_id: u64,
    ) -> Result<DomainRegistration> {
        let state = self.next_state()?;
        Ok(registration(registration_id, state))
    }

    async fn get_registrant_change(&self, _account: &str, change_id: u64) -> Result<RegistrantChange> {
        let state = self.next_state()?;
        Ok(registrant_change(change_id, state))
    }

    fn api_name(&self) -> &'static str {
        "scripted"
    }
}

/// Serves fixed pages per zone and records every request
pub struct PagedZoneSource {
    pages: HashMap<String, Vec<Vec<ZoneRecord>>>,
    /// Page number (1-based) whose next request fails, if any
    fail_on_page: Mutex<Option<u32>>,
    /// Report `current_page: 1` on every response
    echo_first_page: bool,
    /// Added to the reported `total_pages`
    extra_total_pages: u32,
    call_count: Arc<AtomicUsize>,
    requests: Mutex<Vec<ZoneRecordListOptions>>,
}

impl PagedZoneSource {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            fail_on_page: Mutex::new(None),
            echo_first_page: false,
            extra_total_pages: 0,
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Add a zone whose records are split into pages of the given sizes
    pub fn with_zone(mut self, zone: &str, page_sizes: &[usize]) -> Self {
        let mut next_id = 1u64;
        let pages = page_sizes
            .iter()
            .map(|&size| {
                (0..size)
                    .map(|_| {
                        let id = next_id;
                        next_id += 1;
                        ZoneRecord::new(id, zone, format!("host{id}"), "A", format!("10.0.{}.{}", id / 256, id % 256))
                    })
                    .collect()
            })
            .collect();
        self.pages.insert(zone.to_string(), pages);
        self
    }

    /// Add a zone with explicit records on a single page
    pub fn with_records(mut self, zone: &str, records: Vec<ZoneRecord>) -> Self {
        self.pages.insert(zone.to_string(), vec![records]);
        self
    }

    /// Make the next request for the given page fail
    pub fn failing_once_on_page(self, page: u32) -> Self {
        *self.fail_on_page.lock().unwrap() = Some(page);
        self
    }

    /// Always report page 1 as the current page
    pub fn echoing_first_page(mut self) -> Self {
        self.echo_first_page = true;
        self
    }

    /// Report more pages than actually exist
    pub fn overstating_total_pages(mut self, extra: u32) -> Self {
        self.extra_total_pages = extra;
        self
    }

    /// Get the number of listing calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// All options the source was called with, in order
    pub fn requests(&self) -> Vec<ZoneRecordListOptions> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZoneRecordSource for PagedZoneSource {
    async fn list_zone_records(
        &self,
        _account: &str,
        zone: &str,
        options: &ZoneRecordListOptions,
    ) -> Result<ZoneRecordPage> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(options.clone());

        let page_number = options.page.unwrap_or(1);
        {
            let mut fail_on_page = self.fail_on_page.lock().unwrap();
            if *fail_on_page == Some(page_number) {
                fail_on_page.take();
                return Err(Error::api(503, "service unavailable"));
            }
        }

        let pages = self
            .pages
            .get(zone)
            .ok_or_else(|| Error::not_found(format!("Zone not found: {zone}")))?;

        let records = pages
            .get((page_number as usize).saturating_sub(1))
            .cloned()
            .unwrap_or_default();
        let total_entries = pages.iter().map(|p| p.len() as u64).sum();

        Ok(ZoneRecordPage {
            records,
            pagination: Pagination {
                current_page: if self.echo_first_page { 1 } else { page_number },
                per_page: options.per_page.unwrap_or(30),
                total_entries,
                total_pages: pages.len() as u32 + self.extra_total_pages,
            },
        })
    }
}
