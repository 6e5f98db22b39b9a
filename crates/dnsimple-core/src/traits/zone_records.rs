// # Zone Record Source Trait
//
// Defines the paginated zone-record listing the cache hydrates from.
//
// ## Implementations
//
// - DNSimple API v2: `dnsimple-client` crate
// - Test doubles: in-memory page servers (see `tests/common`)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single DNS resource record snapshot
///
/// Records are copies of remote state. Nothing in this crate mutates them
/// after they are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Record ID
    pub id: u64,
    /// Name of the owning zone
    pub zone_id: String,
    /// Parent record ID, for system-managed child records
    #[serde(default)]
    pub parent_id: Option<u64>,
    /// Relative label. The empty string is the zone apex.
    pub name: String,
    pub content: String,
    pub ttl: u32,
    /// Only meaningful for priority-bearing types (MX, SRV, ...)
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub system_record: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ZoneRecord {
    /// Create a record with the identifying fields set
    ///
    /// Everything else gets the API defaults (TTL 3600, global region).
    pub fn new(
        id: u64,
        zone_id: impl Into<String>,
        name: impl Into<String>,
        record_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            zone_id: zone_id.into(),
            parent_id: None,
            name: name.into(),
            content: content.into(),
            ttl: 3600,
            priority: None,
            record_type: record_type.into(),
            regions: vec!["global".to_string()],
            system_record: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Whether this record sits at the zone apex
    pub fn is_apex(&self) -> bool {
        self.name.is_empty()
    }

    /// Exact match on name, type and content
    pub fn matches(&self, name: &str, record_type: &str, content: &str) -> bool {
        self.name == name && self.record_type == record_type && self.content == content
    }
}

/// Pagination metadata returned with every listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total_entries: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Whether at least one page remains after this one
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One page of a zone-record listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecordPage {
    #[serde(rename = "data")]
    pub records: Vec<ZoneRecord>,
    pub pagination: Pagination,
}

/// Filters and paging for a zone-record listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecordListOptions {
    /// Exact name match
    pub name: Option<String>,
    /// Name substring match
    pub name_like: Option<String>,
    /// Record type filter
    pub record_type: Option<String>,
    /// Sort expression (e.g. "id:asc")
    pub sort: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ZoneRecordListOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by exact name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Filter by name substring
    pub fn with_name_like(mut self, name_like: impl Into<String>) -> Self {
        self.name_like = Some(name_like.into());
        self
    }

    /// Filter by record type
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Set the sort expression
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Select a page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Render as query parameters, skipping unset fields
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref name) = self.name {
            query.push(("name", name.clone()));
        }
        if let Some(ref name_like) = self.name_like {
            query.push(("name_like", name_like.clone()));
        }
        if let Some(ref record_type) = self.record_type {
            query.push(("type", record_type.clone()));
        }
        if let Some(ref sort) = self.sort {
            query.push(("sort", sort.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page", per_page.to_string()));
        }
        query
    }
}

/// Trait for paginated zone-record listing implementations
///
/// One call fetches one page. Walking pages is the caller's job.
#[async_trait]
pub trait ZoneRecordSource: Send + Sync {
    /// List one page of records for a zone
    ///
    /// # Parameters
    ///
    /// - `account`: Account identifier
    /// - `zone`: Zone name
    /// - `options`: Filters and paging
    ///
    /// # Returns
    ///
    /// - `Ok(ZoneRecordPage)`: Records on the requested page plus pagination
    /// - `Err(Error)`: Transport or API failure
    async fn list_zone_records(
        &self,
        account: &str,
        zone: &str,
        options: &ZoneRecordListOptions,
    ) -> Result<ZoneRecordPage, crate::Error>;
}
