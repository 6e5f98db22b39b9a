//! Contract Test: DNSimple API Client
//!
//! Constraints verified:
//! - Requests hit the documented v2 paths with bearer authentication
//! - Single-object and paginated envelopes decode into core types
//! - Listing options become query parameters
//! - Status codes map to the error taxonomy the engine classifies
//! - The client composes with the zone record cache and registrar waiters
//!
//! If this test fails, the client no longer speaks the API shape the core
//! library was built against.

use dnsimple_client::DnsimpleClient;
use dnsimple_core::cache::ZoneRecordCache;
use dnsimple_core::config::ApiConfig;
use dnsimple_core::convergence::registrar::await_domain_registration;
use dnsimple_core::convergence::{ConvergenceEngine, ConvergencePolicy};
use dnsimple_core::error::Error;
use dnsimple_core::traits::{RegistrarApi, ZoneRecordListOptions, ZoneRecordSource};
use serde_json::{Value, json};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "dnsimpletest";
const ACCOUNT: &str = "1010";

fn client_for(server: &MockServer) -> DnsimpleClient {
    DnsimpleClient::new(&ApiConfig::new(TOKEN, ACCOUNT).with_base_url(server.uri())).unwrap()
}

fn registration_json(state: &str) -> Value {
    json!({
        "data": {
            "id": 361,
            "domain_id": 104040,
            "registrant_id": 2715,
            "period": 1,
            "state": state,
            "auto_renew": false,
            "whois_privacy": false,
            "created_at": "2023-01-27T17:44:32Z",
            "updated_at": "2023-01-27T17:44:40Z"
        }
    })
}

fn record_json(id: u64, name: &str, record_type: &str, content: &str) -> Value {
    json!({
        "id": id,
        "zone_id": "example.com",
        "parent_id": null,
        "name": name,
        "content": content,
        "ttl": 3600,
        "priority": null,
        "type": record_type,
        "regions": ["global"],
        "system_record": false,
        "created_at": "2016-03-22T10:20:53Z",
        "updated_at": "2016-10-05T09:26:38Z"
    })
}

fn records_page(records: Vec<Value>, current_page: u32, total_pages: u32, total_entries: u64) -> Value {
    json!({
        "data": records,
        "pagination": {
            "current_page": current_page,
            "per_page": 100,
            "total_entries": total_entries,
            "total_pages": total_pages
        }
    })
}

#[tokio::test]
async fn get_domain_registration_uses_documented_path_and_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/1010/registrar/domains/example.com/registrations/361"))
        .and(header("Authorization", "Bearer dnsimpletest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registration_json("registered")))
        .expect(1)
        .mount(&server)
        .await;

    let registration = client_for(&server)
        .get_domain_registration(ACCOUNT, "example.com", 361)
        .await
        .unwrap();

    assert_eq!(registration.id, 361);
    assert_eq!(registration.domain_id, 104040);
    assert_eq!(registration.state, "registered");
    assert!(registration.created_at.is_some());
}

#[tokio::test]
async fn get_registrant_change_decodes_extended_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/1010/registrar/registrant_changes/101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 101,
                "account_id": 1010,
                "domain_id": 101,
                "contact_id": 101,
                "state": "new",
                "extended_attributes": { "x-fi-registrant-idnumber": "123" },
                "registry_owner_change": true,
                "irt_lock_lifted_by": null,
                "created_at": "2017-02-03T17:43:22Z",
                "updated_at": "2017-02-03T17:43:22Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let change = client_for(&server).get_registrant_change(ACCOUNT, 101).await.unwrap();

    assert_eq!(change.id, 101);
    assert_eq!(change.state, "new");
    assert!(change.registry_owner_change);
    assert!(change.irt_lock_lifted_by.is_none());
    assert_eq!(
        change.extended_attributes.get("x-fi-registrant-idnumber").map(String::as_str),
        Some("123")
    );
}

#[tokio::test]
async fn list_zone_records_forwards_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/1010/zones/example.com/records"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "100"))
        .and(query_param("name", "www"))
        .and(query_param("type", "A"))
        .and(query_param("sort", "id:asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_page(
            vec![record_json(5, "www", "A", "1.2.3.4")],
            2,
            2,
            101,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let options = ZoneRecordListOptions::new()
        .with_name("www")
        .with_record_type("A")
        .with_sort("id:asc")
        .with_page(2)
        .with_per_page(100);
    let page = client_for(&server)
        .list_zone_records(ACCOUNT, "example.com", &options)
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].record_type, "A");
    assert_eq!(page.pagination.current_page, 2);
    assert_eq!(page.pagination.total_entries, 101);
    assert!(!page.pagination.has_next_page());
}

async fn error_for(status: u16, body: Value) -> Error {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;

    client_for(&server)
        .get_domain_registration(ACCOUNT, "example.com", 361)
        .await
        .unwrap_err()
}

#[tokio::test]
async fn status_codes_map_to_error_taxonomy() {
    let err = error_for(401, json!({ "message": "Authentication failed" })).await;
    assert!(matches!(err, Error::Authentication(_)), "got {err:?}");
    assert!(!err.is_retryable());
    assert!(!err.to_string().contains(TOKEN), "token must never leak into errors");

    let err = error_for(404, json!({ "message": "Domain `example.com` not found" })).await;
    assert!(matches!(err, Error::NotFound(_)), "got {err:?}");

    let err = error_for(429, json!({ "message": "Too many requests" })).await;
    assert!(matches!(err, Error::RateLimited(_)), "got {err:?}");
    assert!(err.is_retryable());

    let err = error_for(500, json!({ "message": "Internal error" })).await;
    match &err {
        Error::Api { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "Internal error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.is_retryable());

    let err = error_for(400, json!({ "message": "Validation failed" })).await;
    assert!(matches!(err, Error::Api { status: 400, .. }), "got {err:?}");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn malformed_body_is_a_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_registrant_change(ACCOUNT, 101)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Json(_)), "got {err:?}");
}

#[tokio::test]
async fn cache_hydrates_through_client_pagination() {
    let server = MockServer::start().await;
    let first: Vec<Value> = (1..=100).map(|id| record_json(id, &format!("host{id}"), "A", "10.0.0.1")).collect();
    let second: Vec<Value> = (101..=137).map(|id| record_json(id, &format!("host{id}"), "A", "10.0.0.2")).collect();

    Mock::given(method("GET"))
        .and(path("/v2/1010/zones/example.com/records"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_page(first, 1, 2, 137)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/1010/zones/example.com/records"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_page(second, 2, 2, 137)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cache = ZoneRecordCache::new();
    cache
        .hydrate(&client, ACCOUNT, "example.com", &ZoneRecordListOptions::new())
        .await
        .unwrap();
    // Already cached: no further requests, enforced by expect(1) on drop
    cache
        .hydrate(&client, ACCOUNT, "example.com", &ZoneRecordListOptions::new())
        .await
        .unwrap();

    assert_eq!(cache.get("example.com").await.unwrap().len(), 137);
    let found = cache.find("example.com", "host120", "A", "10.0.0.2").await.unwrap();
    assert_eq!(found.id, 120);
}

#[tokio::test]
async fn waiter_polls_client_until_registered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/1010/registrar/domains/example.com/registrations/361"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registration_json("pending")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/1010/registrar/domains/example.com/registrations/361"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registration_json("registered")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let engine = ConvergenceEngine::new(
        ConvergencePolicy::new(Duration::from_secs(5)).with_delay(Duration::from_millis(10)),
    );

    let awaited = await_domain_registration(&engine, &client, ACCOUNT, "example.com", 361, &CancellationToken::new())
        .await
        .unwrap();

    assert!(awaited.report.outcome.is_converged());
    assert_eq!(awaited.report.attempts, 3);
    assert_eq!(awaited.last_observed.unwrap().state, "registered");
}
