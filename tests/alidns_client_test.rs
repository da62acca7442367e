//! Tests the Alibaba Cloud DNS client against a mocked API using wiremock.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use alidns_webhook::alidns::Credentials;
use alidns_webhook::error::Error;
use alidns_webhook::records::{ApiError, RECORD_TYPE};
use alidns_webhook::{AliDnsClient, DnsApi, RecordManager};

fn client(server: &MockServer) -> AliDnsClient {
    AliDnsClient::new(
        server.uri(),
        Credentials {
            access_key_id: "testid".to_string(),
            access_key_secret: "testsecret".to_string(),
            security_token: None,
        },
        Duration::from_secs(5),
    )
    .unwrap()
}

fn record(id: usize, rr: &str, value: &str) -> Value {
    json!({
        "RecordId": id.to_string(),
        "RR": rr,
        "Type": "TXT",
        "Value": value,
        "DomainName": "example.com",
        "TTL": 600,
        "Status": "ENABLE",
        "Locked": false,
    })
}

fn describe_response(records: Vec<Value>, total: usize, page: usize) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "RequestId": "536E9CAD-DB30-4647-AC87-AA5CC38C5382",
        "TotalCount": total,
        "PageNumber": page,
        "PageSize": 100,
        "DomainRecords": { "Record": records },
    }))
}

fn is_signed(request: &Request) -> bool {
    let params: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
    let has = |key: &str| params.iter().any(|(k, v)| k == key && !v.is_empty());
    has("Signature")
        && has("SignatureNonce")
        && has("Timestamp")
        && params
            .iter()
            .any(|(k, v)| k == "AccessKeyId" && v == "testid")
}

#[tokio::test]
async fn test_list_page_sends_signed_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("Action", "DescribeDomainRecords"))
        .and(query_param("Version", "2015-01-09"))
        .and(query_param("Format", "JSON"))
        .and(query_param("DomainName", "example.com"))
        .and(query_param("RRKeyWord", "_acme-challenge"))
        .and(query_param("Type", "TXT"))
        .and(query_param("PageNumber", "1"))
        .and(query_param("PageSize", "100"))
        .and(is_signed)
        .respond_with(describe_response(
            vec![
                record(1, "_acme-challenge", "token-a"),
                record(2, "@", "token-b"),
            ],
            2,
            1,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .list_page("example.com", "_acme-challenge", RECORD_TYPE, 1, 100)
        .await
        .unwrap();

    assert_eq!(page.total_count, Some(2));
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0].record_id, "1");
    assert_eq!(page.records[0].name, "_acme-challenge");
    assert_eq!(page.records[0].value, "token-a");
    assert_eq!(page.records[1].name, "");
}

#[tokio::test]
async fn test_list_page_without_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("Action", "DescribeDomainRecords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RequestId": "1",
            "TotalCount": 0,
            "DomainRecords": { "Record": [] },
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .list_page("example.com", "_acme-challenge", RECORD_TYPE, 1, 100)
        .await
        .unwrap();

    assert!(page.records.is_empty());
    assert_eq!(page.total_count, Some(0));
}

#[tokio::test]
async fn test_manager_pages_through_all_records() {
    let server = MockServer::start().await;
    let total = 250;
    for page in 1..=3 {
        let records = ((page - 1) * 100..(page * 100).min(total))
            .map(|i| record(i, "_acme-challenge", &format!("token-{i}")))
            .collect();
        Mock::given(method("GET"))
            .and(query_param("Action", "DescribeDomainRecords"))
            .and(query_param("PageNumber", page.to_string()))
            .respond_with(describe_response(records, total, page))
            .expect(1)
            .mount(&server)
            .await;
    }

    let manager = RecordManager::new(Arc::new(client(&server)));
    let records = manager
        .list_records("example.com", "_acme-challenge")
        .await
        .unwrap();

    assert_eq!(records.len(), 250);
    assert_eq!(records[0].value, "token-0");
    assert_eq!(records[249].value, "token-249");
}

#[tokio::test]
async fn test_create_sends_record_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("Action", "AddDomainRecord"))
        .and(query_param("DomainName", "example.com"))
        .and(query_param("RR", "_acme-challenge.www"))
        .and(query_param("Type", "TXT"))
        .and(query_param("Value", "token with spaces+plus"))
        .and(is_signed)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RequestId": "1",
            "RecordId": "9999985",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record_id = client(&server)
        .create(
            "example.com",
            "_acme-challenge.www",
            RECORD_TYPE,
            "token with spaces+plus",
        )
        .await
        .unwrap();

    assert_eq!(record_id, "9999985");
}

#[tokio::test]
async fn test_create_at_apex_uses_at_sign() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("Action", "AddDomainRecord"))
        .and(query_param("RR", "@"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RequestId": "1",
            "RecordId": "1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .create("example.com", "", RECORD_TYPE, "token")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("Action", "DeleteDomainRecord"))
        .and(query_param("RecordId", "9999985"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RequestId": "1",
            "RecordId": "9999985",
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete("9999985").await.unwrap();
}

#[tokio::test]
async fn test_provider_error_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "RequestId": "1",
            "HostId": "alidns.aliyuncs.com",
            "Code": "InvalidAccessKeyId.NotFound",
            "Message": "Specified access key is not found.",
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_page("example.com", "_acme-challenge", RECORD_TYPE, 1, 100)
        .await
        .unwrap_err();

    match err {
        ApiError::Provider { code, message } => {
            assert_eq!(code, "InvalidAccessKeyId.NotFound");
            assert_eq!(message, "Specified access key is not found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client(&server).delete("1").await.unwrap_err();

    match err {
        ApiError::Provider { code, message } => {
            assert_eq!(code, "HTTP 503");
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server)
        .create("example.com", "_acme-challenge", RECORD_TYPE, "token")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidResponse(_)));
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.downcast_ref::<serde_json::Error>().is_some());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let client = AliDnsClient::new(
        "http://127.0.0.1:1",
        Credentials {
            access_key_id: "testid".to_string(),
            access_key_secret: "testsecret".to_string(),
            security_token: None,
        },
        Duration::from_secs(5),
    )
    .unwrap();

    let err = client.delete("1234").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.downcast_ref::<reqwest::Error>().is_some());
}

#[tokio::test]
async fn test_manager_reports_delete_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("Action", "DescribeDomainRecords"))
        .respond_with(describe_response(
            vec![
                record(1, "_acme-challenge", "token"),
                record(2, "_acme-challenge", "other"),
            ],
            2,
            1,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("Action", "DeleteDomainRecord"))
        .and(query_param("RecordId", "1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "RequestId": "1",
            "Code": "Throttling.User",
            "Message": "Request was denied due to user flow control.",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = RecordManager::new(Arc::new(client(&server)));
    let err = manager
        .remove_records_by_value("example.com", "_acme-challenge", "token")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DeleteRecord { ref record_id, .. } if record_id == "1"));
    assert!(err.to_string().contains("Throttling.User"));
}
