//! Integration tests for endpoint discovery and the proxy transport,
//! against real HTTP servers.

use std::sync::Arc;

use abaplink::bridge::{BridgeError, BridgeLocator, BridgeTransport, HttpBridge, ProxyCall};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn first_healthy_candidate_wins_and_later_ones_are_not_probed() {
    let dead = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&dead)
        .await;

    let live = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
        )
        .expect(1)
        .mount(&live)
        .await;

    let untouched = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
        )
        .expect(0)
        .mount(&untouched)
        .await;

    let locator =
        BridgeLocator::with_candidates(None, vec![dead.uri(), live.uri(), untouched.uri()]);
    let endpoint = locator.resolve().await.expect("a bridge should be found");
    assert_eq!(endpoint.base_url, live.uri());
}

#[tokio::test]
async fn health_answering_wrong_status_is_rejected() {
    let pretender = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "starting"})),
        )
        .mount(&pretender)
        .await;

    let locator = BridgeLocator::with_candidates(None, vec![pretender.uri()]);
    assert!(locator.resolve().await.is_none());
}

#[tokio::test]
async fn probing_happens_once_then_the_answer_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let locator = BridgeLocator::with_candidates(None, vec![server.uri()]);
    assert!(locator.resolve().await.is_some());
    assert!(locator.resolve().await.is_some());
    assert!(locator.resolve().await.is_some());
}

#[tokio::test]
async fn negative_resolution_is_cached_too() {
    let dead = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&dead)
        .await;

    let locator = BridgeLocator::with_candidates(None, vec![dead.uri()]);
    assert!(locator.resolve().await.is_none());
    // Second call answers from the cache without re-probing.
    assert!(locator.resolve().await.is_none());
}

#[tokio::test]
async fn override_url_failure_falls_through_to_candidates() {
    let dead = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&dead)
        .await;

    let live = healthy_server().await;

    let locator = BridgeLocator::with_candidates(Some(dead.uri()), vec![live.uri()]);
    let endpoint = locator.resolve().await.expect("fallback should be found");
    assert_eq!(endpoint.base_url, live.uri());
}

#[tokio::test]
async fn proxy_envelope_carries_method_path_headers_and_params() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/proxy"))
        .and(body_partial_json(serde_json::json!({
            "method": "POST",
            "path": "/sap/bc/adt/programs/programs/ztest",
            "headers": {"Accept": "application/xml"},
            "params": {"_action": "LOCK", "accessMode": "MODIFY"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200,
            "body": "<DATA><LOCK_HANDLE>H1</LOCK_HANDLE></DATA>",
            "headers": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let locator = Arc::new(BridgeLocator::with_candidates(None, vec![server.uri()]));
    let bridge = HttpBridge::new(locator);

    let call = ProxyCall::new("POST", "/sap/bc/adt/programs/programs/ztest")
        .header("Accept", "application/xml")
        .param("_action", "LOCK")
        .param("accessMode", "MODIFY");
    let result = bridge.send(call).await.unwrap();

    assert_eq!(result.status, 200);
    assert!(result.body.contains("LOCK_HANDLE"));
}

#[tokio::test]
async fn remote_error_status_surfaces_as_api_error() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/proxy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 404,
            "body": "resource not found",
            "headers": {"content-type": "text/plain"}
        })))
        .mount(&server)
        .await;

    let locator = Arc::new(BridgeLocator::with_candidates(None, vec![server.uri()]));
    let bridge = HttpBridge::new(locator);

    let err = bridge
        .send(ProxyCall::new("GET", "/sap/bc/adt/oo/classes/zmissing"))
        .await
        .unwrap_err();
    match err {
        BridgeError::Api { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "resource not found");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn undecodable_bridge_reply_is_invalid_response() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/proxy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let locator = Arc::new(BridgeLocator::with_candidates(None, vec![server.uri()]));
    let bridge = HttpBridge::new(locator);

    let err = bridge
        .send(ProxyCall::new("GET", "/sap/bc/adt/discovery"))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidResponse(_)));
}

#[tokio::test]
async fn no_candidates_means_unavailable_without_traffic() {
    let locator = Arc::new(BridgeLocator::with_candidates(None, vec![]));
    let bridge = HttpBridge::new(locator);

    let err = bridge
        .send(ProxyCall::new("GET", "/sap/bc/adt/discovery"))
        .await
        .unwrap_err();
    match err {
        BridgeError::Unavailable(message) => {
            // The message must tell the operator what to do.
            assert!(message.contains("bridge"));
        }
        other => panic!("expected Unavailable, got {:?}", other),
    }
}
