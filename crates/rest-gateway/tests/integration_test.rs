//! Integration tests for the Zcash REST Gateway
//!
//! Every test drives the real router against the in-process mock node bound
//! on an ephemeral localhost port.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`
use zcash_rest_gateway::{create_router, AppState, MockNode, RpcClient};

const TEST_API_KEY: &str = "test-api-key";
const TXID: &str = "6f2fd9c5a8b54e91a3a1b6c7d8e9f00112233445566778899aabbccddeeff001";
const T_ADDRESS: &str = "tmMock00000000000000000000000000042";

/// Helper to create a test app wired to a fresh mock node
async fn create_test_app() -> (Router, Arc<MockNode>) {
    let (addr, node) = MockNode::new().spawn().await.unwrap();
    let rpc = RpcClient::new(format!("http://{}", addr), "", Duration::from_secs(5)).unwrap();
    (create_router(AppState::new(rpc, TEST_API_KEY)), node)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    post_raw(uri, serde_json::to_string(&body).unwrap())
}

fn post_raw(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("x-api-key", TEST_API_KEY)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

async fn last_params(node: &MockNode) -> Vec<Value> {
    node.requests().await.last().unwrap().params.clone()
}

#[tokio::test]
async fn test_health_check() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "healthy");
    assert_eq!(json["data"]["service"], "zcash-rest-gateway");
    assert_eq!(node.call_count().await, 0);
}

#[tokio::test]
async fn test_missing_api_key_rejected_everywhere() {
    let (app, node) = create_test_app().await;

    let paths = [
        ("GET", "/health"),
        ("GET", "/blockchain/info"),
        ("GET", "/blockchain/blockcount"),
        ("GET", "/blockchain/blockhash/1"),
        ("GET", "/wallet/balance"),
        ("POST", "/wallet/newaddress"),
        ("GET", "/transactions"),
        ("POST", "/transaction/send"),
        ("GET", "/network/info"),
        ("GET", "/fee/estimate"),
    ];

    for (method, path) in paths {
        let request = Request::builder()
            .uri(path)
            .method(method)
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, path);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing API key");
    }

    assert_eq!(node.call_count().await, 0);
}

#[tokio::test]
async fn test_invalid_api_key_rejected() {
    let (app, node) = create_test_app().await;

    for path in ["/blockchain/info", "/wallet/info", "/mining/info"] {
        let request = Request::builder()
            .uri(path)
            .header("x-api-key", "not-the-key")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app, request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid API key");
    }

    assert_eq!(node.call_count().await, 0);
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let (app, _node) = create_test_app().await;

    let request = Request::builder()
        .uri("/blockchain/blockcount")
        .header("authorization", format!("Bearer {}", TEST_API_KEY))
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["blockCount"], 2_500_000);
}

#[tokio::test]
async fn test_informational_shape_is_stable() {
    let (app, _node) = create_test_app().await;

    for path in ["/blockchain/info", "/network/info", "/mining/info"] {
        let (status_a, first) = send(&app, get(path)).await;
        let (status_b, second) = send(&app, get(path)).await;

        assert_eq!(status_a, StatusCode::OK);
        assert_eq!(status_b, StatusCode::OK);
        assert_eq!(first["success"], true);

        let keys = |v: &Value| {
            let mut keys: Vec<String> = v["data"].as_object().unwrap().keys().cloned().collect();
            keys.sort();
            keys
        };
        assert_eq!(keys(&first), keys(&second), "{}", path);
    }
}

#[tokio::test]
async fn test_blockchain_info_passthrough() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/blockchain/info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["chain"], "main");
    assert_eq!(json["data"]["blocks"], 2_500_000);

    let requests = node.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "getblockchaininfo");
    assert_eq!(requests[0].jsonrpc, "2.0");
}

#[tokio::test]
async fn test_block_hash() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/blockchain/blockhash/1000")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["height"], 1000);
    assert_eq!(json["data"]["blockHash"], format!("{:064x}", 1000));
    assert_eq!(last_params(&node).await, vec![json!(1000)]);
}

#[tokio::test]
async fn test_block_hash_non_numeric_height() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/blockchain/blockhash/tip")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(node.call_count().await, 0);
}

#[tokio::test]
async fn test_node_error_is_surfaced() {
    let (app, _node) = create_test_app().await;

    let (status, json) = send(&app, get("/blockchain/blockhash/-1")).await;

    assert!(status.as_u16() >= 400);
    assert_eq!(json["success"], false);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("-8"), "{}", error);
    assert!(error.contains("Block height out of range"), "{}", error);
}

#[tokio::test]
async fn test_block_default_verbosity() {
    let (app, node) = create_test_app().await;
    let hash = format!("{:064x}", 77);

    let (status, json) = send(&app, get(&format!("/blockchain/block/{}", hash))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["hash"], hash);
    assert_eq!(last_params(&node).await, vec![json!(hash), json!(1)]);

    let (status, json) = send(&app, get(&format!("/blockchain/block/{}?verbosity=0", hash))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].is_string());
    assert_eq!(last_params(&node).await, vec![json!(hash), json!(0)]);
}

#[tokio::test]
async fn test_balance_defaults() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/wallet/balance")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["balance"], 1.25);
    assert_eq!(json["data"]["minConfirmations"], 1);
    assert_eq!(last_params(&node).await, vec![json!("*"), json!(1)]);

    // Malformed values fall back to the default instead of being rejected
    let (status, json) = send(&app, get("/wallet/balance?minConfirmations=abc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["minConfirmations"], 1);

    let (_, json) = send(&app, get("/wallet/balance?minConfirmations=6")).await;
    assert_eq!(json["data"]["minConfirmations"], 6);
}

#[tokio::test]
async fn test_wallet_info() {
    let (app, _node) = create_test_app().await;

    let (status, json) = send(&app, get("/wallet/info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["txcount"], 3);
}

#[tokio::test]
async fn test_new_addresses_are_distinct() {
    let (app, node) = create_test_app().await;

    let (status_a, first) = send(&app, post_raw("/wallet/newaddress", String::new())).await;
    let (status_b, second) = send(&app, post_json("/wallet/newaddress", json!({}))).await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    let a = first["data"]["address"].as_str().unwrap();
    let b = second["data"]["address"].as_str().unwrap();
    assert_ne!(a, b);

    send(&app, post_json("/wallet/newaddress", json!({ "account": "savings" }))).await;
    assert_eq!(last_params(&node).await, vec![json!("savings")]);
}

#[tokio::test]
async fn test_unspent_defaults() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/wallet/unspent")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["minConfirmations"], 1);
    assert_eq!(json["data"]["maxConfirmations"], 9_999_999);
    assert!(json["data"]["unspent"].is_array());
    assert_eq!(last_params(&node).await, vec![json!(1), json!(9_999_999)]);
}

#[tokio::test]
async fn test_list_transactions_defaults() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/transactions")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["count"], 10);
    assert_eq!(json["data"]["skip"], 0);
    assert!(json["data"]["transactions"].is_array());
    assert_eq!(last_params(&node).await, vec![json!("*"), json!(10), json!(0)]);

    let (_, json) = send(&app, get("/transactions?count=2&skip=4")).await;
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(json["data"]["skip"], 4);
    assert_eq!(json["data"]["transactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_transaction() {
    let (app, _node) = create_test_app().await;

    let (status, json) = send(&app, get(&format!("/transaction/{}", TXID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["txid"], TXID);

    let (status, json) = send(&app, get("/transaction/not-a-txid")).await;
    assert!(status.as_u16() >= 400);
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Invalid or non-wallet transaction id"));
}

#[tokio::test]
async fn test_raw_transaction_verbose_flag() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get(&format!("/transaction/{}/raw", TXID))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].is_string());
    assert_eq!(last_params(&node).await, vec![json!(TXID), json!(0)]);

    let (status, json) = send(&app, get(&format!("/transaction/{}/raw?verbose=true", TXID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["txid"], TXID);
    assert_eq!(last_params(&node).await, vec![json!(TXID), json!(1)]);
}

#[tokio::test]
async fn test_send_requires_address_and_amount() {
    let (app, node) = create_test_app().await;

    let cases = [
        json!({ "amount": 0.1 }),
        json!({ "address": T_ADDRESS }),
        json!({ "address": "   ", "amount": 0.1 }),
        json!({}),
    ];

    for body in cases {
        let (status, json) = send(&app, post_json("/transaction/send", body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("required"));
    }

    let (status, json) = send(&app, post_raw("/transaction/send", "{broken".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    assert_eq!(node.call_count().await, 0);
}

#[tokio::test]
async fn test_send_to_address() {
    let (app, node) = create_test_app().await;

    let body = json!({ "address": T_ADDRESS, "amount": "0.5", "comment": "rent" });
    let (status, json) = send(&app, post_json("/transaction/send", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["txid"].is_string());
    assert_eq!(
        last_params(&node).await,
        vec![json!(T_ADDRESS), json!(0.5), json!("rent")]
    );
}

#[tokio::test]
async fn test_send_amount_validated_by_node() {
    let (app, node) = create_test_app().await;

    let body = json!({ "address": T_ADDRESS, "amount": -1 });
    let (status, json) = send(&app, post_json("/transaction/send", body)).await;

    assert!(status.as_u16() >= 400);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("-3"));
    assert_eq!(node.call_count().await, 1);
}

#[tokio::test]
async fn test_shielded_send_and_operation_status() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(
        &app,
        post_json("/transaction/shielded/send", json!({ "address": T_ADDRESS, "amount": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "fromAddress is required");
    assert_eq!(node.call_count().await, 0);

    let body = json!({
        "fromAddress": T_ADDRESS,
        "address": "zs1mockrecipient0000000000000000000",
        "amount": 0.25,
        "memo": "f00d"
    });
    let (status, json) = send(&app, post_json("/transaction/shielded/send", body)).await;
    assert_eq!(status, StatusCode::OK);
    let operation_id = json["data"]["operationId"].as_str().unwrap().to_string();
    assert!(operation_id.starts_with("opid-"));

    let params = last_params(&node).await;
    assert_eq!(params[0], json!(T_ADDRESS));
    assert_eq!(params[1][0]["memo"], "f00d");
    assert_eq!(params[2], json!(1));

    let (status, json) = send(&app, get(&format!("/operation/{}/status", operation_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], operation_id);
    assert_eq!(json["data"]["status"], "success");

    let (status, json) = send(&app, get("/operation/unknown/result")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_validate_address() {
    let (app, _node) = create_test_app().await;

    let (status, json) = send(&app, get(&format!("/address/validate/{}", T_ADDRESS))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["isvalid"], true);

    let (status, json) = send(&app, get("/address/validate/garbage")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["isvalid"], false);
}

#[tokio::test]
async fn test_network_and_fee_endpoints() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/network/connections")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["connections"], 8);

    let (status, json) = send(&app, get("/mempool/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["size"], 4);

    let (status, json) = send(&app, get("/fee/estimate")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["nblocks"], 6);
    assert_eq!(json["data"]["feeRate"], 0.0001);
    assert_eq!(last_params(&node).await, vec![json!(6)]);

    let (_, json) = send(&app, get("/fee/estimate?nblocks=2")).await;
    assert_eq!(json["data"]["nblocks"], 2);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _node) = create_test_app().await;

    let (status, json) = send(&app, get("/wallet/seed")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_correlation_ids_increase() {
    let (app, node) = create_test_app().await;

    for _ in 0..3 {
        send(&app, get("/blockchain/blockcount")).await;
    }

    let ids: Vec<u64> = node.requests().await.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|w| w[1] > w[0]), "{:?}", ids);
}

#[tokio::test]
async fn test_unreachable_node_reports_network_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let rpc = RpcClient::new(format!("http://{}", addr), "", Duration::from_secs(2)).unwrap();
    let app = create_router(AppState::new(rpc, TEST_API_KEY));

    let (status, json) = send(&app, get("/blockchain/info")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["success"], false);
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("Network error"), "{}", error);
    assert!(error.to_lowercase().contains("refused"), "{}", error);
}

#[tokio::test]
async fn test_upstream_credential_header() {
    let (addr, node) = MockNode::with_credential("upstream-secret")
        .spawn()
        .await
        .unwrap();
    let url = format!("http://{}", addr);

    let rpc = RpcClient::new(url.clone(), "upstream-secret", Duration::from_secs(5)).unwrap();
    let app = create_router(AppState::new(rpc, TEST_API_KEY));
    let (status, _) = send(&app, get("/blockchain/blockcount")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(node.call_count().await, 1);

    // Gateway rejection is not a JSON-RPC envelope, so it is a transport-level failure
    let rpc = RpcClient::new(url, "wrong", Duration::from_secs(5)).unwrap();
    let app = create_router(AppState::new(rpc, TEST_API_KEY));
    let (status, json) = send(&app, get("/blockchain/blockcount")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["success"], false);
    assert_eq!(node.call_count().await, 1);
}

#[tokio::test]
async fn test_blank_path_params_rejected_without_rpc() {
    let (app, node) = create_test_app().await;

    for path in [
        "/transaction/%20",
        "/transaction/%20/raw",
        "/address/validate/%20",
        "/blockchain/block/%20",
        "/operation/%20/status",
    ] {
        let (status, json) = send(&app, get(path)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("required"), "{}", path);
    }

    // Empty segments do not match a route at all
    for path in ["/transaction/", "/address/validate/"] {
        let (status, json) = send(&app, get(path)).await;
        assert!(status.as_u16() >= 400, "{}", path);
        assert_eq!(json["success"], false);
    }

    assert_eq!(node.call_count().await, 0);
}

#[tokio::test]
async fn test_undecodable_path_param_uses_envelope() {
    let (app, node) = create_test_app().await;

    for path in ["/transaction/%FF", "/address/validate/%FF", "/transaction/%FF/raw"] {
        let (status, json) = send(&app, get(path)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
    }

    assert_eq!(node.call_count().await, 0);
}

#[tokio::test]
async fn test_wrong_method_uses_envelope() {
    let (app, node) = create_test_app().await;

    let (status, json) = send(&app, get("/wallet/newaddress")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("GET"));

    let (status, json) = send(&app, get("/transaction/send")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["success"], false);

    let (status, json) = send(&app, post_json("/wallet/balance", json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["success"], false);

    assert_eq!(node.call_count().await, 0);
}
