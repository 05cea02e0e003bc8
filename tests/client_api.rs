//! BotClient against a mock gateway: success paths, rejection mapping, and
//! exact-precision amounts over the wire.

use marketdesk::client::wire::AddPairRequest;
use marketdesk::client::BotClient;
use marketdesk::config::BotConfig;
use marketdesk::error::ConsoleError;
use marketdesk::models::principal::Principal;
use num_bigint::BigInt;
use rust_decimal_macros::dec;

fn client_for(server: &mockito::Server) -> BotClient {
    BotClient::new(&BotConfig {
        url: server.url(),
        auth_token: Some("secret".to_string()),
    })
}

#[tokio::test]
async fn fetches_pairs_with_exact_credits() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"[{
        "base": {"symbol": "GLD", "principal": "ryjl3-tyaaa-aaaaa-aaaba-cai",
                 "decimals": 8, "credits": "340282366920938463463374607431768211456"},
        "quote": {"symbol": "USD", "principal": "aaaaa-aa",
                  "decimals": 6, "credits": "1000000"},
        "spread": {"value": "0.05", "bias": "0.0"}
    }]"#;
    let mock = server
        .mock("GET", "/pairs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let pairs = client.pairs().await.unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(
        pairs[0].base.credits,
        "340282366920938463463374607431768211456"
            .parse::<BigInt>()
            .unwrap()
    );
    assert_eq!(pairs[0].spread.value, dec!(0.05));
    mock.assert_async().await;
}

#[tokio::test]
async fn query_rejection_carries_server_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/state")
        .with_status(500)
        .with_body(r#"{"error": "consensus stalled"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    match client.bot_state().await {
        Err(ConsoleError::Api(msg)) => assert_eq!(msg, "consensus stalled"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn query_rejection_falls_back_to_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admins")
        .with_status(503)
        .with_body("upstream down")
        .create_async()
        .await;

    let client = client_for(&server);
    match client.admins().await {
        Err(ConsoleError::Api(msg)) => assert!(msg.contains("503"), "{msg}"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn add_pair_posts_body_with_bearer_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/pairs")
        .match_header("authorization", "Bearer secret")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "principal": "ryjl3-tyaaa-aaaaa-aaaba-cai",
            "symbol": "GLD",
            "decimals": 8,
            "spread_value": "0.05"
        })))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let req = AddPairRequest {
        principal: Principal::from_text("ryjl3-tyaaa-aaaaa-aaaba-cai").unwrap(),
        symbol: "GLD".to_string(),
        decimals: 8,
        spread_value: dec!(0.05),
    };
    client.add_pair(&req).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn two_hundred_with_success_false_is_a_rejection() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/stop")
        .with_status(200)
        .with_body(r#"{"success": false, "message": "bot is not running"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    match client.stop_bot().await {
        Err(ConsoleError::Api(msg)) => assert_eq!(msg, "bot is not running"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn update_quote_balance_sends_raw_units_as_string() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/pairs/GLD/quote-balance")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "balance": "123456789123456789123456789"
        })))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let units: BigInt = "123456789123456789123456789".parse().unwrap();
    client.update_quote_balance("GLD", &units).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn remove_admin_addresses_by_principal() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/admins/aaaaa-aa")
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let admin = Principal::from_text("aaaaa-aa").unwrap();
    client.remove_admin(&admin).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn history_passes_row_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/history?limit=5")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server);
    let items = client.history(Some(5)).await.unwrap();
    assert!(items.is_empty());
    mock.assert_async().await;
}
