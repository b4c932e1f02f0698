// crates/dashboard-server/tests/alpaca.rs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use dashboard_core::{DashboardError, DashboardPaths, OperatingMode, StatusAggregator};
use dashboard_server::alpaca::{endpoint, wire, AlpacaConnector};
use tokio::net::TcpListener;

#[test]
fn endpoint_appends_encoded_segments() {
    let url = endpoint("https://data.example.com", &["v2", "stocks", "BRK/B", "trades", "latest"]).unwrap();
    assert_eq!(url.as_str(), "https://data.example.com/v2/stocks/BRK%2FB/trades/latest");

    let url = endpoint("http://localhost:1234/base/", &["v2", "clock"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:1234/base/v2/clock");

    assert!(matches!(
        endpoint("not a url", &["v2"]),
        Err(DashboardError::BrokerUnavailable(_))
    ));
}

#[test]
fn account_body_decodes_string_amounts() {
    let body = r#"{
        "id": "abc",
        "cash": "1234.56",
        "portfolio_value": "9876.5",
        "buying_power": "2469.12",
        "pattern_day_trader": true,
        "daytrade_count": 2,
        "status": "ACTIVE"
    }"#;
    let account: wire::Account = serde_json::from_str(body).unwrap();
    let snapshot = account.into_snapshot().unwrap();

    assert_eq!(snapshot.cash, 1234.56);
    assert_eq!(snapshot.portfolio_value, 9876.5);
    assert_eq!(snapshot.buying_power, 2469.12);
    assert!(snapshot.pattern_day_trader);
    assert_eq!(snapshot.daytrade_count, 2);
}

#[test]
fn non_numeric_amount_is_broker_unavailable() {
    let account: wire::Account = serde_json::from_str(
        r#"{"cash": "lots", "portfolio_value": "1", "buying_power": "1"}"#,
    )
    .unwrap();

    match account.into_snapshot() {
        Err(DashboardError::BrokerUnavailable(msg)) => assert!(msg.contains("cash")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn positions_and_latest_trade_decode() {
    let position: wire::Position =
        serde_json::from_str(r#"{"symbol": "MA", "qty": "3", "market_value": "1276.80"}"#).unwrap();
    let position = position.into_position().unwrap();
    assert_eq!(position.symbol, "MA");
    assert_eq!(position.qty, 3.0);
    assert_eq!(position.market_value, 1276.80);

    let latest: wire::LatestTrade = serde_json::from_str(
        r#"{"symbol": "AAPL", "trade": {"t": "2025-10-27T15:59:59Z", "p": 176.1, "s": 100}}"#,
    )
    .unwrap();
    assert_eq!(latest.trade.price, 176.1);
}

/// Minimal stand-in for the broker REST API. Records the key header of
/// every request it sees.
#[derive(Clone, Default)]
struct StubBroker {
    seen_keys: Arc<Mutex<Vec<String>>>,
}

async fn stub_endpoint(State(stub): State<StubBroker>, uri: Uri, headers: HeaderMap) -> Response {
    if let Some(key) = headers.get("apca-api-key-id").and_then(|v| v.to_str().ok()) {
        stub.seen_keys.lock().unwrap().push(key.to_string());
    }

    let body = match uri.path() {
        "/v2/account" => {
            r#"{"cash":"5000.25","portfolio_value":"12000","buying_power":"10000.5","pattern_day_trader":false,"daytrade_count":1}"#
        }
        "/v2/clock" => {
            r#"{"timestamp":"2025-10-27T12:00:00-04:00","is_open":true,"next_open":"2025-10-28T09:30:00-04:00","next_close":"2025-10-27T16:00:00-04:00"}"#
        }
        "/v2/positions" => {
            r#"[{"symbol":"AAPL","qty":"10","market_value":"1760.00"},{"symbol":"MA","qty":"2","market_value":"851.20"}]"#
        }
        "/v2/stocks/AAPL/trades/latest" => r#"{"symbol":"AAPL","trade":{"p":176.0}}"#,
        _ => return (StatusCode::NOT_FOUND, r#"{"message":"not found"}"#).into_response(),
    };
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn spawn_stub_broker() -> (String, StubBroker) {
    let stub = StubBroker::default();
    let app = Router::new().fallback(stub_endpoint).with_state(stub.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await });
    (base, stub)
}

#[tokio::test]
async fn live_aggregation_against_stub_broker() {
    let (base, stub) = spawn_stub_broker().await;
    let dir = tempfile::tempdir().unwrap();
    let paths = DashboardPaths::in_dir(dir.path());
    std::fs::create_dir_all(paths.auth_file.parent().unwrap()).unwrap();
    std::fs::create_dir_all(paths.tickers_file.parent().unwrap()).unwrap();
    std::fs::write(
        &paths.auth_file,
        r#"{"APCA-API-KEY-ID": "PKSTUB", "APCA-API-SECRET-KEY": "hidden"}"#,
    )
    .unwrap();
    std::fs::write(&paths.tickers_file, "AAPL TSLA\n").unwrap();

    let connector = AlpacaConnector::new(base.clone(), base, Duration::from_secs(5));
    let aggregator = StatusAggregator::new(paths, Arc::new(connector));

    let state = aggregator.aggregate().await;

    assert_eq!(state.mode, OperatingMode::Live, "error: {:?}", state.error);
    assert_eq!(state.account.cash, 5000.25);
    assert_eq!(state.account.positions_count, 2);
    assert!(state.clock.is_open);

    assert_eq!(state.tickers.len(), 2);
    assert_eq!(state.tickers[0].symbol, "AAPL");
    assert_eq!(state.tickers[0].price, 176.0);
    assert!(state.tickers[0].resolved);
    assert_eq!(state.tickers[1].symbol, "TSLA");
    assert!(!state.tickers[1].resolved);

    let keys = stub.seen_keys.lock().unwrap();
    assert!(!keys.is_empty());
    assert!(keys.iter().all(|k| k == "PKSTUB"));
}

#[tokio::test]
async fn unreachable_broker_yields_error_mode() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let paths = DashboardPaths::in_dir(dir.path());
    std::fs::create_dir_all(paths.auth_file.parent().unwrap()).unwrap();
    std::fs::create_dir_all(paths.tickers_file.parent().unwrap()).unwrap();
    std::fs::write(
        &paths.auth_file,
        r#"{"APCA-API-KEY-ID": "PK", "APCA-API-SECRET-KEY": "S"}"#,
    )
    .unwrap();
    std::fs::write(&paths.tickers_file, "AAPL\n").unwrap();

    let connector = AlpacaConnector::new(base.clone(), base, Duration::from_secs(2));
    let state = StatusAggregator::new(paths, Arc::new(connector)).aggregate().await;

    assert_eq!(state.mode, OperatingMode::Error);
    assert!(state.error.is_some());
    assert!(state.tickers.is_empty());
}
