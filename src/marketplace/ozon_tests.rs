//! Tests for the Ozon seller client.

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::error::SyncError;

fn seller_with_mock(mock_uri: &str) -> OzonSeller {
    let mut seller = OzonSeller::new("client-1".to_string(), "key-1".to_string());
    seller.base_url = mock_uri.to_string();
    seller
}

fn stock(offer_id: &str, quantity: i64) -> StockLevel {
    StockLevel {
        offer_id: offer_id.to_string(),
        quantity,
    }
}

// ── construction ─────────────────────────────────────────────────────

#[test]
fn creates_seller_with_default_base_url() {
    let seller = OzonSeller::new("id".to_string(), "key".to_string());
    assert_eq!(seller.base_url, "https://api-seller.ozon.ru");
    assert_eq!(seller.client_id, "id");
    assert_eq!(seller.api_key, "key");
}

#[test]
fn batch_limits_match_endpoint_caps() {
    let seller = OzonSeller::new("id".to_string(), "key".to_string());
    let limits = seller.limits();
    assert_eq!(limits.stocks.get(), 100);
    assert_eq!(limits.prices.get(), 1000);
}

// ── payload shape ────────────────────────────────────────────────────

#[test]
fn price_items_carry_fixed_fields() {
    let levels = vec![PriceLevel {
        offer_id: "001".to_string(),
        price: "5990".to_string(),
    }];

    let value = serde_json::to_value(price_items(&levels)).unwrap();

    assert_eq!(
        value,
        json!([{
            "auto_action_enabled": "UNKNOWN",
            "currency_code": "RUB",
            "offer_id": "001",
            "old_price": "0",
            "price": "5990"
        }])
    );
}

#[test]
fn stock_items_map_quantity() {
    let levels = vec![stock("001", 10), stock("002", 0)];
    let value = serde_json::to_value(stock_items(&levels)).unwrap();
    assert_eq!(
        value,
        json!([
            { "offer_id": "001", "stock": 10 },
            { "offer_id": "002", "stock": 0 }
        ])
    );
}

// ── offer_ids ────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_offers_until_total_reached() {
    let mock_server = MockServer::start().await;
    let seller = seller_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/v2/product/list"))
        .and(header("Client-Id", "client-1"))
        .and(header("Api-Key", "key-1"))
        .and(body_partial_json(json!({
            "filter": { "visibility": "ALL" },
            "last_id": "",
            "limit": 1000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "items": [{ "product_id": 1, "offer_id": "001" }, { "product_id": 2, "offer_id": "002" }],
                "total": 3,
                "last_id": "page-2"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/product/list"))
        .and(body_partial_json(json!({ "last_id": "page-2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "items": [{ "product_id": 3, "offer_id": "003" }],
                "total": 3,
                "last_id": "page-3"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ids = seller.offer_ids().await.unwrap();
    assert_eq!(ids, vec!["001", "002", "003"]);
}

#[tokio::test]
async fn empty_page_stops_listing() {
    let mock_server = MockServer::start().await;
    let seller = seller_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/v2/product/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "items": [], "total": 5, "last_id": "" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ids = seller.offer_ids().await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn listing_error_status_is_reported() {
    let mock_server = MockServer::start().await;
    let seller = seller_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/v2/product/list"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid Api-Key"))
        .mount(&mock_server)
        .await;

    let err = seller.offer_ids().await.unwrap_err();
    match err {
        SyncError::HttpStatus { status, body, .. } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "invalid Api-Key");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

// ── push_stocks / push_prices ────────────────────────────────────────

#[tokio::test]
async fn pushes_stock_batch() {
    let mock_server = MockServer::start().await;
    let seller = seller_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/v1/product/import/stocks"))
        .and(header("Client-Id", "client-1"))
        .and(body_json(json!({
            "stocks": [
                { "offer_id": "001", "stock": 100 },
                { "offer_id": "002", "stock": 0 }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "product_id": 1, "offer_id": "001", "updated": true, "errors": [] },
                { "product_id": 2, "offer_id": "002", "updated": true, "errors": [] }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    seller
        .push_stocks(&[stock("001", 100), stock("002", 0)])
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_items_do_not_fail_the_batch() {
    let mock_server = MockServer::start().await;
    let seller = seller_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/v1/product/import/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{
                "product_id": 0,
                "offer_id": "001",
                "updated": false,
                "errors": [{ "code": "PRODUCT_NOT_FOUND", "message": "not found" }]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let prices = vec![PriceLevel {
        offer_id: "001".to_string(),
        price: "5990".to_string(),
    }];
    seller.push_prices(&prices).await.unwrap();
}

#[tokio::test]
async fn price_push_server_error_fails() {
    let mock_server = MockServer::start().await;
    let seller = seller_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/v1/product/import/prices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let prices = vec![PriceLevel {
        offer_id: "001".to_string(),
        price: "5990".to_string(),
    }];
    let err = seller.push_prices(&prices).await.unwrap_err();
    assert!(matches!(err, SyncError::HttpStatus { .. }));
}
