//! Tests for feed/offer reconciliation.

use std::collections::HashSet;

use super::*;
use crate::error::SyncError;

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn stock(offer_id: &str, quantity: i64) -> StockLevel {
    StockLevel {
        offer_id: offer_id.to_string(),
        quantity,
    }
}

#[test]
fn feed_offer_and_missing_offer() {
    let offers = ids(&["001", "002"]);
    let records = vec![FeedRecord::new("001", "10", "5'990.00 руб.")];

    let reconciliation = reconcile(&records, &offers);

    assert_eq!(
        reconciliation.stock_levels().unwrap(),
        vec![stock("001", 10), stock("002", 0)]
    );
    assert_eq!(
        reconciliation.price_levels(),
        vec![PriceLevel {
            offer_id: "001".to_string(),
            price: "5990".to_string(),
        }]
    );
}

#[test]
fn unknown_feed_codes_are_dropped() {
    let offers = ids(&["001"]);
    let records = vec![
        FeedRecord::new("999", "5", "100.00"),
        FeedRecord::new("001", ">10", "200.00"),
    ];

    let reconciliation = reconcile(&records, &offers);

    assert_eq!(reconciliation.stock_levels().unwrap(), vec![stock("001", 100)]);
    assert_eq!(reconciliation.price_levels().len(), 1);
    assert_eq!(reconciliation.price_levels()[0].offer_id, "001");
}

#[test]
fn caller_offer_ids_are_untouched() {
    let offers = ids(&["001", "002", "003"]);
    let records = vec![FeedRecord::new("002", "4", "10.00")];

    let _ = reconcile(&records, &offers);

    assert_eq!(offers, ids(&["001", "002", "003"]));
}

#[test]
fn repeated_feed_code_counts_once() {
    let offers = ids(&["001"]);
    let records = vec![
        FeedRecord::new("001", "3", "100.00"),
        FeedRecord::new("001", "7", "200.00"),
    ];

    let reconciliation = reconcile(&records, &offers);

    assert_eq!(reconciliation.stock_levels().unwrap(), vec![stock("001", 3)]);
    assert_eq!(reconciliation.price_levels()[0].price, "100");
}

#[test]
fn repeated_offer_id_appears_once() {
    let offers = ids(&["001", "002", "002"]);
    let reconciliation = reconcile(&[], &offers);

    assert_eq!(reconciliation.unmatched, ids(&["001", "002"]));
    assert_eq!(reconciliation.offer_count(), 2);
}

#[test]
fn stock_payload_covers_every_offer_exactly_once() {
    let offers: Vec<String> = (0..50).map(|i| format!("{i:03}")).collect();
    let records: Vec<FeedRecord> = (0..80)
        .step_by(3)
        .map(|i| FeedRecord::new(&format!("{i:03}"), "2", "1.00"))
        .collect();

    let levels = reconcile(&records, &offers).stock_levels().unwrap();

    assert_eq!(levels.len(), offers.len());
    let seen: HashSet<&str> = levels.iter().map(|l| l.offer_id.as_str()).collect();
    assert_eq!(seen.len(), offers.len());
    for level in &levels {
        let n: usize = level.offer_id.parse().unwrap();
        let expected = if n % 3 == 0 { 2 } else { 0 };
        assert_eq!(level.quantity, expected, "offer {}", level.offer_id);
    }
}

#[test]
fn single_item_sentinel_zeroes_stock() {
    let offers = ids(&["001"]);
    let records = vec![FeedRecord::new("001", "1", "100.00")];

    let levels = reconcile(&records, &offers).stock_levels().unwrap();
    assert_eq!(levels, vec![stock("001", 0)]);
}

#[test]
fn bad_quantity_fails_stock_levels() {
    let offers = ids(&["001"]);
    let records = vec![FeedRecord::new("001", "под заказ", "100.00")];

    let err = reconcile(&records, &offers).stock_levels().unwrap_err();
    assert!(matches!(err, SyncError::InvalidQuantity(_)));
}

#[test]
fn empty_feed_zeroes_everything() {
    let offers = ids(&["a", "b"]);
    let reconciliation = reconcile(&[], &offers);

    assert_eq!(
        reconciliation.stock_levels().unwrap(),
        vec![stock("a", 0), stock("b", 0)]
    );
    assert!(reconciliation.price_levels().is_empty());
}
