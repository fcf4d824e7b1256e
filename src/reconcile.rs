//! Reconciliation of feed records against a marketplace's offer ids

use std::collections::HashSet;

use log::debug;

use crate::error::Result;
use crate::feed::FeedRecord;
use crate::normalize::{normalize_price, normalize_quantity};

/// Stock count to push for one offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub offer_id: String,
    pub quantity: i64,
}

/// Whole-unit price to push for one offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    pub offer_id: String,
    pub price: String,
}

/// Offer ids split into those the feed covers and those it omits
#[derive(Debug)]
pub struct Reconciliation<'a> {
    /// Feed records with a known offer id, in feed order
    pub matched: Vec<&'a FeedRecord>,
    /// Offer ids absent from the feed, in marketplace order
    pub unmatched: Vec<String>,
}

/// Match feed records against the offer ids a marketplace reports.
///
/// Records with unknown codes are dropped. When a code repeats in the feed
/// only its first row counts. Duplicate offer ids collapse to one.
pub fn reconcile<'a>(records: &'a [FeedRecord], offer_ids: &[String]) -> Reconciliation<'a> {
    let mut pending: HashSet<&str> = offer_ids.iter().map(String::as_str).collect();

    let matched: Vec<&FeedRecord> = records
        .iter()
        .filter(|record| pending.remove(record.code.as_str()))
        .collect();

    let mut unmatched = Vec::with_capacity(pending.len());
    for id in offer_ids {
        if pending.remove(id.as_str()) {
            unmatched.push(id.clone());
        }
    }

    debug!(
        "Reconciled {} feed records against {} offers: {} matched, {} missing from feed",
        records.len(),
        offer_ids.len(),
        matched.len(),
        unmatched.len()
    );

    Reconciliation { matched, unmatched }
}

impl Reconciliation<'_> {
    /// Number of distinct offer ids covered by this reconciliation
    pub fn offer_count(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    /// One stock level per offer id: feed quantity when matched, zero otherwise
    pub fn stock_levels(&self) -> Result<Vec<StockLevel>> {
        let mut levels = Vec::with_capacity(self.offer_count());
        for record in &self.matched {
            levels.push(StockLevel {
                offer_id: record.code.clone(),
                quantity: normalize_quantity(&record.quantity)?,
            });
        }
        levels.extend(self.unmatched.iter().map(|id| StockLevel {
            offer_id: id.clone(),
            quantity: 0,
        }));
        Ok(levels)
    }

    /// Prices for matched offers only
    pub fn price_levels(&self) -> Vec<PriceLevel> {
        self.matched
            .iter()
            .map(|record| PriceLevel {
                offer_id: record.code.clone(),
                price: normalize_price(&record.price),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
