//! Sync driver: reconcile the feed against one marketplace and push the result

use log::info;

use crate::batch::batches;
use crate::error::Result;
use crate::feed::FeedRecord;
use crate::marketplace::Marketplace;
use crate::reconcile::reconcile;

/// Outcome of one marketplace sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub target: String,
    /// Distinct offer ids registered at the marketplace
    pub offers: usize,
    /// Offers found in the feed
    pub matched: usize,
    /// Offers absent from the feed, pushed with zero stock
    pub missing_from_feed: usize,
    pub stocks_pushed: usize,
    /// Pushed stock entries with a non-zero count
    pub in_stock: usize,
    pub prices_pushed: usize,
    pub stock_batches: usize,
    pub price_batches: usize,
}

/// Push stocks and then prices for every offer `marketplace` knows about.
///
/// Batches go out in order. A failure stops the run; batches already
/// accepted by the marketplace stay applied.
pub async fn sync_marketplace<M: Marketplace>(
    marketplace: &M,
    records: &[FeedRecord],
) -> Result<SyncReport> {
    let target = marketplace.name().to_string();
    let limits = marketplace.limits();

    let offer_ids = marketplace.offer_ids().await?;
    let reconciliation = reconcile(records, &offer_ids);
    info!(
        "{target}: {} offers, {} in feed, {} missing from feed",
        reconciliation.offer_count(),
        reconciliation.matched.len(),
        reconciliation.unmatched.len()
    );

    let stocks = reconciliation.stock_levels()?;
    let mut stock_batches = 0;
    for batch in batches(&stocks, limits.stocks) {
        marketplace.push_stocks(batch).await?;
        stock_batches += 1;
        info!("{target}: pushed stock batch {stock_batches} ({} items)", batch.len());
    }

    let prices = reconciliation.price_levels();
    let mut price_batches = 0;
    for batch in batches(&prices, limits.prices) {
        marketplace.push_prices(batch).await?;
        price_batches += 1;
        info!("{target}: pushed price batch {price_batches} ({} items)", batch.len());
    }

    let report = SyncReport {
        target,
        offers: reconciliation.offer_count(),
        matched: reconciliation.matched.len(),
        missing_from_feed: reconciliation.unmatched.len(),
        stocks_pushed: stocks.len(),
        in_stock: stocks.iter().filter(|s| s.quantity != 0).count(),
        prices_pushed: prices.len(),
        stock_batches,
        price_batches,
    };
    info!(
        "{}: sync finished, {} stocks ({} in stock) and {} prices pushed",
        report.target, report.stocks_pushed, report.in_stock, report.prices_pushed
    );
    Ok(report)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
