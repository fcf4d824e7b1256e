//! Stock Sync - supplier feed to marketplace stock & prices
//!
//! Downloads the supplier's stock spreadsheet and pushes stock levels and
//! prices to the Ozon and Yandex Market seller accounts.

pub mod batch;
pub mod error;
pub mod feed;
pub mod http;
pub mod marketplace;
pub mod normalize;
pub mod reconcile;
pub mod sync;

pub use error::{Result, SyncError};
pub use feed::{FeedRecord, FeedSource};
pub use marketplace::{Marketplace, OzonSeller, YandexCampaign, YandexMarket};
pub use reconcile::{reconcile, PriceLevel, Reconciliation, StockLevel};
pub use sync::{sync_marketplace, SyncReport};
