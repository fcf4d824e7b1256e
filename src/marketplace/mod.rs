//! Marketplace API clients for pushing stocks and prices
//!
//! Each client lists the offers a seller account has registered and accepts
//! batches of stock and price updates. The wire formats differ per
//! marketplace; the sync driver only sees the [`Marketplace`] trait.

mod ozon;
mod yandex;

use std::num::NonZeroUsize;

use crate::error::Result;
use crate::reconcile::{PriceLevel, StockLevel};

pub use ozon::{OzonSeller, OZON_API_URL};
pub use yandex::{YandexCampaign, YandexMarket, YANDEX_API_URL};

/// Largest payloads each update endpoint accepts per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub stocks: NonZeroUsize,
    pub prices: NonZeroUsize,
}

/// A seller account on one marketplace
#[allow(async_fn_in_trait)]
pub trait Marketplace {
    /// Label used in logs and reports
    fn name(&self) -> &str;

    fn limits(&self) -> BatchLimits;

    /// All offer ids registered for this account, following pagination to the end
    async fn offer_ids(&self) -> Result<Vec<String>>;

    /// Submit one batch of stock levels
    async fn push_stocks(&self, batch: &[StockLevel]) -> Result<()>;

    /// Submit one batch of prices
    async fn push_prices(&self, batch: &[PriceLevel]) -> Result<()>;
}
