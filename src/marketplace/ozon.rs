//! Ozon seller API client

use std::num::NonZeroUsize;

use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BatchLimits, Marketplace};
use crate::error::Result;
use crate::http::{check_status, USER_AGENT};
use crate::reconcile::{PriceLevel, StockLevel};

pub const OZON_API_URL: &str = "https://api-seller.ozon.ru";

/// Products per listing page (API maximum)
const PAGE_LIMIT: u32 = 1000;

const STOCK_BATCH: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};
const PRICE_BATCH: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Serialize)]
struct ProductListRequest<'a> {
    filter: ProductFilter,
    last_id: &'a str,
    limit: u32,
}

#[derive(Debug, Serialize)]
struct ProductFilter {
    visibility: &'static str,
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    result: ProductListPage,
}

#[derive(Debug, Deserialize)]
struct ProductListPage {
    #[serde(default)]
    items: Vec<ProductListItem>,
    total: usize,
    #[serde(default)]
    last_id: String,
}

#[derive(Debug, Deserialize)]
struct ProductListItem {
    offer_id: String,
}

/// Stock entry for `/v1/product/import/stocks`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct OzonStock<'a> {
    pub offer_id: &'a str,
    pub stock: i64,
}

/// Price entry for `/v1/product/import/prices`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct OzonPrice<'a> {
    pub auto_action_enabled: &'static str,
    pub currency_code: &'static str,
    pub offer_id: &'a str,
    pub old_price: &'static str,
    pub price: &'a str,
}

#[derive(Debug, Serialize)]
struct StocksRequest<'a> {
    stocks: Vec<OzonStock<'a>>,
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    prices: Vec<OzonPrice<'a>>,
}

/// Per-offer outcome of an import call
#[derive(Debug, Deserialize)]
struct ImportResponse {
    #[serde(default)]
    result: Vec<ImportResult>,
}

#[derive(Debug, Deserialize)]
struct ImportResult {
    #[serde(default)]
    offer_id: String,
    #[serde(default)]
    updated: bool,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// Ozon seller account, authenticated with a client id and API key
pub struct OzonSeller {
    pub(crate) client: Client,
    pub(crate) client_id: String,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl OzonSeller {
    pub fn new(client_id: String, api_key: String) -> Self {
        info!("Creating Ozon seller client");
        Self {
            client: Client::new(),
            client_id,
            api_key,
            base_url: OZON_API_URL.to_string(),
        }
    }

    /// One page of the product list, starting after `last_id`
    async fn product_page(&self, last_id: &str) -> Result<ProductListPage> {
        let url = format!("{}/v2/product/list", self.base_url);
        debug!("Listing Ozon products after '{last_id}'");

        let request = ProductListRequest {
            filter: ProductFilter { visibility: "ALL" },
            last_id,
            limit: PAGE_LIMIT,
        };
        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .header("User-Agent", USER_AGENT)
            .json(&request)
            .send()
            .await?;

        let body: ProductListResponse = check_status(response).await?.json().await?;
        Ok(body.result)
    }

    async fn import<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<()> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .header("User-Agent", USER_AGENT)
            .json(payload)
            .send()
            .await?;

        let body: ImportResponse = check_status(response).await?.json().await?;
        for rejected in body.result.iter().filter(|r| !r.updated) {
            warn!(
                "Ozon did not update offer {}: {:?}",
                rejected.offer_id, rejected.errors
            );
        }
        Ok(())
    }
}

pub(crate) fn stock_items(batch: &[StockLevel]) -> Vec<OzonStock<'_>> {
    batch
        .iter()
        .map(|level| OzonStock {
            offer_id: &level.offer_id,
            stock: level.quantity,
        })
        .collect()
}

pub(crate) fn price_items(batch: &[PriceLevel]) -> Vec<OzonPrice<'_>> {
    batch
        .iter()
        .map(|level| OzonPrice {
            auto_action_enabled: "UNKNOWN",
            currency_code: "RUB",
            offer_id: &level.offer_id,
            old_price: "0",
            price: &level.price,
        })
        .collect()
}

impl Marketplace for OzonSeller {
    fn name(&self) -> &str {
        "Ozon"
    }

    fn limits(&self) -> BatchLimits {
        BatchLimits {
            stocks: STOCK_BATCH,
            prices: PRICE_BATCH,
        }
    }

    async fn offer_ids(&self) -> Result<Vec<String>> {
        let mut offer_ids = Vec::new();
        let mut last_id = String::new();

        loop {
            let page = self.product_page(&last_id).await?;
            let fetched = page.items.len();
            offer_ids.extend(page.items.into_iter().map(|item| item.offer_id));
            last_id = page.last_id;

            if offer_ids.len() >= page.total || fetched == 0 {
                if offer_ids.len() < page.total {
                    warn!(
                        "Ozon reported {} products but listing ended after {}",
                        page.total,
                        offer_ids.len()
                    );
                }
                break;
            }
        }

        info!("Fetched {} offer ids from Ozon", offer_ids.len());
        Ok(offer_ids)
    }

    async fn push_stocks(&self, batch: &[StockLevel]) -> Result<()> {
        let payload = StocksRequest {
            stocks: stock_items(batch),
        };
        self.import("/v1/product/import/stocks", &payload).await
    }

    async fn push_prices(&self, batch: &[PriceLevel]) -> Result<()> {
        let payload = PricesRequest {
            prices: price_items(batch),
        };
        self.import("/v1/product/import/prices", &payload).await
    }
}

#[cfg(test)]
#[path = "ozon_tests.rs"]
mod tests;
