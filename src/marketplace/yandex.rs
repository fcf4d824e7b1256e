//! Yandex Market partner API client
//!
//! One OAuth token covers several campaigns; each fulfilment program (FBS,
//! DBS) is its own campaign with its own warehouse, so stocks and prices are
//! pushed per [`YandexCampaign`].

use std::num::NonZeroUsize;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BatchLimits, Marketplace};
use crate::error::{Result, SyncError};
use crate::http::{check_status, USER_AGENT};
use crate::reconcile::{PriceLevel, StockLevel};

pub const YANDEX_API_URL: &str = "https://api.partner.market.yandex.ru";

/// Offer mappings per listing page
const PAGE_LIMIT: u32 = 200;

const STOCK_BATCH: NonZeroUsize = match NonZeroUsize::new(2000) {
    Some(n) => n,
    None => unreachable!(),
};
const PRICE_BATCH: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Deserialize)]
struct MappingResponse {
    result: MappingPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingPage {
    #[serde(default)]
    offer_mapping_entries: Vec<MappingEntry>,
    #[serde(default)]
    paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paging {
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MappingEntry {
    offer: MappedOffer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappedOffer {
    shop_sku: String,
}

/// Stock entry for `PUT /campaigns/{id}/offers/stocks`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SkuStock<'a> {
    pub sku: &'a str,
    pub warehouse_id: &'a str,
    pub items: [StockItem; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockItem {
    pub count: i64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub updated_at: String,
}

/// Price entry for `POST /campaigns/{id}/offer-prices/updates`
#[derive(Debug, Serialize)]
pub(crate) struct OfferPrice<'a> {
    pub id: &'a str,
    pub price: Price,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Price {
    pub value: u64,
    pub currency_id: &'static str,
}

#[derive(Debug, Serialize)]
struct StocksRequest<'a> {
    skus: Vec<SkuStock<'a>>,
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    offers: Vec<OfferPrice<'a>>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: Option<String>,
}

/// Yandex Market partner account
pub struct YandexMarket {
    pub(crate) client: Client,
    pub(crate) token: String,
    pub(crate) base_url: String,
}

impl YandexMarket {
    pub fn new(token: String) -> Self {
        info!("Creating Yandex Market client");
        Self {
            client: Client::new(),
            token,
            base_url: YANDEX_API_URL.to_string(),
        }
    }

    /// Bind a campaign and the warehouse its stocks belong to
    pub fn campaign(&self, label: &str, campaign_id: &str, warehouse_id: &str) -> YandexCampaign {
        YandexCampaign {
            client: self.client.clone(),
            token: self.token.clone(),
            base_url: self.base_url.clone(),
            name: format!("Yandex Market {label}"),
            campaign_id: campaign_id.to_string(),
            warehouse_id: warehouse_id.to_string(),
        }
    }
}

/// One Yandex Market campaign (fulfilment program)
pub struct YandexCampaign {
    client: Client,
    token: String,
    base_url: String,
    name: String,
    pub(crate) campaign_id: String,
    pub(crate) warehouse_id: String,
}

impl YandexCampaign {
    fn url(&self, endpoint: &str) -> String {
        format!("{}/campaigns/{}/{}", self.base_url, self.campaign_id, endpoint)
    }

    async fn mapping_page(&self, page_token: &str) -> Result<MappingPage> {
        let url = self.url("offer-mapping-entries");
        debug!("Listing {} offers, page token '{page_token}'", self.name);

        let limit = PAGE_LIMIT.to_string();
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .query(&[("page_token", page_token), ("limit", limit.as_str())])
            .send()
            .await?;

        let body: MappingResponse = check_status(response).await?.json().await?;
        Ok(body.result)
    }

    fn check_reply(&self, reply: StatusResponse) {
        match reply.status.as_deref() {
            Some("OK") => {}
            other => warn!("{} answered with status {:?}", self.name, other),
        }
    }
}

pub(crate) fn stock_items<'a>(
    batch: &'a [StockLevel],
    warehouse_id: &'a str,
    updated_at: DateTime<Utc>,
) -> Vec<SkuStock<'a>> {
    let updated_at = updated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    batch
        .iter()
        .map(|level| SkuStock {
            sku: &level.offer_id,
            warehouse_id,
            items: [StockItem {
                count: level.quantity,
                kind: "FIT",
                updated_at: updated_at.clone(),
            }],
        })
        .collect()
}

/// Prices must be whole roubles; an empty or non-numeric price fails the batch
pub(crate) fn price_items(batch: &[PriceLevel]) -> Result<Vec<OfferPrice<'_>>> {
    batch
        .iter()
        .map(|level| {
            let value = level
                .price
                .parse::<u64>()
                .map_err(|_| SyncError::InvalidPrice(level.price.clone(), level.offer_id.clone()))?;
            Ok(OfferPrice {
                id: &level.offer_id,
                price: Price {
                    value,
                    currency_id: "RUR",
                },
            })
        })
        .collect()
}

impl Marketplace for YandexCampaign {
    fn name(&self) -> &str {
        &self.name
    }

    fn limits(&self) -> BatchLimits {
        BatchLimits {
            stocks: STOCK_BATCH,
            prices: PRICE_BATCH,
        }
    }

    async fn offer_ids(&self) -> Result<Vec<String>> {
        let mut offer_ids = Vec::new();
        let mut page_token = String::new();

        loop {
            let page = self.mapping_page(&page_token).await?;
            offer_ids.extend(
                page.offer_mapping_entries
                    .into_iter()
                    .map(|entry| entry.offer.shop_sku),
            );
            match page.paging.next_page_token {
                Some(token) if !token.is_empty() => page_token = token,
                _ => break,
            }
        }

        info!("Fetched {} offer ids from {}", offer_ids.len(), self.name);
        Ok(offer_ids)
    }

    async fn push_stocks(&self, batch: &[StockLevel]) -> Result<()> {
        let payload = StocksRequest {
            skus: stock_items(batch, &self.warehouse_id, Utc::now()),
        };
        let response = self
            .client
            .put(self.url("offers/stocks"))
            .bearer_auth(&self.token)
            .header("User-Agent", USER_AGENT)
            .json(&payload)
            .send()
            .await?;

        let reply: StatusResponse = check_status(response).await?.json().await?;
        self.check_reply(reply);
        Ok(())
    }

    async fn push_prices(&self, batch: &[PriceLevel]) -> Result<()> {
        let payload = PricesRequest {
            offers: price_items(batch)?,
        };
        let response = self
            .client
            .post(self.url("offer-prices/updates"))
            .bearer_auth(&self.token)
            .header("User-Agent", USER_AGENT)
            .json(&payload)
            .send()
            .await?;

        let reply: StatusResponse = check_status(response).await?.json().await?;
        self.check_reply(reply);
        Ok(())
    }
}

#[cfg(test)]
#[path = "yandex_tests.rs"]
mod tests;
