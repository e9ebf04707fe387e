use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{PendingTrade, Trade, TradeSet};
use crate::store::TradeStore;

/// Trade table behind a Supabase (PostgREST) REST endpoint.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseStore {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: cfg.supabase_url.trim_end_matches('/').to_string(),
            api_key: cfg.supabase_anon_key.clone(),
            table: cfg.trades_table.clone(),
        })
    }

    fn collection_url(&self) -> Result<String, StoreError> {
        if self.base_url.is_empty() {
            return Err(StoreError::Unavailable(
                "remote store is not configured".to_string(),
            ));
        }
        Ok(format!("{}/rest/v1/{}", self.base_url, self.table))
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, op: &str, req: RequestBuilder) -> Result<Response, StoreError> {
        self.authorized(req)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{} request failed: {}", op, e)))
    }

    async fn check(op: &str, resp: Response, rejectable: bool) -> Result<Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(status_error(op, status, &body, rejectable))
    }

    async fn decode<T: DeserializeOwned>(op: &str, resp: Response) -> Result<T, StoreError> {
        resp.json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{} response unreadable: {}", op, e)))
    }
}

/// Maps a non-success status to the store error taxonomy. Only inserts can
/// be rejected; auth, routing, throttling and server faults are treated as
/// the service being unavailable.
pub fn status_error(op: &str, status: StatusCode, body: &str, rejectable: bool) -> StoreError {
    let detail = format!("{} failed with {}: {}", op, status, body);
    let unavailable = status.is_server_error()
        || matches!(
            status,
            StatusCode::UNAUTHORIZED
                | StatusCode::FORBIDDEN
                | StatusCode::NOT_FOUND
                | StatusCode::REQUEST_TIMEOUT
                | StatusCode::TOO_MANY_REQUESTS
        );

    if rejectable && status.is_client_error() && !unavailable {
        StoreError::Rejected(detail)
    } else {
        StoreError::Unavailable(detail)
    }
}

#[async_trait]
impl TradeStore for SupabaseStore {
    async fn list(&self) -> Result<TradeSet, StoreError> {
        let url = self.collection_url()?;
        let req = self
            .client
            .get(url)
            .query(&[("select", "*"), ("order", "date.desc")]);

        let resp = self.send("list", req).await?;
        let resp = Self::check("list", resp, false).await?;
        let rows: Vec<Trade> = Self::decode("list", resp).await?;

        debug!("Remote list returned {} trades", rows.len());
        Ok(TradeSet::new(rows))
    }

    async fn insert(&self, pending: &PendingTrade) -> Result<Trade, StoreError> {
        let url = self.collection_url()?;
        let req = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(&[pending]);

        let resp = self.send("insert", req).await?;
        let resp = Self::check("insert", resp, true).await?;
        let rows: Vec<Trade> = Self::decode("insert", resp).await?;

        rows.into_iter().next().ok_or_else(|| {
            StoreError::Unavailable("insert returned no representation".to_string())
        })
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let url = self.collection_url()?;
        let req = self
            .client
            .delete(url)
            .query(&[("id", format!("eq.{}", id))]);

        let resp = self.send("delete", req).await?;
        Self::check("delete", resp, false).await?;
        Ok(())
    }
}
