//! Synchronization between the remote trade store and the local cache.
//!
//! Every call decides afresh which store is authoritative: the remote store
//! when it answers, the local cache when it does not. Nothing about a
//! previous failure is remembered, so a recovered connection is used on the
//! very next call.

use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::{StoreError, ValidationError};
use crate::models::{PendingTrade, Trade, TradeCandidate, TradeSet};
use crate::store::{LocalCache, TradeStore};

/// Which store served a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    LocalCache,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote => write!(f, "remote"),
            Source::LocalCache => write!(f, "local cache"),
        }
    }
}

pub fn choose_source<T>(remote: &Result<T, StoreError>) -> Source {
    match remote {
        Ok(_) => Source::Remote,
        Err(_) => Source::LocalCache,
    }
}

/// Outcome of a load, with the source for display purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub trades: TradeSet,
    pub source: Source,
}

/// Synthesizes a local id from the creation time in epoch milliseconds,
/// bumped until it collides with nothing in `existing`.
pub fn local_id(created_at: DateTime<Utc>, existing: &TradeSet) -> String {
    let mut millis = created_at.timestamp_millis();
    while existing.contains_id(&millis.to_string()) {
        millis += 1;
    }
    millis.to_string()
}

pub struct Journal<S> {
    store: S,
    cache: LocalCache,
    user_id: String,
    // Held by every writer of the cache blob.
    mutation: Mutex<()>,
}

impl<S: TradeStore> Journal<S> {
    pub fn new(store: S, cache: LocalCache, user_id: impl Into<String>) -> Self {
        Self {
            store,
            cache,
            user_id: user_id.into(),
            mutation: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub async fn load(&self) -> TradeSet {
        self.load_with_source().await.trades
    }

    pub async fn load_with_source(&self) -> Loaded {
        let remote = self.store.list().await;
        let source = choose_source(&remote);

        let trades = match remote {
            Ok(trades) => {
                let _guard = self.mutation.lock().await;
                if let Err(e) = self.cache.write(&trades) {
                    warn!("Could not mirror remote trades into local cache: {}", e);
                }
                trades
            }
            Err(e) => {
                warn!("Loading trades from local cache: {}", e);
                self.cache.read_or_empty()
            }
        };

        debug!("Loaded {} trades from {}", trades.len(), source);
        Loaded { trades, source }
    }

    /// Validates and persists a candidate. `current` is the caller's last
    /// known trade set; it is only consulted when the remote store fails.
    ///
    /// The only error is a validation failure, in which case neither store
    /// has been touched.
    pub async fn save(
        &self,
        candidate: &TradeCandidate,
        current: &TradeSet,
    ) -> Result<Trade, ValidationError> {
        let trade = candidate.validate()?;
        let pending = PendingTrade::new(self.user_id.clone(), Utc::now(), trade);

        match self.store.insert(&pending).await {
            Ok(saved) => {
                info!(
                    "Trade {} saved: {} {} {}",
                    saved.id, saved.details.asset, saved.details.direction, saved.details.result
                );
                Ok(saved)
            }
            Err(e) => {
                warn!("Remote save failed, keeping trade locally: {}", e);
                Ok(self.save_locally(pending, current).await)
            }
        }
    }

    async fn save_locally(&self, pending: PendingTrade, current: &TradeSet) -> Trade {
        let _guard = self.mutation.lock().await;

        let mut trades = self.with_cached(current);
        let id = local_id(pending.created_at, &trades);
        let trade = pending.into_trade(id);
        trades.insert(trade.clone());

        match self.cache.write(&trades) {
            Ok(()) => info!("Trade {} saved to local cache", trade.id),
            Err(e) => error!("Trade {} could not be written to local cache: {}", trade.id, e),
        }
        trade
    }

    /// Deletes a trade by id. Unknown ids are a no-op.
    pub async fn delete_trade(&self, id: &str, current: &TradeSet) {
        match self.store.delete_by_id(id).await {
            Ok(()) => {
                info!("Trade {} deleted", id);
                self.forget_cached(id).await;
            }
            Err(e) => {
                warn!("Remote delete failed, deleting from local cache: {}", e);
                self.delete_locally(id, current).await;
            }
        }
    }

    async fn delete_locally(&self, id: &str, current: &TradeSet) {
        let _guard = self.mutation.lock().await;

        let mut trades = self.with_cached(current);
        if !trades.remove(id) {
            debug!("Trade {} not found locally, nothing to delete", id);
            return;
        }

        match self.cache.write(&trades) {
            Ok(()) => info!("Trade {} deleted from local cache", id),
            Err(e) => error!("Trade {} could not be removed from local cache: {}", id, e),
        }
    }

    // Drops `id` from the mirror once the remote store has deleted it.
    async fn forget_cached(&self, id: &str) {
        let _guard = self.mutation.lock().await;

        let mut cached = match self.cache.read() {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Could not read local cache to drop trade {}: {}", id, e);
                return;
            }
        };
        if !cached.remove(id) {
            return;
        }
        if let Err(e) = self.cache.write(&cached) {
            warn!("Trade {} deleted remotely but still in local cache: {}", id, e);
        }
    }

    // The caller's set plus anything only the cache knows about, so a
    // concurrent fallback's trade is not overwritten.
    fn with_cached(&self, current: &TradeSet) -> TradeSet {
        let mut trades = current.clone();
        trades.merge(self.cache.read_or_empty());
        trades
    }
}
