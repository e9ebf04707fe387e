use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{
    Asset, FieldLiteral, PendingTrade, Trade, TradeCandidate, TradeResult, TradeSet,
};
use crate::store::TradeStore;

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T14:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Entry form for 2024-01-15 with the given asset, result and dollar P/L.
pub fn candidate(asset: Asset, result: TradeResult, dollar_pl: &str) -> TradeCandidate {
    let mut c = TradeCandidate::with_defaults(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    c.asset = asset.as_str().to_string();
    c.result = result.as_str().to_string();
    c.dollar_pl = dollar_pl.to_string();
    c
}

/// A persisted trade on 2024-01-15 at 09:30 with the given id and outcome.
pub fn make_trade(id: &str, asset: Asset, result: TradeResult, dollar_pl: f64) -> Trade {
    let mut details = candidate(asset, result, "0").validate().unwrap();
    details.dollar_pl = dollar_pl;
    details.into_trade(id, "user1", base_time())
}

/// A default NQ win placed at `date` (`YYYY-MM-DD`) and `time` (`HH:MM`).
pub fn trade_on(id: &str, date: &str, time: &str) -> Trade {
    let mut c = candidate(Asset::NQ, TradeResult::Win, "10");
    c.date = date.to_string();
    c.entry_time = time.to_string();
    c.validate().unwrap().into_trade(id, "user1", base_time())
}

/// Config with no remote store and the cache under `dir`.
pub fn test_config(dir: &Path) -> Config {
    let cache_dir = dir.to_string_lossy().to_string();
    Config::from_lookup(|key| match key {
        "CACHE_DIR" => Some(cache_dir.clone()),
        "LOG_LEVEL" => Some("error".to_string()),
        _ => None,
    })
}

/// In-memory remote store that can be switched into failure modes.
#[derive(Default)]
pub struct MockStore {
    trades: Mutex<Vec<Trade>>,
    failing: AtomicBool,
    rejecting: AtomicBool,
    next_id: AtomicU64,
    inserts: AtomicUsize,
}

impl MockStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// Replaces the stored trades.
    pub fn seed(&self, trades: Vec<Trade>) {
        *self.trades.lock().unwrap() = trades;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TradeStore for MockStore {
    async fn list(&self) -> Result<TradeSet, StoreError> {
        self.check_online()?;
        Ok(TradeSet::new(self.trades.lock().unwrap().clone()))
    }

    async fn insert(&self, pending: &PendingTrade) -> Result<Trade, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("mock constraint violation".to_string()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let trade = pending.clone().into_trade(format!("remote-{}", n));
        self.trades.lock().unwrap().push(trade.clone());
        Ok(trade)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.trades.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }
}
