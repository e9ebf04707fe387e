use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use smt_journal::error::StoreError;
use smt_journal::models::{Asset, FieldLiteral, PendingTrade, Trade, TradeCandidate, TradeResult, TradeSet};
use smt_journal::store::TradeStore;

/// Entry form for 2024-01-15 with the given asset, result and dollar P/L.
pub fn candidate(asset: Asset, result: TradeResult, dollar_pl: &str) -> TradeCandidate {
    let mut c = TradeCandidate::with_defaults(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    c.asset = asset.as_str().to_string();
    c.result = result.as_str().to_string();
    c.dollar_pl = dollar_pl.to_string();
    c
}

/// Remote store double that keeps rows in memory and can go offline.
#[derive(Default)]
pub struct FlakyStore {
    rows: Mutex<Vec<Trade>>,
    offline: AtomicBool,
    next_id: AtomicU64,
}

impl FlakyStore {
    pub fn offline() -> Self {
        let store = Self::default();
        store.set_offline(true);
        store
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TradeStore for FlakyStore {
    async fn list(&self) -> Result<TradeSet, StoreError> {
        self.online()?;
        Ok(TradeSet::new(self.rows.lock().unwrap().clone()))
    }

    async fn insert(&self, pending: &PendingTrade) -> Result<Trade, StoreError> {
        self.online()?;
        let id = 1000 + self.next_id.fetch_add(1, Ordering::SeqCst);
        let trade = pending.clone().into_trade(id.to_string());
        self.rows.lock().unwrap().push(trade.clone());
        Ok(trade)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.online()?;
        self.rows.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }
}
