pub mod local_cache;
pub mod supabase;

pub use local_cache::LocalCache;
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::{PendingTrade, Trade, TradeSet};

/// A network-addressable, persistent collection of trades.
///
/// Implementations enforce their own timeouts and report every transport
/// or server failure as [`StoreError::Unavailable`].
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// All trades, newest `date` first.
    async fn list(&self) -> Result<TradeSet, StoreError>;

    /// Persists a trade; the store assigns its id.
    async fn insert(&self, pending: &PendingTrade) -> Result<Trade, StoreError>;

    /// Deleting an id that does not exist succeeds.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: TradeStore + ?Sized> TradeStore for Arc<T> {
    async fn list(&self) -> Result<TradeSet, StoreError> {
        (**self).list().await
    }

    async fn insert(&self, pending: &PendingTrade) -> Result<Trade, StoreError> {
        (**self).insert(pending).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        (**self).delete_by_id(id).await
    }
}

#[async_trait]
impl<T: TradeStore + ?Sized> TradeStore for Box<T> {
    async fn list(&self) -> Result<TradeSet, StoreError> {
        (**self).list().await
    }

    async fn insert(&self, pending: &PendingTrade) -> Result<Trade, StoreError> {
        (**self).insert(pending).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        (**self).delete_by_id(id).await
    }
}
