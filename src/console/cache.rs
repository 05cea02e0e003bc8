//! Locally owned view state for every remote query.
//!
//! Each remote view lives in its own slot; a mutation invalidates exactly
//! the slots it affects and the refresh pass refetches invalidated slots.
//! Fetches are independent and may settle in any order — a slot renders a
//! loading marker until it has held data at least once.

use std::time::Instant;

use tokio::sync::RwLock;

use crate::models::history::HistoryItem;
use crate::models::pair::MarketPair;
use crate::models::principal::Principal;
use crate::models::state::{BotState, QuoteInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Pairs,
    History,
    BotState,
    QuoteInfo,
    Admins,
}

impl QueryKey {
    pub const ALL: [QueryKey; 5] = [
        QueryKey::Pairs,
        QueryKey::History,
        QueryKey::BotState,
        QueryKey::QuoteInfo,
        QueryKey::Admins,
    ];
}

/// One cached remote view. Starts stale so the first refresh pass fetches
/// it; a failed fetch clears the stale flag without data, so nothing
/// retries until the operator invalidates again.
#[derive(Debug)]
pub struct Query<T> {
    data: Option<T>,
    fetched_at: Option<Instant>,
    stale: bool,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            data: None,
            fetched_at: None,
            stale: true,
        }
    }
}

impl<T> Query<T> {
    pub fn set(&mut self, value: T) {
        self.data = Some(value);
        self.fetched_at = Some(Instant::now());
        self.stale = false;
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// A fetch failed: stop refetching, keep whatever data was there.
    pub fn mark_failed(&mut self) {
        self.stale = false;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_none()
    }

    pub fn needs_fetch(&self) -> bool {
        self.stale
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }
}

/// All cached views, one slot per [`QueryKey`].
#[derive(Debug, Default)]
pub struct QueryCache {
    pub pairs: RwLock<Query<Vec<MarketPair>>>,
    pub history: RwLock<Query<Vec<HistoryItem>>>,
    pub bot_state: RwLock<Query<BotState>>,
    pub quote_info: RwLock<Query<QuoteInfo>>,
    pub admins: RwLock<Query<Vec<Principal>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn invalidate(&self, key: QueryKey) {
        match key {
            QueryKey::Pairs => self.pairs.write().await.invalidate(),
            QueryKey::History => self.history.write().await.invalidate(),
            QueryKey::BotState => self.bot_state.write().await.invalidate(),
            QueryKey::QuoteInfo => self.quote_info.write().await.invalidate(),
            QueryKey::Admins => self.admins.write().await.invalidate(),
        }
    }

    pub async fn invalidate_many(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(*key).await;
        }
    }

    pub async fn invalidate_all(&self) {
        self.invalidate_many(&QueryKey::ALL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_lifecycle() {
        let mut query: Query<u32> = Query::default();
        assert!(query.needs_fetch());
        assert!(query.is_loading());

        query.set(7);
        assert!(!query.needs_fetch());
        assert!(!query.is_loading());
        assert_eq!(query.data(), Some(&7));

        query.invalidate();
        assert!(query.needs_fetch());
        // Old data stays visible while the refetch is pending.
        assert_eq!(query.data(), Some(&7));
    }

    #[test]
    fn failed_fetch_does_not_retry() {
        let mut query: Query<u32> = Query::default();
        query.mark_failed();
        assert!(!query.needs_fetch());
        assert!(query.is_loading());
    }

    #[tokio::test]
    async fn invalidate_targets_one_slot() {
        let cache = QueryCache::new();
        cache.pairs.write().await.set(vec![]);
        cache.admins.write().await.set(vec![]);

        cache.invalidate(QueryKey::Pairs).await;
        assert!(cache.pairs.read().await.needs_fetch());
        assert!(!cache.admins.read().await.needs_fetch());
    }
}
