//! Process-local result store, used when no database is configured.

use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::dao::{models::MatchResultEntity, result_store::ResultStore, storage::StorageResult};

/// Keeps recorded results in memory, keyed by match id in recording order.
#[derive(Clone, Default)]
pub struct InMemoryResultStore {
    results: Arc<RwLock<IndexMap<String, MatchResultEntity>>>,
}

impl InMemoryResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for InMemoryResultStore {
    fn record_result(&self, result: MatchResultEntity) -> BoxFuture<'static, StorageResult<()>> {
        let results = self.results.clone();
        Box::pin(async move {
            let mut guard = results.write().await;
            // Re-recording a match moves it to the end, as a fresh insert would.
            guard.shift_remove(&result.match_id);
            guard.insert(result.match_id.clone(), result);
            Ok(())
        })
    }

    fn find_result(
        &self,
        match_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<MatchResultEntity>>> {
        let results = self.results.clone();
        Box::pin(async move { Ok(results.read().await.get(&match_id).cloned()) })
    }

    fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<MatchResultEntity>>> {
        let results = self.results.clone();
        Box::pin(async move { Ok(results.read().await.values().cloned().collect()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use uuid::Uuid;

    use super::*;
    use crate::state::scoring::{Side, Tally};

    fn result(match_id: &str, winner_id: &str) -> MatchResultEntity {
        MatchResultEntity {
            match_id: match_id.into(),
            session_id: Uuid::new_v4(),
            side_a: "alice".into(),
            side_b: "bob".into(),
            winner: Side::SideA,
            winner_id: winner_id.into(),
            score: "6-0".into(),
            sets_won_a: 1,
            sets_won_b: 0,
            completed_sets: vec![Tally::new(6, 0)],
            recorded_at: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn records_and_finds_results() {
        let store = InMemoryResultStore::new();
        store.record_result(result("m-1", "alice")).await.unwrap();

        let found = store.find_result("m-1".into()).await.unwrap().unwrap();
        assert_eq!(found.winner_id, "alice");
        assert!(store.find_result("m-2".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn re_recording_replaces_and_moves_to_end() {
        let store = InMemoryResultStore::new();
        store.record_result(result("m-1", "alice")).await.unwrap();
        store.record_result(result("m-2", "alice")).await.unwrap();
        store.record_result(result("m-1", "bob")).await.unwrap();

        let listed = store.list_results().await.unwrap();
        let ids = listed.iter().map(|r| r.match_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["m-2", "m-1"]);
        assert_eq!(listed[1].winner_id, "bob");
    }
}
