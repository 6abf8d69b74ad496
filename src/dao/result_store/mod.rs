/// CouchDB-backed store.
#[cfg(feature = "couch-store")]
pub mod couchdb;
/// Process-local store.
pub mod memory;

use crate::dao::models::MatchResultEntity;
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence collaborator that records finished matches.
pub trait ResultStore: Send + Sync {
    /// Insert or replace the result recorded for `result.match_id`.
    fn record_result(&self, result: MatchResultEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_result(
        &self,
        match_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<MatchResultEntity>>>;
    fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<MatchResultEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
