/// Persisted match result models.
pub mod models;
/// Result storage backends.
pub mod result_store;
/// Storage abstraction layer shared by every backend.
pub mod storage;
