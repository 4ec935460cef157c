pub mod local_snapshot_store;
pub mod traits;
