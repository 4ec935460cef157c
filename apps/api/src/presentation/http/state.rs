use crate::{
    config::Config,
    infrastructure::{ml::traits::ImageAnalyzer, storage::traits::SnapshotStore},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn ImageAnalyzer>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub config: Config,
}
