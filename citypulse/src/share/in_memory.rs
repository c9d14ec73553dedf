//! In-memory share store (process lifetime).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ShareRequest, ShareStore, SharedLocation, SHARE_ID_LEN};
use crate::error::ShareError;

#[derive(Default)]
struct Entries {
    by_id: HashMap<String, SharedLocation>,
    order: Vec<String>,
}

/// Share store backed by a map behind a tokio `RwLock`.
///
/// **Interaction**: Implements `ShareStore`; the server's default backend.
#[derive(Default)]
pub struct InMemoryShareStore {
    entries: RwLock<Entries>,
}

impl InMemoryShareStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SHARE_ID_LEN)
        .collect()
}

#[async_trait]
impl ShareStore for InMemoryShareStore {
    async fn put(&self, request: ShareRequest) -> Result<SharedLocation, ShareError> {
        let mut entries = self.entries.write().await;
        let mut id = short_id();
        while entries.by_id.contains_key(&id) {
            id = short_id();
        }
        let shared = SharedLocation::new(id.clone(), request, Utc::now());
        entries.by_id.insert(id.clone(), shared.clone());
        entries.order.push(id);
        debug!(id = %shared.id, "location shared");
        Ok(shared)
    }

    async fn get(&self, id: &str) -> Result<Option<SharedLocation>, ShareError> {
        Ok(self.entries.read().await.by_id.get(id).cloned())
    }

    async fn list_ids(&self) -> Result<Vec<String>, ShareError> {
        Ok(self.entries.read().await.order.clone())
    }
}
