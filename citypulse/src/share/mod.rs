//! Share links: a keyed store of place snapshots so one user can hand a place to another.
//!
//! [`ShareStore`] is the storage seam; [`InMemoryShareStore`] keeps entries for the life of the
//! process. Ids are short, unique within the store, and never reused.

mod in_memory;

pub use in_memory::InMemoryShareStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ShareError;
use crate::schema::lenient_f64;

/// Characters of a uuid v4 used as a share id.
pub const SHARE_ID_LEN: usize = 8;

/// Place the client wants to share. Every field is optional; coordinates may arrive as
/// numbers or numeric strings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ShareRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

/// Stored snapshot, as returned to whoever opens the link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SharedLocation {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time: Option<String>,
    pub cuisine: Option<String>,
    pub severity: Option<String>,
    pub shared_at: DateTime<Utc>,
}

impl SharedLocation {
    pub fn new(id: String, request: ShareRequest, shared_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: request.name,
            kind: request.kind,
            description: request.description,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
            time: request.time,
            cuisine: request.cuisine,
            severity: request.severity,
            shared_at,
        }
    }

    /// Relative path of the page that opens this entry.
    pub fn share_path(&self) -> String {
        format!("/shared/{}", self.id)
    }
}

/// Keyed storage of shared places.
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// Stores a snapshot under a fresh id and returns it.
    async fn put(&self, request: ShareRequest) -> Result<SharedLocation, ShareError>;

    /// Entry for `id`, or `None` when unknown.
    async fn get(&self, id: &str) -> Result<Option<SharedLocation>, ShareError>;

    /// All ids, oldest first.
    async fn list_ids(&self) -> Result<Vec<String>, ShareError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_accepts_string_coordinates() {
        let r: ShareRequest = serde_json::from_value(json!({
            "name": "Cafe", "type": "restaurant", "latitude": "30.5", "longitude": -97.8
        }))
        .unwrap();
        assert_eq!(r.latitude, Some(30.5));
        assert_eq!(r.longitude, Some(-97.8));
        assert_eq!(r.kind.as_deref(), Some("restaurant"));
    }

    #[test]
    fn snapshot_serializes_absent_fields_as_null() {
        let shared = SharedLocation::new(
            "ab12cd34".into(),
            ShareRequest {
                name: Some("Cafe".into()),
                ..ShareRequest::default()
            },
            Utc::now(),
        );
        let v = serde_json::to_value(&shared).unwrap();
        assert_eq!(v["name"], "Cafe");
        assert!(v["cuisine"].is_null());
        assert!(v["shared_at"].is_string());
        assert_eq!(shared.share_path(), "/shared/ab12cd34");
    }
}
