//! Local-info schema: the structural contract sent to the search service and the typed
//! structures its responses decode into.
//!
//! [`LOCAL_INFO_SCHEMA`] is the single JSON Schema value reused by every structured call site
//! (nearby discovery, user-query discovery, debug inspection). [`LocalInfo`] is its Rust shape;
//! [`decode_local_info`] turns a response `content` (structured value or JSON-encoded string)
//! into it.

mod decode;
mod normalize;

pub use decode::decode_local_info;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Secondary source for one item, present only when it differs from the official website.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Optional fields shared by events, restaurants and alerts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// WGS84 decimal degrees.
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
    /// WGS84 decimal degrees.
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
    /// Official website of the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<Citation>,
}

impl ItemDetails {
    /// Both coordinates, when present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// A live event (concert, festival, meetup...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Assigned by the search service; see [`LocalInfo::normalize`].
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(flatten)]
    pub details: ItemDetails,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(flatten)]
    pub details: ItemDetails,
}

/// Weather, traffic or safety alert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(flatten)]
    pub details: ItemDetails,
}

/// One retrieval result. Sequence order is the relevance order returned by the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalInfo {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<Event>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub restaurants: Vec<Restaurant>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alerts: Vec<Alert>,
}

impl LocalInfo {
    /// True when at least one category is non-empty.
    pub fn has_data(&self) -> bool {
        !self.events.is_empty() || !self.restaurants.is_empty() || !self.alerts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len() + self.restaurants.len() + self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_data()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a JSON number or a numeric string. Anything else (blank, null, unparsable text,
/// other JSON types) is absent, never an error.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match s.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                debug!(value = %s, "dropping unparsable coordinate");
                None
            }
        },
        Some(other) => {
            debug!(value = %other, "dropping non-numeric coordinate");
            None
        }
    })
}

/// Ids arrive as strings, occasionally as numbers; anything else is blank and gets a fresh id
/// during normalization.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn citation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "url": {"type": "string"},
            "title": {"type": "string"},
            "description": {"type": "string"}
        }
    })
}

fn item_schema(specific: &[(&str, Value)], required: &[&str]) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert("id".into(), json!({"type": "string"}));
    for (name, schema) in specific {
        properties.insert((*name).into(), schema.clone());
    }
    for name in ["address", "date", "time"] {
        properties.insert(name.into(), json!({"type": "string"}));
    }
    properties.insert("latitude".into(), json!({"type": "number"}));
    properties.insert("longitude".into(), json!({"type": "number"}));
    properties.insert("website".into(), json!({"type": "string"}));
    properties.insert("citation".into(), citation_schema());
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// JSON Schema constraining structured responses to the [`LocalInfo`] shape.
pub static LOCAL_INFO_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let text = || json!({"type": "string"});
    let event = item_schema(
        &[("name", text()), ("type", text()), ("description", text())],
        &["id", "name", "type", "description"],
    );
    let restaurant = item_schema(
        &[("name", text()), ("cuisine", text()), ("description", text())],
        &["id", "name", "description"],
    );
    let alert = item_schema(
        &[("title", text()), ("description", text()), ("severity", text())],
        &["id", "title", "description"],
    );
    json!({
        "type": "object",
        "properties": {
            "events": {"type": "array", "items": event},
            "restaurants": {"type": "array", "items": restaurant},
            "alerts": {"type": "array", "items": alert}
        },
        "required": ["events", "restaurants", "alerts"]
    })
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_all_three_categories() {
        let required = LOCAL_INFO_SCHEMA["required"].as_array().unwrap();
        let names: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(names, vec!["events", "restaurants", "alerts"]);
    }

    #[test]
    fn schema_items_carry_coordinates_and_citation() {
        for category in ["events", "restaurants", "alerts"] {
            let props = &LOCAL_INFO_SCHEMA["properties"][category]["items"]["properties"];
            assert_eq!(props["latitude"]["type"], "number", "{category}");
            assert_eq!(props["longitude"]["type"], "number", "{category}");
            assert_eq!(props["website"]["type"], "string", "{category}");
            assert_eq!(props["citation"]["type"], "object", "{category}");
        }
        assert_eq!(
            LOCAL_INFO_SCHEMA["properties"]["events"]["items"]["properties"]["type"]["type"],
            "string"
        );
        assert_eq!(
            LOCAL_INFO_SCHEMA["properties"]["alerts"]["items"]["required"],
            json!(["id", "title", "description"])
        );
    }

    #[test]
    fn has_data_when_any_category_is_non_empty() {
        let mut info = LocalInfo::default();
        assert!(!info.has_data());
        assert!(info.is_empty());
        info.alerts.push(Alert {
            id: "alert_001".into(),
            title: "Flash flood watch".into(),
            description: "Low water crossings may close".into(),
            severity: Some("moderate".into()),
            details: ItemDetails::default(),
        });
        assert!(info.has_data());
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn event_serializes_kind_as_type_and_flattens_details() {
        let event = Event {
            id: "event_001".into(),
            name: "Jazz Night".into(),
            kind: "music".into(),
            description: "Live quartet".into(),
            details: ItemDetails {
                latitude: Some(30.27),
                longitude: Some(-97.74),
                ..ItemDetails::default()
            },
        };
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["type"], "music");
        assert_eq!(v["latitude"], 30.27);
        assert!(v.get("website").is_none());
        assert!(v.get("details").is_none());
    }

    #[test]
    fn coordinates_accept_numeric_strings() {
        let details: ItemDetails =
            serde_json::from_value(json!({"latitude": "30.5", "longitude": -97.8})).unwrap();
        assert_eq!(details.coordinates(), Some((30.5, -97.8)));

        let blank: ItemDetails =
            serde_json::from_value(json!({"latitude": "", "longitude": null})).unwrap();
        assert_eq!(blank.coordinates(), None);
    }

    #[test]
    fn unparsable_coordinates_are_absent_not_errors() {
        let details: ItemDetails = serde_json::from_value(json!({
            "latitude": "unknown", "longitude": {"deg": 1}, "address": "Main St"
        }))
        .unwrap();
        assert_eq!(details.latitude, None);
        assert_eq!(details.longitude, None);
        assert_eq!(details.address.as_deref(), Some("Main St"));
    }

    #[test]
    fn numeric_and_null_ids_are_accepted() {
        let numbered: Event = serde_json::from_value(json!({
            "id": 5, "name": "Market", "type": "market", "description": "Farmers"
        }))
        .unwrap();
        assert_eq!(numbered.id, "5");
        let null: Event = serde_json::from_value(json!({
            "id": null, "name": "Market", "type": "market", "description": "Farmers"
        }))
        .unwrap();
        assert_eq!(null.id, "");
    }
}
