use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `friends` field as it exists on either side of the transform:
/// a comma-separated string from the source API, a list of names after
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Friends {
    List(Vec<String>),
    Raw(String),
}

/// The `born_at` field on either side of the transform: milliseconds since
/// the Unix epoch from the source API, an ISO-8601 UTC timestamp after
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BornAt {
    Millis(i64),
    Timestamp(String),
}

/// A single animal record. Only `friends` and `born_at` are normalized;
/// every other field rides along untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    /// Opaque identifier assigned by the source API.
    #[serde(default)]
    pub id: Value,

    #[serde(default)]
    pub friends: Option<Friends>,

    #[serde(default)]
    pub born_at: Option<BornAt>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of the paginated listing response. `items` being absent is a
/// protocol error; the pagination metadata is informational only.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimalsPage {
    #[serde(default)]
    pub items: Option<Vec<Animal>>,

    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_source_forms() {
        let animal: Animal = serde_json::from_value(json!({
            "id": 7,
            "name": "Wolf",
            "friends": "Cat,Dog",
            "born_at": 1612013480001i64
        }))
        .unwrap();

        assert_eq!(animal.id, json!(7));
        assert_eq!(animal.friends, Some(Friends::Raw("Cat,Dog".into())));
        assert_eq!(animal.born_at, Some(BornAt::Millis(1612013480001)));
        assert_eq!(animal.extra.get("name"), Some(&json!("Wolf")));
    }

    #[test]
    fn absent_and_null_fields_deserialize_to_none() {
        let animal: Animal = serde_json::from_value(json!({
            "id": 1,
            "born_at": null
        }))
        .unwrap();

        assert_eq!(animal.friends, None);
        assert_eq!(animal.born_at, None);
    }

    #[test]
    fn serializes_target_forms() {
        let animal = Animal {
            id: json!(3),
            friends: Some(Friends::List(vec!["Cat".into(), "Dog".into()])),
            born_at: Some(BornAt::Timestamp("1970-01-01T00:00:00+00:00".into())),
            extra: Map::new(),
        };

        let value = serde_json::to_value(&animal).unwrap();
        assert_eq!(value["friends"], json!(["Cat", "Dog"]));
        assert_eq!(value["born_at"], json!("1970-01-01T00:00:00+00:00"));
    }

    #[test]
    fn normalized_null_born_at_serializes_as_null() {
        let animal = Animal {
            id: json!(3),
            friends: Some(Friends::List(vec![])),
            born_at: None,
            extra: Map::new(),
        };

        let value = serde_json::to_value(&animal).unwrap();
        assert_eq!(value["friends"], json!([]));
        assert!(value.get("born_at").is_some());
        assert_eq!(value["born_at"], Value::Null);
    }

    #[test]
    fn page_without_items_key_deserializes_to_none() {
        let page: AnimalsPage =
            serde_json::from_value(json!({"message": "oops"})).unwrap();
        assert!(page.items.is_none());
    }

    #[test]
    fn page_with_items_and_metadata() {
        let page: AnimalsPage = serde_json::from_value(json!({
            "items": [{"id": 1}],
            "page": 2,
            "total_pages": 10
        }))
        .unwrap();
        assert_eq!(page.items.unwrap().len(), 1);
        assert_eq!(page.page, Some(2));
        assert_eq!(page.total_pages, Some(10));
    }
}
