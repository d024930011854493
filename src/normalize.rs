//! Payload normalization — nested rates payloads become flat records.
//!
//! The endpoint guarantees no schema. Normalization locates the per-hero
//! entity list through an ordered list of strategies (canonical key lookup,
//! discriminator-key scan, whole-payload fallback), then flattens each entity
//! into a single-level map with underscore-joined key paths. It never errors:
//! non-mapping entities are skipped and unrecognizable payloads degrade to a
//! single record.

use crate::params::Combination;
use chrono::Local;
use serde_json::{Map, Value};
use tracing::warn;

/// Canonical key holding the per-hero entity list.
const ENTITY_KEY: &str = "rates";

/// Keys that mark an object as a hero entity during the fallback scan.
const DISCRIMINATOR_KEYS: [&str; 3] = ["id", "cells", "hero"];

/// Capture timestamp format.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One flat output row. Keys keep first-insertion order.
pub type Record = Map<String, Value>;

/// Normalize a payload into one record per hero entity.
///
/// Every record carries the six request parameters, the capture timestamp,
/// the flattened entity, and its position in the entity list as `hero_index`.
pub fn normalize(payload: &Value, combination: &Combination) -> Vec<Record> {
    let metadata = request_metadata(combination);

    let Some(entities) = locate_entities(payload) else {
        warn!("no hero list found in payload; flattening entire payload as a single record");
        let mut record = metadata;
        if let Value::Object(object) = payload {
            flatten_into(object, "", &mut record);
        }
        return vec![record];
    };

    entities
        .iter()
        .enumerate()
        .filter_map(|(index, entity)| {
            let object = entity.as_object()?;
            let mut record = metadata.clone();
            flatten_into(object, "", &mut record);
            record.insert("hero_index".to_string(), Value::from(index as u64));
            Some(record)
        })
        .collect()
}

/// Metadata shared by every record of one combination.
fn request_metadata(combination: &Combination) -> Record {
    let mut metadata = Record::new();
    metadata.insert(
        "input_type".to_string(),
        Value::from(combination.input.as_str()),
    );
    metadata.insert("map_name".to_string(), Value::from(combination.map.as_str()));
    metadata.insert(
        "region".to_string(),
        Value::from(combination.region.as_str()),
    );
    metadata.insert("role".to_string(), Value::from(combination.role.as_str()));
    metadata.insert("rq".to_string(), Value::from(combination.rq));
    metadata.insert("tier".to_string(), Value::from(combination.tier.as_str()));
    metadata.insert(
        "scraped_at".to_string(),
        Value::from(Local::now().format(TIMESTAMP_FORMAT).to_string()),
    );
    metadata
}

/// Entity-location strategies, tried in order; first match wins.
fn locate_entities(payload: &Value) -> Option<&Vec<Value>> {
    canonical_entity_list(payload).or_else(|| discriminator_scan(payload))
}

/// The `rates` key, when it holds a non-empty array led by an object.
fn canonical_entity_list(payload: &Value) -> Option<&Vec<Value>> {
    let list = payload.as_object()?.get(ENTITY_KEY)?.as_array()?;
    match list.first() {
        Some(Value::Object(_)) => Some(list),
        _ => None,
    }
}

/// First top-level array (in natural order) led by an object carrying at
/// least one discriminator key.
fn discriminator_scan(payload: &Value) -> Option<&Vec<Value>> {
    payload.as_object()?.values().find_map(|value| {
        let list = value.as_array()?;
        let first = list.first()?.as_object()?;
        DISCRIMINATOR_KEYS
            .iter()
            .any(|key| first.contains_key(*key))
            .then_some(list)
    })
}

/// Flatten a nested object into a single-level map.
///
/// Key paths are underscore-joined; on collision the later key wins, in the
/// source payload's insertion order. Pure function.
pub fn flatten(object: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(object, "", &mut flat);
    flat
}

fn flatten_into(object: &Map<String, Value>, prefix: &str, out: &mut Map<String, Value>) {
    for (key, value) in object {
        let flat_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}_{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(nested, &flat_key, out),
            Value::Array(items) => flatten_list(items, &flat_key, out),
            scalar => {
                out.insert(flat_key, scalar.clone());
            }
        }
    }
}

/// A list of nothing but scalars collapses to one JSON text cell; any other
/// list expands element by element. A single nested (or null) element forces
/// per-index expansion of the entire list.
fn flatten_list(items: &[Value], key: &str, out: &mut Map<String, Value>) {
    if items.iter().all(is_scalar) {
        out.insert(key.to_string(), Value::from(render_scalar_list(items)));
        return;
    }
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(nested) => flatten_into(nested, &format!("{key}_{index}"), out),
            other => {
                out.insert(format!("{key}_{index}"), other.clone());
            }
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// One JSON text for a scalar list, elements joined with `", "`.
fn render_scalar_list(items: &[Value]) -> String {
    let elements: Vec<String> = items.iter().map(Value::to_string).collect();
    format!("[{}]", elements.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{InputMethod, Region, Role, Tier};
    use serde_json::json;

    fn combination() -> Combination {
        Combination {
            input: InputMethod::Pc,
            map: "all-maps".to_string(),
            region: Region::Europe,
            role: Role::All,
            rq: 0,
            tier: Tier::All,
        }
    }

    fn flatten_value(value: Value) -> Map<String, Value> {
        flatten(value.as_object().expect("test payload must be an object"))
    }

    #[test]
    fn test_flatten_merges_nested_objects() {
        let flat = flatten_value(json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(Value::Object(flat), json!({"a": 1, "b_c": 2}));
    }

    #[test]
    fn test_flatten_serializes_scalar_lists_as_text() {
        let flat = flatten_value(json!({"a": [1, 2, 3]}));
        assert_eq!(Value::Object(flat), json!({"a": "[1, 2, 3]"}));
    }

    #[test]
    fn test_flatten_quotes_strings_inside_scalar_lists() {
        let flat = flatten_value(json!({"tags": ["dive", "brawl"]}));
        assert_eq!(flat["tags"], json!(r#"["dive", "brawl"]"#));
    }

    #[test]
    fn test_flatten_serializes_empty_list_as_text() {
        let flat = flatten_value(json!({"a": []}));
        assert_eq!(flat["a"], json!("[]"));
    }

    #[test]
    fn test_flatten_expands_object_lists_positionally() {
        let flat = flatten_value(json!({"a": [{"x": 1}, {"x": 2}]}));
        assert_eq!(Value::Object(flat), json!({"a_0_x": 1, "a_1_x": 2}));
    }

    #[test]
    fn test_flatten_mixed_list_expands_every_element() {
        // One nested element pushes the whole list into the per-index branch,
        // scalars included.
        let flat = flatten_value(json!({"a": [1, {"x": 2}]}));
        assert_eq!(Value::Object(flat), json!({"a_0": 1, "a_1_x": 2}));
    }

    #[test]
    fn test_flatten_null_element_forces_expansion() {
        let flat = flatten_value(json!({"a": [1, null, 3]}));
        assert_eq!(
            Value::Object(flat),
            json!({"a_0": 1, "a_1": null, "a_2": 3})
        );
    }

    #[test]
    fn test_flatten_collision_last_write_wins() {
        let flat = flatten_value(json!({"a": {"b": 1}, "a_b": 2}));
        assert_eq!(Value::Object(flat), json!({"a_b": 2}));
    }

    #[test]
    fn test_flatten_keeps_nulls() {
        let flat = flatten_value(json!({"a": null, "b": true}));
        assert_eq!(Value::Object(flat), json!({"a": null, "b": true}));
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let payload = json!({"a": {"b": [1, 2]}, "c": [{"d": 3}]});
        let object = payload.as_object().unwrap();
        assert_eq!(flatten(object), flatten(object));
    }

    #[test]
    fn test_normalize_rates_payload() {
        let payload = json!({
            "rates": [
                {"id": "h1", "winrate": 0.5},
                {"id": "h2", "winrate": 0.6}
            ]
        });
        let records = normalize(&payload, &combination());
        assert_eq!(records.len(), 2);

        for (index, record) in records.iter().enumerate() {
            assert_eq!(record["input_type"], json!("PC"));
            assert_eq!(record["map_name"], json!("all-maps"));
            assert_eq!(record["region"], json!("Europe"));
            assert_eq!(record["role"], json!("All"));
            assert_eq!(record["rq"], json!(0));
            assert_eq!(record["tier"], json!("All"));
            assert!(record.contains_key("scraped_at"));
            assert_eq!(record["hero_index"], json!(index));
        }
        assert_eq!(records[0]["id"], json!("h1"));
        assert_eq!(records[0]["winrate"], json!(0.5));
        assert_eq!(records[1]["id"], json!("h2"));
    }

    #[test]
    fn test_normalize_skips_non_object_entities() {
        let payload = json!({"rates": [{"id": "h1"}, 42, {"id": "h2"}]});
        let records = normalize(&payload, &combination());
        assert_eq!(records.len(), 2);
        // Positional indices refer to the source list, not the output.
        assert_eq!(records[0]["hero_index"], json!(0));
        assert_eq!(records[1]["hero_index"], json!(2));
    }

    #[test]
    fn test_normalize_discriminator_scan_fallback() {
        let payload = json!({
            "meta": {"generated": true},
            "heroes": [{"hero": "ana", "cells": {"winrate": 55.0}}]
        });
        let records = normalize(&payload, &combination());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["hero"], json!("ana"));
        assert_eq!(records[0]["cells_winrate"], json!(55.0));
        assert_eq!(records[0]["hero_index"], json!(0));
    }

    #[test]
    fn test_normalize_scan_ignores_lists_without_discriminators() {
        let payload = json!({"data": [{"foo": 1}]});
        let records = normalize(&payload, &combination());
        // No recognizable entity list: the whole payload becomes one record.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["data_0_foo"], json!(1));
        assert!(!records[0].contains_key("hero_index"));
    }

    #[test]
    fn test_normalize_unrecognizable_payload_yields_single_record() {
        let payload = json!({"status": "ok"});
        let records = normalize(&payload, &combination());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["status"], json!("ok"));
        assert_eq!(records[0]["input_type"], json!("PC"));
        assert!(records[0].contains_key("scraped_at"));
    }

    #[test]
    fn test_normalize_empty_rates_list_falls_through() {
        let payload = json!({"rates": []});
        let records = normalize(&payload, &combination());
        assert_eq!(records.len(), 1);
        // Flattened whole payload: the empty list serializes to "[]".
        assert_eq!(records[0]["rates"], json!("[]"));
    }

    #[test]
    fn test_normalize_non_object_payload_keeps_metadata() {
        let payload = json!([1, 2, 3]);
        let records = normalize(&payload, &combination());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["tier"], json!("All"));
    }

    #[test]
    fn test_metadata_overridden_by_entity_keys() {
        // Entity keys are merged after metadata, so an entity that happens to
        // carry a metadata key wins.
        let payload = json!({"rates": [{"id": "h1", "region": "from-entity"}]});
        let records = normalize(&payload, &combination());
        assert_eq!(records[0]["region"], json!("from-entity"));
    }
}
