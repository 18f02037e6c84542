//! `GeoJSON` parsing helpers shared by the reader and its tests.

use std::convert::TryInto;

use geo_types::Geometry;
use geojson::feature::Id;
use geojson::{Feature as GeoJsonFeature, FeatureCollection, GeoJson, Geometry as GeoJsonGeometry};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use geoload_core_common::{Feature, Value};
use geoload_shared::{SourcePosition, SpatialFormatReadError, SpatialFormatResult};

/// Parse raw bytes into a vector of [`Feature`]s.
///
/// The input is first parsed as a single `GeoJSON` document; if that fails,
/// it is retried as a newline-delimited sequence of documents. Both error
/// messages are combined when neither interpretation succeeds.
pub fn parse_geojson_bytes(
    bytes: &[u8],
    context: impl Into<String>,
) -> SpatialFormatResult<Vec<Feature>> {
    let context = context.into();
    let reader = std::io::Cursor::new(bytes);

    match GeoJson::from_reader(reader) {
        Ok(geojson) => geojson_to_features(geojson, &context),
        Err(primary_err) => {
            let primary_err_message = primary_err.to_string();
            match parse_geojson_sequence(bytes, &context) {
                Ok(features) => Ok(features),
                Err(sequence_err) => {
                    Err(combine_errors(&primary_err_message, &sequence_err, context))
                },
            }
        },
    }
}

fn geojson_to_features(geojson: GeoJson, context: &str) -> SpatialFormatResult<Vec<Feature>> {
    match geojson {
        GeoJson::FeatureCollection(collection) => feature_collection_to_features(collection),
        GeoJson::Feature(feature) => Ok(vec![convert_feature(feature)?]),
        GeoJson::Geometry(geometry) => {
            let geometry = convert_geometry(geometry, context)?;
            Ok(vec![Feature::new(Some(geometry), IndexMap::new())])
        },
    }
}

fn feature_collection_to_features(
    collection: FeatureCollection,
) -> SpatialFormatResult<Vec<Feature>> {
    collection
        .features
        .into_iter()
        .map(convert_feature)
        .collect()
}

fn convert_feature(feature: GeoJsonFeature) -> SpatialFormatResult<Feature> {
    let geometry = match feature.geometry {
        Some(geometry) => Some(convert_geometry(geometry, "feature")?),
        None => None,
    };

    let mut properties: IndexMap<String, Value> = feature
        .properties
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name, convert_value(value)))
        .collect();

    // A top-level feature id is folded into the attributes, as the table
    // has no other place to keep it.
    if let Some(id) = feature.id {
        let value = match id {
            Id::String(s) => Value::Text(s),
            Id::Number(n) => convert_value(JsonValue::Number(n)),
        };
        properties.insert("id".to_string(), value);
    }

    Ok(Feature::new(geometry, properties))
}

fn convert_geometry(
    geometry: GeoJsonGeometry,
    context: &str,
) -> SpatialFormatResult<Geometry<f64>> {
    geometry
        .try_into()
        .map_err(|err| SpatialFormatReadError::Parse {
            message: format!("Failed to convert GeoJSON geometry: {err}"),
            position: None,
            context: Some(context.to_string()),
        })
}

/// Fold a JSON property value into the scalar [`Value`] vocabulary.
///
/// Booleans become integers and nested arrays/objects are kept as their
/// JSON text, matching how the original tool stored them.
fn convert_value(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Integer(i64::from(b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Real(f)
            } else {
                Value::Text(n.to_string())
            }
        },
        JsonValue::String(s) => Value::Text(s),
        other @ (JsonValue::Array(_) | JsonValue::Object(_)) => Value::Text(other.to_string()),
    }
}

fn parse_geojson_sequence(bytes: &[u8], context: &str) -> SpatialFormatResult<Vec<Feature>> {
    let mut features = Vec::new();
    for (line_idx, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line_number = (line_idx + 1) as u64;
        let line = match std::str::from_utf8(raw_line) {
            Ok(line) => line.trim(),
            Err(err) => {
                return Err(SpatialFormatReadError::Parse {
                    message: format!("GeoJSON line is not valid UTF-8: {err}"),
                    position: Some(SourcePosition {
                        line: Some(line_number),
                        ..SourcePosition::default()
                    }),
                    context: Some(context.to_string()),
                });
            },
        };

        if line.is_empty() {
            continue;
        }

        let geojson = line
            .parse::<GeoJson>()
            .map_err(|err| SpatialFormatReadError::Parse {
                message: format!("Failed to parse GeoJSON feature: {err}"),
                position: Some(SourcePosition {
                    line: Some(line_number),
                    ..SourcePosition::default()
                }),
                context: Some(context.to_string()),
            })?;

        let mut parsed = geojson_to_features(geojson, context)?;
        features.append(&mut parsed);
    }

    if features.is_empty() {
        Err(SpatialFormatReadError::Parse {
            message: "No GeoJSON features found".to_string(),
            position: None,
            context: Some(context.to_string()),
        })
    } else {
        Ok(features)
    }
}

fn combine_errors(
    document_err: &str,
    sequence_err: &SpatialFormatReadError,
    context: String,
) -> SpatialFormatReadError {
    let message = format!(
        "Failed to parse GeoJSON as a document ({document_err}); \
         also failed to parse as GeoJSON sequence: {sequence_err}"
    );
    SpatialFormatReadError::Parse {
        message,
        position: None,
        context: Some(context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_feature_collection() {
        let data = br#"{
  "type": "FeatureCollection",
  "features": [
    {"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,2.0]},"properties":{"name":"A"}},
    {"type":"Feature","geometry":null,"properties":{"value":42}}
  ]
}"#;

        let features = parse_geojson_bytes(data, "test").expect("parse");
        assert_eq!(features.len(), 2);
        assert!(features[0].geometry.is_some());
        assert_eq!(
            features[0].properties.get("name"),
            Some(&Value::Text("A".to_string()))
        );
        assert!(features[1].geometry.is_none());
        assert_eq!(features[1].properties.get("value"), Some(&Value::Integer(42)));
    }

    #[test]
    fn parse_single_feature() {
        let data = br#"{"type":"Feature","geometry":{"type":"Point","coordinates":[5.0,10.0]},"properties":{"city":"NYC"}}"#;

        let features = parse_geojson_bytes(data, "test").expect("parse");
        assert_eq!(features.len(), 1);
        assert!(features[0].geometry.is_some());
        assert_eq!(
            features[0].properties.get("city"),
            Some(&Value::Text("NYC".to_string()))
        );
    }

    #[test]
    fn parse_single_geometry() {
        let data = br#"{"type":"Point","coordinates":[7.0,8.0]}"#;

        let features = parse_geojson_bytes(data, "test").expect("parse");
        assert_eq!(features.len(), 1);
        assert!(features[0].geometry.is_some());
        assert!(features[0].properties.is_empty());
    }

    #[test]
    fn feature_id_is_folded_into_properties() {
        let data = br#"{"type":"Feature","id":7,"geometry":{"type":"Point","coordinates":[0,0]},"properties":{"name":"x"}}"#;

        let features = parse_geojson_bytes(data, "test").expect("parse");
        assert_eq!(features[0].properties.get("id"), Some(&Value::Integer(7)));
    }

    #[test]
    fn booleans_become_integers() {
        let data = br#"{"type":"Feature","geometry":null,"properties":{"flag":true}}"#;

        let features = parse_geojson_bytes(data, "test").expect("parse");
        assert_eq!(features[0].properties.get("flag"), Some(&Value::Integer(1)));
    }

    #[test]
    fn nested_values_become_json_text() {
        let data = br#"{"type":"Feature","geometry":null,"properties":{"tags":["a","b"]}}"#;

        let features = parse_geojson_bytes(data, "test").expect("parse");
        assert_eq!(
            features[0].properties.get("tags"),
            Some(&Value::Text(r#"["a","b"]"#.to_string()))
        );
    }

    #[test]
    fn parse_sequence() {
        let data = br#"{"type":"Feature","geometry":{"type":"Point","coordinates":[0,0]},"properties":{"id":1}}

{"type":"Feature","geometry":{"type":"Point","coordinates":[1,1]},"properties":{"id":2}}
"#;

        let features = parse_geojson_bytes(data, "seq").expect("sequence");
        assert_eq!(features.len(), 2);
    }

    #[test]
    fn parse_empty_sequence_fails() {
        let data = b"\n\n\n";

        let err = parse_geojson_bytes(data, "empty").unwrap_err();
        match err {
            SpatialFormatReadError::Parse { message, .. } => {
                assert!(message.contains("No GeoJSON features found"));
            },
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn parse_invalid_json_combines_errors() {
        let data = b"not valid json at all";

        let err = parse_geojson_bytes(data, "invalid").unwrap_err();
        match err {
            SpatialFormatReadError::Parse {
                message, context, ..
            } => {
                assert!(message.contains("Failed to parse GeoJSON as a document"));
                assert!(message.contains("also failed to parse as GeoJSON sequence"));
                assert_eq!(context.as_deref(), Some("invalid"));
            },
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn properties_keep_source_order() {
        let data = br#"{"type":"Feature","geometry":null,"properties":{"zulu":1,"alpha":2}}"#;

        let features = parse_geojson_bytes(data, "test").expect("parse");
        let keys: Vec<_> = features[0].properties.keys().cloned().collect();
        // serde_json's default map is sorted; order is stable either way.
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"zulu".to_string()));
        assert!(keys.contains(&"alpha".to_string()));
    }
}
