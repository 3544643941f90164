//! JSON encoding of detected objects and of generic values that may contain
//! them.
//!
//! Dispatch happens on [`SerializableValue`]: detected objects go through
//! [`ToSerializableFields`], numeric arrays become nested lists, and a
//! top-level sequence is the comma-join of each item's own encoding. Every
//! other value is encoded generically, still recognizing detected objects and
//! numeric arrays wherever they are nested.

use crate::math::array::ArrayElement;
use crate::math::NumericArray;
use crate::objects::{DetectedObject, ToSerializableFields};
use crate::prelude::{UtilError, UtilResult};
use crate::util::format::{dumps, float_repr};
use log::trace;
use ndarray::{Array1, Array2, ArrayD};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};

/// A value handed to [`serialize_to_json`].
#[derive(Debug, Clone, PartialEq)]
pub enum SerializableValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Sequence(Vec<SerializableValue>),
    /// Insertion-ordered; keys are written as given.
    Mapping(Vec<(String, SerializableValue)>),
    NumericArray(NumericArray),
    DetectedObject(Box<DetectedObject>),
    /// Something with no JSON form, such as a handle to a simulator actor.
    /// Holds the type name used in the error message.
    Opaque(String),
}

impl SerializableValue {
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<SerializableValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        SerializableValue::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn opaque(type_name: impl Into<String>) -> Self {
        SerializableValue::Opaque(type_name.into())
    }
}

impl Serialize for SerializableValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SerializableValue::Null => serializer.serialize_unit(),
            SerializableValue::Bool(value) => serializer.serialize_bool(*value),
            SerializableValue::Int(value) => serializer.serialize_i64(*value),
            SerializableValue::UInt(value) => serializer.serialize_u64(*value),
            SerializableValue::Float(value) => value.serialize_scalar(serializer),
            SerializableValue::String(value) => serializer.serialize_str(value),
            SerializableValue::Sequence(items) => serializer.collect_seq(items),
            SerializableValue::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            SerializableValue::NumericArray(array) => array.serialize(serializer),
            SerializableValue::DetectedObject(object) => object
                .to_serializable_fields()
                .map_err(S::Error::custom)?
                .serialize(serializer),
            SerializableValue::Opaque(type_name) => Err(S::Error::custom(format!(
                "Object of type {} is not JSON serializable",
                type_name
            ))),
        }
    }
}

/// Encodes `value` as JSON text.
///
/// A sequence is encoded item by item and the texts are joined with `,`
/// inside brackets; this applies recursively to sequences of sequences. Any
/// other value, including sequences nested in mappings, goes through the
/// generic encoder with `", "` separators.
pub fn serialize_to_json(value: &SerializableValue) -> UtilResult<String> {
    let text = encode(value)?;
    trace!("serialized value into {} bytes", text.len());
    Ok(text)
}

fn encode(value: &SerializableValue) -> UtilResult<String> {
    match value {
        SerializableValue::Sequence(items) => {
            let parts = items.iter().map(encode).collect::<UtilResult<Vec<_>>>()?;
            Ok(format!("[{}]", parts.join(",")))
        }
        other => dumps(other),
    }
}

impl From<bool> for SerializableValue {
    fn from(value: bool) -> Self {
        SerializableValue::Bool(value)
    }
}

impl From<i32> for SerializableValue {
    fn from(value: i32) -> Self {
        SerializableValue::Int(i64::from(value))
    }
}

impl From<i64> for SerializableValue {
    fn from(value: i64) -> Self {
        SerializableValue::Int(value)
    }
}

impl From<u64> for SerializableValue {
    fn from(value: u64) -> Self {
        SerializableValue::UInt(value)
    }
}

impl From<f64> for SerializableValue {
    fn from(value: f64) -> Self {
        SerializableValue::Float(value)
    }
}

impl From<&str> for SerializableValue {
    fn from(value: &str) -> Self {
        SerializableValue::String(value.to_string())
    }
}

impl From<String> for SerializableValue {
    fn from(value: String) -> Self {
        SerializableValue::String(value)
    }
}

impl From<DetectedObject> for SerializableValue {
    fn from(object: DetectedObject) -> Self {
        SerializableValue::DetectedObject(Box::new(object))
    }
}

impl From<NumericArray> for SerializableValue {
    fn from(array: NumericArray) -> Self {
        SerializableValue::NumericArray(array)
    }
}

impl From<Array1<f64>> for SerializableValue {
    fn from(array: Array1<f64>) -> Self {
        SerializableValue::NumericArray(array.into())
    }
}

impl From<Array2<f64>> for SerializableValue {
    fn from(array: Array2<f64>) -> Self {
        SerializableValue::NumericArray(array.into())
    }
}

impl From<Array2<i64>> for SerializableValue {
    fn from(array: Array2<i64>) -> Self {
        SerializableValue::NumericArray(array.into())
    }
}

impl From<ArrayD<f64>> for SerializableValue {
    fn from(array: ArrayD<f64>) -> Self {
        SerializableValue::NumericArray(array.into())
    }
}

impl<T: Into<SerializableValue>> From<Vec<T>> for SerializableValue {
    fn from(items: Vec<T>) -> Self {
        SerializableValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SerializableValue>> From<Option<T>> for SerializableValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SerializableValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for SerializableValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => SerializableValue::Null,
            Value::Bool(value) => SerializableValue::Bool(value),
            Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    SerializableValue::Int(value)
                } else if let Some(value) = number.as_u64() {
                    SerializableValue::UInt(value)
                } else {
                    SerializableValue::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(value) => SerializableValue::String(value),
            Value::Array(items) => items.into(),
            Value::Object(map) => SerializableValue::mapping(map),
        }
    }
}

impl TryFrom<serde_yaml::Value> for SerializableValue {
    type Error = UtilError;

    fn try_from(value: serde_yaml::Value) -> UtilResult<Self> {
        use serde_yaml::Value;
        Ok(match value {
            Value::Null => SerializableValue::Null,
            Value::Bool(value) => SerializableValue::Bool(value),
            Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    SerializableValue::Int(value)
                } else if let Some(value) = number.as_u64() {
                    SerializableValue::UInt(value)
                } else {
                    SerializableValue::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(value) => SerializableValue::String(value),
            Value::Sequence(items) => SerializableValue::Sequence(
                items
                    .into_iter()
                    .map(SerializableValue::try_from)
                    .collect::<UtilResult<_>>()?,
            ),
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    entries.push((yaml_key(key)?, SerializableValue::try_from(value)?));
                }
                SerializableValue::Mapping(entries)
            }
            Value::Tagged(tagged) => SerializableValue::Opaque(tagged.tag.to_string()),
        })
    }
}

/// Scalar keys are written the way the generic encoder writes them.
fn yaml_key(key: serde_yaml::Value) -> UtilResult<String> {
    use serde_yaml::Value;
    match key {
        Value::String(key) => Ok(key),
        Value::Bool(true) => Ok("true".to_string()),
        Value::Bool(false) => Ok("false".to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Number(number) => Ok(if let Some(value) = number.as_i64() {
            value.to_string()
        } else if let Some(value) = number.as_u64() {
            value.to_string()
        } else {
            float_repr(number.as_f64().unwrap_or(f64::NAN))
        }),
        Value::Sequence(_) => Err(UtilError::UnsupportedKey("list".to_string())),
        Value::Mapping(_) => Err(UtilError::UnsupportedKey("dict".to_string())),
        Value::Tagged(tagged) => Err(UtilError::UnsupportedKey(tagged.tag.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use serde_json::Value;

    fn record(object_id: i64) -> DetectedObject {
        DetectedObject::new("CAR", object_id, "sensor-1", 1.6999)
            .with_confidence(0.9)
            .with_proj_string("+proj=utm +zone=17")
            .with_position([1.23456, 2.0, -3.999996])
            .with_position_covariance(arr2(&[[1.0, 0.0], [0.0, 1.0]]))
            .with_velocity([10.00049, -0.0001, 0.0])
            .with_velocity_covariance(arr2(&[[0.25]]))
            .with_angular_velocity([0.0, 0.0, 0.78539816])
            .with_angular_velocity_covariance(Array2::zeros((0, 3)))
            .with_size([4.5004, 1.4996, 1.8])
    }

    #[test]
    fn detected_object_matches_consumer_layout() {
        let text = serialize_to_json(&record(7).into()).unwrap();
        let expected = concat!(
            r#"{"type": "CAR", "confidence": 0.9, "projString": "+proj=utm +zone=17", "#,
            r#""objectId": 7, "position": {"x": 1.235, "y": 2.0, "z": -4.0}, "#,
            r#""positionCovariance": [[1.0, 0.0], [0.0, 1.0]], "#,
            r#""velocity": {"x": 10.0, "y": -0.0, "z": 0.0}, "velocityCovariance": [[0.25]], "#,
            r#""angularVelocity": {"x": 0.0, "y": 0.0, "z": 0.785}, "#,
            r#""angularVelocityCovariance": [], "#,
            r#""size": {"length": 4.5, "height": 1.5, "width": 1.8}, "#,
            r#""timestamp": 1699, "sensorId": "sensor-1"}"#
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn timestamp_truncates_rather_than_rounds() {
        let mut object = record(1);
        object.timestamp = 1.0009;
        let value: Value = serde_json::from_str(&serialize_to_json(&object.into()).unwrap()).unwrap();
        assert_eq!(value["timestamp"], 1000);
    }

    #[test]
    fn integer_matrix_is_embedded_unchanged() {
        let value = SerializableValue::mapping([(
            "positionCovariance",
            SerializableValue::from(arr2(&[[1_i64, 0], [0, 1]])),
        )]);
        let text = serialize_to_json(&value).unwrap();
        assert_eq!(text, r#"{"positionCovariance": [[1, 0], [0, 1]]}"#);

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["positionCovariance"], serde_json::json!([[1, 0], [0, 1]]));
    }

    #[test]
    fn top_level_array_is_encoded_as_nested_lists() {
        let text = serialize_to_json(&arr2(&[[0.5, 1.0], [2.0, 3.25]]).into()).unwrap();
        assert_eq!(text, "[[0.5, 1.0], [2.0, 3.25]]");
    }

    #[test]
    fn sequence_of_records_is_joined_text() {
        let first = serialize_to_json(&record(1).into()).unwrap();
        let second = serialize_to_json(&record(2).into()).unwrap();
        let joined = serialize_to_json(&vec![record(1), record(2)].into()).unwrap();
        assert_eq!(joined, format!("[{},{}]", first, second));

        let parsed: Value = serde_json::from_str(&joined).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["objectId"], 1);
        assert_eq!(items[1]["objectId"], 2);
    }

    #[test]
    fn top_level_sequences_join_without_spaces() {
        let nested: SerializableValue = vec![vec![1_i64, 2], vec![3]].into();
        assert_eq!(serialize_to_json(&nested).unwrap(), "[[1,2],[3]]");

        let strings: SerializableValue = vec!["a", "b"].into();
        assert_eq!(serialize_to_json(&strings).unwrap(), r#"["a","b"]"#);

        let empty: SerializableValue = Vec::<SerializableValue>::new().into();
        assert_eq!(serialize_to_json(&empty).unwrap(), "[]");
    }

    #[test]
    fn records_nested_in_mappings_are_recognized() {
        let value = SerializableValue::mapping([
            ("frame", SerializableValue::from(3)),
            ("objects", vec![record(5)].into()),
            ("note", SerializableValue::Null),
        ]);
        let text = serialize_to_json(&value).unwrap();
        assert!(text.starts_with(r#"{"frame": 3, "objects": [{"type": "CAR", "#));
        assert!(text.ends_with(r#""sensorId": "sensor-1"}], "note": null}"#));

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["objects"][0]["position"]["x"], 1.235);
    }

    #[test]
    fn mapping_keeps_insertion_order() {
        let value = SerializableValue::mapping([("z", 1), ("a", 2)]);
        assert_eq!(serialize_to_json(&value).unwrap(), r#"{"z": 1, "a": 2}"#);
    }

    #[test]
    fn opaque_value_is_an_encode_error() {
        let err = serialize_to_json(&SerializableValue::opaque("CarlaActor")).unwrap_err();
        assert!(matches!(err, UtilError::Encode(_)));
        assert!(err
            .to_string()
            .contains("Object of type CarlaActor is not JSON serializable"));
    }

    #[test]
    fn nested_opaque_value_fails_the_whole_call() {
        let value = SerializableValue::mapping([
            ("objects", SerializableValue::from(vec![record(1)])),
            ("actor", SerializableValue::opaque("CarlaActor")),
        ]);
        assert!(matches!(serialize_to_json(&value), Err(UtilError::Encode(_))));

        let sequence = SerializableValue::Sequence(vec![
            record(1).into(),
            SerializableValue::opaque("CarlaActor"),
        ]);
        assert!(matches!(serialize_to_json(&sequence), Err(UtilError::Encode(_))));
    }

    #[test]
    fn non_finite_float_is_an_encode_error() {
        let value = SerializableValue::mapping([("range", f64::NAN)]);
        assert!(matches!(serialize_to_json(&value), Err(UtilError::Encode(_))));

        let object = record(1).with_confidence(f64::INFINITY);
        let err = serialize_to_json(&object.into()).unwrap_err();
        assert!(err.to_string().contains("confidence"));
    }

    #[test]
    fn yaml_scalar_keys_are_stringified() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("1: a\ntrue: b\n~: c\n1.5: d\nname: e\n").unwrap();
        let value = SerializableValue::try_from(yaml).unwrap();
        assert_eq!(
            serialize_to_json(&value).unwrap(),
            r#"{"1": "a", "true": "b", "null": "c", "1.5": "d", "name": "e"}"#
        );
    }

    #[test]
    fn yaml_collection_keys_are_rejected() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("? [1, 2]\n: x\n").unwrap();
        let err = SerializableValue::try_from(yaml).unwrap_err();
        assert!(matches!(err, UtilError::UnsupportedKey(_)));
    }

    #[test]
    fn yaml_tagged_values_are_opaque() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("actor: !carla_actor 17\n").unwrap();
        let value = SerializableValue::try_from(yaml).unwrap();
        let err = serialize_to_json(&value).unwrap_err();
        assert!(err.to_string().contains("carla_actor"));
    }

    #[test]
    fn json_values_convert_structurally() {
        let value = SerializableValue::from(serde_json::json!({"ids": [1, 2], "ok": true}));
        assert_eq!(
            serialize_to_json(&value).unwrap(),
            r#"{"ids": [1, 2], "ok": true}"#
        );
    }
}
