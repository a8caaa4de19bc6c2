//! JSON interop for [`Value`]
//!
//! Conversion from JSON is total: every `serde_json::Value` maps to a corral
//! value. Conversion to JSON fails with [`Error::Untypeable`] for the kinds
//! JSON cannot represent (instances, handles, closures) — no lossy encoding.

use crate::error::{Error, Result};
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

impl Value {
    /// Convert a JSON value into a corral value
    ///
    /// Numbers become `Int` when they fit `i64`, otherwise `Float`.
    pub fn from_json(json: JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }

    /// Convert to a JSON value
    ///
    /// # Errors
    /// [`Error::Untypeable`] for instances, handles, closures, and
    /// non-finite floats — kinds JSON cannot represent.
    pub fn to_json(&self) -> Result<JsonValue> {
        match self {
            Value::Null => Ok(JsonValue::Null),
            Value::Bool(b) => Ok(JsonValue::Bool(*b)),
            Value::Int(i) => Ok(JsonValue::from(*i)),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or_else(|| {
                    Error::Untypeable(format!("float {f} has no JSON representation"))
                }),
            Value::Str(s) => Ok(JsonValue::String(s.clone())),
            Value::Seq(items) => items
                .iter()
                .map(Value::to_json)
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array),
            Value::Record(fields) => fields
                .iter()
                .map(|(k, v)| v.to_json().map(|j| (k.clone(), j)))
                .collect::<Result<serde_json::Map<_, _>>>()
                .map(JsonValue::Object),
            other => Err(Error::Untypeable(format!(
                "{} has no JSON representation",
                other.kind_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Instance;
    use serde_json::json;

    #[test]
    fn test_from_json_is_total() {
        let value = Value::from_json(json!({
            "name": "corral",
            "count": 3,
            "ratio": 0.5,
            "tags": ["a", "b"],
            "nested": {"ok": true, "gone": null}
        }));
        let record = value.as_record().unwrap();
        assert_eq!(record["name"], Value::Str("corral".into()));
        assert_eq!(record["count"], Value::Int(3));
        assert_eq!(record["ratio"], Value::Float(0.5));
        assert_eq!(
            record["tags"],
            Value::Seq(vec![Value::Str("a".into()), Value::Str("b".into())])
        );
    }

    #[test]
    fn test_round_trip_json_kinds() {
        let original = json!({"a": [1, 2.5, "x", null, false]});
        let value = Value::from_json(original.clone());
        assert_eq!(value.to_json().unwrap(), original);
    }

    #[test]
    fn test_non_json_kinds_refuse_conversion() {
        let inst = Value::Instance(Instance::new("Dog"));
        assert!(matches!(inst.to_json(), Err(Error::Untypeable(_))));
        assert!(matches!(
            Value::Float(f64::NAN).to_json(),
            Err(Error::Untypeable(_))
        ));
    }
}
