//! Converting parsed TOML and JSON documents into [`Value`] trees.

use remold_core::Value;

/// Convert a TOML value.
///
/// Datetimes become text in their TOML form so a time hook can parse them
/// with the configured layout.
#[must_use]
pub fn value_from_toml(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Text(s.clone()),
        toml::Value::Integer(n) => Value::I64(*n),
        toml::Value::Float(f) => Value::F64(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::Text(dt.to_string()),
        toml::Value::Array(items) => Value::Seq(items.iter().map(value_from_toml).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .iter()
                .map(|(key, value)| (key.clone(), value_from_toml(value)))
                .collect(),
        ),
    }
}

/// Convert a JSON value.
///
/// Integers that fit `i64` become [`Value::I64`], larger positive ones
/// [`Value::U64`], everything else [`Value::F64`].
#[must_use]
pub fn value_from_json(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::I64)
            .or_else(|| n.as_u64().map(Value::U64))
            .or_else(|| n.as_f64().map(Value::F64))
            .unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Array(items) => Value::Seq(items.iter().map(value_from_json).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.iter()
                .map(|(key, value)| (key.clone(), value_from_json(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_toml_tree() {
        let doc: toml::Value = toml::from_str(
            r#"
            name = "api"
            port = 8080
            ratio = 0.5
            enabled = true
            started = 2024-02-29T10:00:00Z
            tags = ["a", "b"]

            [limits]
            max = 3
            "#,
        )
        .unwrap();
        let value = value_from_toml(&doc);
        let Value::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map["name"], Value::from("api"));
        assert_eq!(map["port"], Value::I64(8080));
        assert_eq!(map["ratio"], Value::F64(0.5));
        assert_eq!(map["enabled"], Value::Bool(true));
        assert_eq!(map["started"], Value::from("2024-02-29T10:00:00Z"));
        assert_eq!(map["tags"], Value::seq(["a", "b"]));
        assert_eq!(map["limits"], Value::map([("max", 3_i64)]));
    }

    #[test]
    fn test_json_numbers() {
        let value = value_from_json(&json!({
            "small": -1,
            "big": u64::MAX,
            "float": 1.5,
            "none": null,
        }));
        assert_eq!(
            value,
            Value::map([
                ("small", Value::I64(-1)),
                ("big", Value::U64(u64::MAX)),
                ("float", Value::F64(1.5)),
                ("none", Value::Null),
            ])
        );
    }
}
