use crate::core::{MutationContext, ObjectKind, PropertyKey, Realm, Value};
use crate::js_array::{create_array_from, get_array_length};
use crate::js_date::date_to_iso_string;
use crate::unicode::{utf8_to_utf16, utf16_to_utf8};

/// Build plain objects and arrays from parsed JSON, as `JSON.parse` does.
pub fn json_to_value<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, json_value: &serde_json::Value) -> Value<'gc> {
    match json_value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(utf8_to_utf16(s)),
        serde_json::Value::Array(arr) => {
            let items = arr.iter().map(|item| json_to_value(mc, realm, item)).collect();
            Value::Object(create_array_from(mc, realm, items))
        }
        serde_json::Value::Object(obj) => {
            let js_obj = realm.new_object(mc);
            for (key, value) in obj {
                let js_val = json_to_value(mc, realm, value);
                js_obj.borrow_mut(mc).insert(key.as_str(), js_val);
            }
            Value::Object(js_obj)
        }
    }
}

/// Parse JSON text straight into a value.
pub fn parse_json<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, text: &str) -> Result<Value<'gc>, serde_json::Error> {
    let parsed: serde_json::Value = serde_json::from_str(text)?;
    Ok(json_to_value(mc, realm, &parsed))
}

/// Render a value the way `JSON.stringify` would see it. Returns `None` for
/// values JSON cannot represent (undefined, functions, symbols); inside
/// arrays those and holes become `null`, inside objects they are skipped.
///
/// Dates render as ISO strings and RegExps/Maps/Sets as `{}`. Cyclic input
/// is not detected.
pub fn value_to_json(js_value: &Value<'_>) -> Option<serde_json::Value> {
    match js_value {
        Value::Undefined | Value::Function(_) | Value::Symbol(_) => None,
        Value::Null => Some(serde_json::Value::Null),
        Value::Boolean(b) => Some(serde_json::Value::Bool(*b)),
        Value::Number(n) => {
            if !n.is_finite() {
                Some(serde_json::Value::Null)
            } else if *n == n.trunc() && n.abs() < 9.007_199_254_740_992e15 {
                Some(serde_json::Value::Number(serde_json::Number::from(*n as i64)))
            } else {
                serde_json::Number::from_f64(*n).map(serde_json::Value::Number)
            }
        }
        Value::BigInt(b) => Some(serde_json::Value::String(b.to_string())),
        Value::String(s) => Some(serde_json::Value::String(utf16_to_utf8(s))),
        Value::Object(obj) => {
            let kind = obj.borrow().kind.clone();
            match kind {
                ObjectKind::Date { .. } => Some(date_to_iso_string(obj).map(serde_json::Value::String).unwrap_or(serde_json::Value::Null)),
                ObjectKind::Array => {
                    let len = get_array_length(obj).unwrap_or(0);
                    log::trace!("value_to_json: array length = {}", len);
                    let mut arr = Vec::with_capacity(len);
                    for i in 0..len {
                        let item = obj.borrow().properties.get(&PropertyKey::from(i)).cloned();
                        arr.push(item.and_then(|v| value_to_json(&v)).unwrap_or(serde_json::Value::Null));
                    }
                    Some(serde_json::Value::Array(arr))
                }
                _ => {
                    let entries: Vec<(String, Value<'_>)> = {
                        let data = obj.borrow();
                        data.properties
                            .iter()
                            .filter(|(k, _)| data.is_enumerable(k))
                            .filter_map(|(k, v)| match k {
                                PropertyKey::String(s) => Some((s.clone(), v.clone())),
                                PropertyKey::Symbol(_) => None,
                            })
                            .collect()
                    };
                    let mut map = serde_json::Map::new();
                    for (key, value) in entries {
                        if let Some(json_val) = value_to_json(&value) {
                            map.insert(key, json_val);
                        }
                    }
                    Some(serde_json::Value::Object(map))
                }
            }
        }
        _ => Some(serde_json::Value::Object(serde_json::Map::new())),
    }
}
