use crate::core::{GcPtr, JSMap, MutationContext, Value, new_gc_cell_ptr, same_value_zero};

/// `new Map()`
pub fn create_map<'gc>(mc: &MutationContext<'gc>) -> GcPtr<'gc, JSMap<'gc>> {
    new_gc_cell_ptr(mc, JSMap { entries: Vec::new() })
}

/// `new Map(entries)`; later duplicates overwrite earlier ones in place.
pub fn create_map_from<'gc>(mc: &MutationContext<'gc>, entries: Vec<(Value<'gc>, Value<'gc>)>) -> GcPtr<'gc, JSMap<'gc>> {
    let map = create_map(mc);
    for (k, v) in entries {
        map_set(mc, &map, k, v);
    }
    map
}

/// `map.set(key, value)`. `-0` keys are normalized to `+0`.
pub fn map_set<'gc>(mc: &MutationContext<'gc>, map: &GcPtr<'gc, JSMap<'gc>>, key: Value<'gc>, value: Value<'gc>) {
    let key = normalize_key(key);
    let mut data = map.borrow_mut(mc);
    if let Some(entry) = data.entries.iter_mut().find(|(k, _)| same_value_zero(k, &key)) {
        entry.1 = value;
    } else {
        data.entries.push((key, value));
    }
}

pub fn map_get<'gc>(map: &GcPtr<'gc, JSMap<'gc>>, key: &Value<'gc>) -> Option<Value<'gc>> {
    map.borrow().entries.iter().find(|(k, _)| same_value_zero(k, key)).map(|(_, v)| v.clone())
}

pub fn map_has<'gc>(map: &GcPtr<'gc, JSMap<'gc>>, key: &Value<'gc>) -> bool {
    map.borrow().entries.iter().any(|(k, _)| same_value_zero(k, key))
}

pub fn map_delete<'gc>(mc: &MutationContext<'gc>, map: &GcPtr<'gc, JSMap<'gc>>, key: &Value<'gc>) -> bool {
    let mut data = map.borrow_mut(mc);
    match data.entries.iter().position(|(k, _)| same_value_zero(k, key)) {
        Some(pos) => {
            data.entries.remove(pos);
            true
        }
        None => false,
    }
}

/// `map.size`
pub fn map_size(map: &GcPtr<'_, JSMap<'_>>) -> usize {
    map.borrow().entries.len()
}

pub(crate) fn normalize_key(key: Value<'_>) -> Value<'_> {
    match key {
        Value::Number(n) if n == 0.0 => Value::Number(0.0),
        other => other,
    }
}
