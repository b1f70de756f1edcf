use crate::core::{GcPtr, JSSet, MutationContext, Value, new_gc_cell_ptr, same_value_zero};
use crate::js_map::normalize_key;

/// `new Set()`
pub fn create_set<'gc>(mc: &MutationContext<'gc>) -> GcPtr<'gc, JSSet<'gc>> {
    new_gc_cell_ptr(mc, JSSet { values: Vec::new() })
}

pub fn create_set_from<'gc>(mc: &MutationContext<'gc>, values: Vec<Value<'gc>>) -> GcPtr<'gc, JSSet<'gc>> {
    let set = create_set(mc);
    for v in values {
        set_add(mc, &set, v);
    }
    set
}

/// `set.add(value)`; returns false when the value was already present.
pub fn set_add<'gc>(mc: &MutationContext<'gc>, set: &GcPtr<'gc, JSSet<'gc>>, value: Value<'gc>) -> bool {
    let value = normalize_key(value);
    let mut data = set.borrow_mut(mc);
    if data.values.iter().any(|v| same_value_zero(v, &value)) {
        return false;
    }
    data.values.push(value);
    true
}

pub fn set_has<'gc>(set: &GcPtr<'gc, JSSet<'gc>>, value: &Value<'gc>) -> bool {
    set.borrow().values.iter().any(|v| same_value_zero(v, value))
}

/// `set.size`
pub fn set_size(set: &GcPtr<'_, JSSet<'_>>) -> usize {
    set.borrow().values.len()
}
