use crate::core::{Gc, GcPtr, JSWeakMap, MutationContext, Value, new_gc_cell_ptr};
use crate::error::JSError;
use crate::raise_type_error;

/// `new WeakMap()`
pub fn create_weakmap<'gc>(mc: &MutationContext<'gc>) -> GcPtr<'gc, JSWeakMap<'gc>> {
    new_gc_cell_ptr(mc, JSWeakMap { entries: Vec::new() })
}

/// `weakmap.set(key, value)`. Only ordinary objects can be keys.
pub fn weakmap_set<'gc>(mc: &MutationContext<'gc>, map: &GcPtr<'gc, JSWeakMap<'gc>>, key: &Value<'gc>, value: Value<'gc>) -> Result<(), JSError> {
    let Value::Object(key_obj) = key else {
        return Err(raise_type_error!("Invalid value used as weak map key"));
    };
    let mut data = map.borrow_mut(mc);
    // Entries whose key has been collected are dropped on the way.
    data.entries.retain(|(k, _)| k.upgrade(mc).is_some());
    if let Some(entry) = data.entries.iter_mut().find(|(k, _)| k.upgrade(mc).is_some_and(|o| Gc::ptr_eq(o, *key_obj))) {
        entry.1 = value;
    } else {
        data.entries.push((Gc::downgrade(*key_obj), value));
    }
    Ok(())
}

pub fn weakmap_get<'gc>(mc: &MutationContext<'gc>, map: &GcPtr<'gc, JSWeakMap<'gc>>, key: &Value<'gc>) -> Option<Value<'gc>> {
    let Value::Object(key_obj) = key else {
        return None;
    };
    map.borrow()
        .entries
        .iter()
        .find(|(k, _)| k.upgrade(mc).is_some_and(|o| Gc::ptr_eq(o, *key_obj)))
        .map(|(_, v)| v.clone())
}
