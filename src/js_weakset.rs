use crate::core::{Gc, GcPtr, JSWeakSet, MutationContext, Value, new_gc_cell_ptr};
use crate::error::JSError;
use crate::raise_type_error;

/// `new WeakSet()`
pub fn create_weakset<'gc>(mc: &MutationContext<'gc>) -> GcPtr<'gc, JSWeakSet<'gc>> {
    new_gc_cell_ptr(mc, JSWeakSet { values: Vec::new() })
}

pub fn weakset_add<'gc>(mc: &MutationContext<'gc>, set: &GcPtr<'gc, JSWeakSet<'gc>>, value: &Value<'gc>) -> Result<(), JSError> {
    let Value::Object(obj) = value else {
        return Err(raise_type_error!("Invalid value used in weak set"));
    };
    if !weakset_has(mc, set, value) {
        set.borrow_mut(mc).values.push(Gc::downgrade(*obj));
    }
    Ok(())
}

pub fn weakset_has<'gc>(mc: &MutationContext<'gc>, set: &GcPtr<'gc, JSWeakSet<'gc>>, value: &Value<'gc>) -> bool {
    let Value::Object(obj) = value else {
        return false;
    };
    set.borrow().values.iter().any(|w| w.upgrade(mc).is_some_and(|o| Gc::ptr_eq(o, *obj)))
}
