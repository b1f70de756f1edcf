use crate::core::{
    JSObjectDataPtr, MutationContext, ObjectKind, PropertyKey, Realm, Value, define_hidden_property, get_own_property, new_object_with,
};

/// Create an empty array whose prototype is `Array.prototype`.
pub fn create_array<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>) -> JSObjectDataPtr<'gc> {
    create_array_with_prototype(mc, realm.prototype("Array"))
}

pub(crate) fn create_array_with_prototype<'gc>(mc: &MutationContext<'gc>, prototype: Option<JSObjectDataPtr<'gc>>) -> JSObjectDataPtr<'gc> {
    let arr = new_object_with(mc, ObjectKind::Array, prototype);
    set_array_length(mc, &arr, 0);
    arr
}

/// `[a, b, c]`
pub fn create_array_from<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, items: Vec<Value<'gc>>) -> JSObjectDataPtr<'gc> {
    let arr = create_array(mc, realm);
    let len = items.len();
    {
        let mut data = arr.borrow_mut(mc);
        for (i, item) in items.into_iter().enumerate() {
            data.insert(i, item);
        }
    }
    set_array_length(mc, &arr, len);
    arr
}

/// Array from optional slots; `None` leaves a hole, as in `[1, , 3]`.
pub fn create_sparse_array<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, slots: Vec<Option<Value<'gc>>>) -> JSObjectDataPtr<'gc> {
    let arr = create_array(mc, realm);
    let len = slots.len();
    {
        let mut data = arr.borrow_mut(mc);
        for (i, slot) in slots.into_iter().enumerate() {
            if let Some(item) = slot {
                data.insert(i, item);
            }
        }
    }
    set_array_length(mc, &arr, len);
    arr
}

pub fn is_array(obj: &JSObjectDataPtr<'_>) -> bool {
    obj.borrow().is_array()
}

pub fn get_array_length(obj: &JSObjectDataPtr<'_>) -> Option<usize> {
    match get_own_property(obj, "length") {
        Some(Value::Number(n)) if n >= 0.0 && n.fract() == 0.0 => Some(n as usize),
        _ => None,
    }
}

pub fn set_array_length<'gc>(mc: &MutationContext<'gc>, obj: &JSObjectDataPtr<'gc>, len: usize) {
    define_hidden_property(mc, obj, "length", Value::Number(len as f64));
}

pub fn array_get<'gc>(obj: &JSObjectDataPtr<'gc>, index: usize) -> Option<Value<'gc>> {
    get_own_property(obj, index)
}

/// Whether `index in arr`: false for holes.
pub fn array_has_index(obj: &JSObjectDataPtr<'_>, index: usize) -> bool {
    obj.borrow().properties.contains_key(&PropertyKey::from(index))
}

pub fn array_push<'gc>(mc: &MutationContext<'gc>, obj: &JSObjectDataPtr<'gc>, value: Value<'gc>) -> usize {
    let len = get_array_length(obj).unwrap_or(0);
    obj.borrow_mut(mc).insert(len, value);
    set_array_length(mc, obj, len + 1);
    len + 1
}
