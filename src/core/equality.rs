use crate::core::{Gc, JSObjectDataPtr, ObjectKind, PromiseState, PropertyKey, Value, get_error_message, get_error_name};
use std::collections::{HashMap, HashSet};

/// Heap identity of a value, or `None` for primitives. Symbols are
/// primitives but still compare by identity, so they report one too.
pub fn value_identity(value: &Value<'_>) -> Option<*const ()> {
    let ptr = match value {
        Value::Symbol(s) => Gc::as_ptr(*s) as *const (),
        Value::Object(o) => Gc::as_ptr(*o) as *const (),
        Value::Function(f) => Gc::as_ptr(*f) as *const (),
        Value::Map(m) => Gc::as_ptr(*m) as *const (),
        Value::Set(s) => Gc::as_ptr(*s) as *const (),
        Value::WeakMap(m) => Gc::as_ptr(*m) as *const (),
        Value::WeakSet(s) => Gc::as_ptr(*s) as *const (),
        Value::ArrayBuffer(b) => Gc::as_ptr(*b) as *const (),
        Value::TypedArray(t) => Gc::as_ptr(*t) as *const (),
        Value::Promise(p) => Gc::as_ptr(*p) as *const (),
        Value::Undefined | Value::Null | Value::Boolean(_) | Value::Number(_) | Value::BigInt(_) | Value::String(_) => return None,
    };
    Some(ptr)
}

/// The SameValueZero comparison used for Map keys and Set members.
pub fn same_value_zero(a: &Value<'_>, b: &Value<'_>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        _ => match (value_identity(a), value_identity(b)) {
            (Some(p), Some(q)) => p == q,
            _ => false,
        },
    }
}

/// Structural equality over every supported value kind.
///
/// Heap values are equal when they are the same allocation or have equal
/// structure: the same kind, the same own enumerable string keys (holes
/// included) with pairwise deep-equal values, and equal internal state
/// (time value, pattern, entries, bytes). Prototypes and non-enumerable
/// properties are not compared. Cycles are handled by treating a pair that
/// is already under comparison as equal.
pub fn deep_equal<'gc>(a: &Value<'gc>, b: &Value<'gc>) -> bool {
    DeepEqual::default().values(a, b)
}

#[derive(Default)]
struct DeepEqual {
    in_progress: HashSet<(*const (), *const ())>,
}

impl DeepEqual {
    fn values<'gc>(&mut self, a: &Value<'gc>, b: &Value<'gc>) -> bool {
        let (pa, pb) = match (value_identity(a), value_identity(b)) {
            (Some(pa), Some(pb)) => (pa, pb),
            (None, None) => return same_value_zero(a, b),
            _ => return false,
        };
        if pa == pb {
            return true;
        }
        if !self.in_progress.insert((pa, pb)) {
            return true;
        }

        match (a, b) {
            (Value::Object(x), Value::Object(y)) => self.objects(x, y),
            (Value::Map(x), Value::Map(y)) => {
                let left = x.borrow().entries.clone();
                let right = y.borrow().entries.clone();
                left.len() == right.len()
                    && left
                        .iter()
                        .zip(right.iter())
                        .all(|((k1, v1), (k2, v2))| self.values(k1, k2) && self.values(v1, v2))
            }
            (Value::Set(x), Value::Set(y)) => {
                let left = x.borrow().values.clone();
                let right = y.borrow().values.clone();
                left.len() == right.len() && left.iter().zip(right.iter()).all(|(v1, v2)| self.values(v1, v2))
            }
            (Value::ArrayBuffer(x), Value::ArrayBuffer(y)) => x.borrow().data == y.borrow().data,
            (Value::TypedArray(x), Value::TypedArray(y)) => {
                x.kind == y.kind
                    && x.byte_offset == y.byte_offset
                    && x.length == y.length
                    && self.values(&Value::ArrayBuffer(x.buffer), &Value::ArrayBuffer(y.buffer))
            }
            (Value::Promise(x), Value::Promise(y)) => {
                let left = x.borrow().state.clone();
                let right = y.borrow().state.clone();
                match (left, right) {
                    (PromiseState::Pending, PromiseState::Pending) => true,
                    (PromiseState::Fulfilled(v1), PromiseState::Fulfilled(v2)) => self.values(&v1, &v2),
                    (PromiseState::Rejected(v1), PromiseState::Rejected(v2)) => self.values(&v1, &v2),
                    _ => false,
                }
            }
            // Functions, symbols and weak collections only equal themselves.
            _ => false,
        }
    }

    fn objects<'gc>(&mut self, x: &JSObjectDataPtr<'gc>, y: &JSObjectDataPtr<'gc>) -> bool {
        let (kx, ky) = (x.borrow().kind.clone(), y.borrow().kind.clone());
        let same_kind = match (&kx, &ky) {
            (ObjectKind::Ordinary, ObjectKind::Ordinary) => true,
            (ObjectKind::Array, ObjectKind::Array) => {
                self.values(&own_value(x, "length"), &own_value(y, "length"))
            }
            (ObjectKind::Date { time: t1 }, ObjectKind::Date { time: t2 }) => (t1.is_nan() && t2.is_nan()) || t1 == t2,
            (ObjectKind::RegExp { source: s1, flags: f1 }, ObjectKind::RegExp { source: s2, flags: f2 }) => s1 == s2 && f1 == f2,
            (ObjectKind::Error, ObjectKind::Error) => get_error_message(x) == get_error_message(y) && get_error_name(x) == get_error_name(y),
            _ => false,
        };
        if !same_kind {
            return false;
        }

        let left = enumerable_entries(x);
        let right = enumerable_entries(y);
        if left.len() != right.len() {
            return false;
        }
        let right: HashMap<String, Value<'gc>> = right.into_iter().collect();
        left.iter().all(|(k, v1)| match right.get(k) {
            Some(v2) => self.values(v1, v2),
            None => false,
        })
    }
}

fn own_value<'gc>(obj: &JSObjectDataPtr<'gc>, key: &str) -> Value<'gc> {
    obj.borrow()
        .properties
        .get(&PropertyKey::from(key))
        .cloned()
        .unwrap_or(Value::Undefined)
}

fn enumerable_entries<'gc>(obj: &JSObjectDataPtr<'gc>) -> Vec<(String, Value<'gc>)> {
    let data = obj.borrow();
    data.properties
        .iter()
        .filter(|(k, _)| data.is_enumerable(k))
        .filter_map(|(k, v)| match k {
            PropertyKey::String(s) => Some((s.clone(), v.clone())),
            PropertyKey::Symbol(_) => None,
        })
        .collect()
}
