use crate::core::{Collect, Gc, GcCell, GcPtr, GcTrace, GcWeak, MutationContext, PropertyKey, new_gc_cell_ptr};
use crate::js_clone::DeferredClone;
use crate::unicode::{utf8_to_utf16, utf16_to_utf8};
use num_bigint::BigInt;
use std::collections::HashSet;

#[derive(Clone, Debug, Collect)]
#[collect(require_static)]
pub struct SymbolData {
    pub description: Option<String>,
}

/// Native function placeholder. Functions are shared, never copied, so only
/// their identity and name matter here.
#[derive(Clone, Debug, Collect)]
#[collect(require_static)]
pub struct FunctionData {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Collect)]
#[collect(require_static)]
pub struct RegExpFlags {
    pub has_indices: bool,
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub unicode_sets: bool,
    pub sticky: bool,
}

/// Internal class of an object. The payload holds what JavaScript keeps in
/// internal slots.
#[derive(Clone, Debug, Default, PartialEq, Collect)]
#[collect(require_static)]
pub enum ObjectKind {
    #[default]
    Ordinary,
    Array,
    Date {
        time: f64,
    },
    RegExp {
        source: Vec<u16>,
        flags: RegExpFlags,
    },
    Error,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Array => "Array",
            ObjectKind::Date { .. } => "Date",
            ObjectKind::RegExp { .. } => "RegExp",
            ObjectKind::Error => "Error",
        }
    }
}

pub type JSObjectDataPtr<'gc> = GcPtr<'gc, JSObjectData<'gc>>;

#[inline]
pub fn new_js_object_data<'gc>(mc: &MutationContext<'gc>) -> JSObjectDataPtr<'gc> {
    new_gc_cell_ptr(mc, JSObjectData::new(ObjectKind::Ordinary, None))
}

#[inline]
pub fn new_object_with<'gc>(mc: &MutationContext<'gc>, kind: ObjectKind, prototype: Option<JSObjectDataPtr<'gc>>) -> JSObjectDataPtr<'gc> {
    new_gc_cell_ptr(mc, JSObjectData::new(kind, prototype))
}

#[derive(Clone, Default)]
pub struct JSObjectData<'gc> {
    pub properties: indexmap::IndexMap<PropertyKey<'gc>, Value<'gc>>,
    pub non_enumerable: HashSet<PropertyKey<'gc>>,
    pub prototype: Option<JSObjectDataPtr<'gc>>,
    pub kind: ObjectKind,
}

unsafe impl<'gc> Collect<'gc> for JSObjectData<'gc> {
    fn trace<T: GcTrace<'gc>>(&self, cc: &mut T) {
        for (k, v) in &self.properties {
            k.trace(cc);
            v.trace(cc);
        }
        for k in &self.non_enumerable {
            k.trace(cc);
        }
        if let Some(p) = &self.prototype {
            p.trace(cc);
        }
    }
}

impl<'gc> JSObjectData<'gc> {
    pub fn new(kind: ObjectKind, prototype: Option<JSObjectDataPtr<'gc>>) -> Self {
        JSObjectData {
            kind,
            prototype,
            ..JSObjectData::default()
        }
    }

    pub fn insert(&mut self, key: impl Into<PropertyKey<'gc>>, val: Value<'gc>) {
        self.properties.insert(key.into(), val);
    }

    pub fn get_own(&self, key: &PropertyKey<'gc>) -> Option<&Value<'gc>> {
        self.properties.get(key)
    }

    pub fn set_non_enumerable(&mut self, key: impl Into<PropertyKey<'gc>>) {
        let key = key.into();
        log::trace!("set_non_enumerable: obj_ptr={:p} key={}", self as *const _, key);
        self.non_enumerable.insert(key);
    }

    pub fn set_enumerable(&mut self, key: impl Into<PropertyKey<'gc>>) {
        let key = key.into();
        log::trace!("set_enumerable: obj_ptr={:p} key={}", self as *const _, key);
        self.non_enumerable.remove(&key);
    }

    pub fn is_enumerable(&self, key: &PropertyKey<'gc>) -> bool {
        !self.non_enumerable.contains(key)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array)
    }
}

#[derive(Clone, Collect)]
#[collect(no_drop)]
pub struct JSMap<'gc> {
    pub entries: Vec<(Value<'gc>, Value<'gc>)>,
}

#[derive(Clone, Collect)]
#[collect(no_drop)]
pub struct JSSet<'gc> {
    pub values: Vec<Value<'gc>>,
}

#[derive(Clone, Collect)]
#[collect(no_drop)]
pub struct JSWeakMap<'gc> {
    pub entries: Vec<(GcWeak<'gc, GcCell<JSObjectData<'gc>>>, Value<'gc>)>,
}

#[derive(Clone, Collect)]
#[collect(no_drop)]
pub struct JSWeakSet<'gc> {
    pub values: Vec<GcWeak<'gc, GcCell<JSObjectData<'gc>>>>,
}

#[derive(Clone, Debug, Default, Collect)]
#[collect(require_static)]
pub struct JSArrayBuffer {
    pub data: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Collect)]
#[collect(require_static)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    BigInt64,
    BigUint64,
}

#[derive(Clone, Collect)]
#[collect(no_drop)]
pub struct JSTypedArray<'gc> {
    pub kind: TypedArrayKind,
    pub buffer: GcPtr<'gc, JSArrayBuffer>,
    pub byte_offset: usize,
    pub length: usize,
}

#[derive(Clone, Collect)]
#[collect(no_drop)]
pub enum PromiseState<'gc> {
    Pending,
    Fulfilled(Value<'gc>),
    Rejected(Value<'gc>),
}

/// Work queued on a pending promise, run once it settles.
#[derive(Clone, Collect)]
#[collect(no_drop)]
pub enum PromiseReaction<'gc> {
    /// Settle `target` with the same outcome.
    Adopt { target: GcPtr<'gc, JSPromise<'gc>> },
    /// Settle `target` with a deep clone of the outcome.
    Clone {
        target: GcPtr<'gc, JSPromise<'gc>>,
        job: Gc<'gc, DeferredClone<'gc>>,
    },
}

#[derive(Clone, Collect)]
#[collect(no_drop)]
pub struct JSPromise<'gc> {
    pub state: PromiseState<'gc>,
    pub reactions: Vec<PromiseReaction<'gc>>,
}

impl<'gc> JSPromise<'gc> {
    pub fn new() -> Self {
        Self {
            state: PromiseState::Pending,
            reactions: Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, PromiseState::Pending)
    }
}

impl Default for JSPromise<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JSPromise<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            PromiseState::Pending => "pending",
            PromiseState::Fulfilled(_) => "fulfilled",
            PromiseState::Rejected(_) => "rejected",
        };
        write!(f, "JSPromise {{ state: {}, reactions: {} }}", state, self.reactions.len())
    }
}

#[derive(Clone)]
pub enum Value<'gc> {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    BigInt(BigInt),
    String(Vec<u16>),
    Symbol(Gc<'gc, SymbolData>),
    Object(JSObjectDataPtr<'gc>),
    Function(Gc<'gc, FunctionData>),
    Map(GcPtr<'gc, JSMap<'gc>>),
    Set(GcPtr<'gc, JSSet<'gc>>),
    WeakMap(GcPtr<'gc, JSWeakMap<'gc>>),
    WeakSet(GcPtr<'gc, JSWeakSet<'gc>>),
    ArrayBuffer(GcPtr<'gc, JSArrayBuffer>),
    TypedArray(Gc<'gc, JSTypedArray<'gc>>),
    Promise(GcPtr<'gc, JSPromise<'gc>>),
}

unsafe impl<'gc> Collect<'gc> for Value<'gc> {
    fn trace<T: GcTrace<'gc>>(&self, cc: &mut T) {
        match self {
            Value::Symbol(s) => s.trace(cc),
            Value::Object(obj) => obj.trace(cc),
            Value::Function(f) => f.trace(cc),
            Value::Map(m) => m.trace(cc),
            Value::Set(s) => s.trace(cc),
            Value::WeakMap(m) => m.trace(cc),
            Value::WeakSet(s) => s.trace(cc),
            Value::ArrayBuffer(b) => b.trace(cc),
            Value::TypedArray(t) => t.trace(cc),
            Value::Promise(p) => p.trace(cc),
            Value::Undefined | Value::Null | Value::Boolean(_) | Value::Number(_) | Value::BigInt(_) | Value::String(_) => {}
        }
    }
}

impl<'gc> Value<'gc> {
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// True for values that live on the heap and have identity.
    /// Symbols are excluded: they are primitives even though they are
    /// allocated.
    pub fn is_object_like(&self) -> bool {
        !matches!(
            self,
            Value::Undefined | Value::Null | Value::Boolean(_) | Value::Number(_) | Value::BigInt(_) | Value::String(_) | Value::Symbol(_)
        )
    }

    pub fn as_object(&self) -> Option<JSObjectDataPtr<'gc>> {
        match self {
            Value::Object(obj) => Some(*obj),
            _ => None,
        }
    }

    /// Result of the JavaScript `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Function(_) => "function",
            _ => "object",
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(utf16_to_utf8(s)),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::BigInt(b) => write!(f, "{}n", b),
            Value::String(s) => write!(f, "{:?}", utf16_to_utf8(s)),
            Value::Symbol(s) => write!(f, "Symbol({})", s.description.as_deref().unwrap_or("")),
            Value::Object(obj) => write!(f, "[object {} {:p}]", obj.borrow().kind.name(), Gc::as_ptr(*obj)),
            Value::Function(func) => write!(f, "[function {}]", func.name),
            Value::Map(m) => write!(f, "Map({}) {:p}", m.borrow().entries.len(), Gc::as_ptr(*m)),
            Value::Set(s) => write!(f, "Set({}) {:p}", s.borrow().values.len(), Gc::as_ptr(*s)),
            Value::WeakMap(m) => write!(f, "WeakMap {:p}", Gc::as_ptr(*m)),
            Value::WeakSet(s) => write!(f, "WeakSet {:p}", Gc::as_ptr(*s)),
            Value::ArrayBuffer(b) => write!(f, "ArrayBuffer({})", b.borrow().data.len()),
            Value::TypedArray(t) => write!(f, "{:?}Array({})", t.kind, t.length),
            Value::Promise(p) => write!(f, "{:?}", *p.borrow()),
        }
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value<'_> {
    fn from(s: &str) -> Self {
        Value::String(utf8_to_utf16(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(utf8_to_utf16(&s))
    }
}

impl<'gc> From<JSObjectDataPtr<'gc>> for Value<'gc> {
    fn from(obj: JSObjectDataPtr<'gc>) -> Self {
        Value::Object(obj)
    }
}

pub fn new_symbol<'gc>(mc: &MutationContext<'gc>, description: Option<&str>) -> Gc<'gc, SymbolData> {
    Gc::new(
        mc,
        SymbolData {
            description: description.map(str::to_string),
        },
    )
}

pub fn new_function<'gc>(mc: &MutationContext<'gc>, name: &str) -> Value<'gc> {
    Value::Function(Gc::new(mc, FunctionData { name: name.to_string() }))
}

pub fn get_own_property<'gc>(obj: &JSObjectDataPtr<'gc>, key: impl Into<PropertyKey<'gc>>) -> Option<Value<'gc>> {
    obj.borrow().properties.get(&key.into()).cloned()
}

/// Property lookup along the prototype chain.
pub fn object_get_key_value<'gc>(obj: &JSObjectDataPtr<'gc>, key: impl Into<PropertyKey<'gc>>) -> Option<Value<'gc>> {
    let key = key.into();
    let mut current = Some(*obj);
    while let Some(o) = current {
        let data = o.borrow();
        if let Some(v) = data.properties.get(&key) {
            return Some(v.clone());
        }
        current = data.prototype;
    }
    None
}

pub fn object_set_key_value<'gc>(mc: &MutationContext<'gc>, obj: &JSObjectDataPtr<'gc>, key: impl Into<PropertyKey<'gc>>, val: Value<'gc>) {
    obj.borrow_mut(mc).insert(key, val);
}

/// Define an own property that `for..in` and `Object.keys` skip.
pub fn define_hidden_property<'gc>(
    mc: &MutationContext<'gc>,
    obj: &JSObjectDataPtr<'gc>,
    key: impl Into<PropertyKey<'gc>>,
    val: Value<'gc>,
) {
    let key = key.into();
    let mut data = obj.borrow_mut(mc);
    data.insert(key.clone(), val);
    data.set_non_enumerable(key);
}

/// Own enumerable string keys in insertion order, as `Object.keys` reports them.
pub fn own_enumerable_keys<'gc>(obj: &JSObjectDataPtr<'gc>) -> Vec<String> {
    let data = obj.borrow();
    data.properties
        .keys()
        .filter(|k| data.is_enumerable(k))
        .filter_map(|k| match k {
            PropertyKey::String(s) => Some(s.clone()),
            PropertyKey::Symbol(_) => None,
        })
        .collect()
}

/// The constructor object reachable through `value.constructor`, if any.
pub fn constructor_of<'gc>(obj: &JSObjectDataPtr<'gc>) -> Option<JSObjectDataPtr<'gc>> {
    match object_get_key_value(obj, "constructor") {
        Some(Value::Object(ctor)) => Some(ctor),
        _ => None,
    }
}
