//! Deep cloning of JavaScript values.
//!
//! [`deep_clone`] copies a value graph so that every reachable object gets a
//! distinct counterpart. A per-call [`CloneRegistry`] maps each source
//! object to its clone: shells are registered before their children are
//! cloned, so cycles and shared subtrees come out with the same shape as in
//! the source.
//!
//! Children are not cloned by recursion. A container cloner allocates its
//! shell, reserves a slot for every child and pushes one task per
//! child; the cloner drains the task stack until it is empty. The depth of
//! the input is bounded by `recursion_limit`, not by the host stack.
//!
//! Dispatch order for object-like values: a matching constructor handler,
//! then the built-in cloners (Date, RegExp, Map, Set, ArrayBuffer and typed
//! arrays, Array, Error, Promise, plain Object). Functions are shared.
//! WeakMap, WeakSet and anything else without a cloner are shared too.

mod containers;
mod options;
mod registry;

pub use options::*;
pub use registry::*;

use crate::core::{
    Collect, EvalError, GcPtr, JSMap, JSObjectDataPtr, JSPromise, JSSet, MutationContext, ObjectKind, PromiseState, PropertyKey, Realm, Value,
    constructor_of, new_gc_cell_ptr,
};
use crate::error::JSError;
use crate::js_promise::settle_promise;

/// Deep-clone `value` within `realm`.
///
/// Options are validated first; a malformed option fails before anything is
/// copied. Errors raised while cloning (including values thrown by
/// constructor handlers) are returned unchanged.
pub fn deep_clone<'gc>(
    mc: &MutationContext<'gc>,
    realm: &Realm<'gc>,
    value: &Value<'gc>,
    options: &CloneOptions<'gc>,
) -> Result<Value<'gc>, EvalError<'gc>> {
    options.validate_in(realm)?;
    log::debug!(
        "deep_clone: {:?} circular={} depth={:?} preserve_prototype={} handlers={}",
        value,
        options.circular,
        options.depth,
        options.preserve_prototype,
        options.constructor_handlers.len()
    );
    let registry = new_gc_cell_ptr(mc, CloneRegistry::new());
    let mut cloner = Cloner::new(mc, realm, options, registry, options.depth);
    let result = cloner.run(value);
    log::debug!("deep_clone: finished, {} objects registered", registry.borrow().len());
    result
}

/// [`deep_clone`] with default options.
pub fn clone_deep<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, value: &Value<'gc>) -> Result<Value<'gc>, EvalError<'gc>> {
    deep_clone(mc, realm, value, &CloneOptions::default())
}

/// Where the clone of a child goes once it is built.
enum Slot<'gc> {
    Property { target: JSObjectDataPtr<'gc>, key: PropertyKey<'gc> },
    MapKey { target: GcPtr<'gc, JSMap<'gc>>, index: usize },
    MapValue { target: GcPtr<'gc, JSMap<'gc>>, index: usize },
    SetMember { target: GcPtr<'gc, JSSet<'gc>>, index: usize },
    Settle { target: GcPtr<'gc, JSPromise<'gc>>, fulfilled: bool },
}

/// A child waiting to be cloned, with the depth budget and nesting level it
/// is cloned at.
struct Task<'gc> {
    source: Value<'gc>,
    slot: Slot<'gc>,
    depth: Option<usize>,
    nesting: usize,
}

/// State of one clone operation, handed to constructor handlers so they can
/// allocate on the heap and clone children.
pub struct Cloner<'a, 'gc> {
    mc: &'a MutationContext<'gc>,
    realm: &'a Realm<'gc>,
    options: &'a CloneOptions<'gc>,
    registry: GcPtr<'gc, CloneRegistry<'gc>>,
    tasks: Vec<Task<'gc>>,
    depth: Option<usize>,
    nesting: usize,
}

impl<'a, 'gc> Cloner<'a, 'gc> {
    fn new(
        mc: &'a MutationContext<'gc>,
        realm: &'a Realm<'gc>,
        options: &'a CloneOptions<'gc>,
        registry: GcPtr<'gc, CloneRegistry<'gc>>,
        depth: Option<usize>,
    ) -> Self {
        Cloner {
            mc,
            realm,
            options,
            registry,
            tasks: Vec::new(),
            depth,
            nesting: 0,
        }
    }

    pub fn mutation(&self) -> &'a MutationContext<'gc> {
        self.mc
    }

    pub fn realm(&self) -> &'a Realm<'gc> {
        self.realm
    }

    pub fn options(&self) -> &'a CloneOptions<'gc> {
        self.options
    }

    /// Depth budget left at the value currently being cloned.
    pub fn remaining_depth(&self) -> Option<usize> {
        self.depth
    }

    /// Record `clone` as the counterpart of `source`. Later occurrences of
    /// `source` resolve to `clone`.
    pub fn register(&mut self, source: &Value<'gc>, clone: &Value<'gc>) {
        if self.options.circular {
            self.registry.borrow_mut(self.mc).set(source, clone.clone());
        }
    }

    /// Clone a child of the value being cloned, one level deeper, and return
    /// it fully built.
    pub fn clone_child(&mut self, value: &Value<'gc>) -> Result<Value<'gc>, EvalError<'gc>> {
        if !value.is_object_like() {
            return Ok(value.clone());
        }
        let saved = (self.depth, self.nesting);
        self.depth = saved.0.map(|d| d.saturating_sub(1));
        self.nesting = saved.1 + 1;
        let result = self.check_nesting().and_then(|_| self.run(value));
        (self.depth, self.nesting) = saved;
        result
    }

    /// Clone `value` at the current depth and finish every child it queued.
    fn run(&mut self, value: &Value<'gc>) -> Result<Value<'gc>, EvalError<'gc>> {
        let mark = self.tasks.len();
        let result = self.clone_value(value).and_then(|cloned| self.drain(mark).map(|_| cloned));
        if result.is_err() {
            self.tasks.truncate(mark);
        }
        result
    }

    fn drain(&mut self, mark: usize) -> Result<(), EvalError<'gc>> {
        while self.tasks.len() > mark {
            let Some(task) = self.tasks.pop() else {
                break;
            };
            self.depth = task.depth;
            self.nesting = task.nesting;
            self.check_nesting()?;
            let cloned = self.clone_value(&task.source)?;
            self.fill(task.slot, cloned);
        }
        Ok(())
    }

    fn check_nesting(&self) -> Result<(), EvalError<'gc>> {
        if self.nesting > self.options.recursion_limit {
            return Err(JSError::RecursionLimit {
                limit: self.options.recursion_limit,
            }
            .into());
        }
        Ok(())
    }

    /// Queue `source` to be cloned into `slot` one level below the current
    /// value. Values that are never cloned go straight into the slot.
    fn defer(&mut self, source: Value<'gc>, slot: Slot<'gc>) {
        if !source.is_object_like() || matches!(source, Value::Function(_)) {
            self.fill(slot, source);
            return;
        }
        self.tasks.push(Task {
            source,
            slot,
            depth: self.depth.map(|d| d.saturating_sub(1)),
            nesting: self.nesting + 1,
        });
    }

    fn fill(&self, slot: Slot<'gc>, value: Value<'gc>) {
        match slot {
            Slot::Property { target, key } => {
                target.borrow_mut(self.mc).properties.insert(key, value);
            }
            Slot::MapKey { target, index } => {
                if let Some(entry) = target.borrow_mut(self.mc).entries.get_mut(index) {
                    entry.0 = value;
                }
            }
            Slot::MapValue { target, index } => {
                if let Some(entry) = target.borrow_mut(self.mc).entries.get_mut(index) {
                    entry.1 = value;
                }
            }
            Slot::SetMember { target, index } => {
                if let Some(member) = target.borrow_mut(self.mc).values.get_mut(index) {
                    *member = value;
                }
            }
            Slot::Settle { target, fulfilled } => {
                let state = if fulfilled {
                    PromiseState::Fulfilled(value)
                } else {
                    PromiseState::Rejected(value)
                };
                settle_promise(self.mc, &target, state);
            }
        }
    }

    /// Clone a single value: share it, resolve it through the registry, or
    /// build its shell and queue its children.
    fn clone_value(&mut self, value: &Value<'gc>) -> Result<Value<'gc>, EvalError<'gc>> {
        if !value.is_object_like() || matches!(value, Value::Function(_)) {
            return Ok(value.clone());
        }
        if self.depth == Some(0) {
            log::trace!("clone: depth exhausted, sharing {:?}", value);
            return Ok(value.clone());
        }
        if self.options.circular {
            let existing = self.registry.borrow().get(value);
            if let Some(existing) = existing {
                log::trace!("clone: registry hit for {:?}", value);
                return Ok(existing);
            }
        }

        if let Some(handler) = self.handler_for(value) {
            log::trace!("clone: constructor handler for {:?}", value);
            let cloned = handler(self, value)?;
            if !self.registry.borrow().has(value) {
                self.register(value, &cloned);
            }
            return Ok(cloned);
        }

        log::trace!("clone: {:?} at nesting {}", value, self.nesting);
        let first = self.tasks.len();
        let result = match value {
            Value::Object(obj) => {
                let kind = obj.borrow().kind.clone();
                match kind {
                    ObjectKind::Date { time } => self.clone_date(value, obj, time),
                    ObjectKind::RegExp { source, flags } => self.clone_regexp(value, obj, source, flags),
                    ObjectKind::Array => self.clone_array(value, obj),
                    ObjectKind::Error => self.clone_error(value, obj),
                    ObjectKind::Ordinary => self.clone_object(value, obj),
                }
            }
            Value::Map(map) => self.clone_map(value, map),
            Value::Set(set) => self.clone_set(value, set),
            Value::ArrayBuffer(buffer) => self.clone_array_buffer(value, buffer),
            Value::TypedArray(ta) => self.clone_typed_array(value, ta),
            Value::Promise(promise) if self.options.clone_promises => self.clone_promise(value, promise),
            _ => {
                log::debug!("clone: no cloner for {:?}, sharing the reference", value);
                Ok(value.clone())
            }
        };
        // Children were queued in source order; the stack pops the first one
        // first.
        self.tasks[first..].reverse();
        result
    }

    fn handler_for(&self, value: &Value<'gc>) -> Option<HandlerFn> {
        if self.options.constructor_handlers.is_empty() {
            return None;
        }
        let ctor = self.constructor_for(value)?;
        self.options.handler_for(&ctor)
    }

    fn constructor_for(&self, value: &Value<'gc>) -> Option<JSObjectDataPtr<'gc>> {
        match value {
            Value::Object(obj) => constructor_of(obj),
            Value::Map(_) => self.realm.constructor("Map"),
            Value::Set(_) => self.realm.constructor("Set"),
            Value::WeakMap(_) => self.realm.constructor("WeakMap"),
            Value::WeakSet(_) => self.realm.constructor("WeakSet"),
            Value::ArrayBuffer(_) => self.realm.constructor("ArrayBuffer"),
            Value::TypedArray(ta) => self.realm.constructor(ta.kind.constructor_name()),
            Value::Promise(_) => self.realm.constructor("Promise"),
            _ => None,
        }
    }

    /// Prototype for a new object shell of the given intrinsic kind.
    fn shell_prototype(&self, source: &JSObjectDataPtr<'gc>, intrinsic: &str) -> Option<JSObjectDataPtr<'gc>> {
        if self.options.preserve_prototype {
            source.borrow().prototype
        } else {
            self.realm.prototype(intrinsic)
        }
    }
}

/// A promise clone waiting for its source to settle. Keeps everything the
/// clone needs once the original call has returned, including the registry
/// of that call so the outcome links back to clones made before.
#[derive(Collect)]
#[collect(no_drop)]
pub struct DeferredClone<'gc> {
    realm: Realm<'gc>,
    options: CloneOptions<'gc>,
    registry: GcPtr<'gc, CloneRegistry<'gc>>,
    depth: Option<usize>,
}

/// Clone the outcome a source promise settled with. A failing clone turns
/// into a rejection with the error.
pub(crate) fn run_deferred_clone<'gc>(mc: &MutationContext<'gc>, job: &DeferredClone<'gc>, state: &PromiseState<'gc>) -> PromiseState<'gc> {
    let mut cloner = Cloner::new(mc, &job.realm, &job.options, job.registry, job.depth);
    let (value, fulfilled) = match state {
        PromiseState::Pending => return PromiseState::Pending,
        PromiseState::Fulfilled(v) => (v, true),
        PromiseState::Rejected(v) => (v, false),
    };
    match cloner.run(value) {
        Ok(cloned) if fulfilled => PromiseState::Fulfilled(cloned),
        Ok(cloned) => PromiseState::Rejected(cloned),
        Err(e) => {
            log::debug!("deferred clone failed: {}", e.message());
            PromiseState::Rejected(e.into_thrown_value(mc, &job.realm))
        }
    }
}
