use crate::core::{Collect, EvalError, Gc, JSObjectDataPtr, Realm, Value, is_constructor, object_get_key_value};
use crate::error::JSError;
use crate::js_clone::Cloner;
use crate::{raise_range_error, raise_type_error};
use std::rc::Rc;

/// Nested descents allowed before cloning fails with a `RangeError`.
///
/// Cloning does not recurse on the host stack, so this only has to stop a
/// `circular: false` clone of a cyclic graph from allocating forever.
pub const DEFAULT_RECURSION_LIMIT: usize = 100_000;

/// A constructor handler: builds the clone of `value` itself, recursing into
/// children through the cloner it is given.
///
/// A handler that builds a container should call [`Cloner::register`] with
/// its shell before cloning children, so cycles back to `value` resolve to
/// that shell.
pub type HandlerFn = Rc<dyn for<'a, 'gc> Fn(&mut Cloner<'a, 'gc>, &Value<'gc>) -> Result<Value<'gc>, EvalError<'gc>>>;

#[derive(Clone, Collect)]
#[collect(require_static)]
struct StaticHandler(HandlerFn);

#[derive(Clone, Collect)]
#[collect(no_drop)]
pub struct ConstructorHandler<'gc> {
    pub constructor: Value<'gc>,
    handler: StaticHandler,
}

/// Options of one `deep_clone` call.
#[derive(Clone, Collect)]
#[collect(no_drop)]
pub struct CloneOptions<'gc> {
    /// Track visited values so cycles and shared subtrees are reproduced.
    /// Without it every occurrence is copied separately and a cycle runs
    /// into the recursion limit.
    pub circular: bool,
    /// Remaining depth budget; `None` is unbounded and `Some(0)` returns the
    /// input itself.
    pub depth: Option<usize>,
    /// Give object clones the source's prototype instead of the realm's
    /// intrinsic one.
    pub preserve_prototype: bool,
    pub include_non_enumerable: bool,
    pub include_symbols: bool,
    /// Clone promises into promises settling with a clone of the outcome.
    /// When off, promises are shared.
    pub clone_promises: bool,
    pub recursion_limit: usize,
    pub constructor_handlers: Vec<ConstructorHandler<'gc>>,
}

impl Default for CloneOptions<'_> {
    fn default() -> Self {
        CloneOptions {
            circular: true,
            depth: None,
            preserve_prototype: false,
            include_non_enumerable: false,
            include_symbols: false,
            clone_promises: true,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            constructor_handlers: Vec::new(),
        }
    }
}

impl<'gc> CloneOptions<'gc> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn preserve_prototype(mut self, preserve: bool) -> Self {
        self.preserve_prototype = preserve;
        self
    }

    pub fn include_non_enumerable(mut self, include: bool) -> Self {
        self.include_non_enumerable = include;
        self
    }

    pub fn include_symbols(mut self, include: bool) -> Self {
        self.include_symbols = include;
        self
    }

    pub fn clone_promises(mut self, clone: bool) -> Self {
        self.clone_promises = clone;
        self
    }

    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Register `handler` for values whose `constructor` is `constructor`.
    /// Handlers are consulted before the built-in cloners, first match wins.
    pub fn with_handler<F>(mut self, constructor: impl Into<Value<'gc>>, handler: F) -> Self
    where
        F: for<'a, 'x> Fn(&mut Cloner<'a, 'x>, &Value<'x>) -> Result<Value<'x>, EvalError<'x>> + 'static,
    {
        self.constructor_handlers.push(ConstructorHandler {
            constructor: constructor.into(),
            handler: StaticHandler(Rc::new(handler)),
        });
        self
    }

    /// Read options from a JavaScript options object:
    /// `{ circular, depth, preservePrototype, includeNonEnumerable,
    /// includeSymbols, clonePromises }`. `undefined` gives the defaults.
    pub fn from_value(value: &Value<'gc>) -> Result<Self, JSError> {
        let mut options = CloneOptions::default();
        let obj = match value {
            Value::Undefined => return Ok(options),
            Value::Object(obj) => obj,
            other => return Err(raise_type_error!(format!("clone options must be an object, got {}", other.type_of()))),
        };

        if let Some(flag) = read_flag(obj, "circular")? {
            options.circular = flag;
        }
        if let Some(flag) = read_flag(obj, "preservePrototype")? {
            options.preserve_prototype = flag;
        }
        if let Some(flag) = read_flag(obj, "includeNonEnumerable")? {
            options.include_non_enumerable = flag;
        }
        if let Some(flag) = read_flag(obj, "includeSymbols")? {
            options.include_symbols = flag;
        }
        if let Some(flag) = read_flag(obj, "clonePromises")? {
            options.clone_promises = flag;
        }

        options.depth = match object_get_key_value(obj, "depth") {
            None | Some(Value::Undefined) => None,
            Some(Value::Number(n)) if n == f64::INFINITY => None,
            Some(Value::Number(n)) if n.is_nan() || n < 0.0 || n.fract() != 0.0 || n.is_infinite() => {
                return Err(raise_range_error!(format!("options.depth must be a non-negative integer, got {}", n)));
            }
            Some(Value::Number(n)) => Some(n as usize),
            Some(other) => return Err(raise_type_error!(format!("options.depth must be a number, got {}", other.type_of()))),
        };

        log::debug!(
            "CloneOptions::from_value: circular={} depth={:?} preserve_prototype={}",
            options.circular,
            options.depth,
            options.preserve_prototype
        );
        Ok(options)
    }

    /// Reject malformed options before any cloning starts.
    pub fn validate(&self) -> Result<(), JSError> {
        if self.recursion_limit == 0 {
            return Err(raise_range_error!("recursion limit must be at least 1"));
        }
        for (i, entry) in self.constructor_handlers.iter().enumerate() {
            match &entry.constructor {
                Value::Object(ctor) if is_constructor(ctor) => {}
                other => {
                    return Err(raise_type_error!(format!(
                        "constructorHandlers[{}]: {:?} is not a constructor",
                        i, other
                    )));
                }
            }
        }
        Ok(())
    }

    /// [`CloneOptions::validate`], plus the checks that need the realm the
    /// clone runs in.
    pub(crate) fn validate_in(&self, realm: &Realm<'gc>) -> Result<(), JSError> {
        self.validate()?;
        if let Some(function) = realm.constructor("Function")
            && self.handler_for(&function).is_some()
        {
            return Err(raise_type_error!("functions are always shared; a Function constructor handler would never run"));
        }
        Ok(())
    }

    pub(crate) fn handler_for(&self, ctor: &JSObjectDataPtr<'gc>) -> Option<HandlerFn> {
        self.constructor_handlers
            .iter()
            .find(|entry| matches!(&entry.constructor, Value::Object(c) if Gc::ptr_eq(*c, *ctor)))
            .map(|entry| entry.handler.0.clone())
    }
}

fn read_flag<'gc>(obj: &JSObjectDataPtr<'gc>, key: &str) -> Result<Option<bool>, JSError> {
    match object_get_key_value(obj, key) {
        None | Some(Value::Undefined) => Ok(None),
        Some(Value::Boolean(b)) => Ok(Some(b)),
        Some(other) => Err(raise_type_error!(format!("options.{} must be a boolean, got {}", key, other.type_of()))),
    }
}
