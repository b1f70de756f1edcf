//! Deep cloning of JavaScript values held in a garbage-collected heap.
//!
//! Values live in a [`JsArena`] created by [`new_arena`]; every call happens
//! inside `arena.mutate(|mc, root| ...)` against `root.realm`.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod js_array;
pub(crate) mod js_clone;
pub(crate) mod js_date;
pub(crate) mod js_json;
pub(crate) mod js_map;
pub(crate) mod js_promise;
pub(crate) mod js_regexp;
pub(crate) mod js_set;
pub(crate) mod js_typedarray;
pub(crate) mod js_weakmap;
pub(crate) mod js_weakset;
pub(crate) mod unicode;

pub use core::{
    EvalError, FunctionData, GcPtr, JSArrayBuffer, JSMap, JSObjectData, JSObjectDataPtr, JSPromise, JSSet, JSTypedArray, JSWeakMap,
    JSWeakSet, JsArena, JsRoot, ObjectKind, PromiseReaction, PromiseState, PropertyKey, Realm, RegExpFlags, SymbolData, TypedArrayKind,
    Value, constructor_of, constructor_prototype, deep_equal, define_hidden_property, get_error_message, get_error_name, get_error_stack,
    get_own_property, is_constructor, is_error, new_arena, new_error, new_function, new_object_with, new_symbol, object_get_key_value,
    object_set_key_value, own_enumerable_keys, same_value_zero, value_identity,
};
pub use error::JSError;
pub use js_array::{array_get, array_has_index, array_push, create_array, create_array_from, create_sparse_array, get_array_length, is_array};
pub use js_clone::{
    CloneOptions, CloneRegistry, Cloner, ConstructorHandler, DEFAULT_RECURSION_LIMIT, DeferredClone, HandlerFn, clone_deep, deep_clone,
};
pub use js_date::{create_date, create_date_from_string, date_time_value, date_to_iso_string, set_date_time_value};
pub use js_json::{json_to_value, parse_json, value_to_json};
pub use js_map::{create_map, create_map_from, map_delete, map_get, map_has, map_set, map_size};
pub use js_promise::{create_fulfilled_promise, create_promise, create_rejected_promise, promise_state, reject_promise, resolve_promise};
pub use js_regexp::{
    create_regex_from_utf16, create_regexp, get_last_index, is_regexp, regexp_exec, regexp_flags, regexp_source, regexp_to_string,
    set_last_index,
};
pub use js_set::{create_set, create_set_from, set_add, set_has, set_size};
pub use js_typedarray::{create_array_buffer, create_typed_array, typed_array_get, typed_array_set};
pub use js_weakmap::{create_weakmap, weakmap_get, weakmap_set};
pub use js_weakset::{create_weakset, weakset_add, weakset_has};
pub use unicode::{utf8_to_utf16, utf16_to_utf8};
