use crate::{
    JSError,
    core::{
        JSObjectDataPtr, MutationContext, ObjectKind, Realm, Value, define_hidden_property, get_own_property, new_object_with,
        object_get_key_value,
    },
};

/// Error produced while operating on JavaScript values.
///
/// `Throw` carries a JavaScript value thrown by user-supplied code (for
/// example a constructor handler); it is propagated as-is so the caller sees
/// the very same value.
#[derive(Debug)]
pub enum EvalError<'gc> {
    Js(JSError),
    Throw(Value<'gc>),
}

impl<'gc> From<JSError> for EvalError<'gc> {
    fn from(e: JSError) -> Self {
        EvalError::Js(e)
    }
}

impl<'gc> EvalError<'gc> {
    pub fn message(&self) -> String {
        match self {
            EvalError::Js(e) => e.message(),
            EvalError::Throw(v) => match v {
                Value::Object(obj) => get_error_message(obj).unwrap_or_else(|| format!("{:?}", v)),
                other => format!("{:?}", other),
            },
        }
    }

    /// The value a JavaScript `catch` clause would observe.
    pub fn into_thrown_value(self, mc: &MutationContext<'gc>, realm: &Realm<'gc>) -> Value<'gc> {
        match self {
            EvalError::Throw(v) => v,
            EvalError::Js(e) => Value::Object(new_error(mc, realm, e.kind_name(), &e.message())),
        }
    }
}

const NATIVE_ERRORS: &[&str] = &["TypeError", "RangeError", "SyntaxError", "ReferenceError", "EvalError", "URIError"];

/// Install `Error` and the native error constructors on `realm`.
pub fn initialize_error_constructor<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>) {
    let error_proto = new_object_with(mc, ObjectKind::Ordinary, realm.prototype("Object"));
    define_hidden_property(mc, &error_proto, "name", Value::from("Error"));
    define_hidden_property(mc, &error_proto, "message", Value::from(""));
    realm.install_constructor(mc, "Error", error_proto);

    for name in NATIVE_ERRORS {
        let proto = new_object_with(mc, ObjectKind::Ordinary, Some(error_proto));
        define_hidden_property(mc, &proto, "name", Value::from(*name));
        define_hidden_property(mc, &proto, "message", Value::from(""));
        realm.install_constructor(mc, name, proto);
    }
}

/// `new <name>(message)` for `Error` or one of the native error types.
/// Unknown names fall back to `Error`.
pub fn new_error<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, name: &str, message: &str) -> JSObjectDataPtr<'gc> {
    let proto = realm.prototype(name).or_else(|| realm.prototype("Error"));
    let err = new_object_with(mc, ObjectKind::Error, proto);
    define_hidden_property(mc, &err, "message", Value::from(message));
    let stack = if message.is_empty() {
        format!("{name}\n    at <anonymous>")
    } else {
        format!("{name}: {message}\n    at <anonymous>")
    };
    define_hidden_property(mc, &err, "stack", Value::from(stack));
    err
}

pub fn is_error(obj: &JSObjectDataPtr<'_>) -> bool {
    matches!(obj.borrow().kind, ObjectKind::Error)
}

pub fn get_error_message(obj: &JSObjectDataPtr<'_>) -> Option<String> {
    object_get_key_value(obj, "message").and_then(|v| v.as_string())
}

/// `err.name`, own or inherited.
pub fn get_error_name(obj: &JSObjectDataPtr<'_>) -> Option<String> {
    object_get_key_value(obj, "name").and_then(|v| v.as_string())
}

pub fn get_error_stack(obj: &JSObjectDataPtr<'_>) -> Option<String> {
    get_own_property(obj, "stack").and_then(|v| v.as_string())
}
