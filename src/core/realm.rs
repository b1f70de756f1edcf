use crate::core::{
    Collect, JSObjectDataPtr, MutationContext, ObjectKind, TypedArrayKind, Value, define_hidden_property, get_own_property, initialize_error_constructor,
    new_js_object_data, new_object_with,
};

/// Intrinsic constructors installed on every realm's global object, besides
/// `Object`, `Function`, the error family and the typed array views.
const INTRINSIC_CONSTRUCTORS: &[&str] = &["Array", "Date", "RegExp", "Map", "Set", "WeakMap", "WeakSet", "Promise", "ArrayBuffer"];

/// A global object plus the intrinsic constructors reachable from it.
///
/// Constructors are plain objects carrying a non-enumerable `prototype`
/// whose `constructor` points back at them, which is all the clone engine
/// needs to resolve `value.constructor`.
#[derive(Clone, Copy, Collect)]
#[collect(no_drop)]
pub struct Realm<'gc> {
    pub global: JSObjectDataPtr<'gc>,
}

impl<'gc> Realm<'gc> {
    pub fn new(mc: &MutationContext<'gc>) -> Self {
        let realm = Realm {
            global: new_js_object_data(mc),
        };

        let object_proto = new_js_object_data(mc);
        let object_ctor = realm.install_constructor(mc, "Object", object_proto);
        realm.global.borrow_mut(mc).prototype = Some(object_proto);

        let function_proto = new_object_with(mc, ObjectKind::Ordinary, Some(object_proto));
        let function_ctor = realm.install_constructor(mc, "Function", function_proto);
        // Object and Function were created before Function.prototype existed.
        object_ctor.borrow_mut(mc).prototype = Some(function_proto);
        function_ctor.borrow_mut(mc).prototype = Some(function_proto);

        let typed_arrays = TypedArrayKind::ALL.iter().map(|kind| kind.constructor_name());
        for name in INTRINSIC_CONSTRUCTORS.iter().copied().chain(typed_arrays) {
            let proto = new_object_with(mc, ObjectKind::Ordinary, Some(object_proto));
            realm.install_constructor(mc, name, proto);
        }

        initialize_error_constructor(mc, &realm);
        log::debug!("realm initialized: global={:p}", gc_arena::Gc::as_ptr(realm.global));
        realm
    }

    pub(crate) fn install_constructor(&self, mc: &MutationContext<'gc>, name: &str, prototype: JSObjectDataPtr<'gc>) -> JSObjectDataPtr<'gc> {
        let ctor = new_object_with(mc, ObjectKind::Ordinary, self.prototype("Function"));
        define_hidden_property(mc, &ctor, "prototype", Value::Object(prototype));
        define_hidden_property(mc, &ctor, "name", Value::from(name));
        define_hidden_property(mc, &prototype, "constructor", Value::Object(ctor));
        define_hidden_property(mc, &self.global, name, Value::Object(ctor));
        ctor
    }

    /// Global binding `name` if it holds a constructor.
    pub fn constructor(&self, name: &str) -> Option<JSObjectDataPtr<'gc>> {
        match get_own_property(&self.global, name) {
            Some(Value::Object(ctor)) if is_constructor(&ctor) => Some(ctor),
            _ => None,
        }
    }

    /// `name.prototype` for an intrinsic constructor.
    pub fn prototype(&self, name: &str) -> Option<JSObjectDataPtr<'gc>> {
        self.constructor(name).and_then(|ctor| constructor_prototype(&ctor))
    }

    /// Create a user class. The returned constructor is what constructor
    /// handlers are keyed by; instances come from [`Realm::construct`].
    pub fn define_class(&self, mc: &MutationContext<'gc>, name: &str, parent: Option<&JSObjectDataPtr<'gc>>) -> JSObjectDataPtr<'gc> {
        let parent_proto = match parent {
            Some(p) => constructor_prototype(p),
            None => self.prototype("Object"),
        };
        let proto = new_object_with(mc, ObjectKind::Ordinary, parent_proto);
        let ctor = new_object_with(mc, ObjectKind::Ordinary, self.prototype("Function"));
        define_hidden_property(mc, &ctor, "prototype", Value::Object(proto));
        define_hidden_property(mc, &ctor, "name", Value::from(name));
        define_hidden_property(mc, &proto, "constructor", Value::Object(ctor));
        ctor
    }

    /// `new ctor()` without running any user code: an ordinary object whose
    /// prototype is `ctor.prototype`.
    pub fn construct(&self, mc: &MutationContext<'gc>, ctor: &JSObjectDataPtr<'gc>) -> JSObjectDataPtr<'gc> {
        new_object_with(mc, ObjectKind::Ordinary, constructor_prototype(ctor))
    }

    /// A plain `{}`.
    pub fn new_object(&self, mc: &MutationContext<'gc>) -> JSObjectDataPtr<'gc> {
        new_object_with(mc, ObjectKind::Ordinary, self.prototype("Object"))
    }

    pub fn set_global(&self, mc: &MutationContext<'gc>, name: &str, value: Value<'gc>) {
        self.global.borrow_mut(mc).insert(name, value);
    }

    pub fn get_global(&self, name: &str) -> Option<Value<'gc>> {
        get_own_property(&self.global, name)
    }
}

pub fn is_constructor(obj: &JSObjectDataPtr<'_>) -> bool {
    constructor_prototype(obj).is_some()
}

pub fn constructor_prototype<'gc>(ctor: &JSObjectDataPtr<'gc>) -> Option<JSObjectDataPtr<'gc>> {
    match get_own_property(ctor, "prototype") {
        Some(Value::Object(proto)) => Some(proto),
        _ => None,
    }
}
