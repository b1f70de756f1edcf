use jsclone::{
    CloneOptions, EvalError, JSError, PropertyKey, Value, clone_deep, deep_clone, define_hidden_property, get_own_property, new_arena,
    new_symbol, object_set_key_value, parse_json, value_identity,
};

// Initialize logger for this integration test binary so `RUST_LOG` is honored.
// Using `ctor` ensures initialization runs before tests start.
#[ctor::ctor]
fn __init_test_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default()).is_test(true).try_init();
}

fn same(a: &Value<'_>, b: &Value<'_>) -> bool {
    value_identity(a).is_some() && value_identity(a) == value_identity(b)
}

#[test]
fn test_non_enumerable_properties_are_opt_in() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let obj = root.realm.new_object(mc);
        object_set_key_value(mc, &obj, "visible", Value::Number(1.0));
        let secret = parse_json(mc, &root.realm, r#"{"token":"abc"}"#).unwrap();
        define_hidden_property(mc, &obj, "hidden", secret.clone());
        let input = Value::Object(obj);

        let plain = clone_deep(mc, &root.realm, &input).unwrap().as_object().unwrap();
        assert!(get_own_property(&plain, "visible").is_some());
        assert!(get_own_property(&plain, "hidden").is_none());

        let options = CloneOptions::new().include_non_enumerable(true);
        let full = deep_clone(mc, &root.realm, &input, &options).unwrap().as_object().unwrap();
        let hidden = get_own_property(&full, "hidden").unwrap();
        assert!(!same(&hidden, &secret));
        assert!(!full.borrow().is_enumerable(&PropertyKey::from("hidden")));
        assert!(full.borrow().is_enumerable(&PropertyKey::from("visible")));
    });
}

#[test]
fn test_symbol_keys_are_opt_in() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let tag = new_symbol(mc, Some("tag"));
        let obj = root.realm.new_object(mc);
        object_set_key_value(mc, &obj, "name", Value::from("x"));
        object_set_key_value(mc, &obj, tag, Value::from("tagged"));
        let input = Value::Object(obj);

        let plain = clone_deep(mc, &root.realm, &input).unwrap().as_object().unwrap();
        assert!(get_own_property(&plain, tag).is_none());

        let options = CloneOptions::new().include_symbols(true);
        let full = deep_clone(mc, &root.realm, &input, &options).unwrap().as_object().unwrap();
        assert!(matches!(get_own_property(&full, tag), Some(Value::String(_))));
        let keys: Vec<PropertyKey<'_>> = full.borrow().properties.keys().cloned().collect();
        assert_eq!(keys, vec![PropertyKey::from("name"), PropertyKey::Symbol(tag)]);
    });
}

#[test]
fn test_hidden_symbol_needs_both_flags() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let tag = new_symbol(mc, None);
        let obj = root.realm.new_object(mc);
        define_hidden_property(mc, &obj, tag, Value::Boolean(true));
        let input = Value::Object(obj);

        let symbols_only = CloneOptions::new().include_symbols(true);
        let cloned = deep_clone(mc, &root.realm, &input, &symbols_only).unwrap().as_object().unwrap();
        assert!(get_own_property(&cloned, tag).is_none());

        let both = CloneOptions::new().include_symbols(true).include_non_enumerable(true);
        let cloned = deep_clone(mc, &root.realm, &input, &both).unwrap().as_object().unwrap();
        assert!(get_own_property(&cloned, tag).is_some());
        assert!(!cloned.borrow().is_enumerable(&PropertyKey::Symbol(tag)));
    });
}

#[test]
fn test_prototype_defaults_to_realm_intrinsic() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let point = root.realm.define_class(mc, "Point", None);
        let instance = root.realm.construct(mc, &point);
        object_set_key_value(mc, &instance, "x", Value::Number(1.0));

        let cloned = clone_deep(mc, &root.realm, &Value::Object(instance)).unwrap().as_object().unwrap();
        let proto = cloned.borrow().prototype.map(Value::Object).unwrap();
        assert!(same(&proto, &Value::Object(root.realm.prototype("Object").unwrap())));
        assert!(matches!(get_own_property(&cloned, "x"), Some(Value::Number(n)) if n == 1.0));
    });
}

#[test]
fn test_preserve_prototype() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let point = root.realm.define_class(mc, "Point", None);
        let instance = root.realm.construct(mc, &point);
        let source_proto = instance.borrow().prototype.map(Value::Object).unwrap();

        let options = CloneOptions::new().preserve_prototype(true);
        let cloned = deep_clone(mc, &root.realm, &Value::Object(instance), &options).unwrap().as_object().unwrap();
        let proto = cloned.borrow().prototype.map(Value::Object).unwrap();
        assert!(same(&proto, &source_proto));
        // The prototype itself is shared, not cloned.
        assert!(!same(&Value::Object(cloned), &Value::Object(instance)));
    });
}

#[test]
fn test_preserve_prototype_keeps_null_prototype() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let bare = root.realm.new_object(mc);
        bare.borrow_mut(mc).prototype = None;
        let input = Value::Object(bare);

        let options = CloneOptions::new().preserve_prototype(true);
        let cloned = deep_clone(mc, &root.realm, &input, &options).unwrap().as_object().unwrap();
        assert!(cloned.borrow().prototype.is_none());

        let cloned = clone_deep(mc, &root.realm, &input).unwrap().as_object().unwrap();
        assert!(cloned.borrow().prototype.is_some());
    });
}

#[test]
fn test_options_from_value() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let raw = parse_json(
            mc,
            &root.realm,
            r#"{"circular":false,"depth":3,"preservePrototype":true,"includeNonEnumerable":true,"includeSymbols":true,"clonePromises":false}"#,
        )
        .unwrap();
        let options = CloneOptions::from_value(&raw).unwrap();
        assert!(!options.circular);
        assert_eq!(options.depth, Some(3));
        assert!(options.preserve_prototype);
        assert!(options.include_non_enumerable);
        assert!(options.include_symbols);
        assert!(!options.clone_promises);

        let defaults = CloneOptions::from_value(&Value::Undefined).unwrap();
        assert!(defaults.circular);
        assert_eq!(defaults.depth, None);
        assert!(!defaults.preserve_prototype);

        let infinite = root.realm.new_object(mc);
        object_set_key_value(mc, &infinite, "depth", Value::Number(f64::INFINITY));
        assert_eq!(CloneOptions::from_value(&Value::Object(infinite)).unwrap().depth, None);
    });
}

#[test]
fn test_invalid_depth_is_rejected() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        for text in [r#"{"depth":-1}"#, r#"{"depth":1.5}"#] {
            let raw = parse_json(mc, &root.realm, text).unwrap();
            assert!(
                matches!(CloneOptions::from_value(&raw), Err(JSError::RangeError { .. })),
                "{} should be a RangeError",
                text
            );
        }

        let nan = root.realm.new_object(mc);
        object_set_key_value(mc, &nan, "depth", Value::Number(f64::NAN));
        assert!(matches!(CloneOptions::from_value(&Value::Object(nan)), Err(JSError::RangeError { .. })));

        let raw = parse_json(mc, &root.realm, r#"{"depth":"2"}"#).unwrap();
        assert!(matches!(CloneOptions::from_value(&raw), Err(JSError::TypeError { .. })));
    });
}

#[test]
fn test_malformed_options_are_rejected() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let raw = parse_json(mc, &root.realm, r#"{"circular":"yes"}"#).unwrap();
        let err = CloneOptions::from_value(&raw).err().unwrap();
        assert!(matches!(err, JSError::TypeError { .. }));
        assert!(err.message().contains("circular"));

        assert!(matches!(CloneOptions::from_value(&Value::Number(1.0)), Err(JSError::TypeError { .. })));
    });
}

#[test]
fn test_zero_recursion_limit_is_rejected_before_cloning() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let input = parse_json(mc, &root.realm, r#"{"a":1}"#).unwrap();
        let options = CloneOptions::new().recursion_limit(0);
        assert!(matches!(
            deep_clone(mc, &root.realm, &input, &options),
            Err(EvalError::Js(JSError::RangeError { .. }))
        ));
    });
}
