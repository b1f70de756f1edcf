use jsclone::{
    CloneOptions, Value, clone_deep, deep_clone, deep_equal, get_own_property, new_arena, new_function, new_symbol, parse_json,
    value_identity, value_to_json,
};
use num_bigint::BigInt;

// Initialize logger for this integration test binary so `RUST_LOG` is honored.
// Using `ctor` ensures initialization runs before tests start.
#[ctor::ctor]
fn __init_test_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default()).is_test(true).try_init();
}

fn same(a: &Value<'_>, b: &Value<'_>) -> bool {
    value_identity(a).is_some() && value_identity(a) == value_identity(b)
}

fn prop<'gc>(value: &Value<'gc>, key: &str) -> Value<'gc> {
    let obj = value.as_object().expect("expected an object");
    get_own_property(&obj, key).unwrap_or(Value::Undefined)
}

#[test]
fn test_basic_object_scenario() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let input = parse_json(mc, &root.realm, r#"{"a":1,"b":{"c":2}}"#).unwrap();
        let output = clone_deep(mc, &root.realm, &input).unwrap();

        assert!(deep_equal(&input, &output));
        assert!(!same(&input, &output));
        assert!(!same(&prop(&input, "b"), &prop(&output, "b")));
        assert!(matches!(prop(&prop(&output, "b"), "c"), Value::Number(n) if n == 2.0));
    });
}

#[test]
fn test_structure_is_reproduced() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let text = r#"{"name":"cfg","list":[1,"two",{"three":[3,null,true]}],"nested":{"deeper":{"deepest":{}}},"empty":[]}"#;
        let input = parse_json(mc, &root.realm, text).unwrap();
        let output = clone_deep(mc, &root.realm, &input).unwrap();

        assert!(deep_equal(&input, &output));
        let json = value_to_json(&output).unwrap();
        assert_eq!(serde_json::to_string(&json).unwrap(), text);
    });
}

#[test]
fn test_nested_objects_are_distinct() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let input = parse_json(mc, &root.realm, r#"{"a":{"b":{"c":[{"d":1}]}}}"#).unwrap();
        let output = clone_deep(mc, &root.realm, &input).unwrap();

        let (mut src, mut dst) = (input.clone(), output.clone());
        for key in ["a", "b", "c", "0"] {
            src = prop(&src, key);
            dst = prop(&dst, key);
            assert!(!same(&src, &dst), "clone shares the value at {}", key);
            assert!(deep_equal(&src, &dst));
        }
    });
}

#[test]
fn test_primitives_pass_through() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let symbol = Value::Symbol(new_symbol(mc, Some("tag")));
        let primitives = vec![
            Value::Undefined,
            Value::Null,
            Value::Boolean(true),
            Value::Number(-0.0),
            Value::Number(f64::NAN),
            Value::from("text"),
            Value::BigInt(BigInt::from(1u64) << 80),
            symbol.clone(),
        ];
        for value in &primitives {
            let cloned = clone_deep(mc, &root.realm, value).unwrap();
            assert!(deep_equal(value, &cloned), "{:?} changed to {:?}", value, cloned);
        }
        assert!(same(&symbol, &clone_deep(mc, &root.realm, &symbol).unwrap()));
    });
}

#[test]
fn test_functions_are_shared() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let callback = new_function(mc, "onChange");
        let obj = root.realm.new_object(mc);
        obj.borrow_mut(mc).insert("onChange", callback.clone());
        let input = Value::Object(obj);

        assert!(same(&callback, &clone_deep(mc, &root.realm, &callback).unwrap()));
        let output = clone_deep(mc, &root.realm, &input).unwrap();
        assert!(same(&prop(&output, "onChange"), &callback));
    });
}

#[test]
fn test_depth_boundary() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let input = parse_json(mc, &root.realm, r#"{"a":{"b":1}}"#).unwrap();

        let output = deep_clone(mc, &root.realm, &input, &CloneOptions::new().depth(1)).unwrap();
        assert!(!same(&input, &output));
        assert!(same(&prop(&input, "a"), &prop(&output, "a")));

        let output = deep_clone(mc, &root.realm, &input, &CloneOptions::new().depth(2)).unwrap();
        assert!(!same(&prop(&input, "a"), &prop(&output, "a")));
        assert!(deep_equal(&input, &output));
    });
}

#[test]
fn test_depth_zero_returns_input() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let input = parse_json(mc, &root.realm, r#"[{"x":1}]"#).unwrap();
        let output = deep_clone(mc, &root.realm, &input, &CloneOptions::new().depth(0)).unwrap();
        assert!(same(&input, &output));
    });
}

#[test]
fn test_large_enough_depth_equals_unbounded() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let input = parse_json(mc, &root.realm, r#"{"l1":{"l2":{"l3":{"l4":"leaf"}}}}"#).unwrap();
        let bounded = deep_clone(mc, &root.realm, &input, &CloneOptions::new().depth(5)).unwrap();
        let unbounded = clone_deep(mc, &root.realm, &input).unwrap();
        assert!(deep_equal(&bounded, &unbounded));

        let mut leaf_parent = bounded.clone();
        let mut original = input.clone();
        for key in ["l1", "l2", "l3"] {
            leaf_parent = prop(&leaf_parent, key);
            original = prop(&original, key);
        }
        assert!(!same(&leaf_parent, &original));
    });
}

#[test]
fn test_source_is_untouched() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let text = r#"{"a":[1,2,{"b":"c"}]}"#;
        let input = parse_json(mc, &root.realm, text).unwrap();
        let output = clone_deep(mc, &root.realm, &input).unwrap();

        let inner = prop(&prop(&output, "a"), "2").as_object().unwrap();
        inner.borrow_mut(mc).insert("b", Value::from("changed"));

        let json = value_to_json(&input).unwrap();
        assert_eq!(serde_json::to_string(&json).unwrap(), text);
        assert!(!deep_equal(&input, &output));
    });
}
