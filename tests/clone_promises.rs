use jsclone::{
    CloneOptions, PromiseState, Value, clone_deep, create_array_from, create_fulfilled_promise, create_promise, create_rejected_promise, deep_clone,
    deep_equal, get_error_name, get_own_property, new_arena, new_error, object_set_key_value, parse_json, promise_state, reject_promise,
    resolve_promise, value_identity,
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
fn test_fulfilled_promise_clones_its_value() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let payload = parse_json(mc, &root.realm, r#"{"rows":[1,2,3]}"#).unwrap();
        let promise = Value::Promise(create_fulfilled_promise(mc, payload.clone()));

        let cloned = clone_deep(mc, &root.realm, &promise).unwrap();
        assert!(!same(&cloned, &promise));
        let Value::Promise(cloned) = cloned else { panic!("expected a Promise") };
        let PromiseState::Fulfilled(value) = promise_state(&cloned) else {
            panic!("clone should already be fulfilled");
        };
        assert!(!same(&value, &payload));
        assert!(deep_equal(&value, &payload));
    });
}

#[test]
fn test_rejected_promise_clones_its_reason() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let reason = Value::Object(new_error(mc, &root.realm, "RangeError", "out of bounds"));
        let promise = Value::Promise(create_rejected_promise(mc, reason.clone()));

        let Value::Promise(cloned) = clone_deep(mc, &root.realm, &promise).unwrap() else {
            panic!("expected a Promise");
        };
        let PromiseState::Rejected(value) = promise_state(&cloned) else {
            panic!("clone should already be rejected");
        };
        assert!(!same(&value, &reason));
        assert_eq!(get_error_name(&value.as_object().unwrap()).as_deref(), Some("RangeError"));
    });
}

#[test]
fn test_pending_promise_settles_later() {
    let mut arena = new_arena();
    arena.mutate(|mc, root| {
        let source = create_promise(mc);
        let holder = root.realm.new_object(mc);
        object_set_key_value(mc, &holder, "result", Value::Promise(source));

        let cloned = clone_deep(mc, &root.realm, &Value::Object(holder)).unwrap();
        let cloned_result = get_own_property(&cloned.as_object().unwrap(), "result").unwrap();
        assert!(matches!(&cloned_result, Value::Promise(p) if p.borrow().is_pending()));
        assert!(!same(&cloned_result, &Value::Promise(source)));

        root.realm.set_global(mc, "source", Value::Promise(source));
        root.realm.set_global(mc, "cloned", cloned_result);
    });

    // The pending clone job has to survive a full collection.
    arena.finish_cycle();

    arena.mutate(|mc, root| {
        let Some(Value::Promise(source)) = root.realm.get_global("source") else {
            panic!("source promise is gone");
        };
        let Some(Value::Promise(cloned)) = root.realm.get_global("cloned") else {
            panic!("cloned promise is gone");
        };

        let payload = parse_json(mc, &root.realm, r#"{"done":true,"items":[{"id":7}]}"#).unwrap();
        assert!(resolve_promise(mc, &source, payload.clone()).unwrap());

        let PromiseState::Fulfilled(value) = promise_state(&cloned) else {
            panic!("clone should follow the source");
        };
        assert!(!same(&value, &payload));
        assert!(deep_equal(&value, &payload));
    });
}

#[test]
fn test_pending_promise_rejection_is_cloned() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let source = create_promise(mc);
        let Value::Promise(cloned) = clone_deep(mc, &root.realm, &Value::Promise(source)).unwrap() else {
            panic!("expected a Promise");
        };

        let reason = parse_json(mc, &root.realm, r#"{"code":500}"#).unwrap();
        assert!(reject_promise(mc, &source, reason.clone()));
        let PromiseState::Rejected(value) = promise_state(&cloned) else {
            panic!("clone should be rejected");
        };
        assert!(!same(&value, &reason));
        assert!(deep_equal(&value, &reason));
    });
}

#[test]
fn test_deferred_clone_failure_rejects_the_clone() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let source = create_promise(mc);
        let options = CloneOptions::new().circular(false).recursion_limit(16);
        let Value::Promise(cloned) = deep_clone(mc, &root.realm, &Value::Promise(source), &options).unwrap() else {
            panic!("expected a Promise");
        };

        let cyclic = root.realm.new_object(mc);
        object_set_key_value(mc, &cyclic, "self", Value::Object(cyclic));
        assert!(resolve_promise(mc, &source, Value::Object(cyclic)).unwrap());

        let PromiseState::Rejected(reason) = promise_state(&cloned) else {
            panic!("a failed clone should reject");
        };
        assert_eq!(get_error_name(&reason.as_object().unwrap()).as_deref(), Some("RangeError"));
    });
}

#[test]
fn test_promises_shared_when_disabled() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let promise = Value::Promise(create_promise(mc));
        let options = CloneOptions::new().clone_promises(false);
        let cloned = deep_clone(mc, &root.realm, &promise, &options).unwrap();
        assert!(same(&cloned, &promise));
    });
}

#[test]
fn test_promise_inside_cycle_resolves_to_clone() {
    let arena = new_arena();
    arena.mutate(|mc, root| {
        let holder = root.realm.new_object(mc);
        let promise = create_fulfilled_promise(mc, Value::Object(holder));
        object_set_key_value(mc, &holder, "ready", Value::Promise(promise));

        let cloned = clone_deep(mc, &root.realm, &Value::Object(holder)).unwrap();
        let Some(Value::Promise(cloned_promise)) = get_own_property(&cloned.as_object().unwrap(), "ready") else {
            panic!("expected a Promise");
        };
        let PromiseState::Fulfilled(value) = promise_state(&cloned_promise) else {
            panic!("expected a fulfilled clone");
        };
        assert!(same(&value, &cloned));
    });
}

#[test]
fn test_pending_promise_keeps_links_to_earlier_clones() {
    let mut arena = new_arena();
    arena.mutate(|mc, root| {
        let source = create_promise(mc);
        let shared = parse_json(mc, &root.realm, r#"{"n":1}"#).unwrap();
        let holder = root.realm.new_object(mc);
        object_set_key_value(mc, &holder, "ready", Value::Promise(source));
        object_set_key_value(mc, &holder, "shared", shared.clone());

        let cloned = clone_deep(mc, &root.realm, &Value::Object(holder)).unwrap();
        root.realm.set_global(mc, "holder", Value::Object(holder));
        root.realm.set_global(mc, "shared", shared);
        root.realm.set_global(mc, "source", Value::Promise(source));
        root.realm.set_global(mc, "cloned", cloned);
    });

    // The registry of the first call is only reachable through the pending
    // clone job.
    arena.finish_cycle();

    arena.mutate(|mc, root| {
        let holder = root.realm.get_global("holder").unwrap();
        let shared = root.realm.get_global("shared").unwrap();
        let cloned = root.realm.get_global("cloned").unwrap().as_object().unwrap();
        let Some(Value::Promise(source)) = root.realm.get_global("source") else {
            panic!("source promise is gone");
        };

        let outcome = create_array_from(mc, &root.realm, vec![holder.clone(), shared.clone()]);
        assert!(resolve_promise(mc, &source, Value::Object(outcome)).unwrap());

        let Some(Value::Promise(cloned_ready)) = get_own_property(&cloned, "ready") else {
            panic!("expected a Promise");
        };
        let PromiseState::Fulfilled(value) = promise_state(&cloned_ready) else {
            panic!("clone should follow the source");
        };
        let value = value.as_object().unwrap();
        assert!(!same(&Value::Object(value), &Value::Object(outcome)));

        let first = get_own_property(&value, "0").unwrap();
        let second = get_own_property(&value, "1").unwrap();
        assert!(same(&first, &Value::Object(cloned)));
        assert!(same(&second, &get_own_property(&cloned, "shared").unwrap()));
        assert!(!same(&second, &shared));
    });
}
