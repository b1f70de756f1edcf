use crate::core::{Gc, GcPtr, JSPromise, MutationContext, PromiseReaction, PromiseState, Value, new_gc_cell_ptr};
use crate::error::JSError;
use crate::raise_type_error;

/// `new Promise(() => {})`: a pending promise.
pub fn create_promise<'gc>(mc: &MutationContext<'gc>) -> GcPtr<'gc, JSPromise<'gc>> {
    new_gc_cell_ptr(mc, JSPromise::new())
}

/// `Promise.resolve(value)` for non-thenable values.
pub fn create_fulfilled_promise<'gc>(mc: &MutationContext<'gc>, value: Value<'gc>) -> GcPtr<'gc, JSPromise<'gc>> {
    let promise = create_promise(mc);
    settle_promise(mc, &promise, PromiseState::Fulfilled(value));
    promise
}

/// `Promise.reject(reason)`
pub fn create_rejected_promise<'gc>(mc: &MutationContext<'gc>, reason: Value<'gc>) -> GcPtr<'gc, JSPromise<'gc>> {
    let promise = create_promise(mc);
    settle_promise(mc, &promise, PromiseState::Rejected(reason));
    promise
}

/// Resolve `promise` with `value`. Resolving with another promise adopts its
/// eventual state. Returns false if `promise` was already settled.
pub fn resolve_promise<'gc>(mc: &MutationContext<'gc>, promise: &GcPtr<'gc, JSPromise<'gc>>, value: Value<'gc>) -> Result<bool, JSError> {
    if !promise.borrow().is_pending() {
        return Ok(false);
    }
    match value {
        Value::Promise(inner) if Gc::ptr_eq(inner, *promise) => Err(raise_type_error!("Chaining cycle detected for promise")),
        Value::Promise(inner) => {
            add_reaction(mc, &inner, PromiseReaction::Adopt { target: *promise });
            Ok(true)
        }
        other => Ok(settle_promise(mc, promise, PromiseState::Fulfilled(other))),
    }
}

/// Reject `promise` with `reason`. Returns false if it was already settled.
pub fn reject_promise<'gc>(mc: &MutationContext<'gc>, promise: &GcPtr<'gc, JSPromise<'gc>>, reason: Value<'gc>) -> bool {
    settle_promise(mc, promise, PromiseState::Rejected(reason))
}

pub fn promise_state<'gc>(promise: &GcPtr<'gc, JSPromise<'gc>>) -> PromiseState<'gc> {
    promise.borrow().state.clone()
}

/// Queue `reaction` on `promise`, or run it right away if the promise has
/// already settled.
pub(crate) fn add_reaction<'gc>(mc: &MutationContext<'gc>, promise: &GcPtr<'gc, JSPromise<'gc>>, reaction: PromiseReaction<'gc>) {
    let state = {
        let mut data = promise.borrow_mut(mc);
        if data.is_pending() {
            data.reactions.push(reaction);
            return;
        }
        data.state.clone()
    };
    run_reaction(mc, reaction, &state);
}

/// Move a pending promise to `state` and run its reactions in the order they
/// were added. Reactions run synchronously; there is no microtask queue.
pub(crate) fn settle_promise<'gc>(mc: &MutationContext<'gc>, promise: &GcPtr<'gc, JSPromise<'gc>>, state: PromiseState<'gc>) -> bool {
    let reactions = {
        let mut data = promise.borrow_mut(mc);
        if !data.is_pending() {
            return false;
        }
        data.state = state.clone();
        std::mem::take(&mut data.reactions)
    };
    log::debug!(
        "settle_promise: promise={:p} reactions={}",
        Gc::as_ptr(*promise),
        reactions.len()
    );
    for reaction in reactions {
        run_reaction(mc, reaction, &state);
    }
    true
}

fn run_reaction<'gc>(mc: &MutationContext<'gc>, reaction: PromiseReaction<'gc>, state: &PromiseState<'gc>) {
    match reaction {
        PromiseReaction::Adopt { target } => {
            settle_promise(mc, &target, state.clone());
        }
        PromiseReaction::Clone { target, job } => {
            let outcome = crate::js_clone::run_deferred_clone(mc, &job, state);
            settle_promise(mc, &target, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::new_arena;

    #[test]
    fn adoption_follows_inner_promise() {
        let arena = new_arena();
        arena.mutate(|mc, _root| {
            let outer = create_promise(mc);
            let inner = create_promise(mc);
            assert!(resolve_promise(mc, &outer, Value::Promise(inner)).unwrap());
            assert!(outer.borrow().is_pending());

            assert!(reject_promise(mc, &inner, Value::from("boom")));
            assert!(matches!(promise_state(&outer), PromiseState::Rejected(Value::String(_))));
        });
    }

    #[test]
    fn settles_once() {
        let arena = new_arena();
        arena.mutate(|mc, _root| {
            let p = create_fulfilled_promise(mc, Value::Number(1.0));
            assert!(!reject_promise(mc, &p, Value::Undefined));
            assert!(!resolve_promise(mc, &p, Value::Number(2.0)).unwrap());
            assert!(matches!(promise_state(&p), PromiseState::Fulfilled(Value::Number(n)) if n == 1.0));
        });
    }

    #[test]
    fn self_resolution_is_a_type_error() {
        let arena = new_arena();
        arena.mutate(|mc, _root| {
            let p = create_promise(mc);
            assert!(matches!(resolve_promise(mc, &p, Value::Promise(p)), Err(JSError::TypeError { .. })));
        });
    }
}
