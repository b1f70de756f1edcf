use crate::core::{Collect, GcTrace, Value, value_identity};
use std::collections::HashMap;

/// Source-to-clone mapping for one clone operation.
///
/// Keys are heap identities, so two distinct objects with the same contents
/// never collide. Primitives have no identity and are never recorded.
///
/// The registry lives on the gc heap: a promise that is still pending when
/// the call returns keeps it, and clones its outcome against the same
/// mapping. Sources are traced along with their clones, so an identity key
/// can never be reused by a later allocation while the registry is alive.
#[derive(Default)]
pub struct CloneRegistry<'gc> {
    pairs: Vec<(Value<'gc>, Value<'gc>)>,
    index: HashMap<*const (), usize>,
}

unsafe impl<'gc> Collect<'gc> for CloneRegistry<'gc> {
    fn trace<T: GcTrace<'gc>>(&self, cc: &mut T) {
        for (source, clone) in &self.pairs {
            source.trace(cc);
            clone.trace(cc);
        }
    }
}

impl<'gc> CloneRegistry<'gc> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, source: &Value<'gc>) -> bool {
        value_identity(source).is_some_and(|id| self.index.contains_key(&id))
    }

    pub fn get(&self, source: &Value<'gc>) -> Option<Value<'gc>> {
        let slot = *self.index.get(&value_identity(source)?)?;
        self.pairs.get(slot).map(|(_, clone)| clone.clone())
    }

    pub fn set(&mut self, source: &Value<'gc>, clone: Value<'gc>) {
        let Some(id) = value_identity(source) else {
            return;
        };
        match self.index.get(&id) {
            Some(&slot) => self.pairs[slot].1 = clone,
            None => {
                self.index.insert(id, self.pairs.len());
                self.pairs.push((source.clone(), clone));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::new_arena;

    #[test]
    fn keyed_by_identity_not_contents() {
        let arena = new_arena();
        arena.mutate(|mc, root| {
            let a = Value::Object(root.realm.new_object(mc));
            let b = Value::Object(root.realm.new_object(mc));
            let mut registry = CloneRegistry::new();
            registry.set(&a, Value::Number(1.0));
            assert!(registry.has(&a));
            assert!(!registry.has(&b));
            assert!(matches!(registry.get(&a), Some(Value::Number(n)) if n == 1.0));

            registry.set(&a, Value::Number(2.0));
            assert_eq!(registry.len(), 1);
            assert!(matches!(registry.get(&a), Some(Value::Number(n)) if n == 2.0));
        });
    }

    #[test]
    fn ignores_primitives() {
        let mut registry = CloneRegistry::new();
        registry.set(&Value::from("x"), Value::Null);
        assert!(registry.is_empty());
        assert!(!registry.has(&Value::from("x")));
    }
}
