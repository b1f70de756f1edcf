use super::{Cloner, DeferredClone, Slot};
use crate::core::{
    EvalError, Gc, GcPtr, JSArrayBuffer, JSMap, JSObjectDataPtr, JSPromise, JSSet, JSTypedArray, ObjectKind, PromiseReaction, PromiseState,
    PropertyKey, RegExpFlags, Value, get_error_name, new_object_with,
};
use crate::js_array::{create_array_with_prototype, get_array_length, set_array_length};
use crate::js_date::create_date_with_prototype;
use crate::js_map::create_map;
use crate::js_promise::{add_reaction, create_promise};
use crate::js_regexp::{create_regexp_unchecked, get_last_index, set_last_index};
use crate::js_set::create_set;
use crate::js_typedarray::create_array_buffer;
use crate::raise_type_error;

type CloneResult<'gc> = Result<Value<'gc>, EvalError<'gc>>;

impl<'a, 'gc> Cloner<'a, 'gc> {
    pub(super) fn clone_object(&mut self, value: &Value<'gc>, source: &JSObjectDataPtr<'gc>) -> CloneResult<'gc> {
        let target = new_object_with(self.mc, ObjectKind::Ordinary, self.shell_prototype(source, "Object"));
        let cloned = Value::Object(target);
        self.register(value, &cloned);
        self.copy_properties(source, &target, &[]);
        Ok(cloned)
    }

    pub(super) fn clone_array(&mut self, value: &Value<'gc>, source: &JSObjectDataPtr<'gc>) -> CloneResult<'gc> {
        let target = create_array_with_prototype(self.mc, self.shell_prototype(source, "Array"));
        let cloned = Value::Object(target);
        self.register(value, &cloned);
        set_array_length(self.mc, &target, get_array_length(source).unwrap_or(0));
        // Only present indices are copied, so holes stay holes.
        self.copy_properties(source, &target, &["length"]);
        Ok(cloned)
    }

    pub(super) fn clone_date(&mut self, value: &Value<'gc>, source: &JSObjectDataPtr<'gc>, time: f64) -> CloneResult<'gc> {
        let target = create_date_with_prototype(self.mc, self.shell_prototype(source, "Date"), time);
        let cloned = Value::Object(target);
        self.register(value, &cloned);
        Ok(cloned)
    }

    pub(super) fn clone_regexp(
        &mut self,
        value: &Value<'gc>,
        source: &JSObjectDataPtr<'gc>,
        pattern: Vec<u16>,
        flags: RegExpFlags,
    ) -> CloneResult<'gc> {
        let target = create_regexp_unchecked(self.mc, self.shell_prototype(source, "RegExp"), pattern, flags);
        let last_index = get_last_index(source);
        if last_index != 0.0 {
            set_last_index(self.mc, &target, last_index);
        }
        let cloned = Value::Object(target);
        self.register(value, &cloned);
        Ok(cloned)
    }

    pub(super) fn clone_error(&mut self, value: &Value<'gc>, source: &JSObjectDataPtr<'gc>) -> CloneResult<'gc> {
        let target = new_object_with(self.mc, ObjectKind::Error, self.shell_prototype(source, "Error"));
        let cloned = Value::Object(target);
        self.register(value, &cloned);

        let own_name = source.borrow().properties.contains_key(&PropertyKey::from("name"));
        // An inherited name is lost when the clone gets a different
        // prototype, so pin it as an own property.
        if !own_name
            && let Some(name) = get_error_name(source)
            && get_error_name(&target).as_deref() != Some(name.as_str())
        {
            let mut data = target.borrow_mut(self.mc);
            data.insert("name", Value::from(name));
            data.set_non_enumerable("name");
        }

        for key in ["message", "stack", "name"] {
            let key = PropertyKey::from(key);
            let own = source.borrow().properties.get(&key).cloned();
            if let Some(v) = own {
                let enumerable = source.borrow().is_enumerable(&key);
                self.reserve_property(&target, key, v, enumerable);
            }
        }
        self.copy_properties(source, &target, &["message", "stack", "name"]);
        Ok(cloned)
    }

    pub(super) fn clone_map(&mut self, value: &Value<'gc>, source: &GcPtr<'gc, JSMap<'gc>>) -> CloneResult<'gc> {
        let target = create_map(self.mc);
        let cloned = Value::Map(target);
        self.register(value, &cloned);
        let entries = source.borrow().entries.clone();
        target.borrow_mut(self.mc).entries = vec![(Value::Undefined, Value::Undefined); entries.len()];
        for (index, (k, v)) in entries.into_iter().enumerate() {
            self.defer(k, Slot::MapKey { target, index });
            self.defer(v, Slot::MapValue { target, index });
        }
        Ok(cloned)
    }

    pub(super) fn clone_set(&mut self, value: &Value<'gc>, source: &GcPtr<'gc, JSSet<'gc>>) -> CloneResult<'gc> {
        let target = create_set(self.mc);
        let cloned = Value::Set(target);
        self.register(value, &cloned);
        let members = source.borrow().values.clone();
        target.borrow_mut(self.mc).values = vec![Value::Undefined; members.len()];
        for (index, member) in members.into_iter().enumerate() {
            self.defer(member, Slot::SetMember { target, index });
        }
        Ok(cloned)
    }

    pub(super) fn clone_array_buffer(&mut self, value: &Value<'gc>, source: &GcPtr<'gc, JSArrayBuffer>) -> CloneResult<'gc> {
        let bytes = source.borrow().data.clone();
        let cloned = Value::ArrayBuffer(create_array_buffer(self.mc, bytes));
        self.register(value, &cloned);
        Ok(cloned)
    }

    /// The backing buffer is part of the view, so it is cloned at the same
    /// depth. Views over one buffer keep sharing one cloned buffer.
    pub(super) fn clone_typed_array(&mut self, value: &Value<'gc>, source: &Gc<'gc, JSTypedArray<'gc>>) -> CloneResult<'gc> {
        let buffer = match self.clone_value(&Value::ArrayBuffer(source.buffer))? {
            Value::ArrayBuffer(buffer) => buffer,
            other => {
                return Err(raise_type_error!(format!("ArrayBuffer handler returned {:?} instead of an ArrayBuffer", other)).into());
            }
        };
        let cloned = Value::TypedArray(Gc::new(
            self.mc,
            JSTypedArray {
                kind: source.kind,
                buffer,
                byte_offset: source.byte_offset,
                length: source.length,
            },
        ));
        self.register(value, &cloned);
        Ok(cloned)
    }

    /// A settled source gives an already settled clone. A pending one gets a
    /// reaction that settles the clone when the source settles.
    pub(super) fn clone_promise(&mut self, value: &Value<'gc>, source: &GcPtr<'gc, JSPromise<'gc>>) -> CloneResult<'gc> {
        let target = create_promise(self.mc);
        let cloned = Value::Promise(target);
        self.register(value, &cloned);

        let state = source.borrow().state.clone();
        match state {
            PromiseState::Pending => {
                let job = Gc::new(
                    self.mc,
                    DeferredClone {
                        realm: *self.realm,
                        options: self.options.clone(),
                        registry: self.registry,
                        depth: self.depth.map(|d| d.saturating_sub(1)),
                    },
                );
                add_reaction(self.mc, source, PromiseReaction::Clone { target, job });
            }
            PromiseState::Fulfilled(v) => self.defer(v, Slot::Settle { target, fulfilled: true }),
            PromiseState::Rejected(v) => self.defer(v, Slot::Settle { target, fulfilled: false }),
        }
        Ok(cloned)
    }

    /// Copy own properties selected by the options from `source` onto
    /// `target`, cloning each value. Non-enumerable properties stay
    /// non-enumerable.
    fn copy_properties(&mut self, source: &JSObjectDataPtr<'gc>, target: &JSObjectDataPtr<'gc>, skip: &[&str]) {
        let include_symbols = self.options.include_symbols;
        let include_non_enumerable = self.options.include_non_enumerable;
        let entries: Vec<(PropertyKey<'gc>, Value<'gc>, bool)> = {
            let data = source.borrow();
            data.properties
                .iter()
                .filter_map(|(k, v)| {
                    if let PropertyKey::String(s) = k
                        && skip.contains(&s.as_str())
                    {
                        return None;
                    }
                    if k.is_symbol() && !include_symbols {
                        return None;
                    }
                    let enumerable = data.is_enumerable(k);
                    if !enumerable && !include_non_enumerable {
                        return None;
                    }
                    Some((k.clone(), v.clone(), enumerable))
                })
                .collect()
        };

        for (key, val, enumerable) in entries {
            self.reserve_property(target, key, val, enumerable);
        }
    }

    /// Add `key` to `target` in source order and queue its value.
    fn reserve_property(&mut self, target: &JSObjectDataPtr<'gc>, key: PropertyKey<'gc>, val: Value<'gc>, enumerable: bool) {
        {
            let mut data = target.borrow_mut(self.mc);
            data.insert(key.clone(), Value::Undefined);
            if !enumerable {
                data.set_non_enumerable(key.clone());
            }
        }
        self.defer(val, Slot::Property { target: *target, key });
    }
}
