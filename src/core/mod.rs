pub(crate) use gc_arena::GcWeak;
pub(crate) use gc_arena::Mutation as MutationContext;
pub(crate) use gc_arena::collect::Trace as GcTrace;
pub(crate) use gc_arena::lock::RefLock as GcCell;
pub(crate) use gc_arena::{Collect, Gc};
pub type GcPtr<'gc, T> = Gc<'gc, GcCell<T>>;

#[inline]
pub fn new_gc_cell_ptr<'gc, T: 'gc + Collect<'gc>>(mc: &MutationContext<'gc>, value: T) -> GcPtr<'gc, T> {
    Gc::new(mc, GcCell::new(value))
}

mod value;
pub use value::*;

mod property_key;
pub use property_key::*;

mod realm;
pub use realm::*;

mod equality;
pub use equality::*;

pub mod js_error;
pub use js_error::*;

#[derive(Collect)]
#[collect(no_drop)]
pub struct JsRoot<'gc> {
    pub realm: Realm<'gc>,
}

pub type JsArena = gc_arena::Arena<gc_arena::Rootable!['gc => JsRoot<'gc>]>;

/// Create an arena whose root is a freshly initialized realm.
///
/// Values that must survive between `mutate` calls (and therefore across
/// collections) should be stored on `root.realm.global`.
pub fn new_arena() -> JsArena {
    JsArena::new(|mc| JsRoot { realm: Realm::new(mc) })
}
