use crate::{
    all_tuples,
    ecs::component::{Component, Id, IntoSpec, Registry},
};

/// Something component values can be written into, one typed value at a time.
pub trait Target {
    fn apply<C: Component>(&mut self, id: Id, value: C);
}

/// A bundle of component values to attach to one entity: a single component, `()` or a
/// (possibly nested) tuple of them.
///
/// The set hands each value to a [`Target`] with its component id, which keeps the values typed
/// while the target stores them type-erased.
pub trait Set: IntoSpec + Send + Sized + 'static {
    /// The number of component values in the set, counting duplicates.
    ///
    /// A set is well formed only if this equals the length of its spec.
    const LEN: usize;

    /// Apply every value in the set to the target, consuming the set.
    fn apply<T: Target>(self, registry: &Registry, target: &mut T);
}

impl<C: Component> Set for C {
    const LEN: usize = 1;

    fn apply<T: Target>(self, registry: &Registry, target: &mut T) {
        target.apply::<C>(registry.register::<C>(), self);
    }
}

impl Set for () {
    const LEN: usize = 0;

    fn apply<T: Target>(self, _registry: &Registry, _target: &mut T) {}
}

macro_rules! tuple_set {
    ($($name: ident),*) => {
        impl<$($name: Set),*> Set for ($($name,)*) {
            const LEN: usize = 0 $(+ <$name as Set>::LEN)*;

            fn apply<CT: Target>(self, registry: &Registry, target: &mut CT) {
                #[allow(non_snake_case)]
                let ( $($name,)* ) = self;
                $(<$name as Set>::apply($name, registry, target);)*
            }
        }
    }
}

all_tuples!(tuple_set);
