use std::{
    alloc::Layout,
    any::{TypeId, type_name},
    fmt, mem,
    ptr::{self, NonNull},
    sync::Arc,
};

use crate::ecs::{
    component::{Component, Id},
    error::{Error, Result},
};

/// A type-erased constructor writing a fresh component value into uninitialized memory.
pub type ConstructFn = Arc<dyn Fn(NonNull<u8>) + Send + Sync>;

/// The runtime shape of one component type.
///
/// `Info` is the small vtable archetype columns use to manage values whose type is only known
/// at runtime: the memory layout plus construct, move and drop operations. It is resolved once
/// per type and shared (cloned) by every column storing that type.
#[derive(Clone)]
pub struct Info {
    /// The component id.
    id: Id,

    /// The Rust type name, for diagnostics.
    name: &'static str,

    /// The Rust TypeId, for debug type checks.
    type_id: TypeId,

    /// The memory layout of the component.
    layout: Layout,

    /// Drop a value in place. A no-op for types without drop glue.
    drop_fn: unsafe fn(NonNull<u8>),

    /// Move a value from `src` into uninitialized `dst`. The source is left logically
    /// uninitialized.
    move_fn: unsafe fn(NonNull<u8>, NonNull<u8>),

    /// The registered constructor, if any.
    construct: Option<ConstructFn>,
}

impl Info {
    /// Construct Info for type `C`, without a constructor.
    pub fn new<C: Component>(id: Id) -> Self {
        let drop_fn = if mem::needs_drop::<C>() {
            Self::drop_impl::<C>
        } else {
            Self::drop_noop
        };
        Self {
            id,
            name: type_name::<C>(),
            type_id: TypeId::of::<C>(),
            layout: Layout::new::<C>(),
            drop_fn,
            move_fn: Self::move_impl::<C>,
            construct: None,
        }
    }

    /// Wrap a typed constructor into a type-erased one.
    pub fn constructor<C: Component>(ctor: impl Fn() -> C + Send + Sync + 'static) -> ConstructFn {
        Arc::new(move |dst: NonNull<u8>| {
            // SAFETY: Columns only call the constructor with memory laid out for `C`.
            unsafe { dst.as_ptr().cast::<C>().write(ctor()) }
        })
    }

    /// Get the component ID for this type.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the Rust type name of the component.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the TypeId for this type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get the memory layout for this type.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Determine if this component is a zero-sized type.
    #[inline]
    pub fn is_zero_sized(&self) -> bool {
        self.layout.size() == 0
    }

    /// Whether a constructor is registered for this type.
    #[inline]
    pub fn has_constructor(&self) -> bool {
        self.construct.is_some()
    }

    /// Install a constructor if none is present. Returns true if it was installed.
    pub(crate) fn install_constructor(&mut self, ctor: ConstructFn) -> bool {
        if self.construct.is_some() {
            return false;
        }
        self.construct = Some(ctor);
        true
    }

    /// Construct a fresh value into `dst`.
    ///
    /// # Safety
    /// - `dst` must be valid for writes of this component's layout and hold no live value.
    pub unsafe fn construct_at(&self, dst: NonNull<u8>) -> Result<()> {
        let ctor = self
            .construct
            .as_ref()
            .ok_or(Error::MissingConstructor(self.name))?;
        ctor(dst);
        Ok(())
    }

    /// Move the value at `src` into `dst`.
    ///
    /// # Safety
    /// - `src` must hold a live value of this component type; it is uninitialized afterwards.
    /// - `dst` must be valid for writes and must not overlap `src`.
    #[inline]
    pub unsafe fn move_to(&self, src: NonNull<u8>, dst: NonNull<u8>) {
        unsafe { (self.move_fn)(src, dst) }
    }

    /// Drop the value at `ptr` in place.
    ///
    /// # Safety
    /// - `ptr` must hold a live value of this component type.
    #[inline]
    pub unsafe fn drop_at(&self, ptr: NonNull<u8>) {
        unsafe { (self.drop_fn)(ptr) }
    }

    unsafe fn drop_impl<C>(ptr: NonNull<u8>) {
        unsafe { ptr::drop_in_place(ptr.as_ptr().cast::<C>()) }
    }

    unsafe fn drop_noop(_ptr: NonNull<u8>) {}

    unsafe fn move_impl<C>(src: NonNull<u8>, dst: NonNull<u8>) {
        unsafe { ptr::copy_nonoverlapping(src.as_ptr().cast::<C>(), dst.as_ptr().cast::<C>(), 1) }
    }
}

impl fmt::Debug for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Info")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("layout", &self.layout)
            .field("constructor", &self.construct.is_some())
            .finish()
    }
}
