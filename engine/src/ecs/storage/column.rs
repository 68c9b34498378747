use std::{any::TypeId, ptr::NonNull};

use crate::ecs::{
    component::{Component, Info},
    error::Result,
    storage::{
        Row,
        mem::{GrowthStrategy, IndexedMemory},
    },
};

/// Type-erased, contiguous storage for every value of one component type in one archetype.
///
/// Values `0..len` are initialized. Everything past `len` is reserved memory.
pub struct Column {
    /// The backing memory.
    data: IndexedMemory,

    /// Number of initialized values.
    len: usize,

    /// The shape of the stored component.
    info: Info,
}

impl Column {
    /// Create an empty column for a component, reserving `capacity` rows up front.
    pub fn new(info: Info, growth: GrowthStrategy, capacity: usize) -> Self {
        Self {
            data: IndexedMemory::with_capacity(info.layout(), capacity, growth),
            len: 0,
            info,
        }
    }

    /// Get the column info.
    #[inline]
    pub fn info(&self) -> &Info {
        &self.info
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Push a typed value.
    ///
    /// # Panics
    /// - If `C` is not the column's component type.
    pub fn push<C: Component>(&mut self, value: C) {
        self.ensure_type::<C>();
        let slot = self.reserve_slot();
        // SAFETY: The slot is reserved and uninitialized and the type was checked above.
        unsafe { slot.cast::<C>().write(value) };
        self.len += 1;
    }

    /// Push a value built by the component's registered constructor.
    pub fn push_constructed(&mut self) -> Result<()> {
        let slot = self.reserve_slot();
        // SAFETY: The slot is reserved, uninitialized and laid out for this component.
        unsafe { self.info.construct_at(slot)? };
        self.len += 1;
        Ok(())
    }

    /// Push a value moved out of `src`.
    ///
    /// # Safety
    /// - `src` must hold a live value of this column's component type, outside this column.
    /// - The value at `src` is logically uninitialized afterwards; its owner must forget it.
    pub unsafe fn push_from(&mut self, src: NonNull<u8>) {
        let slot = self.reserve_slot();
        unsafe { self.info.move_to(src, slot) };
        self.len += 1;
    }

    /// Get a reference to the value at `row`, or `None` if the row is out of range.
    ///
    /// # Panics
    /// - If `C` is not the column's component type.
    pub fn get<C: Component>(&self, row: Row) -> Option<&C> {
        self.ensure_type::<C>();
        if row.index() >= self.len {
            return None;
        }
        // SAFETY: The row is initialized and holds a `C`.
        Some(unsafe { self.ptr(row).cast::<C>().as_ref() })
    }

    /// Get a mutable reference to the value at `row`, or `None` if the row is out of range.
    ///
    /// # Panics
    /// - If `C` is not the column's component type.
    pub fn get_mut<C: Component>(&mut self, row: Row) -> Option<&mut C> {
        self.ensure_type::<C>();
        if row.index() >= self.len {
            return None;
        }
        // SAFETY: The row is initialized, holds a `C` and `self` is borrowed exclusively.
        Some(unsafe { self.ptr(row).cast::<C>().as_mut() })
    }

    /// Raw pointer to the value at `row`.
    #[inline]
    pub fn ptr(&self, row: Row) -> NonNull<u8> {
        debug_assert!(row.index() < self.len, "row {row:?} out of range");
        self.data.ptr_at(row.index())
    }

    /// Raw pointer to the first value. Aligned but dangling for columns that never allocated.
    #[inline]
    pub fn base_ptr(&self) -> NonNull<u8> {
        self.data.as_ptr()
    }

    /// Drop the value at `row` and move the last value into its place.
    pub fn swap_remove_drop(&mut self, row: Row) {
        let removed = self.ptr(row);
        // SAFETY: `removed` is initialized. It is immediately overwritten by (or is) the last
        // value, which the length decrement forgets.
        unsafe {
            self.info.drop_at(removed);
            self.swap_remove_forget(row);
        }
    }

    /// Move the last value into `row` without dropping whatever `row` held.
    ///
    /// # Safety
    /// - The value at `row` must already be moved out or dropped.
    pub unsafe fn swap_remove_forget(&mut self, row: Row) {
        debug_assert!(row.index() < self.len, "row {row:?} out of range");
        let last = self.len - 1;
        if row.index() != last {
            let dst = self.data.ptr_at(row.index());
            let src = self.data.ptr_at(last);
            unsafe { self.info.move_to(src, dst) };
        }
        self.len = last;
    }

    /// Drop every value and reset the length. Capacity is kept.
    pub fn clear(&mut self) {
        let len = self.len;
        // Reset first so a panicking destructor cannot cause a double drop.
        self.len = 0;
        for index in 0..len {
            // SAFETY: Every row below the old length was initialized.
            unsafe { self.info.drop_at(self.data.ptr_at(index)) };
        }
    }

    #[inline]
    fn reserve_slot(&mut self) -> NonNull<u8> {
        self.data.reserve(self.len + 1);
        self.data.ptr_at(self.len)
    }

    #[inline]
    fn ensure_type<C: Component>(&self) {
        assert_eq!(
            self.info.type_id(),
            TypeId::of::<C>(),
            "column stores {} but was accessed as {}",
            self.info.name(),
            std::any::type_name::<C>()
        );
    }
}

impl Drop for Column {
    fn drop(&mut self) {
        self.clear();
    }
}
