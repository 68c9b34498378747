//! Raw, type-erased memory for one column of components.
//!
//! [`IndexedMemory`] owns a contiguous allocation of uniformly laid out elements and hands out
//! pointers by index. It never tracks which slots are initialized and never drops values; the
//! owning [`Column`](super::Column) does both.
//!
//! Zero sized layouts never allocate. Their pointer is a well aligned dangling pointer and their
//! capacity is unbounded.

use std::{
    alloc::{self, Layout},
    cmp,
    ptr::{self, NonNull},
};

/// How a block grows once its capacity is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStrategy {
    /// Multiply the current capacity by a factor. `Multiply(2)` doubles.
    Multiply(usize),
    /// Add a fixed number of elements on every growth.
    Buffer(usize),
    /// Grow to exactly the requested capacity.
    Exact,
}

impl Default for GrowthStrategy {
    fn default() -> Self {
        Self::Multiply(2)
    }
}

impl GrowthStrategy {
    /// The capacity to grow to, given the current capacity and the minimum required.
    pub fn new_capacity(&self, current: usize, required: usize) -> usize {
        match *self {
            Self::Multiply(factor) => cmp::max(current.saturating_mul(factor), required),
            Self::Buffer(buffer) => cmp::max(current.saturating_add(buffer), required),
            Self::Exact => required,
        }
    }
}

/// A contiguous, indexable block of memory for elements of a single layout.
pub struct IndexedMemory {
    ptr: NonNull<u8>,
    capacity: usize,
    element_layout: Layout,
    growth: GrowthStrategy,
}

impl IndexedMemory {
    /// An empty block. Nothing is allocated until the first reserve.
    pub fn new(element_layout: Layout, growth: GrowthStrategy) -> Self {
        let capacity = if element_layout.size() == 0 {
            usize::MAX
        } else {
            0
        };
        Self {
            ptr: Self::dangling(element_layout),
            capacity,
            element_layout,
            growth,
        }
    }

    /// A block with room for exactly `capacity` elements.
    pub fn with_capacity(element_layout: Layout, capacity: usize, growth: GrowthStrategy) -> Self {
        let mut block = Self::new(element_layout, growth);
        if capacity > block.capacity {
            block.grow_to(capacity);
        }
        block
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pointer to the start of the block. Well aligned even when nothing is allocated.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    #[inline]
    pub fn element_layout(&self) -> Layout {
        self.element_layout
    }

    /// Pointer to the element slot at `index`. The slot may be uninitialized.
    ///
    /// # Panics
    /// - In debug builds, if `index` is outside the allocated capacity.
    #[inline]
    pub fn ptr_at(&self, index: usize) -> NonNull<u8> {
        debug_assert!(
            index < self.capacity,
            "index {} out of bounds (capacity: {})",
            index,
            self.capacity
        );
        // SAFETY: In bounds of the allocation (or a zero-byte offset for zero sized layouts).
        unsafe { self.ptr.add(index * self.element_layout.size()) }
    }

    /// Make sure at least `required` elements fit, growing by the block's strategy if needed.
    pub fn reserve(&mut self, required: usize) {
        if required <= self.capacity {
            return;
        }
        let capacity = self.growth.new_capacity(self.capacity, required);
        self.grow_to(capacity);
    }

    fn grow_to(&mut self, capacity: usize) {
        debug_assert!(self.element_layout.size() > 0);
        let new_layout = Self::array_layout(self.element_layout, capacity);

        let new_ptr = if self.capacity == 0 {
            // SAFETY: new_layout has a non-zero size.
            unsafe { alloc::alloc(new_layout) }
        } else {
            let old_layout = Self::array_layout(self.element_layout, self.capacity);
            // SAFETY: ptr was allocated with old_layout by this block.
            unsafe { alloc::realloc(self.ptr.as_ptr(), old_layout, new_layout.size()) }
        };

        self.ptr = match NonNull::new(new_ptr) {
            Some(ptr) => ptr,
            None => alloc::handle_alloc_error(new_layout),
        };
        self.capacity = capacity;
    }

    fn array_layout(element: Layout, count: usize) -> Layout {
        element
            .size()
            .checked_mul(count)
            .and_then(|size| Layout::from_size_align(size, element.align()).ok())
            .unwrap_or_else(|| panic!("capacity overflow for {count} elements of {element:?}"))
    }

    fn dangling(layout: Layout) -> NonNull<u8> {
        // An alignment is never zero.
        NonNull::new(ptr::without_provenance_mut(layout.align())).unwrap_or(NonNull::dangling())
    }
}

impl Drop for IndexedMemory {
    fn drop(&mut self) {
        if self.element_layout.size() > 0 && self.capacity > 0 {
            let layout = Self::array_layout(self.element_layout, self.capacity);
            // SAFETY: ptr was allocated with this layout by this block.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) }
        }
    }
}

// SAFETY: The block owns its allocation. Columns only ever store `Component` types, which are
// `Send + Sync`.
unsafe impl Send for IndexedMemory {}

// SAFETY: See above; the block has no interior mutability.
unsafe impl Sync for IndexedMemory {}
