//! Low-level primitives for buffer memory operations.
//!
//! [`RawBuffer`] owns exactly one heap allocation of `capacity` slots and
//! releases it in `Drop`. It knows nothing about which slots hold live
//! values: dropping elements is the owner's job, releasing memory is ours.
//! Zero-capacity buffers and zero-sized element types never touch the
//! allocator.
//!
//! Every `unsafe` block in this module carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::config::ArrayConfig;
use crate::error::ArrayError;

/// A single owned allocation of `capacity` uninitialised `T` slots.
pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

// SAFETY: RawBuffer uniquely owns its allocation; sending it is sending the
// `T`s it may hold.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out `&T` through the owning array.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// A buffer with no slots and no allocation.
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Allocate room for `cap` elements.
    ///
    /// Fails with [`ArrayError::Allocation`] if the byte size overflows,
    /// exceeds `config.max_bytes`, or the allocator returns null. Nothing
    /// is allocated on failure.
    pub(crate) fn allocate(cap: usize, config: &ArrayConfig) -> Result<Self, ArrayError> {
        if !config.permits::<T>(cap) {
            log::warn!(
                "refusing buffer of {cap} slots: exceeds {} byte ceiling",
                config.max_bytes
            );
            return Err(ArrayError::allocation::<T>(cap));
        }
        let layout = Layout::array::<T>(cap).map_err(|_| ArrayError::allocation::<T>(cap))?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap,
                _marker: PhantomData,
            });
        }

        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = match NonNull::new(raw.cast::<T>()) {
            Some(p) => p,
            None => {
                log::warn!("allocator returned null for {} bytes", layout.size());
                return Err(ArrayError::allocation::<T>(cap));
            }
        };
        log::trace!("allocated buffer of {cap} slots ({} bytes)", layout.size());
        Ok(Self {
            ptr,
            cap,
            _marker: PhantomData,
        })
    }

    /// Number of slots in this buffer.
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Write `value` into slot `index` without dropping the old contents.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot must not hold a live value.
    pub(crate) unsafe fn write(&mut self, index: usize, value: T) {
        debug_assert!(index < self.cap);
        // SAFETY: caller guarantees the slot is in bounds and vacant.
        unsafe { ptr::write(self.as_mut_ptr().add(index), value) }
    }

    /// Move the value out of slot `index`, leaving the slot logically vacant.
    ///
    /// # Safety
    ///
    /// `index < capacity`, the slot must hold a live value, and the caller
    /// must treat the slot as vacant afterwards.
    pub(crate) unsafe fn read(&self, index: usize) -> T {
        debug_assert!(index < self.cap);
        // SAFETY: caller guarantees the slot is in bounds and initialised.
        unsafe { ptr::read(self.as_ptr().add(index)) }
    }

    /// View the first `len` slots as a slice.
    ///
    /// # Safety
    ///
    /// `len <= capacity` and slots `[0, len)` must all be initialised.
    pub(crate) unsafe fn slice(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.cap);
        // SAFETY: ptr is non-null and aligned (dangling is fine for len 0 or
        // ZSTs); caller guarantees the prefix is initialised.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), len) }
    }

    /// View the slots `[start, end)` as a slice.
    ///
    /// # Safety
    ///
    /// `start <= end <= capacity` and every slot in the range must be
    /// initialised.
    pub(crate) unsafe fn slice_range(&self, start: usize, end: usize) -> &[T] {
        debug_assert!(start <= end && end <= self.cap);
        // SAFETY: caller guarantees the range is in bounds and initialised.
        unsafe { std::slice::from_raw_parts(self.as_ptr().add(start), end - start) }
    }

    /// Mutable view of the first `len` slots.
    ///
    /// # Safety
    ///
    /// Same as [`RawBuffer::slice`].
    pub(crate) unsafe fn slice_mut(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.cap);
        // SAFETY: as for `slice`, and `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// Bitwise-move the first `len` values of `src` into this buffer.
    ///
    /// After the call the values belong to `self`; `src` still owns its
    /// memory but its slots must be treated as vacant.
    ///
    /// # Safety
    ///
    /// `len` must not exceed either capacity, `src[0..len)` must be
    /// initialised and `self[0..len)` vacant.
    pub(crate) unsafe fn take_prefix(&mut self, src: &mut RawBuffer<T>, len: usize) {
        debug_assert!(len <= self.cap && len <= src.cap);
        // SAFETY: distinct allocations never overlap; bounds checked by caller.
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), self.as_mut_ptr(), len) }
    }

    /// Drop the values in slots `[start, end)` in place.
    ///
    /// # Safety
    ///
    /// `start <= end <= capacity`, every slot in the range must hold a live
    /// value, and the caller must treat them as vacant afterwards.
    pub(crate) unsafe fn drop_range(&mut self, start: usize, end: usize) {
        debug_assert!(start <= end && end <= self.cap);
        // SAFETY: caller guarantees the range is initialised and in bounds.
        unsafe {
            let first = self.as_mut_ptr().add(start);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, end - start));
        }
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.cap == 0 || mem::size_of::<T>() == 0 {
            return;
        }
        // The layout was valid when allocated, so recomputing it cannot fail.
        if let Ok(layout) = Layout::array::<T>(self.cap) {
            log::trace!("releasing buffer of {} slots", self.cap);
            // SAFETY: ptr came from `alloc` with exactly this layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}
