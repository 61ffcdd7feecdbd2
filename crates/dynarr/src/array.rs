//! The owning, contiguous, growable array.
//!
//! [`DynamicArray`] pairs a `RawBuffer` with a logical length. Slots
//! `[0, len)` are live; `[len, capacity)` are vacant and never read.
//!
//! # Capacity policy
//!
//! - **Growth** (`push_back` on a full array): `max(1, 2 * capacity)`.
//! - **Shrink** (after `pop_back`): when `len * 2 <= capacity`, reallocate
//!   to exactly `len` slots.
//! - **Resize up** past capacity: `2 * new_len`, or exactly `new_len` when
//!   the doubled buffer would exceed the configured ceiling.
//! - **Resize down**: surplus elements are dropped, capacity is unchanged.
//!
//! Every reallocation allocates the new buffer first, so a failed
//! allocation leaves the array untouched.

#![allow(unsafe_code)]

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice::SliceIndex;

use crate::config::ArrayConfig;
use crate::error::ArrayError;
use crate::raw::RawBuffer;

/// A generic, owning, contiguous sequence container.
///
/// Fallible operations return [`ArrayError`] and leave the array exactly as
/// it was on failure.
pub struct DynamicArray<T> {
    buf: RawBuffer<T>,
    len: usize,
    /// Bumped whenever `len` or the buffer changes; see [`Cursor`](crate::Cursor).
    generation: u64,
    config: ArrayConfig,
}

impl<T> DynamicArray<T> {
    /// Create an empty array with room for `capacity` elements, governed by
    /// `config`.
    pub fn with_config(capacity: usize, config: ArrayConfig) -> Result<Self, ArrayError> {
        Ok(Self {
            buf: RawBuffer::allocate(capacity, &config)?,
            len: 0,
            generation: 0,
            config,
        })
    }

    /// Create an empty array with room for `capacity` elements.
    ///
    /// A capacity of zero allocates nothing.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Self::with_config(capacity, ArrayConfig::default())
    }

    /// Create an empty array with [`ArrayConfig::DEFAULT_CAPACITY`] slots.
    pub fn new() -> Result<Self, ArrayError> {
        Self::with_capacity(ArrayConfig::DEFAULT_CAPACITY)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The configuration this array allocates under.
    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are initialised and len <= capacity.
        unsafe { self.buf.slice(self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`.
        unsafe { self.buf.slice_mut(self.len) }
    }

    /// Borrowing iterator over the live elements, front to back.
    ///
    /// The borrow keeps the array from being resized while iterating.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutable borrowing iterator over the live elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Append `value` as the new last element, growing the buffer if full.
    ///
    /// On [`ArrayError::Allocation`] the array is unchanged and `value` is
    /// dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), ArrayError> {
        if self.len == self.capacity() {
            self.grow()?;
        }
        // SAFETY: len < capacity after growth, and slot len is vacant.
        unsafe { self.buf.write(self.len, value) };
        self.len += 1;
        self.bump_generation();
        Ok(())
    }

    /// Remove and return the last element.
    ///
    /// Shrinks the buffer to exactly `len` slots once it is at most half
    /// full. If that shrink cannot be allocated the larger buffer is kept.
    pub fn pop_back(&mut self) -> Result<T, ArrayError> {
        if self.len == 0 {
            return Err(ArrayError::EmptyContainer {
                operation: "pop_back",
            });
        }
        self.len -= 1;
        // SAFETY: slot len held the last live value; it is now vacant.
        let value = unsafe { self.buf.read(self.len) };
        self.bump_generation();
        self.shrink_if_sparse();
        Ok(value)
    }

    fn shrink_if_sparse(&mut self) {
        let sparse = self
            .len
            .checked_mul(2)
            .is_some_and(|doubled| doubled <= self.capacity());
        if sparse && self.len < self.capacity() {
            if let Err(err) = self.reallocate(self.len) {
                log::warn!("keeping {} slots after failed shrink: {err}", self.capacity());
            }
        }
    }

    /// Set the length to `new_len`.
    ///
    /// Growing fills new slots with `T::default()`; shrinking drops the
    /// surplus tail and keeps the current capacity. A panicking `default`
    /// leaves the length unchanged.
    pub fn resize(&mut self, new_len: usize) -> Result<(), ArrayError>
    where
        T: Default,
    {
        if new_len <= self.len {
            self.truncate_to(new_len);
            return Ok(());
        }
        if new_len > self.capacity() {
            let new_cap = new_len
                .checked_mul(2)
                .filter(|&cap| self.config.permits::<T>(cap))
                .unwrap_or(new_len);
            self.reallocate(new_cap)?;
        }
        let mut tail = PendingTail::new(&mut self.buf, self.len);
        while tail.end < new_len {
            // SAFETY: end < new_len <= capacity and slot end is vacant.
            unsafe { tail.push(T::default()) };
        }
        self.len = tail.commit();
        self.bump_generation();
        Ok(())
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.truncate_to(0);
    }

    fn truncate_to(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let old_len = self.len;
        // Shorten first so a panicking destructor cannot cause a double drop.
        self.len = new_len;
        self.bump_generation();
        // SAFETY: [new_len, old_len) were live and are now outside len.
        unsafe { self.buf.drop_range(new_len, old_len) };
    }

    /// Ensure room for at least `additional` more elements, doubling the
    /// capacity until it suffices.
    pub fn reserve(&mut self, additional: usize) -> Result<(), ArrayError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(ArrayError::allocation::<T>(usize::MAX))?;
        if required <= self.capacity() {
            return Ok(());
        }
        let mut new_cap = self.capacity().max(1);
        while new_cap < required {
            new_cap = new_cap.checked_mul(2).unwrap_or(required);
        }
        self.reallocate(new_cap)
    }

    /// Reallocate to exactly `len` slots.
    pub fn shrink_to_fit(&mut self) -> Result<(), ArrayError> {
        if self.capacity() > self.len {
            self.reallocate(self.len)?;
        }
        Ok(())
    }

    /// First element.
    pub fn front(&self) -> Result<&T, ArrayError> {
        self.as_slice()
            .first()
            .ok_or(ArrayError::EmptyContainer { operation: "front" })
    }

    /// First element, mutably.
    pub fn front_mut(&mut self) -> Result<&mut T, ArrayError> {
        self.as_mut_slice()
            .first_mut()
            .ok_or(ArrayError::EmptyContainer { operation: "front" })
    }

    /// Last element.
    pub fn back(&self) -> Result<&T, ArrayError> {
        self.as_slice()
            .last()
            .ok_or(ArrayError::EmptyContainer { operation: "back" })
    }

    /// Last element, mutably.
    pub fn back_mut(&mut self) -> Result<&mut T, ArrayError> {
        self.as_mut_slice()
            .last_mut()
            .ok_or(ArrayError::EmptyContainer { operation: "back" })
    }

    /// Element at `index`, or [`ArrayError::IndexOutOfRange`] if
    /// `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ArrayError::IndexOutOfRange { index, len })
    }

    /// Mutable element at `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArrayError::IndexOutOfRange { index, len })
    }

    fn grow(&mut self) -> Result<(), ArrayError> {
        let new_cap = match self.capacity() {
            0 => 1,
            cap => cap
                .checked_mul(2)
                .ok_or(ArrayError::allocation::<T>(usize::MAX))?,
        };
        self.reallocate(new_cap)
    }

    /// Move the live elements into a fresh buffer of `new_cap` slots and
    /// release the old one. The array is untouched if allocation fails.
    fn reallocate(&mut self, new_cap: usize) -> Result<(), ArrayError> {
        debug_assert!(new_cap >= self.len);
        let mut fresh = RawBuffer::allocate(new_cap, &self.config)?;
        log::debug!(
            "reallocating {} live elements: {} -> {new_cap} slots",
            self.len,
            self.capacity()
        );
        // SAFETY: both buffers hold at least len slots; the old prefix is
        // live and the fresh one vacant. The old buffer is released below
        // without dropping the values that moved out of it.
        unsafe { fresh.take_prefix(&mut self.buf, self.len) };
        self.buf = fresh;
        self.bump_generation();
        Ok(())
    }

    /// Split into the raw buffer and length without dropping any element.
    pub(crate) fn into_raw_parts(self) -> (RawBuffer<T>, usize) {
        let mut this = ManuallyDrop::new(self);
        let buf = std::mem::replace(&mut this.buf, RawBuffer::empty());
        (buf, this.len)
    }
}

impl<T: Clone> DynamicArray<T> {
    /// Build an array of `capacity` slots holding clones of `items`.
    ///
    /// If a clone panics the partial array is dropped, releasing every
    /// clone made so far and the buffer.
    fn cloned_from(items: &[T], capacity: usize, config: ArrayConfig) -> Result<Self, ArrayError> {
        debug_assert!(capacity >= items.len());
        let mut out = Self::with_config(capacity, config)?;
        for item in items {
            // SAFETY: out.len < items.len() <= capacity and the slot is vacant.
            unsafe { out.buf.write(out.len, item.clone()) };
            out.len += 1;
        }
        Ok(out)
    }

    /// Create an array holding clones of `items`, with
    /// `capacity == len == items.len()`.
    pub fn from_slice(items: &[T]) -> Result<Self, ArrayError> {
        Self::cloned_from(items, items.len(), ArrayConfig::default())
    }

    /// Deep copy with the same capacity and config.
    pub fn try_clone(&self) -> Result<Self, ArrayError> {
        Self::cloned_from(self.as_slice(), self.capacity(), self.config)
    }

    /// Replace the contents with a deep copy of `other`.
    ///
    /// Afterwards `len` matches `other`'s and so does `capacity`, unless
    /// that capacity exceeds this array's ceiling, in which case the copy
    /// gets exactly `other.len()` slots. The copy is built in a fresh buffer
    /// before the old one is released, so on failure (or a panicking
    /// `Clone`) this array is unchanged.
    pub fn assign(&mut self, other: &DynamicArray<T>) -> Result<(), ArrayError> {
        let capacity = if self.config.permits::<T>(other.capacity()) {
            other.capacity()
        } else {
            other.len()
        };
        let fresh = Self::cloned_from(other.as_slice(), capacity, self.config)?;
        self.replace_with(fresh);
        Ok(())
    }

    /// Replace the contents with clones of `items`, leaving
    /// `capacity == len == items.len()`.
    pub fn assign_from_slice(&mut self, items: &[T]) -> Result<(), ArrayError> {
        let fresh = Self::cloned_from(items, items.len(), self.config)?;
        self.replace_with(fresh);
        Ok(())
    }

    /// Append clones of `items`, reserving room for all of them first.
    ///
    /// The clones are published together. If one panics, those already made
    /// are dropped and the elements are as before, though the buffer may
    /// have grown.
    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), ArrayError> {
        if items.is_empty() {
            return Ok(());
        }
        self.reserve(items.len())?;
        let mut tail = PendingTail::new(&mut self.buf, self.len);
        for item in items {
            // SAFETY: reserve guaranteed len + items.len() <= capacity.
            unsafe { tail.push(item.clone()) };
        }
        self.len = tail.commit();
        self.bump_generation();
        Ok(())
    }

    fn replace_with(&mut self, mut fresh: Self) {
        fresh.generation = self.generation.wrapping_add(1);
        // Dropping the old value releases its elements and buffer once.
        *self = fresh;
    }
}

/// Values written past the live prefix but not yet counted in `len`.
///
/// Dropping the guard drops those values, so a panic while producing the
/// next one leaves the array's elements as they were. [`commit`] hands back
/// the new length instead.
///
/// [`commit`]: PendingTail::commit
struct PendingTail<'a, T> {
    buf: &'a mut RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<'a, T> PendingTail<'a, T> {
    fn new(buf: &'a mut RawBuffer<T>, start: usize) -> Self {
        Self { buf, start, end: start }
    }

    /// # Safety
    ///
    /// `end` must be below the buffer's capacity and slot `end` vacant.
    unsafe fn push(&mut self, value: T) {
        // SAFETY: upheld by the caller.
        unsafe { self.buf.write(self.end, value) };
        self.end += 1;
    }

    fn commit(self) -> usize {
        let end = self.end;
        std::mem::forget(self);
        end
    }
}

impl<T> Drop for PendingTail<'_, T> {
    fn drop(&mut self) {
        // SAFETY: [start, end) were written by this guard and never published.
        unsafe { self.buf.drop_range(self.start, self.end) };
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        let len = self.len;
        self.len = 0;
        // SAFETY: [0, len) were live; the buffer releases memory afterwards.
        unsafe { self.buf.drop_range(0, len) };
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for DynamicArray<T> {
    type Output = I::Output;

    /// # Panics
    ///
    /// Panics on an out-of-range index, as slice indexing does. Use
    /// [`DynamicArray::at`] for a checked form.
    fn index(&self, index: I) -> &I::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynamicArray<T> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// # Panics
    ///
    /// Panics if the copy cannot be allocated, as std collections do.
    /// Use [`DynamicArray::try_clone`] to handle the failure.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("{err}"),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.assign(source) {
            panic!("{err}");
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: PartialEq> PartialEq<[T]> for DynamicArray<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for DynamicArray<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: Clone> TryFrom<&[T]> for DynamicArray<T> {
    type Error = ArrayError;

    fn try_from(items: &[T]) -> Result<Self, ArrayError> {
        Self::from_slice(items)
    }
}

impl<T, const N: usize> TryFrom<[T; N]> for DynamicArray<T> {
    type Error = ArrayError;

    fn try_from(items: [T; N]) -> Result<Self, ArrayError> {
        let mut out = Self::with_capacity(N)?;
        for item in items {
            // SAFETY: exactly N writes into N slots, each vacant.
            unsafe { out.buf.write(out.len, item) };
            out.len += 1;
        }
        Ok(out)
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
