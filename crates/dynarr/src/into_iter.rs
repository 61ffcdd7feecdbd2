//! By-value iteration.

#![allow(unsafe_code)]

use std::fmt;

use crate::array::DynamicArray;
use crate::raw::RawBuffer;

/// Owning iterator returned by `DynamicArray::into_iter`.
///
/// Yields elements front to back. Elements not consumed are dropped with
/// the iterator, and the buffer is released exactly once.
pub struct IntoIter<T> {
    buf: RawBuffer<T>,
    /// Next live slot from the front.
    start: usize,
    /// One past the last live slot.
    end: usize,
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let (buf, len) = self.into_raw_parts();
        IntoIter {
            buf,
            start: 0,
            end: len,
        }
    }
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [start, end) are live and within capacity.
        unsafe { self.buf.slice_range(self.start, self.end) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: start < end, so the slot is live; it is vacated by the bump.
        let value = unsafe { self.buf.read(self.start) };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot at the old end - 1 is live and now outside [start, end).
        Some(unsafe { self.buf.read(self.end) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> std::iter::FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let (start, end) = (self.start, self.end);
        self.start = end;
        // SAFETY: [start, end) are the unconsumed live values.
        unsafe { self.buf.drop_range(start, end) };
    }
}
