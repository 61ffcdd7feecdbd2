//! Generation-checked iteration cursors.
//!
//! A [`Cursor`] is a detached position into a [`DynamicArray`]: it does not
//! borrow the array, so it survives across mutations. Each cursor records
//! the array generation it was taken from. Any operation that changes the
//! array's length or buffer bumps the generation, and resolving an older
//! cursor fails with [`ArrayError::StaleCursor`] instead of reading moved
//! or freed storage.
//!
//! For plain traversal prefer [`DynamicArray::iter`], whose borrow rules
//! out invalidation altogether.

use crate::array::DynamicArray;
use crate::error::ArrayError;

/// A position within a [`DynamicArray`], valid for one generation.
///
/// Two cursors are equal iff they denote the same position in the same
/// generation. The cursor returned by [`DynamicArray::end`] is one past the
/// last element and cannot be dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Cursor {
    position: usize,
    generation: u64,
}

impl Cursor {
    /// Index this cursor points at.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Array generation this cursor was taken from.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T> DynamicArray<T> {
    /// Cursor at the first element (equal to [`end`](Self::end) when empty).
    pub fn begin(&self) -> Cursor {
        Cursor {
            position: 0,
            generation: self.generation(),
        }
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> Cursor {
        Cursor {
            position: self.len(),
            generation: self.generation(),
        }
    }

    /// Step `cursor` to the next element.
    ///
    /// Advancing from the last element yields [`end`](Self::end); advancing
    /// the end cursor fails with [`ArrayError::IndexOutOfRange`].
    pub fn advance(&self, cursor: &mut Cursor) -> Result<(), ArrayError> {
        self.check_cursor(cursor)?;
        if cursor.position >= self.len() {
            return Err(ArrayError::IndexOutOfRange {
                index: cursor.position,
                len: self.len(),
            });
        }
        cursor.position += 1;
        Ok(())
    }

    /// Element under `cursor`.
    pub fn resolve(&self, cursor: &Cursor) -> Result<&T, ArrayError> {
        self.check_cursor(cursor)?;
        self.at(cursor.position)
    }

    /// Mutable element under `cursor`. Writing through it does not
    /// invalidate other cursors.
    pub fn resolve_mut(&mut self, cursor: &Cursor) -> Result<&mut T, ArrayError> {
        self.check_cursor(cursor)?;
        self.at_mut(cursor.position)
    }

    fn check_cursor(&self, cursor: &Cursor) -> Result<(), ArrayError> {
        if cursor.generation != self.generation() {
            return Err(ArrayError::StaleCursor {
                cursor_generation: cursor.generation,
                current_generation: self.generation(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers() -> DynamicArray<i32> {
        DynamicArray::from_slice(&[0, 1, 2, 3, 4, 5]).unwrap()
    }

    #[test]
    fn walk_from_begin_to_end() {
        let v = numbers();
        let mut cursor = v.begin();
        assert_eq!(*v.resolve(&cursor).unwrap(), *v.front().unwrap());
        v.advance(&mut cursor).unwrap();
        assert_eq!(*v.resolve(&cursor).unwrap(), v[1]);

        let mut i = 0;
        let mut cursor = v.begin();
        while cursor != v.end() {
            assert_eq!(*v.resolve(&cursor).unwrap(), v[i]);
            v.advance(&mut cursor).unwrap();
            i += 1;
        }
        assert_eq!(i, 6);
    }

    #[test]
    fn begin_equals_end_when_empty() {
        let v: DynamicArray<i32> = DynamicArray::new().unwrap();
        assert_eq!(v.begin(), v.end());
    }

    #[test]
    fn end_cannot_be_dereferenced_or_advanced() {
        let v = numbers();
        let mut end = v.end();
        assert_eq!(v.resolve(&end), Err(ArrayError::IndexOutOfRange { index: 6, len: 6 }));
        assert!(matches!(v.advance(&mut end), Err(ArrayError::IndexOutOfRange { .. })));
        assert_eq!(end.position(), 6);
    }

    #[test]
    fn push_invalidates_cursor() {
        let mut v = numbers();
        let cursor = v.begin();
        v.push_back(6).unwrap();
        assert!(matches!(v.resolve(&cursor), Err(ArrayError::StaleCursor { .. })));
        assert_eq!(*v.resolve(&v.begin()).unwrap(), 0);
    }

    #[test]
    fn pop_resize_and_assign_invalidate_cursor() {
        let mut v = numbers();

        let cursor = v.begin();
        v.pop_back().unwrap();
        assert!(v.resolve(&cursor).is_err());

        let cursor = v.begin();
        v.resize(2).unwrap();
        assert!(v.resolve(&cursor).is_err());

        let cursor = v.begin();
        v.assign_from_slice(&[9, 9]).unwrap();
        assert!(matches!(v.resolve(&cursor), Err(ArrayError::StaleCursor { .. })));

        let mut cursor = v.begin();
        v.clear();
        assert!(v.advance(&mut cursor).is_err());
    }

    #[test]
    fn reallocation_and_extend_invalidate_cursor() {
        let mut v = numbers();

        let cursor = v.begin();
        v.reserve(10).unwrap();
        assert!(matches!(v.resolve(&cursor), Err(ArrayError::StaleCursor { .. })));

        let cursor = v.begin();
        v.shrink_to_fit().unwrap();
        assert!(matches!(v.resolve(&cursor), Err(ArrayError::StaleCursor { .. })));

        v.reserve(2).unwrap();
        let cursor = v.begin();
        v.try_extend_from_slice(&[6, 7]).unwrap();
        assert!(matches!(v.resolve(&cursor), Err(ArrayError::StaleCursor { .. })));
    }

    #[test]
    fn no_op_reserve_and_empty_extend_keep_cursor_valid() {
        let mut v = numbers();
        v.reserve(4).unwrap();
        let cursor = v.begin();
        v.reserve(3).unwrap();
        v.try_extend_from_slice(&[]).unwrap();
        assert_eq!(v.resolve(&cursor), Ok(&0));
    }

    #[test]
    fn indexed_writes_keep_cursor_valid() {
        let mut v = numbers();
        let cursor = v.begin();
        v[3] = 30;
        *v.resolve_mut(&cursor).unwrap() = 10;
        assert_eq!(*v.resolve(&cursor).unwrap(), 10);
        assert_eq!(v[3], 30);
    }

    #[test]
    fn cursors_from_different_generations_differ() {
        let mut v = numbers();
        let before = v.begin();
        v.push_back(6).unwrap();
        assert_ne!(before, v.begin());
        assert_eq!(before.position(), v.begin().position());
        assert!(v.begin().generation() > before.generation());
    }
}
