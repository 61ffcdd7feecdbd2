//! Container error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during dynamic array operations.
///
/// Every fallible operation either succeeds completely or returns one of
/// these and leaves the array exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// The backing buffer could not be obtained.
    ///
    /// Raised when the layout overflows, when the request exceeds
    /// [`ArrayConfig::max_bytes`](crate::ArrayConfig::max_bytes), or when
    /// the global allocator returns null.
    Allocation {
        /// Number of element slots requested.
        requested_slots: usize,
        /// Size of one element in bytes.
        element_size: usize,
    },
    /// An operation that needs at least one element was called on an
    /// empty array.
    EmptyContainer {
        /// Name of the rejected operation (`"pop_back"`, `"front"`, ...).
        operation: &'static str,
    },
    /// An index at or past the current length.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Length of the array at the time of the call.
        len: usize,
    },
    /// A [`Cursor`](crate::Cursor) from a generation that has since been
    /// invalidated by a length or capacity change.
    StaleCursor {
        /// The generation recorded in the cursor.
        cursor_generation: u64,
        /// The array's current generation.
        current_generation: u64,
    },
}

impl ArrayError {
    pub(crate) fn allocation<T>(requested_slots: usize) -> Self {
        Self::Allocation {
            requested_slots,
            element_size: std::mem::size_of::<T>(),
        }
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation {
                requested_slots,
                element_size,
            } => {
                write!(
                    f,
                    "allocation failed: {requested_slots} slots of {element_size} bytes"
                )
            }
            Self::EmptyContainer { operation } => {
                write!(f, "{operation} called on an empty array")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index out of range: index {index}, len {len}")
            }
            Self::StaleCursor {
                cursor_generation,
                current_generation,
            } => {
                write!(
                    f,
                    "stale cursor: generation {cursor_generation}, current {current_generation}"
                )
            }
        }
    }
}

impl Error for ArrayError {}
