//! A generic, contiguous, growable sequence container.
//!
//! [`DynamicArray<T>`] owns exactly one heap buffer, tracks its logical
//! length and allocated capacity, and offers O(1) indexed access and
//! amortised O(1) append/remove at the back.
//!
//! # Architecture
//!
//! ```text
//! DynamicArray<T>
//! ├── RawBuffer<T>   (one allocation; released in Drop, all unsafe lives here)
//! ├── len            (slots [0, len) are live)
//! ├── generation     (bumped on every length/buffer change)
//! └── ArrayConfig    (byte ceiling for allocations)
//! ```
//!
//! # Failure model
//!
//! Every fallible operation returns [`ArrayError`] and leaves the array
//! exactly as it was. Replacement buffers are allocated before the old one
//! is released, and preconditions are checked before storage is touched.
//!
//! # Iteration
//!
//! - [`DynamicArray::iter`] / [`DynamicArray::iter_mut`] borrow the array,
//!   so it cannot be resized mid-iteration.
//! - [`Cursor`]s are detached positions that carry the array generation;
//!   resolving one after a length or capacity change yields
//!   [`ArrayError::StaleCursor`].
//!
//! # Example
//!
//! ```rust
//! use dynarr::{dynarr, ArrayError, DynamicArray};
//!
//! let mut v = DynamicArray::with_capacity(5)?;
//! v.push_back(1)?;
//! v.push_back(2)?;
//! v.push_back(3)?;
//! assert_eq!((v.len(), v.capacity()), (3, 5));
//! assert_eq!(v.pop_back()?, 3);
//!
//! let w = dynarr![0, 1, 2]?;
//! assert_eq!(w.at(3), Err(ArrayError::IndexOutOfRange { index: 3, len: 3 }));
//! # Ok::<(), ArrayError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod config;
pub mod cursor;
pub mod error;
pub mod into_iter;
mod raw;

pub use array::DynamicArray;
pub use config::ArrayConfig;
pub use cursor::Cursor;
pub use error::ArrayError;
pub use into_iter::IntoIter;

/// Build a [`DynamicArray`] from a literal list of elements.
///
/// Expands to `DynamicArray::try_from([..])`, so the result is a
/// `Result<DynamicArray<T>, ArrayError>` with `capacity == len`.
///
/// ```rust
/// let v = dynarr::dynarr![1, 2]?;
/// assert_eq!(v.capacity(), 2);
/// # Ok::<(), dynarr::ArrayError>(())
/// ```
#[macro_export]
macro_rules! dynarr {
    () => {
        $crate::DynamicArray::with_capacity(0)
    };
    ($($elem:expr),+ $(,)?) => {
        <$crate::DynamicArray<_> as ::core::convert::TryFrom<_>>::try_from([$($elem),+])
    };
}
