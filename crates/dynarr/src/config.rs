//! Array configuration parameters.

/// Configuration for a [`DynamicArray`](crate::DynamicArray).
///
/// Carried by each array instance and inherited by copies made from it.
/// All values are plain data; there is no validation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayConfig {
    /// Upper bound on the byte size of any single buffer the array allocates.
    ///
    /// Default: `isize::MAX`, the largest layout the allocator accepts.
    /// Requests above the ceiling fail with
    /// [`ArrayError::Allocation`](crate::ArrayError::Allocation) before the
    /// allocator is called.
    pub max_bytes: usize,
}

impl ArrayConfig {
    /// Capacity of an array created with [`DynamicArray::new`](crate::DynamicArray::new).
    pub const DEFAULT_CAPACITY: usize = 1;

    /// Default byte ceiling: the platform layout limit.
    pub const DEFAULT_MAX_BYTES: usize = isize::MAX as usize;

    /// Create a config with the default byte ceiling.
    pub fn new() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }

    /// Create a config whose buffers may not exceed `max_bytes`.
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Bytes needed for `slots` elements of `T`, or `None` on overflow.
    pub fn bytes_for<T>(slots: usize) -> Option<usize> {
        slots.checked_mul(std::mem::size_of::<T>())
    }

    /// Whether a buffer of `slots` elements of `T` fits under the ceiling.
    pub fn permits<T>(&self, slots: usize) -> bool {
        Self::bytes_for::<T>(slots).is_some_and(|bytes| bytes <= self.max_bytes)
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::new()
    }
}
