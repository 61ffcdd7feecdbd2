//! Benchmark fixtures for dynarr.
//!
//! - [`filled`]: an array of `0..len` built by repeated `push_back`
//! - [`BENCH_LEN`]: element count shared by every benchmark

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use dynarr::{ArrayError, DynamicArray};

/// Number of elements each benchmark works with.
pub const BENCH_LEN: usize = 10_000;

/// Build an array holding `0..len`, grown one `push_back` at a time.
pub fn filled(len: usize) -> Result<DynamicArray<u64>, ArrayError> {
    let mut array = DynamicArray::new()?;
    for i in 0..len as u64 {
        array.push_back(i)?;
    }
    Ok(array)
}
