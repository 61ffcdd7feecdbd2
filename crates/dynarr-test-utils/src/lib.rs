//! Test utilities for dynarr development.
//!
//! Provides element types that observe their own lifecycle:
//! [`Tracked`] values count creations and drops through a shared
//! [`DropCounter`], and can be told to panic on `clone` once a budget is
//! spent, for exercising unwind paths.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Counts {
    created: AtomicUsize,
    dropped: AtomicUsize,
    clone_budget: AtomicUsize,
}

/// Shared tally of [`Tracked`] values created and dropped.
///
/// `live()` returning zero after a scenario means nothing leaked and
/// nothing was dropped twice (a double drop would underflow it).
#[derive(Clone, Debug)]
pub struct DropCounter {
    counts: Arc<Counts>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::with_clone_budget(usize::MAX)
    }

    /// Counter whose values panic on `clone` after `budget` successful clones.
    pub fn with_clone_budget(budget: usize) -> Self {
        Self {
            counts: Arc::new(Counts {
                created: AtomicUsize::new(0),
                dropped: AtomicUsize::new(0),
                clone_budget: AtomicUsize::new(budget),
            }),
        }
    }

    /// Wrap `value` so its lifecycle is counted here.
    pub fn track<V>(&self, value: V) -> Tracked<V> {
        self.counts.created.fetch_add(1, Ordering::SeqCst);
        Tracked {
            value,
            counts: Arc::clone(&self.counts),
        }
    }

    pub fn created(&self) -> usize {
        self.counts.created.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> usize {
        self.counts.dropped.load(Ordering::SeqCst)
    }

    /// Values created but not yet dropped.
    ///
    /// # Panics
    ///
    /// Panics if more values were dropped than created.
    pub fn live(&self) -> usize {
        let created = self.created();
        let dropped = self.dropped();
        assert!(
            dropped <= created,
            "double drop detected: {dropped} drops for {created} values"
        );
        created - dropped
    }
}

impl Default for DropCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A value whose creation, clones and drop are recorded by a [`DropCounter`].
#[derive(Debug)]
pub struct Tracked<V> {
    pub value: V,
    counts: Arc<Counts>,
}

impl<V: Clone> Clone for Tracked<V> {
    fn clone(&self) -> Self {
        let spent = self
            .counts
            .clone_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if spent.is_err() {
            panic!("clone budget exhausted");
        }
        self.counts.created.fetch_add(1, Ordering::SeqCst);
        Self {
            value: self.value.clone(),
            counts: Arc::clone(&self.counts),
        }
    }
}

impl<V: PartialEq> PartialEq for Tracked<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<V> Drop for Tracked<V> {
    fn drop(&mut self) {
        self.counts.dropped.fetch_add(1, Ordering::SeqCst);
    }
}
