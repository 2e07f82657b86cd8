//! The candidate set a symbol key resolves to, with its scratch pool.

use std::{
    collections::HashSet,
    ops::{Deref, DerefMut},
};

use lazy_static::lazy_static;
use lumenc_table::GlobalID;
use parking_lot::Mutex;

lazy_static! {
    static ref POOL: Mutex<Vec<Candidates>> = Mutex::new(Vec::new());
}

/// An ordered, deduplicated set of symbols judged to plausibly correspond
/// to a resolved key.
///
/// An empty set means "nothing matched" and a multi-element set means
/// "multiple structurally plausible matches"; neither is an error, and the
/// disambiguation policy belongs to the caller. Iteration follows
/// insertion order and can be restarted freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    entries: Vec<GlobalID>,
    seen: HashSet<GlobalID>,
}

impl Candidates {
    /// Takes a cleared scratch buffer from the pool.
    ///
    /// The buffer returns to the pool when the guard is dropped, on every
    /// exit path; resolution under high call volume therefore reuses a
    /// small number of allocations.
    #[must_use]
    pub fn acquire() -> Pooled {
        Pooled { inner: POOL.lock().pop().unwrap_or_default() }
    }

    /// Inserts a symbol, keeping insertion order.
    ///
    /// Returns `false` if the symbol is already present.
    pub fn insert(&mut self, id: GlobalID) -> bool {
        if self.seen.insert(id) {
            self.entries.push(id);
            true
        } else {
            false
        }
    }

    /// Iterates over the candidates in insertion order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = GlobalID> + '_ {
        self.entries.iter().copied()
    }

    /// Gets the first candidate, if any.
    #[must_use]
    pub fn first(&self) -> Option<GlobalID> {
        self.entries.first().copied()
    }

    /// Checks whether the given symbol is among the candidates.
    #[must_use]
    pub fn contains(&self, id: GlobalID) -> bool { self.seen.contains(&id) }

    /// Gets the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Checks whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Views the candidates as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[GlobalID] { &self.entries }

    fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }
}

impl<'a> IntoIterator for &'a Candidates {
    type Item = GlobalID;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, GlobalID>>;

    fn into_iter(self) -> Self::IntoIter { self.entries.iter().copied() }
}

/// An RAII guard around a pooled [`Candidates`] buffer.
///
/// Dereferences to the buffer; dropping the guard clears the buffer and
/// hands it back to the pool.
#[derive(Debug)]
pub struct Pooled {
    inner: Candidates,
}

impl Deref for Pooled {
    type Target = Candidates;

    fn deref(&self) -> &Candidates { &self.inner }
}

impl DerefMut for Pooled {
    fn deref_mut(&mut self) -> &mut Candidates { &mut self.inner }
}

impl Drop for Pooled {
    fn drop(&mut self) {
        let mut buffer = std::mem::take(&mut self.inner);
        buffer.clear();
        POOL.lock().push(buffer);
    }
}
