//! Bounded container nesting without native recursion.
//!
//! JSON nesting depth is chosen by whoever produced the document, so the
//! parser never recurses. Each open array or object is recorded as a
//! [`Container`] tag at an index into host-owned storage; the
//! [`RecursionGuard`] keeps the depth counter and the limit.

use thiserror::Error;

use crate::ErrorKind;

/// Which kind of container is open at a nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Container {
    /// `[`
    #[default]
    Array,
    /// `{`
    Object,
}

/// Where parsing resumes after a container closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unwind {
    /// Back inside an enclosing array.
    Array,
    /// Back inside an enclosing object.
    Object,
    /// The top-level container closed.
    EndRecursion,
}

impl From<Container> for Unwind {
    fn from(tag: Container) -> Self {
        match tag {
            Container::Array => Unwind::Array,
            Container::Object => Unwind::Object,
        }
    }
}

/// Host-owned storage for container tags.
///
/// The guard only writes the slot at the current depth and reads slots
/// below it. Fixed buffers suit embedded and real-time hosts; a `Vec` grows
/// on demand.
pub trait TagStore {
    /// Largest number of tags the storage can hold.
    fn capacity(&self) -> usize;

    /// Records `tag` at `index`. Returns `false` if the slot is unavailable.
    fn store(&mut self, index: usize, tag: Container) -> bool;

    /// Reads the tag at `index`.
    fn load(&self, index: usize) -> Option<Container>;
}

impl TagStore for [Container] {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn store(&mut self, index: usize, tag: Container) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = tag;
                true
            }
            None => false,
        }
    }

    fn load(&self, index: usize) -> Option<Container> {
        self.get(index).copied()
    }
}

impl<const N: usize> TagStore for [Container; N] {
    fn capacity(&self) -> usize {
        N
    }

    fn store(&mut self, index: usize, tag: Container) -> bool {
        self.as_mut_slice().store(index, tag)
    }

    fn load(&self, index: usize) -> Option<Container> {
        self.as_slice().load(index)
    }
}

#[cfg(feature = "alloc")]
impl TagStore for alloc::vec::Vec<Container> {
    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn store(&mut self, index: usize, tag: Container) -> bool {
        if index < self.len() {
            self[index] = tag;
            self.truncate(index + 1);
        } else if index == self.len() {
            self.push(tag);
        } else {
            return false;
        }
        true
    }

    fn load(&self, index: usize) -> Option<Container> {
        self.get(index).copied()
    }
}

impl<S: TagStore + ?Sized> TagStore for &mut S {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn store(&mut self, index: usize, tag: Container) -> bool {
        (**self).store(index, tag)
    }

    fn load(&self, index: usize) -> Option<Container> {
        (**self).load(index)
    }
}

/// Invalid guard configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LimitError {
    /// The limit must be positive.
    #[error("recursion limit must be at least 1")]
    Zero,
    /// The storage cannot hold `limit` tags.
    #[error("recursion limit {limit} exceeds storage capacity {capacity}")]
    ExceedsCapacity {
        /// Requested limit.
        limit: usize,
        /// What the storage reported.
        capacity: usize,
    },
}

const LIMIT_REACHED: &str = "Recursion limit was reached";
const STORAGE_REFUSED: &str = "Recursion storage refused a container";
const EMPTY_STACK: &str = "Recursion stack is empty";
const CORRUPT_STACK: &str = "Invalid container passed through the recursion stack";

/// A failed push or pop. Always fatal for the session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GuardError {
    /// Depth already equals the limit.
    #[error("{}", LIMIT_REACHED)]
    LimitReached,
    /// The storage refused to record a tag.
    #[error("{}", STORAGE_REFUSED)]
    StorageRefused,
    /// Pop with nothing open.
    #[error("{}", EMPTY_STACK)]
    Empty,
    /// The storage could not produce a tag below the current depth.
    #[error("{}", CORRUPT_STACK)]
    Corrupt,
}

impl GuardError {
    /// The parse error class this failure maps to.
    #[must_use]
    pub fn kind(self) -> ErrorKind {
        match self {
            GuardError::LimitReached => ErrorKind::RecursionError,
            GuardError::StorageRefused | GuardError::Empty | GuardError::Corrupt => {
                ErrorKind::ContainerError
            }
        }
    }

    pub(crate) fn reason(self) -> &'static str {
        match self {
            GuardError::LimitReached => LIMIT_REACHED,
            GuardError::StorageRefused => STORAGE_REFUSED,
            GuardError::Empty => EMPTY_STACK,
            GuardError::Corrupt => CORRUPT_STACK,
        }
    }
}

/// Depth counter and limit over host-owned tag storage.
///
/// Invariant: `0 <= depth <= limit <= store.capacity()`.
#[derive(Debug)]
pub struct RecursionGuard<S> {
    store: S,
    depth: usize,
    limit: usize,
}

impl<S: TagStore> RecursionGuard<S> {
    /// Creates a guard permitting at most `limit` nested containers.
    ///
    /// # Errors
    ///
    /// [`LimitError`] if `limit` is zero or larger than the storage.
    pub fn new(store: S, limit: usize) -> Result<Self, LimitError> {
        if limit == 0 {
            return Err(LimitError::Zero);
        }
        let capacity = store.capacity();
        if limit > capacity {
            return Err(LimitError::ExceedsCapacity { limit, capacity });
        }
        Ok(Self {
            store,
            depth: 0,
            limit,
        })
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Maximum nesting depth.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The innermost open container.
    pub fn current(&self) -> Option<Container> {
        self.depth.checked_sub(1).and_then(|top| self.store.load(top))
    }

    /// Opens a container.
    ///
    /// # Errors
    ///
    /// [`GuardError::LimitReached`] at the limit, or
    /// [`GuardError::StorageRefused`] if the storage rejects the slot.
    pub fn push(&mut self, tag: Container) -> Result<(), GuardError> {
        if self.depth >= self.limit {
            return Err(GuardError::LimitReached);
        }
        if !self.store.store(self.depth, tag) {
            return Err(GuardError::StorageRefused);
        }
        self.depth += 1;
        Ok(())
    }

    /// Closes the innermost container and reports what encloses it.
    ///
    /// # Errors
    ///
    /// [`GuardError::Empty`] with nothing open, or [`GuardError::Corrupt`]
    /// if the enclosing tag cannot be read back.
    pub fn pop(&mut self) -> Result<Unwind, GuardError> {
        self.depth = self.depth.checked_sub(1).ok_or(GuardError::Empty)?;
        if self.depth == 0 {
            return Ok(Unwind::EndRecursion);
        }
        self.store
            .load(self.depth - 1)
            .map(Unwind::from)
            .ok_or(GuardError::Corrupt)
    }

    /// Borrows the storage.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the storage.
    pub fn into_store(self) -> S {
        self.store
    }
}
