//! Two-phase lazy state shared by all descriptors.
//!
//! A descriptor is created in the `NameAssigned` phase: its names, ignore
//! flag and relationship annotations are final and may be read by anyone.
//! Everything that needs other descriptors (paths, keys, join columns,
//! partners, metadata documents) sits in a [`Resolution`] cell and is
//! computed on first demand. Exactly one outcome, success or error, is
//! stored; later calls return that same reference and never recompute.
//! Threads that race on an empty cell may each run the build, and all of
//! them then observe the first stored outcome. Building outside the cell's
//! lock keeps two threads resolving opposite ends of a cyclic model from
//! waiting on each other.
//!
//! Re-entering a cell from the thread that is currently filling it means the
//! metadata graph demands itself; that is reported as
//! [`ModelError::CyclicResolution`] instead of recursing.

use crate::core::{ModelError, Result};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NameAssigned,
    Resolving,
    FullyResolved,
}

pub(crate) struct Resolution<T> {
    resolving: Mutex<Vec<ThreadId>>,
    value: OnceLock<Result<T>>,
}

impl<T> Resolution<T> {
    pub fn new() -> Self {
        Self {
            resolving: Mutex::new(Vec::new()),
            value: OnceLock::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.value.get().is_some() {
            Phase::FullyResolved
        } else if self.lock().is_empty() {
            Phase::NameAssigned
        } else {
            Phase::Resolving
        }
    }

    /// Returns the resolved value, running `build` if nobody has yet.
    pub fn ensure<L, F>(&self, label: L, build: F) -> Result<&T>
    where
        L: FnOnce() -> String,
        F: FnOnce() -> Result<T>,
    {
        if let Some(done) = self.value.get() {
            return done.as_ref().map_err(Clone::clone);
        }

        let me = thread::current().id();
        {
            let mut resolving = self.lock();
            if resolving.contains(&me) {
                return Err(ModelError::CyclicResolution(label()));
            }
            resolving.push(me);
        }
        let _guard = ResolvingGuard { cell: self, thread: me };

        // A racing thread may store first; its outcome wins and ours is dropped.
        let stored = match self.value.get() {
            Some(done) => done,
            None => {
                let outcome = build();
                self.value.get_or_init(|| outcome)
            }
        };
        stored.as_ref().map_err(Clone::clone)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ThreadId>> {
        self.resolving.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Resolution<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct ResolvingGuard<'a, T> {
    cell: &'a Resolution<T>,
    thread: ThreadId,
}

impl<T> Drop for ResolvingGuard<'_, T> {
    fn drop(&mut self) {
        let mut resolving = self.cell.lock();
        if let Some(pos) = resolving.iter().position(|t| *t == self.thread) {
            resolving.swap_remove(pos);
        }
    }
}
