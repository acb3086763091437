use log::warn;

use crate::block_store::{BlockStore, RunId};
use crate::error::Result;

/// The runs one sort invocation has created in a [`BlockStore`].
///
/// Every run registered here is released when the set is dropped, whether
/// the sort finished or bailed out halfway through writing or merging.
pub struct RunSet<'s, S: BlockStore> {
    store: &'s mut S,
    runs: Vec<RunId>,
}

impl<'s, S: BlockStore> RunSet<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            runs: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    pub fn ids(&self) -> &[RunId] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Creates `run` in the store and takes ownership of its storage.
    pub fn create(&mut self, run: RunId) -> Result<S::Sink> {
        let sink = self.store.create(run)?;
        self.runs.push(run);
        Ok(sink)
    }

    pub fn close(&mut self, run: RunId, sink: S::Sink) -> Result<()> {
        self.store.close(run, sink)
    }

    /// Releases every run, stopping at the first failure. Runs not yet
    /// released stay registered and are retried on drop.
    pub fn release_all(&mut self) -> Result<()> {
        while let Some(&run) = self.runs.last() {
            self.store.release(run)?;
            self.runs.pop();
        }
        Ok(())
    }
}

impl<S: BlockStore> Drop for RunSet<'_, S> {
    fn drop(&mut self) {
        for run in self.runs.drain(..) {
            if let Err(e) = self.store.release(run) {
                warn!("Failed to release sorted run {run}: {e}");
            }
        }
    }
}
