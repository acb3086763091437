use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

use tape_sort::{BlockStore, MemBlockStore, Result, RunId};

use super::{TrackedSource, not_found};

/// In-memory store that can be told to fail opening or creating one run,
/// or to hand back one run truncated to nothing.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemBlockStore,
    pub fail_open: Option<RunId>,
    pub fail_create: Option<RunId>,
    pub empty_run: Option<RunId>,
    pub live_sources: Rc<Cell<usize>>,
    pub released: Vec<RunId>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockStore for FaultyStore {
    type Sink = Vec<u8>;
    type Source = TrackedSource;

    fn create(&mut self, run: RunId) -> Result<Self::Sink> {
        if self.fail_create == Some(run) {
            return Err(not_found(run));
        }
        self.inner.create(run)
    }

    fn close(&mut self, run: RunId, sink: Self::Sink) -> Result<()> {
        self.inner.close(run, sink)
    }

    fn open(&self, run: RunId) -> Result<Self::Source> {
        if self.fail_open == Some(run) {
            return Err(not_found(run));
        }
        let source = if self.empty_run == Some(run) {
            Cursor::new(Vec::new())
        } else {
            self.inner.open(run)?
        };
        Ok(TrackedSource::new(source, Rc::clone(&self.live_sources)))
    }

    fn release(&mut self, run: RunId) -> Result<()> {
        self.released.push(run);
        self.inner.release(run)
    }
}
