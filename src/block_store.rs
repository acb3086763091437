//! Named sequential storage for sorted runs.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Result, TapeSortError};

/// Identifier of a run, assigned in creation order `0..run_count`.
pub type RunId = usize;

/// Storage for runs, keyed by [`RunId`].
///
/// A run is written once through the sink returned by [`create`](Self::create)
/// and sealed with [`close`](Self::close); afterwards it may be opened for
/// sequential reading any number of times until it is released.
pub trait BlockStore {
    type Sink: Write;
    type Source: io::BufRead;

    fn create(&mut self, run: RunId) -> Result<Self::Sink>;
    fn close(&mut self, run: RunId, sink: Self::Sink) -> Result<()>;
    fn open(&self, run: RunId) -> Result<Self::Source>;
    /// Releases the storage of a run. Releasing an unknown run is not an error.
    fn release(&mut self, run: RunId) -> Result<()>;
}

fn run_resource(run: RunId) -> String {
    format!("sorted run {run}")
}

/// Runs stored as files in a private temporary directory.
///
/// Every store gets its own directory, so concurrent sort invocations never
/// see each other's runs. The directory and anything left in it are removed
/// when the store is dropped.
pub struct DirBlockStore {
    dir: TempDir,
}

impl DirBlockStore {
    /// Creates a store under the system temporary directory.
    pub fn new() -> Result<Self> {
        Self::new_in(std::env::temp_dir())
    }

    /// Creates a store under `base`.
    pub fn new_in(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let dir = tempfile::Builder::new()
            .prefix("tape-sort-")
            .tempdir_in(base)
            .map_err(TapeSortError::resource(format!(
                "temporary directory in {}",
                base.display()
            )))?;
        log::debug!("Block store namespace: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn run_path(&self, run: RunId) -> PathBuf {
        self.dir.path().join(format!("sorted_run_{run}"))
    }
}

impl BlockStore for DirBlockStore {
    type Sink = BufWriter<File>;
    type Source = BufReader<File>;

    fn create(&mut self, run: RunId) -> Result<Self::Sink> {
        let file = File::create_new(self.run_path(run))
            .map_err(TapeSortError::resource(run_resource(run)))?;
        Ok(BufWriter::new(file))
    }

    fn close(&mut self, run: RunId, sink: Self::Sink) -> Result<()> {
        sink.into_inner()
            .map_err(|e| TapeSortError::resource(run_resource(run))(e.into_error()))?;
        Ok(())
    }

    fn open(&self, run: RunId) -> Result<Self::Source> {
        let file =
            File::open(self.run_path(run)).map_err(TapeSortError::resource(run_resource(run)))?;
        Ok(BufReader::new(file))
    }

    fn release(&mut self, run: RunId) -> Result<()> {
        match fs::remove_file(self.run_path(run)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TapeSortError::resource(run_resource(run))(e)),
        }
    }
}

/// Runs held in memory.
#[derive(Debug, Default)]
pub struct MemBlockStore {
    runs: HashMap<RunId, Vec<u8>>,
}

impl MemBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sealed runs currently held.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn contains(&self, run: RunId) -> bool {
        self.runs.contains_key(&run)
    }
}

impl BlockStore for MemBlockStore {
    type Sink = Vec<u8>;
    type Source = Cursor<Vec<u8>>;

    fn create(&mut self, run: RunId) -> Result<Self::Sink> {
        if self.runs.contains_key(&run) {
            return Err(TapeSortError::resource(run_resource(run))(io::Error::from(
                io::ErrorKind::AlreadyExists,
            )));
        }
        Ok(Vec::new())
    }

    fn close(&mut self, run: RunId, sink: Self::Sink) -> Result<()> {
        self.runs.insert(run, sink);
        Ok(())
    }

    fn open(&self, run: RunId) -> Result<Self::Source> {
        self.runs
            .get(&run)
            .map(|bytes| Cursor::new(bytes.clone()))
            .ok_or_else(|| {
                TapeSortError::resource(run_resource(run))(io::Error::from(
                    io::ErrorKind::NotFound,
                ))
            })
    }

    fn release(&mut self, run: RunId) -> Result<()> {
        self.runs.remove(&run);
        Ok(())
    }
}
