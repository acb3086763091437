#![allow(dead_code)]

use std::cell::Cell;
use std::io::{self, BufRead, Cursor, Read};
use std::rc::Rc;

use tape_sort::{
    Element, MemBlockStore, MergeStrategy, Result, RunId, SortStats, TapeSortError,
    TapeSorter,
};

pub mod faulty_store;

pub use faulty_store::FaultyStore;

pub fn input_tape(values: &[Element]) -> String {
    let mut out = Vec::new();
    tape_sort::fixtures::write_input_tape(&mut out, values).unwrap();
    String::from_utf8(out).unwrap()
}

pub fn parse_tape(text: &str) -> Vec<Element> {
    text.split_whitespace()
        .map(|t| t.parse().expect("output token is an integer"))
        .collect()
}

pub fn sort_text(
    memory: u64,
    input: &str,
    strategy: MergeStrategy,
) -> Result<(Vec<Element>, SortStats)> {
    let mut store = MemBlockStore::new();
    let mut output = Vec::new();
    let stats = TapeSorter::default().with_strategy(strategy).sort(
        memory,
        input.as_bytes(),
        &mut output,
        &mut store,
    )?;
    assert!(store.is_empty(), "all runs should be released");
    Ok((parse_tape(&String::from_utf8(output).unwrap()), stats))
}

pub fn sort_values(memory: u64, values: &[Element]) -> Result<Vec<Element>> {
    sort_text(memory, &input_tape(values), MergeStrategy::LinearScan).map(|(v, _)| v)
}

pub fn sorted_copy(values: &[Element]) -> Vec<Element> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted
}

/// A source that counts how many run streams are open at once.
pub struct TrackedSource {
    inner: Cursor<Vec<u8>>,
    live: Rc<Cell<usize>>,
}

impl TrackedSource {
    pub fn new(inner: Cursor<Vec<u8>>, live: Rc<Cell<usize>>) -> Self {
        live.set(live.get() + 1);
        Self { inner, live }
    }
}

impl Drop for TrackedSource {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

impl Read for TrackedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for TrackedSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

pub fn not_found(run: RunId) -> TapeSortError {
    TapeSortError::resource(format!("sorted run {run}"))(io::Error::from(io::ErrorKind::NotFound))
}
