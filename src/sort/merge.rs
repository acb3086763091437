use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

use log::info;

use crate::block_store::{BlockStore, RunId};
use crate::error::{Result, TapeSortError};
use crate::latency::LatencyModel;
use crate::sort::loser_tree::LoserTree;
use crate::sort::run::RunSet;
use crate::stats::MergeStats;
use crate::tape::{TapeReader, TapeWriter};
use crate::Element;

/// How the merger picks the next smallest head among the open runs.
///
/// Both strategies break ties in favor of the lowest run index and so produce
/// identical output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Scan every cursor per output element.
    #[default]
    LinearScan,
    /// Keep a tree of losers; O(log k) per output element.
    LoserTree,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinearScan => write!(f, "linear-scan"),
            Self::LoserTree => write!(f, "loser-tree"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "linear-scan" | "linear_scan" | "linear" | "scan" => Ok(Self::LinearScan),
            "loser-tree" | "loser_tree" | "losertree" | "tree" => Ok(Self::LoserTree),
            _ => Err(format!(
                "Unknown merge strategy '{}'. Expected one of: linear-scan, loser-tree",
                s
            )),
        }
    }
}

/// Read position within one run during the merge.
pub struct RunCursor<'a, R> {
    run: RunId,
    reader: TapeReader<'a, R>,
    current: Element,
    finished: bool,
}

impl<'a, R: BufRead> RunCursor<'a, R> {
    /// Rewinds to the start of the run and caches its first element.
    pub fn open(run: RunId, source: R, latency: &'a LatencyModel) -> Result<Self> {
        latency.apply_rewind_delay();
        let mut reader = TapeReader::new(source, latency, format!("sorted run {run}"));
        let Some(current) = reader.read_one()? else {
            return Err(TapeSortError::UnexpectedEndOfInput(format!(
                "Unable to read number from sorted run {run}"
            )));
        };
        Ok(Self {
            run,
            reader,
            current,
            finished: false,
        })
    }

    pub fn run(&self) -> RunId {
        self.run
    }

    /// The cached head, or `None` once the run is exhausted.
    pub fn peek(&self) -> Option<Element> {
        (!self.finished).then_some(self.current)
    }

    fn advance(&mut self) -> Result<()> {
        match self.reader.read_one()? {
            Some(value) => self.current = value,
            None => self.finished = true,
        }
        Ok(())
    }
}

enum Selector {
    Linear,
    Tree(LoserTree),
}

/// Merges all runs of a [`RunSet`] into one ascending sequence.
///
/// Yields `(run, element)` pairs; equal elements come out in run index order.
pub struct KWayMerger<'a, R> {
    cursors: Vec<RunCursor<'a, R>>,
    selector: Selector,
    strategy: MergeStrategy,
}

impl<'a, R: BufRead> KWayMerger<'a, R> {
    /// Opens every run in `runs`. If any run fails to open, the cursors
    /// already opened are dropped before the error is returned.
    pub fn open<S>(
        runs: &RunSet<'_, S>,
        latency: &'a LatencyModel,
        strategy: MergeStrategy,
    ) -> Result<Self>
    where
        S: BlockStore<Source = R>,
    {
        let mut cursors = Vec::with_capacity(runs.len());
        for &run in runs.ids() {
            let source = runs.store().open(run)?;
            cursors.push(RunCursor::open(run, source, latency)?);
        }
        Ok(Self::from_cursors(cursors, strategy))
    }

    pub fn from_cursors(cursors: Vec<RunCursor<'a, R>>, strategy: MergeStrategy) -> Self {
        let selector = match strategy {
            MergeStrategy::LinearScan => Selector::Linear,
            MergeStrategy::LoserTree => {
                Selector::Tree(LoserTree::new(cursors.iter().map(|c| c.peek()).collect()))
            }
        };
        Self {
            cursors,
            selector,
            strategy,
        }
    }

    pub fn fan_in(&self) -> usize {
        self.cursors.len()
    }

    fn select(&self) -> Option<usize> {
        match &self.selector {
            Selector::Linear => {
                let mut best: Option<(Element, usize)> = None;
                for (i, cursor) in self.cursors.iter().enumerate() {
                    let Some(value) = cursor.peek() else {
                        continue;
                    };
                    // Strict comparison keeps the earliest run on ties.
                    if best.is_none_or(|(min, _)| value < min) {
                        best = Some((value, i));
                    }
                }
                best.map(|(_, i)| i)
            }
            Selector::Tree(tree) => tree.peek().map(|(_, i)| i),
        }
    }

    /// Emits exactly `number_of_elements` elements to `output`.
    pub fn merge_into<W: Write>(
        mut self,
        number_of_elements: u64,
        output: &mut TapeWriter<'_, W>,
    ) -> Result<MergeStats> {
        let merge_start = Instant::now();
        for emitted in 0..number_of_elements {
            let Some((_, value)) = self.next().transpose()? else {
                return Err(TapeSortError::UnexpectedEndOfInput(format!(
                    "Sorted runs exhausted after {emitted} of {number_of_elements} elements"
                )));
            };
            output.write_one(value)?;
        }

        let stats = MergeStats {
            fan_in: self.fan_in(),
            strategy: self.strategy,
            elements: number_of_elements,
            time_ms: merge_start.elapsed().as_millis(),
        };
        info!(
            "Merged {} runs ({}) into {} elements in {} ms",
            stats.fan_in, stats.strategy, stats.elements, stats.time_ms
        );
        Ok(stats)
    }
}

impl<R: BufRead> Iterator for KWayMerger<'_, R> {
    type Item = Result<(RunId, Element)>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.select()?;
        let cursor = &mut self.cursors[index];
        let run = cursor.run();
        let value = cursor.current;
        if let Err(e) = cursor.advance() {
            return Some(Err(e));
        }
        if let Selector::Tree(tree) = &mut self.selector {
            tree.replace_winner(cursor.peek());
        }
        Some(Ok((run, value)))
    }
}
