// Tape-model External Sort Library
//
// Sorts integer tapes that do not fit in memory: the input is split into
// sorted runs kept in a block store, then the runs are merged k ways into a
// single ascending tape. Every element access pays a configurable simulated
// latency.

/// The unit being sorted.
pub type Element = i32;

pub mod block_store;
pub mod error;
pub mod fixtures;
pub mod latency;
pub mod sort;
pub mod stats;
pub mod tape;
pub mod verification;

// Export the main types
pub use block_store::{BlockStore, DirBlockStore, MemBlockStore, RunId};
pub use error::{Result, TapeSortError};
pub use latency::{Access, LatencyConfig, LatencyModel};
pub use sort::{ELEMENT_SIZE, KWayMerger, MemoryBudget, MergeStrategy, RunCursor, TapeSorter};
pub use stats::{MergeStats, RunGenerationStats, RunInfo, SortStats, TapeStats, TapeStatsTracker};
pub use tape::{TapeReader, TapeWriter};
pub use verification::{SortedOutputVerifier, VerificationSummary};
