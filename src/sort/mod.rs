pub mod budget;
pub mod loser_tree;
pub mod merge;
pub mod run;
pub mod run_generation;
pub mod sorter;

pub use self::budget::{ELEMENT_SIZE, MemoryBudget};
pub use self::merge::{KWayMerger, MergeStrategy, RunCursor};
pub use self::run::RunSet;
pub use self::run_generation::produce_runs;
pub use self::sorter::TapeSorter;
