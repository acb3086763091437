//! Input tape generation for tests and benchmarks.

use std::io::{self, Write};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::Element;

/// A random permutation of `0..n`.
pub fn shuffled_sequence<R: Rng + ?Sized>(n: Element, rng: &mut R) -> Vec<Element> {
    let mut values: Vec<Element> = (0..n).collect();
    values.shuffle(rng);
    values
}

/// `n` values drawn uniformly from `range`, duplicates allowed.
pub fn random_elements<R: Rng + ?Sized>(
    n: usize,
    range: std::ops::RangeInclusive<Element>,
    rng: &mut R,
) -> Vec<Element> {
    (0..n).map(|_| rng.random_range(range.clone())).collect()
}

/// Writes an input tape: the element count on its own line, then the
/// elements separated by single spaces.
pub fn write_input_tape<W: Write>(mut out: W, values: &[Element]) -> io::Result<()> {
    writeln!(out, "{}", values.len())?;
    for (i, value) in values.iter().enumerate() {
        if i != 0 {
            out.write_all(b" ")?;
        }
        write!(out, "{value}")?;
    }
    out.flush()
}
