use std::io::BufRead;

use log::debug;

use crate::error::{Result, TapeSortError};
use crate::latency::LatencyModel;
use crate::tape::TapeReader;
use crate::Element;

/// What a verified output tape held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerificationSummary {
    pub count: u64,
    pub min: Option<Element>,
    pub max: Option<Element>,
}

/// Checks that an output tape is non-decreasing and, optionally, that it
/// holds the expected number of elements.
///
/// Reads without simulated latency; verification is not part of the sort.
#[derive(Clone, Copy, Debug, Default)]
pub struct SortedOutputVerifier {
    pub expected_elements: Option<u64>,
}

impl SortedOutputVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expecting(expected_elements: u64) -> Self {
        Self {
            expected_elements: Some(expected_elements),
        }
    }

    pub fn verify<R: BufRead>(&self, output: R) -> Result<VerificationSummary> {
        let latency = LatencyModel::default();
        let mut reader = TapeReader::new(output, &latency, "output tape");

        let mut summary = VerificationSummary {
            count: 0,
            min: None,
            max: None,
        };
        let mut previous: Option<Element> = None;
        while let Some(current) = reader.read_one()? {
            if let Some(previous) = previous {
                if current < previous {
                    return Err(TapeSortError::SortOrderViolation {
                        position: summary.count,
                        previous,
                        current,
                    });
                }
            }
            if summary.min.is_none() {
                summary.min = Some(current);
            }
            summary.max = Some(current);
            previous = Some(current);
            summary.count += 1;
        }

        if let Some(expected) = self.expected_elements {
            if expected != summary.count {
                return Err(TapeSortError::CountMismatch {
                    expected,
                    actual: summary.count,
                });
            }
        }
        debug!("Verified {} elements in ascending order", summary.count);
        Ok(summary)
    }
}
