//! Error types for tape sort operations.

use std::io;

use thiserror::Error;

use crate::Element;

/// Result type alias for tape sort operations
pub type Result<T> = std::result::Result<T, TapeSortError>;

/// Error type for tape sort operations
#[derive(Error, Debug)]
pub enum TapeSortError {
    /// The memory ceiling cannot hold one element, or cannot hold one cursor per run
    #[error(
        "Available memory is not enough to implement external sort: \
         {max_memory_size} bytes for {number_of_elements} elements"
    )]
    MemoryInsufficient {
        /// The memory ceiling in bytes
        max_memory_size: u64,
        /// The declared number of elements
        number_of_elements: u64,
    },

    /// A tape ended before the declared or expected element count was read
    #[error("Unexpected end of input: {0}")]
    UnexpectedEndOfInput(String),

    /// A stream or block store entry could not be opened, read or written
    #[error("Unable to access {resource}: {source}")]
    ResourceUnavailable {
        /// Human-readable name of the resource
        resource: String,
        /// The underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A token on a tape is not a valid number
    #[error("Malformed element {token:?} at position {position} of {resource}")]
    MalformedElement {
        /// The offending token
        token: String,
        /// Zero-based token position on the tape
        position: u64,
        /// Name of the tape
        resource: String,
    },

    /// The latency configuration could not be parsed
    #[error("Invalid latency config '{path}': {reason}")]
    InvalidConfig {
        /// Where the config came from
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A verified output is not in ascending order
    #[error("Sort order violation at element {position}: {previous} followed by {current}")]
    SortOrderViolation {
        /// Zero-based position of the out-of-order element
        position: u64,
        /// The element before it
        previous: Element,
        /// The out-of-order element
        current: Element,
    },

    /// A verified output holds the wrong number of elements
    #[error("Expected {expected} elements in output, found {actual}")]
    CountMismatch {
        /// Number of elements declared by the input
        expected: u64,
        /// Number of elements found
        actual: u64,
    },
}

impl TapeSortError {
    /// Builds a `map_err` adapter that tags an I/O error with a resource name.
    pub fn resource(resource: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let resource = resource.into();
        move |source| Self::ResourceUnavailable { resource, source }
    }
}
