//! Search algorithm selection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// Strategy used to walk the index when resolving an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchAlgorithm {
    /// Load the whole index into memory, then search the buffer
    Memory,
    /// Binary search straight against the file, one read per probe
    Binary,
    /// Bracket with the in-memory header table, then search one window
    #[default]
    BTree,
}

impl SearchAlgorithm {
    /// All algorithms, in declaration order.
    pub const ALL: [SearchAlgorithm; 3] = [
        SearchAlgorithm::Memory,
        SearchAlgorithm::Binary,
        SearchAlgorithm::BTree,
    ];

    /// Parse an algorithm name (case-insensitive).
    ///
    /// Returns `BTree` for unknown values.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" => SearchAlgorithm::Memory,
            "binary" => SearchAlgorithm::Binary,
            _ => SearchAlgorithm::BTree,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchAlgorithm::Memory => "memory",
            SearchAlgorithm::Binary => "binary",
            SearchAlgorithm::BTree => "btree",
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SearchAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(SearchAlgorithm::Memory),
            "binary" => Ok(SearchAlgorithm::Binary),
            "btree" | "b-tree" => Ok(SearchAlgorithm::BTree),
            _ => Err(Error::InvalidAlgorithm(s.to_string())),
        }
    }
}
