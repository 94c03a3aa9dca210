//! Depth-first topological sorting with cycle detection.
//!
//! An edge `u -> v` means "u depends on v": `v` is always emitted before `u`.
//!
//! ```
//! use topsort::{graph_of, sort};
//!
//! let graph = graph_of([("a", vec!["b"]), ("c", vec!["a", "b"])]);
//! assert_eq!(sort(&graph).unwrap(), vec!["b", "a", "c"]);
//!
//! let cyclic = graph_of([("x", vec!["x"])]);
//! assert_eq!(*sort(&cyclic).unwrap_err().node(), "x");
//! ```

pub mod error;
pub mod graph;
#[cfg(feature = "serde")]
mod serialize;
pub mod sort;

pub use error::CycleError;
pub use graph::{graph_of, Graph, GraphBuilder};
pub use sort::{sort, sort_by_edges, topological_sort, topological_sort_iterative, Sorter, Traversal};
