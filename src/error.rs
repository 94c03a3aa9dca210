use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};
use thiserror::Error;

/// Raised when the traversal re-enters a node that is still on the active path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cyclic dependency detected, {node:?} already visited (cycle: {cycle})")]
pub struct CycleError<T> {
    node: T,
    cycle: CyclePath<T>,
}

/// Closed path of a cycle: it starts and ends with the re-entered node, e.g. `[a, b, a]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath<T>(Vec<T>);

impl<T: Debug> Display for CyclePath<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().map(|n| format!("{n:?}")).join(" -> "))
    }
}

impl<T> CycleError<T> {
    pub(crate) fn new(node: T, cycle: Vec<T>) -> Self {
        Self {
            node,
            cycle: CyclePath(cycle),
        }
    }

    /// The node whose in-progress mark was encountered again.
    pub fn node(&self) -> &T {
        &self.node
    }

    pub fn cycle(&self) -> &[T] {
        &self.cycle.0
    }

    pub fn into_node(self) -> T {
        self.node
    }
}
