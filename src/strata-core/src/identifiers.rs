//! Identifier types for tree and graph entities.
//!
//! Ids come from a per-container counter that only ever increases, so an id
//! is never handed out twice by the same container, even after deletion.

use common_error::{StrataResult, ensure};

/// Tree or graph node identifier.
pub type NodeId = u64;

/// Graph edge identifier.
pub type EdgeId = u64;

/// Monotonic id allocator.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    /// Hand out the next id.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to `allocate` returns.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Fail with `InvalidContent` if `id` could not have come from this counter.
    pub(crate) fn check_allocated(&self, id: Option<&u64>, what: &str) -> StrataResult<()> {
        if let Some(&id) = id {
            ensure!(
                id < self.next,
                InvalidContent: "{what} id {id} is not below the next id {}",
                self.next
            );
        }
        Ok(())
    }
}
