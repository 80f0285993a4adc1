//! Id numbers for model entities
//!
//! Entities carry an `id_num` that other entities (and PHPP rows) refer to.
//! Project files may leave it at `0`; [`IdAllocator`] hands out the missing
//! numbers so nothing depends on process-wide counters.

/// Hands out increasing id numbers, starting at 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after the largest id already in use
    pub fn after(used: impl IntoIterator<Item = u32>) -> Self {
        let max = used.into_iter().max().unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Assign an id to `slot` if it is still unset (`0`)
    pub fn fill(&mut self, slot: &mut u32) {
        if *slot == 0 {
            *slot = self.next_id();
        }
    }
}
