//! Resumable pagination position.

/// Minimal position state carried between page-fetch calls.
///
/// `row_offset` is only meaningful while `resource_index` points at a
/// resource whose row-key enumeration is partially consumed; moving to a
/// new resource resets it. Owned exclusively by the page assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    /// Position in the resource sequence.
    pub resource_index: usize,
    /// Position within the current resource's row-key enumeration.
    pub row_offset: usize,
}

impl PageCursor {
    /// Creates a cursor positioned at the first resource.
    #[must_use]
    pub fn start() -> Self {
        Self::default()
    }

    /// Moves to the next resource, resetting the row offset.
    pub fn advance_resource(&mut self) {
        self.resource_index += 1;
        self.row_offset = 0;
    }

    /// Moves the row offset within the current resource.
    pub fn advance_row(&mut self, next_offset: usize) {
        self.row_offset = next_offset;
    }
}
