//! Contiguous cell storage backing a [`Grid`](crate::grid::Grid).
//!
//! The grid only ever needs a resizable byte slice, so the allocation
//! strategy is a type parameter: heap (`Vec<u8>`), inline fixed capacity
//! ([`InlineStorage`]) or a buffer lent by the caller ([`SliceStorage`]).

use crate::error::GridError;
use crate::validate::{MAX_COLS, MAX_ROWS};

/// Cells needed by the largest allowed grid (50 × 168).
pub const MAX_CELLS: usize = MAX_ROWS as usize * MAX_COLS as usize;

/// Inline storage sized for any valid grid.
pub type BoundedStorage = InlineStorage<MAX_CELLS>;

/// Resizable contiguous byte storage.
///
/// # Example
/// ```
/// use gg_core::storage::{CellStorage, InlineStorage};
///
/// let mut s = InlineStorage::<4>::default();
/// s.resize(3, b'.').unwrap();
/// assert_eq!(s.cells(), b"...");
/// assert!(s.resize(5, b'.').is_err());
/// ```
pub trait CellStorage {
    /// Live cells.
    fn cells(&self) -> &[u8];

    /// Live cells, mutable.
    fn cells_mut(&mut self) -> &mut [u8];

    /// Upper bound on the number of cells, `None` when unbounded.
    fn capacity(&self) -> Option<usize>;

    /// Grow (new cells set to `value`) or truncate to `len` cells.
    ///
    /// # Errors
    /// `StorageExhausted` if `len` exceeds [`capacity`](Self::capacity).
    /// The storage is left untouched in that case.
    fn resize(&mut self, len: usize, value: u8) -> Result<(), GridError>;

    /// Number of live cells.
    fn len(&self) -> usize {
        self.cells().len()
    }

    /// True when no cell is live.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that `required` cells would fit, without touching the storage.
    ///
    /// # Errors
    /// `StorageExhausted` if they would not.
    fn reserve_check(&self, required: usize) -> Result<(), GridError> {
        match self.capacity() {
            Some(capacity) if required > capacity => {
                Err(GridError::StorageExhausted { required, capacity })
            }
            _ => Ok(()),
        }
    }
}

impl CellStorage for Vec<u8> {
    fn cells(&self) -> &[u8] {
        self
    }

    fn cells_mut(&mut self) -> &mut [u8] {
        self
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn resize(&mut self, len: usize, value: u8) -> Result<(), GridError> {
        Vec::resize(self, len, value);
        Ok(())
    }
}

/// Fixed-capacity storage held inline, no heap allocation.
#[derive(Clone, Debug)]
pub struct InlineStorage<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for InlineStorage<N> {
    fn default() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }
}

impl<const N: usize> CellStorage for InlineStorage<N> {
    fn cells(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }

    fn capacity(&self) -> Option<usize> {
        Some(N)
    }

    fn resize(&mut self, len: usize, value: u8) -> Result<(), GridError> {
        self.reserve_check(len)?;
        if len > self.len {
            self.buf[self.len..len].fill(value);
        }
        self.len = len;
        Ok(())
    }
}

/// Storage carved out of a buffer owned by the caller (stack array, arena block).
///
/// # Example
/// ```
/// use gg_core::grid::Grid;
/// use gg_core::storage::SliceStorage;
///
/// let mut backing = [0u8; 64];
/// let grid = Grid::with_storage(2, 4, b'.', SliceStorage::new(&mut backing)).unwrap();
/// assert_eq!(grid.cells(), b"...\n...\n");
/// ```
#[derive(Debug)]
pub struct SliceStorage<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> SliceStorage<'a> {
    /// Wrap `buf`; its current content is ignored.
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }
}

impl CellStorage for SliceStorage<'_> {
    fn cells(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.buf.len())
    }

    fn resize(&mut self, len: usize, value: u8) -> Result<(), GridError> {
        self.reserve_check(len)?;
        if len > self.len {
            self.buf[self.len..len].fill(value);
        }
        self.len = len;
        Ok(())
    }
}
