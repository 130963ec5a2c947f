use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::io::{self, Write};

use crate::error::GridError;
use crate::glyph::{Glyph, ROW_TERMINATOR, classify};
use crate::storage::CellStorage;
use crate::validate::{CoordinatePair, check_cols, check_fill, check_rows};

/// Row count of a default grid.
pub const DEFAULT_ROWS: u32 = 20;
/// Column count of a default grid, terminator included.
pub const DEFAULT_COLS: u32 = 20;
/// Fill byte of a default grid.
pub const DEFAULT_FILL: u8 = b' ';

/// Grille de caractères à taille fixe sur laquelle on trace les segments.
///
/// Les cellules sont stockées ligne par ligne ; la dernière cellule de chaque
/// ligne contient le terminateur `'\n'`, si bien que le buffer brut s'affiche
/// tel quel. Une grille de `rows × cols` contient donc `cols - 1` colonnes
/// de contenu.
///
/// `S` choisit la stratégie d'allocation (voir [`crate::storage`]).
///
/// # Example
/// ```
/// use gg_core::grid::Grid;
/// use gg_core::validate::CoordinatePair;
///
/// let mut grid = Grid::new(2, 4, b'.');
/// grid.plot(CoordinatePair::new(0, 0, 1, 1));
/// assert_eq!(grid.cells(), b"\\..\n.\\.\n");
/// ```
#[derive(Clone, Debug)]
pub struct Grid<S = Vec<u8>> {
    rows: u32,
    cols: u32,
    fill: u8,
    cells: S,
}

impl Grid<Vec<u8>> {
    /// Heap-backed grid. Dimensions and fill are trusted: validate them
    /// first (see [`Grid::try_new`]).
    #[must_use]
    pub fn new(rows: u32, cols: u32, fill: u8) -> Self {
        debug_assert!(cols >= 1, "a grid row needs room for its terminator");
        let mut cells = vec![fill; rows as usize * cols as usize];
        stamp_terminators(&mut cells, cols as usize);
        Self {
            rows,
            cols,
            fill,
            cells,
        }
    }

    /// Heap-backed grid, with the same checks as the setters.
    ///
    /// # Errors
    /// `InvalidDimension` or `InvalidFillCharacter`.
    ///
    /// # Example
    /// ```
    /// use gg_core::grid::Grid;
    /// assert!(Grid::try_new(50, 168, b' ').is_ok());
    /// assert!(Grid::try_new(51, 168, b' ').is_err());
    /// ```
    pub fn try_new(rows: u32, cols: u32, fill: u8) -> Result<Self, GridError> {
        check_rows(rows)?;
        check_cols(cols)?;
        check_fill(fill)?;
        Ok(Self::new(rows, cols, fill))
    }
}

impl Default for Grid<Vec<u8>> {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS, DEFAULT_FILL)
    }
}

impl<S> Grid<S> {
    #[inline(always)]
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline(always)]
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline(always)]
    #[must_use]
    pub fn fill(&self) -> u8 {
        self.fill
    }

    fn area(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }

    /// Same rows, cols and fill. Cell contents are not compared.
    #[must_use]
    pub fn equals<T>(&self, other: &Grid<T>) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.fill == other.fill
    }

    /// Ordre partiel grossier : surface (`rows * cols`), puis `rows`.
    ///
    /// À surface et `rows` égales, les grilles sont équivalentes si leur
    /// remplissage est identique, sinon incomparables (`None`).
    ///
    /// # Example
    /// ```
    /// use std::cmp::Ordering;
    /// use gg_core::grid::Grid;
    ///
    /// let small = Grid::new(2, 10, b' ');
    /// let tall = Grid::new(4, 5, b' ');
    /// assert_eq!(small.compare_area(&tall), Some(Ordering::Less));
    /// assert_eq!(small.compare_area(&Grid::new(2, 10, b'.')), None);
    /// ```
    #[must_use]
    pub fn compare_area<T>(&self, other: &Grid<T>) -> Option<Ordering> {
        match self
            .area()
            .cmp(&other.area())
            .then(self.rows.cmp(&other.rows))
        {
            Ordering::Equal => (self.fill == other.fill).then_some(Ordering::Equal),
            ord => Some(ord),
        }
    }
}

impl<S: CellStorage> Grid<S> {
    /// Build a grid over caller-chosen storage. Existing storage content is
    /// discarded. Dimensions and fill are trusted, as in [`Grid::new`].
    ///
    /// # Errors
    /// `StorageExhausted` if the storage cannot hold `rows * cols` cells.
    pub fn with_storage(rows: u32, cols: u32, fill: u8, mut storage: S) -> Result<Self, GridError> {
        let len = rows as usize * cols as usize;
        storage.reserve_check(len)?;
        storage.resize(0, fill)?;
        storage.resize(len, fill)?;
        stamp_terminators(storage.cells_mut(), cols as usize);
        Ok(Self {
            rows,
            cols,
            fill,
            cells: storage,
        })
    }

    /// Raw buffer, terminators included.
    #[inline(always)]
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        self.cells.cells()
    }

    /// True for a grid whose storage was moved out with [`Grid::take`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at column `x`, row `y`.
    ///
    /// # Panics
    /// If `y * cols + x` falls outside the buffer.
    #[inline(always)]
    #[must_use]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.cells.cells()[y * self.cols as usize + x]
    }

    /// Mutable cell at column `x`, row `y`.
    ///
    /// # Panics
    /// If `y * cols + x` falls outside the buffer.
    #[inline(always)]
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut u8 {
        let cols = self.cols as usize;
        &mut self.cells.cells_mut()[y * cols + x]
    }

    /// Resize to `rows` rows. New rows are filled; dropped rows are cut
    /// from the end.
    ///
    /// # Errors
    /// `InvalidDimension` outside `1..=50`, `StorageExhausted` if a bounded
    /// storage is too small. The grid is unchanged on error.
    pub fn set_rows(&mut self, rows: u32) -> Result<(), GridError> {
        check_rows(rows)?;
        if rows == self.rows {
            return Ok(());
        }

        let cols = self.cols as usize;
        self.cells.resize(rows as usize * cols, self.fill)?;
        if rows > self.rows {
            let first_new = self.rows as usize * cols;
            stamp_terminators(&mut self.cells.cells_mut()[first_new..], cols);
        }

        log::trace!("rows {} -> {rows}", self.rows);
        self.rows = rows;
        Ok(())
    }

    /// Resize to `cols` columns (terminator included), re-laying out every row.
    ///
    /// Row content stays left-aligned: growing pads each row with the fill
    /// byte, shrinking silently drops whatever no longer fits.
    ///
    /// # Errors
    /// `InvalidDimension` outside `2..=168`, `StorageExhausted` if a bounded
    /// storage is too small. The grid is unchanged on error.
    pub fn set_cols(&mut self, cols: u32) -> Result<(), GridError> {
        check_cols(cols)?;
        if cols == self.cols {
            return Ok(());
        }

        let rows = self.rows as usize;
        let old = self.cols as usize;
        let new = cols as usize;
        let fill = self.fill;

        if new > old {
            self.cells.resize(rows * new, fill)?;
            let cells = self.cells.cells_mut();
            let kept = old.saturating_sub(1);
            // Last row first: its destination lies past every unread source row.
            for r in (0..rows).rev() {
                let (src, dst) = (r * old, r * new);
                cells.copy_within(src..src + kept, dst);
                cells[dst + kept..dst + new - 1].fill(fill);
                cells[dst + new - 1] = ROW_TERMINATOR;
            }
        } else {
            let cells = self.cells.cells_mut();
            let kept = new - 1;
            for r in 0..rows {
                let (src, dst) = (r * old, r * new);
                cells.copy_within(src..src + kept, dst);
                cells[dst + kept] = ROW_TERMINATOR;
            }
            self.cells.resize(rows * new, fill)?;
        }

        log::trace!("cols {old} -> {new}");
        self.cols = cols;
        Ok(())
    }

    /// Change the fill byte, rewriting every cell that held the old one.
    ///
    /// # Errors
    /// `InvalidFillCharacter` for a drawing glyph or `'\n'`. The grid is
    /// unchanged on error.
    pub fn set_fill(&mut self, fill: u8) -> Result<(), GridError> {
        check_fill(fill)?;
        if fill == self.fill {
            return Ok(());
        }

        let old = self.fill;
        for cell in self.cells.cells_mut() {
            if *cell == old {
                *cell = fill;
            }
        }

        self.fill = fill;
        Ok(())
    }

    /// Trace un segment : si la paire a une relation (voir
    /// [`classify`]), le glyphe est écrit sur les deux extrémités.
    ///
    /// Coordinates are trusted; run them through
    /// [`Grid::parse_coordinates`] first.
    ///
    /// # Panics
    /// If an endpoint falls outside the buffer.
    pub fn plot(&mut self, pair: CoordinatePair) -> Option<Glyph> {
        let glyph = classify(
            i64::from(pair.x1),
            i64::from(pair.y1),
            i64::from(pair.x2),
            i64::from(pair.y2),
        )?;
        *self.at_mut(pair.x1 as usize, pair.y1 as usize) = glyph.as_byte();
        *self.at_mut(pair.x2 as usize, pair.y2 as usize) = glyph.as_byte();
        Some(glyph)
    }

    /// Write the raw buffer to `sink`, exactly `rows * cols` bytes.
    ///
    /// # Errors
    /// Whatever `sink` reports.
    pub fn render<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(self.cells())
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.cells
    }
}

impl<S: CellStorage + Default> Grid<S> {
    /// Move the grid out, leaving `self` empty (0 × 0, fill 0).
    ///
    /// # Example
    /// ```
    /// use gg_core::grid::Grid;
    ///
    /// let mut a = Grid::new(3, 5, b'.');
    /// let b = a.take();
    /// assert!(a.is_empty() && a.rows() == 0 && a.cols() == 0);
    /// assert_eq!(b.cells().len(), 15);
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::replace(
            self,
            Self {
                rows: 0,
                cols: 0,
                fill: 0,
                cells: S::default(),
            },
        )
    }
}

impl<S, T> PartialEq<Grid<T>> for Grid<S> {
    fn eq(&self, other: &Grid<T>) -> bool {
        self.equals(other)
    }
}

impl<S> Eq for Grid<S> {}

impl<S, T> PartialOrd<Grid<T>> for Grid<S> {
    fn partial_cmp(&self, other: &Grid<T>) -> Option<Ordering> {
        self.compare_area(other)
    }
}

impl<S> Hash for Grid<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rows.hash(state);
        self.cols.hash(state);
        self.fill.hash(state);
    }
}

fn stamp_terminators(cells: &mut [u8], cols: usize) {
    if cols == 0 {
        return;
    }
    for row in cells.chunks_exact_mut(cols) {
        row[cols - 1] = ROW_TERMINATOR;
    }
}
