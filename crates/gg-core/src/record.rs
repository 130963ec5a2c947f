//! Binary grid record.
//!
//! Layout, no magic, no version, no checksum:
//!
//! ```text
//! rows  : u32 little-endian
//! cols  : u32 little-endian
//! fill  : u8
//! cells : rows * cols bytes, terminators included
//! ```

use std::io::{Read, Write};

use crate::error::GridError;
use crate::glyph::{ROW_TERMINATOR, is_drawing_glyph};
use crate::grid::Grid;
use crate::storage::CellStorage;
use crate::validate::{check_cols, check_fill, check_rows};

/// Size of the `rows | cols | fill` header.
pub const HEADER_LEN: usize = 9;

impl<S: CellStorage> Grid<S> {
    /// Serialize into `w`.
    ///
    /// # Errors
    /// `Io` if the writer fails.
    pub fn write_record<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), GridError> {
        let mut header = [0u8; HEADER_LEN];
        header[0..4].copy_from_slice(&self.rows().to_le_bytes());
        header[4..8].copy_from_slice(&self.cols().to_le_bytes());
        header[8] = self.fill();
        w.write_all(&header)?;
        w.write_all(self.cells())?;
        Ok(())
    }

    /// Serialized record as a byte vector.
    ///
    /// # Example
    /// ```
    /// use gg_core::grid::Grid;
    ///
    /// let bytes = Grid::new(1, 3, b'.').to_record();
    /// assert_eq!(bytes, [1, 0, 0, 0, 3, 0, 0, 0, b'.', b'.', b'.', b'\n']);
    /// ```
    #[must_use]
    pub fn to_record(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.cells().len());
        out.extend_from_slice(&self.rows().to_le_bytes());
        out.extend_from_slice(&self.cols().to_le_bytes());
        out.push(self.fill());
        out.extend_from_slice(self.cells());
        out
    }

    /// Remplace la grille par celle lue depuis `r`.
    ///
    /// L'en-tête passe par les mêmes contrôles que les setters avant toute
    /// allocation ; les cellules sont lues dans un tampon temporaire, puis
    /// les dimensions sont appliquées via `set_rows` / `set_cols` /
    /// `set_fill` et le contenu recopié.
    ///
    /// # Errors
    /// `InvalidDimension` / `InvalidFillCharacter` for an out-of-range
    /// header, `StorageExhausted` if a bounded storage is too small,
    /// `MalformedRecord` if the cells break the row layout, `Io` on a short
    /// or failing reader. `self` is unchanged on error.
    pub fn read_record<R: Read + ?Sized>(&mut self, r: &mut R) -> Result<(), GridError> {
        let mut header = [0u8; HEADER_LEN];
        r.read_exact(&mut header)?;
        let [r0, r1, r2, r3, c0, c1, c2, c3, fill] = header;
        let rows = u32::from_le_bytes([r0, r1, r2, r3]);
        let cols = u32::from_le_bytes([c0, c1, c2, c3]);

        check_rows(rows)?;
        check_cols(cols)?;
        check_fill(fill)?;

        let len = rows as usize * cols as usize;
        // set_rows runs before set_cols, so the intermediate size counts too.
        let intermediate = rows as usize * self.cols() as usize;
        self.storage_mut().reserve_check(len.max(intermediate))?;

        let mut scratch = vec![0u8; len];
        r.read_exact(&mut scratch)?;
        check_layout(&scratch, cols as usize, fill)?;

        self.set_rows(rows)?;
        self.set_cols(cols)?;
        self.set_fill(fill)?;
        self.storage_mut().cells_mut().copy_from_slice(&scratch);

        log::debug!("record loaded: {rows}x{cols}, fill {:?}", char::from(fill));
        Ok(())
    }
}

impl Grid<Vec<u8>> {
    /// Heap grid read from a record.
    ///
    /// # Errors
    /// See [`Grid::read_record`].
    ///
    /// # Example
    /// ```
    /// use gg_core::grid::Grid;
    ///
    /// let original = Grid::new(4, 9, b'~');
    /// let copy = Grid::from_record(&mut original.to_record().as_slice()).unwrap();
    /// assert_eq!(copy, original);
    /// assert_eq!(copy.cells(), original.cells());
    /// ```
    pub fn from_record<R: Read + ?Sized>(r: &mut R) -> Result<Self, GridError> {
        let mut grid = Self::default();
        grid.read_record(r)?;
        Ok(grid)
    }
}

fn check_layout(cells: &[u8], cols: usize, fill: u8) -> Result<(), GridError> {
    for (r, row) in cells.chunks_exact(cols).enumerate() {
        let (terminator, content) = (row[cols - 1], &row[..cols - 1]);
        if let Some(c) = content
            .iter()
            .position(|&b| b != fill && !is_drawing_glyph(b))
        {
            return Err(GridError::MalformedRecord { index: r * cols + c });
        }
        if terminator != ROW_TERMINATOR {
            return Err(GridError::MalformedRecord {
                index: r * cols + cols - 1,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;
    use crate::storage::{BoundedStorage, InlineStorage};
    use crate::validate::CoordinatePair;

    fn record(rows: u32, cols: u32, fill: u8, cells: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&rows.to_le_bytes());
        out.extend_from_slice(&cols.to_le_bytes());
        out.push(fill);
        out.extend_from_slice(cells);
        out
    }

    #[test]
    fn layout_is_byte_exact() {
        let mut grid = Grid::new(2, 3, b' ');
        grid.plot(CoordinatePair::new(0, 0, 1, 1));
        let mut out = Vec::new();
        grid.write_record(&mut out).unwrap();
        assert_eq!(out, record(2, 3, b' ', b"\\ \n \\\n"));
        assert_eq!(out, grid.to_record());
    }

    #[test]
    fn round_trip_restores_cells() {
        let mut grid = Grid::new(5, 12, b'.');
        grid.plot(CoordinatePair::new(3, 3, 4, 2));
        grid.plot(CoordinatePair::new(10, 0, 10, 1));
        let bytes = grid.to_record();

        let mut restored = Grid::new(1, 2, b' ');
        restored.read_record(&mut bytes.as_slice()).unwrap();
        assert_eq!(restored, grid);
        assert_eq!(restored.cells(), grid.cells());
    }

    #[test]
    fn out_of_range_rows_surface_as_invalid_dimension() {
        let bytes = record(51, 3, b' ', &[]);
        let mut grid = Grid::new(2, 3, b'.');
        let err = grid.read_record(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            GridError::InvalidDimension {
                axis: Axis::Rows,
                value: 51,
                ..
            }
        ));
        assert_eq!(grid.cells(), b"..\n..\n");
    }

    #[test]
    fn huge_cols_rejected_before_payload() {
        let bytes = record(1, u32::MAX, b' ', &[]);
        let err = Grid::from_record(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            GridError::InvalidDimension {
                axis: Axis::Cols,
                ..
            }
        ));
    }

    #[test]
    fn glyph_fill_is_rejected() {
        let bytes = record(1, 2, b'|', b"|\n");
        let err = Grid::from_record(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, GridError::InvalidFillCharacter(b'|')));
    }

    #[test]
    fn short_payload_is_io_error_and_leaves_grid() {
        let bytes = record(2, 3, b' ', b"  \n");
        let mut grid = Grid::new(1, 4, b'.');
        let err = grid.read_record(&mut bytes.as_slice()).unwrap_err();
        match err {
            GridError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("expected Io, got {other:?}"),
        }
        assert_eq!((grid.rows(), grid.cols()), (1, 4));
    }

    #[test]
    fn misplaced_terminator_is_malformed() {
        let bytes = record(2, 3, b' ', b"  \n \n ");
        let err = Grid::from_record(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, GridError::MalformedRecord { index: 4 }));
    }

    #[test]
    fn foreign_content_byte_is_malformed() {
        let bytes = record(1, 4, b' ', b" x \n");
        let err = Grid::from_record(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, GridError::MalformedRecord { index: 1 }));
    }

    #[test]
    fn bounded_destination_too_small_is_untouched() {
        let bytes = Grid::new(3, 4, b'.').to_record();
        let mut grid = Grid::with_storage(1, 4, b' ', InlineStorage::<8>::default()).unwrap();
        let err = grid.read_record(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, GridError::StorageExhausted { required: 12, .. }));
        assert_eq!(grid.cells(), b"   \n");
    }

    #[test]
    fn bounded_destination_accepts_largest_record() {
        let source = Grid::new(50, 168, b' ');
        let mut grid = Grid::with_storage(1, 2, b'.', BoundedStorage::default()).unwrap();
        grid.read_record(&mut source.to_record().as_slice()).unwrap();
        assert_eq!(grid.cells(), source.cells());
    }
}
