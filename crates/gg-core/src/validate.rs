//! Bounds checks and text validators.
//!
//! The `check_*` functions back every grid setter and the record loader.
//! The `parse_*` validators turn a line of user text into structured values;
//! anything malformed is a plain rejection (`None`), never an error.

use std::ops::RangeInclusive;

use crate::error::{Axis, GridError};
use crate::glyph::{ROW_TERMINATOR, is_drawing_glyph};
use crate::grid::Grid;
use crate::storage::CellStorage;

/// Smallest row count.
pub const MIN_ROWS: u32 = 1;
/// Largest row count.
pub const MAX_ROWS: u32 = 50;
/// Smallest column count (one content column plus the terminator).
pub const MIN_COLS: u32 = 2;
/// Largest column count, terminator included.
pub const MAX_COLS: u32 = 168;

/// Longest input line a validator will look at, in bytes.
pub const MAX_LINE_LEN: usize = 169;

/// Validated `rows cols fill` triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attributes {
    pub rows: u32,
    pub cols: u32,
    pub fill: u8,
}

/// Two grid positions `(x1, y1)` and `(x2, y2)`, already range-checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoordinatePair {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl CoordinatePair {
    #[must_use]
    pub const fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// # Errors
/// `InvalidDimension` if `rows` is outside `1..=50`.
pub fn check_rows(rows: u32) -> Result<(), GridError> {
    check_axis(Axis::Rows, rows, MIN_ROWS..=MAX_ROWS)
}

/// # Errors
/// `InvalidDimension` if `cols` is outside `2..=168`.
pub fn check_cols(cols: u32) -> Result<(), GridError> {
    check_axis(Axis::Cols, cols, MIN_COLS..=MAX_COLS)
}

/// Le remplissage ne peut être ni un glyphe de dessin ni le terminateur de
/// ligne : un remplacement global toucherait sinon des cellules réservées.
///
/// # Errors
/// `InvalidFillCharacter` on a reserved byte.
pub fn check_fill(fill: u8) -> Result<(), GridError> {
    if is_drawing_glyph(fill) || fill == ROW_TERMINATOR {
        return Err(GridError::InvalidFillCharacter(fill));
    }
    Ok(())
}

fn check_axis(axis: Axis, value: u32, range: RangeInclusive<u32>) -> Result<(), GridError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(GridError::InvalidDimension {
            axis,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Split `line` into exactly `N` whitespace-separated tokens.
fn tokens<const N: usize>(line: &str) -> Option<[&str; N]> {
    if line.len() > MAX_LINE_LEN {
        return None;
    }
    let mut it = line.split_ascii_whitespace();
    let mut out = [""; N];
    for slot in &mut out {
        *slot = it.next()?;
    }
    it.next().is_none().then_some(out)
}

fn parse_in<T>(token: &str, range: &RangeInclusive<T>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd,
{
    token.parse::<T>().ok().filter(|v| range.contains(v))
}

/// Parse `rows cols fill` from a line of text.
///
/// # Example
/// ```
/// use gg_core::validate::{parse_attributes, Attributes};
///
/// assert_eq!(
///     parse_attributes("10 40 ."),
///     Some(Attributes { rows: 10, cols: 40, fill: b'.' })
/// );
/// assert_eq!(parse_attributes("10 40 -"), None);
/// assert_eq!(parse_attributes("51 40 ."), None);
/// ```
#[must_use]
pub fn parse_attributes(line: &str) -> Option<Attributes> {
    let [rows, cols, fill] = tokens::<3>(line)?;
    let rows = parse_in(rows, &(MIN_ROWS..=MAX_ROWS))?;
    let cols = parse_in(cols, &(MIN_COLS..=MAX_COLS))?;
    let &[fill] = fill.as_bytes() else {
        return None;
    };
    check_fill(fill).ok()?;
    Some(Attributes { rows, cols, fill })
}

impl<S: CellStorage> Grid<S> {
    /// Parse `x1 y1 x2 y2` against the current content area.
    ///
    /// `x` must lie in `0..=cols-2` (the terminator column is not addressable)
    /// and `y` in `0..=rows-1`.
    ///
    /// # Example
    /// ```
    /// use gg_core::grid::Grid;
    /// use gg_core::validate::CoordinatePair;
    ///
    /// let grid = Grid::new(3, 4, b' ');
    /// assert_eq!(grid.parse_coordinates("0 0 1 1"), Some(CoordinatePair::new(0, 0, 1, 1)));
    /// assert_eq!(grid.parse_coordinates("3 0 2 0"), None);
    /// ```
    #[must_use]
    pub fn parse_coordinates(&self, line: &str) -> Option<CoordinatePair> {
        let [x1, y1, x2, y2] = tokens::<4>(line)?;
        let xs = 0..=self.cols().checked_sub(2)?;
        let ys = 0..=self.rows().checked_sub(1)?;
        Some(CoordinatePair {
            x1: parse_in(x1, &xs)?,
            y1: parse_in(y1, &ys)?,
            x2: parse_in(x2, &xs)?,
            y2: parse_in(y2, &ys)?,
        })
    }

    /// Most segments a session may plot on this grid: `rows * (cols-1) / 2`.
    #[must_use]
    pub fn max_segments(&self) -> usize {
        (self.rows() as usize * (self.cols() as usize).saturating_sub(1)) / 2
    }

    /// Parse a segment count in `0..=max_segments()`.
    #[must_use]
    pub fn parse_segment_count(&self, line: &str) -> Option<usize> {
        let [count] = tokens::<1>(line)?;
        parse_in(count, &(0..=self.max_segments()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_bounds() {
        assert!(check_rows(0).is_err());
        assert!(check_rows(1).is_ok());
        assert!(check_rows(50).is_ok());
        assert!(matches!(
            check_rows(51),
            Err(GridError::InvalidDimension {
                axis: Axis::Rows,
                value: 51,
                ..
            })
        ));
    }

    #[test]
    fn cols_bounds() {
        assert!(check_cols(1).is_err());
        assert!(check_cols(2).is_ok());
        assert!(check_cols(168).is_ok());
        assert!(check_cols(169).is_err());
    }

    #[test]
    fn fill_rejects_reserved_bytes() {
        for b in [b'-', b'\\', b'/', b'|', b'\n'] {
            assert!(matches!(
                check_fill(b),
                Err(GridError::InvalidFillCharacter(x)) if x == b
            ));
        }
        assert!(check_fill(b' ').is_ok());
        assert!(check_fill(b'#').is_ok());
    }

    #[test]
    fn attributes_need_exactly_three_tokens() {
        assert_eq!(parse_attributes("10 40"), None);
        assert_eq!(parse_attributes("10 40 . extra"), None);
        assert_eq!(parse_attributes(""), None);
        assert_eq!(
            parse_attributes("  1\t2   #  "),
            Some(Attributes {
                rows: 1,
                cols: 2,
                fill: b'#'
            })
        );
    }

    #[test]
    fn attributes_reject_malformed_tokens() {
        assert_eq!(parse_attributes("ten 40 ."), None);
        assert_eq!(parse_attributes("10 40 ab"), None);
        assert_eq!(parse_attributes("10 1 ."), None);
        assert_eq!(parse_attributes("-1 40 ."), None);
        // multi-byte fill is not a single cell
        assert_eq!(parse_attributes("10 40 é"), None);
    }

    #[test]
    fn overlong_line_is_rejected() {
        let mut line = String::from("10 40 .");
        line.push_str(&" ".repeat(MAX_LINE_LEN));
        assert_eq!(parse_attributes(&line), None);
    }

    #[test]
    fn coordinates_follow_current_dimensions() {
        let mut grid = Grid::new(2, 3, b' ');
        assert_eq!(
            grid.parse_coordinates("1 1 0 0"),
            Some(CoordinatePair::new(1, 1, 0, 0))
        );
        assert_eq!(grid.parse_coordinates("2 0 1 0"), None);
        assert_eq!(grid.parse_coordinates("0 2 0 1"), None);

        grid.set_cols(4).unwrap();
        grid.set_rows(3).unwrap();
        assert!(grid.parse_coordinates("2 2 1 1").is_some());
    }

    #[test]
    fn two_column_grid_only_addresses_column_zero() {
        let grid = Grid::new(1, 2, b' ');
        assert_eq!(grid.parse_coordinates("0 0 1 0"), None);
        assert!(grid.parse_coordinates("0 0 0 0").is_some());
    }

    #[test]
    fn coordinates_need_exactly_four_tokens() {
        let grid = Grid::default();
        assert_eq!(grid.parse_coordinates("1 1 1"), None);
        assert_eq!(grid.parse_coordinates("1 1 1 1 1"), None);
        assert_eq!(grid.parse_coordinates("a b c d"), None);
    }

    #[test]
    fn segment_count_upper_bound() {
        let grid = Grid::new(4, 5, b' ');
        assert_eq!(grid.max_segments(), 8);
        assert_eq!(grid.parse_segment_count("0"), Some(0));
        assert_eq!(grid.parse_segment_count("8"), Some(8));
        assert_eq!(grid.parse_segment_count("9"), None);
        assert_eq!(grid.parse_segment_count("2 3"), None);
    }
}
