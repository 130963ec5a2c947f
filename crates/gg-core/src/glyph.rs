/// Row terminator stored in the last cell of every row.
pub const ROW_TERMINATOR: u8 = b'\n';

/// Line-drawing glyphs a grid cell may hold besides the fill character.
///
/// # Example
/// ```
/// use gg_core::glyph::Glyph;
/// assert_eq!(Glyph::Dash.as_byte(), b'-');
/// assert_eq!(Glyph::from_byte(b'/'), Some(Glyph::ForwardSlash));
/// assert_eq!(Glyph::from_byte(b'#'), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Glyph {
    /// `-` : horizontal neighbours.
    Dash = b'-',
    /// `\` : down-right diagonal.
    BackSlash = b'\\',
    /// `/` : up-right diagonal.
    ForwardSlash = b'/',
    /// `|` : vertical neighbours.
    VerticalBar = b'|',
}

impl Glyph {
    /// The four drawing glyphs.
    pub const ALL: [Glyph; 4] = [
        Glyph::Dash,
        Glyph::BackSlash,
        Glyph::ForwardSlash,
        Glyph::VerticalBar,
    ];

    #[inline(always)]
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'-' => Some(Self::Dash),
            b'\\' => Some(Self::BackSlash),
            b'/' => Some(Self::ForwardSlash),
            b'|' => Some(Self::VerticalBar),
            _ => None,
        }
    }
}

/// True if `byte` is one of the four reserved drawing glyphs.
#[inline(always)]
#[must_use]
pub const fn is_drawing_glyph(byte: u8) -> bool {
    Glyph::from_byte(byte).is_some()
}

/// Choisit le glyphe reliant deux positions de la grille.
///
/// Voisins horizontaux → `-`, verticaux → `|`. En diagonale, le sens de
/// parcours décide : `x` croît pendant que `y` décroît → `/`, les deux
/// croissent (ou décroissent) → `\`. Toute autre paire (identique, éloignée)
/// n'a pas de relation.
///
/// Total sur tout `i64` : les écarts passent par `abs_diff`, sans débordement.
///
/// # Example
/// ```
/// use gg_core::glyph::{classify, Glyph};
/// assert_eq!(classify(3, 4, 4, 4), Some(Glyph::Dash));
/// assert_eq!(classify(2, 2, 3, 1), Some(Glyph::ForwardSlash));
/// assert_eq!(classify(5, 5, 5, 5), None);
/// ```
#[must_use]
pub fn classify(x1: i64, y1: i64, x2: i64, y2: i64) -> Option<Glyph> {
    let dx_is_one = x1.abs_diff(x2) == 1;
    let dy_is_one = y1.abs_diff(y2) == 1;

    if dx_is_one && y1 == y2 {
        Some(Glyph::Dash)
    } else if dy_is_one && x1 == x2 {
        Some(Glyph::VerticalBar)
    } else if dx_is_one && dy_is_one {
        // Both deltas are exactly one, so x1 != x2 and y1 != y2.
        if (x1 < x2) == (y1 > y2) {
            Some(Glyph::ForwardSlash)
        } else {
            Some(Glyph::BackSlash)
        }
    } else {
        None
    }
}
