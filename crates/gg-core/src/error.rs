use std::fmt;

use thiserror::Error;

/// Grid axis, used to report which dimension was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Row count (Y).
    Rows,
    /// Column count (X), terminator column included.
    Cols,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => f.write_str("rows"),
            Self::Cols => f.write_str("cols"),
        }
    }
}

/// Errors originating from the grid core.
#[derive(Error, Debug)]
pub enum GridError {
    /// Row or column count outside the allowed range.
    #[error("Dimension invalide : {axis} = {value} (autorisé : {min}..={max})")]
    InvalidDimension {
        /// Rejected axis.
        axis: Axis,
        /// Requested value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// Fill character collides with a drawing glyph or the row terminator.
    #[error("Caractère de remplissage invalide : {:?} (interdit : '-', '\\', '/', '|', '\\n')", as_char(.0))]
    InvalidFillCharacter(u8),

    /// Bounded storage cannot hold the requested number of cells.
    #[error("Stockage insuffisant : {required} cellules requises, capacité {capacity}")]
    StorageExhausted {
        /// Cells needed.
        required: usize,
        /// Cells the storage can hold.
        capacity: usize,
    },

    /// Record payload breaks the row layout (misplaced terminator or foreign byte).
    #[error("Enregistrement corrompu : octet inattendu à l'index {index}")]
    MalformedRecord {
        /// Offset of the first bad cell.
        index: usize,
    },

    /// Underlying reader/writer failure.
    #[error("Erreur d'E/S : {0}")]
    Io(#[from] std::io::Error),
}

fn as_char(byte: &u8) -> char {
    char::from(*byte)
}
