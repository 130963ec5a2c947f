use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::{DEFAULT_COLS, DEFAULT_FILL, DEFAULT_ROWS};
use crate::validate::{check_cols, check_fill, check_rows};

/// Configuration d'une session de dessin.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use gg_core::config::SessionConfig;
/// let config = SessionConfig::default();
/// assert_eq!((config.rows, config.cols, config.fill), (20, 20, ' '));
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SessionConfig {
    // === Grille ===
    /// Nombre de lignes [1, 50].
    pub rows: u32,
    /// Nombre de colonnes, terminateur inclus [2, 168].
    pub cols: u32,
    /// Caractère de remplissage (ASCII, hors glyphes de dessin).
    pub fill: char,

    // === Session ===
    /// Stratégie de stockage des cellules.
    pub storage: StorageKind,
    /// Lire `rows cols fill` sur l'entrée standard au lieu de la config.
    pub prompt_attributes: bool,
    /// Afficher les invites sur stderr.
    pub echo_prompts: bool,
}

/// Cell storage strategy.
///
/// # Example
/// ```
/// use gg_core::config::StorageKind;
/// assert!(matches!(StorageKind::default(), StorageKind::Heap));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum StorageKind {
    /// `Vec<u8>` on the heap.
    #[default]
    Heap,
    /// Fixed-capacity inline buffer sized for the largest grid.
    Inline,
    /// Stack buffer lent to the grid by the session.
    Borrowed,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            fill: char::from(DEFAULT_FILL),
            storage: StorageKind::Heap,
            prompt_attributes: false,
            echo_prompts: true,
        }
    }
}

impl SessionConfig {
    /// Remet les valeurs hors bornes à leur défaut, avec un avertissement.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        if let Err(e) = check_rows(self.rows) {
            log::warn!("Config : {e}, utilisation de {}", defaults.rows);
            self.rows = defaults.rows;
        }
        if let Err(e) = check_cols(self.cols) {
            log::warn!("Config : {e}, utilisation de {}", defaults.cols);
            self.cols = defaults.cols;
        }
        if self.fill_byte().is_none() {
            log::warn!(
                "Config : remplissage {:?} refusé, utilisation de {:?}",
                self.fill,
                defaults.fill
            );
            self.fill = defaults.fill;
        }
    }

    /// Fill as a grid byte, `None` if it is not a valid fill.
    #[must_use]
    pub fn fill_byte(&self) -> Option<u8> {
        let byte = u8::try_from(self.fill).ok().filter(u8::is_ascii)?;
        check_fill(byte).ok()?;
        Some(byte)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridSection>,
    session: Option<SessionSection>,
}

/// Grid section, all fields optional for partial override.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    rows: Option<u32>,
    cols: Option<u32>,
    fill: Option<char>,
}

/// Session section, all fields optional.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionSection {
    storage: Option<StorageKind>,
    prompt_attributes: Option<bool>,
    echo_prompts: Option<bool>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this layout.
///
/// # Example
/// ```
/// use gg_core::config::{parse_config, StorageKind};
///
/// let config = parse_config("[grid]\nrows = 8\n[session]\nstorage = \"Inline\"\n").unwrap();
/// assert_eq!(config.rows, 8);
/// assert_eq!(config.cols, 20);
/// assert_eq!(config.storage, StorageKind::Inline);
/// ```
pub fn parse_config(content: &str) -> Result<SessionConfig> {
    let file: ConfigFile = toml::from_str(content).context("TOML invalide")?;
    let mut config = SessionConfig::default();

    if let Some(g) = file.grid {
        if let Some(v) = g.rows {
            config.rows = v;
        }
        if let Some(v) = g.cols {
            config.cols = v;
        }
        if let Some(v) = g.fill {
            config.fill = v;
        }
    }

    if let Some(s) = file.session {
        if let Some(v) = s.storage {
            config.storage = v;
        }
        if let Some(v) = s.prompt_attributes {
            config.prompt_attributes = v;
        }
        if let Some(v) = s.echo_prompts {
            config.echo_prompts = v;
        }
    }

    config.sanitize();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("glyphgrid.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SessionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn sections_override_partially() {
        let config = parse_config(
            r#"
            [grid]
            cols = 80
            fill = "."

            [session]
            echo_prompts = false
            "#,
        )
        .unwrap();
        assert_eq!(config.rows, 20);
        assert_eq!(config.cols, 80);
        assert_eq!(config.fill_byte(), Some(b'.'));
        assert!(!config.echo_prompts);
        assert_eq!(config.storage, StorageKind::Heap);
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let config = parse_config("[grid]\nrows = 99\ncols = 1\nfill = \"|\"\n").unwrap();
        assert_eq!((config.rows, config.cols, config.fill), (20, 20, ' '));
    }

    #[test]
    fn non_ascii_fill_falls_back() {
        let config = parse_config("[grid]\nfill = \"█\"\n").unwrap();
        assert_eq!(config.fill, ' ');
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert!(parse_config("[grid]\ndepth = 3\n").is_err());
        assert!(parse_config("rows = 3\n").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphgrid.toml");
        std::fs::write(&path, "[grid]\nrows = 5\n").unwrap();
        assert_eq!(load_config(&path).unwrap().rows, 5);
        assert!(load_config(&dir.path().join("absent.toml")).is_err());
    }
}
