use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gg_core::config::{SessionConfig, StorageKind};
use gg_core::validate::{check_cols, check_fill, check_rows};
use gg_core::Attributes;

use crate::session::Plan;

/// glyphgrid: line-art on a fixed character grid.
///
/// Reads a segment count, then one `x1 y1 x2 y2` line per segment, and
/// prints the grid.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Nombre de lignes [1, 50].
    #[arg(long)]
    pub rows: Option<u32>,

    /// Nombre de colonnes, terminateur inclus [2, 168].
    #[arg(long)]
    pub cols: Option<u32>,

    /// Caractère de remplissage (ASCII, hors '-', '\', '/', '|').
    #[arg(long)]
    pub fill: Option<char>,

    /// Lire "rows cols fill" sur l'entrée standard.
    #[arg(long, default_value_t = false)]
    pub prompt_attributes: bool,

    /// Fichier de configuration TOML. Optionnel.
    #[arg(short, long, default_value = "glyphgrid.toml")]
    pub config: PathBuf,

    /// Partir d'une grille enregistrée.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Enregistrer la grille finale.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Écrire le rendu dans un fichier au lieu de stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stockage des cellules : heap, inline, borrowed.
    #[arg(long)]
    pub storage: Option<String>,

    /// Ne pas afficher les invites.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Reject flag combinations and out-of-range attributes up front.
    ///
    /// # Errors
    /// Returns an error for an invalid `--rows`, `--cols` or `--fill`, or if
    /// `--prompt-attributes` is combined with `--load`.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.prompt_attributes && self.load.is_some() {
            anyhow::bail!("--prompt-attributes et --load sont incompatibles.");
        }
        if let Some(rows) = self.rows {
            check_rows(rows).context("--rows")?;
        }
        if let Some(cols) = self.cols {
            check_cols(cols).context("--cols")?;
        }
        if let Some(fill) = self.fill {
            fill_byte(fill).context("--fill")?;
        }
        Ok(())
    }

    /// Echo prompts unless `--quiet` or the config says otherwise.
    #[must_use]
    pub fn echo_prompts(&self, config: &SessionConfig) -> bool {
        !self.quiet && config.echo_prompts
    }

    /// Merge flags over `config` into a session plan. Flags win.
    ///
    /// # Errors
    /// Same as [`Cli::validate`].
    pub fn plan(&self, config: &SessionConfig) -> anyhow::Result<Plan> {
        self.validate()?;

        let prompting =
            self.prompt_attributes || (config.prompt_attributes && self.load.is_none());
        let attributes = if prompting {
            None
        } else {
            let fill = match self.fill {
                Some(c) => fill_byte(c)?,
                // sanitize() already replaced an unusable fill
                None => config.fill_byte().unwrap_or(b' '),
            };
            Some(Attributes {
                rows: self.rows.unwrap_or(config.rows),
                cols: self.cols.unwrap_or(config.cols),
                fill,
            })
        };

        let storage = match self.storage.as_deref() {
            None => config.storage,
            Some("heap") => StorageKind::Heap,
            Some("inline") => StorageKind::Inline,
            Some("borrowed") => StorageKind::Borrowed,
            Some(other) => {
                log::warn!("Stockage inconnu '{other}', utilisation de {:?}.", config.storage);
                config.storage
            }
        };

        Ok(Plan {
            attributes,
            storage,
            load: self.load.clone(),
            save: self.save.clone(),
            output: self.output.clone(),
        })
    }
}

fn fill_byte(c: char) -> anyhow::Result<u8> {
    let Some(byte) = u8::try_from(c).ok().filter(u8::is_ascii) else {
        anyhow::bail!("Remplissage {c:?} : un seul caractère ASCII attendu.");
    };
    check_fill(byte)?;
    Ok(byte)
}
