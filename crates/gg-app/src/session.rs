use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use gg_core::config::StorageKind;
use gg_core::storage::MAX_CELLS;
use gg_core::{Attributes, BoundedStorage, CellStorage, Grid, SliceStorage};

use crate::prompt::Prompter;

/// Everything a session needs, resolved from CLI and config.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Attributs initiaux ; `None` = les demander sur l'entrée.
    pub attributes: Option<Attributes>,
    pub storage: StorageKind,
    /// Record to start from; replaces the initial attributes.
    pub load: Option<PathBuf>,
    /// Record to write at the end.
    pub save: Option<PathBuf>,
    /// Render target; stdout when `None`.
    pub output: Option<PathBuf>,
}

/// What a finished session did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub rows: u32,
    pub cols: u32,
    /// Coordinate lines accepted.
    pub segments: usize,
    /// Lines that produced a glyph.
    pub drawn: usize,
}

/// Déroule une session complète : grille initiale, segments, rendu,
/// sauvegarde éventuelle.
///
/// # Errors
/// Input exhausted while a prompt is pending, unreadable or invalid record,
/// or a failing output.
pub fn run<R, W, O>(plan: &Plan, prompter: &mut Prompter<R, W>, stdout: &mut O) -> Result<Summary>
where
    R: BufRead,
    W: Write,
    O: Write,
{
    let started = Instant::now();
    let attrs = match plan.attributes {
        Some(attrs) => attrs,
        None => prompter.attributes()?,
    };

    let summary = match plan.storage {
        StorageKind::Heap => drive(
            Grid::with_storage(attrs.rows, attrs.cols, attrs.fill, Vec::new())?,
            plan,
            prompter,
            stdout,
        )?,
        StorageKind::Inline => drive(
            Grid::with_storage(attrs.rows, attrs.cols, attrs.fill, BoundedStorage::default())?,
            plan,
            prompter,
            stdout,
        )?,
        StorageKind::Borrowed => {
            let mut backing = [0u8; MAX_CELLS];
            let storage = SliceStorage::new(&mut backing);
            drive(
                Grid::with_storage(attrs.rows, attrs.cols, attrs.fill, storage)?,
                plan,
                prompter,
                stdout,
            )?
        }
    };

    log::debug!("Session terminée en {:?}", started.elapsed());
    Ok(summary)
}

fn drive<S, R, W, O>(
    mut grid: Grid<S>,
    plan: &Plan,
    prompter: &mut Prompter<R, W>,
    stdout: &mut O,
) -> Result<Summary>
where
    S: CellStorage,
    R: BufRead,
    W: Write,
    O: Write,
{
    if let Some(path) = &plan.load {
        let file =
            File::open(path).with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
        grid.read_record(&mut BufReader::new(file))
            .with_context(|| format!("Enregistrement invalide : {}", path.display()))?;
        log::info!(
            "Grille chargée depuis {} ({}x{})",
            path.display(),
            grid.rows(),
            grid.cols()
        );
    }

    let segments = prompter.segment_count(&grid)?;
    let mut drawn = 0;
    for _ in 0..segments {
        let pair = prompter.coordinates(&grid)?;
        match grid.plot(pair) {
            Some(glyph) => {
                drawn += 1;
                log::trace!("{pair:?} -> {:?}", char::from(glyph.as_byte()));
            }
            None => log::debug!("Paire sans relation ignorée : {pair:?}"),
        }
    }

    let render_started = Instant::now();
    match &plan.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Impossible de créer {}", path.display()))?;
            let mut w = BufWriter::new(file);
            grid.render(&mut w)?;
            w.flush()?;
        }
        None => {
            grid.render(stdout)?;
            stdout.flush()?;
        }
    }
    log::debug!("Rendu : {:?}", render_started.elapsed());

    if let Some(path) = &plan.save {
        let file = File::create(path)
            .with_context(|| format!("Impossible de créer {}", path.display()))?;
        let mut w = BufWriter::new(file);
        grid.write_record(&mut w)?;
        w.flush()?;
        log::info!("Grille enregistrée dans {}", path.display());
    }

    log::info!("Terminé.");
    Ok(Summary {
        rows: grid.rows(),
        cols: grid.cols(),
        segments,
        drawn,
    })
}
