use std::io::{self, BufRead, Read, Write};

use anyhow::{Result, bail};
use gg_core::validate::MAX_LINE_LEN;
use gg_core::{Attributes, CellStorage, CoordinatePair, Grid, parse_attributes};

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    /// Line content without its `\n` / `\r\n`.
    Text(String),
    /// Longer than `MAX_LINE_LEN`; consumed and dropped.
    Overlong,
}

/// Lecteur de lignes borné : une ligne trop longue est consommée puis
/// signalée, jamais accumulée en mémoire.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(MAX_LINE_LEN + 1),
        }
    }

    /// Next line, `None` at end of input.
    ///
    /// # Errors
    /// Propagates read failures.
    pub fn next_line(&mut self) -> io::Result<Option<Line>> {
        self.buf.clear();
        let limit = MAX_LINE_LEN as u64 + 1;
        let n = (&mut self.inner).take(limit).read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        } else if n as u64 == limit {
            self.inner.skip_until(b'\n')?;
            return Ok(Some(Line::Overlong));
        }

        Ok(Some(Line::Text(String::from_utf8_lossy(&self.buf).into_owned())))
    }
}

/// Boucle de saisie : redemande jusqu'à ce qu'un validateur accepte.
pub struct Prompter<R, W> {
    lines: LineReader<R>,
    sink: W,
    echo: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// `sink` receives the prompts when `echo` is set.
    pub fn new(input: R, sink: W, echo: bool) -> Self {
        Self {
            lines: LineReader::new(input),
            sink,
            echo,
        }
    }

    fn ask<T>(&mut self, prompt: &str, mut accept: impl FnMut(&str) -> Option<T>) -> Result<T> {
        loop {
            if self.echo {
                write!(self.sink, "{prompt}")?;
                self.sink.flush()?;
            }
            match self.lines.next_line()? {
                None => bail!("Fin de l'entrée inattendue ({})", prompt.trim_end()),
                Some(Line::Overlong) => {
                    log::debug!("Ligne de plus de {MAX_LINE_LEN} octets rejetée");
                }
                Some(Line::Text(text)) => match accept(&text) {
                    Some(value) => return Ok(value),
                    None => log::debug!("Saisie rejetée : {text:?}"),
                },
            }
        }
    }

    /// Read `rows cols fill`.
    ///
    /// # Errors
    /// End of input or a read failure.
    pub fn attributes(&mut self) -> Result<Attributes> {
        self.ask("rows cols fill > ", parse_attributes)
    }

    /// Read how many coordinate lines follow.
    ///
    /// # Errors
    /// End of input or a read failure.
    pub fn segment_count<S: CellStorage>(&mut self, grid: &Grid<S>) -> Result<usize> {
        let prompt = format!("segments (0..={}) > ", grid.max_segments());
        self.ask(&prompt, |line| grid.parse_segment_count(line))
    }

    /// Read one `x1 y1 x2 y2` line valid for `grid`.
    ///
    /// # Errors
    /// End of input or a read failure.
    pub fn coordinates<S: CellStorage>(&mut self, grid: &Grid<S>) -> Result<CoordinatePair> {
        self.ask("x1 y1 x2 y2 > ", |line| grid.parse_coordinates(line))
    }

    #[cfg(test)]
    pub fn sink(&self) -> &W {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn lines_are_stripped() {
        let mut r = reader("a b\r\nc\nlast");
        assert_eq!(r.next_line().unwrap(), Some(Line::Text("a b".into())));
        assert_eq!(r.next_line().unwrap(), Some(Line::Text("c".into())));
        assert_eq!(r.next_line().unwrap(), Some(Line::Text("last".into())));
        assert_eq!(r.next_line().unwrap(), None);
    }

    #[test]
    fn overlong_line_is_skipped_whole() {
        let text = format!("{}\n1 2 3\n", "9".repeat(MAX_LINE_LEN + 40));
        let mut r = reader(&text);
        assert_eq!(r.next_line().unwrap(), Some(Line::Overlong));
        assert_eq!(r.next_line().unwrap(), Some(Line::Text("1 2 3".into())));
    }

    #[test]
    fn line_at_limit_is_kept() {
        let text = format!("{}\n", "x".repeat(MAX_LINE_LEN));
        let mut r = reader(&text);
        assert!(matches!(r.next_line().unwrap(), Some(Line::Text(t)) if t.len() == MAX_LINE_LEN));
    }

    #[test]
    fn attributes_retry_until_valid() {
        let input = Cursor::new(b"\n0 10 .\n10 10 -\nfoo\n10 10 .\n".to_vec());
        let mut p = Prompter::new(input, Vec::new(), true);
        let attrs = p.attributes().unwrap();
        assert_eq!((attrs.rows, attrs.cols, attrs.fill), (10, 10, b'.'));
        let prompts = String::from_utf8_lossy(p.sink()).matches("rows cols fill").count();
        assert_eq!(prompts, 5);
    }

    #[test]
    fn coordinates_are_checked_against_grid() {
        let grid = Grid::new(2, 3, b' ');
        let input = Cursor::new(b"2 0 1 0\n0 2 0 1\n1 1 0 0\n".to_vec());
        let mut p = Prompter::new(input, Vec::new(), false);
        assert_eq!(p.coordinates(&grid).unwrap(), CoordinatePair::new(1, 1, 0, 0));
        assert!(p.sink().is_empty());
    }

    #[test]
    fn end_of_input_is_an_error() {
        let grid = Grid::new(2, 3, b' ');
        let mut p = Prompter::new(Cursor::new(b"99\n".to_vec()), Vec::new(), false);
        let err = p.segment_count(&grid).unwrap_err();
        assert!(err.to_string().contains("Fin de l'entrée"), "{err}");
    }
}
