//! Delimited-text export of a run's final archive.

use super::runner::AmosaResult;
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Column separator.
const DELIMITER: &str = ";";

/// Writes the final archive of `result` to `writer`.
///
/// The header is `f0;...;f{m-1};x0;...;x{n-1}`, followed by one row per
/// archive member holding its objectives then its decision variables.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::error::Error::Io) if writing fails.
pub fn write_csv<W: Write>(mut writer: W, result: &AmosaResult) -> Result<()> {
    let header: Vec<String> = (0..result.num_objectives)
        .map(|i| format!("f{i}"))
        .chain((0..result.num_variables).map(|i| format!("x{i}")))
        .collect();
    writeln!(writer, "{}", header.join(DELIMITER))?;

    for s in &result.solutions {
        let mut first = true;
        for v in s.objectives().iter().chain(s.variables()) {
            if !first {
                write!(writer, "{DELIMITER}")?;
            }
            write!(writer, "{v}")?;
            first = false;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

impl AmosaResult {
    /// Writes the final archive to a file at `path`.
    ///
    /// Buffered wrapper around [`write_csv`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::error::Error::Io) if the file cannot be
    /// created or written.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        write_csv(std::io::BufWriter::new(file), self)
    }
}
