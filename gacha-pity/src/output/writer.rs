use std::{
    collections::HashSet,
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
};

use csv::WriterBuilder;

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate the file and start with a fresh header.
    #[default]
    Overwrite,
    /// Add rows to an existing file; the header is written only if the file is new.
    Append,
}

/// Writes header, rows and an optional `# `-prefixed metadata preamble to a
/// comma-separated file, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvWriter {
    mode: WriteMode,
}

impl CsvWriter {
    pub fn new(mode: WriteMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    pub fn validate_header(header: &[String]) -> Result<()> {
        if header.is_empty() {
            return Err(Error::Csv("Header cannot be empty".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = header.iter().find(|col| !seen.insert(col.as_str())) {
            return Err(Error::Csv(format!("Header column {dup:?} is not unique")));
        }
        Ok(())
    }

    pub fn validate_row(row: &[String], header_len: usize) -> Result<()> {
        if row.len() != header_len {
            return Err(Error::Csv(format!(
                "Row length {} does not match header length {}",
                row.len(),
                header_len
            )));
        }
        Ok(())
    }

    /// Writes the file and returns the number of data rows written.
    ///
    /// Every row is validated before the file is opened, so a bad row leaves
    /// an existing file untouched.
    pub fn write<I>(
        &self,
        path: &Path,
        header: &[String],
        rows: I,
        metadata: &[String],
    ) -> Result<usize>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        Self::validate_header(header)?;
        let rows: Vec<Vec<String>> = rows.into_iter().collect();
        for row in &rows {
            Self::validate_row(row, header.len())?;
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let existed = path.exists();
        let file = match self.mode {
            WriteMode::Overwrite => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?,
            WriteMode::Append => OpenOptions::new().append(true).create(true).open(path)?,
        };
        let write_header = self.mode == WriteMode::Overwrite || !existed;

        let mut out = BufWriter::new(file);
        if write_header {
            for line in metadata {
                writeln!(out, "# {line}")?;
            }
        }

        let mut wtr = WriterBuilder::new().from_writer(out);
        if write_header {
            wtr.write_record(header)?;
        }
        for row in &rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;

        log::debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_validation() {
        assert!(CsvWriter::validate_header(&[]).is_err());
        let err = CsvWriter::validate_header(&strings(&["a", "b", "a"])).unwrap_err();
        assert!(err.to_string().contains("\"a\" is not unique"));
        assert!(CsvWriter::validate_header(&strings(&["a", "b"])).is_ok());
    }

    #[test]
    fn test_row_validation() {
        let err = CsvWriter::validate_row(&strings(&["1"]), 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CSV error: Row length 1 does not match header length 2"
        );
    }

    #[test]
    fn test_fields_are_quoted_when_needed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("quoted.csv");
        let header = strings(&["name", "note"]);
        let rows = vec![
            strings(&["Star Rail", "Light Cone"]),
            strings(&["a,b", "say \"hi\""]),
        ];

        CsvWriter::default().write(&path, &header, rows, &[])?;
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "name,note\nStar Rail,Light Cone\n\"a,b\",\"say \"\"hi\"\"\"\n"
        );
        Ok(())
    }
}
