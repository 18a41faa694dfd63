//! Reading data files into channel tables and writing edits back out
//!
//! Two input formats are understood:
//!
//! - **CSV** with a header row naming the configured columns
//! - **TXT** exports: tab-separated rows after free-form metadata lines,
//!   starting at the line that begins with the time column name
//!
//! Both formats share the same row rules. Rows whose time or primary value
//! does not parse are dropped; a reference value that does not parse
//! becomes `NaN`. The resulting [`ChannelTable`] uses the canonical channel
//! names, so the editor never sees file column names.
//!
//! Edited data is written back as CSV with [`export_csv`].

mod csv_file;
mod export;
mod txt_file;

pub use csv_file::parse_csv;
pub use export::{export_csv, export_file_name, write_csv, DEFAULT_EXPORT_STEM};
pub use txt_file::parse_txt;

use crate::config::{format_file_size, ChannelsConfig, IngestConfig};
use crate::error::{Result, ResultExt, SigEditError};
use crate::types::ChannelTable;
use std::path::Path;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Txt,
}

impl FileFormat {
    /// Format for a lowercase extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "txt" => Some(FileFormat::Txt),
            _ => None,
        }
    }

    /// Format of `path`, if its extension is both allowed and understood
    pub fn detect(path: &Path, limits: &IngestConfig) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| limits.allows_extension(e))
            .ok_or_else(|| {
                SigEditError::Ingest(format!(
                    "Invalid file type. Only {} files are allowed.",
                    limits.allowed_extensions.join(", ").to_uppercase()
                ))
            })?;

        Self::from_extension(extension)
            .ok_or_else(|| SigEditError::Ingest("Unsupported file type.".to_string()))
    }
}

/// Read a data file into a table keyed by the canonical channel names
pub fn read_table(
    path: impl AsRef<Path>,
    channels: &ChannelsConfig,
    limits: &IngestConfig,
) -> Result<ChannelTable> {
    let path = path.as_ref();
    let format = FileFormat::detect(path, limits)?;

    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .len();
    if size > limits.max_file_bytes {
        return Err(SigEditError::Ingest(format!(
            "File is {}, larger than the {} limit",
            format_file_size(size),
            format_file_size(limits.max_file_bytes)
        )));
    }

    let table = match format {
        FileFormat::Csv => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            parse_csv(file, channels)?
        }
        FileFormat::Txt => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_txt(&content, channels)?
        }
    };

    tracing::info!(
        path = %path.display(),
        ?format,
        rows = table.get(crate::types::TIME_CHANNEL).map_or(0, <[f64]>::len),
        "Read data file"
    );
    Ok(table)
}

/// Accumulates rows under the shared coercion rules
#[derive(Debug, Default)]
pub(crate) struct RowCollector {
    time: Vec<f64>,
    primary: Vec<f64>,
    reference: Vec<f64>,
    dropped: usize,
}

impl RowCollector {
    /// Add one row; `reference` is `None` when the file has no such column
    pub(crate) fn push(&mut self, time: &str, primary: &str, reference: Option<&str>) {
        match (parse_value(time), parse_value(primary)) {
            (Some(t), Some(p)) => {
                self.time.push(t);
                self.primary.push(p);
                self.reference.push(match reference {
                    Some(r) => parse_value(r).unwrap_or(f64::NAN),
                    None => 0.0,
                });
            }
            _ => self.dropped += 1,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.time.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub(crate) fn finish(self) -> ChannelTable {
        if self.dropped > 0 {
            tracing::debug!(dropped = self.dropped, kept = self.time.len(), "Dropped unparseable rows");
        }
        ChannelTable::from_channels(self.time, self.primary, self.reference)
    }
}

/// Parse a numeric cell; blanks, text and `NaN` count as missing
fn parse_value(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PRIMARY_CHANNEL, REFERENCE_CHANNEL, TIME_CHANNEL};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 1.5 "), Some(1.5));
        assert_eq!(parse_value("-3"), Some(-3.0));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn test_row_collector_rules() {
        let mut rows = RowCollector::default();
        rows.push("0.0", "1.0", Some("2.0"));
        rows.push("x", "1.0", Some("2.0"));
        rows.push("1.0", "", Some("2.0"));
        rows.push("2.0", "3.0", Some("n/a"));
        rows.push("3.0", "4.0", None);
        assert_eq!(rows.len(), 3);

        let table = rows.finish();
        assert_eq!(table.get(TIME_CHANNEL).unwrap(), &[0.0, 2.0, 3.0]);
        assert_eq!(table.get(PRIMARY_CHANNEL).unwrap(), &[1.0, 3.0, 4.0]);
        let reference = table.get(REFERENCE_CHANNEL).unwrap();
        assert_eq!(reference[0], 2.0);
        assert!(reference[1].is_nan());
        assert_eq!(reference[2], 0.0);
    }

    #[test]
    fn test_format_detection() {
        let limits = IngestConfig::default();
        assert_eq!(
            FileFormat::detect(Path::new("a/b.CSV"), &limits).unwrap(),
            FileFormat::Csv
        );
        assert_eq!(
            FileFormat::detect(Path::new("run.txt"), &limits).unwrap(),
            FileFormat::Txt
        );
        assert!(FileFormat::detect(Path::new("run.xlsx"), &limits).is_err());
        assert!(FileFormat::detect(Path::new("noext"), &limits).is_err());
    }

    #[test]
    fn test_allowed_but_unknown_extension() {
        let limits = IngestConfig {
            allowed_extensions: vec!["dat".to_string()],
            ..IngestConfig::default()
        };
        let err = FileFormat::detect(Path::new("run.dat"), &limits).unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }

    #[test]
    fn test_read_table_csv_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Elapsed Time,Bladder Pressure,Scale").unwrap();
        writeln!(file, "0.0,10.0,1.0").unwrap();
        writeln!(file, "0.5,12.0,1.5").unwrap();
        drop(file);

        let table = read_table(&path, &ChannelsConfig::default(), &IngestConfig::default()).unwrap();
        assert_eq!(table.get(PRIMARY_CHANNEL).unwrap(), &[10.0, 12.0]);
    }

    #[test]
    fn test_read_table_rejects_large_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.csv");
        std::fs::write(&path, "Elapsed Time,Bladder Pressure,Scale\n0,1,2\n").unwrap();

        let limits = IngestConfig {
            max_file_bytes: 8,
            ..IngestConfig::default()
        };
        let err = read_table(&path, &ChannelsConfig::default(), &limits).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_read_table_missing_file() {
        let err = read_table(
            "/definitely/not/here.csv",
            &ChannelsConfig::default(),
            &IngestConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
