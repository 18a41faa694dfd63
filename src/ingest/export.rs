use crate::config::ChannelsConfig;
use crate::editor::TimeSeriesStore;
use crate::error::{Result, ResultExt, SigEditError};
use chrono::{DateTime, Local};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

/// Stem of suggested export file names
pub const DEFAULT_EXPORT_STEM: &str = "exported_data";

/// Suggested file name for an export made at `at`
pub fn export_file_name(at: DateTime<Local>) -> String {
    format!("{}_{}.csv", DEFAULT_EXPORT_STEM, at.format("%Y%m%d_%H%M%S"))
}

/// Write the store as CSV, one row per sample, headed by the configured names
pub fn write_csv<W: Write>(writer: W, store: &TimeSeriesStore, channels: &ChannelsConfig) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(channels.names())?;

    for ((t, p), r) in store
        .time()
        .iter()
        .zip(store.primary())
        .zip(store.reference())
    {
        writer.write_record([t.to_string(), p.to_string(), r.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the store to a CSV file
///
/// An empty store is refused so an export never produces a header-only file.
pub fn export_csv(
    path: impl AsRef<Path>,
    store: &TimeSeriesStore,
    channels: &ChannelsConfig,
) -> Result<()> {
    let path = path.as_ref();
    if store.is_empty() {
        return Err(SigEditError::Export("No data to export.".to_string()));
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, store, channels)?;

    tracing::info!(path = %path.display(), rows = store.len(), "Exported data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_csv;
    use crate::types::REFERENCE_CHANNEL;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn store() -> TimeSeriesStore {
        TimeSeriesStore::from_channels(
            vec![0.0, 0.5, 1.0],
            vec![10.0, 12.25, 11.0],
            vec![1.0, f64::NAN, 3.0],
        )
        .unwrap()
    }

    #[test]
    fn test_write_csv_layout() {
        let mut out = Vec::new();
        write_csv(&mut out, &store(), &ChannelsConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Elapsed Time,Bladder Pressure,Scale");
        assert_eq!(lines[1], "0,10,1");
        assert_eq!(lines[2], "0.5,12.25,NaN");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_export_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let channels = ChannelsConfig::default();

        export_csv(&path, &store(), &channels).unwrap();
        let table = parse_csv(std::fs::File::open(&path).unwrap(), &channels).unwrap();

        let loaded = TimeSeriesStore::from_channels(
            table.get(crate::types::TIME_CHANNEL).unwrap().to_vec(),
            table.get(crate::types::PRIMARY_CHANNEL).unwrap().to_vec(),
            table.get(REFERENCE_CHANNEL).unwrap().to_vec(),
        )
        .unwrap();
        assert_eq!(loaded.time(), store().time());
        assert_eq!(loaded.primary(), store().primary());
        assert!(loaded.reference()[1].is_nan());
    }

    #[test]
    fn test_export_refuses_empty_store() {
        let dir = tempdir().unwrap();
        let err = export_csv(
            dir.path().join("out.csv"),
            &TimeSeriesStore::new(),
            &ChannelsConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SigEditError::Export(_)));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_export_file_name() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(export_file_name(at), "exported_data_20240301_090507.csv");
    }
}
