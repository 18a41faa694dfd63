use super::RowCollector;
use crate::config::ChannelsConfig;
use crate::error::{Result, SigEditError};
use crate::types::ChannelTable;

/// Parse a tab-separated TXT export into a channel table
///
/// Lines before the header (the first line starting with the time column
/// name) are metadata and skipped. Rows shorter than the header are padded
/// with blanks and longer rows truncated. Without a reference column the
/// reference channel is filled with `0.0`.
pub fn parse_txt(content: &str, channels: &ChannelsConfig) -> Result<ChannelTable> {
    let mut lines = content.lines();

    let header = lines
        .by_ref()
        .map(str::trim)
        .find(|line| line.starts_with(channels.time.as_str()))
        .ok_or_else(|| {
            SigEditError::Ingest(format!(
                "Header line starting with '{}' not found.",
                channels.time
            ))
        })?;
    let headers: Vec<&str> = header.split('\t').map(str::trim).collect();
    let width = headers.len();

    let position = |name: &str| headers.iter().position(|h| *h == name);
    let time_idx = position(channels.time.as_str()).unwrap_or(0);
    let primary_idx = position(channels.primary.as_str()).ok_or_else(|| {
        SigEditError::Ingest(format!("TXT is missing column: {}.", channels.primary))
    })?;
    let reference_idx = position(channels.reference.as_str());

    let mut rows = RowCollector::default();
    let mut fields: Vec<&str> = Vec::with_capacity(width);
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        fields.clear();
        fields.extend(line.split('\t').take(width));
        fields.resize(width, "");

        rows.push(
            fields[time_idx],
            fields[primary_idx],
            reference_idx.map(|i| fields[i]),
        );
    }

    if rows.is_empty() {
        return Err(SigEditError::Ingest(
            "No valid data found in the TXT file.".to_string(),
        ));
    }
    Ok(rows.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PRIMARY_CHANNEL, REFERENCE_CHANNEL, TIME_CHANNEL};

    const SAMPLE: &str = "Patient: 0042\n\
                          Recorded: 2024-03-01\n\
                          \n\
                          Elapsed Time\tBladder Pressure\tFlow\n\
                          0.0\t10.0\t0.1\n\
                          0.5\t12.5\n\
                          \n\
                          1.0\t11.0\t0.3\textra\n\
                          1.5\tERR\t0.4\n";

    fn parse(content: &str) -> Result<ChannelTable> {
        parse_txt(content, &ChannelsConfig::default())
    }

    #[test]
    fn test_skips_metadata_and_blank_lines() {
        let table = parse(SAMPLE).unwrap();
        assert_eq!(table.get(TIME_CHANNEL).unwrap(), &[0.0, 0.5, 1.0]);
        assert_eq!(table.get(PRIMARY_CHANNEL).unwrap(), &[10.0, 12.5, 11.0]);
    }

    #[test]
    fn test_absent_reference_is_zero_filled() {
        let table = parse(SAMPLE).unwrap();
        assert_eq!(table.get(REFERENCE_CHANNEL).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_present_reference_is_read() {
        let table = parse(
            "Elapsed Time\tBladder Pressure\tScale\n\
             0.0\t1.0\t5.0\n\
             1.0\t2.0\n",
        )
        .unwrap();
        let reference = table.get(REFERENCE_CHANNEL).unwrap();
        assert_eq!(reference[0], 5.0);
        assert!(reference[1].is_nan());
    }

    #[test]
    fn test_missing_header() {
        let err = parse("just\nsome\ntext\n").unwrap_err();
        assert!(err.to_string().contains("Header line starting with 'Elapsed Time'"));
    }

    #[test]
    fn test_missing_primary_column() {
        let err = parse("Elapsed Time\tFlow\n0\t1\n").unwrap_err();
        assert!(err.to_string().contains("Bladder Pressure"));
    }

    #[test]
    fn test_no_valid_rows() {
        let err = parse("Elapsed Time\tBladder Pressure\nx\ty\n").unwrap_err();
        assert!(err.to_string().contains("No valid data"));
    }
}
