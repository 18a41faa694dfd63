use super::RowCollector;
use crate::config::ChannelsConfig;
use crate::error::{Result, SigEditError};
use crate::types::ChannelTable;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

/// Parse CSV with a header row into a channel table
///
/// All three configured columns must be present. Extra columns are ignored.
pub fn parse_csv<R: Read>(reader: R, channels: &ChannelsConfig) -> Result<ChannelTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let [time_col, primary_col, reference_col] = channels.names();
    let missing: Vec<&str> = channels
        .names()
        .into_iter()
        .filter(|name| locate_column(&headers, name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(SigEditError::Ingest(format!(
            "CSV is missing columns: {}.",
            missing.join(", ")
        )));
    }

    // Presence checked above
    let time_idx = locate_column(&headers, time_col).unwrap_or_default();
    let primary_idx = locate_column(&headers, primary_col).unwrap_or_default();
    let reference_idx = locate_column(&headers, reference_col).unwrap_or_default();

    let mut rows = RowCollector::default();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record.get(time_idx).unwrap_or(""),
            record.get(primary_idx).unwrap_or(""),
            Some(record.get(reference_idx).unwrap_or("")),
        );
    }
    Ok(rows.finish())
}

fn locate_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PRIMARY_CHANNEL, REFERENCE_CHANNEL, TIME_CHANNEL};

    fn parse(content: &str) -> Result<ChannelTable> {
        parse_csv(content.as_bytes(), &ChannelsConfig::default())
    }

    #[test]
    fn test_reads_configured_columns_in_any_order() {
        let table = parse(
            "Scale,Notes,Elapsed Time,Bladder Pressure\n\
             1.0,a,0.0,10.0\n\
             2.0,b,0.5,11.0\n",
        )
        .unwrap();
        assert_eq!(table.get(TIME_CHANNEL).unwrap(), &[0.0, 0.5]);
        assert_eq!(table.get(PRIMARY_CHANNEL).unwrap(), &[10.0, 11.0]);
        assert_eq!(table.get(REFERENCE_CHANNEL).unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_drops_unparseable_rows() {
        let table = parse(
            "Elapsed Time,Bladder Pressure,Scale\n\
             0.0,10.0,1.0\n\
             bad,11.0,1.0\n\
             1.0,,1.0\n\
             1.5,12.0,oops\n",
        )
        .unwrap();
        assert_eq!(table.get(TIME_CHANNEL).unwrap(), &[0.0, 1.5]);
        assert!(table.get(REFERENCE_CHANNEL).unwrap()[1].is_nan());
    }

    #[test]
    fn test_missing_columns_are_named() {
        let err = parse("Elapsed Time,Other\n0,1\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Bladder Pressure"));
        assert!(message.contains("Scale"));
        assert!(!message.contains("Elapsed Time"));
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let table = parse(
            "Elapsed Time,Bladder Pressure,Scale\n\
             0.0,10.0\n",
        )
        .unwrap();
        assert_eq!(table.get(PRIMARY_CHANNEL).unwrap(), &[10.0]);
        assert!(table.get(REFERENCE_CHANNEL).unwrap()[0].is_nan());
    }

    #[test]
    fn test_custom_column_names() {
        let channels = ChannelsConfig {
            time: "t".to_string(),
            primary: "p".to_string(),
            reference: "r".to_string(),
        };
        let table = parse_csv("t,p,r\n1,2,3\n".as_bytes(), &channels).unwrap();
        assert_eq!(table.get(REFERENCE_CHANNEL).unwrap(), &[3.0]);
    }
}
