//! CSV export and import of the trial log

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use crate::{Error, Result, pipeline::TrialRecord};

/// Column order of the trial-stats file
pub const TRIAL_LOG_HEADER: [&str; 5] = [
    "trial",
    "total_reward",
    "negative_reward",
    "trial_length",
    "reached_destination",
];

/// Reader and writer for trial-stats CSV files
pub struct TrialLogCsv;

impl TrialLogCsv {
    /// Write records with a header row, in the order given
    pub fn write<W: Write>(records: &[TrialRecord], writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);
        for record in records {
            csv.serialize(record)?;
        }
        if records.is_empty() {
            csv.write_record(TRIAL_LOG_HEADER)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Read records written by [`TrialLogCsv::write`]
    pub fn read<R: Read>(reader: R) -> Result<Vec<TrialRecord>> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers = csv.headers()?.clone();
        if headers.iter().ne(TRIAL_LOG_HEADER) {
            return Err(Error::SerializationContext {
                operation: "read trial log".to_string(),
                message: format!(
                    "unexpected header '{}', expected '{}'",
                    headers.iter().collect::<Vec<_>>().join(","),
                    TRIAL_LOG_HEADER.join(",")
                ),
            });
        }
        csv.deserialize()
            .map(|row| row.map_err(Error::from))
            .collect()
    }

    /// Write the log to a file, replacing it
    pub fn save<P: AsRef<Path>>(records: &[TrialRecord], path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        Self::write(records, file)
    }

    /// Read a log from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<TrialRecord>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        Self::read(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(trial: usize, reached: bool) -> TrialRecord {
        TrialRecord {
            trial,
            total_reward: 12.5,
            negative_reward: -1.5,
            trial_length: 7,
            reached_destination: reached,
        }
    }

    #[test]
    fn test_write_format() {
        let mut out = Vec::new();
        TrialLogCsv::write(&[record(0, true)], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "trial,total_reward,negative_reward,trial_length,reached_destination\n0,12.5,-1.5,7,true\n"
        );
    }

    #[test]
    fn test_empty_log_still_has_header() {
        let mut out = Vec::new();
        TrialLogCsv::write(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "trial,total_reward,negative_reward,trial_length,reached_destination\n"
        );
    }

    #[test]
    fn test_read_back() {
        let records = vec![record(0, false), record(1, true)];
        let mut out = Vec::new();
        TrialLogCsv::write(&records, &mut out).unwrap();
        assert_eq!(TrialLogCsv::read(out.as_slice()).unwrap(), records);
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let input = "a,b\n1,2\n";
        assert!(matches!(
            TrialLogCsv::read(input.as_bytes()),
            Err(Error::SerializationContext { .. })
        ));
    }
}
