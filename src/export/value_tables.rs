//! CSV export of the Q and N tables
//!
//! One row per state key, one column per action in canonical order. Rows are
//! sorted by key so repeated exports of the same store are byte-identical.

use std::{fs::File, io::Write, path::Path};

use crate::{
    Error, Result,
    q_learning::ValueStore,
    traffic::{ACTION_COUNT, Action},
};

/// Which table to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTableKind {
    /// Action values
    Q,
    /// Visit counts
    N,
}

impl ValueTableKind {
    /// File name prefix used by report writers
    pub const fn prefix(self) -> &'static str {
        match self {
            ValueTableKind::Q => "Q",
            ValueTableKind::N => "N",
        }
    }
}

/// Exporter for value-table CSV files
pub struct ValueTableCsv;

impl ValueTableCsv {
    /// Header row: `state` followed by the action names.
    pub fn header() -> [&'static str; ACTION_COUNT + 1] {
        let mut header = ["state"; ACTION_COUNT + 1];
        for action in Action::ALL {
            header[action.index() + 1] = action.name();
        }
        header
    }

    /// Write the Q-table
    pub fn write_q<W: Write>(store: &ValueStore, writer: W) -> Result<()> {
        let rows = store
            .q_rows()
            .into_iter()
            .map(|(key, values)| (key, values.map(Self::fmt_float)));
        Self::write_rows(writer, rows)
    }

    /// Write the N-table
    pub fn write_n<W: Write>(store: &ValueStore, writer: W) -> Result<()> {
        let rows = store
            .n_rows()
            .into_iter()
            .map(|(key, counts)| (key, counts.map(|n| n.to_string())));
        Self::write_rows(writer, rows)
    }

    /// Write one table to a file, replacing it
    pub fn save<P: AsRef<Path>>(store: &ValueStore, kind: ValueTableKind, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        match kind {
            ValueTableKind::Q => Self::write_q(store, file),
            ValueTableKind::N => Self::write_n(store, file),
        }
    }

    fn write_rows<'a, W, I>(writer: W, rows: I) -> Result<()>
    where
        W: Write,
        I: Iterator<Item = (&'a crate::q_learning::StateKey, [String; ACTION_COUNT])>,
    {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(Self::header())?;
        for (key, cells) in rows {
            csv.write_field(key.as_str())?;
            csv.write_record(&cells)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Format float for CSV (handles NaN/Inf)
    fn fmt_float(value: f64) -> String {
        if value.is_nan() {
            "nan".to_string()
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                "inf".to_string()
            } else {
                "-inf".to_string()
            }
        } else {
            value.to_string()
        }
    }
}
