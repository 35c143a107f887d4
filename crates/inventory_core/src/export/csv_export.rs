//! CSV export of inventory records.
//!
//! # Responsibility
//! - Serialize already-loaded records as header-plus-rows CSV.
//!
//! # Invariants
//! - Column order is `date,name,type,quantity,room,cabinet`; `id` is not exported.
//! - Rows are written in the order given; export never touches the store.

use crate::model::item::InventoryRecord;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header row written before any record.
pub const CSV_HEADER: [&str; 6] = ["date", "name", "type", "quantity", "room", "cabinet"];

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "export i/o failed: {err}"),
            Self::Csv(err) => write!(f, "csv encoding failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Writes the header and one row per record into `writer`.
pub fn write_items_csv<W: Write>(writer: W, items: &[InventoryRecord]) -> ExportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for item in items {
        let quantity = item.quantity.to_string();
        csv_writer.write_record([
            item.date.as_str(),
            item.name.as_str(),
            item.kind.as_str(),
            quantity.as_str(),
            item.room.as_str(),
            item.cabinet.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the records to it.
///
/// Returns the number of data rows written, excluding the header.
pub fn export_items_csv(path: impl AsRef<Path>, items: &[InventoryRecord]) -> ExportResult<usize> {
    let path = path.as_ref();
    let result = File::create(path)
        .map_err(ExportError::from)
        .and_then(|file| write_items_csv(file, items));

    match result {
        Ok(()) => {
            info!(
                "event=items_export module=export status=ok rows={} path={}",
                items.len(),
                path.display()
            );
            Ok(items.len())
        }
        Err(err) => {
            error!(
                "event=items_export module=export status=error path={} error={err}",
                path.display()
            );
            Err(err)
        }
    }
}
