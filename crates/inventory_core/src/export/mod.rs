//! Read-only export formats for inventory records.

pub mod csv_export;
