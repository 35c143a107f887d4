//! Core data-access layer for the inventory record keeper.
//! This crate is the single source of truth for inventory invariants.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, StorageSession, DEFAULT_DB_FILE_NAME};
pub use export::csv_export::{export_items_csv, write_items_csv, ExportError, CSV_HEADER};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{InventoryRecord, ItemDraft, ItemFields, ItemId, ItemValidationError};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult, SqliteItemRepository};
pub use service::inventory_service::{InventoryService, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
