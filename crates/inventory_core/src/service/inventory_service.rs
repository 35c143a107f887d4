//! Inventory use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for presentation callers.
//! - Parse raw text input before anything reaches the repository.
//! - Compose read-all with filtering and export.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::export::csv_export::{export_items_csv, ExportError};
use crate::model::item::{InventoryRecord, ItemFields, ItemId};
use crate::repo::item_repo::{ItemRepository, RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Use-case service wrapper for inventory operations.
pub struct InventoryService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> InventoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Parses form input and inserts a new record.
    ///
    /// # Contract
    /// - Malformed input returns `RepoError::Validation` without touching storage.
    /// - Returns the freshly assigned id.
    pub fn add_item(&self, fields: ItemFields) -> RepoResult<ItemId> {
        let draft = fields.parse()?;
        self.repo.create_item(&draft)
    }

    /// Lists every record in insertion order.
    pub fn list_items(&self) -> RepoResult<Vec<InventoryRecord>> {
        self.repo.list_items()
    }

    pub fn get_item(&self, id: ItemId) -> RepoResult<Option<InventoryRecord>> {
        self.repo.get_item(id)
    }

    /// Parses form input and overwrites all fields of record `id`.
    ///
    /// Returns repository-level not-found, duplicate or validation errors unchanged.
    pub fn update_item(&self, id: ItemId, fields: ItemFields) -> RepoResult<()> {
        let draft = fields.parse()?;
        self.repo.update_item(id, &draft)
    }

    /// Deletes record `id`; deleting an unknown id succeeds with `false`.
    pub fn delete_item(&self, id: ItemId) -> RepoResult<bool> {
        self.repo.delete_item(id)
    }

    /// Returns records whose displayed fields contain `text`, ignoring case.
    ///
    /// Blank text returns every record. Order matches `list_items`.
    pub fn filter_items(&self, text: &str) -> RepoResult<Vec<InventoryRecord>> {
        let mut items = self.repo.list_items()?;
        items.retain(|item| item.matches_text(text));
        Ok(items)
    }

    /// Writes every record to `path` as CSV and returns the row count.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<usize, ServiceError> {
        let items = self.repo.list_items()?;
        Ok(export_items_csv(path, &items)?)
    }
}

/// Error for use cases that combine storage reads with file output.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Export(ExportError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
