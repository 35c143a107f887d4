//! Inventory item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `inventory_items` table.
//! - Translate engine failures into semantic errors (`Duplicate`, `NotFound`).
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `ItemDraft::validate()` before SQL mutations.
//! - Every mutation is one autocommitted statement; nothing spans calls.
//! - Unexpected engine failures are logged with operation and inputs before
//!   they are returned.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::item::{InventoryRecord, ItemDraft, ItemId, ItemValidationError};
use log::{debug, error, info, warn};
use rusqlite::{ffi, params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    date,
    name,
    type,
    quantity,
    room,
    cabinet
FROM inventory_items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for inventory persistence and query operations.
///
/// Callers branch on the variant: `Validation`, `Duplicate` and `NotFound`
/// are recoverable caller-side conditions, `Db` is a storage failure.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    /// Another record already holds this `(name, type, room, cabinet)` tuple.
    Duplicate {
        name: String,
        kind: String,
        room: String,
        cabinet: String,
    },
    NotFound(ItemId),
    Db(DbError),
    InvalidData(String),
}

impl RepoError {
    fn duplicate_of(draft: &ItemDraft) -> Self {
        Self::Duplicate {
            name: draft.name.clone(),
            kind: draft.kind.clone(),
            room: draft.room.clone(),
            cabinet: draft.cabinet.clone(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate {
                name,
                kind,
                room,
                cabinet,
            } => write!(
                f,
                "item `{name}` of type `{kind}` already exists in room `{room}`, cabinet `{cabinet}`"
            ),
            Self::NotFound(id) => write!(f, "inventory item not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Duplicate { .. } | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for inventory CRUD operations.
pub trait ItemRepository {
    fn create_item(&self, draft: &ItemDraft) -> RepoResult<ItemId>;
    fn list_items(&self) -> RepoResult<Vec<InventoryRecord>>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<InventoryRecord>>;
    fn update_item(&self, id: ItemId, draft: &ItemDraft) -> RepoResult<()>;
    /// Returns `true` when a row was removed; an unknown id is not an error.
    fn delete_item(&self, id: ItemId) -> RepoResult<bool>;
}

/// SQLite-backed inventory repository borrowing an open storage session.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, draft: &ItemDraft) -> RepoResult<ItemId> {
        draft.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO inventory_items (
                date,
                name,
                type,
                quantity,
                room,
                cabinet
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                draft.date.as_str(),
                draft.name.as_str(),
                draft.kind.as_str(),
                draft.quantity,
                draft.room.as_str(),
                draft.cabinet.as_str(),
            ],
        );

        if let Err(err) = inserted {
            if is_identity_conflict(&err) {
                warn!(
                    "event=item_create module=repo status=conflict name={:?} type={:?} room={:?} cabinet={:?}",
                    draft.name, draft.kind, draft.room, draft.cabinet
                );
                return Err(RepoError::duplicate_of(draft));
            }
            return Err(storage_failure("item_create", &describe_draft(draft), err));
        }

        let id = self.conn.last_insert_rowid();
        info!("event=item_create module=repo status=ok id={id}");
        Ok(id)
    }

    fn list_items(&self) -> RepoResult<Vec<InventoryRecord>> {
        let load = || -> rusqlite::Result<Vec<Result<InventoryRecord, String>>> {
            let mut stmt = self
                .conn
                .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(parse_item_row(row)?);
            }
            Ok(items)
        };

        let items = load()
            .map_err(|err| storage_failure("item_list", "all", err))?
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepoError::InvalidData)?;

        debug!("event=item_list module=repo status=ok count={}", items.len());
        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<InventoryRecord>> {
        let load = || -> rusqlite::Result<Option<Result<InventoryRecord, String>>> {
            let mut stmt = self
                .conn
                .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            let item = match rows.next()? {
                Some(row) => Some(parse_item_row(row)?),
                None => None,
            };
            Ok(item)
        };

        match load().map_err(|err| storage_failure("item_get", &format!("id={id}"), err))? {
            Some(parsed) => parsed.map(Some).map_err(RepoError::InvalidData),
            None => Ok(None),
        }
    }

    fn update_item(&self, id: ItemId, draft: &ItemDraft) -> RepoResult<()> {
        draft.validate()?;

        let updated = self.conn.execute(
            "UPDATE inventory_items
             SET
                date = ?1,
                name = ?2,
                type = ?3,
                quantity = ?4,
                room = ?5,
                cabinet = ?6
             WHERE id = ?7;",
            params![
                draft.date.as_str(),
                draft.name.as_str(),
                draft.kind.as_str(),
                draft.quantity,
                draft.room.as_str(),
                draft.cabinet.as_str(),
                id,
            ],
        );

        let changed = match updated {
            Ok(changed) => changed,
            Err(err) if is_identity_conflict(&err) => {
                warn!(
                    "event=item_update module=repo status=conflict id={id} name={:?} type={:?} room={:?} cabinet={:?}",
                    draft.name, draft.kind, draft.room, draft.cabinet
                );
                return Err(RepoError::duplicate_of(draft));
            }
            Err(err) => {
                return Err(storage_failure(
                    "item_update",
                    &format!("id={id} {}", describe_draft(draft)),
                    err,
                ));
            }
        };

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=item_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM inventory_items WHERE id = ?1;", [id])
            .map_err(|err| storage_failure("item_delete", &format!("id={id}"), err))?;

        info!(
            "event=item_delete module=repo status=ok id={id} removed={}",
            changed > 0
        );
        Ok(changed > 0)
    }
}

/// Decodes one row; engine errors abort, invariant violations are returned
/// as the inner `Err` so callers can report them as `InvalidData`.
fn parse_item_row(row: &Row<'_>) -> rusqlite::Result<Result<InventoryRecord, String>> {
    let id: ItemId = row.get("id")?;
    let raw_quantity: i64 = row.get("quantity")?;
    let Ok(quantity) = u32::try_from(raw_quantity) else {
        return Ok(Err(format!(
            "invalid quantity `{raw_quantity}` in inventory_items.quantity for id {id}"
        )));
    };

    let draft = ItemDraft {
        date: row.get("date")?,
        name: row.get("name")?,
        kind: row.get("type")?,
        quantity,
        room: row.get("room")?,
        cabinet: row.get("cabinet")?,
    };
    if let Err(err) = draft.validate() {
        return Ok(Err(format!("{err} (id {id})")));
    }

    Ok(Ok(InventoryRecord::from_draft(id, draft)))
}

fn is_identity_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn storage_failure(event: &str, context: &str, err: rusqlite::Error) -> RepoError {
    error!(
        "event={event} module=repo status=error error_code=storage_failed {context} error={err}"
    );
    RepoError::Db(DbError::Sqlite(err))
}

fn describe_draft(draft: &ItemDraft) -> String {
    format!(
        "date={:?} name={:?} type={:?} quantity={} room={:?} cabinet={:?}",
        draft.date, draft.name, draft.kind, draft.quantity, draft.room, draft.cabinet
    )
}
