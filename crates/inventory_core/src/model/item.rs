//! Inventory item domain model.
//!
//! # Responsibility
//! - Define the persisted inventory record and its id-less draft.
//! - Parse raw text fields from presentation into typed drafts.
//!
//! # Invariants
//! - No required text field may be empty or whitespace-only.
//! - `quantity` is a non-negative integer once it leaves the text boundary.
//! - `(name, kind, room, cabinet)` is the natural identity of a record.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key. Never reused once handed out.
pub type ItemId = i64;

/// Persisted inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: ItemId,
    pub date: String,
    pub name: String,
    /// Serialized as `type` to match the column name.
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: u32,
    pub room: String,
    pub cabinet: String,
}

impl InventoryRecord {
    /// Builds a record from a stored id and its field values.
    pub fn from_draft(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            date: draft.date,
            name: draft.name,
            kind: draft.kind,
            quantity: draft.quantity,
            room: draft.room,
            cabinet: draft.cabinet,
        }
    }

    /// Returns whether any displayed field contains `needle`, ignoring case.
    ///
    /// A blank needle matches every record.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let quantity = self.quantity.to_string();
        [
            self.date.as_str(),
            self.name.as_str(),
            self.kind.as_str(),
            quantity.as_str(),
            self.room.as_str(),
            self.cabinet.as_str(),
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// Typed field values for insert/update, without the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub date: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: u32,
    pub room: String,
    pub cabinet: String,
}

impl ItemDraft {
    pub fn new(
        date: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        quantity: u32,
        room: impl Into<String>,
        cabinet: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            name: name.into(),
            kind: kind.into(),
            quantity,
            room: room.into(),
            cabinet: cabinet.into(),
        }
    }

    /// Checks that every required text field is present.
    ///
    /// Quantity needs no check here: `u32` already excludes negatives.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        for (field, value) in [
            ("date", &self.date),
            ("name", &self.name),
            ("type", &self.kind),
            ("room", &self.room),
            ("cabinet", &self.cabinet),
        ] {
            if value.trim().is_empty() {
                return Err(ItemValidationError::EmptyField { field });
            }
        }
        Ok(())
    }
}

/// Raw text as entered at the presentation boundary.
///
/// `quantity` stays text here; [`ItemFields::parse`] is the only way to turn
/// it into an [`ItemDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFields {
    pub date: String,
    pub name: String,
    pub kind: String,
    pub quantity: String,
    pub room: String,
    pub cabinet: String,
}

impl ItemFields {
    pub fn new(
        date: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        quantity: impl Into<String>,
        room: impl Into<String>,
        cabinet: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            name: name.into(),
            kind: kind.into(),
            quantity: quantity.into(),
            room: room.into(),
            cabinet: cabinet.into(),
        }
    }

    /// Validates all fields and parses `quantity` as a non-negative integer.
    ///
    /// Surrounding whitespace around the quantity is tolerated; text fields
    /// are kept exactly as entered.
    pub fn parse(self) -> Result<ItemDraft, ItemValidationError> {
        let quantity_text = self.quantity.trim();
        if quantity_text.is_empty() {
            return Err(ItemValidationError::EmptyField { field: "quantity" });
        }
        let quantity = quantity_text
            .parse::<u32>()
            .map_err(|_| ItemValidationError::InvalidQuantity {
                value: self.quantity.clone(),
            })?;

        let draft = ItemDraft {
            date: self.date,
            name: self.name,
            kind: self.kind,
            quantity,
            room: self.room,
            cabinet: self.cabinet,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Validation failures caused by caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyField { field: &'static str },
    InvalidQuantity { value: String },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "field `{field}` must not be empty"),
            Self::InvalidQuantity { value } => write!(
                f,
                "quantity `{value}` is not a whole number greater than or equal to 0"
            ),
        }
    }
}

impl Error for ItemValidationError {}
