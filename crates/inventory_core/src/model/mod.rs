//! Inventory domain model.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Own the text-to-typed boundary for presentation input.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `ItemId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod item;
