use inventory_core::db::open_db_in_memory;
use inventory_core::{
    InventoryRecord, ItemDraft, ItemRepository, ItemValidationError, RepoError,
    SqliteItemRepository,
};

fn draft(name: &str, kind: &str, quantity: u32, room: &str, cabinet: &str) -> ItemDraft {
    ItemDraft::new("2024-01-01", name, kind, quantity, room, cabinet)
}

#[test]
fn create_then_list_returns_record_with_fresh_id() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let id = repo
        .create_item(&draft("Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap();

    let items = repo.list_items().unwrap();
    assert_eq!(
        items,
        vec![InventoryRecord {
            id,
            date: "2024-01-01".to_string(),
            name: "Hammer".to_string(),
            kind: "Tool".to_string(),
            quantity: 5,
            room: "RoomA".to_string(),
            cabinet: "Cab1".to_string(),
        }]
    );
}

#[test]
fn list_on_empty_store_is_empty() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    assert!(repo.list_items().unwrap().is_empty());
}

#[test]
fn duplicate_identity_tuple_is_rejected_and_store_unchanged() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    repo.create_item(&draft("Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap();
    let before = repo.list_items().unwrap();

    let mut same_tuple = draft("Hammer", "Tool", 9, "RoomA", "Cab1");
    same_tuple.date = "2025-06-30".to_string();
    let err = repo.create_item(&same_tuple).unwrap_err();

    match &err {
        RepoError::Duplicate { name, .. } => assert_eq!(name, "Hammer"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Hammer"));
    assert_eq!(repo.list_items().unwrap(), before);
}

#[test]
fn partial_overlap_of_identity_tuple_is_allowed() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    repo.create_item(&draft("Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap();
    repo.create_item(&draft("Hammer", "Tool", 1, "RoomA", "Cab2"))
        .unwrap();
    repo.create_item(&draft("Hammer", "Spare", 1, "RoomA", "Cab1"))
        .unwrap();
    repo.create_item(&draft("Saw", "Tool", 1, "RoomA", "Cab1"))
        .unwrap();

    assert_eq!(repo.list_items().unwrap().len(), 4);
}

#[test]
fn distinct_inserts_are_listed_in_insertion_order() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let names = ["Wrench", "Bolt", "Anvil", "Drill", "Clamp"];
    let ids: Vec<_> = names
        .iter()
        .map(|name| {
            repo.create_item(&draft(name, "Tool", 1, "RoomA", "Cab1"))
                .unwrap()
        })
        .collect();

    let items = repo.list_items().unwrap();
    assert_eq!(items.len(), names.len());
    assert_eq!(items.iter().map(|item| item.id).collect::<Vec<_>>(), ids);
    assert_eq!(
        items.iter().map(|item| item.name.as_str()).collect::<Vec<_>>(),
        names
    );
}

#[test]
fn ids_are_not_reused_after_delete() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let first = repo
        .create_item(&draft("Hammer", "Tool", 1, "RoomA", "Cab1"))
        .unwrap();
    let second = repo
        .create_item(&draft("Saw", "Tool", 1, "RoomA", "Cab1"))
        .unwrap();
    repo.delete_item(second).unwrap();

    let third = repo
        .create_item(&draft("Drill", "Tool", 1, "RoomA", "Cab1"))
        .unwrap();
    assert!(third > second);
    assert!(second > first);
}

#[test]
fn update_changes_only_target_record() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let hammer = repo
        .create_item(&draft("Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap();
    let saw = repo
        .create_item(&draft("Saw", "Tool", 2, "RoomB", "Cab2"))
        .unwrap();
    let saw_before = repo.get_item(saw).unwrap().unwrap();

    let replacement = ItemDraft::new("2024-02-02", "Sledgehammer", "Tool", 8, "RoomC", "Cab9");
    repo.update_item(hammer, &replacement).unwrap();

    let updated = repo.get_item(hammer).unwrap().unwrap();
    assert_eq!(updated, InventoryRecord::from_draft(hammer, replacement));
    assert_eq!(repo.get_item(saw).unwrap().unwrap(), saw_before);
}

#[test]
fn update_unknown_id_returns_not_found() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let err = repo
        .update_item(42, &draft("Hammer", "Tool", 1, "RoomA", "Cab1"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
}

#[test]
fn update_into_another_records_identity_is_rejected() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    repo.create_item(&draft("Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap();
    let saw = repo
        .create_item(&draft("Saw", "Tool", 2, "RoomB", "Cab2"))
        .unwrap();
    let saw_before = repo.get_item(saw).unwrap().unwrap();

    let err = repo
        .update_item(saw, &draft("Hammer", "Tool", 2, "RoomA", "Cab1"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { ref name, .. } if name == "Hammer"));
    assert_eq!(repo.get_item(saw).unwrap().unwrap(), saw_before);
}

#[test]
fn update_keeping_own_identity_is_not_a_conflict() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let id = repo
        .create_item(&draft("Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap();
    repo.update_item(id, &draft("Hammer", "Tool", 50, "RoomA", "Cab1"))
        .unwrap();

    assert_eq!(repo.get_item(id).unwrap().unwrap().quantity, 50);
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let blank_name = draft(" ", "Tool", 1, "RoomA", "Cab1");
    let err = repo.create_item(&blank_name).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ItemValidationError::EmptyField { field: "name" })
    ));
    assert!(repo.list_items().unwrap().is_empty());

    let id = repo
        .create_item(&draft("Hammer", "Tool", 1, "RoomA", "Cab1"))
        .unwrap();
    let before = repo.get_item(id).unwrap().unwrap();

    let blank_room = draft("Hammer", "Tool", 1, "", "Cab1");
    let err = repo.update_item(id, &blank_room).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ItemValidationError::EmptyField { field: "room" })
    ));
    assert_eq!(repo.get_item(id).unwrap().unwrap(), before);
}

#[test]
fn delete_is_idempotent() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let id = repo
        .create_item(&draft("Hammer", "Tool", 1, "RoomA", "Cab1"))
        .unwrap();

    assert!(repo.delete_item(id).unwrap());
    assert!(!repo.delete_item(id).unwrap());
    assert!(repo.get_item(id).unwrap().is_none());
    assert!(repo.list_items().unwrap().is_empty());
}

#[test]
fn list_rejects_corrupt_persisted_quantity() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let id = repo
        .create_item(&draft("Hammer", "Tool", 1, "RoomA", "Cab1"))
        .unwrap();
    // Bypass the CHECK constraint to simulate a file edited outside the app.
    session
        .connection()
        .execute_batch(
            "PRAGMA ignore_check_constraints = ON;
             UPDATE inventory_items SET quantity = -3;",
        )
        .unwrap();

    let err = repo.list_items().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("-3")));
    assert!(matches!(repo.get_item(id), Err(RepoError::InvalidData(_))));
}

#[test]
fn end_to_end_hammer_scenario() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let first = repo
        .create_item(&ItemDraft::new("2024-01-01", "Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap();
    assert_eq!(first, 1);
    let items = repo.list_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].quantity, 5);

    let err = repo
        .create_item(&ItemDraft::new("2024-01-01", "Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap_err();
    assert!(err.to_string().contains("Hammer"));
    assert_eq!(repo.list_items().unwrap().len(), 1);

    let second = repo
        .create_item(&ItemDraft::new("2024-01-02", "Hammer", "Tool", 3, "RoomB", "Cab2"))
        .unwrap();
    assert_eq!(second, 2);
    assert_eq!(repo.list_items().unwrap().len(), 2);

    repo.update_item(
        1,
        &ItemDraft::new("2024-01-03", "Hammer", "Tool", 10, "RoomA", "Cab1"),
    )
    .unwrap();
    let updated = repo.get_item(1).unwrap().unwrap();
    assert_eq!(updated.quantity, 10);
    assert_eq!(updated.date, "2024-01-03");

    repo.delete_item(2).unwrap();
    assert_eq!(repo.list_items().unwrap().len(), 1);
    repo.delete_item(2).unwrap();
    let remaining = repo.list_items().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 1);
}

#[test]
fn storage_failures_surface_as_db_errors() {
    let session = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(session.connection());

    let id = repo
        .create_item(&draft("Hammer", "Tool", 5, "RoomA", "Cab1"))
        .unwrap();
    session
        .connection()
        .execute_batch("DROP TABLE inventory_items;")
        .unwrap();

    let create_err = repo
        .create_item(&draft("Saw", "Tool", 1, "RoomA", "Cab1"))
        .unwrap_err();
    assert!(matches!(create_err, RepoError::Db(_)), "create: {create_err:?}");

    let update_err = repo
        .update_item(id, &draft("Hammer", "Tool", 9, "RoomA", "Cab1"))
        .unwrap_err();
    assert!(matches!(update_err, RepoError::Db(_)), "update: {update_err:?}");

    let list_err = repo.list_items().unwrap_err();
    assert!(matches!(list_err, RepoError::Db(_)), "list: {list_err:?}");

    let get_err = repo.get_item(id).unwrap_err();
    assert!(matches!(get_err, RepoError::Db(_)), "get: {get_err:?}");

    let delete_err = repo.delete_item(id).unwrap_err();
    assert!(matches!(delete_err, RepoError::Db(_)), "delete: {delete_err:?}");
    assert!(delete_err.to_string().contains("no such table"));
}
