use blockpad_core::db::migrations::latest_version;
use blockpad_core::db::{open_db, open_db_in_memory, DbError};
use blockpad_core::store::local::{load_pages, save_pages, LocalLoad};
use blockpad_core::{
    Block, BlockBody, BlockKind, LocalStore, LocalStoreError, Page, SqliteLocalStore,
};
use rusqlite::Connection;
use serde_json::{json, Value};

const LOCAL_KEY: &str = "blockpad.pages";

fn sample_page() -> Page {
    let mut page = Page::with_blocks(
        "Groceries",
        "🛒",
        vec![
            Block::with_text(BlockKind::Heading1, "This week"),
            Block::with_text(BlockKind::Checkbox, "eggs"),
            Block::new(BlockBody::Divider),
            Block::with_text(BlockKind::Table, ""),
        ],
        1_000,
    );
    let [checkbox, table] = [page.blocks[1].id, page.blocks[3].id];
    page.toggle_checked(checkbox).unwrap();
    page.set_cell(table, 0, 1, "qty").unwrap();
    page.touch(2_000);
    page
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blockpad.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_entries");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteLocalStore::open(&path) {
        Err(LocalStoreError::Db(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        })) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be refused"),
    }
}

#[test]
fn pages_survive_reopening_the_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blockpad.db");
    let page = sample_page();

    let store = SqliteLocalStore::open(&path).unwrap();
    save_pages(&store, LOCAL_KEY, &[page.clone()]).unwrap();
    drop(store);

    let reopened = SqliteLocalStore::open(&path).unwrap();
    assert_eq!(load_pages(&reopened, LOCAL_KEY), LocalLoad::Pages(vec![page]));
}

#[test]
fn set_overwrites_previous_value() {
    let store = SqliteLocalStore::open_in_memory().unwrap();
    assert_eq!(store.get(LOCAL_KEY).unwrap(), None);

    store.set(LOCAL_KEY, "[]").unwrap();
    store.set(LOCAL_KEY, "[ ]").unwrap();
    assert_eq!(store.get(LOCAL_KEY).unwrap().as_deref(), Some("[ ]"));
    assert_eq!(load_pages(&store, LOCAL_KEY), LocalLoad::Empty);
}

#[test]
fn unreadable_value_loads_as_malformed() {
    let store = SqliteLocalStore::open_in_memory().unwrap();
    store.set(LOCAL_KEY, "{\"pages\": true}").unwrap();
    assert_eq!(load_pages(&store, LOCAL_KEY), LocalLoad::Malformed);
}

#[test]
fn stored_document_uses_camel_case_wire_shape() {
    let store = SqliteLocalStore::open_in_memory().unwrap();
    let page = sample_page();
    save_pages(&store, LOCAL_KEY, &[page.clone()]).unwrap();

    let raw = store.get(LOCAL_KEY).unwrap().unwrap();
    let documents: Value = serde_json::from_str(&raw).unwrap();
    let document = &documents[0];

    assert_eq!(document["id"], json!(page.id.to_string()));
    assert_eq!(document["title"], json!("Groceries"));
    assert_eq!(document["icon"], json!("🛒"));
    assert_eq!(document["createdAt"], json!(1_000));
    assert_eq!(document["updatedAt"], json!(2_000));

    let blocks = document["blocks"].as_array().unwrap();
    assert_eq!(blocks[0]["type"], json!("heading1"));
    assert_eq!(blocks[0]["content"], json!("This week"));
    assert!(blocks[0].get("checked").is_none());
    assert_eq!(blocks[1]["type"], json!("checkbox"));
    assert_eq!(blocks[1]["checked"], json!(true));
    assert_eq!(blocks[2]["type"], json!("divider"));
    assert_eq!(blocks[3]["type"], json!("table"));
    assert_eq!(
        blocks[3]["tableData"],
        json!([["", "qty", ""], ["", "", ""], ["", "", ""]])
    );
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
