use std::path::PathBuf;

use sponowcli::management::{
    FileSessionStore, KEY_ACCESS_TOKEN, KEY_CODE_VERIFIER, MemorySessionStore, SessionStore,
};

// Helper function to produce a unique scratch path per test
fn temp_session_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("sponowcli-test-{}-{}", std::process::id(), name))
        .join("session.json")
}

#[tokio::test]
async fn test_memory_store_set_get_remove() {
    let mut store = MemorySessionStore::new();

    assert!(store.get(KEY_ACCESS_TOKEN).await.is_none());

    store.set(KEY_ACCESS_TOKEN, "token123").await.unwrap();
    assert_eq!(store.get(KEY_ACCESS_TOKEN).await.as_deref(), Some("token123"));

    // Last writer wins
    store.set(KEY_ACCESS_TOKEN, "token456").await.unwrap();
    assert_eq!(store.get(KEY_ACCESS_TOKEN).await.as_deref(), Some("token456"));

    store.remove(KEY_ACCESS_TOKEN).await.unwrap();
    assert!(store.get(KEY_ACCESS_TOKEN).await.is_none());

    // Removing a missing key is not an error
    store.remove(KEY_ACCESS_TOKEN).await.unwrap();
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let path = temp_session_path("round-trip");
    let _ = async_fs::remove_file(&path).await;

    {
        let mut store = FileSessionStore::at(path.clone()).await.unwrap();
        store.set(KEY_ACCESS_TOKEN, "token123").await.unwrap();
        store.set(KEY_CODE_VERIFIER, "verifier123").await.unwrap();
    }

    // A fresh handle over the same file sees the persisted values
    let store = FileSessionStore::at(path.clone()).await.unwrap();
    assert_eq!(store.get(KEY_ACCESS_TOKEN).await.as_deref(), Some("token123"));
    assert_eq!(
        store.get(KEY_CODE_VERIFIER).await.as_deref(),
        Some("verifier123")
    );

    let _ = async_fs::remove_file(&path).await;
}

#[tokio::test]
async fn test_file_store_remove_persists() {
    let path = temp_session_path("remove");
    let _ = async_fs::remove_file(&path).await;

    {
        let mut store = FileSessionStore::at(path.clone()).await.unwrap();
        store.set(KEY_ACCESS_TOKEN, "token123").await.unwrap();
        store.remove(KEY_ACCESS_TOKEN).await.unwrap();
    }

    let store = FileSessionStore::at(path.clone()).await.unwrap();
    assert!(store.get(KEY_ACCESS_TOKEN).await.is_none());

    let _ = async_fs::remove_file(&path).await;
}

#[tokio::test]
async fn test_file_store_tolerates_missing_file() {
    let path = temp_session_path("missing");
    let _ = async_fs::remove_file(&path).await;

    let store = FileSessionStore::at(path).await.unwrap();
    assert!(store.get(KEY_ACCESS_TOKEN).await.is_none());
}
