//! Tests for the JSON file store

use std::path::PathBuf;
use std::time::Duration;

use loop_core::errors::DomainError;
use loop_core::repositories::KeyValueStore;
use loop_shared::config::{StorageBackend, StorageConfig};

use crate::storage::{open_store, FileStore};
use crate::InfrastructureError;

fn temp_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("loop-store-{}", uuid::Uuid::new_v4()))
        .join("store.json")
}

#[tokio::test]
async fn test_values_survive_reopen() {
    let path = temp_path();

    let store = FileStore::open(&path).await.unwrap();
    assert_eq!(store.get("walletBalance").await.unwrap(), None);
    store.set("walletBalance", "700").await.unwrap();
    store.set("hasSeenWallet", "true").await.unwrap();
    drop(store);

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(reopened.path(), path.as_path());
    assert_eq!(
        reopened.get("walletBalance").await.unwrap().as_deref(),
        Some("700")
    );

    assert!(reopened.remove("hasSeenWallet").await.unwrap());
    drop(reopened);

    let again = FileStore::open(&path).await.unwrap();
    assert_eq!(again.get("hasSeenWallet").await.unwrap(), None);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_corrupt_file_is_rejected() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(
        FileStore::open(&path).await,
        Err(InfrastructureError::Serialization(_))
    ));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_write_failure_rolls_back() {
    let path = temp_path();
    let store = FileStore::open(&path).await.unwrap();
    store.set("walletBalance", "300").await.unwrap();

    // A directory in place of the file makes the next write fail
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir_all(&path).unwrap();

    assert!(matches!(
        store.set("walletBalance", "900").await,
        Err(DomainError::Storage(_))
    ));
    assert_eq!(
        store.get("walletBalance").await.unwrap().as_deref(),
        Some("300")
    );

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_interrupted_write_leaves_memory_unchanged() {
    let path = temp_path();
    let store = FileStore::open(&path).await.unwrap();
    store.set("walletBalance", "300").await.unwrap();

    // Dropped before the file operations can finish
    match tokio::time::timeout(Duration::ZERO, store.set("walletBalance", "900")).await {
        Ok(result) => {
            result.unwrap();
            assert_eq!(
                store.get("walletBalance").await.unwrap().as_deref(),
                Some("900")
            );
        }
        Err(_) => {
            assert_eq!(
                store.get("walletBalance").await.unwrap().as_deref(),
                Some("300")
            );
            let reopened = FileStore::open(&path).await.unwrap();
            assert_eq!(
                reopened.get("walletBalance").await.unwrap().as_deref(),
                Some("300")
            );
        }
    }

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_open_file_store_from_config() {
    let path = temp_path();
    let config = StorageConfig {
        backend: StorageBackend::File,
        file_path: path.clone(),
        ..StorageConfig::default()
    };

    let store = open_store(&config).await.unwrap();
    assert_eq!(store.backend(), StorageBackend::File);
    store.set("walletBalance", "250").await.unwrap();
    assert!(path.exists());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
