//! Integration Tests for the Cache Engine
//!
//! Exercises the public engine API: lifecycle, expiry sweeping, storage
//! tiering, admission and concurrent access.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mini_cache::{CacheConfig, CacheEngine, CacheError, WriteRequest};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

// == Helper Functions ==

fn engine_config(root: &TempDir, id: &str) -> CacheConfig {
    CacheConfig {
        id: id.to_string(),
        max_items: 1000,
        size_limit: 256,
        cleanup_interval: Duration::from_millis(50),
        storage_root: root.path().to_path_buf(),
    }
}

fn create_engine(root: &TempDir, id: &str) -> CacheEngine {
    CacheEngine::new(engine_config(root, id)).unwrap()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Document {
    title: String,
    pages: Vec<String>,
    revision: u32,
}

// == Lifecycle & Expiry ==

#[tokio::test]
async fn test_sweeper_removes_expired_item() {
    let root = tempfile::tempdir().unwrap();
    let engine = create_engine(&root, "sweep");
    engine.start().await;

    engine
        .write(WriteRequest::new("short", "gone soon").expires_in(Duration::from_millis(10)))
        .await
        .unwrap();
    engine.write(WriteRequest::new("forever", "stays")).await.unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(matches!(engine.read("short").await, Err(CacheError::NotFound(_))));
    let item = engine.read("forever").await.unwrap();
    assert_eq!(item.decode::<String>().await.unwrap(), "stays");

    engine.stop().await;
}

#[tokio::test]
async fn test_past_expiry_removed_after_one_tick() {
    let root = tempfile::tempdir().unwrap();
    let engine = create_engine(&root, "past");
    engine.start().await;

    let past = Utc::now() - chrono::Duration::seconds(10);
    engine
        .write(WriteRequest::new("old", 1).expires_at(past))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(matches!(engine.read("old").await, Err(CacheError::NotFound(_))));

    engine.stop().await;
}

#[tokio::test]
async fn test_expired_item_readable_until_sweep() {
    let root = tempfile::tempdir().unwrap();
    let mut config = engine_config(&root, "lazy");
    config.cleanup_interval = Duration::from_secs(60);
    let engine = CacheEngine::new(config).unwrap();
    engine.start().await;

    engine
        .write(WriteRequest::new("k", "value").expires_in(Duration::from_millis(20)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let item = engine.read("k").await.unwrap();
    assert!(item.is_expired());
    assert_eq!(item.decode::<String>().await.unwrap(), "value");

    engine.stop().await;
}

#[tokio::test]
async fn test_no_sweeps_after_stop() {
    let root = tempfile::tempdir().unwrap();
    let engine = create_engine(&root, "stopped");
    engine.start().await;
    engine.stop().await;

    engine
        .write(WriteRequest::new("k", "kept").expires_in(Duration::from_millis(10)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let item = engine.read("k").await.unwrap();
    assert_eq!(item.decode::<String>().await.unwrap(), "kept");

    // stop is idempotent and start after stop does not revive the sweeper
    engine.stop().await;
    engine.start().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(engine.read("k").await.is_ok());
}

#[tokio::test]
async fn test_start_twice_is_harmless() {
    let root = tempfile::tempdir().unwrap();
    let engine = create_engine(&root, "twice");
    engine.start().await;
    engine.start().await;

    engine
        .write(WriteRequest::new("k", 1).expires_in(Duration::from_millis(10)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(engine.is_empty().await);

    engine.stop().await;
}

// == Storage Tiering ==

#[tokio::test]
async fn test_large_struct_roundtrip_through_file() {
    let root = tempfile::tempdir().unwrap();
    let engine = create_engine(&root, "tiering");
    let doc = Document {
        title: "manual".to_string(),
        pages: (0..50).map(|i| format!("page {}", i)).collect(),
        revision: 7,
    };

    engine.write(WriteRequest::new("doc", doc.clone())).await.unwrap();
    let item = engine.read("doc").await.unwrap();

    assert!(item.is_file_backed());
    let mut decoded = Document {
        title: String::new(),
        pages: Vec::new(),
        revision: 0,
    };
    item.decode_into(&mut decoded).await.unwrap();
    assert_eq!(decoded, doc);
}

#[tokio::test]
async fn test_sweep_deletes_blob() {
    let root = tempfile::tempdir().unwrap();
    let engine = create_engine(&root, "blob-sweep");

    let past = Utc::now() - chrono::Duration::seconds(1);
    engine
        .write(WriteRequest::new("big", "b".repeat(1024)).expires_at(past))
        .await
        .unwrap();
    let blob = engine
        .read("big")
        .await
        .unwrap()
        .payload()
        .file_path()
        .unwrap()
        .to_path_buf();
    assert!(blob.exists());

    assert_eq!(engine.remove_expired().await, 1);
    assert!(!blob.exists());
}

// == Admission ==

#[tokio::test]
async fn test_capacity_frees_after_sweep() {
    let root = tempfile::tempdir().unwrap();
    let mut config = engine_config(&root, "admission");
    config.max_items = 2;
    let engine = CacheEngine::new(config).unwrap();

    let past = Utc::now() - chrono::Duration::seconds(1);
    engine.write(WriteRequest::new("a", 1).expires_at(past)).await.unwrap();
    engine.write(WriteRequest::new("b", 2)).await.unwrap();

    let result = engine.write(WriteRequest::new("b", 3)).await;
    assert!(matches!(result, Err(CacheError::CapacityExceeded { max_items: 2 })));

    engine.remove_expired().await;
    engine.write(WriteRequest::new("b", 3)).await.unwrap();
    let item = engine.read("b").await.unwrap();
    assert_eq!(item.decode::<i32>().await.unwrap(), 3);
}

// == Isolation ==

#[tokio::test]
async fn test_engines_with_distinct_ids_coexist() {
    let root = tempfile::tempdir().unwrap();
    let first = create_engine(&root, "first");
    let second = create_engine(&root, "second");

    first.write(WriteRequest::new("k", "one")).await.unwrap();
    second.write(WriteRequest::new("k", "two")).await.unwrap();

    assert_ne!(first.storage_dir(), second.storage_dir());
    let one = first.read("k").await.unwrap();
    let two = second.read("k").await.unwrap();
    assert_eq!(one.decode::<String>().await.unwrap(), "one");
    assert_eq!(two.decode::<String>().await.unwrap(), "two");
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_operations_on_distinct_ids() {
    let root = tempfile::tempdir().unwrap();
    let engine = Arc::new(create_engine(&root, "concurrent"));
    engine.start().await;

    let tasks = 16;
    let per_task = 25;
    let mut handles = Vec::new();

    for t in 0..tasks {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            for i in 0..per_task {
                let id = format!("task-{}-{}", t, i);
                // every fifth value goes to the file tier
                let value = if i % 5 == 0 {
                    "v".repeat(512)
                } else {
                    format!("value-{}-{}", t, i)
                };
                engine.write(WriteRequest::new(id.clone(), value.clone())).await.unwrap();

                let item = engine.read(&id).await.unwrap();
                assert_eq!(item.decode::<String>().await.unwrap(), value);

                if i % 2 == 0 {
                    engine.erase(&id).await.unwrap();
                    assert!(matches!(engine.read(&id).await, Err(CacheError::NotFound(_))));
                }
            }
        }));
    }

    for handle in handles {
        handle.await.expect("task should not panic");
    }

    // per_task = 25: ids 1, 3, ..., 23 survive in each task
    assert_eq!(engine.len().await, tasks * 12);
    for t in 0..tasks {
        assert!(engine.read(&format!("task-{}-1", t)).await.is_ok());
        assert!(engine.read(&format!("task-{}-0", t)).await.is_err());
    }

    engine.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_into_full_table() {
    let root = tempfile::tempdir().unwrap();
    let mut config = engine_config(&root, "contended");
    config.max_items = 1;
    let engine = Arc::new(CacheEngine::new(config).unwrap());
    let value = "c".repeat(4096);

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let value = value.clone();
            tokio::spawn(async move {
                engine
                    .write(WriteRequest::new(format!("key-{}", i), value))
                    .await
            })
        })
        .collect();

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(()) => admitted += 1,
            Err(CacheError::CapacityExceeded { max_items: 1 }) => rejected += 1,
            Err(e) => panic!("unexpected write error: {}", e),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(rejected, 31);
    assert_eq!(engine.len().await, 1);
    // Rejected writes must not leave their blobs behind
    let blobs = std::fs::read_dir(engine.storage_dir()).unwrap().count();
    assert_eq!(blobs, 1);
}
