// ═══════════════════════════════════════════════════════════════════
// Storage Tests — blob format, backends, StorageManager
// ═══════════════════════════════════════════════════════════════════

use fundwatch_core::errors::CoreError;
use fundwatch_core::models::fund::{FundDetail, WatchedFund};
use fundwatch_core::models::watchlist::Watchlist;
use fundwatch_core::storage::backend::{FileBackend, MemoryBackend, StorageBackend};
use fundwatch_core::storage::format::{self, CURRENT_VERSION};
use fundwatch_core::storage::manager::StorageManager;

fn sample_list() -> Watchlist {
    let detail = FundDetail {
        id: "005827".into(),
        name: "易方达蓝筹精选混合".into(),
        category: "消费".into(),
        nav: 1.234,
        estimate: 1.251,
        est_rate: 1.38,
        time: "2026-08-28 14:45".into(),
        holdings: Vec::new(),
    };
    let mut list = Watchlist::new();
    list.add(WatchedFund::from_detail(&detail));
    list
}

// ═══════════════════════════════════════════════════════════════════
// Blob format
// ═══════════════════════════════════════════════════════════════════

mod blob_format {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let list = sample_list();
        let blob = format::encode(&list).unwrap();
        let back = format::decode(&blob).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn encoded_blob_carries_version() {
        let blob = format::encode(&sample_list()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["version"], CURRENT_VERSION);
        assert!(value["watchlist"].is_array());
    }

    #[test]
    fn future_version_rejected() {
        let blob = format!(r#"{{"version": {}, "watchlist": []}}"#, CURRENT_VERSION + 1);
        match format::decode(&blob) {
            Err(CoreError::UnsupportedVersion(v)) => assert_eq!(v, CURRENT_VERSION + 1),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn version_zero_rejected() {
        let blob = r#"{"version": 0, "watchlist": []}"#;
        assert!(matches!(
            format::decode(blob),
            Err(CoreError::UnsupportedVersion(0))
        ));
    }

    #[test]
    fn garbage_rejected_as_invalid_blob() {
        assert!(matches!(
            format::decode("{not json"),
            Err(CoreError::InvalidBlob(_))
        ));
        assert!(matches!(
            format::decode(r#"{"unexpected": true}"#),
            Err(CoreError::InvalidBlob(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Backends
// ═══════════════════════════════════════════════════════════════════

mod memory_backend {
    use super::*;

    #[test]
    fn starts_empty_then_stores() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read().unwrap(), None);

        backend.write("blob").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("blob"));
        assert_eq!(backend.blob().as_deref(), Some("blob"));
    }

    #[test]
    fn can_be_seeded() {
        let backend = MemoryBackend::with_blob("seeded");
        assert_eq!(backend.read().unwrap().as_deref(), Some("seeded"));
    }
}

mod file_backend {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("watchlist.json"));
        assert_eq!(backend.read().unwrap(), None);
    }

    #[test]
    fn write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("watchlist.json"));
        backend.write("blob").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("blob"));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested/deep/watchlist.json"));
        backend.write("blob").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("blob"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager
// ═══════════════════════════════════════════════════════════════════

mod manager {
    use super::*;

    #[test]
    fn save_then_load_round_trip() {
        let backend = MemoryBackend::new();
        let list = sample_list();

        StorageManager::save(&backend, &list).unwrap();
        let back = StorageManager::load(&backend).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn load_of_missing_blob_is_empty_list() {
        let backend = MemoryBackend::new();
        let list = StorageManager::load(&backend).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn strict_load_propagates_corruption() {
        let backend = MemoryBackend::with_blob("{definitely not a watchlist");
        assert!(StorageManager::load(&backend).is_err());
    }

    #[test]
    fn load_or_empty_recovers_from_malformed_json() {
        let backend = MemoryBackend::with_blob("{definitely not a watchlist");
        let list = StorageManager::load_or_empty(&backend);
        assert!(list.is_empty());
    }

    #[test]
    fn load_or_empty_recovers_from_unsupported_version() {
        let backend = MemoryBackend::with_blob(r#"{"version": 99, "watchlist": []}"#);
        let list = StorageManager::load_or_empty(&backend);
        assert!(list.is_empty());
    }

    #[test]
    fn file_round_trip_through_manager() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        let list = sample_list();

        let writer = FileBackend::new(&path);
        StorageManager::save(&writer, &list).unwrap();

        let reader = FileBackend::new(&path);
        assert_eq!(StorageManager::load(&reader).unwrap(), list);
    }
}
