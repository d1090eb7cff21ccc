//! File-based configuration loading.

use corelib::{Pnid, SharedRegistry};
use nodeconf::{load_registry, reload, ClusterDocument, ConfigSource, JsonSource, LoadError};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// Write `text` into a fresh directory. The directory goes away when the
/// returned guard drops, including on a failed assertion.
fn write_config(text: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nodes.json");
    std::fs::write(&path, text).unwrap();
    (dir, path)
}

const CLUSTER: &str = r#"{
    "registry": { "max_nodes": 4, "overlap_policy": "reject" },
    "nodes": [
        { "pnid": 0, "name": "n000", "excluded_cores": { "first": 0, "last": 0 } },
        { "pnid": 1, "name": "n001" }
    ],
    "spares": [
        { "pnid": 2, "name": "n002", "backs": [0, 1] }
    ]
}"#;

#[test]
fn test_load_from_file() {
    let (_dir, path) = write_config(CLUSTER);
    let source = JsonSource::from_path(&path);
    let registry = load_registry(&source).unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.find_pnid_by_name("n002"), Some(Pnid(2)));
    assert_eq!(
        registry.find_by_name("n000").unwrap().excluded_cores().last,
        0
    );
    assert_eq!(registry.compute_spare_set("n000").len(), 3);
}

#[test]
fn test_overlap_policy_from_document() {
    let mut doc = ClusterDocument::from_json(CLUSTER).unwrap();
    doc.spares.push(nodeconf::SpareEntry {
        pnid: Pnid(3),
        name: "n003".to_string(),
        excluded_cores: Default::default(),
        backs: vec![Pnid(1)],
    });

    let err = nodeconf::build_registry(&doc).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Registry {
            source: corelib::Error::SpareConflict { .. },
            ..
        }
    ));
}

#[test]
fn test_reload_shared_registry() {
    let shared = SharedRegistry::new(load_registry(&JsonSource::from_text(CLUSTER)).unwrap());

    let mut doc = ClusterDocument::from_json(CLUSTER).unwrap();
    doc.spares[0].backs = vec![Pnid(1)];
    reload(&doc, &mut shared.write()).unwrap();

    let set = shared.spare_set("n000");
    assert!(set.is_empty());
    assert_eq!(shared.spare_set("n001").len(), 2);
}

#[test]
fn test_garbage_file() {
    let (_dir, path) = write_config("not json");
    let source = JsonSource::from_path(&path);
    assert!(matches!(source.load(), Err(LoadError::Parse(_))));
}

#[test]
fn test_config_file_removed_with_guard() {
    let (dir, path) = write_config(CLUSTER);
    assert!(load_registry(&JsonSource::from_path(&path)).is_ok());

    drop(dir);
    assert!(!path.exists());
    assert!(matches!(
        JsonSource::from_path(&path).load(),
        Err(LoadError::Io { .. })
    ));
}
