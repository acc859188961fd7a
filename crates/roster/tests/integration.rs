use std::sync::Arc;

use roster::{
    column_path, column_value, document_path, DiskStorage, DocumentStore, InMemoryStorage, RosterError,
    RosterStore, Storage, DAY_FILE, NAME_FILE, PHONE_FILE, ROLL_FILE, SECTION_FILE, URL_FILE,
};

fn seed(storage: &InMemoryStorage, dataset: &str, with_day: bool) {
    storage.insert(&column_path(dataset, ROLL_FILE), "R1\nR2\n\nR3\n");
    storage.insert(&column_path(dataset, NAME_FILE), " Asha \nBilal\nChen");
    storage.insert(
        &column_path(dataset, URL_FILE),
        "https://leetcode.com/u/asha/\nnot-a-profile\nhttps://leetcode.com/u/chen",
    );
    storage.insert(&column_path(dataset, SECTION_FILE), "A\nB\nA");
    storage.insert(&column_path(dataset, PHONE_FILE), "900\n901\n902");
    if with_day {
        storage.insert(&column_path(dataset, DAY_FILE), "Mon\nTue\nWed");
    }
}

#[test]
fn test_load_trims_and_drops_blank_lines() {
    let mem = InMemoryStorage::new();
    seed(&mem, "January", true);
    let store = RosterStore::new(Arc::new(mem));

    let roster = store.load("January").unwrap();
    assert_eq!(roster.rows.len(), 3);
    assert_eq!(roster.rows[0].name, "Asha");
    assert_eq!(roster.rows[2].identifier, "R3");
    assert_eq!(roster.rows[1].day, "Tue");
    assert_eq!(roster.find("R2"), Some(1));
    assert_eq!(roster.find("r2"), None);
}

#[test]
fn test_day_column_is_optional() {
    let mem = InMemoryStorage::new();
    seed(&mem, "Second", false);
    let store = RosterStore::new(Arc::new(mem));

    let roster = store.load("Second").unwrap();
    assert_eq!(roster.rows.len(), 3);
    assert!(roster.rows.iter().all(|r| r.day.is_empty()));
}

#[test]
fn test_shape_mismatch_is_an_error() {
    let mem = InMemoryStorage::new();
    seed(&mem, "September", true);
    mem.insert(&column_path("September", PHONE_FILE), "900\n901");
    let store = RosterStore::new(Arc::new(mem));

    match store.load("September") {
        Err(RosterError::ShapeMismatch { dataset, counts }) => {
            assert_eq!(dataset, "September");
            assert!(counts.contains("mobno.txt=2"));
        }
        other => panic!("expected shape mismatch, got {other:?}"),
    }
}

#[test]
fn test_mismatched_day_column_is_an_error() {
    let mem = InMemoryStorage::new();
    seed(&mem, "September", true);
    mem.insert(&column_path("September", DAY_FILE), "Mon");
    let store = RosterStore::new(Arc::new(mem));

    assert!(matches!(store.load("September"), Err(RosterError::ShapeMismatch { .. })));
}

#[test]
fn test_missing_column_is_read_failure() {
    let mem = InMemoryStorage::new();
    let store = RosterStore::new(Arc::new(mem));

    assert!(matches!(store.load("January"), Err(RosterError::ReadFailed { .. })));
}

#[test]
fn test_replace_profile_url_rewrites_whole_column() {
    let mem = InMemoryStorage::new();
    seed(&mem, "January", true);
    let store = RosterStore::new(Arc::new(mem.clone()));

    store
        .replace_profile_url("January", 1, "https://leetcode.com/u/bilal/")
        .unwrap();

    assert_eq!(
        mem.get(&column_path("January", URL_FILE)).unwrap(),
        "https://leetcode.com/u/asha/\nhttps://leetcode.com/u/bilal/\nhttps://leetcode.com/u/chen"
    );
    assert_eq!(mem.write_count(), 1);
    let roster = store.load("January").unwrap();
    assert_eq!(roster.rows[1].profile_url, "https://leetcode.com/u/bilal/");
    assert_eq!(roster.rows[1].name, "Bilal");
}

#[test]
fn test_replace_out_of_range_writes_nothing() {
    let mem = InMemoryStorage::new();
    seed(&mem, "January", true);
    let store = RosterStore::new(Arc::new(mem.clone()));

    let err = store.replace_profile_url("January", 3, "x").unwrap_err();
    assert!(matches!(err, RosterError::RowOutOfRange { index: 3, len: 3, .. }));
    assert_eq!(mem.write_count(), 0);
}

#[test]
fn test_replace_rejects_values_the_loader_cannot_read_back() {
    let mem = InMemoryStorage::new();
    seed(&mem, "January", true);
    let store = RosterStore::new(Arc::new(mem.clone()));

    for bad in ["", "   ", "https://leetcode.com/u/x\nhttps://leetcode.com/u/y", "a\rb"] {
        let err = store.replace_profile_url("January", 0, bad).unwrap_err();
        assert!(matches!(err, RosterError::InvalidValue { .. }), "{bad:?}: {err:?}");
    }
    assert_eq!(mem.write_count(), 0);
    assert_eq!(store.load("January").unwrap().rows.len(), 3);
}

#[test]
fn test_replace_trims_the_new_url() {
    let mem = InMemoryStorage::new();
    seed(&mem, "January", true);
    let store = RosterStore::new(Arc::new(mem.clone()));

    store
        .replace_profile_url("January", 0, "  https://leetcode.com/u/zed \t")
        .unwrap();
    assert_eq!(store.load("January").unwrap().rows[0].profile_url, "https://leetcode.com/u/zed");
}

#[test]
fn test_column_value_normalizes() {
    assert_eq!(column_value(" not-a-profile ").unwrap(), "not-a-profile");
    assert!(column_value("\t").is_err());
    assert!(column_value("x\ny").is_err());
}

#[test]
fn test_disk_storage_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let disk = DiskStorage::new(dir.path());

    assert!(!disk.exists("details_January/roll.txt"));
    disk.write("details_January/roll.txt", "R1\nR2").unwrap();
    assert!(disk.exists("details_January/roll.txt"));
    assert_eq!(disk.read("details_January/roll.txt").unwrap(), "R1\nR2");

    // no temp file left behind
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("details_January"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_documents_are_pretty_and_missing_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let docs = DocumentStore::new(Arc::new(DiskStorage::new(dir.path())));

    assert!(docs.load_entries("January").unwrap().is_none());

    let entries = vec![serde_json::json!({"roll": "R1", "totalSolved": 3})];
    docs.save("January", &entries).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(document_path("January"))).unwrap();
    assert!(raw.starts_with("[\n  {"));
    assert_eq!(docs.load_entries("January").unwrap().unwrap(), entries);
}

#[test]
fn test_malformed_document_is_reported() {
    let mem = InMemoryStorage::new();
    mem.insert(&document_path("January"), "{not json");
    let docs = DocumentStore::new(Arc::new(mem));

    assert!(matches!(
        docs.load_entries("January"),
        Err(roster::DocumentError::Malformed { .. })
    ));
}
