use lineage_sync::BaselineStore;
use lineage_types::ChangeTime;

const URL: &str = "https://tree.example.org/api";

#[test]
fn missing_remote_loads_none() {
    let store = BaselineStore::open_in_memory().unwrap();
    assert_eq!(store.load(URL).unwrap(), None);
}

#[test]
fn save_then_load_roundtrips() {
    let store = BaselineStore::open_in_memory().unwrap();
    store
        .save(URL, "margaret", ChangeTime::from_seconds(1_650_000_000))
        .unwrap();
    assert_eq!(
        store.load(URL).unwrap(),
        Some(ChangeTime::from_seconds(1_650_000_000))
    );
}

#[test]
fn saving_again_overwrites() {
    let store = BaselineStore::open_in_memory().unwrap();
    store.save(URL, "margaret", ChangeTime::from_seconds(100)).unwrap();
    store.save(URL, "margaret", ChangeTime::from_seconds(200)).unwrap();
    assert_eq!(store.load(URL).unwrap(), Some(ChangeTime::from_seconds(200)));
}

#[test]
fn baselines_are_scoped_by_remote_url() {
    // Pointing the client at a different server must not inherit the old
    // server's baseline.
    let store = BaselineStore::open_in_memory().unwrap();
    store.save(URL, "margaret", ChangeTime::from_seconds(100)).unwrap();
    assert_eq!(store.load("https://other.example.org").unwrap(), None);
}

#[test]
fn clear_forgets_a_remote() {
    let store = BaselineStore::open_in_memory().unwrap();
    store.save(URL, "margaret", ChangeTime::from_seconds(100)).unwrap();
    store.clear(URL).unwrap();
    assert_eq!(store.load(URL).unwrap(), None);
}

#[test]
fn clearing_an_unknown_remote_is_fine() {
    let store = BaselineStore::open_in_memory().unwrap();
    store.clear(URL).unwrap();
}

#[test]
fn baselines_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("baselines.db");
    let path = path.to_str().unwrap();

    {
        let store = BaselineStore::new(path).unwrap();
        store.save(URL, "margaret", ChangeTime::from_seconds(42)).unwrap();
    }

    let reopened = BaselineStore::new(path).unwrap();
    assert_eq!(reopened.load(URL).unwrap(), Some(ChangeTime::from_seconds(42)));
}
