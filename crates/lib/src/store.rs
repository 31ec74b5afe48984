use crate::snapshot::Snapshot;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_KEY: &str = "pattis_images_v1";
pub const DEFAULT_MAX_ENTRIES: usize = 200;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid store key `{0}`")]
    InvalidKey(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// String values under string keys, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;
        // readers only ever see a complete list
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// The list of saved pattis kept under a single key, newest first.
#[derive(Debug)]
pub struct Gallery<S> {
    store: S,
    key: String,
    max_entries: usize,
}

impl<S: KeyValueStore> Gallery<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_key(store: S, key: impl Into<String>, max_entries: usize) -> Self {
        Self {
            store,
            key: key.into(),
            max_entries,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A corrupt list reads as empty rather than locking the user out.
    pub fn load_all(&self) -> Result<Vec<Snapshot>, StoreError> {
        let raw = match self.store.get(&self.key)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(error) => {
                warn!(key = %self.key, %error, "invalid patti store, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save_all(&mut self, mut items: Vec<Snapshot>) -> Result<(), StoreError> {
        items.truncate(self.max_entries);
        let raw = serde_json::to_string(&items)?;
        self.store.set(&self.key, raw)
    }

    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), StoreError> {
        let mut items = self.load_all()?;
        debug!(id = %snapshot.id, existing = items.len(), "saving patti");
        items.retain(|s| s.id != snapshot.id);
        items.insert(0, snapshot);
        self.save_all(items)
    }

    /// Returns whether an item with `id` was there.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut items = self.load_all()?;
        let before = items.len();
        items.retain(|s| s.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save_all(items)?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(&self.key)
    }

    /// Records where an item was uploaded. Returns whether it was found.
    pub fn set_remote_url(&mut self, id: &str, url: impl Into<String>) -> Result<bool, StoreError> {
        let mut items = self.load_all()?;
        let Some(item) = items.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        item.remote_url = Some(url.into());
        self.save_all(items)?;
        Ok(true)
    }

    /// Local items plus remote ones not already known locally by id or
    /// upload URL, newest first.
    pub fn merge_remote(&self, remote: Vec<Snapshot>) -> Result<Vec<Snapshot>, StoreError> {
        let mut items = self.load_all()?;
        let ids: HashSet<String> = items.iter().map(|s| s.id.clone()).collect();
        let urls: HashSet<String> = items.iter().filter_map(|s| s.remote_url.clone()).collect();

        items.extend(remote.into_iter().filter(|r| {
            !ids.contains(&r.id) && r.remote_url.as_ref().map_or(true, |u| !urls.contains(u))
        }));
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Distinct miller and party names seen in saved pattis, for suggestions.
    pub fn known_names(&self) -> Result<(Vec<String>, Vec<String>), StoreError> {
        let mut millers = BTreeSet::new();
        let mut parties = BTreeSet::new();
        for item in self.load_all()? {
            if !item.miller_name.trim().is_empty() {
                millers.insert(item.miller_name.trim().to_string());
            }
            if !item.party_name.trim().is_empty() {
                parties.insert(item.party_name.trim().to_string());
            }
        }
        Ok((millers.into_iter().collect(), parties.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snap(id: &str, millis: i64) -> Snapshot {
        Snapshot {
            id: id.to_string(),
            created_at: Utc.timestamp_millis_opt(millis).unwrap(),
            bill_no: String::new(),
            miller_name: String::new(),
            party_name: String::new(),
            image_ref: format!("img-{id}"),
            remote_url: None,
        }
    }

    #[test]
    fn push_keeps_newest_first() {
        let mut gallery = Gallery::new(MemoryStore::default());
        gallery.push(snap("a", 1)).unwrap();
        gallery.push(snap("b", 2)).unwrap();
        let ids = gallery
            .load_all()
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn push_caps_entries() {
        let mut gallery = Gallery::new(MemoryStore::default());
        for i in 0..(DEFAULT_MAX_ENTRIES as i64 + 5) {
            gallery.push(snap(&format!("p{i}"), i)).unwrap();
        }
        let items = gallery.load_all().unwrap();
        assert_eq!(items.len(), DEFAULT_MAX_ENTRIES);
        assert_eq!(items[0].id, format!("p{}", DEFAULT_MAX_ENTRIES + 4));
        assert_eq!(items.last().unwrap().id, "p5");
    }

    #[test]
    fn corrupt_store_reads_as_empty() {
        let mut store = MemoryStore::default();
        store.set(DEFAULT_KEY, "{not json".to_string()).unwrap();
        let mut gallery = Gallery::new(store);
        assert!(gallery.load_all().unwrap().is_empty());

        gallery.push(snap("a", 1)).unwrap();
        assert_eq!(gallery.load_all().unwrap().len(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut gallery = Gallery::new(MemoryStore::default());
        gallery.push(snap("a", 1)).unwrap();
        gallery.push(snap("b", 2)).unwrap();

        assert!(gallery.remove("a").unwrap());
        assert!(!gallery.remove("a").unwrap());
        assert_eq!(gallery.load_all().unwrap().len(), 1);

        gallery.clear().unwrap();
        assert!(gallery.load_all().unwrap().is_empty());
        assert_eq!(gallery.store().get(DEFAULT_KEY).unwrap(), None);
    }

    #[test]
    fn attaches_remote_url() {
        let mut gallery = Gallery::new(MemoryStore::default());
        gallery.push(snap("a", 1)).unwrap();
        assert!(gallery.set_remote_url("a", "https://cdn.test/a.png").unwrap());
        assert!(!gallery.set_remote_url("zz", "https://cdn.test/zz.png").unwrap());
        assert_eq!(
            gallery.load_all().unwrap()[0].remote_url.as_deref(),
            Some("https://cdn.test/a.png")
        );
    }

    #[test]
    fn merge_remote_skips_known_items() {
        let mut gallery = Gallery::new(MemoryStore::default());
        gallery.push(snap("a", 10)).unwrap();
        gallery.set_remote_url("a", "https://cdn.test/a.png").unwrap();

        let mut same_upload = snap("a-remote", 30);
        same_upload.remote_url = Some("https://cdn.test/a.png".into());
        let mut new_remote = snap("c", 20);
        new_remote.remote_url = Some("https://cdn.test/c.png".into());

        let merged = gallery
            .merge_remote(vec![snap("a", 10), same_upload, new_remote, snap("d", 5)])
            .unwrap();
        let ids = merged.into_iter().map(|s| s.id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["c", "a", "d"]);
    }

    #[test]
    fn known_names_are_distinct_and_sorted() {
        let mut gallery = Gallery::new(MemoryStore::default());
        for (id, miller, party) in [
            ("1", "Sri Lakshmi Mills", "Ravi Traders"),
            ("2", "Annapurna Mills ", "Ravi Traders"),
            ("3", "Sri Lakshmi Mills", ""),
        ] {
            let mut s = snap(id, 1);
            s.miller_name = miller.into();
            s.party_name = party.into();
            gallery.push(s).unwrap();
        }
        let (millers, parties) = gallery.known_names().unwrap();
        assert_eq!(millers, vec!["Annapurna Mills", "Sri Lakshmi Mills"]);
        assert_eq!(parties, vec!["Ravi Traders"]);
    }

    #[test]
    fn file_store_round_trips_gallery() {
        let dir = tempfile::tempdir().unwrap();
        let mut gallery = Gallery::new(FileStore::new(dir.path()));
        assert!(gallery.load_all().unwrap().is_empty());

        gallery.push(snap("a", 1)).unwrap();
        let reopened = Gallery::new(FileStore::new(dir.path()));
        assert_eq!(reopened.load_all().unwrap(), vec![snap("a", 1)]);
        assert!(dir.path().join(format!("{DEFAULT_KEY}.json")).exists());

        gallery.clear().unwrap();
        gallery.clear().unwrap();
        assert!(reopened.load_all().unwrap().is_empty());
    }

    #[test]
    fn file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.get("../escape"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
