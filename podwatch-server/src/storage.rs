use std::path::Path;

use podwatch::StoredPodcast;
use rand::Rng;

const PODCASTS_TREE: &str = "podcasts";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sled::Error),
    #[error("record serialization failed: {0}")]
    Codec(#[from] std::io::Error),
}

/// Cloneable handle over the sled database. Opened once at startup and
/// injected into the router state; single-document writes are atomic, which
/// is all the mutation model needs.
#[derive(Clone)]
pub struct PodcastStore {
    db: sled::Db,
}

impl PodcastStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        db.open_tree(PODCASTS_TREE)?;
        Ok(PodcastStore { db })
    }

    /// In-memory store for tests; nothing touches the filesystem.
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        db.open_tree(PODCASTS_TREE)?;
        Ok(PodcastStore { db })
    }

    fn tree(&self) -> Result<sled::Tree, StoreError> {
        Ok(self.db.open_tree(PODCASTS_TREE)?)
    }

    pub fn get(&self, id: &str) -> Result<Option<StoredPodcast>, StoreError> {
        let tree = self.tree()?;
        match tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(borsh::from_slice::<StoredPodcast>(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put(&self, record: &StoredPodcast) -> Result<(), StoreError> {
        let tree = self.tree()?;
        let bytes = borsh::to_vec(record)?;
        tree.insert(record.podcast.id.as_bytes(), bytes)?;
        Ok(())
    }

    /// Returns whether a record was actually removed.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let tree = self.tree()?;
        Ok(tree.remove(id.as_bytes())?.is_some())
    }

    pub fn all(&self) -> Result<Vec<StoredPodcast>, StoreError> {
        let tree = self.tree()?;
        Ok(tree
            .iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|(_key, bytes)| borsh::from_slice::<StoredPodcast>(&bytes).ok())
            .collect())
    }
}

/// Server-assigned opaque id: 12 random bytes, hex-encoded.
pub fn new_id() -> String {
    let mut bytes = [0u8; 12];
    rand::thread_rng().fill(&mut bytes);
    let mut out = vec![0u8; bytes.len() * 2];
    faster_hex::hex_encode(&bytes, &mut out).expect("hex encode");
    String::from_utf8(out).expect("utf8")
}
