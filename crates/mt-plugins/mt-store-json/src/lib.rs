//! # mt-store-json
//! mistake-tracker/crates/mt-plugins/mt-store-json/src/lib.rs
//! Single-document JSON implementation of `MistakeRepo`.
//!
//! Every operation loads the whole collection, works on it in memory and, for
//! mutations, writes the whole collection back. There is no locking: two
//! concurrent mutations race and the last save wins. Each individual save is
//! torn-free (temp file + rename).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mt_core::{
    collect_topics, compute_analytics, filter_and_sort, now_timestamp, AnalyticsSnapshot,
    Mistake, MistakeFilter, MistakePatch, MistakeRepo, NewMistake, Result,
};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub struct JsonMistakeStore {
    /// Backing document (e.g. "./data/mistakes.json")
    path: PathBuf,
}

impl JsonMistakeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Like [`JsonMistakeStore::new`], but also creates the parent directory.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// "<file>.tmp" next to the backing document.
    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Reads the full collection. A missing, unreadable or malformed
    /// document is an empty collection.
    async fn load(&self) -> Vec<Mistake> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable mistake store, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(mistakes) => mistakes,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "malformed mistake store, treating as empty");
                Vec::new()
            }
        }
    }

    /// Replaces the backing document with `mistakes`.
    async fn save(&self, mistakes: &[Mistake]) -> Result<()> {
        let content = serde_json::to_vec_pretty(mistakes)?;
        let tmp = self.tmp_path();

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), count = mistakes.len(), "mistake store saved");
        Ok(())
    }
}

#[async_trait]
impl MistakeRepo for JsonMistakeStore {
    async fn list(&self, filter: MistakeFilter) -> Result<Vec<Mistake>> {
        Ok(filter_and_sort(self.load().await, &filter))
    }

    async fn get(&self, id: &str) -> Result<Option<Mistake>> {
        Ok(self.load().await.into_iter().find(|m| m.id == id))
    }

    async fn add(&self, input: NewMistake) -> Result<Mistake> {
        let mut mistakes = self.load().await;
        let mistake = Mistake::from_new(input, Uuid::new_v4().to_string(), now_timestamp());

        mistakes.push(mistake.clone());
        self.save(&mistakes).await?;
        tracing::info!(id = %mistake.id, topic = %mistake.topic, "mistake added");
        Ok(mistake)
    }

    async fn update(&self, id: &str, patch: MistakePatch) -> Result<Option<Mistake>> {
        let mut mistakes = self.load().await;
        let Some(mistake) = mistakes.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };

        mistake.apply_patch(patch, now_timestamp());
        let updated = mistake.clone();
        self.save(&mistakes).await?;
        tracing::info!(id = %id, "mistake updated");
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut mistakes = self.load().await;
        let before = mistakes.len();
        mistakes.retain(|m| m.id != id);

        if mistakes.len() == before {
            return Ok(false);
        }
        self.save(&mistakes).await?;
        tracing::info!(id = %id, "mistake deleted");
        Ok(true)
    }

    async fn topics(&self) -> Result<Vec<String>> {
        Ok(collect_topics(&self.load().await))
    }

    async fn analytics(&self) -> Result<AnalyticsSnapshot> {
        Ok(compute_analytics(&self.load().await))
    }
}
