//! Favourite ids persisted as a JSON array

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AppError;
use super::FavoritesStore;

/// File-backed favourites with an in-memory copy
#[derive(Clone)]
pub struct JsonFavoritesStore {
    path: PathBuf,
    ids: Arc<RwLock<HashSet<String>>>,
    loaded: Arc<RwLock<bool>>,
}

impl JsonFavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ids: Arc::new(RwLock::new(HashSet::new())),
            loaded: Arc::new(RwLock::new(false)),
        }
    }

    async fn ensure_loaded(&self) -> Result<(), AppError> {
        if *self.loaded.read().await {
            return Ok(());
        }

        let mut loaded = self.loaded.write().await;
        if *loaded {
            return Ok(());
        }

        if self.path.exists() {
            let content = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(AppError::persistence)?;
            let ids: Vec<String> = serde_json::from_str(&content).map_err(AppError::persistence)?;
            tracing::debug!(count = ids.len(), path = %self.path.display(), "Favourites loaded");
            *self.ids.write().await = ids.into_iter().collect();
        }
        *loaded = true;
        Ok(())
    }

    async fn save_to_disk(&self, ids: &HashSet<String>) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(AppError::persistence)?;
        }

        // Sorted so the file is stable between saves
        let mut sorted: Vec<&String> = ids.iter().collect();
        sorted.sort();
        let content = serde_json::to_string(&sorted).map_err(AppError::persistence)?;
        write_atomically(&self.path, content.as_bytes()).await
    }
}

pub(super) async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await.map_err(AppError::persistence)?;
    tokio::fs::rename(&tmp, path).await.map_err(AppError::persistence)?;
    Ok(())
}

#[async_trait]
impl FavoritesStore for JsonFavoritesStore {
    async fn toggle(&self, id: &str) -> Result<bool, AppError> {
        self.ensure_loaded().await?;

        let mut ids = self.ids.write().await;
        let now_favorite = if ids.remove(id) {
            false
        } else {
            ids.insert(id.to_string());
            true
        };

        if let Err(e) = self.save_to_disk(&ids).await {
            // Keep memory and disk in agreement
            if now_favorite {
                ids.remove(id);
            } else {
                ids.insert(id.to_string());
            }
            return Err(e);
        }

        tracing::info!(id, favorite = now_favorite, "Favourite toggled");
        Ok(now_favorite)
    }

    async fn current_set(&self) -> Result<HashSet<String>, AppError> {
        self.ensure_loaded().await?;
        Ok(self.ids.read().await.clone())
    }
}
