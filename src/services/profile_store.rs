//! User profile persisted as a JSON document

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::AppError;
use crate::model::UserProfile;
use super::favorites::write_atomically;
use super::UserStore;

pub struct JsonUserStore {
    path: PathBuf,
}

impl JsonUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn save(&self, profile: &UserProfile) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(AppError::persistence)?;
        }
        let content = serde_json::to_string_pretty(profile).map_err(AppError::persistence)?;
        write_atomically(&self.path, content.as_bytes()).await?;
        tracing::info!(path = %self.path.display(), "Profile saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<UserProfile>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(AppError::persistence)?;
        let profile = serde_json::from_str(&content).map_err(AppError::persistence)?;
        Ok(Some(profile))
    }
}
