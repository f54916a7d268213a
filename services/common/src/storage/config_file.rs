//! Runtime configuration persisted as a single JSON document

use super::ConfigStore;
use crate::errors::ConfigStoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::info;

/// JSON object file, rewritten atomically on every `set`
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl FileConfigStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ConfigStoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = values.len(), "Opened config store");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, ConfigStoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), ConfigStoreError> {
        let mut values = self.values.write().await;
        let mut next = values.clone();
        next.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let mut handle = fs::File::create(&tmp).await?;
        handle.write_all(&serde_json::to_vec_pretty(&next)?).await?;
        handle.sync_all().await?;
        fs::rename(&tmp, &self.path).await?;

        *values = next;
        Ok(())
    }
}
