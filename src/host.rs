use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

/// Host-side surface a key action talks back to: the key image and the
/// persisted settings blob.
#[async_trait]
pub trait DeckConnection: Send + Sync {
    async fn set_image(&self, data_uri: &str) -> Result<(), String>;
    async fn set_default_image(&self) -> Result<(), String>;
    async fn save_settings(&self, settings: Value) -> Result<(), String>;
}

/// The methods the host event loop calls on a key action.
#[async_trait]
pub trait DeckAction: Send {
    async fn key_pressed(&mut self);
    async fn key_released(&mut self);
    async fn on_tick(&mut self);
    async fn received_settings(&mut self, payload: Value);
}

pub trait UrlOpener: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), String>;
}

pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&self, url: &str) -> Result<(), String> {
        open::that(url).map_err(|e| format!("Failed to open {}: {}", url, e))
    }
}

/// Standalone stand-in for the deck hardware: the current icon lives in a
/// file, the default image is its absence.
pub struct FileConnection {
    path: PathBuf,
}

impl FileConnection {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DeckConnection for FileConnection {
    async fn set_image(&self, data_uri: &str) -> Result<(), String> {
        let svg = data_uri
            .strip_prefix("data:image/svg+xml;charset=utf8,")
            .unwrap_or(data_uri);
        tokio::fs::write(&self.path, svg)
            .await
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))
    }

    async fn set_default_image(&self) -> Result<(), String> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to reset {}: {}", self.path.display(), e)),
        }
    }

    async fn save_settings(&self, settings: Value) -> Result<(), String> {
        log::debug!("Settings persisted: {}", settings);
        Ok(())
    }
}
