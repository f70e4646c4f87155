use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::sleep;
use uuid::Uuid;

use crate::models::appointment::Appointment;

/// Emitted on the change channel whenever the underlying store content moves.
#[derive(Debug, Clone, Copy)]
pub struct StoreChanged;

#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// All appointments intersecting the window, unfiltered and unsorted.
    async fn find_appointments(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, String>;

    /// Resolve the full record for one appointment so subject and meeting
    /// link are populated before rendering.
    async fn appointment_detail(
        &self,
        id: &str,
        start: DateTime<Utc>,
    ) -> Result<Option<Appointment>, String>;

    /// Open the native appointment-details view, where one exists.
    async fn show_details(&self, id: &str) -> Result<(), String>;
}

/// Demo store backed by a JSON file holding an appointment array. Change
/// notification is mtime polling; good enough for a file a human edits.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_all(&self) -> Result<Vec<Appointment>, String> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", self.path.display(), e))?;
        let mut items: Vec<Appointment> =
            serde_json::from_str(&raw).map_err(|e| format!("Invalid appointment file: {}", e))?;
        for item in &mut items {
            if item.id.is_empty() {
                item.id = Uuid::new_v4().to_string();
            }
        }
        Ok(items)
    }

    async fn modified(&self) -> Option<SystemTime> {
        tokio::fs::metadata(&self.path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
    }

    /// Poll the file mtime and emit a change event whenever it moves.
    pub fn spawn_watcher(
        self: &Arc<Self>,
        tx: mpsc::Sender<StoreChanged>,
        poll_interval: std::time::Duration,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut last_seen = store.modified().await;
            loop {
                sleep(poll_interval).await;
                let current = store.modified().await;
                if current != last_seen {
                    last_seen = current;
                    if tx.send(StoreChanged).await.is_err() {
                        return;
                    }
                }
            }
        })
    }
}

#[async_trait]
impl CalendarStore for JsonFileStore {
    async fn find_appointments(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, String> {
        let all = self.read_all().await?;
        Ok(all
            .into_iter()
            .filter(|a| a.end() >= start && a.start <= end)
            .collect())
    }

    async fn appointment_detail(
        &self,
        id: &str,
        _start: DateTime<Utc>,
    ) -> Result<Option<Appointment>, String> {
        let all = self.read_all().await?;
        Ok(all.into_iter().find(|a| a.id == id))
    }

    async fn show_details(&self, id: &str) -> Result<(), String> {
        // The file store has no details view; log instead.
        log::info!("Appointment details requested for {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn write_store(appointments: &serde_json::Value) -> Arc<JsonFileStore> {
        let dir = std::env::temp_dir().join(format!("deckwatch_store_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("appointments.json");
        std::fs::write(&path, serde_json::to_string(appointments).unwrap()).unwrap();
        Arc::new(JsonFileStore::new(path))
    }

    #[tokio::test]
    async fn window_keeps_intersecting_appointments() {
        let store = write_store(&serde_json::json!([
            {"id": "past", "subject": "Old", "start": "2026-02-01T10:00:00Z", "duration_minutes": 30},
            {"id": "in", "subject": "Standup", "start": "2026-02-03T10:00:00Z", "duration_minutes": 15},
            {"id": "far", "subject": "Future", "start": "2026-09-01T10:00:00Z", "duration_minutes": 30}
        ]));

        let start = Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap();
        let found = store
            .find_appointments(start, start + Duration::days(90))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "in");
    }

    #[tokio::test]
    async fn detail_resolves_by_id_and_missing_ids_are_minted() {
        let store = write_store(&serde_json::json!([
            {"subject": "No id", "start": "2026-02-03T10:00:00Z", "duration_minutes": 15},
            {"id": "m1", "subject": "Planning", "start": "2026-02-03T12:00:00Z",
             "duration_minutes": 60, "online_meeting_link": "https://meet.example.com/m1"}
        ]));

        let start = Utc.with_ymd_and_hms(2026, 2, 3, 12, 0, 0).unwrap();
        let detail = store.appointment_detail("m1", start).await.unwrap().unwrap();
        assert_eq!(
            detail.online_meeting_link.as_deref(),
            Some("https://meet.example.com/m1")
        );

        let all = store
            .find_appointments(start - Duration::days(1), start + Duration::days(1))
            .await
            .unwrap();
        assert!(all.iter().all(|a| !a.id.is_empty()));
    }
}
