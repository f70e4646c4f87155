use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tokio::sync::{mpsc, Mutex};

use crate::actions::calendar::CalendarAction;
use crate::actions::jenkins::{JenkinsAction, JenkinsSettings};
use crate::clients::calendar::{CalendarStore, JsonFileStore};
use crate::host::{DeckAction, FileConnection, SystemOpener};
use crate::models::appointment::FilterPolicy;
use crate::tasks::tick_loop::run_tick_loop;

const HOST_TICK: Duration = Duration::from_secs(1);
const STORE_POLL: Duration = Duration::from_secs(30);

pub struct JenkinsOptions {
    pub settings: JenkinsSettings,
    pub icon_path: PathBuf,
}

pub struct CalendarOptions {
    pub calendar_file: PathBuf,
    pub policy: FilterPolicy,
    pub tz: Tz,
    pub icon_path: PathBuf,
}

/// Wire up and run the configured actions until the process is stopped.
pub async fn run(jenkins: Option<JenkinsOptions>, calendar: Option<CalendarOptions>) {
    let mut handles = Vec::new();

    if let Some(opts) = jenkins {
        log::info!("Watching Jenkins job {}", opts.settings.job_name);
        let connection = Arc::new(FileConnection::new(opts.icon_path));
        let action = JenkinsAction::new(opts.settings, connection, Arc::new(SystemOpener));
        let action: Arc<Mutex<dyn DeckAction>> = Arc::new(Mutex::new(action));
        handles.push(tokio::spawn(run_tick_loop(action, HOST_TICK)));
    }

    if let Some(opts) = calendar {
        log::info!("Watching calendar file {}", opts.calendar_file.display());
        let store = Arc::new(JsonFileStore::new(opts.calendar_file));
        let (tx, mut rx) = mpsc::channel(8);
        handles.push(store.spawn_watcher(tx, STORE_POLL));

        let connection = Arc::new(FileConnection::new(opts.icon_path));
        let action = Arc::new(Mutex::new(CalendarAction::new(
            opts.policy,
            Arc::clone(&store) as Arc<dyn CalendarStore>,
            connection,
            Arc::new(SystemOpener),
            opts.tz,
        )));

        action.lock().await.load_appointments().await;
        handles.push(tokio::spawn(async move {
            while rx.recv().await.is_some() {
                action.lock().await.load_appointments().await;
            }
        }));
    }

    if handles.is_empty() {
        log::warn!("Nothing to run: neither Jenkins nor calendar is configured");
        return;
    }
    for handle in handles {
        let _ = handle.await;
    }
}
