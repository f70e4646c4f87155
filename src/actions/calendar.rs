use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Months, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use tokio::sync::{watch, Mutex};

use crate::clients::calendar::CalendarStore;
use crate::host::{DeckAction, DeckConnection, UrlOpener};
use crate::models::appointment::{Appointment, FilterPolicy};
use crate::service::icon::{
    appointment_time_string, countdown_background, countdown_text_color, data_uri,
    render_appointment_icon,
};
use crate::service::next_appointment::select_next;
use crate::tasks::countdown::{delay_until, run_countdown};

/// Key action counting down to the next calendar appointment. Refreshes are
/// driven by store-change events rather than polling; the appointment
/// snapshot is guarded because changes can land mid-selection.
pub struct CalendarAction {
    policy: FilterPolicy,
    store: Arc<dyn CalendarStore>,
    connection: Arc<dyn DeckConnection>,
    opener: Arc<dyn UrlOpener>,
    tz: Tz,
    snapshot: Arc<Mutex<Vec<Appointment>>>,
    next: Option<Appointment>,
    cancel: Option<watch::Sender<bool>>,
}

impl CalendarAction {
    pub fn new(
        policy: FilterPolicy,
        store: Arc<dyn CalendarStore>,
        connection: Arc<dyn DeckConnection>,
        opener: Arc<dyn UrlOpener>,
        tz: Tz,
    ) -> Self {
        Self {
            policy,
            store,
            connection,
            opener,
            tz,
            snapshot: Arc::new(Mutex::new(Vec::new())),
            next: None,
            cancel: None,
        }
    }

    pub fn selected(&self) -> Option<&Appointment> {
        self.next.as_ref()
    }

    /// Refetch the forward window, replace the snapshot wholesale, pick the
    /// next appointment and re-arm the alert. Fetch failures skip the cycle
    /// and leave the current icon alone.
    pub async fn load_appointments(&mut self) {
        if let Err(e) = self.try_load(Utc::now()).await {
            log::warn!("Calendar refresh skipped: {}", e);
        }
    }

    async fn try_load(&mut self, now: DateTime<Utc>) -> Result<(), String> {
        let window_start = now
            .date_naive()
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        let window_end = window_start + Months::new(3);
        let fetched = self.store.find_appointments(window_start, window_end).await?;
        {
            let mut snapshot = self.snapshot.lock().await;
            *snapshot = fetched;
        }

        let selected = {
            let snapshot = self.snapshot.lock().await;
            select_next(&snapshot, &self.policy, now)
        };
        let Some(selected) = selected else {
            self.clear_alert();
            self.next = None;
            return self.connection.set_default_image().await;
        };

        // Re-resolve the chosen appointment so subject and meeting link are
        // fully populated before rendering.
        let resolved = self
            .store
            .appointment_detail(&selected.id, selected.start)
            .await?
            .unwrap_or(selected);
        self.schedule_alert(resolved, now).await
    }

    fn clear_alert(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
    }

    /// Arm the countdown for one appointment, always cancelling whatever was
    /// armed before so two render loops never race for the key.
    async fn schedule_alert(
        &mut self,
        appointment: Appointment,
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        self.next = Some(appointment.clone());
        self.clear_alert();
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(tx);

        let to_start = appointment.start - now;
        if to_start > Duration::zero() {
            let connection = Arc::clone(&self.connection);
            let tz = self.tz;
            if to_start < Duration::minutes(1) {
                tokio::spawn(run_countdown(connection, appointment, tz, rx));
                return Ok(());
            }
            let alert_at = appointment.start - Duration::minutes(1);
            let pending = appointment.clone();
            tokio::spawn(async move {
                let mut rx = rx;
                if delay_until(alert_at, &mut rx).await {
                    run_countdown(connection, pending, tz, rx).await;
                }
            });
        }
        push_icon(self.connection.as_ref(), &appointment, self.tz, now).await
    }
}

/// Render the countdown icon for one appointment and hand it to the sink.
pub async fn push_icon(
    connection: &dyn DeckConnection,
    appointment: &Appointment,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<(), String> {
    let background = countdown_background(appointment.start, now);
    let text_color = countdown_text_color(background);
    let time_string = appointment_time_string(appointment, now, tz);
    let svg = render_appointment_icon(&appointment.subject, &time_string, background, text_color);
    connection.set_image(&data_uri(&svg)).await
}

#[async_trait]
impl DeckAction for CalendarAction {
    async fn key_pressed(&mut self) {
        let Some(next) = &self.next else {
            return;
        };
        // An imminent meeting with a link opens the link directly; anything
        // else goes to the appointment details view.
        let imminent = next.start - Utc::now() < Duration::minutes(5);
        if let (Some(link), true) = (&next.online_meeting_link, imminent) {
            if let Err(e) = self.opener.open_url(link) {
                log::warn!("{}", e);
            }
        } else if let Err(e) = self.store.show_details(&next.id).await {
            log::warn!("{}", e);
        }
    }

    async fn key_released(&mut self) {
        // Nothing to do on release.
    }

    async fn on_tick(&mut self) {
        // Refreshes are store-change driven; the host tick is unused here.
    }

    async fn received_settings(&mut self, payload: Value) {
        match serde_json::from_value::<FilterPolicy>(payload) {
            Ok(policy) => self.policy = policy,
            Err(e) => {
                log::warn!("Ignoring malformed calendar settings: {}", e);
                return;
            }
        }
        if let Ok(value) = serde_json::to_value(self.policy) {
            if let Err(e) = self.connection.save_settings(value).await {
                log::warn!("{}", e);
            }
        }
        self.load_appointments().await;
    }
}
