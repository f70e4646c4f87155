use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::actions::calendar::push_icon;
use crate::host::DeckConnection;
use crate::models::appointment::Appointment;

/// Sleep until `when`, or until the cancellation channel fires. Returns true
/// when the full delay elapsed, false when it was cancelled.
pub async fn delay_until(when: DateTime<Utc>, cancel: &mut watch::Receiver<bool>) -> bool {
    let wait = (when - Utc::now()).to_std().unwrap_or_default();
    tokio::select! {
        _ = sleep(wait) => true,
        _ = cancel.changed() => false,
    }
}

/// Tight render loop for the final minute: redraw every 250 ms so the flash
/// animates, stop once the start time passes, then render once more so the
/// key lands on the started state. Bounded by the cancellation channel.
pub async fn run_countdown(
    connection: Arc<dyn DeckConnection>,
    appointment: Appointment,
    tz: Tz,
    mut cancel: watch::Receiver<bool>,
) {
    while appointment.start >= Utc::now() {
        let _ = push_icon(connection.as_ref(), &appointment, tz, Utc::now()).await;
        tokio::select! {
            _ = sleep(Duration::from_millis(250)) => {}
            _ = cancel.changed() => return,
        }
    }
    let _ = push_icon(connection.as_ref(), &appointment, tz, Utc::now()).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[tokio::test]
    async fn elapsed_delay_completes() {
        let (_tx, mut rx) = watch::channel(false);
        assert!(delay_until(Utc::now() - ChronoDuration::seconds(1), &mut rx).await);
    }

    #[tokio::test]
    async fn cancelled_delay_reports_cancellation() {
        let (tx, mut rx) = watch::channel(false);
        let _ = tx.send(true);
        assert!(!delay_until(Utc::now() + ChronoDuration::seconds(30), &mut rx).await);
    }
}
