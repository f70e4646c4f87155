use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::host::DeckAction;

/// Coarse host-tick driver: calls `on_tick` on the action at a fixed cadence.
/// Actions that want coarser scheduling gate internally (see `minute_changed`).
pub async fn run_tick_loop(action: Arc<Mutex<dyn DeckAction>>, period: Duration) {
    loop {
        sleep(period).await;
        action.lock().await.on_tick().await;
    }
}

/// Fires at most once per wall-clock minute: true when the minute-of-hour
/// differs from the last value seen, updating it in passing.
pub fn minute_changed(last: &mut Option<u32>, now: DateTime<Utc>) -> bool {
    let minute = now.minute();
    if *last == Some(minute) {
        return false;
    }
    *last = Some(minute);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};

    #[test]
    fn fires_once_per_minute() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 5).unwrap();
        let mut last = None;

        assert!(minute_changed(&mut last, start));
        assert!(!minute_changed(&mut last, start + ChronoDuration::seconds(30)));
        assert!(minute_changed(&mut last, start + ChronoDuration::seconds(60)));
        assert!(!minute_changed(&mut last, start + ChronoDuration::seconds(61)));
    }
}
