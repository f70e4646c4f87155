use chrono::{DateTime, Duration, Utc};

use crate::models::appointment::{Appointment, BusyStatus, FilterPolicy};

/// Filter and rank a snapshot. `not_started` restricts to appointments that
/// have not begun; otherwise anything that has not ended yet qualifies.
/// The result is sorted ascending by start time.
pub fn next_appointments(
    snapshot: &[Appointment],
    policy: &FilterPolicy,
    now: DateTime<Utc>,
    not_started: bool,
    count: usize,
) -> Vec<Appointment> {
    let mut candidates: Vec<Appointment> = snapshot
        .iter()
        .filter(|a| !a.cancelled)
        .filter(|a| policy.out_of_office || a.busy_status != BusyStatus::OutOfOffice)
        .filter(|a| policy.free || a.busy_status != BusyStatus::Free)
        .filter(|a| policy.all_day || !a.all_day)
        .filter(|a| {
            if not_started {
                a.start > now
            } else {
                a.end() >= now
            }
        })
        .cloned()
        .collect();
    candidates.sort_by_key(|a| a.start);
    candidates.truncate(count);
    candidates
}

/// Pick the next relevant appointment. An appointment that has started and is
/// almost over (within min(15, duration/2) minutes of its end) yields to the
/// next not-yet-started one, so the key does not count down to a meeting
/// that is effectively finished.
pub fn select_next(
    snapshot: &[Appointment],
    policy: &FilterPolicy,
    now: DateTime<Utc>,
) -> Option<Appointment> {
    let next = next_appointments(snapshot, policy, now, false, 1)
        .into_iter()
        .next()?;

    if next.start < now && almost_over(&next, now) {
        if let Some(upcoming) = next_appointments(snapshot, policy, now, true, 1)
            .into_iter()
            .next()
        {
            return Some(upcoming);
        }
    }
    Some(next)
}

fn almost_over(appointment: &Appointment, now: DateTime<Utc>) -> bool {
    let threshold = Duration::seconds((appointment.duration_minutes * 30).min(15 * 60));
    appointment.end() < now + threshold
}
