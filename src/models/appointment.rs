use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusyStatus {
    Free,
    Tentative,
    Busy,
    OutOfOffice,
    WorkingElsewhere,
}

/// Immutable appointment snapshot. The whole set is replaced on every
/// calendar refresh; nothing is updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default)]
    pub id: String,
    pub subject: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default = "default_busy")]
    pub busy_status: BusyStatus,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub online_meeting_link: Option<String>,
}

fn default_busy() -> BusyStatus {
    BusyStatus::Busy
}

impl Appointment {
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes)
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.duration()
    }
}

/// Per-action calendar settings: which busy-status categories are allowed
/// past the selector. All excluded by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPolicy {
    #[serde(default)]
    pub out_of_office: bool,
    #[serde(default)]
    pub free: bool,
    #[serde(default)]
    pub all_day: bool,
}
