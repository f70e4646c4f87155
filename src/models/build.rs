use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Unknown,
}

impl BuildResult {
    // Jenkins reports `result` as an uppercase string, or null while a build runs.
    pub fn from_jenkins(raw: Option<&str>) -> Self {
        match raw {
            Some("SUCCESS") => BuildResult::Success,
            Some("FAILURE") => BuildResult::Failure,
            Some("UNSTABLE") => BuildResult::Unstable,
            _ => BuildResult::Unknown,
        }
    }
}

/// Snapshot of the most recent build of a job, assembled once per poll cycle.
#[derive(Debug, Clone)]
pub struct BuildStatus {
    pub job_name: String,
    pub number: i64,
    pub in_progress: bool,
    pub result: BuildResult,
    pub timestamp_ms: i64,
    pub estimated_duration_ms: i64,
    pub queued: bool,
    pub badge_text: Option<String>,
}
