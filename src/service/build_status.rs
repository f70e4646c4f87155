use chrono::{DateTime, Utc};

use crate::models::build::{BuildResult, BuildStatus};
use crate::models::icon::{IconColor, IconSpec};

/// Map a build snapshot onto colors, text lines and an optional progress
/// fraction. Rules apply in priority order: a running build wins over any
/// recorded result.
pub fn build_icon_spec(status: &BuildStatus, now: DateTime<Utc>) -> IconSpec {
    let mut spec = IconSpec::solid(IconColor::Black, IconColor::White);

    if status.in_progress {
        spec.background = IconColor::Green;
        spec.lines.push("Running...".to_string());
    } else if status.result == BuildResult::Failure {
        spec.background = IconColor::Red;
        spec.lines.push("FAILED".to_string());
    } else if status.result == BuildResult::Success {
        spec.text_color = IconColor::Green;
        spec.lines.push("Success".to_string());
    } else if status.result == BuildResult::Unstable {
        spec.text_color = IconColor::Yellow;
        spec.lines.push("Unstable".to_string());
    }

    if !status.in_progress && status.queued {
        spec.lines.push("Queued...".to_string());
        spec.background = IconColor::Purple;
    }

    if let Some(badge) = &status.badge_text {
        for line in decode_badge_text(badge).split('\n') {
            spec.lines.push(line.to_string());
        }
    }

    if status.in_progress && status.estimated_duration_ms > 0 && status.timestamp_ms > 0 {
        let elapsed = (now.timestamp_millis() - status.timestamp_ms) as f64;
        let percent = elapsed / status.estimated_duration_ms as f64 * 100.0;
        spec.lines.push(format!("{}", (percent.round() as i64).min(99)));
        // Width fraction is floored at zero but deliberately not capped; the
        // viewBox clips anything past the right edge.
        spec.progress = Some((percent / 100.0).max(0.0));
    }

    spec
}

/// Badge text arrives percent-encoded. `&#43;` → "±" is the one entity the
/// reference decodes; a ` (`-prefixed suffix moves to its own line.
pub fn decode_badge_text(raw: &str) -> String {
    percent_decode(raw)
        .replace("&#43;", "±")
        .replace(" (", "\n(")
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn status(in_progress: bool, result: BuildResult) -> BuildStatus {
        BuildStatus {
            job_name: "widgets".to_string(),
            number: 12,
            in_progress,
            result,
            timestamp_ms: 0,
            estimated_duration_ms: 0,
            queued: false,
            badge_text: None,
        }
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn running_wins_over_any_result() {
        for result in [
            BuildResult::Success,
            BuildResult::Failure,
            BuildResult::Unstable,
            BuildResult::Unknown,
        ] {
            let spec = build_icon_spec(&status(true, result), now());
            assert_eq!(spec.background, IconColor::Green);
            assert_eq!(spec.lines, vec!["Running...".to_string()]);
        }
    }

    #[test]
    fn finished_results_map_to_colors_and_text() {
        let failed = build_icon_spec(&status(false, BuildResult::Failure), now());
        assert_eq!(failed.background, IconColor::Red);
        assert_eq!(failed.lines, vec!["FAILED".to_string()]);

        let success = build_icon_spec(&status(false, BuildResult::Success), now());
        assert_eq!(success.background, IconColor::Black);
        assert_eq!(success.text_color, IconColor::Green);
        assert_eq!(success.lines, vec!["Success".to_string()]);

        let unstable = build_icon_spec(&status(false, BuildResult::Unstable), now());
        assert_eq!(unstable.text_color, IconColor::Yellow);
        assert_eq!(unstable.lines, vec!["Unstable".to_string()]);

        let unknown = build_icon_spec(&status(false, BuildResult::Unknown), now());
        assert_eq!(unknown.background, IconColor::Black);
        assert_eq!(unknown.text_color, IconColor::White);
        assert!(unknown.lines.is_empty());
    }

    #[test]
    fn queued_appends_line_and_turns_purple() {
        let mut queued = status(false, BuildResult::Success);
        queued.queued = true;
        let spec = build_icon_spec(&queued, now());
        assert_eq!(spec.background, IconColor::Purple);
        assert_eq!(
            spec.lines,
            vec!["Success".to_string(), "Queued...".to_string()]
        );

        // A running build ignores the queue flag.
        let mut running = status(true, BuildResult::Unknown);
        running.queued = true;
        let spec = build_icon_spec(&running, now());
        assert_eq!(spec.background, IconColor::Green);
    }

    #[test]
    fn badge_text_is_decoded_and_split() {
        let mut with_badge = status(false, BuildResult::Success);
        with_badge.badge_text = Some("v1.2%20rc&#43;1 (staging)".to_string());
        let spec = build_icon_spec(&with_badge, now());
        assert_eq!(
            spec.lines,
            vec![
                "Success".to_string(),
                "v1.2 rc±1".to_string(),
                "(staging)".to_string()
            ]
        );
    }

    #[test]
    fn progress_label_clamps_at_99() {
        let mut running = status(true, BuildResult::Unknown);
        running.estimated_duration_ms = 600_000;
        running.timestamp_ms = now().timestamp_millis() - 1_200_000;
        let spec = build_icon_spec(&running, now());
        assert_eq!(spec.lines.last().map(String::as_str), Some("99"));
        // Width fraction is not capped; the canvas clips it.
        assert_eq!(spec.progress, Some(2.0));
    }

    #[test]
    fn progress_is_monotonic_for_growing_elapsed_time() {
        let mut running = status(true, BuildResult::Unknown);
        running.estimated_duration_ms = 600_000;
        running.timestamp_ms = now().timestamp_millis();

        let mut last = -1.0;
        for minutes in 0..10 {
            let at = now() + Duration::minutes(minutes);
            let spec = build_icon_spec(&running, at);
            let fraction = spec.progress.unwrap();
            assert!(fraction >= last);
            last = fraction;
        }
    }

    #[test]
    fn no_progress_without_timestamp_or_estimate() {
        let mut running = status(true, BuildResult::Unknown);
        running.estimated_duration_ms = 0;
        running.timestamp_ms = now().timestamp_millis();
        assert_eq!(build_icon_spec(&running, now()).progress, None);

        running.estimated_duration_ms = 600_000;
        running.timestamp_ms = 0;
        assert_eq!(build_icon_spec(&running, now()).progress, None);
    }
}
