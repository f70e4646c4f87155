use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::appointment::Appointment;
use crate::models::icon::{IconColor, IconSpec};

const CANVAS: f64 = 72.0;
const LINE_HEIGHT: f64 = 12.0;

/// Serialize an icon spec to a 72x72 SVG document. When a progress fraction
/// is set the background rect only covers that share of the width; the rest
/// stays unfilled.
pub fn render_icon(spec: &IconSpec) -> String {
    let width = match spec.progress {
        Some(fraction) => CANVAS * fraction.max(0.0),
        None => CANVAS,
    };

    let mut svg = svg_open();
    svg.push_str(&rect(width, spec.background));

    let mut y = CANVAS / 2.0 - spec.lines.len().saturating_sub(1) as f64 * LINE_HEIGHT / 2.0;
    for line in &spec.lines {
        svg.push_str(&text(line, CANVAS / 2.0, y, spec.text_color, "bold", "middle"));
        y += LINE_HEIGHT;
    }
    svg.push_str("</svg>");
    svg
}

/// Calendar layout: the subject word-wrapped one word per line down the
/// middle, the time range left-aligned near the top in normal weight.
pub fn render_appointment_icon(
    subject: &str,
    time_string: &str,
    background: IconColor,
    text_color: IconColor,
) -> String {
    let mut svg = svg_open();
    svg.push_str(&rect(CANVAS, background));

    let mut y = 30.0;
    for word in subject.split_whitespace() {
        svg.push_str(&text(word, CANVAS / 2.0, y, text_color, "bold", "middle"));
        y += LINE_HEIGHT;
        if y > 76.0 {
            break;
        }
    }

    svg.push_str(&text(time_string, 2.0, 15.0, text_color, "normal", "start"));
    svg.push_str("</svg>");
    svg
}

pub fn data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;charset=utf8,{}", svg)
}

/// Countdown background staircase by time to start. Inside the final minute
/// the color alternates red/black on wall-clock second parity so the key
/// flashes.
pub fn countdown_background(start: DateTime<Utc>, now: DateTime<Utc>) -> IconColor {
    let to_start = start - now;
    if to_start <= Duration::zero() {
        IconColor::Green
    } else if to_start < Duration::minutes(1) {
        if now.second() % 2 == 0 {
            IconColor::Red
        } else {
            IconColor::Black
        }
    } else if to_start < Duration::minutes(5) {
        IconColor::Red
    } else if to_start < Duration::minutes(10) {
        IconColor::Orange
    } else if to_start < Duration::minutes(15) {
        IconColor::Yellow
    } else if to_start < Duration::hours(1) {
        IconColor::CornflowerBlue
    } else {
        IconColor::Black
    }
}

pub fn countdown_text_color(background: IconColor) -> IconColor {
    if background == IconColor::Black {
        IconColor::White
    } else {
        IconColor::Black
    }
}

/// Human time string for an appointment, in the display timezone: bare time
/// today, weekday-qualified within a week, full date beyond that. Timed
/// appointments of two minutes or more get an end-time suffix.
pub fn appointment_time_string(appointment: &Appointment, now: DateTime<Utc>, tz: Tz) -> String {
    let start_local = appointment.start.with_timezone(&tz);
    let now_local = now.with_timezone(&tz);

    let mut time_string = if start_local.date_naive() <= now_local.date_naive() {
        if appointment.all_day {
            "Today".to_string()
        } else {
            start_local.format("%H:%M").to_string()
        }
    } else if appointment.start - now < Duration::days(7) {
        if appointment.all_day {
            start_local.format("%a").to_string()
        } else {
            start_local.format("%a %H:%M").to_string()
        }
    } else if appointment.all_day {
        start_local.format("%Y-%m-%d").to_string()
    } else {
        start_local.format("%Y-%m-%d %H:%M").to_string()
    };

    if !appointment.all_day && appointment.duration_minutes >= 2 {
        let end_local = start_local + appointment.duration();
        time_string.push_str(&format!(" - {}", end_local.format("%H:%M")));
    }
    time_string
}

fn svg_open() -> String {
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"72\" height=\"72\" viewBox=\"0 0 72 72\">"
        .to_string()
}

fn rect(width: f64, fill: IconColor) -> String {
    format!(
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"72\" fill=\"{}\"/>",
        width,
        fill.as_svg()
    )
}

fn text(content: &str, x: f64, y: f64, color: IconColor, weight: &str, anchor: &str) -> String {
    format!(
        "<text x=\"{}\" y=\"{}\" font-size=\"10\" font-weight=\"{}\" text-anchor=\"{}\" fill=\"{}\">{}</text>",
        x,
        y,
        weight,
        anchor,
        color.as_svg(),
        escape_xml(content)
    )
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
