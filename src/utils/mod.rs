// Tue Jan 13 2026 - Alex

pub mod logging;

use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();

    if total_secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if total_secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0).floor();
        let secs = total_secs % 60.0;
        format!("{:.0}m {:.1}s", mins, secs)
    }
}

pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
