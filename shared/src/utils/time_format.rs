//! Duration labels shown next to the countdown and the trip stopwatch

/// Format a number of seconds as `HH:MM:SS`.
///
/// Hours are padded to two digits but not capped, so a 100 hour trip renders
/// as `100:00:00`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a countdown as `M:SS`
pub fn format_countdown(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Parse an `HH:MM:SS` label back into seconds.
///
/// Minutes and seconds must be below 60; hours may have any number of digits.
/// Returns `None` for malformed labels and totals that overflow `u64`.
pub fn parse_hms(label: &str) -> Option<u64> {
    let mut parts = label.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)
}
