//! Date and time formatting for display.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::OffsetDateTime;
use time::macros::format_description;

/// `Mar 1, 2026`
#[must_use]
pub fn format_date(at: OffsetDateTime) -> String {
    at.format(format_description!("[month repr:short] [day padding:none], [year]"))
        .unwrap_or_default()
}

/// `08:30 AM`
#[must_use]
pub fn format_time(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour repr:12]:[minute] [period]"))
        .unwrap_or_default()
}

/// `Mar 1, 2026 08:30 AM`
#[must_use]
pub fn format_date_time(at: OffsetDateTime) -> String {
    format!("{} {}", format_date(at), format_time(at))
}
