//! Local timestamp formatting.

use chrono::NaiveDateTime;

pub fn format_local_time(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}
