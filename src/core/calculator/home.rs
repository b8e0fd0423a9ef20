//! Home timezone: the timezone a user's records name most often.

use crate::core::calculator::aggregate::{DeviceDay, DeviceSeries};
use crate::core::calculator::day_series::DaySeries;
use crate::core::calculator::dst::offset_for;
use crate::models::record::Record;
use crate::utils::stats::mode;
use chrono_tz::Tz;

/// Most frequent explicit timezone across all records, ties to the smallest name.
pub fn home_timezone(records: &[Record]) -> Option<Tz> {
    mode(records.iter().filter_map(|r| r.timezone.map(|tz| tz.name())))
        .and_then(|name| name.parse::<Tz>().ok())
}

/// Home series with its DST-aware offset for every day; all empty without a home.
pub fn home_series(days: &DaySeries, home: Option<Tz>) -> DeviceSeries {
    days.dates()
        .iter()
        .map(|&date| match &home {
            Some(tz) => DeviceDay {
                date,
                offset: Some(offset_for(date, tz)),
                name: Some(*tz),
                time_processing: None,
            },
            None => DeviceDay::empty(date),
        })
        .collect()
}
