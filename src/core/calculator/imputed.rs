//! Forward-fill of upload timezones across days without uploads.

use crate::core::calculator::aggregate::{DeviceDay, DeviceSeries};
use crate::core::calculator::dst::offset_for;

/// Carry each upload timezone forward until the next upload names another.
///
/// The offset of every named day is recomputed from the name for that very
/// day: a filled day may sit on the other side of a DST change than the
/// upload it inherits from. Time processing is carried on its own.
pub fn forward_fill(series: &DeviceSeries) -> DeviceSeries {
    let mut last_name = None;
    let mut last_tp: Option<String> = None;

    series
        .iter()
        .map(|day| {
            let name = day.name.or(last_name);
            let time_processing = day.time_processing.clone().or_else(|| last_tp.clone());

            last_name = name;
            last_tp = time_processing.clone();

            DeviceDay {
                date: day.date,
                offset: match &name {
                    Some(tz) => Some(offset_for(day.date, tz)),
                    None => day.offset,
                },
                name,
                time_processing,
            }
        })
        .collect()
}
