//! Per-day aggregates of one device class.

use crate::core::calculator::day_series::DaySeries;
use crate::core::calculator::dst::offset_for;
use crate::models::record::Record;
use crate::utils::stats::{median, mode};
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::BTreeMap;

/// What one device class says about one day. Every field is `None` when the
/// class has no record that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDay {
    pub date: NaiveDate,
    pub offset: Option<i32>,
    pub name: Option<Tz>,
    pub time_processing: Option<String>,
}

impl DeviceDay {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            offset: None,
            name: None,
            time_processing: None,
        }
    }
}

/// One `DeviceDay` per day of the series, same order.
pub type DeviceSeries = Vec<DeviceDay>;

/// Aggregate `records` day by day.
///
/// The offset is the median of the raw offsets, which shrugs off a single
/// glitched reading. With `with_names`, the modal timezone name and time
/// processing are kept too, and a named day reports the DST-aware offset of
/// that name instead of the raw median.
pub fn aggregate_by_day<'a, I>(days: &DaySeries, records: I, with_names: bool) -> DeviceSeries
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut by_date: BTreeMap<NaiveDate, Vec<&Record>> = BTreeMap::new();
    for r in records {
        by_date.entry(r.date).or_default().push(r);
    }

    days.dates()
        .iter()
        .map(|&date| {
            let Some(group) = by_date.get(&date) else {
                return DeviceDay::empty(date);
            };

            let offsets: Vec<i32> = group.iter().filter_map(|r| r.timezone_offset).collect();
            let mut day = DeviceDay {
                date,
                offset: median(&offsets),
                name: None,
                time_processing: None,
            };

            if with_names {
                day.name = mode(group.iter().filter_map(|r| r.timezone.map(|tz| tz.name())))
                    .and_then(|name| name.parse::<Tz>().ok());
                day.time_processing =
                    mode(group.iter().filter_map(|r| r.time_processing.clone()));

                if let Some(tz) = &day.name {
                    day.offset = Some(offset_for(date, tz));
                }
            }

            day
        })
        .collect()
}
