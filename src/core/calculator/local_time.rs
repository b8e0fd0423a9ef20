//! Apply day estimates to records, then refine records around DST changes.

use crate::core::calculator::EstimateTable;
use crate::core::calculator::aggregate::DeviceSeries;
use crate::core::calculator::day_series::DaySeries;
use crate::core::calculator::dst::{dst_range, offset_at_wall_clock};
use crate::models::estimate::EstimateType;
use crate::models::record::Record;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use tracing::debug;

/// A record with the estimate of its day applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedRecord {
    pub record: Record,
    pub estimate_type: Option<EstimateType>,
    pub offset: Option<i32>,
    pub timezone: Option<Tz>,
    pub local_time: Option<NaiveDateTime>,
}

impl LocalizedRecord {
    fn set_offset(&mut self, offset: Option<i32>) {
        self.offset = offset;
        self.local_time =
            offset.map(|o| self.record.utc_time.naive_utc() + Duration::minutes(o as i64));
    }
}

/// `local_time = utc_time + offset of the record's day`.
///
/// Uncertain days still get a local time when they kept an offset; the type
/// travels along so callers can decide what to trust.
pub fn apply_local_time(
    records: &[Record],
    days: &DaySeries,
    table: &EstimateTable,
    home: &DeviceSeries,
) -> Vec<LocalizedRecord> {
    let mut out: Vec<LocalizedRecord> = records
        .iter()
        .map(|record| {
            let estimate = days
                .index_of(record.date)
                .and_then(|idx| table.get(idx))
                .map(|day| &day.estimate);

            let mut localized = LocalizedRecord {
                record: record.clone(),
                estimate_type: estimate.and_then(|e| e.kind()),
                offset: None,
                timezone: estimate.and_then(|e| e.name()),
                local_time: None,
            };
            localized.set_offset(estimate.and_then(|e| e.offset()));
            localized
        })
        .collect();

    correct_around_dst(&mut out, home);
    out
}

/// Days on which the home offset differs from the day before.
pub fn home_transition_days(home: &DeviceSeries) -> Vec<NaiveDate> {
    home.windows(2)
        .filter_map(|w| match (w[0].offset, w[1].offset) {
            (Some(prev), Some(cur)) if prev != cur => Some(w[1].date),
            _ => None,
        })
        .collect()
}

/// Re-derive the offset at the record's instant for records within a day of
/// a home DST change, when their day has a named timezone.
///
/// The UTC time is shifted by the zone's smallest offset and read as a wall
/// clock in that zone, which lands on the right side of the transition for
/// every record of the window.
pub fn correct_around_dst(records: &mut [LocalizedRecord], home: &DeviceSeries) {
    let window: BTreeSet<NaiveDate> = home_transition_days(home)
        .into_iter()
        .flat_map(|d| [d.pred_opt(), Some(d), d.succ_opt()])
        .flatten()
        .collect();

    if window.is_empty() {
        return;
    }

    let mut corrected = 0usize;
    for localized in records.iter_mut() {
        if !window.contains(&localized.record.date) {
            continue;
        }
        let Some(tz) = localized.timezone else {
            continue;
        };

        let anchor = dst_range(&tz).min;
        let wall = localized.record.utc_time.naive_utc() + Duration::minutes(anchor as i64);
        localized.set_offset(Some(offset_at_wall_clock(&tz, wall)));
        corrected += 1;
    }

    debug!(corrected, window_days = window.len(), "dst boundary correction");
}
