//! Raw export records → normalized [`Record`]s.

use crate::ingest::raw::RawRecord;
use crate::models::alias::AliasTable;
use crate::models::device_class::DeviceClass;
use crate::models::record::Record;
use crate::utils::date::parse_utc_time;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Valid device offsets lie within [-720, +840] minutes.
pub const MIN_OFFSET: i32 = -720;
pub const MAX_OFFSET: i32 = 840;
const MINUTES_PER_DAY: i32 = 1440;

/// Some devices report offsets shifted by whole days; bring them back in range.
pub fn correct_large_offset(mut offset: i32) -> i32 {
    while offset > MAX_OFFSET {
        offset -= MINUTES_PER_DAY;
    }
    while offset < MIN_OFFSET {
        offset += MINUTES_PER_DAY;
    }
    offset
}

pub struct Normalizer<'a> {
    aliases: &'a AliasTable,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl<'a> Normalizer<'a> {
    pub fn new(aliases: &'a AliasTable) -> Self {
        Self {
            aliases,
            start: None,
            end: None,
        }
    }

    /// Keep only records whose UTC date falls in `[start, end]`.
    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Timezone for a raw name, after alias substitution. Non-IANA names give `None`.
    pub fn timezone(&self, name: &str) -> Option<Tz> {
        self.aliases.resolve(name.trim()).parse::<Tz>().ok()
    }

    /// Records without a parseable time, or outside the date range, are dropped.
    pub fn normalize(&self, raw: &[RawRecord]) -> Vec<Record> {
        let mut unknown_zones: BTreeSet<&str> = BTreeSet::new();
        let mut dropped = 0usize;

        let records: Vec<Record> = raw
            .iter()
            .enumerate()
            .filter_map(|(idx, r)| {
                let Some(utc_time) = r.time.as_deref().and_then(parse_utc_time) else {
                    dropped += 1;
                    return None;
                };

                let date = utc_time.date_naive();
                if self.start.is_some_and(|s| date < s) || self.end.is_some_and(|e| date > e) {
                    dropped += 1;
                    return None;
                }

                let kind = r.kind.clone().unwrap_or_default();
                let id = r.id.clone().unwrap_or_else(|| idx.to_string());
                let offset = r
                    .timezone_offset
                    .filter(|o| o.is_finite())
                    .map(|o| correct_large_offset(o.round() as i32));

                let timezone = r
                    .timezone
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .and_then(|name| {
                        let tz = self.timezone(name);
                        if tz.is_none() {
                            unknown_zones.insert(name);
                        }
                        tz
                    });

                let mut record = Record::new(id, kind.clone(), utc_time);
                record.timezone_offset = offset;
                record.timezone = timezone;
                record.time_processing = r.time_processing.clone();
                record.upload_id = r.upload_id.clone();
                record.device_class = DeviceClass::classify(
                    &kind,
                    &r.device_tags_text(),
                    r.time_processing.as_deref(),
                    &r.payload_text(),
                    offset.is_some(),
                );

                Some(record)
            })
            .collect();

        for name in &unknown_zones {
            warn!(timezone = %name, "unknown timezone name ignored");
        }
        debug!(kept = records.len(), dropped, "normalized records");

        records
    }
}
