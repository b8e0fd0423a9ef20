//! DST-aware offset primitives.
//!
//! Every offset in this crate is expressed in whole minutes, local minus UTC
//! (e.g. -420 for America/Denver in winter).

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::{OffsetComponents, Tz, TzOffset};

/// Fixed anchors used to bound the plausible offsets of a timezone:
/// a northern-hemisphere winter day and a northern-hemisphere summer day.
const RANGE_ANCHOR_STANDARD: (i32, u32, u32) = (2017, 1, 1);
const RANGE_ANCHOR_DST: (i32, u32, u32) = (2017, 5, 1);

/// Offsets inside a DST range are aligned on 15-minute steps.
pub const RANGE_STEP: i32 = 15;

fn minutes(offset: &TzOffset) -> i32 {
    offset.fix().local_minus_utc() / 60
}

/// Pick the standard-time offset among two candidates.
fn standard_of(a: &TzOffset, b: &TzOffset) -> i32 {
    if a.dst_offset() == Duration::zero() {
        minutes(a)
    } else if b.dst_offset() == Duration::zero() {
        minutes(b)
    } else {
        minutes(a).min(minutes(b))
    }
}

/// Offset of `tz` for a wall-clock time.
///
/// Ambiguous wall clocks (fall back) and skipped ones (spring forward)
/// resolve to the standard-time offset.
pub fn offset_at_wall_clock(tz: &Tz, wall: NaiveDateTime) -> i32 {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(dt) => minutes(dt.offset()),
        LocalResult::Ambiguous(a, b) => standard_of(a.offset(), b.offset()),
        LocalResult::None => {
            let before = tz.offset_from_utc_datetime(&(wall - Duration::days(1)));
            let after = tz.offset_from_utc_datetime(&(wall + Duration::days(1)));
            standard_of(&before, &after)
        }
    }
}

/// Day-level offset of `tz` at `date`.
///
/// Midnight of the *following* day is localized: transitions happen during
/// the night, so the day that contains one reports its post-transition offset.
pub fn offset_for(date: NaiveDate, tz: &Tz) -> i32 {
    let next = date.succ_opt().unwrap_or(date);
    offset_at_wall_clock(tz, next.and_time(chrono::NaiveTime::MIN))
}

/// True when `date` reports a different offset than the day before it.
pub fn is_dst_transition_day(date: NaiveDate, tz: &Tz) -> bool {
    match date.pred_opt() {
        Some(prev) => offset_for(date, tz) != offset_for(prev, tz),
        None => false,
    }
}

/// Plausible offsets for a timezone: every 15-minute step between its
/// winter and summer offsets, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstRange {
    pub min: i32,
    pub max: i32,
}

impl DstRange {
    pub fn contains(&self, offset: i32) -> bool {
        offset >= self.min && offset <= self.max && (offset - self.min) % RANGE_STEP == 0
    }

    pub fn is_endpoint(&self, offset: i32) -> bool {
        offset == self.min || offset == self.max
    }

    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        (self.min..=self.max).step_by(RANGE_STEP as usize)
    }
}

pub fn dst_range(tz: &Tz) -> DstRange {
    let anchor = |(y, m, d): (i32, u32, u32)| {
        NaiveDate::from_ymd_opt(y, m, d).map(|date| offset_for(date, tz))
    };

    let a = anchor(RANGE_ANCHOR_STANDARD).unwrap_or_default();
    let b = anchor(RANGE_ANCHOR_DST).unwrap_or(a);

    DstRange {
        min: a.min(b),
        max: a.max(b),
    }
}
