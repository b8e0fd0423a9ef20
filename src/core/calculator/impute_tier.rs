//! Tier 3: bridge runs of days left without an offset.

use crate::core::calculator::EstimateTable;
use crate::core::calculator::dst::offset_for;
use crate::core::calculator::signals::Signals;
use crate::models::estimate::{Annotation, DayEstimate, Estimate, Uncertainty, Zone};
use tracing::debug;

/// A maximal run of days without an offset, with the nearest resolved day on
/// each side (indices into the table, oldest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub start: usize,
    pub end: usize,
    pub before: Option<usize>,
    pub after: Option<usize>,
}

impl Gap {
    pub fn days(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Runs of consecutive days without an offset, oldest first.
pub fn find_gaps(table: &EstimateTable) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, day) in table.iter().enumerate() {
        match (day.estimate.has_offset(), start) {
            (false, None) => start = Some(idx),
            (true, Some(s)) => {
                gaps.push(Gap {
                    start: s,
                    end: idx - 1,
                    before: s.checked_sub(1),
                    after: Some(idx),
                });
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        gaps.push(Gap {
            start: s,
            end: table.len() - 1,
            before: s.checked_sub(1),
            after: None,
        });
    }

    gaps
}

pub fn impute_gaps(signals: &Signals, table: EstimateTable) -> EstimateTable {
    let mut table = table;

    if !table.iter().any(|d| d.estimate.has_offset()) {
        for day in table.iter_mut() {
            mark_unable_day(day);
        }
        debug!(days = table.len(), "no resolved day, nothing to impute from");
        return table;
    }

    let gaps = find_gaps(&table);
    debug!(gaps = gaps.len(), "imputing gaps");

    for gap in gaps {
        match (gap.before, gap.after) {
            (Some(before), Some(after)) => bridge(&mut table, &gap, before, after),
            (None, Some(after)) => extend_from_home(signals, &mut table, &gap, after),
            _ => mark_unable(&mut table, &gap),
        }
    }

    table
}

/// Both sides resolved: same name fills the run with that zone, same offset
/// fills the offset alone, anything else is left uncertain.
fn bridge(table: &mut EstimateTable, gap: &Gap, before: usize, after: usize) {
    let gap_size = (table[after].date - table[before].date).num_days();
    let (lo, hi) = (&table[before].estimate, &table[after].estimate);

    if let (Some(a), Some(b)) = (lo.name(), hi.name())
        && a == b
    {
        for day in &mut table[gap.start..=gap.end] {
            let zone = Zone::new(offset_for(day.date, &a), Some(a), None);
            impute(day, zone, gap_size);
        }
    } else if let (Some(a), Some(b)) = (lo.offset(), hi.offset())
        && a == b
    {
        for day in &mut table[gap.start..=gap.end] {
            impute(day, Zone::offset_only(a), gap_size);
        }
    } else {
        mark_unable(table, gap);
    }
}

/// Run at the oldest end of the series: trust home only if the nearest
/// resolved day agrees with it.
fn extend_from_home(signals: &Signals, table: &mut EstimateTable, gap: &Gap, after: usize) {
    let anchored_at_home = table[after].estimate.offset().is_some()
        && table[after].estimate.offset() == signals.home_offset(after);

    if !anchored_at_home {
        mark_unable(table, gap);
        return;
    }

    // days from the first of the run to the resolved day, exclusive
    let gap_size = gap.days() as i64 - 1;
    for idx in gap.start..=gap.end {
        let home = &signals.home[idx];
        match home.offset {
            Some(offset) => impute(
                &mut table[idx],
                Zone::new(offset, home.name, None),
                gap_size,
            ),
            None => mark_unable_day(&mut table[idx]),
        }
    }
}

/// Only unresolved days are filled: days already flagged by the device tier
/// keep their verdict.
fn impute(day: &mut DayEstimate, zone: Zone, gap_size: i64) {
    if !day.estimate.is_unresolved() {
        return;
    }
    day.estimate = Estimate::Impute { zone, gap_size };
    day.annotate(Annotation::Gap(gap_size));
}

fn mark_unable(table: &mut EstimateTable, gap: &Gap) {
    for day in &mut table[gap.start..=gap.end] {
        mark_unable_day(day);
    }
}

fn mark_unable_day(day: &mut DayEstimate) {
    if day.estimate.is_unresolved() {
        day.mark_uncertain(Uncertainty::UnableToImputeTzo);
    }
}
