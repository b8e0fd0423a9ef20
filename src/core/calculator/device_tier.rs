//! Tier 2: days where only pump or cgm offsets are known.
//!
//! Three passes, each returning a new table:
//! - A: match the device offset against the imputed upload and home series
//! - B: compare it with the previous day, recognising known device defects
//! - C: downgrade device estimates where pump and cgm disagree

use crate::core::calculator::EstimateTable;
use crate::core::calculator::dst::{DstRange, dst_range, is_dst_transition_day, offset_for};
use crate::core::calculator::signals::Signals;
use crate::models::device_class::DeviceClass;
use crate::models::estimate::{Annotation, DayEstimate, Estimate, Reference, Uncertainty, Zone};
use chrono_tz::Tz;
use tracing::debug;

/// Classes whose raw offsets feed this tier, in order.
pub const DEVICE_CLASSES: [DeviceClass; 2] = [DeviceClass::Pump, DeviceClass::Cgm];

/// An offset difference of exactly twelve hours points at an AM/PM entry error.
pub const AM_PM_ERROR_MINUTES: i32 = 720;

/// Pump and cgm may disagree by up to one hour (DST set at different times).
pub const MAX_PUMP_CGM_DIFF_MINUTES: i32 = 60;

pub fn estimate_from_devices(signals: &Signals, table: EstimateTable) -> EstimateTable {
    let mut table = table;

    for class in DEVICE_CLASSES {
        table = match_imputed_series(signals, table, class);
    }
    for class in DEVICE_CLASSES {
        table = compare_with_previous_day(signals, table, class);
    }

    flag_pump_cgm_mismatch(signals, table)
}

/// Pass A.
pub fn match_imputed_series(
    signals: &Signals,
    table: EstimateTable,
    class: DeviceClass,
) -> EstimateTable {
    let raw_series = signals.device(class);

    table
        .into_iter()
        .enumerate()
        .map(|(idx, mut day)| {
            let Some(raw) = raw_series.get(idx).and_then(|d| d.offset) else {
                return day;
            };
            if !day.estimate.is_unresolved() {
                return day;
            }

            // exact match on a reference without a name, kept in case a later one names the zone
            let mut unnamed: Option<(Reference, Option<String>)> = None;

            for reference in Reference::PRIORITY {
                let Some(candidate) = signals.reference(reference).get(idx) else {
                    continue;
                };
                let zone = |offset| {
                    Zone::new(offset, candidate.name, candidate.time_processing.clone())
                };

                if candidate.offset == Some(raw) {
                    if candidate.name.is_none() {
                        unnamed.get_or_insert((reference, candidate.time_processing.clone()));
                        continue;
                    }
                    day.estimate = Estimate::Device(zone(raw));
                    day.annotate(Annotation::TzInferredFrom(reference));
                    break;
                }

                if let (Some(tz), Some(offset)) = (candidate.name, candidate.offset)
                    && is_dst_transition_day(day.date, &tz)
                {
                    let range = dst_range(&tz);
                    if range.contains(raw) && range.contains(offset) {
                        day.estimate = Estimate::Device(zone(offset));
                        day.annotate(Annotation::DstChangeDay);
                        day.annotate(Annotation::TzInferredFrom(reference));
                        break;
                    }
                }
            }

            if day.estimate.is_unresolved()
                && let Some((reference, time_processing)) = unnamed
            {
                day.estimate = Estimate::Device(Zone::new(raw, None, time_processing));
                day.annotate(Annotation::TzInferredFrom(reference));
            }

            day
        })
        .collect()
}

/// The day a device offset is compared against in pass B.
struct Comparison {
    offset: i32,
    name: Option<Tz>,
    time_processing: Option<String>,
    /// Previous day, or home when the previous day has no offset.
    is_previous_day: bool,
}

/// Pass B.
///
/// Days are walked oldest first, so a day resolved here is already visible
/// to the next one.
pub fn compare_with_previous_day(
    signals: &Signals,
    table: EstimateTable,
    class: DeviceClass,
) -> EstimateTable {
    let raw_series = signals.device(class);
    let mut out: EstimateTable = Vec::with_capacity(table.len());

    for (idx, mut day) in table.into_iter().enumerate() {
        let raw = raw_series.get(idx).and_then(|d| d.offset);

        if let Some(raw) = raw
            && day.estimate.is_unresolved()
        {
            let comparison = out
                .last()
                .and_then(|prev: &DayEstimate| {
                    prev.estimate.offset().map(|offset| Comparison {
                        offset,
                        name: prev.estimate.name(),
                        time_processing: prev.estimate.time_processing().map(str::to_string),
                        is_previous_day: true,
                    })
                })
                .or_else(|| {
                    signals.home_offset(idx).map(|offset| Comparison {
                        offset,
                        name: signals.home_zone,
                        time_processing: None,
                        is_previous_day: false,
                    })
                });

            let device_tp = signals.device_time_processing(class, idx);
            match comparison {
                Some(cmp) => resolve_against(&mut day, raw, &cmp, class, device_tp),
                None => adopt_device_offset(&mut day, raw, class, device_tp),
            }
        }

        out.push(day);
    }

    out
}

fn resolve_against(
    day: &mut DayEstimate,
    raw: i32,
    cmp: &Comparison,
    class: DeviceClass,
    device_tp: Option<String>,
) {
    let diff = (raw - cmp.offset).abs();

    let Some(tz) = cmp.name else {
        // offset-only neighbour: only an exact match can be trusted
        if diff == 0 {
            adopt_device_offset(day, raw, class, device_tp);
        }
        return;
    };

    let range = dst_range(&tz);
    let time_processing = if cmp.is_previous_day {
        cmp.time_processing.clone()
    } else {
        device_tp.clone()
    };

    if diff == 0 {
        adopt_name(day, tz, time_processing, cmp.is_previous_day);
    } else if range.contains(raw) && range.contains(cmp.offset) {
        if is_dst_transition_day(day.date, &tz) {
            day.annotate(Annotation::DstChangeDay);
            adopt_name(day, tz, time_processing, cmp.is_previous_day);
        } else {
            day.mark_uncertain(dst_defect(&range, raw, cmp.offset));
        }
    } else if diff == AM_PM_ERROR_MINUTES {
        day.mark_uncertain(Uncertainty::LikelyAmPmError);
    } else {
        adopt_device_offset(day, raw, class, device_tp);
    }
}

/// Both offsets are plausible for the zone but the day is no DST change.
///
/// Both at the range ends is a whole DST step: either the user forgot to
/// change the clock or actually moved. Anything else inside the range is
/// clock drift leaking into the offset (15, 30 or 45 minutes).
fn dst_defect(range: &DstRange, raw: i32, reference: i32) -> Uncertainty {
    if range.is_endpoint(raw) && range.is_endpoint(reference) {
        Uncertainty::LikelyDstErrorOrTravel
    } else {
        Uncertainty::Likely15MinDstError
    }
}

fn adopt_name(
    day: &mut DayEstimate,
    tz: Tz,
    time_processing: Option<String>,
    from_previous_day: bool,
) {
    day.estimate = Estimate::Device(Zone::new(
        offset_for(day.date, &tz),
        Some(tz),
        time_processing,
    ));
    day.annotate(if from_previous_day {
        Annotation::TzInferredFromPrevDay
    } else {
        Annotation::TzInferredFrom(Reference::Home)
    });
}

fn adopt_device_offset(
    day: &mut DayEstimate,
    raw: i32,
    class: DeviceClass,
    time_processing: Option<String>,
) {
    day.estimate = Estimate::Device(Zone::new(raw, None, time_processing));
    day.annotate(Annotation::LikelyTravel);
    day.annotate(Annotation::TzoFrom(class));
}

/// Pass C: the only pass allowed to overwrite an estimate.
pub fn flag_pump_cgm_mismatch(signals: &Signals, table: EstimateTable) -> EstimateTable {
    let mut flagged = 0usize;

    let table: EstimateTable = table
        .into_iter()
        .enumerate()
        .map(|(idx, mut day)| {
            let pump = signals.pump.get(idx).and_then(|d| d.offset);
            let cgm = signals.cgm.get(idx).and_then(|d| d.offset);

            if matches!(day.estimate, Estimate::Device(_))
                && let (Some(pump), Some(cgm)) = (pump, cgm)
                && (pump - cgm).abs() > MAX_PUMP_CGM_DIFF_MINUTES
            {
                day.mark_uncertain(Uncertainty::PumpCgmTzoMismatch);
                flagged += 1;
            }

            day
        })
        .collect();

    debug!(flagged, "pump/cgm offset mismatch pass done");
    table
}
