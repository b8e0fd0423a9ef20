//! Tier 1: days with an explicit upload timezone.

use crate::core::calculator::EstimateTable;
use crate::core::calculator::signals::Signals;
use crate::models::estimate::{Annotation, Estimate, Zone};

/// Resolve every day whose uploads name a timezone to that exact timezone.
///
/// A day whose offset differs from home is flagged `travel`; the flag does
/// not change the estimate.
pub fn estimate_from_uploads(signals: &Signals, table: EstimateTable) -> EstimateTable {
    table
        .into_iter()
        .zip(&signals.upload)
        .enumerate()
        .map(|(idx, (mut day, upload))| {
            if !day.estimate.is_unresolved() {
                return day;
            }

            if let (Some(name), Some(offset)) = (upload.name, upload.offset) {
                day.estimate = Estimate::Upload(Zone::new(
                    offset,
                    Some(name),
                    upload.time_processing.clone(),
                ));

                if signals.home_offset(idx).is_some_and(|home| home != offset) {
                    day.annotate(Annotation::Travel);
                }
            }

            day
        })
        .collect()
}
