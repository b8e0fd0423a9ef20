use crate::core::calculator::local_time::{LocalizedRecord, apply_local_time};
use crate::core::calculator::signals::Signals;
use crate::core::calculator::{EstimateTable, device_tier, impute_tier, upload_tier};
use crate::errors::AppResult;
use crate::ingest::{Normalizer, RawRecord};
use crate::models::estimate::{Annotation, DayEstimate, EstimateType};
use crate::models::record::Record;
use chrono_tz::Tz;
use tracing::{debug, info_span};

/// Result of one user's run.
#[derive(Debug, Clone)]
pub struct Estimation {
    pub days: Vec<DayEstimate>,
    pub records: Vec<LocalizedRecord>,
    pub home: Option<Tz>,
}

impl Estimation {
    pub fn count(&self, kind: EstimateType) -> usize {
        self.days
            .iter()
            .filter(|d| d.estimate.kind() == Some(kind))
            .count()
    }

    /// Days flagged with a recognised device defect (DST slip, clock drift, AM/PM).
    pub fn device_defects(&self) -> usize {
        self.days
            .iter()
            .filter(|d| {
                d.annotations
                    .iter()
                    .any(|a| matches!(a, Annotation::Uncertain(u) if u.is_known_device_defect()))
            })
            .count()
    }
}

pub struct Core;

impl Core {
    /// Estimate the timezone of every day spanned by `records` and the local
    /// time of every record.
    ///
    /// Records must already be normalized (see [`crate::ingest`]). Fails only
    /// when there is no usable record at all.
    pub fn estimate(records: &[Record]) -> AppResult<Estimation> {
        let _span = info_span!("estimate", records = records.len()).entered();

        let signals = Signals::collect(records)?;
        let days = Self::estimate_days(&signals);
        let localized = apply_local_time(records, &signals.days, &days, &signals.home);

        Ok(Estimation {
            days,
            records: localized,
            home: signals.home_zone,
        })
    }

    /// Normalize raw export records (aliases, offset correction, date range)
    /// and estimate them.
    pub fn estimate_raw(raw: &[RawRecord], normalizer: &Normalizer) -> AppResult<Estimation> {
        let records = normalizer.normalize(raw);
        Self::estimate(&records)
    }

    /// Run the three tiers in order over the collected signals.
    pub fn estimate_days(signals: &Signals) -> EstimateTable {
        let table: EstimateTable = signals
            .days
            .dates()
            .iter()
            .map(|&d| DayEstimate::unresolved(d))
            .collect();

        let table = upload_tier::estimate_from_uploads(signals, table);
        debug!(resolved = resolved(&table), "upload tier done");

        let table = device_tier::estimate_from_devices(signals, table);
        debug!(resolved = resolved(&table), "device tier done");

        impute_tier::impute_gaps(signals, table)
    }
}

fn resolved(table: &EstimateTable) -> usize {
    table.iter().filter(|d| d.estimate.has_offset()).count()
}
