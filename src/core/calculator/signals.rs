//! Every per-day signal the tiers read, aligned on one day series.

use crate::core::calculator::aggregate::{DeviceDay, DeviceSeries, aggregate_by_day};
use crate::core::calculator::day_series::DaySeries;
use crate::core::calculator::home::{home_series, home_timezone};
use crate::core::calculator::imputed::forward_fill;
use crate::errors::AppResult;
use crate::models::device_class::{DeviceClass, UploadSource};
use crate::models::estimate::Reference;
use crate::models::record::Record;
use chrono_tz::Tz;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Signals {
    pub days: DaySeries,
    /// All upload sessions, whatever the device.
    pub upload: DeviceSeries,
    pub cgm: DeviceSeries,
    pub pump: DeviceSeries,
    pub pump_upload: DeviceSeries,
    pub cgm_upload: DeviceSeries,
    pub healthkit_upload: DeviceSeries,
    pub home: DeviceSeries,
    pub home_zone: Option<Tz>,
}

impl Signals {
    pub fn collect(records: &[Record]) -> AppResult<Self> {
        let days = DaySeries::build(records)?;

        let of_class = |pred: fn(&DeviceClass) -> bool| {
            records
                .iter()
                .filter(move |r| r.device_class.as_ref().is_some_and(pred))
        };

        let upload = aggregate_by_day(&days, of_class(DeviceClass::is_upload), true);
        let cgm = aggregate_by_day(&days, of_class(|c| *c == DeviceClass::Cgm), false);
        let pump = aggregate_by_day(&days, of_class(|c| *c == DeviceClass::Pump), false);

        let imputed_upload = |source: UploadSource| {
            let uploads = records.iter().filter(move |r| {
                r.device_class.and_then(|c| c.upload_source()) == Some(source)
            });
            forward_fill(&aggregate_by_day(&days, uploads, true))
        };
        let pump_upload = imputed_upload(UploadSource::Pump);
        let cgm_upload = imputed_upload(UploadSource::Cgm);
        let healthkit_upload = imputed_upload(UploadSource::Healthkit);

        let home_zone = home_timezone(records);
        let home = home_series(&days, home_zone);

        debug!(
            days = days.len(),
            first = ?days.first(),
            last = ?days.last(),
            home = home_zone.map(|tz| tz.name()),
            "collected day signals"
        );

        Ok(Self {
            days,
            upload,
            cgm,
            pump,
            pump_upload,
            cgm_upload,
            healthkit_upload,
            home,
            home_zone,
        })
    }

    /// Imputed series a device offset is compared against.
    pub fn reference(&self, reference: Reference) -> &DeviceSeries {
        match reference {
            Reference::Upload(UploadSource::Pump) => &self.pump_upload,
            Reference::Upload(UploadSource::Cgm) => &self.cgm_upload,
            Reference::Upload(UploadSource::Healthkit) => &self.healthkit_upload,
            Reference::Home => &self.home,
        }
    }

    /// Raw day series of a device class. Upload has no raw series of its own
    /// at device level, so it maps to the aggregate of all uploads.
    pub fn device(&self, class: DeviceClass) -> &DeviceSeries {
        match class {
            DeviceClass::Pump => &self.pump,
            DeviceClass::Cgm => &self.cgm,
            DeviceClass::Upload { .. } => &self.upload,
        }
    }

    /// Time processing inherited from the uploads of the same device.
    pub fn device_time_processing(&self, class: DeviceClass, idx: usize) -> Option<String> {
        let series = match class {
            DeviceClass::Pump => &self.pump_upload,
            DeviceClass::Cgm => &self.cgm_upload,
            DeviceClass::Upload { .. } => &self.upload,
        };
        series.get(idx).and_then(|d: &DeviceDay| d.time_processing.clone())
    }

    pub fn home_offset(&self, idx: usize) -> Option<i32> {
        self.home.get(idx).and_then(|d| d.offset)
    }
}
