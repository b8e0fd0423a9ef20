// src/export/model.rs

use crate::core::calculator::local_time::LocalizedRecord;
use crate::models::estimate::DayEstimate;
use crate::utils::time::format_local_time;
use serde::Serialize;

/// Flat day-table row, column names as downstream tools expect them.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DayRow {
    pub date: String,
    #[serde(rename = "est.type")]
    pub est_type: String,
    #[serde(rename = "est.timezoneOffset")]
    pub est_timezone_offset: Option<i32>,
    #[serde(rename = "est.timezone")]
    pub est_timezone: Option<String>,
    #[serde(rename = "est.timeProcessing")]
    pub est_time_processing: Option<String>,
    #[serde(rename = "est.annotations")]
    pub est_annotations: String,
    #[serde(rename = "est.gapSize")]
    pub est_gap_size: Option<i64>,
    #[serde(rename = "est.version")]
    pub est_version: String,
}

impl DayRow {
    pub fn from_day(day: &DayEstimate, version: &str) -> Self {
        let e = &day.estimate;
        Self {
            date: day.date_str(),
            est_type: e.kind().map(|k| k.as_str().to_string()).unwrap_or_default(),
            est_timezone_offset: e.offset(),
            est_timezone: e.name().map(|tz| tz.name().to_string()),
            est_time_processing: e.time_processing().map(str::to_string),
            est_annotations: day.annotations_text(),
            est_gap_size: e.gap_size(),
            est_version: version.to_string(),
        }
    }
}

/// Input record plus its estimated local time.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RecordRow {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
    pub date: String,
    #[serde(rename = "deviceClass")]
    pub device_class: Option<String>,
    #[serde(rename = "timezoneOffset")]
    pub timezone_offset: Option<i32>,
    pub timezone: Option<String>,
    #[serde(rename = "uploadId")]
    pub upload_id: Option<String>,
    #[serde(rename = "est.type")]
    pub est_type: String,
    #[serde(rename = "est.timezoneOffset")]
    pub est_timezone_offset: Option<i32>,
    #[serde(rename = "est.timezone")]
    pub est_timezone: Option<String>,
    #[serde(rename = "est.localTime")]
    pub est_local_time: Option<String>,
}

impl From<&LocalizedRecord> for RecordRow {
    fn from(l: &LocalizedRecord) -> Self {
        let r = &l.record;
        Self {
            id: r.id.clone(),
            kind: r.kind.clone(),
            time: r.utc_time.to_rfc3339(),
            date: r.date_str(),
            device_class: r.device_class.map(|c| c.as_str().to_string()),
            timezone_offset: r.timezone_offset,
            timezone: r.timezone.map(|tz| tz.name().to_string()),
            upload_id: r.upload_id.clone(),
            est_type: l
                .estimate_type
                .map(|k| k.as_str().to_string())
                .unwrap_or_default(),
            est_timezone_offset: l.offset,
            est_timezone: l.timezone.map(|tz| tz.name().to_string()),
            est_local_time: l.local_time.as_ref().map(format_local_time),
        }
    }
}
