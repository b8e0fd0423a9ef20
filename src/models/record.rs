use super::device_class::DeviceClass;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// One normalized telemetry record.
///
/// Records are immutable once built by the ingestion layer: the timezone
/// name is already de-aliased and the offset already brought back into the
/// [-720, +840] range.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub kind: String,              // ⇔ "type" ('upload', 'cbg', 'bolus', …)
    pub utc_time: DateTime<Utc>,   // ⇔ "time" (ISO-8601, UTC)
    pub date: NaiveDate,           // UTC calendar date of utc_time
    pub device_class: Option<DeviceClass>,
    pub timezone_offset: Option<i32>, // ⇔ "timezoneOffset" (minutes)
    pub timezone: Option<Tz>,         // ⇔ "timezone" (IANA)
    pub time_processing: Option<String>,
    pub upload_id: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, utc_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            utc_time,
            date: utc_time.date_naive(),
            device_class: None,
            timezone_offset: None,
            timezone: None,
            time_processing: None,
            upload_id: None,
        }
    }

    pub fn with_class(mut self, class: DeviceClass) -> Self {
        self.device_class = Some(class);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.timezone_offset = Some(offset);
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    pub fn with_time_processing(mut self, tp: impl Into<String>) -> Self {
        self.time_processing = Some(tp.into());
        self
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
