use serde::Serialize;

/// Which device reported an upload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UploadSource {
    Pump,
    Cgm,
    Healthkit,
}

impl UploadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadSource::Pump => "pump",
            UploadSource::Cgm => "cgm",
            UploadSource::Healthkit => "healthkit",
        }
    }
}

/// Device class of a record, as seen by the day aggregators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceClass {
    /// Upload session record; `source` is unknown when the upload carries no device tags.
    Upload { source: Option<UploadSource> },
    /// Continuous glucose monitor reading with a device-reported offset.
    Cgm,
    /// Insulin pump event with a device-reported offset.
    Pump,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Upload { .. } => "upload",
            DeviceClass::Cgm => "cgm",
            DeviceClass::Pump => "pump",
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, DeviceClass::Upload { .. })
    }

    pub fn upload_source(&self) -> Option<UploadSource> {
        match self {
            DeviceClass::Upload { source } => *source,
            _ => None,
        }
    }

    /// Classify a record from its raw fields.
    ///
    /// - `upload`: pump when the tags mention a pump, cgm when they mention a
    ///   cgm and time processing is not `none`, healthkit when it is `none`
    /// - `cbg` with an offset: cgm, unless the payload marks a Dexcom API reading
    /// - `bolus` with an offset: pump
    pub fn classify(
        kind: &str,
        device_tags: &str,
        time_processing: Option<&str>,
        payload: &str,
        has_offset: bool,
    ) -> Option<Self> {
        match kind {
            "upload" => {
                let source = if device_tags.contains("pump") {
                    Some(UploadSource::Pump)
                } else if device_tags.contains("cgm") {
                    if time_processing == Some("none") {
                        Some(UploadSource::Healthkit)
                    } else {
                        Some(UploadSource::Cgm)
                    }
                } else {
                    None
                };
                Some(DeviceClass::Upload { source })
            }
            "cbg" if has_offset && !payload.contains("systemTime") => Some(DeviceClass::Cgm),
            "bolus" if has_offset => Some(DeviceClass::Pump),
            _ => None,
        }
    }
}
