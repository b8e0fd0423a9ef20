use super::device_class::{DeviceClass, UploadSource};
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::fmt;

/// A resolved timezone for one day: always an offset, a name when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub offset: i32,
    pub name: Option<Tz>,
    pub time_processing: Option<String>,
}

impl Zone {
    pub fn new(offset: i32, name: Option<Tz>, time_processing: Option<String>) -> Self {
        Self {
            offset,
            name,
            time_processing,
        }
    }

    pub fn offset_only(offset: i32) -> Self {
        Self::new(offset, None, None)
    }
}

/// Per-day estimate, one variant per tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Estimate {
    #[default]
    Unresolved,
    Upload(Zone),
    Device(Zone),
    Impute {
        zone: Zone,
        gap_size: i64,
    },
    /// Flagged day. The zone is kept when a resolved estimate was downgraded.
    Uncertain(Option<Zone>),
}

impl Estimate {
    pub fn zone(&self) -> Option<&Zone> {
        match self {
            Estimate::Unresolved => None,
            Estimate::Upload(z) | Estimate::Device(z) => Some(z),
            Estimate::Impute { zone, .. } => Some(zone),
            Estimate::Uncertain(z) => z.as_ref(),
        }
    }

    pub fn offset(&self) -> Option<i32> {
        self.zone().map(|z| z.offset)
    }

    pub fn name(&self) -> Option<Tz> {
        self.zone().and_then(|z| z.name)
    }

    pub fn time_processing(&self) -> Option<&str> {
        self.zone().and_then(|z| z.time_processing.as_deref())
    }

    pub fn gap_size(&self) -> Option<i64> {
        match self {
            Estimate::Impute { gap_size, .. } => Some(*gap_size),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<EstimateType> {
        match self {
            Estimate::Unresolved => None,
            Estimate::Upload(_) => Some(EstimateType::Upload),
            Estimate::Device(_) => Some(EstimateType::Device),
            Estimate::Impute { .. } => Some(EstimateType::Impute),
            Estimate::Uncertain(_) => Some(EstimateType::Uncertain),
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Estimate::Unresolved)
    }

    /// A day counts as resolved for neighbour lookups once it carries an offset.
    pub fn has_offset(&self) -> bool {
        self.offset().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateType {
    Upload,
    Device,
    Impute,
    Uncertain,
}

impl EstimateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateType::Upload => "UPLOAD",
            EstimateType::Device => "DEVICE",
            EstimateType::Impute => "IMPUTE",
            EstimateType::Uncertain => "UNCERTAIN",
        }
    }
}

impl fmt::Display for EstimateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Imputed day series a device offset can be matched against, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Upload(UploadSource),
    Home,
}

impl Reference {
    pub const PRIORITY: [Reference; 4] = [
        Reference::Upload(UploadSource::Pump),
        Reference::Upload(UploadSource::Cgm),
        Reference::Upload(UploadSource::Healthkit),
        Reference::Home,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Reference::Upload(UploadSource::Pump) => "pump.upload.imputed",
            Reference::Upload(UploadSource::Cgm) => "cgm.upload.imputed",
            Reference::Upload(UploadSource::Healthkit) => "healthkit.upload.imputed",
            Reference::Home => "home.imputed",
        }
    }
}

/// Why a day could not be trusted.
///
/// The first three are known device defects, recognised from the offset
/// pattern; the last two mean the timezone is simply ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uncertainty {
    LikelyDstErrorOrTravel,
    Likely15MinDstError,
    LikelyAmPmError,
    PumpCgmTzoMismatch,
    UnableToImputeTzo,
}

impl Uncertainty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Uncertainty::LikelyDstErrorOrTravel => "likely-dst-error-or-travel",
            Uncertainty::Likely15MinDstError => "likely-15-min-dst-error",
            Uncertainty::LikelyAmPmError => "likely-am-pm-error",
            Uncertainty::PumpCgmTzoMismatch => "pump-cgm-tzo-mismatch",
            Uncertainty::UnableToImputeTzo => "unable-to-impute-tzo",
        }
    }

    pub fn is_known_device_defect(&self) -> bool {
        matches!(
            self,
            Uncertainty::LikelyDstErrorOrTravel
                | Uncertainty::Likely15MinDstError
                | Uncertainty::LikelyAmPmError
        )
    }
}

/// One entry of a day's audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Travel,
    LikelyTravel,
    DstChangeDay,
    TzInferredFrom(Reference),
    TzInferredFromPrevDay,
    TzoFrom(DeviceClass),
    Gap(i64),
    Uncertain(Uncertainty),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Travel => f.write_str("travel"),
            Annotation::LikelyTravel => f.write_str("likely-travel"),
            Annotation::DstChangeDay => f.write_str("dst-change-day"),
            Annotation::TzInferredFrom(r) => write!(f, "tz-inferred-from-{}", r.label()),
            Annotation::TzInferredFromPrevDay => f.write_str("tz-inferred-from-prev-day"),
            Annotation::TzoFrom(class) => write!(f, "tzo-from-{}", class.as_str()),
            Annotation::Gap(n) => write!(f, "gap={n}"),
            Annotation::Uncertain(u) => f.write_str(u.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEstimate {
    pub date: NaiveDate,
    pub estimate: Estimate,
    pub annotations: Vec<Annotation>,
}

impl DayEstimate {
    pub fn unresolved(date: NaiveDate) -> Self {
        Self {
            date,
            estimate: Estimate::Unresolved,
            annotations: Vec::new(),
        }
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Mark the day UNCERTAIN, keeping whatever zone it already had.
    pub fn mark_uncertain(&mut self, reason: Uncertainty) {
        let zone = self.estimate.zone().cloned();
        self.estimate = Estimate::Uncertain(zone);
        self.annotate(Annotation::Uncertain(reason));
    }

    pub fn has_annotation(&self, label: &str) -> bool {
        self.annotations.iter().any(|a| a.to_string() == label)
    }

    pub fn annotation_labels(&self) -> Vec<String> {
        self.annotations.iter().map(|a| a.to_string()).collect()
    }

    /// Annotations joined the way the day table stores them.
    pub fn annotations_text(&self) -> String {
        self.annotation_labels().join(", ")
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
