pub mod aggregate;
pub mod day_series;
pub mod device_tier;
pub mod dst;
pub mod home;
pub mod impute_tier;
pub mod imputed;
pub mod local_time;
pub mod signals;
pub mod upload_tier;

use crate::models::estimate::DayEstimate;

/// One estimate per day of the series, same order (oldest first).
pub type EstimateTable = Vec<DayEstimate>;
