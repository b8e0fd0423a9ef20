#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rlocaltime::Estimation;
use rlocaltime::models::device_class::{DeviceClass, UploadSource};
use rlocaltime::models::estimate::DayEstimate;
use rlocaltime::models::record::Record;
use rlocaltime::utils::date::parse_utc_time;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rlt() -> Command {
    cargo_bin_cmd!("rlocaltime")
}

pub fn at(s: &str) -> DateTime<Utc> {
    parse_utc_time(s).expect("valid test timestamp")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn tz(name: &str) -> Tz {
    name.parse().expect("valid IANA name")
}

/// Upload without device tags: counts for the upload tier and home, feeds no imputed series.
pub fn upload(time: &str, zone: &str) -> Record {
    Record::new(format!("upload-{time}"), "upload", at(time))
        .with_class(DeviceClass::Upload { source: None })
        .with_timezone(tz(zone))
}

pub fn sourced_upload(time: &str, zone: &str, source: UploadSource) -> Record {
    Record::new(format!("upload-{}-{time}", source.as_str()), "upload", at(time))
        .with_class(DeviceClass::Upload {
            source: Some(source),
        })
        .with_timezone(tz(zone))
        .with_time_processing("utc-bootstrapping")
}

pub fn pump(time: &str, offset: i32) -> Record {
    Record::new(format!("bolus-{time}"), "bolus", at(time))
        .with_class(DeviceClass::Pump)
        .with_offset(offset)
}

pub fn cgm(time: &str, offset: i32) -> Record {
    Record::new(format!("cbg-{time}"), "cbg", at(time))
        .with_class(DeviceClass::Cgm)
        .with_offset(offset)
}

/// A record that only marks the day as part of the dataset.
pub fn plain(time: &str) -> Record {
    Record::new(format!("food-{time}"), "food", at(time))
}

pub fn day<'a>(est: &'a Estimation, d: &str) -> &'a DayEstimate {
    est.days
        .iter()
        .find(|x| x.date == date(d))
        .unwrap_or_else(|| panic!("no estimate for {d}"))
}

/// Create a unique path inside the system temp dir and remove any existing file
pub fn temp_path(name: &str, ext: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("rlocaltime_{}.{}", name, ext));
    fs::remove_file(&path).ok();
    path
}

/// Fresh, empty directory inside the system temp dir
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("rlocaltime_{}", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

pub fn write_alias_table(name: &str) -> PathBuf {
    let path = temp_path(name, "csv");
    fs::write(
        &path,
        "tz,alias\nUS/Mountain,America/Denver\nUS/Eastern,America/New_York\nAsia/Calcutta,Asia/Kolkata\n",
    )
    .expect("write alias table");
    path
}
