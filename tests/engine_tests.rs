mod common;
use common::*;

use chrono::{Duration, NaiveDateTime};
use rlocaltime::Core;
use rlocaltime::errors::AppError;
use rlocaltime::models::device_class::{DeviceClass, UploadSource};
use rlocaltime::models::estimate::EstimateType;
use rlocaltime::models::record::Record;

fn local(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("valid local time")
}

/// Three New York uploads make New York home; one Denver upload on Jan 10.
fn new_york_home_with_denver_trip() -> Vec<Record> {
    vec![
        upload("2020-01-01T12:00:00Z", "America/New_York"),
        upload("2020-01-01T13:00:00Z", "America/New_York"),
        upload("2020-01-01T14:00:00Z", "America/New_York"),
        upload("2020-01-10T18:00:00Z", "America/Denver"),
    ]
}

#[test]
fn test_day_series_is_contiguous() {
    let records = vec![
        plain("2020-01-05T10:00:00Z"),
        plain("2019-12-30T23:59:00Z"),
        plain("2020-01-01T00:00:00Z"),
    ];

    let est = Core::estimate(&records).expect("estimate");

    assert_eq!(est.days.len(), 7);
    assert_eq!(est.days[0].date, date("2019-12-30"));
    assert_eq!(est.days[6].date, date("2020-01-05"));
    for w in est.days.windows(2) {
        assert_eq!(w[1].date - w[0].date, Duration::days(1));
    }
}

#[test]
fn test_no_usable_record_is_insufficient_data() {
    let err = Core::estimate(&[]).unwrap_err();
    assert!(matches!(err, AppError::InsufficientData(_)));
}

#[test]
fn test_upload_day_uses_upload_timezone() {
    let records = vec![
        upload("2020-07-01T12:00:00Z", "America/New_York"),
        // the pump disagrees, the upload still wins
        pump("2020-07-01T13:00:00Z", -300),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-07-01");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Upload));
    assert_eq!(d.estimate.name(), Some(tz("America/New_York")));
    assert_eq!(d.estimate.offset(), Some(-240));
    assert!(d.annotations.is_empty());
}

#[test]
fn test_upload_away_from_home_is_travel() {
    let est = Core::estimate(&new_york_home_with_denver_trip()).expect("estimate");

    assert_eq!(est.home, Some(tz("America/New_York")));

    let trip = day(&est, "2020-01-10");
    assert_eq!(trip.estimate.kind(), Some(EstimateType::Upload));
    assert_eq!(trip.estimate.offset(), Some(-420));
    assert!(trip.has_annotation("travel"));

    assert!(!day(&est, "2020-01-01").has_annotation("travel"));
}

#[test]
fn test_device_offset_matching_previous_day_takes_its_name() {
    let mut records = new_york_home_with_denver_trip();
    records.push(pump("2020-01-11T15:00:00Z", -420));

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-11");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Device));
    assert_eq!(d.estimate.name(), Some(tz("America/Denver")));
    assert_eq!(d.estimate.offset(), Some(-420));
    assert!(d.has_annotation("tz-inferred-from-prev-day"));
    assert!(!d.has_annotation("likely-travel"));
}

#[test]
fn test_twelve_hour_difference_is_am_pm_error() {
    let mut records = new_york_home_with_denver_trip();
    records.push(pump("2020-01-11T15:00:00Z", -420 + 720));

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-11");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Uncertain));
    assert!(d.has_annotation("likely-am-pm-error"));
}

#[test]
fn test_quarter_hour_drift_is_flagged() {
    let records = vec![
        upload("2020-01-10T18:00:00Z", "America/Denver"),
        pump("2020-01-11T15:00:00Z", -405),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-11");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Uncertain));
    assert!(d.has_annotation("likely-15-min-dst-error"));
}

#[test]
fn test_full_dst_step_outside_transition_is_flagged() {
    let records = vec![
        upload("2020-01-10T18:00:00Z", "America/Denver"),
        pump("2020-01-11T15:00:00Z", -360),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-11");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Uncertain));
    assert!(d.has_annotation("likely-dst-error-or-travel"));
}

#[test]
fn test_unrelated_device_offset_is_likely_travel() {
    let records = vec![
        upload("2020-01-10T18:00:00Z", "America/Denver"),
        pump("2020-01-11T15:00:00Z", 60),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-11");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Device));
    assert_eq!(d.estimate.offset(), Some(60));
    assert_eq!(d.estimate.name(), None);
    assert!(d.has_annotation("likely-travel"));
    assert!(d.has_annotation("tzo-from-pump"));
}

#[test]
fn test_device_offset_matching_home_is_inferred_from_home() {
    let records = vec![
        upload("2020-01-01T12:00:00Z", "America/New_York"),
        pump("2020-01-02T12:00:00Z", -300),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-02");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Device));
    assert_eq!(d.estimate.name(), Some(tz("America/New_York")));
    assert!(d.has_annotation("tz-inferred-from-home.imputed"));
}

#[test]
fn test_device_lagging_on_dst_change_day_takes_new_offset() {
    // 2021-03-14 is the spring-forward day in New York; the pump still says EST
    let records = vec![
        upload("2021-03-12T12:00:00Z", "America/New_York"),
        pump("2021-03-14T16:00:00Z", -300),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2021-03-14");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Device));
    assert_eq!(d.estimate.offset(), Some(-240));
    assert_eq!(
        d.annotation_labels(),
        vec!["dst-change-day", "tz-inferred-from-home.imputed"]
    );
}

#[test]
fn test_pump_upload_series_is_preferred_reference() {
    let records = vec![
        sourced_upload("2020-01-01T12:00:00Z", "America/Denver", UploadSource::Pump),
        pump("2020-01-03T12:00:00Z", -420),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-03");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Device));
    assert_eq!(d.estimate.name(), Some(tz("America/Denver")));
    assert_eq!(d.estimate.time_processing(), Some("utc-bootstrapping"));
    assert!(d.has_annotation("tz-inferred-from-pump.upload.imputed"));

    let gap = day(&est, "2020-01-02");
    assert_eq!(gap.estimate.kind(), Some(EstimateType::Impute));
    assert_eq!(gap.estimate.gap_size(), Some(2));
}

#[test]
fn test_pump_cgm_disagreement_downgrades_device_day() {
    let records = vec![
        upload("2020-01-01T12:00:00Z", "America/New_York"),
        pump("2020-01-02T12:00:00Z", -300),
        cgm("2020-01-02T12:05:00Z", -420),
        pump("2020-01-03T12:00:00Z", -300),
        cgm("2020-01-03T12:05:00Z", -240),
    ];

    let est = Core::estimate(&records).expect("estimate");

    let mismatch = day(&est, "2020-01-02");
    assert_eq!(mismatch.estimate.kind(), Some(EstimateType::Uncertain));
    assert_eq!(mismatch.estimate.offset(), Some(-300));
    assert!(mismatch.has_annotation("pump-cgm-tzo-mismatch"));

    // one hour apart is still tolerated
    let tolerated = day(&est, "2020-01-03");
    assert_eq!(tolerated.estimate.kind(), Some(EstimateType::Device));
}

#[test]
fn test_gap_between_same_zone_is_filled_across_dst() {
    let records = vec![
        upload("2021-03-12T17:00:00Z", "America/New_York"),
        upload("2021-03-17T17:00:00Z", "America/New_York"),
    ];

    let est = Core::estimate(&records).expect("estimate");

    let expected = [
        ("2021-03-13", -300),
        ("2021-03-14", -240),
        ("2021-03-15", -240),
        ("2021-03-16", -240),
    ];
    for (d, offset) in expected {
        let filled = day(&est, d);
        assert_eq!(filled.estimate.kind(), Some(EstimateType::Impute), "{d}");
        assert_eq!(filled.estimate.name(), Some(tz("America/New_York")), "{d}");
        assert_eq!(filled.estimate.offset(), Some(offset), "{d}");
        assert_eq!(filled.estimate.gap_size(), Some(5), "{d}");
        assert!(filled.has_annotation("gap=5"), "{d}");
    }
}

#[test]
fn test_gap_between_same_offset_fills_offset_only() {
    let records = vec![
        pump("2020-01-01T12:00:00Z", 60),
        pump("2020-01-04T12:00:00Z", 60),
    ];

    let est = Core::estimate(&records).expect("estimate");

    assert!(day(&est, "2020-01-01").has_annotation("likely-travel"));
    for d in ["2020-01-02", "2020-01-03"] {
        let filled = day(&est, d);
        assert_eq!(filled.estimate.kind(), Some(EstimateType::Impute));
        assert_eq!(filled.estimate.offset(), Some(60));
        assert_eq!(filled.estimate.name(), None);
        assert_eq!(filled.estimate.gap_size(), Some(3));
    }
}

#[test]
fn test_gap_between_different_zones_is_uncertain() {
    let est = Core::estimate(&new_york_home_with_denver_trip()).expect("estimate");

    for d in ["2020-01-02", "2020-01-05", "2020-01-09"] {
        let between = day(&est, d);
        assert_eq!(between.estimate.kind(), Some(EstimateType::Uncertain));
        assert!(between.has_annotation("unable-to-impute-tzo"));
    }
}

#[test]
fn test_oldest_days_extend_home_and_newest_stay_uncertain() {
    let records = vec![
        plain("2020-01-05T12:00:00Z"),
        upload("2020-01-10T12:00:00Z", "America/New_York"),
        plain("2020-01-12T12:00:00Z"),
    ];

    let est = Core::estimate(&records).expect("estimate");

    for d in ["2020-01-05", "2020-01-09"] {
        let filled = day(&est, d);
        assert_eq!(filled.estimate.kind(), Some(EstimateType::Impute));
        assert_eq!(filled.estimate.name(), Some(tz("America/New_York")));
        assert_eq!(filled.estimate.offset(), Some(-300));
        assert_eq!(filled.estimate.gap_size(), Some(4));
        assert!(filled.has_annotation("gap=4"));
    }

    for d in ["2020-01-11", "2020-01-12"] {
        let trailing = day(&est, d);
        assert_eq!(trailing.estimate.kind(), Some(EstimateType::Uncertain));
        assert!(trailing.has_annotation("unable-to-impute-tzo"));
    }
}

#[test]
fn test_home_only_leaves_every_day_uncertain() {
    // named readings without offsets: a home timezone but nothing to resolve a day
    let records: Vec<Record> = ["2020-01-01", "2020-01-02", "2020-01-03"]
        .iter()
        .map(|d| {
            Record::new(format!("cbg-{d}"), "cbg", at(&format!("{d}T12:00:00Z")))
                .with_timezone(tz("America/New_York"))
        })
        .collect();

    let est = Core::estimate(&records).expect("estimate");

    assert_eq!(est.home, Some(tz("America/New_York")));
    assert_eq!(est.count(EstimateType::Uncertain), 3);
    for d in &est.days {
        assert!(d.has_annotation("unable-to-impute-tzo"));
        assert_eq!(d.estimate.offset(), None);
    }
    assert!(est.records.iter().all(|r| r.local_time.is_none()));
}

#[test]
fn test_every_day_ends_resolved_and_uncertain_days_explain_why() {
    let mut records = new_york_home_with_denver_trip();
    records.extend([
        pump("2020-01-11T15:00:00Z", 300),
        cgm("2020-01-12T15:00:00Z", -405),
        plain("2020-01-15T15:00:00Z"),
    ]);

    let est = Core::estimate(&records).expect("estimate");

    assert_eq!(est.days.len(), 15);
    for d in &est.days {
        assert!(!d.estimate.is_unresolved(), "{} left unresolved", d.date);
        if d.estimate.kind() == Some(EstimateType::Uncertain) {
            assert!(!d.annotations.is_empty(), "{} has no reason", d.date);
        }
    }
}

#[test]
fn test_local_time_adds_day_offset() {
    let records = vec![
        upload("2020-07-01T12:00:00Z", "America/New_York"),
        plain("2020-07-01T16:30:00Z"),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let food = est
        .records
        .iter()
        .find(|r| r.record.kind == "food")
        .expect("food record");

    assert_eq!(food.estimate_type, Some(EstimateType::Upload));
    assert_eq!(food.offset, Some(-240));
    assert_eq!(food.local_time, Some(local("2020-07-01T12:30:00")));
}

#[test]
fn test_records_near_dst_change_use_offset_at_their_instant() {
    let records = vec![
        upload("2018-03-10T18:00:00Z", "America/Denver"),
        upload("2018-03-11T18:00:00Z", "America/Denver"),
        upload("2018-03-12T18:00:00Z", "America/Denver"),
        // 01:30 MST, before the clocks moved
        Record::new("early", "cbg", at("2018-03-11T08:30:00Z")),
    ];

    let est = Core::estimate(&records).expect("estimate");
    assert_eq!(day(&est, "2018-03-11").estimate.offset(), Some(-360));

    let find = |id: &str| {
        est.records
            .iter()
            .find(|r| r.record.id == id)
            .expect("record present")
    };

    let early = find("early");
    assert_eq!(early.offset, Some(-420));
    assert_eq!(early.local_time, Some(local("2018-03-11T01:30:00")));

    let noon = find("upload-2018-03-11T18:00:00Z");
    assert_eq!(noon.offset, Some(-360));
    assert_eq!(noon.local_time, Some(local("2018-03-11T12:00:00")));

    let before = find("upload-2018-03-10T18:00:00Z");
    assert_eq!(before.offset, Some(-420));
    assert_eq!(before.local_time, Some(local("2018-03-10T11:00:00")));
}

#[test]
fn test_flagged_day_inside_same_zone_gap_keeps_its_flag() {
    let records = vec![
        upload("2020-01-10T18:00:00Z", "America/Denver"),
        pump("2020-01-11T15:00:00Z", -420 + 720),
        upload("2020-01-12T18:00:00Z", "America/Denver"),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-11");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Uncertain));
    assert_eq!(d.estimate.offset(), None);
    assert_eq!(d.annotation_labels(), vec!["likely-am-pm-error"]);
}

#[test]
fn test_device_moving_clock_on_previous_day_zone_transition() {
    // home is New York; the user is in Denver when Denver springs forward
    let records = vec![
        upload("2018-03-01T12:00:00Z", "America/New_York"),
        upload("2018-03-01T13:00:00Z", "America/New_York"),
        upload("2018-03-01T14:00:00Z", "America/New_York"),
        upload("2018-03-10T18:00:00Z", "America/Denver"),
        pump("2018-03-11T18:00:00Z", -360),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2018-03-11");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Device));
    assert_eq!(d.estimate.name(), Some(tz("America/Denver")));
    assert_eq!(d.estimate.offset(), Some(-360));
    assert_eq!(
        d.annotation_labels(),
        vec!["dst-change-day", "tz-inferred-from-prev-day"]
    );
}

/// Denver home from a Jan 1 upload, nothing on Jan 2, a pump offset on Jan 3.
fn denver_home_then_pump(offset: i32) -> rlocaltime::Estimation {
    let records = vec![
        upload("2020-01-01T18:00:00Z", "America/Denver"),
        pump("2020-01-03T15:00:00Z", offset),
    ];
    Core::estimate(&records).expect("estimate")
}

#[test]
fn test_device_without_previous_offset_is_compared_with_home() {
    let dst_step = denver_home_then_pump(-360);
    let d = day(&dst_step, "2020-01-03");
    assert_eq!(d.estimate.kind(), Some(EstimateType::Uncertain));
    assert!(d.has_annotation("likely-dst-error-or-travel"));

    let am_pm = denver_home_then_pump(-420 + 720);
    let d = day(&am_pm, "2020-01-03");
    assert_eq!(d.estimate.kind(), Some(EstimateType::Uncertain));
    assert!(d.has_annotation("likely-am-pm-error"));

    let abroad = denver_home_then_pump(60);
    let d = day(&abroad, "2020-01-03");
    assert_eq!(d.estimate.kind(), Some(EstimateType::Device));
    assert_eq!(d.estimate.offset(), Some(60));
    assert_eq!(d.estimate.name(), None);
    assert_eq!(d.annotation_labels(), vec!["likely-travel", "tzo-from-pump"]);
}

#[test]
fn test_unnamed_reference_match_defers_to_named_one() {
    // pump upload with an offset but no timezone name
    let unnamed_upload = Record::new("pump-upload", "upload", at("2020-01-01T12:00:00Z"))
        .with_class(DeviceClass::Upload {
            source: Some(UploadSource::Pump),
        })
        .with_offset(-420);

    let records = vec![
        unnamed_upload,
        pump("2020-01-01T13:00:00Z", -420),
        upload("2020-01-05T18:00:00Z", "America/Denver"),
    ];

    let est = Core::estimate(&records).expect("estimate");
    let d = day(&est, "2020-01-01");

    assert_eq!(d.estimate.kind(), Some(EstimateType::Device));
    assert_eq!(d.estimate.name(), Some(tz("America/Denver")));
    assert_eq!(d.annotation_labels(), vec!["tz-inferred-from-home.imputed"]);
}
