use crate::{
    pipeline::read_diff_file,
    prelude::{Config, Constellation, DayStatus, Epoch, Pipeline, System, Systems, SV},
    tests::toolkit::{comparison_line, Workspace},
};

fn gps_config(workspace: &Workspace, start: Epoch, end: Epoch, interval: u32) -> Config {
    Config::new(workspace.root(), start, end, interval).with_systems(Systems::Single(System::GPS))
}

#[test]
fn single_day_two_satellites() {
    let workspace = Workspace::new();
    let ymd = (2024, 1, 9);

    let mut lines = Vec::new();
    for t in [0.0_f64, 5.0, 10.0, 15.0, 20.0] {
        lines.push(comparison_line(
            ymd,
            (0, 0, t),
            "G01",
            [0.25 * t, 0.5 * t, t, 2.0 * t],
        ));
        lines.push(comparison_line(
            ymd,
            (0, 0, t),
            "G02",
            [3.0 + 0.5 * t, 1.0 + 0.25 * t, 2.0 + t, 4.0 * t],
        ));
    }
    workspace.write("cmp0090_24_GPS.txt", &lines);

    let t0 = Epoch::from_gregorian_utc_at_midnight(2024, 1, 9);
    let pipeline = Pipeline::new(gps_config(&workspace, t0, t0, 20)).unwrap();
    let report = pipeline.run();

    assert_eq!(report.days.len(), 1);
    match &report.days[0].status {
        DayStatus::Processed(diff) => {
            assert_eq!(diff.records, 10);
            assert_eq!(diff.malformed, 0);
            assert_eq!(diff.differences, 6);
            assert_eq!(diff.unmatched, 0);
            assert_eq!(diff.resyncs, 0);
            assert_eq!(diff.groups, 6);
            assert_eq!(diff.dropped, 0);
        },
        status => panic!("unexpected status {:?}", status),
    }

    // differences, in stream order
    let (diffs, malformed) = read_diff_file(workspace.root().join("diff/diffcorr2024_009_GPS")).unwrap();
    assert_eq!(malformed, 0);
    assert_eq!(diffs.len(), 6);
    assert_eq!(diffs[0].sv, SV::new(Constellation::GPS, 1));
    assert_eq!(diffs[1].sv, SV::new(Constellation::GPS, 2));
    assert_eq!(diffs[5].lag, 15);

    let daily = workspace.read("ave/avediffcorr2024_009_GPS");
    let expected = "G01 5 1.25 2.5 5 10
G01 10 2.5 5 10 20
G01 15 3.75 7.5 15 30
G02 5 2.5 1.25 5 20
G02 10 5 2.5 10 40
G02 15 7.5 3.75 15 60
";
    assert_eq!(daily, expected);

    let merged = workspace.read("aveGPS");
    assert_eq!(merged.lines().filter(|l| l.is_empty()).count(), 2);
    assert!(merged.starts_with("G01 5 1.250 2.500 5.000 10.000\n"));
    assert!(merged.ends_with("15 5.625 5.625 15.000 45.000 7.500 7.500 15.000 60.000\n"));
}

#[test]
fn multi_day_pooling() {
    let workspace = Workspace::new();

    let day1 = (2024, 1, 9);
    workspace.write(
        "cmp0090_24_GPS.txt",
        &[
            comparison_line(day1, (6, 0, 0.0), "G01", [0.5; 4]),
            "this is not a record".to_string(),
            comparison_line(day1, (6, 0, 5.0), "G01", [1.5; 4]),
            comparison_line(day1, (6, 0, 5.0), "G03", [2.0; 4]),
            comparison_line(day1, (6, 0, 5.0), "E05", [2.0; 4]),
        ],
    );

    let day2 = (2024, 1, 10);
    workspace.write(
        "cmp0100_24_GPS.txt",
        &[
            comparison_line(day2, (0, 0, 0.0), "G02", [1.0; 4]),
            comparison_line(day2, (0, 0, 5.0), "G02", [4.0; 4]),
        ],
    );

    let start = Epoch::from_gregorian_utc_at_midnight(2024, 1, 9);
    let end = Epoch::from_gregorian_utc_at_midnight(2024, 1, 11);

    let pipeline = Pipeline::new(gps_config(&workspace, start, end, 10)).unwrap();
    let report = pipeline.run();

    assert_eq!(report.days.len(), 3);

    match &report.days[0].status {
        DayStatus::Processed(diff) => {
            assert_eq!(diff.records, 4);
            assert_eq!(diff.malformed, 1);
            assert_eq!(diff.foreign, 1);
            assert_eq!(diff.unmatched, 1);
            assert_eq!(diff.differences, 1);
        },
        status => panic!("unexpected status {:?}", status),
    }
    assert!(matches!(report.days[1].status, DayStatus::Processed(_)));
    assert!(matches!(report.days[2].status, DayStatus::MissingInput(_)));
    assert_eq!(report.days[2].day.to_string(), "2024-01-11");

    assert_eq!(workspace.read("ave/avediffcorr2024_009_GPS"), "G01 5 1 1 1 1\n");
    assert_eq!(workspace.read("ave/avediffcorr2024_010_GPS"), "G02 5 3 3 3 3\n");

    assert_eq!(report.merges.len(), 1);
    assert_eq!(report.merges[0].files, 2);
    assert_eq!(report.merges[0].satellites, 2);
    assert_eq!(report.merges[0].lags, 1);

    let expected = "G01 5 1.000 1.000 1.000 1.000

G02 5 3.000 3.000 3.000 3.000

5 2.000 2.000 2.000 2.000 3.000 3.000 3.000 3.000
";
    assert_eq!(workspace.read("aveGPS"), expected);

    // merge only: same result from the daily summaries on disk
    let report = pipeline.merge_all();
    assert!(report.days.is_empty());
    assert_eq!(report.merges.len(), 1);
    assert_eq!(workspace.read("aveGPS"), expected);
}

#[test]
fn all_constellations() {
    let workspace = Workspace::new();
    let ymd = (2023, 12, 31);

    workspace.write(
        "cmp3650_23_GAL.txt",
        &[
            comparison_line(ymd, (12, 0, 0.0), "E11", [1.0; 4]),
            comparison_line(ymd, (12, 0, 30.0), "E11", [2.0; 4]),
        ],
    );

    let t0 = Epoch::from_gregorian_utc_at_midnight(2023, 12, 31);
    let cfg = Config::new(workspace.root(), t0, t0, 60);
    let report = Pipeline::new(cfg).unwrap().run();

    let systems: Vec<System> = report.days.iter().map(|day| day.system).collect();
    assert_eq!(
        systems,
        vec![System::GPS, System::BDS, System::GAL, System::GLO]
    );

    for day in report.days.iter() {
        if day.system == System::GAL {
            assert!(matches!(day.status, DayStatus::Processed(_)));
        } else {
            assert!(matches!(day.status, DayStatus::MissingInput(_)));
        }
    }

    assert_eq!(report.merges.len(), 4);
    assert!(report.failed_merges.is_empty());
    assert_eq!(workspace.read("aveGPS"), "");
    assert_eq!(
        workspace.read("aveGAL"),
        "E11 30 1.000 1.000 1.000 1.000\n\n30 1.000 1.000 1.000 1.000 1.000 1.000 1.000 1.000\n"
    );
}

#[test]
fn unreadable_input() {
    let workspace = Workspace::new();
    std::fs::create_dir_all(workspace.root().join("cmp0090_24_GPS.txt")).unwrap();

    let t0 = Epoch::from_gregorian_utc_at_midnight(2024, 1, 9);
    let t1 = Epoch::from_gregorian_utc_at_midnight(2024, 1, 10);
    let report = Pipeline::new(gps_config(&workspace, t0, t1, 30))
        .unwrap()
        .run();

    assert!(matches!(report.days[0].status, DayStatus::Failed(_)));
    assert!(matches!(report.days[1].status, DayStatus::MissingInput(_)));
    assert_eq!(report.merges.len(), 1);
    assert_eq!(report.merges[0].files, 0);
}

#[test]
fn invalid_config() {
    let workspace = Workspace::new();
    let t0 = Epoch::from_gregorian_utc_at_midnight(2024, 1, 9);
    assert!(Pipeline::new(gps_config(&workspace, t0, t0, 0)).is_err());
}

#[test]
fn unreadable_daily_summary() {
    let workspace = Workspace::new();
    workspace.write("ave/avediffcorr2024_009_GPS", &["G01 5 1 1 1 1".to_string()]);
    workspace.write_bytes("ave/avediffcorr2024_010_GPS", &[0xff, 0xfe, b'\n']);

    let start = Epoch::from_gregorian_utc_at_midnight(2024, 1, 9);
    let end = Epoch::from_gregorian_utc_at_midnight(2024, 1, 10);
    let report = Pipeline::new(gps_config(&workspace, start, end, 30))
        .unwrap()
        .merge_all();

    assert!(report.failed_merges.is_empty());
    assert_eq!(report.merges.len(), 1);
    assert_eq!(report.merges[0].files, 1);
    assert_eq!(report.merges[0].failed_files, 1);
    assert_eq!(report.merges[0].satellites, 1);

    let expected = "G01 5 1.000 1.000 1.000 1.000

5 1.000 1.000 1.000 1.000 1.000 1.000 1.000 1.000
";
    assert_eq!(workspace.read("aveGPS"), expected);
}

#[test]
fn malformed_daily_summary_line() {
    let workspace = Workspace::new();
    workspace.write(
        "ave/avediffcorr2024_009_GPS",
        &[
            "G01 5 1 1 1".to_string(),
            "G02 5 2 2 2 2".to_string(),
        ],
    );

    let t0 = Epoch::from_gregorian_utc_at_midnight(2024, 1, 9);
    let report = Pipeline::new(gps_config(&workspace, t0, t0, 30))
        .unwrap()
        .merge_all();

    assert_eq!(report.merges.len(), 1);
    assert_eq!(report.merges[0].files, 1);
    assert_eq!(report.merges[0].malformed, 1);
    assert_eq!(report.merges[0].failed_files, 0);
    assert_eq!(report.merges[0].satellites, 1);

    let merged = workspace.read("aveGPS");
    assert!(merged.starts_with("G02 5 2.000 2.000 2.000 2.000\n\n"));
    assert!(!merged.contains("G01"));
}

#[test]
fn daily_row_with_emptied_channel() {
    // single difference with a zero clock change: the clock channel is
    // emptied by the filter and the whole daily row is dropped
    let workspace = Workspace::new();
    let ymd = (2024, 1, 9);
    workspace.write(
        "cmp0090_24_GPS.txt",
        &[
            comparison_line(ymd, (0, 0, 0.0), "G01", [0.0, 0.0, 0.0, 5.0]),
            comparison_line(ymd, (0, 0, 5.0), "G01", [1.0, 2.0, 3.0, 5.0]),
        ],
    );

    let t0 = Epoch::from_gregorian_utc_at_midnight(2024, 1, 9);
    let report = Pipeline::new(gps_config(&workspace, t0, t0, 30))
        .unwrap()
        .run();

    match &report.days[0].status {
        DayStatus::Processed(diff) => {
            assert_eq!(diff.differences, 1);
            assert_eq!(diff.groups, 0);
            assert_eq!(diff.dropped, 1);
        },
        status => panic!("unexpected status {:?}", status),
    }

    assert_eq!(workspace.read("diff/diffcorr2024_009_GPS"), "G01 5 1 2 3 0\n");
    assert_eq!(workspace.read("ave/avediffcorr2024_009_GPS"), "");
    assert_eq!(workspace.read("aveGPS"), "");
}
