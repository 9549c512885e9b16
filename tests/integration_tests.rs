use std::env;
use std::fs;
use std::fs::File;
use std::io::Read;

use chrono::NaiveDate;
use flate2::read::GzDecoder;
use stc_rater::analyzers::pipeline::analyze_intersection;
use stc_rater::config::AnalysisConfig;
use stc_rater::ingest::{load_counts, load_holidays, load_intersections};
use stc_rater::output::{write_errors, write_results};

fn temp_dir(name: &str) -> String {
    let dir = format!("{}/{}", env::temp_dir().display(), name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Writes a synthetic dataset: one intersection with steady 2/1/1/0
/// pedestrians per 15-minute interval across seven short-term-eligible days,
/// one of which is listed as a holiday.
fn write_dataset(dir: &str) {
    let days = [
        NaiveDate::from_ymd_opt(2022, 4, 5).unwrap(),
        NaiveDate::from_ymd_opt(2022, 4, 6).unwrap(),
        NaiveDate::from_ymd_opt(2022, 4, 7).unwrap(),
        NaiveDate::from_ymd_opt(2022, 4, 12).unwrap(),
        NaiveDate::from_ymd_opt(2022, 4, 13).unwrap(),
        NaiveDate::from_ymd_opt(2022, 4, 14).unwrap(),
        NaiveDate::from_ymd_opt(2022, 5, 3).unwrap(),
    ];

    let mut body =
        String::from("name;date;time;ped_N;ped_S;ped_W;ped_E;vol_vehicle;latitude;longitude\n");
    for date in days {
        for hour in 0..24 {
            for minute in [0, 15, 30, 45] {
                body.push_str(&format!(
                    "Main & First;{};{hour:02}:{minute:02}:00;2;1;1;0;5;43.51;-79.88\n",
                    date.format("%Y-%m-%d")
                ));
            }
        }
    }
    fs::write(format!("{dir}/synth.csv"), body).unwrap();
    fs::write(
        format!("{dir}/synth_intersections.csv"),
        "intersection\nMain & First\n",
    )
    .unwrap();
    fs::write(format!("{dir}/synth_holidays.csv"), "holiday\n2022-04-13\n").unwrap();
}

#[test]
fn test_full_pipeline_from_csv_to_output_tables() {
    let dir = temp_dir("stc_rater_it_full");
    write_dataset(&dir);

    let start = NaiveDate::from_ymd_opt(2021, 10, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2022, 9, 30).unwrap();

    let table = load_counts(&format!("{dir}/synth.csv"), start, end).unwrap();
    let intersections = load_intersections(&format!("{dir}/synth_intersections.csv")).unwrap();
    let holidays = load_holidays(&format!("{dir}/synth_holidays.csv")).unwrap();

    assert_eq!(intersections, vec!["Main & First"]);
    assert_eq!(table.record_count(), 7 * 96);

    let config = AnalysisConfig::default();
    let series = table.series(&intersections[0]).unwrap();
    let analysis =
        analyze_intersection(&intersections[0], series, &holidays, &config, 42).unwrap();

    let result = &analysis.result;
    // The holiday still counts as a valid day, just not as a short-term one.
    assert_eq!(result.valid_daily_counts, 7);
    assert_eq!(result.valid_stc_days, 6);

    // Steady 2/1/1/0 per interval: 192 N + 96 S + 96 W per day. With April
    // fully covered and May present only on Tuesdays, the stratified total
    // works out to 256.
    assert!((result.aadpt - 256.0).abs() < 1e-9);
    assert!((result.ratio_n_true - 0.5).abs() < 1e-12);
    assert!((result.ratio_s_true - 0.25).abs() < 1e-12);
    assert!((result.ratio_w_true - 0.25).abs() < 1e-12);
    assert_eq!(result.ratio_e_true, 0.0);

    // Every short-term day reproduces the true split exactly.
    assert!(result.mean_avg_err.abs() < 1e-9);
    assert!(result.lb_avg_err.abs() < 1e-9);
    assert!(result.ub_avg_err.abs() < 1e-9);
    assert!(result.ptile_avg_err.abs() < 1e-9);
    assert_eq!(analysis.error_rows.len(), 6);

    let results_path = format!("{dir}/synth_results.csv");
    write_results(&results_path, &[analysis.result.clone()]).unwrap();
    let errors_path =
        write_errors(&format!("{dir}/synth_errors.csv"), &analysis.error_rows, false).unwrap();

    let results_content = fs::read_to_string(&results_path).unwrap();
    assert_eq!(results_content.lines().count(), 2);
    assert!(results_content.starts_with("intersection,valid_24h_counts,AADPT"));

    let errors_content = fs::read_to_string(&errors_path).unwrap();
    assert_eq!(errors_content.lines().count(), 7);
    assert!(errors_content.starts_with("intersection,ratio_N_errs"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_resampled_run_reproduces_and_gzips() {
    let dir = temp_dir("stc_rater_it_resample");
    write_dataset(&dir);

    let start = NaiveDate::from_ymd_opt(2021, 10, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2022, 9, 30).unwrap();
    let table = load_counts(&format!("{dir}/synth.csv"), start, end).unwrap();
    let holidays = load_holidays(&format!("{dir}/synth_holidays.csv")).unwrap();

    let config = AnalysisConfig {
        sample_size: 2,
        repeat: 15,
        ..AnalysisConfig::default()
    };
    let series = table.series("Main & First").unwrap();

    let first = analyze_intersection("Main & First", series, &holidays, &config, 7).unwrap();
    let second = analyze_intersection("Main & First", series, &holidays, &config, 7).unwrap();

    assert_eq!(first.error_rows.len(), 15);
    assert_eq!(first.result.mean_avg_err, second.result.mean_avg_err);
    assert_eq!(first.result.ptile_n_err, second.result.ptile_n_err);

    let written =
        write_errors(&format!("{dir}/synth_errors.csv"), &first.error_rows, true).unwrap();
    assert!(written.ends_with("synth_errors.csv.gz"));

    let mut decoder = GzDecoder::new(File::open(&written).unwrap());
    let mut content = String::new();
    decoder.read_to_string(&mut content).unwrap();
    assert_eq!(content.lines().count(), 16);

    fs::remove_dir_all(&dir).unwrap();
}
