use mainline::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const HEADER: &str = "date,contract,open,high,low,close,settle,pre_close,pre_settle,volume,amount,oi";

//two months of rb with a roll from rb2109 into rb2110, plus unrelated hc rows
const ROWS: &[&str] = &[
    "20210830,rb2109,5500,5520,5480,5510,5505,5490,5485,60000,3.3e9,90000",
    "20210830,rb2110,5400,5430,5380,5420,5410,5395,5390,55000,2.9e9,70000",
    "20210830,rb2201,5300,5320,5280,5310,5305,5290,5285,8000,4.2e8,20000",
    "20210830,hc2110,5800,5820,5780,5810,5805,5790,5785,90000,5.2e9,99000",
    "20210831,rb2109,5510,5530,5490,5520,5515,5510,5505,50000,2.7e9,80000",
    "20210831,rb2110,5420,5450,5400,5440,5430,5420,5410,70000,3.8e9,75000",
    "20210831,rb2201,5310,5330,5290,5320,5315,5310,5305,9000,4.8e8,21000",
    "20210901,rb2109,5520,5540,5500,5530,5525,5520,5515,40000,2.2e9,60000",
    "20210901,rb2110,5440,5470,5420,5460,5450,5440,5430,80000,4.3e9,50000",
    "20210901,rb2201,5320,5340,5300,5330,5325,5320,5315,10000,5.3e8,22000",
    "20210902,rb2109,5530,5550,5510,5540,5535,5530,5525,20000,1.1e9,80000",
    "20210902,rb2110,5460,5480,5440,5470,5465,5460,5450,85000,4.6e9,78000",
    "20210902,rb2201,5330,5350,5310,5340,5335,5330,5325,12000,6.4e8,25000",
];

fn write_dataset(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("future.csv");
    let mut body = String::from(HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(&path, body).unwrap();
    path
}

fn config(dir: &TempDir, data: &Path) -> BuildConfiguration {
    let mut config = BuildConfiguration::new(data, "RB");
    config.output_path = Some(dir.path().join("rb_main.csv"));
    config.diagnostics_path = Some(dir.path().join("rb_diag.csv"));
    config
}

#[test]
fn builds_series_with_delivery_month_roll() {
    let dir = tempdir().unwrap();
    let data = write_dataset(&dir, ROWS);
    let result = ContinuousBuilder::new(config(&dir, &data)).run().unwrap();

    assert_eq!(result.calendar.len(), 4);
    assert_eq!(result.series.len(), result.calendar.len());

    let contracts: Vec<_> = result.series.iter().map(|s| s.contract()).collect();
    assert_eq!(contracts, vec!["rb2109", "rb2109", "rb2110", "rb2110"]);

    //hc rows were filtered out before the calendar was built
    assert!(result.series.iter().all(|s| s.contract_oi.starts_with("rb")));

    let first_sept = &result.series[2];
    assert_eq!(first_sept.contract_oi, "rb2109");
    assert_eq!(first_sept.contract_vol, "rb2110");
    assert!(first_sept.delivery_month_excluded);

    assert_eq!(result.rollovers.len(), 1);
    assert_eq!(result.rollovers[0].trading_day, 3);
    assert_eq!(result.rollovers[0].from, "rb2109");
    assert_eq!(result.rollovers[0].to, "rb2110");

    let diag_dates: Vec<_> = result
        .diagnostics
        .iter()
        .map(|e| e.date.format("%Y%m%d").to_string())
        .collect();
    assert_eq!(diag_dates, vec!["20210831", "20210901", "20210902"]);

    assert_eq!(result.summary.trading_days, 4);
    assert_eq!(result.summary.num_rollovers, 1);
    assert_eq!(result.summary.disagreement_days, 3);
    assert_eq!(result.summary.delivery_month_exclusions, 2);
}

#[test]
fn writes_output_files() {
    let dir = tempdir().unwrap();
    let data = write_dataset(&dir, ROWS);
    let config = config(&dir, &data);
    ContinuousBuilder::new(config.clone()).run().unwrap();

    let series = fs::read_to_string(config.output_path.unwrap()).unwrap();
    let lines: Vec<_> = series.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "date,contract,pre_close,pre_settle,open,high,low,close,settle,ch1,ch2,volume,amount,oi,contract_oi,contract_vol"
    );
    assert_eq!(
        lines[3],
        "20210901,rb2110,5440.0,5430.0,5440.0,5470.0,5420.0,5460.0,5450.0,30.0,20.0,80000,4300000000.0,50000,rb2109,rb2110"
    );

    let diagnostics = fs::read_to_string(config.diagnostics_path.unwrap()).unwrap();
    assert_eq!(
        diagnostics,
        "date,oi_leader,vol_leader\n\
         20210831,rb2109,rb2110\n\
         20210901,rb2109,rb2110\n\
         20210902,rb2109,rb2110\n"
    );
}

#[test]
fn repeated_and_parallel_runs_are_byte_identical() {
    let dir = tempdir().unwrap();
    let data = write_dataset(&dir, ROWS);

    let read_outputs = |config: &BuildConfiguration| {
        ContinuousBuilder::new(config.clone()).run().unwrap();
        (
            fs::read(config.output_path.as_ref().unwrap()).unwrap(),
            fs::read(config.diagnostics_path.as_ref().unwrap()).unwrap(),
        )
    };

    let sequential = config(&dir, &data);
    let first = read_outputs(&sequential);
    let second = read_outputs(&sequential);
    assert_eq!(first, second);

    let mut parallel = config(&dir, &data);
    parallel.parallel = true;
    parallel.output_path = Some(dir.path().join("rb_main_par.csv"));
    parallel.diagnostics_path = Some(dir.path().join("rb_diag_par.csv"));
    assert_eq!(read_outputs(&parallel), first);
}

#[test]
fn row_order_does_not_change_output() {
    let dir = tempdir().unwrap();
    let forward = write_dataset(&dir, ROWS);
    let config_fwd = config(&dir, &forward);
    ContinuousBuilder::new(config_fwd.clone()).run().unwrap();
    let expected = fs::read(config_fwd.output_path.unwrap()).unwrap();

    let reversed_dir = tempdir().unwrap();
    let rows: Vec<&str> = ROWS.iter().rev().copied().collect();
    let reversed = write_dataset(&reversed_dir, &rows);
    let config_rev = config(&reversed_dir, &reversed);
    ContinuousBuilder::new(config_rev.clone()).run().unwrap();

    assert_eq!(fs::read(config_rev.output_path.unwrap()).unwrap(), expected);
}

#[test]
fn date_window_limits_the_calendar() {
    let dir = tempdir().unwrap();
    let data = write_dataset(&dir, ROWS);
    let mut config = config(&dir, &data);
    config.start_date = chrono::NaiveDate::from_ymd_opt(2021, 9, 1);

    let result = ContinuousBuilder::new(config).run().unwrap();
    assert_eq!(result.calendar.len(), 2);
    assert_eq!(result.calendar.index_of(result.series[0].date()), Some(1));
    assert!(result.rollovers.is_empty());
}

#[test]
fn unknown_instrument_fails_without_output() {
    let dir = tempdir().unwrap();
    let data = write_dataset(&dir, ROWS);
    let mut config = config(&dir, &data);
    config.instrument = "cu".to_string();

    let err = ContinuousBuilder::new(config.clone()).run().unwrap_err();
    assert!(err.to_string().contains("No data found for instrument cu"));
    assert!(matches!(
        err.downcast_ref::<SelectionError>(),
        Some(SelectionError::EmptyInput)
    ));
    assert!(!config.output_path.unwrap().exists());
}

#[test]
fn malformed_contract_code_aborts_the_run() {
    let dir = tempdir().unwrap();
    let data = write_dataset(
        &dir,
        &[
            "20210901,rb2110,1,2,1,2,2,1,1,100,,100",
            "20210902,rbXXYY,1,2,1,2,2,1,1,100,,900",
            "20210902,rb2110,1,2,1,2,2,1,1,100,,100",
        ],
    );
    let config = config(&dir, &data);

    let err = ContinuousBuilder::new(config.clone()).run().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SelectionError>(),
        Some(SelectionError::MalformedContractCode(_))
    ));
    assert!(!config.output_path.unwrap().exists());
}

#[test]
fn unwritable_diagnostics_path_leaves_no_series_file() {
    let dir = tempdir().unwrap();
    let data = write_dataset(&dir, ROWS);
    let mut config = config(&dir, &data);
    config.diagnostics_path = Some(dir.path().join("no_such_dir").join("rb_diag.csv"));

    let err = ContinuousBuilder::new(config.clone()).run().unwrap_err();
    assert!(err.to_string().contains("rb_diag.csv"));

    let series_path = config.output_path.unwrap();
    assert!(!series_path.exists());
    assert!(!dir.path().join("rb_main.csv.partial").exists());
}

#[test]
fn single_contract_day_passes_through() {
    let dir = tempdir().unwrap();
    let data = write_dataset(&dir, &["20210901,rb2201,1,2,1,2,2,1,1,500,,1000"]);
    let result = ContinuousBuilder::new(config(&dir, &data)).run().unwrap();

    assert_eq!(result.series.len(), 1);
    assert_eq!(result.series[0].contract(), "rb2201");
    assert!(result.diagnostics.is_empty());
}

#[test]
fn rollover_strategy_signals_on_the_roll_day() {
    let dir = tempdir().unwrap();
    let data = write_dataset(&dir, ROWS);
    let result = ContinuousBuilder::new(config(&dir, &data)).run().unwrap();

    let mut strategy = RolloverStrategy::new();
    let signals = run_strategy(&result.series, &result.calendar, &mut strategy);

    assert_eq!(signals.len(), 4);
    assert_eq!(
        signals[2].1,
        Signal::Roll {
            close: "rb2109".to_string(),
            open: "rb2110".to_string(),
        }
    );
    assert_eq!(strategy.rolls(), result.rollovers.len());
}
