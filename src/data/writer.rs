use crate::engine::selector::{ContinuousSeries, DisagreementEvent};
use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y%m%d";

//one row of the continuous series file, in output column order
#[derive(Debug, Serialize)]
struct SeriesRecord<'a> {
    date: String,
    contract: &'a str,
    pre_close: f64,
    pre_settle: f64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    settle: f64,
    ch1: f64,
    ch2: f64,
    volume: u64,
    amount: Option<f64>,
    oi: u64,
    contract_oi: &'a str,
    contract_vol: &'a str,
}

//writes the continuous series to any writer
pub fn write_series<W: io::Write>(series: &ContinuousSeries, out: W) -> Result<()> {
    let mut writer = Writer::from_writer(out);

    for selection in series {
        let bar = &selection.bar;
        writer.serialize(SeriesRecord {
            date: bar.date.format(DATE_FORMAT).to_string(),
            contract: &bar.contract,
            pre_close: bar.pre_close,
            pre_settle: bar.pre_settle,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            settle: bar.settle,
            ch1: bar.ch1(),
            ch2: bar.ch2(),
            volume: bar.volume,
            amount: bar.amount,
            oi: bar.open_interest,
            contract_oi: &selection.contract_oi,
            contract_vol: &selection.contract_vol,
        })?;
    }

    writer.flush()?;
    Ok(())
}

//writes the disagreement log to any writer
//the header is written even when there are no events
pub fn write_diagnostics<W: io::Write>(events: &[DisagreementEvent], out: W) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(["date", "oi_leader", "vol_leader"])?;

    for event in events {
        let date = event.date.format(DATE_FORMAT).to_string();
        writer.write_record([date.as_str(), event.oi_leader.as_str(), event.vol_leader.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}

//sibling path a file is written under before it is moved over `target`
fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    target.with_file_name(name)
}

fn stage<F>(target: &Path, staged: &mut Vec<(PathBuf, PathBuf)>, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    let tmp = staging_path(target);
    let file = File::create(&tmp).context(format!("Failed to create {:?}", tmp))?;
    staged.push((tmp, target.to_path_buf()));
    write(file).context(format!("Failed to write {:?}", target))
}

fn commit(staged: &[(PathBuf, PathBuf)]) -> Result<()> {
    for (done, (tmp, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, target) {
            for (_, committed) in &staged[..done] {
                let _ = fs::remove_file(committed);
            }
            return Err(e).context(format!("Failed to move output into {:?}", target));
        }
    }
    Ok(())
}

//saves the series and disagreement csvs for whichever paths are set
//both files are staged first; a failure on either leaves neither behind
pub fn save_outputs(
    series: &ContinuousSeries,
    series_path: Option<&Path>,
    events: &[DisagreementEvent],
    diagnostics_path: Option<&Path>,
) -> Result<()> {
    let mut staged = Vec::new();

    let written = (|| -> Result<()> {
        if let Some(path) = series_path {
            stage(path, &mut staged, |file| write_series(series, file))?;
        }
        if let Some(path) = diagnostics_path {
            stage(path, &mut staged, |file| write_diagnostics(events, file))?;
        }
        commit(&staged)
    })();

    if written.is_err() {
        for (tmp, _) in &staged {
            let _ = fs::remove_file(tmp);
        }
    }
    written
}
