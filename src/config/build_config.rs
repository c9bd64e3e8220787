use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//complete configuration of one continuous-series build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfiguration {
    //merged per-contract dataset
    pub data_path: PathBuf,

    //instrument code matched as a case-insensitive substring of each contract (eg rb)
    pub instrument: String,

    //optional output paths
    pub output_path: Option<PathBuf>,
    pub diagnostics_path: Option<PathBuf>,

    //optional inclusive date window
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    //select dates on the rayon pool
    pub parallel: bool,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        BuildConfiguration {
            data_path: PathBuf::from("Data/future.csv"),
            instrument: "rb".to_string(),
            output_path: None,
            diagnostics_path: None,
            start_date: None,
            end_date: None,
            parallel: false,
        }
    }
}

impl BuildConfiguration {
    pub fn new(data_path: impl Into<PathBuf>, instrument: impl Into<String>) -> Self {
        BuildConfiguration {
            data_path: data_path.into(),
            instrument: instrument.into(),
            ..Default::default()
        }
    }

    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BuildConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //rejects settings that cannot produce a series
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.instrument.trim().is_empty() {
            anyhow::bail!("instrument code must not be empty");
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                anyhow::bail!("start date {} is after end date {}", start, end);
            }
        }
        Ok(())
    }
}
