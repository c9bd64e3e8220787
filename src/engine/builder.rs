use crate::config::BuildConfiguration;
use crate::data::{
    filter_by_date_range, filter_by_instrument, load_csv, save_outputs, Bar,
};
use crate::engine::calendar::{build_calendar, TradingCalendar};
use crate::engine::rollover::{detect_rollovers, Rollover};
use crate::engine::selector::{
    select_main_contracts, select_main_contracts_parallel, ContinuousSeries, DisagreementEvent,
};
use crate::metrics::SeriesSummary;
use anyhow::{Context, Result};
use tracing::info;

//result of a construction run
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub calendar: TradingCalendar,
    pub series: ContinuousSeries,
    pub diagnostics: Vec<DisagreementEvent>,
    pub rollovers: Vec<Rollover>,
    pub summary: SeriesSummary,
}

//drives one continuous-series build from configuration to output files
pub struct ContinuousBuilder {
    config: BuildConfiguration,
}

impl ContinuousBuilder {
    pub fn new(config: BuildConfiguration) -> Self {
        ContinuousBuilder { config }
    }

    pub fn config(&self) -> &BuildConfiguration {
        &self.config
    }

    //loads the dataset once and narrows it to the configured instrument and window
    pub fn load_bars(&self) -> Result<Vec<Bar>> {
        let all_bars = load_csv(&self.config.data_path).context(format!(
            "Failed to load data from {:?}",
            self.config.data_path
        ))?;

        let bars = filter_by_instrument(&all_bars, &self.config.instrument);
        let bars = filter_by_date_range(bars, self.config.start_date, self.config.end_date);

        info!(
            instrument = %self.config.instrument,
            bars = bars.len(),
            "narrowed dataset"
        );
        Ok(bars)
    }

    //runs the build on bars already in memory, writing nothing
    pub fn build_from_bars(&self, bars: &[Bar]) -> Result<BuildResult> {
        let calendar = build_calendar(bars)
            .context(format!("No data found for instrument {}", self.config.instrument))?;

        info!(
            days = calendar.len(),
            first = ?calendar.first(),
            last = ?calendar.last(),
            "built trading calendar"
        );

        let selection = if self.config.parallel {
            select_main_contracts_parallel(bars, &calendar)?
        } else {
            select_main_contracts(bars, &calendar)?
        };

        let rollovers = detect_rollovers(&selection.series, &calendar);
        for rollover in &rollovers {
            info!(
                date = %rollover.date,
                from = %rollover.from,
                to = %rollover.to,
                "main contract rolled"
            );
        }

        let summary = SeriesSummary::from_selection(
            &self.config.instrument,
            &calendar,
            &selection,
            &rollovers,
        );

        Ok(BuildResult {
            calendar,
            series: selection.series,
            diagnostics: selection.diagnostics,
            rollovers,
            summary,
        })
    }

    //load, select and write the configured outputs
    pub fn run(&self) -> Result<BuildResult> {
        self.config.validate()?;

        let bars = self.load_bars()?;
        let result = self.build_from_bars(&bars)?;

        save_outputs(
            &result.series,
            self.config.output_path.as_deref(),
            &result.diagnostics,
            self.config.diagnostics_path.as_deref(),
        )?;

        if let Some(path) = &self.config.output_path {
            info!(path = ?path, rows = result.series.len(), "wrote continuous series");
        }
        if let Some(path) = &self.config.diagnostics_path {
            info!(path = ?path, events = result.diagnostics.len(), "wrote diagnostics");
        }

        Ok(result)
    }
}
