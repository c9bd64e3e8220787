use crate::data::Bar;
use crate::engine::calendar::TradingCalendar;
use crate::engine::error::SelectionError;
use crate::instrument::ContractCode;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info, warn};

//the continuous-series bar chosen for one trading date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySelection {
    pub bar: Bar,

    //open-interest leader that day
    pub contract_oi: String,

    //volume leader that day
    pub contract_vol: String,

    //true when the open-interest leader was in its delivery month
    //and a different contract took its place
    pub delivery_month_excluded: bool,
}

impl DailySelection {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    pub fn contract(&self) -> &str {
        &self.bar.contract
    }
}

//one selection per calendar date, ascending
pub type ContinuousSeries = Vec<DailySelection>;

//a day where the open-interest and volume leaders differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisagreementEvent {
    pub date: NaiveDate,
    pub oi_leader: String,
    pub vol_leader: String,
}

//output of a selection run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub series: ContinuousSeries,
    pub diagnostics: Vec<DisagreementEvent>,
}

//open interest desc, volume desc, then contract code so the order is total
fn by_open_interest(a: &Bar, b: &Bar) -> Ordering {
    b.open_interest
        .cmp(&a.open_interest)
        .then_with(|| b.volume.cmp(&a.volume))
        .then_with(|| a.contract.cmp(&b.contract))
}

//volume desc, open interest desc, then contract code
fn by_volume(a: &Bar, b: &Bar) -> Ordering {
    b.volume
        .cmp(&a.volume)
        .then_with(|| b.open_interest.cmp(&a.open_interest))
        .then_with(|| a.contract.cmp(&b.contract))
}

//picks the main contract for one date from the bars trading that day
pub(crate) fn select_for_day(
    date: NaiveDate,
    day_bars: &[&Bar],
) -> Result<(DailySelection, Option<DisagreementEvent>), SelectionError> {
    debug_assert!(
        day_bars.iter().all(|bar| bar.date == date),
        "day slice for {} holds bars from other dates",
        date
    );

    let leader_oi = day_bars
        .iter()
        .copied()
        .min_by(|a, b| by_open_interest(a, b))
        .ok_or(SelectionError::NoContractsForDate { date })?;
    let leader_vol = day_bars
        .iter()
        .copied()
        .min_by(|a, b| by_volume(a, b))
        .ok_or(SelectionError::NoContractsForDate { date })?;

    let disagreement = if leader_oi.contract != leader_vol.contract {
        info!(
            %date,
            oi_leader = %leader_oi.contract,
            vol_leader = %leader_vol.contract,
            "volume leader differs from open-interest leader"
        );
        Some(DisagreementEvent {
            date,
            oi_leader: leader_oi.contract.clone(),
            vol_leader: leader_vol.contract.clone(),
        })
    } else {
        None
    };

    //a contract in its delivery month cannot be the main contract
    let oi_in_delivery = ContractCode::parse(&leader_oi.contract)?.is_delivery_month(date);
    let chosen = if oi_in_delivery { leader_vol } else { leader_oi };
    let excluded = chosen.contract != leader_oi.contract;

    //the rule has no further fallback; keep the pick but flag it
    let chosen_in_delivery = if excluded {
        ContractCode::parse(&chosen.contract)?.is_delivery_month(date)
    } else {
        oi_in_delivery
    };
    if chosen_in_delivery {
        warn!(
            %date,
            contract = %chosen.contract,
            candidates = day_bars.len(),
            "main contract is in its delivery month"
        );
    }

    debug!(%date, contract = %chosen.contract, excluded, "selected main contract");

    let selection = DailySelection {
        bar: chosen.clone(),
        contract_oi: leader_oi.contract.clone(),
        contract_vol: leader_vol.contract.clone(),
        delivery_month_excluded: excluded,
    };

    Ok((selection, disagreement))
}

//bars grouped by trading date, borrowed from the input
fn partition_by_date(bars: &[Bar]) -> HashMap<NaiveDate, Vec<&Bar>> {
    let mut by_date: HashMap<NaiveDate, Vec<&Bar>> = HashMap::new();
    for bar in bars {
        by_date.entry(bar.date).or_default().push(bar);
    }
    by_date
}

fn select_date<'a>(
    by_date: &HashMap<NaiveDate, Vec<&'a Bar>>,
    date: NaiveDate,
) -> Result<(DailySelection, Option<DisagreementEvent>), SelectionError> {
    let day_bars = by_date
        .get(&date)
        .ok_or(SelectionError::NoContractsForDate { date })?;
    select_for_day(date, day_bars)
}

fn assemble(outcomes: Vec<(DailySelection, Option<DisagreementEvent>)>) -> Selection {
    let mut selection = Selection {
        series: Vec::with_capacity(outcomes.len()),
        diagnostics: Vec::new(),
    };
    for (day, event) in outcomes {
        selection.series.push(day);
        selection.diagnostics.extend(event);
    }
    selection
}

//builds the continuous series one calendar date at a time
//the first failing date aborts the run
pub fn select_main_contracts(
    bars: &[Bar],
    calendar: &TradingCalendar,
) -> Result<Selection, SelectionError> {
    let by_date = partition_by_date(bars);

    let outcomes = calendar
        .dates()
        .map(|date| select_date(&by_date, date))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(assemble(outcomes))
}

//same as select_main_contracts with dates processed on the rayon pool
//results come back in calendar order so output matches the sequential run
pub fn select_main_contracts_parallel(
    bars: &[Bar],
    calendar: &TradingCalendar,
) -> Result<Selection, SelectionError> {
    let by_date = partition_by_date(bars);
    let dates: Vec<NaiveDate> = calendar.dates().collect();

    let results: Vec<Result<_, SelectionError>> = dates
        .par_iter()
        .map(|&date| select_date(&by_date, date))
        .collect();

    //first error in calendar order, not whichever thread failed first
    let outcomes = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    Ok(assemble(outcomes))
}
