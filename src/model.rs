use crate::autoirrigate::{self, EvaluationContext};
use crate::crop::{self, GrowthStages, KcbCurve, SeasonClimate};
use crate::daily_inputs::{IrrigationSchedule, UpdateTable, WeatherProvider};
use crate::engine::{DailyRecord, DayInputs, Engine, State};
use crate::error::{ConfigError, SimulationError};
use crate::params::RunConfig;
use crate::refet::wind_at_2m;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, info_span};

/// Season totals and end points of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeasonalSummary {
    pub etref: f64,
    pub etc: f64,
    pub etcadj: f64,
    pub e: f64,
    pub t: f64,
    pub dp: f64,
    pub dpe: f64,
    pub irrig: f64,
    pub irrloss: f64,
    pub rain: f64,
    pub runoff: f64,
    pub dr_first: f64, // Root zone depletion at the end of the first day [mm]
    pub dr_last: f64,  // Root zone depletion at the end of the last day [mm]
    pub drmax_first: Option<f64>,
    pub drmax_last: Option<f64>,
    pub db_first: Option<f64>,
    pub db_last: Option<f64>,
}

impl SeasonalSummary {
    pub fn from_records(records: &[DailyRecord]) -> Self {
        let mut summary = records.iter().fold(SeasonalSummary::default(), |mut s, r| {
            s.etref += r.etref;
            s.etc += r.etc;
            s.etcadj += r.etcadj;
            s.e += r.e;
            s.t += r.t;
            s.dp += r.dp;
            s.dpe += r.dpe;
            s.irrig += r.irrig;
            s.irrloss += r.irrloss;
            s.rain += r.rain;
            s.runoff += r.runoff;
            s
        });
        if let (Some(first), Some(last)) = (records.first(), records.last()) {
            summary.dr_first = first.dr;
            summary.dr_last = last.dr;
            summary.drmax_first = first.drmax;
            summary.drmax_last = last.drmax;
            summary.db_first = first.db;
            summary.db_last = last.db;
        }
        summary
    }
}

/// Result of a run: one record per simulated day, in date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOutput {
    pub initial: State,
    pub records: Vec<DailyRecord>,
    pub summary: SeasonalSummary,
}

impl ModelOutput {
    /// Record of the day keyed "yyyy-ddd".
    pub fn get(&self, key: &str) -> Option<&DailyRecord> {
        self.records.iter().find(|r| r.key() == key)
    }
}

/// A seasonal simulation over a validated configuration.
///
/// The weather provider is borrowed, so several models may share one.
pub struct Model<'a> {
    config: RunConfig,
    weather: &'a dyn WeatherProvider,
    irrigation: IrrigationSchedule,
    updates: UpdateTable,
}

impl<'a> Model<'a> {
    pub fn new(config: RunConfig, weather: &'a dyn WeatherProvider) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Model {
            config,
            weather,
            irrigation: IrrigationSchedule::default(),
            updates: UpdateTable::default(),
        })
    }

    pub fn with_irrigation(mut self, irrigation: IrrigationSchedule) -> Self {
        self.irrigation = irrigation;
        self
    }

    pub fn with_updates(mut self, updates: UpdateTable) -> Self {
        self.updates = updates;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn date_of(&self, i: u32) -> Option<NaiveDate> {
        self.config.start.checked_add_days(Days::new(i as u64))
    }

    // Mean weather of the simulated days selected by `in_phase`
    fn season_climate(&self, stages: &GrowthStages, in_phase: impl Fn(u32) -> bool) -> Option<SeasonClimate> {
        let wind_height = self.weather.station().wind_height;
        let (n, u2, rhmin) = (0..=stages.s4 as u32)
            .filter(|i| in_phase(*i))
            .filter_map(|i| self.date_of(i))
            .filter_map(|date| self.weather.resolve(date))
            .fold((0usize, 0.0, 0.0), |(n, u2, rhmin), (w, _)| {
                (n + 1, u2 + wind_at_2m(w.wndsp, wind_height), rhmin + w.rhmin)
            });
        (n > 0).then(|| SeasonClimate {
            u2: u2 / n as f64,
            rhmin: rhmin / n as f64,
        })
    }

    /// Trapezoid corners used by the run, climate adjusted when enabled.
    pub fn kcb_curve(&self) -> KcbCurve {
        let params = &self.config.parameters;
        let table = KcbCurve::from_parameters(params);
        if !self.config.options.kcb_adjust {
            return table;
        }
        let stages = GrowthStages::from_parameters(params);
        let mid = self
            .season_climate(&stages, |i| stages.is_mid_season(i))
            .map_or(table.mid, |climate| crop::adjust_kcb(table.mid, climate, params.h_max));
        // Only high end values are adjusted, FAO-56 Eq. 70 note
        let end = if table.end >= 0.45 {
            self.season_climate(&stages, |i| stages.is_late_season(i))
                .map_or(table.end, |climate| crop::adjust_kcb(table.end, climate, params.h_max))
        } else {
            table.end
        };
        debug!(mid, end, "adjusted Kcb targets");
        KcbCurve { mid, end, ..table }
    }

    pub fn engine(&self) -> Engine {
        Engine::new(
            self.config.parameters.clone(),
            self.config.options,
            self.config.soil(),
            self.weather.station(),
            self.kcb_curve(),
        )
    }

    /// Simulates every day from start to end inclusive.
    ///
    /// # Returns
    /// The daily records and seasonal summary, or `MissingWeather` for the
    /// first day the provider cannot resolve.
    pub fn run(&self) -> Result<ModelOutput, SimulationError> {
        let span = info_span!("fao56_run", start = %self.config.start, end = %self.config.end);
        let _enter = span.enter();
        info!("starting simulation");

        let engine = self.engine();
        let initial = engine.initial_state();
        let last_recorded = self.irrigation.last_date();
        let mut state = initial;
        let mut records: Vec<DailyRecord> = Vec::new();

        for date in self.config.start.iter_days().take_while(|d| *d <= self.config.end) {
            let weather = self
                .weather
                .daily_inputs(date)
                .ok_or_else(|| SimulationError::MissingWeather {
                    key: date.format("%Y-%j").to_string(),
                })?;
            let irrigation = self.irrigation.get(date).or_else(|| {
                let ctx = EvaluationContext {
                    date,
                    start: self.config.start,
                    state: &state,
                    history: &records,
                    last_recorded,
                    weather: self.weather,
                };
                autoirrigate::evaluate(&self.config.autoirrigation, &ctx)
            });
            let inputs = DayInputs {
                weather,
                irrigation,
                overrides: self.updates.get(date),
            };
            let (next, record) = engine.step(&state, date, &inputs);
            records.push(record);
            state = next;
        }

        let summary = SeasonalSummary::from_records(&records);
        info!(
            days = records.len(),
            etcadj = summary.etcadj,
            irrig = summary.irrig,
            rain = summary.rain,
            dp = summary.dp,
            "simulation finished"
        );
        Ok(ModelOutput {
            initial,
            records,
            summary,
        })
    }
}
