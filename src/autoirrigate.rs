//! Automatic irrigation scheduling.
//!
//! A run may carry an ordered list of [`AutoIrrigationSet`]s. On each day
//! without an explicit irrigation record the sets are tried in order; the
//! first whose date window contains the day and whose trigger conditions all
//! hold decides the irrigation depth. Later sets are not consulted.

use crate::daily_inputs::{IrrigationEvent, WeatherProvider};
use crate::engine::{DailyRecord, State};
use crate::error::AutoIrrigationError;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do when forecast rain reaches the set's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastAction {
    #[default]
    Proceed,
    Cancel,
    Reduce, // Deduct the forecast rain from the irrigation depth
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRule {
    pub depth: f64, // Threshold forecast rain [mm]
    pub days: u32,  // Days ahead to sum
    #[serde(default)]
    pub action: ForecastAction,
}

/// Base irrigation depth before scaling and limits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationRate {
    /// Refill the root zone to field capacity.
    #[default]
    Depletion,
    /// A fixed depth [mm].
    Constant(f64),
    /// Bring root zone depletion down to this depth [mm].
    TargetDepletion(f64),
    /// Bring fractional root zone depletion down to this value.
    TargetFraction(f64),
    /// Replace ETcadj minus effective rain of the given number of past days.
    EtReplacement(u32),
    /// Replace ETcadj minus effective rain since the last irrigation.
    EtSinceIrrigation,
    /// Replace ETcadj minus effective rain since the last watering event.
    EtSinceEvent,
}

fn every_day() -> Vec<Weekday> {
    vec![
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]
}

fn yes() -> bool {
    true
}

fn default_event_threshold() -> f64 {
    10.0
}

fn full_percent() -> f64 {
    100.0
}

/// One set of conditions for scheduling irrigation automatically.
///
/// Optional conditions are disabled when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoIrrigationSet {
    pub start: NaiveDate,
    pub end: NaiveDate,
    // Only after the last explicitly scheduled irrigation
    #[serde(default = "yes")]
    pub after_last_recorded: bool,
    #[serde(default = "every_day")]
    pub days_of_week: Vec<Weekday>,
    #[serde(default)]
    pub forecast: Option<ForecastRule>,
    // Fractional root zone depletion that must be reached
    #[serde(default)]
    pub mad: Option<f64>,
    // Root zone depletion [mm] that must be reached
    #[serde(default)]
    pub mad_depth: Option<f64>,
    // Ks at or below which irrigation is allowed
    #[serde(default)]
    pub ks_critical: Option<f64>,
    #[serde(default)]
    pub min_days_since_irrigation: Option<u32>,
    #[serde(default)]
    pub min_days_since_event: Option<u32>,
    // Irrigation plus effective rain [mm] counted as a watering event
    #[serde(default = "default_event_threshold")]
    pub event_threshold: f64,
    #[serde(default)]
    pub rate: IrrigationRate,
    #[serde(default = "full_percent")]
    pub percent: f64,
    // Application efficiency [%]
    #[serde(default)]
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub min_rate: Option<f64>,
    #[serde(default)]
    pub max_rate: Option<f64>,
    // Wetted fraction of the applications
    #[serde(default)]
    pub fw: Option<f64>,
}

/// Why a set did not trigger on a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    OutsideWindow,
    NotAfterLastRecorded,
    DayOfWeek(Weekday),
    ForecastRain(f64),
    BelowMad(f64),
    BelowMadDepth(f64),
    KsAboveCritical(f64),
    RecentIrrigation(i64),
    RecentEvent(i64),
}

// Conditions that held, carried into the depth computation
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trigger {
    forecast_reduction: f64,
}

/// What the evaluator may look at on a given day.
pub struct EvaluationContext<'a> {
    pub date: NaiveDate,
    pub start: NaiveDate, // Simulation start
    pub state: &'a State,
    pub history: &'a [DailyRecord], // Output of the days already simulated
    pub last_recorded: Option<NaiveDate>, // Last explicitly scheduled irrigation
    pub weather: &'a dyn WeatherProvider,
}

impl EvaluationContext<'_> {
    fn days_since(&self, matches: impl Fn(&DailyRecord) -> bool) -> i64 {
        let since = self
            .history
            .iter()
            .rev()
            .find(|record| matches(record))
            .map(|record| record.date)
            .unwrap_or(self.start);
        (self.date - since).num_days()
    }

    // ETcadj minus effective rain over the most recent records until `stop` matches
    fn et_deficit(&self, stop: impl Fn(&DailyRecord) -> bool, limit: usize) -> f64 {
        self.history
            .iter()
            .rev()
            .take(limit)
            .take_while(|record| !stop(record))
            .map(|record| record.etcadj - (record.rain - record.runoff))
            .sum()
    }

    fn fractional_depletion(&self) -> f64 {
        if self.state.taw > 0.0 {
            self.state.dr / self.state.taw
        } else {
            0.0
        }
    }
}

impl AutoIrrigationSet {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        AutoIrrigationSet {
            start,
            end,
            after_last_recorded: true,
            days_of_week: every_day(),
            forecast: None,
            mad: None,
            mad_depth: None,
            ks_critical: None,
            min_days_since_irrigation: None,
            min_days_since_event: None,
            event_threshold: default_event_threshold(),
            rate: IrrigationRate::Depletion,
            percent: full_percent(),
            efficiency: None,
            min_rate: None,
            max_rate: None,
            fw: None,
        }
    }

    pub fn validate(&self) -> Result<(), AutoIrrigationError> {
        if self.end < self.start {
            return Err(AutoIrrigationError::Window {
                start: self.start,
                end: self.end,
            });
        }
        if self.days_of_week.is_empty() {
            return Err(AutoIrrigationError::NoWeekdays);
        }
        let unit = |name: &'static str, value: Option<f64>| match value {
            Some(v) if !(0.0..=1.0).contains(&v) => Err(AutoIrrigationError::OutOfRange {
                name,
                value: v,
                min: 0.0,
                max: 1.0,
            }),
            _ => Ok(()),
        };
        unit("mad", self.mad)?;
        unit("ks_critical", self.ks_critical)?;
        unit("fw", self.fw)?;
        if self.fw == Some(0.0) {
            return Err(AutoIrrigationError::NotPositive { name: "fw", value: 0.0 });
        }
        if let IrrigationRate::TargetFraction(f) = self.rate {
            unit("target fraction", Some(f))?;
        }
        if let Some(eff) = self.efficiency {
            if eff <= 0.0 {
                return Err(AutoIrrigationError::NotPositive {
                    name: "efficiency",
                    value: eff,
                });
            }
            if eff > 100.0 {
                return Err(AutoIrrigationError::OutOfRange {
                    name: "efficiency",
                    value: eff,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }
        if self.percent < 0.0 {
            return Err(AutoIrrigationError::Negative {
                name: "percent",
                value: self.percent,
            });
        }
        if let (Some(min), Some(max)) = (self.min_rate, self.max_rate) {
            if min > max {
                return Err(AutoIrrigationError::RateLimits { min, max });
            }
        }
        Ok(())
    }

    fn check_window(&self, date: NaiveDate) -> Result<(), SkipReason> {
        if date < self.start || date > self.end {
            return Err(SkipReason::OutsideWindow);
        }
        Ok(())
    }

    fn check_last_recorded(&self, ctx: &EvaluationContext) -> Result<(), SkipReason> {
        match ctx.last_recorded {
            Some(last) if self.after_last_recorded && ctx.date <= last => Err(SkipReason::NotAfterLastRecorded),
            _ => Ok(()),
        }
    }

    fn check_day_of_week(&self, date: NaiveDate) -> Result<(), SkipReason> {
        let weekday = chrono::Datelike::weekday(&date);
        if self.days_of_week.contains(&weekday) {
            Ok(())
        } else {
            Err(SkipReason::DayOfWeek(weekday))
        }
    }

    // Forecast rain to deduct from the depth, if any
    fn check_forecast(&self, ctx: &EvaluationContext) -> Result<f64, SkipReason> {
        let Some(rule) = self.forecast else {
            return Ok(0.0);
        };
        let rain = ctx.weather.forecast_rain(ctx.date, rule.days);
        if rain < rule.depth {
            return Ok(0.0);
        }
        match rule.action {
            ForecastAction::Proceed => Ok(0.0),
            ForecastAction::Cancel => Err(SkipReason::ForecastRain(rain)),
            ForecastAction::Reduce => Ok(rain),
        }
    }

    fn check_depletion(&self, ctx: &EvaluationContext) -> Result<(), SkipReason> {
        let fdr = ctx.fractional_depletion();
        if let Some(mad) = self.mad {
            if fdr < mad {
                return Err(SkipReason::BelowMad(fdr));
            }
        }
        if let Some(mad_depth) = self.mad_depth {
            if ctx.state.dr < mad_depth {
                return Err(SkipReason::BelowMadDepth(ctx.state.dr));
            }
        }
        Ok(())
    }

    fn check_stress(&self, ctx: &EvaluationContext) -> Result<(), SkipReason> {
        match self.ks_critical {
            Some(ksc) if ctx.state.ks > ksc => Err(SkipReason::KsAboveCritical(ctx.state.ks)),
            _ => Ok(()),
        }
    }

    fn check_intervals(&self, ctx: &EvaluationContext) -> Result<(), SkipReason> {
        if let Some(min) = self.min_days_since_irrigation {
            let days = ctx.days_since(|r| r.irrig > 0.0);
            if days < min as i64 {
                return Err(SkipReason::RecentIrrigation(days));
            }
        }
        if let Some(min) = self.min_days_since_event {
            let days = ctx.days_since(|r| r.net_water() >= self.event_threshold);
            if days < min as i64 {
                return Err(SkipReason::RecentEvent(days));
            }
        }
        Ok(())
    }

    fn triggers(&self, ctx: &EvaluationContext) -> Result<Trigger, SkipReason> {
        self.check_window(ctx.date)?;
        self.check_last_recorded(ctx)?;
        self.check_day_of_week(ctx.date)?;
        let forecast_reduction = self.check_forecast(ctx)?;
        self.check_depletion(ctx)?;
        self.check_stress(ctx)?;
        self.check_intervals(ctx)?;
        Ok(Trigger { forecast_reduction })
    }

    fn base_depth(&self, ctx: &EvaluationContext) -> f64 {
        let dr = ctx.state.dr;
        match self.rate {
            IrrigationRate::Depletion => dr,
            IrrigationRate::Constant(depth) => depth,
            IrrigationRate::TargetDepletion(target) => dr - target,
            IrrigationRate::TargetFraction(target) => dr - target * ctx.state.taw,
            IrrigationRate::EtReplacement(days) => ctx.et_deficit(|_| false, days as usize),
            IrrigationRate::EtSinceIrrigation => ctx.et_deficit(|r| r.irrig > 0.0, usize::MAX),
            IrrigationRate::EtSinceEvent => {
                ctx.et_deficit(|r| r.net_water() >= self.event_threshold, usize::MAX)
            }
        }
    }

    fn application(&self, ctx: &EvaluationContext, trigger: Trigger) -> IrrigationEvent {
        let mut depth = self.base_depth(ctx).max(0.0);
        depth = (depth - trigger.forecast_reduction).max(0.0);
        depth *= self.percent / 100.0;
        let efficiency = self.efficiency.unwrap_or(100.0);
        depth *= 100.0 / efficiency;
        if let Some(min) = self.min_rate {
            depth = depth.max(min);
        }
        if let Some(max) = self.max_rate {
            depth = depth.min(max);
        }
        IrrigationEvent {
            depth: depth.max(0.0),
            fw: self.fw.unwrap_or(ctx.state.fw),
            efficiency,
        }
    }
}

/// Decides today's automatic irrigation, if any. First matching set wins.
pub fn evaluate(sets: &[AutoIrrigationSet], ctx: &EvaluationContext) -> Option<IrrigationEvent> {
    sets.iter().enumerate().find_map(|(index, set)| match set.triggers(ctx) {
        Ok(trigger) => {
            let event = set.application(ctx, trigger);
            debug!(date = %ctx.date, index, depth = event.depth, "autoirrigation triggered");
            Some(event)
        }
        Err(reason) => {
            debug!(date = %ctx.date, index, ?reason, "autoirrigation set skipped");
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily_inputs::{ConstantWeather, WeatherRecord, WeatherTable};
    use approx::assert_abs_diff_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn state(dr: f64, taw: f64, ks: f64) -> State {
        State {
            i: 10,
            de: 5.0,
            dr,
            fw: 0.8,
            h: 0.5,
            zr: 0.6,
            ks,
            taw,
            bottom: None,
        }
    }

    fn record(date: NaiveDate, etcadj: f64, irrig: f64, rain: f64) -> DailyRecord {
        DailyRecord {
            date,
            etref: 6.0,
            kcb: 0.8,
            h: 0.5,
            kcmax: 1.2,
            fc: 0.5,
            fw: 1.0,
            few: 0.5,
            de: 5.0,
            kr: 1.0,
            ke: 0.2,
            e: 1.2,
            dpe: 0.0,
            kc: 1.0,
            etc: 6.0,
            taw: 90.0,
            tawrmax: None,
            tawb: None,
            zr: 0.6,
            p: 0.5,
            raw: 45.0,
            ks: 1.0,
            kcadj: 1.0,
            etcadj,
            t: 4.8,
            dp: 0.0,
            dr: 30.0,
            fdr: 0.33,
            drmax: None,
            fdrmax: None,
            db: None,
            fdb: None,
            irrig,
            irrloss: 0.0,
            rain,
            runoff: 0.0,
        }
    }

    fn ctx<'a>(date: NaiveDate, state: &'a State, history: &'a [DailyRecord], weather: &'a dyn WeatherProvider) -> EvaluationContext<'a> {
        EvaluationContext {
            date,
            start: day(1),
            state,
            history,
            last_recorded: None,
            weather,
        }
    }

    #[test]
    fn default_set_refills_depletion() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(42.0, 100.0, 1.0);
        let sets = [AutoIrrigationSet::new(day(1), day(30))];
        let event = evaluate(&sets, &ctx(day(15), &s, &[], &weather)).unwrap();
        assert_eq!(event.depth, 42.0);
        assert_eq!(event.fw, 0.8);
        assert_eq!(event.efficiency, 100.0);
    }

    #[test]
    fn outside_window_does_not_trigger() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(42.0, 100.0, 1.0);
        let sets = [AutoIrrigationSet::new(day(20), day(30))];
        assert!(evaluate(&sets, &ctx(day(15), &s, &[], &weather)).is_none());
    }

    #[test]
    fn waits_for_last_recorded_irrigation() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(42.0, 100.0, 1.0);
        let sets = [AutoIrrigationSet::new(day(1), day(30))];
        let mut context = ctx(day(15), &s, &[], &weather);
        context.last_recorded = Some(day(15));
        assert!(evaluate(&sets, &context).is_none());
        context.last_recorded = Some(day(14));
        assert!(evaluate(&sets, &context).is_some());
    }

    #[test]
    fn day_of_week_whitelist() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(42.0, 100.0, 1.0);
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.days_of_week = vec![Weekday::Mon, Weekday::Thu];
        let sets = [set];
        // 2024-06-17 is a Monday, 2024-06-18 a Tuesday
        assert!(evaluate(&sets, &ctx(day(17), &s, &[], &weather)).is_some());
        assert!(evaluate(&sets, &ctx(day(18), &s, &[], &weather)).is_none());
    }

    #[test]
    fn depletion_thresholds() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.mad = Some(0.5);
        set.mad_depth = Some(40.0);
        let sets = [set];
        let below = state(45.0, 100.0, 1.0);
        assert!(evaluate(&sets, &ctx(day(15), &below, &[], &weather)).is_none());
        let shallow = state(35.0, 60.0, 1.0);
        assert!(evaluate(&sets, &ctx(day(15), &shallow, &[], &weather)).is_none());
        let ready = state(50.0, 100.0, 1.0);
        assert!(evaluate(&sets, &ctx(day(15), &ready, &[], &weather)).is_some());
    }

    #[test]
    fn stress_threshold() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.ks_critical = Some(0.9);
        let sets = [set];
        assert!(evaluate(&sets, &ctx(day(15), &state(50.0, 100.0, 0.95), &[], &weather)).is_none());
        assert!(evaluate(&sets, &ctx(day(15), &state(50.0, 100.0, 0.9), &[], &weather)).is_some());
    }

    #[test]
    fn minimum_interval_since_irrigation() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(42.0, 100.0, 1.0);
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.min_days_since_irrigation = Some(4);
        let sets = [set];
        let history = [
            record(day(10), 5.0, 25.0, 0.0),
            record(day(11), 5.0, 0.0, 0.0),
            record(day(12), 5.0, 0.0, 0.0),
        ];
        assert!(evaluate(&sets, &ctx(day(13), &s, &history, &weather)).is_none());
        assert!(evaluate(&sets, &ctx(day(14), &s, &history[..], &weather)).is_some());
        // No irrigation yet: days counted from the simulation start
        assert!(evaluate(&sets, &ctx(day(4), &s, &[], &weather)).is_none());
        assert!(evaluate(&sets, &ctx(day(5), &s, &[], &weather)).is_some());
    }

    #[test]
    fn rain_counts_as_watering_event() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(42.0, 100.0, 1.0);
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.min_days_since_event = Some(3);
        let sets = [set];
        let history = [record(day(11), 5.0, 0.0, 12.0), record(day(12), 5.0, 0.0, 2.0)];
        assert!(evaluate(&sets, &ctx(day(13), &s, &history, &weather)).is_none());
        assert!(evaluate(&sets, &ctx(day(14), &s, &history, &weather)).is_some());
    }

    #[test]
    fn forecast_actions() {
        let mut weather = WeatherTable::default();
        for d in 1..=30 {
            let rain = if d == 16 { 20.0 } else { 0.0 };
            weather.insert(
                day(d),
                WeatherRecord {
                    etref: Some(6.0),
                    rain,
                    forecast: d > 15,
                    ..WeatherRecord::default()
                },
            );
        }
        let s = state(42.0, 100.0, 1.0);
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.forecast = Some(ForecastRule {
            depth: 15.0,
            days: 3,
            action: ForecastAction::Cancel,
        });
        let cancel = [set.clone()];
        assert!(evaluate(&cancel, &ctx(day(15), &s, &[], &weather)).is_none());
        // Rain beyond the forecast window is ignored
        assert!(evaluate(&cancel, &ctx(day(10), &s, &[], &weather)).is_some());

        set.forecast = Some(ForecastRule {
            depth: 15.0,
            days: 3,
            action: ForecastAction::Reduce,
        });
        let reduce = [set.clone()];
        let event = evaluate(&reduce, &ctx(day(15), &s, &[], &weather)).unwrap();
        assert_abs_diff_eq!(event.depth, 22.0, epsilon = 1e-12);

        set.forecast = Some(ForecastRule {
            depth: 15.0,
            days: 3,
            action: ForecastAction::Proceed,
        });
        let proceed = [set];
        let event = evaluate(&proceed, &ctx(day(15), &s, &[], &weather)).unwrap();
        assert_eq!(event.depth, 42.0);
    }

    #[test]
    fn target_depletion_rates() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(60.0, 120.0, 1.0);
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.rate = IrrigationRate::TargetDepletion(15.0);
        assert_eq!(evaluate(&[set.clone()], &ctx(day(15), &s, &[], &weather)).unwrap().depth, 45.0);
        set.rate = IrrigationRate::TargetFraction(0.25);
        assert_eq!(evaluate(&[set.clone()], &ctx(day(15), &s, &[], &weather)).unwrap().depth, 30.0);
        set.rate = IrrigationRate::TargetDepletion(80.0);
        assert_eq!(evaluate(&[set], &ctx(day(15), &s, &[], &weather)).unwrap().depth, 0.0);
    }

    #[test]
    fn et_replacement_rates() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(42.0, 100.0, 1.0);
        let history = [
            record(day(9), 4.0, 0.0, 0.0),
            record(day(10), 5.0, 30.0, 0.0),
            record(day(11), 6.0, 0.0, 11.0),
            record(day(12), 7.0, 0.0, 1.0),
            record(day(13), 8.0, 0.0, 0.0),
        ];
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.rate = IrrigationRate::EtReplacement(2);
        let depth = |set: &AutoIrrigationSet| evaluate(&[set.clone()], &ctx(day(14), &s, &history, &weather)).unwrap().depth;
        assert_abs_diff_eq!(depth(&set), 14.0, epsilon = 1e-12);
        set.rate = IrrigationRate::EtSinceIrrigation;
        assert_abs_diff_eq!(depth(&set), 9.0, epsilon = 1e-12);
        set.rate = IrrigationRate::EtSinceEvent;
        assert_abs_diff_eq!(depth(&set), 14.0, epsilon = 1e-12);
    }

    #[test]
    fn scaling_efficiency_and_limits() {
        let weather = ConstantWeather::new(6.0, 0.0);
        let s = state(40.0, 100.0, 1.0);
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        set.percent = 50.0;
        set.efficiency = Some(80.0);
        set.fw = Some(0.35);
        let event = evaluate(&[set.clone()], &ctx(day(15), &s, &[], &weather)).unwrap();
        assert_abs_diff_eq!(event.depth, 25.0, epsilon = 1e-12);
        assert_eq!(event.efficiency, 80.0);
        assert_eq!(event.fw, 0.35);

        set.max_rate = Some(20.0);
        let event = evaluate(&[set], &ctx(day(15), &s, &[], &weather)).unwrap();
        assert_eq!(event.depth, 20.0);
    }

    #[test]
    fn validation_catches_bad_sets() {
        let mut set = AutoIrrigationSet::new(day(1), day(30));
        assert!(set.validate().is_ok());
        set.mad = Some(1.5);
        assert!(matches!(
            set.validate(),
            Err(AutoIrrigationError::OutOfRange { name: "mad", .. })
        ));
        set.mad = None;
        set.efficiency = Some(0.0);
        assert_eq!(
            set.validate(),
            Err(AutoIrrigationError::NotPositive {
                name: "efficiency",
                value: 0.0
            })
        );
        set.efficiency = Some(120.0);
        assert!(matches!(
            set.validate(),
            Err(AutoIrrigationError::OutOfRange { name: "efficiency", .. })
        ));
        set.efficiency = None;
        set.fw = Some(0.0);
        assert!(matches!(
            set.validate(),
            Err(AutoIrrigationError::NotPositive { name: "fw", .. })
        ));
        set.fw = None;
        set.min_rate = Some(30.0);
        set.max_rate = Some(10.0);
        assert_eq!(set.validate(), Err(AutoIrrigationError::RateLimits { min: 30.0, max: 10.0 }));
        set.min_rate = None;
        set.days_of_week.clear();
        assert_eq!(set.validate(), Err(AutoIrrigationError::NoWeekdays));
        let inverted = AutoIrrigationSet::new(day(10), day(1));
        assert_eq!(
            inverted.validate(),
            Err(AutoIrrigationError::Window {
                start: day(10),
                end: day(1)
            })
        );
    }
}
