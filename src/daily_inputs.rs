use crate::refet::{self, DailyMet, ReferenceCrop};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

// FAO-56 defaults substituted for missing observations
pub const DEFAULT_WNDSP: f64 = 2.0; // m/s
pub const DEFAULT_RHMIN: f64 = 45.0; // %

// Weather station description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Station {
    pub reference_crop: ReferenceCrop,
    pub elevation: f64,   // Elevation above mean sea level [m]
    pub latitude: f64,    // Decimal degrees
    pub wind_height: f64, // Wind measurement height [m]
}

impl Default for Station {
    fn default() -> Self {
        Station {
            reference_crop: ReferenceCrop::Short,
            elevation: 0.0,
            latitude: 0.0,
            wind_height: 2.0,
        }
    }
}

// One day of observed or forecast weather; absent values are None
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherRecord {
    pub srad: Option<f64>,  // Incoming solar radiation [MJ m-2]
    pub tmax: Option<f64>,  // [C]
    pub tmin: Option<f64>,  // [C]
    pub tdew: Option<f64>,  // [C]
    pub rhmax: Option<f64>, // [%]
    pub rhmin: Option<f64>, // [%]
    pub wndsp: Option<f64>, // [m/s] at the station's wind height
    pub rain: f64,          // [mm]
    pub etref: Option<f64>, // [mm]
    pub forecast: bool,     // Predicted rather than measured
}

/// Weather resolved for the engine: every value present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherInputs {
    pub etref: f64,
    pub rain: f64,
    pub wndsp: f64,
    pub rhmin: f64,
}

/// Which values of a day were filled in by the fallback chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Substitutions {
    pub wndsp: bool,         // Default wind speed
    pub rhmin_derived: bool, // RHmin from temperatures
    pub rhmin: bool,         // Default RHmin
}

/// Source of daily weather for a simulation.
///
/// Implementors provide the station description and the raw record of a day;
/// reference ET and the missing-data fallback chain come with the trait.
pub trait WeatherProvider {
    fn station(&self) -> Station;

    fn record(&self, date: NaiveDate) -> Option<WeatherRecord>;

    /// ASCE standardized reference ET computed from the day's record.
    fn compute_reference_et(&self, date: NaiveDate) -> Option<f64> {
        let record = self.record(date)?;
        let station = self.station();
        let met = DailyMet {
            doy: date.ordinal(),
            srad: record.srad?,
            tmax: record.tmax?,
            tmin: record.tmin?,
            tdew: record.tdew,
            rhmax: record.rhmax,
            rhmin: record.rhmin,
            wndsp: record.wndsp,
        };
        let etref = refet::asce_daily(
            station.reference_crop,
            station.elevation,
            station.latitude,
            station.wind_height,
            &met,
        );
        debug!(%date, etref, "computed reference ET");
        Some(etref)
    }

    /// The day's weather with missing values resolved, without logging.
    ///
    /// RHmin falls back to the ratio of dew point (or minimum temperature)
    /// vapor pressure to maximum temperature vapor pressure, then to 45 %.
    /// Wind falls back to 2 m/s. Missing ETref is computed; when it cannot
    /// be computed the day is unavailable.
    fn resolve(&self, date: NaiveDate) -> Option<(WeatherInputs, Substitutions)> {
        let record = self.record(date)?;
        let etref = match record.etref {
            Some(etref) => etref,
            None => self.compute_reference_et(date)?,
        };
        let mut substitutions = Substitutions::default();
        let wndsp = record.wndsp.unwrap_or_else(|| {
            substitutions.wndsp = true;
            DEFAULT_WNDSP
        });
        let rhmin = match (record.rhmin, record.tmax, record.tdew.or(record.tmin)) {
            (Some(rhmin), _, _) => rhmin,
            (None, Some(tmax), Some(tdew)) => {
                substitutions.rhmin_derived = true;
                refet::saturation_vapor_pressure(tdew) / refet::saturation_vapor_pressure(tmax) * 100.0
            }
            _ => {
                substitutions.rhmin = true;
                DEFAULT_RHMIN
            }
        };
        let inputs = WeatherInputs {
            etref,
            rain: record.rain,
            wndsp,
            rhmin,
        };
        Some((inputs, substitutions))
    }

    /// The day's weather for the simulation, logging every substitution.
    fn daily_inputs(&self, date: NaiveDate) -> Option<WeatherInputs> {
        let (inputs, substitutions) = self.resolve(date)?;
        if substitutions.wndsp {
            warn!(%date, default = DEFAULT_WNDSP, "wind speed missing; using default");
        }
        if substitutions.rhmin_derived {
            debug!(%date, rhmin = inputs.rhmin, "derived RHmin from temperature");
        }
        if substitutions.rhmin {
            warn!(%date, default = DEFAULT_RHMIN, "RHmin missing; using default");
        }
        Some(inputs)
    }

    /// Total forecast rain of the `days` records following `date`.
    ///
    /// Measured records are not counted.
    fn forecast_rain(&self, date: NaiveDate, days: u32) -> f64 {
        (1..=days as u64)
            .filter_map(|n| date.checked_add_days(Days::new(n)))
            .filter_map(|d| self.record(d))
            .filter(|r| r.forecast)
            .map(|r| r.rain)
            .sum()
    }
}

/// Weather held in memory, one record per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherTable {
    pub station: Station,
    pub records: BTreeMap<NaiveDate, WeatherRecord>,
}

impl WeatherTable {
    pub fn new(station: Station) -> Self {
        WeatherTable {
            station,
            records: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, date: NaiveDate, record: WeatherRecord) {
        self.records.insert(date, record);
    }
}

impl WeatherProvider for WeatherTable {
    fn station(&self) -> Station {
        self.station
    }

    fn record(&self, date: NaiveDate) -> Option<WeatherRecord> {
        self.records.get(&date).copied()
    }
}

/// The same record on every day, for scenario studies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantWeather {
    pub station: Station,
    pub record: WeatherRecord,
}

impl ConstantWeather {
    pub fn new(etref: f64, rain: f64) -> Self {
        ConstantWeather {
            station: Station::default(),
            record: WeatherRecord {
                etref: Some(etref),
                rain,
                wndsp: Some(DEFAULT_WNDSP),
                rhmin: Some(DEFAULT_RHMIN),
                ..WeatherRecord::default()
            },
        }
    }
}

impl WeatherProvider for ConstantWeather {
    fn station(&self) -> Station {
        self.station
    }

    fn record(&self, _date: NaiveDate) -> Option<WeatherRecord> {
        Some(self.record)
    }
}

// An irrigation application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrigationEvent {
    pub depth: f64, // Gross depth [mm]
    #[serde(default = "full_wetting")]
    pub fw: f64, // Fraction of the surface wetted
    #[serde(default = "full_efficiency")]
    pub efficiency: f64, // Application efficiency [%]
}

fn full_wetting() -> f64 {
    1.0
}

fn full_efficiency() -> f64 {
    100.0
}

impl IrrigationEvent {
    pub fn new(depth: f64, fw: f64) -> Self {
        IrrigationEvent {
            depth,
            fw,
            efficiency: 100.0,
        }
    }

    // Water lost to application inefficiency [mm]
    pub fn loss(&self) -> f64 {
        self.depth * (1.0 - self.efficiency / 100.0)
    }
}

/// Explicit irrigation schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrrigationSchedule {
    pub events: BTreeMap<NaiveDate, IrrigationEvent>,
}

impl IrrigationSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, date: NaiveDate, event: IrrigationEvent) {
        self.events.insert(date, event);
    }

    pub fn get(&self, date: NaiveDate) -> Option<IrrigationEvent> {
        self.events.get(&date).copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.events.keys().next_back().copied()
    }
}

// Observed state values replacing the modeled ones on a day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub kcb: Option<f64>,
    pub h: Option<f64>,
    pub fc: Option<f64>,
}

impl Overrides {
    // Only positive values replace the modeled ones
    pub fn kcb(&self) -> Option<f64> {
        self.kcb.filter(|v| *v > 0.0)
    }

    pub fn h(&self) -> Option<f64> {
        self.h.filter(|v| *v > 0.0)
    }

    pub fn fc(&self) -> Option<f64> {
        self.fc.filter(|v| *v > 0.0)
    }
}

/// Dated overrides of Kcb, plant height and canopy cover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTable {
    pub updates: BTreeMap<NaiveDate, Overrides>,
}

impl UpdateTable {
    pub fn insert(&mut self, date: NaiveDate, overrides: Overrides) {
        self.updates.insert(date, overrides);
    }

    pub fn get(&self, date: NaiveDate) -> Overrides {
        self.updates.get(&date).copied().unwrap_or_default()
    }
}
