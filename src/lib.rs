//! Daily soil water balance with the FAO-56 dual crop coefficient method.
//!
//! A [`Model`] runs the [`Engine`] day by day over a [`RunConfig`], reading
//! weather from any [`WeatherProvider`] and irrigation from an explicit
//! [`IrrigationSchedule`] or the automatic rules in [`autoirrigate`].

pub mod autoirrigate;
pub mod crop;
pub mod daily_inputs;
pub mod engine;
pub mod error;
pub mod evaporation;
pub mod model;
pub mod params;
pub mod refet;
pub mod root_uptake;
pub mod runoff;
pub mod soil_profile;

pub use autoirrigate::{AutoIrrigationSet, ForecastAction, ForecastRule, IrrigationRate};
pub use daily_inputs::{
    ConstantWeather, IrrigationEvent, IrrigationSchedule, Overrides, Station, UpdateTable, WeatherProvider,
    WeatherRecord, WeatherTable,
};
pub use engine::{DailyRecord, DayInputs, Engine, State};
pub use error::{AutoIrrigationError, ConfigError, SimulationError};
pub use model::{Model, ModelOutput, SeasonalSummary};
pub use params::{Parameters, RunConfig, RunOptions, StressModel};
pub use refet::ReferenceCrop;
pub use soil_profile::{Soil, SoilLayer, SoilProfile};
