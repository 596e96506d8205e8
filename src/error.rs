use thiserror::Error;

// Problems with the static run configuration, detected once before the initial state is built
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{name}: field capacity ({theta_fc}) must exceed wilting point ({theta_wp})")]
    WaterLimits {
        name: String,
        theta_fc: f64,
        theta_wp: f64,
    },
    #[error("soil profile has no layers")]
    EmptyProfile,
    #[error("soil layer bottoms must strictly increase (layer {index} at {bottom} cm follows {previous} cm)")]
    LayerOrder {
        index: usize,
        bottom: u32,
        previous: u32,
    },
    #[error("simulation end {end} precedes start {start}")]
    DateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    #[error("autoirrigation set {index}: {source}")]
    AutoIrrigation {
        index: usize,
        #[source]
        source: AutoIrrigationError,
    },
}

// An automatic irrigation set that can never be applied as written
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutoIrrigationError {
    #[error("end {end} precedes start {start}")]
    Window {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    #[error("days_of_week is empty")]
    NoWeekdays,
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("min_rate {min} exceeds max_rate {max}")]
    RateLimits { min: f64, max: f64 },
}

// Failures while running a validated configuration
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no weather record for {key}")]
    MissingWeather { key: String },
}
