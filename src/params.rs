use crate::autoirrigate::AutoIrrigationSet;
use crate::error::ConfigError;
use crate::soil_profile::{Soil, SoilProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Crop and soil parameters of the dual crop coefficient method.
///
/// Defaults are the generic values suggested by FAO-56 Tables 11, 17, 19 and
/// 22; every field can be overridden from a TOML `[parameters]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub kcb_ini: f64,  // Kcb initial
    pub kcb_mid: f64,  // Kcb mid season
    pub kcb_end: f64,  // Kcb end of season
    pub l_ini: u32,    // Length of the initial phase [days]
    pub l_dev: u32,    // Length of development [days]
    pub l_mid: u32,    // Length of mid season [days]
    pub l_end: u32,    // Length of late season [days]
    pub h_ini: f64,    // Initial plant height [m]
    pub h_max: f64,    // Maximum plant height [m]
    pub theta_fc: f64, // Field capacity [cm3/cm3]
    pub theta_wp: f64, // Wilting point [cm3/cm3]
    pub theta0: f64,   // Initial water content [cm3/cm3]
    pub zr_ini: f64,   // Initial root depth [m]
    pub zr_max: f64,   // Maximum root depth [m]
    pub pbase: f64,    // Depletion fraction for no stress at ETc = 5 mm/day
    pub ze: f64,       // Depth of the surface evaporation layer [m]
    pub rew: f64,      // Readily evaporable water [mm]
    pub cn2: f64,      // Curve number for average antecedent moisture
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            kcb_ini: 0.15,
            kcb_mid: 1.10,
            kcb_end: 0.50,
            l_ini: 25,
            l_dev: 50,
            l_mid: 50,
            l_end: 25,
            h_ini: 0.05,
            h_max: 1.20,
            theta_fc: 0.250,
            theta_wp: 0.100,
            theta0: 0.100,
            zr_ini: 0.20,
            zr_max: 1.40,
            pbase: 0.50,
            ze: 0.10,
            rew: 8.0,
            cn2: 70.0,
        }
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("kcb_ini", self.kcb_ini, 0.0, 2.0)?;
        check_range("kcb_mid", self.kcb_mid, 0.0, 2.0)?;
        check_range("kcb_end", self.kcb_end, 0.0, 2.0)?;
        check_range("l_dev", self.l_dev as f64, 1.0, 366.0)?;
        check_range("l_end", self.l_end as f64, 1.0, 366.0)?;
        check_range("h_ini", self.h_ini, 0.0, self.h_max)?;
        check_range("h_max", self.h_max, 0.0, 30.0)?;
        check_range("theta_fc", self.theta_fc, 0.0, 1.0)?;
        check_range("theta_wp", self.theta_wp, 0.0, 1.0)?;
        check_range("theta0", self.theta0, 0.0, 1.0)?;
        check_range("zr_ini", self.zr_ini, 0.001, self.zr_max)?;
        check_range("zr_max", self.zr_max, 0.001, 10.0)?;
        check_range("pbase", self.pbase, 0.0, 1.0)?;
        check_range("ze", self.ze, 0.001, 1.0)?;
        check_range("cn2", self.cn2, 1.0, 100.0)?;
        let tew = 1000.0 * (self.theta_fc - 0.5 * self.theta_wp) * self.ze;
        check_range("rew", self.rew, 0.0, tew)?;
        Ok(())
    }

    // Homogeneous soil described by the three water limits of this parameter set
    pub fn homogeneous_soil(&self) -> Soil {
        Soil::Homogeneous {
            theta_fc: self.theta_fc,
            theta_wp: self.theta_wp,
            theta0: self.theta0,
        }
    }
}

/// Transpiration reduction response to root zone depletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressModel {
    #[default]
    Fao56,    // Linear, FAO-56 Eq. 84
    AquaCrop, // Convex, shape factor 1.5
}

/// Switches selecting the alternate sub-models of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub stress_model: StressModel,
    pub constant_p: bool,  // Use pbase every day instead of the ETc correction
    pub runoff: bool,      // Curve number runoff
    pub kcb_adjust: bool,  // Climate adjustment of Kcb mid and end
}

/// Static configuration of one simulation, as read from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub options: RunOptions,
    #[serde(default)]
    pub soil: Option<SoilProfile>,
    #[serde(default)]
    pub autoirrigation: Vec<AutoIrrigationSet>,
}

impl RunConfig {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        RunConfig {
            start,
            end,
            parameters: Parameters::default(),
            options: RunOptions::default(),
            soil: None,
            autoirrigation: Vec::new(),
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&toml_str)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end < self.start {
            return Err(ConfigError::DateRange {
                start: self.start,
                end: self.end,
            });
        }
        self.parameters.validate()?;
        self.soil().validate(self.parameters.zr_max)?;
        for (index, set) in self.autoirrigation.iter().enumerate() {
            set.validate()
                .map_err(|source| ConfigError::AutoIrrigation { index, source })?;
        }
        Ok(())
    }

    // Layered soil when a profile is given, otherwise the homogeneous bucket
    pub fn soil(&self) -> Soil {
        match &self.soil {
            Some(profile) => Soil::Layered(profile.clone()),
            None => self.parameters.homogeneous_soil(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoirrigate::IrrigationRate;

    const CONFIG: &str = r#"
start = "2018-04-18"
end = "2018-10-30"

[parameters]
kcb_mid = 1.13
kcb_end = 0.52
l_ini = 32
zr_ini = 0.18

[options]
stress_model = "aquacrop"
runoff = true

[soil]
name = "plot 6"

[[soil.layers]]
bottom = 30
theta_fc = 0.22
theta_wp = 0.10
theta0 = 0.16

[[soil.layers]]
bottom = 150
theta_fc = 0.20
theta_wp = 0.09
theta0 = 0.15

[[autoirrigation]]
start = "2018-05-01"
end = "2018-09-30"
mad = 0.45
rate = { constant = 25.0 }
"#;

    #[test]
    fn loads_full_configuration() {
        let config = RunConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.start, NaiveDate::from_ymd_opt(2018, 4, 18).unwrap());
        assert_eq!(config.parameters.kcb_mid, 1.13);
        assert_eq!(config.parameters.l_ini, 32);
        assert_eq!(config.parameters.l_dev, 50);
        assert_eq!(config.options.stress_model, StressModel::AquaCrop);
        assert!(config.options.runoff);
        assert!(!config.options.kcb_adjust);
        assert!(config.soil().is_layered());
        assert_eq!(config.autoirrigation.len(), 1);
        assert_eq!(config.autoirrigation[0].rate, IrrigationRate::Constant(25.0));
        assert_eq!(config.autoirrigation[0].mad, Some(0.45));
    }

    #[test]
    fn defaults_validate() {
        assert!(Parameters::default().validate().is_ok());
    }

    #[test]
    fn accepts_mid_season_kcb_at_or_below_initial() {
        let citrus = Parameters {
            kcb_ini: 0.80,
            kcb_mid: 0.75,
            kcb_end: 0.70,
            ..Parameters::default()
        };
        assert!(citrus.validate().is_ok());
        let flat = Parameters {
            kcb_ini: 0.95,
            kcb_mid: 0.95,
            ..Parameters::default()
        };
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_dates() {
        let toml_str = "start = \"2020-05-01\"\nend = \"2020-04-01\"\n";
        assert!(matches!(
            RunConfig::from_toml_str(toml_str),
            Err(ConfigError::DateRange { .. })
        ));
    }

    #[test]
    fn rejects_wilting_point_above_field_capacity() {
        let mut config = RunConfig::new(
            NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
        );
        config.parameters.theta_wp = 0.3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WaterLimits { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_curve_number() {
        let params = Parameters {
            cn2: 120.0,
            ..Parameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::OutOfRange { name: "cn2", .. })
        ));
    }

    #[test]
    fn parse_errors_are_reported() {
        assert!(matches!(
            RunConfig::from_toml_str("start = 12"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            RunConfig::from_path("/nonexistent/run.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
