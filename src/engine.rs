use crate::crop::{self, GrowthStages, KcbCurve};
use crate::daily_inputs::{IrrigationEvent, Overrides, Station, WeatherInputs};
use crate::evaporation;
use crate::params::{Parameters, RunOptions};
use crate::root_uptake;
use crate::runoff;
use crate::soil_profile::{RootZoneWater, Soil};
use chrono::NaiveDate;
use serde::Serialize;

/// Water held between the current and the maximum root depth (layered soil).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BottomZone {
    pub drmax: f64, // Depletion to the maximum root depth [mm]
    pub db: f64,    // Depletion of the zone below the roots [mm]
    pub tawb: f64,  // Available water of the zone below the roots on the previous day [mm]
}

/// State carried from one simulated day to the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct State {
    pub i: u32,   // Days since the simulation start
    pub de: f64,  // Evaporation layer depletion [mm]
    pub dr: f64,  // Root zone depletion [mm]
    pub fw: f64,  // Fraction of the surface wetted
    pub h: f64,   // Plant height [m]
    pub zr: f64,  // Root depth [m]
    pub ks: f64,  // Transpiration reduction coefficient
    pub taw: f64, // Total available water of the root zone [mm]
    pub bottom: Option<BottomZone>,
}

/// Exogenous inputs of one day, all resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayInputs {
    pub weather: WeatherInputs,
    pub irrigation: Option<IrrigationEvent>,
    pub overrides: Overrides,
}

/// Every quantity computed for one simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,      // Simulated day
    pub etref: f64,           // Reference ET [mm]
    pub kcb: f64,             // Basal crop coefficient
    pub h: f64,               // Plant height [m]
    pub kcmax: f64,           // Upper limit of Kc after rain or irrigation
    pub fc: f64,              // Fraction of the soil covered by vegetation
    pub fw: f64,              // Fraction of the surface wetted
    pub few: f64,             // Exposed and wetted fraction of the soil
    pub de: f64,              // Evaporation layer depletion [mm]
    pub kr: f64,              // Evaporation reduction coefficient
    pub ke: f64,              // Soil evaporation coefficient
    pub e: f64,               // Soil evaporation [mm]
    pub dpe: f64,             // Deep percolation out of the evaporation layer [mm]
    pub kc: f64,              // Crop coefficient Kcb + Ke
    pub etc: f64,             // Crop ET without water stress [mm]
    pub taw: f64,             // Total available water of the root zone [mm]
    pub tawrmax: Option<f64>, // Total available water to the maximum root depth [mm]
    pub tawb: Option<f64>,    // Total available water below the roots [mm]
    pub zr: f64,              // Root depth [m]
    pub p: f64,               // Depletion fraction before stress
    pub raw: f64,             // Readily available water [mm]
    pub ks: f64,              // Transpiration reduction coefficient
    pub kcadj: f64,           // Crop coefficient under water stress
    pub etcadj: f64,          // Crop ET under water stress [mm]
    pub t: f64,               // Transpiration [mm]
    pub dp: f64,              // Deep percolation out of the root zone [mm]
    pub dr: f64,              // Root zone depletion [mm]
    pub fdr: f64,             // Fractional root zone depletion, Dr / TAW
    pub drmax: Option<f64>,   // Depletion to the maximum root depth [mm]
    pub fdrmax: Option<f64>,  // Fractional depletion to the maximum root depth
    pub db: Option<f64>,      // Depletion below the roots [mm]
    pub fdb: Option<f64>,     // Fractional depletion below the roots
    pub irrig: f64,           // Gross irrigation applied [mm]
    pub irrloss: f64,         // Irrigation lost to inefficiency [mm]
    pub rain: f64,            // Precipitation [mm]
    pub runoff: f64,          // Surface runoff [mm]
}

impl DailyRecord {
    // Year and day of year, "yyyy-ddd"
    pub fn key(&self) -> String {
        self.date.format("%Y-%j").to_string()
    }

    // Irrigation plus rain reaching the soil
    pub fn net_water(&self) -> f64 {
        self.irrig - self.irrloss + self.rain - self.runoff
    }
}

// Root zone water balance outcome
struct RootZoneBalance {
    dp: f64,
    dr: f64,
    bottom: Option<BottomZone>,
}

/// The daily state-advance function and the run constants it needs.
#[derive(Debug, Clone)]
pub struct Engine {
    params: Parameters,
    options: RunOptions,
    station: Station,
    soil: Soil,
    stages: GrowthStages,
    kcb: KcbCurve,
    tew: f64,
}

impl Engine {
    /// `kcb` holds the trapezoid targets, already climate adjusted when requested.
    pub fn new(params: Parameters, options: RunOptions, soil: Soil, station: Station, kcb: KcbCurve) -> Self {
        let stages = GrowthStages::from_parameters(&params);
        let tew = soil.initialize(params.ze, params.zr_ini, params.zr_max).tew;
        Engine {
            params,
            options,
            station,
            soil,
            stages,
            kcb,
            tew,
        }
    }

    pub fn stages(&self) -> &GrowthStages {
        &self.stages
    }

    pub fn kcb_curve(&self) -> &KcbCurve {
        &self.kcb
    }

    pub fn tew(&self) -> f64 {
        self.tew
    }

    /// State before the first simulated day.
    pub fn initial_state(&self) -> State {
        let p = &self.params;
        let init = self.soil.initialize(p.ze, p.zr_ini, p.zr_max);
        State {
            i: 0,
            de: init.de,
            dr: init.dr,
            fw: 1.0,
            h: p.h_ini,
            zr: p.zr_ini,
            ks: 1.0,
            taw: init.taw,
            bottom: init.bottom.map(|b| BottomZone {
                drmax: init.drmax,
                db: b.db,
                tawb: b.tawb,
            }),
        }
    }

    /// Advances `state` by one day.
    ///
    /// Returns the state for the next day (day index incremented) and the
    /// record of all quantities computed for `date`.
    pub fn step(&self, state: &State, date: NaiveDate, inputs: &DayInputs) -> (State, DailyRecord) {
        let p = &self.params;
        let w = &inputs.weather;

        // Basal crop coefficient, FAO-56 Tables 11 and 17
        let kcb = inputs
            .overrides
            .kcb()
            .unwrap_or_else(|| self.kcb.basal(&self.stages, state.i));

        // Plant height and root depth follow crop progress
        let progress = self.kcb.progress(kcb);
        let h = inputs
            .overrides
            .h()
            .unwrap_or_else(|| crop::grow(p.h_ini, p.h_max, progress, state.h).min(p.h_max));
        let zr = crop::grow(p.zr_ini, p.zr_max, progress, state.zr).min(p.zr_max);

        let kcmax = crop::kc_max(
            self.station.reference_crop,
            w.wndsp,
            self.station.wind_height,
            w.rhmin,
            h,
            kcb,
        );
        let fc = inputs
            .overrides
            .fc()
            .unwrap_or_else(|| crop::canopy_cover(kcb, self.kcb.ini, kcmax, h));

        // Irrigation net of application losses
        let (irrig, irrloss) = inputs
            .irrigation
            .map(|event| (event.depth, event.loss()))
            .unwrap_or((0.0, 0.0));
        let eff_irr = irrig - irrloss;

        let runoff = if self.options.runoff {
            let cn = runoff::antecedent_curve_number(p.cn2, state.de, p.rew, self.tew);
            runoff::calculate_runoff(w.rain, cn)
        } else {
            0.0
        };
        let eff_rain = w.rain - runoff;

        // Surface evaporation layer
        let fw = evaporation::wetted_fraction(
            state.fw,
            inputs.irrigation.map(|event| (event.depth, event.fw)),
            w.rain,
        );
        let few = evaporation::exposed_wetted_fraction(fc, fw);
        let kr = evaporation::reduction_coefficient(self.tew, p.rew, state.de);
        let ke = evaporation::evaporation_coefficient(kr, kcmax, kcb, few);
        let e = ke * w.etref;
        let surface = evaporation::surface_balance(state.de, eff_rain, eff_irr, fw, e, few, self.tew);

        // Non-stressed crop ET, FAO-56 Eq. 69
        let kc = ke + kcb;
        let etc = kc * w.etref;

        // Root zone capacity and water stress
        let water = self.soil.available_water(zr, p.zr_max);
        let depletion_fraction = root_uptake::depletion_fraction(p.pbase, etc, self.options.constant_p);
        let raw = depletion_fraction * water.taw;
        let ks = root_uptake::stress_coefficient(self.options.stress_model, water.taw, raw, state.dr);

        // Adjusted crop ET, FAO-56 Eq. 80
        let kcadj = ks * kcb + ke;
        let etcadj = kcadj * w.etref;
        let t = ks * kcb * w.etref;

        let net = eff_rain + eff_irr;
        let balance = match state.bottom {
            None => homogeneous_balance(state.dr, net, etcadj, water.taw),
            Some(bottom) => layered_balance(state.dr, bottom, net, etcadj, &water),
        };

        let fraction = |d: f64, cap: f64| if cap > 0.0 { d / cap } else { 0.0 };
        let record = DailyRecord {
            date,
            etref: w.etref,
            kcb,
            h,
            kcmax,
            fc,
            fw,
            few,
            de: surface.de,
            kr,
            ke,
            e,
            dpe: surface.dpe,
            kc,
            etc,
            taw: water.taw,
            tawrmax: balance.bottom.map(|_| water.tawrmax),
            tawb: balance.bottom.map(|b| b.tawb),
            zr,
            p: depletion_fraction,
            raw,
            ks,
            kcadj,
            etcadj,
            t,
            dp: balance.dp,
            dr: balance.dr,
            fdr: fraction(balance.dr, water.taw),
            drmax: balance.bottom.map(|b| b.drmax),
            fdrmax: balance.bottom.map(|b| fraction(b.drmax, water.tawrmax)),
            db: balance.bottom.map(|b| b.db),
            fdb: balance.bottom.map(|b| fraction(b.db, b.tawb)),
            irrig,
            irrloss,
            rain: w.rain,
            runoff,
        };

        let next = State {
            i: state.i + 1,
            de: surface.de,
            dr: balance.dr,
            fw,
            h,
            zr,
            ks,
            taw: water.taw,
            bottom: balance.bottom,
        };
        (next, record)
    }
}

// FAO-56 Eqs. 85, 86 and 88
fn homogeneous_balance(dr: f64, net: f64, etcadj: f64, taw: f64) -> RootZoneBalance {
    let dp = (net - etcadj - dr).max(0.0);
    RootZoneBalance {
        dp,
        dr: (dr - net + etcadj + dp).clamp(0.0, taw),
        bottom: None,
    }
}

// Percolation leaves at the maximum root depth; root growth moves part of
// the bottom zone depletion into the root zone.
fn layered_balance(dr: f64, bottom: BottomZone, net: f64, etcadj: f64, water: &RootZoneWater) -> RootZoneBalance {
    let tawb = water.tawb.unwrap_or(water.tawrmax - water.taw).max(0.0);
    let dp = (net - etcadj - bottom.drmax).max(0.0);
    let dinc = if bottom.tawb > 0.0 {
        bottom.db * (1.0 - tawb / bottom.tawb)
    } else {
        0.0
    };
    let dr = (dr - net + etcadj + dinc).clamp(0.0, water.taw);
    let drmax = (bottom.drmax - net + etcadj + dp).clamp(0.0, water.tawrmax);
    let db = (drmax - dr).clamp(0.0, tawb);
    RootZoneBalance {
        dp,
        dr,
        bottom: Some(BottomZone { drmax, db, tawb }),
    }
}
