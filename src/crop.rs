//! Crop growth curves of the dual crop coefficient method: basal crop
//! coefficient, plant height, root depth, the upper limit Kcmax and the
//! canopy cover fraction. Equation numbers refer to FAO-56.

use crate::params::Parameters;
use crate::refet::{ReferenceCrop, wind_at_2m};

/// Day-count boundaries of the four growth phases, computed once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthStages {
    pub s1: f64, // End of the initial phase
    pub s2: f64, // End of development
    pub s3: f64, // End of mid season
    pub s4: f64, // End of late season
}

impl GrowthStages {
    pub fn from_parameters(params: &Parameters) -> Self {
        let s1 = params.l_ini as f64;
        let s2 = s1 + params.l_dev as f64;
        let s3 = s2 + params.l_mid as f64;
        let s4 = s3 + params.l_end as f64;
        GrowthStages { s1, s2, s3, s4 }
    }

    pub fn is_mid_season(&self, i: u32) -> bool {
        let i = i as f64;
        self.s2 < i && i <= self.s3
    }

    pub fn is_late_season(&self, i: u32) -> bool {
        let i = i as f64;
        self.s3 < i && i <= self.s4
    }
}

/// Kcb values at the corners of the trapezoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KcbCurve {
    pub ini: f64,
    pub mid: f64,
    pub end: f64,
}

impl KcbCurve {
    pub fn from_parameters(params: &Parameters) -> Self {
        KcbCurve {
            ini: params.kcb_ini,
            mid: params.kcb_mid,
            end: params.kcb_end,
        }
    }

    /// Basal crop coefficient on day `i` since the simulation start.
    ///
    /// Each phase is interpolated directly from its own start, so the value
    /// on a day does not depend on having evaluated the previous days.
    pub fn basal(&self, stages: &GrowthStages, i: u32) -> f64 {
        let i = i as f64;
        if i <= stages.s1 {
            self.ini
        } else if i <= stages.s2 {
            self.ini + (self.mid - self.ini) * (i - stages.s1) / (stages.s2 - stages.s1)
        } else if i <= stages.s3 {
            self.mid
        } else if i <= stages.s4 {
            self.mid + (self.end - self.mid) * (i - stages.s3) / (stages.s4 - stages.s3)
        } else {
            self.end
        }
    }

    /// Fraction of the way from `ini` to `mid` reached by `kcb`, within [0, 1].
    ///
    /// A crop whose mid value equals its initial value is taken as fully grown.
    pub fn progress(&self, kcb: f64) -> f64 {
        let span = self.mid - self.ini;
        if span.abs() < 1e-9 {
            return 1.0;
        }
        ((kcb - self.ini) / span).clamp(0.0, 1.0)
    }
}

/// Mean mid and late season climate used for the Kcb adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonClimate {
    pub u2: f64,    // Mean wind speed at 2 m [m/s]
    pub rhmin: f64, // Mean minimum relative humidity [%]
}

/// Climate correction of a tabulated Kcb mid or end value, FAO-56 Eq. 70.
pub fn adjust_kcb(kcb: f64, climate: SeasonClimate, h: f64) -> f64 {
    let u2 = climate.u2.clamp(1.0, 6.0);
    let rhmin = climate.rhmin.clamp(20.0, 80.0);
    kcb + (0.04 * (u2 - 2.0) - 0.004 * (rhmin - 45.0)) * (h / 3.0).powf(0.3)
}

/// Scales a quantity between its initial and maximum value by crop progress,
/// never letting it fall below yesterday's value. FAO-56 page 279.
pub fn grow(initial: f64, maximum: f64, progress: f64, previous: f64) -> f64 {
    (initial + (maximum - initial) * progress).max(0.001).max(previous)
}

/// Upper limit on the crop coefficient, FAO-56 Eq. 72.
pub fn kc_max(crop: ReferenceCrop, wndsp: f64, wndht: f64, rhmin: f64, h: f64, kcb: f64) -> f64 {
    match crop {
        ReferenceCrop::Short => {
            let u2 = wind_at_2m(wndsp, wndht).clamp(1.0, 6.0);
            let rhmin = rhmin.clamp(20.0, 80.0);
            let kcmax = 1.2 + (0.04 * (u2 - 2.0) - 0.004 * (rhmin - 45.0)) * (h / 3.0).powf(0.3);
            kcmax.max(kcb + 0.05)
        }
        ReferenceCrop::Tall => 1.0_f64.max(kcb + 0.05),
    }
}

/// Canopy cover fraction, FAO-56 Eq. 76.
pub fn canopy_cover(kcb: f64, kcb_ini: f64, kcmax: f64, h: f64) -> f64 {
    let ratio = ((kcb - kcb_ini) / (kcmax - kcb_ini)).max(0.0);
    ratio.powf(1.0 + 0.5 * h).clamp(0.0, 0.99)
}
