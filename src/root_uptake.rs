use crate::params::StressModel;

// Shape factor of the AquaCrop stomatal response curve
pub const AQUACROP_SHAPE_FACTOR: f64 = 1.5;

/// Fraction of TAW that can be depleted before stress, FAO-56 p. 162 and Table 22.
///
/// With `constant` the base value is used as is; otherwise it is corrected
/// for the day's evaporative demand and kept within [0.1, 0.8].
pub fn depletion_fraction(pbase: f64, etc: f64, constant: bool) -> f64 {
    if constant {
        pbase
    } else {
        (pbase + 0.04 * (5.0 - etc)).clamp(0.1, 0.8)
    }
}

/// Transpiration reduction coefficient Ks for root zone depletion `dr`.
pub fn stress_coefficient(model: StressModel, taw: f64, raw: f64, dr: f64) -> f64 {
    let range = taw - raw;
    if range <= 0.0 {
        return if dr < taw { 1.0 } else { 0.0 };
    }
    match model {
        // FAO-56 Eq. 84
        StressModel::Fao56 => ((taw - dr) / range).clamp(0.0, 1.0),
        // Relative depletion between the upper and lower thresholds (Raes et al., AquaCrop)
        StressModel::AquaCrop => {
            let drel = (dr - raw) / range;
            let sf = AQUACROP_SHAPE_FACTOR;
            let ks = 1.0 - ((sf * drel).exp() - 1.0) / (sf.exp() - 1.0);
            ks.clamp(0.0, 1.0)
        }
    }
}
