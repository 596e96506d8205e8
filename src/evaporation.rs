// Surface evaporation layer of the dual crop coefficient method (FAO-56 Chapter 7)

/// Fraction of the soil surface wetted today, FAO-56 Table 20.
///
/// An irrigation event brings its own wetted fraction; a day with no
/// irrigation depth and at least 3 mm of rain wets the whole surface;
/// otherwise yesterday's fraction carries over.
pub fn wetted_fraction(previous: f64, irrigation: Option<(f64, f64)>, rain: f64) -> f64 {
    let (depth, fw) = irrigation.unwrap_or((0.0, previous));
    if depth <= 0.0 && rain >= 3.0 {
        1.0
    } else {
        fw
    }
}

/// Exposed and wetted soil fraction, FAO-56 Eq. 75.
pub fn exposed_wetted_fraction(fc: f64, fw: f64) -> f64 {
    (1.0 - fc).min(fw).clamp(0.01, 1.0)
}

/// Evaporation reduction coefficient, FAO-56 Eq. 74.
pub fn reduction_coefficient(tew: f64, rew: f64, de: f64) -> f64 {
    if tew <= rew {
        return if de < tew { 1.0 } else { 0.0 };
    }
    ((tew - de) / (tew - rew)).clamp(0.0, 1.0)
}

/// Soil evaporation coefficient, FAO-56 Eq. 71.
pub fn evaporation_coefficient(kr: f64, kcmax: f64, kcb: f64, few: f64) -> f64 {
    (kr * (kcmax - kcb)).min(few * kcmax)
}

/// Result of the evaporation layer water balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBalance {
    pub dpe: f64, // Percolation out of the evaporation layer [mm]
    pub de: f64,  // End of day cumulative depletion [mm]
}

/**
Updates the evaporation layer depletion, FAO-56 Eqs. 77-79.

# Arguments
* `de` - Depletion at the end of the previous day [mm].
* `eff_rain` - Rain net of runoff [mm].
* `eff_irr` - Irrigation net of losses [mm], spread over `fw`.
* `fw` - Fraction of the surface wetted by irrigation.
* `e` - Soil evaporation [mm], concentrated on `few`.
* `few` - Exposed and wetted fraction.
* `tew` - Total evaporable water [mm].
*/
pub fn surface_balance(de: f64, eff_rain: f64, eff_irr: f64, fw: f64, e: f64, few: f64, tew: f64) -> SurfaceBalance {
    // Irrigation water is concentrated on the wetted fraction
    let infiltration = eff_rain + eff_irr / fw.max(0.01);
    let dpe = (infiltration - de).max(0.0);
    let de = (de - infiltration + e / few + dpe).clamp(0.0, tew);
    SurfaceBalance { dpe, de }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wetted_fraction_rules() {
        assert_eq!(wetted_fraction(0.4, Some((25.0, 0.6)), 10.0), 0.6);
        assert_eq!(wetted_fraction(0.4, None, 3.0), 1.0);
        assert_eq!(wetted_fraction(0.4, None, 2.9), 0.4);
        assert_eq!(wetted_fraction(0.4, Some((0.0, 0.5)), 0.0), 0.5);
        assert_eq!(wetted_fraction(0.4, Some((0.0, 0.5)), 5.0), 1.0);
    }

    #[test]
    fn exposed_fraction_is_bounded() {
        assert_eq!(exposed_wetted_fraction(0.99, 1.0), 0.01);
        assert_eq!(exposed_wetted_fraction(0.0, 1.0), 1.0);
        assert_eq!(exposed_wetted_fraction(0.3, 0.5), 0.5);
    }

    #[test]
    fn reduction_coefficient_stages() {
        assert_eq!(reduction_coefficient(20.0, 8.0, 5.0), 1.0);
        assert_eq!(reduction_coefficient(20.0, 8.0, 20.0), 0.0);
        assert_abs_diff_eq!(reduction_coefficient(20.0, 8.0, 14.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn evaporation_limited_by_exposed_fraction() {
        assert_abs_diff_eq!(evaporation_coefficient(1.0, 1.2, 0.15, 0.5), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(evaporation_coefficient(0.5, 1.2, 0.15, 1.0), 0.525, epsilon = 1e-12);
    }

    #[test]
    fn heavy_rain_refills_layer_and_percolates() {
        let balance = surface_balance(12.0, 30.0, 0.0, 1.0, 1.0, 1.0, 20.0);
        assert_abs_diff_eq!(balance.dpe, 18.0, epsilon = 1e-12);
        assert_abs_diff_eq!(balance.de, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn drying_is_capped_at_tew() {
        let balance = surface_balance(19.0, 0.0, 0.0, 1.0, 3.0, 0.5, 20.0);
        assert_eq!(balance.dpe, 0.0);
        assert_eq!(balance.de, 20.0);
    }
}
