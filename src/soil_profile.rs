use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::warn;

// Soil layer definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    pub bottom: u32,   // Bottom depth of the layer [cm]
    pub theta_fc: f64, // Volumetric water content at field capacity [cm3/cm3]
    pub theta_wp: f64, // Volumetric water content at wilting point [cm3/cm3]
    pub theta0: f64,   // Initial volumetric water content [cm3/cm3]
}

impl SoilLayer {
    pub fn new(bottom: u32, theta_fc: f64, theta_wp: f64, theta0: f64) -> Self {
        SoilLayer {
            bottom,
            theta_fc,
            theta_wp,
            theta0,
        }
    }
}

// Soil profile managing multiple layers, ordered from the surface down
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub layers: Vec<SoilLayer>,
    #[serde(default)]
    pub name: String, // Free text like "Casa Grande sandy loam, plot 6"
}

impl SoilProfile {
    pub fn new(layers: Vec<SoilLayer>) -> Self {
        SoilProfile {
            layers,
            name: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::EmptyProfile);
        }
        let mut previous = 0;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.bottom <= previous {
                return Err(ConfigError::LayerOrder {
                    index,
                    bottom: layer.bottom,
                    previous,
                });
            }
            if layer.theta_fc <= layer.theta_wp {
                return Err(ConfigError::WaterLimits {
                    name: format!("soil layer ending at {} cm", layer.bottom),
                    theta_fc: layer.theta_fc,
                    theta_wp: layer.theta_wp,
                });
            }
            previous = layer.bottom;
        }
        Ok(())
    }

    // Deepest layer boundary [mm]
    pub fn depth_mm(&self) -> u32 {
        self.layers.last().map(|l| l.bottom * 10).unwrap_or(0)
    }

    // Layer containing depth z [mm]: the first whose bottom is at or below z
    pub fn layer_at_depth(&self, z_mm: u32) -> Option<&SoilLayer> {
        self.layers.iter().find(|layer| z_mm <= layer.bottom * 10)
    }

    // Walk the column in 1 mm increments, summing per-mm water depths within each zone
    fn integrate(&self, ze: f64, zr: f64, zr_max: f64) -> ColumnSums {
        let ze_mm = ze * 1000.0;
        let zr_mm = zr * 1000.0;
        let zr_max_mm = zr_max * 1000.0;
        let mut sums = ColumnSums::default();
        for z in 1..=self.depth_mm() {
            let Some(layer) = self.layer_at_depth(z) else {
                break;
            };
            let depth = z as f64;
            if depth <= ze_mm {
                sums.tew += layer.theta_fc - 0.5 * layer.theta_wp;
            }
            if depth <= zr_mm {
                sums.dr += layer.theta_fc - layer.theta0;
                sums.taw += layer.theta_fc - layer.theta_wp;
            }
            if depth <= zr_max_mm {
                sums.drmax += layer.theta_fc - layer.theta0;
                sums.tawrmax += layer.theta_fc - layer.theta_wp;
            }
        }
        sums
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ColumnSums {
    tew: f64,
    dr: f64,
    taw: f64,
    drmax: f64,
    tawrmax: f64,
}

/// Soil water holding description of the field.
#[derive(Debug, Clone, PartialEq)]
pub enum Soil {
    /// A single bucket with uniform water limits.
    Homogeneous {
        theta_fc: f64,
        theta_wp: f64,
        theta0: f64,
    },
    /// Discrete layers integrated at 1 mm resolution.
    Layered(SoilProfile),
}

/// Depletion and capacity of the zone between the current and maximum root depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottomWater {
    pub db: f64,   // Bottom zone depletion [mm]
    pub tawb: f64, // Bottom zone total available water [mm]
}

/// Water storage of the column at the start of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialWater {
    pub tew: f64,     // Total evaporable water [mm]
    pub de: f64,      // Evaporation layer depletion [mm]
    pub dr: f64,      // Root zone depletion [mm]
    pub drmax: f64,   // Depletion to the maximum root depth [mm]
    pub taw: f64,     // Total available water at the initial root depth [mm]
    pub tawrmax: f64, // Total available water at the maximum root depth [mm]
    pub bottom: Option<BottomWater>, // Layered soil only
}

/// Root zone capacities for a given root depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootZoneWater {
    pub taw: f64,
    pub tawrmax: f64,
    pub tawb: Option<f64>, // Layered soil only
}

impl Soil {
    pub fn validate(&self, zr_max: f64) -> Result<(), ConfigError> {
        match self {
            Soil::Homogeneous {
                theta_fc, theta_wp, ..
            } => {
                if theta_fc <= theta_wp {
                    return Err(ConfigError::WaterLimits {
                        name: "parameters".to_string(),
                        theta_fc: *theta_fc,
                        theta_wp: *theta_wp,
                    });
                }
            }
            Soil::Layered(profile) => {
                profile.validate()?;
                let depth = profile.depth_mm() as f64 / 1000.0;
                if depth < zr_max {
                    warn!(
                        profile_depth_m = depth,
                        zr_max, "soil profile is shallower than the maximum root depth"
                    );
                }
            }
        }
        Ok(())
    }

    pub fn is_layered(&self) -> bool {
        matches!(self, Soil::Layered(_))
    }

    /// Computes the initial evaporable and available water of the column.
    ///
    /// `ze`, `zr_ini` and `zr_max` are the evaporation layer depth and the
    /// initial and maximum root depths in meters. Pure function of its inputs.
    pub fn initialize(&self, ze: f64, zr_ini: f64, zr_max: f64) -> InitialWater {
        match self {
            Soil::Homogeneous {
                theta_fc,
                theta_wp,
                theta0,
            } => {
                // FAO-56 Eq. 73 and Eq. 87
                let tew = 1000.0 * (theta_fc - 0.5 * theta_wp) * ze;
                InitialWater {
                    tew,
                    de: tew,
                    dr: 1000.0 * (theta_fc - theta0) * zr_ini,
                    drmax: 1000.0 * (theta_fc - theta0) * zr_max,
                    taw: 1000.0 * (theta_fc - theta_wp) * zr_ini,
                    tawrmax: 1000.0 * (theta_fc - theta_wp) * zr_max,
                    bottom: None,
                }
            }
            Soil::Layered(profile) => {
                let sums = profile.integrate(ze, zr_ini, zr_max);
                InitialWater {
                    tew: sums.tew,
                    de: sums.tew,
                    dr: sums.dr,
                    drmax: sums.drmax,
                    taw: sums.taw,
                    tawrmax: sums.tawrmax,
                    bottom: Some(BottomWater {
                        db: sums.drmax - sums.dr,
                        tawb: sums.tawrmax - sums.taw,
                    }),
                }
            }
        }
    }

    /// Total available water for root depth `zr` (m), FAO-56 Eq. 82.
    pub fn available_water(&self, zr: f64, zr_max: f64) -> RootZoneWater {
        match self {
            Soil::Homogeneous {
                theta_fc, theta_wp, ..
            } => RootZoneWater {
                taw: 1000.0 * (theta_fc - theta_wp) * zr,
                tawrmax: 1000.0 * (theta_fc - theta_wp) * zr_max,
                tawb: None,
            },
            Soil::Layered(profile) => {
                let sums = profile.integrate(0.0, zr, zr_max);
                RootZoneWater {
                    taw: sums.taw,
                    tawrmax: sums.tawrmax,
                    tawb: Some(sums.tawrmax - sums.taw),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn homogeneous() -> Soil {
        Soil::Homogeneous {
            theta_fc: 0.25,
            theta_wp: 0.10,
            theta0: 0.10,
        }
    }

    fn two_layers() -> SoilProfile {
        SoilProfile::new(vec![
            SoilLayer::new(30, 0.30, 0.12, 0.20),
            SoilLayer::new(200, 0.22, 0.09, 0.15),
        ])
    }

    #[test]
    fn homogeneous_initial_water() {
        let init = homogeneous().initialize(0.10, 0.20, 1.40);
        assert_abs_diff_eq!(init.tew, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(init.de, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(init.dr, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(init.taw, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(init.tawrmax, 210.0, epsilon = 1e-9);
        assert!(init.bottom.is_none());
    }

    #[test]
    fn single_layer_matches_homogeneous() {
        let layered = Soil::Layered(SoilProfile::new(vec![SoilLayer::new(200, 0.25, 0.10, 0.10)]));
        let a = homogeneous().initialize(0.10, 0.20, 1.40);
        let b = layered.initialize(0.10, 0.20, 1.40);
        assert_abs_diff_eq!(a.tew, b.tew, epsilon = 1e-6);
        assert_abs_diff_eq!(a.dr, b.dr, epsilon = 1e-6);
        assert_abs_diff_eq!(a.taw, b.taw, epsilon = 1e-6);
        assert_abs_diff_eq!(a.drmax, b.drmax, epsilon = 1e-6);
        assert_abs_diff_eq!(a.tawrmax, b.tawrmax, epsilon = 1e-6);
    }

    #[test]
    fn layered_roots_span_boundary() {
        let soil = Soil::Layered(two_layers());
        let init = soil.initialize(0.10, 0.50, 1.50);
        // 300 mm of the top layer plus 200 mm of the second
        let taw = 300.0 * (0.30 - 0.12) + 200.0 * (0.22 - 0.09);
        assert_abs_diff_eq!(init.taw, taw, epsilon = 1e-6);
        let tew = 100.0 * (0.30 - 0.06);
        assert_abs_diff_eq!(init.tew, tew, epsilon = 1e-6);
        let bottom = init.bottom.unwrap();
        assert_abs_diff_eq!(init.drmax, init.dr + bottom.db, epsilon = 1e-9);
        assert_abs_diff_eq!(init.tawrmax, init.taw + bottom.tawb, epsilon = 1e-9);
    }

    #[test]
    fn initializer_is_idempotent() {
        let soil = Soil::Layered(two_layers());
        assert_eq!(soil.initialize(0.1, 0.2, 1.2), soil.initialize(0.1, 0.2, 1.2));
    }

    #[test]
    fn roots_below_profile_stop_at_deepest_layer() {
        let soil = Soil::Layered(SoilProfile::new(vec![SoilLayer::new(50, 0.25, 0.10, 0.10)]));
        let water = soil.available_water(1.0, 2.0);
        assert_abs_diff_eq!(water.taw, 500.0 * 0.15, epsilon = 1e-6);
        assert_abs_diff_eq!(water.tawb.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn layer_lookup_uses_bottom_depth() {
        let profile = two_layers();
        assert_eq!(profile.layer_at_depth(300).unwrap().bottom, 30);
        assert_eq!(profile.layer_at_depth(301).unwrap().bottom, 200);
        assert!(profile.layer_at_depth(2001).is_none());
    }

    #[test]
    fn rejects_unordered_layers() {
        let profile = SoilProfile::new(vec![
            SoilLayer::new(40, 0.3, 0.1, 0.2),
            SoilLayer::new(40, 0.3, 0.1, 0.2),
        ]);
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::LayerOrder { index: 1, .. })
        ));
        assert!(matches!(
            SoilProfile::default().validate(),
            Err(ConfigError::EmptyProfile)
        ));
    }
}
