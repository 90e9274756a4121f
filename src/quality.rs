use crate::particles::ParticleFieldConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceClass {
    Compact,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityBudget {
    pub density_divisor: f32,
    pub connect_distance: f32,
}

impl SurfaceClass {
    pub fn classify(width: f32, config: &ParticleFieldConfig) -> Self {
        if width < config.compact_width_threshold {
            Self::Compact
        } else {
            Self::Wide
        }
    }

    pub fn budget(self, config: &ParticleFieldConfig) -> DensityBudget {
        match self {
            Self::Compact => DensityBudget {
                density_divisor: config.compact_density_divisor,
                connect_distance: config.compact_connect_distance,
            },
            Self::Wide => DensityBudget {
                density_divisor: config.wide_density_divisor,
                connect_distance: config.wide_connect_distance,
            },
        }
    }
}

impl DensityBudget {
    /// `floor(width * height / divisor)`, or zero for degenerate geometry.
    pub fn particle_count(self, width: f32, height: f32) -> usize {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !usable(width) || !usable(height) || !usable(self.density_divisor) {
            return 0;
        }
        // f64 keeps exact products for any realistic pixel size.
        let area = f64::from(width) * f64::from(height);
        (area / f64::from(self.density_divisor)).floor() as usize
    }
}
