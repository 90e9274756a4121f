use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BackdropError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Bounce off the margin band, flipping both velocity and base velocity.
    #[default]
    Reflect,
    /// Re-enter from the opposite side of the margin band.
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldConfig {
    pub wide_density_divisor: f32,
    pub compact_density_divisor: f32,
    /// Surfaces narrower than this use the compact budget.
    pub compact_width_threshold: f32,
    pub wide_connect_distance: f32,
    pub compact_connect_distance: f32,
    pub edge_policy: EdgePolicy,
    pub edge_margin: f32,
    pub perspective: bool,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self {
            wide_density_divisor: 14_000.0,
            compact_density_divisor: 28_000.0,
            compact_width_threshold: 768.0,
            wide_connect_distance: 220.0,
            compact_connect_distance: 150.0,
            edge_policy: EdgePolicy::Reflect,
            edge_margin: 50.0,
            perspective: false,
        }
    }
}

impl ParticleFieldConfig {
    /// Same divisor and connection distance at every width.
    pub fn uniform(density_divisor: f32, connect_distance: f32) -> Self {
        Self {
            wide_density_divisor: density_divisor,
            compact_density_divisor: density_divisor,
            compact_width_threshold: 0.0,
            wide_connect_distance: connect_distance,
            compact_connect_distance: connect_distance,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Base velocity components are drawn from `[-base_speed, base_speed]`.
    pub base_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub depth_speed: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.15,
            min_radius: 1.0,
            max_radius: 2.5,
            depth_speed: 0.0001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    pub damping: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            repulsion_radius: 150.0,
            repulsion_strength: 1.5,
            damping: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub scroll_increment: f32,
    pub max: f32,
    pub decay_step: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            scroll_increment: 0.8,
            max: 4.0,
            decay_step: 0.03,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub particle_opacity: f32,
    pub line_opacity: f32,
    pub line_width: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            particle_opacity: 0.7,
            line_opacity: 0.3,
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub field: ParticleFieldConfig,
    pub spawn: SpawnConfig,
    pub force: ForceConfig,
    pub boost: BoostConfig,
    pub link: LinkConfig,
    pub seed: Option<u64>,
}

impl BackdropConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BackdropError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let field = &self.field;
        positive("field.wide_density_divisor", field.wide_density_divisor)?;
        positive("field.compact_density_divisor", field.compact_density_divisor)?;
        non_negative("field.compact_width_threshold", field.compact_width_threshold)?;
        positive("field.wide_connect_distance", field.wide_connect_distance)?;
        positive("field.compact_connect_distance", field.compact_connect_distance)?;
        non_negative("field.edge_margin", field.edge_margin)?;

        let spawn = &self.spawn;
        non_negative("spawn.base_speed", spawn.base_speed)?;
        positive("spawn.min_radius", spawn.min_radius)?;
        positive("spawn.max_radius", spawn.max_radius)?;
        if spawn.min_radius > spawn.max_radius {
            return Err(invalid("spawn.min_radius", "must not exceed spawn.max_radius"));
        }
        non_negative("spawn.depth_speed", spawn.depth_speed)?;

        let force = &self.force;
        positive("force.repulsion_radius", force.repulsion_radius)?;
        non_negative("force.repulsion_strength", force.repulsion_strength)?;
        positive("force.damping", force.damping)?;
        if force.damping > 1.0 {
            return Err(invalid("force.damping", "must be at most 1.0"));
        }

        let boost = &self.boost;
        non_negative("boost.scroll_increment", boost.scroll_increment)?;
        positive("boost.decay_step", boost.decay_step)?;
        if !boost.max.is_finite() || boost.max < 1.0 {
            return Err(invalid("boost.max", "must be a finite value of at least 1.0"));
        }

        let link = &self.link;
        unit_interval("link.particle_opacity", link.particle_opacity)?;
        unit_interval("link.line_opacity", link.line_opacity)?;
        positive("link.line_width", link.line_width)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> BackdropError {
    BackdropError::InvalidConfig { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be finite and greater than zero"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be finite and not negative"))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must lie in [0, 1]"))
    }
}
