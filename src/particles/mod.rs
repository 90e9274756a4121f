pub mod config;
pub mod simulation;

pub use config::{
    BackdropConfig, BoostConfig, EdgePolicy, ForceConfig, LinkConfig, ParticleFieldConfig,
    SpawnConfig,
};
pub use simulation::{Particle, ParticleField};
