//! Decorative particle-field backdrop.
//!
//! Particles drift across a surface, get pushed away from the pointer, speed
//! up briefly on scroll and are joined by faint lines when close together.
//! The host environment supplies frames, events and a container size through
//! [`host::Host`]; drawing goes through [`surface::Canvas`].

pub mod backdrop;
pub mod driver;
pub mod error;
pub mod host;
pub mod particles;
pub mod quality;
pub mod raster;
pub mod script;
pub mod surface;
pub mod theme;

pub use backdrop::Backdrop;
pub use driver::{RenderLoop, SpeedBoost};
pub use error::{BackdropError, Result};
pub use host::{EventKind, FrameId, HeadlessHost, Host, HostEvent, ListenerId};
pub use particles::{BackdropConfig, EdgePolicy, Particle, ParticleField};
pub use raster::Framebuffer;
pub use surface::{Canvas, ContainerBox, DisplayList, DrawCommand, HostSurface, Rgb, Rgba};
pub use theme::{Palette, Theme};
