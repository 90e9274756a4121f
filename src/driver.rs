use glam::Vec2;
use log::trace;

use crate::host::{FrameId, Host};
use crate::particles::{BoostConfig, ParticleField};
use crate::surface::Canvas;
use crate::theme::Palette;

/// Scroll-driven speed multiplier; always within `[1.0, config.max]`.
#[derive(Debug, Clone, Copy)]
pub struct SpeedBoost {
    value: f32,
    config: BoostConfig,
}

impl SpeedBoost {
    pub fn new(config: BoostConfig) -> Self {
        Self { value: 1.0, config }
    }

    pub fn value(self) -> f32 {
        self.value
    }

    pub fn kick(&mut self) {
        self.value = (self.value + self.config.scroll_increment).min(self.config.max);
    }

    pub fn decay(&mut self) {
        self.value = (self.value - self.config.decay_step).max(1.0);
    }
}

#[derive(Debug)]
pub struct RenderLoop {
    field: ParticleField,
    /// `None` while the pointer is off the surface.
    pointer: Option<Vec2>,
    boost: SpeedBoost,
    pending: Option<FrameId>,
    frames: u64,
}

impl RenderLoop {
    pub fn new(field: ParticleField) -> Self {
        let boost = SpeedBoost::new(field.config().boost);
        Self {
            field,
            pointer: None,
            boost,
            pending: None,
            frames: 0,
        }
    }

    pub fn start<H: Host>(&mut self, host: &mut H) {
        if self.pending.is_none() {
            self.pending = Some(host.request_frame());
        }
    }

    pub fn stop<H: Host>(&mut self, host: &mut H) {
        if let Some(frame) = self.pending.take() {
            host.cancel_frame(frame);
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Run one tick if `frame` is the one this loop is waiting for, then schedule the next.
    pub fn on_frame<H: Host, C: Canvas>(
        &mut self,
        host: &mut H,
        frame: FrameId,
        canvas: &mut C,
        palette: &Palette,
    ) -> bool {
        if self.pending != Some(frame) {
            trace!("ignoring frame {:?}, waiting on {:?}", frame, self.pending);
            return false;
        }
        self.pending = None;
        self.tick(canvas, palette);
        self.pending = Some(host.request_frame());
        true
    }

    pub fn tick<C: Canvas>(&mut self, canvas: &mut C, palette: &Palette) {
        canvas.clear(palette.background);
        self.field.update(self.pointer, self.boost.value());
        self.field.draw(canvas, palette);
        self.field.connect(canvas, palette);
        self.boost.decay();
        self.frames += 1;
    }

    pub fn pointer_moved(&mut self, local: Vec2) {
        self.pointer = Some(local);
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    pub fn scrolled(&mut self) {
        self.boost.kick();
    }

    pub fn reinit(&mut self, width: f32, height: f32) {
        self.field.reinit(width, height);
    }

    /// Forget the pointer and any scroll boost.
    pub fn reset_input(&mut self) {
        self.pointer = None;
        self.boost = SpeedBoost::new(self.field.config().boost);
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn boost(&self) -> f32 {
        self.boost.value()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }
}
