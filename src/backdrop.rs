//! A mounted particle backdrop: surface, render loop and host listeners
//! bundled into one owned instance.
//!
//! The host constructs a [`Backdrop`] when its container becomes visible and
//! hands it back to [`Backdrop::unmount`] when the container goes away.
//! Unmounting consumes the instance, so no frame or event can reach it after
//! teardown.

use log::debug;

use crate::driver::RenderLoop;
use crate::error::Result;
use crate::host::{EventKind, FrameId, Host, HostEvent, ListenerId};
use crate::particles::{BackdropConfig, ParticleField};
use crate::surface::{Canvas, HostSurface};
use crate::theme::{Palette, Theme};

const LISTENED: [EventKind; 4] = [
    EventKind::PointerMove,
    EventKind::PointerLeave,
    EventKind::Scroll,
    EventKind::Resize,
];

#[derive(Debug)]
pub struct Backdrop<C> {
    surface: HostSurface<C>,
    driver: RenderLoop,
    theme: Theme,
    palette: Palette,
    listeners: Vec<ListenerId>,
}

impl<C: Canvas> Backdrop<C> {
    pub fn mount<H: Host>(
        host: &mut H,
        canvas: C,
        theme: Theme,
        config: BackdropConfig,
    ) -> Result<Self> {
        let mut surface = HostSurface::new(canvas);
        surface.sync(host.container_box());
        let field = ParticleField::new(surface.width(), surface.height(), config)?;
        let listeners = LISTENED.iter().map(|&kind| host.add_listener(kind)).collect();

        let mut backdrop = Self {
            surface,
            driver: RenderLoop::new(field),
            theme,
            palette: theme.palette(),
            listeners,
        };
        backdrop.driver.start(host);
        debug!(
            "mounted {:?} backdrop {}x{} with {} particles",
            theme,
            backdrop.surface.width(),
            backdrop.surface.height(),
            backdrop.driver.field().len()
        );
        Ok(backdrop)
    }

    /// Stop the loop and release every host registration.
    pub fn unmount<H: Host>(mut self, host: &mut H) -> C {
        self.driver.stop(host);
        for listener in self.listeners.drain(..) {
            host.remove_listener(listener);
        }
        debug!(
            "unmounted backdrop after {} frames",
            self.driver.frames_rendered()
        );
        self.surface.into_canvas()
    }

    pub fn handle_event<H: Host>(&mut self, host: &mut H, event: HostEvent) {
        match event {
            HostEvent::PointerMove(client) => {
                let local = self.surface.to_local(client);
                if self.surface.contains(local) {
                    self.driver.pointer_moved(local);
                }
            }
            HostEvent::PointerLeave => self.driver.pointer_left(),
            HostEvent::Scroll => self.driver.scrolled(),
            HostEvent::Resize => self.resize(host),
        }
    }

    pub fn on_frame<H: Host>(&mut self, host: &mut H, frame: FrameId) -> bool {
        self.driver.on_frame(host, frame, self.surface.canvas_mut(), &self.palette)
    }

    /// Switch palettes. The particle set is rebuilt rather than recolored, and
    /// pointer and scroll boost start over.
    pub fn set_theme<H: Host>(&mut self, host: &mut H, theme: Theme) {
        if theme == self.theme {
            return;
        }
        self.driver.stop(host);
        self.theme = theme;
        self.palette = theme.palette();
        self.driver.reinit(self.surface.width(), self.surface.height());
        self.driver.reset_input();
        self.driver.start(host);
        debug!("backdrop theme changed to {:?}", theme);
    }

    fn resize<H: Host>(&mut self, host: &mut H) {
        self.driver.stop(host);
        self.surface.sync(host.container_box());
        self.driver.reinit(self.surface.width(), self.surface.height());
        self.driver.start(host);
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn driver(&self) -> &RenderLoop {
        &self.driver
    }

    pub fn field(&self) -> &ParticleField {
        self.driver.field()
    }

    pub fn canvas(&self) -> &C {
        self.surface.canvas()
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }
}
