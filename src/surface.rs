use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Rec. 601 luma in `[0, 255]`.
    pub fn luma(self) -> f32 {
        0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        rgb.with_alpha(1.0)
    }
}

/// Immediate-mode 2D drawing target, in surface pixels.
pub trait Canvas {
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self, color: Rgb);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// The host container's rendered box, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerBox {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    fn pixel_size(self) -> (u32, u32) {
        // Float-to-int `as` saturates: NaN and negatives land on zero.
        (self.width as u32, self.height as u32)
    }
}

#[derive(Debug)]
pub struct HostSurface<C> {
    canvas: C,
    container: ContainerBox,
}

impl<C: Canvas> HostSurface<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            container: ContainerBox::default(),
        }
    }

    /// Match the canvas to the container box. Returns true if the pixel size changed.
    pub fn sync(&mut self, container: ContainerBox) -> bool {
        self.container = container;
        let (width, height) = container.pixel_size();
        if self.canvas.size() == (width, height) {
            return false;
        }
        self.canvas.resize(width, height);
        true
    }

    pub fn width(&self) -> f32 {
        self.canvas.size().0 as f32
    }

    pub fn height(&self) -> f32 {
        self.canvas.size().1 as f32
    }

    pub fn to_local(&self, client: Vec2) -> Vec2 {
        client - Vec2::new(self.container.left, self.container.top)
    }

    pub fn contains(&self, local: Vec2) -> bool {
        local.x >= 0.0 && local.y >= 0.0 && local.x <= self.width() && local.y <= self.height()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// Canvas that records the current frame's commands for replay on another 2D API.
#[derive(Debug, Default, Clone)]
pub struct DisplayList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Canvas for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    // A clear covers everything drawn before it.
    fn clear(&mut self, color: Rgb) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::{Canvas, ContainerBox, DisplayList, DrawCommand, HostSurface, Rgb};

    #[test]
    fn sync_truncates_to_whole_pixels() {
        let mut surface = HostSurface::new(DisplayList::default());
        assert!(surface.sync(ContainerBox::sized(800.7, 600.2)));
        assert_eq!(surface.canvas().size(), (800, 600));
        assert!(!surface.sync(ContainerBox::sized(800.1, 600.9)));
    }

    #[test]
    fn negative_container_collapses_to_empty() {
        let mut surface = HostSurface::new(DisplayList::new(10, 10));
        surface.sync(ContainerBox::sized(-5.0, f32::NAN));
        assert_eq!(surface.canvas().size(), (0, 0));
    }

    #[test]
    fn client_coordinates_are_offset_by_container() {
        let mut surface = HostSurface::new(DisplayList::default());
        surface.sync(ContainerBox {
            left: 100.0,
            top: 40.0,
            width: 300.0,
            height: 200.0,
        });
        let local = surface.to_local(Vec2::new(150.0, 90.0));
        assert_eq!(local, Vec2::new(50.0, 50.0));
        assert!(surface.contains(local));
        assert!(!surface.contains(surface.to_local(Vec2::new(50.0, 50.0))));
    }

    #[test]
    fn clear_starts_a_new_frame() {
        let mut list = DisplayList::new(10, 10);
        list.fill_circle(Vec2::ONE, 1.0, Rgb::new(1, 2, 3).into());
        list.clear(Rgb::new(0, 0, 0));
        assert_eq!(list.commands(), &[DrawCommand::Clear(Rgb::new(0, 0, 0))]);
    }
}
