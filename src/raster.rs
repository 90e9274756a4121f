use std::io::{Seek, Write};
use std::path::Path;

use glam::Vec2;
use image::{ImageFormat, Rgba as Pixel, RgbaImage};

use crate::error::Result;
use crate::surface::{Canvas, Rgb, Rgba};

/// Software RGBA8 canvas with source-over blending.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    image: RgbaImage,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn write_png<W: Write + Seek>(&self, out: &mut W) -> Result<()> {
        self.image.write_to(out, ImageFormat::Png)?;
        Ok(())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        let (width, height) = self.image.dimensions();
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return;
        }
        let a = (color.alpha * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let Pixel(dst) = self.image.get_pixel_mut(x as u32, y as u32);
        let mix = |d: u8, s: u8| (f32::from(d) * (1.0 - a) + f32::from(s) * a).round() as u8;
        dst[0] = mix(dst[0], color.rgb.r);
        dst[1] = mix(dst[1], color.rgb.g);
        dst[2] = mix(dst[2], color.rgb.b);
        dst[3] = mix(dst[3], 255);
    }
}

impl Canvas for Framebuffer {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn clear(&mut self, color: Rgb) {
        let fill = Pixel([color.r, color.g, color.b, 255]);
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(center.is_finite() && radius.is_finite()) || radius <= 0.0 {
            return;
        }
        let x0 = (center.x - radius - 1.0).floor() as i64;
        let x1 = (center.x + radius + 1.0).ceil() as i64;
        let y0 = (center.y - radius - 1.0).floor() as i64;
        let y1 = (center.y + radius + 1.0).ceil() as i64;
        let (width, height) = self.image.dimensions();
        for y in y0.max(0)..=y1.min(i64::from(height) - 1) {
            for x in x0.max(0)..=x1.min(i64::from(width) - 1) {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - sample.distance(center)).clamp(0.0, 1.0);
                self.blend(x, y, color, coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if !(from.is_finite() && to.is_finite()) {
            return;
        }
        let delta = to - from;
        let steep = delta.y.abs() > delta.x.abs();
        // (major, minor) axes; walk the major axis one pixel at a time.
        let (mut a, mut b) = if steep {
            (Vec2::new(from.y, from.x), Vec2::new(to.y, to.x))
        } else {
            (from, to)
        };
        if a.x > b.x {
            std::mem::swap(&mut a, &mut b);
        }
        let span = b.x - a.x;
        let gradient = if span > f32::EPSILON { (b.y - a.y) / span } else { 0.0 };
        let thickness = width.max(1.0).round() as i64;
        let intensity = width.min(1.0);

        let start = a.x.floor() as i64;
        let end = b.x.floor() as i64;
        for major in start..=end {
            let minor = a.y + gradient * (major as f32 + 0.5 - a.x) - 0.5;
            let base = minor.floor();
            let frac = minor - base;
            let base = base as i64;
            for offset in 0..=thickness {
                let coverage = if offset == 0 {
                    1.0 - frac
                } else if offset == thickness {
                    frac
                } else {
                    1.0
                };
                let (x, y) = if steep {
                    (base + offset, major)
                } else {
                    (major, base + offset)
                };
                self.blend(x, y, color, coverage * intensity);
            }
        }
    }
}
