use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::{BackdropConfig, EdgePolicy};
use crate::error::Result;
use crate::quality::{DensityBudget, SurfaceClass};
use crate::surface::Canvas;
use crate::theme::Palette;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Resting velocity the particle relaxes back toward.
    pub base_velocity: Vec2,
    pub radius: f32,
    /// Pseudo-depth in `[0, 1)`; only affects drawing.
    pub depth: f32,
    pub depth_velocity: f32,
}

impl Particle {
    pub fn at_rest(position: Vec2, base_velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: base_velocity,
            base_velocity,
            radius,
            depth: 0.0,
            depth_velocity: 0.0,
        }
    }

    fn repel(&mut self, pointer: Vec2, radius: f32, strength: f32) {
        let away = self.position - pointer;
        let distance = away.length();
        // Zero distance has no direction to push along.
        if distance > 0.0 && distance < radius {
            let falloff = (radius - distance) / radius;
            self.velocity += away / distance * falloff * strength;
        }
    }

    fn apply_edge(&mut self, bounds: Vec2, margin: f32, policy: EdgePolicy) {
        for axis in 0..2 {
            let low = -margin;
            let high = bounds[axis] + margin;
            let p = self.position[axis];
            match policy {
                EdgePolicy::Reflect => {
                    if p < low {
                        self.position[axis] = low;
                        self.velocity[axis] = self.velocity[axis].abs();
                        self.base_velocity[axis] = self.base_velocity[axis].abs();
                    } else if p > high {
                        self.position[axis] = high;
                        self.velocity[axis] = -self.velocity[axis].abs();
                        self.base_velocity[axis] = -self.base_velocity[axis].abs();
                    }
                }
                EdgePolicy::Wrap => {
                    let span = high - low;
                    if p < low || p > high {
                        self.position[axis] = low + (p - low).rem_euclid(span);
                    }
                }
            }
        }
    }

    fn relax(&mut self, damping: f32) {
        self.velocity += (self.base_velocity - self.velocity) * damping;
    }

    fn drift_depth(&mut self) {
        self.depth = (self.depth + self.depth_velocity).rem_euclid(1.0);
    }
}

#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
    class: SurfaceClass,
    budget: DensityBudget,
    config: BackdropConfig,
    rng: ChaCha8Rng,
}

impl ParticleField {
    /// Validate `config` and spawn the initial particle set.
    pub fn new(width: f32, height: f32, config: BackdropConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let class = SurfaceClass::classify(width, &config.field);
        let mut field = Self {
            particles: Vec::new(),
            bounds: Vec2::ZERO,
            class,
            budget: class.budget(&config.field),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        field.reinit(width, height);
        Ok(field)
    }

    /// Discard every particle and respawn for a surface of the given size.
    pub fn reinit(&mut self, width: f32, height: f32) {
        self.class = SurfaceClass::classify(width, &self.config.field);
        self.budget = self.class.budget(&self.config.field);
        let count = self.budget.particle_count(width, height);
        self.bounds = if count == 0 {
            Vec2::ZERO
        } else {
            Vec2::new(width, height)
        };

        let spawn = self.config.spawn;
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let position = Vec2::new(
                self.rng.random_range(0.0..width),
                self.rng.random_range(0.0..height),
            );
            let base_velocity = Vec2::new(
                self.rng.random_range(-spawn.base_speed..=spawn.base_speed),
                self.rng.random_range(-spawn.base_speed..=spawn.base_speed),
            );
            let radius = self.rng.random_range(spawn.min_radius..=spawn.max_radius);
            let mut particle = Particle::at_rest(position, base_velocity, radius);
            particle.depth = self.rng.random_range(0.0..1.0);
            particle.depth_velocity = self.rng.random_range(-spawn.depth_speed..=spawn.depth_speed);
            self.particles.push(particle);
        }

        debug!(
            "particle field reinit: {}x{} {:?} divisor={} -> {} particles",
            width, height, self.class, self.budget.density_divisor, count
        );
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[doc(hidden)]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn class(&self) -> SurfaceClass {
        self.class
    }

    pub fn connect_distance(&self) -> f32 {
        self.budget.connect_distance
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Advance every particle by one frame.
    pub fn update(&mut self, pointer: Option<Vec2>, boost: f32) {
        let force = self.config.force;
        let field = self.config.field;
        for particle in &mut self.particles {
            if let Some(pointer) = pointer {
                particle.repel(pointer, force.repulsion_radius, force.repulsion_strength);
            }
            particle.position += particle.velocity * boost;
            particle.apply_edge(self.bounds, field.edge_margin, field.edge_policy);
            particle.relax(force.damping);
            particle.drift_depth();
        }
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C, palette: &Palette) {
        let perspective = self.config.field.perspective;
        let opacity = self.config.link.particle_opacity;
        for particle in &self.particles {
            let (radius, alpha) = if perspective {
                (particle.radius * (1.0 + particle.depth), 0.4 + particle.depth * 0.5)
            } else {
                (particle.radius, opacity)
            };
            canvas.fill_circle(particle.position, radius, palette.particle.with_alpha(alpha));
        }
    }

    pub fn connect<C: Canvas>(&self, canvas: &mut C, palette: &Palette) {
        let link = self.config.link;
        for (a, b, closeness) in self.links() {
            canvas.stroke_line(
                self.particles[a].position,
                self.particles[b].position,
                link.line_width,
                palette.line.with_alpha(closeness * link.line_opacity),
            );
        }
    }

    /// Unordered pairs `(a, b, 1 - d/T)` closer than the connection distance `T`.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let threshold = self.budget.connect_distance;
        let particles = &self.particles;
        (0..particles.len()).flat_map(move |a| {
            (a + 1..particles.len()).filter_map(move |b| {
                let distance = particles[a].position.distance(particles[b].position);
                (distance < threshold).then(|| (a, b, 1.0 - distance / threshold))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::{Particle, ParticleField};
    use crate::particles::{BackdropConfig, EdgePolicy, ParticleFieldConfig};
    use crate::surface::{Canvas, DisplayList, DrawCommand};
    use crate::theme::Theme;

    fn uniform_config(seed: u64) -> BackdropConfig {
        BackdropConfig {
            field: ParticleFieldConfig::uniform(14_000.0, 220.0),
            seed: Some(seed),
            ..BackdropConfig::default()
        }
    }

    fn lone_particle(config: BackdropConfig, particle: Particle) -> ParticleField {
        let mut field = ParticleField::new(800.0, 600.0, config).unwrap();
        field.particles.clear();
        field.particles.push(particle);
        field
    }

    #[test]
    fn count_follows_area() {
        let field = ParticleField::new(800.0, 600.0, uniform_config(1)).unwrap();
        assert_eq!(field.len(), 34);
    }

    #[test]
    fn spawned_particles_start_at_rest_inside_surface() {
        let field = ParticleField::new(800.0, 600.0, uniform_config(2)).unwrap();
        let spawn = field.config().spawn;
        for p in field.particles() {
            assert!((0.0..800.0).contains(&p.position.x));
            assert!((0.0..600.0).contains(&p.position.y));
            assert_eq!(p.velocity, p.base_velocity);
            assert!(p.base_velocity.x.abs() <= spawn.base_speed);
            assert!(p.base_velocity.y.abs() <= spawn.base_speed);
            assert!(p.radius >= spawn.min_radius && p.radius <= spawn.max_radius);
        }
    }

    #[test]
    fn compact_surface_uses_compact_budget() {
        let config = BackdropConfig {
            seed: Some(3),
            ..BackdropConfig::default()
        };
        let field = ParticleField::new(400.0, 700.0, config).unwrap();
        assert_eq!(field.len(), 10);
        assert_eq!(field.connect_distance(), 150.0);
    }

    #[test]
    fn resize_discards_all_prior_particles() {
        let mut field = ParticleField::new(800.0, 600.0, uniform_config(4)).unwrap();
        let before: Vec<Particle> = field.particles().to_vec();
        assert_eq!(before.len(), 34);
        field.reinit(400.0, 300.0);
        assert_eq!(field.len(), 8);
        for p in field.particles() {
            assert!(!before.contains(p));
            assert!(p.position.x < 400.0 && p.position.y < 300.0);
        }
    }

    #[test]
    fn same_seed_spawns_same_field() {
        let a = ParticleField::new(800.0, 600.0, uniform_config(9)).unwrap();
        let b = ParticleField::new(800.0, 600.0, uniform_config(9)).unwrap();
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn zero_area_is_a_no_op() {
        let mut field = ParticleField::new(0.0, 600.0, uniform_config(5)).unwrap();
        assert!(field.is_empty());
        field.update(Some(Vec2::ZERO), 4.0);
        let mut list = DisplayList::new(0, 600);
        field.draw(&mut list, &Theme::Light.palette());
        field.connect(&mut list, &Theme::Light.palette());
        assert!(list.commands().is_empty());
    }

    #[test]
    fn pointer_on_particle_does_not_produce_nan() {
        let particle = Particle::at_rest(Vec2::new(100.0, 100.0), Vec2::new(0.1, -0.1), 1.5);
        let mut field = lone_particle(uniform_config(6), particle);
        field.update(Some(Vec2::new(100.0, 100.0)), 1.0);
        let p = field.particles()[0];
        assert!(p.position.is_finite());
        assert!(p.velocity.is_finite());
        assert_eq!(p.velocity, Vec2::new(0.1, -0.1));
    }

    #[test]
    fn pointer_pushes_nearby_particle_away() {
        let particle = Particle::at_rest(Vec2::new(400.0, 300.0), Vec2::ZERO, 1.5);
        let mut field = lone_particle(uniform_config(7), particle);
        field.update(Some(Vec2::new(350.0, 300.0)), 1.0);
        let p = field.particles()[0];
        // (150 - 50) / 150 * 1.5 = 1.0, then damped by 2%.
        assert!(p.position.x > 400.0);
        assert!((p.velocity.x - 0.98).abs() < 1e-5);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn pointer_outside_radius_has_no_effect() {
        let particle = Particle::at_rest(Vec2::new(400.0, 300.0), Vec2::ZERO, 1.5);
        let mut field = lone_particle(uniform_config(8), particle);
        field.update(Some(Vec2::new(400.0, 150.0)), 1.0);
        assert_eq!(field.particles()[0].velocity, Vec2::ZERO);
        field.update(None, 1.0);
        assert_eq!(field.particles()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn boost_scales_displacement() {
        let particle = Particle::at_rest(Vec2::new(400.0, 300.0), Vec2::new(0.1, 0.0), 1.5);
        let mut field = lone_particle(uniform_config(10), particle);
        field.update(None, 3.0);
        assert!((field.particles()[0].position.x - 400.3).abs() < 1e-4);
    }

    #[test]
    fn reflect_turns_particle_back_inside_margin() {
        let particle = Particle::at_rest(Vec2::new(849.0, 300.0), Vec2::new(5.0, 0.0), 1.5);
        let mut field = lone_particle(uniform_config(11), particle);
        field.update(None, 1.0);
        let p = field.particles()[0];
        assert_eq!(p.position.x, 850.0);
        assert!(p.velocity.x < 0.0);
        assert!(p.base_velocity.x < 0.0);
    }

    #[test]
    fn wrap_moves_particle_to_opposite_edge() {
        let mut config = uniform_config(12);
        config.field.edge_policy = EdgePolicy::Wrap;
        let particle = Particle::at_rest(Vec2::new(400.0, -49.0), Vec2::new(0.0, -2.0), 1.5);
        let mut field = lone_particle(config, particle);
        field.update(None, 1.0);
        let p = field.particles()[0];
        assert!((p.position.y - 649.0).abs() < 1e-3);
        assert!(p.velocity.y < 0.0);
    }

    #[test]
    fn connect_draws_only_close_pairs() {
        let mut field = ParticleField::new(800.0, 600.0, uniform_config(13)).unwrap();
        field.particles.clear();
        field.particles.extend([
            Particle::at_rest(Vec2::new(0.0, 0.0), Vec2::ZERO, 1.0),
            Particle::at_rest(Vec2::new(110.0, 0.0), Vec2::ZERO, 1.0),
            Particle::at_rest(Vec2::new(330.0, 0.0), Vec2::ZERO, 1.0),
        ]);
        let mut list = DisplayList::new(800, 600);
        field.connect(&mut list, &Theme::Dark.palette());
        let lines: Vec<_> = list.lines().collect();
        // 0-1 at 110, 1-2 at exactly 220 (not strictly less), 0-2 at 330.
        assert_eq!(lines.len(), 1);
        match lines[0] {
            DrawCommand::Line { from, to, color, .. } => {
                assert_eq!(*from, Vec2::new(0.0, 0.0));
                assert_eq!(*to, Vec2::new(110.0, 0.0));
                assert!((color.alpha - 0.15).abs() < 1e-5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn draw_emits_one_circle_per_particle() {
        let field = ParticleField::new(800.0, 600.0, uniform_config(14)).unwrap();
        let mut list = DisplayList::new(800, 600);
        field.draw(&mut list, &Theme::Light.palette());
        assert_eq!(list.circles().count(), field.len());
        assert_eq!(list.size(), (800, 600));
    }

    #[test]
    fn perspective_scales_radius_and_opacity_with_depth() {
        let mut config = uniform_config(15);
        config.field.perspective = true;
        let mut particle = Particle::at_rest(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0);
        particle.depth = 0.5;
        let field = lone_particle(config, particle);
        let mut list = DisplayList::new(800, 600);
        field.draw(&mut list, &Theme::Light.palette());
        match list.commands()[0] {
            DrawCommand::Circle { radius, color, .. } => {
                assert_eq!(radius, 3.0);
                assert!((color.alpha - 0.65).abs() < 1e-6);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn invalid_spawn_ranges_are_rejected() {
        let mut config = uniform_config(16);
        config.spawn.base_speed = -0.1;
        assert!(ParticleField::new(800.0, 600.0, config).is_err());

        let mut config = uniform_config(17);
        config.spawn.min_radius = 3.0;
        config.spawn.max_radius = 1.0;
        assert!(ParticleField::new(800.0, 600.0, config).is_err());
    }

    #[test]
    fn particle_is_plain_old_data() {
        let particles = [Particle::at_rest(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), 5.0)];
        let floats: &[f32] = bytemuck::cast_slice(&particles);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 3.0, 4.0, 5.0, 0.0, 0.0]);
    }
}
