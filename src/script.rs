use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerPath {
    Idle,
    /// Circle around a point given as fractions of the surface size.
    Orbit { center: Vec2, radius: f32, turns: f32 },
    /// Straight line between two fractional surface points.
    Sweep { from: Vec2, to: Vec2 },
}

impl PointerPath {
    /// Pointer position in surface pixels at `phase` in `[0, 1]`.
    pub fn position(self, phase: f32, size: Vec2) -> Option<Vec2> {
        let phase = phase.clamp(0.0, 1.0);
        match self {
            Self::Idle => None,
            Self::Orbit {
                center,
                radius,
                turns,
            } => {
                let angle = phase * turns * std::f32::consts::TAU;
                let offset = Vec2::new(angle.cos(), angle.sin()) * radius * size.min_element();
                Some(center * size + offset)
            }
            Self::Sweep { from, to } => Some(from.lerp(to, smoothstep(phase)) * size),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptPhase {
    pub label: &'static str,
    pub duration_seconds: f32,
    pub pointer: PointerPath,
    pub scrolls_per_second: f32,
    /// Container size applied when the phase begins.
    pub resize_to: Option<Vec2>,
}

/// Looping sequence of scripted user interactions for headless runs.
#[derive(Debug, Clone)]
pub struct InteractionScript {
    phases: Vec<ScriptPhase>,
    total_duration: f32,
}

impl InteractionScript {
    pub fn new(phases: Vec<ScriptPhase>) -> Self {
        let total_duration = phases.iter().map(|p| p.duration_seconds.max(0.0)).sum();
        Self {
            phases,
            total_duration,
        }
    }

    pub fn showcase() -> Self {
        Self::new(vec![
            ScriptPhase {
                label: "Drift",
                duration_seconds: 2.0,
                pointer: PointerPath::Idle,
                scrolls_per_second: 0.0,
                resize_to: None,
            },
            ScriptPhase {
                label: "Orbit",
                duration_seconds: 3.0,
                pointer: PointerPath::Orbit {
                    center: Vec2::new(0.5, 0.5),
                    radius: 0.25,
                    turns: 1.5,
                },
                scrolls_per_second: 0.0,
                resize_to: None,
            },
            ScriptPhase {
                label: "Scroll burst",
                duration_seconds: 1.5,
                pointer: PointerPath::Sweep {
                    from: Vec2::new(0.1, 0.8),
                    to: Vec2::new(0.9, 0.2),
                },
                scrolls_per_second: 12.0,
                resize_to: None,
            },
            ScriptPhase {
                label: "Compact",
                duration_seconds: 2.5,
                pointer: PointerPath::Idle,
                scrolls_per_second: 2.0,
                resize_to: Some(Vec2::new(420.0, 760.0)),
            },
        ])
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn phases(&self) -> &[ScriptPhase] {
        &self.phases
    }

    pub fn sample(&self, time_seconds: f32) -> Option<ScriptSample> {
        let last = self.phases.len().checked_sub(1)?;
        let mut t = time_seconds.max(0.0);
        let mut cycle = 0u32;
        if self.total_duration > 0.0 {
            cycle = (t / self.total_duration).floor() as u32;
            t %= self.total_duration;
        }

        let mut acc = 0.0;
        for (index, phase) in self.phases.iter().enumerate() {
            let end = acc + phase.duration_seconds.max(0.0);
            if t < end || index == last {
                let local = (t - acc).max(0.0);
                let progress = if phase.duration_seconds <= f32::EPSILON {
                    0.0
                } else {
                    (local / phase.duration_seconds).clamp(0.0, 1.0)
                };
                return Some(ScriptSample {
                    index,
                    cycle,
                    phase: *phase,
                    progress,
                });
            }
            acc = end;
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptSample {
    pub index: usize,
    /// How many times the script has looped.
    pub cycle: u32,
    pub phase: ScriptPhase,
    pub progress: f32,
}

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::{InteractionScript, PointerPath};

    #[test]
    fn total_duration_matches_sum() {
        let script = InteractionScript::showcase();
        let sum: f32 = script.phases().iter().map(|p| p.duration_seconds).sum();
        assert!((sum - script.total_duration()).abs() < 1e-5);
    }

    #[test]
    fn starts_in_first_phase() {
        let script = InteractionScript::showcase();
        let sample = script.sample(0.0).unwrap();
        assert_eq!(sample.index, 0);
        assert_eq!(sample.phase.label, "Drift");
        assert_eq!(sample.cycle, 0);
    }

    #[test]
    fn loops_at_total_duration() {
        let script = InteractionScript::showcase();
        let a = script.sample(2.2).unwrap();
        let b = script.sample(script.total_duration() + 2.2).unwrap();
        assert_eq!(a.index, b.index);
        assert_eq!(b.cycle, 1);
    }

    #[test]
    fn empty_script_has_no_samples() {
        assert!(InteractionScript::new(Vec::new()).sample(1.0).is_none());
    }

    #[test]
    fn sweep_ends_at_target() {
        let path = PointerPath::Sweep {
            from: Vec2::new(0.0, 0.0),
            to: Vec2::new(1.0, 0.5),
        };
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(path.position(0.0, size), Some(Vec2::ZERO));
        assert_eq!(path.position(1.0, size), Some(Vec2::new(800.0, 300.0)));
        assert_eq!(PointerPath::Idle.position(0.5, size), None);
    }

    #[test]
    fn orbit_stays_on_its_circle() {
        let path = PointerPath::Orbit {
            center: Vec2::new(0.5, 0.5),
            radius: 0.25,
            turns: 1.0,
        };
        let size = Vec2::new(800.0, 600.0);
        for step in 0..8 {
            let p = path.position(step as f32 / 8.0, size).unwrap();
            let r = p.distance(Vec2::new(400.0, 300.0));
            assert!((r - 150.0).abs() < 1e-3);
        }
    }
}
