use rand::Rng;

use piece_perfect_core::{CanvasSize, VictoryPayload};

pub(crate) const CONFETTI_COLORS: [&str; 6] = ["#ff0", "#f0f", "#0ff", "#0f0", "#f00", "#00f"];
pub(crate) const CONFETTI_COUNT: usize = 300;
pub(crate) const BURST_COUNT: usize = 30;
pub(crate) const BURSTS: usize = 4;
pub(crate) const BURST_FIRST_MS: f64 = 1500.0;
pub(crate) const BURST_SPACING_MS: f64 = 1200.0;
pub(crate) const REVEAL_DELAY_MS: f64 = 3000.0;
const GRAVITY: f32 = 0.4;
const FADE_PER_FRAME: f32 = 0.01;
const BURST_SIZE_SCALE: f32 = 0.6;

#[derive(Clone, Debug)]
pub(crate) struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vx: f32,
    pub vy: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub color: &'static str,
}

impl Particle {
    fn spawn<R: Rng + ?Sized>(canvas: CanvasSize, size_scale: f32, rng: &mut R) -> Self {
        let color = CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())];
        Self {
            x: rng.random::<f32>() * canvas.width,
            y: rng.random::<f32>() * canvas.height / 2.0,
            size: (rng.random::<f32>() * 6.0 + 4.0) * size_scale,
            vx: (rng.random::<f32>() - 0.5) * 8.0,
            vy: -rng.random::<f32>() * 10.0 - 5.0,
            alpha: 1.0,
            rotation: rng.random::<f32>() * 360.0,
            rotation_speed: (rng.random::<f32>() - 0.5) * 10.0,
            color,
        }
    }

    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.alpha -= FADE_PER_FRAME;
        self.rotation += self.rotation_speed;
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}

/// One big burst at creation, then a few smaller ones on a fixed schedule.
pub(crate) struct ConfettiField {
    canvas: CanvasSize,
    particles: Vec<Particle>,
    pending_bursts: Vec<f64>,
}

impl ConfettiField {
    pub(crate) fn new<R: Rng + ?Sized>(canvas: CanvasSize, now_ms: f64, rng: &mut R) -> Self {
        let particles = (0..CONFETTI_COUNT)
            .map(|_| Particle::spawn(canvas, 1.0, rng))
            .collect();
        let pending_bursts = (0..BURSTS)
            .map(|index| now_ms + BURST_FIRST_MS + index as f64 * BURST_SPACING_MS)
            .collect();
        Self {
            canvas,
            particles,
            pending_bursts,
        }
    }

    pub(crate) fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advances one animation frame and fires any burst that is due.
    pub(crate) fn step<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        let due = self.pending_bursts.iter().filter(|at| **at <= now_ms).count();
        self.pending_bursts.retain(|at| *at > now_ms);
        for _ in 0..due * BURST_COUNT {
            self.particles
                .push(Particle::spawn(self.canvas, BURST_SIZE_SCALE, rng));
        }
        for particle in &mut self.particles {
            particle.step();
        }
        self.particles.retain(Particle::is_alive);
    }

    pub(crate) fn is_active(&self) -> bool {
        !self.particles.is_empty() || !self.pending_bursts.is_empty()
    }
}

pub(crate) struct VictoryScene {
    pub payload: VictoryPayload,
    pub reveal_at: f64,
    pub confetti: ConfettiField,
}

impl VictoryScene {
    pub(crate) fn new<R: Rng + ?Sized>(
        payload: VictoryPayload,
        canvas: CanvasSize,
        now_ms: f64,
        rng: &mut R,
    ) -> Self {
        Self {
            payload,
            reveal_at: now_ms + REVEAL_DELAY_MS,
            confetti: ConfettiField::new(canvas, now_ms, rng),
        }
    }

    pub(crate) fn is_revealed(&self, now_ms: f64) -> bool {
        now_ms >= self.reveal_at
    }
}

/// Five-pointed star, outer points first, as a closed polygon.
pub(crate) fn star_points(cx: f32, cy: f32, size: f32) -> Vec<(f32, f32)> {
    let outer = size / 2.0;
    let inner = outer / 2.5;
    (0..10)
        .map(|index| {
            let radius = if index % 2 == 0 { outer } else { inner };
            let angle = std::f32::consts::PI / 5.0 * index as f32 - std::f32::consts::FRAC_PI_2;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(now: f64) -> (ConfettiField, StdRng) {
        let mut rng = StdRng::seed_from_u64(9);
        let field = ConfettiField::new(CanvasSize::new(800.0, 600.0), now, &mut rng);
        (field, rng)
    }

    #[test]
    fn initial_burst_spawns_upward() {
        let (field, _) = field(0.0);
        assert_eq!(field.particles().len(), CONFETTI_COUNT);
        assert!(field.particles().iter().all(|p| p.vy < 0.0 && p.y <= 300.0));
    }

    #[test]
    fn scheduled_bursts_add_particles() {
        let (mut field, mut rng) = field(0.0);
        field.step(BURST_FIRST_MS, &mut rng);
        assert_eq!(field.particles().len(), CONFETTI_COUNT + BURST_COUNT);
        field.step(BURST_FIRST_MS + 1.0, &mut rng);
        assert_eq!(field.particles().len(), CONFETTI_COUNT + BURST_COUNT);
    }

    #[test]
    fn particles_fade_out() {
        let (mut field, mut rng) = field(0.0);
        let late = BURST_FIRST_MS + BURST_SPACING_MS * BURSTS as f64;
        for _ in 0..101 {
            field.step(late, &mut rng);
        }
        assert!(!field.is_active());
    }

    #[test]
    fn star_alternates_radii() {
        let points = star_points(0.0, 0.0, 60.0);
        assert_eq!(points.len(), 10);
        let (x, y) = points[0];
        assert!(x.abs() < 1e-4 && (y + 30.0).abs() < 1e-4);
        let (ix, iy) = points[1];
        assert!(((ix * ix + iy * iy).sqrt() - 12.0).abs() < 1e-3);
    }
}
