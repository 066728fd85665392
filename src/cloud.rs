//! Particle cloud driven by coherent noise and audio-derived modulation.

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::params::CloudPhysics;
use crate::spectrum::Modulation;

/// One cloud particle
///
/// The two phase offsets only ever increase; the position is re-derived from
/// them every tick. A particle's index in the cloud is its identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Noise phase for the x axis
    pub tx: f32,

    /// Noise phase for the y axis
    pub ty: f32,

    /// Derived position, centered on the origin (world units)
    pub position: Vec2,
}

/// Particle cloud simulation
///
/// Owns all particle state; the renderer only reads positions and links.
pub struct CloudSystem {
    particles: Vec<Particle>,
    perlin: Perlin,
    physics: CloudPhysics,
    last_time_s: f32,
}

impl CloudSystem {
    /// Create a cloud with seeded phase offsets
    ///
    /// Equal seeds produce identical position sequences across runs.
    pub fn new(physics: CloudPhysics) -> Self {
        let mut rng = StdRng::seed_from_u64(physics.phase_seed);
        let particles = (0..physics.particle_count)
            .map(|_| Particle {
                tx: rng.gen_range(0.0..physics.phase_range),
                ty: rng.gen_range(0.0..physics.phase_range),
                position: Vec2::ZERO,
            })
            .collect();

        Self {
            particles,
            perlin: Perlin::new(physics.noise_seed),
            physics,
            last_time_s: 0.0,
        }
    }

    /// Advance the cloud to elapsed time `time_s`
    ///
    /// The step is clamped to `max_step_s`, so a stalled frame nudges the
    /// phases instead of teleporting every particle. Both phase offsets
    /// advance by the same amount per tick; positions are continuous in time
    /// as long as the step stays bounded.
    ///
    /// A non-finite timestamp is rejected before any particle mutates.
    pub fn update(&mut self, time_s: f32, modulation: &Modulation) -> Result<(), String> {
        if !time_s.is_finite() {
            return Err(format!("non-finite timestamp: {}", time_s));
        }

        let dt = (time_s - self.last_time_s).clamp(0.0, self.physics.max_step_s);
        self.last_time_s = time_s;

        let step = modulation.velocity * dt;
        let perlin = &self.perlin;

        for particle in &mut self.particles {
            particle.tx += step;
            particle.ty += step;

            particle.position.x = signed_noise(perlin, particle.tx) * modulation.radius;
            particle.position.y = signed_noise(perlin, particle.ty) * modulation.radius;
        }

        Ok(())
    }

    /// Current particles (index = identity)
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Line segments joining every particle pair closer than the link distance
    pub fn links(&self) -> Vec<(Vec2, Vec2)> {
        let positions: Vec<Vec2> = self.particles.iter().map(|p| p.position).collect();

        link_pairs(&positions, self.physics.link_distance)
            .into_iter()
            .map(|(j, k)| (positions[j], positions[k]))
            .collect()
    }

    /// Restore the initial seeded phases and restart the clock
    pub fn reset(&mut self) {
        *self = Self::new(self.physics.clone());
    }
}

/// Sample signed coherent noise at a scalar phase, in [-1, 1]
fn signed_noise(perlin: &Perlin, phase: f32) -> f32 {
    perlin.get([phase as f64, 0.0]) as f32
}

/// Indices of all unordered position pairs strictly closer than `max_distance`
///
/// A pair at exactly `max_distance` is not linked. O(n²) scan, recomputed
/// per frame; fine at n=300, a spatial hash would be the next step if the
/// count grows.
pub fn link_pairs(positions: &[Vec2], max_distance: f32) -> Vec<(usize, usize)> {
    let max_sq = max_distance * max_distance;
    let mut pairs = Vec::new();

    for j in 0..positions.len() {
        for k in (j + 1)..positions.len() {
            if positions[j].distance_squared(positions[k]) < max_sq {
                pairs.push((j, k));
            }
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_physics() -> CloudPhysics {
        CloudPhysics {
            particle_count: 8,
            ..CloudPhysics::default()
        }
    }

    fn quiet() -> Modulation {
        Modulation {
            radius: 500.0,
            velocity: 0.2,
        }
    }

    #[test]
    fn test_zero_step_is_idempotent() {
        let mut cloud = CloudSystem::new(small_physics());
        let modulation = quiet();

        cloud.update(1.0, &modulation).unwrap();
        let before: Vec<Particle> = cloud.particles().to_vec();

        // Same timestamp again: dt = 0, nothing moves
        cloud.update(1.0, &modulation).unwrap();
        assert_eq!(cloud.particles(), &before[..]);
    }

    #[test]
    fn test_equal_seeds_replay_identically() {
        let mut a = CloudSystem::new(small_physics());
        let mut b = CloudSystem::new(small_physics());
        let modulation = quiet();

        for tick in 1..=20 {
            let t = tick as f32 * 0.05;
            a.update(t, &modulation).unwrap();
            b.update(t, &modulation).unwrap();
        }

        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_stalled_frame_is_capped() {
        let mut stalled = CloudSystem::new(small_physics());
        let mut steady = CloudSystem::new(small_physics());
        let modulation = quiet();

        stalled.update(0.05, &modulation).unwrap();
        steady.update(0.05, &modulation).unwrap();

        // Both stalls exceed the cap, so both advance by exactly one 0.1s step
        stalled.update(100.0, &modulation).unwrap();
        steady.update(5.0, &modulation).unwrap();

        assert_eq!(stalled.particles(), steady.particles());
    }

    #[test]
    fn test_positions_bounded_by_radius() {
        let mut cloud = CloudSystem::new(CloudPhysics {
            particle_count: 64,
            ..CloudPhysics::default()
        });
        let modulation = quiet();

        for tick in 1..=50 {
            cloud.update(tick as f32 * 0.03, &modulation).unwrap();
            for particle in cloud.particles() {
                assert!(particle.position.x.abs() <= modulation.radius + 1e-3);
                assert!(particle.position.y.abs() <= modulation.radius + 1e-3);
            }
        }
    }

    #[test]
    fn test_non_finite_time_rejected_without_mutation() {
        let mut cloud = CloudSystem::new(small_physics());
        let modulation = quiet();
        cloud.update(0.5, &modulation).unwrap();

        let before: Vec<Particle> = cloud.particles().to_vec();
        assert!(cloud.update(f32::NAN, &modulation).is_err());
        assert!(cloud.update(f32::INFINITY, &modulation).is_err());
        assert_eq!(cloud.particles(), &before[..]);

        // The clock was not advanced by the rejected updates either
        cloud.update(0.5, &modulation).unwrap();
        assert_eq!(cloud.particles(), &before[..]);
    }

    #[test]
    fn test_reset_restores_seeded_state() {
        let mut cloud = CloudSystem::new(small_physics());
        let fresh = CloudSystem::new(small_physics());
        let modulation = quiet();

        for tick in 1..=10 {
            cloud.update(tick as f32 * 0.1, &modulation).unwrap();
        }
        cloud.reset();

        assert_eq!(cloud.particles(), fresh.particles());
    }

    #[test]
    fn test_link_threshold_is_strict() {
        let at_threshold = [Vec2::new(0.0, 0.0), Vec2::new(80.0, 0.0)];
        assert!(link_pairs(&at_threshold, 80.0).is_empty());

        let just_inside = [Vec2::new(0.0, 0.0), Vec2::new(79.999, 0.0)];
        assert_eq!(link_pairs(&just_inside, 80.0), vec![(0, 1)]);
    }

    #[test]
    fn test_link_pairs_counts_unordered_pairs() {
        // Three mutually close points: all three unordered pairs, each once
        let cluster = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert_eq!(link_pairs(&cluster, 80.0), vec![(0, 1), (0, 2), (1, 2)]);

        // A far-away straggler links to nothing
        let spread = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(500.0, 0.0)];
        assert_eq!(link_pairs(&spread, 80.0), vec![(0, 1)]);
    }
}
