//! Pairwise proximity lines between particles.
//!
//! Every unordered pair is visited once, so a frame costs n(n-1)/2 distance
//! checks. With the default 40 particles that is 780 per frame.

use crate::particle::Particle;
use glam::DVec2;

/// A line to draw between particles `a` and `b` (`a < b`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub from: DVec2,
    pub to: DVec2,
    pub alpha: f64,
}

/// Line alpha for two points `distance` apart.
///
/// Falls linearly from `max_opacity` at distance 0 to 0 at `threshold`, and
/// stays 0 beyond it.
pub fn connection_alpha(distance: f64, threshold: f64, max_opacity: f64) -> f64 {
    if threshold <= 0.0 || distance >= threshold {
        return 0.0;
    }
    (1.0 - distance / threshold) * max_opacity
}

/// All pairs strictly closer than `threshold`, in `(a, b)` lexicographic order.
pub fn connections(
    particles: &[Particle],
    threshold: f64,
    max_opacity: f64,
) -> impl Iterator<Item = Connection> + '_ {
    particles.iter().enumerate().flat_map(move |(a, pa)| {
        particles[a + 1..]
            .iter()
            .enumerate()
            .filter_map(move |(offset, pb)| {
                let distance = pa.position.distance(pb.position);
                (distance < threshold).then(|| Connection {
                    a,
                    b: a + 1 + offset,
                    from: pa.position,
                    to: pb.position,
                    alpha: connection_alpha(distance, threshold, max_opacity),
                })
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    const BOUNDS: Size = Size::new(1000.0, 1000.0);

    fn at(x: f64, y: f64) -> Particle {
        Particle::new(DVec2::new(x, y), DVec2::ZERO, 1.0, 0.5, BOUNDS)
    }

    #[test]
    fn alpha_is_max_at_zero_distance() {
        assert!((connection_alpha(0.0, 150.0, 0.12) - 0.12).abs() < 1e-12);
    }

    #[test]
    fn alpha_is_zero_at_threshold() {
        assert_eq!(connection_alpha(150.0, 150.0, 0.12), 0.0);
    }

    #[test]
    fn alpha_at_100_units_is_about_004() {
        let alpha = connection_alpha(100.0, 150.0, 0.12);
        assert!((alpha - 0.04).abs() < 1e-9, "alpha = {alpha}");
    }

    #[test]
    fn alpha_beyond_threshold_is_zero() {
        assert_eq!(connection_alpha(400.0, 150.0, 0.12), 0.0);
    }

    #[test]
    fn two_particles_100_apart_are_connected() {
        let ps = [at(0.0, 0.0), at(100.0, 0.0)];
        let lines: Vec<_> = connections(&ps, 150.0, 0.12).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].a, lines[0].b), (0, 1));
        assert_eq!(lines[0].from, DVec2::new(0.0, 0.0));
        assert_eq!(lines[0].to, DVec2::new(100.0, 0.0));
        assert!((lines[0].alpha - 0.04).abs() < 1e-9);
    }

    #[test]
    fn pair_at_exact_threshold_is_not_drawn() {
        let ps = [at(0.0, 0.0), at(150.0, 0.0)];
        assert_eq!(connections(&ps, 150.0, 0.12).count(), 0);
    }

    #[test]
    fn each_unordered_pair_is_visited_once() {
        let ps: Vec<_> = (0..6).map(|i| at(i as f64, 0.0)).collect();
        let pairs: Vec<_> = connections(&ps, 150.0, 0.12).map(|c| (c.a, c.b)).collect();
        assert_eq!(pairs.len(), 15);
        assert!(pairs.iter().all(|&(a, b)| a < b));
        let mut sorted = pairs.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, pairs);
    }

    #[test]
    fn empty_and_single_particle_sets_have_no_lines() {
        assert_eq!(connections(&[], 150.0, 0.12).count(), 0);
        assert_eq!(connections(&[at(1.0, 1.0)], 150.0, 0.12).count(), 0);
    }

    #[test]
    fn distance_is_euclidean() {
        let ps = [at(0.0, 0.0), at(90.0, 120.0)];
        let line = connections(&ps, 200.0, 1.0).next().unwrap();
        assert!((line.alpha - (1.0 - 150.0 / 200.0)).abs() < 1e-12);
    }
}
