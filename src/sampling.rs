//! Turning a density function into something drawable: rejection-sampled
//! point clouds and planar density grids.

use std::f64::consts::PI;

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::error::Result;
use crate::physics::{
    cartesian_to_spherical, check_charge, check_radius, probability_density,
    spherical_to_cartesian, QuantumNumbers,
};

/// Random probes used to estimate the envelope density.
const ENVELOPE_PROBES: usize = 100;
/// Headroom applied to the probed maximum.
const ENVELOPE_MARGIN: f64 = 1.2;
/// Attempt budget per requested point.
const ATTEMPTS_PER_POINT: usize = 100;
/// Upper bound on the up-front reservation for the output.
const MAX_RESERVED_POINTS: usize = 1 << 16;

/// One accepted sample: Cartesian position in Ångström and |ψ|² there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub density: f64,
}

impl SamplePoint {
    pub fn radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// r uniform in [0, max_radius), direction uniform over the sphere.
fn random_spherical<R: Rng + ?Sized>(rng: &mut R, max_radius: f64) -> (f64, f64, f64) {
    let r = rng.gen::<f64>() * max_radius;
    let theta = (2.0 * rng.gen::<f64>() - 1.0).acos();
    let phi = rng.gen::<f64>() * 2.0 * PI;
    (r, theta, phi)
}

/// Envelope for rejection sampling: the largest density seen over a handful
/// of random probes, plus a 20% margin. Can undershoot sharply peaked orbitals.
pub fn estimate_max_density<R: Rng + ?Sized>(
    qn: QuantumNumbers,
    z: f64,
    max_radius: f64,
    rng: &mut R,
) -> f64 {
    let probed = (0..ENVELOPE_PROBES)
        .map(|_| {
            let (r, theta, phi) = random_spherical(rng, max_radius);
            probability_density(r, theta, phi, qn, z)
        })
        .fold(0.0_f64, f64::max);

    probed * ENVELOPE_MARGIN
}

/// Generate up to `num_points` samples distributed like |ψ|² inside a sphere
/// of `max_radius`.
///
/// Gives up after `100 * num_points` attempts, so sparse configurations return
/// fewer points than asked for. The caller owns the randomness; pass a seeded
/// RNG for reproducible output.
pub fn generate_orbital_samples<R: Rng + ?Sized>(
    qn: QuantumNumbers,
    z: f64,
    num_points: usize,
    max_radius: f64,
    rng: &mut R,
) -> Result<Vec<SamplePoint>> {
    let z = check_charge(z)?;
    let max_radius = check_radius(max_radius)?;

    let max_density = estimate_max_density(qn, z, max_radius, rng);
    debug!(
        "sampling ({}, {}, {}) Z={z}: envelope density {max_density:e}",
        qn.n, qn.l, qn.m_l
    );

    let mut points = Vec::with_capacity(num_points.min(MAX_RESERVED_POINTS));
    let max_attempts = num_points.saturating_mul(ATTEMPTS_PER_POINT);
    let mut attempts = 0;

    while points.len() < num_points && attempts < max_attempts {
        attempts += 1;

        let (r, theta, phi) = random_spherical(rng, max_radius);
        let density = probability_density(r, theta, phi, qn, z);

        if rng.gen::<f64>() * max_density < density {
            let (x, y, zc) = spherical_to_cartesian(r, theta, phi);
            points.push(SamplePoint { x, y, z: zc, density });
        }
    }

    if points.len() < num_points {
        debug!(
            "sampling ({}, {}, {}): accepted {} of {num_points} after {attempts} attempts",
            qn.n,
            qn.l,
            qn.m_l,
            points.len()
        );
    }

    Ok(points)
}

/// [`generate_orbital_samples`] driven by the thread-local RNG.
pub fn generate_random_points(
    qn: QuantumNumbers,
    z: f64,
    num_points: usize,
    max_radius: f64,
) -> Result<Vec<SamplePoint>> {
    generate_orbital_samples(qn, z, num_points, max_radius, &mut rand::thread_rng())
}

/// Plane through the nucleus that a density slice is taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlicePlane {
    #[default]
    Xy,
    Xz,
    Yz,
}

impl SlicePlane {
    pub fn from_query(value: Option<&str>) -> Self {
        match value.unwrap_or("xy").to_lowercase().as_str() {
            "xz" => SlicePlane::Xz,
            "yz" => SlicePlane::Yz,
            _ => SlicePlane::Xy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlicePlane::Xy => "xy",
            SlicePlane::Xz => "xz",
            SlicePlane::Yz => "yz",
        }
    }

    /// Place in-plane coordinates (u, v) in 3D space.
    fn embed(self, u: f64, v: f64) -> (f64, f64, f64) {
        match self {
            SlicePlane::Xy => (u, v, 0.0),
            SlicePlane::Xz => (u, 0.0, v),
            SlicePlane::Yz => (0.0, u, v),
        }
    }
}

/// Square grid of densities over a plane through the nucleus.
///
/// `cells[i][j]` sits at u = -R + i·step, v = -R + j·step, where u and v are
/// the plane's first and second axes and step = 2R / resolution. Cells at or
/// beyond radius R are exactly zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityGrid {
    pub plane: SlicePlane,
    pub resolution: usize,
    pub max_radius: f64,
    pub cells: Vec<Vec<f64>>,
}

impl DensityGrid {
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Coordinate along either plane axis for grid index `i`.
    pub fn axis_coordinate(&self, i: usize) -> f64 {
        -self.max_radius + i as f64 * (2.0 * self.max_radius / self.resolution as f64)
    }

    /// Largest density in the grid, 0 for an empty grid.
    pub fn max_density(&self) -> f64 {
        self.cells
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0_f64, f64::max)
    }
}

/// Density over a `resolution`×`resolution` grid spanning [-R, R)² in `plane`.
pub fn calculate_slice(
    qn: QuantumNumbers,
    z: f64,
    resolution: usize,
    max_radius: f64,
    plane: SlicePlane,
) -> Result<DensityGrid> {
    let z = check_charge(z)?;
    let max_radius = check_radius(max_radius)?;
    let step = 2.0 * max_radius / resolution as f64;

    let cells = (0..resolution)
        .map(|i| {
            let u = -max_radius + i as f64 * step;
            (0..resolution)
                .map(|j| {
                    let v = -max_radius + j as f64 * step;
                    let (x, y, zc) = plane.embed(u, v);
                    let (r, theta, phi) = cartesian_to_spherical(x, y, zc);
                    if r < max_radius {
                        probability_density(r, theta, phi, qn, z)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    Ok(DensityGrid {
        plane,
        resolution,
        max_radius,
        cells,
    })
}

/// Density slice through the z = 0 plane.
pub fn calculate_2d_slice(
    qn: QuantumNumbers,
    z: f64,
    resolution: usize,
    max_radius: f64,
) -> Result<DensityGrid> {
    calculate_slice(qn, z, resolution, max_radius, SlicePlane::Xy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrbitalError;
    use crate::physics::max_radius;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Counts every word drawn from the wrapped generator.
    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    #[test]
    fn test_samples_stay_inside_radius_and_carry_their_density() {
        let qn = QuantumNumbers::new(3, 2, -1).unwrap();
        let r_max = max_radius(3, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let points = generate_orbital_samples(qn, 1.0, 500, r_max, &mut rng).unwrap();

        assert!(!points.is_empty());
        assert!(points.len() <= 500);
        for p in &points {
            assert!(p.radius() <= r_max + 1e-9);
            let (r, theta, phi) = cartesian_to_spherical(p.x, p.y, p.z);
            let recomputed = probability_density(r, theta, phi, qn, 1.0);
            assert_relative_eq!(p.density, recomputed, max_relative = 1e-6, epsilon = 1e-300);
        }
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let qn = QuantumNumbers::new(2, 1, 1).unwrap();
        let a = generate_orbital_samples(qn, 1.0, 200, 10.0, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_orbital_samples(qn, 1.0, 200, 10.0, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_density_orbital_returns_short() {
        // Out-of-range l gives a density of zero everywhere; nothing is ever accepted.
        let qn = QuantumNumbers { n: 1, l: 1, m_l: 0 };
        let mut rng = StdRng::seed_from_u64(1);
        let points = generate_orbital_samples(qn, 1.0, 10, 5.0, &mut rng).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_attempt_budget_is_a_hundred_per_point() {
        // zero density everywhere: every attempt is rejected
        let qn = QuantumNumbers { n: 1, l: 1, m_l: 0 };
        let mut rng = CountingRng {
            inner: StdRng::seed_from_u64(5),
            draws: 0,
        };
        let points = generate_orbital_samples(qn, 1.0, 7, 5.0, &mut rng).unwrap();

        assert!(points.is_empty());
        // 100 probes of 3 draws, then 700 attempts of 3 draws plus the acceptance draw
        assert_eq!(rng.draws, ENVELOPE_PROBES * 3 + 7 * ATTEMPTS_PER_POINT * 4);
        assert_eq!(rng.draws, 3_100);
    }

    #[test]
    fn test_envelope_is_probe_maximum_plus_twenty_percent() {
        let qn = QuantumNumbers::new(2, 1, 0).unwrap();
        let r_max = max_radius(2, 1.0);
        let envelope = estimate_max_density(qn, 1.0, r_max, &mut StdRng::seed_from_u64(31));

        let mut replay = StdRng::seed_from_u64(31);
        let mut probed = 0.0_f64;
        for _ in 0..100 {
            let (r, theta, phi) = random_spherical(&mut replay, r_max);
            probed = probed.max(probability_density(r, theta, phi, qn, 1.0));
        }

        assert!(probed > 0.0);
        assert_eq!(envelope, probed * 1.2);
    }

    #[test]
    fn test_large_request_reserves_a_bounded_buffer() {
        // zero density everywhere, so the result stays empty after the full budget
        let qn = QuantumNumbers { n: 1, l: 1, m_l: 0 };
        let mut rng = StdRng::seed_from_u64(8);
        let points = generate_orbital_samples(qn, 1.0, 1 << 17, 5.0, &mut rng).unwrap();
        assert!(points.is_empty());
        assert!(points.capacity() <= MAX_RESERVED_POINTS);
    }

    #[test]
    fn test_zero_points_requested() {
        let qn = QuantumNumbers::new(1, 0, 0).unwrap();
        let points = generate_random_points(qn, 1.0, 0, 5.0).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_sampler_rejects_bad_parameters() {
        let qn = QuantumNumbers::new(1, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            generate_orbital_samples(qn, 0.0, 10, 5.0, &mut rng),
            Err(OrbitalError::InvalidCharge(0.0))
        );
        assert_eq!(
            generate_orbital_samples(qn, 1.0, 10, -5.0, &mut rng),
            Err(OrbitalError::InvalidRadius(-5.0))
        );
        assert!(generate_orbital_samples(qn, 1.0, 10, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn test_envelope_has_margin_over_probes() {
        let qn = QuantumNumbers::new(1, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let envelope = estimate_max_density(qn, 1.0, 8.0, &mut rng);
        assert!(envelope > 0.0);
        // the 1s density peaks at the nucleus
        assert!(envelope <= probability_density(0.0, 0.0, 0.0, qn, 1.0) * ENVELOPE_MARGIN);
    }

    #[test]
    fn test_slice_shape_and_disk_clipping() {
        let qn = QuantumNumbers::new(2, 0, 0).unwrap();
        let r_max = max_radius(2, 1.0);
        let grid = calculate_2d_slice(qn, 1.0, 40, r_max).unwrap();

        assert_eq!(grid.cells.len(), 40);
        for (i, row) in grid.cells.iter().enumerate() {
            assert_eq!(row.len(), 40);
            for (j, &d) in row.iter().enumerate() {
                assert!(d >= 0.0);
                let x = grid.axis_coordinate(i);
                let y = grid.axis_coordinate(j);
                if (x * x + y * y).sqrt() >= r_max {
                    assert_eq!(d, 0.0);
                }
            }
        }
        // corner cell is well outside the disk
        assert_eq!(grid.get(0, 0), Some(0.0));
        assert_eq!(grid.get(40, 0), None);
    }

    #[test]
    fn test_slice_center_holds_nucleus_density() {
        let qn = QuantumNumbers::new(1, 0, 0).unwrap();
        let grid = calculate_2d_slice(qn, 1.0, 10, 5.0).unwrap();
        // index 5 maps to the origin
        assert_eq!(grid.axis_coordinate(5), 0.0);
        let at_origin = probability_density(0.0, 0.0, 0.0, qn, 1.0);
        assert_relative_eq!(grid.cells[5][5], at_origin, max_relative = 1e-12);
        assert_relative_eq!(grid.max_density(), at_origin, max_relative = 1e-12);
    }

    #[test]
    fn test_plane_selection() {
        assert_eq!(SlicePlane::from_query(None), SlicePlane::Xy);
        assert_eq!(SlicePlane::from_query(Some("XZ")), SlicePlane::Xz);
        assert_eq!(SlicePlane::from_query(Some("yz")), SlicePlane::Yz);
        assert_eq!(SlicePlane::from_query(Some("diagonal")), SlicePlane::Xy);
        assert_eq!(SlicePlane::Yz.as_str(), "yz");
    }

    #[test]
    fn test_empty_grid() {
        let qn = QuantumNumbers::new(1, 0, 0).unwrap();
        let grid = calculate_2d_slice(qn, 1.0, 0, 5.0).unwrap();
        assert!(grid.cells.is_empty());
        assert_eq!(grid.max_density(), 0.0);
    }
}
