//! Hydrogen-like atom wavefunctions.
//! Closed-form solutions of the Schrödinger equation for a single electron
//! around a nucleus of charge Z. Distances are in Ångström.

use std::f64::consts::{PI, SQRT_2};

use crate::error::{OrbitalError, Result};

/// Bohr radius a₀ in Ångström.
pub const BOHR_RADIUS: f64 = 0.529177;

/// Represents quantum numbers (n, l, m_l)
/// n: Principal quantum number (1, 2, 3, ...)
/// l: Azimuthal quantum number (0 to n-1)
/// m_l: Magnetic quantum number (-l to l)
///
/// Fields are public so out-of-range triples can still be fed to the raw
/// density functions, which give well-defined (if meaningless) numbers for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantumNumbers {
    pub n: u32,
    pub l: u32,
    pub m_l: i32,
}

impl QuantumNumbers {
    pub fn new(n: u32, l: u32, m_l: i32) -> Result<Self> {
        if n == 0 || l >= n || m_l.unsigned_abs() > l {
            return Err(OrbitalError::InvalidQuantumNumbers { n, l, m: m_l });
        }
        Ok(QuantumNumbers { n, l, m_l })
    }

    /// Coerce a user selection into range: n is raised to 1, an l that no
    /// longer fits under n resets to 0, and so does an m that no longer fits under l.
    pub fn clamped(n: u32, l: u32, m_l: i32) -> Self {
        let n = n.max(1);
        let l = if l < n { l } else { 0 };
        let m_l = if m_l.unsigned_abs() <= l { m_l } else { 0 };
        QuantumNumbers { n, l, m_l }
    }
}

pub(crate) fn check_charge(z: f64) -> Result<f64> {
    if z.is_finite() && z > 0.0 {
        Ok(z)
    } else {
        Err(OrbitalError::InvalidCharge(z))
    }
}

pub(crate) fn check_radius(max_radius: f64) -> Result<f64> {
    if max_radius.is_finite() && max_radius > 0.0 {
        Ok(max_radius)
    } else {
        Err(OrbitalError::InvalidRadius(max_radius))
    }
}

/// n! as an integer-valued float.
///
/// The argument is unsigned, so the negative-input case cannot be expressed.
/// Values are exact up to 22!; beyond that they carry f64 rounding, and
/// past 170! they overflow to infinity.
pub fn factorial(n: u32) -> f64 {
    if n > 170 {
        return f64::INFINITY;
    }
    (2..=n).map(|k| k as f64).product()
}

/// lo! / hi! for lo <= hi, as the product 1 / ((lo+1)(lo+2)...hi).
/// Stays finite where the two factorials would both overflow.
fn factorial_ratio(lo: u64, hi: u64) -> f64 {
    let mut product = 1.0_f64;
    for k in (lo + 1)..=hi {
        product *= k as f64;
        if product.is_infinite() {
            return 0.0;
        }
    }
    1.0 / product
}

/// Associated Legendre polynomial P_l^m(x).
///
/// Computed for |m| from the closed form of P_m^m and the upward recurrence
/// in degree. Negative orders reuse P_l^|m| and flip the sign when |m| is odd;
/// no factorial ratio is applied. The spherical harmonics below depend on
/// exactly this convention. Returns 0 when |m| > l.
pub fn associated_legendre(x: f64, l: u32, m: i32) -> f64 {
    let m_abs = m.unsigned_abs();
    if m_abs > l {
        return 0.0;
    }
    let sign = if m < 0 && m_abs % 2 == 1 { -1.0 } else { 1.0 };

    // P_m^m(x) = (-1)^m (2m-1)!! (1-x^2)^(m/2)
    let mut pmm = 1.0;
    if m_abs > 0 {
        // (1-x)(1+x) keeps precision near x = ±1
        let somx2 = ((1.0 - x) * (1.0 + x)).max(0.0).sqrt();
        let mut odd = 1.0;
        for _ in 0..m_abs {
            pmm *= -odd * somx2;
            odd += 2.0;
        }
    }
    if l == m_abs {
        return sign * pmm;
    }

    // P_{m+1}^m(x) = x (2m+1) P_m^m(x)
    let mut pmmp1 = x * (2.0 * m_abs as f64 + 1.0) * pmm;
    if l - m_abs == 1 {
        return sign * pmmp1;
    }

    let m_f = m_abs as f64;
    for ll in (m_abs + 2)..=l {
        let ll_f = ll as f64;
        let pll = (x * (2.0 * ll_f - 1.0) * pmmp1 - (ll_f + m_f - 1.0) * pmm) / (ll_f - m_f);
        pmm = pmmp1;
        pmmp1 = pll;
    }

    sign * pmmp1
}

/// Real (tesseral) spherical harmonic.
/// m > 0 -> √2 cos(mφ) lobe, m < 0 -> √2 sin(|m|φ) lobe, m = 0 -> Y_l0.
/// Returns 0 when |m| > l.
pub fn spherical_harmonic(theta: f64, phi: f64, l: u32, m_l: i32) -> f64 {
    let m_abs = m_l.unsigned_abs();
    if m_abs > l {
        return 0.0;
    }

    let (l_w, m_w) = (u64::from(l), u64::from(m_abs));
    let norm = ((2.0 * l as f64 + 1.0) / (4.0 * PI) * factorial_ratio(l_w - m_w, l_w + m_w)).sqrt();
    let legendre = associated_legendre(theta.cos(), l, m_abs as i32);
    let phase = m_abs as f64 * phi;

    match m_l.signum() {
        1 => norm * legendre * SQRT_2 * phase.cos(),
        -1 => norm * legendre * SQRT_2 * phase.sin(),
        _ => norm * legendre,
    }
}

/// Generalized Laguerre polynomial L_n^k(x)
pub fn generalized_laguerre(x: f64, n: u32, k: f64) -> f64 {
    if n == 0 {
        return 1.0;
    }

    let mut l0 = 1.0;
    let mut l1 = 1.0 + k - x;

    if n == 1 {
        return l1;
    }

    for i in 2..=n {
        let i_f = i as f64;
        let l_new = ((2.0 * i_f - 1.0 + k - x) * l1 - (i_f - 1.0 + k) * l0) / i_f;
        l0 = l1;
        l1 = l_new;
    }

    l1
}

/// Radial wavefunction R_nl(r) for a hydrogen-like atom of nuclear charge `z`.
///
/// Returns 0 at the nucleus for l > 0, and 0 for any (n, l) with l >= n.
pub fn radial_wavefunction(r: f64, n: u32, l: u32, z: f64) -> f64 {
    let Some(degree) = n.checked_sub(l).and_then(|d| d.checked_sub(1)) else {
        return 0.0;
    };

    let n_f = n as f64;
    let scale = 2.0 * z / (n_f * BOHR_RADIUS);
    let rho = scale * r;

    // sqrt((2Z / (n a0))^3 (n-l-1)! / (2n (n+l)!))
    let ratio = factorial_ratio(u64::from(degree), u64::from(n) + u64::from(l));
    let norm = (scale.powi(3) * ratio / (2.0 * n_f)).sqrt();

    let poly = generalized_laguerre(rho, degree, 2.0 * l as f64 + 1.0);

    norm * rho.powf(l as f64) * (-rho / 2.0).exp() * poly
}

/// Probability density |ψ|² = (R_nl(r) Y_lm(θ, φ))².
/// Proportional to the probability density; not checked for unit norm.
pub fn probability_density(r: f64, theta: f64, phi: f64, qn: QuantumNumbers, z: f64) -> f64 {
    let radial = radial_wavefunction(r, qn.n, qn.l, z);
    if radial == 0.0 {
        return 0.0;
    }
    let angular = spherical_harmonic(theta, phi, qn.l, qn.m_l);

    let wavefunction = radial * angular;
    wavefunction * wavefunction
}

/// Radius that comfortably encloses the orbital: 15 n² a₀ / Z.
pub fn max_radius(n: u32, z: f64) -> f64 {
    (n as f64).powi(2) * BOHR_RADIUS * 15.0 / z
}

/// (x, y, z) -> (r, θ, φ). θ is 0 at the origin.
pub fn cartesian_to_spherical(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let r = (x * x + y * y + z * z).sqrt();
    let theta = if r > 0.0 { (z / r).clamp(-1.0, 1.0).acos() } else { 0.0 };
    let phi = y.atan2(x);
    (r, theta, phi)
}

pub fn spherical_to_cartesian(r: f64, theta: f64, phi: f64) -> (f64, f64, f64) {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    (r * sin_t * cos_p, r * sin_t * sin_p, r * cos_t)
}
