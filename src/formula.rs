//! Orbital labels and LaTeX formula templates for display.

use serde::Serialize;

const ORBITAL_LABELS: [&str; 6] = ["s", "p", "d", "f", "g", "h"];

/// Spectroscopic letter for l, "?" past h.
pub fn orbital_letter(l: u32) -> &'static str {
    ORBITAL_LABELS.get(l as usize).copied().unwrap_or("?")
}

/// "3p", "2s", ...
pub fn orbital_name(n: u32, l: u32) -> String {
    format!("{n}{}", orbital_letter(l))
}

/// LaTeX source for the wavefunction and its two factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WavefunctionFormula {
    pub full: String,
    pub radial: String,
    pub angular: String,
}

// Symbolic in Z, a0, n and l whatever the concrete values are.
const RADIAL_BODY: &str = concat!(
    r"\sqrt{\left(\frac{2Z}{na_0}\right)^3 \frac{(n-l-1)!}{2n(n+l)!}}",
    r" \left(\frac{2Zr}{na_0}\right)^l e^{-Zr/(na_0)} L_{n-l-1}^{2l+1}\left(\frac{2Zr}{na_0}\right)",
);

const ANGULAR_BODY: &str =
    r"\sqrt{\frac{2l+1}{4\pi}\frac{(l-|m|)!}{(l+|m|)!}} P_l^{|m|}(\cos\theta) e^{im\phi}";

pub fn wavefunction_formula(n: u32, l: u32, m: i32) -> WavefunctionFormula {
    let full = format!(
        r"\psi_{{{n},{l},{m}}}(r, \theta, \phi) = R_{{{n},{l}}}(r) \cdot Y_{{{l}}}^{{{m}}}(\theta, \phi)"
    );
    let radial = format!(r"R_{{{n},{l}}}(r) = {RADIAL_BODY}");
    let angular = format!(r"Y_{{{l}}}^{{{m}}}(\theta, \phi) = {ANGULAR_BODY}");

    WavefunctionFormula {
        full,
        radial,
        angular,
    }
}
