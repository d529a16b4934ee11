use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// A one-electron species the engine can model exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Species {
    pub symbol: &'static str,
    pub name: &'static str,
    pub z: u32,
}

pub const SUPPORTED_SPECIES: [Species; 3] = [
    Species { symbol: "H", name: "Hydrogen (H)", z: 1 },
    Species { symbol: "He+", name: "Helium ion (He⁺)", z: 2 },
    Species { symbol: "Li2+", name: "Lithium ion (Li²⁺)", z: 3 },
];

static SPECIES_BY_SYMBOL: Lazy<HashMap<&'static str, Species>> =
    Lazy::new(|| SUPPORTED_SPECIES.iter().map(|s| (s.symbol, *s)).collect());

pub fn species(symbol: &str) -> Option<Species> {
    SPECIES_BY_SYMBOL.get(symbol).copied()
}

/// Nuclear charge for a species symbol; unknown symbols count as hydrogen.
pub fn atomic_number(symbol: &str) -> u32 {
    species(symbol).map_or(1, |s| s.z)
}

/// Display name for a species symbol; unknown symbols are echoed back.
pub fn atom_name(symbol: &str) -> String {
    species(symbol).map_or_else(|| symbol.to_string(), |s| s.name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_numbers() {
        assert_eq!(atomic_number("H"), 1);
        assert_eq!(atomic_number("He+"), 2);
        assert_eq!(atomic_number("Li2+"), 3);
        assert_eq!(atomic_number("U"), 1);
        assert_eq!(atomic_number(""), 1);
    }

    #[test]
    fn test_atom_names_fall_back_to_symbol() {
        assert_eq!(atom_name("He+"), "Helium ion (He⁺)");
        assert_eq!(atom_name("Be3+"), "Be3+");
    }
}
