use serde::Deserialize;

/// Named unit systems
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitStyle {
    #[default]
    Lj,
    Real,
    Metal,
}

/// Conversion constants needed to turn kinetic sums into temperatures
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Units {
    /// Boltzmann constant in energy per temperature
    pub boltz: f64,
    /// Converts mass * velocity^2 to energy
    pub mvv2e: f64,
}
impl Units {
    pub fn new(style: UnitStyle) -> Self {
        match style {
            UnitStyle::Lj => Self {
                boltz: 1.0,
                mvv2e: 1.0,
            },
            // kcal/mol, g/mol, Angstrom/fs
            UnitStyle::Real => Self {
                boltz: 0.0019872067,
                mvv2e: 48.88821291 * 48.88821291,
            },
            // eV, g/mol, Angstrom/ps
            UnitStyle::Metal => Self {
                boltz: 8.617343e-5,
                mvv2e: 1.0364269e-4,
            },
        }
    }
}
impl Default for Units {
    fn default() -> Self {
        Self::new(UnitStyle::Lj)
    }
}
impl From<UnitStyle> for Units {
    fn from(style: UnitStyle) -> Self {
        Self::new(style)
    }
}
