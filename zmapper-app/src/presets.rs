//! Built-in formulas offered by the preset dropdown.

use zmapper_core::GridSpec;

/// Input grid a preset wants while it is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PresetGrid {
    /// Keep whatever grid the user has.
    Current,
    /// Switch to [`GridSpec::zeta`] until another preset is chosen.
    Zeta,
}

impl PresetGrid {
    pub(crate) fn spec(self) -> Option<GridSpec> {
        match self {
            Self::Current => None,
            Self::Zeta => Some(GridSpec::zeta()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Preset {
    pub(crate) name: &'static str,
    pub(crate) formula: &'static str,
    pub(crate) grid: PresetGrid,
}

const fn preset(name: &'static str, formula: &'static str) -> Preset {
    Preset {
        name,
        formula,
        grid: PresetGrid::Current,
    }
}

pub(crate) const PRESETS: &[Preset] = &[
    preset("Identity", "z"),
    preset("Sine", "a*sin(w*z)"),
    preset("Cosine", "a*cos(w*z)"),
    preset("Exponential", "a*exp(w*z)"),
    preset("Error function", "a*erf(w*z)"),
    preset("Gaussian", "a*exp(-z**2/(2*(sigma)**2))/2"),
    preset("Sinc", "a*sinc(w*(6.5)*z)/2"),
    preset("Inverse z", "w/(z - a)"),
    Preset {
        name: "Riemann zeta",
        formula: "zeta(k*(z - w))",
        grid: PresetGrid::Zeta,
    },
    preset("Inverse z squared", "1/(w*(z-a))**2"),
];

/// Index of the preset whose formula is exactly `source`.
pub(crate) fn find_by_formula(source: &str) -> Option<usize> {
    let source = source.trim();
    PRESETS.iter().position(|p| p.formula == source)
}
