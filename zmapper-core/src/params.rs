use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compile::ParamValues;
use crate::complex::Complex;
use crate::error::CoreError;
use crate::formula::Formula;

/// Range and resolution of one slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    /// Number of selectable positions, both ends included.
    pub ticks: u32,
}

impl Default for SliderRange {
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 10.0,
            ticks: 2001,
        }
    }
}

impl SliderRange {
    pub fn new(min: f64, max: f64, ticks: u32) -> crate::Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(CoreError::InvalidRange {
                reason: format!("min must be below max, got [{min}, {max}]"),
            });
        }
        if ticks < 2 {
            return Err(CoreError::InvalidRange {
                reason: format!("need at least 2 ticks, got {ticks}"),
            });
        }
        Ok(Self { min, max, ticks })
    }

    pub fn step(&self) -> f64 {
        (self.max - self.min) / (self.ticks - 1) as f64
    }

    /// Clamp into the range and round to the nearest tick.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let step = self.step();
        let k = ((value.clamp(self.min, self.max) - self.min) / step).round();
        (self.min + k * step).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Widen the range so it includes `value`, keeping the tick spacing.
    pub fn widened_to(&self, value: f64) -> Self {
        if self.contains(value) || !value.is_finite() {
            return *self;
        }
        let step = self.step();
        let (min, max) = (self.min.min(value), self.max.max(value));
        let ticks = ((max - min) / step).round() as u32 + 1;
        Self { min, max, ticks }
    }
}

/// One complex parameter with independent sliders for each component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: Complex,
    pub re_range: SliderRange,
    pub im_range: SliderRange,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: Complex, range: SliderRange) -> Self {
        Self {
            name: name.into(),
            value,
            re_range: range.widened_to(value.re),
            im_range: range.widened_to(value.im),
        }
    }
}

/// The parameters of the current formula, sorted by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    params: Vec<Parameter>,
    default_range: SliderRange,
}

impl ParameterSet {
    pub fn new(default_range: SliderRange) -> Self {
        Self {
            params: Vec::new(),
            default_range,
        }
    }

    pub fn from_formula(formula: &Formula, default_range: SliderRange) -> Self {
        let mut set = Self::new(default_range);
        set.sync_with(formula);
        set
    }

    /// Match the set to a new formula.
    ///
    /// Names that persist keep their value and ranges, new names get the
    /// formula's defaults, and names the formula no longer uses are dropped.
    pub fn sync_with(&mut self, formula: &Formula) {
        let mut old = std::mem::take(&mut self.params);
        self.params = formula
            .params()
            .iter()
            .map(|name| match old.iter().position(|p| &p.name == name) {
                Some(i) => old.swap_remove(i),
                None => {
                    let value = formula.default_value(name).unwrap_or(Complex::ZERO);
                    Parameter::new(name.clone(), value, self.default_range)
                }
            })
            .collect();
        if !old.is_empty() {
            let dropped: Vec<&str> = old.iter().map(|p| p.name.as_str()).collect();
            debug!(?dropped, "parameters no longer used by the formula");
        }
    }

    pub fn default_range(&self) -> SliderRange {
        self.default_range
    }

    pub fn set_default_range(&mut self, range: SliderRange) {
        self.default_range = range;
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.name == name)
    }

    /// Set a value, widening the slider ranges if needed. Returns `false` if
    /// the name is not a parameter of the current formula.
    pub fn set_value(&mut self, name: &str, value: Complex) -> bool {
        match self.get_mut(name) {
            Some(p) => {
                p.value = value;
                p.re_range = p.re_range.widened_to(value.re);
                p.im_range = p.im_range.widened_to(value.im);
                true
            }
            None => false,
        }
    }

    /// Reset every parameter to the formula's default value.
    pub fn reset(&mut self, formula: &Formula) {
        for p in &mut self.params {
            p.value = formula.default_value(&p.name).unwrap_or(Complex::ZERO);
        }
    }

    pub fn values(&self) -> ParamValues {
        self.params.iter().map(|p| (p.name.clone(), p.value)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Parameter> {
        self.params.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
