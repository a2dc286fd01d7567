use crate::compile::{CompiledFunction, ParamValues};
use crate::complex::Complex;
use crate::error::{EvaluationError, ParseError};
use crate::expr::{self, Expr, VARIABLE};

/// A parsed formula together with its free parameters and their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
    params: Vec<String>,
    defaults: ParamValues,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let (expr, params) = expr::parse(source)?;
        Ok(Self::build(source.trim().to_string(), expr, params))
    }

    fn build(source: String, expr: Expr, params: Vec<String>) -> Self {
        let multiplicative = expr.multiplicative_params();
        let defaults = params
            .iter()
            .map(|p| {
                let re = if multiplicative.contains(p) { 1.0 } else { 0.0 };
                (p.clone(), Complex::from_real(re))
            })
            .collect();
        Self {
            source,
            expr,
            params,
            defaults,
        }
    }

    /// The text as typed (trimmed).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Free parameter names, sorted.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Suggested starting value of every parameter.
    pub fn defaults(&self) -> &ParamValues {
        &self.defaults
    }

    pub fn default_value(&self, name: &str) -> Option<Complex> {
        self.defaults.get(name)
    }

    pub fn compile(&self) -> Result<CompiledFunction, EvaluationError> {
        CompiledFunction::compile(&self.expr, &self.defaults)
    }

    /// `df/dz` as a new formula whose source is the printed derivative.
    ///
    /// Parameters that vanish under differentiation are dropped, and a
    /// derivative that no longer depends on `z` (e.g. of `a*z`) is still
    /// accepted.
    pub fn derivative(&self) -> Result<Formula, EvaluationError> {
        let d = self.expr.derivative(VARIABLE)?;
        // Surface unknown functions before handing the result out.
        CompiledFunction::compile(&d, &self.defaults)?;
        let params = d.params();
        let mut derived = Self::build(d.to_string(), d, params);
        // Keep the parent's defaults for parameters that survive.
        for p in &derived.params {
            if let Some(v) = self.defaults.get(p) {
                derived.defaults.insert(p.clone(), v);
            }
        }
        Ok(derived)
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expr)
    }
}
