//! Lowering of expression trees into callable numeric functions.
//!
//! The tree is turned into nested boxed closures once; parameters are bound
//! to slot indices so evaluation never looks anything up by name.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::EvaluationError;
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::functions::Builtin;

type Node = Box<dyn Fn(Complex, &[Complex]) -> Complex + Send + Sync>;

/// Exponents up to this magnitude are evaluated by repeated multiplication.
const MAX_INTEGER_EXPONENT: f64 = 64.0;

/// Parameter values supplied at evaluation time, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamValues(BTreeMap<String, Complex>);

impl ParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Complex) -> Option<Complex> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<Complex> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Complex)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Complex)> for ParamValues {
    fn from_iter<T: IntoIterator<Item = (S, Complex)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A formula ready for numeric evaluation.
pub struct CompiledFunction {
    root: Node,
    names: Vec<String>,
    defaults: Vec<Complex>,
}

impl fmt::Debug for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFunction")
            .field("params", &self.names)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl CompiledFunction {
    /// Compile `expr`. `defaults` supplies the value of any parameter the
    /// caller later leaves out; parameters missing from it default to zero.
    pub fn compile(expr: &Expr, defaults: &ParamValues) -> Result<Self, EvaluationError> {
        let names = expr.params();
        let slots: BTreeMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();
        let root = build(expr, &slots)?;
        let defaults = names
            .iter()
            .map(|n| defaults.get(n).unwrap_or(Complex::ZERO))
            .collect();
        Ok(Self {
            root,
            names,
            defaults,
        })
    }

    /// Parameter names in slot order.
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    /// Resolve `values` into slot order, filling gaps with defaults.
    /// Names the function does not use are ignored.
    pub fn bind(&self, values: &ParamValues) -> Vec<Complex> {
        self.names
            .iter()
            .zip(&self.defaults)
            .map(|(n, d)| values.get(n).unwrap_or(*d))
            .collect()
    }

    /// Evaluate with slots from [`bind`](Self::bind).
    #[inline]
    pub fn eval_bound(&self, z: Complex, slots: &[Complex]) -> Complex {
        (self.root)(z, slots)
    }

    pub fn eval(&self, z: Complex, values: &ParamValues) -> Complex {
        let slots = self.bind(values);
        self.eval_bound(z, &slots)
    }

    /// Evaluate over a slice of points; the output has the same length.
    pub fn eval_many(&self, zs: &[Complex], values: &ParamValues) -> Vec<Complex> {
        let slots = self.bind(values);
        zs.iter().map(|&z| self.eval_bound(z, &slots)).collect()
    }
}

fn is_constant(expr: &Expr) -> bool {
    !expr.depends_on_variable() && expr.params().is_empty()
}

fn build(expr: &Expr, slots: &BTreeMap<&str, usize>) -> Result<Node, EvaluationError> {
    let node: Node = match expr {
        Expr::Number(c) => {
            let c = *c;
            Box::new(move |_, _| c)
        }
        Expr::Constant(c) => {
            let c = c.value();
            Box::new(move |_, _| c)
        }
        Expr::Variable(_) => Box::new(|z, _| z),
        Expr::Param(name) => {
            let slot = slots.get(name.as_str()).copied().unwrap_or(usize::MAX);
            Box::new(move |_, p| p.get(slot).copied().unwrap_or(Complex::ZERO))
        }
        Expr::Unary(UnaryOp::Neg, e) => {
            let e = build(e, slots)?;
            Box::new(move |z, p| -e(z, p))
        }
        Expr::Binary(BinaryOp::Pow, base, exponent) => build_pow(base, exponent, slots)?,
        Expr::Binary(op, l, r) => {
            let l = build(l, slots)?;
            let r = build(r, slots)?;
            match op {
                BinaryOp::Add => Box::new(move |z, p| l(z, p) + r(z, p)),
                BinaryOp::Sub => Box::new(move |z, p| l(z, p) - r(z, p)),
                BinaryOp::Mul => Box::new(move |z, p| l(z, p) * r(z, p)),
                BinaryOp::Div => Box::new(move |z, p| l(z, p) / r(z, p)),
                BinaryOp::Pow => Box::new(move |z, p| l(z, p).powc(r(z, p))),
            }
        }
        Expr::Call(name, args) => {
            let f = Builtin::resolve(name, args.len())?;
            let arg = build(&args[0], slots)?;
            Box::new(move |z, p| f.apply(arg(z, p)))
        }
    };
    // Fold parameter-free, z-free subtrees to a single value.
    if is_constant(expr) && !matches!(expr, Expr::Number(_) | Expr::Constant(_)) {
        let v = node(Complex::ZERO, &[]);
        return Ok(Box::new(move |_, _| v));
    }
    Ok(node)
}

fn build_pow(
    base: &Expr,
    exponent: &Expr,
    slots: &BTreeMap<&str, usize>,
) -> Result<Node, EvaluationError> {
    let b = build(base, slots)?;
    if let Expr::Number(n) = exponent {
        if n.im == 0.0 && n.re.fract() == 0.0 && n.re.abs() <= MAX_INTEGER_EXPONENT {
            let k = n.re as i32;
            return Ok(match k {
                2 => Box::new(move |z, p| {
                    let v = b(z, p);
                    v * v
                }),
                _ => Box::new(move |z, p| b(z, p).powi(k)),
            });
        }
    }
    let e = build(exponent, slots)?;
    Ok(Box::new(move |z, p| b(z, p).powc(e(z, p))))
}
