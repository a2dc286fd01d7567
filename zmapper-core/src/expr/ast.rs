use std::collections::BTreeSet;
use std::fmt;

use crate::complex::Complex;
use crate::error::EvaluationError;
use crate::functions::Builtin;

/// Named constants recognised by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
    I,
}

impl Constant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Self::Pi),
            "E" => Some(Self::E),
            "I" => Some(Self::I),
            _ => None,
        }
    }

    pub fn value(self) -> Complex {
        match self {
            Self::Pi => Complex::from_real(std::f64::consts::PI),
            Self::E => Complex::from_real(std::f64::consts::E),
            Self::I => Complex::I,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "E",
            Self::I => "I",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => " + ",
            Self::Sub => " - ",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

/// Expression tree of a formula in `z`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal; imaginary literals such as `2j` carry a non-zero `im`.
    Number(Complex),
    Constant(Constant),
    /// The independent variable.
    Variable(String),
    /// A free symbol driven by a slider.
    Param(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

impl Expr {
    pub fn real(x: f64) -> Self {
        Self::Number(Complex::from_real(x))
    }

    /// Whether the expression references `name` as variable or parameter.
    pub fn depends_on(&self, name: &str) -> bool {
        match self {
            Self::Number(_) | Self::Constant(_) => false,
            Self::Variable(v) | Self::Param(v) => v == name,
            Self::Unary(_, e) => e.depends_on(name),
            Self::Binary(_, l, r) => l.depends_on(name) || r.depends_on(name),
            Self::Call(_, args) => args.iter().any(|a| a.depends_on(name)),
        }
    }

    pub fn depends_on_variable(&self) -> bool {
        match self {
            Self::Variable(_) => true,
            Self::Number(_) | Self::Constant(_) | Self::Param(_) => false,
            Self::Unary(_, e) => e.depends_on_variable(),
            Self::Binary(_, l, r) => l.depends_on_variable() || r.depends_on_variable(),
            Self::Call(_, args) => args.iter().any(Expr::depends_on_variable),
        }
    }

    /// Sorted, de-duplicated parameter names.
    pub fn params(&self) -> Vec<String> {
        let mut out = BTreeSet::new();
        self.collect_params(&mut out);
        out.into_iter().collect()
    }

    fn collect_params(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Param(p) => {
                out.insert(p.clone());
            }
            Self::Number(_) | Self::Constant(_) | Self::Variable(_) => {}
            Self::Unary(_, e) => e.collect_params(out),
            Self::Binary(_, l, r) => {
                l.collect_params(out);
                r.collect_params(out);
            }
            Self::Call(_, args) => args.iter().for_each(|a| a.collect_params(out)),
        }
    }

    /// Parameters that scale, divide or exponentiate a sub-expression in `z`.
    ///
    /// These get a default of one instead of zero so that a freshly typed
    /// formula such as `a*sin(w*z)` is not flattened onto the origin.
    pub fn multiplicative_params(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_multiplicative(&mut out);
        out
    }

    fn collect_multiplicative(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Binary(op, l, r) => {
                if matches!(op, BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow) {
                    if l.depends_on_variable() {
                        r.collect_params(out);
                    }
                    if r.depends_on_variable() {
                        l.collect_params(out);
                    }
                }
                l.collect_multiplicative(out);
                r.collect_multiplicative(out);
            }
            Self::Unary(_, e) => e.collect_multiplicative(out),
            Self::Call(_, args) => args.iter().for_each(|a| a.collect_multiplicative(out)),
            Self::Number(_) | Self::Constant(_) | Self::Variable(_) | Self::Param(_) => {}
        }
    }

    /// Symbolic derivative with respect to `var`.
    ///
    /// Results are lightly simplified (zeros and ones are folded away) so the
    /// printed title stays readable.
    pub fn derivative(&self, var: &str) -> Result<Expr, EvaluationError> {
        if !self.depends_on(var) {
            return Ok(Expr::real(0.0));
        }
        let d = match self {
            Self::Number(_) | Self::Constant(_) => Expr::real(0.0),
            Self::Variable(_) | Self::Param(_) => Expr::real(1.0),
            Self::Unary(UnaryOp::Neg, e) => neg(e.derivative(var)?),
            Self::Binary(op, l, r) => {
                let (u, v) = (l.as_ref(), r.as_ref());
                match op {
                    BinaryOp::Add => add(u.derivative(var)?, v.derivative(var)?),
                    BinaryOp::Sub => sub(u.derivative(var)?, v.derivative(var)?),
                    BinaryOp::Mul => add(
                        mul(u.derivative(var)?, v.clone()),
                        mul(u.clone(), v.derivative(var)?),
                    ),
                    BinaryOp::Div => div(
                        sub(
                            mul(u.derivative(var)?, v.clone()),
                            mul(u.clone(), v.derivative(var)?),
                        ),
                        pow(v.clone(), Expr::real(2.0)),
                    ),
                    BinaryOp::Pow => power_derivative(u, v, var)?,
                }
            }
            Self::Call(name, args) => {
                let f = Builtin::resolve(name, args.len())?;
                let [u] = args.as_slice() else {
                    return Err(EvaluationError::NotDifferentiable { name: name.clone() });
                };
                mul(outer_derivative(f, name, u)?, u.derivative(var)?)
            }
        };
        Ok(d)
    }

    fn precedence(&self) -> u8 {
        match self {
            // `a + bj` prints as a sum.
            Self::Number(c) if c.re != 0.0 && c.im != 0.0 => BinaryOp::Add.precedence(),
            Self::Number(c) if c.re.is_sign_negative() || c.im.is_sign_negative() => {
                UNARY_PRECEDENCE
            }
            Self::Number(_) | Self::Constant(_) | Self::Variable(_) | Self::Param(_) => {
                ATOM_PRECEDENCE
            }
            Self::Call(..) => ATOM_PRECEDENCE,
            Self::Unary(..) => UNARY_PRECEDENCE,
            Self::Binary(op, ..) => op.precedence(),
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
        if parens {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

fn power_derivative(u: &Expr, v: &Expr, var: &str) -> Result<Expr, EvaluationError> {
    let du = u.derivative(var)?;
    if !v.depends_on(var) {
        // v * u^(v-1) * u'
        let exponent = sub(v.clone(), Expr::real(1.0));
        return Ok(mul(mul(v.clone(), pow(u.clone(), exponent)), du));
    }
    let dv = v.derivative(var)?;
    let ln_u = call(Builtin::Ln, u.clone());
    if !u.depends_on(var) {
        return Ok(mul(mul(ln_u, pow(u.clone(), v.clone())), dv));
    }
    // u^v * (v' ln u + v u'/u)
    Ok(mul(
        pow(u.clone(), v.clone()),
        add(mul(dv, ln_u), div(mul(v.clone(), du), u.clone())),
    ))
}

/// `f'(u)` for a single-argument builtin.
fn outer_derivative(f: Builtin, name: &str, u: &Expr) -> Result<Expr, EvaluationError> {
    let u = || u.clone();
    let one = || Expr::real(1.0);
    let sq = |e: Expr| pow(e, Expr::real(2.0));
    let d = match f {
        Builtin::Sin => call(Builtin::Cos, u()),
        Builtin::Cos => neg(call(Builtin::Sin, u())),
        Builtin::Tan => div(one(), sq(call(Builtin::Cos, u()))),
        Builtin::Sec => mul(call(Builtin::Sec, u()), call(Builtin::Tan, u())),
        Builtin::Csc => neg(mul(call(Builtin::Csc, u()), call(Builtin::Cot, u()))),
        Builtin::Cot => neg(sq(call(Builtin::Csc, u()))),
        Builtin::Asin => div(one(), call(Builtin::Sqrt, sub(one(), sq(u())))),
        Builtin::Acos => neg(div(one(), call(Builtin::Sqrt, sub(one(), sq(u()))))),
        Builtin::Atan => div(one(), add(one(), sq(u()))),
        Builtin::Sinh => call(Builtin::Cosh, u()),
        Builtin::Cosh => call(Builtin::Sinh, u()),
        Builtin::Tanh => div(one(), sq(call(Builtin::Cosh, u()))),
        Builtin::Asinh => div(one(), call(Builtin::Sqrt, add(sq(u()), one()))),
        Builtin::Acosh => div(
            one(),
            mul(
                call(Builtin::Sqrt, sub(u(), one())),
                call(Builtin::Sqrt, add(u(), one())),
            ),
        ),
        Builtin::Atanh => div(one(), sub(one(), sq(u()))),
        Builtin::Exp => call(Builtin::Exp, u()),
        Builtin::Ln => div(one(), u()),
        Builtin::Sqrt => div(one(), mul(Expr::real(2.0), call(Builtin::Sqrt, u()))),
        Builtin::Sinc => div(
            sub(call(Builtin::Cos, u()), call(Builtin::Sinc, u())),
            u(),
        ),
        Builtin::Gamma => mul(call(Builtin::Gamma, u()), call(Builtin::Digamma, u())),
        Builtin::Erf => mul(
            div(Expr::real(2.0), call(Builtin::Sqrt, Expr::Constant(Constant::Pi))),
            call(Builtin::Exp, neg(sq(u()))),
        ),
        Builtin::LambertW => {
            let w = call(Builtin::LambertW, u());
            div(w.clone(), mul(u(), add(one(), w)))
        }
        Builtin::Abs
        | Builtin::Re
        | Builtin::Im
        | Builtin::Arg
        | Builtin::Conj
        | Builtin::Digamma
        | Builtin::Zeta
        | Builtin::Eta => {
            return Err(EvaluationError::NotDifferentiable {
                name: name.to_string(),
            })
        }
    };
    Ok(d)
}

fn as_number(e: &Expr) -> Option<Complex> {
    match e {
        Expr::Number(c) => Some(*c),
        _ => None,
    }
}

fn is_value(e: &Expr, v: f64) -> bool {
    as_number(e) == Some(Complex::from_real(v))
}

fn call(f: Builtin, arg: Expr) -> Expr {
    Expr::Call(f.name().to_string(), vec![arg])
}

fn neg(e: Expr) -> Expr {
    match e {
        Expr::Number(c) => Expr::Number(-c),
        Expr::Unary(UnaryOp::Neg, inner) => *inner,
        other => Expr::Unary(UnaryOp::Neg, Box::new(other)),
    }
}

fn add(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => Expr::Number(x + y),
        _ if is_value(&a, 0.0) => b,
        _ if is_value(&b, 0.0) => a,
        _ => Expr::Binary(BinaryOp::Add, Box::new(a), Box::new(b)),
    }
}

fn sub(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => Expr::Number(x - y),
        _ if is_value(&b, 0.0) => a,
        _ if is_value(&a, 0.0) => neg(b),
        _ => Expr::Binary(BinaryOp::Sub, Box::new(a), Box::new(b)),
    }
}

fn mul(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => Expr::Number(x * y),
        _ if is_value(&a, 0.0) || is_value(&b, 0.0) => Expr::real(0.0),
        _ if is_value(&a, 1.0) => b,
        _ if is_value(&b, 1.0) => a,
        _ if is_value(&a, -1.0) => neg(b),
        _ if is_value(&b, -1.0) => neg(a),
        _ => Expr::Binary(BinaryOp::Mul, Box::new(a), Box::new(b)),
    }
}

fn div(a: Expr, b: Expr) -> Expr {
    if is_value(&a, 0.0) {
        return Expr::real(0.0);
    }
    if is_value(&b, 1.0) {
        return a;
    }
    Expr::Binary(BinaryOp::Div, Box::new(a), Box::new(b))
}

fn pow(a: Expr, b: Expr) -> Expr {
    if is_value(&b, 0.0) {
        return Expr::real(1.0);
    }
    if is_value(&b, 1.0) {
        return a;
    }
    Expr::Binary(BinaryOp::Pow, Box::new(a), Box::new(b))
}

fn fmt_number(c: Complex, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if c.im == 0.0 {
        write!(f, "{}", c.re)
    } else if c.re == 0.0 {
        write!(f, "{}j", c.im)
    } else if c.im < 0.0 {
        write!(f, "{} - {}j", c.re, -c.im)
    } else {
        write!(f, "{} + {}j", c.re, c.im)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(c) => fmt_number(*c, f),
            Self::Constant(c) => f.write_str(c.name()),
            Self::Variable(v) | Self::Param(v) => f.write_str(v),
            Self::Unary(UnaryOp::Neg, e) => {
                f.write_str("-")?;
                e.fmt_child(f, e.precedence() <= UNARY_PRECEDENCE)
            }
            Self::Binary(op, l, r) => {
                let p = op.precedence();
                let left_parens = if *op == BinaryOp::Pow {
                    l.precedence() <= p
                } else {
                    l.precedence() < p
                };
                let right_parens = match op {
                    BinaryOp::Pow => r.precedence() < p,
                    BinaryOp::Sub | BinaryOp::Div => r.precedence() <= p,
                    BinaryOp::Add | BinaryOp::Mul => r.precedence() < p,
                };
                l.fmt_child(f, left_parens)?;
                f.write_str(op.symbol())?;
                r.fmt_child(f, right_parens)
            }
            Self::Call(name, args) => {
                write!(f, "{name}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
        }
    }
}
