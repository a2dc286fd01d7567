//! Built-in functions callable from a formula.

use crate::complex::Complex;
use crate::error::EvaluationError;
use crate::special;

/// Every function name the compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Ln,
    Sqrt,
    Abs,
    Re,
    Im,
    Arg,
    Conj,
    Sinc,
    Gamma,
    Erf,
    Digamma,
    LambertW,
    Zeta,
    Eta,
}

impl Builtin {
    /// Look up a function by the name used in formulas.
    ///
    /// Aliases (`log`/`ln`, `conj`/`conjugate`, `psi`/`digamma`) resolve to
    /// the same builtin.
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "sec" => Self::Sec,
            "csc" => Self::Csc,
            "cot" => Self::Cot,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "asinh" => Self::Asinh,
            "acosh" => Self::Acosh,
            "atanh" => Self::Atanh,
            "exp" => Self::Exp,
            "log" | "ln" => Self::Ln,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            "re" => Self::Re,
            "im" => Self::Im,
            "arg" => Self::Arg,
            "conj" | "conjugate" => Self::Conj,
            "sinc" => Self::Sinc,
            "gamma" => Self::Gamma,
            "erf" => Self::Erf,
            "psi" | "digamma" => Self::Digamma,
            "lambertw" => Self::LambertW,
            "zeta" => Self::Zeta,
            "eta" => Self::Eta,
            _ => return None,
        };
        Some(f)
    }

    /// Resolve a call site, checking the name and the argument count.
    pub fn resolve(name: &str, found: usize) -> Result<Self, EvaluationError> {
        let f = Self::from_name(name).ok_or_else(|| EvaluationError::UnknownFunction {
            name: name.to_string(),
        })?;
        if found != f.arity() {
            return Err(EvaluationError::Arity {
                name: name.to_string(),
                expected: f.arity(),
                found,
            });
        }
        Ok(f)
    }

    pub fn arity(self) -> usize {
        1
    }

    /// Canonical name, used when printing derived expressions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sec => "sec",
            Self::Csc => "csc",
            Self::Cot => "cot",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Asinh => "asinh",
            Self::Acosh => "acosh",
            Self::Atanh => "atanh",
            Self::Exp => "exp",
            Self::Ln => "log",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
            Self::Re => "re",
            Self::Im => "im",
            Self::Arg => "arg",
            Self::Conj => "conj",
            Self::Sinc => "sinc",
            Self::Gamma => "gamma",
            Self::Erf => "erf",
            Self::Digamma => "psi",
            Self::LambertW => "lambertw",
            Self::Zeta => "zeta",
            Self::Eta => "eta",
        }
    }

    #[inline]
    pub fn apply(self, z: Complex) -> Complex {
        match self {
            Self::Sin => z.sin(),
            Self::Cos => z.cos(),
            Self::Tan => z.tan(),
            Self::Sec => z.cos().recip(),
            Self::Csc => z.sin().recip(),
            Self::Cot => z.tan().recip(),
            Self::Asin => z.asin(),
            Self::Acos => z.acos(),
            Self::Atan => z.atan(),
            Self::Sinh => z.sinh(),
            Self::Cosh => z.cosh(),
            Self::Tanh => z.tanh(),
            Self::Asinh => z.asinh(),
            Self::Acosh => z.acosh(),
            Self::Atanh => z.atanh(),
            Self::Exp => z.exp(),
            Self::Ln => z.ln(),
            Self::Sqrt => z.sqrt(),
            Self::Abs => Complex::from_real(z.norm()),
            Self::Re => Complex::from_real(z.re),
            Self::Im => Complex::from_real(z.im),
            Self::Arg => Complex::from_real(z.arg()),
            Self::Conj => z.conj(),
            Self::Sinc => special::sinc(z),
            Self::Gamma => special::gamma(z),
            Self::Erf => special::erf(z),
            Self::Digamma => special::digamma(z),
            Self::LambertW => special::lambert_w(z),
            Self::Zeta => special::zeta(z),
            Self::Eta => special::eta(z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_same_builtin() {
        assert_eq!(Builtin::from_name("log"), Builtin::from_name("ln"));
        assert_eq!(Builtin::from_name("psi"), Some(Builtin::Digamma));
        assert_eq!(Builtin::from_name("conjugate"), Some(Builtin::Conj));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            Builtin::resolve("frobnicate", 1),
            Err(EvaluationError::UnknownFunction {
                name: "frobnicate".into()
            })
        );
    }

    #[test]
    fn wrong_arity() {
        assert_eq!(
            Builtin::resolve("sin", 2),
            Err(EvaluationError::Arity {
                name: "sin".into(),
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn canonical_names_round_trip() {
        for f in [Builtin::Ln, Builtin::Digamma, Builtin::Conj, Builtin::LambertW] {
            assert_eq!(Builtin::from_name(f.name()), Some(f));
        }
    }
}
