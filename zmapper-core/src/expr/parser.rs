//! `nom` parser for formulas.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('**' | '^') unary)?
//! primary := number | '(' expr ')' | ident '(' args ')' | ident
//! ```
//!
//! Python-style `**` and caret `^` both mean exponentiation, and a number
//! directly followed by `j` is an imaginary literal.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, satisfy},
    combinator::{cut, map, map_res, not, opt, recognize},
    error::{context, VerboseError, VerboseErrorKind},
    multi::separated_list0,
    number::complete::recognize_float,
    sequence::{delimited, pair, terminated},
    IResult, Parser,
};
use nom_locate::LocatedSpan;

use super::ast::{BinaryOp, Constant, Expr, UnaryOp};
use crate::complex::Complex;
use crate::error::ParseError;

/// Name of the independent variable.
pub const VARIABLE: &str = "z";

type Span<'a> = LocatedSpan<&'a str>;
type PResult<'a, O> = IResult<Span<'a>, O, VerboseError<Span<'a>>>;

/// Parses a formula and checks that it depends on `z`.
///
/// Returns the tree together with its sorted free parameter names.
pub fn parse(source: &str) -> Result<(Expr, Vec<String>), ParseError> {
    let expr = parse_expression(source)?;
    if !expr.depends_on_variable() {
        return Err(ParseError::new("expression does not depend on z", 1));
    }
    let params = expr.params();
    Ok((expr, params))
}

/// Parses any well-formed expression, with or without `z`.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let input = Span::new(source);
    let (rest, expr) = match delimited(multispace0, expr, multispace0)(input) {
        Ok(v) => v,
        Err(err) => return Err(to_parse_error(err, source)),
    };
    if !rest.fragment().is_empty() {
        return Err(ParseError::new(
            "unexpected trailing input",
            rest.get_utf8_column(),
        ));
    }
    Ok(expr)
}

fn to_parse_error(err: nom::Err<VerboseError<Span<'_>>>, source: &str) -> ParseError {
    match err {
        nom::Err::Incomplete(_) => {
            ParseError::new("unexpected end of input", source.chars().count() + 1)
        }
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            // The innermost context names what the grammar was looking for.
            let context = e.errors.iter().find_map(|(span, kind)| match kind {
                VerboseErrorKind::Context(ctx) => Some((*span, *ctx)),
                _ => None,
            });
            match context {
                Some((span, ctx)) => {
                    ParseError::new(format!("expected {ctx}"), span.get_utf8_column())
                }
                None => match e.errors.first() {
                    Some((span, VerboseErrorKind::Char(c))) => {
                        ParseError::new(format!("expected '{c}'"), span.get_utf8_column())
                    }
                    Some((span, _)) => {
                        ParseError::new("invalid expression", span.get_utf8_column())
                    }
                    None => ParseError::new("invalid expression", 1),
                },
            }
        }
    }
}

fn ws<'a, O, P>(mut parser: P) -> impl FnMut(Span<'a>) -> PResult<'a, O>
where
    P: FnMut(Span<'a>) -> PResult<'a, O>,
{
    move |input| delimited(multispace0, &mut parser, multispace0)(input)
}

fn ws_char<'a>(c: char) -> impl FnMut(Span<'a>) -> PResult<'a, char> {
    ws(char(c))
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn identifier(input: Span<'_>) -> PResult<'_, String> {
    map(
        recognize(pair(
            take_while1(is_ident_start),
            take_while(is_ident_continue),
        )),
        |s: Span<'_>| s.fragment().to_string(),
    )(input)
}

fn expr(input: Span<'_>) -> PResult<'_, Expr> {
    parse_add_sub(input)
}

fn parse_add_sub(input: Span<'_>) -> PResult<'_, Expr> {
    let (mut input, mut left) = parse_mul_div(input)?;
    loop {
        let (next, op) = opt(alt((ws_char('+'), ws_char('-')))).parse(input)?;
        let Some(op_char) = op else {
            break;
        };
        let (next, right) = parse_mul_div(next)?;
        let op = if op_char == '+' {
            BinaryOp::Add
        } else {
            BinaryOp::Sub
        };
        left = Expr::Binary(op, Box::new(left), Box::new(right));
        input = next;
    }
    Ok((input, left))
}

fn parse_mul_div(input: Span<'_>) -> PResult<'_, Expr> {
    let (mut input, mut left) = parse_unary(input)?;
    loop {
        // `**` belongs to the power rule; a lone `*` must not swallow it.
        let (next, op) = opt(alt((
            ws(terminated(char('*'), not(char('*')))),
            ws_char('/'),
        )))
        .parse(input)?;
        let Some(op_char) = op else {
            break;
        };
        let (next, right) = parse_unary(next)?;
        let op = if op_char == '*' {
            BinaryOp::Mul
        } else {
            BinaryOp::Div
        };
        left = Expr::Binary(op, Box::new(left), Box::new(right));
        input = next;
    }
    Ok((input, left))
}

fn parse_unary(input: Span<'_>) -> PResult<'_, Expr> {
    if let Ok((input, _)) = ws_char('-').parse(input) {
        let (input, inner) = parse_unary(input)?;
        return Ok((input, Expr::Unary(UnaryOp::Neg, Box::new(inner))));
    }
    if let Ok((input, _)) = ws_char('+').parse(input) {
        return parse_unary(input);
    }
    parse_power(input)
}

fn parse_power(input: Span<'_>) -> PResult<'_, Expr> {
    let (input, base) = parse_primary(input)?;
    let (input, op) = opt(ws(alt((tag("**"), tag("^"))))).parse(input)?;
    if op.is_none() {
        return Ok((input, base));
    }
    // Right-associative: the exponent may itself be a power or a negation.
    let (input, exponent) = parse_unary(input)?;
    Ok((
        input,
        Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)),
    ))
}

fn parse_primary(input: Span<'_>) -> PResult<'_, Expr> {
    context(
        "expression",
        alt((parse_parenthesized, parse_number, parse_ident_or_call)),
    )(input)
}

fn parse_parenthesized(input: Span<'_>) -> PResult<'_, Expr> {
    let (input, _) = ws_char('(').parse(input)?;
    let (input, inner) = cut(expr)(input)?;
    let (input, _) = cut(context("')'", ws_char(')')))(input)?;
    Ok((input, inner))
}

fn parse_number(input: Span<'_>) -> PResult<'_, Expr> {
    let (input, value) = ws(map_res(recognize_float, |s: Span<'_>| {
        s.fragment().parse::<f64>()
    }))
    .parse(input)?;
    let (input, imaginary) = opt(terminated(char('j'), not(satisfy(is_ident_continue))))(input)?;
    let (input, _) = multispace0(input)?;
    let n = if imaginary.is_some() {
        Complex::new(0.0, value)
    } else {
        Complex::from_real(value)
    };
    Ok((input, Expr::Number(n)))
}

fn parse_ident_or_call(input: Span<'_>) -> PResult<'_, Expr> {
    let (input, name) = ws(identifier).parse(input)?;
    let (input, args) = opt(delimited(
        ws_char('('),
        separated_list0(ws_char(','), expr),
        cut(context("')'", ws_char(')'))),
    ))
    .parse(input)?;

    let expr = match args {
        Some(args) => Expr::Call(name, args),
        None if name == VARIABLE => Expr::Variable(name),
        None => match Constant::from_name(&name) {
            Some(c) => Expr::Constant(c),
            None => Expr::Param(name),
        },
    };
    Ok((input, expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z() -> Expr {
        Expr::Variable("z".into())
    }

    #[test]
    fn precedence_and_associativity() {
        let e = parse_expression("1 - z - 2*z/3").unwrap();
        assert_eq!(e.to_string(), "1 - z - 2*z/3");
        let e = parse_expression("z^2^3").unwrap();
        match e {
            Expr::Binary(BinaryOp::Pow, base, exp) => {
                assert_eq!(*base, z());
                assert!(matches!(*exp, Expr::Binary(BinaryOp::Pow, ..)));
            }
            other => panic!("unexpected tree {other:?}"),
        }
    }

    #[test]
    fn double_star_is_power() {
        assert_eq!(
            parse_expression("z**2").unwrap(),
            parse_expression("z^2").unwrap()
        );
        let e = parse_expression("2*z**2").unwrap();
        assert_eq!(e.to_string(), "2*z^2");
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        let e = parse_expression("-z**2").unwrap();
        assert!(matches!(e, Expr::Unary(UnaryOp::Neg, ref inner)
            if matches!(**inner, Expr::Binary(BinaryOp::Pow, ..))));
    }

    #[test]
    fn negative_exponent() {
        let e = parse_expression("z^-1").unwrap();
        assert!(matches!(e, Expr::Binary(BinaryOp::Pow, _, ref exp)
            if matches!(**exp, Expr::Unary(UnaryOp::Neg, _))));
    }

    #[test]
    fn constants_calls_and_params() {
        let (e, params) = parse("a*exp(I*pi*z) + E*w").unwrap();
        assert_eq!(params, vec!["a".to_string(), "w".to_string()]);
        assert!(e.to_string().contains("exp(I*pi*z)"));
    }

    #[test]
    fn imaginary_literal() {
        let e = parse_expression("2.5j*z").unwrap();
        match e {
            Expr::Binary(BinaryOp::Mul, l, _) => {
                assert_eq!(*l, Expr::Number(Complex::new(0.0, 2.5)))
            }
            other => panic!("unexpected tree {other:?}"),
        }
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(
            parse_expression("  a * sin ( w * z )  ").unwrap(),
            parse_expression("a*sin(w*z)").unwrap()
        );
    }

    #[test]
    fn formula_without_z_is_rejected() {
        let err = parse("a*sin(w)").unwrap_err();
        assert_eq!(err.message, "expression does not depend on z");
    }

    #[test]
    fn dangling_operator() {
        let err = parse("z +").unwrap_err();
        assert_eq!(err.message, "expected expression");
        assert_eq!(err.column, 4);
    }

    #[test]
    fn unclosed_parenthesis() {
        let err = parse("sin(z").unwrap_err();
        assert_eq!(err.message, "expected ')'");
        assert_eq!(err.column, 6);
    }

    #[test]
    fn trailing_input() {
        let err = parse("z z").unwrap_err();
        assert_eq!(err.message, "unexpected trailing input");
        assert_eq!(err.column, 3);
    }

    #[test]
    fn empty_input() {
        let err = parse("").unwrap_err();
        assert_eq!(err.message, "expected expression");
        assert_eq!(err.column, 1);
    }
}
