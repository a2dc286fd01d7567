//! Formula expressions: tree, parser and symbolic derivative.

mod ast;
pub mod parser;

pub use ast::{BinaryOp, Constant, Expr, UnaryOp};
pub use parser::{parse, parse_expression, VARIABLE};
