pub mod compile;
pub mod complex;
pub mod error;
pub mod expr;
pub mod formula;
pub mod functions;
pub mod grid;
pub mod params;
pub mod special;
pub mod view;

// Re-export primary types for convenience.
pub use compile::{CompiledFunction, ParamValues};
pub use complex::Complex;
pub use error::{CoreError, EvaluationError, ParseError};
pub use expr::Expr;
pub use formula::Formula;
pub use grid::{GridInput, GridLine, GridPattern, GridSpec, LineKind, Side};
pub use params::{Parameter, ParameterSet, SliderRange};
pub use view::{PlaneRect, ViewState};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
