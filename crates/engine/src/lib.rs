//! Derived-field recomputation engine.
//!
//! Keeps spreadsheet-like form tables consistent while users edit cells:
//! each [`DerivedFieldRule`] names a target path, the paths it depends on,
//! an activation predicate and a compute function. A [`RuleSet`] orders
//! every rule of a form in one dependency graph; the [`Engine`] walks it,
//! writing a value only when it changed and never overwriting a field the
//! user owns (see [`FieldState`]).
//!
//! The form state is an explicit [`FormState`] value passed to every call.

pub mod auto_default;
pub mod engine;
pub mod error;
pub mod graph;
pub mod path;
pub mod rounding;
pub mod rule;
pub mod session;
pub mod store;
pub mod value;

pub use auto_default::should_auto_default;
pub use engine::{Engine, PassReport, Write};
pub use error::{ComputeError, EngineError};
pub use graph::RuleSet;
pub use path::{FieldPath, PathSegment};
pub use rounding::{Precision, RoundingPolicy};
pub use rule::{Activation, DerivedFieldRule, RuleContext};
pub use session::FormSession;
pub use store::{FieldState, FormState};
pub use value::{parse_decimal, FieldValue};
