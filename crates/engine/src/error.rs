use crate::path::FieldPath;

/// Errors raised while building a rule set or running a recomputation pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A path string cannot address a single value.
    #[error("invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A stored leaf cannot be held as a field value (e.g. a number out of
    /// `Decimal` range).
    #[error("unreadable value at '{path}': {value}")]
    InvalidValue { path: FieldPath, value: String },

    /// A rule lists its own target among its dependencies.
    #[error("rule for '{target}' depends on itself")]
    SelfDependency { target: FieldPath },

    /// Two rules write the same target path.
    #[error("more than one rule targets '{target}'")]
    DuplicateTarget { target: FieldPath },

    /// The dependency graph contains a cycle; `targets` are the rules that
    /// could not be ordered.
    #[error("dependency cycle between rules: {}", join_paths(.targets))]
    Cycle { targets: Vec<FieldPath> },

    /// A rule's compute function failed. The pass is aborted at this rule.
    #[error("computing '{target}' failed: {source}")]
    Compute {
        target: FieldPath,
        #[source]
        source: ComputeError,
    },
}

/// Errors a rule's compute function may return.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputeError {
    /// A required input is absent from the store.
    #[error("missing value at '{path}'")]
    MissingValue { path: FieldPath },

    /// An input exists but cannot be read as a number.
    #[error("value at '{path}' is not a number: {value}")]
    NotANumber { path: FieldPath, value: String },

    /// Decimal arithmetic overflowed.
    #[error("numeric overflow: {message}")]
    Overflow { message: String },

    /// Any other rule-specific failure.
    #[error("{0}")]
    Invalid(String),
}

fn join_paths(paths: &[FieldPath]) -> String {
    paths
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
