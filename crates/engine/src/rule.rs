//! Derived-field rules: one system-computed cell each.
//!
//! Rules are immutable values. Builders regenerate the whole list whenever
//! the row/column shape of a form changes; rules are never patched in place.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::auto_default::should_auto_default;
use crate::error::ComputeError;
use crate::path::FieldPath;
use crate::rounding::Precision;
use crate::store::{FieldState, FormState};
use crate::value::FieldValue;

pub type ComputeFn<C> =
    Arc<dyn Fn(&RuleContext<'_, C>) -> Result<FieldValue, ComputeError> + Send + Sync>;
pub type PredicateFn<C> = Arc<dyn Fn(&RuleContext<'_, C>) -> bool + Send + Sync>;

// ──────────────────────────────────────────────
// Evaluation context
// ──────────────────────────────────────────────

/// Read access handed to `compute` and activation predicates.
///
/// Any path may be read, not just the declared dependencies. Declared
/// dependencies only decide ordering and re-triggering.
pub struct RuleContext<'a, C> {
    store: &'a FormState,
    shared: &'a C,
    target: &'a FieldPath,
}

impl<'a, C> RuleContext<'a, C> {
    pub fn new(store: &'a FormState, shared: &'a C, target: &'a FieldPath) -> Self {
        RuleContext {
            store,
            shared,
            target,
        }
    }

    pub fn shared(&self) -> &'a C {
        self.shared
    }

    pub fn target(&self) -> &'a FieldPath {
        self.target
    }

    /// Current stored value of the rule's own target.
    pub fn current(&self) -> Option<&'a FieldValue> {
        self.store.get(self.target)
    }

    /// Override state of the rule's own target.
    pub fn state(&self) -> &'a FieldState {
        self.store.state(self.target)
    }

    pub fn value(&self, path: &FieldPath) -> Option<&'a FieldValue> {
        self.store.get(path)
    }

    pub fn number(&self, path: &FieldPath) -> Option<Decimal> {
        self.store.number(path)
    }

    /// Numeric reading with missing or non-numeric values treated as zero.
    pub fn number_or_zero(&self, path: &FieldPath) -> Decimal {
        self.store.number(path).unwrap_or(Decimal::ZERO)
    }

    /// Numeric reading that fails the rule when absent or non-numeric.
    pub fn require_number(&self, path: &FieldPath) -> Result<Decimal, ComputeError> {
        match self.store.get(path) {
            None | Some(FieldValue::Null) => Err(ComputeError::MissingValue { path: path.clone() }),
            Some(v) => v.as_decimal().ok_or_else(|| ComputeError::NotANumber {
                path: path.clone(),
                value: v.to_string(),
            }),
        }
    }

    pub fn text(&self, path: &FieldPath) -> Option<&'a str> {
        self.store.text(path)
    }
}

// ──────────────────────────────────────────────
// Activation
// ──────────────────────────────────────────────

/// Decides, per pass, whether a rule may write its target.
pub enum Activation<C> {
    /// Always recompute (the default when a rule declares nothing).
    Always,
    /// Recompute while the target is not user-overridden.
    AutoDefault,
    /// Recompute while not overridden, or while the stored value falls
    /// outside `range` (an invalid entry is replaced by the default).
    AutoDefaultWithin(RangeInclusive<Decimal>),
    /// Arbitrary predicate.
    Custom(PredicateFn<C>),
}

impl<C> Activation<C> {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&RuleContext<'_, C>) -> bool + Send + Sync + 'static,
    {
        Activation::Custom(Arc::new(predicate))
    }

    pub fn allows(&self, ctx: &RuleContext<'_, C>) -> bool {
        match self {
            Activation::Always => true,
            Activation::AutoDefault => should_auto_default(ctx.current(), ctx.state(), None),
            Activation::AutoDefaultWithin(range) => {
                should_auto_default(ctx.current(), ctx.state(), Some(range))
            }
            Activation::Custom(f) => f(ctx),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Activation::Always => "always",
            Activation::AutoDefault => "auto-default",
            Activation::AutoDefaultWithin(_) => "auto-default-within",
            Activation::Custom(_) => "custom",
        }
    }
}

impl<C> Clone for Activation<C> {
    fn clone(&self) -> Self {
        match self {
            Activation::Always => Activation::Always,
            Activation::AutoDefault => Activation::AutoDefault,
            Activation::AutoDefaultWithin(r) => Activation::AutoDefaultWithin(r.clone()),
            Activation::Custom(f) => Activation::Custom(Arc::clone(f)),
        }
    }
}

impl<C> fmt::Debug for Activation<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::AutoDefaultWithin(r) => {
                write!(f, "AutoDefaultWithin({}..={})", r.start(), r.end())
            }
            other => f.write_str(other.label()),
        }
    }
}

// ──────────────────────────────────────────────
// Rule
// ──────────────────────────────────────────────

/// One derived cell: `target` is recomputed from `deps`.
pub struct DerivedFieldRule<C = ()> {
    target: FieldPath,
    deps: Vec<FieldPath>,
    activation: Activation<C>,
    precision: Precision,
    compute: ComputeFn<C>,
}

impl<C> DerivedFieldRule<C> {
    pub fn new<F>(target: FieldPath, deps: Vec<FieldPath>, compute: F) -> Self
    where
        F: Fn(&RuleContext<'_, C>) -> Result<FieldValue, ComputeError> + Send + Sync + 'static,
    {
        DerivedFieldRule {
            target,
            deps,
            activation: Activation::Always,
            precision: Precision::Policy,
            compute: Arc::new(compute),
        }
    }

    /// A rule that writes a fixed value (typically a default copied from
    /// survey or template data at build time).
    pub fn constant(target: FieldPath, value: impl Into<FieldValue>) -> Self
    where
        C: 'static,
    {
        let value = value.into();
        Self::new(target, Vec::new(), move |_| Ok(value.clone()))
    }

    pub fn when(mut self, activation: Activation<C>) -> Self {
        self.activation = activation;
        self
    }

    /// Shorthand for `when(Activation::AutoDefault)`.
    pub fn auto_default(self) -> Self {
        self.when(Activation::AutoDefault)
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn target(&self) -> &FieldPath {
        &self.target
    }

    pub fn deps(&self) -> &[FieldPath] {
        &self.deps
    }

    pub fn activation(&self) -> &Activation<C> {
        &self.activation
    }

    pub fn precision_mode(&self) -> Precision {
        self.precision
    }

    pub fn compute(&self, ctx: &RuleContext<'_, C>) -> Result<FieldValue, ComputeError> {
        (self.compute)(ctx)
    }
}

impl<C> Clone for DerivedFieldRule<C> {
    fn clone(&self) -> Self {
        DerivedFieldRule {
            target: self.target.clone(),
            deps: self.deps.clone(),
            activation: self.activation.clone(),
            precision: self.precision,
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<C> fmt::Debug for DerivedFieldRule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedFieldRule")
            .field("target", &self.target)
            .field("deps", &self.deps)
            .field("activation", &self.activation)
            .field("precision", &self.precision)
            .finish()
    }
}
