//! Recomputation passes over a [`RuleSet`].
//!
//! A pass walks rules in topological order. For each rule the activation
//! decides whether it may run, `compute` produces a value, the rounding
//! policy is applied, and the store is written only when the value
//! differs from what is already there. Computed writes never change a
//! field's override state.
//!
//! A failing `compute` aborts the pass. Writes already made stay in the
//! store; there is no rollback and no per-rule isolation.

use crate::error::EngineError;
use crate::graph::RuleSet;
use crate::path::FieldPath;
use crate::rounding::RoundingPolicy;
use crate::rule::{DerivedFieldRule, RuleContext};
use crate::store::FormState;
use crate::value::FieldValue;

/// A single value written during a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Write {
    pub path: FieldPath,
    pub previous: Option<FieldValue>,
    pub value: FieldValue,
}

/// What a pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Values that changed, in evaluation order.
    pub writes: Vec<Write>,
    /// Targets whose activation declined (user-owned fields).
    pub skipped: Vec<FieldPath>,
    /// Rules evaluated whose result equalled the stored value.
    pub unchanged: usize,
}

impl PassReport {
    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn written_paths(&self) -> Vec<FieldPath> {
        self.writes.iter().map(|w| w.path.clone()).collect()
    }

    fn absorb(&mut self, other: PassReport) {
        self.writes.extend(other.writes);
        self.skipped.extend(other.skipped);
        self.unchanged += other.unchanged;
    }
}

enum Outcome {
    Written(Write),
    Unchanged,
    Skipped,
}

/// Stateless pass runner; holds only the rounding policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    rounding: RoundingPolicy,
}

impl Engine {
    pub fn new(rounding: RoundingPolicy) -> Self {
        Engine { rounding }
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Run every rule once, in evaluation order.
    pub fn recompute<C>(
        &self,
        rules: &RuleSet<C>,
        store: &mut FormState,
        shared: &C,
    ) -> Result<PassReport, EngineError> {
        let positions: Vec<usize> = (0..rules.len()).collect();
        let report = self.run_positions(rules, &positions, store, shared)?;
        tracing::debug!(
            target: "appraise.engine",
            rules = rules.len(),
            writes = report.writes.len(),
            skipped = report.skipped.len(),
            "full recomputation pass"
        );
        Ok(report)
    }

    /// Run only the rules transitively downstream of `changed`.
    ///
    /// This is the subscription path: a user edit reports the edited
    /// paths and only their dependents are re-evaluated.
    pub fn recompute_affected<C>(
        &self,
        rules: &RuleSet<C>,
        store: &mut FormState,
        shared: &C,
        changed: &[FieldPath],
    ) -> Result<PassReport, EngineError> {
        let positions = rules.affected_by(changed);
        let report = self.run_positions(rules, &positions, store, shared)?;
        tracing::debug!(
            target: "appraise.engine",
            changed = changed.len(),
            affected = positions.len(),
            writes = report.writes.len(),
            "incremental recomputation pass"
        );
        Ok(report)
    }

    /// Run the rules writing `targets` themselves plus everything downstream.
    ///
    /// Used after a field is handed back to the engine: its own rule must
    /// run again, not only its dependents.
    pub fn recompute_fields<C>(
        &self,
        rules: &RuleSet<C>,
        store: &mut FormState,
        shared: &C,
        targets: &[FieldPath],
    ) -> Result<PassReport, EngineError> {
        let mut positions: Vec<usize> = targets.iter().filter_map(|t| rules.position(t)).collect();
        positions.extend(rules.affected_by(targets));
        positions.sort_unstable();
        positions.dedup();
        self.run_positions(rules, &positions, store, shared)
    }

    /// Repeat full passes until one makes no writes, up to `max_passes`.
    ///
    /// Within one graph a single pass already converges; this exists for
    /// hosts that feed values in from outside the graph between passes.
    pub fn settle<C>(
        &self,
        rules: &RuleSet<C>,
        store: &mut FormState,
        shared: &C,
        max_passes: usize,
    ) -> Result<PassReport, EngineError> {
        let mut total = PassReport::default();
        for pass in 0..max_passes.max(1) {
            let report = self.recompute(rules, store, shared)?;
            let done = report.is_noop();
            total.absorb(report);
            if done {
                return Ok(total);
            }
            tracing::trace!(target: "appraise.engine", pass, "pass made writes; running again");
        }
        tracing::warn!(
            target: "appraise.engine",
            max_passes,
            "form did not settle within the pass limit"
        );
        Ok(total)
    }

    fn run_positions<C>(
        &self,
        rules: &RuleSet<C>,
        positions: &[usize],
        store: &mut FormState,
        shared: &C,
    ) -> Result<PassReport, EngineError> {
        let mut report = PassReport::default();
        for &pos in positions {
            let rule = rules.at(pos);
            match self.evaluate(rule, store, shared)? {
                Outcome::Written(w) => report.writes.push(w),
                Outcome::Unchanged => report.unchanged += 1,
                Outcome::Skipped => report.skipped.push(rule.target().clone()),
            }
        }
        Ok(report)
    }

    fn evaluate<C>(
        &self,
        rule: &DerivedFieldRule<C>,
        store: &mut FormState,
        shared: &C,
    ) -> Result<Outcome, EngineError> {
        let target = rule.target();
        let (value, replacing_user_entry) = {
            let ctx = RuleContext::new(store, shared, target);
            if !rule.activation().allows(&ctx) {
                tracing::trace!(target: "appraise.engine", path = %target, "user-owned; skipped");
                return Ok(Outcome::Skipped);
            }
            let value = rule.compute(&ctx).map_err(|source| EngineError::Compute {
                target: target.clone(),
                source,
            })?;
            (value, ctx.state().is_overridden())
        };

        let value = match value {
            FieldValue::Number(d) => {
                FieldValue::Number(self.rounding.apply(d, rule.precision_mode()))
            }
            other => other,
        };

        let previous = store.get(target).cloned();
        if !store.set_computed(target, value.clone()) {
            return Ok(Outcome::Unchanged);
        }

        if replacing_user_entry {
            tracing::warn!(
                target: "appraise.engine",
                path = %target,
                previous = ?previous,
                value = %value,
                "user entry outside its valid domain replaced by computed default"
            );
        } else {
            tracing::debug!(
                target: "appraise.engine",
                path = %target,
                value = %value,
                "derived field written"
            );
        }

        Ok(Outcome::Written(Write {
            path: target.clone(),
            previous,
            value,
        }))
    }
}
