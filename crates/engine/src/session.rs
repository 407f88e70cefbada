//! An in-process host: the store, the rules and the shared context in one
//! place, with the edit/reset/generate transitions a form UI drives.

use crate::engine::{Engine, PassReport};
use crate::error::EngineError;
use crate::graph::RuleSet;
use crate::path::FieldPath;
use crate::store::FormState;
use crate::value::FieldValue;

pub const DEFAULT_MAX_PASSES: usize = 8;

/// Owns one form and keeps it consistent with its rules.
pub struct FormSession<C> {
    engine: Engine,
    rules: RuleSet<C>,
    store: FormState,
    shared: C,
    max_passes: usize,
}

impl<C> FormSession<C> {
    pub fn new(engine: Engine, rules: RuleSet<C>, store: FormState, shared: C) -> Self {
        FormSession {
            engine,
            rules,
            store,
            shared,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn store(&self) -> &FormState {
        &self.store
    }

    pub fn shared(&self) -> &C {
        &self.shared
    }

    pub fn rules(&self) -> &RuleSet<C> {
        &self.rules
    }

    pub fn into_store(self) -> FormState {
        self.store
    }

    /// One full pass.
    pub fn recompute(&mut self) -> Result<PassReport, EngineError> {
        self.engine
            .recompute(&self.rules, &mut self.store, &self.shared)
    }

    /// Full passes until quiet.
    pub fn settle(&mut self) -> Result<PassReport, EngineError> {
        self.engine
            .settle(&self.rules, &mut self.store, &self.shared, self.max_passes)
    }

    /// A user typed `value` into `path`: the field becomes user-owned and
    /// is recomputed with its dependents. Its own rule runs too, so a
    /// domain-checked rule can replace an invalid entry straight away.
    pub fn edit(
        &mut self,
        path: &FieldPath,
        value: impl Into<FieldValue>,
    ) -> Result<PassReport, EngineError> {
        self.store.edit(path, value);
        tracing::debug!(target: "appraise.engine", path = %path, "user edit");
        self.engine.recompute_fields(
            &self.rules,
            &mut self.store,
            &self.shared,
            std::slice::from_ref(path),
        )
    }

    /// Hand `path` back to the engine and recompute it and its dependents.
    pub fn reset_field(&mut self, path: &FieldPath) -> Result<PassReport, EngineError> {
        if self.store.reset(path) {
            tracing::debug!(target: "appraise.engine", path = %path, "override cleared");
        }
        self.engine.recompute_fields(
            &self.rules,
            &mut self.store,
            &self.shared,
            std::slice::from_ref(path),
        )
    }

    /// Re-initialise: every override is cleared and the whole form recomputed.
    pub fn generate(&mut self) -> Result<PassReport, EngineError> {
        let cleared = self.store.reset_all();
        tracing::info!(target: "appraise.engine", cleared, "form regenerated");
        self.recompute()
    }

    /// Swap in a rule set rebuilt for a new row/column shape and run a
    /// full pass. Rules referencing removed indices are gone with the old set.
    pub fn replace_rules(&mut self, rules: RuleSet<C>) -> Result<PassReport, EngineError> {
        self.rules = rules;
        self.recompute()
    }

    /// Shape change: `reshape` edits the stored data (inserting header
    /// cells, closing the gap left by a removed column) before the rebuilt
    /// rule set is swapped in.
    pub fn reshape<F>(&mut self, reshape: F, rules: RuleSet<C>) -> Result<PassReport, EngineError>
    where
        F: FnOnce(&mut FormState),
    {
        reshape(&mut self.store);
        self.replace_rules(rules)
    }
}
