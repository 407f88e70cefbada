//! Rule sets: validated, dependency-ordered collections of rules.
//!
//! Every rule of a form lives in ONE graph. An edge runs from the rule
//! producing a path to each rule listing that path as a dependency, and
//! the set is stored in topological order so a single pass sees upstream
//! values before downstream rules read them.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::error::EngineError;
use crate::path::FieldPath;
use crate::rule::DerivedFieldRule;

/// A validated rule list in evaluation order.
pub struct RuleSet<C = ()> {
    rules: Vec<DerivedFieldRule<C>>,
    by_target: HashMap<FieldPath, usize>,
}

impl<C> RuleSet<C> {
    pub fn empty() -> Self {
        RuleSet {
            rules: Vec::new(),
            by_target: HashMap::new(),
        }
    }

    /// Validate and order `rules`.
    ///
    /// Fails on a rule depending on its own target, on two rules sharing a
    /// target, and on any dependency cycle. Independent rules keep their
    /// declaration order.
    pub fn new(rules: Vec<DerivedFieldRule<C>>) -> Result<Self, EngineError> {
        let mut declared: HashMap<FieldPath, usize> = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            if rule.deps().contains(rule.target()) {
                return Err(EngineError::SelfDependency {
                    target: rule.target().clone(),
                });
            }
            if declared.insert(rule.target().clone(), i).is_some() {
                return Err(EngineError::DuplicateTarget {
                    target: rule.target().clone(),
                });
            }
        }

        let order = topological_order(&rules, &declared)?;

        let mut slots: Vec<Option<DerivedFieldRule<C>>> = rules.into_iter().map(Some).collect();
        let mut sorted = Vec::with_capacity(slots.len());
        for i in order {
            if let Some(rule) = slots[i].take() {
                sorted.push(rule);
            }
        }
        let by_target = sorted
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.target().clone(), pos))
            .collect();

        Ok(RuleSet {
            rules: sorted,
            by_target,
        })
    }

    /// Merge several independently built rule groups into one graph.
    pub fn from_groups<I>(groups: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = Vec<DerivedFieldRule<C>>>,
    {
        Self::new(groups.into_iter().flatten().collect())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &DerivedFieldRule<C>> {
        self.rules.iter()
    }

    pub fn rule_for(&self, target: &FieldPath) -> Option<&DerivedFieldRule<C>> {
        self.by_target.get(target).map(|&pos| &self.rules[pos])
    }

    /// Evaluation position of the rule writing `target`.
    pub fn position(&self, target: &FieldPath) -> Option<usize> {
        self.by_target.get(target).copied()
    }

    pub(crate) fn at(&self, pos: usize) -> &DerivedFieldRule<C> {
        &self.rules[pos]
    }

    /// Evaluation positions of every rule transitively downstream of
    /// `changed`, in evaluation order.
    ///
    /// A rule is reached when one of its dependencies equals a changed
    /// path or lies underneath it (a removed row invalidates its cells).
    pub fn affected_by(&self, changed: &[FieldPath]) -> Vec<usize> {
        let mut reached: BTreeSet<usize> = BTreeSet::new();
        let mut frontier: VecDeque<FieldPath> = changed.iter().cloned().collect();
        let mut seen_paths: BTreeSet<FieldPath> = BTreeSet::new();

        while let Some(path) = frontier.pop_front() {
            if !seen_paths.insert(path.clone()) {
                continue;
            }
            for (pos, rule) in self.rules.iter().enumerate() {
                if reached.contains(&pos) {
                    continue;
                }
                if rule.deps().iter().any(|d| d.starts_with(&path)) {
                    reached.insert(pos);
                    frontier.push_back(rule.target().clone());
                }
            }
        }
        reached.into_iter().collect()
    }
}

impl<C> Clone for RuleSet<C> {
    fn clone(&self) -> Self {
        RuleSet {
            rules: self.rules.clone(),
            by_target: self.by_target.clone(),
        }
    }
}

impl<C> Default for RuleSet<C> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Kahn's algorithm over declaration indices; the ready set is ordered so
/// ties resolve to declaration order.
fn topological_order<C>(
    rules: &[DerivedFieldRule<C>],
    declared: &HashMap<FieldPath, usize>,
) -> Result<Vec<usize>, EngineError> {
    let n = rules.len();
    let mut downstream: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree: Vec<usize> = vec![0; n];

    for (j, rule) in rules.iter().enumerate() {
        let mut producers: BTreeSet<usize> = BTreeSet::new();
        for dep in rule.deps() {
            if let Some(&i) = declared.get(dep) {
                producers.insert(i);
            }
        }
        for i in producers {
            downstream[i].push(j);
            in_degree[j] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &j in &downstream[i] {
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                ready.insert(j);
            }
        }
    }

    if order.len() < n {
        let targets = (0..n)
            .filter(|&i| in_degree[i] > 0)
            .map(|i| rules[i].target().clone())
            .collect();
        return Err(EngineError::Cycle { targets });
    }
    Ok(order)
}
