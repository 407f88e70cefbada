//! The form-state store: values addressed by [`FieldPath`] plus the
//! per-field override state.
//!
//! The store is passed explicitly to every recomputation call; nothing in
//! the engine reaches it through ambient state.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::path::{FieldPath, PathSegment};
use crate::value::FieldValue;

/// Who owns the current value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldState {
    /// The engine may keep the field up to date.
    #[default]
    Auto,
    /// The user typed this value; auto-computation must leave it alone.
    UserOverridden(FieldValue),
}

impl FieldState {
    pub fn is_overridden(&self) -> bool {
        matches!(self, FieldState::UserOverridden(_))
    }
}

/// Flat key-value view of the nested form tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: BTreeMap<FieldPath, FieldValue>,
    states: BTreeMap<FieldPath, FieldState>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &FieldPath) -> Option<&FieldValue> {
        self.values.get(path)
    }

    /// Numeric reading of a path; missing and non-numeric values are `None`.
    pub fn number(&self, path: &FieldPath) -> Option<Decimal> {
        self.values.get(path).and_then(FieldValue::as_decimal)
    }

    pub fn text(&self, path: &FieldPath) -> Option<&str> {
        self.values.get(path).and_then(FieldValue::as_text)
    }

    pub fn state(&self, path: &FieldPath) -> &FieldState {
        static AUTO: FieldState = FieldState::Auto;
        self.states.get(path).unwrap_or(&AUTO)
    }

    pub fn is_overridden(&self, path: &FieldPath) -> bool {
        self.state(path).is_overridden()
    }

    /// Paths currently owned by the user.
    pub fn overridden_paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.states
            .iter()
            .filter(|(_, s)| s.is_overridden())
            .map(|(p, _)| p)
    }

    /// Store a system-computed value without touching the override state.
    ///
    /// Returns `true` when the stored value actually changed.
    pub fn set_computed(&mut self, path: &FieldPath, value: FieldValue) -> bool {
        if self.values.get(path) == Some(&value) {
            return false;
        }
        self.values.insert(path.clone(), value);
        true
    }

    /// Seed a value as if it were loaded from a saved form; the field stays `Auto`.
    pub fn insert(&mut self, path: FieldPath, value: impl Into<FieldValue>) {
        self.values.insert(path, value.into());
    }

    /// Record a direct user edit: stores the value and marks the field overridden.
    pub fn edit(&mut self, path: &FieldPath, value: impl Into<FieldValue>) {
        let value = value.into();
        self.values.insert(path.clone(), value.clone());
        self.states
            .insert(path.clone(), FieldState::UserOverridden(value));
    }

    /// Hand a field back to the engine. Returns `true` if it was overridden.
    pub fn reset(&mut self, path: &FieldPath) -> bool {
        self.states.remove(path).is_some_and(|s| s.is_overridden())
    }

    /// Hand every field back to the engine.
    pub fn reset_all(&mut self) -> usize {
        let n = self.states.values().filter(|s| s.is_overridden()).count();
        self.states.clear();
        n
    }

    /// Drop every value and state under `prefix` (row or column removal).
    pub fn remove_subtree(&mut self, prefix: &FieldPath) {
        self.values.retain(|p, _| !p.starts_with(prefix));
        self.states.retain(|p, _| !p.starts_with(prefix));
    }

    /// Delete element `index` of the array at `array` and close the gap.
    /// Override states travel with their values.
    pub fn remove_element(&mut self, array: &FieldPath, index: usize) {
        self.remove_subtree(&array.child(index));
        self.values = std::mem::take(&mut self.values)
            .into_iter()
            .map(|(p, v)| (p.shifted_after_removal(array, index), v))
            .collect();
        self.states = std::mem::take(&mut self.states)
            .into_iter()
            .map(|(p, s)| (p.shifted_after_removal(array, index), s))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldValue)> {
        self.values.iter()
    }

    // ──────────────────────────────────────────────
    // JSON tree conversion
    // ──────────────────────────────────────────────

    /// Flatten a nested JSON tree into a store. Every field starts `Auto`.
    pub fn from_json(tree: &Value) -> Result<Self, EngineError> {
        let mut state = FormState::new();
        match tree {
            Value::Object(map) => {
                for (key, child) in map {
                    flatten_into(&mut state, key.clone(), child)?;
                }
                Ok(state)
            }
            other => Err(EngineError::InvalidPath {
                path: String::new(),
                reason: format!("form root must be an object, got {}", json_kind(other)),
            }),
        }
    }

    /// Rebuild the nested JSON tree. Numeric segments become array slots;
    /// gaps in an array are filled with `null`.
    pub fn to_json(&self) -> Value {
        let mut root = Value::Object(Map::new());
        for (path, value) in &self.values {
            let segments: Vec<PathSegment<'_>> = path.segments().collect();
            insert_json(&mut root, &segments, value.to_json());
        }
        root
    }
}

fn flatten_into(state: &mut FormState, prefix: String, node: &Value) -> Result<(), EngineError> {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(state, format!("{}.{}", prefix, key), child)?;
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(state, format!("{}.{}", prefix, i), child)?;
            }
        }
        leaf => {
            let path = FieldPath::parse(prefix)?;
            let value = FieldValue::from_json(leaf).ok_or_else(|| EngineError::InvalidValue {
                path: path.clone(),
                value: leaf.to_string(),
            })?;
            state.values.insert(path, value);
        }
    }
    Ok(())
}

fn insert_json(node: &mut Value, segments: &[PathSegment<'_>], leaf: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = leaf;
        return;
    };
    let slot = match head {
        PathSegment::Key(key) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            match node {
                Value::Object(map) => map.entry(key.to_string()).or_insert(Value::Null),
                _ => return,
            }
        }
        PathSegment::Index(i) => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            match node {
                Value::Array(items) => {
                    if items.len() <= *i {
                        items.resize(*i + 1, Value::Null);
                    }
                    &mut items[*i]
                }
                _ => return,
            }
        }
    };
    insert_json(slot, rest, leaf);
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn set_computed_reports_change_only_once() {
        let mut s = FormState::new();
        assert!(s.set_computed(&p("a.b"), FieldValue::from(1)));
        assert!(!s.set_computed(&p("a.b"), FieldValue::from(1)));
        assert!(!s.is_overridden(&p("a.b")));
    }

    #[test]
    fn numerically_equal_decimals_are_unchanged() {
        let mut s = FormState::new();
        s.set_computed(&p("x"), FieldValue::Number(Decimal::new(100, 2)));
        assert!(!s.set_computed(&p("x"), FieldValue::Number(Decimal::ONE)));
    }

    #[test]
    fn edit_marks_overridden_and_reset_clears() {
        let mut s = FormState::new();
        s.edit(&p("w"), FieldValue::from(2));
        assert_eq!(
            s.state(&p("w")),
            &FieldState::UserOverridden(FieldValue::from(2))
        );
        assert!(s.reset(&p("w")));
        assert!(!s.reset(&p("w")));
        assert_eq!(s.get(&p("w")), Some(&FieldValue::from(2)));
    }

    #[test]
    fn json_round_trip_preserves_tree_shape() {
        let tree = json!({
            "comparativeSurveys": [ { "surveyId": "S1" }, { "surveyId": "S2" } ],
            "finalValue": { "finalValue": 1085000, "note": null }
        });
        let s = FormState::from_json(&tree).unwrap();
        assert_eq!(s.text(&p("comparativeSurveys.1.surveyId")), Some("S2"));
        assert_eq!(
            s.number(&p("finalValue.finalValue")),
            Some(Decimal::from(1085000))
        );
        assert_eq!(s.to_json(), tree);
    }

    #[test]
    fn from_json_rejects_number_out_of_decimal_range() {
        let tree = json!({ "cols": [{ "price": 1e30, "land": 5 }] });
        let err = FormState::from_json(&tree).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidValue { ref path, .. } if path.as_str() == "cols.0.price"
        ));
    }

    #[test]
    fn from_json_rejects_non_object_root() {
        assert!(FormState::from_json(&json!([1])).is_err());
    }

    #[test]
    fn remove_subtree_drops_values_and_states() {
        let mut s = FormState::new();
        s.edit(&p("rows.1.a"), FieldValue::from(1));
        s.insert(p("rows.10.a"), 2);
        s.remove_subtree(&p("rows.1"));
        assert!(s.get(&p("rows.1.a")).is_none());
        assert!(!s.is_overridden(&p("rows.1.a")));
        assert!(s.get(&p("rows.10.a")).is_some());
    }

    #[test]
    fn remove_element_closes_the_gap() {
        let mut s = FormState::new();
        s.insert(p("cols.0.v"), 1);
        s.insert(p("cols.1.v"), 2);
        s.edit(&p("cols.2.v"), FieldValue::from(3));
        s.remove_element(&p("cols"), 1);
        assert_eq!(s.len(), 2);
        assert_eq!(s.number(&p("cols.1.v")), Some(Decimal::from(3)));
        assert!(s.is_overridden(&p("cols.1.v")));
        assert!(s.get(&p("cols.2.v")).is_none());
    }
}
