use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::{FieldId, ValueKind};
use crate::ids::SeedPoint;
use crate::vent::VentKind;

/// Current value of one dialog field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    Choice(VentKind),
    Selection(Vec<SeedPoint>),
    Length(f64),
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Choice(_) => ValueKind::Choice,
            FieldValue::Selection(_) => ValueKind::Selection,
            FieldValue::Length(_) => ValueKind::Length,
            FieldValue::Integer(_) => ValueKind::Integer,
            FieldValue::Text(_) => ValueKind::Text,
        }
    }
}

/// A field as the dialog shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub value: FieldValue,
    pub visible: bool,
}

/// Snapshot of the live dialog, passed to every lifecycle hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogState {
    fields: BTreeMap<FieldId, FieldEntry>,
}

impl DialogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field's value. New fields start visible.
    pub fn set(&mut self, id: FieldId, value: FieldValue) {
        match self.fields.get_mut(&id) {
            Some(entry) => entry.value = value,
            None => {
                self.fields.insert(
                    id,
                    FieldEntry {
                        value,
                        visible: true,
                    },
                );
            }
        }
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.fields.get(&id).map(|e| &e.value)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.fields.contains_key(&id)
    }

    /// Toggle visibility. Unknown fields are ignored.
    pub fn set_visible(&mut self, id: FieldId, visible: bool) {
        if let Some(entry) = self.fields.get_mut(&id) {
            entry.visible = visible;
        }
    }

    pub fn is_visible(&self, id: FieldId) -> bool {
        self.fields.get(&id).is_some_and(|e| e.visible)
    }

    pub fn visible_fields(&self) -> Vec<FieldId> {
        self.fields
            .iter()
            .filter(|(_, e)| e.visible)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.keys().copied()
    }

    /// Convenience for hosts and tests: replace the point selection.
    pub fn select_point(&mut self, seed: SeedPoint) {
        self.set(FieldId::CenterPoint, FieldValue::Selection(vec![seed]));
    }

    pub fn clear_selection(&mut self) {
        self.set(FieldId::CenterPoint, FieldValue::Selection(Vec::new()));
    }
}
