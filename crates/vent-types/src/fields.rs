use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::vent::VentKind;

/// Every input of the vent dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    VentType,
    CenterPoint,
    VentBorder,
    VentWidth,
    VentHeight,
    /// Corner radius of rectangular cells.
    Radius,
    NumberWidth,
    NumberHeight,
    VentRadius,
    NumberAxial,
    NumberRadial,
    FlowArea,
}

impl FieldId {
    /// The dialog-side identifier string.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::VentType => "vent_type",
            FieldId::CenterPoint => "center_point",
            FieldId::VentBorder => "vent_border",
            FieldId::VentWidth => "vent_width",
            FieldId::VentHeight => "vent_height",
            FieldId::Radius => "radius",
            FieldId::NumberWidth => "number_width",
            FieldId::NumberHeight => "number_height",
            FieldId::VentRadius => "vent_radius",
            FieldId::NumberAxial => "number_axial",
            FieldId::NumberRadial => "number_radial",
            FieldId::FlowArea => "flow_area",
        }
    }

    /// Value kind this field is declared with.
    pub fn kind(self) -> ValueKind {
        FIELD_SCHEMA
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, kind)| *kind)
            .unwrap_or(ValueKind::Text)
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a field holds. Declared up front; values are read by kind, never probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Drop-down selection of a vent variant.
    Choice,
    /// Point selection, limited to one entity.
    Selection,
    /// Length in document units.
    Length,
    /// Integer spinner.
    Integer,
    /// Read-only text display.
    Text,
}

/// The dialog schema in display order.
pub const FIELD_SCHEMA: [(FieldId, ValueKind); 12] = [
    (FieldId::VentType, ValueKind::Choice),
    (FieldId::CenterPoint, ValueKind::Selection),
    (FieldId::VentWidth, ValueKind::Length),
    (FieldId::VentHeight, ValueKind::Length),
    (FieldId::VentBorder, ValueKind::Length),
    (FieldId::Radius, ValueKind::Length),
    (FieldId::NumberWidth, ValueKind::Integer),
    (FieldId::NumberHeight, ValueKind::Integer),
    (FieldId::VentRadius, ValueKind::Length),
    (FieldId::NumberRadial, ValueKind::Integer),
    (FieldId::NumberAxial, ValueKind::Integer),
    (FieldId::FlowArea, ValueKind::Text),
];

/// Fields shown for every vent variant.
pub const COMMON_FIELDS: [FieldId; 3] =
    [FieldId::CenterPoint, FieldId::VentBorder, FieldId::VentType];

/// Fields specific to one vent variant.
pub fn variant_fields(kind: VentKind) -> &'static [FieldId] {
    match kind {
        VentKind::Circular => &[FieldId::VentRadius, FieldId::NumberAxial, FieldId::NumberRadial],
        VentKind::Slot => &[
            FieldId::VentWidth,
            FieldId::VentHeight,
            FieldId::NumberWidth,
            FieldId::NumberHeight,
        ],
        VentKind::Rectangular => &[
            FieldId::VentWidth,
            FieldId::VentHeight,
            FieldId::NumberWidth,
            FieldId::NumberHeight,
            FieldId::Radius,
        ],
    }
}

/// Fields that are visible when `kind` is selected.
pub fn visibility(kind: VentKind) -> BTreeSet<FieldId> {
    COMMON_FIELDS
        .iter()
        .chain(variant_fields(kind))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_unique_ids() {
        let ids: BTreeSet<FieldId> = FIELD_SCHEMA.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), FIELD_SCHEMA.len());
    }

    #[test]
    fn circular_hides_grid_fields() {
        let visible = visibility(VentKind::Circular);
        assert!(visible.contains(&FieldId::NumberAxial));
        assert!(!visible.contains(&FieldId::VentWidth));
        assert!(!visible.contains(&FieldId::Radius));
        assert!(!visible.contains(&FieldId::FlowArea));
    }

    #[test]
    fn slot_has_no_corner_radius() {
        let visible = visibility(VentKind::Slot);
        assert!(!visible.contains(&FieldId::Radius));
        assert!(visibility(VentKind::Rectangular).contains(&FieldId::Radius));
    }

    #[test]
    fn field_kinds_follow_schema() {
        assert_eq!(FieldId::CenterPoint.kind(), ValueKind::Selection);
        assert_eq!(FieldId::NumberRadial.kind(), ValueKind::Integer);
        assert_eq!(FieldId::Radius.kind(), ValueKind::Length);
    }
}
