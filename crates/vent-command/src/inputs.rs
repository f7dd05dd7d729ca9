use tracing::debug;
use vent_types::{
    visibility, CircularVent, DialogState, FieldId, FieldValue, RectangularVent, SeedPoint,
    SlotVent, ValueKind, VentKind, VentSpec, FIELD_SCHEMA,
};

use crate::config::{CommandConfig, CountLimits};

/// Typed parameters read from the dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct InputModel {
    pub spec: VentSpec,
    pub seed: SeedPoint,
}

impl InputModel {
    /// Read the vent definition and seed point from the dialog.
    ///
    /// Only the fields of the selected variant are read; hidden fields of the
    /// other variants are ignored even when they hold bad values.
    pub fn from_dialog(dialog: &DialogState, limits: &CountLimits) -> Result<Self, InputError> {
        let spec = read_spec(dialog, limits)?;
        let seed = read_seed(dialog)?;
        Ok(Self { spec, seed })
    }
}

/// Read the [`VentSpec`] of the variant selected in the dialog.
pub fn read_spec(dialog: &DialogState, limits: &CountLimits) -> Result<VentSpec, InputError> {
    let reader = FieldReader { dialog, limits };
    let kind = read_kind(dialog)?;
    let border = reader.positive(FieldId::VentBorder)?;
    let spec = match kind {
        VentKind::Circular => VentSpec::Circular(CircularVent {
            radius: reader.positive(FieldId::VentRadius)?,
            border,
            axial_count: reader.count(FieldId::NumberAxial)?,
            radial_count: reader.count(FieldId::NumberRadial)?,
        }),
        VentKind::Slot => VentSpec::Slot(SlotVent {
            width: reader.positive(FieldId::VentWidth)?,
            height: reader.positive(FieldId::VentHeight)?,
            border,
            cols: reader.count(FieldId::NumberWidth)?,
            rows: reader.count(FieldId::NumberHeight)?,
        }),
        VentKind::Rectangular => VentSpec::Rectangular(RectangularVent {
            width: reader.positive(FieldId::VentWidth)?,
            height: reader.positive(FieldId::VentHeight)?,
            border,
            cols: reader.count(FieldId::NumberWidth)?,
            rows: reader.count(FieldId::NumberHeight)?,
            corner_radius: reader.non_negative(FieldId::Radius)?,
        }),
    };
    Ok(spec)
}

/// Read the single selected seed point.
pub fn read_seed(dialog: &DialogState) -> Result<SeedPoint, InputError> {
    match dialog.get(FieldId::CenterPoint) {
        Some(FieldValue::Selection(points)) => match points.as_slice() {
            [] => Err(InputError::NoSelection),
            [seed] => Ok(seed.clone()),
            many => Err(InputError::TooManySelections { count: many.len() }),
        },
        Some(other) => Err(InputError::WrongKind {
            field: FieldId::CenterPoint,
            expected: ValueKind::Selection,
            found: other.kind(),
        }),
        None => Err(InputError::NoSelection),
    }
}

/// The dialog as it opens: every schema field filled from the defaults, no
/// point selected, visibility applied for the default variant.
pub fn initial_dialog(config: &CommandConfig) -> DialogState {
    let d = &config.defaults;
    let mut dialog = DialogState::new();
    for (id, _) in FIELD_SCHEMA {
        let value = match id {
            FieldId::VentType => FieldValue::Choice(d.vent_type),
            FieldId::CenterPoint => FieldValue::Selection(Vec::new()),
            FieldId::VentBorder => FieldValue::Length(d.border),
            FieldId::VentWidth => FieldValue::Length(d.width),
            FieldId::VentHeight => FieldValue::Length(d.height),
            FieldId::Radius => FieldValue::Length(d.corner_radius),
            FieldId::NumberWidth => FieldValue::Integer(i64::from(d.cols)),
            FieldId::NumberHeight => FieldValue::Integer(i64::from(d.rows)),
            FieldId::VentRadius => FieldValue::Length(d.vent_radius),
            FieldId::NumberAxial => FieldValue::Integer(i64::from(d.axial_count)),
            FieldId::NumberRadial => FieldValue::Integer(i64::from(d.radial_count)),
            FieldId::FlowArea => FieldValue::Text("0.0".to_string()),
        };
        dialog.set(id, value);
    }
    apply_visibility(&mut dialog, d.vent_type);
    dialog
}

/// Read the vent type selected in the dialog.
pub fn read_kind(dialog: &DialogState) -> Result<VentKind, InputError> {
    let field = FieldId::VentType;
    match dialog.get(field) {
        Some(FieldValue::Choice(kind)) => Ok(*kind),
        Some(other) => Err(FieldReader::wrong_kind(field, other)),
        None => Err(InputError::Missing { field }),
    }
}

/// Show exactly the fields of `kind` and hide the rest.
pub fn apply_visibility(dialog: &mut DialogState, kind: VentKind) {
    let visible = visibility(kind);
    let ids: Vec<FieldId> = dialog.field_ids().collect();
    for id in ids {
        dialog.set_visible(id, visible.contains(&id));
    }
    debug!(kind = %kind, visible = visible.len(), "applied field visibility");
}

/// Reads fields by their declared kind.
struct FieldReader<'a> {
    dialog: &'a DialogState,
    limits: &'a CountLimits,
}

impl FieldReader<'_> {
    fn value(&self, field: FieldId) -> Result<&FieldValue, InputError> {
        self.dialog
            .get(field)
            .ok_or(InputError::Missing { field })
    }

    fn wrong_kind(field: FieldId, found: &FieldValue) -> InputError {
        InputError::WrongKind {
            field,
            expected: field.kind(),
            found: found.kind(),
        }
    }

    fn length(&self, field: FieldId) -> Result<f64, InputError> {
        match self.value(field)? {
            FieldValue::Length(v) if v.is_finite() => Ok(*v),
            FieldValue::Length(v) => Err(InputError::NotPositive { field, value: *v }),
            other => Err(Self::wrong_kind(field, other)),
        }
    }

    fn positive(&self, field: FieldId) -> Result<f64, InputError> {
        let value = self.length(field)?;
        if value <= 0.0 {
            return Err(InputError::NotPositive { field, value });
        }
        Ok(value)
    }

    fn non_negative(&self, field: FieldId) -> Result<f64, InputError> {
        let value = self.length(field)?;
        if value < 0.0 {
            return Err(InputError::Negative { field, value });
        }
        Ok(value)
    }

    fn count(&self, field: FieldId) -> Result<u32, InputError> {
        let value = match self.value(field)? {
            FieldValue::Integer(v) => *v,
            other => return Err(Self::wrong_kind(field, other)),
        };
        let out_of_range = InputError::CountOutOfRange {
            field,
            value,
            min: self.limits.min.max(1),
            max: self.limits.max,
        };
        if value < 1 || !self.limits.contains(value) {
            return Err(out_of_range);
        }
        u32::try_from(value).map_err(|_| out_of_range)
    }
}

/// Why the dialog does not describe a buildable vent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("field {field} is missing from the dialog")]
    Missing { field: FieldId },

    #[error("field {field} holds a {found:?} value, expected {expected:?}")]
    WrongKind {
        field: FieldId,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("no center point is selected")]
    NoSelection,

    #[error("{count} points are selected, only one is allowed")]
    TooManySelections { count: usize },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: FieldId, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: FieldId, value: f64 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    CountOutOfRange {
        field: FieldId,
        value: i64,
        min: i64,
        max: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use vent_types::{ComponentId, COMMON_FIELDS};

    fn dialog_with_seed(kind: VentKind) -> DialogState {
        let mut dialog = initial_dialog(&CommandConfig::default());
        dialog.set(FieldId::VentType, FieldValue::Choice(kind));
        dialog.select_point(SeedPoint::new([0.0, 0.0, 1.0], ComponentId(0)));
        dialog
    }

    #[test]
    fn defaults_read_as_circular() {
        let dialog = dialog_with_seed(VentKind::Circular);
        let model = InputModel::from_dialog(&dialog, &CountLimits::default()).unwrap();
        assert_eq!(
            model.spec,
            VentSpec::Circular(CircularVent {
                radius: 5.0,
                border: 0.1,
                axial_count: 5,
                radial_count: 3,
            })
        );
        assert_eq!(model.seed.position, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn vent_type_must_hold_a_choice() {
        let mut dialog = dialog_with_seed(VentKind::Slot);
        assert_eq!(read_kind(&dialog), Ok(VentKind::Slot));
        dialog.set(FieldId::VentType, FieldValue::Text("Slot".into()));
        assert_eq!(
            read_kind(&dialog),
            Err(InputError::WrongKind {
                field: FieldId::VentType,
                expected: ValueKind::Choice,
                found: ValueKind::Text,
            })
        );
    }

    #[test]
    fn missing_selection_is_rejected() {
        let dialog = initial_dialog(&CommandConfig::default());
        let err = InputModel::from_dialog(&dialog, &CountLimits::default()).unwrap_err();
        assert_eq!(err, InputError::NoSelection);
    }

    #[test]
    fn two_points_are_rejected() {
        let mut dialog = dialog_with_seed(VentKind::Slot);
        let p = SeedPoint::new([0.0, 0.0, 1.0], ComponentId(0));
        dialog.set(FieldId::CenterPoint, FieldValue::Selection(vec![p.clone(), p]));
        assert_eq!(
            read_seed(&dialog).unwrap_err(),
            InputError::TooManySelections { count: 2 }
        );
    }

    #[test]
    fn zero_width_is_not_positive() {
        let mut dialog = dialog_with_seed(VentKind::Rectangular);
        dialog.set(FieldId::VentWidth, FieldValue::Length(0.0));
        let err = read_spec(&dialog, &CountLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            InputError::NotPositive {
                field: FieldId::VentWidth,
                ..
            }
        ));
    }

    #[test]
    fn zero_corner_radius_is_allowed_but_negative_is_not() {
        let mut dialog = dialog_with_seed(VentKind::Rectangular);
        dialog.set(FieldId::Radius, FieldValue::Length(0.0));
        assert!(read_spec(&dialog, &CountLimits::default()).is_ok());
        dialog.set(FieldId::Radius, FieldValue::Length(-0.1));
        assert!(matches!(
            read_spec(&dialog, &CountLimits::default()),
            Err(InputError::Negative { .. })
        ));
    }

    #[test]
    fn counts_respect_spinner_limits() {
        let limits = CountLimits::default();
        let mut dialog = dialog_with_seed(VentKind::Slot);
        dialog.set(FieldId::NumberHeight, FieldValue::Integer(0));
        assert!(matches!(
            read_spec(&dialog, &limits),
            Err(InputError::CountOutOfRange { value: 0, .. })
        ));
        dialog.set(FieldId::NumberHeight, FieldValue::Integer(100));
        assert!(matches!(
            read_spec(&dialog, &limits),
            Err(InputError::CountOutOfRange { value: 100, max: 99, .. })
        ));
    }

    #[test]
    fn hidden_fields_of_other_variants_are_ignored() {
        let mut dialog = dialog_with_seed(VentKind::Circular);
        dialog.set(FieldId::VentWidth, FieldValue::Length(-3.0));
        assert!(read_spec(&dialog, &CountLimits::default()).is_ok());
    }

    #[test]
    fn wrong_value_kind_is_reported() {
        let mut dialog = dialog_with_seed(VentKind::Circular);
        dialog.set(FieldId::NumberAxial, FieldValue::Length(5.0));
        assert_eq!(
            read_spec(&dialog, &CountLimits::default()).unwrap_err(),
            InputError::WrongKind {
                field: FieldId::NumberAxial,
                expected: ValueKind::Integer,
                found: ValueKind::Length,
            }
        );
    }

    #[test]
    fn visibility_follows_selected_kind() {
        let mut dialog = initial_dialog(&CommandConfig::default());
        apply_visibility(&mut dialog, VentKind::Rectangular);
        for id in COMMON_FIELDS {
            assert!(dialog.is_visible(id));
        }
        assert!(dialog.is_visible(FieldId::Radius));
        assert!(!dialog.is_visible(FieldId::VentRadius));
        assert!(!dialog.is_visible(FieldId::FlowArea));
    }
}
