//! Parameter checks that run before any geometry is created.

use vent_types::{CircularVent, RectangularVent, SlotVent, VentSpec};

use crate::types::{GridLayout, VentError};

const EPS: f64 = 1e-9;

fn positive(name: &str, value: f64) -> Result<(), VentError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VentError::degenerate(format!("{name} must be positive, got {value}")))
    }
}

fn at_least_one(name: &str, value: u32) -> Result<(), VentError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(VentError::degenerate(format!("{name} must be at least 1")))
    }
}

/// Check a vent definition without touching the kernel.
pub fn validate_spec(spec: &VentSpec) -> Result<(), VentError> {
    match spec {
        VentSpec::Circular(c) => validate_circular(c),
        VentSpec::Slot(s) => slot_layout(s).map(|_| ()),
        VentSpec::Rectangular(r) => rectangular_layout(r).map(|_| ()),
    }
}

pub fn validate_circular(spec: &CircularVent) -> Result<(), VentError> {
    positive("vent radius", spec.radius)?;
    positive("border", spec.border)?;
    at_least_one("spoke count", spec.axial_count)?;
    at_least_one("ring count", spec.radial_count)?;

    let ring_step = spec.radius / f64::from(spec.radial_count);
    if spec.border >= ring_step {
        return Err(VentError::degenerate(format!(
            "border {} closes the {ring_step:.4} gap between rings",
            spec.border
        )));
    }
    Ok(())
}

/// Layout of a slot grid. The fillet radius is half the smaller cell side.
pub fn slot_layout(spec: &SlotVent) -> Result<GridLayout, VentError> {
    let mut layout = grid(spec.width, spec.height, spec.border, spec.cols, spec.rows)?;
    layout.fillet_radius = layout.cell_width.min(layout.cell_height) / 2.0;
    Ok(layout)
}

/// Layout of a rounded-rectangle grid with an explicit corner radius.
pub fn rectangular_layout(spec: &RectangularVent) -> Result<GridLayout, VentError> {
    let mut layout = grid(spec.width, spec.height, spec.border, spec.cols, spec.rows)?;
    let r = spec.corner_radius;
    if !r.is_finite() || r < 0.0 {
        return Err(VentError::degenerate(format!(
            "corner radius must be zero or positive, got {r}"
        )));
    }
    let limit = layout.cell_width.min(layout.cell_height) / 2.0;
    if r > limit + EPS {
        return Err(VentError::degenerate(format!(
            "corner radius {r} exceeds half the cell size ({limit:.4})"
        )));
    }
    layout.fillet_radius = r;
    Ok(layout)
}

/// Layout of either grid variant. `None` for hub-and-spoke.
pub fn grid_layout(spec: &VentSpec) -> Option<Result<GridLayout, VentError>> {
    match spec {
        VentSpec::Circular(_) => None,
        VentSpec::Slot(s) => Some(slot_layout(s)),
        VentSpec::Rectangular(r) => Some(rectangular_layout(r)),
    }
}

fn grid(width: f64, height: f64, border: f64, cols: u32, rows: u32) -> Result<GridLayout, VentError> {
    positive("width", width)?;
    positive("height", height)?;
    positive("border", border)?;
    at_least_one("columns", cols)?;
    at_least_one("rows", rows)?;

    let cell_width = (width - (f64::from(cols) + 1.0) * border) / f64::from(cols);
    let cell_height = (height - (f64::from(rows) + 1.0) * border) / f64::from(rows);
    if cell_width <= EPS || cell_height <= EPS {
        return Err(VentError::degenerate(format!(
            "borders leave no room for cells ({cell_width:.4} x {cell_height:.4})"
        )));
    }

    Ok(GridLayout {
        width,
        height,
        border,
        cols,
        rows,
        cell_width,
        cell_height,
        x_pitch: cell_width + border,
        y_pitch: cell_height + border,
        fillet_radius: 0.0,
    })
}
