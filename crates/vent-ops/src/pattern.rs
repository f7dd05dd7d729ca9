use tracing::{debug, instrument};
use vent_kernel::{BodyId, ComponentId};
use vent_types::geom::{self, Vec3};

use crate::kernel_ext::KernelBundle;
use crate::types::VentError;

/// A cols x rows grid of translations in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPattern {
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub cols: u32,
    pub x_pitch: f64,
    pub rows: u32,
    pub y_pitch: f64,
}

/// Bodies produced by [`replicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replicated {
    /// Originals first, then copies in row-major order.
    pub bodies: Vec<BodyId>,
    /// Copy-and-translate operations issued to the kernel.
    pub copy_operations: usize,
}

/// Replicate `bodies` across a grid in two linear passes.
///
/// Pass one copies the original set `cols - 1` times along `x_axis`, giving a
/// full row. Pass two copies that whole row `rows - 1` times along `y_axis`.
/// Each copy is one kernel copy of a body set plus one rigid translation.
#[instrument(skip(kb, bodies), fields(bodies = bodies.len()))]
pub fn replicate(
    kb: &mut dyn KernelBundle,
    component: ComponentId,
    bodies: &[BodyId],
    pattern: &GridPattern,
) -> Result<Replicated, VentError> {
    if pattern.cols == 0 || pattern.rows == 0 {
        return Err(VentError::degenerate(format!(
            "cannot replicate into a {} x {} grid",
            pattern.cols, pattern.rows
        )));
    }
    if bodies.is_empty() {
        return Ok(Replicated {
            bodies: Vec::new(),
            copy_operations: 0,
        });
    }

    let mut copy_operations = 0;
    let mut row = bodies.to_vec();
    for i in 1..pattern.cols {
        let offset = geom::scale(pattern.x_axis, f64::from(i) * pattern.x_pitch);
        row.extend(copy_translated(kb, component, bodies, offset)?);
        copy_operations += 1;
    }
    debug!(row = row.len(), "first pass complete");

    let mut all = row.clone();
    for j in 1..pattern.rows {
        let offset = geom::scale(pattern.y_axis, f64::from(j) * pattern.y_pitch);
        all.extend(copy_translated(kb, component, &row, offset)?);
        copy_operations += 1;
    }
    debug!(total = all.len(), copy_operations, "second pass complete");

    Ok(Replicated {
        bodies: all,
        copy_operations,
    })
}

fn copy_translated(
    kb: &mut dyn KernelBundle,
    component: ComponentId,
    bodies: &[BodyId],
    offset: Vec3,
) -> Result<Vec<BodyId>, VentError> {
    let copies = kb.copy_bodies(bodies, component)?;
    kb.translate_bodies(&copies, offset)?;
    Ok(copies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vent_kernel::MockKernel;

    fn unit_grid(cols: u32, rows: u32) -> GridPattern {
        GridPattern {
            x_axis: [1.0, 0.0, 0.0],
            y_axis: [0.0, 1.0, 0.0],
            cols,
            x_pitch: 2.0,
            rows,
            y_pitch: 3.0,
        }
    }

    #[test]
    fn single_cell_issues_no_copies() {
        let mut kernel = MockKernel::new();
        let root = kernel.root_component();
        let b = kernel.add_box(root, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let out = replicate(&mut kernel, root, &[b.body], &unit_grid(1, 1)).unwrap();
        assert_eq!(out.bodies, vec![b.body]);
        assert_eq!(out.copy_operations, 0);
        assert_eq!(kernel.stats().copy_calls, 0);
    }

    #[test]
    fn zero_rows_is_degenerate() {
        let mut kernel = MockKernel::new();
        let root = kernel.root_component();
        let b = kernel.add_box(root, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let err = replicate(&mut kernel, root, &[b.body], &unit_grid(2, 0)).unwrap_err();
        assert!(matches!(err, VentError::DegenerateParameters { .. }));
    }
}
