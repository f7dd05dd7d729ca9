use tracing::{debug, instrument};
use vent_kernel::{ComponentId, FaceId, KernelIntrospect};
use vent_types::geom;

use crate::types::VentError;

/// Outcome of a next-face lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextSurface {
    /// The terminating face.
    pub face: FaceId,
    /// Raw hits the ray cast returned.
    pub hits: usize,
    /// Whether the source face appeared among the hits and was dropped.
    pub skipped_source: bool,
}

/// Find the face an extrude started on `source` at `point` should end on.
///
/// Casts a ray from `point` against the outward normal of `source` and
/// returns the first hit that is not `source` itself. Faces are compared by
/// id, never by position: the ray starts on `source`, so it may or may not be
/// reported at distance zero. Fewer than two raw hits means there is no
/// opposing face.
#[instrument(skip(introspect))]
pub fn resolve_next_face(
    introspect: &dyn KernelIntrospect,
    component: ComponentId,
    point: [f64; 3],
    source: FaceId,
) -> Result<NextSurface, VentError> {
    let normal = introspect.normal_at(source, point)?;
    let direction = geom::normalize(geom::scale(normal, -1.0)).ok_or_else(|| {
        VentError::Unterminated {
            reason: format!("face {} has no usable normal at the seed point", source.0),
        }
    })?;

    let hits = introspect.ray_hits(component, point, direction);
    if hits.len() < 2 {
        return Err(VentError::Unterminated {
            reason: format!("ray found {} face(s), no opposing face", hits.len()),
        });
    }

    let skipped_source = hits.contains(&source);
    let face = hits
        .iter()
        .copied()
        .find(|f| *f != source)
        .ok_or_else(|| VentError::Unterminated {
            reason: "ray only hit the source face".to_string(),
        })?;

    debug!(?face, hits = hits.len(), skipped_source, "resolved next face");
    Ok(NextSurface {
        face,
        hits: hits.len(),
        skipped_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vent_kernel::{MockKernel, SurfaceKind};

    #[test]
    fn slab_top_resolves_to_bottom() {
        let mut kernel = MockKernel::new();
        let root = kernel.root_component();
        let slab = kernel.add_box(root, [-5.0, -5.0, 0.0], [5.0, 5.0, 1.0]);
        let next = resolve_next_face(&kernel, root, [0.0, 0.0, 1.0], slab.top).unwrap();
        assert_eq!(next.face, slab.bottom);
        assert!(next.skipped_source);
    }

    #[test]
    fn lone_sheet_is_unterminated() {
        let mut kernel = MockKernel::new();
        let root = kernel.root_component();
        let (_, face) = kernel.add_sheet(
            root,
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [2.0, 2.0],
            SurfaceKind::Planar,
        );
        let err = resolve_next_face(&kernel, root, [0.0, 0.0, 0.0], face).unwrap_err();
        assert!(matches!(err, VentError::Unterminated { .. }));
    }
}
