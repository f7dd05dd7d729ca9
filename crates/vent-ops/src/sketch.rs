use tracing::{debug, instrument};
use vent_kernel::{
    BodyId, ComponentId, FaceId, KernelError, KernelIntrospect, SketchId, SketchPoint, SurfaceKind,
};
use vent_types::SeedPoint;

use crate::kernel_ext::KernelBundle;
use crate::types::VentError;

/// A sketch opened on the host face with the seed point projected into it.
/// Lives for one build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchSession {
    pub sketch: SketchId,
    /// The seed point in sketch and world coordinates.
    pub center: SketchPoint,
    pub component: ComponentId,
    pub host_face: FaceId,
    /// Body owning the host face; the vent is combined into it.
    pub target_body: BodyId,
}

/// The planar face the seed point lies on.
///
/// A face hint on the seed wins when the point really lies on it. Otherwise
/// exactly one face must contain the point.
pub fn resolve_host_face(
    introspect: &dyn KernelIntrospect,
    seed: &SeedPoint,
) -> Result<FaceId, VentError> {
    let candidates = introspect.faces_at_point(seed.component, seed.position);
    let face = match seed.face {
        Some(hint) if candidates.contains(&hint) => hint,
        _ => match candidates.as_slice() {
            [only] => *only,
            [] => {
                return Err(VentError::NoHostFace {
                    reason: "no face contains the point".to_string(),
                })
            }
            many => {
                return Err(VentError::NoHostFace {
                    reason: format!("the point lies on {} faces", many.len()),
                })
            }
        },
    };

    match introspect.surface_kind(face)? {
        SurfaceKind::Planar => Ok(face),
        other => Err(VentError::NoHostFace {
            reason: format!("face {} is {other:?}, not planar", face.0),
        }),
    }
}

/// Open a sketch on the face under the seed point.
///
/// Projected face edges are turned into construction geometry so the only
/// profiles the sketch offers are the ones the build draws.
#[instrument(skip(kb))]
pub fn create_vent_sketch(
    kb: &mut dyn KernelBundle,
    seed: &SeedPoint,
) -> Result<SketchSession, VentError> {
    let host_face = resolve_host_face(kb.as_introspect(), seed)?;
    let sketch = kb.create_sketch(host_face).map_err(|e| match e {
        KernelError::NotPlanar { face } => VentError::NoHostFace {
            reason: format!("cannot sketch on face {}", face.0),
        },
        other => other.into(),
    })?;

    let projected = kb.sketch_curves(sketch)?;
    for curve in &projected {
        kb.set_construction(sketch, *curve, true)?;
    }
    let center = kb.project_point(sketch, seed.position)?;
    let target_body = kb.face_body(host_face)?;

    debug!(?sketch, ?host_face, construction = projected.len(), "vent sketch ready");
    Ok(SketchSession {
        sketch,
        center,
        component: seed.component,
        host_face,
        target_body,
    })
}
