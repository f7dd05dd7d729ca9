use std::f64::consts::{FRAC_PI_2, TAU};

use tracing::{debug, info, instrument};
use vent_kernel::{CurveEnd, CurveId, Extent, ExtrudeInput, KernelError, ProfileId};
use vent_types::{geom, CircularVent, SeedPoint, VentKind};

use crate::combine::{nest_in_cavity, run_steps};
use crate::kernel_ext::KernelBundle;
use crate::next_surface::resolve_next_face;
use crate::sketch::{create_vent_sketch, SketchSession};
use crate::types::{Diagnostics, VentError, VentReport};

/// Cut a circular opening and join a hub-and-spoke grille back into it.
///
/// 1. A boundary circle is extruded to the next face as its own body; the
///    far cap of that body is the sink face.
/// 2. A second sketch gets `axial_count` spokes and `radial_count - 1`
///    rings, each one an open profile.
/// 3. The open profiles are surface-extruded to the sink face and every
///    resulting face is thickened symmetrically by `border`.
/// 4. The boundary body is cut from the host, then the thickened bodies are
///    joined into the cavity.
#[instrument(skip(kb, spec), fields(spokes = spec.axial_count, rings = spec.radial_count))]
pub fn hub_spoke_vent(
    kb: &mut dyn KernelBundle,
    spec: &CircularVent,
    seed: &SeedPoint,
) -> Result<VentReport, VentError> {
    let mut diag = Diagnostics::default();

    let boundary = diag.timed("boundary sketch", || create_vent_sketch(kb, seed))?;
    let boundary_circle = kb.add_circle(boundary.sketch, boundary.center.local, spec.radius)?;
    let boundary_profile = kb
        .sketch_profiles(boundary.sketch)?
        .first()
        .copied()
        .ok_or_else(|| missing("boundary sketch has no closed profile"))?;

    let next = resolve_next_face(
        kb.as_introspect(),
        boundary.component,
        boundary.center.world,
        boundary.host_face,
    )?;
    let boundary_extrude = diag.timed("boundary extrude", || {
        kb.extrude(&ExtrudeInput::new_body(
            vec![boundary_profile],
            Extent::ToFace(next.face),
        ))
    })?;
    let sink_face = boundary_extrude
        .end_faces
        .first()
        .copied()
        .ok_or_else(|| missing("boundary extrude has no end face"))?;

    // The boundary body's start cap also contains the seed point now.
    let hub_seed = seed.clone().on_face(boundary.host_face);
    let hub = diag.timed("spoke sketch", || create_vent_sketch(kb, &hub_seed))?;
    let profiles = diag.timed("spokes", || draw_spokes(kb, &hub, spec, boundary_circle))?;

    let surface = diag.timed("surface extrude", || {
        kb.extrude(&ExtrudeInput::surface(profiles, Extent::ToFace(sink_face)))
    })?;
    let thickened = diag.timed("thicken", || -> Result<Vec<_>, VentError> {
        let mut bodies = Vec::with_capacity(surface.faces.len());
        for face in &surface.faces {
            bodies.extend(kb.thicken(&[*face], spec.border, true)?);
        }
        Ok(bodies)
    })?;
    debug!(faces = surface.faces.len(), bodies = thickened.len(), "spokes thickened");

    let steps = nest_in_cavity(boundary.target_body, boundary_extrude.bodies, thickened);
    let tally = diag.timed("combine", || run_steps(kb, &steps))?;

    info!(cut = tally.cut, joined = tally.joined, "hub-and-spoke vent built");

    Ok(VentReport {
        kind: VentKind::Circular,
        target: boundary.target_body,
        host_face: boundary.host_face,
        terminating_face: next.face,
        sketches: vec![boundary.sketch, hub.sketch],
        bodies_cut: tally.cut,
        bodies_joined: tally.joined,
        flow_area: None,
        grid: None,
        diagnostics: diag,
    })
}

/// Draw spokes and rings around the hub center, constrained to the projected
/// boundary so the pattern stays re-solvable. Returns one open profile per
/// spoke and ring.
fn draw_spokes(
    kb: &mut dyn KernelBundle,
    hub: &SketchSession,
    spec: &CircularVent,
    boundary_circle: CurveId,
) -> Result<Vec<ProfileId>, VentError> {
    let sketch = hub.sketch;
    let center = hub.center.local;
    let radius = spec.radius;
    let boundary = kb.project_curve(sketch, boundary_circle)?;

    let mut profiles = Vec::new();
    let mut previous: Option<CurveId> = None;
    for i in 0..spec.axial_count {
        let angle = f64::from(i) * TAU / f64::from(spec.axial_count) + FRAC_PI_2;
        let end = match i {
            0 => [center[0], center[1] + radius],
            _ => geom::polar(center, radius, angle),
        };
        let spoke = kb.add_line(sketch, center, end)?;
        kb.add_coincident(sketch, spoke, CurveEnd::End, boundary)?;
        match previous {
            None => kb.add_vertical(sketch, spoke)?,
            Some(prev) => kb.add_angular_dimension(
                sketch,
                prev,
                spoke,
                geom::polar(center, 1.5 * radius, angle / 2.0),
            )?,
        }
        profiles.push(kb.create_open_profile(spoke)?);
        previous = Some(spoke);
    }

    for j in 1..spec.radial_count {
        let step = f64::from(j) * radius / f64::from(spec.radial_count);
        let ring = kb.add_circle(sketch, center, step)?;
        kb.add_radial_dimension(sketch, ring, [center[0], center[1] + step])?;
        profiles.push(kb.create_open_profile(ring)?);
    }

    kb.set_construction(sketch, boundary, true)?;
    Ok(profiles)
}

fn missing(message: &str) -> VentError {
    VentError::Unexpected(KernelError::Other {
        message: message.to_string(),
    })
}
