//! MockKernel: deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Keeps a small in-memory document: bounded planar faces, sketches with
//! closed loops, solid and surface bodies. Every mutation is appended to a
//! transaction log holding the document as it was, so `undo_to` can restore
//! any earlier marker. Call counters, a combine log and fault injection let
//! tests observe and perturb what the engine asks of the kernel.

use std::collections::BTreeMap;

use tracing::debug;
use vent_types::geom::{self, Vec3};

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Kernel entry points that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelCall {
    CreateSketch,
    SketchEdit,
    Extrude,
    CopyBodies,
    TranslateBodies,
    Thicken,
    Combine,
}

impl KernelCall {
    fn name(self) -> &'static str {
        match self {
            KernelCall::CreateSketch => "create_sketch",
            KernelCall::SketchEdit => "sketch_edit",
            KernelCall::Extrude => "extrude",
            KernelCall::CopyBodies => "copy_bodies",
            KernelCall::TranslateBodies => "translate_bodies",
            KernelCall::Thicken => "thicken",
            KernelCall::Combine => "combine",
        }
    }
}

/// How many times each capability was successfully invoked.
/// Not part of the document: survives undo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStats {
    pub sketches: usize,
    pub sketch_edits: usize,
    pub extrudes: usize,
    pub copy_calls: usize,
    pub translate_calls: usize,
    pub thicken_calls: usize,
    pub combine_calls: usize,
    pub group_calls: usize,
    pub undo_calls: usize,
}

/// One boolean combine as it was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineRecord {
    pub target: BodyId,
    pub tools: Vec<BodyId>,
    pub op: CombineOp,
}

/// Observable state of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySummary {
    pub solid: bool,
    pub faces: usize,
    /// Tool bodies cut from this body so far.
    pub cut_tools: usize,
    /// Tool bodies joined into this body so far.
    pub joined_tools: usize,
}

/// Entity counts of a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SketchSummary {
    /// Non-construction lines.
    pub lines: usize,
    /// Non-construction circles.
    pub circles: usize,
    pub arcs: usize,
    pub construction: usize,
    pub constraints: usize,
    pub dimensions: usize,
    /// Closed profiles currently offered by the sketch.
    pub profiles: usize,
}

/// Ids of a box body created by [`MockKernel::add_box`].
#[derive(Debug, Clone, Copy)]
pub struct MockBox {
    pub body: BodyId,
    pub bottom: FaceId,
    pub top: FaceId,
    pub front: FaceId,
    pub back: FaceId,
    pub left: FaceId,
    pub right: FaceId,
}

/// A face bounded by a rectangle around `origin`. Non-planar faces keep a
/// representative plane but never take part in ray casting.
#[derive(Debug, Clone)]
struct MockFace {
    body: BodyId,
    kind: SurfaceKind,
    origin: Vec3,
    normal: Vec3,
    u_axis: Vec3,
    half: [f64; 2],
}

impl MockFace {
    fn v_axis(&self) -> Vec3 {
        geom::cross(self.normal, self.u_axis)
    }

    fn within_bounds(&self, p: Vec3, tol: f64) -> bool {
        let d = geom::sub(p, self.origin);
        geom::dot(d, self.u_axis).abs() <= self.half[0] + tol
            && geom::dot(d, self.v_axis()).abs() <= self.half[1] + tol
    }

    fn contains(&self, p: Vec3, tol: f64) -> bool {
        let d = geom::sub(p, self.origin);
        geom::dot(d, self.normal).abs() <= tol && self.within_bounds(p, tol)
    }
}

#[derive(Debug, Clone)]
struct MockBody {
    component: ComponentId,
    solid: bool,
    faces: Vec<FaceId>,
    cut_tools: usize,
    joined_tools: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CurveGeometry {
    Line { start: [f64; 2], end: [f64; 2] },
    Circle { center: [f64; 2], radius: f64 },
    Arc { center: [f64; 2], radius: f64 },
}

#[derive(Debug, Clone)]
struct MockCurve {
    sketch: SketchId,
    geometry: CurveGeometry,
    construction: bool,
}

#[derive(Debug, Clone)]
enum LoopShape {
    Rectangle {
        center: [f64; 2],
        half: [f64; 2],
        /// Fillet radius per corner; corner i joins line i and line i+1.
        fillets: [Option<f64>; 4],
    },
    Circle {
        center: [f64; 2],
        radius: f64,
    },
}

/// A closed loop of curves and the profile that represents its region.
#[derive(Debug, Clone)]
struct MockLoop {
    curves: Vec<CurveId>,
    shape: LoopShape,
    profile: ProfileId,
}

#[derive(Debug, Clone)]
struct MockSketch {
    face: FaceId,
    component: ComponentId,
    axes: SketchAxes,
    curves: Vec<CurveId>,
    points: usize,
    loops: Vec<MockLoop>,
    constraints: usize,
    dimensions: usize,
}

impl MockSketch {
    fn to_local(&self, p: Vec3) -> [f64; 2] {
        let d = geom::sub(p, self.axes.origin);
        [
            geom::dot(d, self.axes.x_direction),
            geom::dot(d, self.axes.y_direction),
        ]
    }

    fn to_world(&self, p: [f64; 2]) -> Vec3 {
        geom::add(
            self.axes.origin,
            geom::add(
                geom::scale(self.axes.x_direction, p[0]),
                geom::scale(self.axes.y_direction, p[1]),
            ),
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum MockProfile {
    Closed { sketch: SketchId, loop_index: usize },
    Open { sketch: SketchId, curve: CurveId },
}

/// Sketch-space outline of a profile.
#[derive(Debug, Clone, Copy)]
enum ProfileShape {
    Rect { center: [f64; 2], half: [f64; 2] },
    Circle { center: [f64; 2], radius: f64 },
    Segment { start: [f64; 2], end: [f64; 2] },
}

impl ProfileShape {
    fn footprint(&self) -> Vec<[f64; 2]> {
        match *self {
            ProfileShape::Rect { center, half } => corners(center, half),
            ProfileShape::Circle { center, radius } => corners(center, [radius, radius]),
            ProfileShape::Segment { start, end } => vec![start, end],
        }
    }

    fn center(&self) -> [f64; 2] {
        match *self {
            ProfileShape::Rect { center, .. } | ProfileShape::Circle { center, .. } => center,
            ProfileShape::Segment { start, end } => {
                [(start[0] + end[0]) / 2.0, (start[1] + end[1]) / 2.0]
            }
        }
    }

    fn half_extents(&self) -> [f64; 2] {
        match *self {
            ProfileShape::Rect { half, .. } => half,
            ProfileShape::Circle { radius, .. } => [radius, radius],
            ProfileShape::Segment { start, end } => [geom::distance2(start, end) / 2.0, 0.0],
        }
    }

    /// Number of side faces an extrude of this outline produces.
    fn side_count(&self, fillets: usize) -> usize {
        match self {
            ProfileShape::Rect { .. } => 4 + fillets,
            ProfileShape::Circle { .. } | ProfileShape::Segment { .. } => 1,
        }
    }
}

fn corners(center: [f64; 2], half: [f64; 2]) -> Vec<[f64; 2]> {
    vec![
        [center[0] - half[0], center[1] - half[1]],
        [center[0] + half[0], center[1] - half[1]],
        [center[0] + half[0], center[1] + half[1]],
        [center[0] - half[0], center[1] + half[1]],
    ]
}

#[derive(Debug, Clone, Default)]
struct MockDocument {
    bodies: BTreeMap<BodyId, MockBody>,
    faces: BTreeMap<FaceId, MockFace>,
    sketches: BTreeMap<SketchId, MockSketch>,
    curves: BTreeMap<CurveId, MockCurve>,
    profiles: BTreeMap<ProfileId, MockProfile>,
}

#[derive(Debug, Clone)]
struct TimelineEntry {
    label: &'static str,
    before: MockDocument,
}

#[derive(Debug, Clone)]
struct Fault {
    call: KernelCall,
    countdown: usize,
}

/// Deterministic test double for the host kernel and document.
/// Implements both Kernel and KernelIntrospect.
pub struct MockKernel {
    next_id: u64,
    tolerance: f64,
    doc: MockDocument,
    history: Vec<TimelineEntry>,
    groups: Vec<(TimelineMarker, TimelineMarker)>,
    stats: CallStats,
    combine_log: Vec<CombineRecord>,
    faults: Vec<Fault>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            tolerance: DEFAULT_TOLERANCE,
            doc: MockDocument::default(),
            history: Vec::new(),
            groups: Vec::new(),
            stats: CallStats::default(),
            combine_log: Vec::new(),
            faults: Vec::new(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// The component every fixture is built in.
    pub fn root_component(&self) -> ComponentId {
        ComponentId(0)
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a transaction log entry holding the document as it is now.
    /// Call after validation, right before mutating.
    fn record(&mut self, label: &'static str) {
        self.history.push(TimelineEntry {
            label,
            before: self.doc.clone(),
        });
    }

    fn check_fault(&mut self, call: KernelCall) -> Result<(), KernelError> {
        let mut fire = None;
        for (i, fault) in self.faults.iter_mut().enumerate() {
            if fault.call == call {
                fault.countdown = fault.countdown.saturating_sub(1);
                if fault.countdown == 0 && fire.is_none() {
                    fire = Some(i);
                }
            }
        }
        match fire {
            Some(i) => {
                self.faults.remove(i);
                Err(KernelError::Injected {
                    call: call.name().to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// Make the `nth` (1-based) upcoming call of `call` fail once.
    pub fn fail_on(&mut self, call: KernelCall, nth: usize) {
        self.faults.push(Fault {
            call,
            countdown: nth.max(1),
        });
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    // ── Fixtures ────────────────────────────────────────────────────────

    /// Axis-aligned solid box between `min` and `max`.
    pub fn add_box(&mut self, component: ComponentId, min: Vec3, max: Vec3) -> MockBox {
        let body = BodyId(self.alloc());
        let c = [
            (min[0] + max[0]) / 2.0,
            (min[1] + max[1]) / 2.0,
            (min[2] + max[2]) / 2.0,
        ];
        let h = [
            (max[0] - min[0]) / 2.0,
            (max[1] - min[1]) / 2.0,
            (max[2] - min[2]) / 2.0,
        ];
        let x = [1.0, 0.0, 0.0];
        let y = [0.0, 1.0, 0.0];
        // (origin, normal, u_axis, half)
        let defs = [
            ([c[0], c[1], min[2]], [0.0, 0.0, -1.0], x, [h[0], h[1]]),
            ([c[0], c[1], max[2]], [0.0, 0.0, 1.0], x, [h[0], h[1]]),
            ([c[0], min[1], c[2]], [0.0, -1.0, 0.0], x, [h[0], h[2]]),
            ([c[0], max[1], c[2]], [0.0, 1.0, 0.0], x, [h[0], h[2]]),
            ([min[0], c[1], c[2]], [-1.0, 0.0, 0.0], y, [h[1], h[2]]),
            ([max[0], c[1], c[2]], [1.0, 0.0, 0.0], y, [h[1], h[2]]),
        ];
        let faces: Vec<(FaceId, MockFace)> = defs
            .into_iter()
            .map(|(origin, normal, u_axis, half)| {
                (
                    FaceId(self.alloc()),
                    MockFace {
                        body,
                        kind: SurfaceKind::Planar,
                        origin,
                        normal,
                        u_axis,
                        half,
                    },
                )
            })
            .collect();

        self.record("add box");
        let ids: Vec<FaceId> = faces.iter().map(|(id, _)| *id).collect();
        self.insert_body(body, component, true, faces);

        MockBox {
            body,
            bottom: ids[0],
            top: ids[1],
            front: ids[2],
            back: ids[3],
            left: ids[4],
            right: ids[5],
        }
    }

    /// Single-face surface body.
    pub fn add_sheet(
        &mut self,
        component: ComponentId,
        center: Vec3,
        normal: Vec3,
        u_axis: Vec3,
        half: [f64; 2],
        kind: SurfaceKind,
    ) -> (BodyId, FaceId) {
        let body = BodyId(self.alloc());
        let face = FaceId(self.alloc());
        let normal = geom::normalize(normal).unwrap_or([0.0, 0.0, 1.0]);
        let u_axis = geom::normalize(u_axis).unwrap_or([1.0, 0.0, 0.0]);
        self.record("add sheet");
        self.insert_body(
            body,
            component,
            false,
            vec![(
                face,
                MockFace {
                    body,
                    kind,
                    origin: center,
                    normal,
                    u_axis,
                    half,
                },
            )],
        );
        (body, face)
    }

    fn insert_body(
        &mut self,
        id: BodyId,
        component: ComponentId,
        solid: bool,
        faces: Vec<(FaceId, MockFace)>,
    ) {
        let face_ids = faces.iter().map(|(id, _)| *id).collect();
        self.doc.faces.extend(faces);
        self.doc.bodies.insert(
            id,
            MockBody {
                component,
                solid,
                faces: face_ids,
                cut_tools: 0,
                joined_tools: 0,
            },
        );
    }

    fn remove_body(&mut self, id: BodyId) {
        if let Some(body) = self.doc.bodies.remove(&id) {
            for face in body.faces {
                self.doc.faces.remove(&face);
            }
        }
    }

    // ── Observation ─────────────────────────────────────────────────────

    pub fn stats(&self) -> &CallStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CallStats::default();
        self.combine_log.clear();
    }

    pub fn combine_log(&self) -> &[CombineRecord] {
        &self.combine_log
    }

    pub fn body_count(&self) -> usize {
        self.doc.bodies.len()
    }

    pub fn solid_body_count(&self) -> usize {
        self.doc.bodies.values().filter(|b| b.solid).count()
    }

    pub fn bodies(&self) -> Vec<BodyId> {
        self.doc.bodies.keys().copied().collect()
    }

    pub fn contains_body(&self, body: BodyId) -> bool {
        self.doc.bodies.contains_key(&body)
    }

    pub fn body_summary(&self, body: BodyId) -> Option<BodySummary> {
        self.doc.bodies.get(&body).map(|b| BodySummary {
            solid: b.solid,
            faces: b.faces.len(),
            cut_tools: b.cut_tools,
            joined_tools: b.joined_tools,
        })
    }

    pub fn sketch_count(&self) -> usize {
        self.doc.sketches.len()
    }

    pub fn sketches(&self) -> Vec<SketchId> {
        self.doc.sketches.keys().copied().collect()
    }

    pub fn sketch_summary(&self, sketch: SketchId) -> Option<SketchSummary> {
        let s = self.doc.sketches.get(&sketch)?;
        let mut summary = SketchSummary {
            constraints: s.constraints,
            dimensions: s.dimensions,
            profiles: self.closed_profiles(s).len(),
            ..SketchSummary::default()
        };
        for curve in s.curves.iter().filter_map(|c| self.doc.curves.get(c)) {
            if curve.construction {
                summary.construction += 1;
                continue;
            }
            match curve.geometry {
                CurveGeometry::Line { .. } => summary.lines += 1,
                CurveGeometry::Circle { .. } => summary.circles += 1,
                CurveGeometry::Arc { .. } => summary.arcs += 1,
            }
        }
        Some(summary)
    }

    /// World-space center of the face's bounding rectangle.
    pub fn face_origin(&self, face: FaceId) -> Option<Vec3> {
        self.doc.faces.get(&face).map(|f| f.origin)
    }

    pub fn timeline_len(&self) -> usize {
        self.history.len()
    }

    pub fn timeline_labels(&self) -> Vec<&'static str> {
        self.history.iter().map(|e| e.label).collect()
    }

    pub fn groups(&self) -> &[(TimelineMarker, TimelineMarker)] {
        &self.groups
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn face(&self, id: FaceId) -> Result<&MockFace, KernelError> {
        self.doc
            .faces
            .get(&id)
            .ok_or_else(|| KernelError::not_found("face", id.0))
    }

    fn sketch(&self, id: SketchId) -> Result<&MockSketch, KernelError> {
        self.doc
            .sketches
            .get(&id)
            .ok_or_else(|| KernelError::not_found("sketch", id.0))
    }

    fn curve(&self, id: CurveId) -> Result<&MockCurve, KernelError> {
        self.doc
            .curves
            .get(&id)
            .ok_or_else(|| KernelError::not_found("curve", id.0))
    }

    fn curve_in(&self, sketch: SketchId, id: CurveId) -> Result<&MockCurve, KernelError> {
        let curve = self.curve(id)?;
        if curve.sketch != sketch {
            return Err(KernelError::Other {
                message: format!("curve {} does not belong to sketch {}", id.0, sketch.0),
            });
        }
        Ok(curve)
    }

    fn line_in(&self, sketch: SketchId, id: CurveId) -> Result<([f64; 2], [f64; 2]), KernelError> {
        match self.curve_in(sketch, id)?.geometry {
            CurveGeometry::Line { start, end } => Ok((start, end)),
            _ => Err(KernelError::ConstraintFailed {
                reason: format!("curve {} is not a line", id.0),
            }),
        }
    }

    fn closed_profiles(&self, sketch: &MockSketch) -> Vec<ProfileId> {
        sketch
            .loops
            .iter()
            .filter(|l| {
                l.curves
                    .iter()
                    .all(|c| self.doc.curves.get(c).is_some_and(|c| !c.construction))
            })
            .map(|l| l.profile)
            .collect()
    }

    fn loop_of(&self, profile: MockProfile) -> Result<&MockLoop, KernelError> {
        match profile {
            MockProfile::Closed { sketch, loop_index } => self
                .sketch(sketch)?
                .loops
                .get(loop_index)
                .ok_or_else(|| KernelError::not_found("loop", loop_index as u64)),
            MockProfile::Open { curve, .. } => Err(KernelError::NotSupported {
                operation: format!("closed-loop query on open profile of curve {}", curve.0),
            }),
        }
    }

    fn profile_shape(&self, profile: MockProfile) -> Result<(SketchId, ProfileShape, usize), KernelError> {
        match profile {
            MockProfile::Closed { sketch, .. } => {
                let shape = match &self.loop_of(profile)?.shape {
                    LoopShape::Rectangle {
                        center,
                        half,
                        fillets,
                    } => (
                        ProfileShape::Rect {
                            center: *center,
                            half: *half,
                        },
                        fillets.iter().flatten().count(),
                    ),
                    LoopShape::Circle { center, radius } => (
                        ProfileShape::Circle {
                            center: *center,
                            radius: *radius,
                        },
                        0,
                    ),
                };
                Ok((sketch, shape.0, shape.1))
            }
            MockProfile::Open { sketch, curve } => {
                let shape = match self.curve(curve)?.geometry {
                    CurveGeometry::Line { start, end } => ProfileShape::Segment { start, end },
                    CurveGeometry::Circle { center, radius }
                    | CurveGeometry::Arc { center, radius } => {
                        ProfileShape::Circle { center, radius }
                    }
                };
                Ok((sketch, shape, 0))
            }
        }
    }

    /// World offset from the sketch plane to where the extrude ends.
    fn extrude_offset(
        &self,
        sketch: &MockSketch,
        shapes: &[(ProfileShape, usize)],
        extent: Extent,
    ) -> Result<Vec3, KernelError> {
        let tol = self.tolerance;
        let n = sketch.axes.normal;
        match extent {
            Extent::ToFace(face_id) => {
                let target = self.face(face_id)?;
                if target.kind != SurfaceKind::Planar {
                    return Err(KernelError::NotPlanar { face: face_id });
                }
                let denom = geom::dot(n, target.normal);
                if denom.abs() < 1e-9 {
                    return Err(KernelError::ExtentNotReached {
                        reason: format!("face {} is parallel to the extrude direction", face_id.0),
                    });
                }
                let distance_from = |p: Vec3| geom::dot(geom::sub(target.origin, p), target.normal) / denom;

                for (shape, _) in shapes {
                    for corner in shape.footprint() {
                        let p = sketch.to_world(corner);
                        let s = distance_from(p);
                        let q = geom::add(p, geom::scale(n, s));
                        if s.abs() <= tol || !target.within_bounds(q, tol) {
                            return Err(KernelError::ExtentNotReached {
                                reason: format!(
                                    "profile is not completely terminated by face {}",
                                    face_id.0
                                ),
                            });
                        }
                    }
                }
                let anchor = shapes
                    .first()
                    .map(|(shape, _)| sketch.to_world(shape.center()))
                    .unwrap_or(sketch.axes.origin);
                Ok(geom::scale(n, distance_from(anchor)))
            }
            Extent::ThroughAll => {
                let reverse = geom::scale(n, -1.0);
                let deepest = self
                    .doc
                    .faces
                    .values()
                    .filter(|f| f.kind == SurfaceKind::Planar)
                    .filter(|f| {
                        self.doc
                            .bodies
                            .get(&f.body)
                            .is_some_and(|b| b.component == sketch.component)
                    })
                    .filter_map(|f| {
                        let denom = geom::dot(reverse, f.normal);
                        if denom.abs() < 1e-9 {
                            return None;
                        }
                        let s = geom::dot(geom::sub(f.origin, sketch.axes.origin), f.normal) / denom;
                        (s > tol).then_some(s)
                    })
                    .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))));
                deepest
                    .map(|d| geom::scale(reverse, d))
                    .ok_or_else(|| KernelError::ExtentNotReached {
                        reason: "nothing to extrude through".to_string(),
                    })
            }
        }
    }

    fn solid_from_shape(
        &mut self,
        body: BodyId,
        sketch: &MockSketch,
        shape: &ProfileShape,
        fillets: usize,
        offset: Vec3,
    ) -> (Vec<(FaceId, MockFace)>, FaceId, FaceId) {
        let dir = geom::normalize(offset).unwrap_or(sketch.axes.normal);
        let start_origin = sketch.to_world(shape.center());
        let half = shape.half_extents();
        let u_axis = sketch.axes.x_direction;

        let start = FaceId(self.alloc());
        let end = FaceId(self.alloc());
        let mut faces = vec![
            (
                start,
                MockFace {
                    body,
                    kind: SurfaceKind::Planar,
                    origin: start_origin,
                    normal: geom::scale(dir, -1.0),
                    u_axis,
                    half,
                },
            ),
            (
                end,
                MockFace {
                    body,
                    kind: SurfaceKind::Planar,
                    origin: geom::add(start_origin, offset),
                    normal: dir,
                    u_axis,
                    half,
                },
            ),
        ];

        let mid = geom::add(start_origin, geom::scale(offset, 0.5));
        let side_kind = match shape {
            ProfileShape::Circle { .. } => SurfaceKind::Cylindrical,
            _ => SurfaceKind::Ruled,
        };
        for _ in 0..shape.side_count(fillets) {
            faces.push((
                FaceId(self.alloc()),
                MockFace {
                    body,
                    kind: side_kind,
                    origin: mid,
                    normal: u_axis,
                    u_axis: dir,
                    half: [geom::length(offset) / 2.0, half[0].max(half[1])],
                },
            ));
        }
        (faces, start, end)
    }

    fn wall_from_shape(
        &mut self,
        body: BodyId,
        sketch: &MockSketch,
        shape: &ProfileShape,
        offset: Vec3,
    ) -> (FaceId, MockFace) {
        let dir = geom::normalize(offset).unwrap_or(sketch.axes.normal);
        let depth_half = geom::length(offset) / 2.0;
        let mid = geom::add(sketch.to_world(shape.center()), geom::scale(offset, 0.5));
        let face = match *shape {
            ProfileShape::Segment { start, end } => {
                let along = geom::sub(sketch.to_world(end), sketch.to_world(start));
                let u_axis = geom::normalize(along).unwrap_or(sketch.axes.x_direction);
                let normal = geom::normalize(geom::cross(u_axis, dir)).unwrap_or(sketch.axes.y_direction);
                MockFace {
                    body,
                    kind: SurfaceKind::Planar,
                    origin: mid,
                    normal,
                    u_axis,
                    half: [geom::length(along) / 2.0, depth_half],
                }
            }
            ProfileShape::Circle { radius, .. } => MockFace {
                body,
                kind: SurfaceKind::Cylindrical,
                origin: mid,
                normal: dir,
                u_axis: sketch.axes.x_direction,
                half: [radius, radius],
            },
            ProfileShape::Rect { half, .. } => MockFace {
                body,
                kind: SurfaceKind::Ruled,
                origin: mid,
                normal: dir,
                u_axis: sketch.axes.x_direction,
                half,
            },
        };
        (FaceId(self.alloc()), face)
    }

    fn push_curve(&mut self, sketch: SketchId, geometry: CurveGeometry) -> CurveId {
        let id = CurveId(self.alloc());
        self.doc.curves.insert(
            id,
            MockCurve {
                sketch,
                geometry,
                construction: false,
            },
        );
        if let Some(s) = self.doc.sketches.get_mut(&sketch) {
            s.curves.push(id);
        }
        id
    }

    fn push_loop(&mut self, sketch: SketchId, curves: Vec<CurveId>, shape: LoopShape) -> ProfileId {
        let profile = ProfileId(self.alloc());
        let loop_index = match self.doc.sketches.get_mut(&sketch) {
            Some(s) => {
                s.loops.push(MockLoop {
                    curves,
                    shape,
                    profile,
                });
                s.loops.len() - 1
            }
            None => 0,
        };
        self.doc
            .profiles
            .insert(profile, MockProfile::Closed { sketch, loop_index });
        profile
    }

    fn sketch_edit(&mut self, sketch: SketchId, label: &'static str) -> Result<(), KernelError> {
        self.check_fault(KernelCall::SketchEdit)?;
        self.sketch(sketch)?;
        self.record(label);
        self.stats.sketch_edits += 1;
        Ok(())
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn create_sketch(&mut self, face: FaceId) -> Result<SketchId, KernelError> {
        self.check_fault(KernelCall::CreateSketch)?;
        let host = self.face(face)?.clone();
        if host.kind != SurfaceKind::Planar {
            return Err(KernelError::NotPlanar { face });
        }
        let component = self
            .doc
            .bodies
            .get(&host.body)
            .map(|b| b.component)
            .ok_or_else(|| KernelError::not_found("body", host.body.0))?;

        let id = SketchId(self.alloc());
        self.record("sketch");
        self.doc.sketches.insert(
            id,
            MockSketch {
                face,
                component,
                axes: SketchAxes {
                    origin: host.origin,
                    x_direction: host.u_axis,
                    y_direction: host.v_axis(),
                    normal: host.normal,
                },
                curves: Vec::new(),
                points: 0,
                loops: Vec::new(),
                constraints: 0,
                dimensions: 0,
            },
        );

        // Face edges come in as projected reference geometry.
        let half = host.half;
        let outline = corners([0.0, 0.0], half);
        let edges: Vec<CurveId> = (0..4)
            .map(|i| {
                self.push_curve(
                    id,
                    CurveGeometry::Line {
                        start: outline[i],
                        end: outline[(i + 1) % 4],
                    },
                )
            })
            .collect();
        self.push_loop(
            id,
            edges,
            LoopShape::Rectangle {
                center: [0.0, 0.0],
                half,
                fillets: [None; 4],
            },
        );

        self.stats.sketches += 1;
        Ok(id)
    }

    fn set_construction(
        &mut self,
        sketch: SketchId,
        curve: CurveId,
        construction: bool,
    ) -> Result<(), KernelError> {
        self.curve_in(sketch, curve)?;
        self.sketch_edit(sketch, "construction")?;
        if let Some(c) = self.doc.curves.get_mut(&curve) {
            c.construction = construction;
        }
        Ok(())
    }

    fn project_point(
        &mut self,
        sketch: SketchId,
        world: [f64; 3],
    ) -> Result<SketchPoint, KernelError> {
        let local = self.sketch(sketch)?.to_local(world);
        let on_plane = self.sketch(sketch)?.to_world(local);
        self.sketch_edit(sketch, "project point")?;
        let id = SketchPointId(self.alloc());
        if let Some(s) = self.doc.sketches.get_mut(&sketch) {
            s.points += 1;
        }
        Ok(SketchPoint {
            id,
            local,
            world: on_plane,
        })
    }

    fn project_curve(&mut self, sketch: SketchId, curve: CurveId) -> Result<CurveId, KernelError> {
        let source = self.curve(curve)?.clone();
        let from = self.sketch(source.sketch)?.clone();
        let to = self.sketch(sketch)?.clone();
        let map = |p: [f64; 2]| to.to_local(from.to_world(p));
        let geometry = match source.geometry {
            CurveGeometry::Line { start, end } => CurveGeometry::Line {
                start: map(start),
                end: map(end),
            },
            CurveGeometry::Circle { center, radius } => CurveGeometry::Circle {
                center: map(center),
                radius,
            },
            CurveGeometry::Arc { center, radius } => CurveGeometry::Arc {
                center: map(center),
                radius,
            },
        };
        self.sketch_edit(sketch, "project curve")?;
        let id = self.push_curve(sketch, geometry);
        if let CurveGeometry::Circle { center, radius } = geometry {
            self.push_loop(sketch, vec![id], LoopShape::Circle { center, radius });
        }
        Ok(id)
    }

    fn add_line(
        &mut self,
        sketch: SketchId,
        start: [f64; 2],
        end: [f64; 2],
    ) -> Result<CurveId, KernelError> {
        if geom::distance2(start, end) <= self.tolerance {
            return Err(KernelError::Other {
                message: "zero-length line".to_string(),
            });
        }
        self.sketch_edit(sketch, "line")?;
        Ok(self.push_curve(sketch, CurveGeometry::Line { start, end }))
    }

    fn add_circle(
        &mut self,
        sketch: SketchId,
        center: [f64; 2],
        radius: f64,
    ) -> Result<CurveId, KernelError> {
        if radius <= self.tolerance {
            return Err(KernelError::Other {
                message: format!("circle radius must be positive, got {radius}"),
            });
        }
        self.sketch_edit(sketch, "circle")?;
        let id = self.push_curve(sketch, CurveGeometry::Circle { center, radius });
        self.push_loop(sketch, vec![id], LoopShape::Circle { center, radius });
        Ok(id)
    }

    fn add_center_rectangle(
        &mut self,
        sketch: SketchId,
        center: [f64; 2],
        corner: [f64; 2],
    ) -> Result<[CurveId; 4], KernelError> {
        let half = [
            (corner[0] - center[0]).abs(),
            (corner[1] - center[1]).abs(),
        ];
        if half[0] <= self.tolerance || half[1] <= self.tolerance {
            return Err(KernelError::Other {
                message: format!("degenerate rectangle {:.6} x {:.6}", 2.0 * half[0], 2.0 * half[1]),
            });
        }
        self.sketch_edit(sketch, "rectangle")?;
        let pts = corners(center, half);
        let lines = [0, 1, 2, 3].map(|i| {
            self.push_curve(
                sketch,
                CurveGeometry::Line {
                    start: pts[i],
                    end: pts[(i + 1) % 4],
                },
            )
        });
        self.push_loop(
            sketch,
            lines.to_vec(),
            LoopShape::Rectangle {
                center,
                half,
                fillets: [None; 4],
            },
        );
        Ok(lines)
    }

    fn add_fillet(
        &mut self,
        sketch: SketchId,
        first: CurveId,
        second: CurveId,
        radius: f64,
    ) -> Result<CurveId, KernelError> {
        let tol = self.tolerance;
        let s = self.sketch(sketch)?;
        let (loop_index, corner, center, half) = s
            .loops
            .iter()
            .enumerate()
            .find_map(|(li, l)| {
                let LoopShape::Rectangle { center, half, .. } = l.shape else {
                    return None;
                };
                let a = l.curves.iter().position(|c| *c == first)?;
                let b = l.curves.iter().position(|c| *c == second)?;
                ((a + 1) % 4 == b).then_some((li, a, center, half))
            })
            .ok_or_else(|| KernelError::FilletFailed {
                reason: format!("curves {} and {} do not meet at a corner", first.0, second.0),
            })?;

        if radius <= tol {
            return Err(KernelError::FilletFailed {
                reason: format!("radius must be positive, got {radius}"),
            });
        }
        let limit = half[0].min(half[1]);
        if radius > limit + tol {
            return Err(KernelError::FilletFailed {
                reason: format!("radius {radius} exceeds half the shorter side ({limit})"),
            });
        }
        if let LoopShape::Rectangle { fillets, .. } = &s.loops[loop_index].shape {
            if fillets[corner].is_some() {
                return Err(KernelError::FilletFailed {
                    reason: format!("corner {corner} is already filleted"),
                });
            }
        }

        self.sketch_edit(sketch, "fillet")?;
        let sign = [[1.0, 1.0], [-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]][corner];
        let corner_pt = corners(center, half)[(corner + 1) % 4];
        let arc_center = [
            corner_pt[0] + sign[0] * radius,
            corner_pt[1] + sign[1] * radius,
        ];
        let arc = self.push_curve(
            sketch,
            CurveGeometry::Arc {
                center: arc_center,
                radius,
            },
        );
        if let Some(l) = self
            .doc
            .sketches
            .get_mut(&sketch)
            .and_then(|s| s.loops.get_mut(loop_index))
        {
            l.curves.push(arc);
            if let LoopShape::Rectangle { fillets, .. } = &mut l.shape {
                fillets[corner] = Some(radius);
            }
        }
        Ok(arc)
    }

    fn add_coincident(
        &mut self,
        sketch: SketchId,
        curve: CurveId,
        end: CurveEnd,
        on: CurveId,
    ) -> Result<(), KernelError> {
        let tol = self.tolerance.max(1e-9) * 10.0;
        let (start, finish) = self.line_in(sketch, curve)?;
        let p = match end {
            CurveEnd::Start => start,
            CurveEnd::End => finish,
        };
        let lies_on = match self.curve_in(sketch, on)?.geometry {
            CurveGeometry::Circle { center, radius } | CurveGeometry::Arc { center, radius } => {
                (geom::distance2(center, p) - radius).abs() <= tol
            }
            CurveGeometry::Line { start, end } => {
                let d = [end[0] - start[0], end[1] - start[1]];
                let w = [p[0] - start[0], p[1] - start[1]];
                let len = geom::distance2(start, end);
                (d[0] * w[1] - d[1] * w[0]).abs() / len <= tol
            }
        };
        if !lies_on {
            return Err(KernelError::ConstraintFailed {
                reason: format!("end of curve {} cannot be placed on curve {}", curve.0, on.0),
            });
        }
        self.sketch_edit(sketch, "coincident")?;
        if let Some(s) = self.doc.sketches.get_mut(&sketch) {
            s.constraints += 1;
        }
        Ok(())
    }

    fn add_vertical(&mut self, sketch: SketchId, line: CurveId) -> Result<(), KernelError> {
        let (start, end) = self.line_in(sketch, line)?;
        if (start[0] - end[0]).abs() > self.tolerance * 10.0 {
            return Err(KernelError::ConstraintFailed {
                reason: format!("line {} is not vertical", line.0),
            });
        }
        self.sketch_edit(sketch, "vertical")?;
        if let Some(s) = self.doc.sketches.get_mut(&sketch) {
            s.constraints += 1;
        }
        Ok(())
    }

    fn add_angular_dimension(
        &mut self,
        sketch: SketchId,
        first: CurveId,
        second: CurveId,
        _text_point: [f64; 2],
    ) -> Result<(), KernelError> {
        self.line_in(sketch, first)?;
        self.line_in(sketch, second)?;
        if first == second {
            return Err(KernelError::ConstraintFailed {
                reason: "angular dimension needs two distinct lines".to_string(),
            });
        }
        self.sketch_edit(sketch, "angular dimension")?;
        if let Some(s) = self.doc.sketches.get_mut(&sketch) {
            s.dimensions += 1;
        }
        Ok(())
    }

    fn add_radial_dimension(
        &mut self,
        sketch: SketchId,
        circle: CurveId,
        _text_point: [f64; 2],
    ) -> Result<(), KernelError> {
        if !matches!(
            self.curve_in(sketch, circle)?.geometry,
            CurveGeometry::Circle { .. } | CurveGeometry::Arc { .. }
        ) {
            return Err(KernelError::ConstraintFailed {
                reason: format!("curve {} has no radius", circle.0),
            });
        }
        self.sketch_edit(sketch, "radial dimension")?;
        if let Some(s) = self.doc.sketches.get_mut(&sketch) {
            s.dimensions += 1;
        }
        Ok(())
    }

    fn create_open_profile(&mut self, curve: CurveId) -> Result<ProfileId, KernelError> {
        let sketch = self.curve(curve)?.sketch;
        self.sketch_edit(sketch, "open profile")?;
        let id = ProfileId(self.alloc());
        self.doc
            .profiles
            .insert(id, MockProfile::Open { sketch, curve });
        Ok(id)
    }

    fn extrude(&mut self, input: &ExtrudeInput) -> Result<ExtrudeOutput, KernelError> {
        self.check_fault(KernelCall::Extrude)?;
        if input.profiles.is_empty() {
            return Err(KernelError::Other {
                message: "extrude needs at least one profile".to_string(),
            });
        }

        let mut sketch_id = None;
        let mut shapes = Vec::with_capacity(input.profiles.len());
        for &p in &input.profiles {
            let profile = *self
                .doc
                .profiles
                .get(&p)
                .ok_or_else(|| KernelError::not_found("profile", p.0))?;
            if input.solid && matches!(profile, MockProfile::Open { .. }) {
                return Err(KernelError::NotSupported {
                    operation: "solid extrude of an open profile".to_string(),
                });
            }
            let (sketch, shape, fillets) = self.profile_shape(profile)?;
            if sketch_id.is_some_and(|s| s != sketch) {
                return Err(KernelError::NotSupported {
                    operation: "extrude of profiles from several sketches".to_string(),
                });
            }
            sketch_id = Some(sketch);
            shapes.push((shape, fillets));
        }
        let sketch_id = sketch_id.ok_or_else(|| KernelError::Other {
            message: "extrude needs at least one profile".to_string(),
        })?;
        let sketch = self.sketch(sketch_id)?.clone();
        let offset = self.extrude_offset(&sketch, &shapes, input.extent)?;

        let mut output = ExtrudeOutput::default();
        match (input.operation, input.solid) {
            (FeatureOperation::NewBody, true) => {
                let mut built = Vec::new();
                for (shape, fillets) in &shapes {
                    let body = BodyId(self.alloc());
                    let (faces, start, end) =
                        self.solid_from_shape(body, &sketch, shape, *fillets, offset);
                    output.bodies.push(body);
                    output.faces.extend(faces.iter().map(|(id, _)| *id));
                    output.start_faces.push(start);
                    output.end_faces.push(end);
                    built.push((body, faces));
                }
                self.record("extrude");
                for (body, faces) in built {
                    self.insert_body(body, sketch.component, true, faces);
                }
            }
            (FeatureOperation::NewBody, false) => {
                let body = BodyId(self.alloc());
                let faces: Vec<(FaceId, MockFace)> = shapes
                    .iter()
                    .map(|(shape, _)| self.wall_from_shape(body, &sketch, shape, offset))
                    .collect();
                output.bodies.push(body);
                output.faces.extend(faces.iter().map(|(id, _)| *id));
                self.record("surface extrude");
                self.insert_body(body, sketch.component, false, faces);
            }
            (op @ (FeatureOperation::Cut | FeatureOperation::Join), _) => {
                let host = self.face(sketch.face)?.body;
                self.record("extrude into body");
                if let Some(body) = self.doc.bodies.get_mut(&host) {
                    match op {
                        FeatureOperation::Cut => body.cut_tools += shapes.len(),
                        _ => body.joined_tools += shapes.len(),
                    }
                }
            }
        }

        self.stats.extrudes += 1;
        Ok(output)
    }

    fn copy_bodies(
        &mut self,
        bodies: &[BodyId],
        component: ComponentId,
    ) -> Result<Vec<BodyId>, KernelError> {
        self.check_fault(KernelCall::CopyBodies)?;
        let mut copies = Vec::with_capacity(bodies.len());
        for &id in bodies {
            let body = self
                .doc
                .bodies
                .get(&id)
                .ok_or_else(|| KernelError::not_found("body", id.0))?
                .clone();
            let new_body = BodyId(self.alloc());
            let mut faces = Vec::with_capacity(body.faces.len());
            for face_id in &body.faces {
                let mut face = self.face(*face_id)?.clone();
                face.body = new_body;
                faces.push((FaceId(self.alloc()), face));
            }
            copies.push((new_body, body.solid, faces));
        }

        self.record("copy bodies");
        let ids = copies.iter().map(|(id, _, _)| *id).collect();
        for (id, solid, faces) in copies {
            self.insert_body(id, component, solid, faces);
        }
        self.stats.copy_calls += 1;
        Ok(ids)
    }

    fn translate_bodies(&mut self, bodies: &[BodyId], offset: [f64; 3]) -> Result<(), KernelError> {
        self.check_fault(KernelCall::TranslateBodies)?;
        for id in bodies {
            if !self.doc.bodies.contains_key(id) {
                return Err(KernelError::not_found("body", id.0));
            }
        }
        self.record("move bodies");
        for id in bodies {
            let faces = self.doc.bodies.get(id).map(|b| b.faces.clone()).unwrap_or_default();
            for face in faces {
                if let Some(f) = self.doc.faces.get_mut(&face) {
                    f.origin = geom::add(f.origin, offset);
                }
            }
        }
        self.stats.translate_calls += 1;
        Ok(())
    }

    fn thicken(
        &mut self,
        faces: &[FaceId],
        thickness: f64,
        symmetric: bool,
    ) -> Result<Vec<BodyId>, KernelError> {
        self.check_fault(KernelCall::Thicken)?;
        if thickness.abs() <= self.tolerance {
            return Err(KernelError::ThickenFailed {
                reason: format!("thickness must be non-zero, got {thickness}"),
            });
        }
        if faces.is_empty() {
            return Err(KernelError::ThickenFailed {
                reason: "no faces to thicken".to_string(),
            });
        }

        let mut built = Vec::with_capacity(faces.len());
        for &face_id in faces {
            let face = self.face(face_id)?.clone();
            let component = self
                .doc
                .bodies
                .get(&face.body)
                .map(|b| b.component)
                .ok_or_else(|| KernelError::not_found("body", face.body.0))?;
            let (near, far) = if symmetric {
                (-thickness / 2.0, thickness / 2.0)
            } else {
                (0.0, thickness)
            };
            let body = BodyId(self.alloc());
            let shifted = |d: f64| MockFace {
                body,
                origin: geom::add(face.origin, geom::scale(face.normal, d)),
                ..face.clone()
            };
            let side = MockFace {
                body,
                kind: SurfaceKind::Ruled,
                ..face.clone()
            };
            let new_faces = vec![
                (FaceId(self.alloc()), shifted(near)),
                (FaceId(self.alloc()), shifted(far)),
                (FaceId(self.alloc()), side),
            ];
            built.push((body, component, new_faces));
        }

        self.record("thicken");
        let ids = built.iter().map(|(id, _, _)| *id).collect();
        for (id, component, faces) in built {
            self.insert_body(id, component, true, faces);
        }
        self.stats.thicken_calls += 1;
        Ok(ids)
    }

    fn combine(
        &mut self,
        target: BodyId,
        tools: &[BodyId],
        op: CombineOp,
    ) -> Result<(), KernelError> {
        self.check_fault(KernelCall::Combine)?;
        if tools.is_empty() {
            return Err(KernelError::BooleanFailed {
                reason: "no tool bodies".to_string(),
            });
        }
        let target_body = self
            .doc
            .bodies
            .get(&target)
            .ok_or_else(|| KernelError::not_found("body", target.0))?;
        if !target_body.solid {
            return Err(KernelError::BooleanFailed {
                reason: format!("target body {} is not a solid", target.0),
            });
        }
        for tool in tools {
            if *tool == target {
                return Err(KernelError::BooleanFailed {
                    reason: "target body is also a tool".to_string(),
                });
            }
            match self.doc.bodies.get(tool) {
                Some(b) if b.solid => {}
                Some(_) => {
                    return Err(KernelError::BooleanFailed {
                        reason: format!("tool body {} is not a solid", tool.0),
                    })
                }
                None => return Err(KernelError::not_found("body", tool.0)),
            }
        }

        self.record(match op {
            CombineOp::Cut => "combine cut",
            CombineOp::Join => "combine join",
        });
        for tool in tools {
            self.remove_body(*tool);
        }
        if let Some(body) = self.doc.bodies.get_mut(&target) {
            match op {
                CombineOp::Cut => body.cut_tools += tools.len(),
                CombineOp::Join => body.joined_tools += tools.len(),
            }
        }
        self.combine_log.push(CombineRecord {
            target,
            tools: tools.to_vec(),
            op,
        });
        self.stats.combine_calls += 1;
        Ok(())
    }

    fn timeline_marker(&self) -> TimelineMarker {
        TimelineMarker(self.history.len())
    }

    fn group_timeline(
        &mut self,
        start: TimelineMarker,
        end: TimelineMarker,
    ) -> Result<(), KernelError> {
        if start > end || end.0 > self.history.len() {
            return Err(KernelError::InvalidTimeline {
                reason: format!(
                    "cannot group {}..{} of {} entries",
                    start.0,
                    end.0,
                    self.history.len()
                ),
            });
        }
        self.groups.push((start, end));
        self.stats.group_calls += 1;
        debug!(start = start.0, end = end.0, "grouped timeline entries");
        Ok(())
    }

    fn undo_to(&mut self, marker: TimelineMarker) -> Result<(), KernelError> {
        if marker.0 > self.history.len() {
            return Err(KernelError::InvalidTimeline {
                reason: format!(
                    "marker {} is past the end of the timeline ({})",
                    marker.0,
                    self.history.len()
                ),
            });
        }
        if let Some(entry) = self.history.get(marker.0) {
            self.doc = entry.before.clone();
        }
        let undone = self.history.len() - marker.0;
        self.history.truncate(marker.0);
        self.groups.retain(|(_, end)| end.0 <= marker.0);
        self.stats.undo_calls += 1;
        debug!(marker = marker.0, undone, "rolled back timeline");
        Ok(())
    }
}

impl KernelIntrospect for MockKernel {
    fn faces_at_point(&self, component: ComponentId, point: [f64; 3]) -> Vec<FaceId> {
        let tol = self.tolerance.max(1e-9) * 10.0;
        self.doc
            .faces
            .iter()
            .filter(|(_, f)| {
                self.doc
                    .bodies
                    .get(&f.body)
                    .is_some_and(|b| b.component == component)
            })
            .filter(|(_, f)| f.contains(point, tol))
            .map(|(id, _)| *id)
            .collect()
    }

    fn surface_kind(&self, face: FaceId) -> Result<SurfaceKind, KernelError> {
        Ok(self.face(face)?.kind)
    }

    fn face_body(&self, face: FaceId) -> Result<BodyId, KernelError> {
        Ok(self.face(face)?.body)
    }

    fn normal_at(&self, face: FaceId, _point: [f64; 3]) -> Result<[f64; 3], KernelError> {
        Ok(self.face(face)?.normal)
    }

    fn ray_hits(
        &self,
        component: ComponentId,
        origin: [f64; 3],
        direction: [f64; 3],
    ) -> Vec<FaceId> {
        let Some(dir) = geom::normalize(direction) else {
            return Vec::new();
        };
        let tol = self.tolerance.max(1e-9) * 10.0;
        let mut hits: Vec<(f64, FaceId)> = self
            .doc
            .faces
            .iter()
            .filter(|(_, f)| f.kind == SurfaceKind::Planar)
            .filter(|(_, f)| {
                self.doc
                    .bodies
                    .get(&f.body)
                    .is_some_and(|b| b.component == component)
            })
            .filter_map(|(id, f)| {
                let denom = geom::dot(dir, f.normal);
                if denom.abs() < 1e-12 {
                    return None;
                }
                let t = geom::dot(geom::sub(f.origin, origin), f.normal) / denom;
                if t < -tol {
                    return None;
                }
                let q = geom::add(origin, geom::scale(dir, t));
                f.within_bounds(q, tol).then_some((t.max(0.0), *id))
            })
            .collect();
        hits.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        hits.into_iter().map(|(_, id)| id).collect()
    }

    fn sketch_axes(&self, sketch: SketchId) -> Result<SketchAxes, KernelError> {
        Ok(self.sketch(sketch)?.axes)
    }

    fn sketch_curves(&self, sketch: SketchId) -> Result<Vec<CurveId>, KernelError> {
        Ok(self.sketch(sketch)?.curves.clone())
    }

    fn sketch_profiles(&self, sketch: SketchId) -> Result<Vec<ProfileId>, KernelError> {
        Ok(self.closed_profiles(self.sketch(sketch)?))
    }

    fn profile_area(&self, profile: ProfileId) -> Result<f64, KernelError> {
        let p = *self
            .doc
            .profiles
            .get(&profile)
            .ok_or_else(|| KernelError::not_found("profile", profile.0))?;
        match &self.loop_of(p)?.shape {
            LoopShape::Rectangle { half, fillets, .. } => {
                let corner_loss = 1.0 - std::f64::consts::FRAC_PI_4;
                let rounded: f64 = fillets.iter().flatten().map(|r| corner_loss * r * r).sum();
                Ok(4.0 * half[0] * half[1] - rounded)
            }
            LoopShape::Circle { radius, .. } => Ok(std::f64::consts::PI * radius * radius),
        }
    }
}
