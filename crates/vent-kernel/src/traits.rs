use crate::types::*;

/// Mutating half of the host kernel capability set.
///
/// Every call is a blocking call into the shared document and is visible in
/// the document the moment it returns. Implemented by the host adapter and by
/// `MockKernel` (deterministic test double).
pub trait Kernel {
    /// Open a sketch on a planar face.
    fn create_sketch(&mut self, face: FaceId) -> Result<SketchId, KernelError>;

    /// Mark a sketch curve as construction geometry.
    fn set_construction(
        &mut self,
        sketch: SketchId,
        curve: CurveId,
        construction: bool,
    ) -> Result<(), KernelError>;

    /// Project a model-space point into the sketch.
    fn project_point(&mut self, sketch: SketchId, world: [f64; 3])
        -> Result<SketchPoint, KernelError>;

    /// Project a curve from another sketch into this one.
    fn project_curve(&mut self, sketch: SketchId, curve: CurveId) -> Result<CurveId, KernelError>;

    fn add_line(
        &mut self,
        sketch: SketchId,
        start: [f64; 2],
        end: [f64; 2],
    ) -> Result<CurveId, KernelError>;

    fn add_circle(
        &mut self,
        sketch: SketchId,
        center: [f64; 2],
        radius: f64,
    ) -> Result<CurveId, KernelError>;

    /// Axis-aligned rectangle from its center and one corner. Lines are
    /// returned in loop order: bottom, right, top, left.
    fn add_center_rectangle(
        &mut self,
        sketch: SketchId,
        center: [f64; 2],
        corner: [f64; 2],
    ) -> Result<[CurveId; 4], KernelError>;

    /// Round the corner where `first` ends and `second` starts.
    fn add_fillet(
        &mut self,
        sketch: SketchId,
        first: CurveId,
        second: CurveId,
        radius: f64,
    ) -> Result<CurveId, KernelError>;

    /// Constrain one end of a curve to lie on another curve.
    fn add_coincident(
        &mut self,
        sketch: SketchId,
        curve: CurveId,
        end: CurveEnd,
        on: CurveId,
    ) -> Result<(), KernelError>;

    fn add_vertical(&mut self, sketch: SketchId, line: CurveId) -> Result<(), KernelError>;

    /// Angle between two lines sharing a start point.
    fn add_angular_dimension(
        &mut self,
        sketch: SketchId,
        first: CurveId,
        second: CurveId,
        text_point: [f64; 2],
    ) -> Result<(), KernelError>;

    fn add_radial_dimension(
        &mut self,
        sketch: SketchId,
        circle: CurveId,
        text_point: [f64; 2],
    ) -> Result<(), KernelError>;

    /// Wrap a single open or closed curve as a profile.
    fn create_open_profile(&mut self, curve: CurveId) -> Result<ProfileId, KernelError>;

    fn extrude(&mut self, input: &ExtrudeInput) -> Result<ExtrudeOutput, KernelError>;

    /// Copy a set of bodies into a component as one operation.
    fn copy_bodies(
        &mut self,
        bodies: &[BodyId],
        component: ComponentId,
    ) -> Result<Vec<BodyId>, KernelError>;

    /// Rigidly move a set of bodies as one operation.
    fn translate_bodies(&mut self, bodies: &[BodyId], offset: [f64; 3]) -> Result<(), KernelError>;

    /// Offset faces by `thickness` into new solid bodies.
    fn thicken(
        &mut self,
        faces: &[FaceId],
        thickness: f64,
        symmetric: bool,
    ) -> Result<Vec<BodyId>, KernelError>;

    /// Single boolean of all `tools` against `target`. Consumes the tools.
    fn combine(
        &mut self,
        target: BodyId,
        tools: &[BodyId],
        op: CombineOp,
    ) -> Result<(), KernelError>;

    /// Current end of the transaction log.
    fn timeline_marker(&self) -> TimelineMarker;

    /// Group the entries between two markers into one undo unit.
    fn group_timeline(&mut self, start: TimelineMarker, end: TimelineMarker)
        -> Result<(), KernelError>;

    /// Undo every entry created after `marker`.
    fn undo_to(&mut self, marker: TimelineMarker) -> Result<(), KernelError>;
}

/// Read-only half of the capability set.
pub trait KernelIntrospect {
    /// Faces of the component that contain the point, nearest first.
    fn faces_at_point(&self, component: ComponentId, point: [f64; 3]) -> Vec<FaceId>;

    fn surface_kind(&self, face: FaceId) -> Result<SurfaceKind, KernelError>;

    /// Body the face belongs to.
    fn face_body(&self, face: FaceId) -> Result<BodyId, KernelError>;

    /// Outward surface normal at a point on the face.
    fn normal_at(&self, face: FaceId, point: [f64; 3]) -> Result<[f64; 3], KernelError>;

    /// Faces of the component hit by a ray, in distance order. The same face
    /// may appear at distance zero when the origin lies on it.
    fn ray_hits(&self, component: ComponentId, origin: [f64; 3], direction: [f64; 3])
        -> Vec<FaceId>;

    fn sketch_axes(&self, sketch: SketchId) -> Result<SketchAxes, KernelError>;

    fn sketch_curves(&self, sketch: SketchId) -> Result<Vec<CurveId>, KernelError>;

    /// Closed regions of the sketch, in creation order.
    fn sketch_profiles(&self, sketch: SketchId) -> Result<Vec<ProfileId>, KernelError>;

    fn profile_area(&self, profile: ProfileId) -> Result<f64, KernelError>;
}
