use serde::{Deserialize, Serialize};

// Re-export shared ids from vent-types
pub use vent_types::{BodyId, ComponentId, CurveId, FaceId, ProfileId, SketchId, SketchPointId};

/// A sketch point together with its sketch-space and world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchPoint {
    pub id: SketchPointId,
    /// Position in the sketch's 2D coordinate system.
    pub local: [f64; 2],
    /// Position in model space.
    pub world: [f64; 3],
}

/// Orientation of a sketch plane in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchAxes {
    pub origin: [f64; 3],
    pub x_direction: [f64; 3],
    pub y_direction: [f64; 3],
    /// Outward normal of the face the sketch was placed on.
    pub normal: [f64; 3],
}

/// Which end of a sketch curve a constraint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveEnd {
    Start,
    End,
}

/// Geometric class of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Planar,
    Cylindrical,
    Ruled,
}

/// Whether an extrude makes a new body or modifies the sketch's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureOperation {
    NewBody,
    Cut,
    Join,
}

/// Boolean combine kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineOp {
    Cut,
    Join,
}

/// How far an extrude goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// Up to a named terminating face.
    ToFace(FaceId),
    /// Through every body of the component, opposite the sketch normal.
    ThroughAll,
}

/// Everything needed to create an extrude feature.
#[derive(Debug, Clone)]
pub struct ExtrudeInput {
    pub profiles: Vec<ProfileId>,
    pub operation: FeatureOperation,
    pub extent: Extent,
    /// False produces surface bodies from open profiles.
    pub solid: bool,
}

impl ExtrudeInput {
    pub fn new_body(profiles: Vec<ProfileId>, extent: Extent) -> Self {
        Self {
            profiles,
            operation: FeatureOperation::NewBody,
            extent,
            solid: true,
        }
    }

    pub fn surface(profiles: Vec<ProfileId>, extent: Extent) -> Self {
        Self {
            profiles,
            operation: FeatureOperation::NewBody,
            extent,
            solid: false,
        }
    }
}

/// Result of an extrude feature.
#[derive(Debug, Clone, Default)]
pub struct ExtrudeOutput {
    /// Bodies created by the feature (empty for Cut/Join).
    pub bodies: Vec<BodyId>,
    /// Every face created by the feature.
    pub faces: Vec<FaceId>,
    /// Faces lying on the start plane.
    pub start_faces: Vec<FaceId>,
    /// Faces lying on the terminating extent.
    pub end_faces: Vec<FaceId>,
}

/// Position in the host's transaction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimelineMarker(pub usize);

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("{what} not found: {id}")]
    EntityNotFound { what: &'static str, id: u64 },

    #[error("face {face:?} is not planar")]
    NotPlanar { face: FaceId },

    #[error("extent not reached: {reason}")]
    ExtentNotReached { reason: String },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("constraint failed: {reason}")]
    ConstraintFailed { reason: String },

    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("thicken failed: {reason}")]
    ThickenFailed { reason: String },

    #[error("invalid timeline request: {reason}")]
    InvalidTimeline { reason: String },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("injected failure in {call}")]
    Injected { call: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

impl KernelError {
    pub(crate) fn not_found(what: &'static str, id: u64) -> Self {
        KernelError::EntityNotFound { what, id }
    }
}
