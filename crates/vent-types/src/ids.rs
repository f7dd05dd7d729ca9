use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);
    };
}

entity_id!(
    /// A component (assembly node) owning sketches and bodies.
    ComponentId
);
entity_id!(
    /// A solid or surface body in the document.
    BodyId
);
entity_id!(
    /// A B-rep face. The id is the face's stable identity for the lifetime of
    /// the document and is what ray hits are compared by, never position.
    FaceId
);
entity_id!(
    /// A sketch placed on a planar face.
    SketchId
);
entity_id!(
    /// A sketch curve (line, circle, arc or projected reference).
    CurveId
);
entity_id!(
    /// A closed region or an open curve usable as an extrude profile.
    ProfileId
);
entity_id!(
    /// A point in a sketch.
    SketchPointId
);

/// Identifier of one open command session.
/// Only used for log correlation; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-selected point anchoring a vent pattern.
///
/// Carries the world position, the component that owns the selected sketch
/// point, and (when the host knows it) the face the point was picked on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPoint {
    pub position: [f64; 3],
    pub component: ComponentId,
    #[serde(default)]
    pub face: Option<FaceId>,
}

impl SeedPoint {
    pub fn new(position: [f64; 3], component: ComponentId) -> Self {
        Self {
            position,
            component,
            face: None,
        }
    }

    pub fn on_face(mut self, face: FaceId) -> Self {
        self.face = Some(face);
        self
    }
}
