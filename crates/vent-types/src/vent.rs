use serde::{Deserialize, Serialize};

/// The three vent variants offered by the vent-type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VentKind {
    /// Hub-and-spoke pattern inside a circular boundary.
    Circular,
    /// Rectangular grid of fully rounded slots.
    Slot,
    /// Rectangular grid of rectangles with an explicit corner radius.
    Rectangular,
}

impl VentKind {
    pub const ALL: [VentKind; 3] = [VentKind::Circular, VentKind::Slot, VentKind::Rectangular];

    /// Label shown in the drop-down.
    pub fn label(self) -> &'static str {
        match self {
            VentKind::Circular => "Circular",
            VentKind::Slot => "Slot",
            VentKind::Rectangular => "Rectangular",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }
}

impl std::fmt::Display for VentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Hub-and-spoke vent parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularVent {
    /// Radius of the circular boundary.
    pub radius: f64,
    /// Thickness of spokes and rings.
    pub border: f64,
    /// Number of spokes.
    pub axial_count: u32,
    /// Number of rings, counting the boundary itself.
    pub radial_count: u32,
}

/// Rounded-rectangle grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularVent {
    pub width: f64,
    pub height: f64,
    pub border: f64,
    pub cols: u32,
    pub rows: u32,
    /// Zero disables filleting.
    pub corner_radius: f64,
}

/// Slot grid parameters. The slot radius is derived from the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotVent {
    pub width: f64,
    pub height: f64,
    pub border: f64,
    pub cols: u32,
    pub rows: u32,
}

/// A fully typed vent definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VentSpec {
    Circular(CircularVent),
    Slot(SlotVent),
    Rectangular(RectangularVent),
}

impl VentSpec {
    pub fn kind(&self) -> VentKind {
        match self {
            VentSpec::Circular(_) => VentKind::Circular,
            VentSpec::Slot(_) => VentKind::Slot,
            VentSpec::Rectangular(_) => VentKind::Rectangular,
        }
    }

    pub fn border(&self) -> f64 {
        match self {
            VentSpec::Circular(c) => c.border,
            VentSpec::Slot(s) => s.border,
            VentSpec::Rectangular(r) => r.border,
        }
    }
}
