pub mod combine;
pub mod engine;
pub mod hub_spoke;
pub mod kernel_ext;
pub mod next_surface;
pub mod pattern;
pub mod rect_grid;
pub mod sketch;
pub mod types;
pub mod validate;

pub use combine::{combine, nest_in_cavity, run_steps, CombineStep, CombineTally};
pub use engine::build_vent;
pub use hub_spoke::hub_spoke_vent;
pub use kernel_ext::KernelBundle;
pub use next_surface::{resolve_next_face, NextSurface};
pub use pattern::{replicate, GridPattern, Replicated};
pub use rect_grid::rectangular_grid_vent;
pub use sketch::{create_vent_sketch, resolve_host_face, SketchSession};
pub use types::*;
pub use validate::{grid_layout, validate_spec};
