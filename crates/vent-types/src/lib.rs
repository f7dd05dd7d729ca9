pub mod dialog;
pub mod fields;
pub mod geom;
pub mod ids;
pub mod vent;

pub use dialog::*;
pub use fields::*;
pub use ids::*;
pub use vent::*;
