pub mod mock_kernel;
pub mod traits;
pub mod types;

pub use mock_kernel::{
    BodySummary, CallStats, CombineRecord, KernelCall, MockBox, MockKernel, SketchSummary,
};
pub use traits::*;
pub use types::*;
