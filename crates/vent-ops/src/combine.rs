use tracing::{debug, instrument};
use vent_kernel::{BodyId, CombineOp};

use crate::kernel_ext::KernelBundle;
use crate::types::VentError;

/// One boolean against a target solid. Consumes `tools`.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineStep {
    pub target: BodyId,
    pub tools: Vec<BodyId>,
    pub op: CombineOp,
}

impl CombineStep {
    pub fn cut(target: BodyId, tools: Vec<BodyId>) -> Self {
        Self {
            target,
            tools,
            op: CombineOp::Cut,
        }
    }

    pub fn join(target: BodyId, tools: Vec<BodyId>) -> Self {
        Self {
            target,
            tools,
            op: CombineOp::Join,
        }
    }
}

/// Tool bodies consumed per operation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineTally {
    pub cut: usize,
    pub joined: usize,
}

/// Combine all `tools` into `target` with a single boolean.
/// An empty tool set is a successful no-op.
#[instrument(skip(kb, tools), fields(tools = tools.len()))]
pub fn combine(
    kb: &mut dyn KernelBundle,
    target: BodyId,
    tools: &[BodyId],
    op: CombineOp,
) -> Result<usize, VentError> {
    if tools.is_empty() {
        debug!("no tool bodies, nothing to combine");
        return Ok(0);
    }
    kb.combine(target, tools, op)?;
    Ok(tools.len())
}

/// Run `steps` strictly in order, stopping at the first failure.
pub fn run_steps(kb: &mut dyn KernelBundle, steps: &[CombineStep]) -> Result<CombineTally, VentError> {
    let mut tally = CombineTally::default();
    for step in steps {
        let consumed = combine(kb, step.target, &step.tools, step.op)?;
        match step.op {
            CombineOp::Cut => tally.cut += consumed,
            CombineOp::Join => tally.joined += consumed,
        }
    }
    Ok(tally)
}

/// Hub-and-spoke ordering: the boundary cut opens the cavity, then the
/// thickened spokes and rings are joined inside it.
pub fn nest_in_cavity(target: BodyId, boundary: Vec<BodyId>, spokes: Vec<BodyId>) -> [CombineStep; 2] {
    [CombineStep::cut(target, boundary), CombineStep::join(target, spokes)]
}
