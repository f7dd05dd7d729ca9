use tracing::{debug, warn};
use vent_kernel::{KernelError, TimelineMarker};
use vent_ops::{KernelBundle, VentError};

/// Timeline span covered by one successful attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptSpan {
    pub start: TimelineMarker,
    pub end: TimelineMarker,
}

/// A failed bracketed attempt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttemptError {
    /// The build failed and everything it created was undone.
    #[error(transparent)]
    Failed(VentError),

    /// The build failed and undoing it failed too. The document may hold
    /// leftovers of the attempt.
    #[error("{cause} (rollback failed: {undo})")]
    RollbackFailed { cause: VentError, undo: KernelError },
}

/// Run `build` between two timeline markers.
///
/// On success the entries it created are grouped into one undo unit. On
/// failure, including a failure to group, everything after the start marker
/// is undone before the error is returned.
pub fn bracketed<T>(
    kb: &mut dyn KernelBundle,
    build: impl FnOnce(&mut dyn KernelBundle) -> Result<T, VentError>,
) -> Result<(T, AttemptSpan), AttemptError> {
    let start = kb.timeline_marker();
    let outcome = build(&mut *kb).and_then(|value| {
        let end = kb.timeline_marker();
        if end > start {
            kb.group_timeline(start, end)?;
        }
        Ok((value, AttemptSpan { start, end }))
    });

    match outcome {
        Ok(done) => {
            debug!(start = done.1.start.0, end = done.1.end.0, "attempt grouped");
            Ok(done)
        }
        Err(cause) => rollback(kb, start, cause),
    }
}

fn rollback<T>(
    kb: &mut dyn KernelBundle,
    start: TimelineMarker,
    cause: VentError,
) -> Result<T, AttemptError> {
    let undone = kb.timeline_marker().0.saturating_sub(start.0);
    match kb.undo_to(start) {
        Ok(()) => {
            warn!(undone, kind = cause.kind(), "attempt rolled back");
            Err(AttemptError::Failed(cause))
        }
        Err(undo) => {
            warn!(%undo, kind = cause.kind(), "rollback failed");
            Err(AttemptError::RollbackFailed { cause, undo })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vent_kernel::{Kernel, MockKernel};

    #[test]
    fn success_groups_the_span() {
        let mut kernel = MockKernel::new();
        let root = kernel.root_component();
        let slab = kernel.add_box(root, [-5.0, -5.0, 0.0], [5.0, 5.0, 1.0]);
        let (sketch, span) = bracketed(&mut kernel, |kb| Ok(kb.create_sketch(slab.top)?)).unwrap();
        assert!(span.end > span.start);
        assert_eq!(kernel.groups(), &[(span.start, span.end)]);
        assert_eq!(kernel.sketch_count(), 1);
        let _ = sketch;
    }

    #[test]
    fn failure_undoes_everything_after_start() {
        let mut kernel = MockKernel::new();
        let root = kernel.root_component();
        let slab = kernel.add_box(root, [-5.0, -5.0, 0.0], [5.0, 5.0, 1.0]);
        let before = kernel.timeline_len();
        let err = bracketed(&mut kernel, |kb| {
            kb.create_sketch(slab.top)?;
            kb.create_sketch(slab.bottom)?;
            Err::<(), _>(VentError::Unterminated {
                reason: "no opposing face".into(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, AttemptError::Failed(VentError::Unterminated { .. })));
        assert_eq!(kernel.sketch_count(), 0);
        assert_eq!(kernel.timeline_len(), before);
        assert!(kernel.groups().is_empty());
    }

    #[test]
    fn empty_success_records_no_group() {
        let mut kernel = MockKernel::new();
        let (_, span) = bracketed(&mut kernel, |_| Ok(())).unwrap();
        assert_eq!(span.start, span.end);
        assert!(kernel.groups().is_empty());
    }
}
