use vent_kernel::{Kernel, KernelIntrospect};

/// Kernel handle every vent operation runs against: mutation and queries on
/// the same document.
///
/// Builders take `&mut dyn KernelBundle`; read-only helpers such as the
/// next-surface resolver take the `&dyn KernelIntrospect` view, which
/// sidesteps holding `&mut` and `&` on the same value.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}
