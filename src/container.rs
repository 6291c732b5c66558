use alloc::vec::Vec;

/// The home location pooled instances are filed under while idle.
///
/// A container is not a pool member. It is the host-side scope (a scene
/// node, an arena, a parent transform) that owns where an instance lives when
/// nobody is using it.
pub trait Container<T> {
    /// Files `instance` under this container. Called when an instance is
    /// created or absorbed, and every time it is released back to the pool.
    fn adopt(&self, instance: &mut T);

    /// Hands over the instances that already live in this container.
    ///
    /// The pool calls this once, while it is being constructed, and absorbs
    /// everything returned as idle instances. By default there are none.
    fn take_existing(&mut self) -> Vec<T> {
        Vec::new()
    }

    /// Tears an instance down during [`PoolController::clean_up`].
    ///
    /// By default, this method does nothing and the instance is simply
    /// dropped once the last handle to it goes away.
    ///
    /// [`PoolController::clean_up`]: crate::PoolController::clean_up
    #[inline(always)]
    fn destroy(&self, _instance: &mut T) {}
}

/// The no-op container, for instances that have no host-side home.
impl<T> Container<T> for () {
    #[inline(always)]
    fn adopt(&self, _instance: &mut T) {}
}
