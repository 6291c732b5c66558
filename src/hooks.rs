use alloc::rc::Rc;
use core::fmt;

pub(crate) type Hook = Rc<dyn Fn()>;

/// Optional observers fired by a [`PoolController`](crate::PoolController).
///
/// Each hook is independent and may be left unset, in which case firing it
/// does nothing. Hooks run after the pool has released its internal state, so
/// a hook may call back into the pool.
#[derive(Clone, Default)]
pub struct PoolHooks {
    on_created: Option<Hook>,
    on_spawned: Option<Hook>,
    on_despawned: Option<Hook>,
}

impl PoolHooks {
    /// Creates a set with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired whenever the pool takes in a new instance, whether built by the
    /// factory or absorbed from the container.
    pub fn on_created(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_created = Some(Rc::new(hook));
        self
    }

    /// Fired after every successful spawn.
    pub fn on_spawned(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_spawned = Some(Rc::new(hook));
        self
    }

    /// Fired after an instance is back in the pool.
    pub fn on_despawned(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_despawned = Some(Rc::new(hook));
        self
    }

    pub(crate) fn created(&self) -> Option<Hook> {
        self.on_created.clone()
    }

    pub(crate) fn spawned(&self) -> Option<Hook> {
        self.on_spawned.clone()
    }

    pub(crate) fn despawned(&self) -> Option<Hook> {
        self.on_despawned.clone()
    }
}

impl fmt::Debug for PoolHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolHooks")
            .field("on_created", &self.on_created.is_some())
            .field("on_spawned", &self.on_spawned.is_some())
            .field("on_despawned", &self.on_despawned.is_some())
            .finish()
    }
}

#[inline]
pub(crate) fn fire(hook: Option<Hook>) {
    if let Some(hook) = hook {
        hook();
    }
}
