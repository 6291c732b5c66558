use crate::PoolHooks;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Tunable pool settings, loadable from the host application's config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Ceiling on the number of instances the pool may hold. Zero or a
    /// negative value removes the ceiling.
    pub max_pool_size: i64,
}

impl PoolSettings {
    /// Settings with the given ceiling.
    pub fn with_max_pool_size(max_pool_size: i64) -> Self {
        PoolSettings { max_pool_size }
    }

    /// The ceiling as a count, or `None` when the pool is unbounded.
    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.max_pool_size)
            .ok()
            .filter(|&max| max > 0)
    }
}

/// Everything needed to set up a [`PoolController`](crate::PoolController),
/// gathered ahead of time.
///
/// The factory and the container are optional here so that a half-filled
/// description can be handed to
/// [`PoolController::from_init`](crate::PoolController::from_init), which
/// reports what is missing instead of failing to compile or panicking.
pub struct PoolInitData<F, C> {
    pub(crate) factory: Option<F>,
    pub(crate) container: Option<C>,
    pub(crate) settings: PoolSettings,
    pub(crate) hooks: PoolHooks,
}

impl<F, C> PoolInitData<F, C> {
    /// Creates an empty description: no factory, no container, unbounded,
    /// no hooks.
    pub fn new() -> Self {
        PoolInitData {
            factory: None,
            container: None,
            settings: PoolSettings::default(),
            hooks: PoolHooks::new(),
        }
    }

    /// Sets the factory used when the pool has to grow.
    pub fn factory(mut self, factory: F) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Sets the container idle instances live in.
    pub fn container(mut self, container: C) -> Self {
        self.container = Some(container);
        self
    }

    /// Sets the instance ceiling. Zero or less means unbounded.
    pub fn max_pool_size(mut self, max_pool_size: i64) -> Self {
        self.settings.max_pool_size = max_pool_size;
        self
    }

    /// Replaces all tunables at once.
    pub fn settings(mut self, settings: PoolSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the observer hooks.
    pub fn hooks(mut self, hooks: PoolHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

impl<F, C> Default for PoolInitData<F, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, C> fmt::Debug for PoolInitData<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolInitData")
            .field("factory", &self.factory.is_some())
            .field("container", &self.container.is_some())
            .field("settings", &self.settings)
            .field("hooks", &self.hooks)
            .finish()
    }
}
