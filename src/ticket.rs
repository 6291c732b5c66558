use crate::ReleaseError;
use alloc::rc::Weak;
use core::fmt;
use log::warn;

/// The pool side of a release: files `instance` back into roster slot `slot`.
pub(crate) trait Recycle<T> {
    fn recycle(&self, slot: usize, instance: &mut T) -> Result<(), ReleaseError>;
}

/// The "return to pool" capability handed to an instance on every spawn.
///
/// A ticket is bound to one pool and one roster slot. Releasing consumes it,
/// so an instance that stores the ticket in an `Option` and `take`s it on
/// despawn can hand itself back at most once per active period. The ticket
/// only holds a weak reference to the pool: it never keeps a pool alive, and
/// releasing into a pool that is gone is a logged no-op.
pub struct ReturnToPool<T> {
    slot: usize,
    pool: Weak<dyn Recycle<T>>,
}

impl<T> ReturnToPool<T> {
    pub(crate) fn new(slot: usize, pool: Weak<dyn Recycle<T>>) -> Self {
        ReturnToPool { slot, pool }
    }

    /// The roster slot this ticket was issued for.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Hands `instance` back to the pool it was spawned from.
    ///
    /// `instance` must be the object this ticket was given to, typically
    /// `self` inside [`Poolable::on_despawn`](crate::Poolable::on_despawn).
    /// A rejected release is logged and otherwise ignored.
    pub fn release(self, instance: &mut T) {
        let slot = self.slot;
        if let Err(err) = self.try_release(instance) {
            warn!("ignoring release of slot {slot} ({}): {err}", err.as_label());
        }
    }

    /// Like [`Self::release`], but reports why the pool refused the instance.
    pub fn try_release(self, instance: &mut T) -> Result<(), ReleaseError> {
        let pool = self.pool.upgrade().ok_or(ReleaseError::PoolClosed)?;
        pool.recycle(self.slot, instance)
    }
}

impl<T> fmt::Debug for ReturnToPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnToPool")
            .field("slot", &self.slot)
            .field("pool_alive", &(self.pool.strong_count() > 0))
            .finish()
    }
}
