#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
extern crate alloc;
mod container;
mod controller;
mod error;
mod factory;
mod hooks;
mod init;
mod placement;
mod ticket;

pub use container::*;
pub use controller::*;
pub use error::*;
pub use factory::*;
pub use hooks::*;
pub use init::*;
pub use placement::*;
pub use ticket::*;

/// The capability every pooled instance implements.
///
/// An instance is either idle (sitting in the pool) or active (handed out by
/// [`PoolController::acquire`]). The pool drives the transitions through the
/// three methods below; the instance decides on its own when it is done and
/// hands itself back through the [`ReturnToPool`] ticket it received on spawn.
pub trait Poolable: Sized {
    /// Called once per instance, right after the pool takes ownership of it.
    /// Never called again when the instance is reused.
    fn on_create(&mut self);

    /// Called every time the instance goes from idle to active.
    ///
    /// The instance must keep `ticket` until it despawns. This is the place
    /// to make the instance visible or otherwise live.
    fn on_spawn(&mut self, ticket: ReturnToPool<Self>);

    /// Called by the instance's own logic when it is done being active.
    ///
    /// Implementations must hand themselves back with
    /// [`ReturnToPool::release`], exactly once per active period. Resetting
    /// transient state may happen before or after that call.
    fn on_despawn(&mut self);
}
