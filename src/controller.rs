use crate::hooks::fire;
use crate::ticket::Recycle;
use crate::{
    Container, Factory, Placeable, PoolError, PoolHooks, PoolInitData, PoolSettings, Poolable,
    ReleaseError, ReturnToPool,
};
use alloc::{
    rc::{Rc, Weak},
    vec::Vec,
};
use core::{
    cell::{Ref, RefCell, RefMut},
    fmt, mem, ptr,
};
use log::{debug, error, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Idle,
    Active,
}

struct Slot<T> {
    cell: Rc<RefCell<T>>,
    state: SlotState,
}

struct State<T> {
    // Roster indices, used as a stack: the last slot released is served first.
    available: Vec<usize>,
    // Every instance this pool ever took in. Only grows until clean-up.
    roster: Vec<Slot<T>>,
    limit: Option<usize>,
    closed: bool,
}

impl<T> State<T> {
    fn has_room(&self) -> bool {
        self.limit.map_or(true, |max| self.roster.len() < max)
    }
}

struct Shared<T, F, C> {
    factory: F,
    container: C,
    hooks: RefCell<PoolHooks>,
    state: RefCell<State<T>>,
}

impl<T: Poolable, F, C: Container<T>> Shared<T, F, C> {
    /// Files a new instance under the container, enters it in the roster and
    /// runs its one-time creation hook.
    fn admit(&self, mut instance: T, initial: SlotState) -> (usize, Rc<RefCell<T>>) {
        self.container.adopt(&mut instance);
        let cell = Rc::new(RefCell::new(instance));
        let slot = {
            let mut state = self.state.borrow_mut();
            let slot = state.roster.len();
            state.roster.push(Slot {
                cell: cell.clone(),
                state: initial,
            });
            if initial == SlotState::Idle {
                state.available.push(slot);
            }
            slot
        };
        cell.borrow_mut().on_create();
        let hook = self.hooks.borrow().created();
        fire(hook);
        (slot, cell)
    }

    fn rollback(&self, slot: usize) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.roster.get_mut(slot) {
            entry.state = SlotState::Idle;
            state.available.push(slot);
        }
    }
}

impl<T, F, C: Container<T>> Recycle<T> for Shared<T, F, C> {
    fn recycle(&self, slot: usize, instance: &mut T) -> Result<(), ReleaseError> {
        {
            let mut state = self.state.borrow_mut();
            if state.closed {
                return Err(ReleaseError::PoolClosed);
            }
            let entry = state
                .roster
                .get_mut(slot)
                .ok_or(ReleaseError::PoolClosed)?;
            if !ptr::eq(entry.cell.as_ptr(), &*instance) {
                return Err(ReleaseError::Mismatch { slot });
            }
            // A ticket is consumed on release and only issued on spawn.
            debug_assert_eq!(entry.state, SlotState::Active);
            entry.state = SlotState::Idle;
            state.available.push(slot);
        }
        self.container.adopt(instance);
        trace!("slot {slot} returned to pool");
        let hook = self.hooks.borrow().despawned();
        fire(hook);
        Ok(())
    }
}

/// A single-threaded pool of reusable `T` instances.
///
/// The controller creates instances through its [`Factory`] only when no idle
/// instance is available and the optional ceiling allows it, hands them out
/// through [`Self::acquire`], and takes them back when the instance releases
/// its [`ReturnToPool`] ticket. Idle instances are reused last-in, first-out.
///
/// All methods take `&self`; the controller never keeps its own state
/// borrowed while it runs factory, container, hook or [`Poolable`] code, so
/// any of those may call back into the pool.
pub struct PoolController<T, F, C> {
    shared: Option<Rc<Shared<T, F, C>>>,
}

impl<T, F, C> PoolController<T, F, C>
where
    T: Poolable + 'static,
    F: Factory<T> + 'static,
    C: Container<T> + 'static,
{
    /// Creates a new pool.
    ///
    /// `max_count` caps how many instances the pool may ever hold; zero or a
    /// negative value means no cap. Instances already living in `container`
    /// (see [`Container::take_existing`]) are absorbed as idle, and the cap is
    /// raised to their number if it would otherwise be lower.
    pub fn new(factory: F, container: C, max_count: i64, hooks: PoolHooks) -> Self {
        Self::build(
            factory,
            container,
            PoolSettings::with_max_pool_size(max_count),
            hooks,
        )
    }

    /// Creates a pool from a prepared description, failing if the factory or
    /// the container is missing.
    pub fn try_from_init(init: PoolInitData<F, C>) -> Result<Self, PoolError> {
        let factory = init.factory.ok_or(PoolError::MissingFactory)?;
        let container = init.container.ok_or(PoolError::MissingContainer)?;
        Ok(Self::build(factory, container, init.settings, init.hooks))
    }

    /// Creates a pool from a prepared description.
    ///
    /// A missing factory or container is logged and yields an inert pool:
    /// every acquire returns `None` and clean-up does nothing.
    pub fn from_init(init: PoolInitData<F, C>) -> Self {
        Self::try_from_init(init).unwrap_or_else(|err| {
            error!("cannot set up pool ({}): {err}", err.as_label());
            PoolController { shared: None }
        })
    }

    fn build(factory: F, mut container: C, settings: PoolSettings, hooks: PoolHooks) -> Self {
        let existing = container.take_existing();
        let absorbed = existing.len();
        let mut limit = settings.limit();
        if let Some(max) = limit {
            if absorbed > max {
                debug!("raising pool limit from {max} to {absorbed} to keep pre-existing instances");
                limit = Some(absorbed);
            }
        }

        let shared = Rc::new(Shared {
            factory,
            container,
            hooks: RefCell::new(hooks),
            state: RefCell::new(State {
                available: Vec::with_capacity(absorbed),
                roster: Vec::with_capacity(absorbed),
                limit,
                closed: false,
            }),
        });
        for instance in existing {
            shared.admit(instance, SlotState::Idle);
        }
        debug!("pool ready with {absorbed} absorbed instances, limit {limit:?}");
        PoolController {
            shared: Some(shared),
        }
    }

    /// Creates up to `count` idle instances ahead of time, stopping early at
    /// the ceiling. Returns how many were created.
    pub fn prefill(&self, count: usize) -> usize {
        let Some(shared) = self.shared.as_ref() else {
            return 0;
        };
        let mut created = 0;
        while created < count {
            {
                let state = shared.state.borrow();
                if state.closed || !state.has_room() {
                    break;
                }
            }
            shared.admit(shared.factory.create(), SlotState::Idle);
            created += 1;
        }
        debug!("prefilled pool with {created} of {count} requested instances");
        created
    }

    /// Gets an instance from the pool and spawns it.
    ///
    /// The most recently released idle instance is preferred, skipping idle
    /// instances that are borrowed at the moment. If there is none, a new one
    /// is created as long as the ceiling allows. Returns
    /// `None` when the pool is capped and everything is in use, or when the
    /// pool is inert or cleaned up.
    pub fn acquire(&self) -> Option<Pooled<T>> {
        let Some(shared) = self.shared.as_ref() else {
            trace!("acquire on an unconfigured pool");
            return None;
        };

        let reused = {
            let mut state = shared.state.borrow_mut();
            if state.closed {
                trace!("acquire on a cleaned up pool");
                return None;
            }
            // An idle instance can still be borrowed while it is being filed
            // back (inside its own on_despawn, the container or a hook); those
            // stay on the stack and the next one down is served instead.
            let free = state
                .available
                .iter()
                .rposition(|&slot| state.roster[slot].cell.try_borrow_mut().is_ok());
            match free {
                Some(index) => {
                    let slot = state.available.remove(index);
                    let entry = &mut state.roster[slot];
                    entry.state = SlotState::Active;
                    Some((slot, entry.cell.clone()))
                }
                None if state.has_room() => None,
                None => {
                    trace!("pool exhausted at {} instances", state.roster.len());
                    return None;
                }
            }
        };
        let (slot, cell) = match reused {
            Some(found) => {
                trace!("reusing slot {}", found.0);
                found
            }
            None => {
                let created = shared.admit(shared.factory.create(), SlotState::Active);
                trace!("created slot {}", created.0);
                created
            }
        };

        let weak = Rc::downgrade(shared);
        let pool: Weak<dyn Recycle<T>> = weak;
        let ticket = ReturnToPool::new(slot, pool);
        match cell.try_borrow_mut() {
            Ok(mut instance) => instance.on_spawn(ticket),
            Err(_) => {
                warn!("slot {slot} is borrowed elsewhere, cannot spawn it");
                shared.rollback(slot);
                return None;
            }
        }
        let hook = shared.hooks.borrow().spawned();
        fire(hook);
        Some(Pooled { slot, cell })
    }

    /// Destroys every instance the pool ever created or absorbed and shuts the
    /// pool down for good.
    ///
    /// Instances that are checked out are destroyed too. Each one goes through
    /// [`Container::destroy`], unless it is borrowed at that moment, in which
    /// case it is skipped with a warning. Hooks are dropped, and later acquires
    /// return `None`. Calling this again does nothing.
    pub fn clean_up(&self) {
        let Some(shared) = self.shared.as_ref() else {
            return;
        };
        let roster = {
            let mut state = shared.state.borrow_mut();
            if state.closed {
                return;
            }
            state.closed = true;
            state.available = Vec::new();
            mem::take(&mut state.roster)
        };
        *shared.hooks.borrow_mut() = PoolHooks::new();

        debug!("cleaning up pool of {} instances", roster.len());
        for (slot, entry) in roster.into_iter().enumerate() {
            match entry.cell.try_borrow_mut() {
                Ok(mut instance) => shared.container.destroy(&mut instance),
                Err(_) => warn!("slot {slot} is borrowed during clean-up, skipping destroy"),
            }
        }
    }
}

impl<T, F, C> PoolController<T, F, C>
where
    T: Poolable + Placeable + 'static,
    F: Factory<T> + 'static,
    C: Container<T> + 'static,
{
    /// Gets an instance and moves it to `position` without re-parenting it.
    pub fn acquire_at(&self, position: T::Position) -> Option<Pooled<T>> {
        let pooled = self.acquire()?;
        pooled.borrow_mut().set_position(position);
        Some(pooled)
    }

    /// Gets an instance, moves it to `position` and applies `rotation`.
    pub fn acquire_at_rotated(
        &self,
        position: T::Position,
        rotation: T::Rotation,
    ) -> Option<Pooled<T>> {
        let pooled = self.acquire_at(position)?;
        pooled.borrow_mut().set_rotation(rotation);
        Some(pooled)
    }

    /// Gets an instance, parents it under `anchor` and puts it on the
    /// anchor's origin, so it follows the anchor from then on.
    pub fn acquire_attached(&self, anchor: &T::Anchor, preserve_world: bool) -> Option<Pooled<T>> {
        let pooled = self.acquire()?;
        {
            let mut instance = pooled.borrow_mut();
            instance.attach_to(anchor, preserve_world);
            instance.reset_local_position();
        }
        Some(pooled)
    }

    /// Same as [`Self::acquire_attached`], then applies `rotation` last.
    pub fn acquire_attached_rotated(
        &self,
        anchor: &T::Anchor,
        preserve_world: bool,
        rotation: T::Rotation,
    ) -> Option<Pooled<T>> {
        let pooled = self.acquire_attached(anchor, preserve_world)?;
        pooled.borrow_mut().set_rotation(rotation);
        Some(pooled)
    }
}

impl<T, F, C> PoolController<T, F, C> {
    fn with_state<R>(&self, f: impl FnOnce(&State<T>) -> R) -> Option<R> {
        self.shared.as_ref().map(|shared| f(&shared.state.borrow()))
    }

    /// Gets the number of idle instances ready to be handed out.
    pub fn idle_count(&self) -> usize {
        self.with_state(|state| state.available.len()).unwrap_or(0)
    }

    /// Gets the number of instances currently checked out.
    pub fn active_count(&self) -> usize {
        self.with_state(|state| {
            state
                .roster
                .iter()
                .filter(|entry| entry.state == SlotState::Active)
                .count()
        })
        .unwrap_or(0)
    }

    /// Gets the number of instances the pool manages, idle or not.
    pub fn instance_count(&self) -> usize {
        self.with_state(|state| state.roster.len()).unwrap_or(0)
    }

    /// Gets the effective ceiling, `None` when unbounded.
    ///
    /// This can be higher than the configured value if the container held more
    /// pre-existing instances than that.
    pub fn capacity(&self) -> Option<usize> {
        self.with_state(|state| state.limit).flatten()
    }

    /// Returns `false` for a pool that was misconfigured or cleaned up.
    pub fn is_usable(&self) -> bool {
        self.with_state(|state| !state.closed).unwrap_or(false)
    }
}

impl<T, F, C> fmt::Debug for PoolController<T, F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolController")
            .field("usable", &self.is_usable())
            .field("idle", &self.idle_count())
            .field("instances", &self.instance_count())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// A handle to an instance handed out by a [`PoolController`].
///
/// Handles are cheap to clone and compare by identity: two handles are equal
/// when they point at the same pooled instance. Dropping a handle does not
/// return anything to the pool; only the instance's [`ReturnToPool`] ticket
/// does that.
pub struct Pooled<T> {
    slot: usize,
    cell: Rc<RefCell<T>>,
}

impl<T> Pooled<T> {
    /// The roster slot of this instance, stable for the pool's lifetime.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Immutably borrows the instance.
    ///
    /// # Panics
    ///
    /// Panics if the instance is currently mutably borrowed, like
    /// [`RefCell::borrow`].
    pub fn borrow(&self) -> Ref<'_, T> {
        self.cell.borrow()
    }

    /// Mutably borrows the instance.
    ///
    /// # Panics
    ///
    /// Panics if the instance is currently borrowed, like
    /// [`RefCell::borrow_mut`].
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.cell.borrow_mut()
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Poolable> Pooled<T> {
    /// Runs the instance's [`Poolable::on_despawn`], which hands it back to
    /// the pool.
    ///
    /// If the instance is borrowed at the moment nothing happens and a warning
    /// is logged; the instance stays active.
    pub fn despawn(&self) {
        match self.cell.try_borrow_mut() {
            Ok(mut instance) => instance.on_despawn(),
            Err(_) => warn!("slot {} is borrowed, cannot despawn it", self.slot),
        }
    }
}

impl<T> Clone for Pooled<T> {
    fn clone(&self) -> Self {
        Pooled {
            slot: self.slot,
            cell: self.cell.clone(),
        }
    }
}

impl<T> PartialEq for Pooled<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
impl<T> Eq for Pooled<T> {}

impl<T: fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Pooled");
        out.field("slot", &self.slot);
        match self.cell.try_borrow() {
            Ok(instance) => out.field("instance", &*instance),
            Err(_) => out.field("instance", &"<borrowed>"),
        };
        out.finish()
    }
}
