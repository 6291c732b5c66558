#![allow(dead_code)]

use spawnpool::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A callback filled in after the pool exists, so hooks can reach the pool.
pub type Deferred<R> = Rc<RefCell<Option<Box<dyn Fn() -> R>>>>;

pub fn call<R: Default>(deferred: &Deferred<R>) -> R {
    deferred.borrow().as_ref().map(|f| f()).unwrap_or_default()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Default)]
pub struct Counters {
    pub created: Cell<usize>,
    pub spawned: Cell<usize>,
    pub despawned: Cell<usize>,
    pub destroyed: Cell<usize>,
}

fn bump(cell: &Cell<usize>) {
    cell.set(cell.get() + 1);
}

#[derive(Debug)]
pub struct Bullet {
    pub id: usize,
    pub counters: Rc<Counters>,
    pub creates: usize,
    pub spawns: usize,
    pub active: bool,
    pub velocity: f32,
    pub home: Option<&'static str>,
    pub ticket: Option<ReturnToPool<Bullet>>,
    pub last_release: Option<Result<(), ReleaseError>>,
    pub placement: Vec<String>,
}

impl Bullet {
    pub fn new(id: usize, counters: Rc<Counters>) -> Self {
        Bullet {
            id,
            counters,
            creates: 0,
            spawns: 0,
            active: false,
            velocity: 0.0,
            home: None,
            ticket: None,
            last_release: None,
            placement: Vec::new(),
        }
    }

    pub fn fire(&mut self) {
        self.velocity = 5.0;
    }
}

impl Poolable for Bullet {
    fn on_create(&mut self) {
        self.creates += 1;
        bump(&self.counters.created);
    }

    fn on_spawn(&mut self, ticket: ReturnToPool<Self>) {
        self.ticket = Some(ticket);
        self.spawns += 1;
        self.active = true;
        bump(&self.counters.spawned);
    }

    fn on_despawn(&mut self) {
        self.active = false;
        self.velocity = 0.0;
        bump(&self.counters.despawned);
        if let Some(ticket) = self.ticket.take() {
            let result = ticket.try_release(self);
            self.last_release = Some(result);
        }
    }
}

impl Placeable for Bullet {
    type Position = [f32; 3];
    type Rotation = f32;
    type Anchor = str;

    fn set_position(&mut self, position: [f32; 3]) {
        self.placement.push(format!("position {position:?}"));
    }

    fn set_rotation(&mut self, rotation: f32) {
        self.placement.push(format!("rotation {rotation}"));
    }

    fn attach_to(&mut self, anchor: &str, preserve_world: bool) {
        self.placement
            .push(format!("attach {anchor} preserve_world={preserve_world}"));
    }

    fn reset_local_position(&mut self) {
        self.placement.push("origin".to_string());
    }
}

/// Factory handing out bullets with increasing ids.
pub fn bullet_factory(counters: &Rc<Counters>) -> impl Fn() -> Bullet + 'static {
    let counters = counters.clone();
    let next_id = Cell::new(0);
    move || {
        let id = next_id.get();
        next_id.set(id + 1);
        Bullet::new(id, counters.clone())
    }
}

/// A container that can hold pre-made bullets and records tear-downs.
pub struct Magazine {
    pub name: &'static str,
    pub preloaded: Vec<Bullet>,
    pub counters: Rc<Counters>,
}

impl Magazine {
    pub fn new(counters: &Rc<Counters>) -> Self {
        Magazine {
            name: "magazine",
            preloaded: Vec::new(),
            counters: counters.clone(),
        }
    }

    pub fn preloaded(counters: &Rc<Counters>, count: usize) -> Self {
        let mut magazine = Magazine::new(counters);
        magazine.preloaded = (0..count)
            .map(|i| Bullet::new(1000 + i, counters.clone()))
            .collect();
        magazine
    }
}

impl Container<Bullet> for Magazine {
    fn adopt(&self, instance: &mut Bullet) {
        instance.home = Some(self.name);
    }

    fn take_existing(&mut self) -> Vec<Bullet> {
        std::mem::take(&mut self.preloaded)
    }

    fn destroy(&self, instance: &mut Bullet) {
        instance.active = false;
        instance.home = None;
        bump(&self.counters.destroyed);
    }
}

pub fn assert_balanced<T, F, C>(pool: &PoolController<T, F, C>) {
    assert_eq!(
        pool.idle_count() + pool.active_count(),
        pool.instance_count(),
        "idle + active must equal the roster size"
    );
}
