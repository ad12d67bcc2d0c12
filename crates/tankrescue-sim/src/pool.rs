//! Entity pool for short-lived, frequently spawned entities.
//!
//! Bullets and pilots are checked out of a pool instead of being spawned
//! and despawned every time. A parked entity stays in the hecs world with
//! its kind component but without the `Active` marker, so systems that
//! query `Active` never see it.

use std::marker::PhantomData;

use hecs::{Component, DynamicBundle, Entity, World};

use tankrescue_core::components::{Active, Bullet, ExpiryTimer, Pilot, Transform};
use tankrescue_core::types::Velocity;

/// A component type that identifies a pooled entity kind.
pub trait Poolable: Component {
    /// Name used in log output.
    const KIND: &'static str;

    /// Restore per-checkout state.
    fn reset(&mut self);
}

impl Poolable for Bullet {
    const KIND: &'static str = "bullet";

    fn reset(&mut self) {
        *self = Bullet::default();
    }
}

impl Poolable for Pilot {
    const KIND: &'static str = "pilot";

    fn reset(&mut self) {
        *self = Pilot::default();
    }
}

/// Result of returning an entity to its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Parked on the free-list for reuse.
    Recycled,
    /// Free-list was full; the entity was despawned.
    Destroyed,
    /// Entity was already parked. Nothing changed.
    AlreadyInactive,
    /// Entity no longer exists (or is not of this pool's kind).
    AlreadyDestroyed,
}

/// LIFO pool of hecs entities whose kind component is `T`.
#[derive(Debug)]
pub struct EntityPool<T> {
    free: Vec<Entity>,
    max_free: usize,
    created: usize,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Poolable> EntityPool<T> {
    pub fn new(max_free: usize) -> Self {
        Self {
            free: Vec::with_capacity(max_free),
            max_free,
            created: 0,
            _kind: PhantomData,
        }
    }

    /// Check out an entity: reuse the most recently parked one, or spawn a
    /// fresh one from `create()` when none is parked. The returned entity
    /// carries `Active` and default visuals; callers insert position and
    /// motion afterwards.
    pub fn acquire<B, F>(&mut self, world: &mut World, create: F) -> Entity
    where
        B: DynamicBundle,
        F: FnOnce() -> B,
    {
        while let Some(entity) = self.free.pop() {
            match world.get::<&mut T>(entity) {
                Ok(mut kind) => kind.reset(),
                Err(_) => {
                    tracing::debug!(kind = T::KIND, ?entity, "parked entity vanished, skipping");
                    continue;
                }
            }
            if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
                *transform = Transform::default();
            }
            if world.insert_one(entity, Active).is_ok() {
                return entity;
            }
        }

        let entity = world.spawn(create());
        // Freshly spawned, so the insert cannot miss.
        let _ = world.insert_one(entity, Active);
        self.created += 1;
        entity
    }

    /// Return a checked-out entity. Releasing twice is a no-op.
    pub fn release(&mut self, world: &mut World, entity: Entity) -> Release {
        let (has_kind, active) = match world.entity(entity) {
            Ok(entity_ref) => (entity_ref.has::<T>(), entity_ref.has::<Active>()),
            Err(_) => (false, false),
        };
        if !has_kind {
            tracing::debug!(kind = T::KIND, ?entity, "release of missing entity ignored");
            return Release::AlreadyDestroyed;
        }
        if !active {
            tracing::debug!(kind = T::KIND, ?entity, "double release ignored");
            return Release::AlreadyInactive;
        }

        let _ = world.remove_one::<Active>(entity);
        let _ = world.remove_one::<Velocity>(entity);
        let _ = world.remove_one::<ExpiryTimer>(entity);
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            *transform = Transform::default();
        }

        if self.free.len() >= self.max_free {
            tracing::debug!(kind = T::KIND, ?entity, "pool full, destroying instead of recycling");
            let _ = world.despawn(entity);
            return Release::Destroyed;
        }
        self.free.push(entity);
        Release::Recycled
    }

    /// Despawn every parked entity.
    pub fn clear(&mut self, world: &mut World) {
        for entity in self.free.drain(..) {
            let _ = world.despawn(entity);
        }
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Entities spawned by this pool so far.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn max_free(&self) -> usize {
        self.max_free
    }
}
