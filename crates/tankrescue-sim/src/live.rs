//! Live entity lists.
//!
//! Every system that removes entities while scanning walks these lists by
//! descending index, so a removal never skips or repeats an entry.

use hecs::{Entity, World};

use tankrescue_core::components::{Active, Bullet, Crate, Destroyed, Pilot};
use tankrescue_core::types::Position;

#[derive(Debug, Clone, Default)]
pub struct LiveLists {
    pub enemies: Vec<Entity>,
    /// Includes lingering wrecks until cleanup despawns them.
    pub crates: Vec<Entity>,
    pub bullets: Vec<Entity>,
    pub pilots: Vec<Entity>,
}

impl LiveLists {
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.crates.clear();
        self.bullets.clear();
        self.pilots.clear();
    }
}

/// Whether an entity still exists and has not been killed.
pub fn is_present(world: &World, entity: Entity) -> bool {
    match world.entity(entity) {
        Ok(entity_ref) => {
            if entity_ref.has::<Destroyed>() {
                return false;
            }
            let pooled = entity_ref.has::<Bullet>() || entity_ref.has::<Pilot>();
            !pooled || entity_ref.has::<Active>()
        }
        Err(_) => false,
    }
}

/// Whether an entity counts toward its population minimum. Wrecks are
/// present but no longer count.
pub fn counts_toward_population(world: &World, entity: Entity) -> bool {
    if !is_present(world, entity) {
        return false;
    }
    match world.get::<&Crate>(entity) {
        Ok(c) => !c.is_wreck(),
        Err(_) => true,
    }
}

/// Positions of the present entities in `entities`, in list order.
pub fn positions(world: &World, entities: &[Entity]) -> Vec<Position> {
    entities
        .iter()
        .filter(|&&entity| is_present(world, entity))
        .filter_map(|&entity| world.get::<&Position>(entity).ok().map(|p| *p))
        .collect()
}
