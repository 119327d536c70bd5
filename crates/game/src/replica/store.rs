use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::entity::{Actor, Collectible, WorldBounds};

/// Thread-safe mirror of the server's replicated collections.
///
/// The change feed is the only writer of authoritative fields; the
/// interpolation pass advances rendered positions and renderers take cloned
/// snapshots. Each kind has its own lock, entities are inserted whole, and
/// every operation holds the lock for its full duration, so a reader never
/// observes a partially constructed or partially updated entry.
#[derive(Debug, Default)]
pub struct ReplicaStore {
    actors: Mutex<HashMap<String, Actor>>,
    collectibles: Mutex<HashMap<String, Collectible>>,
    bounds: Mutex<WorldBounds>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReplicaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_actor(&self, id: impl Into<String>, actor: Actor) {
        lock(&self.actors).insert(id.into(), actor);
    }

    /// Apply a partial update to a known actor. Returns false when the id is
    /// absent (update raced ahead of its add, or arrived after the remove).
    pub fn update_actor(&self, id: &str, apply: impl FnOnce(&mut Actor)) -> bool {
        match lock(&self.actors).get_mut(id) {
            Some(actor) => {
                apply(actor);
                true
            }
            None => false,
        }
    }

    pub fn remove_actor(&self, id: &str) -> bool {
        lock(&self.actors).remove(id).is_some()
    }

    pub fn actor(&self, id: &str) -> Option<Actor> {
        lock(&self.actors).get(id).cloned()
    }

    /// Cloned view of every actor, taken under the lock.
    pub fn actors(&self) -> Vec<(String, Actor)> {
        lock(&self.actors)
            .iter()
            .map(|(id, actor)| (id.clone(), actor.clone()))
            .collect()
    }

    /// Visit every actor mutably in one locked pass. Used by the
    /// interpolation engine to advance rendered positions.
    pub fn for_each_actor(&self, mut visit: impl FnMut(&str, &mut Actor)) {
        for (id, actor) in lock(&self.actors).iter_mut() {
            visit(id, actor);
        }
    }

    pub fn actor_count(&self) -> usize {
        lock(&self.actors).len()
    }

    pub fn insert_collectible(&self, id: impl Into<String>, collectible: Collectible) {
        lock(&self.collectibles).insert(id.into(), collectible);
    }

    pub fn update_collectible(&self, id: &str, apply: impl FnOnce(&mut Collectible)) -> bool {
        match lock(&self.collectibles).get_mut(id) {
            Some(collectible) => {
                apply(collectible);
                true
            }
            None => false,
        }
    }

    pub fn remove_collectible(&self, id: &str) -> bool {
        lock(&self.collectibles).remove(id).is_some()
    }

    pub fn collectible(&self, id: &str) -> Option<Collectible> {
        lock(&self.collectibles).get(id).cloned()
    }

    pub fn collectibles(&self) -> Vec<(String, Collectible)> {
        lock(&self.collectibles)
            .iter()
            .map(|(id, collectible)| (id.clone(), collectible.clone()))
            .collect()
    }

    pub fn collectible_count(&self) -> usize {
        lock(&self.collectibles).len()
    }

    pub fn bounds(&self) -> WorldBounds {
        *lock(&self.bounds)
    }

    pub fn update_bounds(&self, apply: impl FnOnce(&mut WorldBounds)) {
        apply(&mut lock(&self.bounds));
    }

    /// Drop all replicated state. Runs when a new session is established, so
    /// nothing leaks from one room into the next.
    pub fn clear(&self) {
        lock(&self.actors).clear();
        lock(&self.collectibles).clear();
        *lock(&self.bounds) = WorldBounds::default();
    }
}
