use std::collections::BTreeMap;
use std::sync::Arc;

use crate::net::{ServerMessage, WireValue};

use super::entity::{Actor, Collectible, Rgba};
use super::store::ReplicaStore;

/// Collections the feed recognizes. Anything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Players,
    Fruits,
    MapSize,
}

impl Collection {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            "players" => Some(Collection::Players),
            "fruits" | "collectibles" => Some(Collection::Fruits),
            "mapSize" => Some(Collection::MapSize),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorField {
    X,
    Y,
    Radius,
    Color,
}

impl ActorField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(ActorField::X),
            "y" => Some(ActorField::Y),
            "radius" => Some(ActorField::Radius),
            "color" => Some(ActorField::Color),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollectibleField {
    X,
    Y,
    Color,
    Consumed,
}

impl CollectibleField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(CollectibleField::X),
            "y" => Some(CollectibleField::Y),
            "color" => Some(CollectibleField::Color),
            "consumed" => Some(CollectibleField::Consumed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundsField {
    Width,
    Height,
}

impl BoundsField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "width" => Some(BoundsField::Width),
            "height" => Some(BoundsField::Height),
            _ => None,
        }
    }
}

/// Applies decoded change events to the [`ReplicaStore`].
///
/// Decode anomalies — unknown paths, unknown fields, a value of the wrong
/// shape — are never an error: the offending field is skipped and the rest
/// of the event still applies. A newer server must not be able to kill the
/// connection by adding fields.
pub struct ChangeFeed {
    store: Arc<ReplicaStore>,
}

impl ChangeFeed {
    pub fn new(store: Arc<ReplicaStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ReplicaStore> {
        &self.store
    }

    /// Apply one server event. Session and control messages are not store
    /// traffic and fall through untouched.
    pub fn apply(&self, message: &ServerMessage) {
        match message {
            ServerMessage::Add { path, id, fields } => self.apply_add(path, id, fields),
            ServerMessage::Update {
                path,
                id,
                field,
                value,
            } => self.apply_update(path, id, field, *value),
            ServerMessage::Remove { path, id } => self.apply_remove(path, id),
            _ => {}
        }
    }

    fn apply_add(&self, path: &str, id: &str, fields: &BTreeMap<String, WireValue>) {
        match Collection::from_path(path) {
            Some(Collection::Players) => {
                let mut actor = Actor::default();
                for (name, value) in fields {
                    match ActorField::from_name(name) {
                        Some(field) => apply_actor_field(&mut actor, field, *value),
                        None => log::debug!("ignoring unknown player field {name:?}"),
                    }
                }
                // Spawn at the authoritative spot; interpolation only smooths
                // motion after creation.
                actor.position = actor.target;
                self.store.insert_actor(id, actor);
                log::debug!("player added: {id}");
            }
            Some(Collection::Fruits) => {
                let mut collectible = Collectible::default();
                for (name, value) in fields {
                    match CollectibleField::from_name(name) {
                        Some(field) => apply_collectible_init(&mut collectible, field, *value),
                        None => log::debug!("ignoring unknown fruit field {name:?}"),
                    }
                }
                self.store.insert_collectible(id, collectible);
            }
            Some(Collection::MapSize) => {
                for (name, value) in fields {
                    self.apply_bounds_field(name, *value);
                }
            }
            None => log::debug!("ignoring add for unknown path {path:?}"),
        }
    }

    fn apply_update(&self, path: &str, id: &str, field: &str, value: WireValue) {
        match Collection::from_path(path) {
            Some(Collection::Players) => {
                let Some(field) = ActorField::from_name(field) else {
                    log::debug!("ignoring unknown player field {field:?}");
                    return;
                };
                self.store
                    .update_actor(id, |actor| apply_actor_field(actor, field, value));
            }
            Some(Collection::Fruits) => {
                let Some(field) = CollectibleField::from_name(field) else {
                    log::debug!("ignoring unknown fruit field {field:?}");
                    return;
                };
                match field {
                    CollectibleField::Consumed => {
                        if let Some(consumed) = value.as_bool() {
                            self.store
                                .update_collectible(id, |collectible| collectible.consumed = consumed);
                        }
                    }
                    // Fruit position and color are fixed at creation; the
                    // server only ever removes or flags a fruit afterwards.
                    CollectibleField::X | CollectibleField::Y | CollectibleField::Color => {}
                }
            }
            Some(Collection::MapSize) => self.apply_bounds_field(field, value),
            None => log::debug!("ignoring update for unknown path {path:?}"),
        }
    }

    fn apply_remove(&self, path: &str, id: &str) {
        match Collection::from_path(path) {
            Some(Collection::Players) => {
                self.store.remove_actor(id);
                log::debug!("player removed: {id}");
            }
            Some(Collection::Fruits) => {
                self.store.remove_collectible(id);
            }
            Some(Collection::MapSize) | None => {}
        }
    }

    fn apply_bounds_field(&self, name: &str, value: WireValue) {
        let Some(field) = BoundsField::from_name(name) else {
            log::debug!("ignoring unknown mapSize field {name:?}");
            return;
        };
        let Some(v) = value.as_f32() else {
            return;
        };
        self.store.update_bounds(|bounds| match field {
            BoundsField::Width => bounds.width = v,
            BoundsField::Height => bounds.height = v,
        });
    }
}

/// Write one normalized field into an actor. Authoritative x/y land on the
/// target position; the rendered position is owned by the interpolation pass.
fn apply_actor_field(actor: &mut Actor, field: ActorField, value: WireValue) {
    match field {
        ActorField::X => {
            if let Some(v) = value.as_f32() {
                actor.target.x = v;
            }
        }
        ActorField::Y => {
            if let Some(v) = value.as_f32() {
                actor.target.y = v;
            }
        }
        ActorField::Radius => {
            if let Some(v) = value.as_f32() {
                actor.radius = v;
            }
        }
        ActorField::Color => {
            if let Some(packed) = value.as_color() {
                actor.set_fill(Rgba::from_packed(packed));
            }
        }
    }
}

fn apply_collectible_init(collectible: &mut Collectible, field: CollectibleField, value: WireValue) {
    match field {
        CollectibleField::X => {
            if let Some(v) = value.as_f32() {
                collectible.position.x = v;
            }
        }
        CollectibleField::Y => {
            if let Some(v) = value.as_f32() {
                collectible.position.y = v;
            }
        }
        CollectibleField::Color => {
            if let Some(packed) = value.as_color() {
                collectible.fill = Rgba::from_packed(packed);
            }
        }
        CollectibleField::Consumed => {
            if let Some(consumed) = value.as_bool() {
                collectible.consumed = consumed;
            }
        }
    }
}
