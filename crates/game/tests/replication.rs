use std::collections::HashSet;
use std::sync::Arc;

use petri::{decode, ChangeFeed, ReplicaStore};

fn apply_frames(feed: &ChangeFeed, frames: &[&str]) {
    for frame in frames {
        feed.apply(&decode(frame).unwrap());
    }
}

fn actor_ids(store: &ReplicaStore) -> HashSet<String> {
    store.actors().into_iter().map(|(id, _)| id).collect()
}

#[test]
fn test_replay_determines_final_id_set() {
    let store = Arc::new(ReplicaStore::new());
    let feed = ChangeFeed::new(Arc::clone(&store));

    apply_frames(
        &feed,
        &[
            r#"{"op":"add","path":"players","id":"a","fields":{"x":0,"y":0,"radius":40,"color":255}}"#,
            r#"{"op":"add","path":"players","id":"b","fields":{"x":10,"y":10,"radius":40,"color":255}}"#,
            r#"{"op":"update","path":"players","id":"a","field":"x","value":50.5}"#,
            r#"{"op":"remove","path":"players","id":"b"}"#,
            r#"{"op":"add","path":"players","id":"c","fields":{"x":5,"y":5,"radius":40,"color":255}}"#,
            r#"{"op":"remove","path":"players","id":"c"}"#,
            r#"{"op":"add","path":"players","id":"c","fields":{"x":7,"y":7,"radius":40,"color":255}}"#,
        ],
    );

    assert_eq!(
        actor_ids(&store),
        HashSet::from(["a".to_string(), "c".to_string()])
    );
    assert_eq!(store.actor("a").unwrap().target.x, 50.5);
    // The re-added entity carries the fresh field set, not the removed one's.
    assert_eq!(store.actor("c").unwrap().target.x, 7.0);
}

#[test]
fn test_updates_to_independent_ids_do_not_interfere() {
    let store = Arc::new(ReplicaStore::new());
    let feed = ChangeFeed::new(Arc::clone(&store));

    apply_frames(
        &feed,
        &[
            r#"{"op":"add","path":"players","id":"a","fields":{"x":1,"y":1,"radius":40,"color":255}}"#,
            r#"{"op":"add","path":"players","id":"b","fields":{"x":2,"y":2,"radius":40,"color":255}}"#,
            r#"{"op":"update","path":"players","id":"b","field":"y","value":20}"#,
            r#"{"op":"update","path":"players","id":"a","field":"y","value":10}"#,
        ],
    );

    assert_eq!(store.actor("a").unwrap().target.y, 10.0);
    assert_eq!(store.actor("b").unwrap().target.y, 20.0);
}

#[test]
fn test_mixed_collections_replay() {
    let store = Arc::new(ReplicaStore::new());
    let feed = ChangeFeed::new(Arc::clone(&store));

    apply_frames(
        &feed,
        &[
            r#"{"op":"add","path":"mapSize","id":"map","fields":{"width":1200,"height":1200}}"#,
            r#"{"op":"add","path":"fruits","id":"fr_0","fields":{"x":100,"y":100,"color":-16776961}}"#,
            r#"{"op":"add","path":"fruits","id":"fr_1","fields":{"x":200,"y":200,"color":-16776961}}"#,
            r#"{"op":"add","path":"players","id":"p","fields":{"x":0,"y":0,"radius":40,"color":255}}"#,
            r#"{"op":"remove","path":"fruits","id":"fr_0"}"#,
        ],
    );

    assert_eq!(store.actor_count(), 1);
    assert_eq!(store.collectible_count(), 1);
    assert!(store.collectible("fr_1").is_some());
    assert_eq!(store.bounds().width, 1200.0);
}

#[test]
fn test_update_before_add_is_dropped() {
    let store = Arc::new(ReplicaStore::new());
    let feed = ChangeFeed::new(Arc::clone(&store));

    apply_frames(
        &feed,
        &[
            r#"{"op":"update","path":"players","id":"late","field":"x","value":99}"#,
            r#"{"op":"add","path":"players","id":"late","fields":{"x":1,"y":1,"radius":40,"color":255}}"#,
        ],
    );

    // The stray early update must not resurrect or pre-seed the entity.
    assert_eq!(store.actor("late").unwrap().target.x, 1.0);
}
