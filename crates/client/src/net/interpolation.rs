use petri::ReplicaStore;

/// Fixed smoothing fraction for remote actors. Their true motion cannot be
/// predicted without velocity data, so every remote actor closes half the
/// gap per tick regardless of measured latency.
pub const OTHER_PLAYERS_LERP: f32 = 0.5;

/// Advances rendered positions toward their authoritative targets.
///
/// One-sided exponential smoothing: each tick closes a fraction of the
/// remaining gap, so the rendered position lags the target slightly and
/// update jitter never shows as a jump. Collectibles are static once created
/// and are never touched.
#[derive(Debug)]
pub struct Interpolator {
    other_lerp: f32,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self {
            other_lerp: OTHER_PLAYERS_LERP,
        }
    }
}

impl Interpolator {
    pub fn new(other_lerp: f32) -> Self {
        Self { other_lerp }
    }

    /// One simulation tick over every actor in the store. `self_lerp` is the
    /// latency-adapted fraction for the actor this client controls.
    pub fn advance(&self, store: &ReplicaStore, self_id: Option<&str>, self_lerp: f32) {
        store.for_each_actor(|id, actor| {
            let fraction = if Some(id) == self_id {
                self_lerp
            } else {
                self.other_lerp
            };
            actor.position = actor.position.lerp(actor.target, fraction);
        });
    }
}
