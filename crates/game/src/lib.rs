pub mod net;
pub mod replica;

pub use net::{
    decode, encode, ClientMessage, ConnectionState, ProtocolError, ServerMessage, Session,
    WireValue, DEFAULT_ENDPOINT, DEFAULT_ROOM_MODE, REJECT_RESUME,
};
pub use replica::{
    Actor, ChangeFeed, Collectible, ReplicaStore, Rgba, WorldBounds, DEFAULT_ACTOR_RADIUS,
    STROKE_DARKEN,
};
