mod protocol;
mod session;

pub use protocol::{
    ClientMessage, ProtocolError, ServerMessage, WireValue, decode, encode, DEFAULT_ENDPOINT,
    DEFAULT_ROOM_MODE, REJECT_RESUME,
};
pub use session::{ConnectionState, Session};
