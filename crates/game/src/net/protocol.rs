use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:2567";
pub const DEFAULT_ROOM_MODE: &str = "public";

/// Reject reason the server sends when a session resume is no longer valid.
pub const REJECT_RESUME: &str = "resume";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("frame encode failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("frame decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Messages the client writes to the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ClientMessage {
    Join { mode: String },
    Resume { room: String, session: String },
    Angle { angle: i32 },
    Ping,
}

/// Messages the server writes to the wire.
///
/// Change events (`Add`/`Update`/`Remove`) target a named collection via
/// `path`. Paths and field names stay plain strings here so a protocol
/// revision that adds collections or fields never fails the decode step;
/// unrecognized opcodes collapse into `Unknown` for the same reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ServerMessage {
    Joined {
        room: String,
        session: String,
        #[serde(rename = "self")]
        self_id: String,
    },
    Reject {
        reason: String,
    },
    Pong,
    Add {
        path: String,
        id: String,
        fields: BTreeMap<String, WireValue>,
    },
    Update {
        path: String,
        id: String,
        field: String,
        value: WireValue,
    },
    Remove {
        path: String,
        id: String,
    },
    #[serde(other)]
    Unknown,
}

/// A scalar as it appears on the wire.
///
/// Servers are free to emit any numeric representation for any field; the
/// store keeps everything as `f32`, so every representation narrows through
/// [`WireValue::as_f32`] before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl WireValue {
    pub fn as_f32(self) -> Option<f32> {
        match self {
            WireValue::Int(v) => Some(v as f32),
            WireValue::Float(v) => Some(v as f32),
            WireValue::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            WireValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Packed 0xRRGGBBAA color. The bit pattern is preserved, so a server
    /// that encodes colors as a signed 32-bit integer round-trips correctly.
    pub fn as_color(self) -> Option<u32> {
        match self {
            WireValue::Int(v) => Some(v as u32),
            WireValue::Float(v) if v.fract() == 0.0 => Some(v as i64 as u32),
            _ => None,
        }
    }
}

pub fn encode(message: &ClientMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}

pub fn decode(frame: &str) -> Result<ServerMessage, ProtocolError> {
    serde_json::from_str(frame).map_err(ProtocolError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_encoding() {
        let encoded = encode(&ClientMessage::Angle { angle: -135 }).unwrap();
        assert_eq!(encoded, r#"{"op":"angle","angle":-135}"#);
    }

    #[test]
    fn test_ping_encoding() {
        let encoded = encode(&ClientMessage::Ping).unwrap();
        assert_eq!(encoded, r#"{"op":"ping"}"#);
    }

    #[test]
    fn test_joined_decoding() {
        let msg = decode(r#"{"op":"joined","room":"r1","session":"s1","self":"p7"}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Joined {
                room: "r1".into(),
                session: "s1".into(),
                self_id: "p7".into(),
            }
        );
    }

    #[test]
    fn test_unknown_op_is_tolerated() {
        let msg = decode(r#"{"op":"leaderboard","top":[]}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn test_add_decodes_mixed_numeric_representations() {
        let msg = decode(
            r#"{"op":"add","path":"players","id":"p1","fields":{"x":10,"y":20.5,"radius":40.0,"color":1289353215}}"#,
        )
        .unwrap();
        let ServerMessage::Add { path, id, fields } = msg else {
            panic!("expected add");
        };
        assert_eq!(path, "players");
        assert_eq!(id, "p1");
        assert_eq!(fields["x"], WireValue::Int(10));
        assert_eq!(fields["y"], WireValue::Float(20.5));
        assert_eq!(fields["x"].as_f32(), Some(10.0));
        assert_eq!(fields["y"].as_f32(), Some(20.5));
    }

    #[test]
    fn test_wire_value_narrowing() {
        assert_eq!(WireValue::Int(7).as_f32(), Some(7.0));
        assert_eq!(WireValue::Float(7.25).as_f32(), Some(7.25));
        assert_eq!(WireValue::Bool(true).as_f32(), None);
        assert_eq!(WireValue::Bool(true).as_bool(), Some(true));
        assert_eq!(WireValue::Int(7).as_bool(), None);
    }

    #[test]
    fn test_color_preserves_bit_pattern() {
        // 0xe6194bff does not fit in i32; servers may send it as a negative
        // signed integer instead.
        let negative = 0xe6194bffu32 as i32 as i64;
        assert_eq!(WireValue::Int(negative).as_color(), Some(0xe6194bff));
        assert_eq!(WireValue::Int(0x4cb050ff).as_color(), Some(0x4cb050ff));
        assert_eq!(WireValue::Float(1.5).as_color(), None);
    }
}
