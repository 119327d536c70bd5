#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Credentials issued by the server on a successful join.
///
/// While both halves are present the client resumes the existing room on
/// reconnect; after [`Session::clear`] the next attempt is a fresh join.
#[derive(Debug, Clone, Default)]
pub struct Session {
    room_id: Option<String>,
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, room_id: String, token: String) {
        self.room_id = Some(room_id);
        self.token = Some(token);
    }

    pub fn clear(&mut self) {
        self.room_id = None;
        self.token = None;
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Both halves of the credential, when a resume is possible.
    pub fn resume(&self) -> Option<(&str, &str)> {
        match (self.room_id.as_deref(), self.token.as_deref()) {
            (Some(room), Some(token)) => Some((room, token)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_has_no_resume() {
        assert!(Session::new().resume().is_none());
    }

    #[test]
    fn test_store_then_clear() {
        let mut session = Session::new();
        session.store("room-1".into(), "token-1".into());
        assert_eq!(session.resume(), Some(("room-1", "token-1")));

        session.clear();
        assert!(session.resume().is_none());
        assert!(session.room_id().is_none());
        assert!(session.token().is_none());
    }
}
