use std::sync::Arc;
use std::time::{Duration, Instant};

use petri::{
    decode, encode, ChangeFeed, ClientMessage, ConnectionState, ReplicaStore, ServerMessage,
    Session, REJECT_RESUME,
};

use super::config::ClientConfig;
use super::input::PointerInput;
use super::intent::IntentThrottler;
use super::interpolation::Interpolator;
use super::latency::LatencyEstimator;
use super::transport::{Connector, Transport, TransportEvent};

/// Client-side session engine.
///
/// Owns the transport handle and everything that reacts to it: the
/// connection state machine, the change feed into the replica store, the
/// latency estimator and the outbound throttler. Driven by `update` once per
/// simulation tick; inbound traffic is drained from the transport channel at
/// the top of each tick, so every state transition happens on the tick
/// thread.
pub struct GameClient<C: Connector> {
    connector: C,
    transport: Option<C::Transport>,
    config: ClientConfig,
    state: ConnectionState,
    session: Session,
    self_id: Option<String>,
    store: Arc<ReplicaStore>,
    feed: ChangeFeed,
    latency: LatencyEstimator,
    intent: IntentThrottler,
    interpolator: Interpolator,
    watchdog: Duration,
    health_check_interval: Duration,
    connect_timeout: Duration,
    last_health_check: Option<Instant>,
    connect_started: Option<Instant>,
    auto_reconnect: bool,
}

impl<C: Connector> GameClient<C> {
    pub fn new(connector: C, config: ClientConfig) -> Self {
        let store = Arc::new(ReplicaStore::new());
        Self {
            connector,
            transport: None,
            state: ConnectionState::Disconnected,
            session: Session::new(),
            self_id: None,
            feed: ChangeFeed::new(Arc::clone(&store)),
            store,
            latency: LatencyEstimator::new(Duration::from_secs_f32(config.ping_interval_secs)),
            intent: IntentThrottler::new(Duration::from_millis(config.intent_interval_ms)),
            interpolator: Interpolator::default(),
            watchdog: Duration::from_secs_f32(config.watchdog_secs),
            health_check_interval: Duration::from_secs_f32(config.health_check_interval_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            last_health_check: None,
            connect_started: None,
            auto_reconnect: false,
            config,
        }
    }

    /// Start (or restart) the session and keep it alive until
    /// [`GameClient::disconnect`].
    pub fn connect(&mut self, now: Instant) {
        self.auto_reconnect = true;
        if self.state == ConnectionState::Disconnected {
            self.initiate(now);
        }
    }

    /// Intentional close. No reconnection until the caller connects again.
    pub fn disconnect(&mut self) {
        if let Some(transport) = self.transport.as_mut() {
            transport.close();
        }
        self.transport = None;
        self.state = ConnectionState::Disconnected;
        self.connect_started = None;
        self.auto_reconnect = false;
        log::info!("disconnected");
    }

    /// One simulation tick: drain inbound traffic, advance interpolation,
    /// emit due probe/heading messages, run the periodic health check.
    pub fn update(&mut self, now: Instant, pointer: Option<PointerInput>) {
        self.drain_transport(now);

        match self.state {
            ConnectionState::Connecting => {
                if self
                    .connect_started
                    .is_some_and(|started| now.saturating_duration_since(started) > self.connect_timeout)
                {
                    log::warn!("join timed out");
                    self.fail_connection();
                }
            }
            ConnectionState::Connected => {
                self.interpolator
                    .advance(&self.store, self.self_id.as_deref(), self.latency.self_lerp());

                if self.latency.probe_due(now) && self.send(ClientMessage::Ping) {
                    self.latency.on_probe_sent(now);
                }

                if let Some(pointer) = pointer {
                    if let Some(angle) = self.intent.pump(now, pointer.heading_degrees()) {
                        self.send(ClientMessage::Angle { angle });
                    }
                }
            }
            ConnectionState::Disconnected => {}
        }

        let due = self
            .last_health_check
            .is_none_or(|at| now.saturating_duration_since(at) >= self.health_check_interval);
        if due {
            self.last_health_check = Some(now);
            self.health_check(now);
        }
    }

    fn health_check(&mut self, now: Instant) {
        match self.state {
            ConnectionState::Disconnected if self.auto_reconnect => {
                self.initiate(now);
            }
            ConnectionState::Connected => {
                if self.latency.silence(now) > self.watchdog {
                    log::warn!("no pong within watchdog window, declaring connection dead");
                    self.fail_connection();
                }
            }
            _ => {}
        }
    }

    fn initiate(&mut self, now: Instant) {
        self.state = ConnectionState::Connecting;
        self.connect_started = Some(now);

        match self.connector.connect() {
            Ok(transport) => {
                self.transport = Some(transport);
                let request = match self.session.resume() {
                    Some((room, token)) => {
                        log::info!("resuming session in room {room}");
                        ClientMessage::Resume {
                            room: room.to_string(),
                            session: token.to_string(),
                        }
                    }
                    None => {
                        log::info!("joining {} room", self.config.room_mode);
                        ClientMessage::Join {
                            mode: self.config.room_mode.clone(),
                        }
                    }
                };
                self.send(request);
            }
            Err(e) => {
                // Transient: keep the session token and let the health
                // check retry on its own cadence.
                log::warn!("connect failed: {e}");
                self.state = ConnectionState::Disconnected;
                self.connect_started = None;
            }
        }
    }

    fn drain_transport(&mut self, now: Instant) {
        loop {
            let Some(transport) = self.transport.as_mut() else {
                return;
            };
            let Some(event) = transport.try_recv() else {
                return;
            };
            match event {
                TransportEvent::Frame(frame) => self.handle_frame(now, &frame),
                TransportEvent::Closed { normal } => {
                    self.handle_close(normal);
                    return;
                }
            }
        }
    }

    fn handle_frame(&mut self, now: Instant, frame: &str) {
        let message = match decode(frame) {
            Ok(message) => message,
            Err(e) => {
                // A malformed frame must never take the connection down.
                log::debug!("ignoring undecodable frame: {e}");
                return;
            }
        };

        match message {
            ServerMessage::Joined {
                room,
                session,
                self_id,
            } => self.handle_joined(now, room, session, self_id),
            ServerMessage::Reject { reason } => self.handle_reject(&reason),
            ServerMessage::Pong => self.latency.on_pong(now),
            other => self.feed.apply(&other),
        }
    }

    fn handle_joined(&mut self, now: Instant, room: String, token: String, self_id: String) {
        if self.state != ConnectionState::Connecting {
            log::debug!("ignoring joined message outside of a join attempt");
            return;
        }
        log::info!("joined room {room} as {self_id}");

        self.session.store(room, token);
        self.self_id = Some(self_id);
        // Stale entities stay visible through an outage; the new session's
        // state replaces them only now.
        self.store.clear();
        self.latency.reset(now);
        self.intent.reset();
        self.state = ConnectionState::Connected;
        self.connect_started = None;
    }

    fn handle_reject(&mut self, reason: &str) {
        if reason == REJECT_RESUME {
            log::warn!("session resume rejected, next attempt will join fresh");
            self.session.clear();
            self.self_id = None;
        } else {
            log::warn!("server rejected connection: {reason}");
        }
        self.fail_connection();
    }

    fn handle_close(&mut self, normal: bool) {
        self.transport = None;
        self.state = ConnectionState::Disconnected;
        self.connect_started = None;
        if normal {
            log::info!("connection closed by server");
            self.auto_reconnect = false;
        } else {
            log::warn!("connection lost");
        }
    }

    /// Drop the transport and fall back to `Disconnected`, keeping the
    /// session so the next attempt can resume.
    fn fail_connection(&mut self) {
        if let Some(transport) = self.transport.as_mut() {
            transport.close();
        }
        self.transport = None;
        self.state = ConnectionState::Disconnected;
        self.connect_started = None;
    }

    fn send(&mut self, message: ClientMessage) -> bool {
        let Some(transport) = self.transport.as_mut() else {
            return false;
        };
        let frame = match encode(&message) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("failed to encode message: {e}");
                return false;
            }
        };
        match transport.send(frame) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("send failed: {e}");
                self.fail_connection();
                false
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Id of the actor this client controls, once a session is established.
    pub fn self_id(&self) -> Option<&str> {
        self.self_id.as_deref()
    }

    /// Shared handle to the replica store, for the external renderer.
    pub fn store(&self) -> Arc<ReplicaStore> {
        Arc::clone(&self.store)
    }

    pub fn self_lerp(&self) -> f32 {
        self.latency.self_lerp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::transport::ChannelConnector;

    #[test]
    fn test_new_client_is_disconnected() {
        let (connector, _peers) = ChannelConnector::new();
        let client = GameClient::new(connector, ClientConfig::default());

        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(client.self_id().is_none());
        assert!(client.session().resume().is_none());
    }
}
