use std::sync::mpsc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc as tokio_mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("connect timed out")]
    ConnectTimeout,
    #[error("transport closed")]
    Closed,
}

/// What the transport hands the tick loop when it drains.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Frame(String),
    Closed { normal: bool },
}

/// Non-blocking seam between the socket and the tick loop.
///
/// Inbound traffic crosses execution contexts through a channel; `try_recv`
/// never blocks, so the simulation tick is free to drain whatever has
/// arrived and move on.
pub trait Transport {
    fn send(&mut self, frame: String) -> Result<(), TransportError>;
    fn try_recv(&mut self) -> Option<TransportEvent>;
    /// Request an orderly close. Best effort; errors are irrelevant because
    /// the transport is being torn down either way.
    fn close(&mut self);
}

/// Opens transports on demand. The lifecycle manager goes through this for
/// the initial connection and every reconnect.
pub trait Connector {
    type Transport: Transport;

    fn connect(&mut self) -> Result<Self::Transport, TransportError>;
}

/// WebSocket transport. A reader task and a writer task own the socket
/// halves inside the tokio runtime; the tick loop talks to them through
/// channels and never blocks on I/O.
pub struct WsTransport {
    outbound: tokio_mpsc::UnboundedSender<Message>,
    inbound: mpsc::Receiver<TransportEvent>,
}

impl Transport for WsTransport {
    fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.outbound
            .send(Message::text(frame))
            .map_err(|_| TransportError::Closed)
    }

    fn try_recv(&mut self) -> Option<TransportEvent> {
        self.inbound.try_recv().ok()
    }

    fn close(&mut self) {
        let _ = self.outbound.send(Message::Close(None));
    }
}

pub struct WsConnector {
    url: String,
    connect_timeout: Duration,
    runtime: tokio::runtime::Handle,
}

impl WsConnector {
    pub fn new(
        url: impl Into<String>,
        connect_timeout: Duration,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            url: url.into(),
            connect_timeout,
            runtime,
        }
    }
}

impl Connector for WsConnector {
    type Transport = WsTransport;

    fn connect(&mut self) -> Result<WsTransport, TransportError> {
        let url = self.url.clone();
        let connect_timeout = self.connect_timeout;

        let stream = self.runtime.block_on(async move {
            match tokio::time::timeout(connect_timeout, connect_async(url.as_str())).await {
                Err(_) => Err(TransportError::ConnectTimeout),
                Ok(Err(e)) => Err(TransportError::Connect(e.to_string())),
                Ok(Ok((stream, _response))) => Ok(stream),
            }
        })?;

        let (mut sink, mut source) = stream.split();
        let (outbound, mut outbound_rx) = tokio_mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound) = mpsc::channel();

        self.runtime.spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if sink.send(message).await.is_err() || closing {
                    break;
                }
            }
        });

        self.runtime.spawn(async move {
            let mut reason = TransportEvent::Closed { normal: false };
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if inbound_tx
                            .send(TransportEvent::Frame(text.to_string()))
                            .is_err()
                        {
                            // Tick side dropped the transport; nothing to report to.
                            return;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        let normal = frame.is_some_and(|f| f.code == CloseCode::Normal);
                        reason = TransportEvent::Closed { normal };
                        break;
                    }
                    Ok(_) => {} // binary/ping/pong frames are not part of the protocol
                    Err(e) => {
                        log::debug!("websocket read error: {e}");
                        break;
                    }
                }
            }
            let _ = inbound_tx.send(reason);
        });

        Ok(WsTransport { outbound, inbound })
    }
}

/// In-memory transport, for tests and offline development. The peer half is
/// plain channels, so a test can script inbound frames and closures and
/// inspect what the client transmitted, without a socket anywhere.
pub struct ChannelTransport {
    outbound: Option<mpsc::Sender<String>>,
    inbound: mpsc::Receiver<TransportEvent>,
}

/// The far end of a [`ChannelTransport`].
pub struct ChannelPeer {
    /// Frames the client transmitted.
    pub sent: mpsc::Receiver<String>,
    /// Frames and close events to deliver to the client.
    pub events: mpsc::Sender<TransportEvent>,
}

pub fn channel_pair() -> (ChannelTransport, ChannelPeer) {
    let (outbound_tx, outbound_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    (
        ChannelTransport {
            outbound: Some(outbound_tx),
            inbound: event_rx,
        },
        ChannelPeer {
            sent: outbound_rx,
            events: event_tx,
        },
    )
}

impl Transport for ChannelTransport {
    fn send(&mut self, frame: String) -> Result<(), TransportError> {
        match &self.outbound {
            Some(tx) => tx.send(frame).map_err(|_| TransportError::Closed),
            None => Err(TransportError::Closed),
        }
    }

    fn try_recv(&mut self) -> Option<TransportEvent> {
        self.inbound.try_recv().ok()
    }

    fn close(&mut self) {
        // Dropping the sender lets the peer observe the hangup.
        self.outbound = None;
    }
}

/// Hands out [`ChannelTransport`]s and exposes each connection's peer to the
/// test driving it. Can be told to refuse the next connection attempts to
/// exercise the transient-error path.
pub struct ChannelConnector {
    peers: mpsc::Sender<ChannelPeer>,
    refuse_next: usize,
}

impl ChannelConnector {
    pub fn new() -> (Self, mpsc::Receiver<ChannelPeer>) {
        let (peers, peer_rx) = mpsc::channel();
        (
            Self {
                peers,
                refuse_next: 0,
            },
            peer_rx,
        )
    }

    pub fn refuse_next_connects(&mut self, count: usize) {
        self.refuse_next = count;
    }
}

impl Connector for ChannelConnector {
    type Transport = ChannelTransport;

    fn connect(&mut self) -> Result<ChannelTransport, TransportError> {
        if self.refuse_next > 0 {
            self.refuse_next -= 1;
            return Err(TransportError::Connect("connection refused".into()));
        }
        let (transport, peer) = channel_pair();
        self.peers.send(peer).map_err(|_| TransportError::Closed)?;
        Ok(transport)
    }
}
