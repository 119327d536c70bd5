mod client;
mod config;
mod input;
mod intent;
mod interpolation;
mod latency;
mod transport;

pub use client::GameClient;
pub use config::ClientConfig;
pub use input::PointerInput;
pub use intent::IntentThrottler;
pub use interpolation::{Interpolator, OTHER_PLAYERS_LERP};
pub use latency::{
    lerp_for_latency, LatencyEstimator, LATENCY_MAX_MS, LATENCY_MIN_MS, LERP_MAX, LERP_MIN,
};
pub use transport::{
    channel_pair, ChannelConnector, ChannelPeer, ChannelTransport, Connector, Transport,
    TransportError, TransportEvent, WsConnector, WsTransport,
};
