use std::time::{Duration, Instant};

pub const LATENCY_MIN_MS: f32 = 100.0;
pub const LATENCY_MAX_MS: f32 = 500.0;
pub const LERP_MIN: f32 = 0.1;
pub const LERP_MAX: f32 = 0.5;

/// Clamped linear map from round-trip time to the self smoothing fraction.
///
/// Higher latency means updates arrive less often, so each one is trusted
/// less: the rendered position catches up in smaller steps instead of
/// visibly jumping to every stale update.
pub fn lerp_for_latency(latency_ms: f32) -> f32 {
    let clamped = latency_ms.clamp(LATENCY_MIN_MS, LATENCY_MAX_MS);
    LERP_MAX + (clamped - LATENCY_MIN_MS) / (LATENCY_MAX_MS - LATENCY_MIN_MS) * (LERP_MIN - LERP_MAX)
}

/// Measures round-trip time with periodic ping probes and tracks when the
/// last pong was seen, which doubles as the stalled-connection watchdog
/// input.
#[derive(Debug)]
pub struct LatencyEstimator {
    ping_interval: Duration,
    self_lerp: f32,
    probe_sent_at: Option<Instant>,
    last_probe_at: Option<Instant>,
    last_pong_at: Instant,
}

impl LatencyEstimator {
    pub fn new(ping_interval: Duration) -> Self {
        Self {
            ping_interval,
            self_lerp: LERP_MAX,
            probe_sent_at: None,
            last_probe_at: None,
            last_pong_at: Instant::now(),
        }
    }

    /// Start a fresh session: forget outstanding probes and rebase the
    /// watchdog on `now`.
    pub fn reset(&mut self, now: Instant) {
        self.self_lerp = LERP_MAX;
        self.probe_sent_at = None;
        self.last_probe_at = None;
        self.last_pong_at = now;
    }

    /// Whether it is time to send the next probe. The first probe of a
    /// session is due immediately.
    pub fn probe_due(&self, now: Instant) -> bool {
        match self.last_probe_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= self.ping_interval,
        }
    }

    pub fn on_probe_sent(&mut self, now: Instant) {
        self.last_probe_at = Some(now);
        self.probe_sent_at = Some(now);
    }

    pub fn on_pong(&mut self, now: Instant) {
        self.last_pong_at = now;
        if let Some(sent) = self.probe_sent_at.take() {
            let rtt_ms = now.saturating_duration_since(sent).as_secs_f32() * 1000.0;
            self.self_lerp = lerp_for_latency(rtt_ms);
            log::debug!("latency {rtt_ms:.0} ms, self lerp {:.2}", self.self_lerp);
        }
    }

    pub fn self_lerp(&self) -> f32 {
        self.self_lerp
    }

    /// Time since the last pong (or since the session started).
    pub fn silence(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_pong_at)
    }
}
