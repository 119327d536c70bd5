use petri::DEFAULT_ROOM_MODE;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub room_mode: String,
    pub intent_interval_ms: u64,
    pub ping_interval_secs: f32,
    pub health_check_interval_secs: f32,
    pub watchdog_secs: f32,
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            room_mode: DEFAULT_ROOM_MODE.to_string(),
            intent_interval_ms: 200,
            ping_interval_secs: 10.0,
            health_check_interval_secs: 3.0,
            watchdog_secs: 15.0,
            connect_timeout_secs: 5,
        }
    }
}
