use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;

use petri_client::net::{ClientConfig, GameClient, PointerInput, WsConnector};

#[derive(Parser)]
#[command(name = "petri")]
#[command(about = "Petri game client")]
struct Args {
    #[arg(
        short,
        long,
        default_value = petri::DEFAULT_ENDPOINT,
        help = "Server websocket endpoint"
    )]
    endpoint: String,

    #[arg(
        short,
        long,
        default_value = petri::DEFAULT_ROOM_MODE,
        help = "Room mode to join (public, ffa)"
    )]
    mode: String,

    #[arg(long, default_value_t = 60, help = "Simulation tick rate in Hz")]
    tick_rate: u32,

    #[arg(long, help = "Steer in a slow circle instead of reading real input")]
    orbit: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = ClientConfig {
        room_mode: args.mode.clone(),
        ..Default::default()
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let connector = WsConnector::new(
        args.endpoint.clone(),
        Duration::from_secs(config.connect_timeout_secs),
        runtime.handle().clone(),
    );

    let mut client = GameClient::new(connector, config);
    log::info!("connecting to {}", args.endpoint);
    client.connect(Instant::now());

    let tick = Duration::from_secs_f64(1.0 / args.tick_rate.max(1) as f64);
    let started = Instant::now();
    let mut last_report = started;

    loop {
        let now = Instant::now();

        // Stand-in for the external input layer: either idle (spectate) or
        // a pointer sweeping a slow circle around the viewport center.
        let pointer = args.orbit.then(|| {
            let t = now.duration_since(started).as_secs_f32() * 0.5;
            PointerInput::new(t.cos() * 100.0, t.sin() * 100.0)
        });

        client.update(now, pointer);

        if now.duration_since(last_report) >= Duration::from_secs(5) {
            last_report = now;
            let store = client.store();
            log::info!(
                "state: {:?}, players: {}, fruits: {}, self lerp: {:.2}",
                client.state(),
                store.actor_count(),
                store.collectible_count(),
                client.self_lerp(),
            );
        }

        thread::sleep(tick);
    }
}
