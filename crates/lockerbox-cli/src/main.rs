//! Lockerbox kiosk simulator.
//!
//! Runs the full kiosk (controller, inventory poller, outbound sync worker and
//! display renderer) against mock peripherals. Keypad input and the door and
//! scale are driven from stdin:
//!
//! ```text
//! 5555          press keys
//! open / close  open or close the door
//! weight 1.5    set the scale reading in kg
//! quit          stop
//! ```

mod console;

use anyhow::Context;
use lockerbox_core::KioskConfig;
use lockerbox_hardware::MockKit;
use lockerbox_kiosk::{Controller, ControllerConfig, DisplayRenderer, KioskChannels, SystemClock};
use lockerbox_network::{InventoryClient, InventoryPoller, NotifyClient, OutboundSyncWorker};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "lockerbox.toml";

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("LOCKERBOX_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "lockerbox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = config_path();
    let config = KioskConfig::from_file(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    info!(path = %path.display(), version = lockerbox_core::VERSION, "Configuration loaded");

    std::fs::create_dir_all(&config.camera.photo_dir).with_context(|| {
        format!("failed to create photo directory {}", config.camera.photo_dir.display())
    })?;

    let kit = MockKit::new(&config.camera.photo_dir, config.scale.samples)
        .context("failed to set up mock peripherals")?;
    let devices = kit.handles.clone();
    let channels = KioskChannels::new(config.queues.capacity);

    let inventory = InventoryClient::from_config(&config).context("invalid [server] section")?;
    let notify = config
        .notify
        .as_ref()
        .map(|notify| NotifyClient::from_config(notify, config.timing.network_timeout()))
        .transpose()
        .context("invalid [notify] section")?;

    let poller = InventoryPoller::new(
        inventory.clone(),
        channels.snapshot_tx,
        config.timing.poll_interval(),
    );
    let worker = OutboundSyncWorker::new(inventory, notify, channels.outbound_rx);
    let renderer = DisplayRenderer::new(kit.lcd, channels.display_rx, config.timing.page_dwell());
    let controller = Controller::new(
        ControllerConfig::from_config(&config),
        SystemClock,
        kit.peripherals,
        channels.snapshot_rx,
        channels.display_tx,
        channels.outbound_tx,
    );

    tokio::spawn(poller.run());
    tokio::spawn(worker.run());
    tokio::spawn(renderer.run());
    tokio::spawn(controller.run(config.timing.tick()));

    info!("Kiosk running; type keys, 'open', 'close', 'weight <kg>' or 'quit'");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let Some(command) = console::parse(&line) else {
            continue;
        };
        if !console::apply(&devices, command).await {
            break;
        }
    }

    info!("Input closed, shutting down");
    Ok(())
}
