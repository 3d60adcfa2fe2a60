//! Switch a binary switch off and on, then read its power meter

use std::time::Duration;

use tokio::time::sleep;
use zwrust::command_class::{MeterHandler, SwitchBinaryHandler, VersionHandler};
use zwrust::config::BRIDGE_ENV;
use zwrust::{CommandClassId, Controller, EventKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let address = std::env::var(BRIDGE_ENV).unwrap_or_else(|_| "127.0.0.1:4001".to_string());
    let node_id: u8 = std::env::var("ZWAVE_NODE")
        .ok()
        .and_then(|node| node.parse().ok())
        .unwrap_or(2);

    let mut controller = Controller::from_address(&address)?;
    controller.connect().await?;

    // learn the meter version so the right report layout is used
    controller
        .request::<VersionHandler, _>(node_id, 0, |version| {
            Ok(version.encode_command_class_get(CommandClassId::Meter.id()))
        })
        .await?;
    controller.poll().await?;

    println!("Switching node {} off...", node_id);
    controller
        .request::<SwitchBinaryHandler, _>(node_id, 0, |switch| Ok(switch.encode_set(false, None)))
        .await?;
    sleep(Duration::from_secs(3)).await;

    println!("Switching node {} on...", node_id);
    controller
        .request::<SwitchBinaryHandler, _>(node_id, 0, |switch| Ok(switch.encode_set(true, None)))
        .await?;

    controller
        .request::<MeterHandler, _>(node_id, 0, |meter| Ok(meter.encode_get(None)))
        .await?;
    for event in controller.poll().await? {
        if let EventKind::Meter(reading) = &event.kind {
            println!("Meter: {} {:?}", reading.value, reading.scale);
        }
    }

    controller.disconnect().await?;
    Ok(())
}
