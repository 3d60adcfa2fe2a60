//! Print every event the network reports
//!
//! ```text
//! ZWAVE_BRIDGE=192.168.1.40:4001 RUST_LOG=debug cargo run --example monitor
//! ```

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use zwrust::config::BRIDGE_ENV;
use zwrust::{ChannelSink, Controller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let address = std::env::var(BRIDGE_ENV).unwrap_or_else(|_| "127.0.0.1:4001".to_string());

    let (sink, mut events) = ChannelSink::new();
    let mut controller = Controller::from_address(&address)?.with_sink(Arc::new(sink));
    controller.connect().await?;
    println!("Listening on {}", address);

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("{}", event);
        }
    });

    loop {
        if let Err(err) = controller.poll().await {
            if !err.is_recoverable() {
                eprintln!("Stopping: {}", err);
                break;
            }
            tracing::warn!(error = %err, "Poll failed");
        }
    }

    controller.disconnect().await?;
    drop(controller);
    printer.await?;
    Ok(())
}
