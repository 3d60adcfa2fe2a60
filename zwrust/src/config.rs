//! Controller configuration

use std::time::Duration;

use zwrust_core::TransmitOptions;
use zwrust_core::constants::{DEFAULT_ACK_TIMEOUT_MS, DEFAULT_READ_TIMEOUT, MAX_RETRIES};

/// Environment variable holding the serial bridge address (`host:port`)
pub const BRIDGE_ENV: &str = "ZWAVE_BRIDGE";

/// Settings for a [`Controller`](crate::Controller)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// How long to wait for the controller to ACK a frame
    pub ack_timeout: Duration,

    /// How long `poll` waits for inbound data (whole seconds)
    pub read_timeout_secs: u64,

    /// Retransmissions after NAK, CAN or ACK timeout
    pub max_retries: usize,

    /// Options attached to every SendData request
    pub transmit_options: TransmitOptions,

    /// Attach a callback id so the controller reports transmit status
    pub request_callbacks: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_millis(DEFAULT_ACK_TIMEOUT_MS),
            read_timeout_secs: DEFAULT_READ_TIMEOUT,
            max_retries: MAX_RETRIES,
            transmit_options: TransmitOptions::standard(),
            request_callbacks: true,
        }
    }
}

impl ControllerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, secs: u64) -> Self {
        self.read_timeout_secs = secs.max(1);
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_transmit_options(mut self, options: TransmitOptions) -> Self {
        self.transmit_options = options;
        self
    }

    /// Send requests without callback ids
    pub fn without_callbacks(mut self) -> Self {
        self.request_callbacks = false;
        self
    }

    /// Total transmissions per request, first attempt included
    pub fn attempts(&self) -> usize {
        self.max_retries + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.ack_timeout, Duration::from_millis(1600));
        assert_eq!(config.read_timeout_secs, 5);
        assert_eq!(config.attempts(), 4);
        assert_eq!(config.transmit_options, TransmitOptions::standard());
        assert!(config.request_callbacks);
    }

    #[test]
    fn test_builder() {
        let config = ControllerConfig::new()
            .with_ack_timeout(Duration::from_millis(200))
            .with_read_timeout(0)
            .with_max_retries(0)
            .with_transmit_options(TransmitOptions::ACK)
            .without_callbacks();

        assert_eq!(config.ack_timeout, Duration::from_millis(200));
        assert_eq!(config.read_timeout_secs, 1);
        assert_eq!(config.attempts(), 1);
        assert_eq!(config.transmit_options, TransmitOptions::ACK);
        assert!(!config.request_callbacks);
    }
}
