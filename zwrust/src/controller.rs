//! High-level controller interface

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, trace, warn};

use zwrust_core::constants::{ACK, NAK};
use zwrust_core::{
    CallbackIds, Frame, MessageClass, MessageType, SendData, SendDataCallback, SendDataResponse,
};
use zwrust_protocol::{Dispatcher, EventSink, HandlerType, Registry};
use zwrust_transport::{FrameReader, SerialItem, TcpTransport, Transport};
use zwrust_types::Event;

use crate::config::ControllerConfig;
use crate::error::{Error, Result};

/// Z-Wave controller reached over a serial transport
///
/// Outbound requests are built by command class handlers owned by the
/// shared [`Dispatcher`], so they use the version negotiated with each node.
/// Inbound frames are acknowledged and decoded by [`Controller::poll`].
///
/// # Examples
///
/// ```no_run
/// use zwrust::Controller;
/// use zwrust::command_class::BasicHandler;
///
/// #[tokio::main]
/// async fn main() -> zwrust::Result<()> {
///     let mut controller = Controller::new("192.168.1.40", 4001);
///     controller.connect().await?;
///
///     controller
///         .request::<BasicHandler, _>(5, 0, |basic| Ok(basic.encode_get()))
///         .await?;
///
///     for event in controller.poll().await? {
///         println!("{}", event);
///     }
///
///     controller.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Controller {
    transport: Box<dyn Transport>,
    reader: FrameReader,
    dispatcher: Arc<Mutex<Dispatcher>>,
    callbacks: CallbackIds,
    config: ControllerConfig,
    /// Frames that arrived while waiting for an ACK
    backlog: VecDeque<Frame>,
}

impl Controller {
    /// Controller behind a serial bridge at `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_transport(Box::new(TcpTransport::new(host, port)))
    }

    /// Controller behind a serial bridge, from a `host:port` string
    pub fn from_address(address: &str) -> Result<Self> {
        Ok(Self::with_transport(Box::new(TcpTransport::from_address(address)?)))
    }

    /// Controller over any transport, with the standard registry
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            reader: FrameReader::new(),
            dispatcher: Arc::new(Mutex::new(Dispatcher::standard())),
            callbacks: CallbackIds::new(),
            config: ControllerConfig::default(),
            backlog: VecDeque::new(),
        }
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Decode with a custom registry; the node directory starts empty
    pub fn with_registry(self, registry: Arc<Registry>) -> Self {
        *self.dispatcher.lock() = Dispatcher::new(registry, Arc::new(zwrust_protocol::NullSink));
        self
    }

    /// Publish decoded events to `sink`
    pub fn with_sink(self, sink: Arc<dyn EventSink>) -> Self {
        self.dispatcher.lock().set_sink(sink);
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Shared handle to the dispatcher and its node directory
    pub fn dispatcher(&self) -> Arc<Mutex<Dispatcher>> {
        Arc::clone(&self.dispatcher)
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Connect and resynchronise the serial link
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.transport.remote_addr());

        self.transport.connect().await?;
        self.reader.clear();
        self.backlog.clear();

        // a NAK makes the controller drop any half-received frame
        self.transport.send(&[NAK]).await?;

        info!("Connected to {}", self.transport.remote_addr());
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.remote_addr());
        self.transport.disconnect().await?;
        info!("Disconnected");
        Ok(())
    }

    /// Send a request and wait for the controller's ACK
    ///
    /// Transmit options and a callback id are filled in from the
    /// configuration. Returns the callback id (0 when callbacks are off).
    pub async fn send(&mut self, request: SendData) -> Result<u8> {
        self.ensure_connected()?;

        let callback_id = if self.config.request_callbacks {
            self.callbacks.next_id()
        } else {
            0
        };
        let request = request
            .with_transmit_options(self.config.transmit_options)
            .with_callback_id(callback_id);

        debug!(
            node_id = request.node_id,
            callback_id,
            payload = %hex::encode(&request.payload),
            "Sending request"
        );

        let bytes = request.into_frame().map_err(zwrust_core::Error::from)?.encode();
        for attempt in 1..=self.config.attempts() {
            self.transport.send(&bytes).await?;

            if self.wait_for_ack().await? {
                return Ok(callback_id);
            }
            warn!(attempt, callback_id, "Frame not acknowledged, retrying");
        }

        Err(Error::NoAck {
            attempts: self.config.attempts(),
        })
    }

    /// Build a request with the live handler for a node endpoint and send it
    ///
    /// ```no_run
    /// # use zwrust::Controller;
    /// # use zwrust::command_class::MeterHandler;
    /// # async fn run(controller: &mut Controller) -> zwrust::Result<()> {
    /// controller
    ///     .request::<MeterHandler, _>(7, 0, |meter| Ok(meter.encode_get(None)))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request<T, F>(&mut self, node_id: u8, endpoint: u8, build: F) -> Result<u8>
    where
        T: HandlerType,
        F: FnOnce(&mut T) -> zwrust_protocol::Result<SendData>,
    {
        let request = {
            let mut dispatcher = self.dispatcher.lock();
            let handler = dispatcher
                .handler_mut::<T>(node_id, endpoint)
                .ok_or(Error::UnknownEndpoint { node_id, endpoint })?;
            build(handler)?
        };
        self.send(request).await
    }

    /// Read inbound frames, acknowledge them and decode their commands
    ///
    /// Waits up to the configured read timeout for data; a quiet link
    /// yields no events rather than an error.
    pub async fn poll(&mut self) -> Result<Vec<Event>> {
        self.ensure_connected()?;

        let mut events = Vec::new();
        while let Some(frame) = self.backlog.pop_front() {
            events.extend(self.handle_frame(&frame));
        }
        if !events.is_empty() {
            return Ok(events);
        }

        loop {
            let chunk = match self.transport.receive(self.config.read_timeout_secs).await {
                Ok(chunk) => chunk,
                Err(zwrust_transport::Error::ReadTimeout) => return Ok(events),
                Err(err) => return Err(err.into()),
            };

            let items = self.reader.push(&chunk);
            if items.is_empty() {
                // partial frame
                continue;
            }

            for item in items {
                match item {
                    SerialItem::Frame(bytes) => {
                        if let Some(frame) = self.accept(&bytes).await? {
                            events.extend(self.handle_frame(&frame));
                        }
                    }
                    other => debug!(?other, "Unsolicited control byte"),
                }
            }
            return Ok(events);
        }
    }

    /// Wait for ACK; `false` on NAK, CAN or timeout
    async fn wait_for_ack(&mut self) -> Result<bool> {
        let deadline = Instant::now() + self.config.ack_timeout;
        let read_secs = self.config.ack_timeout.as_secs().max(1);

        loop {
            while let Some(item) = self.reader.next_item() {
                match item {
                    SerialItem::Ack => return Ok(true),
                    SerialItem::Nak => {
                        debug!("Controller rejected frame (NAK)");
                        return Ok(false);
                    }
                    SerialItem::Can => {
                        debug!("Controller busy (CAN)");
                        return Ok(false);
                    }
                    SerialItem::Frame(bytes) => {
                        if let Some(frame) = self.accept(&bytes).await? {
                            self.backlog.push_back(frame);
                        }
                    }
                }
            }

            let chunk = match timeout_at(deadline, self.transport.receive(read_secs)).await {
                Ok(Ok(chunk)) => chunk,
                Ok(Err(zwrust_transport::Error::ReadTimeout)) | Err(_) => return Ok(false),
                Ok(Err(err)) => return Err(err.into()),
            };
            self.reader.extend(&chunk);
        }
    }

    /// Validate a raw frame and answer ACK or NAK
    async fn accept(&mut self, bytes: &[u8]) -> Result<Option<Frame>> {
        match Frame::parse(bytes) {
            Ok(frame) => {
                self.transport.send(&[ACK]).await?;
                Ok(Some(frame))
            }
            Err(err) => {
                warn!(error = %err, bytes = %hex::encode(bytes), "Rejecting frame");
                self.transport.send(&[NAK]).await?;
                Ok(None)
            }
        }
    }

    fn handle_frame(&self, frame: &Frame) -> Vec<Event> {
        trace!(?frame, "Handling frame");

        if frame.message_class == MessageClass::SendData {
            log_transmit_report(frame);
            return Vec::new();
        }
        self.dispatcher.lock().dispatch(frame)
    }

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

fn log_transmit_report(frame: &Frame) {
    match frame.message_type {
        MessageType::Response => match SendDataResponse::from_frame(frame) {
            Ok(response) if response.accepted => trace!("Request queued by controller"),
            Ok(_) => warn!("Controller refused request"),
            Err(err) => debug!(error = %err, "Malformed SendData response"),
        },
        MessageType::Request => match SendDataCallback::from_frame(frame) {
            Ok(callback) if callback.is_success() => {
                debug!(callback_id = callback.callback_id, "Transmit complete")
            }
            Ok(callback) => warn!(
                callback_id = callback.callback_id,
                status = ?callback.status,
                "Transmit failed"
            ),
            Err(err) => debug!(error = %err, "Malformed SendData callback"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_create() {
        let controller = Controller::new("192.168.1.40", 4001);
        assert!(!controller.is_connected());
        assert_eq!(controller.config(), &ControllerConfig::default());
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let mut controller = Controller::new("192.168.1.40", 4001);
        let result = controller.send(SendData::new(2, vec![0x20, 0x02])).await;
        assert!(matches!(result, Err(Error::NotConnected)));
        assert!(matches!(controller.poll().await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_request_unknown_endpoint() {
        let mut controller = Controller::new("192.168.1.40", 4001);
        let result = controller
            .request::<zwrust_protocol::command_class::BasicHandler, _>(2, 3, |basic| {
                Ok(basic.encode_get())
            })
            .await;
        assert!(matches!(
            result,
            Err(Error::UnknownEndpoint {
                node_id: 2,
                endpoint: 3
            })
        ));
    }
}
