//! Payload layouts of the serial API functions the engine speaks
//!
//! - [`SendData`]: outbound command to a node
//! - [`ApplicationCommand`]: inbound command from a node
//! - [`NodeInfo`]: node information frame delivered via ApplicationUpdate
//! - [`SendDataResponse`] / [`SendDataCallback`]: transmit acknowledgements

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    constants::{receive_status, update_state, TransmitOptions},
    cursor::PayloadCursor,
    error::{Error, FrameError, Result},
    frame::Frame,
    message_class::{MessageClass, MessageType},
};

/// SendData request
///
/// Payload layout:
///
/// ```text
/// [node][len][command class][command][args...][transmit options][callback id]
/// ```
///
/// # Examples
///
/// ```
/// use zwrust_core::SendData;
///
/// // Basic Get to node 99
/// let frame = SendData::new(99, vec![0x20, 0x02]).into_frame()?;
/// assert_eq!(
///     &frame.encode()[..],
///     &[0x01, 0x09, 0x00, 0x13, 0x63, 0x02, 0x20, 0x02, 0x00, 0x00, 0xA6]
/// );
/// # Ok::<(), zwrust_core::FrameError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SendData {
    /// Destination node
    pub node_id: u8,

    /// Command class payload (`[class][command][args...]`)
    pub payload: Bytes,

    /// Transmit options
    pub transmit_options: TransmitOptions,

    /// Callback id (0 = no callback requested)
    pub callback_id: u8,
}

impl SendData {
    /// Create a request with no transmit options and no callback
    pub fn new(node_id: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            node_id,
            payload: payload.into(),
            transmit_options: TransmitOptions::empty(),
            callback_id: 0,
        }
    }

    pub fn with_transmit_options(mut self, options: TransmitOptions) -> Self {
        self.transmit_options = options;
        self
    }

    pub fn with_callback_id(mut self, callback_id: u8) -> Self {
        self.callback_id = callback_id;
        self
    }

    /// Command class id this request carries
    pub fn command_class(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Command id within the class
    pub fn command(&self) -> Option<u8> {
        self.payload.get(1).copied()
    }

    /// Wrap into a SendData request frame
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::PayloadTooLarge`] when the command does not fit
    /// one frame.
    pub fn into_frame(self) -> std::result::Result<Frame, FrameError> {
        let mut buf = BytesMut::with_capacity(self.payload.len() + 4);
        buf.put_u8(self.node_id);
        buf.put_u8(self.payload.len() as u8);
        buf.put_slice(&self.payload);
        buf.put_u8(self.transmit_options.bits());
        buf.put_u8(self.callback_id);

        Frame::build(MessageType::Request, MessageClass::SendData, buf.freeze())
    }

    /// Recover a SendData request from its frame
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        expect_class(frame, MessageClass::SendData)?;

        let mut cursor = PayloadCursor::new(&frame.payload);
        let node_id = cursor.read_u8()?;
        let len = usize::from(cursor.read_u8()?);
        let payload = Bytes::copy_from_slice(cursor.read_bytes(len)?);
        let transmit_options = TransmitOptions::from_bits_retain(cursor.read_u8()?);
        let callback_id = cursor.read_u8()?;

        Ok(Self {
            node_id,
            payload,
            transmit_options,
            callback_id,
        })
    }
}

impl TryFrom<SendData> for Frame {
    type Error = FrameError;

    fn try_from(request: SendData) -> std::result::Result<Frame, FrameError> {
        request.into_frame()
    }
}

impl fmt::Debug for SendData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendData")
            .field("node_id", &self.node_id)
            .field("payload", &hex::encode(&self.payload))
            .field("transmit_options", &self.transmit_options)
            .field("callback_id", &self.callback_id)
            .finish()
    }
}

/// Inbound ApplicationCommandHandler request
///
/// Payload layout:
///
/// ```text
/// [rx status][source node][len][command class][command][args...]
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApplicationCommand {
    /// Receive status flags
    pub status: u8,

    /// Source node
    pub node_id: u8,

    /// Command class payload (`[class][command][args...]`)
    pub payload: Bytes,
}

impl ApplicationCommand {
    pub fn new(node_id: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            status: 0,
            node_id,
            payload: payload.into(),
        }
    }

    /// Parse from an ApplicationCommandHandler frame
    ///
    /// A length byte larger than the remaining data is a cursor error; a
    /// smaller one truncates the command (some sticks append RSSI bytes).
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        expect_class(frame, MessageClass::ApplicationCommandHandler)?;

        let mut cursor = PayloadCursor::new(&frame.payload);
        let status = cursor.read_u8()?;
        let node_id = cursor.read_u8()?;
        let len = usize::from(cursor.read_u8()?);
        let payload = Bytes::copy_from_slice(cursor.read_bytes(len)?);

        Ok(Self {
            status,
            node_id,
            payload,
        })
    }

    /// Build the frame a controller would deliver for this command
    pub fn into_frame(self) -> std::result::Result<Frame, FrameError> {
        let mut buf = BytesMut::with_capacity(self.payload.len() + 3);
        buf.put_u8(self.status);
        buf.put_u8(self.node_id);
        buf.put_u8(self.payload.len() as u8);
        buf.put_slice(&self.payload);

        Frame::build(
            MessageType::Request,
            MessageClass::ApplicationCommandHandler,
            buf.freeze(),
        )
    }

    /// Command class id, if present
    pub fn command_class(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    pub fn is_broadcast(&self) -> bool {
        self.status & receive_status::BROADCAST != 0
    }

    pub fn is_multicast(&self) -> bool {
        self.status & receive_status::MULTICAST != 0
    }
}

impl fmt::Debug for ApplicationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationCommand")
            .field("status", &format!("0x{:02X}", self.status))
            .field("node_id", &self.node_id)
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

/// Node information frame
///
/// Delivered as an ApplicationUpdate request with state
/// `NODE_INFO_RECEIVED`:
///
/// ```text
/// [0x84][node][len][basic][generic][specific][command classes...]
/// ```
///
/// Classes listed after the `0xEF` mark are controlled, not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub node_id: u8,
    pub basic_class: u8,
    pub generic_class: u8,
    pub specific_class: u8,
    /// Supported command class ids
    pub supported: Vec<u8>,
    /// Controlled command class ids (after the mark)
    pub controlled: Vec<u8>,
}

impl NodeInfo {
    const MARK: u8 = 0xEF;

    /// Parse an ApplicationUpdate frame
    ///
    /// Returns `Ok(None)` for update states other than node info received.
    pub fn from_frame(frame: &Frame) -> Result<Option<Self>> {
        expect_class(frame, MessageClass::ApplicationUpdate)?;

        let mut cursor = PayloadCursor::new(&frame.payload);
        let state = cursor.read_u8()?;
        if state != update_state::NODE_INFO_RECEIVED {
            return Ok(None);
        }

        let node_id = cursor.read_u8()?;
        let len = usize::from(cursor.read_u8()?);
        let mut body = PayloadCursor::new(cursor.read_bytes(len)?);

        let basic_class = body.read_u8()?;
        let generic_class = body.read_u8()?;
        let specific_class = body.read_u8()?;

        let classes = body.read_remaining();
        let (supported, controlled) = match classes.iter().position(|c| *c == Self::MARK) {
            Some(mark) => (classes[..mark].to_vec(), classes[mark + 1..].to_vec()),
            None => (classes.to_vec(), Vec::new()),
        };

        Ok(Some(Self {
            node_id,
            basic_class,
            generic_class,
            specific_class,
            supported,
            controlled,
        }))
    }

    /// Build the ApplicationUpdate frame carrying this node info
    pub fn into_frame(self) -> std::result::Result<Frame, FrameError> {
        let mut body = vec![self.basic_class, self.generic_class, self.specific_class];
        body.extend_from_slice(&self.supported);
        if !self.controlled.is_empty() {
            body.push(Self::MARK);
            body.extend_from_slice(&self.controlled);
        }

        let mut buf = BytesMut::with_capacity(body.len() + 3);
        buf.put_u8(update_state::NODE_INFO_RECEIVED);
        buf.put_u8(self.node_id);
        buf.put_u8(body.len() as u8);
        buf.put_slice(&body);

        Frame::build(MessageType::Request, MessageClass::ApplicationUpdate, buf.freeze())
    }
}

/// Immediate SendData response: did the controller accept the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendDataResponse {
    pub accepted: bool,
}

impl SendDataResponse {
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        expect_class(frame, MessageClass::SendData)?;
        if frame.message_type != MessageType::Response {
            return Err(Error::InvalidField {
                field: "message type",
                value: usize::from(u8::from(frame.message_type)),
            });
        }

        let accepted = PayloadCursor::new(&frame.payload).read_u8()? != 0;
        Ok(Self { accepted })
    }
}

/// Transmit completion status carried by a SendData callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitStatus {
    Ok,
    NoAck,
    Fail,
    NotIdle,
    NoRoute,
    Unknown(u8),
}

impl From<u8> for TransmitStatus {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Ok,
            0x01 => Self::NoAck,
            0x02 => Self::Fail,
            0x03 => Self::NotIdle,
            0x04 => Self::NoRoute,
            other => Self::Unknown(other),
        }
    }
}

/// Delayed SendData callback request: `[callback id][transmit status]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendDataCallback {
    pub callback_id: u8,
    pub status: TransmitStatus,
}

impl SendDataCallback {
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        expect_class(frame, MessageClass::SendData)?;
        if frame.message_type != MessageType::Request {
            return Err(Error::InvalidField {
                field: "message type",
                value: usize::from(u8::from(frame.message_type)),
            });
        }

        let mut cursor = PayloadCursor::new(&frame.payload);
        let callback_id = cursor.read_u8()?;
        let status = TransmitStatus::from(cursor.read_u8()?);

        Ok(Self {
            callback_id,
            status,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status == TransmitStatus::Ok
    }
}

fn expect_class(frame: &Frame, expected: MessageClass) -> Result<()> {
    if frame.message_class != expected {
        return Err(Error::UnexpectedMessageClass {
            expected,
            actual: frame.message_class,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CursorError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_send_data_fixture() {
        let frame = SendData::new(99, vec![0x20, 0x02]).into_frame().unwrap();
        assert_eq!(
            &frame.encode()[..],
            &[0x01, 0x09, 0x00, 0x13, 0x63, 0x02, 0x20, 0x02, 0x00, 0x00, 0xA6]
        );
    }

    #[test]
    fn test_send_data_round_trip() {
        let request = SendData::new(5, vec![0x25, 0x01, 0xFF])
            .with_transmit_options(TransmitOptions::standard())
            .with_callback_id(7);

        let frame = request.clone().into_frame().unwrap();
        assert_eq!(frame.payload.as_ref(), &[5, 3, 0x25, 0x01, 0xFF, 0x25, 7]);
        assert_eq!(SendData::from_frame(&frame).unwrap(), request);
        assert_eq!(request.command_class(), Some(0x25));
        assert_eq!(request.command(), Some(0x01));
    }

    #[test]
    fn test_application_command_parse() {
        let frame = Frame::request(
            MessageClass::ApplicationCommandHandler,
            vec![0x00, 0x0D, 0x03, 0x25, 0x03, 0xFF],
        );

        let command = ApplicationCommand::from_frame(&frame).unwrap();
        assert_eq!(command.node_id, 13);
        assert_eq!(command.payload.as_ref(), &[0x25, 0x03, 0xFF]);
        assert_eq!(command.command_class(), Some(0x25));
        assert_eq!(ApplicationCommand::from_frame(&command.into_frame().unwrap()).unwrap().node_id, 13);
    }

    #[test]
    fn test_send_data_rejects_oversized_command() {
        // node + len + options + callback leave room for this many command bytes
        let fits = Frame::MAX_PAYLOAD_SIZE - 4;

        let frame = SendData::new(2, vec![0x70; fits]).into_frame().unwrap();
        assert_eq!(Frame::parse(&frame.encode()).unwrap(), frame);

        let result = SendData::new(2, vec![0x70; fits + 1]).into_frame();
        assert_eq!(
            result,
            Err(FrameError::PayloadTooLarge {
                size: Frame::MAX_PAYLOAD_SIZE + 1,
                max: Frame::MAX_PAYLOAD_SIZE,
            })
        );
        assert!(Frame::try_from(SendData::new(2, vec![0x70; 300])).is_err());
    }

    #[test]
    fn test_application_command_ignores_trailing_rssi() {
        let frame = Frame::request(
            MessageClass::ApplicationCommandHandler,
            vec![0x00, 0x0D, 0x02, 0x20, 0x02, 0xB5],
        );
        let command = ApplicationCommand::from_frame(&frame).unwrap();
        assert_eq!(command.payload.as_ref(), &[0x20, 0x02]);
    }

    #[test]
    fn test_application_command_truncated() {
        let frame = Frame::request(
            MessageClass::ApplicationCommandHandler,
            vec![0x00, 0x0D, 0x05, 0x25, 0x03],
        );
        assert!(matches!(
            ApplicationCommand::from_frame(&frame),
            Err(Error::Cursor(CursorError::OutOfBounds { requested: 5, available: 2 }))
        ));
    }

    #[test]
    fn test_application_command_wrong_class() {
        let frame = Frame::request(MessageClass::SendData, vec![0x00]);
        assert!(matches!(
            ApplicationCommand::from_frame(&frame),
            Err(Error::UnexpectedMessageClass { .. })
        ));
    }

    #[test]
    fn test_node_info_parse() {
        let frame = Frame::request(
            MessageClass::ApplicationUpdate,
            vec![0x84, 0x07, 0x08, 0x04, 0x10, 0x01, 0x25, 0x27, 0x60, 0xEF, 0x20],
        );

        let info = NodeInfo::from_frame(&frame).unwrap().unwrap();
        assert_eq!(info.node_id, 7);
        assert_eq!(info.generic_class, 0x10);
        assert_eq!(info.supported, vec![0x25, 0x27, 0x60]);
        assert_eq!(info.controlled, vec![0x20]);

        assert_eq!(NodeInfo::from_frame(&info.clone().into_frame().unwrap()).unwrap(), Some(info));
    }

    #[test]
    fn test_node_info_other_state() {
        let frame = Frame::request(MessageClass::ApplicationUpdate, vec![0x81, 0x00, 0x00]);
        assert_eq!(NodeInfo::from_frame(&frame).unwrap(), None);
    }

    #[test]
    fn test_send_data_response_and_callback() {
        let response = Frame::response(MessageClass::SendData, vec![0x01]);
        assert!(SendDataResponse::from_frame(&response).unwrap().accepted);

        let callback = Frame::request(MessageClass::SendData, vec![0x07, 0x01]);
        let callback = SendDataCallback::from_frame(&callback).unwrap();
        assert_eq!(callback.callback_id, 7);
        assert_eq!(callback.status, TransmitStatus::NoAck);
        assert!(!callback.is_success());

        assert!(SendDataCallback::from_frame(&response).is_err());
    }
}
