//! Serial stream deframing
//!
//! A Z-Wave serial link carries single control bytes (ACK, NAK, CAN) and
//! data frames starting with SOF. Bytes arrive in arbitrary chunks, so the
//! reader buffers them in a `BytesMut` and hands out complete items:
//!
//! ```text
//! 0x06                      -> Ack
//! 0x01 len type class ...   -> Frame (len + 2 bytes)
//! anything else             -> discarded
//! ```
//!
//! Checksums are not verified here; the caller parses the frame and answers
//! ACK or NAK.

use bytes::{Bytes, BytesMut};
use tracing::trace;
use zwrust_core::constants::{ACK, CAN, NAK, SOF};

/// Type + class + checksum
const MIN_LENGTH_FIELD: usize = 3;

/// One unit read from the serial stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialItem {
    Ack,
    Nak,
    Can,
    /// Complete data frame, SOF through checksum
    Frame(Bytes),
}

/// Accumulates stream bytes and splits them into [`SerialItem`]s
#[derive(Debug, Default)]
pub struct FrameReader {
    buffer: BytesMut,
    discarded: usize,
}

impl FrameReader {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(256),
            discarded: 0,
        }
    }

    /// Append `data` and take every complete item
    pub fn push(&mut self, data: &[u8]) -> Vec<SerialItem> {
        self.extend(data);

        let mut items = Vec::new();
        while let Some(item) = self.next_item() {
            items.push(item);
        }
        items
    }

    /// Append data without extracting anything
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Take the next complete item, if the buffer holds one
    pub fn next_item(&mut self) -> Option<SerialItem> {
        loop {
            let lead = *self.buffer.first()?;

            match lead {
                ACK => return Some(self.take_control(SerialItem::Ack)),
                NAK => return Some(self.take_control(SerialItem::Nak)),
                CAN => return Some(self.take_control(SerialItem::Can)),
                SOF => {
                    let length = usize::from(*self.buffer.get(1)?);
                    if length < MIN_LENGTH_FIELD {
                        // cannot be a frame, resync on the next byte
                        self.discard(1);
                        continue;
                    }

                    let total = length + 2;
                    if self.buffer.len() < total {
                        return None;
                    }

                    let frame = self.buffer.split_to(total).freeze();
                    trace!(frame = %hex::encode(&frame), "Frame received");
                    return Some(SerialItem::Frame(frame));
                }
                _ => self.discard(1),
            }
        }
    }

    /// Bytes waiting for the rest of a frame
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Garbage bytes skipped so far
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Drop buffered bytes, e.g. after a reconnect
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn take_control(&mut self, item: SerialItem) -> SerialItem {
        let _ = self.buffer.split_to(1);
        item
    }

    fn discard(&mut self, count: usize) {
        let dropped = self.buffer.split_to(count);
        trace!(bytes = %hex::encode(&dropped), "Discarding garbage");
        self.discarded += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASIC_GET: [u8; 11] = [0x01, 0x09, 0x00, 0x13, 0x63, 0x02, 0x20, 0x02, 0x00, 0x00, 0xA6];

    #[test]
    fn test_control_bytes() {
        let mut reader = FrameReader::new();
        assert_eq!(
            reader.push(&[ACK, NAK, CAN]),
            vec![SerialItem::Ack, SerialItem::Nak, SerialItem::Can]
        );
        assert!(reader.is_empty());
    }

    #[test]
    fn test_complete_frame() {
        let mut reader = FrameReader::new();
        assert_eq!(
            reader.push(&BASIC_GET),
            vec![SerialItem::Frame(Bytes::copy_from_slice(&BASIC_GET))]
        );
    }

    #[test]
    fn test_fragmented_frame() {
        let mut reader = FrameReader::new();
        assert!(reader.push(&BASIC_GET[..1]).is_empty());
        assert!(reader.push(&BASIC_GET[1..6]).is_empty());
        assert_eq!(reader.len(), 6);

        let items = reader.push(&BASIC_GET[6..]);
        assert_eq!(items, vec![SerialItem::Frame(Bytes::copy_from_slice(&BASIC_GET))]);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_ack_then_frame_in_one_chunk() {
        let mut reader = FrameReader::new();
        let mut chunk = vec![ACK];
        chunk.extend_from_slice(&BASIC_GET);
        chunk.push(ACK);

        let items = reader.push(&chunk);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], SerialItem::Ack);
        assert!(matches!(items[1], SerialItem::Frame(_)));
        assert_eq!(items[2], SerialItem::Ack);
    }

    #[test]
    fn test_garbage_is_skipped() {
        let mut reader = FrameReader::new();
        let mut chunk = vec![0xAA, 0x55];
        chunk.extend_from_slice(&BASIC_GET);

        let items = reader.push(&chunk);
        assert_eq!(items, vec![SerialItem::Frame(Bytes::copy_from_slice(&BASIC_GET))]);
        assert_eq!(reader.discarded(), 2);
    }

    #[test]
    fn test_impossible_length_resyncs() {
        let mut reader = FrameReader::new();
        // SOF with length 0x02, then ACK
        assert_eq!(reader.push(&[SOF, 0x02, ACK]), vec![SerialItem::Ack]);
        assert_eq!(reader.discarded(), 2);
    }

    #[test]
    fn test_clear() {
        let mut reader = FrameReader::new();
        reader.push(&BASIC_GET[..4]);
        reader.clear();
        assert!(reader.is_empty());
        assert_eq!(reader.push(&[ACK]), vec![SerialItem::Ack]);
    }
}
