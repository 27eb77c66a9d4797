//! Streaming packet decoder
//!
//! Consumes an arbitrary byte stream one byte at a time and yields
//! checksum-valid packets. Bytes before a START marker are noise and are
//! dropped silently.

use heapless::Vec;

use crate::packet::{frame_checksum, Packet, PacketError, MAX_PAYLOAD_SIZE, START_BYTE};

/// State machine for parsing incoming packets
#[derive(Debug, Clone)]
pub struct PacketParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    command: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for START byte
    WaitingForStart,
    /// Got START, waiting for COMMAND
    WaitingForCommand,
    /// Got COMMAND, waiting for LENGTH
    WaitingForLength,
    /// Reading payload bytes
    ReadingPayload,
    /// Waiting for CHECKSUM
    WaitingForChecksum,
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketParser {
    /// Create a new packet parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            buffer: Vec::new(),
            expected_length: 0,
            command: 0,
        }
    }

    /// Drop any partial packet and hunt for the next START byte
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.buffer.clear();
        self.expected_length = 0;
        self.command = 0;
    }

    /// True while a packet is partially received
    pub fn in_packet(&self) -> bool {
        self.state != ParseState::WaitingForStart
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(packet))` when a complete valid packet is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when the checksum
    /// doesn't match. The parser resets itself after an error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, PacketError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == START_BYTE {
                    self.state = ParseState::WaitingForCommand;
                }
                Ok(None)
            }
            ParseState::WaitingForCommand => {
                self.command = byte;
                self.state = ParseState::WaitingForLength;
                Ok(None)
            }
            ParseState::WaitingForLength => {
                self.expected_length = byte;
                self.buffer.clear();
                self.state = if byte == 0 {
                    ParseState::WaitingForChecksum
                } else {
                    ParseState::ReadingPayload
                };
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Capacity exceeds the largest LENGTH value
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_length as usize {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                let expected = frame_checksum(self.command, &self.buffer);
                if byte != expected {
                    self.reset();
                    return Err(PacketError::InvalidChecksum);
                }

                let packet = Packet {
                    command: self.command,
                    payload: core::mem::take(&mut self.buffer),
                };
                self.reset();
                Ok(Some(packet))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete packet together with the number of bytes
    /// consumed. Bytes after that packet are left for the next call.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<(Option<Packet>, usize), PacketError> {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(packet) = self.feed(byte)? {
                return Ok((Some(packet), i + 1));
            }
        }
        Ok((None, bytes.len()))
    }
}
