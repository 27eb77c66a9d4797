//! Packet encoding for the ISM7 command interface.
//!
//! Frame format:
//! - START (1 byte): 0x02 synchronization byte
//! - COMMAND (1 byte): type bits + opcode
//! - LENGTH (1 byte): payload length (0-255)
//! - PAYLOAD (0-255 bytes): command-specific data
//! - CHECKSUM (1 byte): XOR of START, COMMAND, LENGTH and all PAYLOAD bytes

use core::fmt;

use heapless::Vec;

use crate::checksum::xor8;
use crate::command::PacketKind;

/// Frame synchronization byte
pub const START_BYTE: u8 = 0x02;

/// Capacity of the payload buffer
pub const MAX_PAYLOAD_SIZE: usize = 256;

/// Largest payload that fits the one-byte LENGTH field
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Bytes surrounding the payload (START + COMMAND + LENGTH + CHECKSUM)
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_LEN;

/// Errors that can occur while building, encoding or decoding packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Payload does not fit the LENGTH field
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Packet structure doesn't match its command
    InvalidPacket,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::PayloadTooLarge => write!(f, "payload exceeds {} bytes", MAX_PAYLOAD_LEN),
            PacketError::InvalidChecksum => write!(f, "checksum mismatch"),
            PacketError::InvalidPacket => write!(f, "malformed packet"),
            PacketError::BufferTooSmall => write!(f, "buffer too small"),
        }
    }
}

/// A command or event packet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    /// Command byte (type bits in the MSBs, opcode in the rest)
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Packet {
    /// Create a new packet with the given command and payload
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, PacketError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(PacketError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| PacketError::PayloadTooLarge)?;

        Ok(Self {
            command,
            payload: payload_vec,
        })
    }

    /// Create a packet with no payload
    pub fn empty(command: u8) -> Self {
        Self {
            command,
            payload: Vec::new(),
        }
    }

    /// Payload length as carried in the LENGTH field
    pub fn len(&self) -> u8 {
        // Construction paths cap the payload at MAX_PAYLOAD_LEN
        self.payload.len() as u8
    }

    /// True when the packet carries no payload
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Classify the command byte
    pub fn kind(&self) -> Option<PacketKind> {
        PacketKind::of(self.command)
    }

    /// Status code carried in the first payload byte of a confirmation
    pub fn status(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Reset to an empty request with command 0
    pub fn clear(&mut self) {
        self.command = 0;
        self.payload.clear();
    }

    /// Checksum this packet carries on the wire
    pub fn checksum(&self) -> u8 {
        frame_checksum(self.command, &self.payload)
    }

    /// Encoded size in bytes
    pub fn frame_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        let frame_len = self.frame_len();
        if buffer.len() < frame_len {
            return Err(PacketError::BufferTooSmall);
        }

        let n = self.payload.len();
        buffer[0] = START_BYTE;
        buffer[1] = self.command;
        buffer[2] = self.len();
        buffer[3..3 + n].copy_from_slice(&self.payload);
        buffer[3 + n] = self.checksum();

        Ok(frame_len)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, PacketError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| PacketError::BufferTooSmall)
    }
}

/// Frame checksum for a command and payload
///
/// XOR of the start byte, the command, the length byte and every payload
/// byte. `payload` must not exceed [`MAX_PAYLOAD_LEN`].
pub fn frame_checksum(command: u8, payload: &[u8]) -> u8 {
    debug_assert!(payload.len() <= MAX_PAYLOAD_LEN);
    START_BYTE ^ command ^ (payload.len() as u8) ^ xor8(payload)
}
