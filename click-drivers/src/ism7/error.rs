//! ISM7 driver errors

use core::fmt;

use click_protocol::PacketError;

/// Errors from ISM7 operations
///
/// `E` is the UART error type of the underlying transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ism7Error<E> {
    /// UART transport failed
    Uart(E),
    /// RTS never cleared, no byte arrived in time, or no matching event
    Timeout,
    /// Received checksum doesn't match the packet contents
    ChecksumMismatch,
    /// Fewer payload bytes arrived than the header announced
    Truncated,
    /// Wait target is not a confirmation or indication command
    InvalidCommand(u8),
    /// Module reported a nonzero status byte
    Status(u8),
    /// Confirmation is missing fields its command requires
    InvalidResponse,
    /// Request could not be encoded
    Packet(PacketError),
    /// Caller's buffer can't hold the returned data
    BufferTooSmall,
}

impl<E> From<PacketError> for Ism7Error<E> {
    fn from(e: PacketError) -> Self {
        match e {
            PacketError::InvalidChecksum => Ism7Error::ChecksumMismatch,
            PacketError::InvalidPacket => Ism7Error::InvalidResponse,
            other => Ism7Error::Packet(other),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Ism7Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ism7Error::Uart(e) => write!(f, "UART error: {:?}", e),
            Ism7Error::Timeout => write!(f, "timed out"),
            Ism7Error::ChecksumMismatch => write!(f, "checksum mismatch"),
            Ism7Error::Truncated => write!(f, "truncated payload"),
            Ism7Error::InvalidCommand(cmd) => write!(f, "command {:#04x} is not an event", cmd),
            Ism7Error::Status(code) => write!(f, "module reported status {:#04x}", code),
            Ism7Error::InvalidResponse => write!(f, "malformed response"),
            Ism7Error::Packet(e) => write!(f, "packet error: {}", e),
            Ism7Error::BufferTooSmall => write!(f, "buffer too small"),
        }
    }
}
