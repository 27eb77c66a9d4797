//! ISM7 framed-packet protocol
//!
//! The ISM7 Click carries a sub-GHz radio module that is driven over UART
//! with a small command interface. Every exchange is a packet:
//! ```text
//! ┌───────┬─────────┬────────┬─────────────┬──────────┐
//! │ START │ COMMAND │ LENGTH │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B      │ 1B     │ 0–255B      │ 1B       │
//! └───────┴─────────┴────────┴─────────────┴──────────┘
//! ```
//!
//! The top two bits of COMMAND say who sent it and why: requests go from
//! host to module, confirmations are the module's synchronous replies and
//! indications are unsolicited events. CHECKSUM is the XOR of every byte
//! before it, START included.
//!
//! The [`checksum`] module also carries the CRC routines used by other
//! Click drivers' datagrams.

#![no_std]
#![deny(unsafe_code)]

pub mod checksum;
pub mod command;
pub mod messages;
pub mod packet;
pub mod parser;

pub use command::{cmd, PacketKind};
pub use messages::{Event, Request, Setting};
pub use packet::{Packet, PacketError, MAX_FRAME_SIZE, MAX_PAYLOAD_LEN, MAX_PAYLOAD_SIZE, START_BYTE};
pub use parser::PacketParser;
