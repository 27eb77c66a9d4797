//! Typed ISM7 requests and events
//!
//! Message types are divided into two directions:
//! - Host → module: [`Request`], one per request command
//! - Module → host: [`Event`], parsed from confirmations and indications

use crate::command::{cmd, confirmation_for, PacketKind};
use crate::packet::{Packet, PacketError, MAX_PAYLOAD_LEN, MAX_PAYLOAD_SIZE};
use heapless::Vec;

/// Status byte value meaning "request accepted"
pub const STATUS_OK: u8 = 0x00;

/// Index of a non-volatile user setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setting(pub u8);

impl Setting {
    pub const UART_BAUDRATE: Self = Self(0x00);
    pub const RF_DEFAULT_CHANNEL: Self = Self(0x01);
    pub const RF_DEFAULT_POWER: Self = Self(0x02);
    pub const RF_DATA_RATE: Self = Self(0x03);
    pub const MAC_SOURCE_NET_ID: Self = Self(0x04);
    pub const MAC_SOURCE_ADDRESS: Self = Self(0x05);
    pub const MAC_DEST_NET_ID: Self = Self(0x06);
    pub const MAC_DEST_ADDRESS: Self = Self(0x07);
    pub const OP_MODE: Self = Self(0x08);

    /// Index byte as sent on the wire
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Requests from the host to the module
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request<'a> {
    /// Transmit data to the configured destination
    Data(&'a [u8]),
    /// Transmit data to an explicit channel and destination
    DataEx {
        channel: u8,
        dest_net_id: u8,
        dest_addr: u8,
        data: &'a [u8],
    },
    /// Software reset
    Reset,
    /// Read a user setting
    Get(Setting),
    /// Write a user setting
    Set { setting: Setting, value: &'a [u8] },
    /// Change the RF channel until the next reset
    SetChannel(u8),
    /// Change the destination network until the next reset
    SetDestNetId(u8),
    /// Change the destination address until the next reset
    SetDestAddr(u8),
    /// Query the RSSI of the last received packet
    Rssi,
    /// Enter shutdown
    Shutdown,
    /// Enter standby
    Standby,
    /// Change the output power until the next reset
    SetPaPower(u8),
    /// Restore factory settings
    FactoryReset,
}

impl<'a> Request<'a> {
    /// Command byte of this request
    pub fn command(&self) -> u8 {
        match self {
            Request::Data(_) => cmd::DATA_REQ,
            Request::DataEx { .. } => cmd::DATAEX_REQ,
            Request::Reset => cmd::RESET_REQ,
            Request::Get(_) => cmd::GET_REQ,
            Request::Set { .. } => cmd::SET_REQ,
            Request::SetChannel(_) => cmd::SET_CHANNEL_REQ,
            Request::SetDestNetId(_) => cmd::SET_DESTNETID_REQ,
            Request::SetDestAddr(_) => cmd::SET_DESTADDR_REQ,
            Request::Rssi => cmd::RSSI_REQ,
            Request::Shutdown => cmd::SHUTDOWN_REQ,
            Request::Standby => cmd::STANDBY_REQ,
            Request::SetPaPower(_) => cmd::SET_PAPOWER_REQ,
            Request::FactoryReset => cmd::FACTORY_RESET_REQ,
        }
    }

    /// Confirmation the module answers this request with
    pub fn expected_response(&self) -> u8 {
        confirmation_for(self.command())
    }

    /// Encode this request into a packet
    pub fn to_packet(&self) -> Result<Packet, PacketError> {
        let command = self.command();
        match self {
            Request::Data(data) => Packet::new(command, data),
            Request::DataEx {
                channel,
                dest_net_id,
                dest_addr,
                data,
            } => {
                // Payload: [channel][net id][address][data...]
                if data.len() + 3 > MAX_PAYLOAD_LEN {
                    return Err(PacketError::PayloadTooLarge);
                }
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&[*channel, *dest_net_id, *dest_addr])
                    .map_err(|_| PacketError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(data)
                    .map_err(|_| PacketError::PayloadTooLarge)?;
                Packet::new(command, &payload)
            }
            Request::Get(setting) => Packet::new(command, &[setting.index()]),
            Request::Set { setting, value } => {
                // Payload: [index][value...]
                if value.len() + 1 > MAX_PAYLOAD_LEN {
                    return Err(PacketError::PayloadTooLarge);
                }
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .push(setting.index())
                    .map_err(|_| PacketError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(value)
                    .map_err(|_| PacketError::PayloadTooLarge)?;
                Packet::new(command, &payload)
            }
            Request::SetChannel(value)
            | Request::SetDestNetId(value)
            | Request::SetDestAddr(value)
            | Request::SetPaPower(value) => Packet::new(command, &[*value]),
            Request::Reset
            | Request::Rssi
            | Request::Shutdown
            | Request::Standby
            | Request::FactoryReset => Ok(Packet::empty(command)),
        }
    }
}

/// Events parsed from module-originated packets
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event<'a> {
    /// Confirmation carrying only a status byte (and possibly echoed values)
    Confirm { command: u8, status: u8 },
    /// Setting value read back
    GetConfirm { status: u8, value: &'a [u8] },
    /// RSSI of the last received packet, in dBm
    RssiConfirm { status: u8, rssi: i8 },
    /// Data received over the air
    DataIndication { data: &'a [u8], rssi: i8 },
}

impl<'a> Event<'a> {
    /// Parse an event from a packet
    pub fn from_packet(packet: &'a Packet) -> Result<Self, PacketError> {
        let payload = packet.payload.as_slice();
        match (packet.command, PacketKind::of(packet.command)) {
            (cmd::GET_CNF, _) => {
                let (&status, value) = payload.split_first().ok_or(PacketError::InvalidPacket)?;
                Ok(Event::GetConfirm { status, value })
            }
            (cmd::RSSI_CNF, _) => match payload {
                [status, rssi, ..] => Ok(Event::RssiConfirm {
                    status: *status,
                    rssi: *rssi as i8,
                }),
                _ => Err(PacketError::InvalidPacket),
            },
            (cmd::DATAEX_IND, _) => {
                // Payload: [data...][rssi]
                let (&rssi, data) = payload.split_last().ok_or(PacketError::InvalidPacket)?;
                Ok(Event::DataIndication {
                    data,
                    rssi: rssi as i8,
                })
            }
            (command, Some(PacketKind::Confirmation)) if is_known_confirmation(command) => {
                let status = packet.status().ok_or(PacketError::InvalidPacket)?;
                Ok(Event::Confirm { command, status })
            }
            _ => Err(PacketError::InvalidPacket),
        }
    }

    /// Status byte, for confirmations
    pub fn status(&self) -> Option<u8> {
        match self {
            Event::Confirm { status, .. }
            | Event::GetConfirm { status, .. }
            | Event::RssiConfirm { status, .. } => Some(*status),
            Event::DataIndication { .. } => None,
        }
    }

    /// True for confirmations reporting success
    pub fn is_ok(&self) -> bool {
        self.status() == Some(STATUS_OK)
    }
}

fn is_known_confirmation(command: u8) -> bool {
    matches!(
        command,
        cmd::DATA_CNF
            | cmd::DATAEX_CNF
            | cmd::RESET_CNF
            | cmd::SET_CHANNEL_CNF
            | cmd::SET_DESTNETID_CNF
            | cmd::SET_DESTADDR_CNF
            | cmd::SET_CNF
            | cmd::SHUTDOWN_CNF
            | cmd::STANDBY_CNF
            | cmd::SET_PAPOWER_CNF
            | cmd::FACTORY_RESET_CNF
    )
}
